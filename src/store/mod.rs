//! Content Store
//!
//! The narrow interface the tree builder needs from a content-addressed store: list what is
//! pinned, stat a hash, and read the direct links of a directory object. Implementations are
//! passed in explicitly so tests can substitute [`memory::MemoryContentStore`].

pub mod ipfs;
pub mod memory;

use crate::error::StoreError;
use crate::types::{Hash, PinType};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Object kind reported by `stat`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    File,
    Directory,
}

impl ObjectKind {
    pub fn is_directory(self) -> bool {
        self == ObjectKind::Directory
    }
}

/// Result of a `stat` query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    /// Size of the object including everything it links to
    pub cumulative_size: u64,
    pub kind: ObjectKind,
}

/// Named reference from a directory object to a child object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagLink {
    pub hash: Hash,
    pub name: String,
    pub size: u64,
}

/// Content store interface
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Enumerate currently pinned content, ordered by hash.
    async fn list_pins(&self) -> Result<BTreeMap<Hash, PinType>, StoreError>;

    async fn stat(&self, hash: &str) -> Result<Stat, StoreError>;

    /// Direct child references of `hash`; empty for files.
    async fn dag_links(&self, hash: &str) -> Result<Vec<DagLink>, StoreError>;
}
