//! In-process content store.
//!
//! Holds files and directories keyed by hash, with switches to make individual queries fail
//! the way a flaky remote store would.

use crate::error::StoreError;
use crate::store::{ContentStore, DagLink, ObjectKind, Stat};
use crate::types::{Hash, PinType};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
enum Object {
    File { size: u64 },
    Directory { links: Vec<(String, Hash)> },
}

/// Content store backed by in-memory maps
#[derive(Default)]
pub struct MemoryContentStore {
    objects: RwLock<HashMap<Hash, Object>>,
    pins: RwLock<BTreeMap<Hash, PinType>>,
    failing_stats: RwLock<HashSet<Hash>>,
    failing_links: RwLock<HashSet<Hash>>,
    unavailable: RwLock<bool>,
    queries: AtomicUsize,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_file(&self, hash: &str, size: u64) {
        self.objects
            .write()
            .insert(hash.to_string(), Object::File { size });
    }

    /// Insert a directory whose links are `(name, child_hash)` pairs.
    ///
    /// Children do not need to exist yet; a dangling link surfaces as `NotFound` on stat.
    pub fn insert_directory(&self, hash: &str, links: &[(&str, &str)]) {
        let links = links
            .iter()
            .map(|(name, child)| (name.to_string(), child.to_string()))
            .collect();
        self.objects
            .write()
            .insert(hash.to_string(), Object::Directory { links });
    }

    pub fn pin(&self, hash: &str, pin_type: PinType) {
        self.pins.write().insert(hash.to_string(), pin_type);
    }

    /// Make every `stat` of `hash` fail with `Unavailable`.
    pub fn fail_stat(&self, hash: &str) {
        self.failing_stats.write().insert(hash.to_string());
    }

    /// Make every `dag_links` of `hash` fail with `Unavailable`.
    pub fn fail_links(&self, hash: &str) {
        self.failing_links.write().insert(hash.to_string());
    }

    /// Make every query fail, including `list_pins`.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write() = unavailable;
    }

    /// Number of queries served so far (successful or not)
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if *self.unavailable.read() {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        Ok(())
    }

    /// Cumulative size of `hash`, counting each object on a path once.
    fn cumulative_size(
        objects: &HashMap<Hash, Object>,
        hash: &str,
        lineage: &mut Vec<Hash>,
    ) -> Result<u64, StoreError> {
        let object = objects
            .get(hash)
            .ok_or_else(|| StoreError::NotFound(hash.to_string()))?;
        match object {
            Object::File { size } => Ok(*size),
            Object::Directory { links } => {
                if lineage.iter().any(|h| h == hash) {
                    return Ok(0);
                }
                lineage.push(hash.to_string());
                let mut total = 0u64;
                for (_, child) in links {
                    // Dangling children contribute nothing to their parent's size.
                    if let Ok(size) = Self::cumulative_size(objects, child, lineage) {
                        total = total.saturating_add(size);
                    }
                }
                lineage.pop();
                Ok(total)
            }
        }
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn list_pins(&self) -> Result<BTreeMap<Hash, PinType>, StoreError> {
        self.check_available()?;
        Ok(self.pins.read().clone())
    }

    async fn stat(&self, hash: &str) -> Result<Stat, StoreError> {
        self.check_available()?;
        if self.failing_stats.read().contains(hash) {
            return Err(StoreError::Unavailable(format!("stat of {} failed", hash)));
        }
        let objects = self.objects.read();
        let kind = match objects.get(hash) {
            Some(Object::File { .. }) => ObjectKind::File,
            Some(Object::Directory { .. }) => ObjectKind::Directory,
            None => return Err(StoreError::NotFound(hash.to_string())),
        };
        let cumulative_size = Self::cumulative_size(&objects, hash, &mut Vec::new())?;
        Ok(Stat {
            cumulative_size,
            kind,
        })
    }

    async fn dag_links(&self, hash: &str) -> Result<Vec<DagLink>, StoreError> {
        self.check_available()?;
        if self.failing_links.read().contains(hash) {
            return Err(StoreError::Unavailable(format!("links of {} failed", hash)));
        }
        let objects = self.objects.read();
        match objects.get(hash) {
            Some(Object::File { .. }) => Ok(Vec::new()),
            Some(Object::Directory { links }) => Ok(links
                .iter()
                .map(|(name, child)| DagLink {
                    hash: child.clone(),
                    name: name.clone(),
                    size: Self::cumulative_size(&objects, child, &mut Vec::new()).unwrap_or(0),
                })
                .collect()),
            None => Err(StoreError::NotFound(hash.to_string())),
        }
    }
}
