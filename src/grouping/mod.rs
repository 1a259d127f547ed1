//! Size-bounded grouping
//!
//! Partitions a flat listing into groups that each fit under a byte limit, so every group can
//! be packaged into its own archive. First-fit-descending: items are taken largest first and
//! a group is sealed as soon as the next item would overflow it. An item larger than the limit
//! still gets a group of its own rather than being rejected.

pub mod lister;
pub mod plan;

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub use lister::{FsSourceLister, SourceLister};
pub use plan::ArchivePlan;

/// One entry of a source listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub size: u64,
    pub is_directory: bool,
}

impl Item {
    pub fn new(name: &str, size: u64, is_directory: bool) -> Self {
        Self {
            name: name.to_string(),
            size,
            is_directory,
        }
    }
}

/// A batch of items drawn from one source root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub index: usize,
    pub path: PathBuf,
    /// Sum of the items' sizes
    pub size: u64,
    pub items: Vec<Item>,
}

impl Group {
    fn new(index: usize, path: &Path) -> Self {
        Self {
            index,
            path: path.to_path_buf(),
            size: 0,
            items: Vec::new(),
        }
    }

    fn push(&mut self, item: Item) {
        self.size = self.size.saturating_add(item.size);
        self.items.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this group is a single item too large for `limit`
    pub fn is_oversize(&self, limit: u64) -> bool {
        self.size > limit
    }
}

fn check_limit(limit: u64) -> Result<(), ApiError> {
    if limit == 0 {
        return Err(ApiError::InvalidArgument(
            "limit must be a positive byte count".to_string(),
        ));
    }
    Ok(())
}

/// Partition `items` into groups of at most `limit` bytes each.
///
/// Items are ordered by size, largest first; equal sizes keep their input order. Groups come
/// back in index order, none of them empty. A group exceeds `limit` only when it holds
/// exactly one item that is itself larger than `limit`.
pub fn group_items(
    mut items: Vec<Item>,
    limit: u64,
    source_path: &Path,
) -> Result<Vec<Group>, ApiError> {
    check_limit(limit)?;
    items.sort_by(|a, b| b.size.cmp(&a.size));

    let mut groups = Vec::new();
    let mut current = Group::new(0, source_path);

    for item in items {
        if current.size.saturating_add(item.size) > limit && !current.is_empty() {
            debug!(
                index = current.index,
                size = current.size,
                items = current.len(),
                "Sealing group"
            );
            let next = Group::new(current.index + 1, source_path);
            groups.push(std::mem::replace(&mut current, next));
        }
        if item.size > limit {
            warn!(
                name = %item.name,
                size = item.size,
                limit,
                "Item exceeds group limit, placing it in a group of its own"
            );
        }
        current.push(item);
    }
    if !current.is_empty() {
        groups.push(current);
    }

    info!(
        source = %source_path.display(),
        groups = groups.len(),
        limit,
        "Grouped source items"
    );
    Ok(groups)
}

/// List `source_path` with `lister` and group the result.
///
/// The limit is checked before listing; a listing failure aborts without returning groups.
pub fn group_source(
    lister: &dyn SourceLister,
    source_path: &Path,
    limit: u64,
) -> Result<Vec<Group>, ApiError> {
    check_limit(limit)?;
    let items = lister.list(source_path)?;
    group_items(items, limit, source_path)
}
