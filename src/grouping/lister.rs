//! Source listing: turn a directory into the flat item list the grouper consumes.

use crate::error::ApiError;
use crate::grouping::Item;
use std::path::Path;
use walkdir::WalkDir;

/// Produces the items directly under a source root
pub trait SourceLister: Send + Sync {
    fn list(&self, source_path: &Path) -> Result<Vec<Item>, ApiError>;
}

/// Lists a local directory.
///
/// Each direct entry becomes one item, in file name order. A directory entry is sized by the sum
/// of the regular files beneath it. Any I/O error fails the whole listing.
#[derive(Debug, Default, Clone)]
pub struct FsSourceLister {
    /// Follow symbolic links while sizing directories
    pub follow_links: bool,
}

impl FsSourceLister {
    pub fn new() -> Self {
        Self::default()
    }

    fn directory_size(&self, path: &Path) -> Result<u64, ApiError> {
        let mut total = 0u64;
        for entry in WalkDir::new(path).follow_links(self.follow_links) {
            let entry = entry.map_err(|e| ApiError::listing(path, e))?;
            if entry.file_type().is_file() {
                let metadata = entry
                    .metadata()
                    .map_err(|e| ApiError::listing(entry.path(), e))?;
                total = total.saturating_add(metadata.len());
            }
        }
        Ok(total)
    }
}

impl SourceLister for FsSourceLister {
    fn list(&self, source_path: &Path) -> Result<Vec<Item>, ApiError> {
        let metadata =
            std::fs::metadata(source_path).map_err(|e| ApiError::listing(source_path, e))?;
        if !metadata.is_dir() {
            return Err(ApiError::listing(
                source_path,
                "source root is not a directory",
            ));
        }

        let entries = WalkDir::new(source_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_links)
            .sort_by_file_name();
        let mut items = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ApiError::listing(source_path, e))?;
            let path = entry.path();
            let name = entry.file_name().to_str().map(str::to_string).ok_or_else(|| {
                ApiError::listing(path, "entry name is not valid UTF-8")
            })?;
            let metadata = entry.metadata().map_err(|e| ApiError::listing(path, e))?;

            let item = if metadata.is_dir() {
                Item::new(&name, self.directory_size(path)?, true)
            } else {
                Item::new(&name, metadata.len(), false)
            };
            tracing::debug!(
                name = %item.name,
                size = item.size,
                directory = item.is_directory,
                "Listed source item"
            );
            items.push(item);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_source;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("b.bin"), vec![0u8; 300]).unwrap();
        fs::write(root.join("a.txt"), vec![0u8; 20]).unwrap();
        fs::create_dir_all(root.join("docs/nested")).unwrap();
        fs::write(root.join("docs/one.md"), vec![0u8; 100]).unwrap();
        fs::write(root.join("docs/nested/two.md"), vec![0u8; 50]).unwrap();
        temp
    }

    #[test]
    fn test_lists_direct_entries_sorted_by_name() {
        let temp = fixture();
        let items = FsSourceLister::new().list(temp.path()).unwrap();
        assert_eq!(
            items,
            vec![
                Item::new("a.txt", 20, false),
                Item::new("b.bin", 300, false),
                Item::new("docs", 150, true),
            ]
        );
    }

    #[test]
    fn test_nested_entries_are_not_top_level_items() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("z/deep")).unwrap();
        fs::write(root.join("z/deep/inner.txt"), vec![0u8; 7]).unwrap();
        fs::write(root.join("c.txt"), vec![0u8; 3]).unwrap();
        fs::write(root.join("B.txt"), vec![0u8; 5]).unwrap();

        let items = FsSourceLister::new().list(root).unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["B.txt", "c.txt", "z"]);
        assert_eq!(items[2], Item::new("z", 7, true));
    }

    #[test]
    fn test_missing_source_is_listing_failure() {
        let temp = TempDir::new().unwrap();
        let err = FsSourceLister::new()
            .list(&temp.path().join("absent"))
            .unwrap_err();
        assert!(matches!(err, ApiError::ListingFailure { .. }));
    }

    #[test]
    fn test_file_source_is_listing_failure() {
        let temp = fixture();
        let err = FsSourceLister::new()
            .list(&temp.path().join("a.txt"))
            .unwrap_err();
        assert!(matches!(err, ApiError::ListingFailure { .. }));
    }

    #[test]
    fn test_group_source_end_to_end() {
        let temp = fixture();
        let groups = group_source(&FsSourceLister::new(), temp.path(), 200).unwrap();
        let sizes: Vec<u64> = groups.iter().map(|g| g.size).collect();
        assert_eq!(sizes, vec![300, 170]);
        assert_eq!(groups[1].items[0].name, "docs");
    }

    #[test]
    fn test_group_source_checks_limit_before_listing() {
        let temp = TempDir::new().unwrap();
        let err = group_source(&FsSourceLister::new(), &temp.path().join("absent"), 0).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }
}
