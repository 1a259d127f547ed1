//! Archive plans: what the external packager needs to turn one group into archive files.

use crate::error::ApiError;
use crate::grouping::Group;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Packaging instructions for one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivePlan {
    /// `<source dir name>-Group-<index>`
    pub graph_name: String,
    /// Source root the inputs are relative to
    pub parent_path: PathBuf,
    /// Item names, in group order
    pub inputs: Vec<String>,
    pub output_dir: PathBuf,
    /// Maximum size of a single archive slice in bytes
    pub slice_size: u64,
    pub parallel: usize,
    /// Bytes of source data covered by the plan
    pub source_size: u64,
}

impl ArchivePlan {
    pub fn for_group(
        group: &Group,
        output_dir: &Path,
        slice_size: u64,
        parallel: usize,
    ) -> Result<Self, ApiError> {
        if slice_size == 0 {
            return Err(ApiError::InvalidArgument(
                "archive slice size must be a positive byte count".to_string(),
            ));
        }
        if parallel == 0 {
            return Err(ApiError::InvalidArgument(
                "archive parallelism must be at least 1".to_string(),
            ));
        }

        let base = group
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "source".to_string());

        Ok(Self {
            graph_name: format!("{}-Group-{}", base, group.index),
            parent_path: group.path.clone(),
            inputs: group.items.iter().map(|item| item.name.clone()).collect(),
            output_dir: output_dir.to_path_buf(),
            slice_size,
            parallel,
            source_size: group.size,
        })
    }
}

/// One plan per group, in group order.
pub fn plan_groups(
    groups: &[Group],
    output_dir: &Path,
    slice_size: u64,
    parallel: usize,
) -> Result<Vec<ArchivePlan>, ApiError> {
    groups
        .iter()
        .map(|group| ArchivePlan::for_group(group, output_dir, slice_size, parallel))
        .collect()
}
