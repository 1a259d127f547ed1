//! Core types shared by the grouping and tree modules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash: content address of an immutable object (a CID string for IPFS-backed stores)
pub type Hash = String;

/// How a hash is pinned in the content store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinType {
    Recursive,
    Direct,
    Indirect,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for PinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PinType::Recursive => "recursive",
            PinType::Direct => "direct",
            PinType::Indirect => "indirect",
            PinType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Join path segments with exactly one `/` between them.
///
/// Trailing slashes are trimmed from the result, except that a bare root stays `/`.
pub fn path_join(root: &str, parts: &[&str]) -> String {
    let mut joined = root.to_string();
    for part in parts {
        joined = format!(
            "{}/{}",
            joined.trim_end_matches('/'),
            part.trim_start_matches('/')
        );
    }
    let trimmed = joined.trim_end_matches('/');
    if trimmed.is_empty() && joined.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
