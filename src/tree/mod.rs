//! Containment tree over pinned content
//!
//! Build the forest of pinned hashes from a content store, then reduce it to the pins that
//! are not already reachable from another pin.

pub mod builder;
pub mod node;
pub mod reduce;
pub mod render;

pub use builder::{build_and_reduce, BuildOutcome, BuildReport, TreeBuilder};
pub use node::{Node, ROOT_PATH};
pub use reduce::{reduce, top_nodes};
