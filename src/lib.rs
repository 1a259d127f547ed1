//! Metaclient: grouping and pin-tree reduction for content-addressed storage
//!
//! Two engines sit behind the client's upload and archive paths:
//!
//! - [`grouping`] packs a directory listing into size-bounded groups, one archive per group.
//! - [`tree`] builds the containment tree over a store's pins and marks the pins already
//!   reachable from another pin, leaving the top-level set.
//!
//! Both talk to the outside world through narrow traits ([`grouping::SourceLister`],
//! [`store::ContentStore`]) so they run against in-memory fakes as well as a live node.

pub mod config;
pub mod error;
pub mod grouping;
pub mod logging;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;

pub use error::{ApiError, StoreError};
pub use types::{path_join, Hash, PinType};
