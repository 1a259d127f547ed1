//! Containment Tree Builder
//!
//! Materializes the pin forest from a content store: one child of the synthetic root per
//! pinned hash, each directory expanded through its DAG links. A failed stat or link query
//! skips that node and its subtree; the rest of the build carries on.
//!
//! Store queries run concurrently up to a fixed limit. Sibling results are collected and
//! attached by the parent's future once all of them have resolved, so nodes are never
//! shared between tasks.

use crate::error::{ApiError, StoreError};
use crate::store::{ContentStore, DagLink};
use crate::tree::node::{Node, ROOT_PATH};
use crate::types::{Hash, PinType};
use futures::future::{join_all, BoxFuture, FutureExt};
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default number of store queries allowed in flight
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Summary of one build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Pins handed to the builder
    pub pins: usize,
    /// Pins that made it into the tree as root children
    pub attached_pins: usize,
    /// Nodes in the tree, the synthetic root excluded
    pub nodes: usize,
    /// Nodes dropped because a query failed, was cancelled, or would have closed a cycle
    pub skipped: usize,
    /// Directories kept without children because their links could not be read
    pub truncated: usize,
    pub cancelled: bool,
}

impl BuildReport {
    pub fn is_complete(&self) -> bool {
        self.skipped == 0 && self.truncated == 0 && !self.cancelled
    }
}

/// Result of a build: the tree and how much of it was materialized
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub root: Node,
    pub report: BuildReport,
}

/// Tree builder bound to one content store
pub struct TreeBuilder<'a> {
    store: &'a dyn ContentStore,
    permits: Semaphore,
    cancel: CancellationToken,
    skipped: AtomicUsize,
    truncated: AtomicUsize,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(store: &'a dyn ContentStore) -> Self {
        Self::with_concurrency(store, DEFAULT_CONCURRENCY)
    }

    /// Builder allowing at most `concurrency` store queries in flight (minimum 1).
    pub fn with_concurrency(store: &'a dyn ContentStore, concurrency: usize) -> Self {
        Self {
            store,
            permits: Semaphore::new(concurrency.max(1)),
            cancel: CancellationToken::new(),
            skipped: AtomicUsize::new(0),
            truncated: AtomicUsize::new(0),
        }
    }

    /// Use `token` to abort the build; outstanding queries are dropped and the partial tree
    /// is returned.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// List the store's pins and build the tree over them.
    ///
    /// Failing to list pins aborts: without the pin set there is nothing to build.
    pub async fn build_from_store(&self) -> Result<BuildOutcome, ApiError> {
        let pins = self
            .guarded(self.store.list_pins())
            .await
            .map_err(|source| ApiError::StoreQueryFailure {
                hash: "pin set".to_string(),
                source,
            })?;
        info!(pins = pins.len(), "Listed pins to process");
        Ok(self.build(&pins).await)
    }

    /// Build the containment tree over `pins`.
    pub async fn build(&self, pins: &BTreeMap<Hash, PinType>) -> BuildOutcome {
        self.skipped.store(0, Ordering::SeqCst);
        self.truncated.store(0, Ordering::SeqCst);
        let mut root = Node::root();

        let tops = pins.iter().map(|(hash, pin_type)| async move {
            debug!(hash = %hash, pin_type = %pin_type, "Processing pin");
            let stat = match self.guarded(self.store.stat(hash)).await {
                Ok(stat) => stat,
                Err(e) => {
                    self.skip(hash, "stat", &e);
                    return None;
                }
            };
            let node = Node::under(
                ROOT_PATH,
                hash,
                hash,
                stat.cumulative_size,
                stat.kind.is_directory(),
            );
            Some(self.expand(node, Vec::new()).await)
        });

        for node in join_all(tops).await.into_iter().flatten() {
            debug!(hash = %node.hash, directory = node.is_directory, "Attached pin to root");
            root.add_child(node);
        }

        let report = BuildReport {
            pins: pins.len(),
            attached_pins: root.children.len(),
            nodes: root.count() - 1,
            skipped: self.skipped.load(Ordering::SeqCst),
            truncated: self.truncated.load(Ordering::SeqCst),
            cancelled: self.cancel.is_cancelled(),
        };
        info!(
            pins = report.pins,
            attached = report.attached_pins,
            nodes = report.nodes,
            skipped = report.skipped,
            truncated = report.truncated,
            cancelled = report.cancelled,
            "Pin tree built"
        );
        BuildOutcome { root, report }
    }

    /// Attach the children of `node` when it is a directory, recursively.
    ///
    /// `lineage` holds the hashes from the top-level pin down to `node`'s parent.
    fn expand<'s>(&'s self, node: Node, lineage: Vec<Hash>) -> BoxFuture<'s, Node> {
        async move {
            let mut node = node;
            if !node.is_directory {
                return node;
            }

            let links = match self.guarded(self.store.dag_links(&node.hash)).await {
                Ok(links) => links,
                Err(e) => {
                    // The directory itself stays; only its contents are unknown.
                    self.truncated.fetch_add(1, Ordering::SeqCst);
                    if e == StoreError::Cancelled {
                        debug!(hash = %node.hash, "Link query cancelled, directory truncated");
                    } else {
                        warn!(hash = %node.hash, error = %e, "Failed to read directory links");
                    }
                    return node;
                }
            };

            let mut lineage = lineage;
            lineage.push(node.hash.clone());

            let parent_path = node.path.clone();
            let children = links
                .into_iter()
                .map(|link| self.materialize(&parent_path, link, &lineage));
            for child in join_all(children).await.into_iter().flatten() {
                node.add_child(child);
            }
            node
        }
        .boxed()
    }

    async fn materialize(
        &self,
        parent_path: &str,
        link: DagLink,
        lineage: &[Hash],
    ) -> Option<Node> {
        if lineage.iter().any(|h| *h == link.hash) {
            warn!(
                hash = %link.hash,
                parent = %parent_path,
                "Link points back to an ancestor, not expanding"
            );
            self.skipped.fetch_add(1, Ordering::SeqCst);
            return None;
        }

        let stat = match self.guarded(self.store.stat(&link.hash)).await {
            Ok(stat) => stat,
            Err(e) => {
                self.skip(&link.hash, "stat", &e);
                return None;
            }
        };

        let child = Node::under(
            parent_path,
            &link.hash,
            &link.name,
            stat.cumulative_size,
            stat.kind.is_directory(),
        );
        Some(self.expand(child, lineage.to_vec()).await)
    }

    /// Run one store query under the concurrency limit, giving up on cancellation.
    async fn guarded<T, F>(&self, query: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let _permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(StoreError::Cancelled),
            permit = self.permits.acquire() => permit
                .map_err(|_| StoreError::Unavailable("query limiter closed".to_string()))?,
        };
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(StoreError::Cancelled),
            result = query => result,
        }
    }

    fn skip(&self, hash: &str, query: &str, error: &StoreError) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
        if *error == StoreError::Cancelled {
            debug!(hash = %hash, query, "Query cancelled, node skipped");
        } else {
            warn!(hash = %hash, query, error = %error, "Store query failed, node skipped");
        }
    }
}

/// Build, sort, and reduce in one go: the usual way to get the top-level pin view.
pub async fn build_and_reduce(builder: &TreeBuilder<'_>) -> Result<BuildOutcome, ApiError> {
    let mut outcome = builder.build_from_store().await?;
    outcome.root.sort_all();
    crate::tree::reduce::reduce(&mut outcome.root)?;
    Ok(outcome)
}
