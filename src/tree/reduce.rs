//! Non-redundant root detection
//!
//! A pinned hash is *top* when no other pin's subtree already contains it. Reduction marks
//! `is_top` on each direct child of the synthetic root and leaves deeper nodes untouched.

use crate::error::ApiError;
use crate::tree::node::Node;
use std::cmp::Ordering;
use tracing::{debug, info};

/// Mark `is_top` on every direct child of `root`.
///
/// Child `i` is redundant when another child `j` contains `i`'s hash in its subtree. When
/// `i` and `j` contain each other (only possible with duplicate pins or cyclic store data),
/// exactly one of them stays top: the larger one, then the smaller hash, then the earlier
/// position.
pub fn reduce(root: &mut Node) -> Result<(), ApiError> {
    if !root.is_root() {
        return Err(ApiError::InvalidArgument(
            "reduction must start at the synthetic root \"/\"".to_string(),
        ));
    }

    let children = &root.children;
    let n = children.len();
    // contains[j][i]: child j's subtree holds child i's hash
    let contains: Vec<Vec<bool>> = (0..n)
        .map(|j| {
            (0..n)
                .map(|i| i != j && children[j].find(&children[i].hash).is_some())
                .collect()
        })
        .collect();

    let tops: Vec<bool> = (0..n)
        .map(|i| {
            !(0..n).any(|j| {
                contains[j][i] && !(contains[i][j] && wins_tie(children, i, j) == Ordering::Less)
            })
        })
        .collect();

    for (child, top) in root.children.iter_mut().zip(tops) {
        if !top {
            debug!(hash = %child.hash, "Pin already reachable from another pin");
        }
        child.is_top = top;
    }

    info!(
        pins = n,
        top = root.children.iter().filter(|c| c.is_top).count(),
        "Reduced pin tree"
    );
    Ok(())
}

/// `Less` when child `i` should stay top over child `j`.
fn wins_tie(children: &[Node], i: usize, j: usize) -> Ordering {
    let (a, b) = (&children[i], &children[j]);
    b.size
        .cmp(&a.size)
        .then_with(|| a.hash.cmp(&b.hash))
        .then_with(|| i.cmp(&j))
}

/// Direct children of `root` currently marked top
pub fn top_nodes(root: &Node) -> Vec<&Node> {
    root.children.iter().filter(|child| child.is_top).collect()
}
