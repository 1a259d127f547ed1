use metaclient::store::memory::MemoryContentStore;
use metaclient::store::ContentStore;
use metaclient::tree::render::render_tops;
use metaclient::tree::{build_and_reduce, top_nodes, TreeBuilder};
use metaclient::PinType;
use tokio_util::sync::CancellationToken;

fn top_hashes(root: &metaclient::tree::Node) -> Vec<String> {
    top_nodes(root).into_iter().map(|n| n.hash.clone()).collect()
}

/// Two archives sharing a file, one of them also pinned on its own, plus an unrelated file.
fn archive_store() -> MemoryContentStore {
    let store = MemoryContentStore::new();
    store.insert_file("QmShared", 500);
    store.insert_file("QmLog", 20);
    store.insert_file("QmLone", 90);
    store.insert_directory("QmInner", &[("shared.bin", "QmShared")]);
    store.insert_directory("QmOuter", &[("inner", "QmInner"), ("log.txt", "QmLog")]);
    store.insert_directory("QmOther", &[("copy.bin", "QmShared")]);
    for hash in ["QmOuter", "QmInner", "QmOther", "QmLone", "QmShared"] {
        store.pin(hash, PinType::Recursive);
    }
    store
}

#[tokio::test]
async fn nested_and_shared_pins_reduce_to_disjoint_roots() {
    let store = archive_store();
    let builder = TreeBuilder::with_concurrency(&store, 3);
    let outcome = build_and_reduce(&builder).await.unwrap();

    assert!(outcome.report.is_complete());
    assert_eq!(outcome.report.pins, 5);
    assert_eq!(outcome.report.attached_pins, 5);

    let tops = top_hashes(&outcome.root);
    assert_eq!(tops, vec!["QmOuter", "QmOther", "QmLone"]);

    let inner = outcome.root.children.iter().find(|n| n.hash == "QmInner").unwrap();
    assert!(!inner.is_top);
    let shared = outcome.root.children.iter().find(|n| n.hash == "QmShared").unwrap();
    assert!(!shared.is_top);
}

#[tokio::test]
async fn results_do_not_depend_on_concurrency() {
    let store = archive_store();
    let serial = build_and_reduce(&TreeBuilder::with_concurrency(&store, 1))
        .await
        .unwrap();
    let wide = build_and_reduce(&TreeBuilder::with_concurrency(&store, 16))
        .await
        .unwrap();
    assert_eq!(serial.root, wide.root);
}

#[tokio::test]
async fn failed_stat_skips_only_that_pin() {
    let store = archive_store();
    store.fail_stat("QmLone");
    let outcome = build_and_reduce(&TreeBuilder::new(&store)).await.unwrap();

    assert_eq!(outcome.report.attached_pins, 4);
    assert_eq!(outcome.report.skipped, 1);
    assert!(!outcome.report.is_complete());
    assert_eq!(top_hashes(&outcome.root), vec!["QmOuter", "QmOther"]);
}

#[tokio::test]
async fn unreadable_links_mark_build_incomplete() {
    let store = archive_store();
    store.fail_links("QmOuter");
    let outcome = build_and_reduce(&TreeBuilder::new(&store)).await.unwrap();

    assert_eq!(outcome.report.attached_pins, 5);
    assert_eq!(outcome.report.skipped, 0);
    assert_eq!(outcome.report.truncated, 1);
    assert!(!outcome.report.is_complete());

    let outer = outcome.root.children.iter().find(|n| n.hash == "QmOuter").unwrap();
    assert!(outer.children.is_empty());
    assert!(top_hashes(&outcome.root).contains(&"QmInner".to_string()));
}

#[tokio::test]
async fn cancelled_build_returns_partial_tree() {
    let store = archive_store();
    let token = CancellationToken::new();
    token.cancel();
    let pins = store.list_pins().await.unwrap();
    let builder = TreeBuilder::new(&store).with_cancellation(token);
    let outcome = builder.build(&pins).await;

    assert!(outcome.report.cancelled);
    assert_eq!(outcome.report.pins, 5);
    assert_eq!(outcome.report.attached_pins, 0);
    assert_eq!(outcome.report.skipped, 5);
    assert!(outcome.root.children.is_empty());
}

#[tokio::test]
async fn empty_store_renders_placeholder() {
    let store = MemoryContentStore::new();
    let outcome = build_and_reduce(&TreeBuilder::new(&store)).await.unwrap();
    assert_eq!(outcome.report.pins, 0);
    assert!(render_tops(&outcome.root).contains("No top-level pins."));
}
