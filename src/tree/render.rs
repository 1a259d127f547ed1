//! Format pin trees as text.

use crate::tree::builder::BuildReport;
use crate::tree::node::Node;
use crate::tree::reduce::top_nodes;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

fn kind_label(node: &Node) -> &'static str {
    if node.is_directory {
        "dir"
    } else {
        "file"
    }
}

/// Every node in pre-order, indented two spaces per level below the root.
pub fn render_tree(root: &Node) -> String {
    let mut out = String::new();
    for (depth, node) in root.walk() {
        if depth == 0 {
            out.push_str(&format!("{}\n", node.path));
            continue;
        }
        out.push_str(&format!(
            "{}{} {} {} {}\n",
            "  ".repeat(depth - 1),
            node.name,
            node.hash,
            node.size,
            kind_label(node)
        ));
    }
    out
}

/// Table of the root's children still marked top after reduction.
pub fn render_tops(root: &Node) -> String {
    let tops = top_nodes(root);
    let mut out = format!("{}\n\n", "Top-level pins".bold().underline());
    if tops.is_empty() {
        out.push_str("No top-level pins.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Hash", "Name", "Size", "Type"]);
    for node in tops {
        table.add_row(vec![
            node.hash.clone(),
            node.name.clone(),
            node.size.to_string(),
            kind_label(node).to_string(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

/// One-line build summary
pub fn render_report(report: &BuildReport) -> String {
    let mut line = format!(
        "{} pins, {} attached, {} nodes, {} skipped",
        report.pins, report.attached_pins, report.nodes, report.skipped
    );
    if report.truncated > 0 {
        line.push_str(&format!(
            ", {} directories with unreadable links",
            report.truncated
        ));
    }
    if report.cancelled {
        line.push_str(" (cancelled, tree is partial)");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::reduce::reduce;

    fn sample_root() -> Node {
        let mut d = Node::under("/", "QmD", "QmD", 100, true);
        d.add_child(Node::under("/QmD", "QmF", "f.txt", 40, false));
        let mut root = Node::root();
        root.add_child(d);
        root.add_child(Node::under("/", "QmF", "QmF", 40, false));
        root
    }

    #[test]
    fn test_render_tree_indents_by_depth() {
        let text = render_tree(&sample_root());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "/",
                "QmD QmD 100 dir",
                "  f.txt QmF 40 file",
                "QmF QmF 40 file",
            ]
        );
    }

    #[test]
    fn test_render_tops_lists_only_top_pins() {
        let mut root = sample_root();
        reduce(&mut root).unwrap();
        let text = render_tops(&root);
        assert!(text.contains("QmD"));
        assert!(!text.contains("QmF"));
    }

    #[test]
    fn test_render_tops_empty() {
        let text = render_tops(&Node::root());
        assert!(text.contains("No top-level pins."));
    }

    #[test]
    fn test_render_report_flags_cancellation() {
        let report = BuildReport {
            pins: 3,
            attached_pins: 1,
            nodes: 2,
            skipped: 2,
            truncated: 0,
            cancelled: true,
        };
        assert_eq!(
            render_report(&report),
            "3 pins, 1 attached, 2 nodes, 2 skipped (cancelled, tree is partial)"
        );
    }

    #[test]
    fn test_render_report_names_truncated_directories() {
        let report = BuildReport {
            pins: 2,
            attached_pins: 2,
            nodes: 2,
            skipped: 0,
            truncated: 1,
            cancelled: false,
        };
        assert_eq!(
            render_report(&report),
            "2 pins, 2 attached, 2 nodes, 0 skipped, 1 directories with unreadable links"
        );
    }
}
