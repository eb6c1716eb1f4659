//! Multi-panel pages
//!
//! Several trees plus a hex dump composed side by side and written out.

use crate::common::*;
use snapview::{Error, LayoutOptions, Panel};
use std::fs;

fn rule_width(page: &str) -> usize {
    page.lines().next().map(|l| l.chars().count()).unwrap_or(0)
}

#[test]
fn buffer_states_and_hexdump_on_one_page() {
    let tmp = TempDir::new().unwrap();
    let snapshotter = editor_snapshotter();
    let limits = *snapshotter.default_limits();

    let buffer = sample_buffer(2);
    let states = sample_states();
    let block = buffer
        .b_ml
        .ml_mfp
        .as_ref()
        .and_then(|mf| mf.mf_used_first.clone())
        .unwrap();
    let hex = HexDump::new()
        .with_base_address(0)
        .panel("bh_data", &block.bh_data[..32]);
    let hex_width = hex.width();

    let request = SnapshotRequest::new()
        .node("buffer", Node::from_ref(&buffer), "buffer")
        .node("states", Node::from_ref(&states), "state_stack")
        .panel(hex);
    assert_eq!(request.len(), 3);

    let mut dest = SnapshotDestination::append_history(tmp.path(), "keidump");
    let path = snapshotter.snapshot_page(&request, &mut dest, &limits).unwrap();
    let page = fs::read_to_string(path).unwrap();

    // every row has the same width; the tallest panel sets the height
    let width = rule_width(&page);
    assert!(page.lines().all(|l| l.chars().count() == width));

    let first = page.lines().next().unwrap();
    assert!(first.starts_with("| buffer: 0x"));
    assert!(first.contains("| state_stack: 0x"));
    assert!(first.contains("| 0x00000000: 6c 69 6e 65 00 00 00 00  00"));
    assert!(first.ends_with(" |"));

    // the hex panel is two rows tall; its rule sits on the third row
    let third = page.lines().nth(2).unwrap();
    assert!(third.ends_with(&format!("| {}", "-".repeat(hex_width))));

    let history = fs::read_to_string(dest.history_path()).unwrap();
    assert!(history.starts_with("# 0\n"));
}

#[test]
fn prepared_panels_only() {
    let snapshotter = editor_snapshotter();
    let request = SnapshotRequest::new()
        .panel(Panel::new("a", ["one", "two"]))
        .panel(Panel::from_text("b", "x\ny\nz"));

    let page = snapshotter
        .render_page(&request, snapshotter.default_limits())
        .unwrap();
    let rows: Vec<&str> = page.lines().collect();

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], "| one | | x |");
    assert_eq!(rows[1], "| two | | y |");
    assert_eq!(rows[2], "------- | z |");
    assert_eq!(rows[3], "        -----");
}

#[test]
fn empty_request_renders_empty_page() {
    let snapshotter = editor_snapshotter();
    let page = snapshotter
        .render_page(&SnapshotRequest::new(), snapshotter.default_limits())
        .unwrap();
    assert!(page.is_empty());
}

#[test]
fn titles_add_a_header_row() {
    let mut config = SnapviewConfig::default();
    config.layout = LayoutOptions {
        titles: true,
        ..LayoutOptions::default()
    };
    let snapshotter = Snapshotter::new(editor_registry(), config).unwrap();

    let states = sample_states();
    let request = SnapshotRequest::new().node("states", Node::from_ref(&states), "state_stack");
    let page = snapshotter
        .render_page(&request, snapshotter.default_limits())
        .unwrap();

    let first = page.lines().next().unwrap();
    assert!(first.starts_with("-- states -"));
    assert!(page.lines().nth(1).unwrap().starts_with("| state_stack: 0x"));
}

#[test]
fn too_many_panels_is_rejected_before_traversal() {
    let config = SnapviewConfig::from_toml_str("[layout]\nmax_panels = 2\n").unwrap();
    let snapshotter = Snapshotter::new(editor_registry(), config).unwrap();

    let buffer = sample_buffer(1);
    let request = SnapshotRequest::new()
        .node("a", Node::from_ref(&buffer), "buffer")
        .node("b", Node::from_ref(&buffer), "buffer")
        .node("c", Node::from_ref(&buffer), "buffer");

    let tmp = TempDir::new().unwrap();
    let mut dest = SnapshotDestination::overwrite(tmp.path(), "page");
    let err = snapshotter
        .snapshot_page(&request, &mut dest, snapshotter.default_limits())
        .unwrap_err();

    assert!(matches!(err, Error::TooManyPanels { count: 3, max: 2 }));
    assert!(!dest.latest_path().exists());
}

#[test]
fn same_root_in_two_panels_renders_twice() {
    let snapshotter = editor_snapshotter();
    let buffer = sample_buffer(1);
    let request = SnapshotRequest::new()
        .node("left", Node::from_ref(&buffer), "buffer")
        .node("right", Node::from_ref(&buffer.b_ml), "memline");

    let page = snapshotter
        .render_page(&request, snapshotter.default_limits())
        .unwrap();
    let first = page.lines().next().unwrap();
    assert!(first.contains("| buffer: 0x"));
    assert!(first.contains("| memline: 0x"));
    assert!(!page.contains(snapview::markers::CYCLE_DETECTED));
}
