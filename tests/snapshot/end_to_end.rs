//! End-to-end snapshot tests
//!
//! Register, traverse, compose and write, then read the files back.

use crate::common::*;
use std::fs;
use std::sync::Arc;

const ABC: &[&str] = &["A", "B", "C"];

struct Record {
    id: i32,
    flags: u32,
}

fn record_snapshotter() -> Snapshotter {
    let mut registry = DescriptorRegistry::new();
    registry
        .register(
            NodeDescriptor::builder::<Record>("record")
                .field("id", |r| r.id)
                .field("flags", |r| Value::flags(r.flags as u64, ABC))
                .build()
                .unwrap(),
        )
        .unwrap();
    Snapshotter::new(Arc::new(registry), SnapviewConfig::default()).unwrap()
}

// ============================================================================
// Overwrite mode
// ============================================================================

#[test]
fn record_snapshot_overwrites_latest_file() {
    let tmp = TempDir::new().unwrap();
    let snapshotter = record_snapshotter();
    let limits = *snapshotter.default_limits();
    let mut dest = SnapshotDestination::overwrite(tmp.path(), "record");

    let record = Record { id: 42, flags: 5 };
    let path = snapshotter
        .snapshot(Node::from_ref(&record), &"record".into(), &mut dest, &limits)
        .unwrap();

    assert_eq!(path, tmp.path().join("record.log"));
    let page = fs::read_to_string(&path).unwrap();
    let rows: Vec<&str> = page.lines().collect();

    // header, two fields, closing rule
    assert_eq!(rows.len(), 4);
    assert!(rows[0].starts_with("| record: 0x"));
    assert_eq!(cell_text(rows[1]), field_line(1, "id", "42"));
    assert_eq!(cell_text(rows[2]), field_line(1, "flags", "5 = A C"));
    assert!(rows[3].chars().all(|c| c == '-'));
    assert_eq!(rows[3].len(), rows[0].len());

    assert!(!dest.history_path().exists());
}

#[test]
fn overwrite_keeps_only_the_last_page() {
    let tmp = TempDir::new().unwrap();
    let snapshotter = record_snapshotter();
    let limits = *snapshotter.default_limits();
    let mut dest = SnapshotDestination::overwrite(tmp.path(), "record");

    for id in [1, 2, 3] {
        let record = Record { id, flags: 0 };
        snapshotter
            .snapshot(Node::from_ref(&record), &"record".into(), &mut dest, &limits)
            .unwrap();
    }

    let page = fs::read_to_string(dest.latest_path()).unwrap();
    assert!(page.contains(&field_line(1, "id", "3")));
    assert!(!page.contains(&field_line(1, "id", "1")));
    assert!(page.contains(&field_line(1, "flags", "0")));
    assert_eq!(dest.sequence(), 3);
}

// ============================================================================
// Append-history mode
// ============================================================================

#[test]
fn append_history_records_every_page() {
    let tmp = TempDir::new().unwrap();
    let snapshotter = record_snapshotter();
    let limits = *snapshotter.default_limits();
    let mut dest = SnapshotDestination::append_history(tmp.path().join("keilog"), "record");

    let first = Record { id: 7, flags: 1 };
    let second = Record { id: 8, flags: 6 };
    snapshotter
        .snapshot(Node::from_ref(&first), &"record".into(), &mut dest, &limits)
        .unwrap();
    snapshotter
        .snapshot(Node::from_ref(&second), &"record".into(), &mut dest, &limits)
        .unwrap();

    let latest = fs::read_to_string(dest.latest_path()).unwrap();
    assert!(latest.contains(&field_line(1, "id", "8")));
    assert!(latest.contains(&field_line(1, "flags", "6 = B C")));
    assert!(!latest.contains(&field_line(1, "id", "7")));

    let history = fs::read_to_string(dest.history_path()).unwrap();
    let tags: Vec<&str> = history.lines().filter(|l| l.starts_with("# ")).collect();
    assert_eq!(tags, vec!["# 0", "# 1"]);
    assert!(history.starts_with("# 0\n"));

    let second_start = history.find("# 1\n").unwrap();
    assert!(history[..second_start].contains(&field_line(1, "id", "7")));
    assert!(history[second_start..].contains(&field_line(1, "id", "8")));
    assert!(history[second_start..].ends_with(&format!("{}\n", latest)));
}

#[test]
fn fresh_destination_starts_history_over() {
    let tmp = TempDir::new().unwrap();
    let snapshotter = record_snapshotter();
    let limits = *snapshotter.default_limits();

    for _ in 0..2 {
        let mut dest = SnapshotDestination::append_history(tmp.path(), "record");
        let record = Record { id: 1, flags: 0 };
        snapshotter
            .snapshot(Node::from_ref(&record), &"record".into(), &mut dest, &limits)
            .unwrap();
    }

    let history = fs::read_to_string(tmp.path().join("record_hist.log")).unwrap();
    assert_eq!(history.matches("# 0\n").count(), 1);
    assert!(!history.contains("# 1\n"));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn unwritable_destination_reports_cannot_open() {
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("taken");
    fs::write(&blocker, b"not a directory").unwrap();

    let snapshotter = record_snapshotter();
    let limits = *snapshotter.default_limits();
    let mut dest = SnapshotDestination::overwrite(blocker.join("sub"), "record");
    let record = Record { id: 1, flags: 0 };

    let err = snapshotter
        .snapshot(Node::from_ref(&record), &"record".into(), &mut dest, &limits)
        .unwrap_err();
    assert_eq!(err.io_reason(), Some(snapview::IoReason::CannotOpen));
    assert_eq!(dest.sequence(), 0);
}

#[test]
fn unknown_root_descriptor_is_a_setup_error() {
    let snapshotter = record_snapshotter();
    let limits = *snapshotter.default_limits();
    let record = Record { id: 1, flags: 0 };

    let err = snapshotter
        .render(Node::from_ref(&record), &"recrod".into(), &limits)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownDescriptor { .. }));
}

#[test]
fn wrong_root_type_renders_marker() {
    let snapshotter = record_snapshotter();
    let limits = *snapshotter.default_limits();
    let not_a_record = 17u8;

    let page = snapshotter
        .render(Node::from_ref(&not_a_record), &"record".into(), &limits)
        .unwrap();
    assert!(page.contains(snapview::markers::TYPE_MISMATCH));
}
