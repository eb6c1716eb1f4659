//! Raw byte captures next to snapshots

use crate::common::*;
use snapview::RawCapture;
use std::fs;

#[test]
fn terminal_captures_are_numbered() {
    let tmp = TempDir::new().unwrap();
    let mut capture = RawCapture::new(tmp.path().join("keilog"), "tty-dump");

    let first = capture.write(b"\x1b[2J\x1b[Hhello").unwrap();
    let second = capture
        .write_chunks(&[&b"line one\r\n"[..], &b"line two\r\n"[..]])
        .unwrap();

    assert_eq!(first, tmp.path().join("keilog").join("tty-dump-0000.txt"));
    assert_eq!(second, tmp.path().join("keilog").join("tty-dump-0001.txt"));
    assert_eq!(fs::read(&first).unwrap(), b"\x1b[2J\x1b[Hhello");
    assert_eq!(fs::read(&second).unwrap(), b"line one\r\nline two\r\n");
    assert_eq!(capture.next_index(), 2);
}

#[test]
fn capture_and_snapshot_share_a_directory() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("keilog");
    let snapshotter = editor_snapshotter();
    let limits = *snapshotter.default_limits();

    let buffer = sample_buffer(1);
    let mut dest = SnapshotDestination::append_history(&dir, "buffer");
    snapshotter
        .snapshot(Node::from_ref(&buffer), &"buffer".into(), &mut dest, &limits)
        .unwrap();
    RawCapture::new(&dir, "tty-dump").write(&buffer.b_ml.ml_line_ptr).unwrap();

    let mut names: Vec<String> = fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["buffer.log", "buffer_hist.log", "tty-dump-0000.txt"]);
}

#[test]
fn block_data_hex_dumps_get_one_file_each() {
    let tmp = TempDir::new().unwrap();
    let buffer = sample_buffer(2);
    let mut pages = RawCapture::new(tmp.path(), "page_data");
    let dump = HexDump::new().with_base_address(0);

    let mut block = buffer
        .b_ml
        .ml_mfp
        .as_ref()
        .and_then(|mf| mf.mf_used_first.clone());
    let mut written = Vec::new();
    while let Some(current) = block {
        written.push(pages.write_lines(dump.lines(&current.bh_data[..16])).unwrap());
        block = current.bh_next.borrow().clone();
    }

    assert_eq!(written.len(), 2);
    assert_eq!(written[1], tmp.path().join("page_data-0001.txt"));
    let first = fs::read_to_string(&written[0]).unwrap();
    assert!(first.starts_with("0x00000000: 6c 69 6e 65 00"));
    assert!(first.ends_with('\n'));
}
