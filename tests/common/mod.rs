//! Shared fixtures for the integration test suites.
//!
//! Models the kind of graph snapview was built to inspect: an editor buffer
//! with its line index, paged memory file and linked block headers, plus a
//! stack of modal editing states of different types.
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

pub use snapview::{
    Children, DescriptorId, DescriptorRegistry, Error, HexDump, Node, NodeDescriptor,
    SnapshotDestination, SnapshotMode, SnapshotRequest, Snapshotter, SnapviewConfig,
    TraversalLimits, Value,
};
pub use tempfile::TempDir;

// ============================================================================
// Flag and enum tables
// ============================================================================

pub const ML_FLAGS: &[&str] = &["ML_EMPTY", "ML_LINE_DIRTY", "ML_LOCKED_DIRTY", "ML_LOCKED_POS"];
pub const BH_FLAGS: &[&str] = &["BH_DIRTY", "BH_LOCKED"];
pub const HIST_TYPES: &[(i64, &str)] = &[(0, "cmd"), (1, "search"), (2, "expr"), (3, "input")];

// ============================================================================
// Buffer / storage graph
// ============================================================================

pub struct DataBlock {
    pub db_id: u16,
    pub db_free: u32,
    pub db_txt_start: u32,
    pub db_txt_end: u32,
    pub db_index: Vec<u32>,
}

pub struct BlockHeader {
    pub bh_bnum: i64,
    pub bh_page_count: u32,
    pub bh_flags: u64,
    pub bh_data: Vec<u8>,
    pub block: DataBlock,
    pub bh_next: RefCell<Option<Rc<BlockHeader>>>,
}

pub struct MemFile {
    pub mf_page_size: u32,
    pub mf_used_first: Option<Rc<BlockHeader>>,
    pub mf_used_last: Option<Rc<BlockHeader>>,
}

pub struct InfoPtr {
    pub ip_bnum: i64,
    pub ip_low: i64,
    pub ip_high: i64,
    pub ip_index: i32,
}

pub struct MemLine {
    pub ml_line_count: i64,
    pub ml_line_lnum: i64,
    pub ml_flags: u64,
    pub ml_stack: Vec<InfoPtr>,
    pub ml_line_ptr: Vec<u8>,
    pub ml_mfp: Option<MemFile>,
}

pub struct Buffer {
    pub handle: i32,
    pub b_ffname: Option<String>,
    pub b_changed: bool,
    pub b_ml: MemLine,
}

/// Build a block chain of `count` headers, first to last
pub fn block_chain(count: usize) -> Vec<Rc<BlockHeader>> {
    let mut next: Option<Rc<BlockHeader>> = None;
    let mut chain = Vec::with_capacity(count);
    for i in (0..count).rev() {
        let mut data = vec![0u8; 64];
        data[..5].copy_from_slice(b"line\0");
        let bh = Rc::new(BlockHeader {
            bh_bnum: i as i64 + 1,
            bh_page_count: 1,
            bh_flags: if i % 2 == 0 { 0b01 } else { 0b11 },
            bh_data: data,
            block: DataBlock {
                db_id: 0x6444,
                db_free: 4000 - i as u32,
                db_txt_start: 96,
                db_txt_end: 4096,
                db_index: (0..=i as u32).map(|n| 4096 - 8 * (n + 1)).collect(),
            },
            bh_next: RefCell::new(next.take()),
        });
        chain.push(Rc::clone(&bh));
        next = Some(bh);
    }
    chain.reverse();
    chain
}

/// A buffer whose memfile holds `blocks` linked block headers
pub fn sample_buffer(blocks: usize) -> Buffer {
    let chain = block_chain(blocks);
    Buffer {
        handle: 1,
        b_ffname: Some("/home/user/notes.txt".to_string()),
        b_changed: true,
        b_ml: MemLine {
            ml_line_count: 3,
            ml_line_lnum: 2,
            ml_flags: 0b0110,
            ml_stack: vec![
                InfoPtr {
                    ip_bnum: 1,
                    ip_low: 1,
                    ip_high: 3,
                    ip_index: 0,
                },
                InfoPtr {
                    ip_bnum: 2,
                    ip_low: 1,
                    ip_high: 2,
                    ip_index: 1,
                },
            ],
            ml_line_ptr: b"hello world\0garbage after the terminator".to_vec(),
            ml_mfp: Some(MemFile {
                mf_page_size: 4096,
                mf_used_first: chain.first().cloned(),
                mf_used_last: chain.last().cloned(),
            }),
        },
    }
}

/// Point the last block back at the first
pub fn close_block_loop(buffer: &Buffer) {
    if let Some(mf) = &buffer.b_ml.ml_mfp {
        if let (Some(first), Some(last)) = (&mf.mf_used_first, &mf.mf_used_last) {
            *last.bh_next.borrow_mut() = Some(Rc::clone(first));
        }
    }
}

/// Undo `close_block_loop` so the chain can be dropped
pub fn open_block_loop(buffer: &Buffer) {
    if let Some(mf) = &buffer.b_ml.ml_mfp {
        if let Some(last) = &mf.mf_used_last {
            last.bh_next.borrow_mut().take();
        }
    }
}

// ============================================================================
// Modal editing states
// ============================================================================

pub struct Pos {
    pub lnum: i64,
    pub col: i32,
}

pub struct NormalState {
    pub command_finished: bool,
    pub ctrl_w: bool,
    pub count: i64,
    pub old_pos: Pos,
}

pub struct InsertState {
    pub did_backspace: bool,
    pub cmdchar: i32,
    pub count: i64,
}

pub struct CmdlineState {
    pub firstc: i32,
    pub hiscnt: i32,
    pub histype: i64,
}

pub struct StateStack {
    pub states: Vec<Rc<dyn Any>>,
}

pub fn sample_states() -> StateStack {
    StateStack {
        states: vec![
            Rc::new(NormalState {
                command_finished: false,
                ctrl_w: true,
                count: 4,
                old_pos: Pos { lnum: 12, col: 3 },
            }),
            Rc::new(InsertState {
                did_backspace: true,
                cmdchar: 'i' as i32,
                count: 1,
            }),
            Rc::new(CmdlineState {
                firstc: ':' as i32,
                hiscnt: 2,
                histype: 1,
            }),
        ],
    }
}

// ============================================================================
// Descriptors
// ============================================================================

/// Register every descriptor of the editor fixture
pub fn register_editor(registry: &mut DescriptorRegistry) -> snapview::Result<()> {
    // Registered parent-first; references resolve at validation time
    registry.register(
        NodeDescriptor::builder::<Buffer>("buffer")
            .field("handle", |b| b.handle)
            .try_field("b_ffname", |b| b.b_ffname.clone().map(Value::from))
            .field("b_changed", |b| b.b_changed)
            .nested("b_ml", "memline", |b| Some(Node::from_ref(&b.b_ml)))
            .build()?,
    )?;
    registry.register(
        NodeDescriptor::builder::<MemLine>("memline")
            .field("ml_line_ct", |ml| ml.ml_line_count)
            .field("ml_line_lnum", |ml| ml.ml_line_lnum)
            .field("ml_flags", |ml| Value::flags(ml.ml_flags, ML_FLAGS))
            .field("ml_stack_top", |ml| ml.ml_stack.len())
            .field("ml_line_ptr", |ml| Value::from_nul_terminated(&ml.ml_line_ptr))
            .list("ml_stack", "infoptr", |ml| Children::slice(&ml.ml_stack))
            .nested("ml_mfp", "memfile", |ml| ml.ml_mfp.as_ref().map(Node::from_ref))
            .build()?,
    )?;
    registry.register(
        NodeDescriptor::builder::<InfoPtr>("infoptr")
            .field("ip_bnum", |ip| ip.ip_bnum)
            .field("ip_low", |ip| ip.ip_low)
            .field("ip_high", |ip| ip.ip_high)
            .field("ip_index", |ip| ip.ip_index)
            .build()?,
    )?;
    registry.register(
        NodeDescriptor::builder::<MemFile>("memfile")
            .field("mf_page_size", |mf| mf.mf_page_size)
            .field("mf_used_first", |mf| {
                Value::handle_of_opt(mf.mf_used_first.as_deref())
            })
            .list("mf_used", "block_header", |mf| {
                Children::linked(mf.mf_used_first.clone(), |bh: &BlockHeader| {
                    bh.bh_next.borrow().clone()
                })
            })
            .nested("mf_used_last", "block_header", |mf| {
                mf.mf_used_last.clone().map(Node::from_rc)
            })
            .build()?,
    )?;
    registry.register(
        NodeDescriptor::builder::<BlockHeader>("block_header")
            .field("bh_bnum", |bh| bh.bh_bnum)
            .field("bh_page_count", |bh| bh.bh_page_count)
            .field("bh_flags", |bh| Value::flags(bh.bh_flags, BH_FLAGS))
            .field("bh_data", |bh| Value::handle_of(bh.bh_data.as_slice()))
            .nested("bh_block", "data_block", |bh| Some(Node::from_ref(&bh.block)))
            .nested("bh_next", "block_header", |bh| {
                bh.bh_next.borrow().clone().map(Node::from_rc)
            })
            .build()?,
    )?;
    registry.register(
        NodeDescriptor::builder::<DataBlock>("data_block")
            .field("db_id", |db| db.db_id)
            .field("db_free", |db| db.db_free)
            .field("db_txt_start", |db| db.db_txt_start)
            .field("db_txt_end", |db| db.db_txt_end)
            .field("db_line_count", |db| db.db_index.len())
            .list("db_index", "u32", |db| Children::slice(&db.db_index))
            .build()?,
    )?;
    registry.register(
        NodeDescriptor::builder::<u32>("u32")
            .field("value", |v| *v)
            .build()?,
    )?;
    Ok(())
}

/// Register the modal state descriptors
pub fn register_states(registry: &mut DescriptorRegistry) -> snapview::Result<()> {
    registry.register(
        NodeDescriptor::builder::<Pos>("pos")
            .field("lnum", |p| p.lnum)
            .field("col", |p| p.col)
            .build()?,
    )?;
    registry.register(
        NodeDescriptor::builder::<NormalState>("normal_state")
            .field("command_finished", |s| s.command_finished)
            .field("ctrl_w", |s| s.ctrl_w)
            .field("count", |s| s.count)
            .nested("old_pos", "pos", |s| Some(Node::from_ref(&s.old_pos)))
            .build()?,
    )?;
    registry.register(
        NodeDescriptor::builder::<InsertState>("insert_state")
            .field("did_backspace", |s| s.did_backspace)
            .field("cmdchar", |s| s.cmdchar)
            .field("count", |s| s.count)
            .build()?,
    )?;
    registry.register(
        NodeDescriptor::builder::<CmdlineState>("cmdline_state")
            .field("firstc", |s| s.firstc)
            .field("hiscnt", |s| s.hiscnt)
            .field("histype", |s| Value::enum_of(s.histype, HIST_TYPES))
            .build()?,
    )?;
    registry.register(
        NodeDescriptor::builder::<StateStack>("state_stack")
            .list_dynamic("states", |st| {
                Children::exact(st.states.iter().map(|s| Node::Rc(Rc::clone(s))))
            })
            .build()?,
    )?;
    Ok(())
}

/// Registry with the editor and modal state descriptors
pub fn editor_registry() -> Arc<DescriptorRegistry> {
    let mut registry = DescriptorRegistry::new();
    register_editor(&mut registry).unwrap();
    register_states(&mut registry).unwrap();
    Arc::new(registry)
}

/// Snapshotter over `editor_registry` with default config
pub fn editor_snapshotter() -> Snapshotter {
    Snapshotter::new(editor_registry(), SnapviewConfig::default()).unwrap()
}

/// Lines of a page that mention `needle`
pub fn lines_with<'a>(page: &'a str, needle: &str) -> Vec<&'a str> {
    page.lines().filter(|l| l.contains(needle)).collect()
}

/// A field line as rendered with the default header width and indent step
pub fn field_line(level: usize, label: &str, value: &str) -> String {
    let pad = 20usize.saturating_sub(label.chars().count() + 1).max(1);
    format!("{}{}:{}{}", "  ".repeat(level), label, " ".repeat(pad), value)
}

/// Text of a single-panel page row without its border and padding
pub fn cell_text(row: &str) -> &str {
    row.strip_prefix("| ")
        .and_then(|r| r.strip_suffix(" |"))
        .map(str::trim_end)
        .unwrap_or(row)
}
