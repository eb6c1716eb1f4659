//! Page layout for snapview
//!
//! Rendered node trees become [`Panel`]s, and the [`LayoutComposer`] places
//! panels side by side as boxed columns in one text page. [`HexDump`] turns a
//! raw byte region into panel lines.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compose;
pub mod hexdump;
pub mod panel;

pub use compose::{compose, LayoutComposer, LayoutOptions, DEFAULT_MAX_PANELS};
pub use hexdump::{HexDump, DEFAULT_ROW_WIDTH};
pub use panel::{Panel, BORDER_WIDTH};
