//! Value types for snapview
//!
//! This module defines:
//! - Value: the tagged union every field accessor produces
//! - BoundedStr: captured text with an optional display width
//! - FlagSet: a bit mask paired with its ordered bit names
//!
//! ## Capture Model
//!
//! A `Value` is copied out of the live object at traversal time. The snapshot
//! owns it; nothing inside a `Value` borrows from the inspected structure, so
//! the live object may change the moment the accessor returns.
//!
//! ## Raw Text
//!
//! Text captured from raw memory (`from_nul_terminated`) is never scanned past
//! the end of the given slice, the first NUL byte, or [`MAX_STRING_SCAN`]
//! bytes, whichever comes first.

use std::borrow::Cow;

/// Hard upper bound on bytes scanned when capturing NUL-terminated text.
pub const MAX_STRING_SCAN: usize = 4096;

/// A single captured field value
///
/// Integers keep their source width so the renderer never has to guess a
/// format from a loosely typed argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// 8-bit signed integer
    I8(i8),
    /// 16-bit signed integer
    I16(i16),
    /// 32-bit signed integer
    I32(i32),
    /// 64-bit signed integer
    I64(i64),
    /// 8-bit unsigned integer
    U8(u8),
    /// 16-bit unsigned integer
    U16(u16),
    /// 32-bit unsigned integer
    U32(u32),
    /// 64-bit unsigned integer
    U64(u64),
    /// Opaque pointer or handle; zero means null
    Handle(u64),
    /// Boolean value
    Bool(bool),
    /// Bounded string
    Str(BoundedStr),
    /// Enumerated label
    Enum(Cow<'static, str>),
    /// Bit flag set
    Flags(FlagSet),
}

impl Value {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::I8(_) => "I8",
            Value::I16(_) => "I16",
            Value::I32(_) => "I32",
            Value::I64(_) => "I64",
            Value::U8(_) => "U8",
            Value::U16(_) => "U16",
            Value::U32(_) => "U32",
            Value::U64(_) => "U64",
            Value::Handle(_) => "Handle",
            Value::Bool(_) => "Bool",
            Value::Str(_) => "Str",
            Value::Enum(_) => "Enum",
            Value::Flags(_) => "Flags",
        }
    }

    /// Check if this is any integer variant
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Value::I8(_)
                | Value::I16(_)
                | Value::I32(_)
                | Value::I64(_)
                | Value::U8(_)
                | Value::U16(_)
                | Value::U32(_)
                | Value::U64(_)
        )
    }

    /// Check if this is a null handle
    pub fn is_null_handle(&self) -> bool {
        matches!(self, Value::Handle(0))
    }

    /// Unbounded string value
    pub fn str(text: impl Into<String>) -> Self {
        Value::Str(BoundedStr::new(text))
    }

    /// String value that never displays more than `max_display` chars
    pub fn str_max(text: impl Into<String>, max_display: usize) -> Self {
        Value::Str(BoundedStr::new(text).with_max_display(max_display))
    }

    /// Capture C-style text from a raw byte region
    ///
    /// Stops at the first NUL, the end of `bytes`, or [`MAX_STRING_SCAN`]
    /// bytes. Invalid UTF-8 is replaced rather than rejected.
    pub fn from_nul_terminated(bytes: &[u8]) -> Self {
        Value::Str(BoundedStr::from_nul_terminated(bytes))
    }

    /// Opaque handle from a raw address
    pub fn handle(addr: u64) -> Self {
        Value::Handle(addr)
    }

    /// Address of a live object, captured without dereferencing it
    pub fn handle_of<T: ?Sized>(target: &T) -> Self {
        Value::Handle(target as *const T as *const () as usize as u64)
    }

    /// Address of a raw pointer; a null pointer becomes a null handle
    pub fn handle_of_ptr<T>(ptr: *const T) -> Self {
        Value::Handle(ptr as usize as u64)
    }

    /// Handle for an optional reference, null when absent
    pub fn handle_of_opt<T>(target: Option<&T>) -> Self {
        target.map_or(Value::Handle(0), Value::handle_of)
    }

    /// Enumerated label
    pub fn label(label: impl Into<Cow<'static, str>>) -> Self {
        Value::Enum(label.into())
    }

    /// Map a raw discriminant through a `(raw, label)` table
    ///
    /// Discriminants missing from the table render as `unknown(<raw>)`.
    pub fn enum_of(raw: i64, table: &[(i64, &'static str)]) -> Self {
        match table.iter().find(|(value, _)| *value == raw) {
            Some((_, label)) => Value::Enum(Cow::Borrowed(label)),
            None => Value::Enum(Cow::Owned(format!("unknown({})", raw))),
        }
    }

    /// Bit flag set with names for bit 0, bit 1, ...
    pub fn flags(value: u64, names: &'static [&'static str]) -> Self {
        Value::Flags(FlagSet::new(value, names))
    }
}

/// Captured text with an optional maximum display length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedStr {
    text: String,
    max_display: Option<usize>,
}

impl BoundedStr {
    /// Create an unbounded string
    pub fn new(text: impl Into<String>) -> Self {
        BoundedStr {
            text: text.into(),
            max_display: None,
        }
    }

    /// Limit the displayed length to `max_display` chars
    pub fn with_max_display(mut self, max_display: usize) -> Self {
        self.max_display = Some(max_display);
        self
    }

    /// Capture NUL-terminated text from a byte region
    pub fn from_nul_terminated(bytes: &[u8]) -> Self {
        let window = &bytes[..bytes.len().min(MAX_STRING_SCAN)];
        let end = window.iter().position(|&b| b == 0).unwrap_or(window.len());
        BoundedStr::new(String::from_utf8_lossy(&window[..end]).into_owned())
    }

    /// The captured text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The value's own display limit, if any
    pub fn max_display(&self) -> Option<usize> {
        self.max_display
    }
}

/// A bit mask with the names of its bits, lowest bit first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSet {
    value: u64,
    names: &'static [&'static str],
}

impl FlagSet {
    /// Create a flag set; `names[i]` names bit `i`
    pub fn new(value: u64, names: &'static [&'static str]) -> Self {
        FlagSet { value, names }
    }

    /// The raw mask
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Names supplied by the descriptor
    pub fn names(&self) -> &'static [&'static str] {
        self.names
    }

    /// Names of the set bits, lowest bit first
    ///
    /// Bits without a supplied name are reported as `bit<N>`.
    pub fn set_names(&self) -> Vec<Cow<'static, str>> {
        (0..u64::BITS)
            .filter(|bit| self.value & (1u64 << bit) != 0)
            .map(|bit| match self.names.get(bit as usize) {
                Some(name) => Cow::Borrowed(*name),
                None => Cow::Owned(format!("bit{}", bit)),
            })
            .collect()
    }
}

// ============================================================================
// From implementations for ergonomic accessor closures
// ============================================================================

macro_rules! impl_from_int {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_int!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
);

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::U64(v as u64)
    }
}

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::I64(v as i64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::str(s)
    }
}

impl From<BoundedStr> for Value {
    fn from(s: BoundedStr) -> Self {
        Value::Str(s)
    }
}

impl From<FlagSet> for Value {
    fn from(f: FlagSet) -> Self {
        Value::Flags(f)
    }
}
