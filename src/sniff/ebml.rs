//! EBML (Matroska / WebM) DocType lookup.
//!
//! EBML elements are `ID | size | payload`, where both ID and size are
//! variable-length integers (VINTs): the number of leading zero bits in the
//! first byte gives the field width minus one. IDs keep their length marker
//! bit, sizes have it cleared.

use super::cursor::Cursor;
use super::kind::FileKind;
use super::signatures::Verdict;

/// DocType element ID (marker bit included)
const DOCTYPE_ID: u64 = 0x4282;
const MAX_VINT_WIDTH: usize = 8;

pub const WEBM: FileKind = FileKind::new("webm", "video/webm");
pub const MATROSKA: FileKind = FileKind::new("mkv", "video/x-matroska");

/// A decoded variable-length integer.
///
/// Eight-byte VINTs carry at most 56 value bits, so `u64` is always wide
/// enough; narrowing to `usize` happens in [`Vint::to_usize`] and only when
/// it is lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vint {
    pub value: u64,
    pub width: usize,
}

impl Vint {
    /// All value bits set: the reserved "unknown size" encoding
    pub fn is_unknown_size(&self) -> bool {
        self.value == (1u64 << (7 * self.width)) - 1
    }

    pub fn to_usize(self) -> Option<usize> {
        usize::try_from(self.value).ok()
    }
}

/// Read one VINT at the cursor and advance past it.
///
/// With `strip_marker` the length marker bit is cleared (size fields);
/// without it the raw bytes are kept (element IDs). A zero first byte would
/// mean a width above eight and is rejected.
pub fn read_vint(cur: &mut Cursor<'_>, strip_marker: bool) -> Option<Vint> {
    let first = cur.u8(0)?;
    if first == 0 {
        return None;
    }
    let width = first.leading_zeros() as usize + 1;
    debug_assert!(width <= MAX_VINT_WIDTH);

    let raw = cur.bytes(0, width)?;
    let mut value = 0u64;
    for (i, &byte) in raw.iter().enumerate() {
        let byte = if i == 0 && strip_marker {
            byte ^ (0x80 >> (width - 1))
        } else {
            byte
        };
        value = (value << 8) | u64::from(byte);
    }
    cur.advance(width);
    Some(Vint { value, width })
}

/// Read an element header, returning `(id, payload_len)`.
///
/// Unknown sizes are clamped to whatever is left in the buffer.
fn read_element_header(cur: &mut Cursor<'_>) -> Option<(u64, usize)> {
    let id = read_vint(cur, false)?;
    let size = read_vint(cur, true)?;
    let len = if size.is_unknown_size() {
        cur.remaining()
    } else {
        size.to_usize()?
    };
    Some((id.value, len))
}

/// Find the DocType string among the children of the first top-level element.
pub fn doc_type(data: &[u8]) -> Option<&str> {
    let mut cur = Cursor::new(data);
    let (_root_id, root_len) = read_element_header(&mut cur)?;
    let end = cur.pos().saturating_add(root_len).min(cur.len());

    while cur.pos() < end {
        let (id, len) = read_element_header(&mut cur)?;
        tracing::trace!(id, len, offset = cur.pos(), "ebml child");
        if id == DOCTYPE_ID {
            return Some(cur.text(0, len));
        }
        if !cur.advance(len) {
            break;
        }
    }
    None
}

/// Unknown or missing DocTypes end detection with no match rather than
/// letting a later, unrelated signature claim the buffer.
pub fn sniff(data: &[u8]) -> Verdict {
    match doc_type(data) {
        Some("webm") => Verdict::Match(WEBM),
        Some("matroska") => Verdict::Match(MATROSKA),
        other => {
            tracing::debug!(doc_type = ?other, "unrecognised EBML DocType");
            Verdict::Stop
        }
    }
}
