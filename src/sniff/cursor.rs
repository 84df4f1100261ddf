//! Bounds-checked positional reader over a sniffing buffer.
//!
//! Every accessor fails closed: a read that would run past the end of the
//! buffer returns `None` (or an empty string for text), and the calling rule
//! treats that as "does not match". Nothing in here can panic on short input.

/// A read position over an immutable byte buffer.
///
/// Offsets passed to the accessors are relative to the current position.
/// A `Cursor` belongs to exactly one parse attempt; walkers take it by value
/// or `&mut` and never share it.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Cursor positioned at `pos`. Positions past the end are clamped.
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self {
            data,
            pos: pos.min(data.len()),
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the current position and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whole underlying buffer, independent of position
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Move forward by `n` bytes, clamping at the end of the buffer.
    /// Returns `false` if the move had to be clamped.
    pub fn advance(&mut self, n: usize) -> bool {
        match self.pos.checked_add(n) {
            Some(next) if next <= self.data.len() => {
                self.pos = next;
                true
            }
            _ => {
                self.pos = self.data.len();
                false
            }
        }
    }

    /// Jump to an absolute position, clamping at the end of the buffer.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.data.len());
    }

    /// `len` bytes starting `offset` bytes after the current position.
    pub fn bytes(&self, offset: usize, len: usize) -> Option<&'a [u8]> {
        let start = self.pos.checked_add(offset)?;
        let end = start.checked_add(len)?;
        self.data.get(start..end)
    }

    /// Everything from `offset` to the end of the buffer
    pub fn tail(&self, offset: usize) -> Option<&'a [u8]> {
        let start = self.pos.checked_add(offset)?;
        self.data.get(start..)
    }

    pub fn u8(&self, offset: usize) -> Option<u8> {
        self.bytes(offset, 1).map(|b| b[0])
    }

    pub fn u16_le(&self, offset: usize) -> Option<u16> {
        self.array::<2>(offset).map(u16::from_le_bytes)
    }

    pub fn u32_le(&self, offset: usize) -> Option<u32> {
        self.array::<4>(offset).map(u32::from_le_bytes)
    }

    pub fn u32_be(&self, offset: usize) -> Option<u32> {
        self.array::<4>(offset).map(u32::from_be_bytes)
    }

    pub fn i32_be(&self, offset: usize) -> Option<i32> {
        self.array::<4>(offset).map(i32::from_be_bytes)
    }

    pub fn u64_le(&self, offset: usize) -> Option<u64> {
        self.array::<8>(offset).map(u64::from_le_bytes)
    }

    /// Decode `len` bytes as UTF-8. Out-of-range or malformed input yields
    /// `""`, which then fails any literal comparison.
    pub fn text(&self, offset: usize, len: usize) -> &'a str {
        self.bytes(offset, len)
            .and_then(|b| std::str::from_utf8(b).ok())
            .unwrap_or("")
    }

    /// Compare `pattern` against the buffer at `offset`, optionally masking
    /// each buffer byte first: `(mask[i] & byte) == pattern[i]`.
    ///
    /// A short mask behaves as `0xFF` for the missing positions.
    pub fn matches(&self, pattern: &[u8], offset: usize, mask: Option<&[u8]>) -> bool {
        let Some(window) = self.bytes(offset, pattern.len()) else {
            return false;
        };
        match mask {
            None => window == pattern,
            Some(mask) => window
                .iter()
                .zip(pattern)
                .enumerate()
                .all(|(i, (&byte, &want))| mask.get(i).copied().unwrap_or(0xFF) & byte == want),
        }
    }

    fn array<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        self.bytes(offset, N)?.try_into().ok()
    }
}
