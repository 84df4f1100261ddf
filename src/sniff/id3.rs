//! ID3v2 tag skipping.
//!
//! Audio files frequently start with an ID3v2 tag of arbitrary length. The
//! tag is skipped and detection restarts on whatever follows it; the restart
//! itself is driven by [`Sniffer`](super::Sniffer) as a bounded loop.

use super::cursor::Cursor;
use super::kind::FileKind;
use super::signatures::Verdict;

/// "ID3" + version (2) + flags (1)
const SIZE_OFFSET: usize = 6;
const HEADER_LEN: usize = 10;

pub const MP3: FileKind = FileKind::new("mp3", "audio/mpeg");

/// Decode a synchsafe integer: four bytes with 7 significant bits each.
pub fn synchsafe(raw: u32) -> u32 {
    (raw & 0x7F) | ((raw >> 8) & 0x7F) << 7 | ((raw >> 16) & 0x7F) << 14 | ((raw >> 24) & 0x7F) << 21
}

/// Skip the tag at the start of `data`.
///
/// Returns the offset just past the tag, or an mp3 guess when the tag does
/// not fit inside the buffer.
pub fn sniff(data: &[u8]) -> Verdict {
    let cur = Cursor::new(data);
    let Some(raw) = cur.u32_be(SIZE_OFFSET) else {
        return Verdict::Match(MP3);
    };
    let end = HEADER_LEN + synchsafe(raw) as usize;
    if end > data.len() {
        tracing::debug!(tag_end = end, len = data.len(), "ID3 tag runs past buffer");
        return Verdict::Match(MP3);
    }
    Verdict::Rescan(end)
}
