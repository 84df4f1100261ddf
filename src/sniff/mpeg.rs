//! MPEG audio frame sync classifier (ADTS AAC and MPEG-1/2 layers I-III).
//!
//! An 11-bit sync word has a real false-positive rate on arbitrary binary
//! data, so this rule sits at the very end of the weak tier.

use super::cursor::Cursor;
use super::kind::FileKind;
use super::signatures::Verdict;

/// `11111111 111xxxxx`
pub const SYNC: &[u8] = &[0xFF, 0xE0];
pub const SYNC_MASK: &[u8] = &[0xFF, 0xE0];

pub const AAC: FileKind = FileKind::new("aac", "audio/aac");
pub const MP3: FileKind = FileKind::new("mp3", "audio/mpeg");
pub const MP2: FileKind = FileKind::new("mp2", "audio/mpeg");
pub const MP1: FileKind = FileKind::new("mp1", "audio/mpeg");

/// Classify by the layer bits of the second header byte. Layer `00` with the
/// version bit set is ADTS (MPEG-2 or MPEG-4 AAC).
pub fn sniff(data: &[u8]) -> Verdict {
    let cur = Cursor::new(data);
    if !cur.matches(SYNC, 0, Some(SYNC_MASK)) {
        return Verdict::Pass;
    }

    let layer = |want: u8| cur.matches(&[want], 1, Some(&[0x06]));
    if cur.matches(&[0x10], 1, Some(&[0x16])) {
        Verdict::Match(AAC)
    } else if layer(0x02) {
        Verdict::Match(MP3)
    } else if layer(0x04) {
        Verdict::Match(MP2)
    } else if layer(0x06) {
        Verdict::Match(MP1)
    } else {
        Verdict::Pass
    }
}
