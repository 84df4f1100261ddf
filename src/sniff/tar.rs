//! POSIX/ustar header checksum validation.
//!
//! TAR has no reliable magic (pre-POSIX archives lack `ustar`), so the header
//! checksum is the signal: the byte sum of the 512-byte header, with the
//! checksum field itself counted as eight spaces, must equal the octal value
//! stored in that field.

use std::ops::Range;

use super::kind::FileKind;
use super::signatures::Verdict;

const BLOCK_LEN: usize = 512;
const CHECKSUM_FIELD: Range<usize> = 148..156;

pub const TAR: FileKind = FileKind::new("tar", "application/x-tar");

/// Parse the checksum field: octal digits, optionally surrounded by spaces
/// and terminated by NULs/spaces.
pub fn parse_checksum(field: &[u8]) -> Option<u32> {
    let text = std::str::from_utf8(field).ok()?;
    let digits = text
        .trim_end_matches(|c| c == '\0' || c == ' ')
        .trim_start_matches(' ');
    if digits.is_empty() || !digits.bytes().all(|b| matches!(b, b'0'..=b'7')) {
        return None;
    }
    u32::from_str_radix(digits, 8).ok()
}

/// Byte sum of the header with the checksum field read as spaces
pub fn header_sum(block: &[u8]) -> u32 {
    block
        .iter()
        .enumerate()
        .map(|(i, &b)| {
            if CHECKSUM_FIELD.contains(&i) {
                u32::from(b' ')
            } else {
                u32::from(b)
            }
        })
        .sum()
}

pub fn sniff(data: &[u8]) -> Verdict {
    let Some(block) = data.get(..BLOCK_LEN) else {
        return Verdict::Pass;
    };
    match parse_checksum(&block[CHECKSUM_FIELD]) {
        Some(stored) if stored == header_sum(block) => Verdict::Match(TAR),
        _ => Verdict::Pass,
    }
}
