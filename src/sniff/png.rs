//! PNG chunk walker, used to tell APNG from plain PNG.
//!
//! An APNG carries an `acTL` chunk before its first `IDAT`.

use super::cursor::Cursor;
use super::kind::FileKind;
use super::signatures::Verdict;

pub const MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const SIGNATURE_LEN: usize = MAGIC.len();

pub const PNG: FileKind = FileKind::new("png", "image/png");
pub const APNG: FileKind = FileKind::new("apng", "image/apng");

pub fn sniff(data: &[u8]) -> Verdict {
    let mut cur = Cursor::at(data, SIGNATURE_LEN);

    while cur.remaining() >= 8 {
        let (Some(length), Some(chunk_type)) = (cur.i32_be(0), cur.bytes(4, 4)) else {
            break;
        };
        if length < 0 {
            tracing::debug!(length, offset = cur.pos(), "negative PNG chunk length");
            return Verdict::Stop;
        }

        match chunk_type {
            b"IDAT" => return Verdict::Match(PNG),
            b"acTL" => return Verdict::Match(APNG),
            _ => {}
        }

        // header + payload + CRC
        if !cur.advance(8 + length as usize + 4) {
            break;
        }
    }

    Verdict::Match(PNG)
}
