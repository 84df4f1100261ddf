//! JPEG 2000 family: the brand in the File Type box picks the member.

use super::cursor::Cursor;
use super::kind::FileKind;
use super::signatures::Verdict;

/// Signature box (12 bytes) + File Type box length and type (8 bytes)
const BRAND_OFFSET: usize = 20;

const BRANDS: &[(&str, FileKind)] = &[
    ("jp2 ", FileKind::new("jp2", "image/jp2")),
    ("jpx ", FileKind::new("jpx", "image/jpx")),
    ("jpm ", FileKind::new("jpm", "image/jpm")),
    ("mjp2", FileKind::new("mj2", "image/mj2")),
];

/// An unknown brand behind a valid signature box is a terminal no-match.
pub fn sniff(data: &[u8]) -> Verdict {
    let brand = Cursor::new(data).text(BRAND_OFFSET, 4);
    match BRANDS.iter().find(|(b, _)| *b == brand) {
        Some(&(_, kind)) => Verdict::Match(kind),
        None => {
            tracing::debug!(brand, "unknown JPEG 2000 brand");
            Verdict::Stop
        }
    }
}
