//! ASF (Windows Media) header object walker.
//!
//! The ASF header object is a GUID-keyed tree of `GUID | u64 size | payload`
//! objects. The stream type GUID inside the first Stream Properties object
//! says whether the container holds audio or video.

use super::cursor::Cursor;
use super::kind::FileKind;
use super::signatures::Verdict;

/// Header object GUID prefix shared with the rule table
pub const HEADER_GUID_PREFIX: &[u8] = &[0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11, 0xA6, 0xD9];

/// B7DC0791-A9B7-11CF-8EE6-00C00C205365
const STREAM_PROPERTIES: [u8; 16] = [
    0x91, 0x07, 0xDC, 0xB7, 0xB7, 0xA9, 0xCF, 0x11, 0x8E, 0xE6, 0x00, 0xC0, 0x0C, 0x20, 0x53, 0x65,
];
/// F8699E40-5B4D-11CF-A8FD-00805F5C442B
const AUDIO_MEDIA: [u8; 16] = [
    0x40, 0x9E, 0x69, 0xF8, 0x4D, 0x5B, 0xCF, 0x11, 0xA8, 0xFD, 0x00, 0x80, 0x5F, 0x5C, 0x44, 0x2B,
];
/// BC19EFC0-5B4D-11CF-A8FD-00805F5C442B
const VIDEO_MEDIA: [u8; 16] = [
    0xC0, 0xEF, 0x19, 0xBC, 0x4D, 0x5B, 0xCF, 0x11, 0xA8, 0xFD, 0x00, 0x80, 0x5F, 0x5C, 0x44, 0x2B,
];

/// GUID + u64 size
const OBJECT_HEADER_LEN: usize = 24;
/// Header object: object header + u32 object count + two reserved bytes
const HEADER_OBJECT_PREFIX: usize = 30;

pub const ASF: FileKind = FileKind::new("asf", "application/vnd.ms-asf");
pub const ASF_AUDIO: FileKind = FileKind::new("asf", "audio/x-ms-asf");
pub const ASF_VIDEO: FileKind = FileKind::new("asf", "video/x-ms-asf");

pub fn sniff(data: &[u8]) -> Verdict {
    Verdict::Match(classify(data).unwrap_or(ASF))
}

fn classify(data: &[u8]) -> Option<FileKind> {
    let header = Cursor::new(data);
    let declared = usize::try_from(header.u64_le(16)?).unwrap_or(usize::MAX);
    let end = declared.min(data.len());

    let mut cur = Cursor::at(data, HEADER_OBJECT_PREFIX);
    while cur.pos() + OBJECT_HEADER_LEN < end {
        let guid = cur.bytes(0, 16)?;
        let size = usize::try_from(cur.u64_le(16)?).ok()?;
        if size < OBJECT_HEADER_LEN {
            tracing::debug!(size, offset = cur.pos(), "ASF object smaller than its header");
            return None;
        }

        if guid == STREAM_PROPERTIES {
            let stream_type = cur.bytes(OBJECT_HEADER_LEN, 16)?;
            return if stream_type == AUDIO_MEDIA {
                Some(ASF_AUDIO)
            } else if stream_type == VIDEO_MEDIA {
                Some(ASF_VIDEO)
            } else {
                None
            };
        }

        if !cur.advance(size) {
            return None;
        }
    }
    None
}
