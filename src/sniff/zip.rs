//! ZIP local-header walker.
//!
//! Distinguishes the ZIP-based formats (OOXML, OpenDocument, EPUB, XPI, 3MF)
//! by looking at entry names, and for OpenDocument/EPUB at the stored
//! `mimetype` entry. Only local file headers are read; the central directory
//! is usually outside the sniffed prefix anyway.

use std::sync::OnceLock;

use regex::Regex;

use super::cursor::Cursor;
use super::kind::FileKind;
use super::signatures::Verdict;

/// `PK\x03\x04`
const LOCAL_HEADER_SIG: u32 = 0x504B_0304;
const LOCAL_HEADER_LEN: usize = 30;

pub const ZIP: FileKind = FileKind::new("zip", "application/zip");
pub const XPI: FileKind = FileKind::new("xpi", "application/x-xpinstall");
pub const DOCX: FileKind = FileKind::new(
    "docx",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
);
pub const PPTX: FileKind = FileKind::new(
    "pptx",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
);
pub const XLSX: FileKind = FileKind::new(
    "xlsx",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
);
pub const THREE_MF: FileKind = FileKind::new("3mf", "model/3mf");

/// Known `mimetype` entry payloads and the extension each one implies
const STORED_MIMETYPES: &[(&str, &str)] = &[
    ("application/epub+zip", "epub"),
    ("application/vnd.oasis.opendocument.text", "odt"),
    ("application/vnd.oasis.opendocument.spreadsheet", "ods"),
    ("application/vnd.oasis.opendocument.presentation", "odp"),
];

fn model_path() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^3D/.+\.model$").expect("static regex"))
}

/// One parsed local file header
#[derive(Debug)]
struct LocalHeader<'a> {
    compressed_size: usize,
    uncompressed_size: usize,
    name: &'a str,
}

/// Read the header at the cursor and move the cursor to the entry payload.
fn read_local_header<'a>(cur: &mut Cursor<'a>) -> Option<LocalHeader<'a>> {
    let compressed_size = cur.u32_le(18)? as usize;
    let uncompressed_size = cur.u32_le(22)? as usize;
    let name_len = cur.u16_le(26)? as usize;
    let extra_len = cur.u16_le(28)? as usize;

    cur.advance(LOCAL_HEADER_LEN);
    let name = cur.text(0, name_len);
    cur.advance(name_len);
    cur.advance(extra_len);

    Some(LocalHeader {
        compressed_size,
        uncompressed_size,
        name,
    })
}

/// Classify an entry purely by its name
fn classify_name(name: &str) -> Option<FileKind> {
    // Assumes signed add-ons as served by addons.mozilla.org
    if name == "META-INF/mozilla.rsa" {
        return Some(XPI);
    }

    if name.ends_with(".rels") || name.ends_with(".xml") {
        match name.split('/').next() {
            Some("word") => return Some(DOCX),
            Some("ppt") => return Some(PPTX),
            Some("xl") => return Some(XLSX),
            _ => {}
        }
    }

    if name.starts_with("xl/") {
        return Some(XLSX);
    }

    if model_path().is_match(name) {
        return Some(THREE_MF);
    }

    None
}

fn classify_mimetype(payload: &str) -> Option<FileKind> {
    STORED_MIMETYPES
        .iter()
        .find(|(mime, _)| *mime == payload)
        .map(|&(mime, ext)| FileKind::new(ext, mime))
}

/// Walk local file headers until a specific ZIP flavour is recognised or the
/// buffer runs out; falls back to plain `zip`.
pub fn sniff(data: &[u8]) -> Verdict {
    let mut cur = Cursor::new(data);

    while cur.pos() + LOCAL_HEADER_LEN < cur.len() {
        let Some(header) = read_local_header(&mut cur) else {
            break;
        };
        tracing::trace!(
            name = header.name,
            compressed = header.compressed_size,
            offset = cur.pos(),
            "zip entry"
        );

        if let Some(kind) = classify_name(header.name) {
            return Verdict::Match(kind);
        }

        if header.name == "mimetype" && header.compressed_size == header.uncompressed_size {
            if let Some(kind) = classify_mimetype(cur.text(0, header.compressed_size)) {
                return Verdict::Match(kind);
            }
        }

        if header.compressed_size == 0 {
            // Size unknown (data descriptor) or corrupt: resync on the next
            // local header signature, or run off the end of the buffer.
            while cur.remaining() > 4 && cur.u32_be(0) != Some(LOCAL_HEADER_SIG) {
                cur.advance(1);
            }
            if cur.remaining() <= 4 {
                break;
            }
        } else if !cur.advance(header.compressed_size) {
            break;
        }
    }

    Verdict::Match(ZIP)
}
