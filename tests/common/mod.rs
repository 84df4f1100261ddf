//! Fixture builders shared by the integration tests

#![allow(dead_code)]

pub struct Fixture {
    pub name: &'static str,
    pub data: Vec<u8>,
    /// Expected `(extension, mime)`; `None` means no match
    pub expected: Option<(&'static str, &'static str)>,
}

fn fixture(name: &'static str, data: Vec<u8>, expected: Option<(&'static str, &'static str)>) -> Fixture {
    Fixture { name, data, expected }
}

fn padded(head: &[u8], len: usize) -> Vec<u8> {
    let mut data = head.to_vec();
    data.resize(len.max(head.len()), 0);
    data
}

pub fn zip_entry(out: &mut Vec<u8>, name: &str, payload: &[u8]) {
    out.extend_from_slice(b"PK\x03\x04");
    out.extend_from_slice(&20u16.to_le_bytes());
    out.extend_from_slice(&[0u8; 12]); // flags, method, time, date, crc
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&(name.len() as u16).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(payload);
}

pub fn zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut out = Vec::new();
    for (name, payload) in entries {
        zip_entry(&mut out, name, payload);
    }
    out.extend_from_slice(b"PK\x01\x02");
    out.extend_from_slice(&[0u8; 42]);
    out
}

pub fn ebml(doc_type: &str) -> Vec<u8> {
    let mut children = vec![0x42, 0x86, 0x81, 0x01];
    children.extend_from_slice(&[0x42, 0x82, 0x80 | doc_type.len() as u8]);
    children.extend_from_slice(doc_type.as_bytes());

    let mut out = vec![0x1A, 0x45, 0xDF, 0xA3, 0x80 | children.len() as u8];
    out.extend_from_slice(&children);
    out.extend_from_slice(&[0x18, 0x53, 0x80, 0x67, 0x01, 0xFF, 0xFF, 0xFF]);
    out
}

pub fn png_chunk(out: &mut Vec<u8>, kind: &[u8; 4], payload: &[u8]) {
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    out.extend_from_slice(&[0u8; 4]);
}

pub fn png(animated: bool) -> Vec<u8> {
    let mut out = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    png_chunk(&mut out, b"IHDR", &[0u8; 13]);
    if animated {
        png_chunk(&mut out, b"acTL", &[0, 0, 0, 1, 0, 0, 0, 0]);
    }
    png_chunk(&mut out, b"IDAT", &[0x78, 0x9C]);
    png_chunk(&mut out, b"IEND", &[]);
    out
}

/// A single ustar header block with a valid checksum
pub fn tar_header(name: &str) -> Vec<u8> {
    let mut block = vec![0u8; 512];
    block[..name.len()].copy_from_slice(name.as_bytes());
    block[100..108].copy_from_slice(b"0000644\0");
    block[124..136].copy_from_slice(b"00000000005\0");
    block[156] = b'0';
    block[257..263].copy_from_slice(b"ustar\0");
    block[263..265].copy_from_slice(b"00");
    block[148..156].copy_from_slice(b"        ");
    let sum: u32 = block.iter().map(|&b| u32::from(b)).sum();
    block[148..156].copy_from_slice(format!("{sum:06o}\0 ").as_bytes());
    block
}

pub fn synchsafe(n: u32) -> [u8; 4] {
    [
        ((n >> 21) & 0x7F) as u8,
        ((n >> 14) & 0x7F) as u8,
        ((n >> 7) & 0x7F) as u8,
        (n & 0x7F) as u8,
    ]
}

pub fn id3_tag(body_len: u32) -> Vec<u8> {
    let mut out = b"ID3\x03\x00\x00".to_vec();
    out.extend_from_slice(&synchsafe(body_len));
    out.resize(10 + body_len as usize, 0);
    out
}

fn riff(form: &[u8; 4]) -> Vec<u8> {
    let mut out = b"RIFF".to_vec();
    out.extend_from_slice(&1024u32.to_le_bytes());
    out.extend_from_slice(form);
    out.extend_from_slice(b"fmt \x10\x00\x00\x00");
    out
}

fn ftyp(brand: &[u8; 4]) -> Vec<u8> {
    let mut out = vec![0x00, 0x00, 0x00, 0x18];
    out.extend_from_slice(b"ftyp");
    out.extend_from_slice(brand);
    out.extend_from_slice(&[0x00, 0x00, 0x02, 0x00]);
    out.extend_from_slice(b"isommp41");
    out
}

fn ogg(codec: &[u8]) -> Vec<u8> {
    let mut out = b"OggS\x00\x02".to_vec();
    out.resize(26, 0);
    out.push(1); // one segment
    out.push(codec.len() as u8 + 16);
    out.extend_from_slice(codec);
    out.resize(out.len() + 16, 0);
    out
}

fn jp2() -> Vec<u8> {
    let mut out = vec![0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20, 0x0D, 0x0A, 0x87, 0x0A];
    out.extend_from_slice(&[0x00, 0x00, 0x00, 0x14]);
    out.extend_from_slice(b"ftypjp2 \x00\x00\x00\x00jp2 ");
    out
}

/// Every fixture with its expected detection
pub fn fixtures() -> Vec<Fixture> {
    let mut id3_flac = id3_tag(128);
    id3_flac.extend_from_slice(b"fLaC\x00\x00\x00\x22");

    let mut id3_oversized = b"ID3\x04\x00\x00".to_vec();
    id3_oversized.extend_from_slice(&synchsafe(1 << 20));
    id3_oversized.resize(4096, 0);

    vec![
        fixture("bmp", padded(b"BM", 64), Some(("bmp", "image/bmp"))),
        fixture("bmp-minimal", b"BM".to_vec(), Some(("bmp", "image/bmp"))),
        fixture("jpeg", padded(b"\xFF\xD8\xFF\xE0\x00\x10JFIF\x00", 64), Some(("jpg", "image/jpeg"))),
        fixture("gif", padded(b"GIF89a", 32), Some(("gif", "image/gif"))),
        fixture("png", png(false), Some(("png", "image/png"))),
        fixture("apng", png(true), Some(("apng", "image/apng"))),
        fixture("webp", padded(b"RIFF\x00\x01\x00\x00WEBPVP8 ", 32), Some(("webp", "image/webp"))),
        fixture("tiff-be", padded(b"MM\x00\x2A\x00\x00\x00\x08", 32), Some(("tif", "image/tiff"))),
        fixture("jp2", jp2(), Some(("jp2", "image/jp2"))),
        fixture("pdf", padded(b"%PDF-1.7\n", 256), Some(("pdf", "application/pdf"))),
        fixture("postscript", padded(b"%!PS-Adobe-3.0\n", 64), Some(("ps", "application/postscript"))),
        fixture("gzip", padded(b"\x1F\x8B\x08\x00", 32), Some(("gz", "application/gzip"))),
        fixture("7z", padded(b"7z\xBC\xAF\x27\x1C\x00\x04", 32), Some(("7z", "application/x-7z-compressed"))),
        fixture("xz", padded(b"\xFD7zXZ\x00", 32), Some(("xz", "application/x-xz"))),
        fixture("rar5", padded(b"Rar!\x1A\x07\x01\x00", 32), Some(("rar", "application/x-rar-compressed"))),
        fixture("deb", padded(b"!<arch>\ndebian-binary   ", 64), Some(("deb", "application/x-deb"))),
        fixture("sqlite", padded(b"SQLite format 3\x00", 100), Some(("sqlite", "application/x-sqlite3"))),
        fixture("wasm", padded(b"\x00asm\x01\x00\x00\x00", 16), Some(("wasm", "application/wasm"))),
        fixture("elf", padded(b"\x7FELF\x02\x01\x01", 64), Some(("", "application/x-elf"))),
        fixture("exe", padded(b"MZ\x90\x00", 64), Some(("exe", "application/x-msdownload"))),
        fixture("xml", b"<?xml version=\"1.0\"?><a/>".to_vec(), Some(("xml", "application/xml"))),
        fixture("html", b"<!DOCTYPE html><html></html>".to_vec(), Some(("html", "text/html"))),
        fixture("flac", padded(b"fLaC\x00\x00\x00\x22", 64), Some(("flac", "audio/x-flac"))),
        fixture("wav", riff(b"WAVE"), Some(("wav", "audio/vnd.wave"))),
        fixture("avi", riff(b"AVI "), Some(("avi", "video/vnd.avi"))),
        fixture("mp4", ftyp(b"isom"), Some(("mp4", "video/mp4"))),
        fixture("heic", ftyp(b"heic"), Some(("heic", "image/heic"))),
        fixture("mov-moov", padded(b"\x00\x00\x00\x08moov", 32), Some(("mov", "video/quicktime"))),
        fixture("ogg-vorbis", ogg(b"\x01vorbis"), Some(("ogg", "audio/ogg"))),
        fixture("opus", ogg(b"OpusHead"), Some(("opus", "audio/opus"))),
        fixture("webm", ebml("webm"), Some(("webm", "video/webm"))),
        fixture("matroska", ebml("matroska"), Some(("mkv", "video/x-matroska"))),
        fixture("ebml-other", ebml("avi"), None),
        fixture(
            "docx",
            zip(&[("[Content_Types].xml", b"<Types/>"), ("word/document.xml", b"<w:document/>")]),
            Some(("docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document")),
        ),
        fixture(
            "epub",
            zip(&[("mimetype", b"application/epub+zip")]),
            Some(("epub", "application/epub+zip")),
        ),
        fixture(
            "odt",
            zip(&[("mimetype", b"application/vnd.oasis.opendocument.text")]),
            Some(("odt", "application/vnd.oasis.opendocument.text")),
        ),
        fixture("zip", zip(&[("notes.txt", b"hello")]), Some(("zip", "application/zip"))),
        fixture("tar", tar_header("notes.txt"), Some(("tar", "application/x-tar"))),
        fixture("id3-flac", id3_flac, Some(("flac", "audio/x-flac"))),
        fixture("id3-oversized", id3_oversized, Some(("mp3", "audio/mpeg"))),
        fixture("mp3-frame", padded(b"\xFF\xFB\x90\x64", 32), Some(("mp3", "audio/mpeg"))),
        fixture("aac-adts", padded(b"\xFF\xF1\x50\x80", 32), Some(("aac", "audio/aac"))),
        fixture("text", b"hello world, this is plain text".to_vec(), None),
        fixture("empty", Vec::new(), None),
    ]
}
