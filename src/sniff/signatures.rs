//! Signature rule table.
//!
//! Each rule is a magic byte pattern at an offset, optionally masked, plus
//! either a direct result or a sub-parser that inspects more structure.
//! Rules are evaluated strictly in table order and the first decisive
//! verdict wins, so the order below is part of the contract: short and
//! structural signatures first, long fixed signatures next, and the weak
//! ("unsafe") signatures with real false-positive rates last.

use serde::Serialize;

use super::cursor::Cursor;
use super::kind::FileKind;
use super::{asar, asf, ebml, id3, jpeg2000, mpeg, png, tar, zip};

/// Outcome of evaluating one rule against a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Detection finished with this result
    Match(FileKind),
    /// The rule does not apply; try the next one
    Pass,
    /// The rule recognised the container but not its flavour; detection ends
    /// with no match instead of consulting later, unrelated rules
    Stop,
    /// Restart detection on the buffer from this offset (ID3 tag skipping)
    Rescan(usize),
}

/// How much a rule's magic can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Tier {
    Strong,
    /// Short or common byte patterns, tried only after every strong rule
    Weak,
    /// Guesses built on parsing a payload rather than on a registered signature
    Heuristic,
}

pub type SubParser = fn(&[u8]) -> Verdict;

#[derive(Debug, Clone, Copy)]
pub enum Action {
    Kind(FileKind),
    Parse(SubParser),
}

/// A single entry of the rule table
#[derive(Debug, Clone)]
pub struct SignatureRule {
    pub name: &'static str,
    /// Bytes expected at `offset` (after masking)
    pub magic: &'static [u8],
    pub offset: usize,
    /// Applied to the buffer bytes before comparison
    pub mask: Option<&'static [u8]>,
    pub tier: Tier,
    pub action: Action,
}

impl SignatureRule {
    fn kind(name: &'static str, magic: &'static [u8], extension: &'static str, mime: &'static str) -> Self {
        Self {
            name,
            magic,
            offset: 0,
            mask: None,
            tier: Tier::Strong,
            action: Action::Kind(FileKind::new(extension, mime)),
        }
    }

    fn parse(name: &'static str, magic: &'static [u8], parser: SubParser) -> Self {
        Self {
            name,
            magic,
            offset: 0,
            mask: None,
            tier: Tier::Strong,
            action: Action::Parse(parser),
        }
    }

    fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    fn masked(mut self, mask: &'static [u8]) -> Self {
        self.mask = Some(mask);
        self
    }

    fn weak(mut self) -> Self {
        self.tier = Tier::Weak;
        self
    }

    fn heuristic(mut self) -> Self {
        self.tier = Tier::Heuristic;
        self
    }

    /// Does the (masked) magic appear at the rule's offset?
    pub fn magic_matches(&self, data: &[u8]) -> bool {
        Cursor::new(data).matches(self.magic, self.offset, self.mask)
    }

    pub fn evaluate(&self, data: &[u8]) -> Verdict {
        if !self.magic_matches(data) {
            return Verdict::Pass;
        }
        match self.action {
            Action::Kind(kind) => Verdict::Match(kind),
            Action::Parse(parser) => parser(data),
        }
    }

    /// Bytes needed before the magic alone can match
    pub fn min_len(&self) -> usize {
        self.offset + self.magic.len()
    }
}

// ============================================================================
// Discriminators for compound signatures
// ============================================================================

fn match_or_pass(kind: Option<FileKind>) -> Verdict {
    kind.map_or(Verdict::Pass, Verdict::Match)
}

/// `%!` is PostScript; an EPSF conformance line makes it EPS
pub(crate) fn discriminate_postscript(data: &[u8]) -> Verdict {
    let cur = Cursor::new(data);
    if cur.matches(b"PS-Adobe-", 2, None) && cur.matches(b" EPSF-", 14, None) {
        Verdict::Match(FileKind::new("eps", "application/eps"))
    } else {
        Verdict::Match(FileKind::new("ps", "application/postscript"))
    }
}

/// Ogg: the first packet of the first page names the codec
pub(crate) fn discriminate_ogg(data: &[u8]) -> Verdict {
    const PACKET: usize = 28;
    const CODECS: &[(&[u8], FileKind)] = &[
        (b"OpusHead", FileKind::new("opus", "audio/opus")),
        (b"\x80theora", FileKind::new("ogv", "video/ogg")),
        (b"\x01video\x00", FileKind::new("ogm", "video/ogg")),
        (b"\x7fFLAC", FileKind::new("oga", "audio/ogg")),
        (b"Speex  ", FileKind::new("spx", "audio/ogg")),
        (b"\x01vorbis", FileKind::new("ogg", "audio/ogg")),
    ];

    let cur = Cursor::new(data);
    let kind = CODECS
        .iter()
        .find(|(magic, _)| cur.matches(magic, PACKET, None))
        .map(|&(_, kind)| kind)
        .unwrap_or(FileKind::new("ogx", "application/ogg"));
    Verdict::Match(kind)
}

/// The remaining `PK` record signatures (empty archives, spanned archives)
pub(crate) fn discriminate_pk(data: &[u8]) -> Verdict {
    let cur = Cursor::new(data);
    let third = matches!(cur.u8(2), Some(0x03 | 0x05 | 0x07));
    let fourth = matches!(cur.u8(3), Some(0x04 | 0x06 | 0x08));
    match_or_pass((third && fourth).then_some(zip::ZIP))
}

/// ISO base media: the major brand of the `ftyp` box
pub(crate) fn discriminate_ftyp(data: &[u8]) -> Verdict {
    let cur = Cursor::new(data);
    // Major brand must start with a printable ISO 8859-1 character
    match cur.u8(8) {
        Some(b) if b & 0x60 != 0 => {}
        _ => return Verdict::Pass,
    }

    let brand = cur.text(8, 4).replace('\0', " ");
    let kind = match brand.trim() {
        "avif" => FileKind::new("avif", "image/avif"),
        "mif1" => FileKind::new("heic", "image/heif"),
        "msf1" => FileKind::new("heic", "image/heif-sequence"),
        "heic" | "heix" => FileKind::new("heic", "image/heic"),
        "hevc" | "hevx" => FileKind::new("heic", "image/heic-sequence"),
        "qt" => FileKind::new("mov", "video/quicktime"),
        "M4V" | "M4VH" | "M4VP" => FileKind::new("m4v", "video/x-m4v"),
        "M4P" => FileKind::new("m4p", "video/mp4"),
        "M4B" => FileKind::new("m4b", "audio/mp4"),
        "M4A" => FileKind::new("m4a", "audio/x-m4a"),
        "F4V" => FileKind::new("f4v", "video/mp4"),
        "F4P" => FileKind::new("f4p", "video/mp4"),
        "F4A" => FileKind::new("f4a", "audio/mp4"),
        "F4B" => FileKind::new("f4b", "audio/mp4"),
        "crx" => FileKind::new("cr3", "image/x-canon-cr3"),
        b if b.starts_with("3g2") => FileKind::new("3g2", "video/3gpp2"),
        b if b.starts_with("3g") => FileKind::new("3gp", "video/3gpp"),
        _ => FileKind::new("mp4", "video/mp4"),
    };
    Verdict::Match(kind)
}

/// WOFF/WOFF2 with a TrueType or CFF flavour
fn woff_flavour(data: &[u8]) -> bool {
    let cur = Cursor::new(data);
    cur.matches(&[0x00, 0x01, 0x00, 0x00], 4, None) || cur.matches(b"OTTO", 4, None)
}

pub(crate) fn discriminate_woff(data: &[u8]) -> Verdict {
    match_or_pass(woff_flavour(data).then_some(FileKind::new("woff", "font/woff")))
}

pub(crate) fn discriminate_woff2(data: &[u8]) -> Verdict {
    match_or_pass(woff_flavour(data).then_some(FileKind::new("woff2", "font/woff2")))
}

/// Adobe Illustrator files are PDFs carrying `AIPrivateData`
pub(crate) fn discriminate_pdf(data: &[u8]) -> Verdict {
    const AI_SCAN_START: usize = 1350;
    const AI_MARKER: &[u8] = b"AIPrivateData";

    let is_ai = data
        .get(AI_SCAN_START..)
        .is_some_and(|rest| rest.windows(AI_MARKER.len()).any(|w| w == AI_MARKER));
    if is_ai {
        Verdict::Match(FileKind::new("ai", "application/postscript"))
    } else {
        Verdict::Match(FileKind::new("pdf", "application/pdf"))
    }
}

/// Little-endian TIFF and the camera raw formats built on it
pub(crate) fn discriminate_tiff_le(data: &[u8]) -> Verdict {
    let cur = Cursor::new(data);
    let at = |magic: &[u8], offset| cur.matches(magic, offset, None);

    if at(b"CR", 8) {
        return Verdict::Match(FileKind::new("cr2", "image/x-canon-cr2"));
    }
    if at(&[0x1C, 0x00, 0xFE, 0x00], 8) || at(&[0x1F, 0x00, 0x0B, 0x00], 8) {
        return Verdict::Match(FileKind::new("nef", "image/x-nikon-nef"));
    }
    if at(&[0x08, 0x00, 0x00, 0x00], 4)
        && (at(&[0x2D, 0x00, 0xFE, 0x00], 8) || at(&[0x27, 0x00, 0xFE, 0x00], 8))
    {
        return Verdict::Match(FileKind::new("dng", "image/x-adobe-dng"));
    }
    if (at(&[0x10, 0xFB, 0x86, 0x01], 4) || at(&[0x08, 0x00, 0x00, 0x00], 4))
        && at(
            &[0x00, 0xFE, 0x00, 0x04, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x03, 0x01],
            9,
        )
    {
        return Verdict::Match(FileKind::new("arw", "image/x-sony-arw"));
    }
    Verdict::Match(FileKind::new("tif", "image/tiff"))
}

/// RIFF form type at offset 8. Unknown forms fall through to later rules.
pub(crate) fn discriminate_riff(data: &[u8]) -> Verdict {
    let cur = Cursor::new(data);
    if cur.matches(b"AVI", 8, None) {
        Verdict::Match(FileKind::new("avi", "video/vnd.avi"))
    } else if cur.matches(b"WAVE", 8, None) {
        Verdict::Match(FileKind::new("wav", "audio/vnd.wave"))
    } else if cur.matches(b"QLCM", 8, None) {
        Verdict::Match(FileKind::new("qcp", "audio/qcelp"))
    } else {
        Verdict::Pass
    }
}

/// LHA method IDs: `-lh0-` .. `-lh7-`, `-lzs-`, `-lz4-`, `-lz5-`, `-lhd-`
pub(crate) fn discriminate_lzh(data: &[u8]) -> Verdict {
    const METHODS: &[&[u8; 3]] = &[
        b"h0-", b"h1-", b"h2-", b"h3-", b"h4-", b"h5-", b"h6-", b"h7-", b"zs-", b"z4-", b"z5-",
        b"hd-",
    ];
    let cur = Cursor::new(data);
    let known = METHODS.iter().any(|m| cur.matches(*m, 4, None));
    match_or_pass(known.then_some(FileKind::new("lzh", "application/x-lzh-compressed")))
}

/// RAR 1.5-4.x (`\x00`) and RAR 5 (`\x01`)
pub(crate) fn discriminate_rar(data: &[u8]) -> Verdict {
    let version = matches!(Cursor::new(data).u8(6), Some(0x00 | 0x01));
    match_or_pass(version.then_some(FileKind::new("rar", "application/x-rar-compressed")))
}

/// Debian packages are `ar` archives whose first member is `debian-binary`
pub(crate) fn discriminate_ar(data: &[u8]) -> Verdict {
    if Cursor::new(data).text(8, 13) == "debian-binary" {
        Verdict::Match(FileKind::new("deb", "application/x-deb"))
    } else {
        Verdict::Match(FileKind::new("ar", "application/x-unix-archive"))
    }
}

pub(crate) fn discriminate_mie(data: &[u8]) -> Verdict {
    let ok = Cursor::new(data).matches(b"0MIE", 4, None);
    match_or_pass(ok.then_some(FileKind::new("mie", "application/x-mie")))
}

/// MPEG transport stream: sync bytes of consecutive 192-byte (M2TS) or
/// 188-byte packets
pub(crate) fn discriminate_mts(data: &[u8]) -> Verdict {
    let cur = Cursor::new(data);
    let ok = cur.matches(&[0x47], 192, None) || cur.matches(&[0x47], 196, None);
    match_or_pass(ok.then_some(FileKind::new("mts", "video/mp2t")))
}

pub(crate) fn discriminate_eot(data: &[u8]) -> Verdict {
    let cur = Cursor::new(data);
    let ok = [[0x00u8, 0x00, 0x01], [0x01, 0x00, 0x02], [0x02, 0x00, 0x02]]
        .iter()
        .any(|version| cur.matches(version, 8, None));
    match_or_pass(ok.then_some(FileKind::new("eot", "application/vnd.ms-fontobject")))
}

// ============================================================================
// The table
// ============================================================================

/// All rules in evaluation order
pub fn all_rules() -> Vec<SignatureRule> {
    use SignatureRule as R;

    vec![
        // === 2-byte signatures ===
        R::kind("BMP", b"BM", "bmp", "image/bmp"),
        R::kind("AC-3", &[0x0B, 0x77], "ac3", "audio/vnd.dolby.dd-raw"),
        R::kind("DMG", &[0x78, 0x01], "dmg", "application/x-apple-diskimage"),
        R::kind("PE/EXE", b"MZ", "exe", "application/x-msdownload"),
        R::parse("PostScript", b"%!", discriminate_postscript),
        R::kind("compress (LZH)", &[0x1F, 0xA0], "Z", "application/x-compress"),
        R::kind("compress (LZW)", &[0x1F, 0x9D], "Z", "application/x-compress"),
        // === 3-byte signatures ===
        R::kind("JPEG", &[0xFF, 0xD8, 0xFF], "jpg", "image/jpeg"),
        R::kind("JPEG XR", &[0x49, 0x49, 0xBC], "jxr", "image/vnd.ms-photo"),
        R::kind("GZIP", &[0x1F, 0x8B, 0x08], "gz", "application/gzip"),
        R::kind("BZIP2", b"BZh", "bz2", "application/x-bzip2"),
        R::parse("ID3v2", b"ID3", id3::sniff),
        R::kind("Musepack SV7", b"MP+", "mpc", "audio/x-musepack"),
        R::kind("SWF (zlib)", b"CWS", "swf", "application/x-shockwave-flash"),
        R::kind("SWF", b"FWS", "swf", "application/x-shockwave-flash"),
        // === 4-byte signatures ===
        R::kind("GIF", b"GIF", "gif", "image/gif"),
        R::kind("FLIF", b"FLIF", "flif", "image/flif"),
        R::kind("Photoshop PSD", b"8BPS", "psd", "image/vnd.adobe.photoshop"),
        R::kind("WebP", b"WEBP", "webp", "image/webp").at(8),
        R::kind("Musepack SV8", b"MPCK", "mpc", "audio/x-musepack"),
        R::kind("AIFF", b"FORM", "aif", "audio/aiff"),
        R::kind("Apple icns", b"icns", "icns", "image/icns"),
        // must precede the generic PK rule
        R::parse("ZIP local header", &[0x50, 0x4B, 0x03, 0x04], zip::sniff),
        R::parse("Ogg", b"OggS", discriminate_ogg),
        R::parse("ZIP (other records)", b"PK", discriminate_pk),
        R::parse("ISO BMFF ftyp", b"ftyp", discriminate_ftyp).at(4),
        R::kind("MIDI", b"MThd", "mid", "audio/midi"),
        R::parse("WOFF", b"wOFF", discriminate_woff),
        R::parse("WOFF2", b"wOF2", discriminate_woff2),
        R::kind("PCAP (LE)", &[0xD4, 0xC3, 0xB2, 0xA1], "pcap", "application/vnd.tcpdump.pcap"),
        R::kind("PCAP (BE)", &[0xA1, 0xB2, 0xC3, 0xD4], "pcap", "application/vnd.tcpdump.pcap"),
        R::kind("DSF", b"DSD ", "dsf", "audio/x-dsf"),
        R::kind("LZIP", b"LZIP", "lz", "application/x-lzip"),
        R::kind("FLAC", b"fLaC", "flac", "audio/x-flac"),
        R::kind("BPG", &[0x42, 0x50, 0x47, 0xFB], "bpg", "image/bpg"),
        R::kind("WavPack", b"wvpk", "wv", "audio/wavpack"),
        R::parse("PDF", b"%PDF", discriminate_pdf),
        R::kind("WASM", &[0x00, 0x61, 0x73, 0x6D], "wasm", "application/wasm"),
        R::parse("TIFF (LE)", &[0x49, 0x49, 0x2A, 0x00], discriminate_tiff_le),
        R::kind("TIFF (BE)", &[0x4D, 0x4D, 0x00, 0x2A], "tif", "image/tiff"),
        R::kind("Monkey's Audio", b"MAC ", "ape", "audio/ape"),
        R::parse("EBML", &[0x1A, 0x45, 0xDF, 0xA3], ebml::sniff),
        R::parse("RIFF", b"RIFF", discriminate_riff),
        R::kind("SQLite", b"SQLi", "sqlite", "application/x-sqlite3"),
        R::kind("NES ROM", &[0x4E, 0x45, 0x53, 0x1A], "nes", "application/x-nintendo-nes-rom"),
        R::kind("Chrome extension", b"Cr24", "crx", "application/x-google-chrome-extension"),
        R::kind("Cabinet", b"MSCF", "cab", "application/vnd.ms-cab-compressed"),
        R::kind("InstallShield cabinet", b"ISc(", "cab", "application/vnd.ms-cab-compressed"),
        R::kind("RPM", &[0xED, 0xAB, 0xEE, 0xDB], "rpm", "application/x-rpm"),
        R::kind("EPS (binary)", &[0xC5, 0xD0, 0xD3, 0xC6], "eps", "application/eps"),
        R::kind("ZSTD", &[0x28, 0xB5, 0x2F, 0xFD], "zst", "application/zstd"),
        // === 5-byte signatures ===
        R::kind("OpenType", &[0x4F, 0x54, 0x54, 0x4F, 0x00], "otf", "font/otf"),
        R::kind("AMR", b"#!AMR", "amr", "audio/amr"),
        R::kind("RTF", b"{\\rtf", "rtf", "application/rtf"),
        R::kind("FLV", &[0x46, 0x4C, 0x56, 0x01], "flv", "video/x-flv"),
        R::kind("Impulse Tracker", b"IMPM", "it", "audio/x-it"),
        R::kind("ELF", &[0x7F, 0x45, 0x4C, 0x46], "", "application/x-elf"),
        R::parse("LHA", b"-l", discriminate_lzh).at(2),
        R::kind("MPEG-1 PS", &[0x00, 0x00, 0x01, 0xBA, 0x21], "mpg", "video/MP1S")
            .masked(&[0xFF, 0xFF, 0xFF, 0xFF, 0xF1]),
        R::kind("MPEG-2 PS", &[0x00, 0x00, 0x01, 0xBA, 0x44], "mpg", "video/MP2P")
            .masked(&[0xFF, 0xFF, 0xFF, 0xFF, 0xC4]),
        R::kind("CHM", b"ITSF", "chm", "application/vnd.ms-htmlhelp"),
        // === 6-byte signatures ===
        R::kind("XZ", &[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00], "xz", "application/x-xz"),
        R::kind("XML", b"<?xml ", "xml", "application/xml"),
        R::kind("iCalendar", b"BEGIN:", "ics", "text/calendar"),
        R::kind("7z", &[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C], "7z", "application/x-7z-compressed"),
        R::parse("RAR", &[0x52, 0x61, 0x72, 0x21, 0x1A, 0x07], discriminate_rar),
        R::kind("STL (ASCII)", b"solid ", "stl", "model/stl"),
        // === 7-byte signatures ===
        R::kind("Blender", b"BLENDER", "blend", "application/x-blender"),
        R::parse("ar", b"!<arch>", discriminate_ar),
        // === 8-byte signatures ===
        R::parse("PNG", &png::MAGIC, png::sniff),
        R::kind("Apache Arrow", b"ARROW1\x00\x00", "arrow", "application/x-apache-arrow"),
        R::kind("glTF binary", &[0x67, 0x6C, 0x54, 0x46, 0x02, 0x00, 0x00, 0x00], "glb", "model/gltf-binary"),
        R::kind("GIMP XCF", b"gimp xcf ", "xcf", "image/x-xcf"),
        R::kind("QuickTime (free)", b"free", "mov", "video/quicktime").at(4),
        R::kind("QuickTime (mdat)", b"mdat", "mov", "video/quicktime").at(4),
        R::kind("QuickTime (moov)", b"moov", "mov", "video/quicktime").at(4),
        R::kind("QuickTime (wide)", b"wide", "mov", "video/quicktime").at(4),
        // === 9-byte signatures ===
        R::kind("Olympus ORF", &[0x49, 0x49, 0x52, 0x4F, 0x08, 0x00, 0x00, 0x00, 0x18], "orf", "image/x-olympus-orf"),
        // === 12-byte signatures ===
        R::kind(
            "Panasonic RW2",
            &[0x49, 0x49, 0x55, 0x00, 0x18, 0x00, 0x00, 0x00, 0x88, 0xE7, 0x74, 0xD8],
            "rw2",
            "image/x-panasonic-rw2",
        ),
        R::parse("ASF", asf::HEADER_GUID_PREFIX, asf::sniff),
        R::kind(
            "KTX",
            &[0xAB, 0x4B, 0x54, 0x58, 0x20, 0x31, 0x31, 0xBB, 0x0D, 0x0A, 0x1A, 0x0A],
            "ktx",
            "image/ktx",
        ),
        // 7E 10 04 and 7E 18 04
        R::parse("MIE", &[0x7E, 0x10, 0x04], discriminate_mie).masked(&[0xFF, 0xF7, 0xFF]),
        R::kind(
            "Esri shapefile",
            &[0x27, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
            "shp",
            "application/x-esri-shape",
        )
        .at(2),
        R::parse(
            "JPEG 2000",
            &[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20, 0x0D, 0x0A, 0x87, 0x0A],
            jpeg2000::sniff,
        ),
        R::kind("HTML", b"<!DOCTYPE html>", "html", "text/html"),
        R::kind("HTML (lowercase)", b"<!doctype html>", "html", "text/html"),
        // === Weak signatures ===
        R::kind("MPEG PS", &[0x00, 0x00, 0x01, 0xBA], "mpg", "video/mpeg").weak(),
        R::kind("MPEG video", &[0x00, 0x00, 0x01, 0xB3], "mpg", "video/mpeg").weak(),
        R::kind("TrueType", &[0x00, 0x01, 0x00, 0x00, 0x00], "ttf", "font/ttf").weak(),
        R::kind("ICO", &[0x00, 0x00, 0x01, 0x00], "ico", "image/x-icon").weak(),
        R::kind("CUR", &[0x00, 0x00, 0x02, 0x00], "cur", "image/x-icon").weak(),
        R::kind(
            "Compound File Binary",
            &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1],
            "cfb",
            "application/x-cfb",
        )
        .weak(),
        R::kind("Fujifilm RAF", b"FUJIFILMCCD-RAW", "raf", "image/x-fujifilm-raf").weak(),
        R::kind("FastTracker XM", b"Extended Module:", "xm", "audio/x-xm").weak(),
        R::kind("Creative Voice", b"Creative Voice File", "voc", "audio/x-voc").weak(),
        R::parse("ASAR", &[0x04, 0x00, 0x00, 0x00], asar::sniff).heuristic(),
        R::kind(
            "MXF",
            &[0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0D, 0x01, 0x02, 0x01, 0x01, 0x02],
            "mxf",
            "application/mxf",
        )
        .weak(),
        R::kind("Scream Tracker 3", b"SCRM", "s3m", "audio/x-s3m").at(44).weak(),
        R::parse("MPEG-TS", &[0x47], discriminate_mts).at(4).weak(),
        R::kind("Mobipocket", b"BOOKMOBI", "mobi", "application/x-mobipocket-ebook").at(60).weak(),
        R::kind("DICOM", b"DICM", "dcm", "application/dicom").at(128).weak(),
        R::kind(
            "Windows shortcut",
            &[
                0x4C, 0x00, 0x00, 0x00, 0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x00,
                0x00, 0x00, 0x00, 0x00, 0x00, 0x46,
            ],
            "lnk",
            "application/x.ms.shortcut",
        )
        .weak(),
        R::kind(
            "macOS alias",
            b"book\x00\x00\x00\x00mark\x00\x00\x00\x00",
            "alias",
            "application/x.apple.alias",
        )
        .weak(),
        R::parse("Embedded OpenType", b"LP", discriminate_eot).at(34).weak(),
        R::kind(
            "InDesign",
            &[
                0x06, 0x06, 0xED, 0xF5, 0xD8, 0x1D, 0x46, 0xE5, 0xBD, 0x31, 0xEF, 0xE7, 0xFE, 0x74,
                0xB7, 0x1D,
            ],
            "indd",
            "application/x-indesign",
        )
        .weak(),
        // any buffer; the checksum decides
        R::parse("TAR checksum", b"", tar::sniff).weak(),
        R::kind(
            "SketchUp",
            b"\xFF\xFE\xFF\x0ES\x00k\x00e\x00t\x00c\x00h\x00U\x00p\x00 \x00M\x00o\x00d\x00e\x00l\x00",
            "skp",
            "application/vnd.sketchup.skp",
        )
        .weak(),
        R::kind("PGP message", b"-----BEGIN PGP MESSAGE-----", "pgp", "application/pgp-encrypted").weak(),
        R::parse("MPEG audio frame sync", mpeg::SYNC, mpeg::sniff).masked(mpeg::SYNC_MASK).weak(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(rule: &SignatureRule) -> Option<FileKind> {
        match rule.action {
            Action::Kind(kind) => Some(kind),
            Action::Parse(_) => None,
        }
    }

    #[test]
    fn rule_names_are_unique() {
        let rules = all_rules();
        let mut names: Vec<_> = rules.iter().map(|r| r.name).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len(), "duplicate rule name");
    }

    #[test]
    fn weak_tier_comes_last() {
        let rules = all_rules();
        let first_weak = rules
            .iter()
            .position(|r| r.tier != Tier::Strong)
            .expect("weak tier present");
        assert!(
            rules[first_weak..].iter().all(|r| r.tier != Tier::Strong),
            "strong rule after the weak tier"
        );
        assert_eq!(rules.last().unwrap().name, "MPEG audio frame sync");
    }

    #[test]
    fn masks_cover_their_patterns() {
        for rule in all_rules() {
            if let Some(mask) = rule.mask {
                assert_eq!(mask.len(), rule.magic.len(), "{}", rule.name);
                for (m, p) in mask.iter().zip(rule.magic) {
                    assert_eq!(m & p, *p, "{}: pattern bit outside mask", rule.name);
                }
            }
        }
    }

    #[test]
    fn direct_rules_match_their_own_magic() {
        for rule in all_rules() {
            let Some(kind) = kind_of(&rule) else { continue };
            let mut data = vec![0u8; rule.min_len()];
            data[rule.offset..].copy_from_slice(rule.magic);
            assert_eq!(rule.evaluate(&data), Verdict::Match(kind), "{}", rule.name);
        }
    }

    #[test]
    fn short_buffers_pass() {
        for rule in all_rules() {
            if rule.magic.is_empty() {
                continue;
            }
            let data = vec![0xFFu8; rule.min_len() - 1];
            assert!(!rule.magic_matches(&data), "{}", rule.name);
        }
    }

    #[test]
    fn postscript_and_eps() {
        assert_eq!(
            discriminate_postscript(b"%!PS-Adobe-3.0 EPSF-3.0\n"),
            Verdict::Match(FileKind::new("eps", "application/eps"))
        );
        assert_eq!(
            discriminate_postscript(b"%!PS-Adobe-3.0\n"),
            Verdict::Match(FileKind::new("ps", "application/postscript"))
        );
    }

    #[test]
    fn ogg_codecs() {
        let page = |codec: &[u8]| {
            let mut d = b"OggS".to_vec();
            d.resize(28, 0);
            d.extend_from_slice(codec);
            d.resize(64, 0);
            d
        };
        assert_eq!(
            discriminate_ogg(&page(b"OpusHead")),
            Verdict::Match(FileKind::new("opus", "audio/opus"))
        );
        assert_eq!(
            discriminate_ogg(&page(b"\x01vorbis")),
            Verdict::Match(FileKind::new("ogg", "audio/ogg"))
        );
        assert_eq!(
            discriminate_ogg(&page(b"\x80theora")),
            Verdict::Match(FileKind::new("ogv", "video/ogg"))
        );
        assert_eq!(
            discriminate_ogg(&page(b"\x7fFLAC")),
            Verdict::Match(FileKind::new("oga", "audio/ogg"))
        );
        assert_eq!(
            discriminate_ogg(&page(b"unknown!")),
            Verdict::Match(FileKind::new("ogx", "application/ogg"))
        );
    }

    #[test]
    fn ftyp_brands() {
        let boxed = |brand: &[u8; 4]| {
            let mut d = vec![0x00, 0x00, 0x00, 0x1C];
            d.extend_from_slice(b"ftyp");
            d.extend_from_slice(brand);
            d.extend_from_slice(&[0u8; 16]);
            d
        };
        let ext = |brand| match discriminate_ftyp(&boxed(brand)) {
            Verdict::Match(kind) => kind.extension,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(ext(b"isom"), "mp4");
        assert_eq!(ext(b"avif"), "avif");
        assert_eq!(ext(b"heic"), "heic");
        assert_eq!(ext(b"qt  "), "mov");
        assert_eq!(ext(b"M4A "), "m4a");
        assert_eq!(ext(b"3gp5"), "3gp");
        assert_eq!(ext(b"3g2a"), "3g2");
        assert_eq!(ext(b"crx "), "cr3");

        // non-printable major brand
        assert_eq!(discriminate_ftyp(&boxed(b"\x00\x00\x00\x00")), Verdict::Pass);
    }

    #[test]
    fn riff_forms() {
        let riff = |form: &[u8; 4]| {
            let mut d = b"RIFF\x24\x00\x00\x00".to_vec();
            d.extend_from_slice(form);
            d
        };
        assert_eq!(
            discriminate_riff(&riff(b"WAVE")),
            Verdict::Match(FileKind::new("wav", "audio/vnd.wave"))
        );
        assert_eq!(
            discriminate_riff(&riff(b"AVI ")),
            Verdict::Match(FileKind::new("avi", "video/vnd.avi"))
        );
        assert_eq!(discriminate_riff(&riff(b"XXXX")), Verdict::Pass);
    }

    #[test]
    fn tiff_raw_variants() {
        let mut cr2 = vec![0x49, 0x49, 0x2A, 0x00, 0x10, 0x00, 0x00, 0x00, b'C', b'R'];
        cr2.resize(32, 0);
        assert_eq!(
            discriminate_tiff_le(&cr2),
            Verdict::Match(FileKind::new("cr2", "image/x-canon-cr2"))
        );

        let mut plain = vec![0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
        plain.resize(32, 0);
        assert_eq!(
            discriminate_tiff_le(&plain),
            Verdict::Match(FileKind::new("tif", "image/tiff"))
        );
    }

    #[test]
    fn pdf_versus_illustrator() {
        let mut pdf = b"%PDF-1.7\n".to_vec();
        pdf.resize(4096, b' ');
        assert_eq!(
            discriminate_pdf(&pdf),
            Verdict::Match(FileKind::new("pdf", "application/pdf"))
        );
        pdf[2000..2013].copy_from_slice(b"AIPrivateData");
        assert_eq!(
            discriminate_pdf(&pdf),
            Verdict::Match(FileKind::new("ai", "application/postscript"))
        );
    }

    #[test]
    fn masked_mpeg_ps_rules() {
        let rules = all_rules();
        let rule = |name| rules.iter().find(|r| r.name == name).unwrap();
        let mpeg1 = [0x00, 0x00, 0x01, 0xBA, 0x21, 0x00];
        let mpeg2 = [0x00, 0x00, 0x01, 0xBA, 0x44, 0x00];
        assert!(rule("MPEG-1 PS").magic_matches(&mpeg1));
        assert!(!rule("MPEG-1 PS").magic_matches(&mpeg2));
        assert!(rule("MPEG-2 PS").magic_matches(&mpeg2));
        assert!(!rule("MPEG-2 PS").magic_matches(&mpeg1));
    }

    #[test]
    fn lzh_and_rar_and_ar() {
        assert_eq!(
            discriminate_lzh(b"\x00\x00-lh5-\x00"),
            Verdict::Match(FileKind::new("lzh", "application/x-lzh-compressed"))
        );
        assert_eq!(discriminate_lzh(b"\x00\x00-lq9-\x00"), Verdict::Pass);
        assert_eq!(discriminate_rar(b"Rar!\x1a\x07\x02"), Verdict::Pass);
        assert_eq!(
            discriminate_ar(b"!<arch>\ndebian-binary   "),
            Verdict::Match(FileKind::new("deb", "application/x-deb"))
        );
    }
}
