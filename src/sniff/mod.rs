//! Sniff Module - File type detection from leading bytes
//!
//! Detection runs an ordered table of magic-byte rules over a prefix of the
//! content. Most rules resolve to a fixed type; container formats (ZIP,
//! EBML, PNG, ASF, Ogg, ISO BMFF, ...) hand off to a small structural walker
//! that decides the concrete flavour.
//!
//! The engine never allocates per call beyond what the JSON-based ASAR
//! heuristic needs, never panics on short or malformed input, and does the
//! same amount of work for the same bytes every time.

pub mod asar;
pub mod asf;
pub mod cursor;
pub mod ebml;
pub mod id3;
pub mod jpeg2000;
pub mod kind;
pub mod mpeg;
pub mod png;
pub mod signatures;
pub mod tar;
pub mod zip;

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

pub use cursor::Cursor;
pub use kind::{FileKind, FileType};
pub use signatures::{all_rules, Action, SignatureRule, Tier, Verdict};

/// Prefix length callers should read before sniffing
pub const DEFAULT_PREFIX_LEN: usize = 8192;

/// Accepted range for a configured prefix length
pub const MIN_PREFIX_LEN: usize = 16;
pub const MAX_PREFIX_LEN: usize = 1 << 20;

/// Knobs for a [`Sniffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SniffOptions {
    /// How many consecutive ID3 tags are skipped before giving up with an
    /// mp3 guess
    pub max_id3_chain: usize,
    /// Evaluate the weak signature tier
    pub weak_signatures: bool,
    /// Evaluate the ASAR JSON-header heuristic
    pub asar_heuristic: bool,
}

impl Default for SniffOptions {
    fn default() -> Self {
        Self {
            max_id3_chain: 16,
            weak_signatures: true,
            asar_heuristic: true,
        }
    }
}

impl SniffOptions {
    fn allows(&self, tier: Tier) -> bool {
        match tier {
            Tier::Strong => true,
            Tier::Weak => self.weak_signatures,
            Tier::Heuristic => self.weak_signatures && self.asar_heuristic,
        }
    }
}

/// Full result of one detection, including which rule decided it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub kind: Option<FileKind>,
    /// Name of the deciding rule; `None` when every rule passed
    pub rule: Option<&'static str>,
    /// Number of ID3 tags skipped before the deciding rule ran
    pub id3_tags: usize,
}

/// Rule table plus options. Cheap to share; detection takes `&self`.
#[derive(Debug, Clone)]
pub struct Sniffer {
    rules: Vec<SignatureRule>,
    options: SniffOptions,
}

impl Default for Sniffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sniffer {
    pub fn new() -> Self {
        Self::with_options(SniffOptions::default())
    }

    pub fn with_options(options: SniffOptions) -> Self {
        let rules = all_rules()
            .into_iter()
            .filter(|rule| options.allows(rule.tier))
            .collect();
        Self { rules, options }
    }

    pub fn options(&self) -> &SniffOptions {
        &self.options
    }

    /// Active rules in evaluation order
    pub fn rules(&self) -> &[SignatureRule] {
        &self.rules
    }

    /// Detect the type of `data`, or `None` when nothing matched.
    pub fn detect(&self, data: &[u8]) -> Option<FileKind> {
        self.sniff(data).kind
    }

    /// Detect the type of `data` and report how the decision was reached.
    ///
    /// ID3 tags restart detection on the bytes after the tag. The restart is
    /// a loop over ever shorter sub-slices, bounded by
    /// [`SniffOptions::max_id3_chain`]; running out of budget is treated like
    /// a tag that overruns the buffer.
    pub fn sniff(&self, data: &[u8]) -> Detection {
        let mut view = data;
        let mut id3_tags = 0;

        loop {
            let (verdict, rule) = self.evaluate(view);
            match verdict {
                Verdict::Match(kind) => {
                    tracing::debug!(rule, ext = kind.extension, mime = kind.mime, id3_tags, "detected");
                    return Detection { kind: Some(kind), rule, id3_tags };
                }
                Verdict::Pass | Verdict::Stop => {
                    tracing::debug!(rule, id3_tags, "no match");
                    return Detection { kind: None, rule, id3_tags };
                }
                Verdict::Rescan(offset) => {
                    id3_tags += 1;
                    let rest = view.get(offset..);
                    match rest {
                        Some(rest) if id3_tags <= self.options.max_id3_chain => view = rest,
                        _ => {
                            tracing::debug!(id3_tags, "ID3 chain limit reached");
                            return Detection { kind: Some(id3::MP3), rule, id3_tags };
                        }
                    }
                }
            }
        }
    }

    /// First decisive verdict over the table
    fn evaluate(&self, data: &[u8]) -> (Verdict, Option<&'static str>) {
        for rule in &self.rules {
            match rule.evaluate(data) {
                Verdict::Pass => continue,
                verdict => return (verdict, Some(rule.name)),
            }
        }
        (Verdict::Pass, None)
    }
}

fn default_sniffer() -> &'static Sniffer {
    static SNIFFER: OnceLock<Sniffer> = OnceLock::new();
    SNIFFER.get_or_init(Sniffer::new)
}

/// Detect with default options
pub fn detect(data: &[u8]) -> Option<FileKind> {
    default_sniffer().detect(data)
}

/// Detect with default options, falling back to `application/octet-stream`
pub fn resolve(data: &[u8]) -> FileKind {
    detect(data).unwrap_or(FileKind::OCTET_STREAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ext(data: &[u8]) -> Option<&'static str> {
        detect(data).map(|k| k.extension)
    }

    #[test]
    fn empty_and_tiny_buffers() {
        assert_eq!(detect(&[]), None);
        assert_eq!(detect(&[0x42]), None);
        assert_eq!(resolve(&[]), FileKind::OCTET_STREAM);
    }

    #[test]
    fn bmp_needs_only_two_bytes() {
        assert_eq!(ext(b"BM"), Some("bmp"));
    }

    #[test]
    fn zip_local_header_beats_generic_pk() {
        let mut data = Vec::new();
        zip::tests::push_entry(&mut data, "word/document.xml", b"<w/>", true);
        data.extend_from_slice(&[0u8; 16]);
        assert_eq!(ext(&data), Some("docx"));

        let empty_archive = [0x50, 0x4B, 0x05, 0x06, 0, 0, 0, 0];
        assert_eq!(ext(&empty_archive), Some("zip"));
    }

    #[test]
    fn ebml_stop_is_terminal() {
        // an unknown DocType must not fall through to later rules
        assert_eq!(detect(&ebml::tests::ebml_header("avi")), None);
        let detection = Sniffer::new().sniff(&ebml::tests::ebml_header("avi"));
        assert_eq!(detection.rule, Some("EBML"));
        assert_eq!(ext(&ebml::tests::ebml_header("webm")), Some("webm"));
    }

    #[test]
    fn id3_skips_to_inner_format() {
        let mut data = id3::tests::tag(64);
        data.extend_from_slice(b"fLaC\x00\x00\x00\x22");
        let detection = Sniffer::new().sniff(&data);
        assert_eq!(detection.kind.map(|k| k.extension), Some("flac"));
        assert_eq!(detection.id3_tags, 1);
    }

    #[test]
    fn id3_oversized_tag_guesses_mp3() {
        let mut data = b"ID3\x03\x00\x00".to_vec();
        data.extend_from_slice(&id3::tests::encode(100_000));
        data.resize(512, 0);
        assert_eq!(ext(&data), Some("mp3"));
    }

    #[test]
    fn id3_chain_is_bounded() {
        let options = SniffOptions {
            max_id3_chain: 3,
            ..SniffOptions::default()
        };
        let sniffer = Sniffer::with_options(options);

        let mut data = Vec::new();
        for _ in 0..10 {
            data.extend_from_slice(&id3::tests::tag(4));
        }
        data.extend_from_slice(b"fLaC");

        let detection = sniffer.sniff(&data);
        assert_eq!(detection.kind, Some(id3::MP3));
        assert_eq!(detection.id3_tags, 4);

        // the default budget covers all ten tags
        assert_eq!(ext(&data), Some("flac"));
    }

    #[test]
    fn id3_with_nothing_after_tag() {
        // tag ends exactly at the buffer end; the empty remainder matches nothing
        assert_eq!(detect(&id3::tests::tag(16)), None);
    }

    #[test]
    fn weak_tier_can_be_disabled() {
        let tar = tar::tests::header("hello.txt");
        assert_eq!(ext(&tar), Some("tar"));

        let strict = Sniffer::with_options(SniffOptions {
            weak_signatures: false,
            ..SniffOptions::default()
        });
        assert_eq!(strict.detect(&tar), None);
        assert!(strict.rules().iter().all(|r| r.tier == Tier::Strong));
    }

    #[test]
    fn asar_heuristic_toggle() {
        let data = asar::tests::asar(r#"{"files":{"main.js":{"size":1,"offset":"0"}}}"#);
        assert_eq!(ext(&data), Some("asar"));

        let no_asar = Sniffer::with_options(SniffOptions {
            asar_heuristic: false,
            ..SniffOptions::default()
        });
        assert_ne!(no_asar.detect(&data).map(|k| k.extension), Some("asar"));
    }

    #[test]
    fn mpeg_audio_is_last_resort() {
        assert_eq!(ext(&[0xFF, 0xFB, 0x90, 0x64]), Some("mp3"));
        assert_eq!(ext(&[0xFF, 0xF1, 0x50, 0x80]), Some("aac"));
        // JPEG wins over the frame sync
        assert_eq!(ext(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("jpg"));
    }

    #[test]
    fn deterministic() {
        let sniffer = Sniffer::new();
        let data = png::tests::png(true);
        let first = sniffer.sniff(&data);
        for _ in 0..8 {
            assert_eq!(sniffer.sniff(&data), first);
        }
    }

    #[test]
    fn sniffer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Sniffer>();
    }
}
