//! typesniff Library
//!
//! Detects a file's extension and MIME type from the first few kilobytes of
//! its content, for upload pipelines that cannot trust client-supplied
//! names or content types.
//!
//! # Features
//!
//! - **Ordered Signature Table**: ~100 magic-byte rules, strong tier first
//! - **Structural Walkers**: ZIP, EBML, PNG, ASF, TAR, ID3 and friends are
//!   parsed just far enough to tell container flavours apart
//! - **Bounded**: no recursion, no panics on truncated input, work linear in
//!   the prefix length
//! - **Upload Boundary**: bearer auth, random object keys, filesystem store
//!   with blake3-stamped metadata
//!
//! # Example
//!
//! ```
//! use typesniff::sniff;
//!
//! let kind = sniff::detect(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n").unwrap();
//! assert_eq!(kind.extension, "pdf");
//! assert_eq!(kind.mime, "application/pdf");
//!
//! // Unknown content falls back to application/octet-stream
//! assert_eq!(sniff::resolve(b"plain text").mime, "application/octet-stream");
//! ```

pub mod cli;
pub mod config;
pub mod sniff;
pub mod upload;

pub use config::Config;
pub use sniff::{detect, resolve, FileKind, FileType, SniffOptions, Sniffer};
pub use upload::{UploadError, UploadRequest, Uploader};
