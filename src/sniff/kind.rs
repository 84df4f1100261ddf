//! Detection results and coarse type categories.

use std::fmt;

use colored::Color;
use serde::Serialize;

/// The outcome of a successful sniff: a file extension and a MIME type.
///
/// The extension may be empty when a format has no conventional one
/// (raw ELF binaries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FileKind {
    pub extension: &'static str,
    pub mime: &'static str,
}

impl FileKind {
    /// What callers should assume when nothing matched
    pub const OCTET_STREAM: FileKind = FileKind::new("", "application/octet-stream");

    pub const fn new(extension: &'static str, mime: &'static str) -> Self {
        Self { extension, mime }
    }

    /// Coarse category for display and filtering
    pub fn file_type(&self) -> FileType {
        FileType::from_kind(self)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.extension.is_empty() {
            write!(f, "{}", self.mime)
        } else {
            write!(f, "{} ({})", self.extension, self.mime)
        }
    }
}

/// File type categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileType {
    Image,
    Video,
    Audio,
    Document,
    Archive,
    Font,
    Executable,
    Model,
    Other,
}

impl FileType {
    /// Categorize a detection, by MIME top-level type first and then by
    /// extension for the `application/*` families.
    pub fn from_kind(kind: &FileKind) -> Self {
        let top = kind.mime.split('/').next().unwrap_or_default();
        match top {
            "image" => return FileType::Image,
            "video" => return FileType::Video,
            "audio" => return FileType::Audio,
            "font" => return FileType::Font,
            "model" => return FileType::Model,
            "text" => return FileType::Document,
            _ => {}
        }

        if kind.mime == "application/x-elf" {
            return FileType::Executable;
        }

        match kind.extension {
            // Archives
            "zip" | "tar" | "gz" | "7z" | "rar" | "bz2" | "xz" | "lz" | "zst" | "Z" | "cab"
            | "dmg" | "ar" | "deb" | "rpm" | "lzh" | "asar" | "cfb" => FileType::Archive,

            // Documents
            "pdf" | "ai" | "ps" | "eps" | "docx" | "xlsx" | "pptx" | "odt" | "ods" | "odp"
            | "epub" | "mobi" | "rtf" | "xml" | "chm" | "indd" | "pgp" => FileType::Document,

            // Executables
            "exe" | "wasm" | "crx" | "xpi" | "nes" => FileType::Executable,

            // Audio/video containers behind application/* MIME types
            "ogx" | "asf" | "mxf" => FileType::Video,

            "eot" => FileType::Font,
            "blend" | "skp" => FileType::Model,

            _ => FileType::Other,
        }
    }

    /// Get color for terminal display
    pub fn color(&self) -> Color {
        match self {
            FileType::Image => Color::Magenta,
            FileType::Video => Color::Cyan,
            FileType::Audio => Color::Yellow,
            FileType::Document => Color::Green,
            FileType::Archive => Color::Blue,
            FileType::Font => Color::BrightMagenta,
            FileType::Executable => Color::BrightRed,
            FileType::Model => Color::BrightCyan,
            FileType::Other => Color::White,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileType::Image => "image",
            FileType::Video => "video",
            FileType::Audio => "audio",
            FileType::Document => "document",
            FileType::Archive => "archive",
            FileType::Font => "font",
            FileType::Executable => "executable",
            FileType::Model => "model",
            FileType::Other => "other",
        }
    }
}
