use serde::{Deserialize, Serialize};
use std::fmt;

/// How an upload is turned into text, chosen from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Pdf,
    Image,
    Docx,
}

impl SourceKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Some(SourceKind::Pdf),
            "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" | "webp" => Some(SourceKind::Image),
            "docx" => Some(SourceKind::Docx),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Pdf => write!(f, "pdf"),
            SourceKind::Image => write!(f, "image"),
            SourceKind::Docx => write!(f, "docx"),
        }
    }
}

/// Plain text produced once per upload. Read-only after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedText {
    text: String,
    source: SourceKind,
}

impl ExtractedText {
    pub fn new(text: impl Into<String>, source: SourceKind) -> Self {
        Self { text: text.into(), source }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    /// True when nothing but whitespace came out of the upload.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl AsRef<str> for ExtractedText {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
