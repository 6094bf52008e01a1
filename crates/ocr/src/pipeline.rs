use std::path::Path;
use thiserror::Error;

use finlens_core::{DocumentType, FieldMap};

use crate::extract::Extractor;
use crate::recognizer::OcrBackend;
use crate::text::{TextError, TextExtractor};
use crate::types::ExtractedText;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Text(#[from] TextError),
    #[error("No text could be extracted from the upload")]
    NoText,
}

/// The result of a single document processing run.
#[derive(Debug)]
pub struct DocumentResult {
    pub doc_type: DocumentType,
    pub text: ExtractedText,
    /// Empty for bank statements, which are parsed into transactions instead.
    pub fields: FieldMap,
}

/// Orchestrates: read → text extraction → field extraction.
pub struct DocumentPipeline<R: OcrBackend> {
    text: TextExtractor<R>,
}

impl<R: OcrBackend> DocumentPipeline<R> {
    pub fn new(text: TextExtractor<R>) -> Self {
        Self { text }
    }

    pub fn text_extractor(&self) -> &TextExtractor<R> {
        &self.text
    }

    /// Process a file on disk.
    pub async fn process_file(
        &self,
        path: &Path,
        doc_type: DocumentType,
    ) -> Result<DocumentResult, PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        let ext = extension_of(path);
        self.process_bytes(&bytes, &ext, doc_type)
    }

    /// Process raw upload bytes.
    pub fn process_bytes(
        &self,
        data: &[u8],
        ext: &str,
        doc_type: DocumentType,
    ) -> Result<DocumentResult, PipelineError> {
        let text = self.text.extract(data, ext)?;
        if text.is_blank() {
            return Err(PipelineError::NoText);
        }

        let fields = Extractor::extract(text.as_str(), doc_type);
        tracing::info!(doc_type = %doc_type, fields = fields.len(), "document processed");

        Ok(DocumentResult { doc_type, text, fields })
    }
}

/// Lower-cased extension, or `bin` when the path has none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin")
        .to_lowercase()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
