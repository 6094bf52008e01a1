use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use zip::ZipArchive;

use crate::preprocess::{self, PreprocessError};
use crate::recognizer::{OcrBackend, OcrError};
use crate::types::{ExtractedText, SourceKind};

pub const DEFAULT_LANGUAGE: &str = "eng";
pub const MULTILINGUAL_LANGUAGE: &str = "eng+hin+tam+kan+tel";

#[derive(Debug, Error)]
pub enum TextError {
    #[error("Unsupported file format: '{0}'")]
    UnsupportedFormat(String),
    #[error("PDF text extraction failed: {0}")]
    Pdf(String),
    #[error("DOCX parsing failed: {0}")]
    Docx(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

/// Turns an uploaded file into plain text.
pub struct TextExtractor<R: OcrBackend> {
    recognizer: R,
    language: String,
}

impl<R: OcrBackend> TextExtractor<R> {
    pub fn new(recognizer: R) -> Self {
        Self { recognizer, language: DEFAULT_LANGUAGE.to_string() }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Extract using the configured OCR language.
    pub fn extract(&self, data: &[u8], ext: &str) -> Result<ExtractedText, TextError> {
        self.extract_with_language(data, ext, &self.language)
    }

    /// Extract with an explicit OCR language, e.g. [`MULTILINGUAL_LANGUAGE`].
    pub fn extract_with_language(
        &self,
        data: &[u8],
        ext: &str,
        language: &str,
    ) -> Result<ExtractedText, TextError> {
        let kind = SourceKind::from_extension(ext)
            .ok_or_else(|| TextError::UnsupportedFormat(ext.to_string()))?;

        let text = match kind {
            SourceKind::Pdf => extract_pdf(data)?,
            SourceKind::Image => {
                let png = preprocess::prepare_for_ocr(data)?;
                self.recognizer.recognize(&png, language)?
            }
            SourceKind::Docx => extract_docx(data)?,
        };

        tracing::debug!(source = %kind, chars = text.len(), "text extracted");
        Ok(ExtractedText::new(text.trim(), kind))
    }
}

fn extract_pdf(data: &[u8]) -> Result<String, TextError> {
    pdf_extract::extract_text_from_mem(data).map_err(|e| TextError::Pdf(e.to_string()))
}

/// Paragraph text of `word/document.xml`, one paragraph per line.
fn extract_docx(data: &[u8]) -> Result<String, TextError> {
    let mut archive =
        ZipArchive::new(Cursor::new(data)).map_err(|e| TextError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| TextError::Docx(e.to_string()))?
        .read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" => current.push('\n'),
                b"w:p" => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let s = t.unescape().map_err(|e| TextError::Docx(e.to_string()))?;
                current.push_str(&s);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(TextError::Docx(e.to_string())),
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::MockRecognizer;
    use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn tiny_png() -> Vec<u8> {
        let img: GrayImage = ImageBuffer::from_fn(4, 4, |x, _| Luma([(x * 60) as u8]));
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let mut buf = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buf));
            zip.start_file("word/document.xml", SimpleFileOptions::default()).unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buf
    }

    /// Records the language it was asked to use.
    struct LanguageEcho;

    impl OcrBackend for LanguageEcho {
        fn recognize(&self, _image_bytes: &[u8], language: &str) -> Result<String, OcrError> {
            Ok(language.to_string())
        }
    }

    #[test]
    fn image_goes_through_ocr_backend() {
        let extractor = TextExtractor::new(MockRecognizer::new("  CGST ₹900.00 \n"));
        let text = extractor.extract(&tiny_png(), "png").unwrap();
        assert_eq!(text.as_str(), "CGST ₹900.00");
        assert_eq!(text.source(), SourceKind::Image);
    }

    #[test]
    fn language_is_forwarded_to_backend() {
        let extractor = TextExtractor::new(LanguageEcho);
        assert_eq!(extractor.extract(&tiny_png(), "jpg").unwrap().as_str(), "eng");

        let multi = extractor
            .extract_with_language(&tiny_png(), "png", MULTILINGUAL_LANGUAGE)
            .unwrap();
        assert_eq!(multi.as_str(), MULTILINGUAL_LANGUAGE);

        let configured = TextExtractor::new(LanguageEcho).with_language("hin");
        assert_eq!(configured.extract(&tiny_png(), "png").unwrap().as_str(), "hin");
    }

    #[test]
    fn docx_paragraphs_are_joined_by_newlines() {
        let body = r#"<w:p><w:r><w:t>Invoice Number : INV-42</w:t></w:r></w:p><w:p/><w:p><w:r><w:t xml:space="preserve">TOTAL: </w:t></w:r><w:r><w:t>&#8377;10.00</w:t></w:r></w:p>"#;
        let extractor = TextExtractor::new(MockRecognizer::new("unused"));
        let text = extractor.extract(&docx_with_body(body), "docx").unwrap();
        assert_eq!(text.as_str(), "Invoice Number : INV-42\n\nTOTAL: ₹10.00");
        assert_eq!(text.source(), SourceKind::Docx);
    }

    #[test]
    fn docx_without_document_part_is_an_error() {
        let mut buf = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buf));
            zip.start_file("other.xml", SimpleFileOptions::default()).unwrap();
            zip.write_all(b"<x/>").unwrap();
            zip.finish().unwrap();
        }
        let extractor = TextExtractor::new(MockRecognizer::new(""));
        assert!(matches!(extractor.extract(&buf, "docx"), Err(TextError::Docx(_))));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let extractor = TextExtractor::new(MockRecognizer::new(""));
        let err = extractor.extract(b"a,b\n1,2", "xlsx").unwrap_err();
        assert!(matches!(err, TextError::UnsupportedFormat(ref e) if e == "xlsx"));
    }

    #[test]
    fn garbage_pdf_is_an_error_not_a_panic() {
        let extractor = TextExtractor::new(MockRecognizer::new(""));
        assert!(extractor.extract(b"definitely not a pdf", "pdf").is_err());
    }
}
