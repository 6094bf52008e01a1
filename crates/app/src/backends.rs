use finlens_ocr::{HttpTranslator, IdentityTranslator, OcrBackend, TranslateError, Translator};

use crate::config::{OcrConfig, TranslationConfig};

/// The OCR engine compiled into this binary.
#[cfg(feature = "tesseract")]
pub fn recognizer(config: &OcrConfig) -> Box<dyn OcrBackend> {
    Box::new(finlens_ocr::TesseractRecognizer::new(config.tessdata_path.clone()))
}

#[cfg(not(feature = "tesseract"))]
pub fn recognizer(_config: &OcrConfig) -> Box<dyn OcrBackend> {
    tracing::debug!("built without tesseract, image uploads will fail");
    Box::new(finlens_ocr::UnavailableRecognizer)
}

/// Translator chosen from config: HTTP when an endpoint is set.
pub enum ConfiguredTranslator {
    Identity(IdentityTranslator),
    Http(HttpTranslator),
}

impl ConfiguredTranslator {
    pub fn from_config(config: &TranslationConfig) -> Result<Self, TranslateError> {
        match config.endpoint.as_deref() {
            Some(endpoint) => Ok(Self::Http(HttpTranslator::new(endpoint, config.api_key.clone())?)),
            None => {
                tracing::warn!("no translation endpoint configured, text is passed through");
                Ok(Self::Identity(IdentityTranslator))
            }
        }
    }
}

impl Translator for ConfiguredTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        match self {
            Self::Identity(t) => t.translate(text, target).await,
            Self::Http(t) => t.translate(text, target).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn without_endpoint_text_passes_through() {
        let t = ConfiguredTranslator::from_config(&TranslationConfig::default()).unwrap();
        assert!(matches!(t, ConfiguredTranslator::Identity(_)));
        assert_eq!(t.translate("नमस्ते", "en").await.unwrap(), "नमस्ते");
    }

    #[test]
    fn endpoint_selects_http() {
        let config = TranslationConfig {
            endpoint: Some("http://localhost:5000".into()),
            ..TranslationConfig::default()
        };
        let t = ConfiguredTranslator::from_config(&config).unwrap();
        assert!(matches!(t, ConfiguredTranslator::Http(_)));
    }

    #[cfg(not(feature = "tesseract"))]
    #[test]
    fn default_recognizer_reports_unavailable() {
        let r = recognizer(&OcrConfig::default());
        assert!(r.recognize(&[], "eng").is_err());
    }
}
