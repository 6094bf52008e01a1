pub mod extract;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod text;
pub mod translate;
pub mod types;

pub use extract::{Extractor, NOT_AVAILABLE};
pub use pipeline::{extension_of, DocumentPipeline, DocumentResult, PipelineError};
pub use preprocess::{prepare_for_ocr, PreprocessError};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, UnavailableRecognizer};
pub use text::{TextError, TextExtractor, DEFAULT_LANGUAGE, MULTILINGUAL_LANGUAGE};
pub use translate::{HttpTranslator, IdentityTranslator, TranslateError, Translator};
pub use types::{ExtractedText, SourceKind};

#[cfg(feature = "tesseract")]
pub use recognizer::tesseract_backend::TesseractRecognizer;
