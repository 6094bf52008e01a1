use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use finlens_core::{DocumentType, FieldMap, TransactionRecord};
use finlens_import::import::{convert_statement, import_statement_csv, ConvertError};
use finlens_import::{analyze, cluster_csv, ClusterError, CsvError, StatementAnalysis};
use finlens_loan::{predict_loan_eligibility, LoanApplication, LoanDecision, RandomForestModel};
use finlens_ocr::{
    extension_of, DocumentPipeline, OcrBackend, PipelineError, TextError, TextExtractor, Translator,
};
use serde::Serialize;

use crate::backends::{self, ConfiguredTranslator};
use crate::config::AppConfig;
use crate::report;

/// Everything a handler needs for one invocation.
pub struct Context {
    pub config: AppConfig,
    pub json: bool,
    pipeline: DocumentPipeline<Box<dyn OcrBackend>>,
}

impl Context {
    pub fn new(config: AppConfig, json: bool) -> Self {
        let recognizer = backends::recognizer(&config.ocr);
        Self::with_recognizer(config, json, recognizer)
    }

    pub fn with_recognizer(config: AppConfig, json: bool, recognizer: Box<dyn OcrBackend>) -> Self {
        let text = TextExtractor::new(recognizer).with_language(config.ocr.language.clone());
        Self { config, json, pipeline: DocumentPipeline::new(text) }
    }

    fn output<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> anyhow::Result<String> {
        if self.json {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(text())
        }
    }
}

/// The two failure messages users see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NoData,
    Processing,
}

impl FailureKind {
    pub fn of(err: &anyhow::Error) -> Self {
        if err.chain().any(is_no_data) {
            FailureKind::NoData
        } else {
            FailureKind::Processing
        }
    }

    pub fn message(self, err: &anyhow::Error) -> String {
        match self {
            FailureKind::NoData => format!("No data found: {err}"),
            FailureKind::Processing => format!("Processing exception: {err:#}"),
        }
    }
}

fn is_no_data(err: &(dyn std::error::Error + 'static)) -> bool {
    if let Some(e) = err.downcast_ref::<PipelineError>() {
        return matches!(e, PipelineError::NoText | PipelineError::Text(TextError::UnsupportedFormat(_)));
    }
    if let Some(e) = err.downcast_ref::<TextError>() {
        return matches!(e, TextError::UnsupportedFormat(_));
    }
    if err.is::<finlens_import::StatementError>() {
        return true;
    }
    if let Some(e) = err.downcast_ref::<ConvertError>() {
        return matches!(e, ConvertError::Statement(_));
    }
    if let Some(e) = err.downcast_ref::<CsvError>() {
        return matches!(e, CsvError::NoDataRows);
    }
    if let Some(e) = err.downcast_ref::<ClusterError>() {
        return matches!(e, ClusterError::Empty | ClusterError::TooFewNumericColumns { .. });
    }
    false
}

// ── Extraction ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ExtractOutput<'a> {
    document_type: DocumentType,
    fields: &'a FieldMap,
}

/// Structured extraction. Bank statements route to [`statement`].
pub async fn extract(ctx: &Context, file: &Path, doc_type: DocumentType) -> anyhow::Result<String> {
    if doc_type.is_tabular() {
        return statement(ctx, file, None).await;
    }

    let result = ctx.pipeline.process_file(file, doc_type).await?;
    if result.fields.is_empty() {
        tracing::warn!(doc_type = %doc_type, "no fields recognized");
    }
    ctx.output(
        &ExtractOutput { document_type: doc_type, fields: &result.fields },
        || report::render_fields(doc_type, &result.fields),
    )
}

// ── Translation ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TranslateOutput<'a> {
    language: &'a str,
    target: &'a str,
    text: &'a str,
    translated: &'a str,
}

/// Multilingual OCR followed by translation.
pub async fn translate(ctx: &Context, file: &Path, target: Option<&str>) -> anyhow::Result<String> {
    let translator = ConfiguredTranslator::from_config(&ctx.config.translation)?;
    translate_with(ctx, &translator, file, target).await
}

pub async fn translate_with(
    ctx: &Context,
    translator: &impl Translator,
    file: &Path,
    target: Option<&str>,
) -> anyhow::Result<String> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    let language = ctx.config.ocr.multilingual_language.as_str();
    let text = ctx
        .pipeline
        .text_extractor()
        .extract_with_language(&bytes, &extension_of(file), language)
        .map_err(PipelineError::from)?;
    if text.is_blank() {
        return Err(PipelineError::NoText.into());
    }

    let target = target.unwrap_or(&ctx.config.translation.target);
    let translated = translator.translate(text.as_str(), target).await?;
    tracing::info!(language, target, "document translated");

    ctx.output(
        &TranslateOutput { language, target, text: text.as_str(), translated: &translated },
        || report::render_translation(text.as_str(), &translated),
    )
}

// ── Bank statements ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct StatementOutput<'a> {
    transactions: &'a [TransactionRecord],
    analysis: &'a StatementAnalysis,
    csv_path: Option<&'a Path>,
}

/// A CSV upload is analysed directly; anything else is parsed from its text
/// and converted to CSV first.
pub async fn statement(
    ctx: &Context,
    file: &Path,
    output_dir: Option<&Path>,
) -> anyhow::Result<String> {
    let (records, csv_path): (Vec<TransactionRecord>, Option<PathBuf>) =
        if extension_of(file) == "csv" {
            let bytes = tokio::fs::read(file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            (import_statement_csv(Cursor::new(bytes))?, None)
        } else {
            let result = ctx.pipeline.process_file(file, DocumentType::BankStatement).await?;
            let dir = output_dir.unwrap_or(&ctx.config.output_dir);
            let (records, path) = convert_statement(result.text.as_str(), dir)?;
            (records, Some(path))
        };

    let analysis = analyze(&records);
    tracing::info!(transactions = records.len(), "statement analysed");

    ctx.output(
        &StatementOutput { transactions: &records, analysis: &analysis, csv_path: csv_path.as_deref() },
        || report::render_statement(&records, &analysis, csv_path.as_deref()),
    )
}

// ── CSV clustering ────────────────────────────────────────────────────────────

/// K-means over two numeric columns of an arbitrary CSV.
pub async fn cluster(
    ctx: &Context,
    file: &Path,
    x: Option<&str>,
    y: Option<&str>,
) -> anyhow::Result<String> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    let table = cluster_csv(Cursor::new(bytes), x, y)?;
    ctx.output(&table, || report::render_clusters(&table))
}

// ── Loan prediction ───────────────────────────────────────────────────────────

pub fn loan(ctx: &Context, application: &LoanApplication, model: Option<&Path>) -> anyhow::Result<String> {
    let path = model.unwrap_or(&ctx.config.model_path);
    let classifier = RandomForestModel::load(path)
        .with_context(|| format!("loading loan model {}", path.display()))?;
    let decision: LoanDecision = predict_loan_eligibility(&classifier, application, &ctx.config.loan)?;
    ctx.output(&decision, || report::render_loan(&decision))
}
