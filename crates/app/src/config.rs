use std::path::{Path, PathBuf};

use anyhow::Context;
use finlens_loan::LoanPolicy;
use finlens_ocr::{DEFAULT_LANGUAGE, MULTILINGUAL_LANGUAGE};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model_path: PathBuf,
    /// Converted statement CSVs land here.
    pub output_dir: PathBuf,
    pub ocr: OcrConfig,
    pub translation: TranslationConfig,
    pub loan: LoanPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/loan_approval_model.json"),
            output_dir: PathBuf::from("processed_data"),
            ocr: OcrConfig::default(),
            translation: TranslationConfig::default(),
            loan: LoanPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub language: String,
    pub multilingual_language: String,
    pub tessdata_path: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            multilingual_language: MULTILINGUAL_LANGUAGE.to_string(),
            tessdata_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Base URL of a LibreTranslate-compatible service. Text passes through
    /// untranslated when unset.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub target: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self { endpoint: None, api_key: None, target: "en".to_string() }
    }
}

impl AppConfig {
    /// An explicit path must exist. Otherwise the per-user config file is
    /// used when present, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }
}

/// `<user config dir>/finlens/config.toml`
pub fn default_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("finlens").join(CONFIG_FILE))
}
