use crate::catalog::Language;
use crate::output::ExportFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Statistics reporting settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StatisticsConfig {
    /// Print the statistical summary to stdout
    #[serde(default)]
    pub print: bool,
    /// Optional path to save the statistics as JSON
    #[serde(default)]
    pub output: Option<String>,
}

/// Batch run configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Language code for labels and question texts (en, de, fr)
    #[serde(default = "default_language")]
    pub language: String,
    /// Export format for evaluation results
    #[serde(default)]
    pub format: ExportFormat,
    /// Evaluate batch items on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
    /// Statistics reporting
    #[serde(default)]
    pub statistics: StatisticsConfig,
}

fn default_language() -> String {
    Language::En.code().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            format: ExportFormat::default(),
            parallel: false,
            statistics: StatisticsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    /// Resolved language; unsupported codes fall back to English
    pub fn language(&self) -> Language {
        if !Language::is_supported(&self.language) {
            warn!(code = %self.language, "Unsupported language code, falling back to en");
        }
        Language::from_code(&self.language)
    }
}
