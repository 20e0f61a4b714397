//! Configuration management for the credit risk pipeline

use anyhow::{bail, Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

use crate::explain::DEFAULT_TOP_REASONS;

/// Lowest decision threshold a caller may configure.
pub const THRESHOLD_FLOOR: f64 = 0.01;
/// Highest decision threshold a caller may configure.
pub const THRESHOLD_CEIL: f64 = 0.99;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub model: ModelConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub business: BusinessConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Model bundle configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the serialized model bundle (JSON)
    pub bundle_path: String,
}

/// Decision policy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Decision threshold override; falls back to the cutoff stored in
    /// the model bundle when unset
    #[serde(default)]
    pub threshold: Option<f64>,
    /// Number of reasons shown per explained decision
    #[serde(default = "default_top_reasons")]
    pub top_reasons: usize,
}

/// Business parameters for the executive summary
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessConfig {
    /// Average credit ticket (R$)
    #[serde(default = "default_avg_ticket")]
    pub avg_ticket: f64,
    /// Average loss per defaulted contract (R$)
    #[serde(default = "default_avg_default_loss")]
    pub avg_default_loss: f64,
    /// Fraction of approved contracts expected to default
    #[serde(default = "default_expected_default_rate")]
    pub expected_default_rate: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_top_reasons() -> usize {
    DEFAULT_TOP_REASONS
}

fn default_avg_ticket() -> f64 {
    15_000.0
}

fn default_avg_default_loss() -> f64 {
    12_000.0
}

fn default_expected_default_rate() -> f64 {
    0.25
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        let config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(threshold) = self.scoring.threshold {
            if !(THRESHOLD_FLOOR..=THRESHOLD_CEIL).contains(&threshold) {
                bail!(
                    "scoring.threshold {} outside allowed range [{}, {}]",
                    threshold,
                    THRESHOLD_FLOOR,
                    THRESHOLD_CEIL
                );
            }
        }
        if self.business.avg_ticket <= 0.0 || self.business.avg_default_loss <= 0.0 {
            bail!("business parameters must be positive");
        }
        if !(0.0..=1.0).contains(&self.business.expected_default_rate) {
            bail!(
                "business.expected_default_rate {} outside [0, 1]",
                self.business.expected_default_rate
            );
        }
        Ok(())
    }

    /// Threshold to score with: the configured override, or the cutoff
    /// stored in the model bundle.
    pub fn resolve_threshold(&self, bundle_default: f64) -> f64 {
        self.scoring.threshold.unwrap_or(bundle_default)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                bundle_path: "models/credit_risk_bundle.json".to_string(),
            },
            scoring: ScoringConfig::default(),
            business: BusinessConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            threshold: None,
            top_reasons: default_top_reasons(),
        }
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            avg_ticket: default_avg_ticket(),
            avg_default_loss: default_avg_default_loss(),
            expected_default_rate: default_expected_default_rate(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
