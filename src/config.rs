// src/config.rs

use anyhow::Result;
use log::info;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

use crate::error::{validate_threshold, ResolutionError};
use crate::models::Tier;

// Labels offered to the classifier, best-known order first
pub const CANDIDATE_LABELS: [&str; 5] = [
    "serial number",
    "street address",
    "city or country",
    "physical goods",
    "company",
];

// Minimum cosine similarity for linking mentions within a tier
pub const LOW_TIER_THRESHOLD: f64 = 0.20;
pub const HIGH_TIER_THRESHOLD: f64 = 0.99;

// Line that ends interactive input collection
pub const INPUT_TERMINATOR: &str = "DONE";

// Character n-gram width used by the TF-IDF grouper
pub const NGRAM_SIZE: usize = 3;

// normalized_entities20240131-235959.csv
pub const OUTPUT_FILE_PREFIX: &str = "normalized_entities";
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

pub const DEFAULT_CLASSIFIER_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-mnli";
pub const DEFAULT_CLASSIFIER_CONCURRENCY: usize = 1;
pub const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 60;

/// Which classification capability backs the categorizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ClassifierKind {
    /// Local regex and indicator-table scoring
    Keyword,
    /// Zero-shot classification over HTTP
    Remote,
}

impl FromStr for ClassifierKind {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keyword" => Ok(ClassifierKind::Keyword),
            "remote" => Ok(ClassifierKind::Remote),
            _ => Err(ResolutionError::InvalidConfig {
                key: "NORMALIZER_CLASSIFIER".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Runtime configuration for a resolution run.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub classifier: ClassifierKind,
    /// Zero-shot endpoint; validated as a URL when loaded
    pub classifier_url: String,
    /// Bearer token for the remote classifier, if any
    pub api_token: Option<String>,
    /// Maximum number of classification requests in flight
    pub classifier_concurrency: usize,
    pub classifier_timeout_secs: u64,
    pub low_threshold: f64,
    pub high_threshold: f64,
    pub output_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierKind::Keyword,
            classifier_url: DEFAULT_CLASSIFIER_URL.to_string(),
            api_token: None,
            classifier_concurrency: DEFAULT_CLASSIFIER_CONCURRENCY,
            classifier_timeout_secs: DEFAULT_CLASSIFIER_TIMEOUT_SECS,
            low_threshold: LOW_TIER_THRESHOLD,
            high_threshold: HIGH_TIER_THRESHOLD,
            output_dir: PathBuf::from("."),
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup. Missing keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let classifier = match lookup("NORMALIZER_CLASSIFIER") {
            Some(value) => value.parse::<ClassifierKind>()?,
            None => defaults.classifier,
        };

        let classifier_url = match lookup("NORMALIZER_CLASSIFIER_URL") {
            Some(value) => {
                let parsed = Url::parse(value.trim()).map_err(|_| ResolutionError::InvalidConfig {
                    key: "NORMALIZER_CLASSIFIER_URL".to_string(),
                    value: value.clone(),
                })?;
                parsed.to_string()
            }
            None => defaults.classifier_url,
        };

        let config = Self {
            classifier,
            classifier_url,
            api_token: lookup("HF_API_TOKEN").filter(|t| !t.trim().is_empty()),
            classifier_concurrency: parse_or(
                &lookup,
                "NORMALIZER_CLASSIFIER_CONCURRENCY",
                defaults.classifier_concurrency,
            )?,
            classifier_timeout_secs: parse_or(
                &lookup,
                "NORMALIZER_CLASSIFIER_TIMEOUT_SECS",
                defaults.classifier_timeout_secs,
            )?,
            low_threshold: parse_or(&lookup, "NORMALIZER_LOW_THRESHOLD", defaults.low_threshold)?,
            high_threshold: parse_or(&lookup, "NORMALIZER_HIGH_THRESHOLD", defaults.high_threshold)?,
            output_dir: lookup("NORMALIZER_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        };

        config.validate()?;
        Ok(config)
    }

    /// Threshold configured for a tier.
    pub fn threshold(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Low => self.low_threshold,
            Tier::High => self.high_threshold,
        }
    }

    pub fn validate(&self) -> Result<(), ResolutionError> {
        validate_threshold(Tier::Low, self.low_threshold)?;
        validate_threshold(Tier::High, self.high_threshold)?;
        if self.classifier_concurrency == 0 {
            return Err(ResolutionError::InvalidConfig {
                key: "NORMALIZER_CLASSIFIER_CONCURRENCY".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn log_config(&self) {
        info!(
            "Engine config: classifier={:?}, concurrency={}, thresholds low={} high={}, output_dir={}",
            self.classifier,
            self.classifier_concurrency,
            self.low_threshold,
            self.high_threshold,
            self.output_dir.display()
        );
        if self.classifier == ClassifierKind::Remote {
            info!(
                "Remote classifier endpoint: {} (token {})",
                self.classifier_url,
                if self.api_token.is_some() { "set" } else { "not set" }
            );
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ResolutionError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|_| ResolutionError::InvalidConfig {
                key: key.to_string(),
                value,
            })
        }
        None => Ok(default),
    }
}
