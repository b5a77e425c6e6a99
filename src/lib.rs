// src/lib.rs
pub mod classification;
pub mod config;
pub mod error;
pub mod grouping;
pub mod input;
pub mod merger;
pub mod models;
pub mod normalization;
pub mod output;
pub mod pipeline;
pub mod results;

// Re-export common types for easier access
pub use models::{Category, ClusterRow, GroupAssignment, Mention, Tier, TierCluster};

// Re-export important functionality
pub use classification::{Classifier, KeywordClassifier, LabelScore, RemoteZeroShotClassifier};
pub use config::{ClassifierKind, EngineConfig};
pub use error::ResolutionError;
pub use grouping::{SimilarityGrouper, TfidfGrouper};
pub use pipeline::{resolve_mentions, Resolution};
