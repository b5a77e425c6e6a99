// src/pipeline.rs

use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

use crate::classification::{categorize_mentions, Classifier};
use crate::config::EngineConfig;
use crate::grouping::SimilarityGrouper;
use crate::merger::{assign_cluster_ids, cluster_by_tier};
use crate::models::{ClusterRow, Mention};
use crate::normalization::normalize_mentions;
use crate::results::PipelineStats;

/// Everything a completed run produces.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Categorized and normalized mentions, in input order
    pub mentions: Vec<Mention>,
    /// Final cluster table, Low tier first, ids unique across the table
    pub rows: Vec<ClusterRow>,
    pub stats: PipelineStats,
}

/// Runs Categorize, Normalize, Partition, Group and Concatenate over the
/// collected mentions.
///
/// An empty input returns an empty table without calling the classifier or
/// the grouper. Any stage failure aborts the run and nothing is returned.
///
/// # Arguments
/// * `raw_mentions` - Mentions in input order, terminator already removed
/// * `classifier` - Classification capability used by the categorizer
/// * `grouper` - Similarity-grouping capability used per tier
/// * `config` - Thresholds and classifier concurrency
pub async fn resolve_mentions(
    raw_mentions: &[String],
    classifier: &dyn Classifier,
    grouper: &dyn SimilarityGrouper,
    config: &EngineConfig,
) -> Result<Resolution> {
    let start_time = Instant::now();
    let mut stats = PipelineStats::new();
    config.validate()?;

    if raw_mentions.is_empty() {
        info!("No mentions collected, producing an empty cluster table");
        stats.total_processing_time = start_time.elapsed().as_secs_f64();
        return Ok(Resolution {
            mentions: Vec::new(),
            rows: Vec::new(),
            stats,
        });
    }

    info!("Phase 1: Categorization");
    let phase1_start = Instant::now();
    let categories = categorize_mentions(classifier, raw_mentions, config.classifier_concurrency)
        .await
        .context("Categorization failed")?;
    stats.categorization_time = phase1_start.elapsed().as_secs_f64();

    info!("Phase 2: Normalization");
    let phase2_start = Instant::now();
    let mentions = normalize_mentions(raw_mentions, &categories);
    stats.normalization_time = phase2_start.elapsed().as_secs_f64();

    info!("Phase 3: Grouping with the {} grouper", grouper.name());
    let phase3_start = Instant::now();
    let clusters = cluster_by_tier(grouper, &mentions, config).context("Grouping failed")?;
    let rows = assign_cluster_ids(&clusters);
    stats.grouping_time = phase3_start.elapsed().as_secs_f64();

    stats.record_counts(&mentions, &clusters, config);
    stats.total_processing_time = start_time.elapsed().as_secs_f64();
    info!(
        "Resolved {} mentions into {} clusters in {:.2?}",
        mentions.len(),
        rows.len(),
        start_time.elapsed()
    );

    Ok(Resolution {
        mentions,
        rows,
        stats,
    })
}
