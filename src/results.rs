// src/results.rs

use chrono::{NaiveDateTime, Utc};
use log::info;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::models::{Category, Mention, Tier, TierCluster};

/// Cluster statistics for one tier
#[derive(Debug, Clone, PartialEq)]
pub struct TierStats {
    pub tier: Tier,
    pub threshold: f64,
    pub mentions: usize,
    pub clusters: usize,
    /// Number of raw mentions in the largest cluster
    pub largest_cluster_size: usize,
    pub singleton_clusters: usize,
}

/// Complete pipeline run statistics
#[derive(Debug, Clone)]
pub struct PipelineStats {
    pub run_id: String,
    pub run_timestamp: NaiveDateTime,

    pub total_mentions: usize,
    pub total_clusters: usize,
    /// Mentions per category, in candidate-label order
    pub category_counts: Vec<(Category, usize)>,
    pub tier_stats: Vec<TierStats>,

    // Seconds
    pub categorization_time: f64,
    pub normalization_time: f64,
    pub grouping_time: f64,
    pub total_processing_time: f64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            run_timestamp: Utc::now().naive_utc(),
            total_mentions: 0,
            total_clusters: 0,
            category_counts: Category::ALL.into_iter().map(|c| (c, 0)).collect(),
            tier_stats: Vec::new(),
            categorization_time: 0.0,
            normalization_time: 0.0,
            grouping_time: 0.0,
            total_processing_time: 0.0,
        }
    }

    /// Fills the count fields from the normalized mentions and the clusters
    /// produced for them.
    pub fn record_counts(
        &mut self,
        mentions: &[Mention],
        clusters: &[TierCluster],
        config: &EngineConfig,
    ) {
        self.total_mentions = mentions.len();
        self.total_clusters = clusters.len();
        self.category_counts = count_by_category(mentions);
        self.tier_stats = Tier::ALL
            .into_iter()
            .map(|tier| tier_stats(tier, config.threshold(tier), mentions, clusters))
            .collect();
    }

    pub fn category_count(&self, category: Category) -> usize {
        self.category_counts
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn tier(&self, tier: Tier) -> Option<&TierStats> {
        self.tier_stats.iter().find(|s| s.tier == tier)
    }
}

impl Default for PipelineStats {
    fn default() -> Self {
        Self::new()
    }
}

fn count_by_category(mentions: &[Mention]) -> Vec<(Category, usize)> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let count = mentions.iter().filter(|m| m.category == category).count();
            (category, count)
        })
        .collect()
}

fn tier_stats(tier: Tier, threshold: f64, mentions: &[Mention], clusters: &[TierCluster]) -> TierStats {
    let tier_clusters: Vec<&TierCluster> = clusters.iter().filter(|c| c.tier == tier).collect();

    TierStats {
        tier,
        threshold,
        mentions: mentions.iter().filter(|m| m.tier() == tier).count(),
        clusters: tier_clusters.len(),
        largest_cluster_size: tier_clusters
            .iter()
            .map(|c| c.mentions.len())
            .max()
            .unwrap_or(0),
        singleton_clusters: tier_clusters.iter().filter(|c| c.mentions.len() == 1).count(),
    }
}

/// Logs a summary of the run
pub fn log_report(stats: &PipelineStats) {
    info!("========== ENTITY NORMALIZATION REPORT ==========");
    info!("Run ID: {}", stats.run_id);
    info!("Timestamp: {}", stats.run_timestamp);

    info!("--- GENERAL STATISTICS ---");
    info!("Total mentions processed: {}", stats.total_mentions);
    info!("Total clusters formed: {}", stats.total_clusters);

    info!("--- CATEGORIES ---");
    for (category, count) in &stats.category_counts {
        info!("  {}: {}", category, count);
    }

    info!("--- TIERS ---");
    for tier in &stats.tier_stats {
        info!(
            "  {} tier (threshold {:.2}): {} mentions, {} clusters, largest {}, singletons {}",
            tier.tier,
            tier.threshold,
            tier.mentions,
            tier.clusters,
            tier.largest_cluster_size,
            tier.singleton_clusters
        );
    }

    info!("--- TIMING INFORMATION ---");
    info!("Categorization time: {:.2} seconds", stats.categorization_time);
    info!("Normalization time: {:.2} seconds", stats.normalization_time);
    info!("Grouping time: {:.2} seconds", stats.grouping_time);
    info!("Total processing time: {:.2} seconds", stats.total_processing_time);
    info!("=================================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention(raw: &str, category: Category) -> Mention {
        Mention {
            raw: raw.to_string(),
            category,
            normalized: raw.to_lowercase(),
        }
    }

    fn cluster(tier: Tier, group_index: usize, mentions: &[&str]) -> TierCluster {
        TierCluster {
            tier,
            group_index,
            representative: mentions[0].to_lowercase(),
            mentions: mentions.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_record_counts() {
        let mentions = vec![
            mention("Acme", Category::Company),
            mention("ACME", Category::Company),
            mention("Paris", Category::Place),
            mention("SN1", Category::SerialNumber),
        ];
        let clusters = vec![
            cluster(Tier::Low, 0, &["Acme", "ACME"]),
            cluster(Tier::Low, 2, &["Paris"]),
            cluster(Tier::High, 0, &["SN1"]),
        ];

        let mut stats = PipelineStats::new();
        stats.record_counts(&mentions, &clusters, &EngineConfig::default());

        assert_eq!(stats.total_mentions, 4);
        assert_eq!(stats.total_clusters, 3);
        assert_eq!(stats.category_count(Category::Company), 2);
        assert_eq!(stats.category_count(Category::StreetAddress), 0);

        let low = stats.tier(Tier::Low).unwrap();
        assert_eq!(low.mentions, 3);
        assert_eq!(low.clusters, 2);
        assert_eq!(low.largest_cluster_size, 2);
        assert_eq!(low.singleton_clusters, 1);

        let high = stats.tier(Tier::High).unwrap();
        assert_eq!(high.threshold, 0.99);
        assert_eq!(high.clusters, 1);
    }

    #[test]
    fn test_new_stats_have_unique_run_ids() {
        assert_ne!(PipelineStats::new().run_id, PipelineStats::new().run_id);
        assert_eq!(PipelineStats::new().category_counts.len(), 5);
    }
}
