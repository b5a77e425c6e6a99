// src/merger.rs

use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

use crate::config::EngineConfig;
use crate::error::validate_threshold;
use crate::grouping::{group_mentions, SimilarityGrouper};
use crate::models::{ClusterRow, Mention, Tier, TierCluster};

/// Mentions belonging to a tier, in input order.
pub fn tier_subset(mentions: &[Mention], tier: Tier) -> Vec<&Mention> {
    mentions.iter().filter(|m| m.tier() == tier).collect()
}

/// Groups each non-empty tier independently with that tier's threshold.
///
/// Both thresholds are validated before the grouper is called. Clusters of
/// the Low tier come first, then the High tier. A tier with no mentions
/// contributes nothing and the grouper is never called for it.
pub fn cluster_by_tier(
    grouper: &dyn SimilarityGrouper,
    mentions: &[Mention],
    config: &EngineConfig,
) -> Result<Vec<TierCluster>> {
    for tier in Tier::ALL {
        validate_threshold(tier, config.threshold(tier))?;
    }

    let mut clusters = Vec::new();
    for tier in Tier::ALL {
        let subset = tier_subset(mentions, tier);
        if subset.is_empty() {
            debug!("No {} tier mentions, skipping grouping", tier);
            continue;
        }

        let threshold = config.threshold(tier);
        let start_time = Instant::now();
        let tier_clusters = group_mentions(grouper, tier, &subset, threshold)
            .with_context(|| format!("Failed to group {} tier mentions", tier))?;

        info!(
            "Grouped {} {} tier mentions into {} clusters at threshold {} in {:.2?}",
            subset.len(),
            tier,
            tier_clusters.len(),
            threshold,
            start_time.elapsed()
        );
        clusters.extend(tier_clusters);
    }

    Ok(clusters)
}

/// Numbers clusters 0, 1, 2, ... in the order given, so identifiers are
/// unique across tiers.
pub fn assign_cluster_ids(clusters: &[TierCluster]) -> Vec<ClusterRow> {
    clusters
        .iter()
        .enumerate()
        .map(|(cluster_id, cluster)| ClusterRow {
            cluster_id,
            representative: cluster.representative.clone(),
            mentions: cluster.joined_mentions(),
        })
        .collect()
}

/// Partitions mentions by tier, groups each tier and concatenates the
/// results into one table with globally unique cluster identifiers.
pub fn merge_clusters(
    grouper: &dyn SimilarityGrouper,
    mentions: &[Mention],
    config: &EngineConfig,
) -> Result<Vec<ClusterRow>> {
    let clusters = cluster_by_tier(grouper, mentions, config)?;
    Ok(assign_cluster_ids(&clusters))
}
