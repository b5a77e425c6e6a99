// src/grouping/mod.rs

pub mod tfidf;
pub mod vectorizer;

pub use tfidf::TfidfGrouper;

use anyhow::{bail, Result};
use std::collections::BTreeMap;

use crate::models::{GroupAssignment, Mention, Tier, TierCluster};

/// Capability that partitions a sequence of strings into similarity groups.
///
/// Implementations must return exactly one assignment per input string, in
/// input order, and must be deterministic for a given input and threshold.
/// Raising the threshold may only split groups, never merge them.
pub trait SimilarityGrouper: Send + Sync {
    /// # Arguments
    /// * `strings` - Non-empty sequence of normalized strings
    /// * `threshold` - Minimum similarity in [0, 1] for two strings to be linked
    ///
    /// # Returns
    /// One `GroupAssignment` per input string
    fn group(&self, strings: &[String], threshold: f64) -> Result<Vec<GroupAssignment>>;

    fn name(&self) -> &str;
}

/// Groups the normalized text of one tier's mentions and aggregates the raw
/// mentions per group.
///
/// Clusters are ordered by tier-local group index; raw mentions inside a
/// cluster keep their input order.
pub fn group_mentions(
    grouper: &dyn SimilarityGrouper,
    tier: Tier,
    mentions: &[&Mention],
    threshold: f64,
) -> Result<Vec<TierCluster>> {
    let normalized: Vec<String> = mentions.iter().map(|m| m.normalized.clone()).collect();
    let assignments = grouper.group(&normalized, threshold)?;

    if assignments.len() != mentions.len() {
        bail!(
            "Grouper '{}' returned {} assignments for {} {} tier mentions",
            grouper.name(),
            assignments.len(),
            mentions.len(),
            tier
        );
    }

    let mut groups: BTreeMap<(usize, String), Vec<String>> = BTreeMap::new();
    for (mention, assignment) in mentions.iter().zip(assignments) {
        groups
            .entry((assignment.group_index, assignment.representative))
            .or_default()
            .push(mention.raw.clone());
    }

    Ok(groups
        .into_iter()
        .map(|((group_index, representative), raw_mentions)| TierCluster {
            tier,
            group_index,
            representative,
            mentions: raw_mentions,
        })
        .collect())
}
