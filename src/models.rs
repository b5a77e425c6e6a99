// src/models.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{HIGH_TIER_THRESHOLD, LOW_TIER_THRESHOLD};

//------------------------------------------------------------------------------
// CATEGORIES AND TIERS
//------------------------------------------------------------------------------

/// Fixed semantic type assigned to a mention by the categorizer.
///
/// The label strings are the candidate labels handed to the classifier, in
/// the order they are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    SerialNumber,
    StreetAddress,
    Place,
    PhysicalGood,
    Company,
}

impl Category {
    /// All categories, in candidate-label order.
    pub const ALL: [Category; 5] = [
        Category::SerialNumber,
        Category::StreetAddress,
        Category::Place,
        Category::PhysicalGood,
        Category::Company,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::SerialNumber => "serial number",
            Category::StreetAddress => "street address",
            Category::Place => "city or country",
            Category::PhysicalGood => "physical goods",
            Category::Company => "company",
        }
    }

    /// Maps a classifier label back to its category. Matching is exact.
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.label() == label)
    }

    /// The policy tier of a category. Pure function of the category.
    pub fn tier(&self) -> Tier {
        match self {
            Category::SerialNumber | Category::StreetAddress => Tier::High,
            Category::Place | Category::PhysicalGood | Category::Company => Tier::Low,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Policy group of categories sharing one similarity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Place, PhysicalGood, Company
    Low,
    /// SerialNumber, StreetAddress
    High,
}

impl Tier {
    /// Tiers in the order their clusters are emitted.
    pub const ALL: [Tier; 2] = [Tier::Low, Tier::High];

    pub fn default_threshold(&self) -> f64 {
        match self {
            Tier::Low => LOW_TIER_THRESHOLD,
            Tier::High => HIGH_TIER_THRESHOLD,
        }
    }

    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| c.tier() == *self)
            .collect()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Low => f.write_str("low"),
            Tier::High => f.write_str("high"),
        }
    }
}

//------------------------------------------------------------------------------
// MENTIONS AND CLUSTERS
//------------------------------------------------------------------------------

/// One raw input string after categorization and normalization.
///
/// Built once the normalized text is known and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    /// Raw text exactly as entered
    pub raw: String,

    /// Category chosen by the classifier
    pub category: Category,

    /// Category-dependent cleaned text
    pub normalized: String,
}

impl Mention {
    pub fn tier(&self) -> Tier {
        self.category.tier()
    }
}

/// Output of the grouping capability for a single input string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAssignment {
    /// Tier-local position of the group's representative in the grouped input
    pub group_index: usize,

    /// Normalized string chosen to stand for the group
    pub representative: String,
}

/// A cluster produced by one grouping call, before global numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierCluster {
    pub tier: Tier,
    pub group_index: usize,
    pub representative: String,
    /// Raw mentions in input order
    pub mentions: Vec<String>,
}

impl TierCluster {
    /// Raw mentions joined the way they are written out.
    pub fn joined_mentions(&self) -> String {
        self.mentions.join("; ")
    }
}

/// Final artifact of the pipeline: one row per cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRow {
    /// Unique across the whole output table
    pub cluster_id: usize,
    pub representative: String,
    /// Raw mentions joined with "; "
    pub mentions: String,
}
