// src/normalization/mod.rs

pub mod legal_suffix;

use log::{debug, info};
use std::time::Instant;

use crate::models::{Category, Mention};

/// General cleaning applied to every mention, whatever its category.
///
/// 1. Keep only ASCII letters, ASCII digits and whitespace.
/// 2. Lowercase, trim, then replace double spaces with single spaces in one
///    pass. The replace is not repeated, so a run of three or more spaces
///    only shrinks partially ("a   b" becomes "a  b").
pub fn clean_general(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    kept.to_lowercase().trim().replace("  ", " ")
}

/// Normalizes a raw mention according to the rules for its category.
///
/// Pure function of `(raw, category)`.
pub fn normalize(raw: &str, category: Category) -> String {
    let cleaned = clean_general(raw);

    match category {
        Category::SerialNumber => cleaned.chars().filter(|c| !c.is_whitespace()).collect(),
        Category::Company => legal_suffix::clean_name(&cleaned),
        Category::StreetAddress | Category::Place | Category::PhysicalGood => cleaned,
    }
}

/// Builds the mention table from raw strings and their categories.
///
/// # Arguments
/// * `raw_mentions` - Raw input strings in input order
/// * `categories` - Category per mention, parallel to `raw_mentions`
///
/// # Returns
/// * `Vec<Mention>` - One mention per input, same order
pub fn normalize_mentions(raw_mentions: &[String], categories: &[Category]) -> Vec<Mention> {
    let start = Instant::now();
    debug_assert_eq!(raw_mentions.len(), categories.len());

    let mentions: Vec<Mention> = raw_mentions
        .iter()
        .zip(categories.iter())
        .map(|(raw, category)| {
            let normalized = normalize(raw, *category);
            debug!("Normalized '{}' ({}) -> '{}'", raw, category, normalized);
            Mention {
                raw: raw.clone(),
                category: *category,
                normalized,
            }
        })
        .collect();

    let empty_count = mentions.iter().filter(|m| m.normalized.is_empty()).count();
    info!(
        "Normalized {} mentions in {:.2?} ({} normalized to an empty string)",
        mentions.len(),
        start.elapsed(),
        empty_count
    );

    mentions
}
