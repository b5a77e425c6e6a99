// src/classification/keyword.rs

use anyhow::Result;
use async_trait::async_trait;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Classifier, LabelScore};
use crate::models::Category;

// Score every label starts with before any evidence. Makes a bare word
// without indicators rank as a company.
const CATEGORY_PRIORS: [(Category, f64); 5] = [
    (Category::SerialNumber, 0.0),
    (Category::StreetAddress, 0.05),
    (Category::Place, 0.1),
    (Category::PhysicalGood, 0.15),
    (Category::Company, 0.2),
];

// (category, pattern, weight). Each pattern counts at most once per mention.
const INDICATOR_PATTERNS: [(Category, &str, f64); 16] = [
    // Serial numbers
    (Category::SerialNumber, r"(?i)^\s*(sn|s/n|serial|ser|part|p/n|model)\b", 3.0),
    (
        Category::SerialNumber,
        r"^\s*[A-Za-z0-9]*(?:[A-Za-z][-/._]?[0-9]|[0-9][-/._]?[A-Za-z])[A-Za-z0-9\-/._]*\s*$",
        2.5,
    ),
    (Category::SerialNumber, r"^\s*[0-9][0-9\-/.]{5,}\s*$", 2.0),
    // Street addresses
    (Category::StreetAddress, r"^\s*\d+[A-Za-z]?\s+[A-Za-z]", 1.5),
    (
        Category::StreetAddress,
        r"(?i)\b(street|st|avenue|ave|road|rd|boulevard|blvd|lane|ln|drive|dr|way|court|ct|place|pl|terrace|parkway|pkwy|highway|hwy|square|sq|suite|ste|apt|floor)\b",
        2.0,
    ),
    (Category::StreetAddress, r"(?i)\bp\.?\s?o\.?\s+box\b", 3.0),
    (Category::StreetAddress, r"\b\d{5}(-\d{4})?\b", 0.5),
    // Cities and countries
    (
        Category::Place,
        r"(?i)\b(city|town|village|county|province|state|republic|kingdom|island|islands|country|region)\b",
        1.5,
    ),
    (
        Category::Place,
        r"(?i)\b(usa|united states|america|canada|mexico|brazil|argentina|france|germany|italy|spain|portugal|netherlands|belgium|switzerland|austria|sweden|norway|denmark|finland|poland|ireland|england|scotland|uk|united kingdom|russia|china|japan|korea|india|australia|egypt|nigeria|kenya|new york|los angeles|chicago|houston|seattle|london|paris|berlin|madrid|rome|tokyo|beijing|shanghai|mumbai|delhi|sydney|toronto)\b",
        2.0,
    ),
    // Physical goods
    (
        Category::PhysicalGood,
        r"(?i)\b(phone|laptop|computer|tablet|chair|table|desk|bottle|shoe|shirt|jacket|watch|camera|tv|television|monitor|keyboard|mouse|printer|pen|pencil|book|box|bag|cable|charger|battery|tire|tyre|engine|bike|bicycle|car|truck|sofa|lamp|bulb|widget|tool|hammer|drill|glass|cup|mug)e?s?\b",
        2.0,
    ),
    (
        Category::PhysicalGood,
        r"(?i)\b\d+\s?(kg|g|lb|lbs|oz|ml|l|mm|cm|inch|inches|pack|pcs|pieces|units?|gb|tb)\b",
        1.5,
    ),
    // Companies
    (
        Category::Company,
        r"(?i)\b(inc|incorporated|corp|corporation|llc|ltd|limited|plc|gmbh|co|company|ag|llp)\b",
        3.0,
    ),
    (
        Category::Company,
        r"(?i)\b(group|holdings|industries|technologies|technology|systems|solutions|enterprises|partners|bank|airlines|motors|labs|software|consulting)\b",
        1.5,
    ),
    (Category::Company, r"(?i)(&|\band sons\b)", 1.0),
    (Category::Company, r"(?i)\b(brands|foods|pharmaceuticals|energy|media)\b", 1.0),
    (Category::Company, r"(?i)\.(com|io|net)\b", 1.0),
];

struct IndicatorRule {
    category: Category,
    pattern: Regex,
    weight: f64,
}

static INDICATOR_RULES: Lazy<Vec<IndicatorRule>> = Lazy::new(|| {
    INDICATOR_PATTERNS
        .iter()
        .filter_map(|(category, pattern, weight)| match Regex::new(pattern) {
            Ok(re) => Some(IndicatorRule {
                category: *category,
                pattern: re,
                weight: *weight,
            }),
            Err(e) => {
                warn!("Invalid indicator pattern: '{}'. Error: {}", pattern, e);
                None
            }
        })
        .collect()
});

/// Local, deterministic classifier scoring regex indicators per category.
///
/// Stands in for the zero-shot model when no endpoint is available. Scores
/// are normalized to sum to 1 over the offered labels; ties keep the order in
/// which the labels were offered.
#[derive(Debug, Default, Clone)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Raw (unnormalized) evidence score for one category.
    pub fn category_score(&self, text: &str, category: Category) -> f64 {
        let prior = CATEGORY_PRIORS
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, p)| *p)
            .unwrap_or(0.0);

        INDICATOR_RULES
            .iter()
            .filter(|rule| rule.category == category && rule.pattern.is_match(text))
            .fold(prior, |acc, rule| acc + rule.weight)
    }

    /// Ranks the offered labels for `text`, best first.
    pub fn rank(&self, text: &str, candidate_labels: &[&str]) -> Vec<LabelScore> {
        let mut ranked: Vec<LabelScore> = candidate_labels
            .iter()
            .map(|label| LabelScore {
                label: label.to_string(),
                score: Category::from_label(label)
                    .map(|category| self.category_score(text, category))
                    .unwrap_or(0.0),
            })
            .collect();

        let total: f64 = ranked.iter().map(|ls| ls.score).sum();
        if total > 0.0 {
            for entry in ranked.iter_mut() {
                entry.score /= total;
            }
        }

        // Stable sort keeps offered order among equal scores
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(&self, text: &str, candidate_labels: &[&str]) -> Result<Vec<LabelScore>> {
        Ok(self.rank(text, candidate_labels))
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
