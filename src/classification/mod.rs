// src/classification/mod.rs

pub mod keyword;
pub mod remote;

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::CANDIDATE_LABELS;
use crate::error::ResolutionError;
use crate::models::Category;

pub use keyword::KeywordClassifier;
pub use remote::RemoteZeroShotClassifier;

/// One entry of a classifier's ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Zero-shot classification capability.
///
/// Implementations return the candidate labels ranked best first. Only the
/// top entry is used by the categorizer.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str, candidate_labels: &[&str]) -> Result<Vec<LabelScore>>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// Assigns a category to every mention.
///
/// At most `concurrency` classification calls are in flight; results come
/// back in input order. The first failure aborts the whole run.
///
/// # Arguments
/// * `classifier` - The classification capability to call once per mention
/// * `mentions` - Raw mentions, terminator already removed
/// * `concurrency` - Maximum in-flight calls (1 classifies sequentially)
///
/// # Returns
/// * `Result<Vec<Category>>` - One category per mention, same order
pub async fn categorize_mentions(
    classifier: &dyn Classifier,
    mentions: &[String],
    concurrency: usize,
) -> Result<Vec<Category>> {
    if mentions.is_empty() {
        info!("No mentions to categorize");
        return Ok(Vec::new());
    }

    let start = Instant::now();
    info!(
        "Categorizing {} mentions with the {} classifier (concurrency {})",
        mentions.len(),
        classifier.name(),
        concurrency.max(1)
    );

    let labels: &[&str] = &CANDIDATE_LABELS;
    let categories: Vec<Category> = stream::iter(mentions.iter())
        .map(|mention| categorize_one(classifier, mention, labels))
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    info!(
        "Categorized {} mentions in {:.2?}",
        categories.len(),
        start.elapsed()
    );
    Ok(categories)
}

async fn categorize_one(
    classifier: &dyn Classifier,
    mention: &str,
    labels: &[&str],
) -> Result<Category> {
    let ranked = classifier
        .classify(mention, labels)
        .await
        .map_err(|e| ResolutionError::ClassificationFailure {
            mention: mention.to_string(),
            reason: format!("{:#}", e),
        })?;

    let top = ranked
        .first()
        .ok_or_else(|| ResolutionError::ClassificationFailure {
            mention: mention.to_string(),
            reason: "classifier returned an empty ranking".to_string(),
        })?;

    let category = Category::from_label(&top.label).ok_or_else(|| {
        ResolutionError::ClassificationFailure {
            mention: mention.to_string(),
            reason: ResolutionError::UnknownLabel {
                label: top.label.clone(),
            }
            .to_string(),
        }
    })?;

    debug!(
        "'{}' -> {} (score {:.3})",
        mention, category, top.score
    );
    Ok(category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FixedClassifier {
        labels: HashMap<String, &'static str>,
        calls: AtomicUsize,
    }

    impl FixedClassifier {
        fn new(pairs: &[(&str, &'static str)]) -> Self {
            Self {
                labels: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Classifier for FixedClassifier {
        async fn classify(&self, text: &str, candidate_labels: &[&str]) -> Result<Vec<LabelScore>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(candidate_labels, &CANDIDATE_LABELS[..]);
            // Later mentions answer sooner, so completion order differs from input order
            let delay = 20u64.saturating_sub(text.len() as u64);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            let label = self
                .labels
                .get(text)
                .ok_or_else(|| anyhow::anyhow!("no label for {}", text))?;
            Ok(vec![LabelScore {
                label: label.to_string(),
                score: 0.9,
            }])
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_categories_follow_input_order_under_concurrency() {
        let classifier = FixedClassifier::new(&[
            ("a", "company"),
            ("bb", "serial number"),
            ("ccc", "street address"),
            ("dddd", "city or country"),
            ("eeeee", "physical goods"),
        ]);
        let mentions: Vec<String> = ["a", "bb", "ccc", "dddd", "eeeee"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let categories = categorize_mentions(&classifier, &mentions, 4).await.unwrap();

        assert_eq!(
            categories,
            vec![
                Category::Company,
                Category::SerialNumber,
                Category::StreetAddress,
                Category::Place,
                Category::PhysicalGood,
            ]
        );
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_no_mentions_means_no_calls() {
        let classifier = FixedClassifier::new(&[]);
        let categories = categorize_mentions(&classifier, &[], 1).await.unwrap();
        assert!(categories.is_empty());
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_classifier_error_is_a_classification_failure() {
        let classifier = FixedClassifier::new(&[("known", "company")]);
        let mentions = vec!["known".to_string(), "unknown".to_string()];

        let err = categorize_mentions(&classifier, &mentions, 1)
            .await
            .unwrap_err();

        match err.downcast_ref::<ResolutionError>() {
            Some(ResolutionError::ClassificationFailure { mention, .. }) => {
                assert_eq!(mention, "unknown")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_label_is_rejected() {
        let classifier = FixedClassifier::new(&[("Bob", "person")]);
        let err = categorize_mentions(&classifier, &["Bob".to_string()], 1)
            .await
            .unwrap_err();

        match err.downcast_ref::<ResolutionError>() {
            Some(ResolutionError::ClassificationFailure { reason, .. }) => {
                assert!(reason.contains("unknown label 'person'"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    struct SilentClassifier;

    #[async_trait]
    impl Classifier for SilentClassifier {
        async fn classify(&self, _text: &str, _labels: &[&str]) -> Result<Vec<LabelScore>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &str {
            "silent"
        }
    }

    #[tokio::test]
    async fn test_empty_ranking_is_rejected() {
        let err = categorize_mentions(&SilentClassifier, &["x".to_string()], 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolutionError>(),
            Some(ResolutionError::ClassificationFailure { .. })
        ));
    }
}
