// src/classification/remote.rs

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::{Classifier, LabelScore};

/// Client for a zero-shot classification endpoint speaking the Hugging Face
/// inference API format (e.g. `facebook/bart-large-mnli`).
///
/// One request per mention. No retries: a failed call fails the run, so wrap
/// this type if resilience is needed.
pub struct RemoteZeroShotClassifier {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Debug, Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [&'a str],
    multi_label: bool,
}

#[derive(Debug, Deserialize)]
struct RankedReply {
    labels: Vec<String>,
    scores: Vec<f64>,
}

/// The endpoint answers either with parallel `labels`/`scores` arrays, a list
/// of `{label, score}` pairs, or a one-element list wrapping the first form.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Ranked(RankedReply),
    Pairs(Vec<LabelScore>),
    Wrapped(Vec<RankedReply>),
}

impl ZeroShotResponse {
    fn into_ranking(self) -> Result<Vec<LabelScore>> {
        let mut ranking = match self {
            ZeroShotResponse::Ranked(reply) => reply.into_pairs()?,
            ZeroShotResponse::Pairs(pairs) => pairs,
            ZeroShotResponse::Wrapped(mut replies) => {
                if replies.len() != 1 {
                    bail!("Expected a single classification result, got {}", replies.len());
                }
                replies.remove(0).into_pairs()?
            }
        };

        ranking.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(ranking)
    }
}

impl RankedReply {
    fn into_pairs(self) -> Result<Vec<LabelScore>> {
        if self.labels.len() != self.scores.len() {
            return Err(anyhow!(
                "Classifier returned {} labels but {} scores",
                self.labels.len(),
                self.scores.len()
            ));
        }
        Ok(self
            .labels
            .into_iter()
            .zip(self.scores)
            .map(|(label, score)| LabelScore { label, score })
            .collect())
    }
}

impl RemoteZeroShotClassifier {
    /// Creates a client for the given endpoint.
    ///
    /// # Arguments
    /// * `endpoint` - Full URL of the zero-shot model
    /// * `api_token` - Optional bearer token
    /// * `timeout` - Per-request timeout
    pub fn new(endpoint: &str, api_token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for the classifier")?;

        info!("Remote zero-shot classifier targeting {}", endpoint);
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_token,
        })
    }
}

#[async_trait]
impl Classifier for RemoteZeroShotClassifier {
    async fn classify(&self, text: &str, candidate_labels: &[&str]) -> Result<Vec<LabelScore>> {
        let start = Instant::now();
        let body = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters {
                candidate_labels,
                multi_label: false,
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Request to classifier endpoint {} failed", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("Classifier endpoint returned {}: {}", status, detail.trim());
        }

        let reply: ZeroShotResponse = response
            .json()
            .await
            .context("Failed to parse classifier response")?;
        let ranking = reply.into_ranking()?;

        debug!(
            "Remote classification of '{}' took {:.2?}",
            text,
            start.elapsed()
        );
        Ok(ranking)
    }

    fn name(&self) -> &str {
        "remote zero-shot"
    }
}
