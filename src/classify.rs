use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Top label and its confidence, in `[0, 1]`. Used once to pick a category
/// for the explanation prompt, then discarded.
#[derive(Debug, Clone)]
pub struct Classification {
    pub label: String,
    pub score: f64,
}

#[async_trait]
pub trait TopicClassifier: Send + Sync {
    async fn classify(&self, text: &str, labels: &[String]) -> Result<Classification>;
}

/// Zero-shot classification through the Hugging Face inference API.
#[derive(Debug, Clone)]
pub struct HfZeroShotClassifier {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Debug, Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ZeroShotResponse {
    labels: Vec<String>,
    scores: Vec<f64>,
}

impl HfZeroShotClassifier {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl TopicClassifier for HfZeroShotClassifier {
    async fn classify(&self, text: &str, labels: &[String]) -> Result<Classification> {
        let request = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters {
                candidate_labels: labels,
            },
        };

        let response = self
            .client
            .post(format!(
                "https://api-inference.huggingface.co/models/{}",
                self.model
            ))
            .header("Authorization", format!("Bearer {}", &self.api_key))
            .json(&request)
            .send()
            .await
            .context("Failed to send request to classifier API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Classifier API error ({}): {}", status, body);
        }

        let api_response: ZeroShotResponse = response
            .json()
            .await
            .context("Failed to parse classifier response")?;

        // Labels come back sorted by score, highest first.
        match (api_response.labels.first(), api_response.scores.first()) {
            (Some(label), Some(&score)) => Ok(Classification {
                label: label.clone(),
                score,
            }),
            _ => anyhow::bail!("Classifier returned no labels"),
        }
    }
}
