use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// One search result; only the link matters to the fetch pipeline, and
/// results are consumed in provider order with no re-ranking.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub link: String,
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
}

/// Google search via the SerpAPI JSON endpoint.
#[derive(Debug, Clone)]
pub struct SerpApiSearch {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    link: String,
}

impl SerpApiSearch {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl SearchProvider for SerpApiSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .get("https://serpapi.com/search.json")
            .query(&[("q", query), ("api_key", &self.api_key)])
            .send()
            .await
            .context("Failed to send request to SerpAPI")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("SerpAPI error ({}): {}", status, body);
        }

        let api_response: SerpApiResponse = response
            .json()
            .await
            .context("Failed to parse SerpAPI response")?;

        Ok(api_response
            .organic_results
            .into_iter()
            .map(|r| SearchHit { link: r.link })
            .collect())
    }
}
