use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub serpapi_api_key: String,
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub chat_model: String,
    pub hf_api_key: String,
    pub classifier_model: String,
    pub labels: Vec<String>,
    pub fallback_label: String,
    pub max_source_links: usize,
    pub article_char_budget: usize,
    pub url_char_budget: usize,
    pub confidence_threshold: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            serpapi_api_key: std::env::var("SERPAPI_API_KEY")
                .context("SERPAPI_API_KEY must be set")?,
            llm_api_key: std::env::var("LLM_API_KEY").context("LLM_API_KEY must be set")?,
            llm_base_url: std::env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://openrouter.ai/api/v1/chat/completions".into()),
            chat_model: std::env::var("CHAT_MODEL")
                .unwrap_or_else(|_| "google/gemini-flash-1.5".into()),
            hf_api_key: std::env::var("HF_API_KEY").unwrap_or_default(),
            classifier_model: std::env::var("CLASSIFIER_MODEL")
                .unwrap_or_else(|_| "typeform/distilbert-base-uncased-mnli".into()),
            labels: std::env::var("TOPIC_LABELS")
                .unwrap_or_else(|_| "Science,Technology,History,Arts,Sports,Health,General".into())
                .split(',')
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect(),
            fallback_label: std::env::var("FALLBACK_LABEL").unwrap_or_else(|_| "General".into()),
            max_source_links: std::env::var("MAX_SOURCE_LINKS")
                .unwrap_or_else(|_| "3".into())
                .parse()
                .context("MAX_SOURCE_LINKS must be a number")?,
            article_char_budget: std::env::var("ARTICLE_CHAR_BUDGET")
                .unwrap_or_else(|_| "8000".into())
                .parse()
                .context("ARTICLE_CHAR_BUDGET must be a number")?,
            url_char_budget: std::env::var("URL_CHAR_BUDGET")
                .unwrap_or_else(|_| "4000".into())
                .parse()
                .context("URL_CHAR_BUDGET must be a number")?,
            confidence_threshold: std::env::var("CONFIDENCE_THRESHOLD")
                .unwrap_or_else(|_| "0.5".into())
                .parse()
                .context("CONFIDENCE_THRESHOLD must be a number")?,
        })
    }
}
