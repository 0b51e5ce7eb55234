use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches a page and reduces it to its readable paragraph text.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// reqwest-backed fetcher; extraction keeps `<p>` element text only, all
/// other page structure is discarded.
#[derive(Debug, Clone, Default)]
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", "Mozilla/5.0")
            .send()
            .await
            .context("Failed to fetch URL")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP error {} fetching {}", status, url);
        }

        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        Ok(extract_paragraphs(&body))
    }
}

/// Paragraph-level text extraction: the text of every `<p>` element, joined
/// by single spaces.
pub fn extract_paragraphs(html: &str) -> String {
    let document = Html::parse_document(html);
    let paragraph = Selector::parse("p").unwrap();

    document
        .select(&paragraph)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_paragraph_text() {
        let html = r#"
            <html><head><title>Ignored</title></head>
            <body>
                <h1>Heading ignored</h1>
                <p>First paragraph.</p>
                <div><span>Also ignored</span><p>Second <b>paragraph</b>.</p></div>
                <script>var ignored = true;</script>
            </body></html>
        "#;
        assert_eq!(
            extract_paragraphs(html),
            "First paragraph. Second paragraph."
        );
    }

    #[test]
    fn page_without_paragraphs_yields_empty_text() {
        assert_eq!(extract_paragraphs("<html><body><h1>hi</h1></body></html>"), "");
    }
}
