//! Source material gathering. Per-source failures are absorbed here: a link
//! that cannot be fetched contributes an empty blob and a log line, never an
//! error, so synthesis can proceed with whatever material survived.

pub mod page;
pub mod search;

use std::sync::Arc;

use futures::future::join_all;
use tracing::warn;

pub use page::{HttpPageFetcher, PageFetcher};
pub use search::{SearchHit, SearchProvider, SerpApiSearch};

pub struct SourceFetcher {
    search: Arc<dyn SearchProvider>,
    pages: Arc<dyn PageFetcher>,
    max_links: usize,
}

impl SourceFetcher {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        pages: Arc<dyn PageFetcher>,
        max_links: usize,
    ) -> Self {
        Self {
            search,
            pages,
            max_links,
        }
    }

    /// Searches for `query` and fetches at most the first `max_links` result
    /// links concurrently, in provider order. Each failed link yields an
    /// empty blob; a failed search yields no blobs at all.
    pub async fn fetch_for_topic(&self, query: &str) -> Vec<String> {
        let hits = match self.search.search(query).await {
            Ok(hits) => hits,
            Err(error) => {
                warn!(%error, query, "search failed; continuing with no source material");
                return Vec::new();
            }
        };

        let fetches = hits
            .iter()
            .take(self.max_links)
            .map(|hit| self.fetch_one(&hit.link));

        join_all(fetches).await
    }

    /// Fetches a single page under the same extraction and absorption rules.
    pub async fn fetch_for_url(&self, url: &str) -> String {
        self.fetch_one(url).await
    }

    async fn fetch_one(&self, url: &str) -> String {
        match self.pages.fetch_text(url).await {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, url, "failed to fetch source; skipping");
                String::new()
            }
        }
    }
}
