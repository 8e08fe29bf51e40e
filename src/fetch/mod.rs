//! The retrieval-with-fallback pipeline.
//!
//! Strategy ladder: rendered-fetch (headless CDP browser) is attempted first
//! when enabled; direct-fetch (a single GET with a browser header set) is the
//! fallback, and the only strategy when rendering is disabled or no browser
//! is installed. Rendered-fetch runs at most once per call; its failures are
//! logged and swallowed. Direct-fetch failures propagate.

mod browser;
mod direct;
pub mod stealth;

pub use browser::{resolve_backend, RenderBackend, BACKEND_PRIORITY, CONTENT_PRESENCE_SELECTOR};

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use tracing::{debug, warn};

use crate::core::config::FetchConfig;
use crate::core::error::FetchError;
use crate::core::types::{FetchMethod, FetchRequest, RenderedPage};

/// Obtains raw SERP markup for a query. Stateless across calls; each rendered
/// attempt launches and releases its own browser instance.
pub struct Fetcher {
    config: FetchConfig,
    client: Client,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Self {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Target URL for a request: `<base>/search?q=<query>&num=<count>`.
    /// No other endpoint is used.
    pub fn search_url(&self, request: &FetchRequest) -> String {
        let encoded = utf8_percent_encode(request.query.trim(), NON_ALPHANUMERIC).to_string();
        format!(
            "{}/search?q={}&num={}",
            self.config.search_base.trim_end_matches('/'),
            encoded,
            request.result_count
        )
    }

    /// Fetch raw markup for `request`, degrading from rendered to direct.
    ///
    /// On success the markup is guaranteed non-empty. The only errors that
    /// surface are pre-ladder validation and direct-fetch failures; every
    /// rendered-path failure falls back silently (logged at warn).
    pub async fn fetch(&self, request: &FetchRequest) -> Result<RenderedPage, FetchError> {
        if request.query.trim().is_empty() {
            return Err(FetchError::EmptyQuery);
        }

        let url = self.search_url(request);

        if self.config.use_browser {
            if browser::backend_available(&self.config) {
                match browser::fetch_rendered(&self.config, &url, request.timeout).await {
                    Ok(html) => return Ok(RenderedPage::new(html, FetchMethod::Rendered)),
                    Err(e) if e.is_recoverable() => {
                        warn!("rendered fetch failed, falling back to direct: {}", e);
                    }
                    Err(e) => return Err(e),
                }
            } else {
                debug!("no rendering backend installed, using direct fetch");
            }
        }

        direct::fetch_direct(&self.client, &self.config, &url, request.timeout).await
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_encoding() {
        let fetcher = Fetcher::default();
        let request = FetchRequest::new("rust web scraping").with_result_count(7);
        assert_eq!(
            fetcher.search_url(&request),
            "https://www.google.com/search?q=rust%20web%20scraping&num=7"
        );
    }

    #[test]
    fn test_search_url_trims_query_and_base() {
        let config = FetchConfig {
            search_base: "http://127.0.0.1:8080/".to_string(),
            ..FetchConfig::default()
        };
        let fetcher = Fetcher::new(config);
        let request = FetchRequest::new("  hello  ");
        assert_eq!(
            fetcher.search_url(&request),
            "http://127.0.0.1:8080/search?q=hello&num=10"
        );
    }

    #[test]
    fn test_search_url_escapes_reserved_chars() {
        let fetcher = Fetcher::default();
        let request = FetchRequest::new("a&b=c?");
        let url = fetcher.search_url(&request);
        assert!(url.contains("q=a%26b%3Dc%3F"), "got {}", url);
    }

    #[tokio::test]
    async fn test_empty_query_rejected_before_ladder() {
        let fetcher = Fetcher::new(FetchConfig::default().direct_only());
        let err = fetcher
            .fetch(&FetchRequest::new("   "))
            .await
            .expect_err("blank query must be rejected");
        assert!(matches!(err, FetchError::EmptyQuery));
    }
}
