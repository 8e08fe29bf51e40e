use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which rung of the strategy ladder produced a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMethod {
    /// Full headless-browser render (post-JavaScript markup).
    Rendered,
    /// Single raw HTTP GET, no script execution.
    Direct,
}

impl FetchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchMethod::Rendered => "rendered",
            FetchMethod::Direct => "direct",
        }
    }
}

impl std::fmt::Display for FetchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One search request. Constructed per call, consumed once, discarded.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Search query. Must be non-empty after trimming.
    pub query: String,
    /// Requested result count. Advisory only — the source may return more or
    /// fewer and the fetcher does not enforce it.
    pub result_count: usize,
    /// Budget for the content-presence wait (rendered) or the HTTP call
    /// (direct). There is no cancellation once a strategy has started.
    pub timeout: Duration,
}

impl FetchRequest {
    pub const DEFAULT_RESULT_COUNT: usize = 10;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            result_count: Self::DEFAULT_RESULT_COUNT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_result_count(mut self, count: usize) -> Self {
        self.result_count = count.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Raw markup produced by the fetch ladder, tagged with its provenance.
/// Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPage {
    pub html: String,
    pub method: FetchMethod,
}

impl RenderedPage {
    pub fn new(html: String, method: FetchMethod) -> Self {
        Self { html, method }
    }
}

/// Deduplicated titles in first-seen order, plus the provenance of the markup
/// they came from. Empty is a valid outcome, not an error — it signals the
/// caller should consider an alternate extraction strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub titles: Vec<String>,
    pub method: FetchMethod,
}

impl ExtractionResult {
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
