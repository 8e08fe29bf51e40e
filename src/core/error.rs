use std::time::Duration;
use thiserror::Error;

/// Failure modes of the fetch ladder.
///
/// Rendered-path failures (`RenderInit`, `RenderTimeout`) are recovered inside
/// [`crate::Fetcher::fetch`] by falling back to direct-fetch and never surface
/// from it; only direct-path failures terminate a call.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request query was empty after trimming. Raised before the ladder
    /// starts.
    #[error("empty search query")]
    EmptyQuery,

    /// The configured search base did not form a valid target URL.
    #[error("invalid target url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// No rendering backend could be launched, or the CDP session failed
    /// before a usable capture.
    #[error("render engine failed: {0}")]
    RenderInit(String),

    /// The content-presence wait expired before results appeared.
    #[error("render wait timed out after {waited:?}")]
    RenderTimeout { waited: Duration },

    /// Direct-fetch transport failure (connect, TLS, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Direct-fetch returned a non-2xx status. Hard failure, no retry.
    #[error("unexpected http status {0}")]
    Status(u16),

    /// Direct-fetch returned 2xx with an empty body. The fetcher never hands
    /// empty markup to the caller silently.
    #[error("empty response body")]
    EmptyBody,
}

impl FetchError {
    /// `true` for failures the ladder recovers from by falling back to
    /// direct-fetch.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FetchError::RenderInit(_) | FetchError::RenderTimeout { .. }
        )
    }
}
