//! Direct-fetch: one raw HTTP GET with a browser-like header set.
//!
//! The terminal rung of the ladder — any failure here propagates to the
//! caller. Non-2xx is a hard failure; there is no retry.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::core::config::FetchConfig;
use crate::core::error::FetchError;
use crate::core::types::{FetchMethod, RenderedPage};

use super::stealth;

pub(super) async fn fetch_direct(
    client: &Client,
    config: &FetchConfig,
    url: &str,
    timeout: Duration,
) -> Result<RenderedPage, FetchError> {
    let target = Url::parse(url)?;

    // Pause before the request so the call does not look machine-timed.
    config.direct_pause.sleep().await;

    let referer = format!("{}/", config.search_base.trim_end_matches('/'));
    let mut request = client.get(target).timeout(timeout);
    for (name, value) in stealth::browser_headers(&config.user_agent, &referer) {
        request = request.header(name, value);
    }

    debug!("direct fetch: GET {}", url);
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let body = response.text().await?;
    if body.trim().is_empty() {
        return Err(FetchError::EmptyBody);
    }

    info!("direct fetch ok: {} chars", body.len());
    Ok(RenderedPage::new(body, FetchMethod::Direct))
}
