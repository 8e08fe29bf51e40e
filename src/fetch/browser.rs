//! Rendered-fetch: drive a native headless browser over CDP and capture the
//! post-JavaScript markup.
//!
//! Two interchangeable backends are tried in fixed priority order — a
//! Chromium-family binary first, Microsoft Edge second. Backend launch failure
//! is non-fatal and moves to the next backend; once a session is up, any
//! failure fails the rendered rung as a whole (the caller falls back to
//! direct-fetch, it does not re-enter the backend ladder).
//!
//! The browser handle is released on every exit path — success, timeout, or
//! session error — before the result is returned.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use chromiumoxide::browser::BrowserConfig;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::core::config::FetchConfig;
use crate::core::error::FetchError;

use super::stealth;

/// CSS condition that signals search results have loaded.
pub const CONTENT_PRESENCE_SELECTOR: &str = "div.g, div[jscontroller]";

const SELECTOR_POLL_MS: u64 = 250;

/// Rendering backends in fixed priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderBackend {
    Chrome,
    Edge,
}

pub const BACKEND_PRIORITY: &[RenderBackend] = &[RenderBackend::Chrome, RenderBackend::Edge];

impl RenderBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderBackend::Chrome => "chrome",
            RenderBackend::Edge => "edge",
        }
    }
}

/// Resolve a backend to a launchable executable.
///
/// Resolution order: explicit config override (checked for existence), then
/// PATH scan, then OS-specific well-known install paths.
pub fn resolve_backend(backend: RenderBackend, config: &FetchConfig) -> Option<String> {
    let override_path = match backend {
        RenderBackend::Chrome => config.chrome_path.as_ref(),
        RenderBackend::Edge => config.edge_path.as_ref(),
    };
    if let Some(p) = override_path {
        if p.exists() {
            return Some(p.to_string_lossy().to_string());
        }
        warn!(
            "{} override path does not exist: {}",
            backend.as_str(),
            p.display()
        );
    }

    match backend {
        RenderBackend::Chrome => find_chrome_executable(),
        RenderBackend::Edge => find_edge_executable(),
    }
}

/// `true` when at least one backend resolves to an installed binary. Used to
/// skip engine initialization entirely when nothing is installed.
pub fn backend_available(config: &FetchConfig) -> bool {
    BACKEND_PRIORITY
        .iter()
        .any(|&b| resolve_backend(b, config).is_some())
}

fn scan_path(names: &[&str]) -> Option<String> {
    let path_var = std::env::var("PATH").ok()?;
    for dir in std::env::split_paths(&path_var) {
        for name in names {
            let full = dir.join(name);
            if full.exists() {
                return Some(full.to_string_lossy().to_string());
            }
        }
    }
    None
}

fn first_existing(candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find(|c| Path::new(c).exists())
        .map(|c| c.to_string())
}

fn find_chrome_executable() -> Option<String> {
    if let Some(p) = scan_path(&["google-chrome", "chromium", "chromium-browser", "chrome"]) {
        return Some(p);
    }

    #[cfg(target_os = "macos")]
    if let Some(p) = first_existing(&[
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
    ]) {
        return Some(p);
    }

    #[cfg(target_os = "linux")]
    if let Some(p) = first_existing(&[
        "/usr/bin/google-chrome",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/usr/local/bin/chromium",
    ]) {
        return Some(p);
    }

    #[cfg(target_os = "windows")]
    if let Some(p) = first_existing(&[
        r"C:\Program Files\Google\Chrome\Application\chrome.exe",
        r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    ]) {
        return Some(p);
    }

    None
}

fn find_edge_executable() -> Option<String> {
    if let Some(p) = scan_path(&["microsoft-edge", "microsoft-edge-stable", "msedge"]) {
        return Some(p);
    }

    #[cfg(target_os = "macos")]
    if let Some(p) =
        first_existing(&["/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge"])
    {
        return Some(p);
    }

    #[cfg(target_os = "linux")]
    if let Some(p) = first_existing(&[
        "/usr/bin/microsoft-edge",
        "/usr/bin/microsoft-edge-stable",
        "/opt/microsoft/msedge/msedge",
    ]) {
        return Some(p);
    }

    #[cfg(target_os = "windows")]
    if let Some(p) = first_existing(&[
        r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
        r"C:\Program Files\Microsoft\Edge\Application\msedge.exe",
    ]) {
        return Some(p);
    }

    None
}

/// Attempt a rendered fetch of `url`, walking the backend ladder.
pub(super) async fn fetch_rendered(
    config: &FetchConfig,
    url: &str,
    timeout: Duration,
) -> Result<String, FetchError> {
    for &backend in BACKEND_PRIORITY {
        let Some(exe) = resolve_backend(backend, config) else {
            debug!("{} backend: no executable found", backend.as_str());
            continue;
        };

        let (browser, handler) = match launch_browser(&exe, config).await {
            Ok(pair) => pair,
            Err(e) => {
                warn!(
                    "{} backend init failed, trying next: {:#}",
                    backend.as_str(),
                    e
                );
                continue;
            }
        };

        info!("rendered fetch via {} ({})", backend.as_str(), exe);
        let result = drive_page(&browser, config, url, timeout).await;
        // Release the engine on every exit path before returning or falling back.
        release(browser, handler).await;
        return result;
    }

    Err(FetchError::RenderInit(
        "no usable rendering backend".to_string(),
    ))
}

fn build_headless_config(exe: &str, user_agent: &str) -> Result<BrowserConfig> {
    BrowserConfig::builder()
        .chrome_executable(exe)
        .window_size(1280, 900)
        .arg("--disable-gpu")
        .arg("--no-sandbox")
        .arg("--disable-dev-shm-usage")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--mute-audio")
        // Suppress the CDP automation fingerprint
        .arg("--disable-blink-features=AutomationControlled")
        .arg(format!("--user-agent={}", user_agent))
        .build()
        .map_err(|e| anyhow!("browser config error: {}", e))
}

async fn launch_browser(
    exe: &str,
    config: &FetchConfig,
) -> Result<(Browser, tokio::task::JoinHandle<()>)> {
    let browser_config = build_headless_config(exe, &config.user_agent)?;
    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .map_err(|e| anyhow!("failed to launch browser ({}): {}", exe, e))?;

    let handle = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                debug!("CDP handler event error: {}", e);
            }
        }
    });

    Ok((browser, handle))
}

async fn drive_page(
    browser: &Browser,
    config: &FetchConfig,
    url: &str,
    timeout: Duration,
) -> Result<String, FetchError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| FetchError::RenderInit(format!("failed to open tab: {}", e)))?;

    // Applied before any document script runs, so detectors that probe
    // navigator.webdriver on load see nothing.
    page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
        stealth::HIDE_WEBDRIVER_SCRIPT,
    ))
    .await
    .map_err(|e| FetchError::RenderInit(format!("stealth injection failed: {}", e)))?;

    debug!("navigating to {}", url);
    page.goto(url)
        .await
        .map_err(|e| FetchError::RenderInit(format!("navigation failed: {}", e)))?;

    wait_for_selector(&page, CONTENT_PRESENCE_SELECTOR, timeout).await?;

    // Reading the page the instant results appear is itself a fingerprint.
    config.rendered_pause.sleep().await;

    let html = page
        .content()
        .await
        .map_err(|e| FetchError::RenderInit(format!("capture failed: {}", e)))?;

    if html.trim().is_empty() {
        return Err(FetchError::RenderInit("empty rendered markup".to_string()));
    }
    if let Some(reason) = stealth::detect_block_reason(&html) {
        warn!("rendered capture hit anti-bot signature: {}", reason);
        return Err(FetchError::RenderInit(format!("blocked: {}", reason)));
    }

    info!("rendered fetch ok: {} chars", html.len());
    Ok(html)
}

/// Poll until `selector` matches on a fully loaded document, or `timeout`
/// elapses.
async fn wait_for_selector(
    page: &Page,
    selector: &str,
    timeout: Duration,
) -> Result<(), FetchError> {
    let start = Instant::now();
    loop {
        let ready = page
            .evaluate("document.readyState")
            .await
            .ok()
            .and_then(|v| v.into_value::<serde_json::Value>().ok())
            .and_then(|j| j.as_str().map(|s| s == "complete"))
            .unwrap_or(false);

        if ready && page.find_element(selector).await.is_ok() {
            debug!(
                "content-presence selector matched after {:?}",
                start.elapsed()
            );
            return Ok(());
        }

        if start.elapsed() >= timeout {
            return Err(FetchError::RenderTimeout { waited: timeout });
        }

        tokio::time::sleep(Duration::from_millis(SELECTOR_POLL_MS)).await;
    }
}

async fn release(mut browser: Browser, handler: tokio::task::JoinHandle<()>) {
    if let Err(e) = browser.close().await {
        warn!("browser close error (non-fatal): {}", e);
    }
    handler.abort();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_priority_order() {
        assert_eq!(
            BACKEND_PRIORITY,
            &[RenderBackend::Chrome, RenderBackend::Edge]
        );
    }

    #[test]
    fn test_missing_override_falls_through() {
        let config = FetchConfig {
            chrome_path: Some("/nonexistent/definitely/not/chrome".into()),
            ..FetchConfig::default()
        };
        // A dead override must not resolve to the dead path itself.
        if let Some(resolved) = resolve_backend(RenderBackend::Chrome, &config) {
            assert_ne!(resolved, "/nonexistent/definitely/not/chrome");
        }
    }
}
