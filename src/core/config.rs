use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::fetch::stealth::DEFAULT_USER_AGENT;

pub const ENV_CHROME_EXECUTABLE: &str = "CHROME_EXECUTABLE";
pub const ENV_EDGE_EXECUTABLE: &str = "EDGE_EXECUTABLE";
pub const ENV_SEARCH_BASE: &str = "SERP_SCOUT_SEARCH_BASE";
pub const ENV_USER_AGENT: &str = "SERP_SCOUT_USER_AGENT";
pub const ENV_RENDERING: &str = "SERP_SCOUT_RENDERING";
pub const ENV_MIN_TITLE_LEN: &str = "SERP_SCOUT_MIN_TITLE_LEN";

/// Humanized pause range. A random point in `[min_ms, max_ms]` is slept before
/// a page is read, to break the suspiciously tight fetch-then-read pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl PauseRange {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        if min_ms > max_ms {
            Self {
                min_ms: max_ms,
                max_ms: min_ms,
            }
        } else {
            Self { min_ms, max_ms }
        }
    }

    /// No pause at all. Used by tests.
    pub fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Pause applied after the content-presence wait in a rendered fetch.
    pub fn rendered_default() -> Self {
        Self::new(1000, 3000)
    }

    /// Pause applied before the GET in a direct fetch.
    pub fn direct_default() -> Self {
        Self::new(500, 2000)
    }

    pub fn sample(&self) -> Duration {
        use rand::prelude::*;
        let mut rng = rand::rng();
        Duration::from_millis(rng.random_range(self.min_ms..=self.max_ms))
    }

    pub async fn sleep(&self) {
        let pause = self.sample();
        if !pause.is_zero() {
            debug!("humanized pause: {:?}", pause);
            tokio::time::sleep(pause).await;
        }
    }
}

/// Fetch-side configuration. Built once, passed explicitly — there is no
/// process-wide mutable state behind it.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Scheme + host of the search endpoint; only `/search` below it is used.
    pub search_base: String,
    /// User-agent sent by both strategies.
    pub user_agent: String,
    /// Attempt the headless rendered fetch before direct-fetch. When `false`
    /// no engine initialization is ever attempted.
    pub use_browser: bool,
    /// Optional explicit Chromium-family binary, checked before auto-discovery.
    pub chrome_path: Option<PathBuf>,
    /// Optional explicit Microsoft Edge binary, checked before auto-discovery.
    pub edge_path: Option<PathBuf>,
    pub rendered_pause: PauseRange,
    pub direct_pause: PauseRange,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            search_base: "https://www.google.com".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            use_browser: true,
            chrome_path: None,
            edge_path: None,
            rendered_pause: PauseRange::rendered_default(),
            direct_pause: PauseRange::direct_default(),
        }
    }
}

impl FetchConfig {
    /// Defaults with env-var overrides applied.
    ///
    /// * `SERP_SCOUT_SEARCH_BASE` — alternate search endpoint (must parse as a URL)
    /// * `SERP_SCOUT_USER_AGENT` — user-agent override
    /// * `SERP_SCOUT_RENDERING` — set to `0`/`false`/`no`/`off` to skip the rendered rung
    /// * `CHROME_EXECUTABLE` / `EDGE_EXECUTABLE` — explicit browser binaries
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(base) = non_empty_env(ENV_SEARCH_BASE) {
            let base = base.trim_end_matches('/').to_string();
            match Url::parse(&base) {
                Ok(_) => cfg.search_base = base,
                Err(e) => debug!("ignoring invalid {}: {}", ENV_SEARCH_BASE, e),
            }
        }
        if let Some(ua) = non_empty_env(ENV_USER_AGENT) {
            cfg.user_agent = ua;
        }
        if let Ok(v) = env::var(ENV_RENDERING) {
            cfg.use_browser = !matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }
        cfg.chrome_path = existing_path_env(ENV_CHROME_EXECUTABLE);
        cfg.edge_path = existing_path_env(ENV_EDGE_EXECUTABLE);
        cfg
    }

    /// Builder: disable the rendered rung entirely.
    pub fn direct_only(mut self) -> Self {
        self.use_browser = false;
        self
    }
}

/// Extractor-side tunables. The exact values are not load-bearing for
/// correctness beyond "some positive minimum filters noise"; they exist so
/// they can be re-tuned when the target site's markup shifts.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Class marker on SERP result containers.
    pub container_class: String,
    /// Path prefix identifying outbound-redirect links.
    pub redirect_prefix: String,
    /// Candidates whose trimmed length is <= this are dropped as noise
    /// (icons, single words).
    pub min_title_len: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            container_class: "g".to_string(),
            redirect_prefix: "/url".to_string(),
            min_title_len: 5,
        }
    }
}

impl ExtractConfig {
    /// Defaults with `SERP_SCOUT_MIN_TITLE_LEN` applied when set.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(n) = non_empty_env(ENV_MIN_TITLE_LEN).and_then(|v| v.parse().ok()) {
            cfg.min_title_len = n;
        }
        cfg
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn existing_path_env(key: &str) -> Option<PathBuf> {
    let p = non_empty_env(key)?;
    if Path::new(&p).exists() {
        Some(PathBuf::from(p))
    } else {
        None
    }
}
