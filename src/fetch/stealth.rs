//! Fixed browser-imitation profile shared by both fetch strategies.
//!
//! One profile, constructed once and passed explicitly — deliberately not a
//! rotating pool, so both strategies present the same identity within a call.

/// Chrome-on-Windows desktop profile.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Header set sent with every direct fetch, mimicking a real top-level
/// navigation.
pub fn browser_headers(user_agent: &str, referer: &str) -> Vec<(&'static str, String)> {
    vec![
        ("User-Agent", user_agent.to_string()),
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"
                .to_string(),
        ),
        ("Accept-Language", "en-US,en;q=0.5".to_string()),
        ("Accept-Encoding", "gzip, deflate, br".to_string()),
        ("Connection", "keep-alive".to_string()),
        ("Upgrade-Insecure-Requests", "1".to_string()),
        ("Sec-Fetch-Dest", "document".to_string()),
        ("Sec-Fetch-Mode", "navigate".to_string()),
        ("Sec-Fetch-Site", "none".to_string()),
        ("Sec-Fetch-User", "?1".to_string()),
        ("Cache-Control", "max-age=0".to_string()),
        ("Referer", referer.to_string()),
    ]
}

/// Injected before any document script runs: hides the `navigator.webdriver`
/// automation marker.
pub const HIDE_WEBDRIVER_SCRIPT: &str =
    "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})";

/// Anti-bot challenge signatures. A rendered capture containing one is treated
/// as a failed fetch so the ladder falls through to direct.
pub fn detect_block_reason(html: &str) -> Option<&'static str> {
    let lower = html.to_lowercase();
    let signatures = [
        ("unusual traffic", "unusual_traffic"),
        ("sending automated queries", "captcha"),
        ("verify you are human", "captcha"),
        ("g-recaptcha", "captcha"),
        ("hcaptcha.com", "captcha"),
    ];
    for (needle, label) in signatures {
        if lower.contains(needle) {
            return Some(label);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_set_is_complete() {
        let headers = browser_headers(DEFAULT_USER_AGENT, "https://www.google.com/");
        let names: Vec<&str> = headers.iter().map(|(n, _)| *n).collect();
        for required in [
            "User-Agent",
            "Accept",
            "Accept-Language",
            "Accept-Encoding",
            "Connection",
            "Upgrade-Insecure-Requests",
            "Sec-Fetch-Dest",
            "Sec-Fetch-Mode",
            "Sec-Fetch-Site",
            "Referer",
        ] {
            assert!(names.contains(&required), "missing header {}", required);
        }
    }

    #[test]
    fn test_block_detection() {
        assert_eq!(
            detect_block_reason("<html>Our systems have detected unusual traffic</html>"),
            Some("unusual_traffic")
        );
        assert_eq!(
            detect_block_reason("<div class=\"g-recaptcha\"></div>"),
            Some("captcha")
        );
        assert_eq!(
            detect_block_reason("<html><h3>A Proper Title Here</h3></html>"),
            None
        );
    }
}
