//! Extraction over a realistic (simplified) Google SERP snapshot: mixed
//! containers, redirect anchors, knowledge-panel noise, and duplicate
//! headings across passes.

use std::collections::HashSet;

use serp_scout::{ExtractConfig, Extractor, FetchMethod, RenderedPage};

const SERP_FIXTURE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><title>rust web scraping - Search</title></head>
<body>
  <div id="search">
    <div class="g" jscontroller="SC7lYd">
      <a href="/url?q=https://docs.rs/scraper"><h3>scraper - Rust HTML parsing crate</h3></a>
      <div class="VwiC3b">HTML parsing and querying with CSS selectors.</div>
    </div>
    <div class="g">
      <a href="/url?q=https://blog.example.com/scraping"><h3>Web Scraping in Rust: a practical guide</h3></a>
    </div>
    <div jscontroller="abc123">
      <a href="https://www.rust-lang.org"><h3>The Rust Programming Language</h3></a>
    </div>
    <!-- knowledge-panel noise: icon-like, short headings -->
    <h3>Maps</h3>
    <h3>News</h3>
    <div class="g">
      <a href="/url?q=https://blog.example.com/scraping"><h3>Web Scraping in Rust: a practical guide</h3></a>
    </div>
    <a href="/url?q=https://github.com/causal-agent/scraper"><h3>causal-agent/scraper on GitHub</h3></a>
  </div>
</body>
</html>"#;

#[test]
fn test_serp_fixture_titles_in_first_seen_order() {
    let titles = Extractor::default().extract_titles(SERP_FIXTURE);
    assert_eq!(
        titles,
        vec![
            "scraper - Rust HTML parsing crate",
            "Web Scraping in Rust: a practical guide",
            "The Rust Programming Language",
            "causal-agent/scraper on GitHub",
        ]
    );
}

#[test]
fn test_serp_fixture_noise_headings_dropped() {
    let titles = Extractor::default().extract_titles(SERP_FIXTURE);
    assert!(!titles.iter().any(|t| t == "Maps" || t == "News"));
}

#[test]
fn test_serp_fixture_no_duplicates() {
    let titles = Extractor::default().extract_titles(SERP_FIXTURE);
    let unique: HashSet<_> = titles.iter().collect();
    assert_eq!(titles.len(), unique.len());
}

#[test]
fn test_serp_fixture_idempotent() {
    let extractor = Extractor::default();
    let page = RenderedPage::new(SERP_FIXTURE.to_string(), FetchMethod::Rendered);
    let first = extractor.extract(&page);
    let second = extractor.extract(&page);
    assert_eq!(first, second);
    assert_eq!(first.method, FetchMethod::Rendered);
}

#[test]
fn test_alternate_container_class() {
    // Markup drift: containers renamed, headings still h3.
    let html = r#"<div class="result-card"><h3>Renamed Container Result</h3></div>"#;
    let extractor = Extractor::new(ExtractConfig {
        container_class: "result-card".to_string(),
        ..ExtractConfig::default()
    });
    assert_eq!(
        extractor.extract_titles(html),
        vec!["Renamed Container Result"]
    );
}

#[test]
fn test_empty_document() {
    assert!(Extractor::default().extract_titles("").is_empty());
}
