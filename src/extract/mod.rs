//! Heuristic title extraction over unstable SERP markup.
//!
//! Three passes in fixed order feed one insertion-ordered candidate list:
//! every `h3`, then `h3`s inside result containers, then `h3`s inside
//! outbound-redirect anchors. Deduplication and the noise-length filter run
//! once at the end, so a later pass may legitimately re-surface an earlier
//! candidate. Malformed markup degrades to fewer or zero candidates, never an
//! error.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::core::config::ExtractConfig;
use crate::core::types::{ExtractionResult, RenderedPage};

/// Pure input→output title extractor. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractConfig,
}

impl Extractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extract titles from a fetched page, carrying its provenance tag
    /// through to the result.
    pub fn extract(&self, page: &RenderedPage) -> ExtractionResult {
        ExtractionResult {
            titles: self.extract_titles(&page.html),
            method: page.method,
        }
    }

    /// The string-level core: unique titles in first-seen order across the
    /// three passes. An empty vec is a valid, expected outcome.
    pub fn extract_titles(&self, html: &str) -> Vec<String> {
        let doc = Html::parse_document(html);
        let heading_sel = Selector::parse("h3").unwrap();

        let mut candidates: Vec<String> = Vec::new();

        // Pass 1: every heading, document order.
        for heading in doc.select(&heading_sel) {
            let text = element_text(&heading);
            if !text.is_empty() {
                candidates.push(text);
            }
        }

        // Pass 2: result containers holding a heading. May re-add pass-1
        // entries; collapsed by the final filter.
        let container_css = format!("div.{}", self.config.container_class);
        if let Ok(container_sel) = Selector::parse(&container_css) {
            for container in doc.select(&container_sel) {
                if let Some(heading) = container.select(&heading_sel).next() {
                    let text = element_text(&heading);
                    if !text.is_empty() {
                        candidates.push(text);
                    }
                }
            }
        }

        // Pass 3: outbound-redirect anchors, skipping text already collected.
        let anchor_css = format!("a[href^=\"{}\"]", self.config.redirect_prefix);
        if let Ok(anchor_sel) = Selector::parse(&anchor_css) {
            for anchor in doc.select(&anchor_sel) {
                if let Some(heading) = anchor.select(&heading_sel).next() {
                    let text = element_text(&heading);
                    if !text.is_empty() && !candidates.iter().any(|c| *c == text) {
                        candidates.push(text);
                    }
                }
            }
        }

        // Final filter: noise-length cut, then first-occurrence dedupe.
        let mut seen = HashSet::new();
        let titles: Vec<String> = candidates
            .into_iter()
            .filter(|t| t.chars().count() > self.config.min_title_len)
            .filter(|t| seen.insert(t.clone()))
            .collect();

        debug!("extracted {} unique titles", titles.len());
        titles
    }
}

/// Trimmed, whitespace-normalized text of an element's descendant text nodes.
/// Nodes are concatenated as-is so inline tags never split a word.
fn element_text(element: &ElementRef<'_>) -> String {
    let raw = element.text().collect::<String>();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
