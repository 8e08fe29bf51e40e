//! serp-scout — layered SERP retrieval with heuristic title extraction.
//!
//! Two independent components, composed in sequence per request:
//!
//! * [`Fetcher`] — obtains raw search-result markup for a query, attempting a
//!   full headless-browser render first and degrading to a single direct HTTP
//!   GET when rendering fails or is unavailable.
//! * [`Extractor`] — surfaces a deduplicated, order-preserving list of result
//!   titles from unstable, semi-structured SERP markup.
//!
//! The two share no state and can be used (and tested) independently:
//!
//! ```no_run
//! use serp_scout::{Extractor, FetchConfig, FetchRequest, Fetcher};
//!
//! # async fn run() -> Result<(), serp_scout::FetchError> {
//! let fetcher = Fetcher::new(FetchConfig::from_env());
//! let page = fetcher.fetch(&FetchRequest::new("rust async runtime")).await?;
//! let result = Extractor::default().extract(&page);
//! for title in &result.titles {
//!     println!("{title}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod extract;
pub mod fetch;

// --- Primary exports ---
pub use crate::core::config::{ExtractConfig, FetchConfig, PauseRange};
pub use crate::core::error::FetchError;
pub use crate::core::types::{ExtractionResult, FetchMethod, FetchRequest, RenderedPage};
pub use crate::extract::Extractor;
pub use crate::fetch::Fetcher;
