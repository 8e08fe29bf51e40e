pub mod config;
pub mod error;
pub mod types;

pub use config::{ExtractConfig, FetchConfig, PauseRange};
pub use error::FetchError;
pub use types::*;
