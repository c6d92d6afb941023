//! Source acquisition and parsing
//!
//! A source is one external text document contributing `(category, name,
//! url)` observations. Retrieval is behind the [`SourceFetcher`] trait so
//! the pipeline can be driven by canned text in tests; classification and
//! parsing are pure functions over the fetched string.

use async_trait::async_trait;

use crate::errors::SourceError;

pub mod detect;
pub mod fetch;
pub mod m3u;
pub mod txt;

pub use detect::detect_format;
pub use fetch::HttpSourceFetcher;
pub use m3u::M3uParser;
pub use txt::TextHeuristicParser;

/// Retrieves the raw text of one source document.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, SourceError>;
}
