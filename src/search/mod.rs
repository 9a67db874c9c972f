//! Web search: provider abstraction and the result-processing pipeline.
//!
//! [`provider::SearchProvider`] is the seam to the external search
//! backend; [`pipeline::SearchPipeline`] turns a batch of queries into a
//! deduplicated, summarized, rendered set of sources.

/// Search provider trait and the DuckDuckGo implementation.
pub mod provider;
/// Query execution, deduplication, summarization and rendering.
pub mod pipeline;

pub use pipeline::{SearchOutput, SearchPipeline, NO_RESULTS_SENTINEL};
pub use provider::{DuckDuckGoProvider, SafeSearch, SearchHit, SearchOptions, SearchProvider};
