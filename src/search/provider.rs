//! Search provider abstraction and the daedra-backed DuckDuckGo provider.

use crate::types::{EngineError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One raw document returned by a search provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Document title.
    pub title: String,
    /// Document URL, the canonical identity key downstream.
    pub url: String,
    /// Short text snippet or page body, provider-dependent.
    pub snippet: String,
}

/// Safe-search filtering level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearch {
    /// Strict filtering.
    On,
    /// Default filtering.
    Moderate,
    /// No filtering.
    Off,
}

impl SafeSearch {
    /// Parse a configuration string ("on", "moderate", "off"); anything
    /// unrecognized falls back to `Moderate`.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "on" => SafeSearch::On,
            "off" => SafeSearch::Off,
            _ => SafeSearch::Moderate,
        }
    }
}

/// Per-query search parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of results per query.
    pub max_results: usize,
    /// Region for search results (e.g. "us-en", "uk-en").
    pub region: String,
    /// Safe-search level.
    pub safesearch: SafeSearch,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 3,
            region: "us-en".to_string(),
            safesearch: SafeSearch::Moderate,
        }
    }
}

/// External text-search capability.
///
/// Implementations may error or return an empty set on provider-side
/// failure; callers isolate errors per query and never retry.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Execute a single query and return zero or more raw documents.
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>>;
}

/// Web search provider powered by daedra (DuckDuckGo backend).
pub struct DuckDuckGoProvider;

impl DuckDuckGoProvider {
    /// Create a new provider. Stateless; safe to share.
    pub fn new() -> Self {
        Self
    }
}

impl Default for DuckDuckGoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        // daedra exposes a result-count knob; region and safesearch are
        // engine-level options honored by providers that support them.
        let search_args = daedra::SearchArgs {
            query: query.to_string(),
            options: Some(daedra::SearchOptions {
                num_results: options.max_results,
                ..Default::default()
            }),
        };

        match daedra::tools::search::perform_search(&search_args).await {
            Ok(response) => Ok(response
                .data
                .iter()
                .map(|r| SearchHit {
                    title: r.title.clone(),
                    url: r.url.clone(),
                    snippet: r.description.clone(),
                })
                .collect()),
            Err(e) => Err(EngineError::Search(format!("Search failed: {}", e))),
        }
    }
}
