//! Search pipeline: batch query execution, deduplication, summarization
//! and rendering.
//!
//! The pipeline is a pure function of its inputs plus external provider
//! state. Provider errors are isolated per query (an error contributes an
//! empty result set for that query only) and there is no retry/backoff.

use crate::llm::{invoke_structured, LLMClient};
use crate::search::provider::{SearchHit, SearchOptions, SearchProvider};
use crate::types::SearchResult;
use crate::utils::today;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Returned when every query yields nothing, so callers can distinguish
/// "searched, found nothing" from "never searched".
pub const NO_RESULTS_SENTINEL: &str =
    "No valid search results found. Please try different search queries or use a different search API.";

/// Snippets up to this many characters are used verbatim; anything longer
/// counts as an extended body and is summarized.
const SNIPPET_VERBATIM_MAX: usize = 600;

/// Maximum characters of raw content kept when summarization degrades.
const SUMMARY_FALLBACK_MAX: usize = 1000;

/// Maximum verbatim key excerpts carried per summarized source.
const MAX_KEY_EXCERPTS: usize = 5;

/// Structured summarization output requested from the model.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
struct WebpageSummary {
    /// Abstractive summary of the document.
    summary: String,
    /// Verbatim excerpts preserving exact quotes and figures.
    #[serde(default)]
    key_excerpts: Vec<String>,
}

/// Result of one pipeline invocation.
#[derive(Debug, Clone)]
pub struct SearchOutput {
    /// Unique sources in dedup-insertion order.
    pub results: Vec<SearchResult>,
    /// Rendered text block, one section per source, or the no-results
    /// sentinel.
    pub formatted: String,
}

/// Executes search queries and processes the results into a single
/// formatted evidence block.
pub struct SearchPipeline {
    provider: Arc<dyn SearchProvider>,
    summarizer: Arc<dyn LLMClient>,
    options: SearchOptions,
}

impl SearchPipeline {
    /// Create a pipeline over the given provider and summarization model.
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        summarizer: Arc<dyn LLMClient>,
        options: SearchOptions,
    ) -> Self {
        Self {
            provider,
            summarizer,
            options,
        }
    }

    /// Run the full pipeline: execute, deduplicate, summarize, render.
    pub async fn run(&self, queries: &[String]) -> SearchOutput {
        tracing::info!(query_count = queries.len(), "starting search batch");

        let hits = self.execute_queries(queries).await;
        let unique = dedup_hits(hits);
        tracing::debug!(unique = unique.len(), "after deduplication");

        let results = self.process(unique).await;
        let formatted = format_sources(&results);
        tracing::info!(
            sources = results.len(),
            output_len = formatted.len(),
            "search batch complete"
        );

        SearchOutput { results, formatted }
    }

    /// Convenience wrapper returning only the rendered text block.
    pub async fn search(&self, queries: &[String]) -> String {
        self.run(queries).await.formatted
    }

    /// Execute queries sequentially against the provider. Sequential on
    /// purpose: parallel fan-out amplifies rate limiting upstream.
    async fn execute_queries(&self, queries: &[String]) -> Vec<SearchHit> {
        let mut hits = Vec::new();
        for (i, query) in queries.iter().enumerate() {
            tracing::debug!("searching query {}/{}: {}", i + 1, queries.len(), query);
            match self.provider.search(query, &self.options).await {
                Ok(found) => {
                    tracing::debug!(results = found.len(), "query succeeded");
                    hits.extend(found);
                }
                // Isolated per query: this query contributes nothing,
                // the rest of the batch continues.
                Err(e) => tracing::error!("error searching for '{}': {}", query, e),
            }
        }
        hits
    }

    async fn process(&self, hits: Vec<SearchHit>) -> Vec<SearchResult> {
        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let summary = if hit.snippet.len() <= SNIPPET_VERBATIM_MAX {
                hit.snippet.clone()
            } else {
                self.summarize(&hit.snippet).await
            };
            results.push(SearchResult {
                url: hit.url,
                title: hit.title,
                raw_content: hit.snippet,
                summary,
            });
        }
        results
    }

    async fn summarize(&self, content: &str) -> String {
        let fallback = WebpageSummary {
            summary: truncate_chars(content, SUMMARY_FALLBACK_MAX),
            key_excerpts: vec![],
        };

        let prompt = format!(
            "Summarize this webpage content. Today's date is {}.\n\n\
             Aim for roughly 25-30% of the original length, preserving the facts, \
             figures and claims a researcher would cite. Also pick up to {} short \
             verbatim key excerpts.\n\n<webpage_content>\n{}\n</webpage_content>",
            today(),
            MAX_KEY_EXCERPTS,
            content
        );

        let summary = invoke_structured(
            self.summarizer.as_ref(),
            "You summarize webpages for a research agent. Be faithful and dense.",
            &prompt,
            fallback,
        )
        .await;

        render_summary(&summary)
    }
}

/// Deduplicate by URL: the first occurrence wins, later duplicates are
/// dropped silently, even when they came from a different query.
fn dedup_hits(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| seen.insert(hit.url.clone()))
        .collect()
}

fn render_summary(summary: &WebpageSummary) -> String {
    let excerpts = summary
        .key_excerpts
        .iter()
        .take(MAX_KEY_EXCERPTS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "<summary>\n{}\n</summary>\n\n<key_excerpts>\n{}\n</key_excerpts>",
        summary.summary, excerpts
    )
}

fn truncate_chars(content: &str, max: usize) -> String {
    if content.chars().count() <= max {
        content.to_string()
    } else {
        let head: String = content.chars().take(max).collect();
        format!("{}...", head)
    }
}

/// Render one section per source, in dedup-insertion order. Zero sources
/// renders the explicit sentinel rather than an empty string.
pub fn format_sources(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_RESULTS_SENTINEL.to_string();
    }

    let mut output = String::from("Search results: \n");
    for (i, result) in results.iter().enumerate() {
        output.push_str(&format!("\n\n--- SOURCE {}: {} ---\n", i + 1, result.title));
        output.push_str(&format!("URL: {}\n\n", result.url));
        output.push_str(&format!("SUMMARY:\n{}\n\n", result.summary));
        output.push_str(&"-".repeat(80));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(url: &str, title: &str) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            url: url.to_string(),
            snippet: format!("snippet for {}", title),
        }
    }

    #[test]
    fn test_dedup_first_occurrence_wins() {
        let hits = vec![
            hit("https://a.example", "A from query 1"),
            hit("https://b.example", "B"),
            hit("https://a.example", "A from query 2"),
        ];

        let unique = dedup_hits(hits);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].title, "A from query 1");
        assert_eq!(unique[1].url, "https://b.example");
    }

    #[test]
    fn test_format_sources_empty_is_sentinel() {
        assert_eq!(format_sources(&[]), NO_RESULTS_SENTINEL);
    }

    #[test]
    fn test_format_sources_ordering_and_sections() {
        let results = vec![
            SearchResult {
                url: "https://a.example".to_string(),
                title: "Alpha".to_string(),
                raw_content: "raw".to_string(),
                summary: "summary a".to_string(),
            },
            SearchResult {
                url: "https://b.example".to_string(),
                title: "Beta".to_string(),
                raw_content: "raw".to_string(),
                summary: "summary b".to_string(),
            },
        ];

        let rendered = format_sources(&results);
        let alpha = rendered.find("--- SOURCE 1: Alpha ---").unwrap();
        let beta = rendered.find("--- SOURCE 2: Beta ---").unwrap();
        assert!(alpha < beta);
        assert!(rendered.contains("URL: https://a.example"));
        assert!(rendered.contains("summary b"));
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        // Multi-byte characters must not split.
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語...");
    }

    #[test]
    fn test_render_summary_caps_excerpts() {
        let summary = WebpageSummary {
            summary: "s".to_string(),
            key_excerpts: (0..8).map(|i| format!("e{}", i)).collect(),
        };
        let rendered = render_summary(&summary);
        assert!(rendered.contains("e4"));
        assert!(!rendered.contains("e5"));
    }
}
