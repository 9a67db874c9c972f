//! # Delver - Deep Research Orchestration Engine
//!
//! A budgeted multi-agent research engine: a supervisor loop delegates
//! independently phrased sub-topics to parallel research workers, each
//! worker runs a bounded web-search/reflection loop, and the results are
//! deduplicated, summarized and compressed into citation-bearing notes
//! for downstream synthesis.
//!
//! ## Overview
//!
//! Delver can be used in two ways:
//!
//! 1. **As a CLI** - run the `delver` binary with a research query
//! 2. **As a library** - embed the engine in your own Rust project
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use delver::{Config, DuckDuckGoProvider, OllamaClient, SearchPipeline, Supervisor};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!
//!     let llm = Arc::new(OllamaClient::new(&config.llm.ollama_url, &config.llm.model));
//!     let summarizer = Arc::new(OllamaClient::new(
//!         &config.llm.ollama_url,
//!         &config.llm.summarization_model,
//!     ));
//!     let pipeline = Arc::new(SearchPipeline::new(
//!         Arc::new(DuckDuckGoProvider::new()),
//!         summarizer,
//!         config.search.clone(),
//!     ));
//!
//!     let supervisor = Supervisor::new(llm, pipeline, config.research.clone())?;
//!     let outcome = supervisor.run("Compare embedded vector databases").await?;
//!     println!("{}", outcome.joined_notes());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Guarantees
//!
//! - No dropped work: every dispatched worker contributes a note, degraded
//!   if need be, before the next round is planned.
//! - Hard budgets: round, per-worker and global invocation ceilings are
//!   enforced by the engine regardless of what the model recommends.
//! - Graceful degradation: provider failures never escape their component;
//!   a run always ends in a notes sequence or an explicit fatal error.
//! - Reproducible ordering: notes are ordered by round, then
//!   worker-dispatch order, never completion order.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama local inference (default) |
//! | `minimal` | No LLM provider; bring your own [`LLMClient`] impl |
//!
//! ## Modules
//!
//! - [`research`] - supervisor, workers, budgets, prompts
//! - [`search`] - search provider seam and result pipeline
//! - [`llm`] - LLM client seam and structured fallback invoker
//! - [`types`] - shared data model and error handling
//! - [`utils`] - configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// LLM provider clients and the structured fallback invoker.
pub mod llm;
/// Research orchestration: supervisor, workers, budgets.
pub mod research;
/// Web search provider seam and the result pipeline.
pub mod search;
/// Core types (tasks, notes, reports, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use llm::{invoke_structured, LLMClient};
pub use research::{RunBudget, Supervisor, Worker};
pub use search::{DuckDuckGoProvider, SearchPipeline, SearchProvider};
pub use types::{
    EngineError, Note, ResearchOutcome, ResearchTask, Result, SearchResult, TerminationReason,
    WorkerReport, WorkerStatus,
};
pub use utils::{Config, ResearchConfig};

#[cfg(feature = "ollama")]
pub use llm::OllamaClient;
