//! Environment-driven configuration.
//!
//! All configuration is an explicit struct passed by value into the
//! components at construction; there is no process-wide mutable state.

use crate::search::provider::{SafeSearch, SearchOptions};
use crate::types::{EngineError, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Top-level engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Reasoning and summarization model settings.
    pub llm: LlmConfig,
    /// Search provider settings.
    pub search: SearchOptions,
    /// Orchestration budgets.
    pub research: ResearchConfig,
}

/// LLM provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the Ollama server.
    pub ollama_url: String,
    /// Model used for planning, research and compression.
    pub model: String,
    /// Smaller model used for webpage summarization.
    pub summarization_model: String,
}

/// Hard budgets enforced by the orchestration engine, regardless of what
/// the reasoning capability recommends.
#[derive(Debug, Clone, Deserialize)]
pub struct ResearchConfig {
    /// Maximum parallel research units per supervisor round.
    pub max_concurrent_units: u32,
    /// Maximum supervisor planning rounds.
    pub max_supervisor_rounds: u32,
    /// Global ceiling on reasoning/tool invocations across the whole run.
    pub max_total_tool_calls: u32,
    /// Per-worker tool-call ceiling for simple tasks.
    pub worker_tool_calls_simple: u32,
    /// Per-worker tool-call ceiling for complex tasks.
    pub worker_tool_calls_complex: u32,
    /// Optional wall-clock limit for the whole run.
    pub wall_clock_limit: Option<Duration>,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_units: 3,
            max_supervisor_rounds: 6,
            max_total_tool_calls: 20,
            worker_tool_calls_simple: 4,
            worker_tool_calls_complex: 8,
            wall_clock_limit: None,
        }
    }
}

impl ResearchConfig {
    /// Reject budgets the engine cannot run with. A zero ceiling is a
    /// fatal configuration error, not a degraded run.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_units == 0 {
            return Err(EngineError::Config(
                "max_concurrent_units must be at least 1".to_string(),
            ));
        }
        if self.max_supervisor_rounds == 0 {
            return Err(EngineError::Config(
                "max_supervisor_rounds must be at least 1".to_string(),
            ));
        }
        if self.max_total_tool_calls == 0 {
            return Err(EngineError::Config(
                "max_total_tool_calls must be at least 1".to_string(),
            ));
        }
        if self.worker_tool_calls_simple == 0 || self.worker_tool_calls_complex == 0 {
            return Err(EngineError::Config(
                "worker tool-call ceilings must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from the environment (and `.env` if present),
    /// applying defaults for everything unset.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            llm: LlmConfig {
                ollama_url: env::var("OLLAMA_URL")
                    .unwrap_or_else(|_| "http://localhost:11434".to_string()),
                model: env::var("DELVER_MODEL").unwrap_or_else(|_| "llama3.2".to_string()),
                summarization_model: env::var("DELVER_SUMMARY_MODEL")
                    .unwrap_or_else(|_| "llama3.2".to_string()),
            },
            search: SearchOptions {
                max_results: parse_var("DELVER_SEARCH_MAX_RESULTS", 3)?,
                region: env::var("DELVER_SEARCH_REGION").unwrap_or_else(|_| "us-en".to_string()),
                safesearch: SafeSearch::parse(
                    &env::var("DELVER_SEARCH_SAFESEARCH").unwrap_or_else(|_| "moderate".to_string()),
                ),
            },
            research: ResearchConfig {
                max_concurrent_units: parse_var("DELVER_MAX_UNITS", 3)?,
                max_supervisor_rounds: parse_var("DELVER_MAX_ROUNDS", 6)?,
                max_total_tool_calls: parse_var("DELVER_MAX_TOOL_CALLS", 20)?,
                worker_tool_calls_simple: parse_var("DELVER_WORKER_CALLS_SIMPLE", 4)?,
                worker_tool_calls_complex: parse_var("DELVER_WORKER_CALLS_COMPLEX", 8)?,
                wall_clock_limit: env::var("DELVER_WALL_CLOCK_SECS")
                    .ok()
                    .map(|raw| {
                        raw.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                            EngineError::Config(format!("DELVER_WALL_CLOCK_SECS: {}", e))
                        })
                    })
                    .transpose()?,
            },
        };

        config.research.validate()?;
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| EngineError::Config(format!("{}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budgets_are_valid() {
        assert!(ResearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_units_is_fatal() {
        let config = ResearchConfig {
            max_concurrent_units: 0,
            ..ResearchConfig::default()
        };
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_zero_rounds_is_fatal() {
        let config = ResearchConfig {
            max_supervisor_rounds: 0,
            ..ResearchConfig::default()
        };
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_zero_worker_ceiling_is_fatal() {
        let config = ResearchConfig {
            worker_tool_calls_complex: 0,
            ..ResearchConfig::default()
        };
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
    }
}
