//! Bounded per-task research loop.

use crate::llm::{invoke_structured, invoke_structured_traced, LLMClient, Origin};
use crate::research::budget::RunBudget;
use crate::research::prompts;
use crate::search::SearchPipeline;
use crate::types::{Note, ResearchTask, SearchResult, WorkerReport, WorkerStatus};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Action a worker can take in one cycle. Closed set: the loop matches
/// exhaustively, there is no open-ended tool dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WorkerAction {
    /// Run the search pipeline over one or more queries.
    Search {
        /// Search queries, conventionally one distinct query per cycle.
        queries: Vec<String>,
    },
    /// Record an internal reflection. Shapes the next decision only;
    /// excluded from compression input.
    Reflect {
        /// The reflection text.
        thought: String,
    },
    /// The sub-topic is answered; stop and compress.
    Complete,
}

/// Consecutive zero-result searches tolerated before the worker gives up
/// on its search capability.
const MAX_FRUITLESS_SEARCHES: u32 = 2;

/// Structured compression output.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
struct CompressedFindings {
    /// Citation-numbered narrative over the gathered evidence.
    findings: String,
}

/// Runs a single bounded tool-call loop over one delegated sub-topic.
///
/// The worker owns its state exclusively; on exit it hands back an
/// immutable [`WorkerReport`]. All provider failures degrade into the
/// report, so `run` never errors.
pub struct Worker {
    llm: Arc<dyn LLMClient>,
    pipeline: Arc<SearchPipeline>,
    max_tool_calls: u32,
}

impl Worker {
    /// Create a worker with the single tool-call ceiling it will enforce.
    /// Which ceiling a task deserves (simple vs. complex) is the caller's
    /// policy.
    pub fn new(llm: Arc<dyn LLMClient>, pipeline: Arc<SearchPipeline>, max_tool_calls: u32) -> Self {
        Self {
            llm,
            pipeline,
            max_tool_calls,
        }
    }

    /// Run the task to completion and return the report. Never errors:
    /// budget exhaustion and provider failures are terminal statuses, and
    /// a degraded note is still produced.
    pub async fn run(&self, task: ResearchTask, budget: Arc<RunBudget>) -> WorkerReport {
        tracing::info!(task_id = %task.id, sub_topic = %task.sub_topic, "worker started");

        let mut evidence: Vec<SearchResult> = Vec::new();
        let mut transcript: Vec<String> = Vec::new();
        let mut tool_calls = 0u32;
        let mut fruitless_searches = 0u32;

        let status = loop {
            // Stop conditions, checked before each cycle.
            if tool_calls >= self.max_tool_calls {
                tracing::info!(task_id = %task.id, "per-worker tool budget exhausted");
                break WorkerStatus::BudgetExhausted;
            }
            if fruitless_searches >= MAX_FRUITLESS_SEARCHES {
                tracing::warn!(task_id = %task.id, "search capability keeps returning nothing, stopping worker");
                break WorkerStatus::Failed;
            }
            if !budget.try_acquire() {
                tracing::info!(task_id = %task.id, "global budget exhausted, not starting a new cycle");
                break WorkerStatus::BudgetExhausted;
            }

            let prompt = prompts::worker_cycle_prompt(
                &task.sub_topic,
                &transcript,
                self.max_tool_calls - tool_calls,
            );
            let (action, origin) = invoke_structured_traced(
                self.llm.as_ref(),
                prompts::RESEARCHER_SYSTEM,
                &prompt,
                WorkerAction::Complete,
            )
            .await;

            if origin == Origin::Fallback {
                tracing::warn!(task_id = %task.id, "reasoning capability unusable, stopping worker");
                break WorkerStatus::Failed;
            }

            match action {
                WorkerAction::Complete => break WorkerStatus::Completed,
                WorkerAction::Reflect { thought } => {
                    tool_calls += 1;
                    tracing::debug!(task_id = %task.id, "reflection recorded");
                    transcript.push(format!("Reflection recorded: {}", thought));
                }
                WorkerAction::Search { queries } => {
                    tool_calls += 1;
                    let queries = if queries.is_empty() {
                        vec![task.sub_topic.clone()]
                    } else {
                        queries
                    };
                    let output = self.pipeline.run(&queries).await;
                    if output.results.is_empty() {
                        fruitless_searches += 1;
                    } else {
                        fruitless_searches = 0;
                    }
                    transcript.push(output.formatted);
                    evidence.extend(output.results);
                }
            }
        };

        let note = self.compress(&task, &evidence).await;
        tracing::info!(
            task_id = %task.id,
            ?status,
            tool_calls,
            sources = evidence.len(),
            "worker finished"
        );

        WorkerReport {
            task,
            status,
            note,
            evidence,
            tool_calls,
        }
    }

    /// Compress the gathered evidence into one citation-numbered note.
    /// Reflections never reach this step; only search evidence does.
    async fn compress(&self, task: &ResearchTask, evidence: &[SearchResult]) -> Note {
        let cited = assign_citations(evidence);

        if cited.is_empty() {
            return Note {
                task_id: task.id,
                round: task.round,
                text: format!(
                    "No findings were obtained for sub-topic \"{}\".",
                    task.sub_topic
                ),
            };
        }

        let sources_block = cited
            .iter()
            .map(|(index, result)| {
                format!(
                    "[{}] {} ({})\n{}",
                    index, result.title, result.url, result.summary
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        // Tier-3 fallback: a plain source listing that still carries the
        // citation indices.
        let fallback = CompressedFindings {
            findings: format!(
                "Sources consulted for \"{}\":\n\n{}",
                task.sub_topic, sources_block
            ),
        };

        let compressed = invoke_structured(
            self.llm.as_ref(),
            prompts::COMPRESS_SYSTEM,
            &prompts::compression_prompt(&task.sub_topic, &sources_block),
            fallback,
        )
        .await;

        Note {
            task_id: task.id,
            round: task.round,
            text: compressed.findings,
        }
    }
}

/// Assign one stable citation index per unique source, numbered
/// contiguously from 1 in first-encountered order. Duplicate re-fetches of
/// a source never get a second index.
pub fn assign_citations(evidence: &[SearchResult]) -> Vec<(usize, &SearchResult)> {
    let mut seen = HashSet::new();
    let mut cited = Vec::new();
    for result in evidence {
        if seen.insert(result.url.as_str()) {
            cited.push((cited.len() + 1, result));
        }
    }
    cited
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(url: &str) -> SearchResult {
        SearchResult {
            url: url.to_string(),
            title: format!("title of {}", url),
            raw_content: "raw".to_string(),
            summary: "summary".to_string(),
        }
    }

    #[test]
    fn test_citations_contiguous_despite_refetches() {
        let evidence = vec![
            result("https://a.example"),
            result("https://b.example"),
            result("https://a.example"),
            result("https://c.example"),
            result("https://b.example"),
            result("https://d.example"),
        ];

        let cited = assign_citations(&evidence);
        let indices: Vec<usize> = cited.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);

        let urls: Vec<&str> = cited.iter().map(|(_, r)| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://a.example",
                "https://b.example",
                "https://c.example",
                "https://d.example"
            ]
        );
    }

    #[test]
    fn test_citations_empty_evidence() {
        assert!(assign_citations(&[]).is_empty());
    }
}
