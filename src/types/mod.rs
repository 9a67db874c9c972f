//! Core types shared across the research engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============= Research Types =============

/// A single delegated unit of research, created by the supervisor and
/// consumed by exactly one worker. Tasks are never retried or resumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchTask {
    /// Unique task identifier.
    pub id: Uuid,
    /// The sub-topic this task investigates, phrased as standalone
    /// research instructions.
    pub sub_topic: String,
    /// The supervisor round that created this task.
    pub round: u32,
}

impl ResearchTask {
    /// Create a task for a sub-topic delegated in the given round.
    pub fn new(sub_topic: impl Into<String>, round: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            sub_topic: sub_topic.into(),
            round,
        }
    }
}

/// One discovered source document after search-side processing.
///
/// The `url` is the canonical identity key: within one search pipeline
/// invocation each url appears at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Canonical source identifier, used for deduplication and citations.
    pub url: String,
    /// Document title as reported by the search provider.
    pub title: String,
    /// Raw content returned by the provider (snippet or page body).
    pub raw_content: String,
    /// Processed content: the snippet verbatim, or an abstractive summary
    /// with key excerpts for longer documents.
    pub summary: String,
}

/// A compressed, citation-bearing block of findings from one worker.
///
/// Notes are append-only: once the supervisor accepts a note it is never
/// mutated, and a second note carrying an already-seen task id is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// The task this note answers.
    pub task_id: Uuid,
    /// The supervisor round the task belonged to.
    pub round: u32,
    /// Citation-numbered narrative text.
    pub text: String,
}

/// State of a research worker; everything but `Running` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    /// Worker is still inside its tool-call loop.
    Running,
    /// The reasoning capability signalled research complete.
    Completed,
    /// The per-worker or global tool-call budget ran out.
    BudgetExhausted,
    /// The reasoning capability was unreachable or unusable.
    Failed,
}

/// Why the supervisor stopped planning further rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The planner signalled research complete.
    ExplicitComplete,
    /// The round or tool-invocation ceiling was reached. Not an error:
    /// accumulated notes are returned as-is.
    IterationBudgetExhausted,
    /// A fatal orchestration error aborted the run.
    Error,
}

/// Immutable snapshot a worker hands back to the supervisor on exit.
#[derive(Debug, Clone)]
pub struct WorkerReport {
    /// The task this worker consumed.
    pub task: ResearchTask,
    /// Terminal status of the worker loop.
    pub status: WorkerStatus,
    /// The compressed note, always present (degraded on failure).
    pub note: Note,
    /// Raw search evidence in gathering order, duplicates preserved.
    pub evidence: Vec<SearchResult>,
    /// Tool invocations this worker spent.
    pub tool_calls: u32,
}

/// Final result of a supervisor run.
#[derive(Debug, Clone)]
pub struct ResearchOutcome {
    /// All accepted notes, ordered by round then worker-dispatch order.
    pub notes: Vec<Note>,
    /// Why the run stopped.
    pub termination: TerminationReason,
    /// Number of planning rounds executed.
    pub rounds: u32,
    /// Total reasoning/tool invocations charged against the global budget.
    pub tool_calls: u32,
}

impl ResearchOutcome {
    /// Join all note texts into a single findings block for the
    /// downstream report writer.
    pub fn joined_notes(&self) -> String {
        self.notes
            .iter()
            .map(|n| n.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

// ============= Error Types =============

/// Errors that can abort an orchestration run.
///
/// Provider errors (LLM or search) are handled locally by the components
/// that see them and never propagate out of a run; only configuration and
/// input problems are fatal.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid configuration or missing required input.
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM provider error.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Search provider error.
    #[error("Search error: {0}")]
    Search(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_ids_are_unique() {
        let a = ResearchTask::new("topic", 0);
        let b = ResearchTask::new("topic", 0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_joined_notes_preserves_order() {
        let outcome = ResearchOutcome {
            notes: vec![
                Note {
                    task_id: Uuid::new_v4(),
                    round: 0,
                    text: "first".to_string(),
                },
                Note {
                    task_id: Uuid::new_v4(),
                    round: 1,
                    text: "second".to_string(),
                },
            ],
            termination: TerminationReason::ExplicitComplete,
            rounds: 2,
            tool_calls: 4,
        };

        assert_eq!(outcome.joined_notes(), "first\n\nsecond");
    }
}
