//! Top-level supervisor loop.

use crate::llm::{invoke_structured, LLMClient};
use crate::research::budget::RunBudget;
use crate::research::prompts;
use crate::research::worker::Worker;
use crate::search::SearchPipeline;
use crate::types::{
    EngineError, Note, ResearchOutcome, ResearchTask, Result, TerminationReason,
};
use crate::utils::config::ResearchConfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Action the planner can take in one round. Closed set, matched
/// exhaustively; the supervisor enforces the hard caps no matter what the
/// planner recommends.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SupervisorAction {
    /// Delegate independently phrased sub-topics to parallel workers.
    Delegate {
        /// One standalone sub-topic per worker to spawn.
        sub_topics: Vec<String>,
    },
    /// Record a planning reflection; a no-op round.
    Reflect {
        /// The reflection text.
        note: String,
    },
    /// All research needs are covered; stop.
    Complete,
}

/// The top-level orchestration loop.
///
/// On each round the supervisor either spawns 1..K workers against
/// independent sub-topics, records a reflection, or declares completion.
/// The round barrier is absolute: the next plan is computed only after
/// every worker dispatched in the current round has returned.
pub struct Supervisor {
    llm: Arc<dyn LLMClient>,
    pipeline: Arc<SearchPipeline>,
    config: ResearchConfig,
}

impl Supervisor {
    /// Create a supervisor. Fails fast on invalid budgets.
    pub fn new(
        llm: Arc<dyn LLMClient>,
        pipeline: Arc<SearchPipeline>,
        config: ResearchConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            llm,
            pipeline,
            config,
        })
    }

    /// Run the full orchestration over a research brief.
    ///
    /// Returns the accumulated notes and the termination reason. The only
    /// fatal failure is invalid input; everything downstream degrades into
    /// the notes instead of erroring.
    pub async fn run(&self, brief: &str) -> Result<ResearchOutcome> {
        if brief.trim().is_empty() {
            return Err(EngineError::Config("research brief is empty".to_string()));
        }

        let budget = Arc::new(RunBudget::new(
            self.config.max_total_tool_calls,
            self.config.wall_clock_limit,
        ));
        let mut notes: Vec<Note> = Vec::new();
        let mut seen_tasks: HashSet<Uuid> = HashSet::new();
        let mut reflections: Vec<String> = Vec::new();
        let mut termination = TerminationReason::IterationBudgetExhausted;
        let mut rounds = 0u32;

        while rounds < self.config.max_supervisor_rounds {
            // The planning call itself is charged against the global
            // budget; refusing here ends the run at the ceiling.
            if !budget.try_acquire() {
                tracing::info!("global invocation budget exhausted before planning");
                break;
            }
            rounds += 1;

            let prompt = prompts::planning_prompt(
                brief,
                &notes,
                &reflections,
                self.config.max_supervisor_rounds - rounds,
                self.config.max_concurrent_units,
            );
            // A dead planner degrades to a no-op round and drains to the
            // round ceiling rather than fabricating a completion signal.
            let action = invoke_structured(
                self.llm.as_ref(),
                prompts::LEAD_SYSTEM,
                &prompt,
                SupervisorAction::Reflect {
                    note: "Planner unavailable; no tasks delegated this round.".to_string(),
                },
            )
            .await;

            match action {
                SupervisorAction::Complete => {
                    tracing::info!(rounds, "planner signalled research complete");
                    termination = TerminationReason::ExplicitComplete;
                    break;
                }
                SupervisorAction::Reflect { note } => {
                    tracing::info!(rounds, "no-op planning round");
                    reflections.push(note);
                }
                SupervisorAction::Delegate { sub_topics } => {
                    let sub_topics: Vec<String> = sub_topics
                        .into_iter()
                        .filter(|topic| !topic.trim().is_empty())
                        .take(self.config.max_concurrent_units as usize)
                        .collect();

                    if sub_topics.is_empty() {
                        tracing::warn!(rounds, "planner delegated zero usable sub-topics");
                        continue;
                    }

                    tracing::info!(rounds, units = sub_topics.len(), "dispatching research round");
                    self.dispatch_round(
                        sub_topics,
                        rounds - 1,
                        &budget,
                        &mut notes,
                        &mut seen_tasks,
                    )
                    .await;
                }
            }
        }

        tracing::info!(
            ?termination,
            rounds,
            notes = notes.len(),
            tool_calls = budget.used(),
            "orchestration finished"
        );

        Ok(ResearchOutcome {
            notes,
            termination,
            rounds,
            tool_calls: budget.used(),
        })
    }

    /// Dispatch all tasks of one round concurrently and await every one of
    /// them; this is the round barrier. Notes are merged in worker-dispatch
    /// order, not completion order, so output is reproducible for a fixed
    /// task assignment.
    async fn dispatch_round(
        &self,
        sub_topics: Vec<String>,
        round: u32,
        budget: &Arc<RunBudget>,
        notes: &mut Vec<Note>,
        seen_tasks: &mut HashSet<Uuid>,
    ) {
        let tasks: Vec<ResearchTask> = sub_topics
            .into_iter()
            .map(|topic| ResearchTask::new(topic, round))
            .collect();

        let mut handles = Vec::with_capacity(tasks.len());
        for task in &tasks {
            let worker = Worker::new(
                Arc::clone(&self.llm),
                Arc::clone(&self.pipeline),
                self.config.worker_tool_calls_complex,
            );
            let budget = Arc::clone(budget);
            let task = task.clone();
            handles.push(tokio::spawn(async move { worker.run(task, budget).await }));
        }

        for (task, handle) in tasks.into_iter().zip(handles) {
            match handle.await {
                Ok(report) => {
                    if seen_tasks.insert(report.note.task_id) {
                        notes.push(report.note);
                    } else {
                        // Should not happen; guarded anyway.
                        tracing::warn!(task_id = %report.note.task_id, "duplicate note rejected");
                    }
                }
                Err(e) => {
                    // A single worker failure never aborts the round.
                    tracing::warn!(task_id = %task.id, "worker failed outright: {}", e);
                    if seen_tasks.insert(task.id) {
                        notes.push(Note {
                            task_id: task.id,
                            round: task.round,
                            text: format!("Sub-topic \"{}\" failed: {}", task.sub_topic, e),
                        });
                    }
                }
            }
        }
    }
}
