//! Multi-agent research orchestration.
//!
//! A round-based fan-out/fan-in engine:
//! - [`supervisor::Supervisor`] plans each round, dispatches 1..K workers
//!   in parallel, and aggregates their notes behind a round barrier.
//! - [`worker::Worker`] runs one bounded tool-call loop over a single
//!   delegated sub-topic and compresses its evidence into one note.
//! - [`budget::RunBudget`] is the shared global invocation budget used for
//!   cooperative mid-round cancellation.
//!
//! Within a round workers share no mutable state; the only cross-worker
//! resources are the stateless provider endpoints and the atomic budget.

/// Global invocation budget and wall-clock deadline.
pub mod budget;
/// Prompt templates for planning, research and compression.
pub mod prompts;
/// The top-level supervisor loop.
pub mod supervisor;
/// The bounded per-task research loop.
pub mod worker;

pub use budget::RunBudget;
pub use supervisor::{Supervisor, SupervisorAction};
pub use worker::{assign_citations, Worker, WorkerAction};
