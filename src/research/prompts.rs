//! Prompt templates for the orchestration engine.
//!
//! Prompt content is externally supplied configuration as far as the
//! engine is concerned; these defaults make the engine runnable end to
//! end. [`crate::research::Supervisor`] and [`crate::research::Worker`]
//! only rely on the structured action schemas, never on this wording.

use crate::types::Note;
use crate::utils::today;

/// System prompt for the supervisor's planning call.
pub const LEAD_SYSTEM: &str = "You are the lead research supervisor. You coordinate research by \
     delegating independently phrased sub-topics to parallel sub-researchers, reflecting on \
     progress, or declaring the research complete. Sub-researchers cannot see each other's work, \
     so every sub-topic must be standalone.";

/// System prompt for a worker's tool-call cycle.
pub const RESEARCHER_SYSTEM: &str = "You are a focused sub-researcher. You investigate exactly one \
     sub-topic by issuing web search queries and recording reflections, then signal completion \
     once the evidence answers the sub-topic.";

/// System prompt for note compression.
pub const COMPRESS_SYSTEM: &str = "You rewrite raw research evidence into a dense, factual, \
     citation-numbered narrative. Preserve every relevant fact and keep the given citation \
     indices exactly as numbered.";

/// Build the supervisor planning prompt from the current orchestration
/// state.
pub fn planning_prompt(
    brief: &str,
    notes: &[Note],
    reflections: &[String],
    rounds_remaining: u32,
    max_units: u32,
) -> String {
    let findings = if notes.is_empty() {
        "(none yet)".to_string()
    } else {
        notes
            .iter()
            .map(|n| n.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    };
    let reflections = if reflections.is_empty() {
        "(none)".to_string()
    } else {
        reflections.join("\n")
    };

    format!(
        "Today's date is {date}.\n\n\
         Research brief:\n{brief}\n\n\
         Findings so far:\n{findings}\n\n\
         Your reflections so far:\n{reflections}\n\n\
         You have {rounds_remaining} planning rounds left and may delegate at most \
         {max_units} parallel sub-topics this round.\n\n\
         Decide the next supervisor action: delegate new independent sub-topics, reflect on \
         progress without delegating, or declare the research complete.",
        date = today(),
    )
}

/// Build a worker's per-cycle decision prompt.
pub fn worker_cycle_prompt(sub_topic: &str, transcript: &[String], calls_remaining: u32) -> String {
    let history = if transcript.is_empty() {
        "(no tool calls yet)".to_string()
    } else {
        transcript.join("\n\n")
    };

    format!(
        "Today's date is {date}.\n\n\
         Sub-topic: {sub_topic}\n\n\
         Tool call history:\n{history}\n\n\
         You have {calls_remaining} tool calls left. Decide the next action: search with one \
         distinct query, reflect on what you have and what is missing, or declare this \
         sub-topic complete.",
        date = today(),
    )
}

/// Build the compression prompt over citation-numbered evidence.
pub fn compression_prompt(sub_topic: &str, cited_sources: &str) -> String {
    format!(
        "Compress the evidence below into findings for the sub-topic \"{sub_topic}\".\n\n\
         Cite sources inline with their bracketed index, e.g. [1]. Do not renumber, drop or \
         invent citations.\n\n\
         Evidence:\n{cited_sources}",
    )
}
