//! Degrade-gracefully structured generation.
//!
//! Orchestration decisions need typed values out of free-text model
//! output. [`invoke_structured`] wraps a single generation call in a
//! three-tier fallback chain so the call site always receives a value:
//!
//! 1. Ask for a reply conforming to the JSON schema of `T` and parse it
//!    strictly.
//! 2. Re-prompt demanding a single minimal JSON object and run an ordered
//!    arena of tolerant extractors over the reply.
//! 3. Hand back the caller-supplied fallback value.
//!
//! No tier raises past the caller: degraded correctness, not degraded
//! availability.

use crate::llm::client::LLMClient;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// Where a structured value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Parsed from genuine model output (tier 1 or 2).
    Model,
    /// The static tier-3 fallback value.
    Fallback,
}

/// Invoke the model for a `T`, reporting whether the result is genuine
/// model output or the tier-3 fallback.
pub async fn invoke_structured_traced<T>(
    llm: &dyn LLMClient,
    system: &str,
    prompt: &str,
    fallback: T,
) -> (T, Origin)
where
    T: DeserializeOwned + JsonSchema + Send,
{
    let schema = serde_json::to_string_pretty(&schemars::schema_for!(T)).unwrap_or_default();

    // Tier 1: schema-guided generation, strict parse.
    let tier1 = format!(
        "{prompt}\n\nRespond with a single JSON object conforming to this JSON schema:\n{schema}"
    );
    match llm.generate_with_system(system, &tier1).await {
        Ok(reply) => {
            if let Ok(value) = serde_json::from_str::<T>(reply.trim()) {
                return (value, Origin::Model);
            }
            tracing::debug!(
                reply_len = reply.len(),
                "strict parse of structured reply failed, re-prompting"
            );
        }
        Err(e) => tracing::warn!("structured generation tier 1 failed: {}", e),
    }

    // Tier 2: minimal-JSON re-prompt, tolerant parse arena.
    let tier2 = format!(
        "{prompt}\n\nReturn ONLY one minimal JSON object conforming to this JSON schema:\n\
         {schema}\nNo prose, no code fences, no explanation."
    );
    match llm.generate_with_system(system, &tier2).await {
        Ok(reply) => {
            if let Some(value) = parse_lenient::<T>(&reply) {
                return (value, Origin::Model);
            }
            tracing::warn!(
                reply_len = reply.len(),
                "no parse strategy accepted the re-prompted reply"
            );
        }
        Err(e) => tracing::warn!("structured generation tier 2 failed: {}", e),
    }

    // Tier 3: static placeholder for this call site.
    tracing::warn!("structured generation degraded to the fallback value");
    (fallback, Origin::Fallback)
}

/// Invoke the model for a `T`, falling back to `fallback` if the model is
/// unreachable or its output cannot be parsed. Never returns an error.
pub async fn invoke_structured<T>(llm: &dyn LLMClient, system: &str, prompt: &str, fallback: T) -> T
where
    T: DeserializeOwned + JsonSchema + Send,
{
    invoke_structured_traced(llm, system, prompt, fallback).await.0
}

type Extractor = fn(&str) -> Option<String>;

/// Ordered parse strategies, tried in sequence until one yields valid JSON.
const EXTRACTORS: &[Extractor] = &[verbatim, strip_code_fence, isolate_object];

/// Try each extractor in order and parse the first candidate that
/// deserializes into `T`.
pub(crate) fn parse_lenient<T: DeserializeOwned>(raw: &str) -> Option<T> {
    EXTRACTORS
        .iter()
        .find_map(|extract| extract(raw).and_then(|candidate| serde_json::from_str(&candidate).ok()))
}

fn verbatim(raw: &str) -> Option<String> {
    Some(raw.trim().to_string())
}

fn strip_code_fence(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let rest = trimmed.strip_prefix("```")?;
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let (inner, _) = rest.rsplit_once("```")?;
    Some(inner.trim().to_string())
}

fn isolate_object(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| raw[start..=end].to_string())
}
