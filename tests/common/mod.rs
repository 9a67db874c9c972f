//! Shared test stubs.
//!
//! Hand-rolled stand-ins for the two external collaborators: a scripted
//! LLM driven by a closure over the prompt text, and a search provider
//! with canned hits, per-query delays and failure modes.

use async_trait::async_trait;
use delver::search::{SearchHit, SearchOptions, SearchProvider};
use delver::types::{EngineError, Result};
use delver::LLMClient;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared chronological event log for cross-stub ordering assertions.
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Create an empty event log.
pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

type ReplyFn = dyn Fn(&str) -> Result<String> + Send + Sync;

/// LLM stub that computes each reply from the prompt text.
pub struct FnLlm {
    reply: Box<ReplyFn>,
    calls: AtomicU32,
}

impl FnLlm {
    /// Build a stub from a prompt-inspecting closure.
    pub fn new(reply: impl Fn(&str) -> Result<String> + Send + Sync + 'static) -> Self {
        Self {
            reply: Box::new(reply),
            calls: AtomicU32::new(0),
        }
    }

    /// A stub whose provider is always unreachable.
    pub fn failing() -> Self {
        Self::new(|_| Err(EngineError::Llm("stub provider unreachable".to_string())))
    }

    /// Number of generation calls made so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LLMClient for FnLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.reply)(prompt)
    }

    async fn generate_with_system(&self, _system: &str, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.reply)(prompt)
    }

    fn model_name(&self) -> &str {
        "stub-llm"
    }
}

/// Search provider stub with canned per-query hits, optional per-query
/// delays, and an always-failing mode.
pub struct StubSearch {
    hits_for: HashMap<String, Vec<SearchHit>>,
    delays_ms: HashMap<String, u64>,
    fail: bool,
    calls: AtomicU32,
    events: Option<EventLog>,
}

impl StubSearch {
    /// Provider returning the given hits per query (empty for unknown
    /// queries).
    pub fn with_hits(hits_for: HashMap<String, Vec<SearchHit>>) -> Self {
        Self {
            hits_for,
            delays_ms: HashMap::new(),
            fail: false,
            calls: AtomicU32::new(0),
            events: None,
        }
    }

    /// Provider that errors on every call.
    pub fn failing() -> Self {
        Self {
            hits_for: HashMap::new(),
            delays_ms: HashMap::new(),
            fail: true,
            calls: AtomicU32::new(0),
            events: None,
        }
    }

    /// Sleep the given milliseconds before answering each listed query.
    pub fn with_delays(mut self, delays_ms: HashMap<String, u64>) -> Self {
        self.delays_ms = delays_ms;
        self
    }

    /// Record a `search_done:<query>` event after each answered query.
    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    /// Number of provider calls made so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(&self, query: &str, _options: &SearchOptions) -> Result<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(ms) = self.delays_ms.get(query) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        if let Some(events) = &self.events {
            events.lock().unwrap().push(format!("search_done:{}", query));
        }
        if self.fail {
            return Err(EngineError::Search("stub provider down".to_string()));
        }

        Ok(self.hits_for.get(query).cloned().unwrap_or_default())
    }
}

/// Build a search hit with a short snippet (never triggers summarization).
pub fn hit(url: &str, title: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        url: url.to_string(),
        snippet: format!("short snippet about {}", title),
    }
}
