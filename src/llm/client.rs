use crate::types::Result;
use async_trait::async_trait;

/// Generic LLM client trait for provider abstraction.
///
/// All reasoning providers implement this trait, allowing the engine to
/// work with any backend without changing orchestration code. Methods may
/// fail; orchestration-critical call sites go through
/// [`crate::llm::structured::invoke_structured`] instead of calling these
/// directly, so provider errors degrade rather than propagate.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with a system prompt.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name/identifier.
    fn model_name(&self) -> &str;
}
