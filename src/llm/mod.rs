//! LLM provider clients and abstractions.
//!
//! This module provides a unified interface for the reasoning capability
//! the engine depends on. The [`LLMClient`] trait abstracts the provider;
//! [`structured`] wraps any client in a degrade-gracefully invoker that
//! always yields a typed value, never an error.
//!
//! # Supported Providers
//!
//! Enable providers via Cargo features:
//! - `ollama` - Local Ollama server (default)
//!
//! Any other provider can be plugged in by implementing [`LLMClient`].

/// Core LLM client trait.
pub mod client;
/// Tiered degrade-gracefully wrapper for structured generation.
pub mod structured;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use client::LLMClient;
pub use structured::{invoke_structured, invoke_structured_traced, Origin};

#[cfg(feature = "ollama")]
pub use ollama::OllamaClient;
