//! Configuration and small shared helpers.

/// Environment-driven configuration.
pub mod config;

pub use config::{Config, LlmConfig, ResearchConfig};

/// Current date in a human-readable format, for prompt context.
pub fn today() -> String {
    chrono::Local::now().format("%a %b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_today_is_nonempty() {
        assert!(!today().is_empty());
    }
}
