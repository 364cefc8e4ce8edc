//! Completion request options

use crate::config::Settings;
use serde::{Deserialize, Serialize};

/// Knobs an agent passes through to its model client. Concrete clients
/// decide which of these their provider honors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Model name/ID override (client default if None)
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Maximum tokens in the response
    pub max_tokens: Option<u32>,
}

impl CompletionOptions {
    /// Options drawn from the `ai` section of the merged configuration
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            model: settings.get_str("ai.model").map(str::to_string),
            temperature: settings.get_f64("ai.temperature").map(|t| t as f32),
            max_tokens: settings.get_u64("ai.max_tokens").map(|t| t as u32),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}
