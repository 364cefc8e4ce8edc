//! Model client capability
//!
//! The core defines only the contract: send a prompt, get text back, or an
//! explicit "unavailable" signal. Concrete provider clients (wire formats,
//! streaming, retries) live outside the core and plug in through
//! [`ModelClient`].

use super::CompletionOptions;
use thiserror::Error;
use tracing::warn;

/// How many characters of a prompt are logged when no client is configured
const PROMPT_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Request(String),
    #[error("provider returned a malformed response: {0}")]
    MalformedResponse(String),
}

/// Capability to exchange a prompt for a textual response.
///
/// `Ok(None)` means the model is unavailable (not configured, feature
/// switched off). Callers must treat it as an ordinary state, not an
/// error; only genuine request failures surface as `Err`.
pub trait ModelClient: Send {
    fn complete(
        &self,
        prompt: &str,
        opts: &CompletionOptions,
    ) -> Result<Option<String>, ProviderError>;
}

/// The unconfigured default: logs a bounded prompt preview and reports
/// the model as unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullModelClient;

impl ModelClient for NullModelClient {
    fn complete(
        &self,
        prompt: &str,
        _opts: &CompletionOptions,
    ) -> Result<Option<String>, ProviderError> {
        warn!(
            prompt_preview = %preview(prompt, PROMPT_PREVIEW_CHARS),
            "no model client configured, prompt not sent"
        );
        Ok(None)
    }
}

/// First `limit` characters of a prompt, with an ellipsis when truncated.
/// Char-based so multibyte prompts never split mid-codepoint.
fn preview(prompt: &str, limit: usize) -> String {
    if prompt.chars().count() <= limit {
        prompt.to_string()
    } else {
        let mut p: String = prompt.chars().take(limit).collect();
        p.push_str("...");
        p
    }
}
