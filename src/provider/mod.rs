//! Model provider layer
//!
//! Defines the pluggable [`ModelClient`] capability and its unconfigured
//! default. Concrete provider integrations live outside the core.

mod client;
mod options;

pub use client::{ModelClient, NullModelClient, ProviderError};
pub use options::CompletionOptions;
