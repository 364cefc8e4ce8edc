//! Agent lifecycle layer
//!
//! Construction resolves configuration and attempts storage best-effort;
//! the ready agent answers `perform_task`/`run` with uniform envelopes;
//! disposal releases storage exactly once.

mod base;

pub use base::{Agent, AgentBuilder};
