//! Configuration layer
//!
//! Layered resolution of a shared base document plus an optional per-agent
//! override, producing one immutable [`Settings`] mapping per agent.

mod resolver;
mod settings;

pub use resolver::{ConfigError, ConfigResolver};
pub use settings::Settings;
