//! coterie - a multi-agent automation harness
//!
//! Named agent personas share one lifecycle: layered configuration
//! resolution (base document plus per-agent override), best-effort
//! storage connection, and a pluggable model client, all behind a
//! uniform task-execution contract that returns a [`TaskResult`] for
//! every call.
//!
//! Construction never fails: missing or malformed configuration,
//! incomplete storage credentials, and unreachable databases all degrade
//! to smaller agents that still execute tasks. Provider and publishing
//! failures are folded into the result envelope rather than propagated.

pub mod agent;
pub mod config;
pub mod logging;
pub mod persona;
pub mod provider;
pub mod publish;
pub mod storage;
pub mod task;
pub mod timer;

pub use agent::{Agent, AgentBuilder};
pub use config::{ConfigError, ConfigResolver, Settings};
pub use persona::{PersonaKind, TaskContext, TaskRoutine};
pub use provider::{CompletionOptions, ModelClient, NullModelClient, ProviderError};
pub use publish::{NullPublishTarget, PostDraft, PublishError, PublishReceipt, PublishTarget};
pub use storage::{StorageConnector, StorageError, StorageParams};
pub use task::{TaskResult, TaskStatus};
pub use timer::{CountdownSession, Phase, PomodoroConfig, PomodoroSession, TimerSession};
