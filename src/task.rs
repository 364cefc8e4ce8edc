//! Uniform task-execution envelope
//!
//! Every task an agent performs resolves to a [`TaskResult`]. Expected
//! failure modes (unconfigured model, missing publisher, unrouted task)
//! are reported through the status field, never through panics or raw
//! errors, so callers can branch on status uniformly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a single task execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task ran to completion
    Ok,
    /// No routine handled this task description
    NotImplemented,
    /// Task was routed but failed; see message
    Error,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Ok => "ok",
            TaskStatus::NotImplemented => "not_implemented",
            TaskStatus::Error => "error",
        }
    }
}

/// Result envelope returned by every task execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    /// Unique id for this task invocation
    pub id: Uuid,
    pub status: TaskStatus,
    /// Human-readable outcome description
    pub message: String,
    /// Structured output, when the task produced any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    pub completed_at: DateTime<Utc>,
}

impl TaskResult {
    fn new(status: TaskStatus, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            status,
            message: message.into(),
            payload: None,
            completed_at: Utc::now(),
        }
    }

    /// Successful result with a message only
    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(TaskStatus::Ok, message)
    }

    /// Successful result carrying structured output
    pub fn ok_with_payload(message: impl Into<String>, payload: serde_json::Value) -> Self {
        let mut result = Self::new(TaskStatus::Ok, message);
        result.payload = Some(payload);
        result
    }

    /// No handler for this task description
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(TaskStatus::NotImplemented, message)
    }

    /// Task failed in an expected, reportable way
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(TaskStatus::Error, message)
    }

    pub fn is_ok(&self) -> bool {
        self.status == TaskStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_value(TaskStatus::NotImplemented).unwrap();
        assert_eq!(json, serde_json::json!("not_implemented"));
        assert_eq!(TaskStatus::Ok.as_str(), "ok");
        assert_eq!(TaskStatus::Error.as_str(), "error");
    }

    #[test]
    fn envelope_roundtrip() {
        let result = TaskResult::ok_with_payload("done", serde_json::json!({"n": 1}));
        let json = serde_json::to_string(&result).unwrap();
        let back: TaskResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status, TaskStatus::Ok);
        assert_eq!(back.message, "done");
        assert_eq!(back.payload, Some(serde_json::json!({"n": 1})));
        assert_eq!(back.id, result.id);
    }

    #[test]
    fn error_has_no_payload() {
        let result = TaskResult::error("boom");
        assert_eq!(result.status, TaskStatus::Error);
        assert!(result.payload.is_none());
        assert!(!result.is_ok());
    }
}
