//! Agent personas
//!
//! A closed set of persona variants behind one capability interface.
//! Each persona specializes prompt construction and task routing but
//! shares the agent lifecycle; the variant is selected at construction
//! time via [`PersonaKind`], never by runtime type inspection.
//!
//! Routines never let provider or publisher failures escape: every branch
//! returns a [`TaskResult`], with expected failures reported through the
//! `error` status.

mod automation;
mod creative;
mod oracle;
mod publishing;

pub use automation::AutomationRoutine;
pub use creative::CreativeRoutine;
pub use oracle::OracleRoutine;
pub use publishing::PublishingRoutine;

use crate::config::Settings;
use crate::provider::{CompletionOptions, ModelClient};
use crate::publish::PublishTarget;
use crate::storage::StorageConnector;
use crate::task::TaskResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Which persona an agent runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaKind {
    /// No specialization; every task reports `not_implemented`
    #[default]
    Base,
    /// Knowledge/lore persona: answers, blog drafting, draft-and-post
    Oracle,
    /// Operational persona: status reports, request summaries
    Automation,
    /// Creative persona: long-form drafts, social formatting
    Creative,
    /// Publishing persona: remote posting through a publish target
    Publishing,
}

impl PersonaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaKind::Base => "base",
            PersonaKind::Oracle => "oracle",
            PersonaKind::Automation => "automation",
            PersonaKind::Creative => "creative",
            PersonaKind::Publishing => "publishing",
        }
    }

    /// Build the routine for this variant
    pub fn routine(&self) -> Box<dyn TaskRoutine> {
        match self {
            PersonaKind::Base => Box::new(BaseRoutine),
            PersonaKind::Oracle => Box::new(OracleRoutine),
            PersonaKind::Automation => Box::new(AutomationRoutine),
            PersonaKind::Creative => Box::new(CreativeRoutine),
            PersonaKind::Publishing => Box::new(PublishingRoutine),
        }
    }
}

/// What a routine may touch while performing a task: the owning agent's
/// identity, merged settings, model client, publish target, and storage.
pub struct TaskContext<'a> {
    pub agent_name: &'a str,
    pub settings: &'a Settings,
    pub model: &'a dyn ModelClient,
    pub publisher: &'a dyn PublishTarget,
    pub storage: &'a mut StorageConnector,
}

/// One task-execution entry point shared by every persona
pub trait TaskRoutine: Send {
    fn perform(
        &self,
        cx: &mut TaskContext<'_>,
        description: &str,
        details: Option<&Value>,
    ) -> TaskResult;
}

/// The unspecialized default. Mirrors the lifecycle contract: calling a
/// task on a base agent is a programming error signaled through the
/// envelope, never an exception.
pub struct BaseRoutine;

impl TaskRoutine for BaseRoutine {
    fn perform(
        &self,
        cx: &mut TaskContext<'_>,
        description: &str,
        _details: Option<&Value>,
    ) -> TaskResult {
        warn!(
            agent = %cx.agent_name,
            task = description,
            "base task routine called, a persona must supply this behavior"
        );
        TaskResult::not_implemented(
            "task execution must be supplied by a persona; this agent has none",
        )
    }
}

/// Run the model and unwrap the expected failure modes into `TaskResult`s
/// a routine can return directly.
pub(crate) fn completed_text(
    cx: &TaskContext<'_>,
    prompt: &str,
    opts: &CompletionOptions,
) -> Result<String, TaskResult> {
    match cx.model.complete(prompt, opts) {
        Ok(Some(text)) => Ok(text),
        Ok(None) => Err(TaskResult::error("model client not configured")),
        Err(e) => Err(TaskResult::error(format!("model call failed: {e}"))),
    }
}

/// First present string among the named detail fields
pub(crate) fn detail_str<'a>(details: Option<&'a Value>, keys: &[&str]) -> Option<&'a str> {
    let details = details?;
    keys.iter()
        .find_map(|key| details.get(key).and_then(Value::as_str))
}

/// String-array detail field, tolerating absence and non-string entries
pub(crate) fn detail_str_list(details: Option<&Value>, key: &str) -> Vec<String> {
    details
        .and_then(|d| d.get(key))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::publish::NullPublishTarget;

    #[test]
    fn base_routine_is_not_implemented() {
        let settings = Settings::empty();
        let model = StaticModel("unused");
        let publisher = NullPublishTarget;
        let mut storage = StorageConnector::absent();
        let mut cx = TaskContext {
            agent_name: "plain",
            settings: &settings,
            model: &model,
            publisher: &publisher,
            storage: &mut storage,
        };

        let result = BaseRoutine.perform(&mut cx, "anything at all", None);
        assert_eq!(result.status, crate::task::TaskStatus::NotImplemented);
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_value(PersonaKind::Publishing).unwrap();
        assert_eq!(json, serde_json::json!("publishing"));
        let kind: PersonaKind = serde_json::from_value(serde_json::json!("oracle")).unwrap();
        assert_eq!(kind, PersonaKind::Oracle);
        assert_eq!(PersonaKind::default(), PersonaKind::Base);
    }

    #[test]
    fn detail_helpers() {
        let details = serde_json::json!({
            "topic": "digital minds",
            "tags": ["ai", 7, "lore"]
        });
        assert_eq!(
            detail_str(Some(&details), &["subject", "topic"]),
            Some("digital minds")
        );
        assert_eq!(detail_str(None, &["topic"]), None);
        assert_eq!(detail_str_list(Some(&details), "tags"), vec!["ai", "lore"]);
        assert!(detail_str_list(Some(&details), "missing").is_empty());
    }
}
