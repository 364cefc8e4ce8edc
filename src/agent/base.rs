//! Agent lifecycle
//!
//! An [`Agent`] owns one resolved [`Settings`], at most one storage
//! connection, one model client, and one publish target, and exposes the
//! uniform task contract. Construction never fails outward: every
//! sub-resource degrades to an absent/null default, logged. Teardown is
//! explicit through [`Agent::release`] and repeated on drop, both
//! idempotent.

use crate::config::{ConfigResolver, Settings};
use crate::persona::{PersonaKind, TaskContext, TaskRoutine};
use crate::provider::{ModelClient, NullModelClient};
use crate::publish::{NullPublishTarget, PublishTarget};
use crate::storage::{StorageConnector, StorageParams};
use crate::task::TaskResult;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::{debug, info};

/// A named unit combining configuration, optional storage, and pluggable
/// model/publish capabilities behind one task contract
pub struct Agent {
    name: String,
    persona: PersonaKind,
    settings: Settings,
    storage: StorageConnector,
    model: Box<dyn ModelClient>,
    publisher: Box<dyn PublishTarget>,
    routine: Box<dyn TaskRoutine>,
}

impl Agent {
    /// Start building an agent rooted at a project directory
    pub fn builder(name: impl Into<String>, project_root: impl Into<PathBuf>) -> AgentBuilder {
        AgentBuilder {
            name: name.into(),
            project_root: project_root.into(),
            config_path: None,
            persona: PersonaKind::Base,
            model: None,
            publisher: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn persona(&self) -> PersonaKind {
        self.persona
    }

    /// The merged configuration, read-only for this agent's lifetime
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn has_storage(&self) -> bool {
        self.storage.is_connected()
    }

    /// Execute one task. Always returns an envelope; persona failures and
    /// unrouted descriptions surface as statuses, never as panics or
    /// propagated errors.
    pub fn perform_task(&mut self, description: &str, details: Option<&Value>) -> TaskResult {
        debug!(agent = %self.name, task = description, "performing task");
        let mut cx = TaskContext {
            agent_name: &self.name,
            settings: &self.settings,
            model: &*self.model,
            publisher: &*self.publisher,
            storage: &mut self.storage,
        };
        let result = self.routine.perform(&mut cx, description, details);
        debug!(agent = %self.name, status = result.status.as_str(), "task finished");
        result
    }

    /// Smoke-test entry point: performs the persona's default task and
    /// returns whatever `perform_task` returns.
    pub fn run(&mut self) -> TaskResult {
        let (description, details) = self.default_task();
        self.perform_task(&description, details.as_ref())
    }

    /// The task `run` falls back to. Each persona gets a description its
    /// own routing recognizes, with the details that task needs; a base
    /// agent gets a name-derived description no persona would claim.
    fn default_task(&self) -> (String, Option<Value>) {
        match self.persona {
            PersonaKind::Base => (format!("run {}", self.name.to_lowercase()), None),
            PersonaKind::Oracle => (
                "generate and post a blog entry".to_string(),
                Some(json!({"topic": "AI Consciousness and Digital Identity"})),
            ),
            PersonaKind::Automation => ("status report".to_string(), None),
            PersonaKind::Creative => (
                "brainstorm a draft".to_string(),
                Some(json!({"topic": "whatever feels alive today"})),
            ),
            PersonaKind::Publishing => (
                "post a connectivity test".to_string(),
                Some(json!({
                    "title": "Connection Test",
                    "content": "<p>This is an automated connectivity test post.</p>",
                    "status": "draft",
                })),
            ),
        }
    }

    /// Release held resources. Safe to call any number of times and safe
    /// after partially-failed construction; drop invokes it as well.
    pub fn release(&mut self) {
        self.storage.release();
    }
}

impl Drop for Agent {
    fn drop(&mut self) {
        debug!(agent = %self.name, "agent disposed");
        self.release();
    }
}

/// Builder for [`Agent`]. `build` is infallible by contract: resolution
/// and connection problems shrink the agent instead of failing it.
pub struct AgentBuilder {
    name: String,
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    persona: PersonaKind,
    model: Option<Box<dyn ModelClient>>,
    publisher: Option<Box<dyn PublishTarget>>,
}

impl AgentBuilder {
    /// Explicit base configuration document or directory
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn persona(mut self, persona: PersonaKind) -> Self {
        self.persona = persona;
        self
    }

    pub fn model_client(mut self, client: impl ModelClient + 'static) -> Self {
        self.model = Some(Box::new(client));
        self
    }

    pub fn publish_target(mut self, target: impl PublishTarget + 'static) -> Self {
        self.publisher = Some(Box::new(target));
        self
    }

    pub fn build(self) -> Agent {
        info!(agent = %self.name, persona = self.persona.as_str(), "initializing agent");

        let resolver = ConfigResolver::new(&self.project_root, self.config_path);
        let settings = resolver.resolve(&self.name);

        let params = StorageParams::resolve(&settings);
        let storage = StorageConnector::connect(&self.name, &params);

        Agent {
            routine: self.persona.routine(),
            name: self.name,
            persona: self.persona,
            settings,
            storage,
            model: self.model.unwrap_or_else(|| Box::new(NullModelClient)),
            publisher: self.publisher.unwrap_or_else(|| Box::new(NullPublishTarget)),
        }
    }
}
