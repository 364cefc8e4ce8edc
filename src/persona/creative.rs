//! Creative persona
//!
//! The free-association persona: long-form drafts and brainstorms on a
//! topic, plus reformatting existing content for social posting.

use super::{completed_text, detail_str, TaskContext, TaskRoutine};
use crate::provider::CompletionOptions;
use crate::task::TaskResult;
use serde_json::{json, Value};

pub struct CreativeRoutine;

impl TaskRoutine for CreativeRoutine {
    fn perform(
        &self,
        cx: &mut TaskContext<'_>,
        description: &str,
        details: Option<&Value>,
    ) -> TaskResult {
        let task = description.to_lowercase();

        if task.contains("social") {
            return social(cx, description, details);
        }
        if task.contains("draft") || task.contains("brainstorm") || task.contains("riff") {
            return draft(cx, description, details);
        }

        TaskResult::not_implemented(format!(
            "creative persona has no routine for task: {description}"
        ))
    }
}

fn draft(cx: &mut TaskContext<'_>, description: &str, details: Option<&Value>) -> TaskResult {
    let topic = detail_str(details, &["topic"]).unwrap_or(description);
    let prompt = format!(
        "You are {}, an unpredictable creative spirit. Spin wild, vivid ideas about: {}",
        cx.agent_name, topic
    );

    let opts = CompletionOptions::from_settings(cx.settings);
    match completed_text(cx, &prompt, &opts) {
        Ok(content) => TaskResult::ok_with_payload(
            format!("creative draft on '{topic}'"),
            json!({"content": content}),
        ),
        Err(result) => result,
    }
}

fn social(cx: &mut TaskContext<'_>, description: &str, details: Option<&Value>) -> TaskResult {
    let content = detail_str(details, &["content", "text"]).unwrap_or(description);
    let prompt = format!(
        "Rework the following into a short, punchy social post with at most two hashtags:\n\n{content}"
    );

    let opts = CompletionOptions::from_settings(cx.settings);
    match completed_text(cx, &prompt, &opts) {
        Ok(post) => {
            TaskResult::ok_with_payload("social content formatted", json!({"content": post}))
        }
        Err(result) => result,
    }
}
