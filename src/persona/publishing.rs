//! Publishing persona
//!
//! Routes posting tasks to the configured [`PublishTarget`]. Target
//! failures are reported through the envelope; nothing from the remote
//! layer escapes as an error value.

use super::{detail_str, detail_str_list, TaskContext, TaskRoutine};
use crate::publish::{PostDraft, PublishError};
use crate::task::TaskResult;
use serde_json::Value;
use tracing::info;

pub struct PublishingRoutine;

impl TaskRoutine for PublishingRoutine {
    fn perform(
        &self,
        cx: &mut TaskContext<'_>,
        description: &str,
        details: Option<&Value>,
    ) -> TaskResult {
        let task = description.to_lowercase();

        if task.contains("publish") || task.contains("post") {
            return match draft_from_details(details) {
                Ok(draft) => submit(cx, &draft),
                Err(result) => result,
            };
        }

        TaskResult::not_implemented(format!(
            "publishing persona has no routine for task: {description}"
        ))
    }
}

/// Build a draft from task details. Title and body are required; status,
/// categories, and tags are optional metadata passed through verbatim.
fn draft_from_details(details: Option<&Value>) -> Result<PostDraft, TaskResult> {
    let Some(title) = detail_str(details, &["title"]) else {
        return Err(TaskResult::error("publish task requires a 'title' detail"));
    };
    let Some(body) = detail_str(details, &["body", "content"]) else {
        return Err(TaskResult::error(
            "publish task requires a 'body' or 'content' detail",
        ));
    };

    let mut draft = PostDraft::new(title, body).with_tags(detail_str_list(details, "tags"));
    draft.categories = detail_str_list(details, "categories");
    if let Some(status) = detail_str(details, &["status"]) {
        draft = draft.with_status(status);
    }
    Ok(draft)
}

/// Hand a draft to the publish target and fold the outcome into the
/// uniform envelope. Shared with personas that draft-then-post.
pub(crate) fn submit(cx: &mut TaskContext<'_>, draft: &PostDraft) -> TaskResult {
    match cx.publisher.publish(draft) {
        Ok(receipt) => {
            info!(
                agent = %cx.agent_name,
                title = %draft.title,
                post_id = receipt.post_id.as_deref().unwrap_or("unknown"),
                "post submitted"
            );
            TaskResult::ok_with_payload(
                format!("post '{}' submitted with status '{}'", draft.title, draft.status),
                serde_json::to_value(&receipt).unwrap_or(Value::Null),
            )
        }
        Err(PublishError::NotConfigured) => {
            TaskResult::error("no publishing target configured")
        }
        Err(e) => TaskResult::error(format!("publish failed: {e}")),
    }
}
