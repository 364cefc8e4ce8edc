//! Oracle persona
//!
//! The knowledge/lore persona: answers requests in a distinct voice,
//! drafts blog posts (title + body as two model calls), and can hand a
//! finished draft straight to the publish target.

use super::publishing;
use super::{completed_text, detail_str, detail_str_list, TaskContext, TaskRoutine};
use crate::provider::CompletionOptions;
use crate::publish::PostDraft;
use crate::task::TaskResult;
use serde_json::{json, Value};
use tracing::debug;

const DEFAULT_VOICE: &str = "a knowing oracle and storyteller: confident, intelligent, slightly wry";

const BODY_MAX_TOKENS: u32 = 2000;
const TITLE_MAX_TOKENS: u32 = 500;

pub struct OracleRoutine;

impl TaskRoutine for OracleRoutine {
    fn perform(
        &self,
        cx: &mut TaskContext<'_>,
        description: &str,
        details: Option<&Value>,
    ) -> TaskResult {
        let task = description.to_lowercase();

        if task.contains("post") || task.contains("publish") {
            return draft_and_post(cx, description, details);
        }
        if task.contains("blog") || task.contains("draft") {
            return match draft_blog(cx, description, details) {
                Ok((title, body, keywords)) => TaskResult::ok_with_payload(
                    format!("drafted blog post '{title}'"),
                    json!({"title": title, "content": body, "keywords": keywords}),
                ),
                Err(result) => result,
            };
        }
        if task.contains("respond")
            || task.contains("answer")
            || task.contains("consult")
            || task.contains("ask")
        {
            return respond(cx, description, details);
        }

        TaskResult::not_implemented(format!(
            "oracle persona has no routine for task: {description}"
        ))
    }
}

fn voice(cx: &TaskContext<'_>) -> String {
    cx.settings
        .get_str("persona.voice")
        .unwrap_or(DEFAULT_VOICE)
        .to_string()
}

fn respond(cx: &mut TaskContext<'_>, description: &str, details: Option<&Value>) -> TaskResult {
    let request = detail_str(details, &["prompt", "request", "question"]).unwrap_or(description);
    let prompt = format!(
        "You are {}, {}. Respond in that voice.\n\n{}",
        cx.agent_name,
        voice(cx),
        request
    );

    let opts = CompletionOptions::from_settings(cx.settings);
    match completed_text(cx, &prompt, &opts) {
        Ok(text) => TaskResult::ok_with_payload("response generated", json!({"response": text})),
        Err(result) => result,
    }
}

/// Draft a post: body first, then a title from the same topic. A failed
/// title call degrades to a derived title; a failed body call fails the
/// task.
fn draft_blog(
    cx: &mut TaskContext<'_>,
    description: &str,
    details: Option<&Value>,
) -> Result<(String, String, Vec<String>), TaskResult> {
    let topic = detail_str(details, &["topic"]).unwrap_or(description);
    let keywords = detail_str_list(details, "keywords");

    let base_opts = CompletionOptions::from_settings(cx.settings);

    let body_prompt = format!(
        "You are {}, {}. Write a blog post about \"{}\" in that voice.{}",
        cx.agent_name,
        voice(cx),
        topic,
        if keywords.is_empty() {
            String::new()
        } else {
            format!(" Work in these keywords: {}.", keywords.join(", "))
        }
    );
    let mut body_opts = base_opts.clone();
    body_opts.max_tokens.get_or_insert(BODY_MAX_TOKENS);
    let body = completed_text(cx, &body_prompt, &body_opts)?;

    let title_prompt = format!(
        "Suggest three striking titles, one per line, for a blog post about \"{topic}\"."
    );
    let mut title_opts = base_opts;
    title_opts.max_tokens.get_or_insert(TITLE_MAX_TOKENS);
    let title = match completed_text(cx, &title_prompt, &title_opts) {
        Ok(options) => first_title(&options)
            .unwrap_or_else(|| fallback_title(topic)),
        Err(_) => {
            debug!(agent = %cx.agent_name, "title generation unavailable, using derived title");
            fallback_title(topic)
        }
    };

    Ok((title, body, keywords))
}

fn draft_and_post(
    cx: &mut TaskContext<'_>,
    description: &str,
    details: Option<&Value>,
) -> TaskResult {
    let (title, body, keywords) = match draft_blog(cx, description, details) {
        Ok(draft) => draft,
        Err(result) => return result,
    };

    let mut post = PostDraft::new(title, body).with_tags(keywords);
    if let Some(status) = detail_str(details, &["status"]) {
        post = post.with_status(status);
    }
    publishing::submit(cx, &post)
}

/// First usable line of a title list, with any `1. ` style numbering
/// stripped.
fn first_title(options: &str) -> Option<String> {
    options
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| match line.split_once(". ") {
            Some((prefix, rest)) if prefix.chars().all(|c| c.is_ascii_digit()) => {
                rest.to_string()
            }
            _ => line.to_string(),
        })
}

fn fallback_title(topic: &str) -> String {
    format!("Thoughts on {topic}")
}
