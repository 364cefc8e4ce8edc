//! Automation persona
//!
//! The operational persona: deterministic status reports on the agent's
//! own resources, model-backed summaries of incoming requests, and
//! on-demand timers. Timer state lives in the task payload; the caller
//! stores the returned session and hands it back with the next timer
//! task.

use super::{completed_text, detail_str, TaskContext, TaskRoutine};
use crate::provider::CompletionOptions;
use crate::task::TaskResult;
use crate::timer::{
    CountdownSession, PomodoroConfig, PomodoroSession, TimerSession, DEFAULT_COUNTDOWN_MINUTES,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

pub struct AutomationRoutine;

impl TaskRoutine for AutomationRoutine {
    fn perform(
        &self,
        cx: &mut TaskContext<'_>,
        description: &str,
        details: Option<&Value>,
    ) -> TaskResult {
        let task = description.to_lowercase();

        // Before the status branch: "timer status" is a timer task
        if task.contains("timer") || task.contains("pomodoro") || task.contains("countdown") {
            return timer_task(cx, &task, details);
        }
        if task.contains("status") || task.contains("health") {
            return status_report(cx);
        }
        if task.contains("summarize") || task.contains("summary") {
            return summarize(cx, description, details);
        }

        TaskResult::not_implemented(format!(
            "automation persona has no routine for task: {description}"
        ))
    }
}

/// No model involved: reports what this agent actually has to work with
fn status_report(cx: &mut TaskContext<'_>) -> TaskResult {
    TaskResult::ok_with_payload(
        format!("status report for {}", cx.agent_name),
        json!({
            "agent": cx.agent_name,
            "settings_keys": cx.settings.len(),
            "storage_connected": cx.storage.is_connected(),
        }),
    )
}

/// Start, inspect, pause, resume, or cancel a timer. Sessions are pure
/// values computed against the clock; "start" mints one, every other
/// verb works on a session carried in the `timer` detail.
fn timer_task(cx: &mut TaskContext<'_>, task: &str, details: Option<&Value>) -> TaskResult {
    let now = Utc::now();

    if task.contains("cancel") || task.contains("stop") {
        return TaskResult::ok("timer cancelled; discard the stored session");
    }
    if task.contains("start") || task.contains("begin") {
        let session = if task.contains("pomodoro") {
            TimerSession::Pomodoro(PomodoroSession::start(
                PomodoroConfig::from_settings(cx.settings),
                now,
            ))
        } else {
            let minutes = details
                .and_then(|d| d.get("minutes"))
                .and_then(Value::as_i64)
                .unwrap_or(DEFAULT_COUNTDOWN_MINUTES);
            let name = detail_str(details, &["name"]).map(str::to_string);
            TimerSession::Countdown(CountdownSession::start(name, Duration::minutes(minutes), now))
        };
        let status = session.status_value(now);
        return TaskResult::ok_with_payload(
            "timer started",
            json!({"timer": session, "status": status}),
        );
    }

    let mut session = match stored_session(details) {
        Ok(session) => session,
        Err(result) => return result,
    };
    let message = if task.contains("pause") {
        session.pause(now);
        "timer paused"
    } else if task.contains("resume") {
        session.resume(now);
        "timer resumed"
    } else {
        "timer status"
    };
    let status = session.status_value(now);
    TaskResult::ok_with_payload(message, json!({"timer": session, "status": status}))
}

fn stored_session(details: Option<&Value>) -> Result<TimerSession, TaskResult> {
    let Some(raw) = details.and_then(|d| d.get("timer")) else {
        return Err(TaskResult::error(
            "timer task requires a 'timer' detail carrying the stored session",
        ));
    };
    serde_json::from_value(raw.clone())
        .map_err(|e| TaskResult::error(format!("stored timer session is malformed: {e}")))
}

fn summarize(cx: &mut TaskContext<'_>, description: &str, details: Option<&Value>) -> TaskResult {
    let request = detail_str(details, &["request", "text", "content"]).unwrap_or(description);
    let prompt = format!(
        "Summarize the following request in two or three sentences, keeping any action items:\n\n{request}"
    );

    let opts = CompletionOptions::from_settings(cx.settings);
    match completed_text(cx, &prompt, &opts) {
        Ok(summary) => {
            TaskResult::ok_with_payload("request summarized", json!({"summary": summary}))
        }
        Err(result) => result,
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::config::Settings;
    use crate::provider::NullModelClient;
    use crate::publish::NullPublishTarget;
    use crate::storage::StorageConnector;
    use crate::task::TaskStatus;

    #[test]
    fn status_report_needs_no_model() {
        let settings = Settings::from_value(serde_json::json!({"a": 1, "b": 2}));
        let publisher = NullPublishTarget;
        let mut storage = StorageConnector::absent();
        let mut cx = TaskContext {
            agent_name: "budlee",
            settings: &settings,
            model: &NullModelClient,
            publisher: &publisher,
            storage: &mut storage,
        };

        let result = AutomationRoutine.perform(&mut cx, "status check", None);
        assert_eq!(result.status, TaskStatus::Ok);
        let payload = result.payload.unwrap();
        assert_eq!(payload["settings_keys"], serde_json::json!(2));
        assert_eq!(payload["storage_connected"], serde_json::json!(false));
    }

    #[test]
    fn summarizes_request_details() {
        let settings = Settings::empty();
        let model = StaticModel("Do the thing by Friday.");
        let publisher = NullPublishTarget;
        let mut storage = StorageConnector::absent();
        let mut cx = TaskContext {
            agent_name: "budlee",
            settings: &settings,
            model: &model,
            publisher: &publisher,
            storage: &mut storage,
        };

        let details = serde_json::json!({"request": "long rambling request text"});
        let result = AutomationRoutine.perform(&mut cx, "summarize this", Some(&details));
        assert_eq!(result.status, TaskStatus::Ok);
        assert_eq!(
            result.payload.unwrap()["summary"],
            serde_json::json!("Do the thing by Friday.")
        );
    }

    #[test]
    fn summary_without_model_is_error() {
        let settings = Settings::empty();
        let publisher = NullPublishTarget;
        let mut storage = StorageConnector::absent();
        let mut cx = TaskContext {
            agent_name: "budlee",
            settings: &settings,
            model: &NullModelClient,
            publisher: &publisher,
            storage: &mut storage,
        };

        let result = AutomationRoutine.perform(&mut cx, "summary please", None);
        assert_eq!(result.status, TaskStatus::Error);
    }

    #[test]
    fn starts_a_named_countdown() {
        let settings = Settings::empty();
        let publisher = NullPublishTarget;
        let mut storage = StorageConnector::absent();
        let mut cx = TaskContext {
            agent_name: "budlee",
            settings: &settings,
            model: &NullModelClient,
            publisher: &publisher,
            storage: &mut storage,
        };

        let details = serde_json::json!({"minutes": 10, "name": "tea"});
        let result = AutomationRoutine.perform(&mut cx, "start a timer", Some(&details));
        assert_eq!(result.status, TaskStatus::Ok);

        let payload = result.payload.unwrap();
        assert_eq!(payload["timer"]["kind"], serde_json::json!("countdown"));
        assert_eq!(payload["status"]["name"], serde_json::json!("tea"));
        assert_eq!(
            payload["status"]["remaining_formatted"],
            serde_json::json!("10:00")
        );
    }

    #[test]
    fn pomodoro_start_honors_timer_settings() {
        let settings = Settings::from_value(serde_json::json!({
            "timer": {"work_minutes": 50}
        }));
        let publisher = NullPublishTarget;
        let mut storage = StorageConnector::absent();
        let mut cx = TaskContext {
            agent_name: "budlee",
            settings: &settings,
            model: &NullModelClient,
            publisher: &publisher,
            storage: &mut storage,
        };

        let result = AutomationRoutine.perform(&mut cx, "start a pomodoro", None);
        assert_eq!(result.status, TaskStatus::Ok);

        let payload = result.payload.unwrap();
        assert_eq!(payload["timer"]["kind"], serde_json::json!("pomodoro"));
        assert_eq!(payload["status"]["phase"], serde_json::json!("work"));
        assert_eq!(
            payload["status"]["remaining_formatted"],
            serde_json::json!("50:00")
        );
    }

    #[test]
    fn stored_session_answers_status_not_the_agent_report() {
        let settings = Settings::empty();
        let publisher = NullPublishTarget;
        let mut storage = StorageConnector::absent();
        let mut cx = TaskContext {
            agent_name: "budlee",
            settings: &settings,
            model: &NullModelClient,
            publisher: &publisher,
            storage: &mut storage,
        };

        // A five-minute countdown started an hour ago has run out
        let session = TimerSession::Countdown(CountdownSession::start(
            None,
            Duration::minutes(5),
            Utc::now() - Duration::hours(1),
        ));
        let details = serde_json::json!({"timer": session});
        let result = AutomationRoutine.perform(&mut cx, "check timer status", Some(&details));
        assert_eq!(result.status, TaskStatus::Ok);

        let payload = result.payload.unwrap();
        assert_eq!(payload["status"]["finished"], serde_json::json!(true));
        // Routed to the timer, not the resource report
        assert!(payload.get("settings_keys").is_none());
    }

    #[test]
    fn paused_session_comes_back_inactive() {
        let settings = Settings::empty();
        let publisher = NullPublishTarget;
        let mut storage = StorageConnector::absent();
        let mut cx = TaskContext {
            agent_name: "budlee",
            settings: &settings,
            model: &NullModelClient,
            publisher: &publisher,
            storage: &mut storage,
        };

        let session = TimerSession::Countdown(CountdownSession::start(
            None,
            Duration::minutes(5),
            Utc::now(),
        ));
        let details = serde_json::json!({"timer": session});
        let result = AutomationRoutine.perform(&mut cx, "pause the timer", Some(&details));
        assert_eq!(result.status, TaskStatus::Ok);

        let payload = result.payload.unwrap();
        assert_eq!(payload["status"]["active"], serde_json::json!(false));
        assert!(payload["timer"]["paused_at"].is_string());
    }

    #[test]
    fn timer_status_without_a_session_is_an_error() {
        let settings = Settings::empty();
        let publisher = NullPublishTarget;
        let mut storage = StorageConnector::absent();
        let mut cx = TaskContext {
            agent_name: "budlee",
            settings: &settings,
            model: &NullModelClient,
            publisher: &publisher,
            storage: &mut storage,
        };

        let result = AutomationRoutine.perform(&mut cx, "check timer status", None);
        assert_eq!(result.status, TaskStatus::Error);
        assert!(result.message.contains("'timer' detail"));

        let garbled = serde_json::json!({"timer": {"kind": "countdown"}});
        let result =
            AutomationRoutine.perform(&mut cx, "check timer status", Some(&garbled));
        assert_eq!(result.status, TaskStatus::Error);
        assert!(result.message.contains("malformed"));
    }

    #[test]
    fn cancel_needs_no_session() {
        let settings = Settings::empty();
        let publisher = NullPublishTarget;
        let mut storage = StorageConnector::absent();
        let mut cx = TaskContext {
            agent_name: "budlee",
            settings: &settings,
            model: &NullModelClient,
            publisher: &publisher,
            storage: &mut storage,
        };

        let result = AutomationRoutine.perform(&mut cx, "cancel the timer", None);
        assert_eq!(result.status, TaskStatus::Ok);
    }

    #[test]
    fn unrelated_task_is_not_implemented() {
        let settings = Settings::empty();
        let publisher = NullPublishTarget;
        let mut storage = StorageConnector::absent();
        let mut cx = TaskContext {
            agent_name: "budlee",
            settings: &settings,
            model: &NullModelClient,
            publisher: &publisher,
            storage: &mut storage,
        };

        let result = AutomationRoutine.perform(&mut cx, "walk the dog", None);
        assert_eq!(result.status, TaskStatus::NotImplemented);
    }
}
