//! On-demand work and countdown timers
//!
//! Sessions are plain values: a session records when it started and how
//! it is configured, and every status question is answered from the
//! clock at call time. No background threads fire on completion; the
//! caller keeps the serialized session between calls and asks again.
//! Pausing stores the instant, resuming shifts the start forward by the
//! paused span.

use crate::config::Settings;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const DEFAULT_WORK_MINUTES: i64 = 25;
pub const DEFAULT_SHORT_BREAK_MINUTES: i64 = 5;
pub const DEFAULT_LONG_BREAK_MINUTES: i64 = 15;
pub const DEFAULT_LONG_BREAK_INTERVAL: i64 = 4;
pub const DEFAULT_COUNTDOWN_MINUTES: i64 = 25;

/// Where a work session currently is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::ShortBreak => "short_break",
            Phase::LongBreak => "long_break",
        }
    }
}

/// Cycle lengths for a pomodoro session, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroConfig {
    pub work_minutes: i64,
    pub short_break_minutes: i64,
    pub long_break_minutes: i64,
    /// Work phases between long breaks
    pub long_break_interval: i64,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            short_break_minutes: DEFAULT_SHORT_BREAK_MINUTES,
            long_break_minutes: DEFAULT_LONG_BREAK_MINUTES,
            long_break_interval: DEFAULT_LONG_BREAK_INTERVAL,
        }
    }
}

impl PomodoroConfig {
    /// Read `timer.*` overrides from merged settings, defaulting each
    /// length independently
    pub fn from_settings(settings: &Settings) -> Self {
        let minutes = |key: &str, default: i64| {
            settings
                .get_u64(key)
                .map(|v| v as i64)
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };
        Self {
            work_minutes: minutes("timer.work_minutes", DEFAULT_WORK_MINUTES),
            short_break_minutes: minutes("timer.short_break_minutes", DEFAULT_SHORT_BREAK_MINUTES),
            long_break_minutes: minutes("timer.long_break_minutes", DEFAULT_LONG_BREAK_MINUTES),
            long_break_interval: minutes("timer.long_break_interval", DEFAULT_LONG_BREAK_INTERVAL),
        }
    }
}

/// A running or paused pomodoro cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSession {
    pub config: PomodoroConfig,
    pub started_at: DateTime<Utc>,
    /// When set, the clock is frozen at this instant
    pub paused_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroStatus {
    pub phase: Phase,
    pub active: bool,
    pub completed_pomodoros: i64,
    pub remaining_seconds: i64,
    pub remaining_formatted: String,
}

impl PomodoroSession {
    pub fn start(config: PomodoroConfig, now: DateTime<Utc>) -> Self {
        Self {
            config,
            started_at: now,
            paused_at: None,
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    pub fn resume(&mut self, now: DateTime<Utc>) {
        if let Some(paused) = self.paused_at.take() {
            self.started_at += now - paused;
        }
    }

    /// Walk the schedule to the phase the clock currently falls in. The
    /// cycle repeats indefinitely: interval work phases, a short break
    /// after each but the last, a long break after the last.
    pub fn status(&self, now: DateTime<Utc>) -> PomodoroStatus {
        let work = self.config.work_minutes.max(1) * 60;
        let short = self.config.short_break_minutes.max(0) * 60;
        let long = self.config.long_break_minutes.max(0) * 60;
        let interval = self.config.long_break_interval.max(1);
        let active = self.paused_at.is_none();

        let frozen = self.paused_at.unwrap_or(now);
        let elapsed = (frozen - self.started_at).num_seconds().max(0);

        let cycle = interval * work + (interval - 1) * short + long;
        let full_cycles = elapsed / cycle;
        let mut offset = elapsed % cycle;
        let mut completed = full_cycles * interval;

        for slot in 1..=interval {
            if offset < work {
                return PomodoroStatus {
                    phase: Phase::Work,
                    active,
                    completed_pomodoros: completed,
                    remaining_seconds: work - offset,
                    remaining_formatted: format_clock(work - offset),
                };
            }
            offset -= work;
            completed += 1;

            let (phase, length) = if slot == interval {
                (Phase::LongBreak, long)
            } else {
                (Phase::ShortBreak, short)
            };
            if offset < length {
                return PomodoroStatus {
                    phase,
                    active,
                    completed_pomodoros: completed,
                    remaining_seconds: length - offset,
                    remaining_formatted: format_clock(length - offset),
                };
            }
            offset -= length;
        }

        // offset < cycle, so the walk above always lands in a segment
        PomodoroStatus {
            phase: Phase::LongBreak,
            active,
            completed_pomodoros: completed,
            remaining_seconds: 0,
            remaining_formatted: format_clock(0),
        }
    }
}

/// A single named countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownSession {
    #[serde(default)]
    pub name: Option<String>,
    pub started_at: DateTime<Utc>,
    pub duration_seconds: i64,
    #[serde(default)]
    pub paused_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownStatus {
    pub name: Option<String>,
    pub active: bool,
    pub finished: bool,
    pub remaining_seconds: i64,
    pub remaining_formatted: String,
}

impl CountdownSession {
    pub fn start(name: Option<String>, duration: Duration, now: DateTime<Utc>) -> Self {
        Self {
            name,
            started_at: now,
            duration_seconds: duration.num_seconds().max(0),
            paused_at: None,
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    pub fn resume(&mut self, now: DateTime<Utc>) {
        if let Some(paused) = self.paused_at.take() {
            self.started_at += now - paused;
        }
    }

    pub fn status(&self, now: DateTime<Utc>) -> CountdownStatus {
        let frozen = self.paused_at.unwrap_or(now);
        let elapsed = (frozen - self.started_at).num_seconds().max(0);
        let remaining = (self.duration_seconds - elapsed).max(0);
        CountdownStatus {
            name: self.name.clone(),
            active: self.paused_at.is_none(),
            finished: remaining == 0,
            remaining_seconds: remaining,
            remaining_formatted: format_clock(remaining),
        }
    }
}

/// Either timer kind, tagged so sessions survive a trip through a task
/// payload and back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimerSession {
    Pomodoro(PomodoroSession),
    Countdown(CountdownSession),
}

impl TimerSession {
    pub fn pause(&mut self, now: DateTime<Utc>) {
        match self {
            TimerSession::Pomodoro(s) => s.pause(now),
            TimerSession::Countdown(s) => s.pause(now),
        }
    }

    pub fn resume(&mut self, now: DateTime<Utc>) {
        match self {
            TimerSession::Pomodoro(s) => s.resume(now),
            TimerSession::Countdown(s) => s.resume(now),
        }
    }

    pub fn status_value(&self, now: DateTime<Utc>) -> Value {
        match self {
            TimerSession::Pomodoro(s) => json!(s.status(now)),
            TimerSession::Countdown(s) => json!(s.status(now)),
        }
    }
}

/// MM:SS, clamped at zero
pub fn format_clock(seconds: i64) -> String {
    let s = seconds.max(0);
    format!("{:02}:{:02}", s / 60, s % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap()
    }

    fn at(minutes: i64) -> DateTime<Utc> {
        t0() + Duration::minutes(minutes)
    }

    #[test]
    fn starts_in_work_phase() {
        let session = PomodoroSession::start(PomodoroConfig::default(), t0());
        let status = session.status(t0());
        assert_eq!(status.phase, Phase::Work);
        assert!(status.active);
        assert_eq!(status.completed_pomodoros, 0);
        assert_eq!(status.remaining_formatted, "25:00");
    }

    #[test]
    fn walks_work_and_break_phases() {
        // Defaults: 25 work, 5 short, 15 long, long break after 4 works.
        // Schedule minutes: W 0-25, S 25-30, W 30-55, S 55-60, W 60-85,
        // S 85-90, W 90-115, L 115-130, then the cycle repeats.
        let session = PomodoroSession::start(PomodoroConfig::default(), t0());

        let status = session.status(at(26));
        assert_eq!(status.phase, Phase::ShortBreak);
        assert_eq!(status.completed_pomodoros, 1);

        let status = session.status(at(31));
        assert_eq!(status.phase, Phase::Work);
        assert_eq!(status.completed_pomodoros, 1);

        let status = session.status(at(116));
        assert_eq!(status.phase, Phase::LongBreak);
        assert_eq!(status.completed_pomodoros, 4);
        assert_eq!(status.remaining_seconds, 14 * 60);

        let status = session.status(at(131));
        assert_eq!(status.phase, Phase::Work);
        assert_eq!(status.completed_pomodoros, 4);
    }

    #[test]
    fn pause_freezes_the_clock() {
        let mut session = PomodoroSession::start(PomodoroConfig::default(), t0());
        session.pause(at(10));

        let status = session.status(at(50));
        assert!(!status.active);
        assert_eq!(status.phase, Phase::Work);
        assert_eq!(status.remaining_formatted, "15:00");
    }

    #[test]
    fn resume_shifts_the_schedule_forward() {
        let mut session = PomodoroSession::start(PomodoroConfig::default(), t0());
        session.pause(at(10));
        session.resume(at(50));

        let status = session.status(at(55));
        assert!(status.active);
        assert_eq!(status.phase, Phase::Work);
        assert_eq!(status.remaining_formatted, "10:00");
    }

    #[test]
    fn redundant_pause_and_resume_are_no_ops() {
        let mut session = PomodoroSession::start(PomodoroConfig::default(), t0());
        session.resume(at(1));
        session.pause(at(10));
        session.pause(at(20));
        assert_eq!(session.status(at(60)).remaining_formatted, "15:00");
    }

    #[test]
    fn countdown_runs_out_and_stays_finished() {
        let session = CountdownSession::start(Some("tea".into()), Duration::minutes(10), t0());

        let status = session.status(at(4));
        assert!(!status.finished);
        assert_eq!(status.remaining_formatted, "06:00");

        let status = session.status(at(11));
        assert!(status.finished);
        assert_eq!(status.remaining_seconds, 0);
        assert_eq!(status.remaining_formatted, "00:00");
        assert_eq!(status.name.as_deref(), Some("tea"));
    }

    #[test]
    fn config_reads_timer_settings() {
        let settings = Settings::from_value(serde_json::json!({
            "timer": {"work_minutes": 50, "long_break_interval": 2}
        }));
        let config = PomodoroConfig::from_settings(&settings);
        assert_eq!(config.work_minutes, 50);
        assert_eq!(config.long_break_interval, 2);
        assert_eq!(config.short_break_minutes, DEFAULT_SHORT_BREAK_MINUTES);
    }

    #[test]
    fn session_survives_a_payload_round_trip() {
        let session = TimerSession::Countdown(CountdownSession::start(
            None,
            Duration::minutes(3),
            t0(),
        ));
        let stored = serde_json::to_value(&session).unwrap();
        assert_eq!(stored["kind"], serde_json::json!("countdown"));
        let restored: TimerSession = serde_json::from_value(stored).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn clock_formatting_clamps_at_zero() {
        assert_eq!(format_clock(125), "02:05");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(-7), "00:00");
    }
}
