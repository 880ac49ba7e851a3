//! Stopwatch for maintenance work sessions.
//!
//! Staff start the timer on arrival, pause it for breaks and stop it when the
//! job is done. Elapsed time comes from an injected [`Clock`], so pausing
//! excludes the break rather than relying on a ticking counter.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde_json::{Value, json};

/// Invalid timer transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WorkTimerError {
    /// `start` while a session is already open.
    #[error("work timer is already running")]
    AlreadyRunning,
    /// `pause` while nothing is running.
    #[error("work timer is not running")]
    NotRunning,
    /// `resume` without a pause.
    #[error("work timer is not paused")]
    NotPaused,
    /// `stop` before any `start`.
    #[error("work timer was never started")]
    NotStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running { since: DateTime<Utc> },
    Paused,
}

/// Start/pause/resume/stop stopwatch.
pub struct WorkTimer {
    clock: Arc<dyn Clock>,
    phase: Phase,
    started_at: Option<DateTime<Utc>>,
    banked: TimeDelta,
}

impl WorkTimer {
    /// Create an idle timer.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            phase: Phase::Idle,
            started_at: None,
            banked: TimeDelta::zero(),
        }
    }

    /// Whether time is currently accruing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Start a fresh session.
    pub fn start(&mut self) -> Result<(), WorkTimerError> {
        if self.phase != Phase::Idle {
            return Err(WorkTimerError::AlreadyRunning);
        }
        let now = self.clock.utc();
        self.started_at = Some(now);
        self.banked = TimeDelta::zero();
        self.phase = Phase::Running { since: now };
        Ok(())
    }

    /// Stop accruing time until [`Self::resume`].
    pub fn pause(&mut self) -> Result<(), WorkTimerError> {
        let Phase::Running { since } = self.phase else {
            return Err(WorkTimerError::NotRunning);
        };
        self.banked += self.since(since);
        self.phase = Phase::Paused;
        Ok(())
    }

    /// Continue a paused session.
    pub fn resume(&mut self) -> Result<(), WorkTimerError> {
        if self.phase != Phase::Paused {
            return Err(WorkTimerError::NotPaused);
        }
        self.phase = Phase::Running {
            since: self.clock.utc(),
        };
        Ok(())
    }

    /// Time worked so far, excluding pauses.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        let live = match self.phase {
            Phase::Running { since } => self.since(since),
            Phase::Idle | Phase::Paused => TimeDelta::zero(),
        };
        (self.banked + live).to_std().unwrap_or_default()
    }

    /// Finish the session and reset the timer to idle.
    pub fn stop(&mut self) -> Result<WorkSessionSummary, WorkTimerError> {
        let started_at = match (self.phase, self.started_at) {
            (Phase::Idle, _) | (_, None) => return Err(WorkTimerError::NotStarted),
            (_, Some(started_at)) => started_at,
        };
        let worked = self.elapsed();
        self.phase = Phase::Idle;
        self.started_at = None;
        self.banked = TimeDelta::zero();
        Ok(WorkSessionSummary {
            started_at,
            stopped_at: self.clock.utc(),
            worked,
        })
    }

    fn since(&self, since: DateTime<Utc>) -> TimeDelta {
        (self.clock.utc() - since).max(TimeDelta::zero())
    }
}

/// Finished work session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkSessionSummary {
    started_at: DateTime<Utc>,
    stopped_at: DateTime<Utc>,
    worked: Duration,
}

impl WorkSessionSummary {
    /// Time worked, excluding pauses.
    #[must_use]
    pub fn worked(&self) -> Duration {
        self.worked
    }

    /// Fields merged into a maintenance request update.
    #[must_use]
    pub fn to_payload(&self, notes: &str) -> Value {
        let seconds = self.worked.as_secs();
        json!({
            "workStartedAt": self.started_at.to_rfc3339(),
            "workEndedAt": self.stopped_at.to_rfc3339(),
            "timeSpentSeconds": seconds,
            "timeSpentMinutes": seconds.div_ceil(60),
            "workNotes": notes,
        })
    }
}

impl fmt::Display for WorkSessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.worked.as_secs();
        write!(f, "{:02}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::test_support::MutableClock;

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).single().expect("time"),
        ))
    }

    fn timer(clock: &Arc<MutableClock>) -> WorkTimer {
        WorkTimer::new(Arc::clone(clock) as Arc<dyn Clock>)
    }

    #[rstest]
    fn pauses_are_excluded(clock: Arc<MutableClock>) {
        let mut timer = timer(&clock);
        timer.start().expect("start");
        clock.advance_seconds(600);
        timer.pause().expect("pause");
        clock.advance_seconds(300);
        assert_eq!(timer.elapsed(), Duration::from_secs(600));
        timer.resume().expect("resume");
        clock.advance_seconds(125);

        let summary = timer.stop().expect("stop");

        assert_eq!(summary.worked(), Duration::from_secs(725));
        assert_eq!(summary.to_string(), "00:12:05");
        assert!(!timer.is_running());
    }

    #[rstest]
    fn stop_while_paused_keeps_banked_time(clock: Arc<MutableClock>) {
        let mut timer = timer(&clock);
        timer.start().expect("start");
        clock.advance_seconds(90);
        timer.pause().expect("pause");
        clock.advance_seconds(3_600);

        let summary = timer.stop().expect("stop");
        assert_eq!(summary.worked(), Duration::from_secs(90));
    }

    #[rstest]
    fn invalid_transitions(clock: Arc<MutableClock>) {
        let mut timer = timer(&clock);
        assert_eq!(timer.pause(), Err(WorkTimerError::NotRunning));
        assert_eq!(timer.resume(), Err(WorkTimerError::NotPaused));
        assert_eq!(timer.stop(), Err(WorkTimerError::NotStarted));
        timer.start().expect("start");
        assert_eq!(timer.start(), Err(WorkTimerError::AlreadyRunning));
        assert_eq!(timer.resume(), Err(WorkTimerError::NotPaused));
    }

    #[rstest]
    fn payload_rounds_minutes_up(clock: Arc<MutableClock>) {
        let mut timer = timer(&clock);
        timer.start().expect("start");
        clock.advance_seconds(61);
        let payload = timer.stop().expect("stop").to_payload("Replaced washer");

        assert_eq!(payload["timeSpentSeconds"], 61);
        assert_eq!(payload["timeSpentMinutes"], 2);
        assert_eq!(payload["workNotes"], "Replaced washer");
        assert_eq!(payload["workStartedAt"], "2026-10-19T08:00:00+00:00");
    }
}
