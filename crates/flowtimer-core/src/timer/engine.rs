//! Accrual engine implementation.
//!
//! The accrual engine is a tick-driven state machine. It does not own any
//! timers - the caller delivers one `tick(source)` per elapsed second for each
//! running timer, and every tick counts as exactly one second.
//!
//! ## Phases
//!
//! ```text
//! Idle -> Working <-> WorkingPaused
//!   \         \
//!    \         -> OnBreak <-> OnBreakPaused -> Idle
//!     ------------^
//! ```
//!
//! Work accrues break credit every `ratio` seconds; break ticks spend it and
//! may overdraw it. See [`BreakPolicy`] for the two accrual rules.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = AccrualEngine::new(TimerConfig::default(), BreakPolicy::default(), true);
//! engine.start_work()?;
//! // Once per second:
//! engine.tick(TickSource::Work); // Returns the events produced by the tick
//! ```

use serde::{Deserialize, Serialize};

use super::policy::BreakPolicy;
use super::pomodoro::PomodoroProgress;
use crate::error::{CoreError, PreconditionError};
use crate::events::Event;
use crate::ratio::RatioStatus;
use crate::workflow::TimerConfig;

pub const MUST_WORK_FIRST: &str = "You must work to earn break time!";
pub const WORK_MORE_FIRST: &str = "You need to work more to earn break time!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Working,
    WorkingPaused,
    OnBreak,
    OnBreakPaused,
}

/// Which repeating timer a tick belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickSource {
    Work,
    Break,
}

/// Counters and flags for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub work_seconds: u64,
    /// Signed: negative while a break has been overdrawn.
    pub break_seconds: i64,
    /// Break seconds actually consumed with a non-negative balance.
    pub total_break_seconds: u64,
    pub has_worked_since_start: bool,
    pub is_paused: bool,
    pub is_break_active: bool,
    pub pomodoro_count: u64,
    pub work_running: bool,
    pub break_running: bool,
}

/// Core accrual engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrualEngine {
    config: TimerConfig,
    policy: BreakPolicy,
    /// When set, work and break never run at the same time.
    strict_mutual_exclusion: bool,
    state: SessionState,
}

impl AccrualEngine {
    pub fn new(config: TimerConfig, policy: BreakPolicy, strict_mutual_exclusion: bool) -> Self {
        Self {
            config,
            policy,
            strict_mutual_exclusion,
            state: SessionState::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn policy(&self) -> BreakPolicy {
        self.policy
    }

    pub fn strict_mutual_exclusion(&self) -> bool {
        self.strict_mutual_exclusion
    }

    pub fn is_running(&self, source: TickSource) -> bool {
        match source {
            TickSource::Work => self.state.work_running,
            TickSource::Break => self.state.break_running,
        }
    }

    /// Current phase. A running break wins over a running work timer.
    pub fn phase(&self) -> Phase {
        let s = &self.state;
        match (s.break_running, s.work_running, s.is_paused) {
            (true, _, false) => Phase::OnBreak,
            (true, _, true) => Phase::OnBreakPaused,
            (false, true, false) => Phase::Working,
            (false, true, true) => Phase::WorkingPaused,
            (false, false, _) => Phase::Idle,
        }
    }

    pub fn ratio_status(&self) -> RatioStatus {
        RatioStatus::compute(
            self.state.work_seconds,
            self.state.total_break_seconds,
            self.config.ratio,
        )
    }

    /// Pomodoro progress, only for workflows with 25-minute work periods.
    pub fn pomodoro_progress(&self) -> Option<PomodoroProgress> {
        self.config
            .tracks_pomodoros()
            .then(|| PomodoroProgress::from_work_seconds(self.state.work_seconds))
    }

    pub fn check_start_work(&self) -> Result<(), PreconditionError> {
        if self.strict_mutual_exclusion && self.state.break_running {
            return Err(PreconditionError::BreakInProgress);
        }
        Ok(())
    }

    pub fn check_start_break(&self) -> Result<(), PreconditionError> {
        if !self.state.has_worked_since_start {
            return Err(PreconditionError::InsufficientBreakBalance(
                MUST_WORK_FIRST.into(),
            ));
        }
        if self.policy.requires_positive_balance() && self.state.break_seconds <= 0 {
            return Err(PreconditionError::InsufficientBreakBalance(
                WORK_MORE_FIRST.into(),
            ));
        }
        Ok(())
    }

    /// Consistency check run after every controller command.
    pub fn verify(&self) -> Result<(), CoreError> {
        let s = &self.state;
        if self.config.ratio == 0 {
            return Err(CoreError::Custom("target ratio must be at least 1".into()));
        }
        if self.strict_mutual_exclusion && s.work_running && s.break_running {
            return Err(CoreError::Custom(
                "work and break running together in strict mode".into(),
            ));
        }
        if s.is_break_active != s.break_running {
            return Err(CoreError::Custom("break activity flag out of sync".into()));
        }
        if s.is_paused && !s.work_running && !s.break_running {
            return Err(CoreError::Custom("paused with no timer running".into()));
        }
        Ok(())
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start_work(&mut self) -> Result<Vec<Event>, PreconditionError> {
        if self.state.work_running {
            return Ok(Vec::new());
        }
        self.check_start_work()?;
        self.state.work_running = true;
        Ok(vec![Event::WorkStarted])
    }

    /// Stop the work timer. Accrued work time is kept.
    pub fn stop_work(&mut self) -> Vec<Event> {
        if !self.state.work_running {
            return Vec::new();
        }
        self.state.work_running = false;
        self.state.is_paused = false;
        vec![Event::WorkStopped {
            work_seconds: self.state.work_seconds,
        }]
    }

    pub fn toggle_work(&mut self) -> Result<Vec<Event>, PreconditionError> {
        if self.state.work_running {
            Ok(self.stop_work())
        } else {
            self.start_work()
        }
    }

    pub fn start_break(&mut self) -> Result<Vec<Event>, PreconditionError> {
        if self.state.break_running {
            return Ok(Vec::new());
        }
        self.check_start_break()?;

        let mut events = Vec::new();
        if self.strict_mutual_exclusion {
            events.extend(self.stop_work());
        }
        self.state.break_running = true;
        self.state.is_break_active = true;
        events.push(Event::BreakStarted {
            break_seconds: self.state.break_seconds,
        });
        Ok(events)
    }

    pub fn stop_break(&mut self) -> Vec<Event> {
        if !self.state.break_running {
            return Vec::new();
        }
        self.end_break();
        vec![Event::BreakStopped {
            break_seconds: self.state.break_seconds,
        }]
    }

    pub fn toggle_break(&mut self) -> Result<Vec<Event>, PreconditionError> {
        if self.state.break_running {
            Ok(self.stop_break())
        } else {
            self.start_break()
        }
    }

    /// Freeze or unfreeze both timers without stopping them.
    pub fn toggle_pause(&mut self) -> Result<Vec<Event>, PreconditionError> {
        if !self.state.work_running && !self.state.break_running {
            return Err(PreconditionError::NothingToPause);
        }
        self.state.is_paused = !self.state.is_paused;
        Ok(vec![if self.state.is_paused {
            Event::Paused
        } else {
            Event::Resumed
        }])
    }

    pub fn reset(&mut self) -> Vec<Event> {
        self.state = SessionState::default();
        vec![Event::Reset]
    }

    /// Replace the configuration; the session starts over.
    pub fn change_workflow(&mut self, config: TimerConfig) -> Vec<Event> {
        self.config = config;
        self.state = SessionState::default();
        vec![Event::WorkflowChanged {
            workflow: config.workflow,
            ratio: config.ratio,
        }]
    }

    /// Stop both timers without emitting events. Used on teardown.
    pub fn halt(&mut self) {
        self.state.work_running = false;
        self.state.break_running = false;
        self.state.is_break_active = false;
        self.state.is_paused = false;
    }

    /// Apply one second of the given timer. Ticks for a stopped timer, or
    /// while paused, are dropped.
    pub fn tick(&mut self, source: TickSource) -> Vec<Event> {
        if !self.is_running(source) || self.state.is_paused {
            return Vec::new();
        }
        match source {
            TickSource::Work => self.work_tick(),
            TickSource::Break => self.break_tick(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn work_tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.state.work_seconds += 1;
        self.state.has_worked_since_start = true;

        let cadence = u64::from(self.config.ratio.max(1));
        if self.state.work_seconds % cadence == 0 {
            if let Some(balance) = self
                .policy
                .accrue(self.state.break_seconds, self.state.break_running)
            {
                self.state.break_seconds = balance;
                tracing::debug!(break_seconds = balance, "break credit accrued");
                events.push(Event::BreakAccrued {
                    break_seconds: balance,
                });
            }
        }

        if let Some(progress) = self.pomodoro_progress() {
            if progress.completed > self.state.pomodoro_count {
                self.state.pomodoro_count = progress.completed;
                events.push(Event::PomodoroCompleted {
                    count: progress.completed,
                });
            }
        }
        events
    }

    fn break_tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        let before = self.state.break_seconds;
        self.state.break_seconds -= 1;
        let after = self.state.break_seconds;

        if self.policy.is_exhausting(before, after) {
            events.push(Event::BreakExhausted);
        }
        if after >= 0 {
            self.state.total_break_seconds += 1;
        }
        if after < 0 && self.policy.auto_stops_when_overdrawn() {
            self.end_break();
            events.push(Event::BreakAutoStopped {
                break_seconds: after,
            });
        }
        events
    }

    fn end_break(&mut self) {
        self.state.break_running = false;
        self.state.is_break_active = false;
        if !self.state.work_running {
            self.state.is_paused = false;
        }
    }
}
