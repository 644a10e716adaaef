use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cue::Cue;
use crate::workflow::Workflow;

/// Every state change in the accrual engine produces an Event.
/// The controller turns events into cues and keeps a short log of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    WorkStarted,
    WorkStopped {
        work_seconds: u64,
    },
    BreakStarted {
        break_seconds: i64,
    },
    BreakStopped {
        break_seconds: i64,
    },
    /// Break balance ran out during a break.
    BreakExhausted,
    /// The break timer stopped itself after the balance went negative.
    BreakAutoStopped {
        break_seconds: i64,
    },
    /// A break credit was earned (or a deficit paid back) by a work tick.
    BreakAccrued {
        break_seconds: i64,
    },
    Paused,
    Resumed,
    PomodoroCompleted {
        count: u64,
    },
    Reset,
    WorkflowChanged {
        workflow: Workflow,
        ratio: u32,
    },
}

impl Event {
    /// The audio cue this event rings, if any.
    pub fn cue(&self) -> Option<Cue> {
        match self {
            Event::WorkStarted => Some(Cue::BeginWork),
            Event::WorkStopped { .. } => Some(Cue::EndWork),
            Event::BreakStarted { .. } => Some(Cue::BeginBreak),
            Event::BreakStopped { .. } | Event::BreakAutoStopped { .. } => Some(Cue::EndBreak),
            Event::BreakExhausted => Some(Cue::BreakExhausted),
            Event::Reset | Event::WorkflowChanged { .. } => Some(Cue::Confirmation),
            Event::BreakAccrued { .. }
            | Event::Paused
            | Event::Resumed
            | Event::PomodoroCompleted { .. } => None,
        }
    }
}

/// An event stamped with the controller clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}
