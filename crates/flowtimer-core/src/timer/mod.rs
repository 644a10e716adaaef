mod engine;
mod policy;
mod pomodoro;

pub use engine::{
    AccrualEngine, Phase, SessionState, TickSource, MUST_WORK_FIRST, WORK_MORE_FIRST,
};
pub use policy::BreakPolicy;
pub use pomodoro::{PomodoroProgress, DEFAULT_POMODORO_ICON, POMODORO_SECONDS};
