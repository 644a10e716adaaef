use serde::{Deserialize, Serialize};

/// Length of one pomodoro block in seconds.
pub const POMODORO_SECONDS: u64 = 25 * 60;

/// Glyph drawn for each pomodoro block unless the user picks another.
pub const DEFAULT_POMODORO_ICON: &str = "🍅";

/// Progress through 25-minute work blocks (classic workflow only).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PomodoroProgress {
    pub completed: u64,
    /// 0.0 .. 1.0 progress within the current block.
    pub current_fraction: f64,
}

impl PomodoroProgress {
    pub fn from_work_seconds(work_seconds: u64) -> Self {
        Self {
            completed: work_seconds / POMODORO_SECONDS,
            current_fraction: (work_seconds % POMODORO_SECONDS) as f64 / POMODORO_SECONDS as f64,
        }
    }

    /// Fill level of each block indicator: full blocks first, then the block
    /// in progress. The partial block is shown when it has started or when
    /// no block is complete yet, so there is always at least one indicator.
    pub fn fills(&self) -> Vec<f64> {
        let mut fills = vec![1.0; self.completed as usize];
        if self.current_fraction > 0.0 || self.completed == 0 {
            fills.push(self.current_fraction);
        }
        fills
    }
}
