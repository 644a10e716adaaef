//! Work/break ratio policy.
//!
//! The target ratio comes from the selected workflow; the actual ratio is the
//! work time divided by the break time really consumed. A session is "on
//! target" while the actual ratio stays within ±10% of the target.

use serde::{Deserialize, Serialize};

/// Allowed relative deviation from the target ratio.
pub const TOLERANCE: f64 = 0.10;

/// `round(work / break)`, rounding halves up. A zero break is treated as one
/// minute.
pub fn compute_ratio(work_minutes: u32, break_minutes: u32) -> u32 {
    let w = u64::from(work_minutes);
    let b = u64::from(break_minutes.max(1));
    // Never above work_minutes, so the conversion cannot fail.
    u32::try_from((2 * w + b) / (2 * b)).unwrap_or(u32::MAX)
}

/// The ratio a timer runs with: [`compute_ratio`] floored at 1, so every
/// workflow earns some break.
pub fn target_ratio(work_minutes: u32, break_minutes: u32) -> u32 {
    compute_ratio(work_minutes, break_minutes).max(1)
}

/// Work seconds per consumed break second, or the target itself when no break
/// has been taken yet.
pub fn actual_ratio(work_seconds: u64, total_break_seconds: u64, target: u32) -> f64 {
    if total_break_seconds == 0 {
        f64::from(target)
    } else {
        work_seconds as f64 / total_break_seconds as f64
    }
}

pub fn is_on_target(actual: f64, target: f64) -> bool {
    actual >= target * (1.0 - TOLERANCE) && actual <= target * (1.0 + TOLERANCE)
}

/// Snapshot of ratio tracking for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioStatus {
    pub target: u32,
    pub actual: f64,
    pub on_target: bool,
}

impl RatioStatus {
    pub fn compute(work_seconds: u64, total_break_seconds: u64, target: u32) -> Self {
        let actual = actual_ratio(work_seconds, total_break_seconds, target);
        Self {
            target,
            actual,
            on_target: is_on_target(actual, f64::from(target)),
        }
    }

    /// `"5:1"` style label.
    pub fn label(&self) -> String {
        format!("{}:1", self.target)
    }
}
