//! Workflow selection and the timer configuration derived from it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::ratio::target_ratio;

pub const WORK_MINUTES_RANGE: (u32, u32) = (1, 120);
pub const BREAK_MINUTES_RANGE: (u32, u32) = (1, 30);
pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

/// Built-in workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// 25/5, the only workflow that tracks pomodoro blocks.
    Classic,
    /// 50/10
    Extended,
    /// 90/30
    Deep,
}

impl Preset {
    pub fn minutes(self) -> (u32, u32) {
        match self {
            Preset::Classic => (25, 5),
            Preset::Extended => (50, 10),
            Preset::Deep => (90, 30),
        }
    }

    pub fn all() -> [Preset; 3] {
        [Preset::Classic, Preset::Extended, Preset::Deep]
    }
}

/// A workflow choice: one of the presets or custom minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Workflow {
    Preset { preset: Preset },
    Custom { work_minutes: u32, break_minutes: u32 },
}

impl Workflow {
    pub fn classic() -> Self {
        Workflow::Preset {
            preset: Preset::Classic,
        }
    }

    /// Custom workflow from raw user input. Values are clamped to the allowed
    /// ranges; non-numeric input falls back to 25/5.
    pub fn custom_from_input(work: &str, brk: &str) -> Self {
        Workflow::Custom {
            work_minutes: parse_minutes(work, DEFAULT_WORK_MINUTES, WORK_MINUTES_RANGE),
            break_minutes: parse_minutes(brk, DEFAULT_BREAK_MINUTES, BREAK_MINUTES_RANGE),
        }
    }

    /// Custom workflow from numeric minutes, clamped.
    pub fn custom(work_minutes: u32, break_minutes: u32) -> Self {
        Workflow::Custom {
            work_minutes: clamp(work_minutes, WORK_MINUTES_RANGE),
            break_minutes: clamp(break_minutes, BREAK_MINUTES_RANGE),
        }
    }

    pub fn minutes(&self) -> (u32, u32) {
        match *self {
            Workflow::Preset { preset } => preset.minutes(),
            Workflow::Custom {
                work_minutes,
                break_minutes,
            } => (work_minutes, break_minutes),
        }
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self::classic()
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Workflow::Preset { preset } => {
                let (w, b) = preset.minutes();
                write!(f, "{w}-{b}")
            }
            Workflow::Custom {
                work_minutes,
                break_minutes,
            } => write!(f, "custom:{work_minutes}-{break_minutes}"),
        }
    }
}

impl FromStr for Workflow {
    type Err = ValidationError;

    /// Accepts preset names (`classic`, `extended`, `deep`), `W-B` pairs
    /// (`25-5`, matching a preset when one fits) and `custom:W-B`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "classic" => return Ok(Workflow::classic()),
            "extended" => {
                return Ok(Workflow::Preset {
                    preset: Preset::Extended,
                })
            }
            "deep" => {
                return Ok(Workflow::Preset {
                    preset: Preset::Deep,
                })
            }
            "custom" => return Ok(Workflow::custom(DEFAULT_WORK_MINUTES, DEFAULT_BREAK_MINUTES)),
            _ => {}
        }

        let (is_custom, pair) = match s.strip_prefix("custom:") {
            Some(rest) => (true, rest),
            None => (false, s.as_str()),
        };
        let (work, brk) = pair
            .split_once('-')
            .ok_or_else(|| ValidationError::UnknownWorkflow(s.clone()))?;

        if !is_custom {
            let (w, b) = (
                work.parse::<u32>().map_err(|_| ValidationError::UnknownWorkflow(s.clone()))?,
                brk.parse::<u32>().map_err(|_| ValidationError::UnknownWorkflow(s.clone()))?,
            );
            if let Some(preset) = Preset::all().into_iter().find(|p| p.minutes() == (w, b)) {
                return Ok(Workflow::Preset { preset });
            }
        }
        Ok(Workflow::custom_from_input(work, brk))
    }
}

/// Durations and target ratio for the active workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub workflow: Workflow,
    pub work_minutes: u32,
    pub break_minutes: u32,
    /// Work seconds needed to earn one break second. Always at least 1.
    pub ratio: u32,
}

impl TimerConfig {
    pub fn new(workflow: Workflow) -> Self {
        let (work_minutes, break_minutes) = workflow.minutes();
        Self {
            workflow,
            work_minutes,
            break_minutes,
            ratio: target_ratio(work_minutes, break_minutes),
        }
    }

    /// Pomodoro blocks are only tracked for 25-minute work periods.
    pub fn tracks_pomodoros(&self) -> bool {
        self.work_minutes == 25
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new(Workflow::default())
    }
}

fn clamp(value: u32, (min, max): (u32, u32)) -> u32 {
    value.clamp(min, max)
}

fn parse_minutes(input: &str, default: u32, range: (u32, u32)) -> u32 {
    let trimmed = input.trim();
    // Negative or oversized numbers still count as numeric and clamp.
    match trimmed.parse::<i64>() {
        Ok(n) => n.clamp(i64::from(range.0), i64::from(range.1)) as u32,
        Err(_) => match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => {
                (f.trunc() as i64).clamp(i64::from(range.0), i64::from(range.1)) as u32
            }
            _ => default,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_config() {
        let cfg = TimerConfig::new(Workflow::classic());
        assert_eq!((cfg.work_minutes, cfg.break_minutes, cfg.ratio), (25, 5, 5));
        assert!(cfg.tracks_pomodoros());
    }

    #[test]
    fn custom_input_clamps() {
        assert_eq!(Workflow::custom_from_input("500", "0").minutes(), (120, 1));
        assert_eq!(Workflow::custom_from_input("-3", "45").minutes(), (1, 30));
        assert_eq!(Workflow::custom_from_input("12.7", "2").minutes(), (12, 2));
    }

    #[test]
    fn non_numeric_custom_input_defaults() {
        assert_eq!(Workflow::custom_from_input("abc", "").minutes(), (25, 5));
    }

    #[test]
    fn ratio_never_below_one() {
        let cfg = TimerConfig::new(Workflow::custom(1, 30));
        assert_eq!(cfg.ratio, 1);
    }

    #[test]
    fn parses_selections() {
        assert_eq!("classic".parse::<Workflow>().unwrap(), Workflow::classic());
        assert_eq!(
            "90-30".parse::<Workflow>().unwrap(),
            Workflow::Preset {
                preset: Preset::Deep
            }
        );
        assert_eq!("10-2".parse::<Workflow>().unwrap().minutes(), (10, 2));
        assert_eq!(
            "custom:25-5".parse::<Workflow>().unwrap(),
            Workflow::Custom {
                work_minutes: 25,
                break_minutes: 5
            }
        );
        assert!("lunch".parse::<Workflow>().is_err());
    }

    #[test]
    fn display_round_trips_presets() {
        let wf = Workflow::Preset {
            preset: Preset::Extended,
        };
        assert_eq!(wf.to_string(), "50-10");
        assert_eq!(wf.to_string().parse::<Workflow>().unwrap(), wf);
    }

    #[test]
    fn display_round_trips_custom() {
        for wf in [Workflow::custom(10, 2), Workflow::custom(25, 5)] {
            assert_eq!(wf.to_string().parse::<Workflow>().unwrap(), wf);
        }
        assert_eq!(Workflow::custom(10, 2).to_string(), "custom:10-2");
    }
}
