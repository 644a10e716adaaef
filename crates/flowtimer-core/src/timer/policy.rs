use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// How break credit accrues and what happens when it runs out.
///
/// Each policy is a whole: accrual and exhaustion rules never mix across them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakPolicy {
    /// Every `ratio`-th work second adds one break second, even mid-break.
    /// Breaks may run into a deficit until stopped by hand; the exhausted cue
    /// rings when the balance crosses from 0 to -1.
    #[default]
    AlwaysAccrues,
    /// Work first pays back a deficit, and earns nothing new while a break
    /// runs. The exhausted cue rings when the balance lands on 0, and the break
    /// stops itself once the balance goes negative. Starting a break needs a
    /// positive balance.
    Recovering,
}

impl BreakPolicy {
    pub fn auto_stops_when_overdrawn(self) -> bool {
        matches!(self, BreakPolicy::Recovering)
    }

    pub fn requires_positive_balance(self) -> bool {
        matches!(self, BreakPolicy::Recovering)
    }

    /// Whether a break tick that moved the balance from `before` to `after`
    /// rings the exhausted cue.
    pub(crate) fn is_exhausting(self, before: i64, after: i64) -> bool {
        match self {
            BreakPolicy::AlwaysAccrues => before == 0 && after < 0,
            BreakPolicy::Recovering => after == 0,
        }
    }

    /// Balance after an accrual step, or `None` when nothing accrues.
    pub(crate) fn accrue(self, balance: i64, on_break: bool) -> Option<i64> {
        match self {
            BreakPolicy::AlwaysAccrues => Some(balance + 1),
            BreakPolicy::Recovering if balance < 0 => Some(balance + 1),
            BreakPolicy::Recovering if !on_break => Some(balance + 1),
            BreakPolicy::Recovering => None,
        }
    }
}

impl fmt::Display for BreakPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakPolicy::AlwaysAccrues => f.write_str("always_accrues"),
            BreakPolicy::Recovering => f.write_str("recovering"),
        }
    }
}

impl FromStr for BreakPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "always_accrues" | "always" => Ok(BreakPolicy::AlwaysAccrues),
            "recovering" | "recover" => Ok(BreakPolicy::Recovering),
            other => Err(ValidationError::InvalidValue {
                field: "break_policy".into(),
                message: format!("expected always_accrues or recovering, got '{other}'"),
            }),
        }
    }
}
