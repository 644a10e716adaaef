pub mod completions;
pub mod config;
pub mod format;
pub mod ratio;
pub mod run;
pub mod simulate;

use clap::Args;
use flowtimer_core::{BreakPolicy, ControllerSettings, Workflow};

/// Session options shared by `run` and `simulate`. Each flag overrides the
/// matching config value.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionOptions {
    /// Workflow: classic, extended, deep, custom or W-B (e.g. 50-10)
    #[arg(long)]
    pub workflow: Option<String>,
    /// Custom work minutes (1-120)
    #[arg(long, value_name = "MINUTES")]
    pub work: Option<String>,
    /// Custom break minutes (1-30)
    #[arg(long = "break", value_name = "MINUTES")]
    pub break_minutes: Option<String>,
    /// Break policy: always-accrues or recovering
    #[arg(long)]
    pub policy: Option<BreakPolicy>,
    /// Let work and break run at the same time
    #[arg(long)]
    pub loose: bool,
    /// Glyph drawn for each pomodoro block
    #[arg(long)]
    pub icon: Option<String>,
}

impl SessionOptions {
    pub fn apply(&self, settings: &mut ControllerSettings) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(selection) = &self.workflow {
            settings.workflow = selection.parse::<Workflow>()?;
        }
        if self.work.is_some() || self.break_minutes.is_some() {
            settings.workflow = Workflow::custom_from_input(
                self.work.as_deref().unwrap_or_default(),
                self.break_minutes.as_deref().unwrap_or_default(),
            );
        }
        if let Some(policy) = self.policy {
            settings.break_policy = policy;
        }
        if self.loose {
            settings.strict_mutual_exclusion = false;
        }
        if let Some(icon) = self.icon.as_deref().map(str::trim).filter(|i| !i.is_empty()) {
            settings.pomodoro_icon = icon.to_string();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let opts = SessionOptions {
            workflow: Some("extended".into()),
            policy: Some(BreakPolicy::Recovering),
            loose: true,
            ..Default::default()
        };
        let mut settings = ControllerSettings::default();
        opts.apply(&mut settings).unwrap();
        assert_eq!(settings.workflow.minutes(), (50, 10));
        assert_eq!(settings.break_policy, BreakPolicy::Recovering);
        assert!(!settings.strict_mutual_exclusion);
    }

    #[test]
    fn custom_minutes_win_over_preset() {
        let opts = SessionOptions {
            workflow: Some("deep".into()),
            work: Some("10".into()),
            break_minutes: Some("2".into()),
            ..Default::default()
        };
        let mut settings = ControllerSettings::default();
        opts.apply(&mut settings).unwrap();
        assert_eq!(settings.workflow.minutes(), (10, 2));
    }

    #[test]
    fn missing_custom_value_uses_default() {
        let opts = SessionOptions {
            work: Some("40".into()),
            ..Default::default()
        };
        let mut settings = ControllerSettings::default();
        opts.apply(&mut settings).unwrap();
        assert_eq!(settings.workflow.minutes(), (40, 5));
    }

    #[test]
    fn icon_flag_overrides_unless_blank() {
        let mut settings = ControllerSettings::default();
        let blank = SessionOptions {
            icon: Some(" ".into()),
            ..Default::default()
        };
        blank.apply(&mut settings).unwrap();
        assert_eq!(settings.pomodoro_icon, flowtimer_core::DEFAULT_POMODORO_ICON);

        let opts = SessionOptions {
            icon: Some("*".into()),
            ..Default::default()
        };
        opts.apply(&mut settings).unwrap();
        assert_eq!(settings.pomodoro_icon, "*");
    }

    #[test]
    fn unknown_workflow_is_an_error() {
        let opts = SessionOptions {
            workflow: Some("lunch".into()),
            ..Default::default()
        };
        assert!(opts.apply(&mut ControllerSettings::default()).is_err());
    }
}
