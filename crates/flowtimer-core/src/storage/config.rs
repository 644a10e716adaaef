//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - The selected workflow and custom minutes
//! - Break policy and work/break mutual exclusion
//! - Sound and notice settings
//! - Mirror (status file) settings
//!
//! Configuration is stored at `~/.config/flowtimer/config.toml`.
//! Session counters are never written here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{config_dir, data_dir};
use crate::controller::ControllerSettings;
use crate::error::ConfigError;
use crate::timer::{BreakPolicy, DEFAULT_POMODORO_ICON};
use crate::workflow::{Preset, Workflow, DEFAULT_BREAK_MINUTES, DEFAULT_WORK_MINUTES};

/// Which workflow the timer starts with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// `classic`, `extended`, `deep` or `custom`.
    #[serde(default = "default_preset")]
    pub preset: String,
    #[serde(default = "default_work_minutes")]
    pub custom_work_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub custom_break_minutes: u32,
    /// Glyph drawn for each pomodoro block.
    #[serde(default = "default_icon")]
    pub icon: String,
}

/// Timer behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSection {
    #[serde(default)]
    pub break_policy: BreakPolicy,
    #[serde(default = "default_true")]
    pub strict_mutual_exclusion: bool,
    #[serde(default = "default_notice_secs")]
    pub notice_duration_secs: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Secondary surface configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Status file path. Empty means `<config dir>/mirror.json`.
    #[serde(default)]
    pub path: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/flowtimer/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub timer: TimerSection,
    #[serde(default)]
    pub sound: SoundConfig,
    #[serde(default)]
    pub mirror: MirrorConfig,
}

// Default functions
fn default_preset() -> String {
    "classic".into()
}
fn default_work_minutes() -> u32 {
    DEFAULT_WORK_MINUTES
}
fn default_break_minutes() -> u32 {
    DEFAULT_BREAK_MINUTES
}
fn default_icon() -> String {
    DEFAULT_POMODORO_ICON.into()
}
fn default_true() -> bool {
    true
}
fn default_notice_secs() -> u32 {
    3
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            custom_work_minutes: DEFAULT_WORK_MINUTES,
            custom_break_minutes: DEFAULT_BREAK_MINUTES,
            icon: default_icon(),
        }
    }
}

impl Default for TimerSection {
    fn default() -> Self {
        Self {
            break_policy: BreakPolicy::default(),
            strict_mutual_exclusion: true,
            notice_duration_secs: 3,
        }
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the configuration file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from the default location, writing defaults when the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there when the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(path, &content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Read the default location without writing anything, returning the
    /// defaults when the file is missing or unreadable.
    pub fn load_or_default() -> Self {
        Self::read_from(&config_dir().join("config.toml")).unwrap_or_else(|e| {
            tracing::warn!("using default configuration: {e}");
            Self::default()
        })
    }

    /// Load from `path`. A missing file yields the defaults and nothing is
    /// created.
    pub fn read_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(path, &content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// into the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check values serde cannot: the workflow preset name and the icon.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workflow.icon.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "workflow.icon".into(),
                message: "icon must not be blank".into(),
            });
        }
        self.workflow_selection().map(|_| ())
    }

    pub fn workflow_selection(&self) -> Result<Workflow, ConfigError> {
        let wf = &self.workflow;
        match wf.preset.trim().to_lowercase().as_str() {
            "custom" => Ok(Workflow::custom(wf.custom_work_minutes, wf.custom_break_minutes)),
            "classic" => Ok(Workflow::Preset {
                preset: Preset::Classic,
            }),
            "extended" => Ok(Workflow::Preset {
                preset: Preset::Extended,
            }),
            "deep" => Ok(Workflow::Preset {
                preset: Preset::Deep,
            }),
            other => Err(ConfigError::InvalidValue {
                key: "workflow.preset".into(),
                message: format!("expected classic, extended, deep or custom, got '{other}'"),
            }),
        }
    }

    /// Controller settings described by this configuration. An invalid
    /// preset falls back to the classic workflow.
    pub fn settings(&self) -> ControllerSettings {
        ControllerSettings {
            workflow: self.workflow_selection().unwrap_or_default(),
            break_policy: self.timer.break_policy,
            strict_mutual_exclusion: self.timer.strict_mutual_exclusion,
            sound_enabled: self.sound.enabled,
            notice_duration_secs: self.timer.notice_duration_secs,
            pomodoro_icon: match self.workflow.icon.trim() {
                "" => DEFAULT_POMODORO_ICON.to_string(),
                icon => icon.to_string(),
            },
        }
    }

    /// Mirror status file location.
    pub fn mirror_path(&self) -> Result<PathBuf, ConfigError> {
        if self.mirror.path.trim().is_empty() {
            Self::path().map(|p| p.with_file_name("mirror.json"))
        } else {
            Ok(PathBuf::from(self.mirror.path.trim()))
        }
    }
}
