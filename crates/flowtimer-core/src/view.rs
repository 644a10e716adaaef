//! View model projection.
//!
//! Everything a presentation target needs is computed here from the engine
//! state, so the primary display and the mirrored surface render the exact
//! same data.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::format::format_time;
use crate::timer::{AccrualEngine, Phase, DEFAULT_POMODORO_ICON};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonView {
    pub label: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseView {
    pub label: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroView {
    pub icon: String,
    pub completed: u64,
    pub fills: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub phase: Phase,
    pub work_time: String,
    /// Signed when overdrawn.
    pub break_time: String,
    /// Color hint: the break balance is negative.
    pub break_overdrawn: bool,
    pub ratio_label: String,
    pub actual_ratio: f64,
    pub on_target: bool,
    pub work_button: ButtonView,
    pub break_button: ButtonView,
    pub pause_button: PauseView,
    pub sound_label: String,
    pub pomodoro: Option<PomodoroView>,
    pub notice: Option<String>,
}

impl ViewModel {
    pub fn project(engine: &AccrualEngine, sound_enabled: bool, notice: Option<&str>) -> Self {
        let s = engine.state();
        let ratio = engine.ratio_status();
        let any_running = s.work_running || s.break_running;

        let work_button = ButtonView {
            label: if s.work_running { "Stop Work" } else { "Start Work" }.into(),
            enabled: s.work_running || engine.check_start_work().is_ok(),
        };
        let break_button = ButtonView {
            label: if s.break_running { "Stop Break" } else { "Take Break" }.into(),
            enabled: s.break_running || engine.check_start_break().is_ok(),
        };

        Self {
            phase: engine.phase(),
            work_time: format_time(s.work_seconds as i64, false),
            break_time: format_time(s.break_seconds, true),
            break_overdrawn: s.break_seconds < 0,
            ratio_label: ratio.label(),
            actual_ratio: ratio.actual,
            on_target: ratio.on_target,
            work_button,
            break_button,
            pause_button: PauseView {
                label: if s.is_paused { "Resume" } else { "Pause" }.into(),
                visible: any_running,
            },
            sound_label: if sound_enabled { "Sound On" } else { "Sound Off" }.into(),
            pomodoro: engine.pomodoro_progress().map(|p| PomodoroView {
                icon: DEFAULT_POMODORO_ICON.into(),
                completed: p.completed,
                fills: p.fills(),
            }),
            notice: notice.map(str::to_owned),
        }
    }

    /// Draw pomodoro blocks with `icon` instead of the default glyph.
    pub fn with_pomodoro_icon(mut self, icon: &str) -> Self {
        if let Some(p) = self.pomodoro.as_mut() {
            p.icon = icon.to_owned();
        }
        self
    }

    /// One-line text rendering for terminals and logs.
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "work {} | break {} | ratio {} (actual {:.1}{})",
            self.work_time,
            self.break_time,
            self.ratio_label,
            self.actual_ratio,
            if self.on_target { "" } else { ", off target" },
        );
        if self.pause_button.visible && self.pause_button.label == "Resume" {
            line.push_str(" | paused");
        }
        if let Some(p) = &self.pomodoro {
            line.push_str(&format!(" | pomodoros {} {}", p.icon, p.completed));
        }
        if let Some(notice) = &self.notice {
            line.push_str(&format!(" | {notice}"));
        }
        line
    }
}

/// Primary display refresh capability.
pub trait Renderer {
    fn render(&mut self, view: &ViewModel) -> Result<(), RenderError>;
}

/// A renderer that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _view: &ViewModel) -> Result<(), RenderError> {
        Ok(())
    }
}
