//! Session controller.
//!
//! Owns the accrual engine and its collaborators (renderer, cue player,
//! clock, mirror). Every command is synchronous, never returns an error to the
//! caller, and ends with a refresh of the display and the mirror.
//!
//! Rejected commands surface as a transient notice. Unexpected faults are
//! logged, reported through the same notice, and the engine is rolled back to
//! the state it had before the command.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::cue::{Cue, CuePlayer};
use crate::error::CoreError;
use crate::events::{Event, EventRecord};
use crate::mirror::{MirrorSync, Surface};
use crate::timer::{AccrualEngine, BreakPolicy, SessionState, TickSource, DEFAULT_POMODORO_ICON};
use crate::view::{Renderer, ViewModel};
use crate::workflow::{TimerConfig, Workflow};

/// Maximum number of events kept in the controller log.
pub const EVENT_LOG_CAPACITY: usize = 64;

/// Start-up settings for a controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerSettings {
    pub workflow: Workflow,
    pub break_policy: BreakPolicy,
    pub strict_mutual_exclusion: bool,
    pub sound_enabled: bool,
    pub notice_duration_secs: u32,
    /// Glyph for pomodoro blocks in the view.
    pub pomodoro_icon: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            workflow: Workflow::default(),
            break_policy: BreakPolicy::default(),
            strict_mutual_exclusion: true,
            sound_enabled: true,
            notice_duration_secs: 3,
            pomodoro_icon: DEFAULT_POMODORO_ICON.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Notice {
    message: String,
    expires_at: DateTime<Utc>,
}

pub struct SessionController {
    engine: AccrualEngine,
    sound_enabled: bool,
    pomodoro_icon: String,
    notice_duration: Duration,
    notice: Option<Notice>,
    log: VecDeque<EventRecord>,
    renderer: Box<dyn Renderer>,
    cues: Box<dyn CuePlayer>,
    clock: Box<dyn Clock>,
    mirror: MirrorSync,
    shut_down: bool,
}

impl SessionController {
    pub fn new(
        settings: ControllerSettings,
        renderer: Box<dyn Renderer>,
        cues: Box<dyn CuePlayer>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let engine = AccrualEngine::new(
            TimerConfig::new(settings.workflow),
            settings.break_policy,
            settings.strict_mutual_exclusion,
        );
        info!(
            workflow = %settings.workflow,
            ratio = engine.config().ratio,
            policy = %settings.break_policy,
            strict = settings.strict_mutual_exclusion,
            "session controller ready"
        );
        let mut controller = Self {
            engine,
            sound_enabled: settings.sound_enabled,
            pomodoro_icon: settings.pomodoro_icon,
            notice_duration: Duration::seconds(i64::from(settings.notice_duration_secs)),
            notice: None,
            log: VecDeque::with_capacity(EVENT_LOG_CAPACITY),
            renderer,
            cues,
            clock,
            mirror: MirrorSync::new(),
            shut_down: false,
        };
        controller.refresh();
        controller
    }

    /// Replace the mirror, e.g. with [`MirrorSync::unsupported`].
    pub fn with_mirror(mut self, mirror: MirrorSync) -> Self {
        self.mirror = mirror;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &AccrualEngine {
        &self.engine
    }

    pub fn state(&self) -> &SessionState {
        self.engine.state()
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn is_running(&self, source: TickSource) -> bool {
        self.engine.is_running(source)
    }

    /// The notice currently shown, if it has not expired.
    pub fn notice(&self) -> Option<&str> {
        let now = self.clock.now();
        self.notice
            .as_ref()
            .filter(|n| now < n.expires_at)
            .map(|n| n.message.as_str())
    }

    pub fn view(&self) -> ViewModel {
        ViewModel::project(&self.engine, self.sound_enabled, self.notice())
            .with_pomodoro_icon(&self.pomodoro_icon)
    }

    /// Recent events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &EventRecord> {
        self.log.iter()
    }

    pub fn mirror_open(&self) -> bool {
        self.mirror.is_open()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn toggle_work(&mut self) {
        self.run_command("toggle the work timer", |e| Ok(e.toggle_work()?));
    }

    pub fn toggle_break(&mut self) {
        self.run_command("toggle the break timer", |e| Ok(e.toggle_break()?));
    }

    pub fn toggle_pause(&mut self) {
        self.run_command("toggle pause", |e| Ok(e.toggle_pause()?));
    }

    pub fn reset(&mut self) {
        self.run_command("reset the timer", |e| Ok(e.reset()));
    }

    pub fn change_workflow(&mut self, workflow: Workflow) {
        self.apply_config(TimerConfig::new(workflow));
    }

    /// Parse a workflow selection (`classic`, `50-10`, `custom:10-2`, ...)
    /// and switch to it.
    pub fn change_workflow_input(&mut self, selection: &str) {
        self.run_command("change the workflow", |e| {
            let workflow = selection.parse::<Workflow>()?;
            Ok(e.change_workflow(TimerConfig::new(workflow)))
        });
    }

    /// Replace the timer configuration wholesale. The session starts over.
    pub fn apply_config(&mut self, config: TimerConfig) {
        self.run_command("change the workflow", move |e| Ok(e.change_workflow(config)));
    }

    pub fn set_sound(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
        info!(enabled, "sound toggled");
        self.refresh();
    }

    pub fn toggle_sound(&mut self) {
        self.set_sound(!self.sound_enabled);
    }

    /// Change the pomodoro glyph. Blank input keeps the current one.
    pub fn set_pomodoro_icon(&mut self, icon: &str) {
        let icon = icon.trim();
        if icon.is_empty() {
            debug!("blank pomodoro icon ignored");
            return;
        }
        self.pomodoro_icon = icon.to_owned();
        self.refresh();
    }

    /// Attach a secondary presentation surface and bring it up to date.
    pub fn open_mirror(&mut self, surface: Box<dyn Surface>) -> bool {
        let opened = self.mirror.open(surface);
        if opened {
            let view = self.view();
            self.mirror.sync(&view);
        }
        opened
    }

    pub fn close_mirror(&mut self) {
        self.mirror.close();
    }

    /// Deliver one second of the given timer.
    pub fn handle_tick(&mut self, source: TickSource) {
        if !self.engine.is_running(source) || self.engine.state().is_paused {
            debug!(?source, "tick skipped");
            return;
        }
        let events = self.engine.tick(source);
        self.dispatch(events);
        self.refresh();
    }

    /// Once-per-second housekeeping: expire the notice and keep the mirror
    /// in step.
    pub fn heartbeat(&mut self) {
        let expired = self
            .notice
            .as_ref()
            .is_some_and(|n| self.clock.now() >= n.expires_at);
        if expired {
            self.notice = None;
            self.refresh();
        } else {
            let view = self.view();
            self.mirror.sync(&view);
        }
    }

    /// Drive `seconds` of virtual time: one tick per running timer per
    /// second, followed by a heartbeat.
    pub fn advance(&mut self, seconds: u64) {
        for _ in 0..seconds {
            if self.engine.is_running(TickSource::Work) {
                self.handle_tick(TickSource::Work);
            }
            if self.engine.is_running(TickSource::Break) {
                self.handle_tick(TickSource::Break);
            }
            self.heartbeat();
        }
    }

    /// Stop both timers and close the mirror. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.engine.halt();
        self.mirror.close();
        info!("session controller shut down");
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn run_command<F>(&mut self, name: &str, op: F)
    where
        F: FnOnce(&mut AccrualEngine) -> Result<Vec<Event>, CoreError>,
    {
        let snapshot = self.engine.clone();
        let result = op(&mut self.engine).and_then(|events| {
            self.engine.verify()?;
            Ok(events)
        });

        match result {
            Ok(events) => {
                info!(command = name, phase = ?self.engine.phase(), "command applied");
                self.dispatch(events);
            }
            Err(e) if e.is_user_error() => {
                info!(command = name, "command rejected: {e}");
                self.engine = snapshot;
                self.show_notice(e.to_string());
            }
            Err(e) => {
                error!(command = name, "command failed: {e}");
                self.engine = snapshot;
                self.show_notice(format!("An error occurred while trying to {name}"));
            }
        }
        self.refresh();
    }

    fn dispatch(&mut self, events: Vec<Event>) {
        let now = self.clock.now();
        for event in events {
            match &event {
                Event::BreakExhausted => info!("break time exhausted"),
                Event::BreakAutoStopped { break_seconds } => {
                    info!(break_seconds, "break stopped after running out")
                }
                Event::PomodoroCompleted { count } => info!(count, "pomodoro completed"),
                Event::BreakAccrued { break_seconds } => debug!(break_seconds, "break accrued"),
                _ => {}
            }
            if let Some(cue) = event.cue() {
                self.play(cue);
            }
            if self.log.len() == EVENT_LOG_CAPACITY {
                self.log.pop_front();
            }
            self.log.push_back(EventRecord { at: now, event });
        }
    }

    fn play(&mut self, cue: Cue) {
        if !self.sound_enabled {
            return;
        }
        if let Err(e) = self.cues.play(cue) {
            warn!("Could not play cue {cue}: {e}");
        }
    }

    fn show_notice(&mut self, message: String) {
        self.notice = Some(Notice {
            message,
            expires_at: self.clock.now() + self.notice_duration,
        });
    }

    fn refresh(&mut self) {
        let view = self.view();
        if let Err(e) = self.renderer.render(&view) {
            warn!("render failed: {e}");
        }
        self.mirror.sync(&view);
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::cue::SilentCuePlayer;
    use crate::error::CueError;
    use crate::view::NullRenderer;

    struct FailingPlayer;

    impl CuePlayer for FailingPlayer {
        fn play(&mut self, _cue: Cue) -> Result<(), CueError> {
            Err(CueError::Unavailable("no audio device".into()))
        }
    }

    fn controller(clock: &ManualClock) -> SessionController {
        SessionController::new(
            ControllerSettings::default(),
            Box::new(NullRenderer),
            Box::new(SilentCuePlayer),
            Box::new(clock.clone()),
        )
    }

    #[test]
    fn notice_expires_after_duration() {
        let clock = ManualClock::default();
        let mut c = controller(&clock);
        c.toggle_break();
        assert_eq!(c.notice(), Some(crate::timer::MUST_WORK_FIRST));
        clock.advance_secs(2);
        c.heartbeat();
        assert!(c.notice().is_some());
        clock.advance_secs(1);
        c.heartbeat();
        assert!(c.notice().is_none());
    }

    #[test]
    fn cue_failures_do_not_block_transitions() {
        let clock = ManualClock::default();
        let mut c = SessionController::new(
            ControllerSettings::default(),
            Box::new(NullRenderer),
            Box::new(FailingPlayer),
            Box::new(clock),
        );
        c.toggle_work();
        assert!(c.is_running(TickSource::Work));
        assert!(c.notice().is_none());
    }

    #[test]
    fn event_log_is_bounded() {
        let clock = ManualClock::default();
        let mut c = controller(&clock);
        for _ in 0..100 {
            c.toggle_work();
        }
        assert_eq!(c.events().count(), EVENT_LOG_CAPACITY);
    }

    #[test]
    fn shutdown_stops_timers() {
        let clock = ManualClock::default();
        let mut c = controller(&clock);
        c.toggle_work();
        c.shutdown();
        assert!(!c.is_running(TickSource::Work));
        c.shutdown();
    }
    #[test]
    fn pomodoro_icon_flows_into_the_view() {
        let clock = ManualClock::default();
        let mut c = SessionController::new(
            ControllerSettings {
                pomodoro_icon: "\u{2615}".into(),
                ..Default::default()
            },
            Box::new(NullRenderer),
            Box::new(SilentCuePlayer),
            Box::new(clock),
        );
        assert_eq!(c.view().pomodoro.unwrap().icon, "\u{2615}");

        c.set_pomodoro_icon("  ");
        assert_eq!(c.view().pomodoro.unwrap().icon, "\u{2615}");

        c.set_pomodoro_icon(" * ");
        assert_eq!(c.view().pomodoro.unwrap().icon, "*");
    }
}
