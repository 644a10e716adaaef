//! Integration tests for the session controller.
//!
//! Drives full sessions on virtual time and checks counters, cues, notices
//! and what reaches the display.

use std::sync::{Arc, Mutex};

use flowtimer_core::{
    BreakPolicy, ControllerSettings, Cue, CueError, CuePlayer, Event, ManualClock, Phase,
    RenderError, Renderer, SessionController, TickSource, TimerConfig, ViewModel, Workflow,
};

#[derive(Clone, Default)]
struct Recorder {
    cues: Arc<Mutex<Vec<Cue>>>,
    views: Arc<Mutex<Vec<ViewModel>>>,
}

impl Recorder {
    fn cues(&self) -> Vec<Cue> {
        self.cues.lock().unwrap().clone()
    }

    fn count(&self, cue: Cue) -> usize {
        self.cues().iter().filter(|c| **c == cue).count()
    }

    fn clear(&self) {
        self.cues.lock().unwrap().clear();
    }

    fn last_view(&self) -> ViewModel {
        self.views.lock().unwrap().last().cloned().unwrap()
    }
}

struct RecordingPlayer(Recorder);

impl CuePlayer for RecordingPlayer {
    fn play(&mut self, cue: Cue) -> Result<(), CueError> {
        self.0.cues.lock().unwrap().push(cue);
        Ok(())
    }
}

struct RecordingRenderer(Recorder);

impl Renderer for RecordingRenderer {
    fn render(&mut self, view: &ViewModel) -> Result<(), RenderError> {
        self.0.views.lock().unwrap().push(view.clone());
        Ok(())
    }
}

fn session(settings: ControllerSettings) -> (SessionController, Recorder, ManualClock) {
    let rec = Recorder::default();
    let clock = ManualClock::default();
    let controller = SessionController::new(
        settings,
        Box::new(RecordingRenderer(rec.clone())),
        Box::new(RecordingPlayer(rec.clone())),
        Box::new(clock.clone()),
    );
    (controller, rec, clock)
}

fn default_session() -> (SessionController, Recorder, ManualClock) {
    session(ControllerSettings::default())
}

#[test]
fn break_without_work_is_rejected() {
    let (mut c, rec, _clock) = default_session();
    c.toggle_break();
    assert_eq!(c.notice(), Some("You must work to earn break time!"));
    assert_eq!(c.state().break_seconds, 0);
    assert!(!c.is_running(TickSource::Break));
    assert!(rec.cues().is_empty());
    assert_eq!(
        rec.last_view().notice.as_deref(),
        Some("You must work to earn break time!")
    );
}

#[test]
fn accrual_counts_under_always_accrues() {
    for (workflow, n) in [
        (Workflow::classic(), 23),
        (Workflow::custom(90, 30), 100),
        (Workflow::custom(7, 3), 41),
    ] {
        let (mut c, _rec, _clock) = session(ControllerSettings {
            workflow,
            strict_mutual_exclusion: false,
            ..Default::default()
        });
        let r = u64::from(c.engine().config().ratio);
        c.toggle_work();
        c.advance(n);
        assert_eq!(c.state().break_seconds, (n / r) as i64, "{workflow}");
    }
}

#[test]
fn accrual_continues_during_concurrent_break() {
    let (mut c, _rec, _clock) = session(ControllerSettings {
        strict_mutual_exclusion: false,
        ..Default::default()
    });
    c.toggle_work();
    c.advance(10);
    c.toggle_break();
    assert!(c.is_running(TickSource::Work));
    assert!(c.is_running(TickSource::Break));

    // 20 more work seconds earn 4, 20 break seconds spend 20.
    c.advance(20);
    assert_eq!(c.state().work_seconds, 30);
    assert_eq!(c.state().break_seconds, 2 + 4 - 20);
}

#[test]
fn reset_clears_everything() {
    let (mut c, rec, _clock) = session(ControllerSettings {
        strict_mutual_exclusion: false,
        ..Default::default()
    });
    c.toggle_work();
    c.advance(1600);
    c.toggle_break();
    c.advance(3);
    c.toggle_pause();
    rec.clear();

    c.reset();
    let s = c.state();
    assert_eq!(s.work_seconds, 0);
    assert_eq!(s.break_seconds, 0);
    assert_eq!(s.total_break_seconds, 0);
    assert!(!s.has_worked_since_start);
    assert_eq!(s.pomodoro_count, 0);
    assert!(!s.is_paused);
    assert!(!c.is_running(TickSource::Work));
    assert!(!c.is_running(TickSource::Break));
    assert_eq!(rec.cues(), vec![Cue::Confirmation]);

    c.advance(10);
    assert_eq!(c.state().work_seconds, 0);
}

#[test]
fn classic_workflow_completes_a_pomodoro() {
    let (mut c, _rec, _clock) = default_session();
    c.toggle_work();
    c.advance(1500);
    assert_eq!(c.state().work_seconds, 1500);
    assert_eq!(c.state().pomodoro_count, 1);

    let view = c.view();
    assert_eq!(view.work_time, "25:00");
    let pomodoro = view.pomodoro.unwrap();
    assert_eq!(pomodoro.completed, 1);
    assert_eq!(pomodoro.fills, vec![1.0]);
    assert!(c
        .events()
        .any(|r| r.event == Event::PomodoroCompleted { count: 1 }));
}

#[test]
fn custom_ten_two_workflow() {
    let (mut c, _rec, _clock) = default_session();
    c.change_workflow(Workflow::custom_from_input("10", "2"));
    assert_eq!(c.engine().config().ratio, 5);
    assert_eq!(c.view().ratio_label, "5:1");
    c.toggle_work();
    c.advance(5);
    assert_eq!(c.state().break_seconds, 1);
}

#[test]
fn overdrawn_break_rings_once() {
    let (mut c, rec, _clock) = default_session();
    c.toggle_work();
    c.advance(15);
    assert_eq!(c.state().break_seconds, 3);
    let total_before = c.state().total_break_seconds;

    c.toggle_break();
    rec.clear();
    c.advance(3);
    assert_eq!(rec.count(Cue::BreakExhausted), 0);
    c.advance(1);
    assert_eq!(c.state().break_seconds, -1);
    assert_eq!(rec.count(Cue::BreakExhausted), 1);
    assert_eq!(c.state().total_break_seconds, total_before + 3);

    c.advance(5);
    assert_eq!(rec.count(Cue::BreakExhausted), 1);
    assert!(c.is_running(TickSource::Break));
    assert_eq!(c.view().break_time, "-00:06");
    assert!(c.view().break_overdrawn);
}

#[test]
fn recovering_policy_auto_stops_and_recovers() {
    let (mut c, rec, _clock) = session(ControllerSettings {
        break_policy: BreakPolicy::Recovering,
        ..Default::default()
    });
    c.toggle_work();
    c.advance(15);
    c.toggle_break();
    rec.clear();
    c.advance(4);

    assert_eq!(c.state().break_seconds, -1);
    assert_eq!(c.state().total_break_seconds, 3);
    assert!(!c.is_running(TickSource::Break));
    assert_eq!(rec.cues(), vec![Cue::BreakExhausted, Cue::EndBreak]);

    c.toggle_break();
    assert_eq!(c.notice(), Some("You need to work more to earn break time!"));

    c.toggle_work();
    c.advance(10);
    assert_eq!(c.state().break_seconds, 1);
}

#[test]
fn pause_freezes_without_catch_up() {
    let (mut c, _rec, _clock) = default_session();
    c.toggle_work();
    c.advance(7);
    c.toggle_pause();
    assert_eq!(c.engine().phase(), Phase::WorkingPaused);
    c.advance(60);
    assert_eq!(c.state().work_seconds, 7);
    assert_eq!(c.view().pause_button.label, "Resume");

    c.toggle_pause();
    c.advance(3);
    assert_eq!(c.state().work_seconds, 10);
}

#[test]
fn stop_work_keeps_progress() {
    let (mut c, rec, _clock) = default_session();
    c.toggle_work();
    c.advance(42);
    c.toggle_work();
    assert_eq!(c.state().work_seconds, 42);
    assert_eq!(rec.cues(), vec![Cue::BeginWork, Cue::EndWork]);
    c.advance(10);
    assert_eq!(c.state().work_seconds, 42);
}

#[test]
fn strict_mode_blocks_work_during_break() {
    let (mut c, rec, _clock) = default_session();
    c.toggle_work();
    c.advance(10);
    rec.clear();
    c.toggle_break();
    assert_eq!(rec.cues(), vec![Cue::EndWork, Cue::BeginBreak]);
    assert!(!c.view().work_button.enabled);

    c.toggle_work();
    assert_eq!(c.notice(), Some("Finish your break before starting work"));
    assert!(!c.is_running(TickSource::Work));

    c.toggle_break();
    assert!(c.view().work_button.enabled);
}

#[test]
fn muted_session_plays_nothing() {
    let (mut c, rec, _clock) = session(ControllerSettings {
        sound_enabled: false,
        ..Default::default()
    });
    c.toggle_work();
    c.reset();
    assert!(rec.cues().is_empty());
    assert_eq!(c.view().sound_label, "Sound Off");

    c.set_sound(true);
    c.toggle_work();
    assert_eq!(rec.cues(), vec![Cue::BeginWork]);
}

#[test]
fn workflow_change_resets_and_confirms() {
    let (mut c, rec, _clock) = default_session();
    c.toggle_work();
    c.advance(100);
    rec.clear();
    c.change_workflow_input("90-30");
    assert_eq!(c.engine().config().ratio, 3);
    assert_eq!(c.state().work_seconds, 0);
    assert!(!c.is_running(TickSource::Work));
    assert_eq!(rec.cues(), vec![Cue::Confirmation]);
    assert!(c.view().pomodoro.is_none());
}

#[test]
fn bad_workflow_input_is_a_notice() {
    let (mut c, _rec, _clock) = default_session();
    c.toggle_work();
    c.advance(5);
    c.change_workflow_input("lunch");
    assert!(c.notice().unwrap().contains("Unknown workflow"));
    assert_eq!(c.state().work_seconds, 5);
    assert!(c.is_running(TickSource::Work));
}

#[test]
fn internal_fault_rolls_back() {
    let (mut c, _rec, _clock) = default_session();
    c.toggle_work();
    c.advance(12);
    let before = c.state().clone();

    let mut broken = TimerConfig::new(Workflow::custom(10, 2));
    broken.ratio = 0;
    c.apply_config(broken);

    assert_eq!(
        c.notice(),
        Some("An error occurred while trying to change the workflow")
    );
    assert_eq!(c.state(), &before);
    assert_eq!(c.engine().config().ratio, 5);

    c.advance(3);
    assert_eq!(c.state().work_seconds, 15);
}

#[test]
fn every_tick_reaches_the_renderer() {
    let (mut c, rec, _clock) = default_session();
    let before = rec.views.lock().unwrap().len();
    c.toggle_work();
    c.advance(4);
    let after = rec.views.lock().unwrap().len();
    assert!(after >= before + 5);
    assert_eq!(rec.last_view().work_time, "00:04");
}

#[test]
fn events_are_timestamped_by_the_clock() {
    let (mut c, _rec, clock) = default_session();
    clock.advance_secs(30);
    c.toggle_work();
    let first = c.events().next().unwrap();
    assert_eq!(first.event, Event::WorkStarted);
    assert_eq!(first.at.timestamp(), 30);
}
