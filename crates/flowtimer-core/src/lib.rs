//! # Flowtimer Core Library
//!
//! This library provides the core logic for Flowtimer, a work/break timer that
//! enforces a flow ratio: every `ratio` seconds of work earn one second of
//! break, and breaks spend (and may overdraw) that balance.
//!
//! ## Architecture
//!
//! - **Accrual Engine**: A tick-driven state machine; the caller delivers one
//!   tick per elapsed second for each running timer
//! - **Session Controller**: Commands, audio cues, transient notices and
//!   display refresh around the engine, with injected collaborators
//! - **View Model**: A pure projection of controller state shared by the
//!   primary display and the mirrored secondary surface
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`AccrualEngine`]: Core timer state machine
//! - [`SessionController`]: Command surface for front-ends
//! - [`ViewModel`]: Render-ready state
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod controller;
pub mod cue;
pub mod error;
pub mod events;
pub mod format;
pub mod mirror;
pub mod ratio;
pub mod storage;
pub mod timer;
pub mod view;
pub mod workflow;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{ControllerSettings, SessionController};
pub use cue::{Cue, CuePlayer, SilentCuePlayer};
pub use error::{
    ConfigError, CoreError, CueError, PreconditionError, RenderError, SurfaceError,
    ValidationError,
};
pub use events::{Event, EventRecord};
pub use format::{format_time, format_time_input};
pub use mirror::{MirrorSync, Surface};
pub use ratio::{actual_ratio, compute_ratio, is_on_target, target_ratio, RatioStatus};
pub use storage::Config;
pub use timer::{
    AccrualEngine, BreakPolicy, Phase, PomodoroProgress, SessionState, TickSource,
    DEFAULT_POMODORO_ICON,
};
pub use view::{NullRenderer, Renderer, ViewModel};
pub use workflow::{Preset, TimerConfig, Workflow};
