//! Audio cue capability.
//!
//! The core never synthesizes sound; it asks an injected [`CuePlayer`] to
//! play a named cue. Playback is fire-and-forget.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cue {
    BeginWork,
    EndWork,
    BeginBreak,
    EndBreak,
    BreakExhausted,
    Confirmation,
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cue::BeginWork => "begin-work",
            Cue::EndWork => "end-work",
            Cue::BeginBreak => "begin-break",
            Cue::EndBreak => "end-break",
            Cue::BreakExhausted => "break-exhausted",
            Cue::Confirmation => "confirmation",
        };
        f.write_str(name)
    }
}

/// Plays audio cues.
pub trait CuePlayer {
    fn play(&mut self, cue: Cue) -> Result<(), CueError>;
}

/// A player that discards every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCuePlayer;

impl CuePlayer for SilentCuePlayer {
    fn play(&mut self, _cue: Cue) -> Result<(), CueError> {
        Ok(())
    }
}
