//! Terminal front-end: a status-line renderer and a bell for audio cues.

use std::io::Write;

use flowtimer_core::{Cue, CueError, CuePlayer, RenderError, Renderer, ViewModel};

/// Prints the status line to stdout whenever it changes.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    last: Option<String>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, view: &ViewModel) -> Result<(), RenderError> {
        let line = view.status_line();
        if self.last.as_deref() == Some(line.as_str()) {
            return Ok(());
        }
        let mut out = std::io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()?;
        self.last = Some(line);
        Ok(())
    }
}

/// Rings the terminal bell. Cues that mark the end of something ring twice.
#[derive(Debug, Default, Clone, Copy)]
pub struct BellCuePlayer;

impl BellCuePlayer {
    fn rings(cue: Cue) -> usize {
        match cue {
            Cue::BeginWork | Cue::BeginBreak | Cue::Confirmation => 1,
            Cue::EndWork | Cue::EndBreak | Cue::BreakExhausted => 2,
        }
    }
}

impl CuePlayer for BellCuePlayer {
    fn play(&mut self, cue: Cue) -> Result<(), CueError> {
        tracing::debug!(%cue, "cue");
        let mut err = std::io::stderr().lock();
        err.write_all("\x07".repeat(Self::rings(cue)).as_bytes())?;
        err.flush()?;
        Ok(())
    }
}
