//! Interactive session.
//!
//! One tokio task per running timer sends a tick every second, a heartbeat
//! task expires notices and refreshes the mirror, and a reader task forwards
//! stdin lines. Everything lands in a single channel drained by the loop that
//! owns the controller. Each task is held by a [`TaskGuard`] which aborts it
//! on drop, so disarming a timer is just dropping its guard.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use flowtimer_core::{Config, ControllerSettings, SessionController, SystemClock, TickSource};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::SessionOptions;
use crate::status_file::StatusFile;
use crate::terminal::{BellCuePlayer, TerminalRenderer};

const TICK_PERIOD: Duration = Duration::from_secs(1);
const KEY_HELP: &str = "w work, b break, p pause, r reset, s sound, m mirror, wf <workflow>, i <icon>, q quit";

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub session: SessionOptions,
    /// Start with sound off
    #[arg(long)]
    pub mute: bool,
    /// Mirror the display into this JSON status file
    #[arg(long, value_name = "PATH")]
    pub mirror: Option<PathBuf>,
}

#[derive(Debug, Clone)]
enum Input {
    Tick(TickSource, u64),
    Heartbeat,
    Line(String),
    Eof,
    Interrupt,
}

/// Owns a spawned task and aborts it when dropped.
struct TaskGuard {
    handle: JoinHandle<()>,
}

impl TaskGuard {
    fn spawn<F>(task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(task),
        }
    }

    /// Send `input` once per second, skipping missed ticks.
    fn repeat(tx: mpsc::Sender<Input>, input: Input) -> Self {
        Self::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(input.clone()).await.is_err() {
                    break;
                }
            }
        })
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

struct Ticker {
    generation: u64,
    _guard: TaskGuard,
}

/// The per-timer tick tasks. Each arming gets a fresh generation so ticks
/// queued by a disarmed task are recognised as stale.
#[derive(Default)]
struct Tickers {
    next_generation: u64,
    work: Option<Ticker>,
    brk: Option<Ticker>,
}

impl Tickers {
    fn slot(&mut self, source: TickSource) -> &mut Option<Ticker> {
        match source {
            TickSource::Work => &mut self.work,
            TickSource::Break => &mut self.brk,
        }
    }

    fn is_current(&self, source: TickSource, generation: u64) -> bool {
        let slot = match source {
            TickSource::Work => &self.work,
            TickSource::Break => &self.brk,
        };
        slot.as_ref().is_some_and(|t| t.generation == generation)
    }

    /// Arm a ticker for every running timer and drop the others. Pause keeps
    /// the tickers armed; the controller drops ticks while paused.
    fn reconcile(&mut self, controller: &SessionController, tx: &mpsc::Sender<Input>) {
        for source in [TickSource::Work, TickSource::Break] {
            let wanted = controller.is_running(source);
            let generation = self.next_generation;
            let slot = self.slot(source);
            match (wanted, slot.is_some()) {
                (true, false) => {
                    debug!(?source, generation, "ticker armed");
                    *slot = Some(Ticker {
                        generation,
                        _guard: TaskGuard::repeat(tx.clone(), Input::Tick(source, generation)),
                    });
                    self.next_generation += 1;
                }
                (false, true) => {
                    debug!(?source, "ticker disarmed");
                    *slot = None;
                }
                _ => {}
            }
        }
    }

    /// Hand a tick to the controller unless its ticker has been replaced.
    fn deliver(&self, controller: &mut SessionController, source: TickSource, generation: u64) {
        if self.is_current(source, generation) {
            controller.handle_tick(source);
        } else {
            debug!(?source, generation, "stale tick dropped");
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

fn handle_line(controller: &mut SessionController, line: &str, mirror_path: &Path) -> Flow {
    let line = line.trim();
    let (cmd, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(cmd, rest)| (cmd, rest.trim()));
    match cmd {
        "" => {}
        "w" => controller.toggle_work(),
        "b" => controller.toggle_break(),
        "p" => controller.toggle_pause(),
        "r" => controller.reset(),
        "s" => controller.toggle_sound(),
        "m" => {
            if controller.mirror_open() {
                controller.close_mirror();
            } else {
                open_mirror(controller, mirror_path);
            }
        }
        "wf" => controller.change_workflow_input(rest),
        "i" => controller.set_pomodoro_icon(rest),
        "q" | "quit" => return Flow::Quit,
        other => eprintln!("unknown command '{other}' ({KEY_HELP})"),
    }
    Flow::Continue
}

fn open_mirror(controller: &mut SessionController, path: &Path) {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(dir) {
            warn!("could not create mirror directory {}: {e}", dir.display());
            return;
        }
    }
    if controller.open_mirror(Box::new(StatusFile::new(path))) {
        info!(path = %path.display(), "mirroring to status file");
    }
}

fn spawn_stdin_reader(tx: mpsc::Sender<Input>) -> TaskGuard {
    TaskGuard::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(Input::Line(line)).await.is_err() {
                        return;
                    }
                }
                Ok(None) => {
                    let _ = tx.send(Input::Eof).await;
                    return;
                }
                Err(e) => {
                    warn!("could not read input: {e}");
                    let _ = tx.send(Input::Eof).await;
                    return;
                }
            }
        }
    })
}

fn spawn_interrupt_listener(tx: mpsc::Sender<Input>) -> TaskGuard {
    TaskGuard::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(Input::Interrupt).await;
            }
            Err(e) => warn!("could not listen for Ctrl-C: {e}"),
        }
    })
}

async fn session(settings: ControllerSettings, mirror_path: PathBuf, mirror_on_start: bool) {
    let mut controller = SessionController::new(
        settings,
        Box::new(TerminalRenderer::new()),
        Box::new(BellCuePlayer),
        Box::new(SystemClock),
    );
    if mirror_on_start {
        open_mirror(&mut controller, &mirror_path);
    }
    eprintln!("keys: {KEY_HELP}");

    let (tx, mut rx) = mpsc::channel(64);
    let _heartbeat = TaskGuard::repeat(tx.clone(), Input::Heartbeat);
    let _stdin = spawn_stdin_reader(tx.clone());
    let _interrupt = spawn_interrupt_listener(tx.clone());
    let mut tickers = Tickers::default();

    while let Some(input) = rx.recv().await {
        match input {
            Input::Tick(source, generation) => tickers.deliver(&mut controller, source, generation),
            Input::Heartbeat => controller.heartbeat(),
            Input::Line(line) => {
                if let Flow::Quit = handle_line(&mut controller, &line, &mirror_path) {
                    break;
                }
            }
            Input::Eof => {
                info!("input closed");
                break;
            }
            Input::Interrupt => {
                info!("interrupted");
                break;
            }
        }
        tickers.reconcile(&controller, &tx);
    }

    drop(tickers);
    controller.shutdown();
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut settings = config.settings();
    args.session.apply(&mut settings)?;
    if args.mute {
        settings.sound_enabled = false;
    }
    let mirror_on_start = args.mirror.is_some() || config.mirror.enabled;
    let mirror_path = match args.mirror {
        Some(path) => path,
        None => config.mirror_path()?,
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(session(settings, mirror_path, mirror_on_start));
    // The stdin reader may still be parked in a blocking read.
    runtime.shutdown_timeout(Duration::from_millis(100));
    Ok(())
}
