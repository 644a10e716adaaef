use clap::Args;
use flowtimer_core::{
    Config, ControllerSettings, EventRecord, ManualClock, MirrorSync, NullRenderer,
    SessionController, SilentCuePlayer, TickSource, ViewModel,
};
use serde::Serialize;

use super::SessionOptions;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub session: SessionOptions,
    /// Seconds of work
    #[arg(long, default_value_t = 0)]
    pub work_ticks: u64,
    /// Seconds of break taken after the work
    #[arg(long, default_value_t = 0)]
    pub break_ticks: u64,
    /// Print the final view and event log as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    view: ViewModel,
    events: Vec<&'a EventRecord>,
}

/// Run `seconds` of virtual time, moving the clock along with the ticks.
fn step(controller: &mut SessionController, clock: &ManualClock, seconds: u64) {
    for _ in 0..seconds {
        clock.advance_secs(1);
        controller.advance(1);
    }
}

fn simulate(settings: ControllerSettings, work_ticks: u64, break_ticks: u64) -> SessionController {
    let clock = ManualClock::default();
    let mut controller = SessionController::new(
        settings,
        Box::new(NullRenderer),
        Box::new(SilentCuePlayer),
        Box::new(clock.clone()),
    )
    .with_mirror(MirrorSync::unsupported());

    if work_ticks > 0 {
        controller.toggle_work();
        step(&mut controller, &clock, work_ticks);
    }
    if break_ticks > 0 {
        controller.toggle_break();
        if controller.is_running(TickSource::Break) {
            step(&mut controller, &clock, break_ticks);
        }
    }
    controller
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Config::load_or_default().settings();
    args.session.apply(&mut settings)?;
    let controller = simulate(settings, args.work_ticks, args.break_ticks);

    if args.json {
        let report = Report {
            view: controller.view(),
            events: controller.events().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", controller.view().status_line());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowtimer_core::BreakPolicy;

    #[test]
    fn work_then_overdrawn_break() {
        let c = simulate(ControllerSettings::default(), 15, 4);
        assert_eq!(c.state().break_seconds, -1);
        assert_eq!(c.view().break_time, "-00:01");
        assert!(c.is_running(TickSource::Break));
    }

    #[test]
    fn break_without_work_keeps_notice() {
        let c = simulate(ControllerSettings::default(), 0, 10);
        assert_eq!(c.view().notice.as_deref(), Some("You must work to earn break time!"));
        assert_eq!(c.state().break_seconds, 0);
    }

    #[test]
    fn recovering_break_stops_itself() {
        let settings = ControllerSettings {
            break_policy: BreakPolicy::Recovering,
            ..Default::default()
        };
        let c = simulate(settings, 10, 30);
        assert!(!c.is_running(TickSource::Break));
        assert_eq!(c.state().break_seconds, -1);
    }
}
