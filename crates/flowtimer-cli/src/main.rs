use clap::{Parser, Subcommand};

mod commands;
mod status_file;
mod terminal;

#[derive(Parser)]
#[command(name = "flowtimer", version, about = "Flow timer with earned breaks")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive session
    Run(commands::run::RunArgs),
    /// Replay a session on virtual time and print the result
    Simulate(commands::simulate::SimulateArgs),
    /// Format seconds as MM:SS
    Format {
        /// Seconds (non-numeric input counts as zero)
        #[arg(allow_hyphen_values = true)]
        seconds: String,
        /// Prefix negative values with '-'
        #[arg(long)]
        signed: bool,
    },
    /// Target work/break ratio for the given minutes
    Ratio {
        /// Work minutes
        work: u32,
        /// Break minutes
        #[arg(value_name = "BREAK")]
        break_minutes: u32,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "flowtimer={default_level},flowtimer_core={default_level}"
                ))
            }),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Format { seconds, signed } => commands::format::run(&seconds, signed),
        Commands::Ratio {
            work,
            break_minutes,
        } => commands::ratio::run(work, break_minutes),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            commands::completions::run::<Cli>(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
