//! Sonic Sight CLI - calibrate household sounds and listen for them.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sonic-sight")]
#[command(author, version, about = "Recognize calibrated household sounds", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fingerprint a recording and add it to the sound library
    Calibrate(commands::calibrate::CalibrateArgs),

    /// List, inspect and remove calibrated sounds
    Sounds(commands::sounds::SoundsArgs),

    /// Score two recordings or signatures against each other
    Compare(commands::compare::CompareArgs),

    /// Replay a WAV file through the live analyzer
    Detect(commands::detect::DetectArgs),

    /// Listen to the microphone for calibrated sounds
    Listen(commands::listen::ListenArgs),

    /// List audio input devices
    Devices(commands::devices::DevicesArgs),

    /// Generate test signals
    Generate(commands::generate::GenerateArgs),

    /// Show or initialize the settings file
    Config(commands::config::ConfigArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Calibrate(args) => commands::calibrate::run(args),
        Commands::Sounds(args) => commands::sounds::run(args),
        Commands::Compare(args) => commands::compare::run(args),
        Commands::Detect(args) => commands::detect::run(args),
        Commands::Listen(args) => commands::listen::run(args),
        Commands::Devices(args) => commands::devices::run(args),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
