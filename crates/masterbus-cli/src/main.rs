//! Masterbus CLI - offline mastering and loudness measurement.

mod chain;
mod commands;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "masterbus")]
#[command(author, version, about = "Mastering chain CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file through the EQ and compressor
    Master(commands::master::MasterArgs),

    /// Measure loudness of a WAV file without processing
    Measure(commands::measure::MeasureArgs),

    /// Print the EQ magnitude response for a parameter set
    Response(commands::response::ResponseArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Master(args) => commands::master::run(args),
        Commands::Measure(args) => commands::measure::run(args),
        Commands::Response(args) => commands::response::run(args),
    }
}
