mod cli;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(version, about = "ΔΔG profile plotting and residue renumbering utilities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity of the program:
    /// -v for info, -vv for debug, and -vvv for trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Plot a ΔΔG profile with zoomed, labeled regions
    Plot(cli::plot::Args),

    /// Print the regions that would be zoomed into
    Hotspots(cli::hotspots::Args),

    /// Add original PDB residue numbers to a renumbered table
    Remap(cli::remap::Args),
}

fn main() {
    let args = Cli::parse();

    let level = match args.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match &args.command {
        Commands::Plot(args) => cli::plot::run(args),
        Commands::Hotspots(args) => cli::hotspots::run(args),
        Commands::Remap(args) => cli::remap::run(args),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}
