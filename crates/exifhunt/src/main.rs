//! ExifHunt CLI - metadata reports for folders of photos and videos.
//!
//! ExifHunt reads every image and video directly inside a folder and writes a
//! single report: a PDF with thumbnails or a plain text file.
//!
//! # Usage
//!
//! ```bash
//! # PDF report for a folder, written to the configured output directory
//! exifhunt report ./holiday
//!
//! # Text report, images only, into a custom folder
//! exifhunt report ./holiday --images -f text -o ./out
//!
//! # Will this folder produce anything?
//! exifhunt check ./holiday
//!
//! # View configuration
//! exifhunt config show
//! ```
//!
//! Running `exifhunt` with no subcommand on a terminal opens the interactive menu.

use clap::{CommandFactory, Parser, Subcommand};
use std::io::IsTerminal;

mod cli;
mod logging;

/// ExifHunt - extract EXIF and container metadata from a folder of media.
#[derive(Parser, Debug)]
#[command(name = "exifhunt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a metadata report for a folder
    Report(cli::report::ReportArgs),

    /// Check whether a folder contains compatible images or videos
    Check(cli::check::CheckArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match exifhunt_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `exifhunt config path`."
            );
            exifhunt_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("ExifHunt v{}", exifhunt_core::VERSION);

    match cli.command {
        Some(Commands::Report(args)) => cli::report::execute(args, &config).map(|_| ()),
        Some(Commands::Check(args)) => cli::check::execute(args, &config),
        Some(Commands::Config(args)) => cli::config::execute(args),
        None if std::io::stdin().is_terminal() && std::io::stderr().is_terminal() => {
            cli::interactive::run(config)
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
