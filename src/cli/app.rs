//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands;
use tallybox::output::OutputMode;

/// tallybox - selection counter for history forms
#[derive(Parser, Debug)]
#[command(
    name = "tallybox",
    version,
    about = "Count checkbox selections on history-form pages",
    long_about = "Drive the history-form selection counter outside a browser.\n\n\
                  Pages are parsed into an in-memory document, the counter is\n\
                  installed the way the live page installs it, and scenarios\n\
                  replay user gestures against the result."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect a page: find the history form and report its selection state
    Inspect {
        /// Page markup file
        page: PathBuf,
    },

    /// Replay a scenario file and report every step
    Run {
        /// Scenario TOML file
        scenario: PathBuf,
    },

    /// Print demo history-page markup
    Demo {
        /// Number of journal records
        #[arg(short, long, default_value_t = 5)]
        records: usize,

        /// Wrap the form in a full page
        #[arg(long)]
        full_page: bool,
    },

    /// Show version
    Version,
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Some(Command::Inspect { page }) => commands::inspect(&page, output_mode),
        Some(Command::Run { scenario }) => commands::run_scenario(&scenario, output_mode),
        Some(Command::Demo { records, full_page }) => commands::demo(records, full_page, output_mode),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION")
                    })
                );
            } else {
                println!("tallybox v{}", env!("CARGO_PKG_VERSION"));
            }
            Ok(())
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("tallybox v{}", env!("CARGO_PKG_VERSION"));
                println!("\nRun 'tallybox --help' for usage");
                println!("Run 'tallybox demo' to print a sample history page");
            }
            Ok(())
        },
    }
}
