//! `ics` CLI — export, import, validate, and fold iCalendar files from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Export a JSON array of events to ICS (stdin → stdout)
//! ics export < events.json > calendar.ics
//!
//! # Export from file to file with a custom PRODID
//! ics export -i events.json -o calendar.ics --prodid "-//Acme//Planner//EN"
//!
//! # Import ICS back into pretty-printed JSON
//! ics import -i calendar.ics
//!
//! # Validate an ICS file (exit code 1 if any check fails)
//! ics validate -i calendar.ics
//! ics validate -i calendar.ics --json
//!
//! # Re-fold every line of a file at 75 octets
//! ics fold -i long-lines.ics
//!
//! # Debug logging on stderr
//! ics -vv validate -i calendar.ics
//! ```

use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ics_codec::text::{fold_line_with, logical_lines};
use ics_codec::{CalendarEvent, FoldMode, SerializeOptions, PRODUCT_ID};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ics", version, about = "iCalendar (RFC 5545) codec and validator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG`
    /// takes precedence when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Serialize a JSON array of events to ICS, validating the result
    Export {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// PRODID written to the calendar header
        #[arg(long, env = "ICS_PRODID", default_value = PRODUCT_ID)]
        prodid: String,
        /// How the 75-unit line limit is measured: octets or characters
        #[arg(long, env = "ICS_FOLD_MODE", default_value_t = FoldMode::Octets)]
        fold: FoldMode,
        /// Skip the conformance checks after serializing
        #[arg(long)]
        no_validate: bool,
    },
    /// Parse ICS into a pretty-printed JSON array of events
    Import {
        /// Input ICS file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Run the conformance checks and print the report
    Validate {
        /// Input ICS file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fold every content line of a file
    Fold {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// How the 75-unit line limit is measured: octets or characters
        #[arg(long, env = "ICS_FOLD_MODE", default_value_t = FoldMode::Octets)]
        mode: FoldMode,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Export {
            input,
            output,
            prodid,
            fold,
            no_validate,
        } => {
            let json = read_input(input.as_deref())?;
            let events: Vec<CalendarEvent> =
                serde_json::from_str(&json).context("Failed to parse events JSON")?;
            let options = SerializeOptions::default()
                .with_product_id(prodid)
                .with_fold_mode(fold);

            let ics = if no_validate {
                ics_codec::serialize_with(&events, &options)
            } else {
                ics_audit::export(&events, &options).context("Failed to export calendar")?
            };
            write_output(output.as_deref(), &ics)?;
        }
        Commands::Import { input, output } => {
            let ics = read_input(input.as_deref())?;
            let events = ics_codec::parse(&ics);
            tracing::info!(events = events.len(), "parsed calendar");
            let mut pretty = serde_json::to_string_pretty(&events)?;
            pretty.push('\n');
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Validate { input, json } => {
            let ics = read_input(input.as_deref())?;
            let report = ics_audit::validate(&ics);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
            if !report.is_valid() {
                process::exit(1);
            }
        }
        Commands::Fold {
            input,
            output,
            mode,
        } => {
            let text = read_input(input.as_deref())?;
            let mut folded = String::with_capacity(text.len());
            for line in logical_lines(&text) {
                folded.push_str(&fold_line_with(&line, mode));
                folded.push_str("\r\n");
            }
            write_output(output.as_deref(), &folded)?;
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for piping.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {path}"))?;
        }
        None => {
            print!("{content}");
        }
    }
    Ok(())
}
