//! `wtjson` CLI — convert workout records to and from JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Render exercise records (JSON array, stdin → stdout)
//! echo '[{"id":1,"name":"Squat","muscle_group":"legs"}]' | wtjson build
//!
//! # Render into a smaller sink (output is truncated to 256 bytes)
//! wtjson build -i exercises.json --sink-capacity 256
//!
//! # Extract set rows from a workout document
//! wtjson extract --user-id 1 -i workout.json
//!
//! # Abort on the first invalid set instead of skipping it
//! wtjson extract --user-id 1 --strict -i workout.json
//! ```
//!
//! Diagnostics go to stderr. `RUST_LOG` overrides `-v`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use wt_json::{
    BuildOptions, Converter, Exercise, ExtractOptions, SinkStatus, ValidationPolicy,
    SINK_CAPACITY,
};

#[derive(Parser)]
#[command(
    name = "wtjson",
    version,
    about = "Convert workout exercises and sets to and from JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Render exercise records as a JSON array
    Build {
        /// Input file with a JSON array of exercise records (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Maximum output size in bytes; longer output is truncated
        #[arg(long, default_value_t = SINK_CAPACITY)]
        sink_capacity: usize,
    },
    /// Extract set rows from a workout document
    Extract {
        /// User the document is expected to belong to
        #[arg(long)]
        user_id: u32,
        /// Input workout document (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Abort on the first invalid exercise or set
        #[arg(long)]
        strict: bool,
        /// Maximum number of rows to extract
        #[arg(long, default_value_t = ExtractOptions::default().capacity)]
        capacity: usize,
        /// Reject documents whose user_id differs from --user-id
        #[arg(long)]
        require_user_match: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build {
            input,
            output,
            sink_capacity,
        } => {
            let raw = read_input(input.as_deref())?;
            let exercises: Vec<Exercise> =
                serde_json::from_str(&raw).context("Failed to read exercise records")?;

            let mut converter = Converter::new().build_options(BuildOptions { sink_capacity });
            let (json, status) = converter
                .render_exercises(&exercises)
                .context("Failed to render exercises")?;
            match status {
                SinkStatus::Complete => {}
                SinkStatus::Truncated => {
                    warn!(sink_capacity, "output truncated");
                }
                SinkStatus::Fallback => anyhow::bail!("Failed to render exercises: {json}"),
            }
            write_output(output.as_deref(), &json)?;
        }
        Commands::Extract {
            user_id,
            input,
            output,
            strict,
            capacity,
            require_user_match,
        } => {
            let document = read_input(input.as_deref())?;
            let options = ExtractOptions {
                capacity,
                policy: if strict {
                    ValidationPolicy::Strict
                } else {
                    ValidationPolicy::Lenient
                },
                require_user_match,
            };

            let extraction = Converter::new()
                .extract_options(options)
                .extract_sets(&document, user_id)
                .context("Failed to extract sets")?;
            let pretty = serde_json::to_string_pretty(extraction.sets.as_slice())?;
            write_output(output.as_deref(), &pretty)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
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
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
