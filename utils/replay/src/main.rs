//! Replay a JSON script of browser actions against the in-memory host and
//! print the resulting history table.

mod script;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tabrs-replay", about = "Replay a recent-tabs event script")]
struct Args {
    /// Script file with `windows`, optional `config` and `stored`, and `actions`.
    script: PathBuf,

    /// Print every dispatched event with its outcome before the table.
    #[arg(long)]
    events: bool,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let raw = fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read {}", args.script.display()))?;
    let script: script::Script = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", args.script.display()))?;
    let replay = script::run(script)?;

    if args.events {
        for (event, outcome) in &replay.handled {
            println!("{} => {outcome:?}", serde_json::to_string(event)?);
        }
    }
    println!("{}", serde_json::to_string_pretty(&replay.table)?);
    Ok(())
}
