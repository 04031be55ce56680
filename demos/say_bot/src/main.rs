//! Say Bot Example
//!
//! Registers a handful of patterns and dispatches lines against them.
//!
//! Registration order matters: `say {text}` needs a value, so a bare `say`
//! falls through to `say {text?}`, which prints the usage line.
//!
//! # Usage
//!
//! ```bash
//! # Dispatch the built-in demo lines
//! cargo run --package say-bot
//!
//! # Read lines from stdin until EOF, Ctrl+C or `quit`
//! cargo run --package say-bot -- --interactive
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use parley::prelude::*;
use tracing::info;

const DEMO_LINES: [&str; 4] = ["say hello world", "say", "hi lol", "hi"];

#[derive(Debug, Parser)]
#[command(version, about = "A small say/usage demo for the Parley dispatcher")]
struct Cli {
    /// Read lines from stdin instead of dispatching the demo lines.
    #[arg(short, long)]
    interactive: bool,

    /// Configuration file to load instead of searching the current directory.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn say(args: &Args) {
    println!("say {}", args.require("text"));
}

fn usage() {
    println!("Usage: say <text>");
}

fn register_patterns(runtime: &ParleyRuntime) -> Result<()> {
    let shutdown = runtime.shutdown_token();

    runtime.register_all([
        Pattern::new("say {text}", say)?,
        Pattern::new("say {text?}", usage)?,
        Pattern::new("hi lol", || println!("hi lol"))?,
        Pattern::new("quit", move || shutdown.cancel())?,
    ]);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = match &cli.config {
        Some(path) => ParleyRuntime::builder().config_file(path).build()?,
        None => ParleyRuntime::new(),
    };
    register_patterns(&runtime)?;

    if cli.interactive {
        let stats = runtime.run().await?;
        info!(
            lines = stats.lines,
            matched = stats.matched,
            "Session finished"
        );
        return Ok(());
    }

    let dispatcher = runtime.dispatcher();
    for line in DEMO_LINES {
        match dispatcher.run(line) {
            Ok(outcome) => info!(line, pattern = %outcome.pattern, "Dispatched"),
            Err(e) if e.is_no_match() => println!("{e}"),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
