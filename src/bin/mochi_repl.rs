//! Mochi REPL
//!
//! An interactive read loop that echoes every submission back. Useful for
//! trying out the single-line and multi-line editors.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mochi_line::app::Config;
use mochi_line::{Repl, Term};

/// CLI arguments for the Mochi REPL
#[derive(Parser, Debug)]
#[command(name = "mochi-repl")]
#[command(version)]
#[command(about = "Interactive line editing demo", long_about = None)]
struct Args {
    /// Path to custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use the full-screen multi-line editor
    #[arg(short, long)]
    multiline: bool,

    /// History file to load and save
    #[arg(long, value_name = "FILE")]
    history: Option<PathBuf>,

    /// Do not load or save any history file
    #[arg(long, conflicts_with = "history")]
    no_history: bool,

    /// Prompt for the single-line editor
    #[arg(short, long, value_name = "TEXT")]
    prompt: Option<String>,

    /// Maximum number of history entries
    #[arg(long, value_name = "N")]
    capacity: Option<usize>,
}

impl Args {
    /// Layer the flags over a loaded configuration
    fn apply(&self, config: &mut Config) {
        if self.multiline {
            config.editor.multiline = true;
        }
        if let Some(prompt) = &self.prompt {
            config.editor.prompt = prompt.clone();
        }
        if let Some(capacity) = self.capacity {
            config.history.capacity = capacity;
        }
        if self.no_history {
            config.history.file = None;
        } else if let Some(path) = &self.history {
            config.history.file = Some(path.clone());
        }
    }
}

fn main() -> ExitCode {
    // Log to stderr so nothing lands on the edited screen
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            },
        },
        None => Config::load_or_default(),
    };
    args.apply(&mut config);

    let mut term = Term::stdio()
        .with_fallback_size(config.terminal.fallback_size())
        .with_escape_timeout(config.terminal.escape_timeout());
    let mut repl = Repl::from_config(&config);

    tracing::info!(
        "Starting REPL in {:?} mode, {} history entries loaded",
        repl.mode(),
        repl.history().len()
    );

    let status = loop {
        match repl.read(&mut term) {
            Ok(Some(line)) => {
                let out = term.writer_mut();
                let echoed = out
                    .write_all(line.as_bytes())
                    .and_then(|_| out.flush());
                if let Err(e) = echoed {
                    eprintln!("Error: {}", e);
                    break ExitCode::FAILURE;
                }
            },
            Ok(None) => break ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                break ExitCode::FAILURE;
            },
        }
    };

    if let Err(e) = repl.stop() {
        eprintln!("Error saving history: {}", e);
        return ExitCode::FAILURE;
    }
    status
}
