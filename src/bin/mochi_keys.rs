//! Mochi key inspector
//!
//! Puts the terminal in raw mode and prints every decoded key with its key
//! code until Ctrl-D is pressed. Handy for checking what a terminal sends.

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mochi_line::input::DEFAULT_ESCAPE_TIMEOUT;
use mochi_line::term::TermResult;
use mochi_line::{Key, Term, TermError};

/// CLI arguments for the key inspector
#[derive(Parser, Debug)]
#[command(name = "mochi-keys")]
#[command(version)]
#[command(about = "Print decoded key events", long_about = None)]
struct Args {
    /// Milliseconds to wait for the rest of an escape sequence
    #[arg(long, value_name = "MS")]
    escape_timeout: Option<u64>,
}

fn run(timeout: Duration) -> TermResult<()> {
    let mut term = Term::stdio().with_escape_timeout(timeout);
    let _guard = term.enter_raw()?;

    let mut out = term.frame();
    out.put_str("Press keys, Ctrl-D to quit");
    out.newline();
    term.present(&mut out)?;

    loop {
        let key = match term.read_key() {
            Ok(key) => key,
            Err(TermError::Closed) => return Ok(()),
            Err(e) => return Err(e),
        };

        match key.code() {
            Some(code) => out.put_str(&format!("{:?} ({})", key, code)),
            None => out.put_str(&format!("{:?}", key)),
        }
        out.newline();
        term.present(&mut out)?;

        if key == Key::ctrl(b'd') {
            return Ok(());
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let timeout = args
        .escape_timeout
        .map_or(DEFAULT_ESCAPE_TIMEOUT, Duration::from_millis);

    match run(timeout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
