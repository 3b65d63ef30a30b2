//! Application glue module
//!
//! Configuration shared by the binaries and the REPL driver.

mod config;

pub use config::{
    default_path, Config, ConfigError, EditorConfig, HistoryConfig, TerminalConfig,
};
