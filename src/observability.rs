//! Logging setup for the bridge.
//!
//! All diagnostics in the crate go through the `log` facade. This module only
//! installs a concrete `env_logger` backend, once per process, either from the
//! Python side or from a `BridgeConfig`.

use std::fs::{File, OpenOptions};
use std::io::{IsTerminal, Write};
use std::sync::Once;

use colored::Colorize;
use log::{Level, LevelFilter};

use crate::config::BridgeConfig;
use crate::error::Result;

static INIT_LOGGER: Once = Once::new();

/// Installs an info-level logger that prints `[LEVEL] message` lines.
///
/// With `log_file` set, output is appended to that file; otherwise it goes to
/// stderr, with the level tag coloured when stderr is a terminal. Calls after the
/// first are no-ops. If another logger already owns the `log` facade, nothing is
/// installed and a warning is sent to that logger.
pub fn enable_verbose_logging(log_file: Option<&str>) -> Result<()> {
    // Open before `call_once` so a bad path surfaces as an error, not a panic.
    let file = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(move || {
        try_install(build_logger(file));
    });
    Ok(())
}

fn build_logger(file: Option<File>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.is_test(false);
    builder.filter_level(LevelFilter::Info);

    let colour = use_colour(file.is_some());
    builder.format(move |buf, record| {
        let level = record.level().to_string();
        if colour {
            writeln!(buf, "[{}] {}", paint(record.level(), &level), record.args())
        } else {
            writeln!(buf, "[{}] {}", level, record.args())
        }
    });

    if let Some(file) = file {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder
}

/// Returns whether `builder` became the global logger.
fn try_install(mut builder: env_logger::Builder) -> bool {
    match builder.try_init() {
        Ok(()) => true,
        Err(err) => {
            log::warn!("verbose logging not enabled, a logger is already installed: {err}");
            false
        }
    }
}

fn use_colour(to_file: bool) -> bool {
    !to_file && std::io::stderr().is_terminal()
}

/// Installs the verbose logger if `config` asks for it.
pub fn init_from_config(config: &BridgeConfig) -> Result<()> {
    if config.verbose_logging {
        enable_verbose_logging(config.log_file.as_deref())?;
    }
    Ok(())
}

fn paint(level: Level, tag: &str) -> colored::ColoredString {
    match level {
        Level::Error => tag.red().bold(),
        Level::Warn => tag.yellow(),
        Level::Info => tag.green(),
        Level::Debug => tag.blue(),
        Level::Trace => tag.dimmed(),
    }
}
