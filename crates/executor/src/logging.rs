use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*};

use super::error::Error;

/// Installs the global subscriber: human-readable lines on stdout and, when `log_file`
/// is given, the same events appended to that file without ANSI colours.
pub fn init_tracing(level: &str, log_file: Option<&Path>) -> Result<(), Error> {
    let filter = parse_level(level)?;

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::LoggingError(e.to_string()))
}

fn parse_level(level: &str) -> Result<LevelFilter, Error> {
    level
        .parse::<LevelFilter>()
        .map_err(|_| Error::LoggingError(format!("unknown log level '{}'", level)))
}
