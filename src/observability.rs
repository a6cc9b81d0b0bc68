//! Logging setup
//!
//! Diagnostics go to stderr through `tracing`; results go to stdout so that
//! `--json` output stays machine-readable.

use std::env;

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install the global subscriber
///
/// `verbosity` is the number of `-v` flags: 0 logs INFO, 1 DEBUG, 2 and more
/// TRACE. A `RUST_LOG` that parses as a plain level wins over the flag; any
/// other `RUST_LOG` value is used as a full filter directive.
pub fn init_tracing(verbosity: u8) {
    let (level, env_filter) = parse_rust_log(verbosity);
    let format = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(true);

    // Ignore the error: a subscriber may already be set by an embedding test harness
    let _ = tracing_subscriber::registry()
        .with(format.with_filter(LevelFilter::from(level)))
        .with(env_filter)
        .try_init();
}

fn parse_rust_log(verbosity: u8) -> (Level, EnvFilter) {
    let level = match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(value) => match value.parse::<Level>() {
            Ok(level) => level,
            Err(_) => return (Level::TRACE, EnvFilter::new(value)),
        },
        Err(_) => level_for(verbosity),
    };

    (level, EnvFilter::new("warn,cachepulse=trace"))
}

fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}
