// src/logging.rs

//! Logging for the `smake` binary.
//!
//! The filter is chosen from, in order:
//! 1. `--log-level`, which applies one level to everything
//! 2. `SMAKE_LOG`, read as `tracing-subscriber` directives
//!    (`debug`, or `smake::dag=trace,info`)
//! 3. `info`
//!
//! Logs go to stderr so they never mix with the output of actions.

use anyhow::{anyhow, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

const LOG_ENV: &str = "SMAKE_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = select_filter(cli_level, env.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

fn select_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::default().add_directive(LevelFilter::from(level).into());
    }

    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|err| {
            eprintln!("smake: ignoring invalid {LOG_ENV} value {directives:?}: {err}");
            EnvFilter::new(DEFAULT_DIRECTIVE)
        }),
        None => EnvFilter::new(DEFAULT_DIRECTIVE),
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flag_beats_environment() {
        let filter = select_filter(Some(LogLevel::Warn), Some("trace"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn environment_directives_are_used() {
        let filter = select_filter(None, Some("debug"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn blank_or_invalid_environment_falls_back_to_info() {
        assert_eq!(
            select_filter(None, Some("  ")).max_level_hint(),
            Some(LevelFilter::INFO)
        );
        assert_eq!(
            select_filter(None, Some("smake=loudest")).max_level_hint(),
            Some(LevelFilter::INFO)
        );
        assert_eq!(select_filter(None, None).max_level_hint(), Some(LevelFilter::INFO));
    }
}
