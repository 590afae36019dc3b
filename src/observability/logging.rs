//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Route log output to the selected sink
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level configurable via `RUST_LOG`
//! - File sinks append and never use ANSI colours

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const MIN_SINK_LEN: usize = 5;
const DEFAULT_FILTER: &str = "json_site_server=debug,tower_http=info";

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stdout,
    Stderr,
    Discard,
    File(PathBuf),
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("log sink '{0}' should contain at least {MIN_SINK_LEN} characters")]
    SinkTooShort(String),

    #[error("log file {path:?} could not be opened: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

impl FromStr for LogSink {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.chars().count() < MIN_SINK_LEN {
            return Err(LoggingError::SinkTooShort(s.to_string()));
        }
        Ok(match s {
            "stdout" => LogSink::Stdout,
            "stderr" => LogSink::Stderr,
            "DISCARD" => LogSink::Discard,
            path => LogSink::File(PathBuf::from(path)),
        })
    }
}

impl LogSink {
    fn make_writer(&self) -> Result<BoxMakeWriter, LoggingError> {
        Ok(match self {
            LogSink::Stdout => BoxMakeWriter::new(std::io::stdout),
            LogSink::Stderr => BoxMakeWriter::new(std::io::stderr),
            LogSink::Discard => BoxMakeWriter::new(std::io::sink),
            LogSink::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| LoggingError::Open {
                        path: path.clone(),
                        source,
                    })?;
                BoxMakeWriter::new(Mutex::new(file))
            }
        })
    }

    fn is_terminal(&self) -> bool {
        matches!(self, LogSink::Stdout | LogSink::Stderr)
    }
}

/// Install the global subscriber writing to `sink`.
pub fn init_logging(sink: &LogSink) -> Result<(), LoggingError> {
    let writer = sink.make_writer()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(sink.is_terminal()),
        )
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sinks() {
        assert_eq!("stdout".parse::<LogSink>().unwrap(), LogSink::Stdout);
        assert_eq!("stderr".parse::<LogSink>().unwrap(), LogSink::Stderr);
        assert_eq!("DISCARD".parse::<LogSink>().unwrap(), LogSink::Discard);
        assert_eq!(
            "/var/log/site.log".parse::<LogSink>().unwrap(),
            LogSink::File(PathBuf::from("/var/log/site.log"))
        );
    }

    #[test]
    fn test_short_sink_rejected() {
        assert!(matches!("out".parse::<LogSink>(), Err(LoggingError::SinkTooShort(_))));
        // "discard" in lower case is just a file name.
        assert!(matches!("discard".parse::<LogSink>(), Ok(LogSink::File(_))));
    }

    #[test]
    fn test_unopenable_file() {
        let sink = LogSink::File(PathBuf::from("/nonexistent-dir/x/site.log"));
        assert!(matches!(sink.make_writer(), Err(LoggingError::Open { .. })));
    }
}
