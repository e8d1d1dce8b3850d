//! Diagnostic sink: `tracing` events go to a log file, never to the
//! program's own output.

use std::{fs::OpenOptions, io, path::PathBuf, sync::Mutex};
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_LOG_FILE: &str = "logs.log";
pub const DEFAULT_LOG_LEVEL: &str = "debug";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directive, overridden by `RUST_LOG` when set
    pub level: String,
    /// Log destination; standard error when `None`
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

pub fn init(config: &LogConfig) -> Result<(), LoggingError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .map_err(|source| LoggingError::Open {
                    path: path.clone(),
                    source,
                })?;

            let file_layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .try_init()
                .map_err(|e| LoggingError::Init(e.to_string()))
        }
        None => {
            let stderr_layer = fmt::layer().compact().with_writer(io::stderr);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .try_init()
                .map_err(|e| LoggingError::Init(e.to_string()))
        }
    }
}
