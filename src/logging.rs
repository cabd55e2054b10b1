use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config as LogConfig, Root},
    encode::pattern::PatternEncoder,
};
use thiserror::Error;

use crate::error::Result;

/// Pattern used when no log4rs config file is available.
const FALLBACK_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}";

/// A unique identifier for a particular ledger operation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct OperationId(pub usize);

impl Display for OperationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OperationId {
    /// Atomically get the next ID. This wraps around back to zero if you somehow exceed a usize.
    pub fn next() -> OperationId {
        static OPERATION_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);
        OperationId(OPERATION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Log the outcome of an operation started under `id`.
pub(crate) fn log_outcome<T>(id: OperationId, operation: &str, result: &Result<T>) {
    match result {
        Ok(_) => info!("<-op{id} {operation} ok"),
        Err(err) if err.is_rejection() => warn!("<-op{id} {operation} rejected: {err}"),
        Err(err) => error!("<-op{id} {operation} failed: {err}"),
    }
}

#[derive(Debug, Error)]
#[error("Failed to initialise logging: {0}")]
pub struct LoggingError(String);

/// Initialise log4rs from the YAML file at `config_path`, or log to the
/// console at `Info` if there is no such file.
pub fn init(config_path: impl AsRef<Path>) -> std::result::Result<(), LoggingError> {
    let config_path = config_path.as_ref();
    if config_path.exists() {
        log4rs::init_file(config_path, Default::default())
            .map_err(|e| LoggingError(e.to_string()))?;
        info!("Initialised logging from {}", config_path.display());
    } else {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(FALLBACK_PATTERN)))
            .build();
        let config = LogConfig::builder()
            .appender(Appender::builder().build("stdout", Box::new(stdout)))
            .build(Root::builder().appender("stdout").build(LevelFilter::Info))
            .map_err(|e| LoggingError(e.to_string()))?;
        log4rs::init_config(config).map_err(|e| LoggingError(e.to_string()))?;
        info!(
            "No logging config at {}, logging to console",
            config_path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_ids_increase() {
        let first = OperationId::next();
        let second = OperationId::next();
        assert!(second > first);
        assert_eq!(format!("{}", OperationId(42)), "42");
    }
}
