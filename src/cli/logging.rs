use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::domain::DomainError;

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
    Discard,
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `verbose`.
pub fn init_logging(target: &LogTarget, verbose: bool) -> Result<(), DomainError> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match target {
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::Discard => builder.with_writer(std::io::sink).try_init(),
    };

    result.map_err(|e| DomainError::internal(format!("failed to install logger: {e}")))
}
