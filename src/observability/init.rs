//! Tracing initialization and subscriber setup.
//!
//! This module configures the `tracing-subscriber` registry: an `EnvFilter`
//! built from the configured level, and a formatting layer writing to stderr
//! or to a rotating trace file.

use super::file_writer::FileWriter;
use crate::domain::error::{ListError, Result};
use crate::Config;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber.
///
/// # Trace Level Resolution
///
/// 1. `RUST_LOG` environment variable
/// 2. `config.trace_level` if set
/// 3. Default: `"info"`
///
/// # Output
///
/// With `config.trace_file` set, events are written without ANSI colors to
/// that file, rotated at 10MB with 3 backups; the parent directory is
/// created if needed. Otherwise events go to stderr.
///
/// Idempotent: if a global subscriber is already installed, the call is a
/// no-op.
///
/// # Errors
///
/// Returns [`ListError::Config`] for an unparsable trace level and
/// [`ListError::Io`] if the trace file directory cannot be created.
///
/// # Example
///
/// ```rust
/// use listkeeper::observability::init_tracing;
/// use listkeeper::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config)?;
/// tracing::debug!("tracing is now active");
/// # Ok::<(), listkeeper::ListError>(())
/// ```
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let level = config.trace_level.as_deref().unwrap_or("info");
            EnvFilter::try_new(level)
                .map_err(|e| ListError::Config(format!("invalid trace level {level:?}: {e}")))?
        }
    };

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.trace_file.as_ref() {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let writer = Arc::new(FileWriter::new(path.clone()));
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .try_init()
        }
        None => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparsable_levels() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = Config {
            trace_level: Some("listkeeper=loud".to_string()),
            ..Default::default()
        };
        assert!(matches!(init_tracing(&config), Err(ListError::Config(_))));
    }
}
