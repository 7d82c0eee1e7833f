// Copyright (c) 2025 Athena Query Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Logging configuration for the Athena query client.
//!
//! Initializes a `tracing-subscriber` with file or stderr output. A bad
//! level or an unopenable log file is a configuration error like any other
//! and surfaces as [`Error::Config`].
//!
//! ## Configuration priority
//!
//! 1. [`ClientConfig`](crate::config::ClientConfig) log level / log file (highest)
//! 2. `RUST_LOG` environment variable
//! 3. Default: `warn`
//!
//! ```bash
//! RUST_LOG=athena_query=debug ./my_app
//! ```

use crate::error::{Error, Result};
use std::sync::OnceLock;
use tracing_subscriber::{
    filter::Directive,
    fmt::{self, time::SystemTime},
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

static LOGGING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Crate-scoped directive used when neither the config nor `RUST_LOG`
/// says otherwise.
const DEFAULT_DIRECTIVE: &str = "athena_query=warn";

/// Logging settings carried inside the client configuration.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Log level: "OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE".
    pub level: Option<String>,
    /// Log file path. If unset, logs go to stderr.
    pub file: Option<String>,
}

/// Translate the configured level into a filter.
///
/// `None` means logging is disabled ("OFF"); an unrecognized level is a
/// configuration error. Without a configured level, `RUST_LOG` applies.
fn build_filter(config: &LogConfig) -> Result<Option<EnvFilter>> {
    let Some(level) = config.level.as_deref() else {
        return Ok(Some(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)),
        ));
    };

    if level.eq_ignore_ascii_case("off") {
        return Ok(None);
    }

    let directive: Directive = format!("athena_query={}", level.to_lowercase())
        .parse()
        .map_err(|_| Error::config(format!("unknown log level: {level}")))?;
    Ok(Some(EnvFilter::default().add_directive(directive)))
}

/// Initialize the tracing subscriber.
///
/// The first client constructed in the process installs the subscriber;
/// later calls validate their settings and otherwise do nothing. A level
/// of "OFF" leaves the global subscriber untouched.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let Some(filter) = build_filter(config)? else {
        return Ok(());
    };

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match &config.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| Error::config(format!("cannot open log file {path}: {e}")))?;
            Box::new(
                fmt::layer()
                    .with_writer(file)
                    .with_target(false)
                    .with_ansi(false)
                    .with_timer(SystemTime),
            )
        }
        None => Box::new(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_timer(SystemTime),
        ),
    };

    if LOGGING_INITIALIZED.set(()).is_err() {
        return Ok(());
    }

    // try_init tolerates a subscriber installed by the host application.
    Registry::default().with(fmt_layer).with(filter).try_init().ok();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert!(config.level.is_none());
        assert!(config.file.is_none());
    }

    #[test]
    fn test_build_filter_without_level_uses_default() {
        let filter = build_filter(&LogConfig::default()).unwrap();
        assert!(filter.is_some());
    }

    #[test]
    fn test_build_filter_off_disables_logging() {
        for level in ["off", "OFF", "Off"] {
            let config = LogConfig {
                level: Some(level.to_string()),
                file: None,
            };
            assert!(build_filter(&config).unwrap().is_none());
        }
    }

    #[test]
    fn test_build_filter_accepts_level_names() {
        for level in ["error", "WARN", "info", "Debug", "trace"] {
            let config = LogConfig {
                level: Some(level.to_string()),
                file: None,
            };
            assert!(build_filter(&config).unwrap().is_some(), "level {level}");
        }
    }

    #[test]
    fn test_build_filter_rejects_unknown_level() {
        let config = LogConfig {
            level: Some("loud".to_string()),
            file: None,
        };
        let err = build_filter(&config).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got {err:?}");
    }

    #[test]
    fn test_init_logging_unopenable_file_is_config_error() {
        // The file is opened before the once-flag is claimed, so this
        // fails the same way no matter how many clients came first.
        let config = LogConfig {
            level: Some("debug".to_string()),
            file: Some("/nonexistent-dir-athena-query/test.log".to_string()),
        };
        let err = init_logging(&config).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got {err:?}");
    }
}
