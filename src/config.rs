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

//! Client configuration.

use crate::error::{Error, Result};
use crate::logging::LogConfig;
use crate::result::StorageLocation;
use std::time::Duration;

/// Name of the service's default data catalog.
pub const DEFAULT_CATALOG: &str = "AwsDataCatalog";

/// Configuration for a [`QueryClient`](crate::query::QueryClient).
///
/// Credentials are not configured here: the AWS SDK resolves them through
/// its default provider chain (environment, profile, instance metadata).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// AWS region. When unset, the SDK's default region chain applies.
    pub region: Option<String>,
    /// `s3://` URI where the service writes result objects. Required.
    pub output_location: String,
    /// Data catalog to resolve databases and tables against.
    pub catalog: String,
    /// Sleep between status polls.
    pub poll_interval: Duration,
    /// Upper bound on total polling time before a query is abandoned
    /// with [`Error::Timeout`].
    pub poll_timeout: Duration,
    /// Logging configuration, applied once per process.
    pub log: LogConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: None,
            output_location: String::new(),
            catalog: DEFAULT_CATALOG.to_string(),
            poll_interval: Duration::from_secs(1),
            poll_timeout: Duration::from_secs(300),
            log: LogConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Creates a config with the given result output location and defaults
    /// for everything else.
    pub fn new(output_location: impl Into<String>) -> Self {
        Self {
            output_location: output_location.into(),
            ..Self::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = catalog.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log.level = Some(level.into());
        self
    }

    pub fn with_log_file(mut self, path: impl Into<String>) -> Self {
        self.log.file = Some(path.into());
        self
    }

    /// Validate the configuration before client construction.
    pub fn validate(&self) -> Result<()> {
        if self.output_location.is_empty() {
            return Err(Error::config("output_location is required"));
        }
        StorageLocation::parse(&self.output_location)
            .map_err(|e| Error::config(format!("invalid output_location: {e}")))?;
        if self.catalog.is_empty() {
            return Err(Error::config("catalog must not be empty"));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::config("poll_interval must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.catalog, DEFAULT_CATALOG);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.poll_timeout, Duration::from_secs(300));
        assert!(config.region.is_none());
    }

    #[test]
    fn test_validate_requires_output_location() {
        let err = ClientConfig::default().validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate_rejects_non_s3_output_location() {
        let config = ClientConfig::new("file:///tmp/results");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_s3_output_location() {
        let config = ClientConfig::new("s3://results-bucket/athena/");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let config = ClientConfig::new("s3://results-bucket/athena/")
            .with_region("ap-southeast-2")
            .with_catalog("my_catalog")
            .with_poll_interval(Duration::from_millis(250))
            .with_poll_timeout(Duration::from_secs(60));
        assert_eq!(config.region.as_deref(), Some("ap-southeast-2"));
        assert_eq!(config.catalog, "my_catalog");
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.poll_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_validate_rejects_zero_poll_interval() {
        let config =
            ClientConfig::new("s3://results-bucket/").with_poll_interval(Duration::ZERO);
        assert!(config.validate().is_err());
    }
}
