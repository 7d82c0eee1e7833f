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

//! Error types for the Athena query client.
//!
//! Every failure is a pass-through classification of what the AWS SDK or the
//! query service itself reported. Nothing is retried or swallowed here; the
//! SDK performs its own internal retries and everything that still fails
//! surfaces to the caller as one of these variants.

use std::time::Duration;
use thiserror::Error;

/// Error type for all client operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The requested catalog entity (database, table, result object) does
    /// not exist according to the service.
    #[error("not found: {0}")]
    NotFound(String),

    /// The service rejected the request for authorization reasons.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Transport failure or any service error that is neither a not-found
    /// nor an authorization problem.
    #[error("service error: {0}")]
    Service(String),

    /// The query reached the FAILED terminal state. `reason` is the
    /// service's state-change reason, preserved verbatim.
    #[error("query failed: {reason}")]
    QueryFailed { reason: String },

    /// The query reached the CANCELLED terminal state.
    #[error("query was cancelled")]
    QueryCancelled,

    /// Polling did not observe a terminal state within the configured bound.
    #[error("query did not reach a terminal state within {limit:?}")]
    Timeout { limit: Duration },

    /// The result content did not match the expected format.
    #[error("unexpected result format: {0}")]
    Parse(String),

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates a not-found error with the given message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Creates an access-denied error with the given message.
    pub fn access_denied(msg: impl Into<String>) -> Self {
        Self::AccessDenied(msg.into())
    }

    /// Creates a service error with the given message.
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    /// Creates a query-failed error carrying the service's reason.
    pub fn query_failed(reason: impl Into<String>) -> Self {
        Self::QueryFailed {
            reason: reason.into(),
        }
    }

    /// Creates a parse error with the given message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::not_found("database 'sales' does not exist");
        assert_eq!(err.to_string(), "not found: database 'sales' does not exist");
    }

    #[test]
    fn test_error_display_query_failed_preserves_reason() {
        let reason = "SYNTAX_ERROR: line 1:8: Column 'nme' cannot be resolved";
        let err = Error::query_failed(reason);
        assert_eq!(err.to_string(), format!("query failed: {}", reason));
    }

    #[test]
    fn test_error_display_timeout() {
        let err = Error::Timeout {
            limit: Duration::from_secs(300),
        };
        assert_eq!(
            err.to_string(),
            "query did not reach a terminal state within 300s"
        );
    }

    #[test]
    fn test_error_display_parse() {
        let err = Error::parse("row 3 has 2 fields, header has 4");
        assert_eq!(
            err.to_string(),
            "unexpected result format: row 3 has 2 fields, header has 4"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
