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

//! The query façade: catalog listing, query execution, result retrieval.
//!
//! [`QueryClient`] is the public surface of the crate. It owns no state
//! beyond an `Arc` to the backend client and the polling configuration;
//! every call is independent and the query lifecycle (queued → running →
//! succeeded/failed/cancelled) is observed by polling, never owned.

use crate::client::{AthenaClient, SdkClient};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::logging;
use crate::result::{StorageLocation, Table};
use crate::types::{QueryExecutionInfo, QueryState, QueryStatistics, TableDescription, TableKind};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Client for listing catalog metadata and running queries.
///
/// ## Example
///
/// ```ignore
/// use athena_query::{ClientConfig, QueryClient};
///
/// let config = ClientConfig::new("s3://my-results-bucket/athena/")
///     .with_region("ap-southeast-2");
/// let client = QueryClient::connect(config).await?;
///
/// let location = client.run_query("my_database", "SELECT * FROM events").await?;
/// let table = client.run_query_to_table("my_database", "SELECT count(*) c FROM events").await?;
/// ```
#[derive(Debug, Clone)]
pub struct QueryClient {
    client: Arc<dyn AthenaClient>,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl QueryClient {
    /// Connect using the AWS SDK backend.
    ///
    /// Validates the configuration, initializes logging (once per process),
    /// and resolves credentials through the SDK's default provider chain.
    /// An invalid config is rejected before any process-wide setup happens.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        logging::init_logging(&config.log)?;
        let client = SdkClient::new(&config).await?;
        Ok(Self::with_client(Arc::new(client), &config))
    }

    /// Build a client over an arbitrary backend implementation.
    pub fn with_client(client: Arc<dyn AthenaClient>, config: &ClientConfig) -> Self {
        Self {
            client,
            poll_interval: config.poll_interval,
            poll_timeout: config.poll_timeout,
        }
    }

    // --- Catalog metadata ---

    /// List all database names in the catalog.
    pub async fn list_databases(&self) -> Result<Vec<String>> {
        self.client.list_databases().await
    }

    /// List the external tables of a database.
    ///
    /// Fails with [`Error::NotFound`] when the database does not exist.
    pub async fn list_tables(&self, database: &str) -> Result<Vec<String>> {
        let tables = self.client.list_table_metadata(database).await?;
        Ok(tables
            .into_iter()
            .filter(|t| t.kind == TableKind::External)
            .map(|t| t.name)
            .collect())
    }

    /// List the virtual views of a database.
    pub async fn list_views(&self, database: &str) -> Result<Vec<String>> {
        let tables = self.client.list_table_metadata(database).await?;
        Ok(tables
            .into_iter()
            .filter(|t| t.kind == TableKind::View)
            .map(|t| t.name)
            .collect())
    }

    /// Column and partition-key schema of a table or view.
    pub async fn table_schema(&self, database: &str, table: &str) -> Result<TableDescription> {
        self.client.table_metadata(database, table).await
    }

    // --- Query execution ---

    /// Submit a query without waiting for it. Returns the execution id.
    pub async fn submit(&self, database: &str, sql: &str) -> Result<String> {
        self.client.submit_query(database, sql).await
    }

    /// Wait for a submitted query to succeed.
    ///
    /// Polls until the service reports a terminal state. Fails with
    /// [`Error::QueryFailed`] (service reason preserved verbatim),
    /// [`Error::QueryCancelled`], or [`Error::Timeout`] when the polling
    /// bound is exceeded.
    pub async fn wait(&self, execution_id: &str) -> Result<QueryExecutionInfo> {
        let info = self.wait_until_terminal(execution_id).await?;
        match info.status.state {
            QueryState::Succeeded => Ok(info),
            QueryState::Failed => Err(Error::QueryFailed {
                reason: info
                    .status
                    .state_change_reason
                    .unwrap_or_else(|| "no reason reported by the service".to_string()),
            }),
            QueryState::Cancelled => Err(Error::QueryCancelled),
            QueryState::Queued | QueryState::Running => {
                Err(Error::service("poll loop returned a non-terminal state"))
            }
        }
    }

    /// Execution statistics once a query has reached a terminal state.
    ///
    /// Unlike [`wait`](Self::wait), this also reports statistics for failed
    /// and cancelled queries.
    pub async fn statistics(&self, execution_id: &str) -> Result<QueryStatistics> {
        let info = self.wait_until_terminal(execution_id).await?;
        Ok(info.statistics.unwrap_or_default())
    }

    /// Run a query to completion and return its result location.
    pub async fn run_query(&self, database: &str, sql: &str) -> Result<StorageLocation> {
        let execution_id = self.submit(database, sql).await?;
        let info = self.wait(&execution_id).await?;

        let uri = info.output_location.filter(|loc| !loc.is_empty()).ok_or_else(|| {
            Error::parse(format!(
                "execution {execution_id} succeeded without an output location"
            ))
        })?;
        StorageLocation::parse(&uri)
    }

    /// Run a query to completion and materialize the result file.
    pub async fn run_query_to_table(&self, database: &str, sql: &str) -> Result<Table> {
        let location = self.run_query(database, sql).await?;
        let data = self.client.fetch_object(&location).await?;
        let table = Table::from_csv(&data)?;
        debug!(
            "Materialized {} rows x {} columns from {}",
            table.num_rows(),
            table.num_columns(),
            location
        );
        Ok(table)
    }

    /// List the partitions of a table via `SHOW PARTITIONS`.
    ///
    /// The partition listing is written to storage like any other result,
    /// one `key=value` entry per line.
    pub async fn list_partitions(&self, database: &str, table: &str) -> Result<Vec<String>> {
        let sql = format!("SHOW PARTITIONS {table}");
        let location = self.run_query(database, &sql).await?;
        let data = self.client.fetch_object(&location).await?;
        let text = String::from_utf8(data)
            .map_err(|e| Error::parse(format!("partition listing is not UTF-8: {e}")))?;
        Ok(text.lines().map(str::to_string).collect())
    }

    /// Poll until the service reports a terminal state, respecting the
    /// configured deadline.
    async fn wait_until_terminal(&self, execution_id: &str) -> Result<QueryExecutionInfo> {
        // An unrepresentable deadline (e.g. Duration::MAX) means no bound.
        let deadline = Instant::now().checked_add(self.poll_timeout);

        loop {
            let info = self.client.query_execution(execution_id).await?;
            if info.status.state.is_terminal() {
                return Ok(info);
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(Error::Timeout {
                    limit: self.poll_timeout,
                });
            }
            debug!(
                "Execution {} is {:?}, polling again in {:?}",
                execution_id, info.status.state, self.poll_interval
            );
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
