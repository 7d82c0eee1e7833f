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

//! AWS SDK implementation of the [`AthenaClient`] trait.
//!
//! Authentication, request signing, transport, and the SDK's own retry
//! policy are all delegated to `aws-sdk-athena` / `aws-sdk-s3`. This module
//! only converts between SDK types and the crate's domain types and
//! classifies SDK failures into the [`Error`] taxonomy.

use crate::client::AthenaClient;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::result::StorageLocation;
use crate::types::{
    ColumnSchema, QueryExecutionInfo, QueryState, QueryStatistics, QueryStatus,
    TableDescription, TableKind,
};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_athena::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_athena::types::{
    Column, QueryExecution, QueryExecutionContext, QueryExecutionState,
    QueryExecutionStatistics, ResultConfiguration, TableMetadata,
};
use tracing::debug;

/// Production client delegating to the AWS SDK.
#[derive(Debug)]
pub struct SdkClient {
    athena: aws_sdk_athena::Client,
    s3: aws_sdk_s3::Client,
    catalog: String,
    output_location: String,
}

impl SdkClient {
    /// Build SDK clients from the shared AWS config.
    ///
    /// Credentials and (when not set explicitly) the region come from the
    /// SDK's default provider chain.
    pub async fn new(config: &ClientConfig) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        Ok(Self::from_parts(
            aws_sdk_athena::Client::new(&sdk_config),
            aws_sdk_s3::Client::new(&sdk_config),
            config,
        ))
    }

    /// Assemble a client from already-constructed SDK clients.
    fn from_parts(
        athena: aws_sdk_athena::Client,
        s3: aws_sdk_s3::Client,
        config: &ClientConfig,
    ) -> Self {
        Self {
            athena,
            s3,
            catalog: config.catalog.clone(),
            output_location: config.output_location.clone(),
        }
    }

    /// Convert the SDK's execution state into the domain state.
    fn convert_state(state: &QueryExecutionState) -> Result<QueryState> {
        match state {
            QueryExecutionState::Queued => Ok(QueryState::Queued),
            QueryExecutionState::Running => Ok(QueryState::Running),
            QueryExecutionState::Succeeded => Ok(QueryState::Succeeded),
            QueryExecutionState::Failed => Ok(QueryState::Failed),
            QueryExecutionState::Cancelled => Ok(QueryState::Cancelled),
            other => Err(Error::service(format!(
                "unknown query state: {}",
                other.as_str()
            ))),
        }
    }

    /// Convert an SDK execution record into [`QueryExecutionInfo`].
    fn convert_execution(execution: &QueryExecution) -> Result<QueryExecutionInfo> {
        let status = execution
            .status()
            .ok_or_else(|| Error::service("query execution missing status"))?;
        let state = status
            .state()
            .ok_or_else(|| Error::service("query execution missing state"))?;

        Ok(QueryExecutionInfo {
            execution_id: execution.query_execution_id().unwrap_or_default().to_string(),
            status: QueryStatus {
                state: Self::convert_state(state)?,
                state_change_reason: status.state_change_reason().map(str::to_string),
            },
            output_location: execution
                .result_configuration()
                .and_then(|rc| rc.output_location())
                .map(str::to_string),
            statistics: execution.statistics().map(Self::convert_statistics),
        })
    }

    fn convert_statistics(stats: &QueryExecutionStatistics) -> QueryStatistics {
        QueryStatistics {
            engine_execution_time_ms: stats.engine_execution_time_in_millis(),
            total_execution_time_ms: stats.total_execution_time_in_millis(),
            query_queue_time_ms: stats.query_queue_time_in_millis(),
            query_planning_time_ms: stats.query_planning_time_in_millis(),
            service_processing_time_ms: stats.service_processing_time_in_millis(),
            data_scanned_bytes: stats.data_scanned_in_bytes(),
        }
    }

    fn convert_table(meta: &TableMetadata) -> TableDescription {
        TableDescription {
            name: meta.name().to_string(),
            kind: TableKind::from_table_type(meta.table_type()),
            columns: meta.columns().iter().map(Self::convert_column).collect(),
            partition_keys: meta
                .partition_keys()
                .iter()
                .map(Self::convert_column)
                .collect(),
        }
    }

    fn convert_column(col: &Column) -> ColumnSchema {
        ColumnSchema {
            name: col.name().to_string(),
            data_type: col.r#type().unwrap_or_default().to_string(),
        }
    }
}

/// Classify an SDK failure into the crate's error taxonomy.
fn classify_sdk_error<E>(op: &'static str, err: &SdkError<E>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    match err.as_service_error() {
        Some(service) => classify_service_error(
            op,
            service.code().unwrap_or("Unknown"),
            service.message().unwrap_or("no message from service"),
        ),
        // Construction, dispatch, and response errors are transport-level.
        None => Error::service(format!("{op}: {err}")),
    }
}

/// Classify a service error by its code string.
///
/// The catalog reports a missing database or table as `MetadataException`;
/// object storage reports missing objects as `NoSuchKey`/`NoSuchBucket`.
fn classify_service_error(op: &'static str, code: &str, message: &str) -> Error {
    if code.contains("NotFound") || code.starts_with("NoSuch") || code == "MetadataException" {
        Error::not_found(format!("{op}: {message}"))
    } else if code.contains("AccessDenied")
        || code.contains("Unauthorized")
        || code.contains("Forbidden")
    {
        Error::access_denied(format!("{op}: {message}"))
    } else {
        Error::service(format!("{op}: {code}: {message}"))
    }
}

#[async_trait]
impl AthenaClient for SdkClient {
    async fn submit_query(&self, database: &str, sql: &str) -> Result<String> {
        debug!("Submitting query to database {}: {}", database, sql);

        let context = QueryExecutionContext::builder()
            .catalog(&self.catalog)
            .database(database)
            .build();
        let result_config = ResultConfiguration::builder()
            .output_location(&self.output_location)
            .build();

        let output = self
            .athena
            .start_query_execution()
            .query_string(sql)
            .query_execution_context(context)
            .result_configuration(result_config)
            .send()
            .await
            .map_err(|e| classify_sdk_error("start_query_execution", &e))?;

        let execution_id = output
            .query_execution_id()
            .ok_or_else(|| Error::service("start_query_execution returned no execution id"))?
            .to_string();

        debug!("Submitted query execution {}", execution_id);
        Ok(execution_id)
    }

    async fn query_execution(&self, execution_id: &str) -> Result<QueryExecutionInfo> {
        let output = self
            .athena
            .get_query_execution()
            .query_execution_id(execution_id)
            .send()
            .await
            .map_err(|e| classify_sdk_error("get_query_execution", &e))?;

        let execution = output
            .query_execution()
            .ok_or_else(|| Error::service("get_query_execution returned no execution"))?;

        let info = Self::convert_execution(execution)?;
        debug!(
            "Execution {} is {:?}",
            info.execution_id, info.status.state
        );
        Ok(info)
    }

    async fn list_databases(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut request = self.athena.list_databases().catalog_name(&self.catalog);
            if let Some(token) = &next_token {
                request = request.next_token(token);
            }
            let output = request
                .send()
                .await
                .map_err(|e| classify_sdk_error("list_databases", &e))?;

            for database in output.database_list() {
                names.push(database.name().to_string());
            }

            next_token = output.next_token().map(str::to_string);
            if next_token.is_none() {
                break;
            }
        }

        debug!("Found {} databases", names.len());
        Ok(names)
    }

    async fn list_table_metadata(&self, database: &str) -> Result<Vec<TableDescription>> {
        let mut tables = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut request = self
                .athena
                .list_table_metadata()
                .catalog_name(&self.catalog)
                .database_name(database);
            if let Some(token) = &next_token {
                request = request.next_token(token);
            }
            let output = request
                .send()
                .await
                .map_err(|e| classify_sdk_error("list_table_metadata", &e))?;

            tables.extend(output.table_metadata_list().iter().map(Self::convert_table));

            next_token = output.next_token().map(str::to_string);
            if next_token.is_none() {
                break;
            }
        }

        debug!("Found {} tables in {}", tables.len(), database);
        Ok(tables)
    }

    async fn table_metadata(&self, database: &str, table: &str) -> Result<TableDescription> {
        let output = self
            .athena
            .get_table_metadata()
            .catalog_name(&self.catalog)
            .database_name(database)
            .table_name(table)
            .send()
            .await
            .map_err(|e| classify_sdk_error("get_table_metadata", &e))?;

        let meta = output
            .table_metadata()
            .ok_or_else(|| Error::not_found(format!("table {database}.{table}")))?;

        Ok(Self::convert_table(meta))
    }

    async fn fetch_object(&self, location: &StorageLocation) -> Result<Vec<u8>> {
        debug!("Fetching result object {}", location);

        let output = self
            .s3
            .get_object()
            .bucket(location.bucket())
            .key(location.key())
            .send()
            .await
            .map_err(|e| classify_sdk_error("get_object", &e))?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| Error::service(format!("get_object: failed to read body: {e}")))?;

        Ok(bytes.into_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_athena::operation::list_databases::ListDatabasesOutput;
    use aws_sdk_athena::operation::list_table_metadata::ListTableMetadataOutput;
    use aws_sdk_athena::types::{Database, QueryExecutionStatus};
    use aws_smithy_mocks::{mock, mock_client, RuleMode};

    fn test_config() -> ClientConfig {
        ClientConfig::new("s3://results/")
    }

    /// S3 client that is never called in catalog tests.
    fn stub_s3_client() -> aws_sdk_s3::Client {
        let unused = mock!(aws_sdk_s3::Client::get_object).then_output(|| {
            aws_sdk_s3::operation::get_object::GetObjectOutput::builder().build()
        });
        mock_client!(aws_sdk_s3, [&unused])
    }

    #[test]
    fn test_convert_execution_succeeded() {
        let execution = QueryExecution::builder()
            .query_execution_id("exec-1")
            .status(
                QueryExecutionStatus::builder()
                    .state(QueryExecutionState::Succeeded)
                    .build(),
            )
            .result_configuration(
                ResultConfiguration::builder()
                    .output_location("s3://results/exec-1.csv")
                    .build(),
            )
            .statistics(
                QueryExecutionStatistics::builder()
                    .engine_execution_time_in_millis(120)
                    .data_scanned_in_bytes(4096)
                    .build(),
            )
            .build();

        let info = SdkClient::convert_execution(&execution).unwrap();
        assert_eq!(info.execution_id, "exec-1");
        assert_eq!(info.status.state, QueryState::Succeeded);
        assert_eq!(
            info.output_location.as_deref(),
            Some("s3://results/exec-1.csv")
        );
        let stats = info.statistics.unwrap();
        assert_eq!(stats.engine_execution_time_ms, Some(120));
        assert_eq!(stats.data_scanned_bytes, Some(4096));
    }

    #[test]
    fn test_convert_execution_failed_keeps_reason() {
        let execution = QueryExecution::builder()
            .query_execution_id("exec-2")
            .status(
                QueryExecutionStatus::builder()
                    .state(QueryExecutionState::Failed)
                    .state_change_reason("SYNTAX_ERROR: line 1:8")
                    .build(),
            )
            .build();

        let info = SdkClient::convert_execution(&execution).unwrap();
        assert_eq!(info.status.state, QueryState::Failed);
        assert_eq!(
            info.status.state_change_reason.as_deref(),
            Some("SYNTAX_ERROR: line 1:8")
        );
        assert!(info.output_location.is_none());
    }

    #[test]
    fn test_convert_execution_missing_status_is_error() {
        let execution = QueryExecution::builder().query_execution_id("exec-3").build();
        assert!(SdkClient::convert_execution(&execution).is_err());
    }

    #[test]
    fn test_convert_table() {
        let meta = TableMetadata::builder()
            .name("events")
            .table_type("EXTERNAL_TABLE")
            .columns(
                Column::builder()
                    .name("id")
                    .r#type("bigint")
                    .build()
                    .unwrap(),
            )
            .partition_keys(Column::builder().name("day").r#type("date").build().unwrap())
            .build()
            .unwrap();

        let desc = SdkClient::convert_table(&meta);
        assert_eq!(desc.name, "events");
        assert_eq!(desc.kind, TableKind::External);
        assert_eq!(desc.column_names(), vec!["id"]);
        assert_eq!(desc.partition_key_names(), vec!["day"]);
        assert_eq!(desc.columns[0].data_type, "bigint");
    }

    #[tokio::test]
    async fn test_list_databases_follows_next_token() {
        let first_page = mock!(aws_sdk_athena::Client::list_databases)
            .match_requests(|input| input.next_token().is_none())
            .then_output(|| {
                ListDatabasesOutput::builder()
                    .database_list(Database::builder().name("sales").build().unwrap())
                    .next_token("page-2")
                    .build()
            });
        // The follow-up request must echo the service's token.
        let second_page = mock!(aws_sdk_athena::Client::list_databases)
            .match_requests(|input| input.next_token() == Some("page-2"))
            .then_output(|| {
                ListDatabasesOutput::builder()
                    .database_list(Database::builder().name("marketing").build().unwrap())
                    .build()
            });
        let athena =
            mock_client!(aws_sdk_athena, RuleMode::Sequential, [&first_page, &second_page]);

        let client = SdkClient::from_parts(athena, stub_s3_client(), &test_config());
        let databases = client.list_databases().await.unwrap();
        assert_eq!(databases, vec!["sales", "marketing"]);
    }

    #[tokio::test]
    async fn test_list_table_metadata_follows_next_token() {
        let first_page = mock!(aws_sdk_athena::Client::list_table_metadata)
            .match_requests(|input| {
                input.database_name() == Some("sales") && input.next_token().is_none()
            })
            .then_output(|| {
                ListTableMetadataOutput::builder()
                    .table_metadata_list(
                        TableMetadata::builder()
                            .name("orders")
                            .table_type("EXTERNAL_TABLE")
                            .build()
                            .unwrap(),
                    )
                    .next_token("page-2")
                    .build()
            });
        let second_page = mock!(aws_sdk_athena::Client::list_table_metadata)
            .match_requests(|input| {
                input.database_name() == Some("sales") && input.next_token() == Some("page-2")
            })
            .then_output(|| {
                ListTableMetadataOutput::builder()
                    .table_metadata_list(
                        TableMetadata::builder()
                            .name("customers")
                            .table_type("EXTERNAL_TABLE")
                            .build()
                            .unwrap(),
                    )
                    .build()
            });
        let athena =
            mock_client!(aws_sdk_athena, RuleMode::Sequential, [&first_page, &second_page]);

        let client = SdkClient::from_parts(athena, stub_s3_client(), &test_config());
        let tables = client.list_table_metadata("sales").await.unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].name, "orders");
        assert_eq!(tables[1].name, "customers");
    }

    #[test]
    fn test_classify_service_error_not_found() {
        let err = classify_service_error(
            "list_table_metadata",
            "MetadataException",
            "database missing_db not found",
        );
        assert!(matches!(err, Error::NotFound(_)), "got {err:?}");

        let err = classify_service_error("get_object", "NoSuchKey", "key does not exist");
        assert!(matches!(err, Error::NotFound(_)), "got {err:?}");
    }

    #[test]
    fn test_classify_service_error_access_denied() {
        let err = classify_service_error(
            "start_query_execution",
            "AccessDeniedException",
            "not authorized",
        );
        assert!(matches!(err, Error::AccessDenied(_)), "got {err:?}");
    }

    #[test]
    fn test_classify_service_error_other_is_service() {
        let err = classify_service_error(
            "list_databases",
            "TooManyRequestsException",
            "throttled",
        );
        assert!(matches!(err, Error::Service(_)), "got {err:?}");
        assert!(err.to_string().contains("TooManyRequestsException"));
    }
}
