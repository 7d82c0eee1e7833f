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

//! Domain types for query execution and catalog metadata.
//!
//! These are deliberately decoupled from the AWS SDK's generated types so
//! the rest of the crate (and its tests) never touch SDK structs directly.
//! `client::sdk` owns the conversion in both directions.

use serde::Serialize;

/// Lifecycle state of a query execution, as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl QueryState {
    /// Whether the service will never transition out of this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

/// Status of a query execution: the state plus the service's reason for the
/// most recent state change (populated on failure and cancellation).
#[derive(Debug, Clone, Serialize)]
pub struct QueryStatus {
    pub state: QueryState,
    pub state_change_reason: Option<String>,
}

/// Execution statistics reported by the service once a query completes.
///
/// All fields are optional; the service omits whichever it did not measure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryStatistics {
    pub engine_execution_time_ms: Option<i64>,
    pub total_execution_time_ms: Option<i64>,
    pub query_queue_time_ms: Option<i64>,
    pub query_planning_time_ms: Option<i64>,
    pub service_processing_time_ms: Option<i64>,
    pub data_scanned_bytes: Option<i64>,
}

/// Everything the service reports about one query execution.
#[derive(Debug, Clone, Serialize)]
pub struct QueryExecutionInfo {
    pub execution_id: String,
    pub status: QueryStatus,
    /// Storage URI where the result file was (or will be) written.
    pub output_location: Option<String>,
    pub statistics: Option<QueryStatistics>,
}

/// Kind of a catalog table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TableKind {
    /// A regular table backed by files in object storage.
    External,
    /// A virtual view.
    View,
    /// Any other table type string the catalog may report.
    Other(String),
}

impl TableKind {
    /// Map the catalog's table-type string onto a kind.
    pub fn from_table_type(table_type: Option<&str>) -> Self {
        match table_type {
            Some("EXTERNAL_TABLE") => Self::External,
            Some("VIRTUAL_VIEW") => Self::View,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Other(String::new()),
        }
    }
}

/// One column of a table or result schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    pub name: String,
    /// Catalog type string, e.g. `varchar` or `bigint`. Empty when the
    /// catalog does not report one.
    pub data_type: String,
}

/// Catalog metadata for a single table or view.
#[derive(Debug, Clone, Serialize)]
pub struct TableDescription {
    pub name: String,
    pub kind: TableKind,
    pub columns: Vec<ColumnSchema>,
    pub partition_keys: Vec<ColumnSchema>,
}

impl TableDescription {
    /// Column names in catalog order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Partition key names in catalog order.
    pub fn partition_key_names(&self) -> Vec<&str> {
        self.partition_keys.iter().map(|c| c.name.as_str()).collect()
    }
}
