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

//! Client abstraction over the vendor query service.
//!
//! This module provides:
//! - `AthenaClient` trait: abstract interface over the query-service and
//!   object-storage backends
//! - `SdkClient`: implementation delegating to the AWS SDK
//!
//! The trait exists so the query façade can be exercised against a scripted
//! backend in tests; production code always goes through [`SdkClient`].

pub mod sdk;

use crate::error::Result;
use crate::result::StorageLocation;
use crate::types::{QueryExecutionInfo, TableDescription};
use async_trait::async_trait;

pub use sdk::SdkClient;

/// Abstract interface over the vendor's query service and object storage.
///
/// Implementations handle transport, authentication, and pagination. Every
/// method is a single logical service call; polling loops and result
/// materialization live in [`QueryClient`](crate::query::QueryClient).
#[async_trait]
pub trait AthenaClient: Send + Sync + std::fmt::Debug {
    // --- Query execution ---

    /// Submit a query against the given database. Returns the execution id.
    async fn submit_query(&self, database: &str, sql: &str) -> Result<String>;

    /// Fetch the current state of a query execution.
    async fn query_execution(&self, execution_id: &str) -> Result<QueryExecutionInfo>;

    // --- Catalog metadata ---

    /// List all database names in the catalog.
    async fn list_databases(&self) -> Result<Vec<String>>;

    /// List metadata for every table and view in a database.
    ///
    /// Fails with `NotFound` when the database is absent from the catalog.
    async fn list_table_metadata(&self, database: &str) -> Result<Vec<TableDescription>>;

    /// Fetch metadata for a single table or view.
    async fn table_metadata(&self, database: &str, table: &str) -> Result<TableDescription>;

    // --- Result retrieval ---

    /// Download a result object from storage.
    async fn fetch_object(&self, location: &StorageLocation) -> Result<Vec<u8>>;
}
