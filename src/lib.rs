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

//! Athena query client
//!
//! A typed client for Amazon Athena: list databases and tables, run a SQL
//! query and wait for its result location, or materialize the result into
//! an in-memory table.
//!
//! ## Overview
//!
//! The crate is a thin façade over the AWS SDK. Authentication, request
//! signing, transport, and the SDK's internal retries are all delegated;
//! what this crate adds is a typed surface, a bounded completion poll, and
//! CSV result materialization.
//!
//! - [`QueryClient`] - catalog listing and query execution
//! - [`ClientConfig`] - region, output location, polling and log settings
//! - [`Table`] / [`StorageLocation`] - the two result forms
//!
//! ## Example
//!
//! ```ignore
//! use athena_query::{ClientConfig, QueryClient};
//!
//! let config = ClientConfig::new("s3://my-results-bucket/athena/")
//!     .with_region("ap-southeast-2");
//! let client = QueryClient::connect(config).await?;
//!
//! for database in client.list_databases().await? {
//!     println!("{database}");
//! }
//!
//! let table = client
//!     .run_query_to_table("my_database", "SELECT day, count(*) c FROM events GROUP BY 1")
//!     .await?;
//! println!("{} rows", table.num_rows());
//! ```
//!
//! ## Configuration
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `output_location` | (required) | `s3://` URI for result objects |
//! | `region` | SDK chain | AWS region override |
//! | `catalog` | `AwsDataCatalog` | Data catalog name |
//! | `poll_interval` | 1s | Sleep between status polls |
//! | `poll_timeout` | 300s | Bound on total polling time |

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod query;
pub mod result;
pub mod types;

// Re-export main types
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use query::QueryClient;
pub use result::{StorageLocation, Table};
pub use types::{
    ColumnSchema, QueryExecutionInfo, QueryState, QueryStatistics, QueryStatus,
    TableDescription, TableKind,
};

// Re-export the backend seam for advanced users
pub use client::{AthenaClient, SdkClient};
