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

//! Query result handling: storage locations and in-memory tables.
//!
//! The query service writes results as a CSV object (header row first) to
//! the configured output location. [`StorageLocation`] is the parsed
//! reference to that object; [`Table`] is the materialized row/column form.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// A parsed `s3://bucket/key` reference to a result object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageLocation {
    bucket: String,
    key: String,
}

impl StorageLocation {
    /// Parse a storage URI of the form `s3://bucket/key`.
    ///
    /// The key may be empty (a bucket-root prefix); the bucket may not.
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("s3://")
            .ok_or_else(|| Error::parse(format!("not an s3:// URI: {uri}")))?;

        let (bucket, key) = match rest.split_once('/') {
            Some((bucket, key)) => (bucket, key),
            None => (rest, ""),
        };

        if bucket.is_empty() {
            return Err(Error::parse(format!("missing bucket in URI: {uri}")));
        }

        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The full `s3://bucket/key` URI.
    pub fn uri(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.key.is_empty() {
            write!(f, "s3://{}", self.bucket)
        } else {
            write!(f, "s3://{}/{}", self.bucket, self.key)
        }
    }
}

/// An in-memory tabular query result: named columns and ordered string rows.
///
/// Values are kept as the strings the service wrote; interpreting them
/// against the table schema is left to the caller.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Parse a CSV result object into a table.
    ///
    /// The first record is the header. Every data row must have exactly as
    /// many fields as the header; ragged content is a parse error.
    pub fn from_csv(data: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(data);

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| Error::parse(format!("invalid result header: {e}")))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record =
                record.map_err(|e| Error::parse(format!("invalid result row: {e}")))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value at (row, column name), if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx)).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_storage_location_parse() {
        let loc = StorageLocation::parse("s3://results-bucket/prefix/abc123.csv").unwrap();
        assert_eq!(loc.bucket(), "results-bucket");
        assert_eq!(loc.key(), "prefix/abc123.csv");
        assert_eq!(loc.uri(), "s3://results-bucket/prefix/abc123.csv");
    }

    #[test]
    fn test_storage_location_parse_bucket_only() {
        let loc = StorageLocation::parse("s3://results-bucket").unwrap();
        assert_eq!(loc.bucket(), "results-bucket");
        assert_eq!(loc.key(), "");
        // Round-trips without growing a trailing slash.
        assert_eq!(loc.uri(), "s3://results-bucket");
    }

    #[test]
    fn test_storage_location_rejects_other_schemes() {
        assert!(StorageLocation::parse("https://example.com/x").is_err());
        assert!(StorageLocation::parse("results-bucket/key").is_err());
        assert!(StorageLocation::parse("s3:///no-bucket").is_err());
    }

    #[test]
    fn test_table_from_csv() {
        let data = b"id,name\n1,alice\n2,bob\n";
        let table = Table::from_csv(data).unwrap();
        assert_eq!(table.columns(), &["id".to_string(), "name".to_string()]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.value(1, "name"), Some("bob"));
    }

    #[test]
    fn test_table_from_csv_quoted_fields() {
        // Athena quotes fields containing commas.
        let data = b"id,note\n1,\"hello, world\"\n";
        let table = Table::from_csv(data).unwrap();
        assert_eq!(table.value(0, "note"), Some("hello, world"));
    }

    #[test]
    fn test_table_from_csv_header_only() {
        let table = Table::from_csv(b"id,name\n").unwrap();
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.num_columns(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_table_from_csv_ragged_row_is_parse_error() {
        let err = Table::from_csv(b"id,name\n1\n").unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_table_value_missing_column() {
        let table = Table::from_csv(b"id\n1\n").unwrap();
        assert_eq!(table.value(0, "name"), None);
        assert_eq!(table.column_index("id"), Some(0));
    }
}
