//! Query builder for weight records.
//!
//! # Example
//!
//! ```
//! use weigh_store::{RecordQuery, Store};
//! use time::macros::datetime;
//!
//! let store = Store::open_in_memory()?;
//!
//! // All sales of the first of January, newest first
//! let query = RecordQuery::new()
//!     .since(datetime!(2024-01-01 00:00 -3))
//!     .until(datetime!(2024-01-01 23:59:59.999999 -3));
//!
//! let records = store.list_records(&query)?;
//! assert!(records.is_empty());
//! # Ok::<(), weigh_store::Error>(())
//! ```

use time::OffsetDateTime;

use crate::store::{micros_ceil, micros_floor};

/// Fluent query builder for weight records.
///
/// Use this to construct queries for
/// [`Store::list_records`](crate::Store::list_records). Both bounds are
/// optional and inclusive; results are always ordered by timestamp
/// descending (newest first).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    /// Filter records at or after this time.
    pub since: Option<OffsetDateTime>,
    /// Filter records at or before this time.
    pub until: Option<OffsetDateTime>,
}

impl RecordQuery {
    /// Create a query matching every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter to records at or after this time.
    pub fn since(mut self, time: OffsetDateTime) -> Self {
        self.since = Some(time);
        self
    }

    /// Filter to records at or before this time.
    pub fn until(mut self, time: OffsetDateTime) -> Self {
        self.until = Some(time);
        self
    }

    /// Build the SQL WHERE clause and parameters.
    pub(crate) fn build_where(&self) -> (String, Vec<i64>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(since) = self.since {
            conditions.push("timestamp >= ?");
            params.push(micros_ceil(since));
        }

        if let Some(until) = self.until {
            conditions.push("timestamp <= ?");
            params.push(micros_floor(until));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let (where_clause, _) = self.build_where();

        format!(
            "SELECT id, weight, total_value, timestamp, utc_offset, printed \
             FROM weight_records {} ORDER BY timestamp DESC, id DESC",
            where_clause
        )
    }
}
