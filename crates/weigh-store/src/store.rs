//! Main store implementation.

use std::path::Path;

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension};
use time::{Date, Duration, OffsetDateTime, UtcOffset};
use tracing::{debug, info};

use weigh_types::{DailyStats, WeightRecord};

use crate::error::{Error, Result};
use crate::queries::RecordQuery;
use crate::schema::{self, PRICE_PER_KG_KEY};

/// SQLite-based store for weigh station data.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }
}

/// Unix microseconds at or before `at`.
pub(crate) fn micros_floor(at: OffsetDateTime) -> i64 {
    at.unix_timestamp_nanos().div_euclid(1_000) as i64
}

/// Unix microseconds at or after `at`.
pub(crate) fn micros_ceil(at: OffsetDateTime) -> i64 {
    let nanos = at.unix_timestamp_nanos();
    (nanos.div_euclid(1_000) + i128::from(nanos.rem_euclid(1_000) != 0)) as i64
}

/// Rebuild a timestamp from stored microseconds and offset seconds.
fn from_micros(micros: i64, offset_seconds: i32) -> Result<OffsetDateTime> {
    let utc = OffsetDateTime::from_unix_timestamp_nanos(i128::from(micros) * 1_000)
        .map_err(|_| Error::InvalidTimestamp(micros.to_string()))?;
    let offset = UtcOffset::from_whole_seconds(offset_seconds)
        .map_err(|_| Error::InvalidTimestamp(format!("{micros} (offset {offset_seconds}s)")))?;
    Ok(utc.to_offset(offset))
}

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<WeightRecord> {
    let micros: i64 = row.get(3)?;
    let offset_seconds: i32 = row.get(4)?;
    let timestamp = from_micros(micros, offset_seconds)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, Box::new(e)))?;

    Ok(WeightRecord {
        id: Some(row.get(0)?),
        weight: row.get(1)?,
        total_value: row.get(2)?,
        timestamp,
        printed: row.get(5)?,
    })
}

// Weight record operations
impl Store {
    /// Insert a weight record.
    ///
    /// Returns the record with its assigned id. The returned timestamp is
    /// truncated to the stored microsecond precision.
    pub fn save_record(&self, record: &WeightRecord) -> Result<WeightRecord> {
        let micros = micros_floor(record.timestamp);
        let offset_seconds = record.timestamp.offset().whole_seconds();

        self.conn.execute(
            "INSERT INTO weight_records (weight, total_value, timestamp, utc_offset, printed)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                record.weight,
                record.total_value,
                micros,
                offset_seconds,
                record.printed,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Saved weight record {}", id);

        Ok(WeightRecord {
            id: Some(id),
            timestamp: from_micros(micros, offset_seconds)?,
            ..record.clone()
        })
    }

    /// List weight records matching the query, newest first.
    pub fn list_records(&self, query: &RecordQuery) -> Result<Vec<WeightRecord>> {
        let sql = query.build_sql();
        let (_, params) = query.build_where();

        debug!("Executing query: {}", sql);

        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(rusqlite::params_from_iter(params), record_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Count all weight records.
    pub fn count_records(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM weight_records", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Aggregate the records of one calendar day in the given offset.
    pub fn daily_stats(&self, day: Date, offset: UtcOffset) -> Result<DailyStats> {
        let start = day.midnight().assume_offset(offset);
        let end = start + Duration::DAY;

        let stats = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(total_value), 0.0), COALESCE(AVG(weight), 0.0)
             FROM weight_records WHERE timestamp >= ?1 AND timestamp < ?2",
            [micros_ceil(start), micros_ceil(end)],
            |row| {
                Ok(DailyStats {
                    today_count: row.get::<_, i64>(0)? as u64,
                    today_total: row.get(1)?,
                    avg_weight: row.get(2)?,
                })
            },
        )?;

        debug!(
            "Stats for {}: count={}, total={:.2}",
            day, stats.today_count, stats.today_total
        );
        Ok(stats)
    }

    /// Aggregate the records of the current calendar day in the given offset.
    pub fn today_stats(&self, offset: UtcOffset) -> Result<DailyStats> {
        let today = OffsetDateTime::now_utc().to_offset(offset).date();
        self.daily_stats(today, offset)
    }
}

// Config operations
impl Store {
    /// Get a raw config value.
    pub fn get_config(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM config WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Create or overwrite a config value.
    pub fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            [key, value],
        )?;
        debug!("Set config {} = {}", key, value);
        Ok(())
    }

    /// Get the price per kilogram.
    pub fn get_price(&self) -> Result<f64> {
        let value = self
            .get_config(PRICE_PER_KG_KEY)?
            .ok_or_else(|| Error::ConfigNotFound(PRICE_PER_KG_KEY.to_string()))?;

        value
            .trim()
            .parse()
            .map_err(|_| Error::InvalidConfigValue {
                key: PRICE_PER_KG_KEY.to_string(),
                value,
            })
    }

    /// Overwrite the price per kilogram.
    pub fn set_price(&self, price_per_kg: f64) -> Result<()> {
        self.set_config(PRICE_PER_KG_KEY, &price_per_kg.to_string())?;
        info!("Price per kg set to {}", price_per_kg);
        Ok(())
    }
}
