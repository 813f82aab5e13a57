//! Phone record CRUD operations.
//!
//! Provides the [`PhoneStore`] contract used by the lookup pipeline and its
//! SQLite implementation on [`CacheDb`], plus maintenance helpers.

use super::connection::CacheDb;
use crate::Error;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Sentinel for a caller name that could not be determined.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Sentinel for a spam score that could not be determined.
pub const NO_SPAM_DATA: &str = "No data";

/// Sentinel for an optional attribute the validation provider left out.
pub const NOT_AVAILABLE: &str = "N/A";

/// The aggregated result of one phone lookup.
///
/// Keyed by `number`, the trimmed input exactly as the user sent it. A record
/// is only ever written after the authoritative provider validated the number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PhoneRecord {
    pub number: String,
    pub display_number: String,
    pub name: String,
    pub country: String,
    pub carrier: String,
    pub line_type: String,
    pub spam_score: String,
    pub active: bool,
    pub last_checked: DateTime<Utc>,
}

impl PhoneRecord {
    /// Age of the record relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.last_checked
    }
}

/// Durable key-value store for phone records.
///
/// `get` is an exact match on the raw key. `put` replaces any existing
/// record for the key in a single atomic statement.
#[async_trait]
pub trait PhoneStore: Send + Sync {
    async fn get(&self, number: &str) -> Result<Option<PhoneRecord>, Error>;

    async fn put(&self, record: &PhoneRecord) -> Result<(), Error>;
}

/// Timestamps are stored with a fixed nanosecond width so text ordering
/// matches time ordering.
fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Rows written by older deployments carry a naive ISO-8601 timestamp with no
/// offset; those are read as UTC.
fn decode_timestamp(number: &str, raw: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .or_else(|e| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| naive.and_utc())
                .map_err(|_| e)
        })
        .map_err(|e| Error::CorruptRecord { number: number.to_string(), reason: format!("last_checked: {e}") })
}

fn encode_active(active: bool) -> &'static str {
    if active { "true" } else { "false" }
}

fn decode_active(number: &str, raw: &str) -> Result<bool, Error> {
    match raw {
        "true" | "True" | "1" => Ok(true),
        "false" | "False" | "0" => Ok(false),
        other => Err(Error::CorruptRecord { number: number.to_string(), reason: format!("active: {other:?}") }),
    }
}

/// Raw text columns as they sit on disk.
struct Row {
    number: String,
    display_number: Option<String>,
    name: Option<String>,
    country: Option<String>,
    carrier: Option<String>,
    line_type: Option<String>,
    spam_score: Option<String>,
    active: Option<String>,
    last_checked: Option<String>,
}

impl Row {
    fn into_record(self) -> Result<PhoneRecord, Error> {
        let active = decode_active(&self.number, self.active.as_deref().unwrap_or_default())?;
        let last_checked = decode_timestamp(&self.number, self.last_checked.as_deref().unwrap_or_default())?;
        let or_na = |v: Option<String>| v.unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Ok(PhoneRecord {
            display_number: self.display_number.unwrap_or_else(|| self.number.clone()),
            name: self.name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            country: or_na(self.country),
            carrier: or_na(self.carrier),
            line_type: or_na(self.line_type),
            spam_score: self.spam_score.unwrap_or_else(|| NO_SPAM_DATA.to_string()),
            active,
            last_checked,
            number: self.number,
        })
    }
}

impl CacheDb {
    /// Get a cached record by its exact number key.
    ///
    /// Returns None if the number was never stored.
    pub async fn get_record(&self, number: &str) -> Result<Option<PhoneRecord>, Error> {
        let number = number.to_string();
        let row = self
            .conn
            .call(move |conn| -> Result<Option<Row>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT number, display_number, name, country, carrier, line_type,
                        spam_score, active, last_checked
                    FROM phone_cache WHERE number = ?1",
                )?;

                let result = stmt.query_row(params![number], |row| {
                    Ok(Row {
                        number: row.get(0)?,
                        display_number: row.get(1)?,
                        name: row.get(2)?,
                        country: row.get(3)?,
                        carrier: row.get(4)?,
                        line_type: row.get(5)?,
                        spam_score: row.get(6)?,
                        active: row.get(7)?,
                        last_checked: row.get(8)?,
                    })
                });

                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        row.map(Row::into_record).transpose()
    }

    /// Insert or replace the record stored under `record.number`.
    ///
    /// Uses UPSERT semantics: the whole row is overwritten, nothing is merged
    /// with the previous values.
    pub async fn upsert_record(&self, record: &PhoneRecord) -> Result<(), Error> {
        let record = record.clone();
        let last_checked = encode_timestamp(&record.last_checked);
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO phone_cache (
                        number, display_number, name, country, carrier, line_type,
                        spam_score, active, last_checked
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    ON CONFLICT(number) DO UPDATE SET
                        display_number = excluded.display_number,
                        name = excluded.name,
                        country = excluded.country,
                        carrier = excluded.carrier,
                        line_type = excluded.line_type,
                        spam_score = excluded.spam_score,
                        active = excluded.active,
                        last_checked = excluded.last_checked",
                    params![
                        &record.number,
                        &record.display_number,
                        &record.name,
                        &record.country,
                        &record.carrier,
                        &record.line_type,
                        &record.spam_score,
                        encode_active(record.active),
                        &last_checked,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete the record for one number.
    ///
    /// Returns true if a record was removed.
    pub async fn delete_record(&self, number: &str) -> Result<bool, Error> {
        let number = number.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM phone_cache WHERE number = ?1", params![number])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete records last checked more than `max_age` ago.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_older_than(&self, max_age: chrono::Duration) -> Result<u64, Error> {
        let Some(cutoff) = Utc::now().checked_sub_signed(max_age) else {
            return Ok(0);
        };
        let cutoff = encode_timestamp(&cutoff);
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM phone_cache WHERE last_checked < ?1", params![cutoff])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of cached records.
    pub async fn count_records(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM phone_cache", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl PhoneStore for CacheDb {
    async fn get(&self, number: &str) -> Result<Option<PhoneRecord>, Error> {
        self.get_record(number).await
    }

    async fn put(&self, record: &PhoneRecord) -> Result<(), Error> {
        self.upsert_record(record).await
    }
}
