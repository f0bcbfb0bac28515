use chrono::{DateTime, NaiveDateTime, ParseError, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{TimeMapError, TimeMapResult};

/// Candidate keys that may hold the record array when the payload is an object
const RECORD_KEYS: &[&str] = &["timeline", "tweets", "statuses", "data", "records"];

/// Custom deserializer that accepts either string or integer record IDs
fn deserialize_record_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        String(String),
        Int(i64),
    }

    match StringOrInt::deserialize(deserializer)? {
        StringOrInt::String(s) => s.trim().parse::<i64>().map_err(D::Error::custom),
        StringOrInt::Int(i) => Ok(i),
    }
}

/// One timeline entry as delivered by the retrieval collaborator.
///
/// Only the identifier and the creation timestamp are read; any other fields
/// in the payload are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRecord {
    #[serde(deserialize_with = "deserialize_record_id")]
    pub id: i64,
    pub created_at: String,
}

impl TimelineRecord {
    pub fn new(id: i64, created_at: impl Into<String>) -> Self {
        Self {
            id,
            created_at: created_at.into(),
        }
    }
}

/// Parse a single timestamp string with the given chrono format.
///
/// Formats carrying an offset (`%z`) are converted to UTC; formats without
/// one are interpreted as UTC wall-clock time.
pub fn parse_timestamp(value: &str, format: &str) -> Result<DateTime<Utc>, ParseError> {
    let value = value.trim();
    match DateTime::parse_from_str(value, format) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(offset_err) => NaiveDateTime::parse_from_str(value, format)
            .map(|naive| naive.and_utc())
            .map_err(|_| offset_err),
    }
}

/// Parse every record's timestamp, preserving record order.
///
/// The first unparseable record aborts the whole batch; records are never
/// skipped.
pub fn parse_record_timestamps(
    records: &[TimelineRecord],
    format: &str,
) -> TimeMapResult<Vec<DateTime<Utc>>> {
    records
        .iter()
        .map(|record| {
            parse_timestamp(&record.created_at, format).map_err(|e| {
                TimeMapError::InvalidTimestamp {
                    record_id: record.id,
                    value: record.created_at.clone(),
                    reason: e.to_string(),
                }
            })
        })
        .collect()
}

/// Parse timeline records from a JSON string.
///
/// Accepts either a bare array of records or an object wrapping the array
/// under one of the usual keys.
pub fn parse_timeline_json_str(json_str: &str) -> TimeMapResult<Vec<TimelineRecord>> {
    let payload: Value = serde_json::from_str(json_str)?;

    let raw_records = find_records_array(&payload).ok_or_else(|| {
        TimeMapError::Parse("Could not find a timeline record array in JSON".to_string())
    })?;

    let records = raw_records
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            TimelineRecord::deserialize(value)
                .map_err(|e| TimeMapError::Parse(format!("Invalid record at index {}: {}", idx, e)))
        })
        .collect::<TimeMapResult<Vec<_>>>()?;

    log::debug!("Parsed {} timeline records", records.len());
    Ok(records)
}

/// Find the array of records in the JSON payload
fn find_records_array(payload: &Value) -> Option<&Vec<Value>> {
    if let Some(arr) = payload.as_array() {
        return Some(arr);
    }

    let obj = payload.as_object()?;
    for key in RECORD_KEYS {
        if let Some(arr) = obj.get(*key).and_then(Value::as_array) {
            return Some(arr);
        }
    }

    None
}
