//! JSON and CSV encodings of a record list.
//!
//! JSON is a lossless round-trip format. CSV is export-only.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::error::CoreError;
use crate::record::{Record, timestamp};

pub const CSV_HEADERS: [&str; 8] = [
    "id",
    "createdAt",
    "businessName",
    "contactName",
    "contactInfo",
    "pictureTitle",
    "pictureDescription",
    "tags",
];

const CSV_TAG_SEPARATOR: &str = "; ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(CoreError::Format(format!("unknown export format: {s}"))),
        }
    }
}

/// `items-<ISO8601>.<ext>`, timestamp at millisecond precision.
pub fn export_filename(format: ExportFormat, now: DateTime<Utc>) -> String {
    format!(
        "items-{}.{}",
        now.to_rfc3339_opts(SecondsFormat::Millis, true),
        format.extension()
    )
}

/// Pretty-printed JSON array, two-space indent.
pub fn encode_json(records: &[Record]) -> Result<String, CoreError> {
    serde_json::to_string_pretty(records).map_err(|e| CoreError::Serialization(e.to_string()))
}

/// Parse `text` as a JSON array. Elements are not checked against the record
/// shape here; see [`records_from_values`].
pub fn decode_json(text: &str) -> Result<Vec<Value>, CoreError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| CoreError::Format(format!("failed to parse JSON: {e}")))?;
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(CoreError::Format("invalid JSON format: expected an array".into())),
    }
}

/// Check each element against the record shape and reject duplicate ids.
pub fn records_from_values(values: Vec<Value>) -> Result<Vec<Record>, CoreError> {
    let mut seen = HashSet::with_capacity(values.len());
    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        let record: Record = serde_json::from_value(value)
            .map_err(|e| CoreError::Format(format!("item {index}: {e}")))?;
        if !seen.insert(record.id.clone()) {
            return Err(CoreError::Format(format!("item {index}: duplicate id {}", record.id)));
        }
        records.push(record);
    }
    Ok(records)
}

/// [`decode_json`] followed by [`records_from_values`].
pub fn decode_records(text: &str) -> Result<Vec<Record>, CoreError> {
    records_from_values(decode_json(text)?)
}

/// Quote a field containing `"`, `,` or a newline, doubling inner quotes.
pub fn csv_escape(value: &str) -> String {
    if value.contains(['"', ',', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn encode_csv(records: &[Record]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    for record in records {
        let created_at = timestamp::format(&record.created_at);
        let tags = record.tags.join(CSV_TAG_SEPARATOR);
        let row = [
            record.id.as_str(),
            created_at.as_str(),
            record.business_name.as_str(),
            record.contact_name.as_str(),
            record.contact_info.as_str(),
            record.picture_title.as_str(),
            record.picture_description.as_str(),
            tags.as_str(),
        ]
        .map(csv_escape);
        lines.push(row.join(","));
    }
    lines.join("\n")
}
