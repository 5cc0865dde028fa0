use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ids::RecordId;

/// Placeholder shown for empty text fields.
pub const EMPTY_FIELD: &str = "—";

/// One catalogued picture and its metadata.
///
/// Field names on the wire are camelCase and fixed; `imageDataUrl` is
/// accepted on input as an alias of `imageData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    #[serde(alias = "imageDataUrl")]
    pub image_data: String,
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_info: String,
    #[serde(default)]
    pub picture_title: String,
    #[serde(default)]
    pub picture_description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Record {
    pub fn display_title(&self) -> &str {
        if self.picture_title.is_empty() {
            "Untitled"
        } else {
            &self.picture_title
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// The five free-text fields searched by the text filter.
    pub fn searchable_fields(&self) -> [&str; 5] {
        [
            &self.business_name,
            &self.contact_name,
            &self.contact_info,
            &self.picture_title,
            &self.picture_description,
        ]
    }
}

/// Renders an empty string as [`EMPTY_FIELD`].
pub fn display_or_dash(value: &str) -> &str {
    if value.is_empty() { EMPTY_FIELD } else { value }
}

/// Split a comma-separated tag string: trim each piece, drop empties.
/// Order and duplicates are preserved.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}

pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Current time truncated to millisecond precision.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Raw user input for a record, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordInput {
    pub image_data: Option<String>,
    pub business_name: String,
    pub contact_name: String,
    pub contact_info: String,
    pub picture_title: String,
    pub picture_description: String,
    /// Comma-separated, as typed.
    pub tags: String,
}

/// The normalized set of fields an edit replaces atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditableFields {
    pub business_name: String,
    pub contact_name: String,
    pub contact_info: String,
    pub picture_title: String,
    pub picture_description: String,
    pub tags: Vec<String>,
}

impl EditableFields {
    pub fn apply_to(self, record: &mut Record) {
        record.business_name = self.business_name;
        record.contact_name = self.contact_name;
        record.contact_info = self.contact_info;
        record.picture_title = self.picture_title;
        record.picture_description = self.picture_description;
        record.tags = self.tags;
    }
}

impl RecordInput {
    /// Trimmed text fields and split tags.
    pub fn fields(&self) -> EditableFields {
        EditableFields {
            business_name: self.business_name.trim().to_string(),
            contact_name: self.contact_name.trim().to_string(),
            contact_info: self.contact_info.trim().to_string(),
            picture_title: self.picture_title.trim().to_string(),
            picture_description: self.picture_description.trim().to_string(),
            tags: split_tags(&self.tags),
        }
    }

    /// The image payload, if one was supplied and is non-blank.
    pub fn image(&self) -> Option<&str> {
        self.image_data
            .as_deref()
            .filter(|data| !data.trim().is_empty())
    }

    /// Build a new record. Fails with a validation error when no image was supplied.
    pub fn into_record(self, id: RecordId, created_at: DateTime<Utc>) -> Result<Record, CoreError> {
        let image_data = self
            .image()
            .map(ToString::to_string)
            .ok_or_else(|| CoreError::Validation("missing image".into()))?;
        let fields = self.fields();
        let mut record = Record {
            id,
            image_data,
            business_name: String::new(),
            contact_name: String::new(),
            contact_info: String::new(),
            picture_title: String::new(),
            picture_description: String::new(),
            tags: Vec::new(),
            created_at,
        };
        fields.apply_to(&mut record);
        Ok(record)
    }
}

/// A partial edit. `None` keeps the record's current value, the way a
/// cancelled prompt does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub business_name: Option<String>,
    pub contact_name: Option<String>,
    pub contact_info: Option<String>,
    pub picture_title: Option<String>,
    pub picture_description: Option<String>,
    /// Comma-separated, as typed.
    pub tags: Option<String>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge onto `record`, producing a full input for an update.
    pub fn apply_to(&self, record: &Record) -> RecordInput {
        fn pick(patch: &Option<String>, current: &str) -> String {
            patch.clone().unwrap_or_else(|| current.to_string())
        }

        RecordInput {
            image_data: None,
            business_name: pick(&self.business_name, &record.business_name),
            contact_name: pick(&self.contact_name, &record.contact_name),
            contact_info: pick(&self.contact_info, &record.contact_info),
            picture_title: pick(&self.picture_title, &record.picture_title),
            picture_description: pick(&self.picture_description, &record.picture_description),
            tags: self
                .tags
                .clone()
                .unwrap_or_else(|| join_tags(&record.tags)),
        }
    }
}

/// RFC 3339 timestamps with a `Z` suffix. Millisecond precision when the
/// value allows it, otherwise as many digits as needed to round-trip.
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(ts: &DateTime<Utc>) -> String {
        let precision = if ts.timestamp_subsec_nanos() % 1_000_000 == 0 {
            SecondsFormat::Millis
        } else {
            SecondsFormat::AutoSi
        };
        ts.to_rfc3339_opts(precision, true)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}
