//! Derived views over a record list. Nothing here is stored; every view is
//! recomputed from the current records.

use std::collections::BTreeSet;

use crate::record::Record;

/// Sentinel accepted by [`TagFilter::parse`] for "no tag filter".
pub const ALL_TAGS: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagFilter {
    #[default]
    All,
    Tag(String),
}

impl TagFilter {
    pub fn parse(s: &str) -> Self {
        if s == ALL_TAGS {
            Self::All
        } else {
            Self::Tag(s.to_string())
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::All => true,
            Self::Tag(tag) => record.has_tag(tag),
        }
    }
}

/// Search text plus tag filter. `ViewQuery::default()` is the reset state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub text: String,
    pub tag: TagFilter,
}

impl ViewQuery {
    pub fn new(text: impl Into<String>, tag: TagFilter) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        matches_text(record, &self.text.to_lowercase()) && self.tag.matches(record)
    }
}

/// `needle` must already be lowercased.
fn matches_text(record: &Record, needle: &str) -> bool {
    needle.is_empty()
        || record
            .searchable_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

/// Records passing both the text and the tag filter, in catalogue order.
pub fn filter_records<'a>(records: &'a [Record], query: &ViewQuery) -> Vec<&'a Record> {
    let needle = query.text.to_lowercase();
    records
        .iter()
        .filter(|record| matches_text(record, &needle) && query.tag.matches(record))
        .collect()
}

/// Every tag in use, deduplicated and sorted.
pub fn distinct_tags(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| record.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
