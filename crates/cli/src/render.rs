use stallbook_core::{
    Record,
    record::{display_or_dash, timestamp},
};

pub const EMPTY_MESSAGE: &str = "No items yet. Add a picture with `stallbook add --image <file>` to get started.";

/// Multi-line card for one record.
pub fn card(record: &Record) -> String {
    let mut out = format!(
        "{}  [{}]\n  created: {}\n  business: {}\n  contact name: {}\n  contact: {}\n",
        record.display_title(),
        record.id,
        timestamp::format(&record.created_at),
        display_or_dash(&record.business_name),
        display_or_dash(&record.contact_name),
        display_or_dash(&record.contact_info),
    );
    if !record.picture_description.is_empty() {
        out.push_str(&format!("  description: {}\n", record.picture_description));
    }
    if !record.tags.is_empty() {
        let tags: Vec<String> = record.tags.iter().map(|t| format!("#{t}")).collect();
        out.push_str(&format!("  tags: {}\n", tags.join(" ")));
    }
    out
}

pub fn cards(records: &[&Record]) -> String {
    if records.is_empty() {
        return format!("{EMPTY_MESSAGE}\n");
    }
    records
        .iter()
        .map(|record| card(record))
        .collect::<Vec<_>>()
        .join("\n")
}
