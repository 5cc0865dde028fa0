use stallbook_core::{RecordInput, image};

/// Smallest valid PNG header bytes; enough for an inline payload.
pub const TINY_PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

pub fn sample_image() -> String {
    image::to_inline_encoding(TINY_PNG, "image/png")
}

/// Input with an image, a business name and raw comma-separated tags.
pub fn item(business: &str, tags: &str) -> RecordInput {
    RecordInput {
        image_data: Some(sample_image()),
        business_name: business.to_string(),
        tags: tags.to_string(),
        ..Default::default()
    }
}

/// Input with every text field populated.
pub fn full_item(
    business: &str,
    contact_name: &str,
    contact_info: &str,
    title: &str,
    description: &str,
    tags: &str,
) -> RecordInput {
    RecordInput {
        image_data: Some(sample_image()),
        business_name: business.to_string(),
        contact_name: contact_name.to_string(),
        contact_info: contact_info.to_string(),
        picture_title: title.to_string(),
        picture_description: description.to_string(),
        tags: tags.to_string(),
    }
}
