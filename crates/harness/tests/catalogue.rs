use std::collections::HashSet;

use stallbook_core::{RecordId, RecordInput, RecordPatch, TagFilter, ViewQuery};
use stallbook_engine::{Catalogue, EngineError};
use stallbook_harness::{
    FaultyStorage, TestCatalogue,
    fixtures::{full_item, item, sample_image},
};

// ============================================================================
// Add
// ============================================================================

#[test]
fn add_then_remove_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestCatalogue::new()?;
    let record = t.add(item("Tacos El Gallo", "tacos, beef"))?;

    assert_eq!(t.catalogue.len(), 1);
    assert_eq!(record.tags, vec!["tacos", "beef"]);
    assert_eq!(t.catalogue.distinct_tags(), vec!["beef", "tacos"]);
    assert_eq!(t.persisted()?, t.catalogue.list());

    assert!(t.catalogue.remove(&record.id)?);
    assert!(t.catalogue.is_empty());
    assert!(t.persisted()?.is_empty());

    Ok(())
}

#[test]
fn add_without_image_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestCatalogue::new()?;
    t.add(item("Existing", ""))?;

    let result = t.add(RecordInput {
        business_name: "X".into(),
        ..Default::default()
    });
    assert!(matches!(result, Err(EngineError::Validation(_))));
    assert_eq!(t.catalogue.len(), 1);
    assert_eq!(t.persisted()?.len(), 1);

    Ok(())
}

#[test]
fn add_prepends_newest_first() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestCatalogue::new()?;
    t.add(item("First", ""))?;
    t.add(item("Second", ""))?;
    t.add(item("Third", ""))?;

    let names: Vec<&str> = t
        .catalogue
        .list()
        .iter()
        .map(|r| r.business_name.as_str())
        .collect();
    assert_eq!(names, vec!["Third", "Second", "First"]);

    Ok(())
}

#[test]
fn add_trims_and_keeps_duplicate_tags() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestCatalogue::new()?;
    let record = t.add(full_item(
        "  Pho Real ",
        " Ana ",
        " ana@pho.example ",
        " Bowl ",
        "  hot  ",
        "soup,, soup , spicy",
    ))?;

    assert_eq!(record.business_name, "Pho Real");
    assert_eq!(record.contact_name, "Ana");
    assert_eq!(record.contact_info, "ana@pho.example");
    assert_eq!(record.picture_title, "Bowl");
    assert_eq!(record.picture_description, "hot");
    assert_eq!(record.tags, vec!["soup", "soup", "spicy"]);
    assert_eq!(t.catalogue.distinct_tags(), vec!["soup", "spicy"]);

    Ok(())
}

#[test]
fn ids_are_unique_across_many_adds() -> Result<(), Box<dyn std::error::Error>> {
    let (storage, _switch) = FaultyStorage::new()?;
    let mut catalogue = Catalogue::open(storage)?;
    for n in 0..200 {
        catalogue.add(item(&format!("Stall {n}"), ""))?;
    }

    let ids: HashSet<&RecordId> = catalogue.list().iter().map(|r| &r.id).collect();
    assert_eq!(ids.len(), 200);

    Ok(())
}

// ============================================================================
// Update
// ============================================================================

#[test]
fn update_replaces_editable_fields_only() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestCatalogue::new()?;
    let original = t.add(full_item("Old", "A", "a@x", "T", "D", "one, two"))?;

    let updated = t.catalogue.update(
        &original.id,
        RecordInput {
            business_name: " New ".into(),
            tags: "three".into(),
            ..Default::default()
        },
    )?;

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.image_data, original.image_data);
    assert_eq!(updated.business_name, "New");
    assert_eq!(updated.contact_name, "");
    assert_eq!(updated.picture_title, "");
    assert_eq!(updated.tags, vec!["three"]);
    assert_eq!(t.persisted()?[0], updated);

    Ok(())
}

#[test]
fn update_can_swap_image() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestCatalogue::new()?;
    let original = t.add(item("Biz", ""))?;

    let updated = t.catalogue.update(
        &original.id,
        RecordInput {
            image_data: Some("data:image/gif;base64,R0lG".into()),
            business_name: "Biz".into(),
            ..Default::default()
        },
    )?;
    assert_eq!(updated.image_data, "data:image/gif;base64,R0lG");

    Ok(())
}

#[test]
fn update_unknown_id_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestCatalogue::new()?;
    t.add(item("Biz", ""))?;
    let before = t.catalogue.list().to_vec();

    let result = t.catalogue.update(&RecordId::from("missing"), item("Other", ""));
    assert!(matches!(result, Err(EngineError::NotFound(_))));
    assert_eq!(t.catalogue.list(), before.as_slice());

    Ok(())
}

#[test]
fn edit_with_patch_keeps_cancelled_fields() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestCatalogue::new()?;
    let original = t.add(full_item("Biz", "Maria", "555", "Tacos", "Good", "a, b"))?;

    let patch = RecordPatch {
        picture_title: Some("Birria".into()),
        tags: Some("c, a".into()),
        ..Default::default()
    };
    let edited = t.catalogue.edit(&original.id, &patch)?;

    assert_eq!(edited.business_name, "Biz");
    assert_eq!(edited.contact_name, "Maria");
    assert_eq!(edited.contact_info, "555");
    assert_eq!(edited.picture_title, "Birria");
    assert_eq!(edited.picture_description, "Good");
    assert_eq!(edited.tags, vec!["c", "a"]);

    Ok(())
}

#[test]
fn edit_keeps_position_in_list() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestCatalogue::new()?;
    let older = t.add(item("Older", ""))?;
    t.add(item("Newer", ""))?;

    t.catalogue.edit(
        &older.id,
        &RecordPatch {
            business_name: Some("Older, edited".into()),
            ..Default::default()
        },
    )?;
    assert_eq!(t.catalogue.list()[1].business_name, "Older, edited");

    Ok(())
}

// ============================================================================
// Remove
// ============================================================================

#[test]
fn remove_unknown_id_is_noop() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestCatalogue::new()?;
    t.add(item("Keep", ""))?;

    assert!(!t.catalogue.remove(&RecordId::from("nope"))?);
    assert_eq!(t.catalogue.len(), 1);

    Ok(())
}

#[test]
fn remove_unknown_id_does_not_write() -> Result<(), Box<dyn std::error::Error>> {
    let (storage, switch) = FaultyStorage::new()?;
    let mut catalogue = Catalogue::open(storage)?;
    catalogue.add(item("Keep", ""))?;

    switch.fail_writes(true);
    assert!(!catalogue.remove(&RecordId::from("nope"))?);

    Ok(())
}

// ============================================================================
// Failed writes leave no partial state
// ============================================================================

#[test]
fn failed_write_keeps_memory_unchanged() -> Result<(), Box<dyn std::error::Error>> {
    let (storage, switch) = FaultyStorage::new()?;
    let mut catalogue = Catalogue::open(storage)?;
    let kept = catalogue.add(item("Kept", "x"))?;

    switch.fail_writes(true);
    assert!(matches!(catalogue.add(item("Lost", "")), Err(EngineError::Storage(_))));
    assert!(catalogue.update(&kept.id, item("Changed", "")).is_err());
    assert!(catalogue.remove(&kept.id).is_err());
    assert!(catalogue.import_json("[]").is_err());

    assert_eq!(catalogue.list(), &[kept.clone()]);
    assert_eq!(catalogue.store().load()?, vec![kept]);

    switch.fail_writes(false);
    catalogue.add(item("Later", ""))?;
    assert_eq!(catalogue.len(), 2);

    Ok(())
}

// ============================================================================
// Views
// ============================================================================

#[test]
fn view_combines_text_and_tag_filters() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestCatalogue::new()?;
    t.add(full_item("Tacos El Gallo", "Maria Lopez", "", "Birria", "", "tacos, beef"))?;
    t.add(full_item("Pho Real", "Ana", "", "Bowl", "spicy broth", "soup, spicy"))?;
    t.add(full_item("Green Cart", "Sam", "", "", "", "vegan, spicy"))?;

    let all = t.catalogue.view(&ViewQuery::default());
    assert_eq!(all.len(), 3);

    let spicy = t.catalogue.view(&ViewQuery::new("", TagFilter::parse("spicy")));
    let names: Vec<&str> = spicy.iter().map(|r| r.business_name.as_str()).collect();
    assert_eq!(names, vec!["Green Cart", "Pho Real"]);

    let broth = t.catalogue.view(&ViewQuery::new("BROTH", TagFilter::parse("spicy")));
    assert_eq!(broth.len(), 1);
    assert_eq!(broth[0].business_name, "Pho Real");

    let none = t.catalogue.view(&ViewQuery::new("maria", TagFilter::parse("vegan")));
    assert!(none.is_empty());

    Ok(())
}

#[test]
fn distinct_tags_follow_mutations() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestCatalogue::new()?;
    let a = t.add(item("A", "zeta, alpha"))?;
    t.add(item("B", "alpha, mid"))?;
    assert_eq!(t.catalogue.distinct_tags(), vec!["alpha", "mid", "zeta"]);

    t.catalogue.remove(&a.id)?;
    assert_eq!(t.catalogue.distinct_tags(), vec!["alpha", "mid"]);

    Ok(())
}

#[test]
fn image_is_stored_verbatim() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestCatalogue::new()?;
    let record = t.add(item("Biz", ""))?;
    assert_eq!(record.image_data, sample_image());
    assert!(record.image_data.starts_with("data:image/png;base64,"));

    Ok(())
}
