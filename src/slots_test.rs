use super::*;

fn record(n: usize) -> ImageRecord {
    ImageRecord {
        url: format!("https://utfs.io/f/key{n}"),
        key: format!("key{n}"),
        category: String::new(),
    }
}

fn full_map() -> SlotMap {
    let mut map = SlotMap::default();
    for (i, cat) in CATEGORIES.iter().enumerate() {
        map.insert(cat.name, record(i)).unwrap();
    }
    map
}

// =============================================================================
// completeness
// =============================================================================

#[test]
fn empty_map_is_not_complete() {
    let map = SlotMap::default();
    assert!(!map.is_complete());
    assert!(map.is_empty());
}

#[test]
fn eight_of_nine_is_not_complete() {
    let mut map = full_map();
    map.remove("Food");
    assert_eq!(map.len(), 8);
    assert!(!map.is_complete());
}

#[test]
fn nine_distinct_categories_is_complete() {
    let map = full_map();
    assert_eq!(map.len(), CATEGORY_COUNT);
    assert!(map.is_complete());
}

#[test]
fn repeated_inserts_into_one_category_never_complete() {
    let mut map = SlotMap::default();
    for i in 0..CATEGORY_COUNT {
        map.insert("Animal", record(i)).unwrap();
    }
    assert_eq!(map.len(), 1);
    assert!(!map.is_complete());
}

// =============================================================================
// insert / remove
// =============================================================================

#[test]
fn insert_rewrites_record_category_to_key() {
    let mut map = SlotMap::default();
    let mut r = record(0);
    r.category = "Food".into();
    map.insert("plant", r).unwrap();
    assert_eq!(map.get("Plant").unwrap().category, "Plant");
}

#[test]
fn insert_unknown_category_is_rejected() {
    let mut map = SlotMap::default();
    let err = map.insert("Weather", record(0)).unwrap_err();
    assert_eq!(err, SlotError::UnknownCategory("Weather".into()));
    assert!(map.is_empty());
}

#[test]
fn overwrite_in_full_map_touches_only_that_category() {
    let mut map = full_map();
    let before = map.clone();
    let displaced = map.insert("Season", record(99)).unwrap();
    assert_eq!(displaced.unwrap().key, "key4");
    for (cat, rec) in map.records() {
        if cat.name == "Season" {
            assert_eq!(rec.key, "key99");
        } else {
            assert_eq!(Some(rec), before.get(cat.name));
        }
    }
    assert!(map.is_complete());
}

#[test]
fn remove_absent_category_is_noop() {
    let mut map = SlotMap::default();
    map.insert("Animal", record(0)).unwrap();
    assert!(map.remove("Place").is_none());
    assert!(map.remove("NotACategory").is_none());
    assert_eq!(map.len(), 1);
}

#[test]
fn insert_then_remove_restores_other_categories() {
    let mut map = SlotMap::default();
    map.insert("Animal", record(0)).unwrap();
    map.insert("Drink", record(7)).unwrap();
    let before = map.clone();

    map.insert("Hobby", record(5)).unwrap();
    map.remove("Hobby");
    assert_eq!(map, before);
}

#[test]
fn clear_empties_every_slot() {
    let mut map = full_map();
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.entries().count(), CATEGORY_COUNT);
}

// =============================================================================
// assign_first_available
// =============================================================================

#[test]
fn assignment_is_positional_not_by_listed_category() {
    // Listing claims Food for the first record; it still lands in Animal.
    let mut listed = record(0);
    listed.category = "Food".into();
    let mut map = SlotMap::default();
    let placed = map.assign_first_available(vec![listed]);
    assert_eq!(placed, 1);
    assert_eq!(map.get("Animal").unwrap().key, "key0");
    assert!(map.get("Food").is_none());
}

#[test]
fn assignment_fills_gaps_in_registry_order() {
    let mut map = SlotMap::default();
    map.insert("Animal", record(0)).unwrap();
    map.insert("Plant", record(2)).unwrap();
    map.assign_first_available(vec![record(10), record(11)]);
    assert_eq!(map.get("Place").unwrap().key, "key10");
    assert_eq!(map.get("Character").unwrap().key, "key11");
}

#[test]
fn assignment_drops_records_beyond_empty_slots() {
    let mut map = SlotMap::default();
    let placed = map.assign_first_available((0..12).map(record));
    assert_eq!(placed, CATEGORY_COUNT);
    assert!(map.is_complete());
    assert_eq!(map.get("Food").unwrap().key, "key8");
    assert!(map.records().all(|(_, r)| r.key != "key9"));
}

#[test]
fn records_iterate_in_registry_order() {
    let mut map = SlotMap::default();
    map.insert("Food", record(8)).unwrap();
    map.insert("Animal", record(0)).unwrap();
    let names: Vec<_> = map.records().map(|(c, _)| c.name).collect();
    assert_eq!(names, vec!["Animal", "Food"]);
}
