use super::*;

fn colors() -> NameIndex<Color> {
    NameIndex::new([
        Color::new(8, "Blue"),
        Color::new(44, "Mallow"),
        Color::new(61, "Red"),
    ])
}

#[test]
fn resolve_by_id_then_name() {
    let index = colors();
    assert_eq!(index.resolve("44").unwrap().name, "Mallow");
    assert_eq!(index.resolve("mallow").unwrap().id, 44);
    assert_eq!(index.resolve("  RED ").unwrap().id, 61);
    assert!(index.resolve("Coconut").is_none());
    assert!(index.resolve("9").is_none());
}

#[test]
fn numeric_names_fall_back_to_name_lookup() {
    let index = NameIndex::new([Species::new(1, "Acara"), Species::new(2, "1999")]);
    assert_eq!(index.resolve("1").unwrap().name, "Acara");
    assert_eq!(index.resolve("1999").unwrap().id, 2);
}

#[test]
fn values_are_in_id_order() {
    let index = colors();
    let ids: Vec<u32> = index.values().map(|c| c.id).collect();
    assert_eq!(ids, vec![8, 44, 61]);
    assert_eq!(index.len(), 3);
    assert!(!index.is_empty());
    assert!(NameIndex::<Color>::default().is_empty());
}
