use std::collections::BTreeSet;

use super::*;
use crate::model::{AppearanceLayer, ItemAppearance, ItemKind, LayerKind, Zone};

fn zone(id: u32) -> Zone {
    Zone::new(id, id as i32, format!("zone {id}"))
}

fn item(id: u32, occupies: &[u32], restricts: &[u32]) -> Item {
    Item {
        id,
        name: format!("item {id}"),
        description: String::new(),
        thumbnail_url: String::new(),
        kind: ItemKind::Np,
        rarity: 0,
        appearance: Some(ItemAppearance {
            id: format!("item-{id}-body-0"),
            layers: occupies
                .iter()
                .map(|z| AppearanceLayer {
                    id: id * 100 + z,
                    zone: zone(*z),
                    image_url: Some(format!("https://example.test/{id}/{z}.png")),
                    asset_remote_id: id * 100 + z,
                    body_id: 0,
                    kind: LayerKind::Object,
                    known_glitches: BTreeSet::new(),
                })
                .collect(),
            restricted_zones: restricts.iter().map(|z| zone(*z)).collect(),
        }),
    }
}

fn ids(items: &[Item]) -> Vec<u32> {
    items.iter().map(|i| i.id).collect()
}

#[test]
fn conflict_free_input_is_unchanged() {
    let items = vec![item(1, &[10], &[]), item(2, &[20], &[30]), item(3, &[40, 41], &[])];
    let res = resolve(&items);
    assert_eq!(res.worn, items);
    assert!(res.closeted.is_empty());
}

#[test]
fn later_item_evicts_earlier_on_shared_zone() {
    let items = vec![item(1, &[10], &[]), item(2, &[10], &[])];
    let res = resolve(&items);
    assert_eq!(ids(&res.worn), vec![2]);
    assert_eq!(ids(&res.closeted), vec![1]);
}

#[test]
fn restriction_conflicts_in_both_directions() {
    // 2 restricts the zone 1 occupies.
    let res = resolve(&[item(1, &[10], &[]), item(2, &[20], &[10])]);
    assert_eq!(ids(&res.worn), vec![2]);
    assert_eq!(ids(&res.closeted), vec![1]);

    // 1 restricts the zone 2 occupies.
    let res = resolve(&[item(1, &[10], &[20]), item(2, &[20], &[])]);
    assert_eq!(ids(&res.worn), vec![2]);
    assert_eq!(ids(&res.closeted), vec![1]);
}

#[test]
fn shared_restrictions_alone_do_not_conflict() {
    let res = resolve(&[item(1, &[10], &[30]), item(2, &[20], &[30])]);
    assert_eq!(ids(&res.worn), vec![1, 2]);
    assert!(res.closeted.is_empty());
}

#[test]
fn one_item_can_evict_several() {
    let items = vec![
        item(1, &[10], &[]),
        item(2, &[50], &[]),
        item(3, &[20], &[]),
        item(4, &[10, 20], &[]),
    ];
    let res = resolve(&items);
    assert_eq!(ids(&res.worn), vec![2, 4]);
    assert_eq!(ids(&res.closeted), vec![1, 3]);
}

#[test]
fn items_without_appearance_are_excluded() {
    let mut ghost = item(9, &[10], &[]);
    ghost.appearance = None;
    let items = vec![item(1, &[10], &[]), ghost, item(2, &[20], &[])];
    let res = resolve(&items);
    assert_eq!(ids(&res.worn), vec![1, 2]);
    assert!(res.closeted.is_empty());
}

#[test]
fn never_loses_items() {
    let items: Vec<Item> = (1..=12)
        .map(|i| item(i, &[i % 4, 10 + i % 3], &[20 + i % 5]))
        .collect();
    let res = resolve(&items);
    assert_eq!(res.worn.len() + res.closeted.len(), items.len());
    let again = resolve(&res.worn);
    assert_eq!(again.worn, res.worn);
    assert!(again.closeted.is_empty());
}
