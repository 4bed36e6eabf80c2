use std::collections::HashSet;

use crate::foundation::error::{DtiError, DtiResult};
use crate::model::{AppearanceLayer, Item, LayerKind, PetAppearance, Zone};
use crate::outfit::conflict::resolve;
use crate::pose::PetPose;

/// Build the visible layer stack, bottom to top, for `pet` wearing `worn`.
///
/// `worn` must already be conflict-free (see [`resolve`]). Filtering rules:
///
/// - a body layer in a zone restricted by any worn item is hidden;
/// - a body-specific item layer (`body_id != 0`) is hidden on unconverted pets and in zones the
///   pet occupies or restricts;
/// - a body layer in a zone the pet restricts itself is hidden.
///
/// Survivors are stably sorted by zone depth, so ties keep pet layers first and then items in
/// worn order. A surviving layer without an image URL fails the whole stack with
/// [`DtiError::NullAssetImage`].
#[tracing::instrument(skip_all, fields(pet = %pet.label(), worn = worn.len()))]
pub fn build_stack(pet: &PetAppearance, worn: &[Item]) -> DtiResult<Vec<AppearanceLayer>> {
    let worn_appearances: Vec<_> = worn.iter().filter_map(|i| i.appearance.as_ref()).collect();

    let item_restricted: HashSet<&Zone> = worn_appearances
        .iter()
        .flat_map(|a| a.restricted_zones.iter())
        .collect();
    let pet_restricted: HashSet<&Zone> = pet.restricted_zones.iter().collect();
    let mut pet_occupied_and_restricted = pet.occupies();
    pet_occupied_and_restricted.extend(pet_restricted.iter().copied());

    let unconverted = pet.pose == PetPose::Unconverted;

    let candidates = pet
        .layers
        .iter()
        .chain(worn_appearances.iter().flat_map(|a| a.layers.iter()));

    let mut visible: Vec<AppearanceLayer> = candidates
        .filter(|layer| match layer.kind {
            LayerKind::Biology => {
                !item_restricted.contains(&layer.zone) && !pet_restricted.contains(&layer.zone)
            }
            LayerKind::Object => {
                !(layer.is_body_specific()
                    && (unconverted || pet_occupied_and_restricted.contains(&layer.zone)))
            }
        })
        .cloned()
        .collect();

    visible.sort_by_key(|layer| layer.zone.depth);

    let missing: Vec<String> = visible
        .iter()
        .filter(|layer| layer.image_url.is_none())
        .map(AppearanceLayer::describe)
        .collect();
    if !missing.is_empty() {
        tracing::warn!(layers = ?missing, "visible layers have no image url");
        return Err(DtiError::NullAssetImage { layers: missing });
    }

    tracing::debug!(layers = visible.len(), "built layer stack");
    Ok(visible)
}

/// Resolve item conflicts, then build the stack from the worn partition.
pub fn build_stack_for_items(
    pet: &PetAppearance,
    items: &[Item],
) -> DtiResult<Vec<AppearanceLayer>> {
    let resolution = resolve(items);
    build_stack(pet, &resolution.worn)
}

#[cfg(test)]
#[path = "../../tests/unit/outfit/stack.rs"]
mod tests;
