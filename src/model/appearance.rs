use std::collections::HashSet;

use super::catalog::{Color, Species};
use super::layer::AppearanceLayer;
use super::zone::Zone;
use crate::pose::PetPose;

/// The renderable state of one species/color/pose.
#[derive(Clone, Debug)]
pub struct PetAppearance {
    /// DTI pet state id.
    pub id: u32,
    /// Species of the pet.
    pub species: Species,
    /// Color of the pet.
    pub color: Color,
    /// Pose this appearance depicts.
    pub pose: PetPose,
    /// Body id shared by every appearance of this species/color body shape.
    pub body_id: u32,
    /// Whether DTI marks this appearance as glitched.
    pub is_glitched: bool,
    /// Body layers, all [`super::LayerKind::Biology`].
    pub layers: Vec<AppearanceLayer>,
    /// Zones this appearance hides, for its own layers and for items.
    pub restricted_zones: Vec<Zone>,
}

impl PetAppearance {
    /// `species-color-POSE` label, e.g. `17-44-UNCONVERTED`.
    pub fn label(&self) -> String {
        format!("{}-{}-{}", self.species.id, self.color.id, self.pose)
    }

    /// Zones occupied by the pet's own layers.
    pub fn occupies(&self) -> HashSet<&Zone> {
        self.layers.iter().map(|l| &l.zone).collect()
    }
}

/// The renderable state of an item on one body.
#[derive(Clone, Debug)]
pub struct ItemAppearance {
    /// DTI appearance id, e.g. `item-81162-body-180`.
    pub id: String,
    /// Item layers, all [`super::LayerKind::Object`].
    pub layers: Vec<AppearanceLayer>,
    /// Zones this item hides and refuses to share.
    pub restricted_zones: Vec<Zone>,
}

impl ItemAppearance {
    /// Zones occupied by this item's layers.
    pub fn occupies(&self) -> HashSet<&Zone> {
        self.layers.iter().map(|l| &l.zone).collect()
    }

    /// Occupied zones plus restricted zones.
    pub fn claims(&self) -> HashSet<&Zone> {
        let mut zones = self.occupies();
        zones.extend(self.restricted_zones.iter());
        zones
    }
}
