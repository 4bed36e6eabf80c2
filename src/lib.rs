//! Layer resolution and PNG compositing for Dress To Impress (DTI) pet customizations.
//!
//! The crate works on payloads the DTI GraphQL API already returned:
//!
//! - Decode the binary [`ValidityTable`] and answer species/color/pose legality
//! - Parse species, colors, pet appearances and items into the typed [`model`]
//! - Split worn items into worn and closeted sets with [`resolve`]
//! - Build the visible, depth-sorted layer stack with [`build_stack`]
//! - Fetch and composite that stack into a PNG with [`render`]
//!
//! Network access is injected through [`LayerFetcher`] and [`CatalogSource`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Species/color lookup indices keyed by id or name.
pub mod lookup;
/// Typed DTI data model.
pub mod model;
/// Composed pet customization.
pub mod neopet;
/// Outfit resolution: conflicts and layer stacks.
pub mod outfit;
/// JSON payload shapes and their parsers.
pub mod payload;
/// Pet poses and validity bit fields.
pub mod pose;
/// Layer fetching and PNG compositing.
pub mod render;
/// TTL'd species/color/validity cache.
pub mod state;
/// Binary species/color validity table.
pub mod validity;

pub use crate::foundation::error::{DtiError, DtiResult};

pub use crate::lookup::NameIndex;
pub use crate::model::{
    AppearanceLayer, Color, Item, ItemAppearance, ItemKind, KnownGlitch, LayerImageSize,
    LayerKind, PetAppearance, Species, Zone,
};
pub use crate::neopet::Neopet;
pub use crate::outfit::conflict::{Resolution, resolve};
pub use crate::outfit::stack::{build_stack, build_stack_for_items};
pub use crate::pose::{BitField, PetPose, closest_poses};
pub use crate::render::fetch::{DirFetcher, LayerFetcher, MemoryFetcher};
pub use crate::render::renderer::{RenderContext, RenderOpts, compose_png, render, render_to};
pub use crate::state::{CacheConfig, Catalog, CatalogSource, StateCache};
pub use crate::validity::ValidityTable;
