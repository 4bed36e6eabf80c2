mod appearance;
mod catalog;
mod item;
mod layer;
mod size;
mod zone;

pub use appearance::{ItemAppearance, PetAppearance};
pub use catalog::{Color, Species};
pub use item::{Item, ItemKind};
pub use layer::{AppearanceLayer, KnownGlitch, LayerKind};
pub use size::LayerImageSize;
pub use zone::Zone;
