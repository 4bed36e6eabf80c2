use crate::foundation::error::{DtiError, DtiResult};
use crate::model::{AppearanceLayer, Color, Item, LayerImageSize, PetAppearance, Species};
use crate::outfit::conflict::{Resolution, resolve};
use crate::outfit::stack::build_stack;
use crate::payload::{Assets, AssetsPayload};
use crate::pose::{BitField, PetPose};
use crate::render::fetch::LayerFetcher;
use crate::render::renderer::{RenderContext, RenderOpts, render};
use crate::state::StateCache;

/// A customized pet: species, color, preferred pose, the appearances DTI knows for it, and the
/// items it wears.
#[derive(Clone, Debug)]
pub struct Neopet {
    /// Species.
    pub species: Species,
    /// Color.
    pub color: Color,
    /// Preferred pose.
    pub pose: PetPose,
    /// One appearance per modelled pose.
    pub appearances: Vec<PetAppearance>,
    /// Items in the order they were put on.
    pub items: Vec<Item>,
    /// Default render size.
    pub size: LayerImageSize,
    /// Pet name, when the customization came from a named pet.
    pub name: Option<String>,
    valid_poses: BitField,
}

impl Neopet {
    /// Assemble a pet from already-resolved parts. Wears nothing; see [`Neopet::with_items`].
    pub fn new(
        species: Species,
        color: Color,
        valid_poses: BitField,
        pose: PetPose,
        appearances: Vec<PetAppearance>,
    ) -> Self {
        Self {
            species,
            color,
            pose,
            appearances,
            items: Vec::new(),
            size: LayerImageSize::default(),
            name: None,
            valid_poses,
        }
    }

    /// Replace the worn items.
    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    /// Set the default render size.
    pub fn with_size(mut self, size: LayerImageSize) -> Self {
        self.size = size;
        self
    }

    /// Set the pet name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Build a pet from an assets query result.
    ///
    /// `species` and `color` are ids or names resolved through `state`. Fails with
    /// [`DtiError::InvalidSpeciesColorPair`] when the pair has no legal pose.
    #[tracing::instrument(skip(state, payload))]
    pub async fn from_assets(
        state: &StateCache,
        species: &str,
        color: &str,
        payload: AssetsPayload,
        pose: PetPose,
        size: LayerImageSize,
    ) -> DtiResult<Self> {
        let species = state.species(species).await?;
        let color = state.color(color).await?;

        let mask = state.mask(species.id, color.id).await?;
        if mask.is_empty() {
            return Err(DtiError::invalid_pair(format!(
                "the {species} species does not have the color {color}"
            )));
        }

        let assets = Assets::try_from(payload)?;
        tracing::debug!(
            appearances = assets.pet_appearances.len(),
            items = assets.items.len(),
            "parsed assets"
        );

        Ok(Self::new(species, color, mask, pose, assets.pet_appearances)
            .with_items(assets.items)
            .with_size(size))
    }

    /// Legal poses for this species/color.
    pub fn valid_pose_mask(&self) -> BitField {
        self.valid_poses
    }

    /// Whether `pose` is legal for this species/color.
    pub fn check(&self, pose: PetPose) -> bool {
        self.valid_poses.check(pose)
    }

    /// Legal poses ordered by closeness to `pose`, or to the preferred pose.
    pub fn valid_poses(&self, pose: Option<PetPose>) -> Vec<PetPose> {
        self.valid_poses.fallbacks(pose.unwrap_or(self.pose))
    }

    /// Appearance data for exactly `pose`.
    pub fn appearance_for(&self, pose: PetPose) -> Option<&PetAppearance> {
        self.appearances.iter().find(|a| a.pose == pose)
    }

    /// The closest legal pose to `pose` (or the preferred pose) that has appearance data.
    pub fn pick_appearance(&self, pose: Option<PetPose>) -> DtiResult<&PetAppearance> {
        let wanted = pose.unwrap_or(self.pose);
        let found = self
            .valid_poses(Some(wanted))
            .into_iter()
            .find_map(|p| self.appearance_for(p));
        match found {
            Some(appearance) => {
                if appearance.pose != wanted {
                    tracing::debug!(wanted = %wanted, using = %appearance.pose, "falling back to closest pose");
                }
                Ok(appearance)
            }
            None => Err(DtiError::missing_appearance(format!(
                "{}-{}-{wanted} has no appearance in any legal pose",
                self.species.id, self.color.id
            ))),
        }
    }

    /// Worn and closeted partition of the items.
    pub fn closet(&self) -> Resolution {
        resolve(&self.items)
    }

    /// The visible layer stack for the picked appearance.
    pub fn layers(&self, pose: Option<PetPose>) -> DtiResult<Vec<AppearanceLayer>> {
        let appearance = self.pick_appearance(pose)?;
        build_stack(appearance, &self.closet().worn)
    }

    /// Render the pet to PNG bytes at its default size.
    pub async fn render(
        &self,
        pose: Option<PetPose>,
        fetcher: &dyn LayerFetcher,
    ) -> DtiResult<Vec<u8>> {
        let opts = RenderOpts {
            size: self.size,
            ..RenderOpts::default()
        };
        self.render_with(pose, &opts, fetcher).await
    }

    /// Render the pet to PNG bytes with explicit options.
    pub async fn render_with(
        &self,
        pose: Option<PetPose>,
        opts: &RenderOpts,
        fetcher: &dyn LayerFetcher,
    ) -> DtiResult<Vec<u8>> {
        let appearance = self.pick_appearance(pose)?;
        let layers = build_stack(appearance, &self.closet().worn)?;
        render(&layers, &RenderContext::for_appearance(appearance), opts, fetcher).await
    }
}

#[cfg(test)]
#[path = "../tests/unit/neopet.rs"]
mod tests;
