//! Wire shapes of the DTI GraphQL responses this crate consumes.
//!
//! Each payload struct mirrors one JSON object and converts into its typed model counterpart
//! through `TryFrom`. Missing required fields surface as [`DtiError::Payload`] from serde, and
//! unparsable ids as [`DtiError::Payload`] from the conversion.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::foundation::error::{DtiError, DtiResult};
use crate::model::{
    AppearanceLayer, Color, Item, ItemAppearance, ItemKind, KnownGlitch, LayerKind,
    PetAppearance, Species, Zone,
};
use crate::pose::PetPose;

/// Parse any payload from JSON text.
pub fn from_json<T: DeserializeOwned>(json: &str) -> DtiResult<T> {
    serde_json::from_str(json).map_err(|e| DtiError::payload(format!("parse JSON payload: {e}")))
}

/// Parse any payload from JSON bytes.
pub fn from_slice<T: DeserializeOwned>(json: &[u8]) -> DtiResult<T> {
    serde_json::from_slice(json).map_err(|e| DtiError::payload(format!("parse JSON payload: {e}")))
}

/// An id the API may send either as a JSON string or a number.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RawId {
    /// Numeric form.
    Num(u64),
    /// String form, e.g. `"17"`.
    Str(String),
}

impl RawId {
    /// Interpret as a `u32`, naming `field` on failure.
    pub fn to_u32(&self, field: &str) -> DtiResult<u32> {
        match self {
            RawId::Num(n) => u32::try_from(*n)
                .map_err(|_| DtiError::payload(format!("{field} {n} does not fit in u32"))),
            RawId::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| DtiError::payload(format!("{field} '{s}' is not a numeric id"))),
        }
    }

    /// Interpret as an opaque string id.
    pub fn to_string_id(&self) -> String {
        match self {
            RawId::Num(n) => n.to_string(),
            RawId::Str(s) => s.clone(),
        }
    }
}

/// `{id, name}` as returned for species.
#[derive(Clone, Debug, Deserialize)]
pub struct SpeciesPayload {
    /// Species id.
    pub id: RawId,
    /// Species name.
    pub name: String,
}

/// `{id, name}` as returned for colors.
#[derive(Clone, Debug, Deserialize)]
pub struct ColorPayload {
    /// Color id.
    pub id: RawId,
    /// Color name.
    pub name: String,
}

/// `{id, depth, label}`.
#[derive(Clone, Debug, Deserialize)]
pub struct ZonePayload {
    /// Zone id.
    pub id: RawId,
    /// Zone depth.
    pub depth: i32,
    /// Zone label.
    pub label: String,
}

/// One appearance layer.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerPayload {
    /// Layer id.
    pub id: RawId,
    /// PNG URL, `null` for movie-only assets.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Neopets asset id.
    pub remote_id: RawId,
    /// Body id; `0` means body-generic.
    #[serde(default = "zero_id")]
    pub body_id: RawId,
    /// Occupied zone.
    pub zone: ZonePayload,
    /// Glitch labels.
    #[serde(default)]
    pub known_glitches: Vec<String>,
}

/// A pet appearance.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetAppearancePayload {
    /// Pet state id.
    pub id: RawId,
    /// Body id.
    pub body_id: RawId,
    /// Glitch flag.
    #[serde(default)]
    pub is_glitched: bool,
    /// Pose.
    pub pose: PetPose,
    /// Color.
    pub color: ColorPayload,
    /// Species.
    pub species: SpeciesPayload,
    /// Body layers.
    pub layers: Vec<LayerPayload>,
    /// Self-restricted zones.
    #[serde(default)]
    pub restricted_zones: Vec<ZonePayload>,
}

/// An item's appearance on one body.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAppearancePayload {
    /// Appearance id.
    pub id: RawId,
    /// Item layers.
    pub layers: Vec<LayerPayload>,
    /// Restricted zones.
    #[serde(default)]
    pub restricted_zones: Vec<ZonePayload>,
}

/// An item, with its appearance on the requested body when one exists.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    /// Item id.
    pub id: RawId,
    /// Item name.
    #[serde(default)]
    pub name: String,
    /// Item description.
    #[serde(default)]
    pub description: String,
    /// Thumbnail URL.
    #[serde(default)]
    pub thumbnail_url: String,
    /// NC flag.
    #[serde(default)]
    pub is_nc: bool,
    /// PB flag.
    #[serde(default)]
    pub is_pb: bool,
    /// Rarity index.
    #[serde(default)]
    pub rarity_index: Option<RawId>,
    /// Appearance on the requested species/color.
    #[serde(default)]
    pub appearance_on: Option<ItemAppearancePayload>,
}

/// `{allSpecies, allColors}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesAndColorsPayload {
    /// Every species.
    pub all_species: Vec<SpeciesPayload>,
    /// Every color.
    pub all_colors: Vec<ColorPayload>,
}

/// `{allZones}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonesPayload {
    /// Every zone.
    pub all_zones: Vec<ZonePayload>,
}

/// Pet appearances plus the requested items for one species/color.
///
/// Item lookups by id return `null` entries for unknown ids; those are dropped.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetsPayload {
    /// Requested items.
    #[serde(default, alias = "itemsByName")]
    pub items: Vec<Option<ItemPayload>>,
    /// Appearances for every available pose.
    #[serde(default)]
    pub pet_appearances: Vec<PetAppearancePayload>,
    /// A single appearance, as returned by per-pose queries.
    #[serde(default)]
    pub pet_appearance: Option<PetAppearancePayload>,
}

/// One GraphQL error entry.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphQlError {
    /// Error message.
    pub message: String,
}

/// The GraphQL response envelope.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    /// Response data; `null` on hard errors.
    pub data: Option<T>,
    /// Error list.
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
    /// Single error, as some DTI endpoints report it.
    #[serde(default)]
    pub error: Option<GraphQlError>,
}

impl<T> GraphQlResponse<T> {
    /// Unwrap the data, classifying API errors.
    ///
    /// DTI reports an unmodelled species/color pair as "... it is undefined"; that becomes
    /// [`DtiError::InvalidSpeciesColorPair`]. Every other error is a [`DtiError::Payload`].
    pub fn into_data(self) -> DtiResult<T> {
        let mut messages: Vec<String> = self.errors.into_iter().map(|e| e.message).collect();
        messages.extend(self.error.map(|e| e.message));

        if let Some(msg) = messages.iter().find(|m| m.contains("it is undefined")) {
            return Err(DtiError::invalid_pair(msg.clone()));
        }
        if !messages.is_empty() {
            return Err(DtiError::payload(format!(
                "API returned errors: {}",
                messages.join("; ")
            )));
        }
        self.data
            .ok_or_else(|| DtiError::payload("API returned null data"))
    }
}

/// Parsed pet appearances and items.
#[derive(Clone, Debug, Default)]
pub struct Assets {
    /// Appearances, one per available pose.
    pub pet_appearances: Vec<PetAppearance>,
    /// Items in request order.
    pub items: Vec<Item>,
}

fn zero_id() -> RawId {
    RawId::Num(0)
}

impl TryFrom<SpeciesPayload> for Species {
    type Error = DtiError;

    fn try_from(p: SpeciesPayload) -> DtiResult<Self> {
        Ok(Species::new(p.id.to_u32("species id")?, p.name))
    }
}

impl TryFrom<ColorPayload> for Color {
    type Error = DtiError;

    fn try_from(p: ColorPayload) -> DtiResult<Self> {
        Ok(Color::new(p.id.to_u32("color id")?, p.name))
    }
}

impl TryFrom<ZonePayload> for Zone {
    type Error = DtiError;

    fn try_from(p: ZonePayload) -> DtiResult<Self> {
        Ok(Zone::new(p.id.to_u32("zone id")?, p.depth, p.label))
    }
}

impl LayerPayload {
    /// Convert, tagging the layer with the kind of appearance that owns it.
    pub fn into_layer(self, kind: LayerKind) -> DtiResult<AppearanceLayer> {
        Ok(AppearanceLayer {
            id: self.id.to_u32("layer id")?,
            zone: Zone::try_from(self.zone)?,
            image_url: self.image_url,
            asset_remote_id: self.remote_id.to_u32("layer remoteId")?,
            body_id: self.body_id.to_u32("layer bodyId")?,
            kind,
            known_glitches: self
                .known_glitches
                .iter()
                .map(|g| KnownGlitch::from_api(g))
                .collect::<BTreeSet<_>>(),
        })
    }
}

fn parse_layers(layers: Vec<LayerPayload>, kind: LayerKind) -> DtiResult<Vec<AppearanceLayer>> {
    layers.into_iter().map(|l| l.into_layer(kind)).collect()
}

fn parse_zones(zones: Vec<ZonePayload>) -> DtiResult<Vec<Zone>> {
    zones.into_iter().map(Zone::try_from).collect()
}

impl TryFrom<PetAppearancePayload> for PetAppearance {
    type Error = DtiError;

    fn try_from(p: PetAppearancePayload) -> DtiResult<Self> {
        Ok(PetAppearance {
            id: p.id.to_u32("pet appearance id")?,
            species: Species::try_from(p.species)?,
            color: Color::try_from(p.color)?,
            pose: p.pose,
            body_id: p.body_id.to_u32("pet appearance bodyId")?,
            is_glitched: p.is_glitched,
            layers: parse_layers(p.layers, LayerKind::Biology)?,
            restricted_zones: parse_zones(p.restricted_zones)?,
        })
    }
}

impl TryFrom<ItemAppearancePayload> for ItemAppearance {
    type Error = DtiError;

    fn try_from(p: ItemAppearancePayload) -> DtiResult<Self> {
        Ok(ItemAppearance {
            id: p.id.to_string_id(),
            layers: parse_layers(p.layers, LayerKind::Object)?,
            restricted_zones: parse_zones(p.restricted_zones)?,
        })
    }
}

impl TryFrom<ItemPayload> for Item {
    type Error = DtiError;

    fn try_from(p: ItemPayload) -> DtiResult<Self> {
        let rarity = match &p.rarity_index {
            Some(r) => r.to_u32("item rarityIndex")?,
            None => 0,
        };
        Ok(Item {
            id: p.id.to_u32("item id")?,
            name: p.name,
            description: p.description,
            thumbnail_url: p.thumbnail_url,
            kind: ItemKind::from_flags(p.is_nc, p.is_pb),
            rarity,
            appearance: p.appearance_on.map(ItemAppearance::try_from).transpose()?,
        })
    }
}

impl TryFrom<AssetsPayload> for Assets {
    type Error = DtiError;

    fn try_from(p: AssetsPayload) -> DtiResult<Self> {
        let mut pet_appearances = p
            .pet_appearances
            .into_iter()
            .map(PetAppearance::try_from)
            .collect::<DtiResult<Vec<_>>>()?;
        if let Some(single) = p.pet_appearance {
            pet_appearances.push(PetAppearance::try_from(single)?);
        }
        let items = p
            .items
            .into_iter()
            .flatten()
            .map(Item::try_from)
            .collect::<DtiResult<Vec<_>>>()?;
        Ok(Assets {
            pet_appearances,
            items,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/payload.rs"]
mod tests;
