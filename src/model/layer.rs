use std::collections::BTreeSet;
use std::fmt;

use super::zone::Zone;

/// Which kind of appearance a layer belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Part of the pet's own body.
    Biology,
    /// Part of a worn item.
    Object,
}

/// Glitch labels DTI attaches to layers it knows render incorrectly.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KnownGlitch {
    /// The official SWF is wrong.
    OfficialSwfIsIncorrect,
    /// The official SVG is wrong.
    OfficialSvgIsIncorrect,
    /// The official movie is wrong.
    OfficialMovieIsIncorrect,
    /// Displays incorrectly for an unknown reason.
    DisplaysIncorrectlyButCauseUnknown,
    /// The official body id is wrong.
    OfficialBodyIdIsIncorrect,
    /// Needs other body-specific assets to look right.
    RequiresOtherBodySpecificAssets,
    /// A label this crate does not know yet.
    Other(String),
}

impl KnownGlitch {
    /// Parse the API spelling; unknown labels are kept verbatim.
    pub fn from_api(s: &str) -> Self {
        match s {
            "OFFICIAL_SWF_IS_INCORRECT" => Self::OfficialSwfIsIncorrect,
            "OFFICIAL_SVG_IS_INCORRECT" => Self::OfficialSvgIsIncorrect,
            "OFFICIAL_MOVIE_IS_INCORRECT" => Self::OfficialMovieIsIncorrect,
            "DISPLAYS_INCORRECTLY_BUT_CAUSE_UNKNOWN" => Self::DisplaysIncorrectlyButCauseUnknown,
            "OFFICIAL_BODY_ID_IS_INCORRECT" => Self::OfficialBodyIdIsIncorrect,
            "REQUIRES_OTHER_BODY_SPECIFIC_ASSETS" => Self::RequiresOtherBodySpecificAssets,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One raster image of a customization, in a single zone.
#[derive(Clone, Debug)]
pub struct AppearanceLayer {
    /// DTI layer id, unique across all layers of all kinds.
    pub id: u32,
    /// The zone this layer occupies.
    pub zone: Zone,
    /// PNG URL. `None` for movie-only assets, which cannot be rendered.
    pub image_url: Option<String>,
    /// Neopets asset id. Only unique within one [`LayerKind`].
    pub asset_remote_id: u32,
    /// Body this layer was drawn for; `0` means it fits every body.
    pub body_id: u32,
    /// Pet body layer or item layer.
    pub kind: LayerKind,
    /// Glitches DTI has recorded for this layer.
    pub known_glitches: BTreeSet<KnownGlitch>,
}

impl AppearanceLayer {
    /// `true` when the layer only fits one specific body.
    pub fn is_body_specific(&self) -> bool {
        self.body_id != 0
    }

    /// Short label used in error messages and logs.
    pub fn describe(&self) -> String {
        format!("layer {} ({})", self.id, self.zone.label)
    }
}

impl PartialEq for AppearanceLayer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AppearanceLayer {}

impl fmt::Display for AppearanceLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "layer {} asset {} in {} url={}",
            self.id,
            self.asset_remote_id,
            self.zone,
            self.image_url.as_deref().unwrap_or("<null>")
        )
    }
}
