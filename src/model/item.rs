use std::fmt;

use super::appearance::ItemAppearance;

/// How an item is obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Neocash.
    Nc,
    /// Neopoints.
    Np,
    /// Paintbrush clothing, bundled with a color.
    Pb,
}

impl ItemKind {
    /// Derive the kind from the API's `isNc`/`isPb` flags.
    pub fn from_flags(is_nc: bool, is_pb: bool) -> Self {
        if is_nc {
            Self::Nc
        } else if is_pb {
            Self::Pb
        } else {
            Self::Np
        }
    }
}

/// A wearable Neopets item.
#[derive(Clone, Debug)]
pub struct Item {
    /// Neopets item id.
    pub id: u32,
    /// Item name.
    pub name: String,
    /// Item description.
    pub description: String,
    /// Thumbnail URL.
    pub thumbnail_url: String,
    /// NC, NP or PB.
    pub kind: ItemKind,
    /// Neopets rarity index.
    pub rarity: u32,
    /// How the item looks on the requested body; `None` when it cannot be worn there.
    pub appearance: Option<ItemAppearance>,
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
