use std::fmt;
use std::hash::{Hash, Hasher};

/// A named, depth-ordered rendering slot such as "Background" or "Hat".
///
/// Identity is the zone id alone: two zones with the same id compare equal even if a payload
/// disagrees about the label.
#[derive(Clone, Debug)]
pub struct Zone {
    /// DTI zone id.
    pub id: u32,
    /// Stacking depth; lower is further back.
    pub depth: i32,
    /// Human-readable label.
    pub label: String,
}

impl Zone {
    /// Construct a zone.
    pub fn new(id: u32, depth: i32, label: impl Into<String>) -> Self {
        Self {
            id,
            depth,
            label: label.into(),
        }
    }
}

impl PartialEq for Zone {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Zone {}

impl Hash for Zone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (zone {}, depth {})", self.label, self.id, self.depth)
    }
}
