use std::fmt;

/// A Neopets species.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Species {
    /// DTI species id, 1-based.
    pub id: u32,
    /// Species name, e.g. "Aisha".
    pub name: String,
}

/// A Neopets color.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// DTI color id, 1-based.
    pub id: u32,
    /// Color name, e.g. "Mallow".
    pub name: String,
}

impl Species {
    /// Construct a species.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Color {
    /// Construct a color.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
