use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{DtiError, DtiResult};

/// Square render size. DTI serves layer art at these three sizes only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayerImageSize {
    /// 150x150 pixels.
    Size150,
    /// 300x300 pixels.
    Size300,
    /// 600x600 pixels.
    #[default]
    Size600,
}

impl LayerImageSize {
    /// Edge length in pixels.
    pub const fn pixels(self) -> u32 {
        match self {
            Self::Size150 => 150,
            Self::Size300 => 300,
            Self::Size600 => 600,
        }
    }

    /// The GraphQL enum spelling, e.g. `SIZE_600`.
    pub const fn api_name(self) -> &'static str {
        match self {
            Self::Size150 => "SIZE_150",
            Self::Size300 => "SIZE_300",
            Self::Size600 => "SIZE_600",
        }
    }

    /// Map an edge length onto a supported size.
    pub fn from_pixels(px: u32) -> DtiResult<Self> {
        match px {
            150 => Ok(Self::Size150),
            300 => Ok(Self::Size300),
            600 => Ok(Self::Size600),
            other => Err(DtiError::invalid_argument(format!(
                "unsupported render size {other}px (expected 150, 300 or 600)"
            ))),
        }
    }
}

impl fmt::Display for LayerImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for LayerImageSize {
    type Err = DtiError;

    fn from_str(s: &str) -> DtiResult<Self> {
        let s = s.trim();
        if let Ok(px) = s.parse::<u32>() {
            return Self::from_pixels(px);
        }
        match s.to_ascii_uppercase().as_str() {
            "SIZE_150" => Ok(Self::Size150),
            "SIZE_300" => Ok(Self::Size300),
            "SIZE_600" => Ok(Self::Size600),
            _ => Err(DtiError::invalid_argument(format!(
                "unknown layer image size '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/size.rs"]
mod tests;
