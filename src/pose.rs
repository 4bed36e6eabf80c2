use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use crate::foundation::error::{DtiError, DtiResult};

/// A single pet pose: a mood and gender presentation, or a special state.
///
/// Each pose owns one bit of an 8-bit mask. The layout is fixed by the binary validity table the
/// DTI API serves and must not change.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum PetPose {
    /// Happy, masculine presentation.
    HappyMasc = 1,
    /// Sad, masculine presentation.
    SadMasc = 2,
    /// Sick, masculine presentation.
    SickMasc = 4,
    /// Happy, feminine presentation.
    HappyFem = 8,
    /// Sad, feminine presentation.
    SadFem = 16,
    /// Sick, feminine presentation.
    SickFem = 32,
    /// A pet that was never converted to the customizable art style.
    Unconverted = 64,
    /// Pose data that DTI has not labelled yet.
    Unknown = 128,
}

impl PetPose {
    /// Every pose in bit order.
    pub const ALL: [PetPose; 8] = [
        PetPose::HappyMasc,
        PetPose::SadMasc,
        PetPose::SickMasc,
        PetPose::HappyFem,
        PetPose::SadFem,
        PetPose::SickFem,
        PetPose::Unconverted,
        PetPose::Unknown,
    ];

    /// The pose's bit in a validity mask.
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Look up the pose owning exactly this bit.
    pub fn from_bit(bit: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.bit() == bit)
    }

    /// The API spelling, e.g. `HAPPY_FEM`.
    pub const fn name(self) -> &'static str {
        match self {
            PetPose::HappyMasc => "HAPPY_MASC",
            PetPose::SadMasc => "SAD_MASC",
            PetPose::SickMasc => "SICK_MASC",
            PetPose::HappyFem => "HAPPY_FEM",
            PetPose::SadFem => "SAD_FEM",
            PetPose::SickFem => "SICK_FEM",
            PetPose::Unconverted => "UNCONVERTED",
            PetPose::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for PetPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PetPose {
    type Err = DtiError;

    fn from_str(s: &str) -> DtiResult<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == upper)
            .ok_or_else(|| DtiError::invalid_argument(format!("unknown pet pose '{s}'")))
    }
}

impl BitOr for PetPose {
    type Output = BitField;

    fn bitor(self, rhs: Self) -> BitField {
        BitField(self.bit() | rhs.bit())
    }
}

impl BitOr<PetPose> for BitField {
    type Output = BitField;

    fn bitor(self, rhs: PetPose) -> BitField {
        BitField(self.0 | rhs.bit())
    }
}

impl BitOr for BitField {
    type Output = BitField;

    fn bitor(self, rhs: BitField) -> BitField {
        BitField(self.0 | rhs.0)
    }
}

/// An 8-bit pose mask for one species/color pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitField(pub u8);

impl BitField {
    /// No legal poses.
    pub const EMPTY: BitField = BitField(0);
    /// All feminine poses.
    pub const ALL_FEM: BitField = BitField(
        PetPose::SickFem.bit() | PetPose::SadFem.bit() | PetPose::HappyFem.bit(),
    );
    /// All masculine poses.
    pub const ALL_MASC: BitField = BitField(
        PetPose::SickMasc.bit() | PetPose::SadMasc.bit() | PetPose::HappyMasc.bit(),
    );
    /// Both happy poses.
    pub const ALL_HAPPY: BitField = BitField(PetPose::HappyFem.bit() | PetPose::HappyMasc.bit());
    /// Both sad poses.
    pub const ALL_SAD: BitField = BitField(PetPose::SadFem.bit() | PetPose::SadMasc.bit());
    /// Both sick poses.
    pub const ALL_SICK: BitField = BitField(PetPose::SickFem.bit() | PetPose::SickMasc.bit());

    /// Wrap a raw mask byte.
    pub const fn new(bits: u8) -> Self {
        Self(bits)
    }

    /// The raw mask byte.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// `true` when no pose is legal.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `true` iff `mask & pose == pose`.
    pub const fn check(self, pose: PetPose) -> bool {
        self.0 & pose.bit() == pose.bit()
    }

    /// `true` iff every bit of `other` is set in this mask.
    pub const fn contains(self, other: BitField) -> bool {
        self.0 & other.0 == other.0
    }

    /// Legal poses in bit order.
    pub fn poses(self) -> impl Iterator<Item = PetPose> {
        PetPose::ALL.into_iter().filter(move |p| self.check(*p))
    }

    /// Legal poses ordered by closeness to `pose`.
    pub fn fallbacks(self, pose: PetPose) -> Vec<PetPose> {
        closest_poses(pose)
            .iter()
            .copied()
            .filter(|p| self.check(*p))
            .collect()
    }
}

impl From<PetPose> for BitField {
    fn from(pose: PetPose) -> Self {
        BitField(pose.bit())
    }
}

const CLOSEST_HAPPY_MASC: [PetPose; 8] = [
    PetPose::HappyMasc,
    PetPose::HappyFem,
    PetPose::SadMasc,
    PetPose::SadFem,
    PetPose::SickMasc,
    PetPose::SickFem,
    PetPose::Unconverted,
    PetPose::Unknown,
];
const CLOSEST_HAPPY_FEM: [PetPose; 8] = [
    PetPose::HappyFem,
    PetPose::HappyMasc,
    PetPose::SadFem,
    PetPose::SadMasc,
    PetPose::SickFem,
    PetPose::SickMasc,
    PetPose::Unconverted,
    PetPose::Unknown,
];
const CLOSEST_SAD_MASC: [PetPose; 8] = [
    PetPose::SadMasc,
    PetPose::SadFem,
    PetPose::HappyMasc,
    PetPose::HappyFem,
    PetPose::SickMasc,
    PetPose::SickFem,
    PetPose::Unconverted,
    PetPose::Unknown,
];
const CLOSEST_SAD_FEM: [PetPose; 8] = [
    PetPose::SadFem,
    PetPose::SadMasc,
    PetPose::HappyFem,
    PetPose::HappyMasc,
    PetPose::SickFem,
    PetPose::SickMasc,
    PetPose::Unconverted,
    PetPose::Unknown,
];
const CLOSEST_SICK_MASC: [PetPose; 8] = [
    PetPose::SickMasc,
    PetPose::SickFem,
    PetPose::SadMasc,
    PetPose::SadFem,
    PetPose::HappyMasc,
    PetPose::HappyFem,
    PetPose::Unconverted,
    PetPose::Unknown,
];
const CLOSEST_SICK_FEM: [PetPose; 8] = [
    PetPose::SickFem,
    PetPose::SickMasc,
    PetPose::SadFem,
    PetPose::SadMasc,
    PetPose::HappyFem,
    PetPose::HappyMasc,
    PetPose::Unconverted,
    PetPose::Unknown,
];
const CLOSEST_UNCONVERTED: [PetPose; 8] = [
    PetPose::Unconverted,
    PetPose::HappyFem,
    PetPose::HappyMasc,
    PetPose::SadFem,
    PetPose::SadMasc,
    PetPose::SickFem,
    PetPose::SickMasc,
    PetPose::Unknown,
];
// UNKNOWN is only ever a last resort, even when it was asked for.
const CLOSEST_UNKNOWN: [PetPose; 8] = [
    PetPose::HappyFem,
    PetPose::HappyMasc,
    PetPose::SadFem,
    PetPose::SadMasc,
    PetPose::SickFem,
    PetPose::SickMasc,
    PetPose::Unconverted,
    PetPose::Unknown,
];

/// Every pose, ordered from the closest visual substitute for `pose` to the furthest.
pub fn closest_poses(pose: PetPose) -> &'static [PetPose; 8] {
    match pose {
        PetPose::HappyMasc => &CLOSEST_HAPPY_MASC,
        PetPose::HappyFem => &CLOSEST_HAPPY_FEM,
        PetPose::SadMasc => &CLOSEST_SAD_MASC,
        PetPose::SadFem => &CLOSEST_SAD_FEM,
        PetPose::SickMasc => &CLOSEST_SICK_MASC,
        PetPose::SickFem => &CLOSEST_SICK_FEM,
        PetPose::Unconverted => &CLOSEST_UNCONVERTED,
        PetPose::Unknown => &CLOSEST_UNKNOWN,
    }
}

#[cfg(test)]
#[path = "../tests/unit/pose.rs"]
mod tests;
