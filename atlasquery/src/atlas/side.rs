//! Hemisphere sides and per-voxel side masks.

use std::fmt;

use serde::Serialize;

/// Side of the brain a label or voxel belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Both,
    #[default]
    Unknown,
}

impl Side {
    /// Parses the single-letter side code (`l`, `r`, `b`, `u`), any case.
    pub fn from_code(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'l' => Some(Side::Left),
            'r' => Some(Side::Right),
            'b' => Some(Side::Both),
            'u' => Some(Side::Unknown),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Side::Left => 'l',
            Side::Right => 'r',
            Side::Both => 'b',
            Side::Unknown => 'u',
        }
    }

    /// True for `Left` and `Right`.
    #[inline]
    pub fn is_lateral(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    /// Two sides agree only when they are equal and known.
    #[inline]
    pub fn agrees_with(self, other: Side) -> bool {
        self != Side::Unknown && self == other
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Both => "both",
            Side::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Value marking a left-hemisphere voxel in a [`SideMask`].
pub const SIDE_MASK_LEFT: u8 = 2;
/// Value marking a right-hemisphere voxel in a [`SideMask`].
pub const SIDE_MASK_RIGHT: u8 = 1;

/// Per-voxel hemisphere assignment attached to a discrete atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideMask {
    values: Vec<u8>,
}

impl SideMask {
    pub fn new(values: Vec<u8>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Side of the voxel at linear index `index`; out of range is `Unknown`.
    pub fn side_at(&self, index: usize) -> Side {
        match self.values.get(index) {
            Some(&SIDE_MASK_LEFT) => Side::Left,
            Some(&SIDE_MASK_RIGHT) => Side::Right,
            _ => Side::Unknown,
        }
    }
}
