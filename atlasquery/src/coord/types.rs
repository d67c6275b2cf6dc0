//! Coordinate type definitions

use std::fmt;
use std::ops::{Add, Neg, Sub};

use serde::Serialize;

/// Orientation code every computation inside the crate assumes.
///
/// RAI: +x points to the subject's left, +y to posterior, +z to superior.
pub const CANONICAL_ORIENTATION: &str = "RAI";

/// A point or displacement in physical (millimetre) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// The origin.
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    /// Euclidean length.
    #[inline]
    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// True when every component is finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// One axis of a three-letter orientation code.
///
/// The letter names the side the axis starts from, so `R` means values grow
/// toward the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisCode {
    R,
    L,
    A,
    P,
    I,
    S,
}

impl AxisCode {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(AxisCode::R),
            'L' => Some(AxisCode::L),
            'A' => Some(AxisCode::A),
            'P' => Some(AxisCode::P),
            'I' => Some(AxisCode::I),
            'S' => Some(AxisCode::S),
            _ => None,
        }
    }

    /// Index of the anatomical axis in RAI order (0 = x, 1 = y, 2 = z).
    #[inline]
    pub fn canonical_axis(self) -> usize {
        match self {
            AxisCode::R | AxisCode::L => 0,
            AxisCode::A | AxisCode::P => 1,
            AxisCode::I | AxisCode::S => 2,
        }
    }

    /// +1 when the axis runs the same way as in RAI, -1 when flipped.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            AxisCode::R | AxisCode::A | AxisCode::I => 1.0,
            AxisCode::L | AxisCode::P | AxisCode::S => -1.0,
        }
    }

    fn as_char(self) -> char {
        match self {
            AxisCode::R => 'R',
            AxisCode::L => 'L',
            AxisCode::A => 'A',
            AxisCode::P => 'P',
            AxisCode::I => 'I',
            AxisCode::S => 'S',
        }
    }
}

/// A parsed orientation code such as `RAI` or `LPI`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Orientation {
    axes: [AxisCode; 3],
}

impl Orientation {
    /// The canonical RAI orientation.
    pub const RAI: Orientation = Orientation {
        axes: [AxisCode::R, AxisCode::A, AxisCode::I],
    };

    /// The LPI orientation (x and y flipped relative to RAI).
    pub const LPI: Orientation = Orientation {
        axes: [AxisCode::L, AxisCode::P, AxisCode::I],
    };

    /// Parses a three-letter code; each anatomical axis must appear once.
    pub fn parse(code: &str) -> Result<Self, CoordError> {
        let chars: Vec<char> = code.trim().chars().collect();
        if chars.len() != 3 {
            return Err(CoordError::InvalidOrientation(code.to_string()));
        }

        let mut axes = [AxisCode::R; 3];
        let mut seen = [false; 3];
        for (slot, c) in chars.iter().enumerate() {
            let axis = AxisCode::from_char(*c)
                .ok_or_else(|| CoordError::InvalidOrientation(code.to_string()))?;
            let canonical = axis.canonical_axis();
            if seen[canonical] {
                return Err(CoordError::InvalidOrientation(code.to_string()));
            }
            seen[canonical] = true;
            axes[slot] = axis;
        }

        Ok(Self { axes })
    }

    #[inline]
    pub fn is_canonical(&self) -> bool {
        *self == Self::RAI
    }

    /// Converts values given in this orientation into RAI.
    pub fn to_rai(&self, v: Vec3) -> Vec3 {
        let input = v.to_array();
        let mut out = [0.0; 3];
        for (slot, axis) in self.axes.iter().enumerate() {
            out[axis.canonical_axis()] = axis.sign() * input[slot];
        }
        Vec3::from_array(out)
    }

    /// Converts RAI values into this orientation.
    pub fn rai_to_oriented(&self, v: Vec3) -> Vec3 {
        let input = v.to_array();
        let mut out = [0.0; 3];
        for (slot, axis) in self.axes.iter().enumerate() {
            out[slot] = axis.sign() * input[axis.canonical_axis()];
        }
        Vec3::from_array(out)
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::RAI
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in &self.axes {
            write!(f, "{}", axis.as_char())?;
        }
        Ok(())
    }
}

/// A location in a named coordinate space, always held in RAI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtlasCoordinate {
    /// Position in the canonical RAI convention.
    pub xyz: Vec3,
    /// Name of the coordinate space the position belongs to.
    pub space: String,
}

impl AtlasCoordinate {
    /// Creates a coordinate from values already in RAI.
    pub fn new(xyz: Vec3, space: impl Into<String>) -> Self {
        Self {
            xyz,
            space: space.into(),
        }
    }

    /// Creates a coordinate from values given in another orientation.
    ///
    /// This is the only entry point for non-RAI input; the values are
    /// converted immediately and never leave RAI afterwards.
    pub fn from_oriented(
        xyz: Vec3,
        orientation: &Orientation,
        space: impl Into<String>,
    ) -> Result<Self, CoordError> {
        if !xyz.is_finite() {
            return Err(CoordError::NonFinite(xyz));
        }
        Ok(Self::new(orientation.to_rai(xyz), space))
    }

    /// Returns the position expressed in `orientation`.
    pub fn to_oriented(&self, orientation: &Orientation) -> Vec3 {
        orientation.rai_to_oriented(self.xyz)
    }
}

impl fmt::Display for AtlasCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}]", self.xyz, CANONICAL_ORIENTATION, self.space)
    }
}

/// Errors that can occur while building coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Orientation code is not a permutation of R/L, A/P, I/S
    InvalidOrientation(String),
    /// A component is NaN or infinite
    NonFinite(Vec3),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidOrientation(code) => {
                write!(
                    f,
                    "Invalid orientation code: '{}' (expected three letters covering R/L, A/P and I/S once each)",
                    code
                )
            }
            CoordError::NonFinite(v) => {
                write!(f, "Coordinate {} has a non-finite component", v)
            }
        }
    }
}

impl std::error::Error for CoordError {}
