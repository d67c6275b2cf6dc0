//! Coordinate module
//!
//! Physical coordinates for atlas lookups. Every coordinate inside the crate
//! is held in the RAI convention (+x toward the subject's left, +y toward
//! posterior, +z toward superior). Input in any other orientation is
//! converted once, at the boundary, through [`AtlasCoordinate::from_oriented`];
//! results are converted back with [`AtlasCoordinate::to_oriented`].
//!
//! The RAI convention also decides the hemisphere of a point when an atlas
//! carries no explicit side mask: negative x is the right hemisphere.

mod types;

pub use types::{AtlasCoordinate, AxisCode, CoordError, Orientation, Vec3, CANONICAL_ORIENTATION};

/// Hemisphere implied by an RAI x coordinate.
///
/// Returns `true` for the right hemisphere (x < 0).
#[inline]
pub fn is_right_hemisphere(x: f64) -> bool {
    x < 0.0
}

/// Parses an orientation code and converts `xyz` into RAI.
///
/// Convenience wrapper for hosts that carry the orientation as text.
pub fn to_canonical(xyz: Vec3, orientation: &str) -> Result<Vec3, CoordError> {
    let orientation = Orientation::parse(orientation)?;
    if !xyz.is_finite() {
        return Err(CoordError::NonFinite(xyz));
    }
    Ok(orientation.to_rai(xyz))
}
