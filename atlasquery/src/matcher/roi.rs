//! Decorated region strings: `ATLAS:label` and `ATLAS:side:label`.

use super::chunk::{decode, RegionSpec};
use super::DecodeError;
use crate::atlas::Side;

/// Longest atlas name accepted in a decorated string.
pub const MAX_ATLAS_NAME_LENGTH: usize = 62;

const MIN_LENGTH: usize = 3;
const MAX_SEPARATORS: usize = 2;

/// Decodes `ATLAS:label` or `ATLAS:side:label`.
///
/// The label is the text after the last `:` and becomes the region's
/// `original` text. A non-empty side component must start with `l`, `r`,
/// `u` or `b` and replaces any side named in the label.
pub fn decode_roi_string(text: &str) -> Result<RegionSpec, DecodeError> {
    if text.chars().count() < MIN_LENGTH {
        return Err(DecodeError::TooShort(text.to_string()));
    }

    let parts: Vec<&str> = text.split(':').collect();
    let separators = parts.len() - 1;
    if separators > MAX_SEPARATORS {
        return Err(DecodeError::TooManySeparators { count: separators });
    }
    if separators == 0 {
        return Err(DecodeError::MissingSeparator);
    }

    let atlas = parts[0];
    if atlas.is_empty() {
        return Err(DecodeError::EmptyAtlas);
    }
    let length = atlas.chars().count();
    if length > MAX_ATLAS_NAME_LENGTH {
        return Err(DecodeError::TooLong {
            length,
            max: MAX_ATLAS_NAME_LENGTH,
        });
    }

    let side = match parts.as_slice() {
        [_, side, _] => side_override(side)?,
        _ => None,
    };

    let spec = decode(parts[separators])?.with_atlas(atlas);
    Ok(match side {
        Some(side) => spec.with_side(side),
        None => spec,
    })
}

fn side_override(component: &str) -> Result<Option<Side>, DecodeError> {
    match component.chars().next() {
        None => Ok(None),
        Some(c) => Side::from_code(c).map(Some).ok_or(DecodeError::BadSide(c)),
    }
}
