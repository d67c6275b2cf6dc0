//! Voxel masks for resolved regions.
//!
//! A mask has one byte per atlas voxel. Discrete atlases give 1 wherever a
//! plane holds a requested code. Probabilistic atlases copy the nonzero
//! values of each requested region's plane, in the atlas's probability
//! units (0..=250 by default). A lateral spec then clears voxels on the
//! other side.

use serde::Serialize;
use thiserror::Error;

use crate::atlas::{
    clean_label, clean_label_to_prefix, AtlasKind, AtlasVolume, PlaneData, Side, VoxelIndex,
};
use crate::matcher::{MatchKind, RegionSpec};

/// Longest mask label, in characters.
pub const MAX_MASK_LABEL_LENGTH: usize = 35;

/// Errors raised while building a mask.
#[derive(Debug, Error)]
pub enum MaskError {
    #[error("Cannot allocate a mask of {voxels} voxels")]
    Allocation { voxels: usize },

    #[error("No region codes given for the mask")]
    NoCodes,

    #[error("'{query}' did not resolve to a usable region ({kind:?})")]
    NoUsableMatch { query: String, kind: MatchKind },

    #[error("Atlas '{atlas}' has no region with code {code}")]
    UnknownCode { atlas: String, code: i32 },

    #[error("Atlas '{atlas}' has no plane labeled '{label}' for code {code}")]
    MissingPlane {
        atlas: String,
        code: i32,
        label: String,
    },
}

/// A byte mask over an atlas grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoxelMask {
    pub atlas: String,
    /// `ATLAS.prefix`, or `ATLAS.prefix.l` / `ATLAS.prefix.r` for one side.
    pub name: String,
    /// `prefix` or `l.prefix`, at most [`MAX_MASK_LABEL_LENGTH`] characters.
    pub label: String,
    pub dims: [usize; 3],
    #[serde(skip)]
    values: Vec<u8>,
}

impl VoxelMask {
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a voxel; 0 outside the grid.
    pub fn get(&self, ijk: VoxelIndex) -> u8 {
        if ijk.iter().zip(self.dims.iter()).any(|(&i, &n)| i >= n) {
            return 0;
        }
        let index = ijk[0] + self.dims[0] * (ijk[1] + self.dims[1] * ijk[2]);
        self.values.get(index).copied().unwrap_or(0)
    }

    /// Number of nonzero voxels.
    pub fn count(&self) -> usize {
        self.values.iter().filter(|&&v| v != 0).count()
    }
}

/// Builds the mask selecting `codes` in `volume`.
///
/// `spec` supplies the side to keep and the text the mask is named after.
pub fn region_mask(
    volume: &AtlasVolume,
    spec: &RegionSpec,
    codes: &[i32],
) -> Result<VoxelMask, MaskError> {
    if codes.is_empty() {
        return Err(MaskError::NoCodes);
    }

    let voxels = volume.grid().len();
    let mut values: Vec<u8> = Vec::new();
    values
        .try_reserve_exact(voxels)
        .map_err(|_| MaskError::Allocation { voxels })?;
    values.resize(voxels, 0);

    match volume.kind() {
        AtlasKind::Discrete { .. } => fill_discrete(volume, codes, &mut values),
        AtlasKind::Probabilistic { scale } => fill_probabilistic(volume, codes, scale, &mut values)?,
    }

    if spec.side.is_lateral() {
        let grid = volume.grid();
        for (index, value) in values.iter_mut().enumerate() {
            if *value != 0 && volume.voxel_side(grid.unlinear(index)) != spec.side {
                *value = 0;
            }
        }
    }

    let (name, label) = mask_names(volume.name(), spec);
    tracing::debug!(
        atlas = %volume.name(),
        mask = %name,
        codes = ?codes,
        "Built region mask"
    );

    Ok(VoxelMask {
        atlas: volume.name().to_string(),
        name,
        label,
        dims: volume.grid().dims(),
        values,
    })
}

fn fill_discrete(volume: &AtlasVolume, codes: &[i32], values: &mut [u8]) {
    for plane in volume.planes() {
        for (index, value) in values.iter_mut().enumerate() {
            if codes.contains(&plane.code_at(index)) {
                *value = 1;
            }
        }
    }
}

fn fill_probabilistic(
    volume: &AtlasVolume,
    codes: &[i32],
    scale: f32,
    values: &mut [u8],
) -> Result<(), MaskError> {
    for &code in codes {
        let entry = volume
            .table()
            .first_with_code(code)
            .ok_or_else(|| MaskError::UnknownCode {
                atlas: volume.name().to_string(),
                code,
            })?;
        let wanted = clean_label(entry.plane_label.as_deref().unwrap_or(&entry.name));
        let plane = volume
            .planes()
            .iter()
            .find(|p| p.label() == Some(wanted))
            .ok_or_else(|| MaskError::MissingPlane {
                atlas: volume.name().to_string(),
                code,
                label: wanted.to_string(),
            })?;

        for (index, value) in values.iter_mut().enumerate() {
            let stored = match plane.data() {
                PlaneData::Byte(_) | PlaneData::Short(_) => plane.raw_at(index).clamp(0.0, 255.0),
                PlaneData::Float { .. } => (plane.raw_at(index) * scale).clamp(0.0, 255.0),
            };
            if stored > 0.0 {
                *value = stored as u8;
            }
        }
    }
    Ok(())
}

fn mask_names(atlas: &str, spec: &RegionSpec) -> (String, String) {
    let prefix = clean_label_to_prefix(clean_label(&spec.original));
    let (name, label) = match spec.side {
        Side::Left | Side::Right => (
            format!("{}.{}.{}", atlas, prefix, spec.side.code()),
            format!("{}.{}", spec.side.code(), prefix),
        ),
        Side::Both | Side::Unknown => (format!("{}.{}", atlas, prefix), prefix),
    };
    (name, label.chars().take(MAX_MASK_LABEL_LENGTH).collect())
}
