//! Atlas volumes, region tables and the atlas registry.
//!
//! An [`AtlasVolume`] is a voxel grid with one or more [`Plane`]s and a
//! [`RegionTable`]. Its [`AtlasKind`] decides how plane values are read:
//!
//! - **Discrete**: values are region codes, looked up in the table. Several
//!   planes may carry labels from disjoint hierarchies.
//! - **Probabilistic**: each plane holds one region, identified by the plane
//!   label; values are probabilities scaled by a per-atlas divisor.
//!
//! Volumes are supplied by an [`AtlasSource`] and cached by the
//! [`AtlasRegistry`], which also fixes the order atlases are queried in.

mod grid;
mod label;
mod plane;
mod registry;
mod side;
mod table;
mod volume;

pub use grid::{VoxelGrid, VoxelIndex};
pub use label::{clean_label, clean_label_to_prefix, label_side, strip_side, with_side};
pub use plane::{Plane, PlaneData};
pub use registry::{AtlasDescriptor, AtlasRegistry, AtlasSource, InMemoryAtlasSource};
pub use side::{Side, SideMask, SIDE_MASK_LEFT, SIDE_MASK_RIGHT};
pub use table::{RegionEntry, RegionTable};
pub use volume::{AtlasKind, AtlasVolume, AtlasVolumeBuilder, DEFAULT_PROBABILITY_SCALE};

use thiserror::Error;

use crate::coord::Vec3;

/// Errors raised while building volumes or registering atlases.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("Atlas name is empty")]
    EmptyName,

    #[error("Atlas '{0}' registered twice")]
    DuplicateAtlas(String),

    #[error("Atlas '{0}' has no planes")]
    NoPlanes(String),

    #[error("Voxel grid has an empty dimension: {dims:?}")]
    EmptyGrid { dims: [usize; 3] },

    #[error("Voxel spacing {spacing} must be finite and nonzero on every axis")]
    InvalidSpacing { spacing: Vec3 },

    #[error("Atlas '{atlas}' plane {plane} has {actual} voxels, grid has {expected}")]
    PlaneSize {
        atlas: String,
        plane: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Atlas '{atlas}' side mask has {actual} voxels, grid has {expected}")]
    SideMaskSize {
        atlas: String,
        expected: usize,
        actual: usize,
    },

    #[error("Atlas '{atlas}' probability scale {scale} must be positive")]
    InvalidScale { atlas: String, scale: f32 },
}

/// Errors raised while obtaining a volume from the registry.
#[derive(Debug, Error)]
pub enum AtlasLoadError {
    #[error("Atlas '{0}' is not registered")]
    Unknown(String),

    #[error("Atlas '{0}' is not available from its source")]
    NotAvailable(String),

    #[error("Atlas '{atlas}' is registered in {registered} but its volume is in {loaded}")]
    SpaceMismatch {
        atlas: String,
        registered: String,
        loaded: String,
    },

    #[error("Atlas '{atlas}' failed to load: {reason}")]
    Failed { atlas: String, reason: String },

    #[error(transparent)]
    Invalid(#[from] AtlasError),
}
