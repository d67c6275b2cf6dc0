//! Atlas volumes.

use serde::Serialize;

use super::grid::{VoxelGrid, VoxelIndex};
use super::plane::Plane;
use super::side::{Side, SideMask};
use super::table::RegionTable;
use super::AtlasError;
use crate::coord::is_right_hemisphere;

/// Divisor turning stored integer probabilities into `[0, 1]`.
///
/// Matches the 0..250 encoding of the cytoarchitectonic probability maps.
pub const DEFAULT_PROBABILITY_SCALE: f32 = 250.0;

/// How plane values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AtlasKind {
    /// Voxel values are region codes looked up in the table.
    Discrete {
        /// Codes come from a maximum-probability map: reported as
        /// categorical rather than without probability.
        maximum_probability_map: bool,
    },
    /// Each plane holds one region; voxel values are probabilities.
    Probabilistic {
        /// Divisor for integer planes. Float planes are used as stored.
        scale: f32,
    },
}

impl AtlasKind {
    /// Plain discrete label atlas.
    pub const DISCRETE: AtlasKind = AtlasKind::Discrete {
        maximum_probability_map: false,
    };

    /// Probabilistic atlas with the default 0..250 encoding.
    pub const PROBABILISTIC: AtlasKind = AtlasKind::Probabilistic {
        scale: DEFAULT_PROBABILITY_SCALE,
    };

    pub fn is_probabilistic(&self) -> bool {
        matches!(self, AtlasKind::Probabilistic { .. })
    }
}

impl Default for AtlasKind {
    fn default() -> Self {
        Self::DISCRETE
    }
}

/// A label volume defined in one coordinate space.
#[derive(Debug, Clone)]
pub struct AtlasVolume {
    name: String,
    space: String,
    kind: AtlasKind,
    grid: VoxelGrid,
    planes: Vec<Plane>,
    table: RegionTable,
    side_mask: Option<SideMask>,
    code_bounds: Option<(i32, i32)>,
}

impl AtlasVolume {
    pub fn builder(
        name: impl Into<String>,
        space: impl Into<String>,
        grid: VoxelGrid,
    ) -> AtlasVolumeBuilder {
        AtlasVolumeBuilder {
            name: name.into(),
            space: space.into(),
            grid,
            kind: AtlasKind::default(),
            planes: Vec::new(),
            table: RegionTable::default(),
            side_mask: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn space(&self) -> &str {
        &self.space
    }

    pub fn kind(&self) -> AtlasKind {
        self.kind
    }

    pub fn is_probabilistic(&self) -> bool {
        self.kind.is_probabilistic()
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn table(&self) -> &RegionTable {
        &self.table
    }

    pub fn side_mask(&self) -> Option<&SideMask> {
        self.side_mask.as_ref()
    }

    /// Smallest and largest code in the region table.
    pub fn code_bounds(&self) -> Option<(i32, i32)> {
        self.code_bounds
    }

    /// Cheap pre-check before any table lookup: nonzero and within bounds.
    #[inline]
    pub fn accepts_code(&self, code: i32) -> bool {
        match self.code_bounds {
            Some((min, max)) => code != 0 && code >= min && code <= max,
            None => false,
        }
    }

    /// Hemisphere of a voxel: side mask when attached, else the x sign.
    pub fn voxel_side(&self, ijk: VoxelIndex) -> Side {
        if let Some(mask) = &self.side_mask {
            return mask.side_at(self.grid.linear(ijk));
        }
        if is_right_hemisphere(self.grid.voxel_center(ijk).x) {
            Side::Right
        } else {
            Side::Left
        }
    }

    /// Divisor turning a value of `plane` into a probability.
    pub fn probability_scale(&self, plane: &Plane) -> f32 {
        match self.kind {
            AtlasKind::Probabilistic { scale } if !plane.data().is_float() => scale,
            _ => 1.0,
        }
    }
}

/// Validating builder for [`AtlasVolume`].
#[derive(Debug)]
pub struct AtlasVolumeBuilder {
    name: String,
    space: String,
    grid: VoxelGrid,
    kind: AtlasKind,
    planes: Vec<Plane>,
    table: RegionTable,
    side_mask: Option<SideMask>,
}

impl AtlasVolumeBuilder {
    pub fn kind(mut self, kind: AtlasKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn plane(mut self, plane: Plane) -> Self {
        self.planes.push(plane);
        self
    }

    pub fn planes(mut self, planes: impl IntoIterator<Item = Plane>) -> Self {
        self.planes.extend(planes);
        self
    }

    pub fn table(mut self, table: RegionTable) -> Self {
        self.table = table;
        self
    }

    pub fn side_mask(mut self, mask: SideMask) -> Self {
        self.side_mask = Some(mask);
        self
    }

    pub fn build(self) -> Result<AtlasVolume, AtlasError> {
        if self.name.trim().is_empty() {
            return Err(AtlasError::EmptyName);
        }
        if self.planes.is_empty() {
            return Err(AtlasError::NoPlanes(self.name));
        }

        let expected = self.grid.len();
        for (index, plane) in self.planes.iter().enumerate() {
            if plane.len() != expected {
                return Err(AtlasError::PlaneSize {
                    atlas: self.name,
                    plane: index,
                    expected,
                    actual: plane.len(),
                });
            }
        }

        if let Some(mask) = &self.side_mask {
            if mask.len() != expected {
                return Err(AtlasError::SideMaskSize {
                    atlas: self.name,
                    expected,
                    actual: mask.len(),
                });
            }
        }

        if let AtlasKind::Probabilistic { scale } = self.kind {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(AtlasError::InvalidScale {
                    atlas: self.name,
                    scale,
                });
            }
        }

        let code_bounds = self.table.code_bounds();
        if code_bounds.is_none() {
            tracing::warn!(atlas = %self.name, "Atlas has an empty region table");
        }

        Ok(AtlasVolume {
            name: self.name,
            space: self.space,
            kind: self.kind,
            grid: self.grid,
            planes: self.planes,
            table: self.table,
            side_mask: self.side_mask,
            code_bounds,
        })
    }
}
