//! Voxel grid geometry.

use serde::Serialize;

use super::AtlasError;
use crate::coord::Vec3;

/// Integer voxel index `(i, j, k)`.
pub type VoxelIndex = [usize; 3];

/// Mapping between voxel indices and RAI millimetres.
///
/// Voxel `(i, j, k)` sits at `origin + (i·dx, j·dy, k·dz)`. Spacing may be
/// negative per axis; it may not be zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoxelGrid {
    dims: [usize; 3],
    origin: Vec3,
    spacing: Vec3,
}

impl VoxelGrid {
    pub fn new(dims: [usize; 3], origin: Vec3, spacing: Vec3) -> Result<Self, AtlasError> {
        if dims.iter().any(|&n| n == 0) {
            return Err(AtlasError::EmptyGrid { dims });
        }
        if !origin.is_finite()
            || !spacing.is_finite()
            || spacing.x == 0.0
            || spacing.y == 0.0
            || spacing.z == 0.0
        {
            return Err(AtlasError::InvalidSpacing { spacing });
        }
        Ok(Self {
            dims,
            origin,
            spacing,
        })
    }

    /// Unit-spaced grid centred on the origin.
    pub fn centered(dims: [usize; 3]) -> Result<Self, AtlasError> {
        let half = |n: usize| -((n as f64 - 1.0) / 2.0);
        Self::new(
            dims,
            Vec3::new(half(dims[0]), half(dims[1]), half(dims[2])),
            Vec3::new(1.0, 1.0, 1.0),
        )
    }

    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn spacing(&self) -> Vec3 {
        self.spacing
    }

    /// Total voxel count.
    pub fn len(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Linear index, x fastest.
    #[inline]
    pub fn linear(&self, ijk: VoxelIndex) -> usize {
        ijk[0] + ijk[1] * self.dims[0] + ijk[2] * self.dims[0] * self.dims[1]
    }

    /// Inverse of [`linear`](Self::linear).
    pub fn unlinear(&self, index: usize) -> VoxelIndex {
        let nxy = self.dims[0] * self.dims[1];
        let k = index / nxy;
        let rem = index % nxy;
        [rem % self.dims[0], rem / self.dims[0], k]
    }

    /// Applies a signed offset, returning `None` outside the grid.
    #[inline]
    pub fn offset(&self, ijk: VoxelIndex, delta: [i32; 3]) -> Option<VoxelIndex> {
        let mut out = [0usize; 3];
        for axis in 0..3 {
            let v = ijk[axis] as i64 + delta[axis] as i64;
            if v < 0 || v >= self.dims[axis] as i64 {
                return None;
            }
            out[axis] = v as usize;
        }
        Some(out)
    }

    /// Centre of a voxel in RAI millimetres.
    pub fn voxel_center(&self, ijk: VoxelIndex) -> Vec3 {
        Vec3::new(
            self.origin.x + ijk[0] as f64 * self.spacing.x,
            self.origin.y + ijk[1] as f64 * self.spacing.y,
            self.origin.z + ijk[2] as f64 * self.spacing.z,
        )
    }

    /// Nearest voxel to `p`, or `None` when it falls outside the grid.
    pub fn nearest_voxel(&self, p: Vec3) -> Option<VoxelIndex> {
        if !p.is_finite() {
            return None;
        }
        let rel = p - self.origin;
        let fractional = [
            rel.x / self.spacing.x,
            rel.y / self.spacing.y,
            rel.z / self.spacing.z,
        ];
        let mut out = [0usize; 3];
        for axis in 0..3 {
            let v = fractional[axis].round();
            if v < 0.0 || v >= self.dims[axis] as f64 {
                return None;
            }
            out[axis] = v as usize;
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_dims() {
        assert!(matches!(
            VoxelGrid::new([0, 2, 2], Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0)),
            Err(AtlasError::EmptyGrid { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_spacing() {
        assert!(matches!(
            VoxelGrid::new([2, 2, 2], Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0)),
            Err(AtlasError::InvalidSpacing { .. })
        ));
    }

    #[test]
    fn test_linear_round_trip() {
        let grid = VoxelGrid::centered([4, 5, 6]).unwrap();
        assert_eq!(grid.len(), 120);
        for index in [0, 1, 4, 19, 20, 119] {
            assert_eq!(grid.linear(grid.unlinear(index)), index);
        }
        assert_eq!(grid.linear([1, 2, 3]), 1 + 2 * 4 + 3 * 20);
    }

    #[test]
    fn test_centered_grid() {
        let grid = VoxelGrid::centered([5, 5, 5]).unwrap();
        assert_eq!(grid.voxel_center([2, 2, 2]), Vec3::ZERO);
        assert_eq!(grid.nearest_voxel(Vec3::new(0.4, -0.4, 1.2)), Some([2, 2, 3]));
    }

    #[test]
    fn test_nearest_voxel_outside() {
        let grid = VoxelGrid::centered([5, 5, 5]).unwrap();
        assert_eq!(grid.nearest_voxel(Vec3::new(10.0, 0.0, 0.0)), None);
        assert_eq!(grid.nearest_voxel(Vec3::new(-2.6, 0.0, 0.0)), None);
        assert_eq!(grid.nearest_voxel(Vec3::new(f64::NAN, 0.0, 0.0)), None);
    }

    #[test]
    fn test_negative_spacing() {
        // x runs from +10 down in 2 mm steps
        let grid = VoxelGrid::new(
            [11, 1, 1],
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(-2.0, 1.0, 1.0),
        )
        .unwrap();
        assert_eq!(grid.nearest_voxel(Vec3::new(6.0, 0.0, 0.0)), Some([2, 0, 0]));
        assert_eq!(grid.voxel_center([10, 0, 0]), Vec3::new(-10.0, 0.0, 0.0));
    }

    #[test]
    fn test_offset_bounds() {
        let grid = VoxelGrid::centered([3, 3, 3]).unwrap();
        assert_eq!(grid.offset([1, 1, 1], [1, -1, 0]), Some([2, 0, 1]));
        assert_eq!(grid.offset([0, 1, 1], [-1, 0, 0]), None);
        assert_eq!(grid.offset([2, 1, 1], [1, 0, 0]), None);
    }
}
