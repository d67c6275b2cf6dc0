//! Radius-bounded label search around a centre voxel.

use serde::Serialize;

use super::offsets::OffsetTable;
use crate::atlas::{AtlasVolume, VoxelIndex};

/// A labeled code found near the centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub code: i32,
    /// Rounded distance in voxels; 0 for the centre.
    pub radius: u32,
    /// Voxel where the code was first seen.
    pub voxel: VoxelIndex,
}

/// Result of one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NeighborhoodHits {
    /// Distinct codes, non-decreasing in radius.
    pub findings: Vec<Finding>,
    /// The result cap was reached; more regions may lie within the radius.
    pub truncated: bool,
    /// Codes within bounds but missing from the region table, in the order
    /// first seen. These never take a result slot.
    pub unlabeled: Vec<i32>,
}

impl NeighborhoodHits {
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }
}

/// Walks the offset table outward from `center` on one plane.
///
/// The centre is checked first, then offsets in table order. Background (0),
/// codes already found, codes outside the volume's code bounds and codes
/// without a table entry are skipped. The walk stops once `max_find` named
/// codes are collected; a `max_find` of 0 yields nothing.
pub fn search(
    volume: &AtlasVolume,
    plane: usize,
    center: VoxelIndex,
    offsets: &OffsetTable,
    max_find: usize,
) -> NeighborhoodHits {
    let mut hits = NeighborhoodHits::default();
    let Some(plane) = volume.planes().get(plane) else {
        return hits;
    };
    if max_find == 0 {
        return hits;
    }

    let grid = volume.grid();
    let consider = |voxel: VoxelIndex, radius: u32, hits: &mut NeighborhoodHits| -> bool {
        let code = plane.code_at(grid.linear(voxel));
        if code == 0 || hits.findings.iter().any(|f| f.code == code) {
            return false;
        }
        if !volume.accepts_code(code) {
            return false;
        }
        if !volume.table().has_code(code) {
            if !hits.unlabeled.contains(&code) {
                hits.unlabeled.push(code);
            }
            return false;
        }
        hits.findings.push(Finding {
            code,
            radius,
            voxel,
        });
        hits.findings.len() >= max_find
    };

    if consider(center, 0, &mut hits) {
        hits.truncated = true;
        return hits;
    }

    for offset in offsets.offsets() {
        let Some(voxel) = grid.offset(center, offset.delta) else {
            continue;
        };
        if consider(voxel, offset.radius, &mut hits) {
            hits.truncated = true;
            break;
        }
    }

    hits
}
