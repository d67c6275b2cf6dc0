//! Precomputed neighborhood offsets.

use std::sync::Arc;

use dashmap::DashMap;

/// One integer voxel offset and its rounded distance from the centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub delta: [i32; 3],
    /// `round(sqrt(di² + dj² + dk²))`
    pub radius: u32,
}

/// Offsets within a radius, ascending by rounded distance.
///
/// The centre itself is not included. Offsets sharing a rounded distance
/// keep their enumeration order (k slowest, i fastest).
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetTable {
    radius: f32,
    offsets: Vec<Offset>,
}

impl OffsetTable {
    /// Enumerates every integer offset with magnitude at most `radius`,
    /// assuming unit voxel spacing.
    pub fn build(radius: f32) -> Self {
        if !(radius.is_finite() && radius > 0.0) {
            return Self {
                radius,
                offsets: Vec::new(),
            };
        }

        let reach = radius.floor() as i32;
        let limit = (radius as f64) * (radius as f64);
        let mut offsets = Vec::new();
        for dk in -reach..=reach {
            for dj in -reach..=reach {
                for di in -reach..=reach {
                    if di == 0 && dj == 0 && dk == 0 {
                        continue;
                    }
                    let squared = (di * di + dj * dj + dk * dk) as f64;
                    if squared > limit {
                        continue;
                    }
                    offsets.push(Offset {
                        delta: [di, dj, dk],
                        radius: squared.sqrt().round() as u32,
                    });
                }
            }
        }

        // Stable: equal radii keep enumeration order
        offsets.sort_by_key(|o| o.radius);

        tracing::trace!(radius, offsets = offsets.len(), "Neighborhood offsets built");
        Self { radius, offsets }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Offset tables keyed by radius, built once on first use.
#[derive(Debug, Default)]
pub struct OffsetCache {
    tables: DashMap<u32, Arc<OffsetTable>>,
}

impl OffsetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table for `radius`, building it if this radius was never requested.
    pub fn get(&self, radius: f32) -> Arc<OffsetTable> {
        let key = radius.to_bits();
        if let Some(table) = self.tables.get(&key) {
            return Arc::clone(table.value());
        }
        let table = Arc::new(OffsetTable::build(radius));
        Arc::clone(self.tables.entry(key).or_insert(table).value())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_radius_has_six_faces() {
        let table = OffsetTable::build(1.0);
        assert_eq!(table.len(), 6);
        assert!(table.offsets().iter().all(|o| o.radius == 1));
    }

    #[test]
    fn test_excludes_centre() {
        let table = OffsetTable::build(2.0);
        assert!(table.offsets().iter().all(|o| o.delta != [0, 0, 0]));
    }

    #[test]
    fn test_sorted_by_rounded_radius() {
        let table = OffsetTable::build(7.5);
        let radii: Vec<u32> = table.offsets().iter().map(|o| o.radius).collect();
        assert!(
            radii.windows(2).all(|w| w[0] <= w[1]),
            "offsets must be non-decreasing in radius"
        );
        assert_eq!(radii.first(), Some(&1));
        // Largest integer d² within 7.5 is 56, sqrt 7.48
        assert_eq!(radii.last(), Some(&7));
    }

    #[test]
    fn test_rounded_radius_values() {
        let table = OffsetTable::build(2.0);
        let diagonal = table
            .offsets()
            .iter()
            .find(|o| o.delta == [1, 1, 1])
            .expect("corner offset within radius 2");
        // sqrt(3) = 1.73 rounds to 2
        assert_eq!(diagonal.radius, 2);
        let edge = table
            .offsets()
            .iter()
            .find(|o| o.delta == [1, 1, 0])
            .unwrap();
        // sqrt(2) = 1.41 rounds to 1
        assert_eq!(edge.radius, 1);
    }

    #[test]
    fn test_equal_radius_keeps_enumeration_order() {
        let table = OffsetTable::build(1.0);
        let deltas: Vec<[i32; 3]> = table.offsets().iter().map(|o| o.delta).collect();
        assert_eq!(
            deltas,
            vec![
                [0, 0, -1],
                [0, -1, 0],
                [-1, 0, 0],
                [1, 0, 0],
                [0, 1, 0],
                [0, 0, 1]
            ]
        );
    }

    #[test]
    fn test_non_positive_radius_is_empty() {
        assert!(OffsetTable::build(0.0).is_empty());
        assert!(OffsetTable::build(-3.0).is_empty());
        assert!(OffsetTable::build(f32::NAN).is_empty());
    }

    #[test]
    fn test_cache_reuses_tables() {
        let cache = OffsetCache::new();
        let a = cache.get(7.5);
        let b = cache.get(7.5);
        assert!(Arc::ptr_eq(&a, &b), "same radius should reuse the table");
        let _ = cache.get(3.0);
        assert_eq!(cache.len(), 2);
    }
}
