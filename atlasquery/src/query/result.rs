//! The Query: zones from every atlas for one coordinate.

use serde::Serialize;

use super::diagnostic::AtlasDiagnostic;
use super::zone::Zone;
use crate::coord::AtlasCoordinate;

/// Radius-ordered result of one coordinate lookup.
///
/// At most one zone exists per level once built through a
/// [`ZoneAggregator`](super::ZoneAggregator).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Query {
    #[serde(skip_serializing_if = "Option::is_none")]
    coordinate: Option<AtlasCoordinate>,
    pub(crate) zones: Vec<Zone>,
    pub(crate) diagnostics: Vec<AtlasDiagnostic>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty query for a coordinate.
    pub fn for_coordinate(coordinate: AtlasCoordinate) -> Self {
        Self {
            coordinate: Some(coordinate),
            ..Self::default()
        }
    }

    pub fn coordinate(&self) -> Option<&AtlasCoordinate> {
        self.coordinate.as_ref()
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Zone at `level`, if any.
    pub fn zone(&self, level: i32) -> Option<&Zone> {
        self.zones.iter().find(|z| z.level() == level)
    }

    /// True when no region was found in any atlas.
    pub fn is_empty(&self) -> bool {
        self.zones.iter().all(Zone::is_empty)
    }

    /// Total number of entries across zones.
    pub fn entry_count(&self) -> usize {
        self.zones.iter().map(Zone::len).sum()
    }

    pub fn diagnostics(&self) -> &[AtlasDiagnostic] {
        &self.diagnostics
    }

    /// Atlases recorded as unreachable from the query space.
    pub fn unreachable_atlases(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter(|d| d.is_unreachable())
            .filter_map(AtlasDiagnostic::atlas)
            .collect()
    }

    /// True when zone levels ascend strictly.
    pub fn is_sorted(&self) -> bool {
        self.zones.windows(2).all(|w| w[0].level() < w[1].level())
    }
}
