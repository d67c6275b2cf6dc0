//! Folding one atlas's findings into a query.

use crate::atlas::{AtlasVolume, VoxelIndex};
use crate::config::QueryConfig;
use crate::query::{AtlasDiagnostic, Probability, ZoneAggregator, ZoneEntry};
use crate::search::{search, OffsetTable};

/// Name used for a probabilistic plane without a label.
pub(super) const NO_LABEL: &str = "No Label";
/// Name used for a probabilistic plane whose label is empty.
pub(super) const EMPTY_LABEL: &str = "Empty Label";

/// Runs the neighborhood search on every plane of a discrete atlas.
pub(super) fn fold_discrete(
    volume: &AtlasVolume,
    center: VoxelIndex,
    offsets: &OffsetTable,
    config: &QueryConfig,
    maximum_probability_map: bool,
    aggregator: &mut ZoneAggregator<'_>,
) {
    let probability = if maximum_probability_map {
        Probability::MaximumProbabilityMap
    } else {
        Probability::Undefined
    };

    for plane in 0..volume.planes().len() {
        let hits = search(volume, plane, center, offsets, config.max_find());

        if hits.truncated {
            if config.warn_on_truncation() {
                tracing::warn!(
                    atlas = %volume.name(),
                    plane,
                    max_find = config.max_find(),
                    "Neighborhood search reached its result cap"
                );
            } else {
                tracing::debug!(
                    atlas = %volume.name(),
                    plane,
                    max_find = config.max_find(),
                    "Neighborhood search reached its result cap"
                );
            }
            aggregator.record(AtlasDiagnostic::Truncated {
                atlas: volume.name().to_string(),
                plane,
                max_find: config.max_find(),
            });
        }

        for &code in &hits.unlabeled {
            tracing::warn!(
                atlas = %volume.name(),
                code,
                "Code within bounds has no region name"
            );
            aggregator.record(AtlasDiagnostic::UnlabeledCode {
                atlas: volume.name().to_string(),
                code,
            });
        }

        for finding in &hits.findings {
            let side = volume.voxel_side(finding.voxel);
            // Findings only carry codes present in the table
            let Some(name) = volume.table().name_for_side(finding.code, side) else {
                continue;
            };

            let level = i32::try_from(finding.radius).unwrap_or(i32::MAX);
            aggregator.add(
                level,
                ZoneEntry::new(
                    name,
                    volume.name(),
                    Some(finding.code),
                    probability,
                    finding.radius as f32,
                ),
            );
        }
    }
}

/// Reads every plane of a probabilistic atlas at the centre voxel.
///
/// Each nonzero value becomes a level-0 entry named after the region its
/// plane holds.
pub(super) fn fold_probabilistic(
    volume: &AtlasVolume,
    center: VoxelIndex,
    aggregator: &mut ZoneAggregator<'_>,
) {
    let index = volume.grid().linear(center);

    for (plane_index, plane) in volume.planes().iter().enumerate() {
        let value = plane.raw_at(index);
        if value == 0.0 {
            continue;
        }
        let probability = Probability::new(value / volume.probability_scale(plane));

        let (name, code) = match plane.label() {
            None => (NO_LABEL.to_string(), None),
            Some("") => (EMPTY_LABEL.to_string(), None),
            Some(label) => match volume.table().for_plane_label(label) {
                Some(entry) => (entry.clean_name().to_string(), Some(entry.code)),
                None => {
                    tracing::debug!(
                        atlas = %volume.name(),
                        plane = plane_index,
                        label,
                        "Plane label matches no region entry"
                    );
                    aggregator.record(AtlasDiagnostic::UnmatchedPlane {
                        atlas: volume.name().to_string(),
                        plane: plane_index,
                        label: label.to_string(),
                    });
                    (label.to_string(), None)
                }
            },
        };

        aggregator.add(0, ZoneEntry::new(name, volume.name(), code, probability, 0.0));
    }
}
