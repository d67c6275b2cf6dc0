//! Neighborhood voxel search
//!
//! Finds the distinct region codes nearest to a centre voxel, walking a
//! precomputed list of integer offsets sorted by rounded distance. The list
//! for a given radius is built once and shared through an [`OffsetCache`].
//!
//! Results are capped: a search that reaches its cap reports
//! [`NeighborhoodHits::truncated`] and is not an exhaustive neighborhood.

mod neighborhood;
mod offsets;

pub use neighborhood::{search, Finding, NeighborhoodHits};
pub use offsets::{Offset, OffsetCache, OffsetTable};
