//! AtlasQuery - "whereami" lookups against labeled brain atlases
//!
//! Given a point in some named coordinate space, this library finds the
//! labeled regions around it in every atlas it can reach, ordered by
//! distance. In the other direction, it resolves free-text region names
//! to atlas codes and builds voxel masks for them.
//!
//! # High-Level API
//!
//! The [`Whereami`] facade wires the space graph, the atlas registry and the
//! lookup caches together:
//!
//! ```ignore
//! use atlasquery::coord::{AtlasCoordinate, Orientation, Vec3};
//! use atlasquery::Whereami;
//!
//! let whereami = Whereami::new(graph, registry);
//!
//! let here = AtlasCoordinate::from_oriented(Vec3::new(-40.0, 20.0, 5.0), &Orientation::LPI, "MNI")?;
//! let query = whereami.locate(&here)?;
//! for zone in query.zones() {
//!     for entry in zone.entries() {
//!         println!("{:>4} {} ({})", zone.level(), entry.name, entry.atlas);
//!     }
//! }
//!
//! let result = whereami.resolve_name("left hippocampus", "TT_Daemon")?;
//! let mask = whereami.region_mask(&whereami.decode("left hippocampus")?, &result.codes(), "TT_Daemon")?;
//! ```
//!
//! Data is supplied by the host: volumes through an
//! [`AtlasSource`](atlas::AtlasSource), spaces and transforms through a
//! [`SpaceGraph`](space::SpaceGraph).

pub mod atlas;
pub mod config;
pub mod coord;
pub mod logging;
pub mod mask;
pub mod matcher;
pub mod query;
pub mod search;
pub mod space;
pub mod whereami;

pub use whereami::{Whereami, WhereamiError};

/// Version of the AtlasQuery library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
