//! Whereami lookups
//!
//! [`Whereami`] ties the pieces together:
//!
//! - **locate**: route a coordinate into every registered atlas's space,
//!   search around it, and fold the findings into a radius-ordered
//!   [`Query`](crate::query::Query)
//! - **resolve_name**: decode free text and rank an atlas's region table
//!   against it
//! - **region_mask**: turn resolved codes back into a voxel mask
//!
//! Per atlas, a lookup goes route → load → centre voxel → search. A failure
//! at any of those steps skips that atlas with a diagnostic; it never fails
//! the whole lookup.

mod error;
mod facade;
mod lookup;

pub use error::WhereamiError;
pub use facade::Whereami;
