//! Query results and zone aggregation
//!
//! A [`Query`] holds one [`Zone`] per search radius level, ascending by
//! level, plus the [`AtlasDiagnostic`]s explaining anything skipped. Zones
//! are filled through a [`ZoneAggregator`]:
//!
//! 1. `get_or_create_zone(level)` finds the zone or prepares a detached one
//! 2. `append(handle, entry)` adds one entry
//! 3. `attach(handle)` inserts a detached zone (idempotent)
//! 4. `finish()` stable-sorts zones by level
//!
//! An empty query is a valid "no regions found" result.

mod aggregator;
mod diagnostic;
mod result;
mod zone;

pub use aggregator::{ZoneAggregator, ZoneHandle};
pub use diagnostic::AtlasDiagnostic;
pub use result::Query;
pub use zone::{Probability, Zone, ZoneEntry, PROBABILITY_MPM, PROBABILITY_UNDEFINED};
