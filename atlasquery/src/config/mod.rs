//! Configuration for whereami lookups.
//!
//! [`QueryConfig`] carries the host's tuning knobs: the per-plane result cap
//! and the neighborhood search radius. Values are plain parameters; the
//! optional INI loader only reads a `[whereami]` section and never touches
//! the atlas registry.
//!
//! # Example
//!
//! ```
//! use atlasquery::config::{QueryConfig, MAX_SEARCH_RADIUS};
//!
//! let config = QueryConfig::new()
//!     .with_max_find(5)
//!     .with_search_radius(12.0);
//!
//! assert_eq!(config.max_find(), 5);
//! assert_eq!(config.search_radius(), MAX_SEARCH_RADIUS);
//! ```
//!
//! # Config file
//!
//! ```ini
//! [whereami]
//! max_find = 9
//! max_search_radius = 7.5
//! warn_on_truncation = true
//! ```

mod defaults;
mod file;
mod parser;
mod query;

pub use defaults::{
    DEFAULT_MAX_FIND, DEFAULT_SEARCH_RADIUS, DEFAULT_WARN_ON_TRUNCATION, MAX_SEARCH_RADIUS,
};
pub use file::ConfigFileError;
pub use query::QueryConfig;
