//! Lookup configuration.

use super::defaults::{
    clamp_max_find, clamp_search_radius, DEFAULT_MAX_FIND, DEFAULT_SEARCH_RADIUS,
    DEFAULT_WARN_ON_TRUNCATION,
};

/// Settings for one [`Whereami`](crate::Whereami) engine.
///
/// Out-of-range values never fail: the radius is clamped to
/// [`MAX_SEARCH_RADIUS`](super::MAX_SEARCH_RADIUS) and invalid values fall
/// back to their defaults, each with a warning.
///
/// # Example
///
/// ```
/// use atlasquery::config::QueryConfig;
///
/// let config = QueryConfig::default();
/// assert_eq!(config.max_find(), 9);
/// assert_eq!(config.search_radius(), 7.5);
/// assert!(config.warn_on_truncation());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryConfig {
    /// Distinct codes kept per plane before the search stops
    max_find: usize,
    /// Neighborhood radius in voxels
    search_radius: f32,
    /// Log truncated neighborhoods at warn instead of debug
    warn_on_truncation: bool,
}

impl QueryConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-plane result cap. Default: 9.
    pub fn with_max_find(mut self, max_find: usize) -> Self {
        self.max_find = clamp_max_find(max_find);
        self
    }

    /// Set the search radius. Default: 7.5, ceiling 9.5.
    pub fn with_search_radius(mut self, radius: f32) -> Self {
        self.search_radius = clamp_search_radius(radius);
        self
    }

    pub fn with_truncation_warning(mut self, warn: bool) -> Self {
        self.warn_on_truncation = warn;
        self
    }

    pub fn max_find(&self) -> usize {
        self.max_find
    }

    pub fn search_radius(&self) -> f32 {
        self.search_radius
    }

    pub fn warn_on_truncation(&self) -> bool {
        self.warn_on_truncation
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_find: DEFAULT_MAX_FIND,
            search_radius: DEFAULT_SEARCH_RADIUS,
            warn_on_truncation: DEFAULT_WARN_ON_TRUNCATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_SEARCH_RADIUS;

    #[test]
    fn test_default_config() {
        let config = QueryConfig::default();
        assert_eq!(config.max_find(), DEFAULT_MAX_FIND);
        assert_eq!(config.search_radius(), DEFAULT_SEARCH_RADIUS);
        assert_eq!(config.warn_on_truncation(), DEFAULT_WARN_ON_TRUNCATION);
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(QueryConfig::new(), QueryConfig::default());
    }

    #[test]
    fn test_with_max_find() {
        let config = QueryConfig::new().with_max_find(3);
        assert_eq!(config.max_find(), 3);
        assert_eq!(config.search_radius(), DEFAULT_SEARCH_RADIUS); // Unchanged
    }

    #[test]
    fn test_with_max_find_zero_uses_default() {
        let config = QueryConfig::new().with_max_find(0);
        assert_eq!(config.max_find(), DEFAULT_MAX_FIND);
    }

    #[test]
    fn test_with_search_radius() {
        let config = QueryConfig::new().with_search_radius(4.0);
        assert_eq!(config.search_radius(), 4.0);
        assert_eq!(config.max_find(), DEFAULT_MAX_FIND); // Unchanged
    }

    #[test]
    fn test_search_radius_clamped_to_ceiling() {
        let config = QueryConfig::new().with_search_radius(15.0);
        assert_eq!(config.search_radius(), MAX_SEARCH_RADIUS);
    }

    #[test]
    fn test_negative_radius_uses_default() {
        let config = QueryConfig::new().with_search_radius(-2.0);
        assert_eq!(config.search_radius(), DEFAULT_SEARCH_RADIUS);
    }

    #[test]
    fn test_builder_chain() {
        let config = QueryConfig::new()
            .with_max_find(12)
            .with_search_radius(9.0)
            .with_truncation_warning(false);

        assert_eq!(config.max_find(), 12);
        assert_eq!(config.search_radius(), 9.0);
        assert!(!config.warn_on_truncation());
    }

    #[test]
    fn test_copy_semantics() {
        let config1 = QueryConfig::new().with_max_find(4);
        let config2 = config1; // Copy, not move
        assert_eq!(config1.max_find(), config2.max_find());
    }

    #[test]
    fn test_equality() {
        let config1 = QueryConfig::new().with_search_radius(5.0);
        let config2 = QueryConfig::new().with_search_radius(5.0);
        let config3 = QueryConfig::new().with_search_radius(6.0);

        assert_eq!(config1, config2);
        assert_ne!(config1, config3);
    }

    #[test]
    fn test_debug_impl() {
        let debug_str = format!("{:?}", QueryConfig::new());
        assert!(debug_str.contains("QueryConfig"));
        assert!(debug_str.contains("max_find"));
        assert!(debug_str.contains(&DEFAULT_MAX_FIND.to_string()));
    }
}
