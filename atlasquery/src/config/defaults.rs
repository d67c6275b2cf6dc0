//! Default values and limits for lookup settings.

/// Default number of distinct codes kept per plane.
pub const DEFAULT_MAX_FIND: usize = 9;

/// Default neighborhood search radius, in voxels.
pub const DEFAULT_SEARCH_RADIUS: f32 = 7.5;

/// Hard ceiling on the search radius.
pub const MAX_SEARCH_RADIUS: f32 = 9.5;

/// Whether truncated neighborhoods are logged at warn level.
pub const DEFAULT_WARN_ON_TRUNCATION: bool = true;

/// Clamps the search radius to `(0, MAX_SEARCH_RADIUS]`, logging a warning
/// whenever the requested value is replaced.
pub(super) fn clamp_search_radius(value: f32) -> f32 {
    if value.is_nan() || value <= 0.0 {
        tracing::warn!(
            requested = value,
            default = DEFAULT_SEARCH_RADIUS,
            "search radius must be positive, using {}",
            DEFAULT_SEARCH_RADIUS
        );
        DEFAULT_SEARCH_RADIUS
    } else if value > MAX_SEARCH_RADIUS {
        tracing::warn!(
            requested = value,
            max = MAX_SEARCH_RADIUS,
            "search radius above maximum, clamping to {}",
            MAX_SEARCH_RADIUS
        );
        MAX_SEARCH_RADIUS
    } else {
        value
    }
}

/// Replaces a zero result cap with the default.
pub(super) fn clamp_max_find(value: usize) -> usize {
    if value == 0 {
        tracing::warn!(
            requested = value,
            default = DEFAULT_MAX_FIND,
            "max_find must be at least 1, using {}",
            DEFAULT_MAX_FIND
        );
        DEFAULT_MAX_FIND
    } else {
        value
    }
}
