//! INI parsing for lookup settings.

use ini::Ini;

use super::file::ConfigFileError;
use super::query::QueryConfig;

const SECTION: &str = "whereami";

/// Parse the `[whereami]` section over the defaults.
pub(super) fn parse_ini(ini: &Ini) -> Result<QueryConfig, ConfigFileError> {
    let mut config = QueryConfig::default();

    let Some(section) = ini.section(Some(SECTION)) else {
        return Ok(config);
    };

    if let Some(v) = section.get("max_find") {
        let parsed: usize = v
            .trim()
            .parse()
            .map_err(|_| invalid("max_find", v, "must be a positive integer"))?;
        config = config.with_max_find(parsed);
    }
    if let Some(v) = section.get("max_search_radius") {
        let parsed: f32 = v
            .trim()
            .parse()
            .map_err(|_| invalid("max_search_radius", v, "must be a number (voxels)"))?;
        config = config.with_search_radius(parsed);
    }
    if let Some(v) = section.get("warn_on_truncation") {
        config = config.with_truncation_warning(parse_bool(v));
    }

    Ok(config)
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: SECTION.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse a boolean value from config.
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}
