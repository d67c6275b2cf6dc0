//! Zones: findings grouped by search radius.

use serde::{Serialize, Serializer};

/// Sentinel written for "no probability defined".
pub const PROBABILITY_UNDEFINED: f32 = -1.0;
/// Sentinel written for maximum-probability-map entries.
pub const PROBABILITY_MPM: f32 = -2.0;

/// Probability attached to a zone entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Probability {
    /// Discrete label atlas: no probability.
    Undefined,
    /// Maximum-probability map: categorical, no float value computed.
    MaximumProbabilityMap,
    /// A probability in `[0, 1]`.
    Value(f32),
}

impl Probability {
    /// Wraps a probability, clamping it into `[0, 1]`.
    ///
    /// NaN becomes [`Probability::Undefined`].
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            tracing::warn!("NaN probability treated as undefined");
            return Probability::Undefined;
        }
        if !(0.0..=1.0).contains(&value) {
            tracing::warn!(value, "Probability outside [0, 1], clamping");
        }
        Probability::Value(value.clamp(0.0, 1.0))
    }

    /// The value, when one is defined.
    pub fn value(self) -> Option<f32> {
        match self {
            Probability::Value(v) => Some(v),
            _ => None,
        }
    }

    /// The float convention used by reports: `-1`, `-2`, or the value.
    pub fn as_sentinel(self) -> f32 {
        match self {
            Probability::Undefined => PROBABILITY_UNDEFINED,
            Probability::MaximumProbabilityMap => PROBABILITY_MPM,
            Probability::Value(v) => v,
        }
    }
}

impl Serialize for Probability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f32(self.as_sentinel())
    }
}

/// One region reported in a zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneEntry {
    pub name: String,
    pub atlas: String,
    /// Region code; `None` when the region has no code in its table.
    pub code: Option<i32>,
    pub probability: Probability,
    /// Distance the region was found at, in voxels.
    pub radius: f32,
}

impl ZoneEntry {
    pub fn new(
        name: impl Into<String>,
        atlas: impl Into<String>,
        code: Option<i32>,
        probability: Probability,
        radius: f32,
    ) -> Self {
        Self {
            name: name.into(),
            atlas: atlas.into(),
            code,
            probability,
            radius,
        }
    }
}

/// All findings at one radius level.
///
/// Entries stay index-aligned by construction: each is one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zone {
    level: i32,
    entries: Vec<ZoneEntry>,
}

impl Zone {
    pub fn new(level: i32) -> Self {
        Self {
            level,
            entries: Vec::new(),
        }
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn entries(&self) -> &[ZoneEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn push(&mut self, entry: ZoneEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn absorb(&mut self, other: Zone) {
        self.entries.extend(other.entries);
    }

    /// Region names in entry order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_sentinels() {
        assert_eq!(Probability::Undefined.as_sentinel(), -1.0);
        assert_eq!(Probability::MaximumProbabilityMap.as_sentinel(), -2.0);
        assert_eq!(Probability::new(0.4).as_sentinel(), 0.4);
        assert_eq!(Probability::Undefined.value(), None);
    }

    #[test]
    fn test_probability_clamped() {
        assert_eq!(Probability::new(1.02), Probability::Value(1.0));
        assert_eq!(Probability::new(-0.5), Probability::Value(0.0));
        assert_eq!(Probability::new(f32::NAN), Probability::Undefined);
    }

    #[test]
    fn test_zone_push_keeps_order() {
        let mut zone = Zone::new(2);
        zone.push(ZoneEntry::new("A", "TT", Some(1), Probability::Undefined, 2.0));
        zone.push(ZoneEntry::new("B", "TT", Some(2), Probability::Undefined, 2.0));
        assert_eq!(zone.level(), 2);
        assert_eq!(zone.names().collect::<Vec<_>>(), vec!["A", "B"]);
    }
}
