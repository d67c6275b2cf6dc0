//! Folding findings into a Query.

use super::diagnostic::AtlasDiagnostic;
use super::result::Query;
use super::zone::{Zone, ZoneEntry};

/// Handle to a zone returned by [`ZoneAggregator::get_or_create_zone`].
#[derive(Debug)]
pub enum ZoneHandle {
    /// A zone already in the query, by position.
    Attached(usize),
    /// A new zone not yet part of the query.
    Detached(Zone),
}

impl ZoneHandle {
    pub fn is_attached(&self) -> bool {
        matches!(self, ZoneHandle::Attached(_))
    }
}

/// Groups entries into zones by level and keeps one zone per level.
///
/// Call [`finish`](Self::finish) once all atlases are folded in to sort the
/// zones by level.
#[derive(Debug)]
pub struct ZoneAggregator<'q> {
    query: &'q mut Query,
}

impl<'q> ZoneAggregator<'q> {
    pub fn new(query: &'q mut Query) -> Self {
        Self { query }
    }

    /// Finds the zone at `level`, or prepares a detached one.
    ///
    /// If several zones share the level, the first is used and the
    /// duplication is reported.
    pub fn get_or_create_zone(&mut self, level: i32) -> ZoneHandle {
        let mut matching = self
            .query
            .zones
            .iter()
            .enumerate()
            .filter(|(_, z)| z.level() == level)
            .map(|(i, _)| i);

        match matching.next() {
            Some(first) => {
                if matching.next().is_some() {
                    tracing::warn!(level, "More than one zone at this level, using the first");
                    self.query
                        .diagnostics
                        .push(AtlasDiagnostic::DuplicateZone { level });
                }
                ZoneHandle::Attached(first)
            }
            None => ZoneHandle::Detached(Zone::new(level)),
        }
    }

    /// Adds one entry to the zone behind `handle`.
    pub fn append(&mut self, handle: &mut ZoneHandle, entry: ZoneEntry) {
        match handle {
            ZoneHandle::Attached(index) => {
                if let Some(zone) = self.query.zones.get_mut(*index) {
                    zone.push(entry);
                }
            }
            ZoneHandle::Detached(zone) => zone.push(entry),
        }
    }

    /// Inserts a detached zone into the query; attached handles are a no-op.
    ///
    /// A detached zone whose level was attached in the meantime is merged
    /// into the existing zone. Returns the zone's position.
    pub fn attach(&mut self, handle: ZoneHandle) -> usize {
        match handle {
            ZoneHandle::Attached(index) => index,
            ZoneHandle::Detached(zone) => {
                let existing = self
                    .query
                    .zones
                    .iter()
                    .position(|z| z.level() == zone.level());
                match existing {
                    Some(index) => {
                        self.query.zones[index].absorb(zone);
                        index
                    }
                    None => {
                        self.query.zones.push(zone);
                        self.query.zones.len() - 1
                    }
                }
            }
        }
    }

    /// Appends one entry at `level` and attaches its zone.
    pub fn add(&mut self, level: i32, entry: ZoneEntry) {
        let mut handle = self.get_or_create_zone(level);
        self.append(&mut handle, entry);
        self.attach(handle);
    }

    /// Records a diagnostic on the query.
    pub fn record(&mut self, diagnostic: AtlasDiagnostic) {
        self.query.diagnostics.push(diagnostic);
    }

    /// Stable-sorts zones by ascending level.
    pub fn finish(self) {
        self.query.zones.sort_by_key(Zone::level);
    }
}
