//! Region tables: integer codes to region names.

use serde::Serialize;

use super::label::{clean_label, label_side, strip_side};
use super::side::Side;

/// One row of a region table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionEntry {
    pub code: i32,
    pub name: String,
    /// Label of the probabilistic plane holding this region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plane_label: Option<String>,
}

impl RegionEntry {
    pub fn new(code: i32, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            plane_label: None,
        }
    }

    pub fn with_plane_label(mut self, label: impl Into<String>) -> Self {
        self.plane_label = Some(label.into());
        self
    }

    /// Name without trailing padding.
    pub fn clean_name(&self) -> &str {
        clean_label(&self.name)
    }
}

/// Ordered list of region entries.
///
/// Codes are not unique in general. Tables flagged with duplicate left/right
/// entries list a left and a right structure under the same code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegionTable {
    entries: Vec<RegionEntry>,
    duplicate_lr: bool,
}

impl RegionTable {
    pub fn new(entries: Vec<RegionEntry>) -> Self {
        Self {
            entries,
            duplicate_lr: false,
        }
    }

    /// Builds a table from `(code, name)` pairs.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (i32, S)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(code, name)| RegionEntry::new(code, name))
                .collect(),
        )
    }

    /// Marks the table as listing left/right structures under shared codes.
    pub fn with_duplicate_lr(mut self, duplicate_lr: bool) -> Self {
        self.duplicate_lr = duplicate_lr;
        self
    }

    pub fn has_duplicate_lr(&self) -> bool {
        self.duplicate_lr
    }

    pub fn entries(&self) -> &[RegionEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&RegionEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Smallest and largest code in the table.
    pub fn code_bounds(&self) -> Option<(i32, i32)> {
        let min = self.entries.iter().map(|e| e.code).min()?;
        let max = self.entries.iter().map(|e| e.code).max()?;
        Some((min, max))
    }

    pub fn has_code(&self, code: i32) -> bool {
        self.entries.iter().any(|e| e.code == code)
    }

    /// Entries carrying `code`, with their table index, in table order.
    pub fn with_code(&self, code: i32) -> impl Iterator<Item = (usize, &RegionEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.code == code)
    }

    /// First entry carrying `code`.
    pub fn first_with_code(&self, code: i32) -> Option<&RegionEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    /// Entry whose plane label matches `plane_label` exactly after cleaning.
    pub fn for_plane_label(&self, plane_label: &str) -> Option<&RegionEntry> {
        self.entries.iter().find(|e| {
            e.plane_label
                .as_deref()
                .is_some_and(|label| clean_label(label) == plane_label)
        })
    }

    /// Name for a code found at a voxel on `side`.
    ///
    /// Duplicate left/right tables pick the entry naming that side, falling
    /// back to the first entry; other tables always use the first entry.
    pub fn name_for_side(&self, code: i32, side: Side) -> Option<&str> {
        if self.duplicate_lr && side.is_lateral() {
            if let Some((_, entry)) = self
                .with_code(code)
                .find(|(_, e)| label_side(e.clean_name()) == side)
            {
                return Some(entry.clean_name());
            }
        }
        self.first_with_code(code).map(RegionEntry::clean_name)
    }

    /// Side-independent display name for a code.
    ///
    /// For duplicate left/right tables: a single entry loses its side word,
    /// a left/right pair collapses to the shared name, anything else is the
    /// names joined with `-AND-`.
    pub fn display_name(&self, code: i32) -> Option<String> {
        if !self.duplicate_lr {
            return self
                .first_with_code(code)
                .map(|e| e.clean_name().to_string());
        }

        let found: Vec<&str> = self.with_code(code).map(|(_, e)| e.clean_name()).collect();
        match found.as_slice() {
            [] => None,
            [only] => Some(strip_side(only).to_string()),
            [a, b] if strip_side(a) == strip_side(b) => Some(strip_side(a).to_string()),
            names => Some(names.join("-AND-")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lr_table() -> RegionTable {
        RegionTable::from_pairs([
            (0, "Background"),
            (11, "Left Hippocampus...."),
            (11, "Right Hippocampus..."),
            (12, "Left Amygdala"),
            (13, "Left Insula"),
            (13, "Right Cuneus"),
            (13, "Left Caudate"),
        ])
        .with_duplicate_lr(true)
    }

    #[test]
    fn test_code_bounds() {
        assert_eq!(lr_table().code_bounds(), Some((0, 13)));
        assert_eq!(RegionTable::default().code_bounds(), None);
    }

    #[test]
    fn test_with_code_in_table_order() {
        let table = lr_table();
        let indices: Vec<usize> = table.with_code(11).map(|(i, _)| i).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn test_display_name_pair_collapses() {
        assert_eq!(lr_table().display_name(11), Some("Hippocampus".to_string()));
    }

    #[test]
    fn test_display_name_single_drops_side() {
        assert_eq!(lr_table().display_name(12), Some("Amygdala".to_string()));
    }

    #[test]
    fn test_display_name_many_joined() {
        assert_eq!(
            lr_table().display_name(13),
            Some("Left Insula-AND-Right Cuneus-AND-Left Caudate".to_string())
        );
    }

    #[test]
    fn test_display_name_plain_table() {
        let table = RegionTable::from_pairs([(5, "Left Putamen..")]);
        assert_eq!(table.display_name(5), Some("Left Putamen".to_string()));
        assert_eq!(table.display_name(6), None);
    }

    #[test]
    fn test_name_for_side() {
        let table = lr_table();
        assert_eq!(table.name_for_side(11, Side::Right), Some("Right Hippocampus"));
        assert_eq!(table.name_for_side(11, Side::Left), Some("Left Hippocampus"));
        assert_eq!(
            table.name_for_side(11, Side::Unknown),
            Some("Left Hippocampus"),
            "unknown side should fall back to the first entry"
        );
        assert_eq!(table.name_for_side(12, Side::Right), Some("Left Amygdala"));
        assert_eq!(table.name_for_side(99, Side::Left), None);
    }

    #[test]
    fn test_for_plane_label() {
        let table = RegionTable::new(vec![
            RegionEntry::new(1, "Area 4a").with_plane_label("Area_4a..."),
            RegionEntry::new(2, "Area 4p").with_plane_label("Area_4p"),
        ]);
        assert_eq!(table.for_plane_label("Area_4a").map(|e| e.code), Some(1));
        assert_eq!(table.for_plane_label("Area_4p").map(|e| e.code), Some(2));
        assert!(table.for_plane_label("Area_4").is_none());
    }
}
