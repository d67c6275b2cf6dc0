//! Per-atlas diagnostics recorded during a lookup.

use std::fmt;

use serde::Serialize;

/// Something a lookup skipped or cut short.
///
/// None of these fail the lookup; they explain gaps in the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AtlasDiagnostic {
    /// No transform chain from the query space to the atlas space.
    Unreachable {
        atlas: String,
        source_space: String,
        target_space: String,
    },
    /// The transformed centre falls outside the atlas grid.
    OutsideGrid { atlas: String },
    /// The volume could not be obtained.
    LoadFailed { atlas: String, reason: String },
    /// A code within bounds has no name in the region table.
    UnlabeledCode { atlas: String, code: i32 },
    /// The search reached its result cap on one plane.
    Truncated {
        atlas: String,
        plane: usize,
        max_find: usize,
    },
    /// A probabilistic plane label matches no table entry.
    UnmatchedPlane {
        atlas: String,
        plane: usize,
        label: String,
    },
    /// More than one zone exists for a level.
    DuplicateZone { level: i32 },
}

impl AtlasDiagnostic {
    /// Atlas the diagnostic concerns, if any.
    pub fn atlas(&self) -> Option<&str> {
        match self {
            AtlasDiagnostic::Unreachable { atlas, .. }
            | AtlasDiagnostic::OutsideGrid { atlas }
            | AtlasDiagnostic::LoadFailed { atlas, .. }
            | AtlasDiagnostic::UnlabeledCode { atlas, .. }
            | AtlasDiagnostic::Truncated { atlas, .. }
            | AtlasDiagnostic::UnmatchedPlane { atlas, .. } => Some(atlas),
            AtlasDiagnostic::DuplicateZone { .. } => None,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, AtlasDiagnostic::Unreachable { .. })
    }
}

impl fmt::Display for AtlasDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtlasDiagnostic::Unreachable {
                atlas,
                source_space,
                target_space,
            } => write!(
                f,
                "{}: no transform from {} to {}",
                atlas, source_space, target_space
            ),
            AtlasDiagnostic::OutsideGrid { atlas } => {
                write!(f, "{}: coordinate outside the atlas grid", atlas)
            }
            AtlasDiagnostic::LoadFailed { atlas, reason } => {
                write!(f, "{}: not loaded ({})", atlas, reason)
            }
            AtlasDiagnostic::UnlabeledCode { atlas, code } => {
                write!(f, "{}: no label for code {}", atlas, code)
            }
            AtlasDiagnostic::Truncated {
                atlas,
                plane,
                max_find,
            } => write!(
                f,
                "{}: plane {} stopped at {} regions, more may exist",
                atlas, plane, max_find
            ),
            AtlasDiagnostic::UnmatchedPlane {
                atlas,
                plane,
                label,
            } => write!(
                f,
                "{}: plane {} label '{}' matches no region",
                atlas, plane, label
            ),
            AtlasDiagnostic::DuplicateZone { level } => {
                write!(f, "more than one zone at level {}", level)
            }
        }
    }
}
