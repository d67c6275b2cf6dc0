//! Coordinate space graph
//!
//! Named coordinate spaces are the vertices of a small directed graph whose
//! edges carry [`Transform`]s. A [`TransformChain`] is the shortest sequence
//! of edges between two spaces, found by breadth-first search in edge
//! declaration order.
//!
//! # Transforms
//!
//! A transform is one or more [`TransformStep`]s:
//!
//! - `Affine`: a 3×3 matrix plus translation, with a backward map that
//!   defaults to the exact inverse
//! - `Piecewise`: ordered [`WarpPiece`]s with validity boxes. Forward picks
//!   the first piece whose *output* is inside its box, backward the first
//!   piece whose *input* is. The last piece is the fallback in both cases.
//!
//! Piecewise round trips are approximate by construction.
//!
//! # Example
//!
//! ```
//! use atlasquery::coord::Vec3;
//! use atlasquery::space::{SpaceGraph, TransformStep, MNI_ANAT_TO_MNI};
//!
//! let graph = SpaceGraph::builder()
//!     .space("MNI_ANAT").unwrap()
//!     .space("MNI").unwrap()
//!     .edge("MNI_ANAT", "MNI", MNI_ANAT_TO_MNI).unwrap()
//!     .build();
//!
//! let chain = graph.find_chain("MNI", "MNI_ANAT").unwrap();
//! assert_eq!(chain.apply(Vec3::new(0.0, 0.0, 0.0)), Some(Vec3::new(0.0, 4.0, 5.0)));
//! ```

mod chain;
mod graph;
mod transform;

pub use chain::{ChainLink, Direction, TransformChain};
pub use graph::{SpaceGraph, SpaceGraphBuilder};
pub use transform::{AffineMap, Transform, TransformStep, WarpPiece};

use thiserror::Error;

/// Offset from MNI anatomical coordinates to MNI coordinates (RAI mm).
pub const MNI_ANAT_TO_MNI: TransformStep = TransformStep::Affine {
    forward: AffineMap {
        matrix: AffineMap::IDENTITY.matrix,
        translation: crate::coord::Vec3::new(0.0, -4.0, -5.0),
    },
    backward: AffineMap {
        matrix: AffineMap::IDENTITY.matrix,
        translation: crate::coord::Vec3::new(0.0, 4.0, 5.0),
    },
};

/// Errors raised while declaring spaces and transforms.
#[derive(Debug, Error)]
pub enum SpaceError {
    #[error("Coordinate space name is empty")]
    EmptyName,

    #[error("Coordinate space '{0}' declared twice")]
    DuplicateSpace(String),

    #[error("Unknown coordinate space '{0}'")]
    UnknownSpace(String),

    #[error("Edge from '{0}' to itself")]
    SelfEdge(String),

    #[error("Transform has no steps")]
    EmptyTransform,

    #[error("Affine matrix is singular (determinant {determinant})")]
    SingularMatrix { determinant: f64 },
}
