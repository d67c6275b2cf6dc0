//! Transform chains: ordered hops between two spaces.

use std::sync::Arc;

use super::transform::Transform;
use crate::coord::Vec3;

/// Direction a declared edge is traversed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Declared source to declared target.
    Forward,
    /// Declared target back to declared source, using the backward maps.
    Inverse,
}

/// One hop of a chain.
#[derive(Debug, Clone)]
pub struct ChainLink {
    pub(crate) transform: Arc<Transform>,
    pub(crate) direction: Direction,
    pub(crate) from: String,
    pub(crate) to: String,
}

impl ChainLink {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn from_space(&self) -> &str {
        &self.from
    }

    pub fn to_space(&self) -> &str {
        &self.to
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    fn apply(&self, p: Vec3) -> Option<Vec3> {
        match self.direction {
            Direction::Forward => self.transform.forward(p),
            Direction::Inverse => self.transform.backward(p),
        }
    }
}

/// Ordered sequence of hops connecting `source` to `target`.
///
/// A chain from a space to itself has no links and applies as identity.
#[derive(Debug, Clone)]
pub struct TransformChain {
    source: String,
    target: String,
    links: Vec<ChainLink>,
}

impl TransformChain {
    pub(crate) fn new(source: String, target: String, links: Vec<ChainLink>) -> Self {
        Self {
            source,
            target,
            links,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    /// Number of hops.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// True when some hop goes through a piecewise warp.
    pub fn is_approximate(&self) -> bool {
        self.links.iter().any(|link| link.transform.has_piecewise())
    }

    /// Applies every hop in sequence.
    ///
    /// `None` is the unreachable-coordinate result: a piecewise step had no
    /// partition to select. Callers must treat it as "atlas does not apply".
    pub fn apply(&self, p: Vec3) -> Option<Vec3> {
        self.links.iter().try_fold(p, |acc, link| link.apply(acc))
    }

    /// Space names visited, source first.
    pub fn route(&self) -> Vec<&str> {
        let mut route = Vec::with_capacity(self.links.len() + 1);
        route.push(self.source.as_str());
        route.extend(self.links.iter().map(|link| link.to.as_str()));
        route
    }
}
