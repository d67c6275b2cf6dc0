//! Coordinate space graph and its chain cache.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use dashmap::DashMap;

use super::chain::{ChainLink, Direction, TransformChain};
use super::transform::Transform;
use super::SpaceError;

/// A declared edge between two spaces.
#[derive(Debug, Clone)]
struct Edge {
    source: usize,
    target: usize,
    transform: Arc<Transform>,
    invertible: bool,
}

/// Collects spaces and edges, then freezes them into a [`SpaceGraph`].
///
/// Declaration order matters: breadth-first search visits edges in the order
/// they were added, so the first declared route wins among equal-length ones.
#[derive(Debug, Default)]
pub struct SpaceGraphBuilder {
    spaces: Vec<String>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
}

impl SpaceGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a space. Names are unique.
    pub fn space(mut self, name: impl Into<String>) -> Result<Self, SpaceError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SpaceError::EmptyName);
        }
        if self.index.contains_key(&name) {
            return Err(SpaceError::DuplicateSpace(name));
        }
        self.index.insert(name.clone(), self.spaces.len());
        self.spaces.push(name);
        Ok(self)
    }

    /// Declares an edge traversable in both directions.
    pub fn edge(
        self,
        source: &str,
        target: &str,
        transform: impl Into<Transform>,
    ) -> Result<Self, SpaceError> {
        self.push_edge(source, target, transform.into(), true)
    }

    /// Declares an edge usable only from `source` to `target`.
    pub fn one_way_edge(
        self,
        source: &str,
        target: &str,
        transform: impl Into<Transform>,
    ) -> Result<Self, SpaceError> {
        self.push_edge(source, target, transform.into(), false)
    }

    fn push_edge(
        mut self,
        source: &str,
        target: &str,
        transform: Transform,
        invertible: bool,
    ) -> Result<Self, SpaceError> {
        let source_idx = self.lookup(source)?;
        let target_idx = self.lookup(target)?;
        if source_idx == target_idx {
            return Err(SpaceError::SelfEdge(source.to_string()));
        }
        self.edges.push(Edge {
            source: source_idx,
            target: target_idx,
            transform: Arc::new(transform),
            invertible,
        });
        Ok(self)
    }

    fn lookup(&self, name: &str) -> Result<usize, SpaceError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| SpaceError::UnknownSpace(name.to_string()))
    }

    pub fn build(self) -> SpaceGraph {
        // Adjacency lists keep edge declaration order for deterministic BFS
        let mut adjacency: Vec<Vec<(usize, usize, Direction)>> = vec![Vec::new(); self.spaces.len()];
        for (edge_idx, edge) in self.edges.iter().enumerate() {
            adjacency[edge.source].push((edge.target, edge_idx, Direction::Forward));
            if edge.invertible {
                adjacency[edge.target].push((edge.source, edge_idx, Direction::Inverse));
            }
        }

        tracing::debug!(
            spaces = self.spaces.len(),
            edges = self.edges.len(),
            "Coordinate space graph built"
        );

        SpaceGraph {
            spaces: self.spaces,
            index: self.index,
            edges: self.edges,
            adjacency,
            chains: DashMap::new(),
        }
    }
}

/// Immutable graph of named coordinate spaces.
///
/// Chains are searched lazily and cached per (source, target) pair. The graph
/// never changes after [`SpaceGraphBuilder::build`], so cached entries are
/// never invalidated; concurrent first lookups may both search, which only
/// repeats work.
pub struct SpaceGraph {
    spaces: Vec<String>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<(usize, usize, Direction)>>,
    chains: DashMap<(usize, usize), Option<Arc<TransformChain>>>,
}

impl SpaceGraph {
    pub fn builder() -> SpaceGraphBuilder {
        SpaceGraphBuilder::new()
    }

    /// A graph without spaces; every lookup is unreachable.
    pub fn empty() -> Self {
        SpaceGraphBuilder::new().build()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Declared space names in declaration order.
    pub fn spaces(&self) -> &[String] {
        &self.spaces
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of (source, target) pairs searched so far.
    pub fn cached_chains(&self) -> usize {
        self.chains.len()
    }

    /// Finds the shortest chain from `source` to `target`.
    ///
    /// `None` means unreachable, including when either name is not declared.
    pub fn find_chain(&self, source: &str, target: &str) -> Option<Arc<TransformChain>> {
        let (Some(&from), Some(&to)) = (self.index.get(source), self.index.get(target)) else {
            tracing::debug!(source, target, "Unknown coordinate space, no chain");
            return None;
        };

        if let Some(cached) = self.chains.get(&(from, to)) {
            return cached.value().clone();
        }

        let chain = self.search(from, to).map(Arc::new);
        match &chain {
            Some(found) => tracing::trace!(
                source,
                target,
                hops = found.len(),
                "Transform chain found"
            ),
            None => tracing::debug!(source, target, "No transform chain between spaces"),
        }
        self.chains.insert((from, to), chain.clone());
        chain
    }

    /// Breadth-first search; the first visit of a node fixes its parent.
    fn search(&self, from: usize, to: usize) -> Option<TransformChain> {
        if from == to {
            return Some(TransformChain::new(
                self.spaces[from].clone(),
                self.spaces[to].clone(),
                Vec::new(),
            ));
        }

        let mut parent: Vec<Option<(usize, usize, Direction)>> = vec![None; self.spaces.len()];
        let mut visited = vec![false; self.spaces.len()];
        let mut queue = VecDeque::new();
        visited[from] = true;
        queue.push_back(from);

        while let Some(node) = queue.pop_front() {
            for &(next, edge_idx, direction) in &self.adjacency[node] {
                if visited[next] {
                    continue;
                }
                visited[next] = true;
                parent[next] = Some((node, edge_idx, direction));
                if next == to {
                    return Some(self.assemble(from, to, &parent));
                }
                queue.push_back(next);
            }
        }

        None
    }

    fn assemble(
        &self,
        from: usize,
        to: usize,
        parent: &[Option<(usize, usize, Direction)>],
    ) -> TransformChain {
        let mut links = Vec::new();
        let mut node = to;
        while node != from {
            let Some((prev, edge_idx, direction)) = parent[node] else {
                break;
            };
            links.push(ChainLink {
                transform: Arc::clone(&self.edges[edge_idx].transform),
                direction,
                from: self.spaces[prev].clone(),
                to: self.spaces[node].clone(),
            });
            node = prev;
        }
        links.reverse();
        TransformChain::new(self.spaces[from].clone(), self.spaces[to].clone(), links)
    }
}

impl std::fmt::Debug for SpaceGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpaceGraph")
            .field("spaces", &self.spaces)
            .field("edges", &self.edges.len())
            .field("cached_chains", &self.chains.len())
            .finish()
    }
}
