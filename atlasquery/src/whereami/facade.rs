//! The lookup engine facade.

use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::instrument;

use super::error::WhereamiError;
use super::lookup::{fold_discrete, fold_probabilistic};
use crate::atlas::{AtlasDescriptor, AtlasKind, AtlasRegistry, AtlasVolume};
use crate::config::QueryConfig;
use crate::coord::{AtlasCoordinate, CoordError, Vec3};
use crate::mask::{self, MaskError, VoxelMask};
use crate::matcher::{self, ChunkedTable, DecodeError, MatchKind, RegionSpec, SearchResult};
use crate::query::{AtlasDiagnostic, Query, ZoneAggregator};
use crate::search::OffsetCache;
use crate::space::SpaceGraph;

/// Coordinate and name lookups across a registry of atlases.
///
/// Owns the space graph, the atlas registry and the lazily built caches
/// (transform chains, offset tables, chunked region tables). All methods
/// take `&self`; the engine can be shared between threads.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use atlasquery::atlas::{AtlasRegistry, AtlasVolume, InMemoryAtlasSource, Plane,
///     RegionTable, VoxelGrid};
/// use atlasquery::coord::{AtlasCoordinate, Vec3};
/// use atlasquery::space::SpaceGraph;
/// use atlasquery::Whereami;
///
/// let grid = VoxelGrid::centered([3, 3, 3]).unwrap();
/// let mut values = vec![0u8; grid.len()];
/// values[grid.linear([1, 1, 1])] = 7;
/// let volume = AtlasVolume::builder("TT_Daemon", "TLRC", grid)
///     .plane(Plane::byte(values))
///     .table(RegionTable::from_pairs([(7, "Thalamus")]))
///     .build()
///     .unwrap();
///
/// let source = InMemoryAtlasSource::new().with_volume(volume);
/// let registry = AtlasRegistry::new(Arc::new(source))
///     .with_atlas("TT_Daemon", "TLRC")
///     .unwrap();
/// let graph = SpaceGraph::builder().space("TLRC").unwrap().build();
///
/// let whereami = Whereami::new(graph, registry);
/// let query = whereami
///     .locate(&AtlasCoordinate::new(Vec3::ZERO, "TLRC"))
///     .unwrap();
/// assert_eq!(query.zone(0).unwrap().entries()[0].name, "Thalamus");
/// ```
pub struct Whereami {
    graph: SpaceGraph,
    registry: AtlasRegistry,
    config: QueryConfig,
    offsets: OffsetCache,
    chunked: DashMap<String, Arc<ChunkedTable>>,
}

impl Whereami {
    /// Create an engine with default settings.
    pub fn new(graph: SpaceGraph, registry: AtlasRegistry) -> Self {
        Self {
            graph,
            registry,
            config: QueryConfig::default(),
            offsets: OffsetCache::new(),
            chunked: DashMap::new(),
        }
    }

    /// Replace the lookup settings.
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    /// Create an engine with settings read from an INI file.
    ///
    /// A missing file gives default settings.
    pub fn from_config_file(
        graph: SpaceGraph,
        registry: AtlasRegistry,
        path: &Path,
    ) -> Result<Self, WhereamiError> {
        let config = QueryConfig::load_from(path)?;
        Ok(Self::new(graph, registry).with_config(config))
    }

    pub fn graph(&self) -> &SpaceGraph {
        &self.graph
    }

    pub fn registry(&self) -> &AtlasRegistry {
        &self.registry
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Drops the cached volume and chunked table for `atlas`.
    pub fn purge(&self, atlas: &str) {
        self.registry.purge(atlas);
        self.chunked.remove(atlas);
    }

    // =========================================================================
    // Coordinate lookups
    // =========================================================================

    /// Finds the regions around `coordinate` in every reachable atlas.
    ///
    /// Atlases that cannot be reached, loaded, or that do not cover the
    /// point are skipped and recorded as diagnostics on the query. An empty
    /// query is a valid "no regions found" result.
    ///
    /// # Errors
    ///
    /// Only a coordinate with a non-finite component fails the call.
    #[instrument(skip(self, coordinate), fields(space = %coordinate.space))]
    pub fn locate(&self, coordinate: &AtlasCoordinate) -> Result<Query, WhereamiError> {
        if !coordinate.xyz.is_finite() {
            return Err(CoordError::NonFinite(coordinate.xyz).into());
        }
        if !self.graph.contains(&coordinate.space) {
            tracing::debug!("Unknown coordinate space, no atlas is reachable");
        }

        let mut query = Query::for_coordinate(coordinate.clone());
        let mut aggregator = ZoneAggregator::new(&mut query);

        for descriptor in self.registry.atlases() {
            self.locate_in_atlas(coordinate, descriptor, &mut aggregator);
        }
        aggregator.finish();

        tracing::debug!(
            zones = query.zones().len(),
            entries = query.entry_count(),
            skipped = query.diagnostics().len(),
            "Lookup complete"
        );
        Ok(query)
    }

    fn locate_in_atlas(
        &self,
        coordinate: &AtlasCoordinate,
        descriptor: &AtlasDescriptor,
        aggregator: &mut ZoneAggregator<'_>,
    ) {
        let Some(point) = self.route(coordinate, descriptor) else {
            tracing::debug!(
                atlas = %descriptor.name,
                target = %descriptor.space,
                "Atlas not reachable from coordinate space"
            );
            aggregator.record(AtlasDiagnostic::Unreachable {
                atlas: descriptor.name.clone(),
                source_space: coordinate.space.clone(),
                target_space: descriptor.space.clone(),
            });
            return;
        };

        let volume = match self.registry.load(&descriptor.name) {
            Ok(volume) => volume,
            Err(e) => {
                tracing::warn!(atlas = %descriptor.name, error = %e, "Skipping atlas");
                aggregator.record(AtlasDiagnostic::LoadFailed {
                    atlas: descriptor.name.clone(),
                    reason: e.to_string(),
                });
                return;
            }
        };

        let Some(center) = volume.grid().nearest_voxel(point) else {
            tracing::trace!(atlas = %descriptor.name, %point, "Point outside atlas grid");
            aggregator.record(AtlasDiagnostic::OutsideGrid {
                atlas: descriptor.name.clone(),
            });
            return;
        };

        match volume.kind() {
            AtlasKind::Discrete {
                maximum_probability_map,
            } => {
                let offsets = self.offsets.get(self.config.search_radius());
                fold_discrete(
                    &volume,
                    center,
                    &offsets,
                    &self.config,
                    maximum_probability_map,
                    aggregator,
                );
            }
            AtlasKind::Probabilistic { .. } => fold_probabilistic(&volume, center, aggregator),
        }
    }

    /// The coordinate expressed in the atlas's space, or `None` when no
    /// chain exists or a piecewise step has no pieces.
    fn route(&self, coordinate: &AtlasCoordinate, descriptor: &AtlasDescriptor) -> Option<Vec3> {
        let chain = self.graph.find_chain(&coordinate.space, &descriptor.space)?;
        chain.apply(coordinate.xyz)
    }

    // =========================================================================
    // Name lookups
    // =========================================================================

    /// Decodes region text without matching it.
    pub fn decode(&self, text: &str) -> Result<RegionSpec, DecodeError> {
        matcher::decode(text)
    }

    /// Matches free text against the region table of `atlas`.
    pub fn resolve_name(&self, text: &str, atlas: &str) -> Result<SearchResult, WhereamiError> {
        let spec = matcher::decode(text)?;
        self.resolve_spec(&spec, atlas)
    }

    /// Matches an already decoded spec against the region table of `atlas`.
    pub fn resolve_spec(
        &self,
        spec: &RegionSpec,
        atlas: &str,
    ) -> Result<SearchResult, WhereamiError> {
        let volume = self.registry.load(atlas)?;
        let table = self.chunked_table(&volume);
        let result = matcher::find_regions(&table, spec);

        tracing::debug!(
            atlas,
            query = %spec.original,
            kind = ?result.kind,
            matches = result.matches().len(),
            "Region name resolved"
        );
        Ok(result)
    }

    fn chunked_table(&self, volume: &AtlasVolume) -> Arc<ChunkedTable> {
        if let Some(table) = self.chunked.get(volume.name()) {
            return Arc::clone(table.value());
        }
        let table = Arc::new(ChunkedTable::new(volume.table()));
        Arc::clone(
            self.chunked
                .entry(volume.name().to_string())
                .or_insert(table)
                .value(),
        )
    }

    // =========================================================================
    // Masks
    // =========================================================================

    /// Builds the voxel mask of `codes` in `atlas`, trimmed to the side of `spec`.
    pub fn region_mask(
        &self,
        spec: &RegionSpec,
        codes: &[i32],
        atlas: &str,
    ) -> Result<VoxelMask, WhereamiError> {
        let volume = self.registry.load(atlas)?;
        Ok(mask::region_mask(&volume, spec, codes)?)
    }

    /// Decodes `ATLAS:side:label`, resolves it and builds its mask.
    ///
    /// Only exact, unique and left/right pair matches produce a mask.
    pub fn mask_from_roi_string(&self, text: &str) -> Result<VoxelMask, WhereamiError> {
        let spec = matcher::decode_roi_string(text)?;
        let atlas = spec.atlas.clone().unwrap_or_default();
        let result = self.resolve_spec(&spec, &atlas)?;

        match result.kind {
            MatchKind::Exact | MatchKind::Unique | MatchKind::Pair => {
                self.region_mask(&spec, &result.codes(), &atlas)
            }
            kind => Err(MaskError::NoUsableMatch {
                query: result.query.clone(),
                kind,
            }
            .into()),
        }
    }
}

impl std::fmt::Debug for Whereami {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Whereami")
            .field("graph", &self.graph)
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("offset_tables", &self.offsets.len())
            .field("chunked_tables", &self.chunked.len())
            .finish()
    }
}
