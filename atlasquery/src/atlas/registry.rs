//! Atlas registry and the volume source seam.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;

use super::volume::AtlasVolume;
use super::{AtlasError, AtlasLoadError};

/// Supplies atlas volumes by name.
///
/// Implementations own all dataset I/O; the registry only caches what they
/// return.
pub trait AtlasSource: Send + Sync {
    fn load(&self, name: &str) -> Result<Arc<AtlasVolume>, AtlasLoadError>;
}

/// Source backed by volumes already in memory.
#[derive(Debug, Default)]
pub struct InMemoryAtlasSource {
    volumes: HashMap<String, Arc<AtlasVolume>>,
}

impl InMemoryAtlasSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a volume under its own name.
    pub fn with_volume(mut self, volume: AtlasVolume) -> Self {
        self.insert(volume);
        self
    }

    pub fn insert(&mut self, volume: AtlasVolume) {
        self.volumes
            .insert(volume.name().to_string(), Arc::new(volume));
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }
}

impl AtlasSource for InMemoryAtlasSource {
    fn load(&self, name: &str) -> Result<Arc<AtlasVolume>, AtlasLoadError> {
        self.volumes
            .get(name)
            .cloned()
            .ok_or_else(|| AtlasLoadError::NotAvailable(name.to_string()))
    }
}

/// A known atlas and the space it is defined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtlasDescriptor {
    pub name: String,
    pub space: String,
}

impl AtlasDescriptor {
    pub fn new(name: impl Into<String>, space: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            space: space.into(),
        }
    }
}

/// Ordered list of known atlases with lazily loaded volumes.
///
/// Atlases are queried in registration order. Loaded volumes are cached
/// until purged.
pub struct AtlasRegistry {
    descriptors: Vec<AtlasDescriptor>,
    source: Arc<dyn AtlasSource>,
    loaded: DashMap<String, Arc<AtlasVolume>>,
}

impl AtlasRegistry {
    pub fn new(source: Arc<dyn AtlasSource>) -> Self {
        Self {
            descriptors: Vec::new(),
            source,
            loaded: DashMap::new(),
        }
    }

    /// Registers an atlas; names are unique.
    pub fn register(&mut self, descriptor: AtlasDescriptor) -> Result<(), AtlasError> {
        if descriptor.name.trim().is_empty() {
            return Err(AtlasError::EmptyName);
        }
        if self.descriptor(&descriptor.name).is_some() {
            return Err(AtlasError::DuplicateAtlas(descriptor.name));
        }
        tracing::debug!(atlas = %descriptor.name, space = %descriptor.space, "Atlas registered");
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_atlas(
        mut self,
        name: impl Into<String>,
        space: impl Into<String>,
    ) -> Result<Self, AtlasError> {
        self.register(AtlasDescriptor::new(name, space))?;
        Ok(self)
    }

    pub fn atlases(&self) -> &[AtlasDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, name: &str) -> Option<&AtlasDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Returns the volume for `name`, loading it on first use.
    ///
    /// A volume whose declared space differs from the registration is
    /// rejected rather than searched in the wrong space.
    pub fn load(&self, name: &str) -> Result<Arc<AtlasVolume>, AtlasLoadError> {
        let descriptor = self
            .descriptor(name)
            .ok_or_else(|| AtlasLoadError::Unknown(name.to_string()))?;

        if let Some(volume) = self.loaded.get(name) {
            return Ok(Arc::clone(volume.value()));
        }

        let volume = self.source.load(name)?;
        if volume.space() != descriptor.space {
            return Err(AtlasLoadError::SpaceMismatch {
                atlas: name.to_string(),
                registered: descriptor.space.clone(),
                loaded: volume.space().to_string(),
            });
        }

        tracing::debug!(atlas = name, "Atlas volume loaded");
        self.loaded.insert(name.to_string(), Arc::clone(&volume));
        Ok(volume)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    /// Drops the cached volume for `name`; returns whether one was cached.
    pub fn purge(&self, name: &str) -> bool {
        self.loaded.remove(name).is_some()
    }

    pub fn purge_all(&self) {
        self.loaded.clear();
    }
}

impl std::fmt::Debug for AtlasRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlasRegistry")
            .field("descriptors", &self.descriptors)
            .field("loaded", &self.loaded.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{Plane, RegionTable, VoxelGrid};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn volume(name: &str, space: &str) -> AtlasVolume {
        AtlasVolume::builder(name, space, VoxelGrid::centered([2, 2, 2]).unwrap())
            .plane(Plane::byte(vec![0; 8]))
            .table(RegionTable::from_pairs([(1, "One")]))
            .build()
            .unwrap()
    }

    /// Source that counts loads.
    struct CountingSource {
        inner: InMemoryAtlasSource,
        loads: AtomicUsize,
    }

    impl AtlasSource for CountingSource {
        fn load(&self, name: &str) -> Result<Arc<AtlasVolume>, AtlasLoadError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.inner.load(name)
        }
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let source = Arc::new(InMemoryAtlasSource::new());
        let result = AtlasRegistry::new(source)
            .with_atlas("TT", "TLRC")
            .unwrap()
            .with_atlas("TT", "MNI");
        assert!(matches!(result, Err(AtlasError::DuplicateAtlas(_))));
    }

    #[test]
    fn test_load_unknown_atlas() {
        let registry = AtlasRegistry::new(Arc::new(InMemoryAtlasSource::new()));
        assert!(matches!(
            registry.load("TT"),
            Err(AtlasLoadError::Unknown(_))
        ));
    }

    #[test]
    fn test_load_not_available() {
        let registry = AtlasRegistry::new(Arc::new(InMemoryAtlasSource::new()))
            .with_atlas("TT", "TLRC")
            .unwrap();
        assert!(matches!(
            registry.load("TT"),
            Err(AtlasLoadError::NotAvailable(_))
        ));
    }

    #[test]
    fn test_load_is_cached() {
        let source = Arc::new(CountingSource {
            inner: InMemoryAtlasSource::new().with_volume(volume("TT", "TLRC")),
            loads: AtomicUsize::new(0),
        });
        let registry = AtlasRegistry::new(source.clone())
            .with_atlas("TT", "TLRC")
            .unwrap();

        let first = registry.load("TT").unwrap();
        let second = registry.load("TT").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.loads.load(Ordering::SeqCst), 1, "second load should hit the cache");

        assert!(registry.purge("TT"));
        assert!(!registry.is_loaded("TT"));
        registry.load("TT").unwrap();
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_space_mismatch_rejected() {
        let source = Arc::new(InMemoryAtlasSource::new().with_volume(volume("TT", "MNI")));
        let registry = AtlasRegistry::new(source).with_atlas("TT", "TLRC").unwrap();
        assert!(matches!(
            registry.load("TT"),
            Err(AtlasLoadError::SpaceMismatch { .. })
        ));
    }

    #[test]
    fn test_registration_order_kept() {
        let registry = AtlasRegistry::new(Arc::new(InMemoryAtlasSource::new()))
            .with_atlas("B", "MNI")
            .unwrap()
            .with_atlas("A", "TLRC")
            .unwrap();
        let names: Vec<&str> = registry.atlases().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
