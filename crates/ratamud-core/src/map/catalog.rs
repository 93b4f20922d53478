use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};
use crate::person::Position;

use super::{MapData, MapLoader};

/// An in-memory set of maps keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MapCatalog {
    maps: BTreeMap<String, MapData>,
}

impl MapCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The maps available when no map directory is configured.
    pub fn builtin() -> Self {
        Self::new()
            .with_map(
                MapData::new("meadow", 100, 100)
                    .with_description("A wide green meadow. The grass ripples in a soft breeze.")
                    .with_spawn(Position::new(50, 50))
                    .with_item("apple")
                    .with_item("stick"),
            )
            .with_map(
                MapData::new("forest", 60, 60)
                    .with_description("Tall oaks crowd the path and sunlight falls in patches.")
                    .with_item("mushroom"),
            )
            .with_map(
                MapData::new("cave", 20, 12)
                    .with_description("Cold limestone walls glisten in the dark.")
                    .with_spawn(Position::new(0, 6))
                    .with_item("torch"),
            )
    }

    /// Add or replace a map, keyed by its own name.
    pub fn with_map(mut self, map: MapData) -> Self {
        self.insert(map);
        self
    }

    /// Add or replace a map, keyed by its own name.
    pub fn insert(&mut self, map: MapData) {
        self.maps.insert(map.name.clone(), map);
    }

    /// Number of maps.
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl MapLoader for MapCatalog {
    fn load(&self, name: &str) -> CoreResult<MapData> {
        let map = self
            .maps
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::MapNotFound(name.to_string()))?;
        map.validate(name)?;
        Ok(map)
    }

    fn names(&self) -> Vec<String> {
        self.maps.keys().cloned().collect()
    }
}
