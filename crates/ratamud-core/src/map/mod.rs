//! Map data and name resolution.
//!
//! The world never reads map storage itself; it asks a [`MapLoader`]. Two
//! loaders ship with the crate: an in-memory [`MapCatalog`] and a
//! [`DirMapLoader`] reading one JSON file per map.

mod catalog;
mod dir;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::person::Position;

pub use catalog::MapCatalog;
pub use dir::DirMapLoader;

/// A named, rectangular unit of world content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapData {
    /// The name the map is requested by.
    pub name: String,
    /// Prose shown when the player looks around.
    #[serde(default)]
    pub description: String,
    /// Number of columns. Valid x coordinates are `0..width`.
    pub width: u32,
    /// Number of rows. Valid y coordinates are `0..height`.
    pub height: u32,
    /// Where a travelling player arrives. Defaults to the map centre.
    #[serde(default)]
    pub spawn: Option<Position>,
    /// Items lying on the ground, free for the taking.
    #[serde(default)]
    pub items: Vec<String>,
}

impl MapData {
    /// Create a map with no spawn override and no items.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            width,
            height,
            spawn: None,
            items: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the spawn point.
    pub fn with_spawn(mut self, spawn: Position) -> Self {
        self.spawn = Some(spawn);
        self
    }

    /// Add an item lying on the ground.
    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.items.push(item.into());
        self
    }

    /// Whether a position lies inside the map.
    pub fn contains(&self, pos: Position) -> bool {
        let inside = |v: i32, len: u32| v >= 0 && i64::from(v) < i64::from(len);
        inside(pos.x, self.width) && inside(pos.y, self.height)
    }

    /// The arrival point for a travelling player.
    pub fn spawn_point(&self) -> Position {
        self.spawn.unwrap_or_else(|| {
            Position::new(
                i32::try_from(self.width / 2).unwrap_or(i32::MAX),
                i32::try_from(self.height / 2).unwrap_or(i32::MAX),
            )
        })
    }

    /// Check the map is usable as the answer to a request for `requested`.
    pub fn validate(&self, requested: &str) -> CoreResult<()> {
        let invalid = |reason: &str| CoreError::InvalidMap {
            name: requested.to_string(),
            reason: reason.to_string(),
        };

        if self.name.is_empty() {
            return Err(invalid("map has no name"));
        }
        if self.name != requested {
            return Err(invalid(&format!("map declares name \"{}\"", self.name)));
        }
        if self.width == 0 || self.height == 0 {
            return Err(invalid("map must be at least 1x1"));
        }
        if self.spawn.is_some_and(|spawn| !self.contains(spawn)) {
            return Err(invalid("spawn point lies outside the map"));
        }
        Ok(())
    }
}

/// Resolves map names to validated [`MapData`].
///
/// Lookups must be a pure function of the name for the lifetime of a loader:
/// asking twice for the same name yields the same answer.
pub trait MapLoader: Send + Sync + fmt::Debug {
    /// Resolve a name. Returns [`CoreError::MapNotFound`] for unknown names.
    fn load(&self, name: &str) -> CoreResult<MapData>;

    /// Names this loader knows about, sorted. Loaders that cannot enumerate
    /// their maps return an empty list.
    fn names(&self) -> Vec<String> {
        Vec::new()
    }
}
