use std::sync::Arc;

use crate::error::CoreResult;
use crate::map::{MapData, MapLoader};
use crate::person::Person;

/// The world a player explores: the currently loaded map and the loader used
/// to switch maps.
///
/// A world remembers its player by name only. It never owns or frees the
/// [`Person`] it was created for.
#[derive(Debug, Clone)]
pub struct GameWorld {
    player_name: String,
    loader: Arc<dyn MapLoader>,
    current_map: Option<MapData>,
}

impl GameWorld {
    /// Create a world for `player` with no map loaded.
    pub fn new(player: &Person, loader: Arc<dyn MapLoader>) -> Self {
        Self {
            player_name: player.name().to_string(),
            loader,
            current_map: None,
        }
    }

    /// Name of the player this world was created for.
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Whether this world belongs to `player`.
    pub fn is_bound_to(&self, player: &Person) -> bool {
        self.player_name == player.name()
    }

    /// Switch to the named map.
    ///
    /// The map is resolved and validated in full before the current map is
    /// replaced in a single assignment. On failure the previous map, or the
    /// absence of one, is left untouched.
    pub fn load_map(&mut self, name: &str) -> CoreResult<&MapData> {
        let map = self.loader.load(name)?;
        log::debug!(
            "world of \"{}\" switched map to \"{}\"",
            self.player_name,
            map.name
        );
        Ok(self.current_map.insert(map))
    }

    /// The loaded map, if any load has succeeded.
    pub fn current_map(&self) -> Option<&MapData> {
        self.current_map.as_ref()
    }

    /// Name of the loaded map, if any load has succeeded.
    pub fn current_map_name(&self) -> Option<&str> {
        self.current_map.as_ref().map(|map| map.name.as_str())
    }

    /// Names the loader can resolve.
    pub fn map_names(&self) -> Vec<String> {
        self.loader.names()
    }

    /// Pick an item up off the ground of the loaded map, matching its name
    /// case-insensitively. Returns the item's name as the map spells it.
    pub fn take_item(&mut self, item: &str) -> Option<String> {
        let map = self.current_map.as_mut()?;
        let index = map.items.iter().position(|i| i.eq_ignore_ascii_case(item))?;
        Some(map.items.remove(index))
    }

    /// Whether an item lies on the ground of the loaded map.
    pub fn has_item(&self, item: &str) -> bool {
        self.current_map
            .as_ref()
            .is_some_and(|map| map.items.iter().any(|i| i.eq_ignore_ascii_case(item)))
    }

    /// Leave an item on the ground of the loaded map. Returns false if no map
    /// is loaded.
    pub fn drop_item(&mut self, item: impl Into<String>) -> bool {
        match self.current_map.as_mut() {
            Some(map) => {
                map.items.push(item.into());
                true
            }
            None => false,
        }
    }
}
