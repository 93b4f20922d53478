//! Engine configuration.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use ratamud_core::{DirMapLoader, MapCatalog, MapLoader, Position};

/// Environment variable naming a directory of `<map>.json` files.
pub const MAPS_DIR_VAR: &str = "RATAMUD_MAPS_DIR";
/// Environment variable naming the map loaded when an engine starts. An empty
/// value means no map is loaded.
pub const START_MAP_VAR: &str = "RATAMUD_START_MAP";

/// Configuration shared by every engine a [`crate::Registry`] creates.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Description given to players created from a name alone.
    pub default_description: String,
    /// Hit points a new engine player starts with.
    pub initial_hp: i32,
    /// Hit point ceiling applied when healing.
    pub max_hp: i32,
    /// Position a new engine player starts at.
    pub start_position: Position,
    /// Map loaded when an engine is created. A missing map is not an error;
    /// the engine simply starts without one.
    pub start_map: Option<String>,
    /// Entries kept per buffered output category (0 = unlimited). The oldest
    /// entries are dropped first.
    pub output_buffer_limit: usize,
    /// Real milliseconds per in-game minute.
    pub ms_per_game_minute: u64,
    /// Hit points regained per in-game minute while resting.
    pub regen_per_minute: i32,
    /// Directory of map files. `None` uses the built-in catalog.
    pub maps_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_description: "adventurer".to_string(),
            initial_hp: ratamud_core::person::DEFAULT_HP,
            max_hp: ratamud_core::person::DEFAULT_HP,
            start_position: ratamud_core::person::DEFAULT_POSITION,
            start_map: Some("meadow".to_string()),
            output_buffer_limit: 1000,
            ms_per_game_minute: 1000,
            regen_per_minute: 1,
            maps_dir: None,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with [`MAPS_DIR_VAR`] and [`START_MAP_VAR`].
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = env::var_os(MAPS_DIR_VAR).filter(|d| !d.is_empty()) {
            config.maps_dir = Some(PathBuf::from(dir));
        }
        if let Ok(map) = env::var(START_MAP_VAR) {
            config.start_map = Some(map).filter(|m| !m.is_empty());
        }
        config
    }

    /// Set the description given to players created from a name alone.
    pub fn with_default_description(mut self, description: impl Into<String>) -> Self {
        self.default_description = description.into();
        self
    }

    /// Set starting and maximum hit points.
    pub fn with_hp(mut self, initial: i32, max: i32) -> Self {
        self.initial_hp = initial;
        self.max_hp = max;
        self
    }

    /// Set the starting position.
    pub fn with_start_position(mut self, position: Position) -> Self {
        self.start_position = position;
        self
    }

    /// Set the map loaded at engine creation (`None` for no map).
    pub fn with_start_map(mut self, map: Option<&str>) -> Self {
        self.start_map = map.map(str::to_string);
        self
    }

    /// Set the per-category buffer limit (0 = unlimited).
    pub fn with_output_buffer_limit(mut self, limit: usize) -> Self {
        self.output_buffer_limit = limit;
        self
    }

    /// Set real milliseconds per in-game minute. Clamped to at least 1.
    pub fn with_ms_per_game_minute(mut self, ms: u64) -> Self {
        self.ms_per_game_minute = ms.max(1);
        self
    }

    /// Set hit points regained per in-game minute of rest.
    pub fn with_regen_per_minute(mut self, regen: i32) -> Self {
        self.regen_per_minute = regen;
        self
    }

    /// Read maps from a directory instead of the built-in catalog.
    pub fn with_maps_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.maps_dir = Some(dir.into());
        self
    }

    /// Build the map loader this configuration describes.
    pub fn map_loader(&self) -> Arc<dyn MapLoader> {
        match &self.maps_dir {
            Some(dir) => Arc::new(DirMapLoader::new(dir)),
            None => Arc::new(MapCatalog::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = EngineConfig::default();
        assert_eq!(config.default_description, "adventurer");
        assert_eq!(config.initial_hp, 100);
        assert_eq!(config.max_hp, 100);
        assert_eq!(config.start_position, Position::new(50, 50));
        assert_eq!(config.start_map.as_deref(), Some("meadow"));
        assert_eq!(config.output_buffer_limit, 1000);
        assert_eq!(config.ms_per_game_minute, 1000);
        assert!(config.maps_dir.is_none());
    }

    #[test]
    fn builder_chain() {
        let config = EngineConfig::default()
            .with_default_description("wanderer")
            .with_hp(30, 40)
            .with_start_position(Position::new(1, 2))
            .with_start_map(None)
            .with_output_buffer_limit(5)
            .with_ms_per_game_minute(0)
            .with_regen_per_minute(3);
        assert_eq!(config.default_description, "wanderer");
        assert_eq!((config.initial_hp, config.max_hp), (30, 40));
        assert_eq!(config.start_position, Position::new(1, 2));
        assert!(config.start_map.is_none());
        assert_eq!(config.output_buffer_limit, 5);
        assert_eq!(config.ms_per_game_minute, 1);
        assert_eq!(config.regen_per_minute, 3);
    }

    #[test]
    fn builtin_loader_without_dir() {
        let loader = EngineConfig::default().map_loader();
        assert!(loader.load("meadow").is_ok());
    }

    #[test]
    fn dir_loader_with_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("attic.json"),
            r#"{"name":"attic","width":3,"height":3}"#,
        )
        .unwrap();
        let loader = EngineConfig::default().with_maps_dir(dir.path()).map_loader();
        assert!(loader.load("attic").is_ok());
        assert!(loader.load("meadow").is_err());
    }
}
