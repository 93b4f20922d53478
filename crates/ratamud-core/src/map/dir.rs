use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::{CoreError, CoreResult};

use super::{MapData, MapLoader};

/// Loads maps from `<dir>/<name>.json`.
///
/// The first successful read of a name is cached, so later edits to the file
/// are not observed by the same loader.
#[derive(Debug)]
pub struct DirMapLoader {
    dir: PathBuf,
    cache: Mutex<BTreeMap<String, MapData>>,
}

impl DirMapLoader {
    /// Create a loader rooted at `dir`. The directory is not touched until the
    /// first lookup.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(BTreeMap::new()),
        }
    }

    /// The directory maps are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self, name: &str) -> CoreResult<MapData> {
        let path = self.dir.join(format!("{name}.json"));
        if !path.is_file() {
            return Err(CoreError::MapNotFound(name.to_string()));
        }

        let source_error = |message: String| CoreError::MapSource {
            name: name.to_string(),
            message,
        };
        let text = fs::read_to_string(&path).map_err(|e| source_error(e.to_string()))?;
        let map: MapData = serde_json::from_str(&text).map_err(|e| source_error(e.to_string()))?;
        map.validate(name)?;
        Ok(map)
    }
}

/// Names that could escape the map directory never resolve.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

impl MapLoader for DirMapLoader {
    fn load(&self, name: &str) -> CoreResult<MapData> {
        if !is_plain_name(name) {
            return Err(CoreError::MapNotFound(name.to_string()));
        }

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(map) = cache.get(name) {
            return Ok(map.clone());
        }

        let map = self.read(name)?;
        log::debug!("loaded map \"{name}\" from {}", self.dir.display());
        cache.insert(name.to_string(), map.clone());
        Ok(map)
    }

    fn names(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
            .collect();
        names.sort();
        names
    }
}
