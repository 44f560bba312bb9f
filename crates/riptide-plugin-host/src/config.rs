use std::path::PathBuf;

use serde::Deserialize;

/// Search-path list the configuration subsystem hands to the engine.
///
/// Each path is expected to hold one subdirectory per plugin package; see
/// [`crate::discovery`] for the layout contract. Consumed read-only, once,
/// when the engine loads.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PluginPaths {
    pub search_paths: Vec<PathBuf>,
}

impl Default for PluginPaths {
    fn default() -> Self {
        let mut search_paths = Vec::new();
        if let Some(home) = dirs::home_dir() {
            search_paths.push(home.join(".riptide").join("plugins"));
        }
        search_paths.push(PathBuf::from("/usr/lib/riptide/plugins"));
        Self { search_paths }
    }
}
