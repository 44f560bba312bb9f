use std::path::PathBuf;
use std::sync::Arc;

use riptide_plugin_sdk::HostServices;

use crate::config::PluginPaths;
use crate::discovery::{discover_candidates, load_candidate, ModuleOutcome};
use crate::error::HostError;
use crate::metadata::PluginMetadata;
use crate::module::ModuleHandle;

/// Discovers plugin modules under the configured search paths and owns
/// every resulting handle for the lifetime of the process.
///
/// Created once at startup, torn down at shutdown. Not internally
/// synchronized; the caller serializes [`load_all`](Self::load_all),
/// [`get_plugins`](Self::get_plugins) and [`unload_all`](Self::unload_all).
pub struct PluginEngine {
    search_paths: Vec<PathBuf>,
    modules: Vec<ModuleOutcome>,
}

impl PluginEngine {
    /// Engine over an externally supplied, ordered search-path list.
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths,
            modules: Vec::new(),
        }
    }

    pub fn from_config(paths: &PluginPaths) -> Self {
        Self::new(paths.search_paths.clone())
    }

    /// Discover and load every candidate module.
    ///
    /// Intended to run exactly once, during startup, after `host` is fully
    /// constructed: plugins may call back into it from their `load` hooks
    /// onwards. Every candidate produces an outcome — loaded or skipped —
    /// appended in discovery order, so the aggregate operations below stay
    /// branch-light fan-outs. Faults inside plugin code abort and
    /// propagate; discovery misses do not.
    pub fn load_all(&mut self, host: Arc<HostServices>) -> Result<(), HostError> {
        for candidate in discover_candidates(&self.search_paths) {
            let outcome = load_candidate(&candidate, &host)?;
            self.modules.push(outcome);
        }
        Ok(())
    }

    /// Run plugin teardown hooks across every loaded module, in load
    /// order. Repeat calls are no-ops thanks to the per-module guard.
    pub fn unload_all(&mut self) -> Result<(), HostError> {
        for outcome in &mut self.modules {
            if let Some(handle) = outcome.handle_mut() {
                handle.unload()?;
            }
        }
        Ok(())
    }

    /// Flattened metadata across every loaded module, preserving module
    /// order and within-module order. Skipped modules contribute nothing.
    /// Read-only; snapshots are produced fresh on every call.
    pub fn get_plugins(&self) -> Vec<PluginMetadata> {
        self.modules
            .iter()
            .filter_map(ModuleOutcome::handle)
            .flat_map(ModuleHandle::get_plugins)
            .collect()
    }

    /// Every discovery outcome, in discovery order, skip reasons included.
    pub fn modules(&self) -> &[ModuleOutcome] {
        &self.modules
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}
