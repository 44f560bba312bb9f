use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::Library;
use riptide_plugin_sdk::{take_export, HostServices, Plugin, PluginEntry, ENTRY_SYMBOL};
use tracing::info;

use crate::error::HostError;
use crate::metadata::PluginMetadata;

/// Ordered plugin instances produced by one module, plus their lifecycle
/// state.
///
/// Only ever lives nested inside a [`ModuleHandle`]; instances are
/// allocated by the module, so tying the collection to the library owner is
/// what keeps "plugin lifetime within module lifetime" a structural fact
/// rather than a convention.
pub(crate) struct PluginSet {
    plugins: Vec<Box<dyn Plugin>>,
    deactivated: bool,
}

impl PluginSet {
    pub(crate) fn new(plugins: Vec<Box<dyn Plugin>>) -> Self {
        Self {
            plugins,
            deactivated: false,
        }
    }

    /// Run every instance's `load` hook, in factory order. The first
    /// failure propagates.
    pub(crate) fn activate(&mut self) -> anyhow::Result<()> {
        for plugin in &mut self.plugins {
            plugin.load()?;
        }
        Ok(())
    }

    /// Run every instance's `unload` hook, in load order, at most once for
    /// the lifetime of the set. Repeat calls are no-ops, so plugin teardown
    /// never double-fires. The guard latches before the hooks run: when a
    /// hook fails, the error propagates and the instances after it are
    /// never torn down — a failed teardown is not retried.
    pub(crate) fn deactivate(&mut self) -> anyhow::Result<()> {
        if self.deactivated {
            return Ok(());
        }
        self.deactivated = true;
        for plugin in &mut self.plugins {
            plugin.unload()?;
        }
        Ok(())
    }

    /// Fresh metadata snapshot per instance, in load order.
    pub(crate) fn metadata(&self) -> Vec<PluginMetadata> {
        self.plugins
            .iter()
            .map(|plugin| PluginMetadata::of(plugin.as_ref()))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.plugins.len()
    }
}

/// One loaded plugin module: the dynamic library, the retained host
/// services, and the plugin instances the module's entry point produced.
pub struct ModuleHandle {
    path: PathBuf,
    // Instances are allocated inside the module; they must drop before the
    // library is released. Field order is the enforcement.
    plugins: PluginSet,
    host: Arc<HostServices>,
    #[allow(dead_code)]
    library: Library,
}

impl ModuleHandle {
    /// Load the module at `path` and bring its plugins up.
    ///
    /// Sequence: existence check, dynamic load, entry-symbol resolution,
    /// entry invocation with the host pointer, ownership transfer of the
    /// export, then each plugin's `load` hook in factory order.
    ///
    /// The handle retains its own reference to `host`; the application must
    /// keep the `Arc` alive at least as long as the handle so plugins can
    /// call back into it at any later point.
    pub fn load(path: &Path, host: Arc<HostServices>) -> Result<Self, HostError> {
        if !path.exists() {
            return Err(HostError::MissingBinary(path.to_path_buf()));
        }

        let library = unsafe { Library::new(path) }.map_err(|source| HostError::LibraryLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let entry = {
            let symbol = unsafe { library.get::<PluginEntry>(ENTRY_SYMBOL.as_bytes()) }.map_err(
                |_| HostError::MissingEntry {
                    path: path.to_path_buf(),
                    symbol: ENTRY_SYMBOL,
                },
            )?;
            *symbol
        };

        let raw = unsafe { entry(Arc::as_ptr(&host)) };
        let export =
            unsafe { take_export(raw) }.ok_or_else(|| HostError::EntryFault(path.to_path_buf()))?;

        let mut plugins = PluginSet::new(export.into_module().into_plugins());
        plugins.activate().map_err(|source| HostError::PluginLoad {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            plugins = plugins.len(),
            "loaded plugin module"
        );

        Ok(Self {
            path: path.to_path_buf(),
            plugins,
            host,
            library,
        })
    }

    /// Run plugin teardown hooks, in load order. Guarded: hooks fire at
    /// most once per handle no matter how often this is called. The module
    /// itself stays mapped until the handle drops.
    pub fn unload(&mut self) -> Result<(), HostError> {
        self.plugins
            .deactivate()
            .map_err(|source| HostError::PluginUnload {
                path: self.path.clone(),
                source,
            })
    }

    /// Fresh metadata snapshot for every plugin this module exposes.
    pub fn get_plugins(&self) -> Vec<PluginMetadata> {
        self.plugins.metadata()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// The services object this module's plugins were handed. The handle
    /// retains it so the pointer passed through the entry point stays valid
    /// for the module's whole lifetime; callers can use this to confirm
    /// which host object a handle is bound to.
    pub fn host(&self) -> &Arc<HostServices> {
        &self.host
    }
}

impl fmt::Debug for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleHandle")
            .field("path", &self.path)
            .field("plugins", &self.plugins.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;
    use riptide_plugin_sdk::ConfigWindowDescriptor;

    use super::*;

    type EventLog = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: EventLog,
        fail_load: bool,
        fail_unload: bool,
    }

    impl Recorder {
        fn new(name: &'static str, log: &EventLog) -> Self {
            Self {
                name,
                log: Arc::clone(log),
                fail_load: false,
                fail_unload: false,
            }
        }
    }

    impl Plugin for Recorder {
        fn name(&self) -> String {
            self.name.to_string()
        }

        fn version(&self) -> String {
            "1.0".to_string()
        }

        fn config_window(&self) -> Option<ConfigWindowDescriptor> {
            Some(ConfigWindowDescriptor {
                title: format!("{} settings", self.name),
                width: 400,
                height: 300,
            })
        }

        fn load(&mut self) -> anyhow::Result<()> {
            if self.fail_load {
                anyhow::bail!("{} refused to load", self.name);
            }
            self.log.lock().unwrap().push(format!("load {}", self.name));
            Ok(())
        }

        fn unload(&mut self) -> anyhow::Result<()> {
            if self.fail_unload {
                anyhow::bail!("{} refused to unload", self.name);
            }
            self.log
                .lock()
                .unwrap()
                .push(format!("unload {}", self.name));
            Ok(())
        }
    }

    fn set_of(names: &[&'static str], log: &EventLog) -> PluginSet {
        PluginSet::new(
            names
                .iter()
                .map(|name| Box::new(Recorder::new(name, log)) as Box<dyn Plugin>)
                .collect(),
        )
    }

    #[test]
    fn activate_runs_load_hooks_in_order() {
        let log: EventLog = Default::default();
        let mut set = set_of(&["a", "b"], &log);
        set.activate().unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["load a", "load b"]);
    }

    #[test]
    fn deactivate_fires_at_most_once() {
        let log: EventLog = Default::default();
        let mut set = set_of(&["a", "b"], &log);
        set.activate().unwrap();
        set.deactivate().unwrap();
        set.deactivate().unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["load a", "load b", "unload a", "unload b"]
        );
    }

    #[test]
    fn metadata_reads_are_stable_and_ordered() {
        let log: EventLog = Default::default();
        let set = set_of(&["first", "second"], &log);
        let first = set.metadata();
        let second = set.metadata();
        assert_eq!(first, second);
        let names: Vec<&str> = first.iter().map(|meta| meta.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert!(first[0].has_config_window());
    }

    #[test]
    fn failed_teardown_abandons_the_rest_of_the_set() {
        let log: EventLog = Default::default();
        let mut failing = Recorder::new("bad", &log);
        failing.fail_unload = true;
        let mut set = PluginSet::new(vec![
            Box::new(failing),
            Box::new(Recorder::new("good", &log)),
        ]);
        set.activate().unwrap();

        assert!(set.deactivate().is_err());
        // The guard latched on the failed attempt: a retry is a no-op and
        // "good" is never torn down.
        set.deactivate().unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["load bad", "load good"]);
    }

    #[test]
    fn activate_propagates_a_failing_hook() {
        let log: EventLog = Default::default();
        let mut failing = Recorder::new("bad", &log);
        failing.fail_load = true;
        let mut set = PluginSet::new(vec![
            Box::new(Recorder::new("good", &log)),
            Box::new(failing),
        ]);
        assert!(set.activate().is_err());
        // The hooks before the failure still ran.
        assert_eq!(*log.lock().unwrap(), vec!["load good"]);
    }
}
