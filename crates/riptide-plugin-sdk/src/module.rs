use crate::Plugin;

/// Ordered collection of the plugin instances one module exposes.
///
/// Registration order is contractual: the host invokes lifecycle hooks and
/// reports metadata in exactly this order.
pub struct PluginModule {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginModule {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> &mut Self {
        self.plugins.push(plugin);
        self
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn into_plugins(self) -> Vec<Box<dyn Plugin>> {
        self.plugins
    }
}

impl Default for PluginModule {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrapper carried across the module boundary.
///
/// The generated entry point leaks one onto the heap with
/// [`PluginExport::into_raw`]; the host reclaims it with [`take_export`]
/// and from then on owns the module and every instance in it.
pub struct PluginExport {
    module: PluginModule,
}

impl PluginExport {
    pub fn new(module: PluginModule) -> Self {
        Self { module }
    }

    pub fn module(&self) -> &PluginModule {
        &self.module
    }

    pub fn into_module(self) -> PluginModule {
        self.module
    }

    /// Move the export onto the heap for the trip through the entry point.
    pub fn into_raw(self) -> *mut PluginExport {
        Box::into_raw(Box::new(self))
    }
}

/// Reclaim ownership of an export returned by a module entry point.
///
/// Returns `None` for a null pointer (the module signalled a fault).
///
/// # Safety
///
/// A non-null `raw` must come from [`PluginExport::into_raw`] in this
/// process and must not be consumed twice.
pub unsafe fn take_export(raw: *mut PluginExport) -> Option<PluginExport> {
    if raw.is_null() {
        None
    } else {
        Some(*Box::from_raw(raw))
    }
}
