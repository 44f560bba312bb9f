use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Descriptor for a plugin-provided settings window.
///
/// A plugin that returns one from [`Plugin::config_window`] is listed with
/// a configure action in the application's plugin settings dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigWindowDescriptor {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

/// Contract implemented by every Riptide plugin instance.
///
/// Instances are produced by a module's entry point and owned by the host
/// for the lifetime of the module. Lifecycle hooks run on the thread that
/// drives startup and shutdown; the host serializes them.
pub trait Plugin: Send {
    fn name(&self) -> String;

    fn version(&self) -> String;

    /// Descriptor for the plugin's settings window, if it has one.
    fn config_window(&self) -> Option<ConfigWindowDescriptor> {
        None
    }

    /// Called once, after the module is loaded and host services are
    /// available. This is where a plugin hooks host events, registers UI
    /// elements, and so on.
    fn load(&mut self) -> Result<()> {
        Ok(())
    }

    /// Teardown counterpart of [`load`](Plugin::load). The host guarantees
    /// it runs at most once per instance.
    fn unload(&mut self) -> Result<()> {
        Ok(())
    }
}
