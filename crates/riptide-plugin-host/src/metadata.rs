use riptide_plugin_sdk::{ConfigWindowDescriptor, Plugin};
use serde::Serialize;

/// Point-in-time description of one live plugin instance.
///
/// Produced fresh on every query, never cached; the application uses it to
/// populate the plugin list in the settings dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginMetadata {
    pub name: String,
    pub version: String,
    pub config_window: Option<ConfigWindowDescriptor>,
}

impl PluginMetadata {
    pub(crate) fn of(plugin: &dyn Plugin) -> Self {
        Self {
            name: plugin.name(),
            version: plugin.version(),
            config_window: plugin.config_window(),
        }
    }

    pub fn has_config_window(&self) -> bool {
        self.config_window.is_some()
    }
}
