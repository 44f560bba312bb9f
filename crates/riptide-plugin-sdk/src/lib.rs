//! Riptide Plugin SDK
//! ==================
//!
//! The contract shared between the Riptide host process and every plugin
//! module: the exported entry-point symbol, its signature, the [`Plugin`]
//! trait, the module/export wrapper types, and the host-services capability
//! object plugins call back into.
//!
//! Both sides of the module boundary are expected to be built with the same
//! Rust toolchain; the `extern "C"` entry point fixes the symbol name and
//! calling convention while the payload types come from this crate.

mod host;
mod module;
mod plugin;

pub use host::{HostRef, HostServices};
pub use module::{take_export, PluginExport, PluginModule};
pub use plugin::{ConfigWindowDescriptor, Plugin};

/// Name of the entry-point symbol every Riptide plugin module exports.
///
/// The symbol name doubles as the contract version marker: an incompatible
/// change to the plugin contract renames the symbol rather than changing
/// the signature behind the same name.
pub const ENTRY_SYMBOL: &str = "riptide_plugin_entrypoint";

/// Signature of the exported entry point.
///
/// The host passes a pointer to its long-lived [`HostServices`]; the module
/// returns a heap-allocated [`PluginExport`] whose ownership transfers to
/// the host (reclaimed with [`take_export`]). A null return signals that
/// the module could not produce its plugins.
pub type PluginEntry = unsafe extern "C" fn(*const HostServices) -> *mut PluginExport;

/// Common imports for plugin authors.
pub mod prelude {
    pub use crate::{
        declare_riptide_plugins, ConfigWindowDescriptor, HostRef, Plugin, PluginExport,
        PluginModule,
    };
}

/// Declare the entry point for a dynamic Riptide plugin module.
///
/// The macro expects one or more constructor expressions; each is called
/// with a [`HostRef`] and must return a type implementing [`Plugin`]. The
/// resulting instances are registered, in order, within the exported
/// [`PluginModule`].
///
/// # Example
///
/// ```ignore
/// use riptide_plugin_sdk::prelude::*;
///
/// struct MyPlugin { host: HostRef }
///
/// impl MyPlugin {
///     fn new(host: HostRef) -> Self { Self { host } }
/// }
///
/// impl Plugin for MyPlugin { /* ... */ }
///
/// declare_riptide_plugins!(MyPlugin::new);
/// ```
#[macro_export]
macro_rules! declare_riptide_plugins {
    ($($ctor:expr),+ $(,)?) => {
        #[no_mangle]
        pub unsafe extern "C" fn riptide_plugin_entrypoint(
            host: *const $crate::HostServices,
        ) -> *mut $crate::PluginExport {
            let host = match $crate::HostRef::from_raw(host) {
                Some(host) => host,
                None => return ::std::ptr::null_mut(),
            };
            let mut module = $crate::PluginModule::new();
            $(module.register(::std::boxed::Box::new(($ctor)(host.clone())));)+
            $crate::PluginExport::new(module).into_raw()
        }
    };
}
