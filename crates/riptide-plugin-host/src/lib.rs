//! Plugin discovery and hosting for Riptide.
//!
//! Walks the configured search paths, loads each plugin package's dynamic
//! module, hands every module the shared [`HostServices`] object, and owns
//! the resulting plugin instances for the lifetime of the process. A
//! package directory that holds no loadable module is skipped and recorded,
//! never fatal; faults raised inside plugin code are surfaced to the
//! caller.
//!
//! The layout contract: each search path contains one subdirectory per
//! plugin package, and `D/name/` is expected to ship the dynamic library
//! `D/name/name.<platform extension>`.
//!
//! Everything here is single-threaded by design. [`PluginEngine::load_all`]
//! runs during startup before other threads touch plugin state,
//! [`PluginEngine::unload_all`] during shutdown after they stop; callers of
//! a multi-threaded application serialize the two with
//! [`PluginEngine::get_plugins`] themselves.

mod config;
mod discovery;
mod engine;
mod error;
mod metadata;
mod module;

pub use config::PluginPaths;
pub use discovery::{discover_candidates, load_candidate, module_path_for, ModuleOutcome};
pub use engine::PluginEngine;
pub use error::HostError;
pub use metadata::PluginMetadata;
pub use module::ModuleHandle;

pub use riptide_plugin_sdk::{ConfigWindowDescriptor, HostServices};
