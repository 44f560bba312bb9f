use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while discovering or loading plugin modules.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("plugin module not found at {0}")]
    MissingBinary(PathBuf),
    #[error("failed to load plugin module {path}: {source}")]
    LibraryLoad {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
    #[error("{path} does not export `{symbol}`")]
    MissingEntry {
        path: PathBuf,
        symbol: &'static str,
    },
    #[error("entry point of {0} returned no export")]
    EntryFault(PathBuf),
    #[error("plugin in {path} failed to load: {source}")]
    PluginLoad {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("plugin in {path} failed to unload: {source}")]
    PluginUnload {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HostError {
    /// Whether this error is a tolerated discovery miss.
    ///
    /// Not every directory dropped into a search path contains a compatible
    /// plugin module: a missing file, an unloadable binary, or a library
    /// without the entry symbol is a normal case that discovery absorbs.
    /// Everything else is a fault inside plugin code and propagates.
    pub fn is_discovery_miss(&self) -> bool {
        matches!(
            self,
            Self::MissingBinary(_) | Self::LibraryLoad { .. } | Self::MissingEntry { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_misses_are_classified() {
        let path = PathBuf::from("/p/x/x.so");
        assert!(HostError::MissingBinary(path.clone()).is_discovery_miss());
        assert!(HostError::MissingEntry {
            path: path.clone(),
            symbol: "riptide_plugin_entrypoint",
        }
        .is_discovery_miss());

        assert!(!HostError::EntryFault(path.clone()).is_discovery_miss());
        assert!(!HostError::PluginLoad {
            path,
            source: anyhow::anyhow!("boom"),
        }
        .is_discovery_miss());
    }
}
