use std::fmt;
use std::path::{Path, PathBuf};

/// Capability object the application hands to every plugin module.
///
/// Constructed once, before any module is loaded, and kept alive (behind an
/// `Arc`) at least as long as any loaded module. The surface is
/// deliberately small; anything richer belongs to the application layer.
pub struct HostServices {
    app_version: String,
    config_dir: PathBuf,
}

impl HostServices {
    pub fn new(app_version: impl Into<String>, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_version: app_version.into(),
            config_dir: config_dir.into(),
        }
    }

    /// Version string of the hosting application.
    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    /// Directory plugins may use for their own configuration files.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

impl fmt::Debug for HostServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostServices")
            .field("app_version", &self.app_version)
            .field("config_dir", &self.config_dir)
            .finish()
    }
}

/// Plugin-side handle to the host's [`HostServices`].
///
/// Created inside the generated entry point from the pointer the host
/// passes in. The host keeps the services object alive for at least as long
/// as any loaded module, which is what makes dereferencing the stored
/// pointer sound from plugin code at any later point.
#[derive(Clone, Copy)]
pub struct HostRef {
    inner: *const HostServices,
}

impl HostRef {
    /// Wrap the raw pointer received through the entry point.
    ///
    /// Returns `None` for a null pointer.
    ///
    /// # Safety
    ///
    /// A non-null `raw` must point to a [`HostServices`] that outlives
    /// every plugin instance created from the returned reference.
    pub unsafe fn from_raw(raw: *const HostServices) -> Option<Self> {
        if raw.is_null() {
            None
        } else {
            Some(Self { inner: raw })
        }
    }

    pub fn services(&self) -> &HostServices {
        unsafe { &*self.inner }
    }
}

// Sound under the lifetime contract of `from_raw`: the pointee is owned by
// the host, never mutated through this handle, and outlives the plugin.
unsafe impl Send for HostRef {}
unsafe impl Sync for HostRef {}

impl fmt::Debug for HostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostRef").field("inner", &self.inner).finish()
    }
}
