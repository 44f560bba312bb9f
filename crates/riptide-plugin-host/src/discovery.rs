use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use riptide_plugin_sdk::HostServices;
use tracing::debug;

use crate::error::HostError;
use crate::module::ModuleHandle;

/// Per-candidate result of the discovery walk.
///
/// Skipped candidates stay in the engine's sequence, so aggregate
/// operations remain uniform fan-outs and the skip reason stays
/// inspectable (e.g. for a diagnostics pane).
#[derive(Debug)]
pub enum ModuleOutcome {
    Loaded(ModuleHandle),
    Skipped { path: PathBuf, reason: HostError },
}

impl ModuleOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn handle(&self) -> Option<&ModuleHandle> {
        match self {
            Self::Loaded(handle) => Some(handle),
            Self::Skipped { .. } => None,
        }
    }

    pub fn handle_mut(&mut self) -> Option<&mut ModuleHandle> {
        match self {
            Self::Loaded(handle) => Some(handle),
            Self::Skipped { .. } => None,
        }
    }

    /// Candidate path this outcome refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::Loaded(handle) => handle.path(),
            Self::Skipped { path, .. } => path,
        }
    }
}

/// Expected module file for a plugin package directory.
///
/// The layout contract says `D/name/` ships `D/name/name.<ext>` with the
/// platform dylib extension. Cargo prefixes cdylibs with `lib` on Unix, so
/// the prefixed spelling is accepted as a fallback when it exists; the
/// unprefixed spelling stays primary and is the path reported on a miss.
pub fn module_path_for(dir: &Path) -> PathBuf {
    let name = dir.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let primary = dir.join(format!("{name}.{}", std::env::consts::DLL_EXTENSION));
    if primary.exists() {
        return primary;
    }
    let prefixed = dir.join(format!(
        "{}{name}{}",
        std::env::consts::DLL_PREFIX,
        std::env::consts::DLL_SUFFIX
    ));
    if prefixed.exists() {
        prefixed
    } else {
        primary
    }
}

/// Candidate module paths under `search_paths`.
///
/// Search paths are visited in list order; immediate subdirectories of each
/// path in lexicographic name order, so the result is deterministic across
/// platforms. Missing or unreadable search paths contribute nothing.
pub fn discover_candidates(search_paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    for root in search_paths {
        let read_dir = match fs::read_dir(root) {
            Ok(read_dir) => read_dir,
            Err(err) => {
                debug!(root = %root.display(), error = %err, "skipping unreadable search path");
                continue;
            }
        };

        let mut subdirs: Vec<PathBuf> = read_dir
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        subdirs.sort();

        candidates.extend(subdirs.iter().map(|dir| module_path_for(dir)));
    }

    candidates
}

/// Load one candidate, applying the tolerance policy from the error
/// taxonomy: discovery misses become [`ModuleOutcome::Skipped`], faults
/// raised inside plugin code propagate.
pub fn load_candidate(path: &Path, host: &Arc<HostServices>) -> Result<ModuleOutcome, HostError> {
    match ModuleHandle::load(path, Arc::clone(host)) {
        Ok(handle) => Ok(ModuleOutcome::Loaded(handle)),
        Err(reason) if reason.is_discovery_miss() => {
            debug!(path = %path.display(), reason = %reason, "skipping plugin candidate");
            Ok(ModuleOutcome::Skipped {
                path: path.to_path_buf(),
                reason,
            })
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir_all, File};
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn dylib_name(stem: &str) -> String {
        format!("{stem}.{}", std::env::consts::DLL_EXTENSION)
    }

    #[test]
    fn candidate_derivation_follows_the_directory_name() {
        let dir = tempdir().unwrap();
        let package = dir.path().join("tracker-stats");
        create_dir_all(&package).unwrap();

        let candidate = module_path_for(&package);
        assert_eq!(candidate, package.join(dylib_name("tracker-stats")));
    }

    #[test]
    fn candidate_derivation_falls_back_to_the_prefixed_spelling() {
        let dir = tempdir().unwrap();
        let package = dir.path().join("stats");
        create_dir_all(&package).unwrap();
        let prefixed = package.join(format!(
            "{}stats{}",
            std::env::consts::DLL_PREFIX,
            std::env::consts::DLL_SUFFIX
        ));
        File::create(&prefixed).unwrap();

        // With only the prefixed file on disk, it wins; on platforms with
        // no prefix the spellings coincide.
        assert_eq!(module_path_for(&package), prefixed);
    }

    #[test]
    fn discovery_preserves_search_path_then_name_order() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        for package in ["y", "x"] {
            create_dir_all(a.join(package)).unwrap();
        }
        create_dir_all(b.join("z")).unwrap();
        // A stray file directly in a search path is not a package.
        File::create(a.join("README")).unwrap();

        let candidates = discover_candidates(&[a.clone(), b.clone()]);
        assert_eq!(
            candidates,
            vec![
                a.join("x").join(dylib_name("x")),
                a.join("y").join(dylib_name("y")),
                b.join("z").join(dylib_name("z")),
            ]
        );
    }

    #[test]
    fn missing_search_paths_are_silently_skipped() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no-such-dir");
        assert!(discover_candidates(&[missing]).is_empty());
    }

    #[test]
    fn package_without_a_module_file_is_skipped() {
        let dir = tempdir().unwrap();
        let package = dir.path().join("empty");
        create_dir_all(&package).unwrap();
        let host = Arc::new(HostServices::new("0.0.0", dir.path()));

        let outcome = load_candidate(&module_path_for(&package), &host).unwrap();
        match outcome {
            ModuleOutcome::Skipped { reason, .. } => {
                assert!(matches!(reason, HostError::MissingBinary(_)));
            }
            ModuleOutcome::Loaded(_) => panic!("empty package must not load"),
        }
    }

    #[test]
    fn unloadable_binary_is_skipped() {
        let dir = tempdir().unwrap();
        let package = dir.path().join("bogus");
        create_dir_all(&package).unwrap();
        let candidate = package.join(dylib_name("bogus"));
        let mut file = File::create(&candidate).unwrap();
        write!(file, "not a shared object").unwrap();
        let host = Arc::new(HostServices::new("0.0.0", dir.path()));

        let outcome = load_candidate(&candidate, &host).unwrap();
        match outcome {
            ModuleOutcome::Skipped { reason, .. } => {
                assert!(matches!(reason, HostError::LibraryLoad { .. }));
            }
            ModuleOutcome::Loaded(_) => panic!("garbage must not load"),
        }
    }
}
