use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::{Finder, FinderId, ModuleOrigin, ModuleSpec};
use crate::descriptor::{normalize_suffix, DEFAULT_SOURCE_SUFFIX};
use crate::errors::ImportError;
use crate::module_name::ModuleName;

pub const PATH_FINDER_ID: FinderId = "path";

/// Finder over search-path directories on the real filesystem.
#[derive(Debug, Clone)]
pub struct PathFinder {
    search_paths: Vec<PathBuf>,
    suffix: Arc<str>,
}

impl PathFinder {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self::with_suffix(search_paths, DEFAULT_SOURCE_SUFFIX)
    }

    pub fn with_suffix(search_paths: Vec<PathBuf>, suffix: &str) -> Self {
        Self {
            search_paths,
            suffix: Arc::from(normalize_suffix(suffix)),
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}

impl Finder for PathFinder {
    fn id(&self) -> FinderId {
        PATH_FINDER_ID
    }

    fn find_spec(&self, name: &ModuleName) -> Option<ModuleSpec> {
        let path = self
            .search_paths
            .iter()
            .flat_map(|root| expand_path(root, name.segments(), &self.suffix))
            .find(|candidate| candidate.is_file())?;

        debug!("Found {} at {}", name, path.display());
        Some(ModuleSpec {
            name: name.clone(),
            origin: ModuleOrigin::File(path),
        })
    }

    fn get_source(&self, spec: &ModuleSpec) -> Result<Vec<u8>, ImportError> {
        let ModuleOrigin::File(path) = &spec.origin else {
            return Err(ImportError::LoaderMismatch {
                finder: PATH_FINDER_ID,
                name: spec.name.to_string(),
            });
        };

        std::fs::read(path).map_err(|source| ImportError::SourceUnreadable {
            name: spec.name.to_string(),
            path: path.clone(),
            source,
        })
    }
}

/// For `root` and `a.b`, the module file `root/a/b.<suffix>` followed by the
/// package file `root/a/b/__init__.<suffix>`.
fn expand_path(root: &Path, segments: &[Arc<str>], suffix: &str) -> [PathBuf; 2] {
    let append = |mut acc: PathBuf, segment: &Arc<str>| {
        acc.push(segment.as_ref());
        acc
    };

    let module_file = match segments.split_last() {
        Some((last, rest)) => rest
            .iter()
            .fold(root.to_path_buf(), append)
            .join(format!("{last}.{suffix}")),
        None => root.to_path_buf(),
    };

    let init_file = segments
        .iter()
        .fold(root.to_path_buf(), append)
        .join(format!("__init__.{suffix}"));

    [module_file, init_file]
}
