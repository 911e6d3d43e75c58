//! Runtime import machinery.
//!
//! # Architecture
//!
//! ```text
//! ImportSystem::import_module("tools.util")
//!   ├── module cache hit? → return it
//!   ├── MetaPath (ordered finders)
//!   │     ├── ResourceFinder   (when installed at the front)
//!   │     ├── BuiltinFinder
//!   │     ├── PathFinder
//!   │     └── ResourceFinder   (when installed at the back)
//!   ├── first finder with a spec → get_source(spec)
//!   ├── Executor::execute(spec, source)
//!   └── cache the module
//! ```
//!
//! Dotted names are looked up whole: importing `tools.util` does not import
//! `tools` first.

mod builtin;
mod exec;
mod module;
mod path_finder;

pub use builtin::{BuiltinFinder, BUILTIN_FINDER_ID};
pub use exec::{AssignmentEvaluator, Executor};
pub use module::{Module, Value};
pub use path_finder::{PathFinder, PATH_FINDER_ID};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::descriptor::ModuleDescriptor;
use crate::diagnostics::{DiagnosticHandler, Location};
use crate::errors::{ImportError, InstallError};
use crate::hook::Priority;
use crate::module_name::ModuleName;

/// Stable identifier of a finder kind, used to keep the meta path free of
/// duplicates.
pub type FinderId = &'static str;

/// Where a module's source came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleOrigin {
    Builtin,
    File(PathBuf),
    Resource(ModuleDescriptor),
}

impl ModuleOrigin {
    /// Path shown in diagnostics. For resources this is the virtual path,
    /// which does not exist on disk.
    pub fn diagnostic_path(&self) -> String {
        match self {
            Self::Builtin => "<builtin>".to_string(),
            Self::File(path) => path.display().to_string(),
            Self::Resource(descriptor) => descriptor.virtual_path().to_string(),
        }
    }
}

/// A finder's answer to "can you load this name".
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleSpec {
    pub name: ModuleName,
    pub origin: ModuleOrigin,
}

/// One entry of the meta path: a finder and the loader for what it finds.
pub trait Finder: Send + Sync {
    fn id(&self) -> FinderId;

    /// `None` lets the search continue with the next finder. Must not fail.
    fn find_spec(&self, name: &ModuleName) -> Option<ModuleSpec>;

    /// Source bytes for a spec this finder produced.
    fn get_source(&self, spec: &ModuleSpec) -> Result<Vec<u8>, ImportError>;
}

/// Ordered list of finders consulted by an import.
#[derive(Default)]
pub struct MetaPath {
    finders: RwLock<Vec<Arc<dyn Finder>>>,
}

impl MetaPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `finder` at the front or back, returning its position.
    ///
    /// The check and the insert happen under one write lock; a finder whose
    /// id is already present is refused and the list is left as it was.
    pub fn register(
        &self,
        finder: Arc<dyn Finder>,
        priority: Priority,
    ) -> Result<usize, InstallError> {
        let mut finders = self.finders.write();
        let id = finder.id();
        if let Some(position) = finders.iter().position(|f| f.id() == id) {
            return Err(InstallError::AlreadyRegistered { id, position });
        }

        let position = match priority {
            Priority::Front => {
                finders.insert(0, finder);
                0
            }
            Priority::Back => {
                finders.push(finder);
                finders.len() - 1
            }
        };
        debug!("Registered finder '{}' at position {}", id, position);
        Ok(position)
    }

    pub fn push_front(&self, finder: Arc<dyn Finder>) -> Result<usize, InstallError> {
        self.register(finder, Priority::Front)
    }

    pub fn push_back(&self, finder: Arc<dyn Finder>) -> Result<usize, InstallError> {
        self.register(finder, Priority::Back)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.finders.read().iter().position(|f| f.id() == id)
    }

    /// Finder ids in search order.
    pub fn ids(&self) -> Vec<FinderId> {
        self.finders.read().iter().map(|f| f.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.finders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.finders.read().is_empty()
    }

    /// Copy of the current list; searches run on it without holding the lock.
    fn snapshot(&self) -> Vec<Arc<dyn Finder>> {
        self.finders.read().clone()
    }
}

/// The runtime side of imports: meta path, module cache and executor.
pub struct ImportSystem {
    meta_path: MetaPath,
    modules: RwLock<FxHashMap<ModuleName, Arc<Module>>>,
    executor: Arc<dyn Executor>,
    diagnostics: Arc<dyn DiagnosticHandler>,
}

impl ImportSystem {
    pub fn new(executor: Arc<dyn Executor>, diagnostics: Arc<dyn DiagnosticHandler>) -> Self {
        Self {
            meta_path: MetaPath::new(),
            modules: RwLock::new(FxHashMap::default()),
            executor,
            diagnostics,
        }
    }

    pub fn meta_path(&self) -> &MetaPath {
        &self.meta_path
    }

    /// Import `name`, returning the cached module if it was imported before.
    ///
    /// Failures are not cached, so a later import tries the finders again.
    pub fn import_module(&self, name: &str) -> Result<Arc<Module>, ImportError> {
        let name = ModuleName::parse(name)?;
        if let Some(module) = self.modules.read().get(&name) {
            return Ok(Arc::clone(module));
        }

        let result = self.load_uncached(&name);
        match result {
            Ok(module) => {
                let mut modules = self.modules.write();
                let cached = modules.entry(name).or_insert(module);
                Ok(Arc::clone(cached))
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Which finder would serve `name`, without loading anything.
    pub fn find_spec(&self, name: &ModuleName) -> Option<(FinderId, ModuleSpec)> {
        self.meta_path
            .snapshot()
            .iter()
            .find_map(|finder| finder.find_spec(name).map(|spec| (finder.id(), spec)))
    }

    pub fn insert_module(&self, module: Module) -> Arc<Module> {
        let module = Arc::new(module);
        self.modules
            .write()
            .insert(module.name().clone(), Arc::clone(&module));
        module
    }

    pub fn is_cached(&self, name: &str) -> bool {
        ModuleName::parse(name).is_ok_and(|name| self.modules.read().contains_key(&name))
    }

    /// Names of cached modules, sorted.
    pub fn cached_modules(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .modules
            .read()
            .keys()
            .map(|n| n.to_string())
            .collect();
        names.sort();
        names
    }

    fn load_uncached(&self, name: &ModuleName) -> Result<Arc<Module>, ImportError> {
        for finder in self.meta_path.snapshot() {
            let Some(spec) = finder.find_spec(name) else {
                continue;
            };

            debug!("Finder '{}' matched {}", finder.id(), name);
            let source = finder.get_source(&spec)?;
            let module = self.executor.execute(&spec, &source)?;
            return Ok(Arc::new(module));
        }

        Err(ImportError::ModuleNotFound {
            name: name.to_string(),
        })
    }

    fn report(&self, err: &ImportError) {
        let location = match err {
            ImportError::Execution { path, line, .. } => Location::new(path.clone(), *line),
            ImportError::ResourceUnavailable { path, .. } => Location::file(path.clone()),
            ImportError::SourceUnreadable { path, .. } => Location::file(path.display().to_string()),
            _ => Location::file(format!("<import {}>", err.module_name())),
        };
        warn!("Import of {} failed: {}", err.module_name(), err);
        self.diagnostics.error(location, &err.to_string());
    }
}
