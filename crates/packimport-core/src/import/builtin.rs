use rustc_hash::FxHashMap;
use std::sync::Arc;

use super::{Finder, FinderId, ModuleOrigin, ModuleSpec};
use crate::errors::ImportError;
use crate::module_name::ModuleName;

pub const BUILTIN_FINDER_ID: FinderId = "builtin";

/// Finder for modules compiled into the host, registered up front.
#[derive(Debug, Default, Clone)]
pub struct BuiltinFinder {
    modules: FxHashMap<ModuleName, Arc<[u8]>>,
}

impl BuiltinFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a builtin module, replacing any earlier source for `name`.
    pub fn insert(&mut self, name: &str, source: impl AsRef<[u8]>) -> Result<(), ImportError> {
        let name = ModuleName::parse(name)?;
        self.modules.insert(name, Arc::from(source.as_ref()));
        Ok(())
    }

    pub fn with_module(mut self, name: &str, source: impl AsRef<[u8]>) -> Result<Self, ImportError> {
        self.insert(name, source)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Finder for BuiltinFinder {
    fn id(&self) -> FinderId {
        BUILTIN_FINDER_ID
    }

    fn find_spec(&self, name: &ModuleName) -> Option<ModuleSpec> {
        self.modules.contains_key(name).then(|| ModuleSpec {
            name: name.clone(),
            origin: ModuleOrigin::Builtin,
        })
    }

    fn get_source(&self, spec: &ModuleSpec) -> Result<Vec<u8>, ImportError> {
        match (&spec.origin, self.modules.get(&spec.name)) {
            (ModuleOrigin::Builtin, Some(source)) => Ok(source.to_vec()),
            _ => Err(ImportError::LoaderMismatch {
                finder: BUILTIN_FINDER_ID,
                name: spec.name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_module_is_found() {
        let finder = BuiltinFinder::new().with_module("config", "DEBUG = False").unwrap();
        let name = ModuleName::parse("config").unwrap();

        let spec = finder.find_spec(&name).unwrap();

        assert_eq!(spec.origin, ModuleOrigin::Builtin);
        assert_eq!(finder.get_source(&spec).unwrap(), b"DEBUG = False");
    }

    #[test]
    fn test_unknown_module_is_none() {
        let finder = BuiltinFinder::new();
        assert!(finder
            .find_spec(&ModuleName::parse("nothing").unwrap())
            .is_none());
    }

    #[test]
    fn test_rejects_foreign_spec() {
        let finder = BuiltinFinder::new().with_module("config", "A = 1").unwrap();
        let spec = ModuleSpec {
            name: ModuleName::parse("config").unwrap(),
            origin: ModuleOrigin::File("config.py".into()),
        };

        assert!(matches!(
            finder.get_source(&spec),
            Err(ImportError::LoaderMismatch { .. })
        ));
    }
}
