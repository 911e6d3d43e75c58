use crate::config::ImportConfig;
use crate::diagnostics::{ConsoleDiagnosticHandler, DiagnosticHandler};
use crate::errors::{ImportError, SetupError};
use crate::hook::{HookInstaller, InstalledHook, ResourceFinder};
use crate::import::{AssignmentEvaluator, BuiltinFinder, ImportSystem, Module, PathFinder};
use crate::store::{DirectoryStore, MemoryStore, PackagedStore, ResourceStore};
use std::sync::Arc;
use tracing::info;

/// Dependency injection container
/// Owns the shared dependencies and the wired-up import system
pub struct Container {
    config: Arc<ImportConfig>,
    diagnostic_handler: Arc<dyn DiagnosticHandler>,
    store: Arc<dyn ResourceStore>,
    installer: HookInstaller,
    import_system: ImportSystem,
    hook: InstalledHook,
}

impl Container {
    /// Create a new container with production dependencies
    pub fn new(config: ImportConfig) -> Result<Self, SetupError> {
        let diagnostic_handler = Arc::new(ConsoleDiagnosticHandler::new(config.pretty));
        let store = open_store(&config)?;
        Self::with_dependencies(config, diagnostic_handler, store, BuiltinFinder::new())
    }

    /// Create a container with custom dependencies (for testing)
    pub fn with_dependencies(
        config: ImportConfig,
        diagnostic_handler: Arc<dyn DiagnosticHandler>,
        store: Arc<dyn ResourceStore>,
        builtins: BuiltinFinder,
    ) -> Result<Self, SetupError> {
        let config = Arc::new(config);

        let import_system = ImportSystem::new(
            Arc::new(AssignmentEvaluator),
            Arc::clone(&diagnostic_handler),
        );
        let meta_path = import_system.meta_path();
        meta_path.push_back(Arc::new(builtins))?;
        meta_path.push_back(Arc::new(PathFinder::with_suffix(
            config.search_paths.clone(),
            &config.source_suffix,
        )))?;

        let installer = HookInstaller::new(ResourceFinder::new(
            Arc::clone(&store),
            &config.source_suffix,
        ));
        let hook = installer.install(meta_path, config.priority)?;

        Ok(Container {
            config,
            diagnostic_handler,
            store,
            installer,
            import_system,
            hook,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Arc<ImportConfig> {
        &self.config
    }

    pub fn diagnostic_handler(&self) -> &Arc<dyn DiagnosticHandler> {
        &self.diagnostic_handler
    }

    pub fn store(&self) -> &Arc<dyn ResourceStore> {
        &self.store
    }

    pub fn installer(&self) -> &HookInstaller {
        &self.installer
    }

    pub fn import_system(&self) -> &ImportSystem {
        &self.import_system
    }

    pub fn hook(&self) -> InstalledHook {
        self.hook
    }

    pub fn import_module(&self, name: &str) -> Result<Arc<Module>, ImportError> {
        self.import_system.import_module(name)
    }

    /// Check if any errors have been reported
    pub fn has_errors(&self) -> bool {
        self.diagnostic_handler.has_errors()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostic_handler.error_count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostic_handler.warning_count()
    }
}

/// Pick the resource store named by the configuration.
fn open_store(config: &ImportConfig) -> Result<Arc<dyn ResourceStore>, SetupError> {
    if let Some(path) = &config.package {
        let store = PackagedStore::from_file(path).map_err(|source| SetupError::Package {
            path: path.clone(),
            source,
        })?;
        return Ok(Arc::new(store));
    }

    if let Some(root) = &config.resource_dir {
        if !root.is_dir() {
            return Err(SetupError::MissingResourceDir { path: root.clone() });
        }
        info!("Serving resources from {}", root.display());
        return Ok(Arc::new(DirectoryStore::new(root.clone())));
    }

    Ok(Arc::new(MemoryStore::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingDiagnosticHandler;
    use crate::hook::{Priority, RESOURCE_FINDER_ID};
    use crate::import::{Value, BUILTIN_FINDER_ID, PATH_FINDER_ID};
    use crate::store::PackageBuilder;
    use tempfile::TempDir;

    #[test]
    fn test_container_creation() {
        let container = Container::new(ImportConfig::default()).unwrap();

        assert_eq!(container.error_count(), 0);
        assert!(!container.has_errors());
        assert_eq!(container.hook().priority(), Priority::Front);
        assert_eq!(
            container.import_system().meta_path().ids(),
            vec![RESOURCE_FINDER_ID, BUILTIN_FINDER_ID, PATH_FINDER_ID]
        );
    }

    #[test]
    fn test_container_with_mock_dependencies() {
        let config = ImportConfig {
            priority: Priority::Back,
            ..ImportConfig::default()
        };
        let diagnostics = Arc::new(CollectingDiagnosticHandler::new());
        let store = Arc::new(MemoryStore::from_entries([("tools.util.py", "VALUE = 1")]));

        let container = Container::with_dependencies(
            config,
            diagnostics.clone(),
            store,
            BuiltinFinder::new(),
        )
        .unwrap();

        let module = container.import_module("tools.util").unwrap();
        assert_eq!(module.get("VALUE"), Some(&Value::Int(1)));

        assert!(container.import_module("missing.mod").is_err());
        assert!(container.has_errors());
        assert_eq!(diagnostics.error_count(), 1);
    }

    #[test]
    fn test_package_takes_precedence_over_resource_dir() {
        let dir = TempDir::new().unwrap();
        let package = dir.path().join("game.pak");
        let mut builder = PackageBuilder::new();
        builder.add("game.py", "SOURCE = 'package'").unwrap();
        std::fs::write(&package, builder.build()).unwrap();
        std::fs::write(dir.path().join("game.py"), "SOURCE = 'dir'").unwrap();

        let container = Container::new(ImportConfig {
            package: Some(package),
            resource_dir: Some(dir.path().to_path_buf()),
            ..ImportConfig::default()
        })
        .unwrap();

        let module = container.import_module("game").unwrap();
        assert_eq!(module.get("SOURCE"), Some(&Value::Str("package".to_string())));
    }

    #[test]
    fn test_missing_resource_dir_is_a_setup_error() {
        let dir = TempDir::new().unwrap();
        let result = Container::new(ImportConfig {
            resource_dir: Some(dir.path().join("nope")),
            ..ImportConfig::default()
        });
        assert!(matches!(result, Err(SetupError::MissingResourceDir { .. })));
    }

    #[test]
    fn test_bad_package_is_a_setup_error() {
        let dir = TempDir::new().unwrap();
        let package = dir.path().join("broken.pak");
        std::fs::write(&package, b"short").unwrap();

        let result = Container::new(ImportConfig {
            package: Some(package),
            ..ImportConfig::default()
        });
        assert!(matches!(result, Err(SetupError::Package { .. })));
    }
}
