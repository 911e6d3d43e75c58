pub mod config;
pub mod descriptor;
pub mod di;
pub mod diagnostics;
pub mod errors;
pub mod hook;
pub mod import;
pub mod module_name;
pub mod provider;
pub mod resolver;
pub mod store;

pub use config::{CliOverrides, ImportConfig};
pub use descriptor::{ModuleDescriptor, ResourceKey, VirtualPath, DEFAULT_SOURCE_SUFFIX};
pub use di::Container;
pub use diagnostics::{Diagnostic, DiagnosticHandler, DiagnosticLevel, Location};
pub use errors::{ConfigError, ImportError, InstallError, PackageError, SetupError, StoreError};
pub use hook::{HookInstaller, InstalledHook, Priority, ResourceFinder, RESOURCE_FINDER_ID};
pub use import::{Finder, ImportSystem, MetaPath, Module, ModuleOrigin, ModuleSpec, Value};
pub use module_name::ModuleName;
pub use provider::SourceProvider;
pub use resolver::ModuleResolver;
pub use store::{DirectoryStore, MemoryStore, PackageBuilder, PackagedStore, ResourceStore};
