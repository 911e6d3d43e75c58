//! One-shot installation of the resource finder into a [`MetaPath`].

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::errors::{ImportError, InstallError};
use crate::import::{Finder, FinderId, MetaPath, ModuleOrigin, ModuleSpec};
use crate::module_name::ModuleName;
use crate::provider::SourceProvider;
use crate::resolver::ModuleResolver;
use crate::store::ResourceStore;

pub const RESOURCE_FINDER_ID: FinderId = "resource";

/// Where the resource finder goes in the meta path.
///
/// `Front` makes packaged modules shadow builtin and on-disk modules of the
/// same name. `Back` makes the store a fallback that only serves names no
/// other finder knows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Front,
    Back,
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::Front => "front",
            Priority::Back => "back",
        })
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "front" => Ok(Priority::Front),
            "back" => Ok(Priority::Back),
            other => Err(format!("unknown priority '{other}', expected front or back")),
        }
    }
}

/// Finder backed by a resource store: a resolver for the lookup and a
/// provider for the bytes.
#[derive(Debug)]
pub struct ResourceFinder {
    resolver: ModuleResolver,
    provider: SourceProvider,
}

impl ResourceFinder {
    pub fn new(store: Arc<dyn ResourceStore>, suffix: &str) -> Self {
        Self {
            resolver: ModuleResolver::with_suffix(Arc::clone(&store), suffix),
            provider: SourceProvider::new(store),
        }
    }

    pub fn resolver(&self) -> &ModuleResolver {
        &self.resolver
    }

    pub fn provider(&self) -> &SourceProvider {
        &self.provider
    }
}

impl Finder for ResourceFinder {
    fn id(&self) -> FinderId {
        RESOURCE_FINDER_ID
    }

    fn find_spec(&self, name: &ModuleName) -> Option<ModuleSpec> {
        let descriptor = self.resolver.resolve(name)?;
        Some(ModuleSpec {
            name: name.clone(),
            origin: ModuleOrigin::Resource(descriptor),
        })
    }

    fn get_source(&self, spec: &ModuleSpec) -> Result<Vec<u8>, ImportError> {
        match &spec.origin {
            ModuleOrigin::Resource(descriptor) => self.provider.load(descriptor),
            _ => Err(ImportError::LoaderMismatch {
                finder: RESOURCE_FINDER_ID,
                name: spec.name.to_string(),
            }),
        }
    }
}

/// Proof that the resource finder was installed, and where.
///
/// Only [`HookInstaller::install`] can create one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstalledHook {
    priority: Priority,
}

impl InstalledHook {
    pub fn priority(&self) -> Priority {
        self.priority
    }
}

/// Registers a [`ResourceFinder`] at most once.
pub struct HookInstaller {
    finder: Arc<ResourceFinder>,
    state: Mutex<Option<InstalledHook>>,
}

impl HookInstaller {
    pub fn new(finder: ResourceFinder) -> Self {
        Self {
            finder: Arc::new(finder),
            state: Mutex::new(None),
        }
    }

    pub fn finder(&self) -> &Arc<ResourceFinder> {
        &self.finder
    }

    /// Insert the finder into `meta_path` at `priority`.
    ///
    /// Repeating the call with the same priority returns the existing hook
    /// and leaves the meta path alone. A different priority is refused with
    /// [`InstallError::DuplicateInstall`].
    pub fn install(
        &self,
        meta_path: &MetaPath,
        priority: Priority,
    ) -> Result<InstalledHook, InstallError> {
        let mut state = self.state.lock();
        if let Some(hook) = *state {
            if hook.priority == priority {
                return Ok(hook);
            }
            warn!(
                "Resource finder already installed at {}, refusing {}",
                hook.priority, priority
            );
            return Err(InstallError::DuplicateInstall {
                installed: hook.priority,
                requested: priority,
            });
        }

        let finder: Arc<dyn Finder> = self.finder.clone();
        let position = meta_path.register(finder, priority)?;
        info!(
            "Installed resource finder at {} (position {})",
            priority, position
        );

        let hook = InstalledHook { priority };
        *state = Some(hook);
        Ok(hook)
    }

    pub fn installed(&self) -> Option<InstalledHook> {
        *self.state.lock()
    }
}
