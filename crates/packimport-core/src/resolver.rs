use std::sync::Arc;
use tracing::debug;

use crate::descriptor::{normalize_suffix, ModuleDescriptor, ResourceKey, DEFAULT_SOURCE_SUFFIX};
use crate::module_name::ModuleName;
use crate::store::ResourceStore;

/// Decides whether a resource store holds a module.
///
/// Existence is a plain boolean query against the store. The resolver never
/// reads content; the [`SourceProvider`](crate::provider::SourceProvider)
/// owns the single read.
#[derive(Clone)]
pub struct ModuleResolver {
    store: Arc<dyn ResourceStore>,
    suffix: Arc<str>,
}

impl ModuleResolver {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self::with_suffix(store, DEFAULT_SOURCE_SUFFIX)
    }

    /// A leading dot on `suffix` is ignored, so `".py"` and `"py"` agree.
    pub fn with_suffix(store: Arc<dyn ResourceStore>, suffix: &str) -> Self {
        Self {
            store,
            suffix: Arc::from(normalize_suffix(suffix)),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn key_for(&self, name: &ModuleName) -> ResourceKey {
        ResourceKey::for_module(name, &self.suffix)
    }

    /// Look `name` up in the store.
    ///
    /// `None` means "not here, ask the next finder"; it is never an error.
    pub fn resolve(&self, name: &ModuleName) -> Option<ModuleDescriptor> {
        let descriptor = ModuleDescriptor::new(name.clone(), &self.suffix);
        if self.store.exists(descriptor.key().as_str()) {
            debug!("Resource hit for {} at {}", name, descriptor.key());
            Some(descriptor)
        } else {
            debug!("No resource for {}", name);
            None
        }
    }
}

impl std::fmt::Debug for ModuleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleResolver")
            .field("suffix", &self.suffix)
            .finish_non_exhaustive()
    }
}
