use std::sync::Arc;
use tracing::warn;

use crate::descriptor::{ModuleDescriptor, VirtualPath};
use crate::errors::{ImportError, StoreError};
use crate::store::ResourceStore;

/// Fetches module source out of a resource store.
///
/// The read happens here and only here. A descriptor is a claim that the
/// resource existed when it was resolved; if the store changed since, or
/// the resource is empty, `load` fails with
/// [`ImportError::ResourceUnavailable`] instead of returning stale or
/// partial bytes. There is no retry.
#[derive(Clone)]
pub struct SourceProvider {
    store: Arc<dyn ResourceStore>,
}

impl SourceProvider {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    pub fn load(&self, descriptor: &ModuleDescriptor) -> Result<Vec<u8>, ImportError> {
        let key = descriptor.key().as_str();
        let result = match self.store.read(key) {
            Ok(bytes) if bytes.is_empty() => Err(StoreError::Empty {
                key: key.to_string(),
            }),
            other => other,
        };

        result.map_err(|source| {
            warn!(
                "Resource for {} is unavailable: {}",
                descriptor.name(),
                source
            );
            ImportError::ResourceUnavailable {
                name: descriptor.name().to_string(),
                path: descriptor.virtual_path().to_string(),
                source,
            }
        })
    }

    /// Path handed to the executor for diagnostics. Never opened.
    pub fn diagnostic_path<'a>(&self, descriptor: &'a ModuleDescriptor) -> &'a VirtualPath {
        descriptor.virtual_path()
    }
}

impl std::fmt::Debug for SourceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceProvider").finish_non_exhaustive()
    }
}
