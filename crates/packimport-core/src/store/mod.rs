//! Resource stores: opaque, string-keyed byte stores that module source is
//! read from.
//!
//! The import machinery only ever asks two questions of a store, whether a
//! key exists and what its bytes are. Where the bytes live is the host's
//! business:
//!
//! - [`MemoryStore`] keeps resources in a map (hosts that generate sources,
//!   tests)
//! - [`DirectoryStore`] maps keys onto the files of a directory (development
//!   builds)
//! - [`PackagedStore`] indexes a resource package appended to a binary
//!   (distributed builds)

mod directory;
mod memory;
mod packaged;

pub use directory::DirectoryStore;
pub use memory::MemoryStore;
pub use packaged::{PackageBuilder, PackageEntry, PackagedStore, TRAILER_LEN};

use std::sync::Arc;

use crate::errors::StoreError;

/// Contract every resource store fulfils.
///
/// `exists` must be a pure query: no mutation, no reads that are thrown
/// away. `read` returns the full content of a key and reports
/// [`StoreError::NotFound`] for keys that are absent, which can happen even
/// after `exists` returned `true` if the store changed in between.
pub trait ResourceStore: Send + Sync {
    fn exists(&self, key: &str) -> bool;

    fn read(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    fn read_to_string(&self, key: &str) -> Option<String> {
        self.read(key)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }
}

impl<S: ResourceStore + ?Sized> ResourceStore for Arc<S> {
    fn exists(&self, key: &str) -> bool {
        (**self).exists(key)
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).read(key)
    }
}

impl<S: ResourceStore + ?Sized> ResourceStore for Box<S> {
    fn exists(&self, key: &str) -> bool {
        (**self).exists(key)
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).read(key)
    }
}
