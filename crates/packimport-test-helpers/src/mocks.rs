//! Mock implementations for testing

use packimport_core::diagnostics::{Diagnostic, DiagnosticHandler};
use packimport_core::{MemoryStore, ResourceStore, StoreError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A mock diagnostic handler that collects diagnostics
#[derive(Debug, Default)]
pub struct MockDiagnosticHandler {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl MockDiagnosticHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<String> {
        self.diagnostics
            .lock()
            .iter()
            .map(|d| format!("{}: {}", d.location, d.message))
            .collect()
    }
}

impl DiagnosticHandler for MockDiagnosticHandler {
    fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().push(diagnostic);
    }

    fn get_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }
}

/// Store wrapper that counts the calls made against it
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: MemoryStore,
    exists_calls: AtomicUsize,
    read_calls: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: MemoryStore) -> Arc<Self> {
        Arc::new(Self {
            inner,
            ..Self::default()
        })
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }
}

impl ResourceStore for CountingStore {
    fn exists(&self, key: &str) -> bool {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.exists(key)
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.read(key)
    }
}

/// Store whose keys disappear right after `exists` reports them, so the
/// following read fails the way a concurrently emptied store would.
#[derive(Debug, Default)]
pub struct VanishingStore {
    inner: MemoryStore,
}

impl VanishingStore {
    pub fn new(inner: MemoryStore) -> Arc<Self> {
        Arc::new(Self { inner })
    }
}

impl ResourceStore for VanishingStore {
    fn exists(&self, key: &str) -> bool {
        self.inner.remove(key).is_some()
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.inner.read(key)
    }
}
