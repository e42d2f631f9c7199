//! In-memory collaborators for exercising resolvers without a file system.

use std::collections::HashMap;
use std::io::{self, Cursor};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::provider::{ResourceStream, StreamProvider};

/// One call made to a [`MemoryProvider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenRequest {
    /// Resource path asked for.
    pub path: String,
    /// Whether the caller asked to bypass transport caches.
    pub force_fresh: bool,
}

/// Stream provider over an in-memory map of paths to bytes.
///
/// Every `open` call is recorded, so tests can assert on the exact lookup
/// order. Resources may be replaced between calls to simulate edits.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    resources: Mutex<HashMap<String, Vec<u8>>>,
    requests: Mutex<Vec<OpenRequest>>,
}

impl MemoryProvider {
    /// Empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryProvider::insert`].
    #[must_use]
    pub fn with_resource(self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    /// Store `bytes` at `path`, replacing any previous content.
    pub fn insert(&self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        lock(&self.resources).insert(path.into(), bytes.into());
    }

    /// Delete the resource at `path`.
    pub fn remove(&self, path: &str) {
        lock(&self.resources).remove(path);
    }

    /// Calls made so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<OpenRequest> {
        lock(&self.requests).clone()
    }

    /// Paths asked for so far, oldest first.
    #[must_use]
    pub fn requested_paths(&self) -> Vec<String> {
        lock(&self.requests)
            .iter()
            .map(|request| request.path.clone())
            .collect()
    }

    /// Forget recorded calls.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }
}

impl StreamProvider for MemoryProvider {
    fn open(&self, resource_path: &str, force_fresh: bool) -> io::Result<Option<ResourceStream>> {
        lock(&self.requests).push(OpenRequest {
            path: resource_path.to_owned(),
            force_fresh,
        });
        Ok(lock(&self.resources)
            .get(resource_path)
            .map(|bytes| Box::new(Cursor::new(bytes.clone())) as ResourceStream))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
