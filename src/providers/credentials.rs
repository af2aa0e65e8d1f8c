//! Shared rotation over a pool of provider credentials

use std::sync::atomic::{AtomicUsize, Ordering};

/// Ordered credential pool with one process-wide rotation cursor
///
/// Every caller starts on the credential the cursor points at. When a
/// credential reports its quota spent, the caller moves the cursor to the next
/// one with a compare-and-swap, so two callers that hit the same exhausted key
/// advance the cursor once, not twice.
pub struct CredentialPool {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl CredentialPool {
    /// Create a pool with the cursor on the first key
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Number of credentials
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when no credentials are configured
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Index of the credential new calls start on
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    /// Credential at `index`
    pub fn key(&self, index: usize) -> Option<&str> {
        self.keys.get(index).map(String::as_str)
    }

    /// The credential under the cursor, with its index
    pub fn current(&self) -> Option<(usize, &str)> {
        let index = self.cursor();
        self.key(index).map(|key| (index, key))
    }

    /// Advance past `used` after it reported quota exhaustion
    ///
    /// Returns the cursor after the attempt. When another caller already moved
    /// the cursor away from `used`, nothing changes and that newer position is
    /// returned.
    pub fn rotate_from(&self, used: usize) -> usize {
        if self.keys.is_empty() {
            return 0;
        }
        let next = (used + 1) % self.keys.len();
        match self
            .cursor
            .compare_exchange(used, next, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => next,
            Err(current) => current,
        }
    }
}

impl std::fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPool")
            .field("len", &self.keys.len())
            .field("cursor", &self.cursor())
            .finish()
    }
}
