//! Run-scoped record of documents already submitted successfully.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Concurrency-safe set of absolute document paths.
///
/// Clones share the same underlying set. Nothing is persisted; a new
/// watcher run starts empty.
#[derive(Debug, Clone, Default)]
pub struct ProcessedSet {
    inner: Arc<Mutex<HashSet<PathBuf>>>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.lock().contains(path)
    }

    /// Mark a path processed. Returns false if it already was.
    pub fn insert(&self, path: impl Into<PathBuf>) -> bool {
        self.lock().insert(path.into())
    }

    /// Forget a path so it can be submitted again.
    pub fn remove(&self, path: &Path) -> bool {
        self.lock().remove(path)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Sorted copy of the current entries.
    pub fn snapshot(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.lock().iter().cloned().collect();
        paths.sort();
        paths
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<PathBuf>> {
        // No cross-entry invariant to protect, so poisoning is ignored.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let set = ProcessedSet::new();
        let other = set.clone();

        assert!(set.insert("/uploads/a.pdf"));
        assert!(!other.insert("/uploads/a.pdf"));
        assert!(other.contains(Path::new("/uploads/a.pdf")));
        assert_eq!(set.len(), 1);

        assert!(other.remove(Path::new("/uploads/a.pdf")));
        assert!(set.is_empty());
    }

    #[test]
    fn test_concurrent_inserts() {
        let set = ProcessedSet::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let set = set.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        set.insert(format!("/uploads/{}-{}.pdf", i, j % 10));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(set.len(), 80);
        assert_eq!(set.snapshot().first(), Some(&PathBuf::from("/uploads/0-0.pdf")));
    }
}
