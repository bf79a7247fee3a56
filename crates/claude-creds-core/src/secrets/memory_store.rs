//! In-memory secret store

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};

type EntryKey = (String, Option<String>);

/// In-memory secret store for tests and embedding
///
/// Entries are keyed by `(service, account)`. A lookup with an account falls back to the
/// account-less entry for the same service, mirroring how the macOS keychain matches
/// `-a` against a service that was stored without one.
///
/// Every lookup is counted per service, hit or miss, so callers can assert which
/// services a resolution actually touched.
///
/// # Example
///
/// ```
/// use claude_creds_core::secrets::{SecretStore, MemorySecretStore};
///
/// let store = MemorySecretStore::new();
/// store.insert("Claude Safe Storage", None, "blob123");
/// assert!(store.get("Claude Code", None).is_none());
/// assert_eq!(store.query_count("Claude Code"), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<EntryKey, String>>,
    queries: RwLock<HashMap<String, usize>>,
    supported_os: Option<Vec<String>>,
}

impl MemorySecretStore {
    /// Create a new empty memory store that reports support for every OS
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the OS families this store claims to support
    pub fn with_supported_os<I, S>(mut self, families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_os = Some(families.into_iter().map(Into::into).collect());
        self
    }

    /// Add or replace a secret
    pub fn insert(&self, service: &str, account: Option<&str>, value: &str) {
        self.secrets.write().insert(
            (service.to_string(), account.map(str::to_string)),
            value.to_string(),
        );
    }

    /// Remove a secret, returning whether it existed
    pub fn remove(&self, service: &str, account: Option<&str>) -> bool {
        self.secrets
            .write()
            .remove(&(service.to_string(), account.map(str::to_string)))
            .is_some()
    }

    /// Number of lookups made against `service`
    pub fn query_count(&self, service: &str) -> usize {
        self.queries.read().get(service).copied().unwrap_or(0)
    }

    /// Number of lookups made against any service
    pub fn total_queries(&self) -> usize {
        self.queries.read().values().sum()
    }

    pub fn reset_counts(&self) {
        self.queries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.secrets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SecretStore for MemorySecretStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn supports_os(&self, os: &str) -> bool {
        match &self.supported_os {
            Some(families) => families.iter().any(|f| f == os),
            None => true,
        }
    }

    fn lookup(&self, service: &str, account: Option<&str>) -> SecretStoreResult<String> {
        *self.queries.write().entry(service.to_string()).or_insert(0) += 1;

        let secrets = self.secrets.read();
        let scoped = account.and_then(|a| secrets.get(&(service.to_string(), Some(a.to_string()))));
        scoped
            .or_else(|| secrets.get(&(service.to_string(), None)))
            .cloned()
            .ok_or_else(|| SecretStoreError::not_found(service))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_name() {
        assert_eq!(MemorySecretStore::new().name(), "memory");
    }

    #[test]
    fn test_insert_lookup_remove() {
        let store = MemorySecretStore::new();
        assert!(store.is_empty());

        store.insert("svc", None, "value");
        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup("svc", None).unwrap(), "value");

        store.insert("svc", None, "new_value");
        assert_eq!(store.get("svc", None), Some("new_value".to_string()));

        assert!(store.remove("svc", None));
        assert!(!store.remove("svc", None));
        assert!(matches!(store.lookup("svc", None), Err(SecretStoreError::NotFound(_))));
    }

    #[test]
    fn test_account_scoping() {
        let store = MemorySecretStore::new();
        store.insert("svc", Some("alice"), "alice-secret");
        store.insert("other", None, "shared");

        assert_eq!(store.get("svc", Some("alice")), Some("alice-secret".to_string()));
        assert_eq!(store.get("svc", Some("bob")), None);
        assert_eq!(store.get("svc", None), None);
        // account-less entries match any account
        assert_eq!(store.get("other", Some("bob")), Some("shared".to_string()));
    }

    #[test]
    fn test_query_counts() {
        let store = MemorySecretStore::new();
        store.insert("a", None, "1");

        let _ = store.get("a", None);
        let _ = store.get("a", None);
        let _ = store.get("b", None);

        assert_eq!(store.query_count("a"), 2);
        assert_eq!(store.query_count("b"), 1);
        assert_eq!(store.query_count("c"), 0);
        assert_eq!(store.total_queries(), 3);

        store.reset_counts();
        assert_eq!(store.total_queries(), 0);
    }

    #[test]
    fn test_supported_os() {
        let any = MemorySecretStore::new();
        assert!(any.supports_os("linux"));

        let mac_only = MemorySecretStore::new().with_supported_os(["macos"]);
        assert!(mac_only.supports_os("macos"));
        assert!(!mac_only.supports_os("linux"));
    }

    #[test]
    fn test_memory_store_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemorySecretStore::new());
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let service = format!("svc_{}", i);
                    store.insert(&service, None, "v");
                    assert_eq!(store.get(&service, None), Some("v".to_string()));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 10);
        assert_eq!(store.total_queries(), 10);
    }
}
