//! In-memory [`Backend`] implementation.
//!
//! Grounded on `echo-cas`'s `MemoryTier`: a flat `HashMap` keyed by the
//! serialised PK path, wrapped for interior mutability since [`Backend`]'s
//! methods take `&self` (the SIS engine holds its backend by reference,
//! `spec.md` §5). Sufficient for the engine's own test suite per the design
//! note in `spec.md` §9 ("an in-memory implementation is sufficient for the
//! test suite").

use std::collections::HashMap;
use std::sync::Mutex;

use sis_pk::Pk;

use crate::{require_non_empty, Backend, BackendError};

/// An in-memory, process-local [`Backend`].
///
/// Models a flat namespace: every `Pk` is simply serialised to its path
/// string and used as a map key. There are no real "ancestor directories"
/// to purge on delete, so [`Backend::delete`] here is just a map removal.
#[derive(Default)]
pub struct MemoryBackend {
    records: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored. Exposed for tests and diagnostics.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner).len()
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Backend for MemoryBackend {
    fn create(&self, pk: &Pk, blob: &[u8]) -> Result<(), BackendError> {
        require_non_empty(pk)?;
        let mut records = self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let key = pk.to_path();
        if records.contains_key(&key) {
            return Err(BackendError::AlreadyExists { pk: key });
        }
        records.insert(key, blob.to_vec());
        Ok(())
    }

    fn read(&self, pk: &Pk) -> Result<Vec<u8>, BackendError> {
        require_non_empty(pk)?;
        let records = self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let key = pk.to_path();
        records.get(&key).cloned().ok_or(BackendError::NotFound { pk: key })
    }

    fn update(&self, pk: &Pk, blob: &[u8]) -> Result<(), BackendError> {
        require_non_empty(pk)?;
        let mut records = self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let key = pk.to_path();
        if !records.contains_key(&key) {
            return Err(BackendError::NotFound { pk: key });
        }
        records.insert(key, blob.to_vec());
        Ok(())
    }

    fn delete(&self, pk: &Pk) -> Result<(), BackendError> {
        require_non_empty(pk)?;
        let mut records = self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let key = pk.to_path();
        if records.remove(&key).is_none() {
            return Err(BackendError::NotFound { pk: key });
        }
        Ok(())
    }

    fn exists(&self, pk: &Pk) -> Result<bool, BackendError> {
        require_non_empty(pk)?;
        let records = self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(records.contains_key(&pk.to_path()))
    }

    fn size_of(&self, pk: &Pk) -> Result<u64, BackendError> {
        require_non_empty(pk)?;
        let records = self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let key = pk.to_path();
        records
            .get(&key)
            .map(|blob| blob.len() as u64)
            .ok_or(BackendError::NotFound { pk: key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk(path: &str) -> Pk {
        Pk::parse(path).unwrap()
    }

    // ── 1. create + read round-trip ──────────────────────────────────────

    #[test]
    fn create_read_round_trip() {
        let backend = MemoryBackend::new();
        backend.create(&pk("a/b"), b"hello").unwrap();
        assert_eq!(backend.read(&pk("a/b")).unwrap(), b"hello");
    }

    // ── 2. create on existing pk fails ───────────────────────────────────

    #[test]
    fn create_twice_fails() {
        let backend = MemoryBackend::new();
        backend.create(&pk("a"), b"1").unwrap();
        let err = backend.create(&pk("a"), b"2").unwrap_err();
        assert!(matches!(err, BackendError::AlreadyExists { .. }));
    }

    // ── 3. read of absent pk fails ───────────────────────────────────────

    #[test]
    fn read_missing_fails() {
        let backend = MemoryBackend::new();
        let err = backend.read(&pk("missing")).unwrap_err();
        assert!(matches!(err, BackendError::NotFound { .. }));
    }

    // ── 4. update replaces contents ──────────────────────────────────────

    #[test]
    fn update_replaces_contents() {
        let backend = MemoryBackend::new();
        backend.create(&pk("a"), b"old").unwrap();
        backend.update(&pk("a"), b"new").unwrap();
        assert_eq!(backend.read(&pk("a")).unwrap(), b"new");
    }

    // ── 5. update on absent pk fails ─────────────────────────────────────

    #[test]
    fn update_missing_fails() {
        let backend = MemoryBackend::new();
        let err = backend.update(&pk("a"), b"x").unwrap_err();
        assert!(matches!(err, BackendError::NotFound { .. }));
    }

    // ── 6. delete removes the record ─────────────────────────────────────

    #[test]
    fn delete_removes_record() {
        let backend = MemoryBackend::new();
        backend.create(&pk("a"), b"x").unwrap();
        backend.delete(&pk("a")).unwrap();
        assert!(!backend.exists(&pk("a")).unwrap());
    }

    // ── 7. delete on absent pk fails ─────────────────────────────────────

    #[test]
    fn delete_missing_fails() {
        let backend = MemoryBackend::new();
        let err = backend.delete(&pk("a")).unwrap_err();
        assert!(matches!(err, BackendError::NotFound { .. }));
    }

    // ── 8. exists reflects presence ──────────────────────────────────────

    #[test]
    fn exists_reflects_presence() {
        let backend = MemoryBackend::new();
        assert!(!backend.exists(&pk("a")).unwrap());
        backend.create(&pk("a"), b"x").unwrap();
        assert!(backend.exists(&pk("a")).unwrap());
    }

    // ── 9. size_of reports byte length ───────────────────────────────────

    #[test]
    fn size_of_reports_length() {
        let backend = MemoryBackend::new();
        backend.create(&pk("a"), b"12345").unwrap();
        assert_eq!(backend.size_of(&pk("a")).unwrap(), 5);
    }

    // ── 10. len/is_empty track record count ──────────────────────────────

    #[test]
    fn len_tracks_record_count() {
        let backend = MemoryBackend::new();
        assert!(backend.is_empty());
        backend.create(&pk("a"), b"x").unwrap();
        backend.create(&pk("b"), b"y").unwrap();
        assert_eq!(backend.len(), 2);
    }
}
