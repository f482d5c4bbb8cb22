//! Abstract blob-CRUD backend contract for the SIS engine.
//!
//! `spec.md` §4.2 specifies the engine's only dependency on storage: a
//! byte-blob store indexed by [`Pk`], with `create`/`read`/`update`/`delete`/
//! `exists`/`size_of`, each atomic from the engine's point of view. The
//! concrete backend (filesystem, object store, in-memory map) is deliberately
//! out of scope for the engine itself — this crate ships the trait plus two
//! reference implementations: [`MemoryBackend`] (sufficient for the engine's
//! own test suite) and [`FsBackend`] (the reference filesystem-backed store,
//! ported from the Go prototype's `internal/crud/crudos` package).

#![deny(unsafe_code)]

mod fs;
mod memory;

pub use fs::{FsBackend, FsBackendConfig};
pub use memory::MemoryBackend;

use sis_pk::Pk;

/// Errors a [`Backend`] implementation may return.
///
/// Grounded on `blob_store::Error`'s thiserror shape (a small, closed set of
/// variants with `#[from]` on the one that wraps the underlying OS error) and
/// on `crudos.go`'s convention of naming the failing step in every wrapped
/// error.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// A non-empty PK was required but an empty one was supplied.
    #[error("pk cannot be empty")]
    EmptyPk,
    /// `create` was called for a PK that already has a record.
    #[error("record already exists for pk {pk}")]
    AlreadyExists {
        /// The offending PK, serialised for diagnostics.
        pk: String,
    },
    /// `read`/`update`/`delete`/`size_of` was called for a PK with no record.
    #[error("no record exists for pk {pk}")]
    NotFound {
        /// The offending PK, serialised for diagnostics.
        pk: String,
    },
    /// The underlying storage medium failed.
    #[error("backend io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Abstract byte-blob store indexed by [`Pk`].
///
/// Every operation is atomic from the engine's point of view: a caller never
/// observes a partially-applied `create`/`update`/`delete`. Implementations
/// are free to choose their own locking or transaction strategy to provide
/// that guarantee; the SIS engine itself performs no locking (`spec.md` §5).
pub trait Backend {
    /// Create a new record at `pk` holding `blob`.
    ///
    /// # Errors
    ///
    /// [`BackendError::EmptyPk`] if `pk` has no segments,
    /// [`BackendError::AlreadyExists`] if a record is already present,
    /// [`BackendError::Io`] on any other storage failure.
    fn create(&self, pk: &Pk, blob: &[u8]) -> Result<(), BackendError>;

    /// Read the bytes stored at `pk`.
    ///
    /// # Errors
    ///
    /// [`BackendError::EmptyPk`], [`BackendError::NotFound`], or
    /// [`BackendError::Io`].
    fn read(&self, pk: &Pk) -> Result<Vec<u8>, BackendError>;

    /// Replace the bytes stored at `pk`.
    ///
    /// # Errors
    ///
    /// [`BackendError::EmptyPk`], [`BackendError::NotFound`] if no record
    /// exists yet, or [`BackendError::Io`].
    fn update(&self, pk: &Pk, blob: &[u8]) -> Result<(), BackendError>;

    /// Delete the record at `pk`.
    ///
    /// Implementations that model a hierarchical namespace (like
    /// [`FsBackend`]) must also purge any ancestor container left empty by
    /// the deletion, recursively, stopping before the backend root — the
    /// "ancestor purge rule" of `spec.md` §4.2.
    ///
    /// # Errors
    ///
    /// [`BackendError::EmptyPk`], [`BackendError::NotFound`], or
    /// [`BackendError::Io`].
    fn delete(&self, pk: &Pk) -> Result<(), BackendError>;

    /// Report whether a record exists at `pk`.
    ///
    /// # Errors
    ///
    /// [`BackendError::EmptyPk`] or [`BackendError::Io`].
    fn exists(&self, pk: &Pk) -> Result<bool, BackendError>;

    /// Report the byte size of the record at `pk`.
    ///
    /// # Errors
    ///
    /// [`BackendError::EmptyPk`], [`BackendError::NotFound`], or
    /// [`BackendError::Io`].
    fn size_of(&self, pk: &Pk) -> Result<u64, BackendError>;
}

fn require_non_empty(pk: &Pk) -> Result<(), BackendError> {
    if pk.is_empty() {
        return Err(BackendError::EmptyPk);
    }
    Ok(())
}

/// Forwarding impl so a backend can be shared between an engine and a
/// second handle (e.g. a test harness poking at storage directly while an
/// engine owns the other `Arc`).
impl<T: Backend + ?Sized> Backend for std::sync::Arc<T> {
    fn create(&self, pk: &Pk, blob: &[u8]) -> Result<(), BackendError> {
        (**self).create(pk, blob)
    }

    fn read(&self, pk: &Pk) -> Result<Vec<u8>, BackendError> {
        (**self).read(pk)
    }

    fn update(&self, pk: &Pk, blob: &[u8]) -> Result<(), BackendError> {
        (**self).update(pk, blob)
    }

    fn delete(&self, pk: &Pk) -> Result<(), BackendError> {
        (**self).delete(pk)
    }

    fn exists(&self, pk: &Pk) -> Result<bool, BackendError> {
        (**self).exists(pk)
    }

    fn size_of(&self, pk: &Pk) -> Result<u64, BackendError> {
        (**self).size_of(pk)
    }
}
