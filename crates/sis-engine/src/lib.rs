//! Single-Instance Storage: a content-addressed, deduplicating key-value
//! store built on an abstract blob backend and a streaming content digest.
//!
//! A user-visible [`Pk`] maps to a content digest via a data header; the
//! digest maps to the actual blob plus a back-reference list of every PK
//! currently pointing at it (`spec.md` §3). The engine never deletes a blob
//! while any PK still references it, and never keeps a blob alive once the
//! last referencing PK is gone.
//!
//! The generic parameters are intentionally concrete types, not `dyn`
//! objects (`spec.md` §4.3): callers pick a [`Hasher`] and a [`Backend`]
//! once, at construction, and the engine is monomorphised against that
//! pair.

pub mod error;
pub mod model;
mod namespaces;
mod private;

pub use sis_backend::{Backend, BackendError, FsBackend, FsBackendConfig, MemoryBackend};
pub use sis_digest::{Hasher, Sha256Hasher};
pub use sis_pk::{Pk, PkError};

pub use error::SisError;
pub use model::{BlobMetadata, Header};

/// A Single-Instance Storage engine over a given [`Hasher`] and [`Backend`].
#[derive(Debug)]
pub struct Sis<H: Hasher, B: Backend> {
    hasher: H,
    backend: B,
}

impl<H: Hasher, B: Backend> Sis<H, B> {
    /// Build an engine from an already-configured hasher and backend.
    pub fn new(hasher: H, backend: B) -> Self {
        Self { hasher, backend }
    }

    /// Store `blob` under `pk`.
    ///
    /// Fails with [`SisError::PkAlreadyExists`] if `pk` already has a live
    /// data header (`spec.md` §4.4.1) — callers that want upsert semantics
    /// must `delete` first. The header is persisted before the blob is
    /// deduplicated: a crash between the two leaves a dangling header
    /// (`spec.md` §4.4.1 step 3 before step 4), which `delete` already
    /// knows how to clean up, rather than an orphan blob whose `pk-list`
    /// names a PK with no header (`spec.md` §7, §8 property 6). If the
    /// content's digest has never been seen before, the blob is persisted
    /// alongside a fresh back-reference list; otherwise the existing blob is
    /// reused and `pk` is simply appended to its back-reference list
    /// (`spec.md` §3, the deduplication invariant).
    #[tracing::instrument(skip(self, blob), fields(pk = %pk, len = blob.len()))]
    pub fn create(&mut self, pk: &Pk, blob: &[u8]) -> Result<(), SisError> {
        if self.pk_exists(pk)? {
            tracing::warn!("create rejected: pk already exists");
            return Err(SisError::PkAlreadyExists { pk: pk.to_path() });
        }

        self.hasher.reset();
        self.hasher.write(blob);
        let digest = sis_digest::to_hex(&self.hasher.sum());

        let header = Header { pk: pk.clone(), digest: digest.clone(), metadata: None };
        self.persist_header(&header)?;

        if self.digest_exists(&digest)? {
            tracing::debug!(digest, "digest already present, appending reference");
        } else {
            tracing::debug!(digest, "digest unseen, persisting new blob");
            self.persist_blob(&digest, blob)?;
        }
        self.add_pk_to_metadata(&digest, pk)?;

        Ok(())
    }

    /// Retrieve the blob currently stored under `pk`.
    ///
    /// Fails with [`SisError::PkNotFound`] if no live header exists, or
    /// [`SisError::DanglingHeader`] if the header exists but its digest's
    /// blob is missing — a legal transient post-crash state (`spec.md`
    /// §4.4.2, §5) that `read` surfaces rather than silently recovers from.
    #[tracing::instrument(skip(self), fields(pk = %pk))]
    pub fn read(&self, pk: &Pk) -> Result<Vec<u8>, SisError> {
        let header = self.read_header(pk)?;

        if !self.digest_exists(&header.digest)? {
            tracing::warn!(digest = %header.digest, "dangling header: blob missing");
            return Err(SisError::DanglingHeader { pk: pk.to_path(), digest: header.digest });
        }

        self.read_blob(&header.digest)
    }

    /// Remove `pk` from the store.
    ///
    /// Fails with [`SisError::PkNotFound`] if no live header exists
    /// (`spec.md` §4.4.3 — delete is not idempotent across absence, it is an
    /// error to delete something not present). If `pk` was the last
    /// reference to its digest, the blob and its metadata are removed too.
    ///
    /// If the header is dangling (digest already missing its blob), this
    /// still removes the header and returns successfully: the corrected
    /// behaviour decided for Open Question 1 in `spec.md` §9, replacing the
    /// Go prototype's accidental double-delete of the header in that branch.
    #[tracing::instrument(skip(self), fields(pk = %pk))]
    pub fn delete(&self, pk: &Pk) -> Result<(), SisError> {
        let header = self.read_header(pk)?;

        if !self.digest_exists(&header.digest)? {
            tracing::warn!(digest = %header.digest, "dangling header encountered on delete");
            self.delete_header(pk)?;
            return Ok(());
        }

        let last_reference = self.remove_pk_from_metadata(&header.digest, pk)?;
        if last_reference {
            tracing::debug!(digest = %header.digest, "last reference removed, deleting blob");
            self.delete_blob(&header.digest)?;
        }

        self.delete_header(pk)
    }
}
