//! Internal helper methods on [`Sis`], ported 1:1 from `sisprivate.go`.
//!
//! None of this module is part of the public contract (`spec.md` §6: the
//! engine exposes exactly `new`/`create`/`read`/`delete`); everything here
//! is `pub(crate)`.

use sis_backend::{Backend, BackendError};
use sis_digest::Hasher;
use sis_pk::Pk;

use crate::model::{BlobMetadata, Header};
use crate::namespaces;
use crate::{Sis, SisError};

impl<H: Hasher, B: Backend> Sis<H, B> {
    pub(crate) fn pk_exists(&self, pk: &Pk) -> Result<bool, SisError> {
        self.data_header_exists(pk)
    }

    pub(crate) fn data_header_exists(&self, pk: &Pk) -> Result<bool, SisError> {
        Ok(self.backend.exists(&namespaces::data_header_pk(pk))?)
    }

    pub(crate) fn read_header(&self, pk: &Pk) -> Result<Header, SisError> {
        let bytes = self.backend.read(&namespaces::data_header_pk(pk)).map_err(|e| match e {
            BackendError::NotFound { pk } => SisError::PkNotFound { pk },
            other => SisError::Backend(other),
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) fn delete_header(&self, pk: &Pk) -> Result<(), SisError> {
        self.backend.delete(&namespaces::data_header_pk(pk))?;
        Ok(())
    }

    pub(crate) fn persist_header(&self, header: &Header) -> Result<(), SisError> {
        let bytes = serde_json::to_vec(header)?;
        self.backend.create(&namespaces::data_header_pk(&header.pk), &bytes)?;
        Ok(())
    }

    pub(crate) fn digest_exists(&self, digest: &str) -> Result<bool, SisError> {
        Ok(self.backend.exists(&namespaces::blob_pk(digest))?)
    }

    pub(crate) fn read_blob(&self, digest: &str) -> Result<Vec<u8>, SisError> {
        Ok(self.backend.read(&namespaces::blob_pk(digest))?)
    }

    pub(crate) fn delete_blob(&self, digest: &str) -> Result<(), SisError> {
        self.backend.delete(&namespaces::blob_pk(digest))?;
        Ok(())
    }

    /// Write the blob and an empty-list metadata record for a first-seen
    /// digest. Mirrors `persistBlob` in `sisprivate.go`.
    pub(crate) fn persist_blob(&self, digest: &str, blob: &[u8]) -> Result<(), SisError> {
        let metadata_bytes = serde_json::to_vec(&BlobMetadata::default())?;
        self.backend.create(&namespaces::blob_pk(digest), blob)?;
        self.backend.create(&namespaces::metadata_pk(digest), &metadata_bytes)?;
        Ok(())
    }

    pub(crate) fn read_metadata(&self, digest: &str) -> Result<BlobMetadata, SisError> {
        let bytes = self.backend.read(&namespaces::metadata_pk(digest))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) fn write_metadata(&self, digest: &str, metadata: &BlobMetadata) -> Result<(), SisError> {
        let bytes = serde_json::to_vec(metadata)?;
        self.backend.update(&namespaces::metadata_pk(digest), &bytes)?;
        Ok(())
    }

    pub(crate) fn delete_metadata(&self, digest: &str) -> Result<(), SisError> {
        self.backend.delete(&namespaces::metadata_pk(digest))?;
        Ok(())
    }

    pub(crate) fn add_pk_to_metadata(&self, digest: &str, pk: &Pk) -> Result<(), SisError> {
        let mut metadata = self.read_metadata(digest)?;
        metadata.pk_list.push(pk.clone());
        tracing::debug!(digest, refs = metadata.pk_list.len(), "appended pk reference");
        self.write_metadata(digest, &metadata)
    }

    /// Remove `pk` from the digest's back-reference list. Returns `true` if
    /// the blob (and its metadata) should now be deleted because the list
    /// became empty.
    ///
    /// Tolerates an already-empty list (should not occur given invariant 2
    /// in `spec.md` §3, but the Go source guards it explicitly in
    /// `removeKeyFromDigestMetadata` and this keeps that tolerance).
    /// Tie-break on duplicates: only the first matching occurrence found by
    /// linear scan is removed (`spec.md` §4.4.3), via swap-remove rather
    /// than shift (`spec.md` §9 design note — a local decision that leaves
    /// the JSON array wire format untouched).
    pub(crate) fn remove_pk_from_metadata(&self, digest: &str, pk: &Pk) -> Result<bool, SisError> {
        let mut metadata = self.read_metadata(digest)?;

        if metadata.pk_list.is_empty() {
            self.delete_metadata(digest)?;
            tracing::debug!(digest, "pk-list already empty -> absent");
            return Ok(true);
        }

        let index = metadata
            .pk_list
            .iter()
            .position(|candidate| candidate == pk)
            .ok_or_else(|| SisError::InconsistentMetadata {
                pk: pk.to_path(),
                digest: digest.to_string(),
            })?;
        metadata.pk_list.swap_remove(index);

        if metadata.pk_list.is_empty() {
            self.delete_metadata(digest)?;
            tracing::debug!(digest, "pk-list empty -> absent");
            return Ok(true);
        }

        self.write_metadata(digest, &metadata)?;
        tracing::debug!(digest, refs = metadata.pk_list.len(), "removed pk reference");
        Ok(false)
    }
}
