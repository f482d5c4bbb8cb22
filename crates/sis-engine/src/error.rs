//! Error kinds for the SIS engine, one variant per kind named in
//! `spec.md` §7. Each variant names the step that failed, carrying forward
//! the Go prototype's `fmt.Errorf("error on s.X: %w", err)` wrapping
//! convention into `thiserror`'s `#[error]`/`#[source]` chaining.

/// Errors returned by [`crate::Sis`]'s public operations.
#[derive(Debug, thiserror::Error)]
pub enum SisError {
    /// `Create` was called for a PK that already has a live data header.
    #[error("pk already exists: {pk}")]
    PkAlreadyExists {
        /// The conflicting PK, serialised for diagnostics.
        pk: String,
    },
    /// `Read`/`Delete` was called for a PK with no live data header.
    #[error("pk not found: {pk}")]
    PkNotFound {
        /// The missing PK, serialised for diagnostics.
        pk: String,
    },
    /// `Read` found a header but its digest has no blob (transient
    /// post-crash state; `spec.md` §4.4.2 treats this as an I/O-class error).
    #[error("dangling header: pk {pk} references digest {digest} with no blob")]
    DanglingHeader {
        /// The PK whose header is dangling.
        pk: String,
        /// The digest the header points to.
        digest: String,
    },
    /// `Delete` located the digest's metadata but the back-reference list
    /// did not contain the PK being removed (`spec.md` §3 invariant 2 would
    /// otherwise guarantee this can't happen).
    #[error("inconsistent metadata: pk {pk} not present in pk-list for digest {digest}")]
    InconsistentMetadata {
        /// The PK that should have been present.
        pk: String,
        /// The digest whose metadata was inconsistent.
        digest: String,
    },
    /// Any wrapped backend failure (create/read/update/delete/exists/size_of).
    #[error("backend error: {0}")]
    Backend(#[from] sis_backend::BackendError),
    /// Header or metadata JSON could not be parsed or serialised.
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}
