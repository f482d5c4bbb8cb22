//! On-disk record shapes, matching the JSON schemas in `spec.md` §6 exactly.

use serde::{Deserialize, Serialize};
use sis_pk::Pk;

/// Per-PK record in the user namespace, binding a PK to a content digest.
///
/// `metadata` is preserved for forward compatibility (`spec.md` §9, Open
/// Question 4) — the Go prototype exposes this field on `data.Header` but
/// never populates it, and the engine does not interpret it here either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The user PK this header describes (self-descriptive, per `spec.md` §3).
    pub pk: Pk,
    /// Lowercase-hex digest of the content this PK currently maps to.
    pub digest: String,
    /// Reserved free-form metadata; never interpreted by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Back-reference record in the system namespace for a single digest.
///
/// `pk_list` drives ref-counting: a digest's blob stays alive exactly as
/// long as this list is non-empty (`spec.md` §3 invariant 3).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobMetadata {
    /// PKs currently referencing this digest. Order is unspecified;
    /// duplicates are tolerated but not expected (`spec.md` §3).
    #[serde(rename = "pk-list")]
    pub pk_list: Vec<Pk>,
}
