//! Streaming content-digest contract for the SIS engine.
//!
//! `spec.md` §4.3 requires a resettable, streaming hasher: `write` accumulates,
//! `sum` yields the digest for everything written since the last `reset`, and
//! `reset` returns the hasher to its initial empty state. Any collision-resistant
//! function with at least a 128-bit output is acceptable; the Go prototype
//! (`crypto/sha256`, see `test/main.go`) and this port both use SHA-256,
//! grounded on `blob_store`'s `sha2`/`hex` usage for hashing and hex-encoding.

#![deny(unsafe_code)]

use sha2::Digest as _;

/// A streaming, resettable content hasher.
///
/// Implementations own their accumulation state; `sum` must not consume or
/// clear that state (only `reset` does), so that a caller who wants to
/// preview the digest before deciding whether to `reset` may call `sum`
/// freely.
pub trait Hasher {
    /// Accumulate `bytes` into the running digest.
    fn write(&mut self, bytes: &[u8]);

    /// The digest for all bytes written since the last `reset` (or since
    /// construction).
    fn sum(&self) -> Vec<u8>;

    /// Return the hasher to its initial, empty state.
    fn reset(&mut self);
}

/// SHA-256 implementation of [`Hasher`], the digest used by the reference
/// implementation.
#[derive(Default)]
pub struct Sha256Hasher {
    inner: sha2::Sha256,
}

impl Sha256Hasher {
    /// Construct a fresh hasher with no accumulated input.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Hasher for Sha256Hasher {
    fn write(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    fn sum(&self) -> Vec<u8> {
        self.inner.clone().finalize().to_vec()
    }

    fn reset(&mut self) {
        self.inner = sha2::Sha256::new();
    }
}

/// A [`Hasher`] that ignores its input and always produces the same
/// caller-supplied digest.
///
/// Lets engine tests force a digest collision between distinct blobs on
/// demand, per the "Hasher as capability" design note: the engine is
/// generic over `Hasher`, so a test can swap in a hasher that never
/// disagrees with itself to exercise the deduplication path without relying
/// on finding a real SHA-256 collision.
#[cfg(feature = "testing")]
#[derive(Debug, Clone)]
pub struct MockHasher {
    digest: Vec<u8>,
}

#[cfg(feature = "testing")]
impl MockHasher {
    /// Construct a hasher that always sums to `digest`.
    pub fn new(digest: Vec<u8>) -> Self {
        Self { digest }
    }
}

#[cfg(feature = "testing")]
impl Hasher for MockHasher {
    fn write(&mut self, _bytes: &[u8]) {}

    fn sum(&self) -> Vec<u8> {
        self.digest.clone()
    }

    fn reset(&mut self) {}
}

/// Lowercase-hex-encode a digest, as the engine stores it in a [`Header`](../sis_engine/struct.Header.html).
pub fn to_hex(digest: &[u8]) -> String {
    hex::encode(digest)
}

/// Convenience: hash `bytes` in one call with a fresh [`Sha256Hasher`] and
/// return the lowercase-hex digest. Equivalent to `BlobStore::digest_of` in
/// `blob_store`, specialised to the hex-string form the engine persists.
pub fn hex_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256Hasher::new();
    hasher.write(bytes);
    to_hex(&hasher.sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── 1. empty input hashes to the well-known SHA-256(empty) constant ──

    #[test]
    fn empty_input_digest() {
        let digest = hex_digest(b"");
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    // ── 2. write + sum matches a one-shot hash of the same bytes ─────────

    #[test]
    fn streaming_matches_one_shot() {
        let mut hasher = Sha256Hasher::new();
        hasher.write(b"hello, ");
        hasher.write(b"world");
        let streamed = to_hex(&hasher.sum());
        let one_shot = hex_digest(b"hello, world");
        assert_eq!(streamed, one_shot);
    }

    // ── 3. reset returns the hasher to the empty-digest state ────────────

    #[test]
    fn reset_clears_state() {
        let mut hasher = Sha256Hasher::new();
        hasher.write(b"some bytes");
        hasher.reset();
        let after_reset = to_hex(&hasher.sum());
        assert_eq!(after_reset, hex_digest(b""));
    }

    // ── 4. sum does not itself clear state (only reset does) ─────────────

    #[test]
    fn sum_is_not_destructive() {
        let mut hasher = Sha256Hasher::new();
        hasher.write(b"stable");
        let first = hasher.sum();
        let second = hasher.sum();
        assert_eq!(first, second);
    }

    // ── 5. digest width is 32 bytes (>= the 16-byte minimum the contract requires) ──

    #[test]
    fn digest_width() {
        let digest = Sha256Hasher::new().sum();
        assert!(digest.len() >= 16);
        assert_eq!(digest.len(), 32);
    }
}
