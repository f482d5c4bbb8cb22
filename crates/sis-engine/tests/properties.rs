//! Universal-property and boundary-case tests (`spec.md` §8).

use sis_backend::{Backend, FsBackend, FsBackendConfig, MemoryBackend};
use sis_digest::Sha256Hasher;
use sis_engine::{Sis, SisError};
use sis_pk::Pk;

fn mem_engine() -> Sis<Sha256Hasher, MemoryBackend> {
    Sis::new(Sha256Hasher::default(), MemoryBackend::new())
}

fn pk(path: &str) -> Pk {
    Pk::parse(path).expect("valid pk in test fixture")
}

#[test]
fn round_trip_preserves_content() {
    let mut sis = mem_engine();
    sis.create(&pk("a/b/c"), b"round trip me").unwrap();
    assert_eq!(sis.read(&pk("a/b/c")).unwrap(), b"round trip me");
}

#[test]
fn create_is_not_idempotent_under_conflict() {
    let mut sis = mem_engine();
    sis.create(&pk("x"), b"first").unwrap();
    let err = sis.create(&pk("x"), b"second").unwrap_err();
    assert!(matches!(err, SisError::PkAlreadyExists { .. }));
}

#[test]
fn delete_is_not_idempotent_under_absence() {
    let sis = mem_engine();
    let err = sis.delete(&pk("never-created")).unwrap_err();
    assert!(matches!(err, SisError::PkNotFound { .. }));
}

#[test]
fn read_of_absent_pk_fails() {
    let sis = mem_engine();
    let err = sis.read(&pk("never-created")).unwrap_err();
    assert!(matches!(err, SisError::PkNotFound { .. }));
}

#[test]
fn identical_content_deduplicates_to_one_digest_directory() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FsBackend::new(FsBackendConfig::with_root(dir.path().to_path_buf())).unwrap();
    let mut sis = Sis::new(Sha256Hasher::default(), backend);

    sis.create(&pk("one"), b"shared").unwrap();
    sis.create(&pk("two"), b"shared").unwrap();
    sis.create(&pk("three"), b"different").unwrap();

    let digest_dirs: Vec<_> =
        std::fs::read_dir(dir.path().join("sys").join("data")).unwrap().collect();
    assert_eq!(digest_dirs.len(), 2, "expected one digest directory per distinct content");

    assert_eq!(sis.read(&pk("one")).unwrap(), b"shared");
    assert_eq!(sis.read(&pk("two")).unwrap(), b"shared");
}

#[test]
fn empty_blob_is_a_legal_value() {
    let mut sis = mem_engine();
    sis.create(&pk("empty"), b"").unwrap();
    assert_eq!(sis.read(&pk("empty")).unwrap(), b"");
}

#[test]
fn single_segment_pk_is_legal() {
    let mut sis = mem_engine();
    sis.create(&pk("solo"), b"v").unwrap();
    assert_eq!(sis.read(&pk("solo")).unwrap(), b"v");
}

#[test]
fn large_pk_list_is_supported() {
    let mut sis = mem_engine();
    for i in 0..1000 {
        sis.create(&pk(&format!("many/{i}")), b"shared content").unwrap();
    }
    for i in 0..1000 {
        assert_eq!(sis.read(&pk(&format!("many/{i}"))).unwrap(), b"shared content");
    }
    // Tear every reference down except one and confirm the survivor still reads.
    for i in 1..1000 {
        sis.delete(&pk(&format!("many/{i}"))).unwrap();
    }
    assert_eq!(sis.read(&pk("many/0")).unwrap(), b"shared content");
}

#[test]
fn dangling_header_surfaces_as_error_not_panic() {
    use std::sync::Arc;

    let backend = Arc::new(MemoryBackend::new());
    let mut sis = Sis::new(Sha256Hasher::default(), Arc::clone(&backend));
    sis.create(&pk("k"), b"v").unwrap();

    let digest = sis_digest::hex_digest(b"v");
    let blob_pk =
        Pk::from_segments(vec!["sys".into(), "data".into(), digest, "blob".into()]).unwrap();
    backend.delete(&blob_pk).unwrap();

    let err = sis.read(&pk("k")).unwrap_err();
    assert!(matches!(err, SisError::DanglingHeader { .. }));
}

#[test]
fn fs_backend_round_trip_and_teardown() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FsBackend::new(FsBackendConfig::with_root(dir.path().to_path_buf())).unwrap();
    let mut sis = Sis::new(Sha256Hasher::default(), backend);

    sis.create(&pk("dir/nested/key"), b"fs content").unwrap();
    assert_eq!(sis.read(&pk("dir/nested/key")).unwrap(), b"fs content");

    sis.delete(&pk("dir/nested/key")).unwrap();
    assert!(matches!(sis.read(&pk("dir/nested/key")), Err(SisError::PkNotFound { .. })));

    // Ancestor purge rule: with the only pk and digest gone, nothing should
    // remain under the backend root.
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(entries.is_empty(), "expected backend root to be fully purged, found {entries:?}");
}
