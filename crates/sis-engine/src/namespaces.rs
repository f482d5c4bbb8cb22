//! Well-known PK namespaces, ported from the Go prototype's
//! `internal/constants` package (`UserDataSpace`, `SystemDataSpace`,
//! `DataHeaderSuffix` package-level `pk.PK` values).

use sis_pk::Pk;

fn static_pk(segments: &[&str]) -> Pk {
    Pk::from_segments(segments.iter().map(|s| (*s).to_string()).collect())
        .expect("hard-coded namespace segments are always valid pk segments")
}

fn user_data_space() -> Pk {
    static_pk(&["user", "data"])
}

fn system_data_space() -> Pk {
    static_pk(&["sys", "data"])
}

fn data_header_suffix() -> Pk {
    static_pk(&["data-header"])
}

fn blob_suffix() -> Pk {
    static_pk(&["blob"])
}

fn metadata_suffix() -> Pk {
    static_pk(&["metadata"])
}

fn digest_pk(digest: &str) -> Pk {
    Pk::from_segments(vec![digest.to_string()])
        .expect("a hex digest string is always a single valid pk segment")
}

/// `user/data/<pk-segments…>/data-header`
pub(crate) fn data_header_pk(pk: &Pk) -> Pk {
    pk.prefix(&user_data_space()).suffix(&data_header_suffix())
}

/// `sys/data/<digest>/blob`
pub(crate) fn blob_pk(digest: &str) -> Pk {
    system_data_space().suffix(&digest_pk(digest)).suffix(&blob_suffix())
}

/// `sys/data/<digest>/metadata`
pub(crate) fn metadata_pk(digest: &str) -> Pk {
    system_data_space().suffix(&digest_pk(digest)).suffix(&metadata_suffix())
}
