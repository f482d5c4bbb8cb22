//! Walks through the same create/read/delete sequence the prototype's own
//! smoke test used, against a real [`FsBackend`] rooted in a temp directory.
//!
//! Not part of the crate's public contract — a runnable illustration only.

use anyhow::Context;
use sis_engine::{FsBackend, FsBackendConfig, Pk, Sha256Hasher, Sis};

fn main() -> anyhow::Result<()> {
    sis_telemetry::init_json_logging().ok();

    let root = tempfile::tempdir().context("creating scratch backend root")?;
    let backend = FsBackend::new(FsBackendConfig::with_root(root.path().to_path_buf()))
        .context("initialising filesystem backend")?;
    let mut sis = Sis::new(Sha256Hasher::default(), backend);

    let content1 = b"hello";
    let content2 = b"byebye";

    sis.create(&Pk::parse("hello/world")?, content1).context("creating hello/world")?;
    sis.create(&Pk::parse("hello/world2")?, content1).context("creating hello/world2")?;
    sis.create(&Pk::parse("bye/world")?, content2).context("creating bye/world")?;

    let blob = sis.read(&Pk::parse("hello/world")?).context("reading hello/world")?;
    let blob2 = sis.read(&Pk::parse("hello/world2")?).context("reading hello/world2")?;
    println!("{} {}", String::from_utf8_lossy(&blob), String::from_utf8_lossy(&blob2));

    sis.delete(&Pk::parse("hello/world")?).context("deleting hello/world")?;
    sis.delete(&Pk::parse("hello/world2")?).context("deleting hello/world2")?;

    let blob3 = sis.read(&Pk::parse("bye/world")?).context("reading bye/world")?;
    println!("{}", String::from_utf8_lossy(&blob3));

    sis.delete(&Pk::parse("bye/world")?).context("deleting bye/world")?;

    Ok(())
}
