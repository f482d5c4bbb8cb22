//! Filesystem-backed [`Backend`] implementation.
//!
//! Ported line-for-line in spirit from the Go prototype's
//! `internal/crud/crudos` package: a `Pk`'s segments become path components
//! under a configured root, `create` makes parent directories then creates
//! the file exclusively, and `delete` removes the file then walks back up
//! deleting any ancestor directory left empty — the "ancestor purge rule" of
//! `spec.md` §4.2 — stopping before (not including) the root.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sis_pk::Pk;

use crate::{require_non_empty, Backend, BackendError};

/// Configuration for an [`FsBackend`].
///
/// Grounded on `blob_store::Config::with_root` and on `crudos.go`'s
/// `New(rootPath string, permissions ...os.FileMode)` variadic, translated
/// to a plain field with the same default (`0o777`) the Go prototype uses
/// when no permission is supplied.
#[derive(Clone, Debug)]
pub struct FsBackendConfig {
    /// Root directory under which all records are stored.
    pub root: PathBuf,
    /// Permission bits applied to directories created by this backend.
    /// Ignored on non-Unix targets.
    pub dir_mode: u32,
}

impl FsBackendConfig {
    /// Default configuration: the given root, mode `0o777`.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root, dir_mode: 0o777 }
    }
}

/// Filesystem-backed [`Backend`].
///
/// Each `Pk` segment becomes one path component under `root`; `root` itself
/// is never removed by [`Backend::delete`]'s ancestor purge.
pub struct FsBackend {
    root: PathBuf,
    dir_mode: u32,
}

impl FsBackend {
    /// Create (or reuse) the backend rooted at `cfg.root`, creating the root
    /// directory if necessary.
    ///
    /// # Errors
    ///
    /// [`BackendError::Io`] if the root directory cannot be created.
    pub fn new(cfg: FsBackendConfig) -> Result<Self, BackendError> {
        fs::create_dir_all(&cfg.root)?;
        Self::set_permissions(&cfg.root, cfg.dir_mode)?;
        Ok(Self { root: cfg.root, dir_mode: cfg.dir_mode })
    }

    fn pk_path(&self, pk: &Pk) -> PathBuf {
        let mut path = self.root.clone();
        for segment in pk.segments() {
            path.push(segment);
        }
        path
    }

    #[cfg(unix)]
    fn set_permissions(path: &Path, mode: u32) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
    }

    #[cfg(not(unix))]
    fn set_permissions(_path: &Path, _mode: u32) -> io::Result<()> {
        Ok(())
    }

    fn is_dir_empty(dir: &Path) -> io::Result<bool> {
        Ok(fs::read_dir(dir)?.next().is_none())
    }

    /// Recursively remove `dir` and its ancestors while they are empty,
    /// stopping before `self.root`. Mirrors `crudos.go`'s `Delete`, which
    /// recurses into itself on the parent directory when it finds it empty.
    fn purge_empty_ancestors(&self, mut dir: PathBuf) -> io::Result<()> {
        loop {
            if dir == self.root || !dir.starts_with(&self.root) {
                return Ok(());
            }
            if !Self::is_dir_empty(&dir)? {
                return Ok(());
            }
            fs::remove_dir(&dir)?;
            match dir.parent() {
                Some(parent) => dir = parent.to_path_buf(),
                None => return Ok(()),
            }
        }
    }

    fn measure_dir(dir: &Path) -> io::Result<u64> {
        let mut total = 0u64;
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let meta = entry.metadata()?;
            if meta.is_dir() {
                total += Self::measure_dir(&entry.path())?;
            } else {
                total += meta.len();
            }
        }
        Ok(total)
    }

    fn not_found_or_io(pk: &Pk, e: io::Error) -> BackendError {
        if e.kind() == io::ErrorKind::NotFound {
            BackendError::NotFound { pk: pk.to_path() }
        } else {
            BackendError::Io(e)
        }
    }
}

impl Backend for FsBackend {
    fn create(&self, pk: &Pk, blob: &[u8]) -> Result<(), BackendError> {
        require_non_empty(pk)?;
        let path = self.pk_path(pk);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
            Self::set_permissions(parent, self.dir_mode)?;
        }
        let mut file =
            fs::OpenOptions::new().write(true).create_new(true).open(&path).map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    BackendError::AlreadyExists { pk: pk.to_path() }
                } else {
                    BackendError::Io(e)
                }
            })?;
        file.write_all(blob)?;
        Ok(())
    }

    fn read(&self, pk: &Pk) -> Result<Vec<u8>, BackendError> {
        require_non_empty(pk)?;
        let path = self.pk_path(pk);
        fs::read(&path).map_err(|e| Self::not_found_or_io(pk, e))
    }

    fn update(&self, pk: &Pk, blob: &[u8]) -> Result<(), BackendError> {
        require_non_empty(pk)?;
        let path = self.pk_path(pk);
        let mut file = fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| Self::not_found_or_io(pk, e))?;
        file.write_all(blob)?;
        Ok(())
    }

    fn delete(&self, pk: &Pk) -> Result<(), BackendError> {
        require_non_empty(pk)?;
        let path = self.pk_path(pk);
        fs::remove_file(&path).map_err(|e| Self::not_found_or_io(pk, e))?;
        if let Some(parent) = path.parent() {
            self.purge_empty_ancestors(parent.to_path_buf())?;
        }
        Ok(())
    }

    fn exists(&self, pk: &Pk) -> Result<bool, BackendError> {
        require_non_empty(pk)?;
        let path = self.pk_path(pk);
        match fs::metadata(&path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(BackendError::Io(e)),
        }
    }

    fn size_of(&self, pk: &Pk) -> Result<u64, BackendError> {
        require_non_empty(pk)?;
        let path = self.pk_path(pk);
        let meta = fs::metadata(&path).map_err(|e| Self::not_found_or_io(pk, e))?;
        if meta.is_dir() {
            Ok(Self::measure_dir(&path)?)
        } else {
            Ok(meta.len())
        }
    }
}
