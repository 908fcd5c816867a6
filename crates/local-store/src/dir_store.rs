//! Directory-backed blob store.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;

use crate::atomic_io::write_atomic;
use crate::{BlobStore, StorageKey, StoreError};

/// Blob store keeping one `<key>.json` file per key inside a profile
/// directory.
///
/// All file access goes through a capability handle on the directory, so a
/// key can never name a file outside it.
#[derive(Debug)]
pub struct DirStore {
    root: Utf8PathBuf,
    dir: Dir,
}

impl DirStore {
    /// Open (creating if needed) the profile directory at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] when the directory cannot be created or
    /// opened.
    pub fn open(root: impl AsRef<Utf8Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        let open_error = |err: io::Error| StoreError::Open {
            path: root.to_string(),
            message: err.to_string(),
        };
        Dir::create_ambient_dir_all(&root, ambient_authority()).map_err(open_error)?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority()).map_err(open_error)?;
        Ok(Self { root, dir })
    }

    /// Directory this store writes into.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

impl BlobStore for DirStore {
    fn read(&self, key: &StorageKey) -> Result<Option<String>, StoreError> {
        match self.dir.read_to_string(key.file_name()) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Read {
                key: key.to_string(),
                message: err.to_string(),
            }),
        }
    }

    fn write(&self, key: &StorageKey, contents: &str) -> Result<(), StoreError> {
        let file_name = key.file_name();
        write_atomic(&self.dir, Utf8Path::new(&file_name), contents).map_err(|err| {
            StoreError::Write {
                key: key.to_string(),
                message: err.to_string(),
            }
        })
    }

    fn remove(&self, key: &StorageKey) -> Result<(), StoreError> {
        match self.dir.remove_file(key.file_name()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Remove {
                key: key.to_string(),
                message: err.to_string(),
            }),
        }
    }
}
