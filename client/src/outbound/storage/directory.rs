//! Directory-backed key/value store.
//!
//! Each key is one file inside a capability-scoped directory, so the store
//! cannot touch anything outside the directory it was opened on.

use std::io;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use super::atomic_io::write_atomic;
use crate::domain::ports::{KeyValueStore, KeyValueStoreError};

/// Store persisting each key as a file in one directory.
#[derive(Debug)]
pub struct DirKeyValueStore {
    dir: Dir,
}

impl DirKeyValueStore {
    /// Open `path`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the directory cannot be created or opened.
    pub fn open(path: &Utf8Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        debug!(path = %path, "opened credential directory");
        Ok(Self { dir })
    }

    /// Use an already opened directory.
    pub fn from_dir(dir: Dir) -> Self {
        Self { dir }
    }
}

fn validate_key(key: &str) -> Result<&str, KeyValueStoreError> {
    let acceptable = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if acceptable {
        Ok(key)
    } else {
        Err(KeyValueStoreError::invalid_key(key))
    }
}

impl KeyValueStore for DirKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        let file_name = validate_key(key)?;
        match self.dir.read_to_string(file_name) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(KeyValueStoreError::read(key, error.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let file_name = validate_key(key)?;
        write_atomic(&self.dir, file_name, value)
            .map_err(|error| KeyValueStoreError::write(key, error.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let file_name = validate_key(key)?;
        match self.dir.remove_file(file_name) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(KeyValueStoreError::write(key, error.to_string())),
        }
    }
}
