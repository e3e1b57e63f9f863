//! Zip-archive bundle source.

use crate::source::{BundleSource, EntryContent, internal_base};
use crate::{BundleError, BundleResult};
use parking_lot::Mutex;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use url::Url;
use zip::ZipArchive;
use zip::result::ZipError;

/// A bundle held as a zip archive in memory.
///
/// Reading from a [`ZipArchive`] needs `&mut`, so the archive sits behind
/// a mutex. Directory entries are not listed.
pub struct ZipSource {
    base_uri: Url,
    archive: Option<Mutex<ZipArchive<Cursor<Vec<u8>>>>>,
    names: Vec<String>,
}

impl ZipSource {
    /// Read an archive from bytes. An unreadable archive is unavailable.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match ZipArchive::new(Cursor::new(bytes)) {
            Ok(archive) => {
                let names: Vec<String> = (0..archive.len())
                    .filter_map(|i| archive.name_for_index(i))
                    .filter(|name| !name.ends_with('/'))
                    .map(String::from)
                    .collect();
                tracing::debug!(entries = names.len(), "opened zip bundle");
                Self {
                    base_uri: internal_base(),
                    archive: Some(Mutex::new(archive)),
                    names,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "zip bundle unavailable");
                Self {
                    base_uri: internal_base(),
                    archive: None,
                    names: Vec::new(),
                }
            }
        }
    }

    /// Read an archive file from disk.
    pub fn open_file<P: AsRef<Path>>(path: P) -> BundleResult<Self> {
        Ok(Self::from_bytes(fs::read(path)?))
    }

    #[must_use]
    pub fn with_base_uri(mut self, base_uri: Url) -> Self {
        self.base_uri = base_uri;
        self
    }
}

impl std::fmt::Debug for ZipSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipSource")
            .field("base_uri", &self.base_uri)
            .field("available", &self.archive.is_some())
            .field("entries", &self.names.len())
            .finish()
    }
}

impl BundleSource for ZipSource {
    fn available(&self) -> bool {
        self.archive.is_some()
    }

    fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    fn names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn exists(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    fn open(&self, name: &str) -> BundleResult<EntryContent> {
        let archive = self.archive.as_ref().ok_or(BundleError::Unavailable(None))?;
        if !self.exists(name) {
            return Err(BundleError::NoSuchEntry(name.to_string()));
        }

        let mut archive = archive.lock();
        let mut file = archive.by_name(name).map_err(|err| match err {
            ZipError::FileNotFound => BundleError::NoSuchEntry(name.to_string()),
            other => BundleError::Zip(other),
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        Ok(EntryContent::Bytes(contents))
    }
}
