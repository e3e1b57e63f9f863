//! Raw bundle sources.
//!
//! A [`BundleSource`] is a flat, named set of entries. Backends differ in
//! where the bytes live; collation only relies on this trait.

use crate::archive::ZipSource;
use crate::container::ContainerSource;
use crate::directory::DirectorySource;
use crate::{BundleError, BundleResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use url::Url;

/// Base URI for sources without a filesystem location.
pub const INTERNAL_BASE: &str = "internal:/";

/// Contents of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    Text(String),
    Bytes(Vec<u8>),
}

impl EntryContent {
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.into_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    /// Interpret the entry as UTF-8 text.
    pub fn into_text(self, name: &str) -> BundleResult<String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Bytes(bytes) => {
                String::from_utf8(bytes).map_err(|_| BundleError::NotText(name.to_string()))
            }
        }
    }
}

/// A readable set of named entries.
///
/// Names use `/` as the path separator and never start with `/`.
pub trait BundleSource: Send + Sync {
    /// False when the backing data could not be read as a bundle.
    fn available(&self) -> bool;

    /// URI that entry names resolve against.
    fn base_uri(&self) -> &Url;

    /// All entry names, in a backend-determined but stable order.
    fn names(&self) -> Vec<String>;

    fn exists(&self, name: &str) -> bool;

    /// Read an entry. Fails with [`BundleError::NoSuchEntry`] for unknown names.
    fn open(&self, name: &str) -> BundleResult<EntryContent>;
}

pub(crate) fn internal_base() -> Url {
    #[allow(clippy::expect_used)] // Safe: constant, valid URL
    Url::parse(INTERNAL_BASE).expect("internal base URL parses")
}

/// Entries held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    base_uri: Url,
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_uri: internal_base(),
            entries: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_base_uri(mut self, base_uri: Url) -> Self {
        self.base_uri = base_uri;
        self
    }

    /// Add or replace an entry.
    #[must_use]
    pub fn with_entry(mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(name, contents);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.entries.insert(name.into(), contents.into());
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl BundleSource for MemorySource {
    fn available(&self) -> bool {
        true
    }

    fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn open(&self, name: &str) -> BundleResult<EntryContent> {
        self.entries
            .get(name)
            .map(|bytes| EntryContent::Bytes(bytes.clone()))
            .ok_or_else(|| BundleError::NoSuchEntry(name.to_string()))
    }
}

/// Open the bundle at `path`.
///
/// A directory is read as a tree, a `.zip` file as an archive, and any
/// other file as a container document.
pub fn open_path<P: AsRef<Path>>(path: P) -> BundleResult<Box<dyn BundleSource>> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(Box::new(DirectorySource::open(path)?));
    }

    let is_zip = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    if is_zip {
        tracing::debug!(path = %path.display(), "opening zip bundle");
        return Ok(Box::new(ZipSource::open_file(path)?));
    }

    let bytes = fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "opening container bundle");
    Ok(Box::new(ContainerSource::from_bytes(bytes)))
}
