//! Directory-tree bundle source.

use crate::source::{BundleSource, EntryContent};
use crate::{BundleError, BundleResult};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use url::Url;
use walkdir::WalkDir;

/// A bundle laid out as files under a root directory.
///
/// Entry names are the `/`-joined paths relative to the root. The listing
/// is taken once, when the source is opened.
#[derive(Debug)]
pub struct DirectorySource {
    root: PathBuf,
    base_uri: Url,
    names: BTreeSet<String>,
}

impl DirectorySource {
    /// Walk `root` and list every regular file below it.
    pub fn open<P: AsRef<Path>>(root: P) -> BundleResult<Self> {
        let root = fs::canonicalize(root.as_ref())?;
        if !root.is_dir() {
            return Err(BundleError::unavailable(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        let base_uri = Url::from_directory_path(&root).map_err(|()| {
            BundleError::unavailable(format!("{} has no file URL", root.display()))
        })?;

        let mut names = BTreeSet::new();
        for entry in WalkDir::new(&root).follow_links(true) {
            let entry = entry.map_err(|err| {
                BundleError::Io(err.into_io_error().unwrap_or_else(|| {
                    std::io::Error::other("directory walk failed")
                }))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(name) = relative_name(&root, entry.path()) {
                names.insert(name);
            }
        }
        tracing::debug!(root = %root.display(), entries = names.len(), "listed directory bundle");

        Ok(Self {
            root,
            base_uri,
            names,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative
        .components()
        .map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    parts.map(|p| p.join("/"))
}

impl BundleSource for DirectorySource {
    fn available(&self) -> bool {
        true
    }

    fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    fn names(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    fn exists(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    fn open(&self, name: &str) -> BundleResult<EntryContent> {
        // Only listed names are readable, so `..` cannot escape the root.
        if !self.names.contains(name) {
            return Err(BundleError::NoSuchEntry(name.to_string()));
        }
        let bytes = fs::read(self.root.join(name))?;
        Ok(EntryContent::Bytes(bytes))
    }
}
