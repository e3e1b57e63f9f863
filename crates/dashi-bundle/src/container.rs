//! Self-describing text container.
//!
//! A container packs many entries into one UTF-8 document:
//!
//! ```text
//! dashi-bundle optional prolog text
//! @@ strings.items
//! inbox label=Inbox
//! @@ icons/inbox.png;base64
//! iVBORw0KGgo...
//! ```
//!
//! The first line must contain [`MAGIC`]; its line ending (LF or CRLF)
//! fixes the newline for the whole document. The second line starts with a
//! separator token followed by a space and the first entry header. Every
//! later entry begins with newline + token + space. A header ending in
//! `;base64` marks a binary entry whose body is base64 with line breaks
//! allowed.
//!
//! Any malformed header makes the whole document unavailable. No entry of a
//! broken document is ever exposed.

use crate::source::{BundleSource, EntryContent, internal_base};
use crate::{BundleError, BundleResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::ops::Range;
use url::Url;

/// Token the first line must contain.
pub const MAGIC: &str = "dashi-bundle";

/// Header suffix marking a base64 entry.
pub const BASE64_SUFFIX: &str = ";base64";

/// One indexed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerEntry {
    pub name: String,
    /// Byte range of the body in the document.
    pub body: Range<usize>,
    pub binary: bool,
}

#[derive(Debug, Default)]
struct ContainerIndex {
    entries: Vec<ContainerEntry>,
    by_name: HashMap<String, usize>,
}

impl ContainerIndex {
    fn push(&mut self, entry: ContainerEntry) {
        match self.by_name.get(&entry.name) {
            Some(&i) => self.entries[i] = entry,
            None => {
                self.by_name.insert(entry.name.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    fn get(&self, name: &str) -> Option<&ContainerEntry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }
}

/// A bundle source backed by one container document.
///
/// The document is scanned on first access, exactly once, even under
/// concurrent first use.
#[derive(Debug)]
pub struct ContainerSource {
    text: Option<String>,
    base_uri: Url,
    index: OnceCell<Result<ContainerIndex, String>>,
}

impl ContainerSource {
    /// Wrap a container document.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            base_uri: internal_base(),
            index: OnceCell::new(),
        }
    }

    /// A source with no document at all. Always unavailable.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            text: None,
            base_uri: internal_base(),
            index: OnceCell::new(),
        }
    }

    /// Read a container from UTF-8 bytes. Invalid UTF-8 is unavailable.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self::new(text),
            Err(_) => {
                tracing::warn!("container document is not valid UTF-8");
                Self::absent()
            }
        }
    }

    #[must_use]
    pub fn with_base_uri(mut self, base_uri: Url) -> Self {
        self.base_uri = base_uri;
        self
    }

    /// Why the document is unavailable, if it is.
    #[must_use]
    pub fn unavailable_reason(&self) -> Option<&str> {
        self.index().err()
    }

    /// Indexed entries in document order.
    #[must_use]
    pub fn entries(&self) -> &[ContainerEntry] {
        self.index().map(|i| i.entries.as_slice()).unwrap_or(&[])
    }

    fn index(&self) -> Result<&ContainerIndex, &str> {
        self.index
            .get_or_init(|| {
                let scanned = match &self.text {
                    Some(text) => scan(text),
                    None => Err("no document".to_string()),
                };
                match &scanned {
                    Ok(index) => tracing::debug!(entries = index.entries.len(), "scanned container"),
                    Err(reason) => tracing::warn!(%reason, "container unavailable"),
                }
                scanned
            })
            .as_ref()
            .map_err(String::as_str)
    }
}

impl BundleSource for ContainerSource {
    fn available(&self) -> bool {
        self.index().is_ok()
    }

    fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    fn names(&self) -> Vec<String> {
        self.entries().iter().map(|e| e.name.clone()).collect()
    }

    fn exists(&self, name: &str) -> bool {
        self.index().is_ok_and(|i| i.by_name.contains_key(name))
    }

    fn open(&self, name: &str) -> BundleResult<EntryContent> {
        let index = self
            .index()
            .map_err(BundleError::unavailable)?;
        let entry = index
            .get(name)
            .ok_or_else(|| BundleError::NoSuchEntry(name.to_string()))?;
        // An available index implies the document is present.
        let text = self.text.as_deref().unwrap_or_default();
        let body = &text[entry.body.clone()];

        if entry.binary {
            let compact: String = body.chars().filter(|c| *c != '\n' && *c != '\r').collect();
            let bytes = STANDARD
                .decode(compact.as_bytes())
                .map_err(|source| BundleError::Base64 {
                    entry: name.to_string(),
                    source,
                })?;
            Ok(EntryContent::Bytes(bytes))
        } else {
            Ok(EntryContent::Text(body.to_string()))
        }
    }
}

/// Build the entry index, failing on the first structural problem.
fn scan(text: &str) -> Result<ContainerIndex, String> {
    if text.len() < MAGIC.len() {
        return Err("document shorter than magic token".to_string());
    }

    let Some(first_break) = text.find('\n') else {
        return if text.contains(MAGIC) {
            Ok(ContainerIndex::default())
        } else {
            Err("missing magic token".to_string())
        };
    };
    let prolog = &text[..first_break];
    if !prolog.contains(MAGIC) {
        return Err("missing magic token".to_string());
    }
    let newline = if prolog.ends_with('\r') { "\r\n" } else { "\n" };

    let mut pos = first_break + 1;
    if pos >= text.len() {
        return Ok(ContainerIndex::default());
    }

    let line_end = text[pos..].find('\n').map_or(text.len(), |i| pos + i);
    let token = match text[pos..line_end].find(' ') {
        Some(0) | None => return Err("second line does not define a separator token".to_string()),
        Some(space) => &text[pos..pos + space],
    };
    let separator = format!("{newline}{token} ");
    pos += token.len() + 1;

    let mut index = ContainerIndex::default();
    loop {
        let (header, body_start) = match text[pos..].find('\n') {
            Some(i) => (&text[pos..pos + i], pos + i + 1),
            None => (&text[pos..], text.len()),
        };
        let (name, binary) = parse_header(header)?;

        let (body_end, next) = match text[body_start..].find(&separator) {
            Some(i) => (body_start + i, Some(body_start + i + separator.len())),
            None => (text.len(), None),
        };
        index.push(ContainerEntry {
            name,
            body: body_start..body_end,
            binary,
        });

        match next {
            Some(next) if next < text.len() => pos = next,
            _ => break,
        }
    }
    Ok(index)
}

fn parse_header(header: &str) -> Result<(String, bool), String> {
    let header = header.trim();
    let (name, binary) = match header.strip_suffix(BASE64_SUFFIX) {
        Some(stripped) => (stripped.trim(), true),
        None => (header, false),
    };
    if name.is_empty() {
        return Err("entry header without a name".to_string());
    }
    if name.starts_with('/') || name.ends_with('/') {
        return Err(format!("entry name {name:?} starts or ends with '/'"));
    }
    Ok((name.to_string(), binary))
}

#[cfg(test)]
#[path = "container/container_tests.rs"]
mod container_tests;
