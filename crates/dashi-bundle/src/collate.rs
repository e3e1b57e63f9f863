//! Collation: turning raw entries into per-identifier variant lists.
//!
//! Below the configured root, a source holds two kinds of entries:
//!
//! ```text
//! strings.items                         # one item per line, universal qualifier
//! strings.csv                           # header row with an `id` column
//! icons/lang__en/screen__pc/inbox.png   # resource files; tags qualify them
//! badges/inbox.svg
//! ```
//!
//! Top-level `.items` and `.csv` files define items with all their fields.
//! Files under `badges/`, `symbols/`, `icons/` or `pictures/` each define one
//! item named after the file stem; the directories between the kind and the
//! file name may be `key__value` tags (`lang`, `screen`, `color`, `flavor`).
//!
//! A bad line, record or path is reported as a [`CollationIssue`] and
//! skipped. Only an unavailable source fails collation as a whole.

use crate::config::CollationOptions;
use crate::index::BundleIndex;
use crate::item::{Item, ItemBuilder};
use crate::qualifier::{Flavor, Qualifier, ScreenClass, ScreenColor};
use crate::source::BundleSource;
use crate::syntax::{self, SyntaxError};
use crate::value::ImageRef;
use crate::{BundleError, BundleResult};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Extras key set on items from `badges/`.
pub const BADGE_EXTRA: &str = "dashi:badge";

/// Extras key set on items from `symbols/`.
pub const SYMBOL_EXTRA: &str = "dashi:symbol";

/// Extension of mini-language item files.
pub const ITEMS_EXTENSION: &str = "items";

/// Extension of CSV item files.
pub const CSV_EXTENSION: &str = "csv";

/// Separator between a tag's key and value in a directory name.
pub const TAG_SEPARATOR: &str = "__";

/// Resource directories recognized as the first path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Badges,
    Symbols,
    Icons,
    Pictures,
}

impl ResourceKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Badges => "badges",
            Self::Symbols => "symbols",
            Self::Icons => "icons",
            Self::Pictures => "pictures",
        }
    }

    /// Exact directory-name lookup.
    #[must_use]
    pub fn parse(segment: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.as_str() == segment)
    }

    #[must_use]
    pub fn all() -> &'static [ResourceKind] {
        &[Self::Badges, Self::Symbols, Self::Icons, Self::Pictures]
    }
}

/// Why an entry, line or record was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueKind {
    #[error("{0}")]
    Syntax(SyntaxError),

    #[error("invalid identifier {0:?}")]
    InvalidIdentifier(String),

    #[error("CSV header has no `id` column")]
    MissingIdColumn,

    #[error("unrecognized resource directory {0:?}")]
    UnknownResourceKind(String),

    #[error("invalid {key} tag value {value:?}")]
    InvalidTag { key: String, value: String },

    #[error("cannot resolve {0:?} against the bundle base URI")]
    UnresolvableUri(String),

    #[error("unreadable: {0}")]
    Unreadable(String),
}

/// One skipped piece of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollationIssue {
    /// Entry name in the source.
    pub source: String,
    /// 1-based line, where the input is line oriented.
    pub line: Option<usize>,
    pub kind: IssueKind,
}

impl fmt::Display for CollationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.source, line, self.kind),
            None => write!(f, "{}: {}", self.source, self.kind),
        }
    }
}

/// Result of collating a source.
#[derive(Debug, Clone)]
pub struct Collation {
    pub index: BundleIndex,
    pub issues: Vec<CollationIssue>,
}

/// Collate every entry of `source` below the configured root.
///
/// Fails only when the source is unavailable.
pub fn collate(source: &dyn BundleSource, options: &CollationOptions) -> BundleResult<Collation> {
    if !source.available() {
        return Err(BundleError::Unavailable(None));
    }
    let mut collator = Collator {
        source,
        options,
        groups: HashMap::new(),
        issues: Vec::new(),
    };
    for name in source.names() {
        collator.entry(&name);
    }

    let Collator { groups, issues, .. } = collator;
    let index = BundleIndex::from_groups(groups);
    tracing::debug!(
        identifiers = index.len(),
        issues = issues.len(),
        "collated bundle"
    );
    Ok(Collation { index, issues })
}

/// Scratch state of one collation run.
struct Collator<'a> {
    source: &'a dyn BundleSource,
    options: &'a CollationOptions,
    groups: HashMap<String, Vec<Item>>,
    issues: Vec<CollationIssue>,
}

impl Collator<'_> {
    fn entry(&mut self, name: &str) {
        let Some(relative) = name.strip_prefix(self.options.root()) else {
            return;
        };
        if relative.is_empty() || relative.ends_with('/') {
            return;
        }

        let segments: Vec<&str> = relative.split('/').collect();
        match segments.as_slice() {
            [file] => self.definition_file(name, file),
            [kind, tags @ .., file] => self.resource(name, kind, tags, file),
            [] => {}
        }
    }

    fn issue(&mut self, source: &str, line: Option<usize>, kind: IssueKind) {
        match line {
            Some(line) => tracing::warn!(source, line, "skipping: {kind}"),
            None => tracing::warn!(source, "skipping: {kind}"),
        }
        self.issues.push(CollationIssue {
            source: source.to_string(),
            line,
            kind,
        });
    }

    fn add(&mut self, id: String, item: Item) {
        self.groups.entry(id).or_default().push(item);
    }

    fn read_text(&mut self, name: &str) -> Option<String> {
        let text = self
            .source
            .open(name)
            .and_then(|content| content.into_text(name));
        match text {
            Ok(text) => Some(text),
            Err(err) => {
                self.issue(name, None, IssueKind::Unreadable(err.to_string()));
                None
            }
        }
    }

    fn definition_file(&mut self, name: &str, file: &str) {
        let extension = file.rsplit_once('.').map(|(_, ext)| ext);
        match extension {
            Some(ext) if ext.eq_ignore_ascii_case(ITEMS_EXTENSION) => {
                if let Some(text) = self.read_text(name) {
                    self.items_file(name, &text);
                }
            }
            Some(ext) if ext.eq_ignore_ascii_case(CSV_EXTENSION) => {
                if let Some(text) = self.read_text(name) {
                    self.csv_file(name, &text);
                }
            }
            _ => tracing::trace!(name, "ignoring top-level entry"),
        }
    }

    fn items_file(&mut self, name: &str, text: &str) {
        for (line_no, line) in syntax::definition_lines(text) {
            let parsed = match syntax::parse_line(line) {
                Ok(parsed) => parsed,
                Err(err) => {
                    self.issue(name, Some(line_no), IssueKind::Syntax(err));
                    continue;
                }
            };
            if !self.options.is_valid_identifier(&parsed.id) {
                self.issue(name, Some(line_no), IssueKind::InvalidIdentifier(parsed.id));
                continue;
            }
            let mut builder = ItemBuilder::new(Qualifier::default());
            for (key, value) in &parsed.fields {
                builder.apply(key, value);
            }
            self.add(parsed.id, builder.build());
        }
    }

    fn csv_file(&mut self, name: &str, text: &str) {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = match reader.headers() {
            Ok(headers) => headers.iter().map(|h| h.trim().to_string()).collect(),
            Err(err) => {
                self.issue(name, Some(1), IssueKind::Unreadable(err.to_string()));
                return;
            }
        };
        let Some(id_column) = headers.iter().position(|h| h == "id") else {
            self.issue(name, Some(1), IssueKind::MissingIdColumn);
            return;
        };

        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    let line = err.position().and_then(|p| usize::try_from(p.line()).ok());
                    self.issue(name, line, IssueKind::Unreadable(err.to_string()));
                    continue;
                }
            };
            let line = record.position().and_then(|p| usize::try_from(p.line()).ok());

            let id = record.get(id_column).unwrap_or_default().trim();
            if !self.options.is_valid_identifier(id) {
                self.issue(name, line, IssueKind::InvalidIdentifier(id.to_string()));
                continue;
            }

            let mut builder = ItemBuilder::new(Qualifier::default());
            for (column, key) in headers.iter().enumerate() {
                if column == id_column {
                    continue;
                }
                match record.get(column) {
                    Some(value) if !value.is_empty() => {
                        builder.apply(key, value);
                    }
                    _ => {}
                }
            }
            self.add(id.to_string(), builder.build());
        }
    }

    fn resource(&mut self, name: &str, kind: &str, tags: &[&str], file: &str) {
        let Some(kind) = ResourceKind::parse(kind) else {
            self.issue(name, None, IssueKind::UnknownResourceKind(kind.to_string()));
            return;
        };

        let id = file.split('.').next().unwrap_or_default();
        if !self.options.is_valid_identifier(id) {
            self.issue(name, None, IssueKind::InvalidIdentifier(id.to_string()));
            return;
        }

        let mut qualifier = Qualifier::default();
        for tag in tags {
            qualifier = match apply_tag(qualifier.clone(), tag) {
                Ok(updated) => updated,
                Err(issue) => {
                    self.issue(name, None, issue);
                    qualifier
                }
            };
        }

        let Some(image) = ImageRef::resolve(self.source.base_uri(), name) else {
            self.issue(name, None, IssueKind::UnresolvableUri(name.to_string()));
            return;
        };
        let builder = ItemBuilder::new(qualifier);
        let built = match kind {
            ResourceKind::Icons => Ok(builder.icon(image)),
            ResourceKind::Pictures => Ok(builder.picture(image)),
            ResourceKind::Badges => builder.extra(BADGE_EXTRA, image),
            ResourceKind::Symbols => builder.extra(SYMBOL_EXTRA, image),
        };
        match built {
            Ok(builder) => self.add(id.to_string(), builder.build()),
            Err(err) => self.issue(name, None, IssueKind::Unreadable(err.to_string())),
        }
    }
}

/// Apply one `key__value` directory tag. Segments that are not tags are ignored.
fn apply_tag(qualifier: Qualifier, segment: &str) -> Result<Qualifier, IssueKind> {
    let Some((key, value)) = segment.split_once(TAG_SEPARATOR) else {
        tracing::trace!(segment, "ignoring untagged directory");
        return Ok(qualifier);
    };
    let invalid = || IssueKind::InvalidTag {
        key: key.to_ascii_lowercase(),
        value: value.to_string(),
    };

    match key.to_ascii_lowercase().as_str() {
        "lang" if value.is_empty() => Err(invalid()),
        "lang" => Ok(qualifier.with_language(value)),
        "screen" => ScreenClass::parse(value)
            .map(|v| qualifier.with_screen_class(v))
            .ok_or_else(invalid),
        "color" => ScreenColor::parse(value)
            .map(|v| qualifier.with_screen_color(v))
            .ok_or_else(invalid),
        "flavor" => Flavor::parse(value)
            .map(|v| qualifier.with_flavor(v))
            .ok_or_else(invalid),
        _ => {
            tracing::trace!(segment, "ignoring unknown tag");
            Ok(qualifier)
        }
    }
}
