//! Bundle loading configuration

use crate::{BundleResult, Qualifier};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Serializable settings for loading a bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Logical root prefix inside the source (empty = whole source)
    #[serde(default)]
    pub root: String,

    /// Log filter used by tools that install a subscriber
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Default runtime context; axes given explicitly at resolution time win
    #[serde(default)]
    pub context: Qualifier,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            root: String::new(),
            log_level: default_log_level(),
            context: Qualifier::default(),
        }
    }
}

impl BundleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from JSON bytes
    pub fn from_json(bytes: &[u8]) -> BundleResult<Self> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Create configuration from a TOML document
    pub fn from_toml(text: &str) -> BundleResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Collation options derived from this configuration
    pub fn collation_options(&self) -> CollationOptions {
        CollationOptions::new().with_root(&self.root)
    }
}

/// Decides which identifiers are acceptable.
pub trait IdentifierPolicy: Send + Sync {
    fn is_valid(&self, id: &str) -> bool;
}

/// Accepts any non-empty identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyIdentifier;

impl IdentifierPolicy for NonEmptyIdentifier {
    fn is_valid(&self, id: &str) -> bool {
        !id.is_empty()
    }
}

impl<F> IdentifierPolicy for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_valid(&self, id: &str) -> bool {
        !id.is_empty() && self(id)
    }
}

/// Runtime collation settings
#[derive(Clone)]
pub struct CollationOptions {
    root: String,
    identifiers: Arc<dyn IdentifierPolicy>,
}

impl CollationOptions {
    pub fn new() -> Self {
        Self {
            root: String::new(),
            identifiers: Arc::new(NonEmptyIdentifier),
        }
    }

    /// Only names below `root` are collated. A trailing `/` is added if missing.
    pub fn with_root(mut self, root: &str) -> Self {
        let root = root.trim_matches('/');
        self.root = if root.is_empty() {
            String::new()
        } else {
            format!("{root}/")
        };
        self
    }

    /// Replace the identifier policy. Empty identifiers are always rejected.
    pub fn with_identifier_policy(mut self, policy: impl IdentifierPolicy + 'static) -> Self {
        self.identifiers = Arc::new(policy);
        self
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn is_valid_identifier(&self, id: &str) -> bool {
        !id.is_empty() && self.identifiers.is_valid(id)
    }
}

impl Default for CollationOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CollationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollationOptions")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
