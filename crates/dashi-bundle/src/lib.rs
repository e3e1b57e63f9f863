//! Qualified resource bundles for dashi
//!
//! A bundle is a set of named content items (labels, descriptions, images,
//! timestamps and namespaced extras), each stored in one or more variants
//! qualified by language, screen class, screen color and flavor. At runtime
//! the variants matching a fully specified context are merged into one item.
//!
//! # Bundle Structure
//!
//! ```text
//! app.bundle (directory, .zip archive, or container document)
//! ├── strings.items              # `inbox label=Inbox, ordinal=1`
//! ├── strings.csv                # header row with an `id` column
//! ├── icons/
//! │   ├── inbox.png              # universal icon for `inbox`
//! │   └── lang__de/
//! │       └── inbox.png          # German-only override
//! ├── pictures/
//! │   └── screen__pc/banner.png
//! ├── badges/
//! │   └── inbox.svg              # extra `dashi:badge`
//! └── symbols/
//!     └── flavor__error/inbox.svg  # extra `dashi:symbol`
//! ```
//!
//! # Example
//!
//! ```
//! use dashi_bundle::{
//!     CollationOptions, ContainerSource, Flavor, Qualifier, ScreenClass, ScreenColor, collate,
//! };
//!
//! let source = ContainerSource::new(
//!     "dashi-bundle\n@@ strings.items\ninbox label=Inbox, description=\"All mail\"",
//! );
//! let collation = collate(&source, &CollationOptions::default())?;
//!
//! let runtime = Qualifier::full("en", ScreenClass::Pc, ScreenColor::Color, Flavor::Generic);
//! let inbox = collation.index.resolve("inbox", &runtime)?;
//!
//! assert_eq!(inbox.and_then(|item| item.label().map(String::from)), Some("Inbox".into()));
//! # Ok::<(), dashi_bundle::BundleError>(())
//! ```

mod error;

pub mod archive;
pub mod collate;
pub mod config;
pub mod container;
pub mod directory;
pub mod index;
pub mod item;
pub mod qualifier;
pub mod source;
pub mod syntax;
pub mod value;

pub use archive::ZipSource;
pub use collate::{Collation, CollationIssue, IssueKind, ResourceKind, collate};
pub use config::{BundleConfig, CollationOptions, IdentifierPolicy, NonEmptyIdentifier};
pub use container::ContainerSource;
pub use directory::DirectorySource;
pub use error::BundleError;
pub use index::{BundleIndex, VariantList};
pub use item::{Field, Item, ItemBuilder};
pub use qualifier::{Flavor, Qualifier, ScreenClass, ScreenColor};
pub use source::{BundleSource, EntryContent, MemorySource, open_path};
pub use value::{ImageRef, ImageScheme, Priority, Value, ValueKind};

/// Result type for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;
