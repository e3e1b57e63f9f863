//! Content records and their builder.
//!
//! An [`Item`] has a fixed set of optional typed fields plus namespaced
//! "extras". Items are immutable; [`ItemBuilder`] assembles them and
//! overlays one item onto another during resolution.

use crate::value::{ImageRef, Priority, Value, ValueKind};
use crate::{BundleError, BundleResult, Qualifier};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Extras keys must contain this character.
pub const NAMESPACE_SEPARATOR: char = ':';

/// The fixed item fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Label,
    Description,
    Icon,
    Picture,
    Ordinal,
    Created,
    Modified,
    Priority,
}

impl Field {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Description => "description",
            Self::Icon => "icon",
            Self::Picture => "picture",
            Self::Ordinal => "ordinal",
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Priority => "priority",
        }
    }

    /// Exact (case-sensitive) field name lookup.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.as_str() == name)
    }

    /// Value kind the field stores.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Label | Self::Description => ValueKind::String,
            Self::Icon | Self::Picture => ValueKind::Image,
            Self::Ordinal => ValueKind::Integer,
            Self::Created | Self::Modified => ValueKind::Instant,
            Self::Priority => ValueKind::Priority,
        }
    }

    #[must_use]
    pub fn all() -> &'static [Field] {
        &[
            Self::Label,
            Self::Description,
            Self::Icon,
            Self::Picture,
            Self::Ordinal,
            Self::Created,
            Self::Modified,
            Self::Priority,
        ]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// True if `key` may be used as an extras key.
#[must_use]
pub fn is_namespaced(key: &str) -> bool {
    key.contains(NAMESPACE_SEPARATOR)
}

/// One qualified content record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    qualifier: Qualifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<ImageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    picture: Option<ImageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ordinal: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    extras: BTreeMap<String, Value>,
}

impl Item {
    /// Start building an item carrying `qualifier`.
    #[must_use]
    pub fn builder(qualifier: Qualifier) -> ItemBuilder {
        ItemBuilder::new(qualifier)
    }

    #[must_use]
    pub fn qualifier(&self) -> &Qualifier {
        &self.qualifier
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn icon(&self) -> Option<&ImageRef> {
        self.icon.as_ref()
    }

    #[must_use]
    pub fn picture(&self) -> Option<&ImageRef> {
        self.picture.as_ref()
    }

    #[must_use]
    pub fn ordinal(&self) -> Option<i64> {
        self.ordinal
    }

    #[must_use]
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    #[must_use]
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modified
    }

    #[must_use]
    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Value of a fixed field, or [`Value::Empty`] when unset.
    #[must_use]
    pub fn field(&self, field: Field) -> Value {
        match field {
            Field::Label => self.label.clone().map_or(Value::Empty, Value::String),
            Field::Description => self.description.clone().map_or(Value::Empty, Value::String),
            Field::Icon => self.icon.clone().map_or(Value::Empty, Value::Image),
            Field::Picture => self.picture.clone().map_or(Value::Empty, Value::Image),
            Field::Ordinal => self.ordinal.map_or(Value::Empty, Value::Integer),
            Field::Created => self.created.map_or(Value::Empty, Value::Instant),
            Field::Modified => self.modified.map_or(Value::Empty, Value::Instant),
            Field::Priority => self.priority.map_or(Value::Empty, Value::Priority),
        }
    }

    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    #[must_use]
    pub fn extras(&self) -> &BTreeMap<String, Value> {
        &self.extras
    }
}

/// Builder-side state of one field.
#[derive(Debug, Clone, PartialEq)]
enum Slot<T> {
    Unset,
    Cleared,
    Set(T),
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Unset
    }
}

impl<T> Slot<T> {
    fn from_option(value: Option<T>) -> Self {
        value.map_or(Slot::Unset, Slot::Set)
    }

    fn into_option(self) -> Option<T> {
        match self {
            Slot::Set(v) => Some(v),
            Slot::Unset | Slot::Cleared => None,
        }
    }

    fn overlay(&mut self, value: Option<&T>)
    where
        T: Clone,
    {
        if let Some(v) = value {
            *self = Slot::Set(v.clone());
        }
    }
}

/// Builder for [`Item`].
///
/// Each fixed field is unset, explicitly cleared, or set. Both unset and
/// cleared fields build to `None`; [`ItemBuilder::is_cleared`] tells them apart.
///
/// # Example
///
/// ```
/// use dashi_bundle::{Item, Qualifier};
///
/// let item = Item::builder(Qualifier::default())
///     .label("Home")
///     .ordinal(3)
///     .extra("app:route", "/home")?
///     .build();
///
/// assert_eq!(item.label(), Some("Home"));
/// # Ok::<(), dashi_bundle::BundleError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ItemBuilder {
    qualifier: Qualifier,
    label: Slot<String>,
    description: Slot<String>,
    icon: Slot<ImageRef>,
    picture: Slot<ImageRef>,
    ordinal: Slot<i64>,
    created: Slot<DateTime<Utc>>,
    modified: Slot<DateTime<Utc>>,
    priority: Slot<Priority>,
    extras: BTreeMap<String, Value>,
}

impl ItemBuilder {
    #[must_use]
    pub fn new(qualifier: Qualifier) -> Self {
        Self {
            qualifier,
            ..Self::default()
        }
    }

    /// Start from an existing item's fields.
    #[must_use]
    pub fn from_item(item: &Item) -> Self {
        Self {
            qualifier: item.qualifier.clone(),
            label: Slot::from_option(item.label.clone()),
            description: Slot::from_option(item.description.clone()),
            icon: Slot::from_option(item.icon.clone()),
            picture: Slot::from_option(item.picture.clone()),
            ordinal: Slot::from_option(item.ordinal),
            created: Slot::from_option(item.created),
            modified: Slot::from_option(item.modified),
            priority: Slot::from_option(item.priority),
            extras: item.extras.clone(),
        }
    }

    #[must_use]
    pub fn qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifier = qualifier;
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Slot::Set(label.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Slot::Set(description.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: ImageRef) -> Self {
        self.icon = Slot::Set(icon);
        self
    }

    #[must_use]
    pub fn picture(mut self, picture: ImageRef) -> Self {
        self.picture = Slot::Set(picture);
        self
    }

    #[must_use]
    pub fn ordinal(mut self, ordinal: i64) -> Self {
        self.ordinal = Slot::Set(ordinal);
        self
    }

    #[must_use]
    pub fn created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Slot::Set(created);
        self
    }

    #[must_use]
    pub fn modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Slot::Set(modified);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Slot::Set(priority);
        self
    }

    /// Add an extra. The key must contain [`NAMESPACE_SEPARATOR`].
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> BundleResult<Self> {
        let key = key.into();
        if !is_namespaced(&key) {
            return Err(BundleError::InvalidExtraKey(key));
        }
        self.extras.insert(key, value.into());
        Ok(self)
    }

    /// Coerce `value` into `field`'s kind and store it.
    ///
    /// A value that coerces to empty clears the field.
    pub fn set_field(&mut self, field: Field, value: &Value) {
        let coerced = value.coerce(field.kind());
        match (field, coerced) {
            (Field::Label, Value::String(s)) => self.label = Slot::Set(s),
            (Field::Description, Value::String(s)) => self.description = Slot::Set(s),
            (Field::Icon, Value::Image(i)) => self.icon = Slot::Set(i),
            (Field::Picture, Value::Image(i)) => self.picture = Slot::Set(i),
            (Field::Ordinal, Value::Integer(n)) => self.ordinal = Slot::Set(n),
            (Field::Created, Value::Instant(t)) => self.created = Slot::Set(t),
            (Field::Modified, Value::Instant(t)) => self.modified = Slot::Set(t),
            (Field::Priority, Value::Priority(p)) => self.priority = Slot::Set(p),
            (field, _) => self.clear(field),
        }
    }

    /// Explicitly clear a fixed field.
    pub fn clear(&mut self, field: Field) {
        match field {
            Field::Label => self.label = Slot::Cleared,
            Field::Description => self.description = Slot::Cleared,
            Field::Icon => self.icon = Slot::Cleared,
            Field::Picture => self.picture = Slot::Cleared,
            Field::Ordinal => self.ordinal = Slot::Cleared,
            Field::Created => self.created = Slot::Cleared,
            Field::Modified => self.modified = Slot::Cleared,
            Field::Priority => self.priority = Slot::Cleared,
        }
    }

    /// True if `field` was explicitly cleared rather than never set.
    #[must_use]
    pub fn is_cleared(&self, field: Field) -> bool {
        match field {
            Field::Label => self.label == Slot::Cleared,
            Field::Description => self.description == Slot::Cleared,
            Field::Icon => self.icon == Slot::Cleared,
            Field::Picture => self.picture == Slot::Cleared,
            Field::Ordinal => self.ordinal == Slot::Cleared,
            Field::Created => self.created == Slot::Cleared,
            Field::Modified => self.modified == Slot::Cleared,
            Field::Priority => self.priority == Slot::Cleared,
        }
    }

    /// Apply one textual `key=value` pair.
    ///
    /// Fixed field names are coerced into their field. Namespaced keys become
    /// string extras. Any other key is dropped and `false` is returned.
    pub fn apply(&mut self, key: &str, raw: &str) -> bool {
        let value = Value::from(raw);
        if let Some(field) = Field::parse(key) {
            self.set_field(field, &value);
            true
        } else if is_namespaced(key) {
            self.extras.insert(key.to_string(), value);
            true
        } else {
            tracing::trace!(key, "dropping non-namespaced extra");
            false
        }
    }

    /// Copy every non-empty field and extra of `other` over this builder.
    ///
    /// The qualifier is left alone.
    #[must_use]
    pub fn overlay(mut self, other: &Item) -> Self {
        self.label.overlay(other.label.as_ref());
        self.description.overlay(other.description.as_ref());
        self.icon.overlay(other.icon.as_ref());
        self.picture.overlay(other.picture.as_ref());
        self.ordinal.overlay(other.ordinal.as_ref());
        self.created.overlay(other.created.as_ref());
        self.modified.overlay(other.modified.as_ref());
        self.priority.overlay(other.priority.as_ref());
        for (key, value) in &other.extras {
            if !value.is_empty() {
                self.extras.insert(key.clone(), value.clone());
            }
        }
        self
    }

    #[must_use]
    pub fn build(self) -> Item {
        Item {
            qualifier: self.qualifier,
            label: self.label.into_option(),
            description: self.description.into_option(),
            icon: self.icon.into_option(),
            picture: self.picture.into_option(),
            ordinal: self.ordinal.into_option(),
            created: self.created.into_option(),
            modified: self.modified.into_option(),
            priority: self.priority.into_option(),
            extras: self.extras,
        }
    }
}
