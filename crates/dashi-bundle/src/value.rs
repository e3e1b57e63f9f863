//! Typed values carried by item fields and extras.
//!
//! [`Value`] is a closed union. Conversions between kinds go through
//! [`Value::coerce`], which never fails: a conversion that makes no sense
//! yields [`Value::Empty`].

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Ordered urgency levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    None,
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Parse a level name, ignoring ASCII case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
    }

    /// Position in the ordering, `None` being 0.
    #[must_use]
    pub fn ordinal(&self) -> i64 {
        *self as i64
    }

    #[must_use]
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::all().get(i).copied())
    }

    #[must_use]
    pub fn all() -> &'static [Priority] {
        &[
            Self::None,
            Self::Low,
            Self::Medium,
            Self::High,
            Self::Urgent,
        ]
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// URI schemes an image reference may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageScheme {
    /// `http` or `https`.
    Http,
    File,
    /// Content packaged inside the bundle itself.
    Internal,
}

impl ImageScheme {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::File => "file",
            Self::Internal => "internal",
        }
    }

    /// Classify a URI scheme, ignoring ASCII case.
    #[must_use]
    pub fn parse(scheme: &str) -> Option<Self> {
        if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
            Some(Self::Http)
        } else if scheme.eq_ignore_ascii_case("file") {
            Some(Self::File)
        } else if scheme.eq_ignore_ascii_case("internal") {
            Some(Self::Internal)
        } else {
            None
        }
    }

    #[must_use]
    pub fn all() -> &'static [ImageScheme] {
        &[Self::Http, Self::File, Self::Internal]
    }
}

impl fmt::Display for ImageScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Absolute reference to an image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef {
    scheme: ImageScheme,
    uri: Url,
}

impl ImageRef {
    /// Wrap a URL whose scheme is one of [`ImageScheme`].
    #[must_use]
    pub fn from_url(uri: Url) -> Option<Self> {
        let scheme = ImageScheme::parse(uri.scheme())?;
        Some(Self { scheme, uri })
    }

    /// Parse an absolute URI string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Url::parse(s.trim()).ok().and_then(Self::from_url)
    }

    /// Resolve `name` against a bundle's base URI.
    #[must_use]
    pub fn resolve(base: &Url, name: &str) -> Option<Self> {
        base.join(name).ok().and_then(Self::from_url)
    }

    #[must_use]
    pub fn scheme(&self) -> ImageScheme {
        self.scheme
    }

    #[must_use]
    pub fn uri(&self) -> &Url {
        &self.uri
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri)
    }
}

/// Kind tag for each [`Value`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Empty,
    String,
    Integer,
    Real,
    Instant,
    Priority,
    Image,
}

/// A typed value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    #[default]
    Empty,
    String(String),
    Integer(i64),
    Real(f64),
    Instant(DateTime<Utc>),
    Priority(Priority),
    Image(ImageRef),
}

impl Value {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Empty => ValueKind::Empty,
            Self::String(_) => ValueKind::String,
            Self::Integer(_) => ValueKind::Integer,
            Self::Real(_) => ValueKind::Real,
            Self::Instant(_) => ValueKind::Instant,
            Self::Priority(_) => ValueKind::Priority,
            Self::Image(_) => ValueKind::Image,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Convert to `kind`, yielding [`Value::Empty`] when no conversion applies.
    #[must_use]
    pub fn coerce(&self, kind: ValueKind) -> Value {
        match kind {
            ValueKind::Empty => Value::Empty,
            ValueKind::String => self.to_text().map_or(Value::Empty, Value::String),
            ValueKind::Integer => self.to_integer().map_or(Value::Empty, Value::Integer),
            ValueKind::Real => self.to_real().map_or(Value::Empty, Value::Real),
            ValueKind::Instant => self.to_instant().map_or(Value::Empty, Value::Instant),
            ValueKind::Priority => self.to_priority().map_or(Value::Empty, Value::Priority),
            ValueKind::Image => self.to_image().map_or(Value::Empty, Value::Image),
        }
    }

    /// Textual form. Every non-empty value has one.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::String(s) => Some(s.clone()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Real(r) => Some(r.to_string()),
            Self::Instant(t) => Some(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Priority(p) => Some(p.as_str().to_string()),
            Self::Image(image) => Some(image.to_string()),
        }
    }

    #[must_use]
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            Self::String(s) => s.trim().parse().ok(),
            Self::Integer(i) => Some(*i),
            Self::Real(r) => truncate_real(*r),
            Self::Instant(t) => Some(t.timestamp_millis()),
            Self::Priority(p) => Some(p.ordinal()),
            Self::Empty | Self::Image(_) => None,
        }
    }

    #[must_use]
    pub fn to_real(&self) -> Option<f64> {
        match self {
            Self::String(s) => s.trim().parse().ok(),
            Self::Integer(i) => Some(*i as f64),
            Self::Real(r) => Some(*r),
            Self::Instant(t) => Some(t.timestamp_millis() as f64),
            Self::Priority(p) => Some(p.ordinal() as f64),
            Self::Empty | Self::Image(_) => None,
        }
    }

    /// Instants read from RFC 3339, `YYYY-MM-DD`, or epoch milliseconds.
    #[must_use]
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::String(s) => parse_instant(s.trim()),
            Self::Integer(millis) => Utc.timestamp_millis_opt(*millis).single(),
            Self::Real(r) => truncate_real(*r)
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
            Self::Instant(t) => Some(*t),
            Self::Empty | Self::Priority(_) | Self::Image(_) => None,
        }
    }

    #[must_use]
    pub fn to_priority(&self) -> Option<Priority> {
        match self {
            Self::String(s) => {
                let s = s.trim();
                Priority::parse(s).or_else(|| s.parse().ok().and_then(Priority::from_ordinal))
            }
            Self::Integer(i) => Priority::from_ordinal(*i),
            Self::Priority(p) => Some(*p),
            Self::Empty | Self::Real(_) | Self::Instant(_) | Self::Image(_) => None,
        }
    }

    #[must_use]
    pub fn to_image(&self) -> Option<ImageRef> {
        match self {
            Self::String(s) => ImageRef::parse(s),
            Self::Image(image) => Some(image.clone()),
            Self::Empty
            | Self::Integer(_)
            | Self::Real(_)
            | Self::Instant(_)
            | Self::Priority(_) => None,
        }
    }
}

/// Truncate toward zero. Reals outside the `i64` range have no integer form.
fn truncate_real(r: f64) -> Option<i64> {
    let t = r.trunc();
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then(|| t as i64)
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
    }
    s.parse::<i64>()
        .ok()
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<ImageRef> for Value {
    fn from(image: ImageRef) -> Self {
        Value::Image(image)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text().unwrap_or_default())
    }
}
