//! Qualifiers: partial, multi-axis descriptors of a runtime context.
//!
//! A [`Qualifier`] sets any subset of four axes (language, screen class,
//! screen color, flavor). Stored variants carry partial qualifiers; the
//! runtime context used for resolution is fully specified.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class of display the content is rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenClass {
    None,
    Micro,
    Mini,
    Pc,
}

/// Color capability of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenColor {
    Other,
    Mono,
    Gray,
    Color,
}

/// Presentation flavor the content is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    Generic,
    Navigation,
    Item,
    List,
    Error,
    Modal,
    Input,
}

impl ScreenClass {
    /// Lowercase tag used in paths and configuration.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Micro => "micro",
            Self::Mini => "mini",
            Self::Pc => "pc",
        }
    }

    /// Parse a tag, ignoring ASCII case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
    }

    #[must_use]
    pub fn all() -> &'static [ScreenClass] {
        &[Self::None, Self::Micro, Self::Mini, Self::Pc]
    }
}

impl ScreenColor {
    /// Lowercase tag used in paths and configuration.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Other => "other",
            Self::Mono => "mono",
            Self::Gray => "gray",
            Self::Color => "color",
        }
    }

    /// Parse a tag, ignoring ASCII case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
    }

    #[must_use]
    pub fn all() -> &'static [ScreenColor] {
        &[Self::Other, Self::Mono, Self::Gray, Self::Color]
    }
}

impl Flavor {
    /// Lowercase tag used in paths and configuration.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Navigation => "navigation",
            Self::Item => "item",
            Self::List => "list",
            Self::Error => "error",
            Self::Modal => "modal",
            Self::Input => "input",
        }
    }

    /// Parse a tag, ignoring ASCII case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
    }

    #[must_use]
    pub fn all() -> &'static [Flavor] {
        &[
            Self::Generic,
            Self::Navigation,
            Self::Item,
            Self::List,
            Self::Error,
            Self::Modal,
            Self::Input,
        ]
    }
}

impl fmt::Display for ScreenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ScreenColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Partial descriptor of a runtime context.
///
/// Field order matters: the derived [`Ord`] compares language, then screen
/// class, then screen color, then flavor, with an unset axis sorting before
/// any set value. Variant lists are kept in this order, and resolution
/// merges matches in it. It is not a specificity ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Qualifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    screen_class: Option<ScreenClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    screen_color: Option<ScreenColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flavor: Option<Flavor>,
}

/// The qualifier with no axis set. Matches every context.
pub static UNIVERSAL: Qualifier = Qualifier {
    language: None,
    screen_class: None,
    screen_color: None,
    flavor: None,
};

impl Qualifier {
    /// The shared universal qualifier.
    #[must_use]
    pub fn universal() -> &'static Qualifier {
        &UNIVERSAL
    }

    /// A qualifier with every axis set.
    #[must_use]
    pub fn full(
        language: impl Into<String>,
        screen_class: ScreenClass,
        screen_color: ScreenColor,
        flavor: Flavor,
    ) -> Self {
        Self {
            language: Some(language.into()),
            screen_class: Some(screen_class),
            screen_color: Some(screen_color),
            flavor: Some(flavor),
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn with_screen_class(mut self, screen_class: ScreenClass) -> Self {
        self.screen_class = Some(screen_class);
        self
    }

    #[must_use]
    pub fn with_screen_color(mut self, screen_color: ScreenColor) -> Self {
        self.screen_color = Some(screen_color);
        self
    }

    #[must_use]
    pub fn with_flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = Some(flavor);
        self
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub fn screen_class(&self) -> Option<ScreenClass> {
        self.screen_class
    }

    #[must_use]
    pub fn screen_color(&self) -> Option<ScreenColor> {
        self.screen_color
    }

    #[must_use]
    pub fn flavor(&self) -> Option<Flavor> {
        self.flavor
    }

    /// True when no axis is set.
    #[must_use]
    pub fn is_universal(&self) -> bool {
        *self == UNIVERSAL
    }

    /// True when all four axes are set.
    #[must_use]
    pub fn is_fully_specified(&self) -> bool {
        self.language.is_some()
            && self.screen_class.is_some()
            && self.screen_color.is_some()
            && self.flavor.is_some()
    }

    /// Whether `context` satisfies every axis this qualifier sets.
    ///
    /// `self` is the pattern (a stored variant's qualifier), `context` the
    /// runtime qualifier. Axes unset on `self` impose no constraint.
    #[must_use]
    pub fn matches(&self, context: &Qualifier) -> bool {
        fn axis<T: PartialEq>(pattern: &Option<T>, candidate: &Option<T>) -> bool {
            pattern.as_ref().is_none_or(|p| candidate.as_ref() == Some(p))
        }

        axis(&self.language, &context.language)
            && axis(&self.screen_class, &context.screen_class)
            && axis(&self.screen_color, &context.screen_color)
            && axis(&self.flavor, &context.flavor)
    }

    /// Fill every axis unset here from `fallback`.
    #[must_use]
    pub fn or_else_from(&self, fallback: &Qualifier) -> Qualifier {
        Qualifier {
            language: self.language.clone().or_else(|| fallback.language.clone()),
            screen_class: self.screen_class.or(fallback.screen_class),
            screen_color: self.screen_color.or(fallback.screen_color),
            flavor: self.flavor.or(fallback.flavor),
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_universal() {
            return write!(f, "*");
        }
        let mut parts = Vec::with_capacity(4);
        if let Some(language) = &self.language {
            parts.push(format!("lang__{language}"));
        }
        if let Some(screen_class) = self.screen_class {
            parts.push(format!("screen__{screen_class}"));
        }
        if let Some(screen_color) = self.screen_color {
            parts.push(format!("color__{screen_color}"));
        }
        if let Some(flavor) = self.flavor {
            parts.push(format!("flavor__{flavor}"));
        }
        write!(f, "{}", parts.join("/"))
    }
}
