//! Core domain types for quick-reference shortcodes, requests, and targets.
use std::fmt;
use std::ops::Range;

/// The four documented entity kinds. Each one is also the name of its shortcode tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// `[class]`: a documented class.
    Class,
    /// `[function]`: a documented function.
    Function,
    /// `[hook]`: a documented action or filter hook.
    Hook,
    /// `[method]`: a documented class method. Requires a `class` attribute.
    Method,
}

impl EntityKind {
    /// Every kind, in shortcode registration order.
    pub const ALL: [Self; 4] = [Self::Function, Self::Hook, Self::Class, Self::Method];

    /// Whether the `class` attribute is part of this kind's attribute set.
    pub const fn accepts_class(self) -> bool {
        return matches!(self, Self::Method);
    }

    /// Look up a kind by its shortcode tag name. Tag names are case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        return Self::ALL.into_iter().find(|kind| return kind.tag() == tag);
    }

    /// The shortcode tag name, which doubles as the link's CSS modifier class.
    pub const fn tag(self) -> &'static str {
        return match self {
            Self::Class => "class",
            Self::Function => "function",
            Self::Hook => "hook",
            Self::Method => "method",
        };
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.pad(self.tag());
    }
}

/// Attributes accepted by `[function]`, `[hook]` and `[class]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedAttributes {
    /// Visible link text. Falls back to the name when absent.
    pub label: Option<String>,
    /// Identifier of the referenced entity, as written by the author.
    pub name: Option<String>,
}

/// Attributes accepted by `[method]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodAttributes {
    /// Owning class of the method, as written by the author.
    pub class: Option<String>,
    /// Visible link text. Falls back to the name when absent.
    pub label: Option<String>,
    /// Method name, as written by the author.
    pub name: Option<String>,
}

/// One shortcode invocation with its attribute bag narrowed to the fields
/// its kind accepts. Values are stored unsanitized; the resolver sanitizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcodeRequest {
    /// `[class name=".."]`
    Class(NamedAttributes),
    /// `[function name=".."]`
    Function(NamedAttributes),
    /// `[hook name=".."]`
    Hook(NamedAttributes),
    /// `[method name=".." class=".."]`
    Method(MethodAttributes),
}

impl ShortcodeRequest {
    /// The `class` attribute. Always `None` for kinds other than method.
    pub fn class(&self) -> Option<&str> {
        return match self {
            Self::Method(attrs) => attrs.class.as_deref(),
            Self::Class(_) | Self::Function(_) | Self::Hook(_) => None,
        };
    }

    /// Build a typed request from a free-form attribute bag.
    ///
    /// Keys outside the kind's attribute set are not an error: they are
    /// returned as the second element so callers can log them. When a key
    /// repeats, the last value wins.
    pub fn from_attributes<I, K, V>(kind: EntityKind, attributes: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut class = None;
        let mut label = None;
        let mut name = None;
        let mut dropped = Vec::new();

        for (key, value) in attributes {
            let value = value.as_ref().to_owned();
            match key.as_ref() {
                "class" if kind.accepts_class() => class = Some(value),
                "label" => label = Some(value),
                "name" => name = Some(value),
                other => dropped.push(other.to_owned()),
            }
        }

        let request = match kind {
            EntityKind::Class => Self::Class(NamedAttributes { label, name }),
            EntityKind::Function => Self::Function(NamedAttributes { label, name }),
            EntityKind::Hook => Self::Hook(NamedAttributes { label, name }),
            EntityKind::Method => Self::Method(MethodAttributes { class, label, name }),
        };
        return (request, dropped);
    }

    /// The entity kind this request refers to.
    pub const fn kind(&self) -> EntityKind {
        return match self {
            Self::Class(_) => EntityKind::Class,
            Self::Function(_) => EntityKind::Function,
            Self::Hook(_) => EntityKind::Hook,
            Self::Method(_) => EntityKind::Method,
        };
    }

    /// The `label` attribute, if supplied.
    pub fn label(&self) -> Option<&str> {
        return match self {
            Self::Class(attrs) | Self::Function(attrs) | Self::Hook(attrs) => attrs.label.as_deref(),
            Self::Method(attrs) => attrs.label.as_deref(),
        };
    }

    /// The `name` attribute, if supplied.
    pub fn name(&self) -> Option<&str> {
        return match self {
            Self::Class(attrs) | Self::Function(attrs) | Self::Hook(attrs) => attrs.name.as_deref(),
            Self::Method(attrs) => attrs.name.as_deref(),
        };
    }
}

/// Attributes after sanitization. Derived per request, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAttributes {
    /// Sanitized key form of the `class` attribute. Empty unless method.
    pub class: String,
    /// The `label` attribute with markup stripped. Empty when absent.
    pub label: String,
    /// Sanitized key form of the `name` attribute.
    pub name: String,
    /// The `name` attribute filtered to `[A-Za-z0-9_-]` before lowercasing.
    /// Only ever used as the label fallback.
    pub raw_name: String,
}

/// A composed, not yet absolute, reference path for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTarget {
    /// Kind of the referenced entity.
    pub kind: EntityKind,
    /// `{base}/{class}/{name}` for methods, `{base}/{name}/` otherwise.
    pub path: String,
}

/// A shortcode tag located in document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// Attribute pairs in source order. Positional values carry their index as key.
    pub attributes: Vec<(String, String)>,
    /// Whether an extra `]` closes the tag, as in `[[function name="x"]]`.
    pub close_bracket: bool,
    /// Which shortcode tag this is.
    pub kind: EntityKind,
    /// One-based line of the opening bracket.
    pub line: u32,
    /// Whether an extra `[` opens the tag.
    pub open_bracket: bool,
    /// Byte range of the whole occurrence, brackets and enclosed content included.
    pub span: Range<usize>,
    /// Source text covered by `span`.
    pub text: String,
}

impl Occurrence {
    /// A doubled-bracket tag is an escape: it renders as the literal inner tag.
    pub const fn is_escaped(&self) -> bool {
        return self.open_bracket && self.close_bracket;
    }

    /// The source text without its outermost bracket pair.
    pub fn literal(&self) -> &str {
        let inner = self.text.strip_prefix('[').unwrap_or(&self.text);
        return inner.strip_suffix(']').unwrap_or(inner);
    }

    /// Narrow the attribute bag into a typed request.
    pub fn request(&self) -> (ShortcodeRequest, Vec<String>) {
        return ShortcodeRequest::from_attributes(
            self.kind,
            self.attributes.iter().map(|(k, v)| return (k.as_str(), v.as_str())),
        );
    }
}
