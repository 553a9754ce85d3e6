//! The reference link resolver: shortcode attributes in, anchor markup out.
//!
//! Resolution never fails loudly. A shortcode that cannot be turned into a
//! link renders as nothing so the surrounding document keeps rendering;
//! [`Resolver::try_resolve`] exposes the reason for tooling that wants it.
use crate::registry::EntityRegistry;
use crate::sanitize;
use crate::types::{EntityKind, ReferenceTarget, ResolvedAttributes, ShortcodeRequest};

// ── Collaborators ─────────────────────────────────────────────────────

/// Turns a site-relative path into an absolute URL.
pub trait SiteUrl {
    /// Absolute URL for `path`. Leading slashes on `path` are ignored.
    fn url_for(&self, path: &str) -> String;
}

/// Transform applied to every link label before rendering.
pub trait TitleTransform {
    /// Transform one label.
    fn transform(&self, title: &str) -> String;
}

/// The site's home URL, stored without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeUrl {
    /// Base URL. Empty produces root-relative links.
    base: String,
}

impl HomeUrl {
    /// The home URL as configured, minus any trailing slash.
    pub fn as_str(&self) -> &str {
        return &self.base;
    }

    /// Wrap a home URL. Trailing slashes are dropped.
    pub fn new(base: &str) -> Self {
        return Self { base: base.trim().trim_end_matches('/').to_string() };
    }
}

impl SiteUrl for HomeUrl {
    fn url_for(&self, path: &str) -> String {
        return format!("{}/{}", self.base, path.trim_start_matches('/'));
    }
}

/// Leaves labels unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl TitleTransform for Identity {
    fn transform(&self, title: &str) -> String {
        return title.to_string();
    }
}

impl<F: Fn(&str) -> String> TitleTransform for F {
    fn transform(&self, title: &str) -> String {
        return self(title);
    }
}

// ── Resolution ────────────────────────────────────────────────────────

/// Why a shortcode resolved to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Unresolved {
    /// A method shortcode whose `class` sanitized to nothing.
    #[error("method requires a class")]
    MissingClass,
    /// The `name` attribute is absent or sanitized to nothing.
    #[error("missing name")]
    MissingName,
    /// No base path is registered for the kind.
    #[error("no base path registered for `{0}`")]
    UnregisteredKind(EntityKind),
}

/// A successfully resolved reference.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ReferenceLink {
    /// Attribute-escaped form of `url`.
    pub href: String,
    /// Kind of the referenced entity.
    pub kind: EntityKind,
    /// Visible link text, already passed through the title transform.
    pub label: String,
    /// Absolute URL, unescaped.
    pub url: String,
}

impl ReferenceLink {
    /// `<a href=".." class="quick-reference {kind}">{label}</a>`
    pub fn to_html(&self) -> String {
        return format!(
            r#"<a href="{}" class="quick-reference {}">{}</a>"#,
            self.href,
            sanitize::sanitize_html_class(self.kind.tag()),
            self.label
        );
    }
}

/// Resolves shortcode requests against injected collaborators.
/// Holds no mutable state; one resolver serves any number of documents.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    /// Kind → base path lookup.
    registry: &'a dyn EntityRegistry,
    /// Absolute URL construction.
    site: &'a dyn SiteUrl,
    /// Label transform.
    title: &'a dyn TitleTransform,
}

impl<'a> Resolver<'a> {
    /// Absolute archive URL for a kind, when the registry has one.
    pub fn archive_url(&self, kind: EntityKind) -> Option<String> {
        let archive = self.registry.archive_path(kind)?;
        return Some(self.site.url_for(&format!("{archive}/")));
    }

    /// Resolver with the identity title transform.
    pub fn new(registry: &'a dyn EntityRegistry, site: &'a dyn SiteUrl) -> Self {
        return Self { registry, site, title: &Identity };
    }

    /// Resolve a free-form attribute bag to anchor markup, or an empty string.
    pub fn resolve<I, K, V>(&self, kind: EntityKind, attributes: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let (request, dropped) = ShortcodeRequest::from_attributes(kind, attributes);
        if !dropped.is_empty() {
            tracing::debug!(%kind, ?dropped, "ignoring unsupported shortcode attributes");
        }
        return self.resolve_request(&request);
    }

    /// Resolve a typed request to anchor markup, or an empty string.
    pub fn resolve_request(&self, request: &ShortcodeRequest) -> String {
        return match self.try_resolve(request) {
            Ok(link) => link.to_html(),
            Err(reason) => {
                tracing::debug!(kind = %request.kind(), %reason, "shortcode resolved to nothing");
                String::new()
            },
        };
    }

    /// Compose the reference path for sanitized attributes.
    ///
    /// # Errors
    ///
    /// Returns `Unresolved::UnregisteredKind` if the registry has no base path for `kind`.
    pub fn target(
        &self,
        kind: EntityKind,
        attributes: &ResolvedAttributes,
    ) -> Result<ReferenceTarget, Unresolved> {
        let base = self
            .registry
            .base_path(kind)
            .filter(|base| return !base.is_empty())
            .ok_or(Unresolved::UnregisteredKind(kind))?;

        let path = match kind {
            EntityKind::Method => format!("{base}/{}/{}", attributes.class, attributes.name),
            EntityKind::Class | EntityKind::Function | EntityKind::Hook => {
                format!("{base}/{}/", attributes.name)
            },
        };
        return Ok(ReferenceTarget { kind, path });
    }

    /// Resolve a typed request, reporting why it failed.
    ///
    /// # Errors
    ///
    /// Returns `Unresolved::MissingName` when the sanitized name is empty,
    /// `Unresolved::MissingClass` for a method without a usable class,
    /// or `Unresolved::UnregisteredKind` when the kind has no base path.
    pub fn try_resolve(&self, request: &ShortcodeRequest) -> Result<ReferenceLink, Unresolved> {
        let kind = request.kind();
        let attributes = sanitize_request(request);

        if attributes.name.is_empty() {
            return Err(Unresolved::MissingName);
        }
        if kind.accepts_class() && attributes.class.is_empty() {
            return Err(Unresolved::MissingClass);
        }

        let target = self.target(kind, &attributes)?;
        let url = self.site.url_for(&target.path);

        let label = if attributes.label.is_empty() {
            self.title.transform(&sanitize::strip_tags(&attributes.raw_name))
        } else {
            self.title.transform(&attributes.label)
        };

        return Ok(ReferenceLink {
            href: sanitize::escape_url(&url),
            kind,
            label,
            url,
        });
    }

    /// Replace the label transform.
    #[must_use]
    pub fn with_title_transform(self, title: &'a dyn TitleTransform) -> Self {
        return Self { title, ..self };
    }
}

/// Sanitize a request's attributes. The raw name is captured from the
/// unsanitized `name` so the label fallback keeps the author's casing.
pub fn sanitize_request(request: &ShortcodeRequest) -> ResolvedAttributes {
    let name = request.name().unwrap_or_default();
    return ResolvedAttributes {
        class: request.class().map(sanitize::sanitize_key).unwrap_or_default(),
        label: request.label().map(sanitize::strip_tags).unwrap_or_default(),
        name: sanitize::sanitize_key(name),
        raw_name: sanitize::filter_raw_name(name),
    };
}
