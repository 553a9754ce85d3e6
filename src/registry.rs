//! The documentation-entity registry: which URL base path each kind lives under.
use std::collections::BTreeMap;

use crate::types::EntityKind;

/// Resolves an entity kind to the URL paths registered for it.
pub trait EntityRegistry {
    /// Archive (listing page) path for a kind, without surrounding slashes.
    fn archive_path(&self, kind: EntityKind) -> Option<&str>;

    /// Rewrite slug under which single entities of a kind are served,
    /// without surrounding slashes. `None` means the kind is not registered.
    fn base_path(&self, kind: EntityKind) -> Option<&str>;
}

/// Routing for the parsed-code post type behind one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostType {
    /// Archive slug, if the post type has a listing page.
    pub archive: Option<String>,
    /// Post type name as registered by the code parser.
    pub name: &'static str,
    /// Rewrite slug for single entities.
    pub slug: Option<String>,
}

/// The portal's kind → post type table.
#[derive(Debug, Clone)]
pub struct PostTypeRegistry {
    /// One entry per kind; a kind without an entry is unregistered.
    entries: BTreeMap<EntityKind, PostType>,
}

impl PostTypeRegistry {
    /// Registry with no kinds registered.
    pub const fn empty() -> Self {
        return Self { entries: BTreeMap::new() };
    }

    /// The post type registered for a kind, if any.
    pub fn post_type(&self, kind: EntityKind) -> Option<&PostType> {
        return self.entries.get(&kind);
    }

    /// Override the archive slug for a kind. An empty slug removes the archive.
    pub fn set_archive(&mut self, kind: EntityKind, archive: &str) {
        let entry = self.entries.entry(kind).or_insert_with(|| return unrouted(kind));
        entry.archive = normalize_slug(archive);
    }

    /// Override the rewrite slug for a kind. An empty slug unregisters the
    /// kind's single pages, so its shortcodes stop resolving.
    pub fn set_slug(&mut self, kind: EntityKind, slug: &str) {
        let entry = self.entries.entry(kind).or_insert_with(|| return unrouted(kind));
        entry.slug = normalize_slug(slug);
    }
}

impl Default for PostTypeRegistry {
    /// The developer portal's routing: `reference/{kind}` singles and plural archives.
    fn default() -> Self {
        let mut registry = Self::empty();
        for kind in EntityKind::ALL {
            registry.set_slug(kind, &format!("reference/{}", kind.tag()));
        }
        registry.set_archive(EntityKind::Class, "reference/classes");
        registry.set_archive(EntityKind::Function, "reference/functions");
        registry.set_archive(EntityKind::Hook, "reference/hooks");
        return registry;
    }
}

impl EntityRegistry for PostTypeRegistry {
    fn archive_path(&self, kind: EntityKind) -> Option<&str> {
        return self.entries.get(&kind)?.archive.as_deref();
    }

    fn base_path(&self, kind: EntityKind) -> Option<&str> {
        return self.entries.get(&kind)?.slug.as_deref();
    }
}

/// Trim surrounding slashes and whitespace; empty means "none".
fn normalize_slug(slug: &str) -> Option<String> {
    let trimmed = slug.trim().trim_matches('/');
    return (!trimmed.is_empty()).then(|| return trimmed.to_string());
}

/// Name of the post type the code parser registers for a kind.
pub const fn post_type_name(kind: EntityKind) -> &'static str {
    return match kind {
        EntityKind::Class => "wp-parser-class",
        EntityKind::Function => "wp-parser-function",
        EntityKind::Hook => "wp-parser-hook",
        EntityKind::Method => "wp-parser-method",
    };
}

/// An entry with no routes yet.
const fn unrouted(kind: EntityKind) -> PostType {
    return PostType {
        archive: None,
        name: post_type_name(kind),
        slug: None,
    };
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;

    #[test]
    fn default_routes_match_portal() {
        let registry = PostTypeRegistry::default();

        assert_eq!(registry.base_path(EntityKind::Function), Some("reference/function"));
        assert_eq!(registry.base_path(EntityKind::Hook), Some("reference/hook"));
        assert_eq!(registry.base_path(EntityKind::Class), Some("reference/class"));
        assert_eq!(registry.base_path(EntityKind::Method), Some("reference/method"));
        assert_eq!(registry.archive_path(EntityKind::Class), Some("reference/classes"));
        assert_eq!(registry.archive_path(EntityKind::Method), None);
    }

    #[test]
    fn post_type_names_follow_parser() {
        let registry = PostTypeRegistry::default();
        let hook = registry.post_type(EntityKind::Hook);
        assert_eq!(hook.map(|p| return p.name), Some("wp-parser-hook"));
    }

    #[test]
    fn slugs_are_trimmed_and_empty_unregisters() {
        let mut registry = PostTypeRegistry::default();
        registry.set_slug(EntityKind::Hook, "/docs/hooks/");
        registry.set_slug(EntityKind::Method, "");

        assert_eq!(registry.base_path(EntityKind::Hook), Some("docs/hooks"));
        assert_eq!(registry.base_path(EntityKind::Method), None);
    }

    #[test]
    fn empty_registry_knows_nothing() {
        let registry = PostTypeRegistry::empty();
        for kind in EntityKind::ALL {
            assert_eq!(registry.base_path(kind), None);
        }
    }
}
