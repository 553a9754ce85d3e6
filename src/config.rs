use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::registry::PostTypeRegistry;
use crate::resolver::HomeUrl;
use crate::sanitize;
use crate::types::EntityKind;

/// Name of the config file, looked up in the project root.
pub const CONFIG_FILE: &str = ".quickref.toml";

/// Document extensions scanned when the config does not say otherwise.
const DEFAULT_EXTENSIONS: [&str; 3] = ["html", "md", "txt"];

/// Project configuration loaded from `.quickref.toml`.
/// Include/exclude patterns are path prefixes applied to document files.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path prefixes never scanned.
    exclude: Vec<String>,
    /// File extensions (without dot) treated as documents.
    extensions: Vec<String>,
    /// Site home URL, without trailing slash.
    home_url: HomeUrl,
    /// Path prefixes scanned; empty means everything.
    include: Vec<String>,
    /// Per-kind routing overrides.
    paths: BTreeMap<EntityKind, PathOverride>,
}

/// Routing override for one kind. Absent fields keep the default; an empty
/// string removes the route.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathOverride {
    /// Archive slug.
    #[serde(default)]
    archive: Option<String>,
    /// Single-entity rewrite slug.
    #[serde(default)]
    slug: Option<String>,
}

/// Raw TOML structure for `.quickref.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct QuickrefTomlConfig {
    /// See `Config::exclude`.
    #[serde(default)]
    exclude: Vec<String>,
    /// See `Config::extensions`.
    #[serde(default)]
    extensions: Option<Vec<String>>,
    /// See `Config::home_url`.
    #[serde(default)]
    home_url: String,
    /// See `Config::include`.
    #[serde(default)]
    include: Vec<String>,
    /// See `Config::paths`. Keyed by shortcode tag name.
    #[serde(default)]
    paths: BTreeMap<String, PathOverride>,
}

impl Config {
    /// The configured site home URL.
    pub const fn home_url(&self) -> &HomeUrl {
        return &self.home_url;
    }

    /// Load config from `.quickref.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist. Returns an error if the
    /// file exists but is malformed; a written config is never ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// `Error::TomlDe` if the TOML is malformed,
    /// or `Error::ConfigInvalid` if the home URL is unusable.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = config_path(root);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::scan_everything_by_default());
            },
            Err(e) => return Err(Error::Io(e)),
        };

        return Self::parse(&path, &content);
    }

    /// Parse config content. `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed,
    /// or `Error::ConfigInvalid` if the home URL is unusable.
    pub fn parse(path: &Path, content: &str) -> Result<Self, Error> {
        let raw: QuickrefTomlConfig = toml::from_str(content)?;

        let home = raw.home_url.trim();
        if !home.is_empty() && sanitize::escape_url(home).is_empty() {
            return Err(Error::ConfigInvalid {
                path: path.to_path_buf(),
                reason: format!("home_url `{home}` is not a usable URL"),
            });
        }

        let mut paths = BTreeMap::new();
        for (tag, routes) in raw.paths {
            let Some(kind) = EntityKind::from_tag(&tag) else {
                return Err(Error::ConfigInvalid {
                    path: path.to_path_buf(),
                    reason: format!("unknown kind `{tag}` in [paths]"),
                });
            };
            paths.insert(kind, routes);
        }

        let extensions = raw.extensions.map_or_else(default_extensions, |list| {
            return list
                .iter()
                .map(|ext| return ext.trim_start_matches('.').to_ascii_lowercase())
                .collect();
        });

        return Ok(Self {
            exclude: raw.exclude,
            extensions,
            home_url: HomeUrl::new(home),
            include: raw.include,
            paths,
        });
    }

    /// The default registry with this config's routing overrides applied.
    pub fn registry(&self) -> PostTypeRegistry {
        let mut registry = PostTypeRegistry::default();
        for (kind, paths) in &self.paths {
            if let Some(slug) = &paths.slug {
                registry.set_slug(*kind, slug);
            }
            if let Some(archive) = &paths.archive {
                registry.set_archive(*kind, archive);
            }
        }
        return registry;
    }

    /// Default config: root-relative links, every document scanned.
    fn scan_everything_by_default() -> Self {
        return Self {
            exclude: Vec::new(),
            extensions: default_extensions(),
            home_url: HomeUrl::new(""),
            include: Vec::new(),
            paths: BTreeMap::new(),
        };
    }

    /// Whether a file has one of the configured document extensions.
    pub fn is_document(&self, path: &Path) -> bool {
        return path
            .extension()
            .and_then(|ext| return ext.to_str())
            .is_some_and(|ext| return self.extensions.iter().any(|e| return e.eq_ignore_ascii_case(ext)));
    }

    /// Check whether a document path should be scanned.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}

/// Owned copy of `DEFAULT_EXTENSIONS`.
fn default_extensions() -> Vec<String> {
    return DEFAULT_EXTENSIONS.iter().map(|ext| return (*ext).to_string()).collect();
}

/// Where the config file lives for a project root.
pub fn config_path(root: &Path) -> PathBuf {
    return root.join(CONFIG_FILE);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used, reason = "tests")]
mod tests {
    use super::*;
    use crate::registry::EntityRegistry as _;

    fn parse(content: &str) -> Result<Config, Error> {
        return Config::parse(Path::new(CONFIG_FILE), content);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.home_url().as_str(), "");
        assert!(config.should_scan("anything/at/all.md"));
        assert!(config.is_document(Path::new("docs/a.MD")));
        assert!(!config.is_document(Path::new("src/lib.rs")));
    }

    #[test]
    fn include_and_exclude_prefixes() {
        let config = parse("include = [\"docs/\"]\nexclude = [\"docs/drafts/\"]").unwrap();
        assert!(config.should_scan("docs/guide.md"));
        assert!(!config.should_scan("docs/drafts/wip.md"));
        assert!(!config.should_scan("README.md"));
    }

    #[test]
    fn home_url_loses_trailing_slash() {
        let config = parse("home_url = \"https://developer.wordpress.org/\"").unwrap();
        assert_eq!(config.home_url().as_str(), "https://developer.wordpress.org");
    }

    #[test]
    fn unusable_home_url_is_rejected() {
        let err = parse("home_url = \"javascript:alert(1)\"").unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }

    #[test]
    fn path_overrides_reach_registry() {
        let config = parse(
            "[paths.hook]\nslug = \"/docs/hooks/\"\narchive = \"\"\n\n[paths.method]\nslug = \"\"\n",
        )
        .unwrap();
        let registry = config.registry();

        assert_eq!(registry.base_path(EntityKind::Hook), Some("docs/hooks"));
        assert_eq!(registry.archive_path(EntityKind::Hook), None);
        assert_eq!(registry.base_path(EntityKind::Method), None);
        assert_eq!(registry.base_path(EntityKind::Function), Some("reference/function"));
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let err = parse("[paths.constant]\nslug = \"reference/constant\"").unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
        assert!(err.to_string().contains("unknown kind `constant`"));
    }

    #[test]
    fn unknown_route_field_is_a_toml_error() {
        let err = parse("[paths.hook]\nprefix = \"x\"").unwrap_err();
        assert!(matches!(err, Error::TomlDe(_)));
    }

    #[test]
    fn extensions_are_normalized() {
        let config = parse("extensions = [\".Markdown\"]").unwrap();
        assert!(config.is_document(Path::new("a.markdown")));
        assert!(!config.is_document(Path::new("a.md")));
    }

    #[test]
    fn load_without_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.should_scan("x.md"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(config_path(dir.path()), "home_url = \"https://example.org\"").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.home_url().as_str(), "https://example.org");
    }
}
