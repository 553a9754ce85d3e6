use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::error::Error;
use crate::shortcode;
use crate::types::Occurrence;

/// Scan all documents under `root` and extract shortcode occurrences.
/// Applies the config's extension and include/exclude filters. Hidden
/// files and directories are skipped. Documents without shortcodes are
/// left out; keys are paths relative to `root`, in sorted order.
///
/// A document that is not valid UTF-8 is skipped with a warning so the
/// rest of the project is still scanned.
///
/// # Errors
///
/// Returns `Error::ReadFailed` if any document cannot be read.
pub fn scan(root: &Path, config: &Config) -> Result<BTreeMap<PathBuf, Vec<Occurrence>>, Error> {
    let mut found: BTreeMap<PathBuf, Vec<Occurrence>> = BTreeMap::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| return e.depth() == 0 || !is_hidden(e))
        .filter_map(Result::ok)
        .filter(|e| return e.file_type().is_file() && config.is_document(e.path()))
    {
        let doc_path = entry.path();
        let relative = doc_path.strip_prefix(root).unwrap_or(doc_path).to_path_buf();

        if !config.should_scan(&relative.to_string_lossy()) {
            continue;
        }

        let bytes = std::fs::read(doc_path).map_err(|source| {
            return Error::ReadFailed { path: relative.clone(), source };
        })?;
        let Ok(content) = String::from_utf8(bytes) else {
            tracing::warn!(path = %relative.display(), "skipping document that is not valid UTF-8");
            continue;
        };
        let occurrences = shortcode::find_shortcodes(&content);
        tracing::debug!(path = %relative.display(), count = occurrences.len(), "scanned document");
        if !occurrences.is_empty() {
            found.insert(relative, occurrences);
        }
    }

    return Ok(found);
}

/// Dotfiles and dot-directories such as `.git`.
fn is_hidden(entry: &DirEntry) -> bool {
    return entry.file_name().to_str().is_some_and(|name| return name.starts_with('.'));
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::indexing_slicing, reason = "tests")]
mod tests {
    use super::*;

    #[test]
    fn collects_occurrences_per_document() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(docs.join("a.md"), "[hook name=\"init\"]\n[class name=\"WP_Query\"]").unwrap();
        std::fs::write(docs.join("b.md"), "no shortcodes here").unwrap();
        std::fs::write(docs.join("c.rs"), "[function name=\"ignored\"]").unwrap();

        let config = Config::parse(Path::new(".quickref.toml"), "").unwrap();
        let found = scan(dir.path(), &config).unwrap();

        assert_eq!(found.len(), 1);
        let occurrences = &found[&PathBuf::from("docs/a.md")];
        assert_eq!(occurrences.len(), 2);
        assert_eq!(occurrences[1].line, 2);
    }

    #[test]
    fn respects_config_filters_and_hidden_dirs() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["docs", "drafts", ".cache"] {
            std::fs::create_dir_all(dir.path().join(sub)).unwrap();
            std::fs::write(dir.path().join(sub).join("x.md"), "[hook name=\"init\"]").unwrap();
        }

        let config = Config::parse(Path::new(".quickref.toml"), "exclude = [\"drafts/\"]").unwrap();
        let found = scan(dir.path(), &config).unwrap();

        let paths: Vec<&PathBuf> = found.keys().collect();
        assert_eq!(paths, vec![&PathBuf::from("docs/x.md")]);
    }

    #[test]
    fn skips_documents_that_are_not_utf8() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.md"), "[function name=\"wp_list_pluck\"]").unwrap();
        std::fs::write(dir.path().join("legacy.html"), b"caf\xe9 [function name=\"x\"]").unwrap();

        let config = Config::parse(Path::new(".quickref.toml"), "").unwrap();
        let found = scan(dir.path(), &config).unwrap();

        let paths: Vec<&PathBuf> = found.keys().collect();
        assert_eq!(paths, vec![&PathBuf::from("good.md")]);
        assert_eq!(found[&PathBuf::from("good.md")].len(), 1);
    }
}
