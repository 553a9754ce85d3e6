//! CLI commands for quickref: expand, check, list, paths.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use quickref::config::Config;
use quickref::error::Error;
use quickref::registry::{self, EntityRegistry as _};
use quickref::resolver::{Resolver, SiteUrl as _};
use quickref::types::EntityKind;
use quickref::{expand_shortcodes, scanner};

/// One resolvable reference, as printed by `list`.
#[derive(serde::Serialize)]
struct ListedReference {
    /// Kind of the referenced entity.
    kind: EntityKind,
    /// Visible link text.
    label: String,
    /// One-based line in the source document.
    line: u32,
    /// Document containing the shortcode, relative to the project root.
    source: PathBuf,
    /// Absolute reference URL.
    url: String,
}

/// Scan documents and report every shortcode that would render as nothing.
///
/// Exit code 0 when everything resolves, 2 when anything is broken.
///
/// # Errors
///
/// Returns errors from config loading or document scanning.
pub fn check() -> Result<ExitCode, Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let routes = config.registry();
    let resolver = Resolver::new(&routes, config.home_url());

    let documents = scanner::scan(&root, &config)?;
    let mut total = 0_u32;
    let mut broken = 0_u32;

    for (source, occurrences) in &documents {
        for occurrence in occurrences.iter().filter(|o| return !o.is_escaped()) {
            total = total.saturating_add(1);
            let (request, _) = occurrence.request();
            if let Err(reason) = resolver.try_resolve(&request) {
                broken = broken.saturating_add(1);
                println!(
                    "BROKEN  {}:{}  {}  ({reason})",
                    source.display(),
                    occurrence.line,
                    one_line(&occurrence.text)
                );
            }
        }
    }

    if broken > 0 {
        println!();
        println!("{broken} broken of {total} shortcodes");
        return Ok(ExitCode::from(2));
    }

    println!("All {total} shortcodes resolve");
    return Ok(ExitCode::SUCCESS);
}

/// Expand the shortcodes in one document, printing the result or writing it
/// to `output`.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the document cannot be read,
/// or errors from config loading or writing the output.
pub fn expand(file: &str, output: Option<&str>) -> Result<(), Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let routes = config.registry();
    let resolver = Resolver::new(&routes, config.home_url());

    let path = PathBuf::from(file);
    let content = std::fs::read_to_string(&path)
        .map_err(|_err| return Error::FileNotFound { path: path.clone() })?;

    let expanded = expand_shortcodes(&content, &resolver);

    match output {
        Some(out) => {
            std::fs::write(Path::new(out), expanded)?;
            tracing::info!(from = %path.display(), to = out, "expanded document");
        },
        None => print!("{expanded}"),
    }

    return Ok(());
}

/// List every resolvable reference in the scanned documents.
///
/// # Errors
///
/// Returns errors from config loading, document scanning, or JSON output.
pub fn list(json: bool) -> Result<(), Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let routes = config.registry();
    let resolver = Resolver::new(&routes, config.home_url());

    let mut listed = Vec::new();
    for (source, occurrences) in scanner::scan(&root, &config)? {
        for occurrence in occurrences.iter().filter(|o| return !o.is_escaped()) {
            let (request, _) = occurrence.request();
            let Ok(link) = resolver.try_resolve(&request) else {
                continue;
            };
            listed.push(ListedReference {
                kind: link.kind,
                label: link.label,
                line: occurrence.line,
                source: source.clone(),
                url: link.url,
            });
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }

    for entry in &listed {
        println!(
            "{}:{}  {:<8}  {}  {}",
            entry.source.display(),
            entry.line,
            entry.kind,
            entry.label,
            entry.url
        );
    }
    return Ok(());
}

/// Collapse a multi-line tag onto one line for reporting.
fn one_line(text: &str) -> String {
    return text.split_whitespace().collect::<Vec<_>>().join(" ");
}

/// Print the routing registered for each kind.
///
/// # Errors
///
/// Returns errors from config loading.
pub fn paths() -> Result<(), Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let routes = config.registry();
    let resolver = Resolver::new(&routes, config.home_url());

    for kind in EntityKind::ALL {
        let single = routes.base_path(kind).map_or_else(
            || return "(unregistered)".to_string(),
            |slug| {
                return match kind {
                    EntityKind::Method => config.home_url().url_for(&format!("{slug}/{{class}}/{{name}}")),
                    EntityKind::Class | EntityKind::Function | EntityKind::Hook => {
                        config.home_url().url_for(&format!("{slug}/{{name}}/"))
                    },
                };
            },
        );
        let archive = resolver.archive_url(kind).unwrap_or_else(|| return "-".to_string());
        println!(
            "{:<8}  {:<18}  {single}  archive: {archive}",
            kind,
            registry::post_type_name(kind)
        );
    }

    return Ok(());
}
