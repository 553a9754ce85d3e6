use quickref::config::CONFIG_FILE;
use quickref::error::Error;

/// ANSI bold, for markdown headings on a terminal.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is
/// one, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::ConfigInvalid { path, reason } => format!("\
# Error: Invalid Config

`{}`: {reason}

## Fix

`home_url` must be an absolute http(s) URL, or absent for root-relative
links. `[paths.<kind>]` tables accept `function`, `hook`, `class`, `method`:

    home_url = \"https://developer.wordpress.org\"

    [paths.method]
    slug = \"reference/method\"
", path.display()),

        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist or cannot be read.
", path.display()),

        Error::Io(err) => format!("\
# Error: I/O

{err}
"),

        Error::Json(err) => format!("\
# Error: JSON Output

{err}
"),

        Error::ReadFailed { path, source } => format!("\
# Error: Unreadable Document

`{}`: {source}

## Fix

Check the file's permissions, or exclude it in `{CONFIG_FILE}`:

    exclude = [\"{}\"]
", path.display(), path.display()),

        Error::TomlDe(err) => format!("\
# Error: Invalid TOML

{err}

## Fix

Check `{CONFIG_FILE}`. Recognized keys: `home_url`, `include`, `exclude`,
`extensions`, and `[paths.<kind>]` tables with `slug` and `archive`, where
`<kind>` is one of `function`, `hook`, `class`, `method`.
"),

        Error::WatchFailed { reason } => format!("\
# Error: Watch Failed

{reason}
"),
    };
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used, reason = "tests")]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn file_not_found_names_the_file() {
        let md = render_error(&Error::FileNotFound { path: PathBuf::from("docs/missing.md") });
        assert!(md.starts_with("# Error: File Not Found"));
        assert!(md.contains("`docs/missing.md`"));
    }

    #[test]
    fn read_failure_names_the_document() {
        let md = render_error(&Error::ReadFailed {
            path: PathBuf::from("docs/locked.md"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });
        assert!(md.starts_with("# Error: Unreadable Document"));
        assert!(md.contains("`docs/locked.md`"));
        assert!(md.contains("exclude = [\"docs/locked.md\"]"));
    }

    #[test]
    fn toml_errors_point_at_config() {
        let err = toml::from_str::<toml::Value>("= nope").unwrap_err();
        let md = render_error(&Error::TomlDe(err));
        assert!(md.contains("## Fix"));
        assert!(md.contains(CONFIG_FILE));
    }
}
