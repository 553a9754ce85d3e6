//! Text sanitizers applied to shortcode attributes and generated markup.
//!
//! These follow the documentation portal's own sanitization rules so that a
//! link built here is byte-for-byte what the portal would emit.

/// URL schemes `escape_url` lets through. Anything else empties the URL.
const ALLOWED_PROTOCOLS: &[&str] = &[
    "fax", "feed", "ftp", "ftps", "gopher", "http", "https", "irc", "irc6", "ircs", "mailto", "mms",
    "news", "nntp", "rtsp", "sms", "svn", "tel", "telnet", "urn", "webcal", "xmpp",
];

/// Punctuation that survives URL escaping, in addition to ASCII alphanumerics
/// and any non-ASCII character.
const URL_PUNCTUATION: &str = "-~+_.?#=!&;,/:%@$|*'()[]";

/// Replace `&amp;`, stray `&` and `'` with numeric entities, leaving other
/// well-formed entities intact.
fn encode_display_entities(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut rest = url;

    while let Some(ch) = rest.chars().next() {
        let width = ch.len_utf8();
        match ch {
            '&' => match entity_len(rest) {
                Some(len) if rest.get(..len) != Some("&amp;") => {
                    out.push_str(rest.get(..len).unwrap_or_default());
                    rest = rest.get(len..).unwrap_or_default();
                    continue;
                },
                Some(len) => {
                    out.push_str("&#038;");
                    rest = rest.get(len..).unwrap_or_default();
                    continue;
                },
                None => out.push_str("&#038;"),
            },
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
        rest = rest.get(width..).unwrap_or_default();
    }

    return out;
}

/// Byte length of a well-formed character reference at the start of `rest`
/// (`&name;`, `&#123;` or `&#x1F;`), if there is one.
fn entity_len(rest: &str) -> Option<usize> {
    let body = rest.strip_prefix('&')?;
    let end = body.find(';')?;
    let name = body.get(..end)?;

    let valid = if let Some(hex) = name.strip_prefix("#x").or_else(|| return name.strip_prefix("#X")) {
        !hex.is_empty() && hex.chars().all(|c| return c.is_ascii_hexdigit())
    } else if let Some(dec) = name.strip_prefix('#') {
        !dec.is_empty() && dec.chars().all(|c| return c.is_ascii_digit())
    } else {
        name.chars().next().is_some_and(|c| return c.is_ascii_alphabetic())
            && name.chars().all(|c| return c.is_ascii_alphanumeric())
    };

    // `&` + name + `;`
    return valid.then(|| return end.saturating_add(2));
}

/// Escape a URL for use in an HTML attribute.
///
/// Leading whitespace is trimmed and inner spaces become `%20`. Characters
/// outside the URL-safe set are dropped. A URL with no scheme that is not
/// root-, fragment- or query-relative gets `http://`. A scheme outside the
/// allow-list yields an empty string. `&` and `'` are entity-encoded.
pub fn escape_url(url: &str) -> String {
    let trimmed = url.trim_start();
    if trimmed.is_empty() {
        return String::new();
    }

    let filtered: String = trimmed
        .replace(' ', "%20")
        .chars()
        .filter(|c| return is_url_char(*c))
        .collect();
    if filtered.is_empty() {
        return String::new();
    }

    let absolute = if needs_default_scheme(&filtered) {
        format!("http://{filtered}")
    } else {
        filtered
    };

    if !has_allowed_protocol(&absolute) {
        return String::new();
    }

    return encode_display_entities(&absolute);
}

/// Keep only `[A-Za-z0-9_-]`, preserving case. Used to capture the
/// author's spelling of a name before it is lowercased.
pub fn filter_raw_name(name: &str) -> String {
    return name.chars().filter(|c| return is_raw_name_char(*c)).collect();
}

/// Whether the scheme of `url`, if it has one, is on the allow-list.
fn has_allowed_protocol(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return true;
    };
    if scheme.contains(['/', '?', '#']) {
        return true;
    }
    return ALLOWED_PROTOCOLS
        .iter()
        .any(|allowed| return allowed.eq_ignore_ascii_case(scheme));
}

/// Whether `c` is in the HTML-class-safe set.
fn is_class_char(c: char) -> bool {
    return c.is_ascii_alphanumeric() || c == '_' || c == '-';
}

/// Whether `c` is in the sanitized-key set.
fn is_key_char(c: char) -> bool {
    return c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-';
}

/// Whether `c` survives raw-name filtering.
fn is_raw_name_char(c: char) -> bool {
    return c.is_ascii_alphanumeric() || c == '_' || c == '-';
}

/// Whether `c` survives URL escaping.
fn is_url_char(c: char) -> bool {
    return c.is_ascii_alphanumeric() || !c.is_ascii() || URL_PUNCTUATION.contains(c);
}

/// A scheme-less URL is treated as a host unless it is relative to the
/// root, a fragment, a query, or names a `.php` file.
fn needs_default_scheme(url: &str) -> bool {
    if url.contains(':') || url.starts_with(['/', '#', '?']) {
        return false;
    }

    let stem_len = url
        .find(|c: char| return !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or(url.len());
    let is_php_file = stem_len > 0
        && url
            .get(stem_len..)
            .and_then(|rest| return rest.get(..4))
            .is_some_and(|ext| return ext.eq_ignore_ascii_case(".php"));

    return !is_php_file;
}

/// Reduce a string to a valid HTML class name: `%XX` octets are removed,
/// then anything outside `[A-Za-z0-9_-]`.
pub fn sanitize_html_class(class: &str) -> String {
    let mut out = String::with_capacity(class.len());
    let mut rest = class;

    while let Some(ch) = rest.chars().next() {
        let is_octet = ch == '%'
            && rest
                .get(1..3)
                .is_some_and(|hex| return hex.chars().all(|c| return c.is_ascii_hexdigit()));
        if is_octet {
            rest = rest.get(3..).unwrap_or_default();
            continue;
        }
        if is_class_char(ch) {
            out.push(ch);
        }
        rest = rest.get(ch.len_utf8()..).unwrap_or_default();
    }

    return out;
}

/// Reduce a string to a sanitized key: ASCII-lowercased, then restricted to
/// `[a-z0-9_-]`. Applying it twice changes nothing.
pub fn sanitize_key(key: &str) -> String {
    return key
        .chars()
        .map(|c| return c.to_ascii_lowercase())
        .filter(|c| return is_key_char(*c))
        .collect();
}

/// Skip one tag or comment. `after_open` starts right after its `<`; the
/// returned slice starts right after its end. Unterminated markup swallows
/// the rest of the input.
fn skip_markup(after_open: &str) -> &str {
    if let Some(comment) = after_open.strip_prefix("!--") {
        return comment
            .find("-->")
            .and_then(|end| return comment.get(end.saturating_add(3)..))
            .unwrap_or_default();
    }

    let mut quote: Option<char> = None;
    for (idx, ch) in after_open.char_indices() {
        match (quote, ch) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {},
            (None, '"' | '\'') => quote = Some(ch),
            (None, '>') => return after_open.get(idx.saturating_add(1)..).unwrap_or_default(),
            (None, _) => {},
        }
    }
    return "";
}

/// Remove markup tags and comments from text.
///
/// A `<` followed by whitespace is ordinary text, as is a `>` with no
/// opening bracket, so labels like `a < b` or `WP_Query->have_posts()`
/// pass through untouched.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        out.push_str(rest.get(..open).unwrap_or_default());
        let after = rest.get(open.saturating_add(1)..).unwrap_or_default();
        if after.starts_with(char::is_whitespace) {
            out.push('<');
            rest = after;
            continue;
        }
        rest = skip_markup(after);
    }

    out.push_str(rest);
    return out;
}
