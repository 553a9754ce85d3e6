//! Shortcode tag location and attribute parsing.
use std::sync::LazyLock;

use regex::Regex;

use crate::types::{EntityKind, Occurrence};

/// One attribute in any of the accepted spellings: `k="v"`, `k='v'`, `k=v`,
/// or a positional `"v"`, `'v'`, `v`.
static ATTRIBUTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(
        r#"([\w-]+)\s*=\s*"([^"]*)"(?:\s|$)|([\w-]+)\s*=\s*'([^']*)'(?:\s|$)|([\w-]+)\s*=\s*([^\s'"]+)(?:\s|$)|"([^"]*)"(?:\s|$)|'([^']*)'(?:\s|$)|(\S+)(?:\s|$)"#,
    )
    .expect("valid attribute regex");
});

/// An opening tag. Group 1 is an optional escaping `[`, group 2 the tag
/// name, group 3 the attribute text. The name must end at whitespace, `/`
/// or `]` so `[functions]` is not a `[function]` tag.
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(r"\[(\[?)(class|function|hook|method)([\s/][^\]]*)?\]")
        .expect("valid shortcode regex");
});

/// Find every shortcode tag in `text`, in order of appearance.
///
/// Handles plain `[tag ...]`, self-closing `[tag ... /]`, enclosing
/// `[tag ...]content[/tag]` (the span swallows content and closer), and
/// doubled-bracket escapes `[[tag ...]]`.
///
/// # Panics
///
/// Panics if the hardcoded shortcode regex is invalid (compile-time invariant).
pub fn find_shortcodes(text: &str) -> Vec<Occurrence> {
    let mut found = Vec::new();
    if !text.contains('[') {
        return found;
    }

    let mut pos = 0_usize;
    let mut cursor = LineCursor::default();
    while let Some(caps) = TAG_PATTERN.captures_at(text, pos) {
        let Some(whole) = caps.get(0) else { break };
        let Some(kind) = caps.get(2).and_then(|m| return EntityKind::from_tag(m.as_str())) else {
            pos = whole.end();
            continue;
        };

        let open_bracket = caps.get(1).is_some_and(|m| return !m.is_empty());
        let raw_attributes = caps.get(3).map_or("", |m| return m.as_str());
        let (attribute_text, self_closing) = split_self_closing(raw_attributes);

        let mut end = whole.end();
        let after_open = text.get(end..).unwrap_or_default();
        let escaped = open_bracket && after_open.starts_with(']');

        if !self_closing && !escaped {
            end = end.saturating_add(enclosed_len(after_open, kind));
        }

        let close_bracket = text.get(end..).is_some_and(|rest| return rest.starts_with(']'));
        if close_bracket {
            end = end.saturating_add(1);
        }

        let start = whole.start();
        found.push(Occurrence {
            attributes: parse_attributes(attribute_text),
            close_bracket,
            kind,
            line: cursor.advance(text, start),
            open_bracket,
            span: start..end,
            text: text.get(start..end).unwrap_or_default().to_string(),
        });

        pos = end;
    }

    return found;
}

/// Length of `content[/tag]` following an opening tag, or 0 when no closer follows.
fn enclosed_len(after_open: &str, kind: EntityKind) -> usize {
    let closer = format!("[/{}]", kind.tag());
    return after_open
        .find(&closer)
        .map_or(0, |idx| return idx.saturating_add(closer.len()));
}

/// Running line count over a text scanned front to back, so each byte is
/// counted once however many tags the text holds.
#[derive(Default)]
struct LineCursor {
    /// Newlines seen before `offset`.
    newlines: usize,
    /// Byte offset counted up to.
    offset: usize,
}

impl LineCursor {
    /// One-based line number of byte offset `at`. Offsets must not decrease
    /// between calls.
    fn advance(&mut self, text: &str, at: usize) -> u32 {
        if let Some(between) = text.get(self.offset..at) {
            self.newlines = self.newlines.saturating_add(between.matches('\n').count());
            self.offset = at;
        }
        return u32::try_from(self.newlines).unwrap_or(u32::MAX).saturating_add(1);
    }
}

/// Parse free-form shortcode attribute markup into `(key, value)` pairs.
///
/// Keys are lowercased. Positional values are keyed by their position
/// among positional values (`"0"`, `"1"`, ...), so they never collide
/// with a named attribute. Non-breaking and zero-width spaces separate
/// attributes like ordinary whitespace.
///
/// # Panics
///
/// Panics if the hardcoded attribute regex is invalid (compile-time invariant).
pub fn parse_attributes(text: &str) -> Vec<(String, String)> {
    let normalized: String = text
        .chars()
        .map(|c| return if matches!(c, '\u{a0}' | '\u{200b}') { ' ' } else { c })
        .collect();

    let mut pairs = Vec::new();
    let mut positional = 0_usize;

    for caps in ATTRIBUTE_PATTERN.captures_iter(&normalized) {
        let named = [(1, 2), (3, 4), (5, 6)]
            .into_iter()
            .find_map(|(k, v)| return Some((caps.get(k)?, caps.get(v)?)));

        if let Some((key, value)) = named {
            pairs.push((key.as_str().to_lowercase(), value.as_str().to_string()));
            continue;
        }

        let Some(value) = [7, 8, 9].into_iter().find_map(|i| return caps.get(i)) else {
            continue;
        };
        pairs.push((positional.to_string(), value.as_str().to_string()));
        positional = positional.saturating_add(1);
    }

    return pairs;
}

/// Split a trailing self-closing `/` off the attribute text.
fn split_self_closing(raw: &str) -> (&str, bool) {
    let trimmed = raw.trim_end();
    return match trimmed.strip_suffix('/') {
        Some(body) => (body, true),
        None => (raw, false),
    };
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::indexing_slicing, reason = "tests")]
mod tests {
    use super::*;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        return list.iter().map(|(k, v)| return (k.to_string(), v.to_string())).collect();
    }

    #[test]
    fn parses_every_quoting_style() {
        let parsed = parse_attributes(r#" name="wp_list_pluck" label='wp_list_pluck()' class=WP_Query"#);
        assert_eq!(
            parsed,
            pairs(&[("name", "wp_list_pluck"), ("label", "wp_list_pluck()"), ("class", "WP_Query")])
        );
    }

    #[test]
    fn lowercases_keys_and_keeps_value_case() {
        let parsed = parse_attributes(r#" NAME="WP_Tax_Query""#);
        assert_eq!(parsed, pairs(&[("name", "WP_Tax_Query")]));
    }

    #[test]
    fn positional_values_get_index_keys() {
        let parsed = parse_attributes(r#" "quoted" bare name="x""#);
        assert_eq!(parsed, pairs(&[("0", "quoted"), ("1", "bare"), ("name", "x")]));
    }

    #[test]
    fn non_breaking_space_separates_attributes() {
        let parsed = parse_attributes(" name=\"a\"\u{a0}label=\"b\"");
        assert_eq!(parsed, pairs(&[("name", "a"), ("label", "b")]));
    }

    #[test]
    fn zero_width_space_separates_attributes() {
        let parsed = parse_attributes(" name=\"a\"\u{200b}label=\"b\"");
        assert_eq!(parsed, pairs(&[("name", "a"), ("label", "b")]));
    }

    #[test]
    fn line_numbers_follow_every_tag() {
        let text = "[hook name=\"a\"]\n\n[hook name=\"b\"] [hook name=\"c\"]\n[hook name=\"d\"]";
        let lines: Vec<u32> = find_shortcodes(text).iter().map(|o| return o.line).collect();
        assert_eq!(lines, vec![1, 3, 3, 4]);
    }

    #[test]
    fn finds_tags_in_order_with_lines() {
        let text = "See [function name=\"wp_list_pluck\"].\nAlso [hook name=\"init\"] and [class name=\"WP_Query\" /].";
        let found = find_shortcodes(text);

        assert_eq!(found.len(), 3);
        assert_eq!(found[0].kind, EntityKind::Function);
        assert_eq!(found[0].line, 1);
        assert_eq!(found[0].text, "[function name=\"wp_list_pluck\"]");
        assert_eq!(found[1].kind, EntityKind::Hook);
        assert_eq!(found[1].line, 2);
        assert_eq!(found[2].kind, EntityKind::Class);
        assert_eq!(found[2].attributes, pairs(&[("name", "WP_Query")]));
        assert_eq!(&text[found[2].span.clone()], "[class name=\"WP_Query\" /]");
    }

    #[test]
    fn requires_tag_boundary() {
        assert!(find_shortcodes("[functions] [function-x] [hooks name=\"a\"]").is_empty());
        assert_eq!(find_shortcodes("[function]").len(), 1);
    }

    #[test]
    fn enclosing_form_swallows_content_and_closer() {
        let text = "a [hook name=\"init\"]ignored[/hook] b";
        let found = find_shortcodes(text);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "[hook name=\"init\"]ignored[/hook]");
        assert!(!found[0].is_escaped());
    }

    #[test]
    fn doubled_brackets_escape_the_tag() {
        let found = find_shortcodes("write [[function name=\"x\"]] literally");

        assert_eq!(found.len(), 1);
        assert!(found[0].is_escaped());
        assert_eq!(found[0].literal(), "[function name=\"x\"]");
    }

    #[test]
    fn slash_inside_value_is_not_self_closing() {
        let found = find_shortcodes("[method name=\"a\" class=\"b\" label=\"a/b\"]");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].attributes[2], ("label".to_string(), "a/b".to_string()));
    }
}
