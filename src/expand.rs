//! Content expansion: replace every shortcode in a document with its link.
use crate::resolver::Resolver;
use crate::shortcode;

/// Expand all quick-reference shortcodes in `content`.
///
/// Each occurrence is resolved independently, in document order. Escaped
/// `[[tag]]` occurrences become the literal `[tag]`. A shortcode that does
/// not resolve disappears; a stray single escape bracket is kept next to
/// the output.
pub fn expand_shortcodes(content: &str, resolver: &Resolver<'_>) -> String {
    let occurrences = shortcode::find_shortcodes(content);
    if occurrences.is_empty() {
        return content.to_string();
    }

    let mut out = String::with_capacity(content.len());
    let mut cursor = 0_usize;

    for occurrence in &occurrences {
        out.push_str(content.get(cursor..occurrence.span.start).unwrap_or_default());
        cursor = occurrence.span.end;

        if occurrence.is_escaped() {
            out.push_str(occurrence.literal());
            continue;
        }

        let (request, dropped) = occurrence.request();
        if !dropped.is_empty() {
            tracing::debug!(
                kind = %occurrence.kind,
                line = occurrence.line,
                ?dropped,
                "ignoring unsupported shortcode attributes"
            );
        }

        if occurrence.open_bracket {
            out.push('[');
        }
        out.push_str(&resolver.resolve_request(&request));
        if occurrence.close_bracket {
            out.push(']');
        }
    }

    out.push_str(content.get(cursor..).unwrap_or_default());
    return out;
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;
    use crate::registry::PostTypeRegistry;
    use crate::resolver::HomeUrl;

    fn expand(content: &str) -> String {
        let registry = PostTypeRegistry::default();
        let home = HomeUrl::new("https://developer.wordpress.org");
        return expand_shortcodes(content, &Resolver::new(&registry, &home));
    }

    #[test]
    fn text_without_shortcodes_is_untouched() {
        let text = "Plain [link](http://x) text with [brackets] and [functions].";
        assert_eq!(expand(text), text);
    }

    #[test]
    fn expands_in_place_and_keeps_surrounding_text() {
        let out = expand("Use [function name=\"wp_list_pluck\" label=\"wp_list_pluck()\"] here.");
        assert_eq!(
            out,
            "Use <a href=\"https://developer.wordpress.org/reference/function/wp_list_pluck/\" class=\"quick-reference function\">wp_list_pluck()</a> here."
        );
    }

    #[test]
    fn broken_shortcodes_vanish() {
        assert_eq!(expand("a [method name=\"have_posts\"] b [hook] c"), "a  b  c");
    }

    #[test]
    fn escaped_shortcodes_render_literally() {
        assert_eq!(
            expand("Write [[class name=\"WP_Query\"]] to link."),
            "Write [class name=\"WP_Query\"] to link."
        );
    }

    #[test]
    fn enclosed_content_is_replaced() {
        let out = expand("[hook name=\"init\"]old text[/hook]!");
        assert_eq!(
            out,
            "<a href=\"https://developer.wordpress.org/reference/hook/init/\" class=\"quick-reference hook\">init</a>!"
        );
    }

    #[test]
    fn multiple_occurrences_resolve_independently() {
        let out = expand("[class name=\"WP_Query\"], [method name=\"get\" class=\"WP_Query\"], [hook name=\"\"]");
        assert!(out.starts_with("<a href=\"https://developer.wordpress.org/reference/class/wp_query/\""));
        assert!(out.contains("/reference/method/wp_query/get\" class=\"quick-reference method\">get</a>, "));
        assert!(out.ends_with(", "));
    }
}
