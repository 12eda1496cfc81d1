//! Markup serialization.
//!
//! Serializes subtrees to their textual form: `<tag k="v">children</tag>`
//! for elements, the stored value for text nodes. Text values were escaped
//! when they entered the tree, so they are written through verbatim here;
//! attribute values are stored raw and escaped on output.

use std::borrow::Cow;

use crate::tree::ElementRef;

// =============================================================================
// Serialization
// =============================================================================

/// Serialize the subtree rooted at `node`.
pub fn to_markup(node: ElementRef<'_>) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: ElementRef<'_>, out: &mut String) {
    if node.is_text() {
        // Stored pre-escaped; do not escape again.
        out.push_str(node.value());
        return;
    }
    out.push('<');
    out.push_str(node.tag());
    for (key, value) in node.attrs() {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_entities(value));
        out.push('"');
    }
    out.push('>');
    for child in node.children() {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(node.tag());
    out.push('>');
}

// =============================================================================
// Escaping
// =============================================================================

/// Entity-escape the characters that are significant in markup.
///
/// Borrows through unchanged input, so the common no-escape case does not
/// allocate.
pub fn escape_entities(s: &str) -> Cow<'_, str> {
    if !s
        .bytes()
        .any(|b| matches!(b, b'&' | b'<' | b'>' | b'\'' | b'"'))
    {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;

    #[test]
    fn test_escape_entities_table() {
        assert_eq!(escape_entities("a < b"), "a &lt; b");
        assert_eq!(escape_entities("a & b"), "a &amp; b");
        assert_eq!(escape_entities("a > b"), "a &gt; b");
        assert_eq!(escape_entities("\"quoted\""), "&#34;quoted&#34;");
        assert_eq!(escape_entities("it's"), "it&#39;s");
    }

    #[test]
    fn test_escape_entities_borrows_clean_input() {
        assert!(matches!(escape_entities("plain text"), Cow::Borrowed(_)));
        assert!(matches!(escape_entities("a < b"), Cow::Owned(_)));
    }

    #[test]
    fn test_element_markup() {
        let mut tree = Tree::new();
        let div = tree.create_element("div");
        tree.set_attribute(div, "class", "box");
        let p = tree.create_element("p");
        tree.append_child(div, p);
        tree.set_text(p, "hello");

        assert_eq!(
            tree.to_markup(div),
            "<div class=\"box\"><p>hello</p></div>"
        );
    }

    #[test]
    fn test_text_node_markup_is_bare_value() {
        let mut tree = Tree::new();
        let text = tree.create_text_node("hi there");
        assert_eq!(tree.to_markup(text), "hi there");
    }

    #[test]
    fn test_attr_values_escaped_on_output() {
        let mut tree = Tree::new();
        let a = tree.create_element("a");
        tree.set_attribute(a, "title", "tom & \"jerry\"");

        assert_eq!(
            tree.to_markup(a),
            "<a title=\"tom &amp; &#34;jerry&#34;\"></a>"
        );
        // Stored raw: only the serializer escapes.
        assert_eq!(tree.attribute(a, "title"), Ok("tom & \"jerry\""));
    }

    #[test]
    fn test_text_escaped_once_at_storage() {
        let mut tree = Tree::new();
        let p = tree.create_element("p");
        tree.set_text(p, "a < b");

        // Escaped in storage, written through verbatim on render.
        assert_eq!(tree.to_markup(p), "<p>a &lt; b</p>");
    }

    #[test]
    fn test_markup_of_dead_id_is_empty() {
        let tree = Tree::new();
        assert_eq!(tree.to_markup(crate::id::NodeId::from_raw(99)), "");
    }
}
