//! HTML output for the parse tree.
//!
//! Every literal payload is escaped on the way out, so text from the comment
//! can never produce markup of its own.

use crate::ast::{Node, NodeKind};

/// Render a tree to an HTML fragment.
pub fn render(root: &Node<'_>) -> String {
    let mut out = String::with_capacity(64);
    render_into(root, &mut out);
    out
}

/// Append the HTML for `node` and its subtree to `out`.
pub fn render_into(node: &Node<'_>, out: &mut String) {
    match node.kind {
        NodeKind::Root => {
            for block in &node.children {
                debug_assert!(block.kind.is_block(), "root holds only blocks");
                render_into(block, out);
            }
        }
        NodeKind::Paragraph => {
            out.push_str("<p>");
            render_children(node, out);
            out.push_str("</p>\n");
        }
        NodeKind::Preformatted => {
            out.push_str("<pre><code>");
            escape_into(&node.data, out);
            out.push_str("</code></pre>\n");
        }
        NodeKind::Text => escape_into(&node.data, out),
        NodeKind::Emphasis => {
            out.push_str("<em>");
            render_children(node, out);
            out.push_str("</em>");
        }
        NodeKind::Strong => {
            out.push_str("<strong>");
            render_children(node, out);
            out.push_str("</strong>");
        }
        NodeKind::Code => {
            out.push_str("<code>");
            escape_into(&node.data, out);
            out.push_str("</code>");
        }
        NodeKind::Anchor => {
            out.push_str("<a href=\"");
            escape_into(&node.href, out);
            out.push_str("\">");
            escape_into(&node.data, out);
            out.push_str("</a>");
        }
    }
}

#[inline]
fn render_children(node: &Node<'_>, out: &mut String) {
    for child in &node.children {
        render_into(child, out);
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(s, &mut out);
    out
}

fn escape_into(s: &str, out: &mut String) {
    let mut last = 0;
    for (i, b) in s.bytes().enumerate() {
        let entity = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        out.push_str(&s[last..i]);
        out.push_str(entity);
        last = i + 1;
    }
    out.push_str(&s[last..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#39;s");
        assert_eq!(escape_html("naïve"), "naïve");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn empty_root_renders_nothing() {
        assert_eq!(render(&Node::root(Vec::new())), "");
    }

    #[test]
    fn blocks_end_with_newline() {
        let root = Node::root(vec![
            Node::paragraph(0, vec![Node::text(0, "a")]),
            Node::preformatted(2, "if a < b {}"),
        ]);
        assert_eq!(
            render(&root),
            "<p>a</p>\n<pre><code>if a &lt; b {}</code></pre>\n"
        );
    }

    #[test]
    fn inline_nodes() {
        let root = Node::root(vec![Node::paragraph(
            0,
            vec![
                Node::strong(0, vec![Node::emphasis(2, vec![Node::text(3, "x")])]),
                Node::code(6, "<b>"),
                Node::anchor(11, "a \"q\"", "http://x.io/?a=1&b=2"),
            ],
        )]);
        assert_eq!(
            render(&root),
            "<p><strong><em>x</em></strong><code>&lt;b&gt;</code>\
             <a href=\"http://x.io/?a=1&amp;b=2\">a &quot;q&quot;</a></p>\n"
        );
    }

    #[test]
    fn render_into_appends() {
        let mut out = String::from("<div>");
        render_into(&Node::paragraph(0, vec![Node::text(0, "x")]), &mut out);
        assert_eq!(out, "<div><p>x</p>\n");
    }
}
