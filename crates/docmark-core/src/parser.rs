//! Token stream to parse tree.
//!
//! Blocks are split at `ParagraphStart`, `Indent` and `Eof` tokens. Inline
//! markup inside a paragraph is resolved with an explicit stack of pending
//! `*`/`**` openers:
//!
//! - a marker that matches an opener on the stack closes the nearest one;
//!   openers above it are flattened into it first;
//! - a marker with no match opens a new opener;
//! - at the end of the paragraph every remaining opener is flattened.
//!
//! Flattening an opener replaces it with a literal text node for its marker
//! followed by the children it collected, in their original order. Every
//! token sequence has a resolution, so parsing never fails.

use crate::ast::{CowStr, Node, NodeKind};
use crate::comment::reindent;
use crate::lexer::{lex, Token, TokenKind};

/// Parse normalized comment text into a tree.
#[inline]
pub fn parse(text: &str) -> Node<'_> {
    Parser::new().parse(lex(text))
}

/// An unresolved `*` or `**` marker.
#[derive(Debug)]
struct Opener<'a> {
    kind: NodeKind,
    pos: u32,
    children: Vec<Node<'a>>,
}

impl<'a> Opener<'a> {
    /// The literal marker followed by everything collected since it opened.
    fn flatten_into(self, target: &mut Vec<Node<'a>>) {
        target.push(Node::text(self.pos, self.kind.marker()));
        target.extend(self.children);
    }
}

/// Paragraph under construction.
#[derive(Debug)]
struct OpenParagraph<'a> {
    pos: u32,
    children: Vec<Node<'a>>,
    stack: Vec<Opener<'a>>,
}

impl<'a> OpenParagraph<'a> {
    fn new(pos: u32) -> Self {
        Self {
            pos,
            children: Vec::with_capacity(8),
            stack: Vec::new(),
        }
    }

    /// The list new inline nodes go to: the innermost opener, or the paragraph.
    #[inline]
    fn active(&mut self) -> &mut Vec<Node<'a>> {
        match self.stack.last_mut() {
            Some(opener) => &mut opener.children,
            None => &mut self.children,
        }
    }

    fn marker(&mut self, kind: NodeKind, pos: u32) {
        let Some(depth) = self.stack.iter().rposition(|o| o.kind == kind) else {
            self.stack.push(Opener {
                kind,
                pos,
                children: Vec::new(),
            });
            return;
        };

        self.flatten_above(depth);
        if let Some(opener) = self.stack.pop() {
            let node = match kind {
                NodeKind::Strong => Node::strong(opener.pos, opener.children),
                _ => Node::emphasis(opener.pos, opener.children),
            };
            self.active().push(node);
        }
    }

    /// Flatten every opener above `depth` into the one below it.
    fn flatten_above(&mut self, depth: usize) {
        while self.stack.len() > depth + 1 {
            if let Some(opener) = self.stack.pop() {
                opener.flatten_into(self.active());
            }
        }
    }

    fn finish(mut self) -> Option<Node<'a>> {
        while let Some(opener) = self.stack.pop() {
            opener.flatten_into(self.active());
        }
        if self.children.is_empty() {
            return None;
        }
        Some(Node::paragraph(self.pos, self.children))
    }
}

/// Builds the tree from a token stream.
///
/// A parser holds no state between calls; one instance can parse any number
/// of streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser;

impl Parser {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Parse a token stream into a `Root` node.
    ///
    /// Consumes tokens up to the first `Eof`; a stream that ends without one
    /// is treated as if it had one.
    pub fn parse<'a, I>(&self, tokens: I) -> Node<'a>
    where
        I: IntoIterator<Item = Token<'a>>,
    {
        let mut blocks = Vec::new();
        let mut para: Option<OpenParagraph<'a>> = None;

        for token in tokens {
            let pos = token.pos();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::ParagraphStart => {
                    blocks.extend(para.take().and_then(OpenParagraph::finish));
                    para = Some(OpenParagraph::new(pos));
                }
                TokenKind::Indent => {
                    blocks.extend(para.take().and_then(OpenParagraph::finish));
                    blocks.push(Node::preformatted(pos, preformatted_text(token.value)));
                }
                kind => {
                    let para = para.get_or_insert_with(|| OpenParagraph::new(pos));
                    match kind {
                        TokenKind::Star => para.marker(NodeKind::Emphasis, pos),
                        TokenKind::StarStar => para.marker(NodeKind::Strong, pos),
                        _ => para.active().push(inline_node(token)),
                    }
                }
            }
        }

        blocks.extend(para.and_then(OpenParagraph::finish));
        Node::root(blocks)
    }
}

/// Leaf node for a text, code or link token.
fn inline_node(token: Token<'_>) -> Node<'_> {
    let pos = token.pos();
    match token.kind {
        TokenKind::Raw => {
            let inner = token
                .value
                .strip_prefix('`')
                .and_then(|v| v.strip_suffix('`'))
                .unwrap_or(token.value);
            Node::code(pos, inner)
        }
        TokenKind::Url => Node::anchor(pos, token.value, token.value),
        TokenKind::NamedUrl => {
            let (name, url) = split_named_url(token.value);
            Node::anchor(pos, name, url)
        }
        _ => Node::text(pos, token.value),
    }
}

/// Split `[name](url)` into its name and url.
fn split_named_url(s: &str) -> (&str, &str) {
    let inner = s.strip_prefix('[').unwrap_or(s);
    match inner.split_once("](") {
        Some((name, rest)) => (name, rest.strip_suffix(')').unwrap_or(rest)),
        None => (inner, ""),
    }
}

/// Body of an indented run: trailing whitespace removed, common indent stripped.
#[inline]
fn preformatted_text(value: &str) -> CowStr<'_> {
    reindent(value.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para<'a>(pos: u32, children: Vec<Node<'a>>) -> Node<'a> {
        Node::paragraph(pos, children)
    }

    fn text(pos: u32, data: &str) -> Node<'_> {
        Node::text(pos, data)
    }

    fn assert_tree(input: &str, want: Node<'_>) {
        let got = parse(input);
        assert_eq!(got, want, "\n got: {got}\nwant: {want}");
    }

    #[test]
    fn plain_text() {
        assert_tree("hello world", Node::root(vec![para(0, vec![text(0, "hello world")])]));
    }

    #[test]
    fn bare_url() {
        assert_tree(
            "http://hello.world",
            Node::root(vec![para(
                0,
                vec![Node::anchor(0, "http://hello.world", "http://hello.world")],
            )]),
        );
    }

    #[test]
    fn emphasis() {
        assert_tree(
            "foo *bar* baz",
            Node::root(vec![para(
                0,
                vec![
                    text(0, "foo "),
                    Node::emphasis(4, vec![text(5, "bar")]),
                    text(9, " baz"),
                ],
            )]),
        );
    }

    #[test]
    fn strong() {
        assert_tree(
            "foo **bar** baz",
            Node::root(vec![para(
                0,
                vec![
                    text(0, "foo "),
                    Node::strong(4, vec![text(6, "bar")]),
                    text(11, " baz"),
                ],
            )]),
        );
    }

    #[test]
    fn trailing_marker_degrades() {
        assert_tree(
            "foo **",
            Node::root(vec![para(0, vec![text(0, "foo "), text(4, "**")])]),
        );
    }

    #[test]
    fn unclosed_marker_degrades_before_children() {
        assert_tree(
            "foo **bar baz",
            Node::root(vec![para(
                0,
                vec![text(0, "foo "), text(4, "**"), text(6, "bar baz")],
            )]),
        );
    }

    #[test]
    fn code_span() {
        assert_tree(
            "foo `bar` baz",
            Node::root(vec![para(
                0,
                vec![text(0, "foo "), Node::code(4, "bar"), text(9, " baz")],
            )]),
        );
    }

    #[test]
    fn url_in_text() {
        assert_tree(
            "foo http://bar.com baz",
            Node::root(vec![para(
                0,
                vec![
                    text(0, "foo "),
                    Node::anchor(4, "http://bar.com", "http://bar.com"),
                    text(18, " baz"),
                ],
            )]),
        );
    }

    #[test]
    fn named_url() {
        assert_tree(
            "foo [bar](http://bar.com) baz",
            Node::root(vec![para(
                0,
                vec![
                    text(0, "foo "),
                    Node::anchor(4, "bar", "http://bar.com"),
                    text(25, " baz"),
                ],
            )]),
        );
    }

    #[test]
    fn preformatted_between_paragraphs() {
        assert_tree(
            "foo\n\tbar\nbaz",
            Node::root(vec![
                para(0, vec![text(0, "foo")]),
                Node::preformatted(4, "bar"),
                para(9, vec![text(9, "baz")]),
            ]),
        );
    }

    #[test]
    fn preformatted_keeps_relative_indent() {
        let root = parse("x\n\t\tone\n\t\t\ttwo\n\n\t\tthree\n");
        assert_eq!(root.children[1].kind, NodeKind::Preformatted);
        assert_eq!(root.children[1].data, "one\n\ttwo\n\nthree");
    }

    #[test]
    fn nested_markers_resolve() {
        assert_tree(
            "foo **bar *baz http://www.xyz.com* click** quux",
            Node::root(vec![para(
                0,
                vec![
                    text(0, "foo "),
                    Node::strong(
                        4,
                        vec![
                            text(6, "bar "),
                            Node::emphasis(
                                10,
                                vec![
                                    text(11, "baz "),
                                    Node::anchor(15, "http://www.xyz.com", "http://www.xyz.com"),
                                ],
                            ),
                            text(34, " click"),
                        ],
                    ),
                    text(42, " quux"),
                ],
            )]),
        );
    }

    #[test]
    fn crossed_markers_flatten() {
        assert_tree(
            "foo **bar *baz http://www.xyz.com** click* quux",
            Node::root(vec![para(
                0,
                vec![
                    text(0, "foo "),
                    Node::strong(
                        4,
                        vec![
                            text(6, "bar "),
                            text(10, "*"),
                            text(11, "baz "),
                            Node::anchor(15, "http://www.xyz.com", "http://www.xyz.com"),
                        ],
                    ),
                    text(35, " click"),
                    text(41, "*"),
                    text(42, " quux"),
                ],
            )]),
        );
    }

    #[test]
    fn unmatched_openers_flatten_in_order() {
        assert_tree(
            "**a *b",
            Node::root(vec![para(
                0,
                vec![text(0, "**"), text(2, "a "), text(4, "*"), text(5, "b")],
            )]),
        );
    }

    #[test]
    fn closer_skips_over_inner_openers() {
        // The inner `**` is flattened into the emphasis it was opened in.
        assert_tree(
            "*a **b*",
            Node::root(vec![para(
                0,
                vec![Node::emphasis(
                    0,
                    vec![text(1, "a "), text(3, "**"), text(5, "b")],
                )],
            )]),
        );
    }

    #[test]
    fn markers_do_not_cross_paragraphs() {
        assert_tree(
            "*hello\n\nworld*",
            Node::root(vec![
                para(0, vec![text(0, "*"), text(1, "hello")]),
                para(8, vec![text(8, "world"), text(13, "*")]),
            ]),
        );
    }

    #[test]
    fn empty_paragraphs_are_dropped() {
        let tokens = vec![
            Token::new(TokenKind::ParagraphStart, "", 0),
            Token::new(TokenKind::ParagraphStart, "", 0),
            Token::new(TokenKind::Text, "x", 0),
            Token::new(TokenKind::Eof, "", 1),
        ];
        let root = Parser::new().parse(tokens);
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn tokens_without_paragraph_start_open_one() {
        let tokens = vec![Token::new(TokenKind::Text, "loose", 3)];
        let root = Parser::new().parse(tokens);
        assert_eq!(root, Node::root(vec![para(3, vec![text(3, "loose")])]));
    }

    #[test]
    fn tokens_after_eof_are_ignored() {
        let tokens = vec![
            Token::new(TokenKind::Eof, "", 0),
            Token::new(TokenKind::Text, "late", 0),
        ];
        assert!(Parser::new().parse(tokens).children.is_empty());
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse(""), Node::root(Vec::new()));
    }

    #[test]
    fn split_named_url_parts() {
        assert_eq!(split_named_url("[here](http://a.io)"), ("here", "http://a.io"));
        assert_eq!(split_named_url("[odd]"), ("odd]", ""));
    }
}
