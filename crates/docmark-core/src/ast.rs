//! Parse tree for a rendered doc comment.
//!
//! The tree is owned top-down: every node owns its children and nothing
//! points back up. It is built once per comment by [`crate::parser`] and
//! consumed once by [`crate::html`].
//!
//! - **Zero-copy**: payloads borrow from the normalized text through
//!   `Cow<'a, str>`. Only re-indented preformatted blocks own their data.
//! - **Positioned**: every node keeps the byte offset of the token it came
//!   from.
//!
//! Structure:
//!
//! - `Root` holds only `Paragraph` and `Preformatted` nodes.
//! - `Paragraph`, `Emphasis` and `Strong` hold inline nodes.
//! - `Preformatted`, `Text`, `Code` and `Anchor` are leaves.

use std::fmt;

/// Borrowed or owned string type for zero-copy parsing.
pub type CowStr<'a> = std::borrow::Cow<'a, str>;

/// Kinds of parse tree nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The whole comment.
    Root,
    /// Block of prose.
    Paragraph,
    /// Indented block rendered verbatim.
    Preformatted,
    /// Literal text.
    Text,
    /// `*emphasis*`
    Emphasis,
    /// `**strong**`
    Strong,
    /// `` `code` ``, backticks stripped.
    Code,
    /// Bare URL or named link.
    Anchor,
}

impl NodeKind {
    /// Whether nodes of this kind are block level.
    #[inline]
    pub fn is_block(self) -> bool {
        matches!(self, NodeKind::Paragraph | NodeKind::Preformatted)
    }

    /// Whether nodes of this kind never have children.
    #[inline]
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            NodeKind::Preformatted | NodeKind::Text | NodeKind::Code | NodeKind::Anchor
        )
    }

    /// The marker characters that open and close this kind of span.
    #[inline]
    pub fn marker(self) -> &'static str {
        match self {
            NodeKind::Emphasis => "*",
            NodeKind::Strong => "**",
            _ => "",
        }
    }
}

/// A node of the parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<'a> {
    pub kind: NodeKind,
    /// Byte offset of the token the node came from.
    pub pos: u32,
    /// Literal payload of `Text`, `Code` and `Preformatted`; display text of `Anchor`.
    pub data: CowStr<'a>,
    /// Link target, only set on `Anchor`.
    pub href: CowStr<'a>,
    pub children: Vec<Node<'a>>,
}

impl<'a> Node<'a> {
    #[inline]
    fn leaf(kind: NodeKind, pos: u32, data: impl Into<CowStr<'a>>) -> Self {
        Self {
            kind,
            pos,
            data: data.into(),
            href: CowStr::Borrowed(""),
            children: Vec::new(),
        }
    }

    #[inline]
    fn branch(kind: NodeKind, pos: u32, children: Vec<Node<'a>>) -> Self {
        Self {
            kind,
            pos,
            data: CowStr::Borrowed(""),
            href: CowStr::Borrowed(""),
            children,
        }
    }

    pub fn root(children: Vec<Node<'a>>) -> Self {
        Self::branch(NodeKind::Root, 0, children)
    }

    pub fn paragraph(pos: u32, children: Vec<Node<'a>>) -> Self {
        Self::branch(NodeKind::Paragraph, pos, children)
    }

    pub fn preformatted(pos: u32, data: impl Into<CowStr<'a>>) -> Self {
        Self::leaf(NodeKind::Preformatted, pos, data)
    }

    pub fn text(pos: u32, data: impl Into<CowStr<'a>>) -> Self {
        Self::leaf(NodeKind::Text, pos, data)
    }

    pub fn emphasis(pos: u32, children: Vec<Node<'a>>) -> Self {
        Self::branch(NodeKind::Emphasis, pos, children)
    }

    pub fn strong(pos: u32, children: Vec<Node<'a>>) -> Self {
        Self::branch(NodeKind::Strong, pos, children)
    }

    pub fn code(pos: u32, data: impl Into<CowStr<'a>>) -> Self {
        Self::leaf(NodeKind::Code, pos, data)
    }

    pub fn anchor(pos: u32, data: impl Into<CowStr<'a>>, href: impl Into<CowStr<'a>>) -> Self {
        Self {
            href: href.into(),
            ..Self::leaf(NodeKind::Anchor, pos, data)
        }
    }

    /// Concatenated literal text of this subtree, markup removed.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.data);
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Convert into a tree that owns all of its data.
    pub fn into_owned(self) -> Node<'static> {
        Node {
            kind: self.kind,
            pos: self.pos,
            data: CowStr::Owned(self.data.into_owned()),
            href: CowStr::Owned(self.href.into_owned()),
            children: self.children.into_iter().map(Node::into_owned).collect(),
        }
    }
}

/// Compact single-line form used in test failure output, e.g.
/// `Paragraph@0[Text@0"foo ", Emphasis@4[Text@5"bar"]]`.
impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}", self.kind, self.pos)?;
        if !self.data.is_empty() {
            write!(f, "{:?}", self.data)?;
        }
        if !self.href.is_empty() {
            write!(f, "->{:?}", self.href)?;
        }
        if !self.children.is_empty() {
            f.write_str("[")?;
            for (i, child) in self.children.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{child}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_classify() {
        assert!(NodeKind::Paragraph.is_block());
        assert!(!NodeKind::Strong.is_block());
        assert!(NodeKind::Anchor.is_leaf());
        assert!(!NodeKind::Emphasis.is_leaf());
        assert_eq!(NodeKind::Strong.marker(), "**");
        assert_eq!(NodeKind::Code.marker(), "");
    }

    #[test]
    fn text_content_flattens_markup() {
        let para = Node::paragraph(
            0,
            vec![
                Node::text(0, "foo "),
                Node::strong(4, vec![Node::text(6, "bar")]),
                Node::anchor(11, "site", "http://x.io"),
            ],
        );
        assert_eq!(para.text_content(), "foo barsite");
    }

    #[test]
    fn display_is_compact() {
        let para = Node::paragraph(0, vec![Node::emphasis(4, vec![Node::text(5, "bar")])]);
        assert_eq!(para.to_string(), r#"Paragraph@0[Emphasis@4[Text@5"bar"]]"#);
        let link = Node::anchor(2, "x", "http://x.io");
        assert_eq!(link.to_string(), r#"Anchor@2"x"->"http://x.io""#);
    }

    #[test]
    fn into_owned_keeps_structure() {
        let input = String::from("hello");
        let tree = Node::root(vec![Node::paragraph(0, vec![Node::text(0, input.as_str())])]);
        let owned = tree.clone().into_owned();
        drop(input);
        assert_eq!(owned.children[0].children[0].data, "hello");
        assert_eq!(owned.kind, NodeKind::Root);
    }
}
