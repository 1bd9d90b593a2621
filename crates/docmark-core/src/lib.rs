//! # docmark core
//!
//! Renders the documentation comments attached to declarations as HTML
//! fragments for generated API pages.
//!
//! A comment is handed over as the ordered list of its raw comment strings
//! (`// ...` lines and `/* ... */` blocks) and goes through four stages:
//!
//! 1. [`comment::normalize`] strips delimiters and joins the text;
//! 2. [`lexer`] scans it into tokens;
//! 3. [`parser`] builds a tree of paragraphs, preformatted blocks and inline
//!    markup;
//! 4. [`html`] writes the tree out as escaped HTML.
//!
//! ## Quick Start
//!
//! ```rust
//! let comment = ["// Returns the *current* value.", "//", "//\tv := x.Get()"];
//! assert_eq!(
//!     docmark_core::render_to_html(&comment),
//!     "<p>Returns the <em>current</em> value.</p>\n<pre><code>v := x.Get()</code></pre>\n",
//! );
//!
//! let text = docmark_core::render_to_text(&["/* Plain\n   prose. */"]);
//! assert_eq!(text, "Plain\nprose.");
//! ```
//!
//! ## Markup
//!
//! - paragraphs are separated by blank lines;
//! - indented lines form a preformatted block;
//! - `*emphasis*`, `**strong**` and `` `code` ``;
//! - bare URLs (`https://example.com`) and named links
//!   (`[name](https://example.com)`).
//!
//! Malformed markup never fails: unmatched markers render as literal text.
//! Every call is independent, so comments can be rendered from many threads
//! at once.

pub mod ast;
pub mod comment;
pub mod error;
pub mod html;
pub mod lexer;
pub mod parser;
pub mod span;

pub use ast::{Node, NodeKind};
pub use comment::{normalize, split, try_split, SplitResult};
pub use error::{ParseError, ParseErrorKind, ParseErrors};
pub use lexer::{lex, Lexer, Token, TokenKind};
pub use parser::Parser;

use tracing::trace;

/// Render raw comment strings to an HTML fragment.
///
/// Returns an empty string for a comment without any text.
pub fn render_to_html<S: AsRef<str>>(comment: &[S]) -> String {
    let text = comment::normalize(comment);
    if text.is_empty() {
        return String::new();
    }

    let root = Parser::new().parse(lexer::lex(&text));
    let out = html::render(&root);
    trace!(
        lines = comment.len(),
        text_len = text.len(),
        blocks = root.children.len(),
        html_len = out.len(),
        "rendered comment"
    );
    out
}

/// Render raw comment strings to plain text, markup left as written.
#[inline]
pub fn render_to_text<S: AsRef<str>>(comment: &[S]) -> String {
    comment::normalize(comment)
}

/// Parse normalized comment text into a tree that owns its data.
///
/// Useful for tools that want to inspect the structure rather than the HTML.
pub fn to_tree<S: AsRef<str>>(comment: &[S]) -> Node<'static> {
    let text = comment::normalize(comment);
    parser::parse(&text).into_owned()
}
