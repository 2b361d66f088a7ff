//! Code snippet rendering for dv.
//!
//! This crate turns source snippets into highlighted, copyable code blocks:
//!
//! - [`Tokenizer`]: maps `(text, language)` to styled [`Line`]s, with
//!   [`SyntectTokenizer`] for themed highlighting and [`PlainTokenizer`] as
//!   the unstyled fallback
//! - [`CopyController`]: the "Copy"/"Copied" state machine behind a code
//!   block's copy button, writing through a [`Clipboard`]
//! - [`CodeBlock`]: composes both into a [`CodeBlockView`] with optional line
//!   numbers and highlighted lines, serialized as an HTML fragment
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use dv_renderer::{CodeBlock, CodeSnippet, MemoryClipboard, PlainTokenizer};
//!
//! let snippet = CodeSnippet::new("npm install -g nestify", "bash").with_title("Install");
//! let block = CodeBlock::new(snippet, Arc::new(MemoryClipboard::new()));
//!
//! let mut html = String::new();
//! block.render(&PlainTokenizer, &mut html);
//! assert!(html.contains("npm install -g nestify"));
//! ```

mod code_block;
mod copy;
mod html;
mod language;
mod tokenizer;

pub use code_block::{
    CodeBlock, CodeBlockView, CodeBody, CodeRow, CodeSnippet, parse_line_spec,
};
pub use copy::{
    Clipboard, ClipboardError, CopyController, CopyPhase, DEFAULT_RESET_AFTER, MemoryClipboard,
    NoClipboard,
};
pub use html::{escape_html, write_icon};
pub use language::Language;
pub use tokenizer::{
    HighlightError, Line, PlainTokenizer, SyntectTokenizer, Token, TokenStyle, Tokenizer,
};
