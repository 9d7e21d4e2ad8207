//! # chatmark-core
//!
//! A small, deterministic parser for the Markdown subset that shows up in
//! chat messages and AI-generated analysis text. It turns a raw UTF-8
//! string into a renderer-agnostic document model: block nodes (headings,
//! paragraphs, code blocks, lists, tables, blockquotes, rules, spacers)
//! containing inline nodes (text, bold, italic, code spans, links).
//!
//! Which syntax is recognized is controlled by a [`Features`] value; the
//! two presets match the engine's real call sites:
//!
//! - [`Features::chat`]: tables, links, headings to level 6
//! - [`Features::analysis`]: no tables or links, headings capped at
//!   level 4, top-two heading levels decorated
//!
//! ## Quick Start
//!
//! ```rust
//! use chatmark_core::{parse, Features};
//!
//! let doc = parse("# Hi\n\nSome **bold** text.", Features::chat());
//! assert_eq!(doc.blocks.len(), 3); // heading, spacer, paragraph
//! ```
//!
//! ## Totality and diagnostics
//!
//! Parsing never fails and never panics: malformed input (unterminated
//! fences, dangling emphasis, stray table lines) degrades to deterministic
//! fallbacks. When a fallback fires, the parser records a diagnostic:
//!
//! ```rust
//! use chatmark_core::{Features, Parser};
//!
//! let parser = Parser::new(Features::analysis());
//! let out = parser.parse_with_diagnostics("```rust\nfn main() {}");
//!
//! assert_eq!(out.document.blocks.len(), 1); // the code block survives
//! assert_eq!(out.diagnostics.len(), 1);
//! ```
//!
//! ## Re-parsing
//!
//! The engine is pure and reentrant: all parse state lives on the stack of
//! a single call, so a [`Parser`] can be shared across threads, and the
//! typewriter-style callers that re-parse a growing prefix once per
//! revealed character always see the same output a fresh parse would give.

pub mod ast;
pub mod diag;
pub mod fence;
pub mod inline;
pub mod lexer;
pub mod parser;
pub mod span;

pub use ast::{Block, CowStr, Document, Features, HeadingDecoration, Inline};
pub use diag::{Diagnostic, DiagnosticKind, Diagnostics};
pub use parser::{parse, ParseOutput, Parser};
