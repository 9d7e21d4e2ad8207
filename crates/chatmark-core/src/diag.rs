//! Non-fatal parse diagnostics.
//!
//! The engine is total: every input string produces a [`Document`], and no
//! edge case raises an error. Situations where the deterministic recovery
//! policy kicked in are still worth surfacing, so the parser records them
//! as diagnostics that callers can inspect via
//! [`Parser::parse_with_diagnostics`].
//!
//! [`Document`]: crate::ast::Document
//! [`Parser::parse_with_diagnostics`]: crate::parser::Parser::parse_with_diagnostics

use crate::span::Span;
use std::fmt;

/// Categories of recovered conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A code fence was opened but never closed; its content was taken to
    /// extend to the end of the input.
    UnterminatedFence,
    /// A pipe line was buffered as a table row but no separator line
    /// followed; the line was emitted as a paragraph instead.
    LooseTableLine,
}

/// A recovered condition with its source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostic {
    /// What happened.
    pub kind: DiagnosticKind,
    /// Where it happened.
    pub span: Span,
}

impl Diagnostic {
    /// A fence with no closing delimiter, spanning the whole region.
    pub fn unterminated_fence(span: Span) -> Self {
        Self {
            kind: DiagnosticKind::UnterminatedFence,
            span,
        }
    }

    /// A buffered table line that fell back to a paragraph.
    pub fn loose_table_line(span: Span) -> Self {
        Self {
            kind: DiagnosticKind::LooseTableLine,
            span,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::UnterminatedFence => {
                write!(f, "unterminated code fence")?;
            }
            DiagnosticKind::LooseTableLine => {
                write!(f, "table line without separator, kept as paragraph")?;
            }
        }
        write!(f, " at bytes {}..{}", self.span.start, self.span.end)
    }
}

/// Diagnostics collected during one parse call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a diagnostic.
    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Check if anything was recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over the diagnostics in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
