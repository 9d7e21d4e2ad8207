//! Line-based lexer shared by the fence splitter and the block parser.
//!
//! Chat text is classified strictly line by line, so the lexer's only job
//! is to hand out zero-copy [`Line`]s with their source spans. Newline
//! scanning goes through `memchr` (SIMD on supported platforms) and CRLF
//! endings are tolerated: the `\r` is excluded from the line text.

use crate::span::Span;
use memchr::memchr;

/// A single line from the input with its source span.
///
/// The span covers the line text only, never the trailing newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The line text (without trailing `\n` or `\r\n`).
    pub text: &'a str,
    /// Byte span in the original input.
    pub span: Span,
}

impl<'a> Line<'a> {
    /// Check if this line contains only whitespace.
    #[inline(always)]
    pub fn is_blank(&self) -> bool {
        self.text.bytes().all(|b| b == b' ' || b == b'\t')
    }

    /// The line text with leading/trailing whitespace removed.
    ///
    /// Block classification always happens on the trimmed text; the
    /// returned slice still borrows from the original input.
    #[inline(always)]
    pub fn trimmed(&self) -> &'a str {
        self.text.trim()
    }

    /// Byte offset of the first non-whitespace character, in input space.
    #[inline(always)]
    pub fn trimmed_start(&self) -> u32 {
        self.span.start + (self.text.len() - self.text.trim_start().len()) as u32
    }
}

/// Peek/consume line reader over the raw input.
pub struct Lexer<'a> {
    /// The complete input text.
    input: &'a str,
    /// Input as bytes for efficient scanning.
    bytes: &'a [u8],
    /// Current byte offset.
    offset: usize,
    /// Peeked line (for lookahead).
    peeked: Option<Line<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            offset: 0,
            peeked: None,
        }
    }

    /// Byte offset of the next unread line's start.
    #[inline(always)]
    pub fn offset(&self) -> u32 {
        match self.peeked {
            Some(line) => line.span.start,
            None => self.offset as u32,
        }
    }

    /// Check if all input has been consumed.
    #[inline(always)]
    pub fn is_eof(&self) -> bool {
        self.peeked.is_none() && self.offset >= self.bytes.len()
    }

    /// Peek at the next line without consuming it.
    #[inline]
    pub fn peek_line(&mut self) -> Option<&Line<'a>> {
        if self.peeked.is_none() {
            self.peeked = self.read_line();
        }
        self.peeked.as_ref()
    }

    /// Consume and return the next line.
    #[inline]
    pub fn next_line(&mut self) -> Option<Line<'a>> {
        if let Some(line) = self.peeked.take() {
            return Some(line);
        }
        self.read_line()
    }

    #[inline(always)]
    fn read_line(&mut self) -> Option<Line<'a>> {
        if self.offset >= self.bytes.len() {
            return None;
        }

        let start = self.offset;

        let end = match memchr(b'\n', &self.bytes[start..]) {
            Some(pos) => start + pos,
            None => self.bytes.len(),
        };

        // CRLF: drop the CR from the line text.
        let text_end = if end > start && self.bytes[end - 1] == b'\r' {
            end - 1
        } else {
            end
        };

        // Advance past the newline.
        self.offset = if end < self.bytes.len() { end + 1 } else { end };

        Some(Line {
            // SAFETY: `start` and `text_end` come from memchr hits on `\n`
            // and `\r`, both single-byte ASCII, or from the input bounds, so
            // they always land on UTF-8 char boundaries.
            text: unsafe { self.input.get_unchecked(start..text_end) },
            span: Span::new(start as u32, text_end as u32),
        })
    }
}
