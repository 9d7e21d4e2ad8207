//! Fence splitting: the first pipeline stage.
//!
//! The raw input is cut into alternating plain-text and fenced-code
//! segments before any block classification happens, so that nothing inside
//! a fence is ever mistaken for markup. Fences are line-anchored: a line
//! whose trimmed text starts with three backticks opens one, and the next
//! such line closes it. Backticks appearing mid-line never open a fence.

use crate::lexer::{Lexer, Line};
use crate::span::Span;

/// One segment of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain text lines between fences, fed to the block parser.
    Text(Vec<Line<'a>>),
    /// A fenced code region, emitted literally as a code block.
    Fence(Fence<'a>),
}

/// A fenced code region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fence<'a> {
    /// Language tag: the opening fence line stripped of leading backticks
    /// and trimmed. May be empty.
    pub lang: &'a str,
    /// Verbatim content between the delimiters, excluding the newline
    /// before the closing fence.
    pub content: &'a str,
    /// Span from the opening delimiter through the last consumed line.
    pub span: Span,
    /// False when no closing delimiter was found; the content then extends
    /// to the end of the input.
    pub terminated: bool,
}

/// Split the raw input into alternating text and fence segments.
pub fn split(input: &str) -> Vec<Segment<'_>> {
    let mut lexer = Lexer::new(input);
    let mut segments = Vec::new();
    let mut text: Vec<Line> = Vec::new();

    while let Some(line) = lexer.next_line() {
        if line.trimmed().starts_with("```") {
            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            segments.push(Segment::Fence(read_fence(&mut lexer, line, input)));
        } else {
            text.push(line);
        }
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }

    segments
}

fn read_fence<'a>(lexer: &mut Lexer<'a>, open: Line<'a>, input: &'a str) -> Fence<'a> {
    let lang = open.trimmed().trim_start_matches('`').trim();

    // Content starts at the first line after the opening delimiter.
    let content_start = lexer.offset() as usize;
    let mut content_end = content_start;
    let mut end_span = open.span;
    let mut terminated = false;

    while let Some(line) = lexer.next_line() {
        if line.trimmed().starts_with("```") {
            terminated = true;
            end_span = line.span;
            break;
        }
        content_end = line.span.end as usize;
        end_span = line.span;
    }

    let content = if content_start < content_end {
        &input[content_start..content_end]
    } else {
        ""
    };

    Fence {
        lang,
        content,
        span: Span::new(open.span.start, end_span.end),
        terminated,
    }
}
