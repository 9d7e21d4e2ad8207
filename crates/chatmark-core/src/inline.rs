//! Inline tokenizer: text runs into trees of formatting spans.
//!
//! Single left-to-right scan, memchr-accelerated jumps to the next special
//! byte, no backtracking. Per position the priority is code span > bold >
//! italic > link; whatever matches first at the earliest position wins, and
//! anything unmatched (dangling or malformed delimiters included) passes
//! through as literal text. Bold, italic and link text are re-tokenized
//! recursively; code span content never is.

use std::borrow::Cow;

use memchr::{memchr, memchr3};

use crate::ast::{Bold, Code, Features, Inline, Italic, Link, Text};
use crate::span::Span;

/// Tokenize one run of plain text into inline nodes.
///
/// `base_offset` is the byte offset of `text` within the original input,
/// used to keep node spans in input space across recursion.
#[inline]
pub fn tokenize<'a>(text: &'a str, base_offset: u32, features: Features) -> Vec<Inline<'a>> {
    if text.is_empty() {
        return Vec::new();
    }

    InlineScanner::new(text, base_offset, features).scan()
}

struct InlineScanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    base_offset: u32,
    features: Features,
}

impl<'a> InlineScanner<'a> {
    #[inline]
    fn new(text: &'a str, base_offset: u32, features: Features) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            base_offset,
            features,
        }
    }

    fn scan(&mut self) -> Vec<Inline<'a>> {
        let mut inlines = Vec::with_capacity(8);
        let mut text_start = 0;

        while self.pos < self.bytes.len() {
            let next_special = self.find_next_special();
            if next_special >= self.bytes.len() {
                break;
            }

            self.pos = next_special;
            let parsed = match self.bytes[self.pos] {
                b'`' => self.try_code(&mut inlines, &mut text_start),
                b'*' => {
                    if self.pos + 1 < self.bytes.len() && self.bytes[self.pos + 1] == b'*' {
                        self.try_bold(&mut inlines, &mut text_start)
                    } else {
                        self.try_italic(b'*', &mut inlines, &mut text_start)
                    }
                }
                b'_' => self.try_italic(b'_', &mut inlines, &mut text_start),
                b'[' if self.features.links => self.try_link(&mut inlines, &mut text_start),
                _ => false,
            };

            if !parsed {
                self.pos += 1;
            }
        }

        if text_start < self.bytes.len() {
            inlines.push(self.text_node(text_start, self.bytes.len()));
        }

        inlines
    }

    /// Jump to the next byte that could open an inline construct.
    #[inline(always)]
    fn find_next_special(&self) -> usize {
        let remaining = &self.bytes[self.pos..];

        let common = memchr3(b'`', b'*', b'[', remaining);
        let underscore = memchr(b'_', remaining);

        match (common, underscore) {
            (Some(a), Some(b)) => self.pos + a.min(b),
            (Some(a), None) => self.pos + a,
            (None, Some(b)) => self.pos + b,
            (None, None) => self.bytes.len(),
        }
    }

    #[inline(always)]
    fn text_node(&self, start: usize, end: usize) -> Inline<'a> {
        Inline::Text(Text {
            content: Cow::Borrowed(&self.text[start..end]),
            span: Span::new(
                self.base_offset + start as u32,
                self.base_offset + end as u32,
            ),
        })
    }

    /// Emit any pending literal text before a matched construct.
    #[inline(always)]
    fn flush_text(&self, inlines: &mut Vec<Inline<'a>>, text_start: &mut usize) {
        if *text_start < self.pos {
            inlines.push(self.text_node(*text_start, self.pos));
        }
        *text_start = self.pos;
    }

    #[inline]
    fn try_code(&mut self, inlines: &mut Vec<Inline<'a>>, text_start: &mut usize) -> bool {
        let start = self.pos;

        match memchr(b'`', &self.bytes[start + 1..]) {
            // Content must be non-empty; `` stays literal.
            Some(offset) if offset > 0 => {
                let close = start + 1 + offset;

                self.flush_text(inlines, text_start);
                inlines.push(Inline::Code(Code {
                    content: Cow::Borrowed(&self.text[start + 1..close]),
                    span: Span::new(
                        self.base_offset + start as u32,
                        self.base_offset + close as u32 + 1,
                    ),
                }));

                self.pos = close + 1;
                *text_start = self.pos;
                true
            }
            _ => false,
        }
    }

    /// `**...**`: closes at the next `**`. Single asterisks are allowed in
    /// the content, which is what lets `**bold *italic* end**` nest.
    #[inline]
    fn try_bold(&mut self, inlines: &mut Vec<Inline<'a>>, text_start: &mut usize) -> bool {
        let start = self.pos;
        let content_start = start + 2;

        if content_start >= self.bytes.len() {
            return false;
        }

        let mut search = content_start;
        while let Some(offset) = memchr(b'*', &self.bytes[search..]) {
            let abs = search + offset;

            if abs + 1 < self.bytes.len() && self.bytes[abs + 1] == b'*' && abs > content_start {
                let content = &self.text[content_start..abs];

                self.flush_text(inlines, text_start);
                let children =
                    InlineScanner::new(content, self.base_offset + content_start as u32, self.features)
                        .scan();
                inlines.push(Inline::Bold(Bold {
                    children,
                    span: Span::new(
                        self.base_offset + start as u32,
                        self.base_offset + abs as u32 + 2,
                    ),
                }));

                self.pos = abs + 2;
                *text_start = self.pos;
                return true;
            }
            search = abs + 1;
        }

        false
    }

    /// `*...*` or `_..._`: content excludes the delimiter character, so the
    /// first closing delimiter ends the span. A run like `*a**b*` therefore
    /// becomes two sibling italics, never nested spans.
    #[inline]
    fn try_italic(
        &mut self,
        delim: u8,
        inlines: &mut Vec<Inline<'a>>,
        text_start: &mut usize,
    ) -> bool {
        let start = self.pos;
        let content_start = start + 1;

        if content_start >= self.bytes.len() {
            return false;
        }

        match memchr(delim, &self.bytes[content_start..]) {
            Some(offset) if offset > 0 => {
                let close = content_start + offset;
                let content = &self.text[content_start..close];

                self.flush_text(inlines, text_start);
                let children =
                    InlineScanner::new(content, self.base_offset + content_start as u32, self.features)
                        .scan();
                inlines.push(Inline::Italic(Italic {
                    children,
                    span: Span::new(
                        self.base_offset + start as u32,
                        self.base_offset + close as u32 + 1,
                    ),
                }));

                self.pos = close + 1;
                *text_start = self.pos;
                true
            }
            _ => false,
        }
    }

    /// `[text](url)`: text excludes `]`, url excludes `)`, both non-empty.
    /// The display text is re-tokenized; the url is taken verbatim.
    #[inline]
    fn try_link(&mut self, inlines: &mut Vec<Inline<'a>>, text_start: &mut usize) -> bool {
        let start = self.pos;

        let close_bracket = match memchr(b']', &self.bytes[start + 1..]) {
            Some(offset) if offset > 0 => start + 1 + offset,
            _ => return false,
        };

        if close_bracket + 1 >= self.bytes.len() || self.bytes[close_bracket + 1] != b'(' {
            return false;
        }

        let url_start = close_bracket + 2;
        let close_paren = match memchr(b')', &self.bytes[url_start..]) {
            Some(offset) if offset > 0 => url_start + offset,
            _ => return false,
        };

        let label = &self.text[start + 1..close_bracket];
        let url = &self.text[url_start..close_paren];

        self.flush_text(inlines, text_start);
        let text =
            InlineScanner::new(label, self.base_offset + start as u32 + 1, self.features).scan();
        inlines.push(Inline::Link(Link {
            text,
            url: Cow::Borrowed(url),
            span: Span::new(
                self.base_offset + start as u32,
                self.base_offset + close_paren as u32 + 1,
            ),
        }));

        self.pos = close_paren + 1;
        *text_start = self.pos;
        true
    }
}
