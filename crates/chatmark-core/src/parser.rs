//! Block parser and document assembly.
//!
//! Plain-text segments are classified strictly line by line with a fixed
//! precedence: table row, table separator, table end, blank line, heading,
//! horizontal rule, blockquote, unordered item, ordered item, paragraph.
//! Multi-line constructs (tables, lists) accumulate in buffers local to the
//! call and are flushed when their continuation condition ends. Nothing
//! survives a call; the parser itself holds only the immutable feature set,
//! so one instance can serve any number of threads.

use std::borrow::Cow;

use crate::ast::{
    Block, Blockquote, CodeBlock, Document, Features, Heading, HeadingDecoration, List, ListItem,
    Paragraph, Table, TableCell, TableRow,
};
use crate::diag::{Diagnostic, Diagnostics};
use crate::fence::{self, Segment};
use crate::inline;
use crate::lexer::Line;
use crate::span::Span;

/// Parse `text` under the given feature set.
///
/// Total over all inputs: any string yields a [`Document`], repeated calls
/// yield structurally equal documents, and diagnostics are discarded. Use
/// [`Parser::parse_with_diagnostics`] to observe recovery decisions.
#[inline]
pub fn parse<'a>(text: &'a str, features: Features) -> Document<'a> {
    Parser::new(features).parse(text)
}

/// Result of a parse call, with the recovery diagnostics it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput<'a> {
    /// The parsed document (always complete; recovery never drops input).
    pub document: Document<'a>,
    /// Conditions where a deterministic fallback policy was applied.
    pub diagnostics: Diagnostics,
}

impl ParseOutput<'_> {
    /// Check if parsing completed without any recovery.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// The parsing engine for one feature configuration.
///
/// All per-call state (table and list buffers, output accumulator) lives on
/// the stack of [`Parser::parse`], so a `Parser` is freely shared across
/// threads.
#[derive(Debug, Clone, Copy)]
pub struct Parser {
    features: Features,
}

impl Parser {
    /// Create a parser with the given feature set.
    #[inline]
    pub fn new(features: Features) -> Self {
        Self { features }
    }

    /// The feature set this parser was configured with.
    #[inline]
    pub fn features(&self) -> Features {
        self.features
    }

    /// Parse the input into a document, discarding diagnostics.
    #[inline]
    pub fn parse<'a>(&self, input: &'a str) -> Document<'a> {
        self.parse_with_diagnostics(input).document
    }

    /// Parse the input, returning the document together with any recovery
    /// diagnostics (unterminated fences, loose table lines).
    pub fn parse_with_diagnostics<'a>(&self, input: &'a str) -> ParseOutput<'a> {
        let mut blocks = Vec::with_capacity(16);
        let mut diagnostics = Diagnostics::new();

        for segment in fence::split(input) {
            match segment {
                Segment::Fence(f) => {
                    if !f.terminated {
                        diagnostics.push(Diagnostic::unterminated_fence(f.span));
                    }
                    blocks.push(Block::CodeBlock(CodeBlock {
                        lang: Cow::Borrowed(f.lang),
                        content: Cow::Borrowed(f.content),
                        span: f.span,
                    }));
                }
                Segment::Text(lines) => {
                    self.parse_segment(&lines, &mut blocks, &mut diagnostics);
                }
            }
        }

        ParseOutput {
            document: Document {
                blocks,
                span: Span::new(0, input.len() as u32),
            },
            diagnostics,
        }
    }

    /// Parse one fence-free run of lines, appending blocks in order.
    fn parse_segment<'a>(
        &self,
        lines: &[Line<'a>],
        blocks: &mut Vec<Block<'a>>,
        diagnostics: &mut Diagnostics,
    ) {
        // No block from an earlier segment counts as "prior content" here:
        // spacers are suppressed at the start of every segment.
        let segment_base = blocks.len();

        let mut table: Vec<Line<'a>> = Vec::new();
        let mut list: Option<ListBuffer<'a>> = None;

        for line in lines {
            let trimmed = line.trimmed();

            if self.features.tables {
                let separator = is_table_separator(trimmed);

                // A pipe line that is not a separator starts or continues a
                // table; a separator only ever continues one. Gating the
                // separator on a non-empty buffer keeps a bare `---` free
                // to become a horizontal rule below.
                if trimmed.contains('|') && !separator {
                    self.flush_list(&mut list, blocks);
                    table.push(*line);
                    continue;
                }
                if separator && !table.is_empty() {
                    table.push(*line);
                    continue;
                }
            }

            // A buffered table ends at the first line without a pipe; flush
            // it before classifying that line normally.
            if !table.is_empty() && !trimmed.contains('|') {
                self.flush_table(&mut table, blocks, diagnostics);
            }

            if trimmed.is_empty() {
                self.flush_list(&mut list, blocks);
                if blocks.len() > segment_base {
                    blocks.push(Block::Spacer(line.span));
                }
                continue;
            }

            if let Some((level, content)) = heading_parts(trimmed, self.features.max_heading_level)
            {
                self.flush_list(&mut list, blocks);
                let offset = line.trimmed_start() + (trimmed.len() - content.len()) as u32;
                let decorated = self.features.heading_decoration
                    == HeadingDecoration::DiamondTopTwo
                    && level <= 2;
                blocks.push(Block::Heading(Heading {
                    level,
                    decorated,
                    content: inline::tokenize(content, offset, self.features),
                    span: line.span,
                }));
                continue;
            }

            if is_horizontal_rule(trimmed) {
                self.flush_list(&mut list, blocks);
                blocks.push(Block::Rule(line.span));
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix('>') {
                self.flush_list(&mut list, blocks);
                let content = rest.trim_start();
                let offset = line.trimmed_start() + (trimmed.len() - content.len()) as u32;
                blocks.push(Block::Blockquote(Blockquote {
                    content: inline::tokenize(content, offset, self.features),
                    span: line.span,
                }));
                continue;
            }

            if let Some(content) = unordered_item(trimmed) {
                let offset = line.trimmed_start() + (trimmed.len() - content.len()) as u32;
                self.push_item(&mut list, blocks, false, None, content, offset, line.span);
                continue;
            }

            if let Some((label, content)) = ordered_item(trimmed) {
                let offset = line.trimmed_start() + (trimmed.len() - content.len()) as u32;
                self.push_item(
                    &mut list,
                    blocks,
                    true,
                    Some(label),
                    content,
                    offset,
                    line.span,
                );
                continue;
            }

            self.flush_list(&mut list, blocks);
            blocks.push(Block::Paragraph(Paragraph {
                content: inline::tokenize(trimmed, line.trimmed_start(), self.features),
                span: line.span,
            }));
        }

        self.flush_table(&mut table, blocks, diagnostics);
        self.flush_list(&mut list, blocks);
    }

    /// Append a list item, flushing first if the list kind switches. The
    /// bullet character alone never starts a new list.
    #[allow(clippy::too_many_arguments)]
    fn push_item<'a>(
        &self,
        list: &mut Option<ListBuffer<'a>>,
        blocks: &mut Vec<Block<'a>>,
        ordered: bool,
        label: Option<&'a str>,
        content: &'a str,
        offset: u32,
        span: Span,
    ) {
        match list {
            Some(buffer) if buffer.ordered == ordered => {}
            _ => {
                self.flush_list(list, blocks);
                *list = Some(ListBuffer {
                    ordered,
                    items: Vec::with_capacity(4),
                    span,
                });
            }
        }

        // Guaranteed non-None after the arm above.
        if let Some(buffer) = list {
            buffer.items.push(BufferedItem {
                label,
                content,
                offset,
                span,
            });
            buffer.span = buffer.span.merge(span);
        }
    }

    fn flush_list<'a>(&self, list: &mut Option<ListBuffer<'a>>, blocks: &mut Vec<Block<'a>>) {
        let Some(buffer) = list.take() else {
            return;
        };

        let items = buffer
            .items
            .into_iter()
            .map(|item| ListItem {
                label: item.label.map(Cow::Borrowed),
                content: inline::tokenize(item.content, item.offset, self.features),
                span: item.span,
            })
            .collect();

        blocks.push(Block::List(List {
            ordered: buffer.ordered,
            items,
            span: buffer.span,
        }));
    }

    /// Finalize the table buffer.
    ///
    /// With two or more buffered lines the first is the header, the second
    /// is consumed as the separator, and the rest are data rows. With fewer
    /// than two, each buffered line is emitted as a paragraph instead of
    /// being dropped, and a diagnostic records the fallback.
    fn flush_table<'a>(
        &self,
        table: &mut Vec<Line<'a>>,
        blocks: &mut Vec<Block<'a>>,
        diagnostics: &mut Diagnostics,
    ) {
        if table.is_empty() {
            return;
        }
        let buffered = std::mem::take(table);

        if buffered.len() < 2 {
            for line in buffered {
                diagnostics.push(Diagnostic::loose_table_line(line.span));
                blocks.push(Block::Paragraph(Paragraph {
                    content: inline::tokenize(line.trimmed(), line.trimmed_start(), self.features),
                    span: line.span,
                }));
            }
            return;
        }

        let header = self.split_cells(&buffered[0]);
        let rows = buffered[2..]
            .iter()
            .map(|line| TableRow {
                cells: self.split_cells(line),
                span: line.span,
            })
            .collect();
        let span = buffered[0].span.merge(buffered[buffered.len() - 1].span);

        blocks.push(Block::Table(Table { header, rows, span }));
    }

    /// Split one buffered line into cells: split on `|`, trim each piece,
    /// drop the empty ones. Rows are never padded to the header width.
    fn split_cells<'a>(&self, line: &Line<'a>) -> Vec<TableCell<'a>> {
        let mut cells = Vec::with_capacity(8);
        let mut offset = line.trimmed_start();

        for part in line.trimmed().split('|') {
            let cell = part.trim();
            if !cell.is_empty() {
                let cell_offset = offset + (part.len() - part.trim_start().len()) as u32;
                cells.push(TableCell {
                    content: inline::tokenize(cell, cell_offset, self.features),
                    span: Span::new(cell_offset, cell_offset + cell.len() as u32),
                });
            }
            offset += part.len() as u32 + 1;
        }

        cells
    }
}

/// List lines buffered until the run ends.
struct ListBuffer<'a> {
    ordered: bool,
    items: Vec<BufferedItem<'a>>,
    span: Span,
}

/// One buffered list line; inline tokenization is deferred to the flush.
struct BufferedItem<'a> {
    label: Option<&'a str>,
    content: &'a str,
    offset: u32,
    span: Span,
}

/// Separator lines under a table header: optional pipes around a run of
/// dashes, colons, pipes and whitespace.
fn is_table_separator(trimmed: &str) -> bool {
    !trimmed.is_empty()
        && trimmed
            .bytes()
            .all(|b| b == b'-' || b == b':' || b == b'|' || b.is_ascii_whitespace())
}

/// `#{1,max}` followed by whitespace and content. More hashes than the
/// configured maximum, or a missing space, is not a heading.
fn heading_parts(trimmed: &str, max_level: u8) -> Option<(u8, &str)> {
    let level = trimmed.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > max_level as usize {
        return None;
    }

    let rest = &trimmed[level..];
    let content = rest.trim_start();
    if content.is_empty() || content.len() == rest.len() {
        return None;
    }

    Some((level as u8, content))
}

/// Three or more rule characters (`-`, `*`, `_`, freely mixed) and nothing
/// else.
fn is_horizontal_rule(trimmed: &str) -> bool {
    trimmed.len() >= 3 && trimmed.bytes().all(|b| matches!(b, b'-' | b'*' | b'_'))
}

/// `-`/`*`/`+` bullet followed by whitespace and content.
fn unordered_item(trimmed: &str) -> Option<&str> {
    let rest = trimmed.strip_prefix(['-', '*', '+'])?;
    let content = rest.trim_start();
    if content.is_empty() || content.len() == rest.len() {
        return None;
    }
    Some(content)
}

/// Digits, then `.` or `)`, then whitespace and content. The numeral is
/// returned verbatim to become the item label.
fn ordered_item(trimmed: &str) -> Option<(&str, &str)> {
    let digits = trimmed.len() - trimmed.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }

    let rest = trimmed[digits..].strip_prefix(['.', ')'])?;
    let content = rest.trim_start();
    if content.is_empty() || content.len() == rest.len() {
        return None;
    }

    Some((&trimmed[..digits], content))
}
