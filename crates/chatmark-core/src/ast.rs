//! Document model produced by the parser.
//!
//! The model is renderer-agnostic: a [`Document`] is an ordered sequence of
//! [`Block`] nodes whose textual content is broken into [`Inline`] nodes.
//! Nodes are:
//!
//! - **Zero-copy**: text payloads are `Cow<'a, str>` borrowing from input
//! - **Span-tracked**: every node records its source byte range
//! - **Immutable on return**: nothing mutates a node after it is appended
//!
//! A renderer adapter walks the blocks in order and maps each variant to
//! its visual representation; this crate never depends on any UI layer.

use crate::span::Span;

/// Borrowed or owned string type for zero-copy parsing.
pub type CowStr<'a> = std::borrow::Cow<'a, str>;

/// Heading decoration policy, applied by the renderer.
///
/// The engine only marks which headings are decorated (see
/// [`Heading::decorated`]); drawing the marker is the renderer's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingDecoration {
    /// No decoration.
    #[default]
    None,
    /// Decorate headings of level 1 and 2 with a leading diamond.
    DiamondTopTwo,
}

/// Declarative feature toggles for one call site.
///
/// Constructed once and shared freely; the parser never mutates it. The two
/// presets mirror the engine's real call sites: full-featured chat messages
/// and the reduced AI-analysis surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    /// Recognize pipe tables.
    pub tables: bool,
    /// Recognize `[text](url)` links.
    pub links: bool,
    /// Deepest heading level treated as a heading (4 or 6). Lines with more
    /// hashes fall through to paragraphs.
    pub max_heading_level: u8,
    /// Decoration hint forwarded to headings.
    pub heading_decoration: HeadingDecoration,
}

impl Features {
    /// Chat messages: tables, links, all six heading levels, no decoration.
    pub const fn chat() -> Self {
        Self {
            tables: true,
            links: true,
            max_heading_level: 6,
            heading_decoration: HeadingDecoration::None,
        }
    }

    /// AI-analysis text: no tables, no links, headings capped at level 4,
    /// top-two heading levels decorated.
    pub const fn analysis() -> Self {
        Self {
            tables: false,
            links: false,
            max_heading_level: 4,
            heading_decoration: HeadingDecoration::DiamondTopTwo,
        }
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::chat()
    }
}

/// A parsed document: block nodes in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<'a> {
    /// Block nodes in source order.
    pub blocks: Vec<Block<'a>>,
    /// Span covering the entire input.
    pub span: Span,
}

/// Block-level nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Block<'a> {
    /// Section heading.
    Heading(Heading<'a>),
    /// One non-empty source line of prose. Lines are never merged, so hard
    /// line breaks in chat/AI text survive as separate paragraphs.
    Paragraph(Paragraph<'a>),
    /// Fenced code region; content is verbatim and never inline-formatted.
    CodeBlock(CodeBlock<'a>),
    /// Contiguous run of same-kind list items.
    List(List<'a>),
    /// Pipe table (only produced when [`Features::tables`] is set).
    Table(Table<'a>),
    /// One `>`-prefixed source line.
    Blockquote(Blockquote<'a>),
    /// Horizontal rule / thematic break.
    Rule(Span),
    /// Vertical gap from a blank source line. Never emitted before the
    /// first block of a segment.
    Spacer(Span),
}

/// Section heading with level and inline content.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading<'a> {
    /// Heading level, `1..=Features::max_heading_level`.
    pub level: u8,
    /// Whether the configured [`HeadingDecoration`] applies to this node.
    pub decorated: bool,
    /// Inline content.
    pub content: Vec<Inline<'a>>,
    /// Source span.
    pub span: Span,
}

/// A single line of prose with inline formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph<'a> {
    /// Inline content.
    pub content: Vec<Inline<'a>>,
    /// Source span.
    pub span: Span,
}

/// Fenced code region.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock<'a> {
    /// Language tag from the opening fence line (may be empty).
    pub lang: CowStr<'a>,
    /// Verbatim content, byte-for-byte equal to the source between fences.
    pub content: CowStr<'a>,
    /// Source span.
    pub span: Span,
}

/// An ordered or unordered list.
#[derive(Debug, Clone, PartialEq)]
pub struct List<'a> {
    /// Numbered (`1.` / `1)`) vs bulleted (`-` / `*` / `+`). A change of
    /// bullet character does not start a new list; a change of kind does.
    pub ordered: bool,
    /// List items in source order.
    pub items: Vec<ListItem<'a>>,
    /// Source span.
    pub span: Span,
}

/// A single list item.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem<'a> {
    /// For ordered items, the source numeral kept verbatim (`7` stays `7`,
    /// items are never re-numbered). `None` for unordered items.
    pub label: Option<CowStr<'a>>,
    /// Inline content of the item.
    pub content: Vec<Inline<'a>>,
    /// Source span.
    pub span: Span,
}

/// A pipe table.
///
/// Data rows keep their own cell counts; a row may be wider or narrower
/// than the header and is never padded or truncated to match it.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<'a> {
    /// Header cells from the first buffered line.
    pub header: Vec<TableCell<'a>>,
    /// Data rows (the separator line is consumed, not stored).
    pub rows: Vec<TableRow<'a>>,
    /// Source span.
    pub span: Span,
}

/// A single table data row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow<'a> {
    /// Cells in this row.
    pub cells: Vec<TableCell<'a>>,
    /// Source span.
    pub span: Span,
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell<'a> {
    /// Cell content with inline formatting.
    pub content: Vec<Inline<'a>>,
    /// Source span.
    pub span: Span,
}

/// One `>`-prefixed line. Consecutive quote lines are not merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Blockquote<'a> {
    /// Inline content after the `>` marker.
    pub content: Vec<Inline<'a>>,
    /// Source span.
    pub span: Span,
}

/// Inline-level nodes (within paragraphs, headings, cells, etc.).
#[derive(Debug, Clone, PartialEq)]
pub enum Inline<'a> {
    /// Plain text run.
    Text(Text<'a>),
    /// `**bold**`; children may nest further formatting.
    Bold(Bold<'a>),
    /// `*italic*` or `_italic_`; children may nest further formatting.
    Italic(Italic<'a>),
    /// `` `code` `` span; a leaf, never re-tokenized.
    Code(Code<'a>),
    /// `[text](url)` (only produced when [`Features::links`] is set).
    Link(Link<'a>),
}

/// Plain text content.
#[derive(Debug, Clone, PartialEq)]
pub struct Text<'a> {
    /// The text content.
    pub content: CowStr<'a>,
    /// Source span.
    pub span: Span,
}

/// Bold span.
#[derive(Debug, Clone, PartialEq)]
pub struct Bold<'a> {
    /// Nested inline content.
    pub children: Vec<Inline<'a>>,
    /// Source span (including delimiters).
    pub span: Span,
}

/// Italic span.
#[derive(Debug, Clone, PartialEq)]
pub struct Italic<'a> {
    /// Nested inline content.
    pub children: Vec<Inline<'a>>,
    /// Source span (including delimiters).
    pub span: Span,
}

/// Inline code span.
#[derive(Debug, Clone, PartialEq)]
pub struct Code<'a> {
    /// Code content, taken verbatim.
    pub content: CowStr<'a>,
    /// Source span (including backticks).
    pub span: Span,
}

/// Hyperlink with display text and destination.
#[derive(Debug, Clone, PartialEq)]
pub struct Link<'a> {
    /// Display text (may contain nested formatting).
    pub text: Vec<Inline<'a>>,
    /// Destination URL, taken verbatim.
    pub url: CowStr<'a>,
    /// Source span.
    pub span: Span,
}
