//! chatmark CLI - Parse and inspect chat-flavored Markdown
//!
//! Usage:
//!   cmk [OPTIONS] [COMMAND] [FILE]
//!
//! Commands:
//!   parse     Parse and display document structure (default)
//!   check     Parse and report recovery diagnostics
//!   stats     Show document statistics

use std::env;
use std::fs;
use std::io::Read;
use std::process;

use chatmark_core::{Block, Document, Features, Inline, ParseOutput, Parser};
use serde::Serialize;

fn main() {
    let args: Vec<String> = env::args().collect();

    match run(&args) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let config = parse_args(args)?;

    let input = match &config.file {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("failed to read '{}': {}", path, e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read stdin: {}", e))?;
            buf
        }
    };

    let features = match config.preset {
        Preset::Chat => Features::chat(),
        Preset::Analysis => Features::analysis(),
    };
    let parser = Parser::new(features);

    match config.command {
        Command::Parse => cmd_parse(&parser, &input, &config),
        Command::Check => cmd_check(&parser, &input, &config),
        Command::Stats => cmd_stats(&parser, &input),
    }
}

#[derive(Debug)]
struct Config {
    command: Command,
    file: Option<String>,
    preset: Preset,
    format: OutputFormat,
    verbose: bool,
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Parse,
    Check,
    Stats,
}

#[derive(Debug, Clone, Copy)]
enum Preset {
    Chat,
    Analysis,
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_args(args: &[String]) -> Result<Config, String> {
    let mut command = Command::Parse;
    let mut preset = Preset::Chat;
    let mut format = OutputFormat::Text;
    let mut verbose = false;
    let mut file = None;

    let mut i = 1;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            "-V" | "--version" => {
                println!("cmk {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "-v" | "--verbose" => verbose = true,
            "-j" | "--json" => format = OutputFormat::Json,
            "-p" | "--preset" => {
                i += 1;
                let value = args.get(i).ok_or("--preset requires a value")?;
                preset = match value.as_str() {
                    "chat" => Preset::Chat,
                    "analysis" => Preset::Analysis,
                    other => return Err(format!("unknown preset: {}", other)),
                };
            }
            "parse" => command = Command::Parse,
            "check" => command = Command::Check,
            "stats" => command = Command::Stats,
            // Conventional explicit-stdin marker.
            "-" => {}
            _ if arg.starts_with('-') => {
                return Err(format!("unknown option: {}", arg));
            }
            _ => {
                if file.is_some() {
                    return Err("multiple files specified".to_string());
                }
                file = Some(arg.clone());
            }
        }
        i += 1;
    }

    Ok(Config {
        command,
        file,
        preset,
        format,
        verbose,
    })
}

fn print_help() {
    eprintln!(
        r#"cmk - chat-flavored Markdown parser

USAGE:
    cmk [OPTIONS] [COMMAND] [FILE]

Reads from FILE, or from stdin when no file is given.

COMMANDS:
    parse       Parse and display document structure (default)
    check       Parse and report recovery diagnostics
    stats       Show document statistics

OPTIONS:
    -p, --preset <NAME>    Feature preset: chat (default) or analysis
    -v, --verbose          Show detailed node structure
    -j, --json             Output in JSON format
    -h, --help             Print help information
    -V, --version          Print version information

EXAMPLES:
    cmk message.md                 Parse a message
    cmk -v message.md              Parse with verbose output
    cmk -j message.md              Output the document as JSON
    cmk -p analysis message.md     Parse with the analysis preset
    cmk check message.md           Report recovery diagnostics
    cmk stats message.md           Show document statistics
"#
    );
}

// =============================================================================
// Parse Command
// =============================================================================

fn cmd_parse(parser: &Parser, input: &str, config: &Config) -> Result<(), String> {
    let result = parser.parse_with_diagnostics(input);

    for diagnostic in result.diagnostics.iter() {
        eprintln!("warning: {}", diagnostic);
    }

    match config.format {
        OutputFormat::Json => print_json(&result.document),
        OutputFormat::Text => {
            if config.verbose {
                print_document_verbose(&result.document);
            } else {
                print_document_summary(&result.document);
            }
        }
    }

    Ok(())
}

// =============================================================================
// Check Command
// =============================================================================

fn cmd_check(parser: &Parser, input: &str, config: &Config) -> Result<(), String> {
    let result = parser.parse_with_diagnostics(input);

    if result.is_clean() {
        if matches!(config.format, OutputFormat::Json) {
            println!(r#"{{"clean": true, "diagnostics": []}}"#);
        } else {
            println!("Clean: no recovery applied");
        }
        Ok(())
    } else {
        if matches!(config.format, OutputFormat::Json) {
            let diagnostics: Vec<_> = result
                .diagnostics
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "message": d.to_string(),
                        "span": {"start": d.span.start, "end": d.span.end}
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::json!({"clean": false, "diagnostics": diagnostics})
            );
        } else {
            eprintln!("Recovered: {} condition(s)", result.diagnostics.len());
            for diagnostic in result.diagnostics.iter() {
                eprintln!("  - {}", diagnostic);
            }
        }
        Err(format!("{} condition(s) recovered", result.diagnostics.len()))
    }
}

// =============================================================================
// Stats Command
// =============================================================================

fn cmd_stats(parser: &Parser, input: &str) -> Result<(), String> {
    let ParseOutput {
        document,
        diagnostics,
    } = parser.parse_with_diagnostics(input);

    let stats = DocumentStats::from_document(&document, input);

    println!("Document Statistics");
    println!("-------------------");
    println!("Content:");
    println!("  Total blocks:   {}", stats.total_blocks);
    println!("  Headings:       {}", stats.headings);
    println!("  Paragraphs:     {}", stats.paragraphs);
    println!("  Code blocks:    {}", stats.code_blocks);
    println!("  Lists:          {}", stats.lists);
    println!("  List items:     {}", stats.list_items);
    println!("  Tables:         {}", stats.tables);
    println!("  Blockquotes:    {}", stats.blockquotes);
    println!("  Rules:          {}", stats.rules);
    println!();
    println!("Size:");
    println!("  Bytes:          {}", stats.bytes);
    println!("  Words (est.):   {}", stats.words);
    println!("  Lines:          {}", stats.lines);
    println!();
    println!("Diagnostics:    {}", diagnostics.len());

    Ok(())
}

struct DocumentStats {
    total_blocks: usize,
    headings: usize,
    paragraphs: usize,
    code_blocks: usize,
    lists: usize,
    list_items: usize,
    tables: usize,
    blockquotes: usize,
    rules: usize,
    bytes: usize,
    words: usize,
    lines: usize,
}

impl DocumentStats {
    fn from_document(doc: &Document, input: &str) -> Self {
        let mut stats = Self {
            total_blocks: 0,
            headings: 0,
            paragraphs: 0,
            code_blocks: 0,
            lists: 0,
            list_items: 0,
            tables: 0,
            blockquotes: 0,
            rules: 0,
            bytes: input.len(),
            words: input.split_whitespace().count(),
            lines: input.lines().count(),
        };

        for block in &doc.blocks {
            stats.total_blocks += 1;
            match block {
                Block::Heading(_) => stats.headings += 1,
                Block::Paragraph(_) => stats.paragraphs += 1,
                Block::CodeBlock(_) => stats.code_blocks += 1,
                Block::List(l) => {
                    stats.lists += 1;
                    stats.list_items += l.items.len();
                }
                Block::Table(_) => stats.tables += 1,
                Block::Blockquote(_) => stats.blockquotes += 1,
                Block::Rule(_) => stats.rules += 1,
                Block::Spacer(_) => {}
            }
        }

        stats
    }
}

// =============================================================================
// JSON Output
// =============================================================================

#[derive(Serialize)]
struct JsonDocument<'a> {
    blocks: Vec<JsonBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum JsonBlock<'a> {
    Heading {
        level: u8,
        decorated: bool,
        content: Vec<JsonInline<'a>>,
    },
    Paragraph {
        content: Vec<JsonInline<'a>>,
    },
    CodeBlock {
        lang: &'a str,
        content: &'a str,
    },
    List {
        kind: &'a str,
        items: Vec<JsonListItem<'a>>,
    },
    Table {
        header: Vec<Vec<JsonInline<'a>>>,
        rows: Vec<Vec<Vec<JsonInline<'a>>>>,
    },
    Blockquote {
        content: Vec<JsonInline<'a>>,
    },
    Rule,
    Spacer,
}

#[derive(Serialize)]
struct JsonListItem<'a> {
    label: Option<&'a str>,
    content: Vec<JsonInline<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum JsonInline<'a> {
    Text {
        content: &'a str,
    },
    Bold {
        content: Vec<JsonInline<'a>>,
    },
    Italic {
        content: Vec<JsonInline<'a>>,
    },
    Code {
        content: &'a str,
    },
    Link {
        text: Vec<JsonInline<'a>>,
        url: &'a str,
    },
}

fn print_json(doc: &Document) {
    let json_doc = JsonDocument {
        blocks: doc.blocks.iter().map(convert_block).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&json_doc).unwrap());
}

fn convert_block<'a>(block: &'a Block) -> JsonBlock<'a> {
    match block {
        Block::Heading(h) => JsonBlock::Heading {
            level: h.level,
            decorated: h.decorated,
            content: h.content.iter().map(convert_inline).collect(),
        },
        Block::Paragraph(p) => JsonBlock::Paragraph {
            content: p.content.iter().map(convert_inline).collect(),
        },
        Block::CodeBlock(c) => JsonBlock::CodeBlock {
            lang: &c.lang,
            content: &c.content,
        },
        Block::List(l) => JsonBlock::List {
            kind: if l.ordered { "ordered" } else { "unordered" },
            items: l
                .items
                .iter()
                .map(|item| JsonListItem {
                    label: item.label.as_deref(),
                    content: item.content.iter().map(convert_inline).collect(),
                })
                .collect(),
        },
        Block::Table(t) => JsonBlock::Table {
            header: t
                .header
                .iter()
                .map(|cell| cell.content.iter().map(convert_inline).collect())
                .collect(),
            rows: t
                .rows
                .iter()
                .map(|row| {
                    row.cells
                        .iter()
                        .map(|cell| cell.content.iter().map(convert_inline).collect())
                        .collect()
                })
                .collect(),
        },
        Block::Blockquote(q) => JsonBlock::Blockquote {
            content: q.content.iter().map(convert_inline).collect(),
        },
        Block::Rule(_) => JsonBlock::Rule,
        Block::Spacer(_) => JsonBlock::Spacer,
    }
}

fn convert_inline<'a>(inline: &'a Inline) -> JsonInline<'a> {
    match inline {
        Inline::Text(t) => JsonInline::Text {
            content: &t.content,
        },
        Inline::Bold(b) => JsonInline::Bold {
            content: b.children.iter().map(convert_inline).collect(),
        },
        Inline::Italic(i) => JsonInline::Italic {
            content: i.children.iter().map(convert_inline).collect(),
        },
        Inline::Code(c) => JsonInline::Code {
            content: &c.content,
        },
        Inline::Link(l) => JsonInline::Link {
            text: l.text.iter().map(convert_inline).collect(),
            url: &l.url,
        },
    }
}

// =============================================================================
// Text Output
// =============================================================================

fn print_document_summary(doc: &Document) {
    println!("Blocks: {}", doc.blocks.len());
    for (i, block) in doc.blocks.iter().enumerate() {
        println!("  [{}] {}", i + 1, describe_block(block));
    }
}

fn print_document_verbose(doc: &Document) {
    println!("=== Document ===");
    println!();
    println!("Span: {}..{}", doc.span.start, doc.span.end);
    println!();

    println!("--- Blocks ---");
    for (i, block) in doc.blocks.iter().enumerate() {
        println!();
        println!("[{}] {}", i + 1, describe_block(block));
        print_block_verbose(block, 1);
    }
}

fn describe_block(block: &Block) -> String {
    match block {
        Block::Heading(h) => {
            if h.decorated {
                format!("Heading (level {}, decorated)", h.level)
            } else {
                format!("Heading (level {})", h.level)
            }
        }
        Block::Paragraph(_) => "Paragraph".to_string(),
        Block::CodeBlock(c) => format!("CodeBlock (lang: {})", c.lang),
        Block::List(l) => format!(
            "List ({}, {} items)",
            if l.ordered { "ordered" } else { "unordered" },
            l.items.len()
        ),
        Block::Table(t) => format!(
            "Table ({} columns, {} rows)",
            t.header.len(),
            t.rows.len()
        ),
        Block::Blockquote(_) => "Blockquote".to_string(),
        Block::Rule(_) => "Rule".to_string(),
        Block::Spacer(_) => "Spacer".to_string(),
    }
}

fn print_block_verbose(block: &Block, indent: usize) {
    let prefix = "  ".repeat(indent);

    match block {
        Block::Heading(h) => {
            println!("{}Content: {}", prefix, format_inlines(&h.content));
        }
        Block::Paragraph(p) => {
            println!("{}Content: {}", prefix, format_inlines(&p.content));
        }
        Block::CodeBlock(c) => {
            let preview: String = c.content.chars().take(60).collect();
            let ellipsis = if c.content.len() > 60 { "..." } else { "" };
            println!(
                "{}Content: {}{}",
                prefix,
                preview.replace('\n', "\\n"),
                ellipsis
            );
        }
        Block::List(l) => {
            for (i, item) in l.items.iter().enumerate() {
                match &item.label {
                    Some(label) => println!(
                        "{}Item {}. {}",
                        prefix,
                        label,
                        format_inlines(&item.content)
                    ),
                    None => println!("{}Item {}: {}", prefix, i + 1, format_inlines(&item.content)),
                }
            }
        }
        Block::Table(t) => {
            let header: Vec<String> = t
                .header
                .iter()
                .map(|c| format_inlines(&c.content))
                .collect();
            println!("{}Header: {}", prefix, header.join(" | "));
            for (i, row) in t.rows.iter().enumerate() {
                let cells: Vec<String> = row
                    .cells
                    .iter()
                    .map(|c| format_inlines(&c.content))
                    .collect();
                println!("{}Row {}: {}", prefix, i + 1, cells.join(" | "));
            }
        }
        Block::Blockquote(q) => {
            println!("{}Content: {}", prefix, format_inlines(&q.content));
        }
        _ => {}
    }
}

fn format_inlines(inlines: &[Inline]) -> String {
    let mut result = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(t) => result.push_str(&t.content),
            Inline::Bold(b) => {
                result.push_str("**");
                result.push_str(&format_inlines(&b.children));
                result.push_str("**");
            }
            Inline::Italic(i) => {
                result.push('*');
                result.push_str(&format_inlines(&i.children));
                result.push('*');
            }
            Inline::Code(c) => {
                result.push('`');
                result.push_str(&c.content);
                result.push('`');
            }
            Inline::Link(l) => {
                result.push('[');
                result.push_str(&format_inlines(&l.text));
                result.push_str("](");
                result.push_str(&l.url);
                result.push(')');
            }
        }
    }
    result
}
