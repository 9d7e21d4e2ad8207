//! Integration tests for the chatmark engine

use chatmark_core::{parse, Block, DiagnosticKind, Features, Inline, Parser};

fn text_of(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(t) => out.push_str(&t.content),
            Inline::Bold(b) => out.push_str(&text_of(&b.children)),
            Inline::Italic(i) => out.push_str(&text_of(&i.children)),
            Inline::Code(c) => out.push_str(&c.content),
            Inline::Link(l) => out.push_str(&text_of(&l.text)),
        }
    }
    out
}

// ============================================================================
// Paragraph and Spacer Tests
// ============================================================================

#[test]
fn test_one_paragraph_per_nonempty_line() {
    let doc = parse("one\ntwo\n\nthree", Features::chat());

    assert_eq!(doc.blocks.len(), 4);
    assert!(matches!(&doc.blocks[0], Block::Paragraph(p) if text_of(&p.content) == "one"));
    assert!(matches!(&doc.blocks[1], Block::Paragraph(p) if text_of(&p.content) == "two"));
    assert!(matches!(&doc.blocks[2], Block::Spacer(_)));
    assert!(matches!(&doc.blocks[3], Block::Paragraph(p) if text_of(&p.content) == "three"));
}

#[test]
fn test_no_leading_spacer() {
    let doc = parse("\n\nhello", Features::chat());

    assert_eq!(doc.blocks.len(), 1);
    assert!(matches!(&doc.blocks[0], Block::Paragraph(_)));
}

#[test]
fn test_consecutive_blank_lines_one_spacer_each() {
    let doc = parse("a\n\n\nb", Features::chat());

    assert_eq!(doc.blocks.len(), 4);
    assert!(matches!(&doc.blocks[1], Block::Spacer(_)));
    assert!(matches!(&doc.blocks[2], Block::Spacer(_)));
}

#[test]
fn test_lines_are_trimmed() {
    let doc = parse("   padded   ", Features::chat());

    assert_eq!(doc.blocks.len(), 1);
    assert!(matches!(&doc.blocks[0], Block::Paragraph(p) if text_of(&p.content) == "padded"));
}

// ============================================================================
// Heading Tests
// ============================================================================

#[test]
fn test_heading_levels_chat() {
    let doc = parse(
        "# H1\n## H2\n### H3\n#### H4\n##### H5\n###### H6",
        Features::chat(),
    );

    assert_eq!(doc.blocks.len(), 6);
    for (i, block) in doc.blocks.iter().enumerate() {
        if let Block::Heading(h) = block {
            assert_eq!(h.level, (i + 1) as u8);
            assert!(!h.decorated);
        } else {
            panic!("Expected heading, got {:?}", block);
        }
    }
}

#[test]
fn test_heading_above_max_level_is_paragraph() {
    // Analysis preset caps headings at level 4.
    let doc = parse("##### x", Features::analysis());
    assert!(matches!(&doc.blocks[0], Block::Paragraph(_)));

    // Chat preset allows it.
    let doc = parse("##### x", Features::chat());
    assert!(matches!(&doc.blocks[0], Block::Heading(h) if h.level == 5));
}

#[test]
fn test_heading_without_space_is_paragraph() {
    let doc = parse("#NoSpace", Features::chat());
    assert!(matches!(&doc.blocks[0], Block::Paragraph(_)));
}

#[test]
fn test_heading_decoration_top_two_analysis() {
    let doc = parse("# A\n## B\n### C", Features::analysis());

    let decorated: Vec<bool> = doc
        .blocks
        .iter()
        .map(|b| match b {
            Block::Heading(h) => h.decorated,
            other => panic!("Expected heading, got {:?}", other),
        })
        .collect();
    assert_eq!(decorated, vec![true, true, false]);
}

#[test]
fn test_heading_content_is_tokenized() {
    let doc = parse("# Hello **World**", Features::chat());

    if let Block::Heading(h) = &doc.blocks[0] {
        assert_eq!(h.content.len(), 2);
        assert!(matches!(&h.content[1], Inline::Bold(_)));
    } else {
        panic!("Expected heading");
    }
}

// ============================================================================
// Code Block Tests
// ============================================================================

#[test]
fn test_code_block_round_trip() {
    let doc = parse("```js\ncode\n```", Features::chat());

    assert_eq!(doc.blocks.len(), 1);
    if let Block::CodeBlock(c) = &doc.blocks[0] {
        assert_eq!(c.lang.as_ref(), "js");
        assert_eq!(c.content.as_ref(), "code");
    } else {
        panic!("Expected code block");
    }
}

#[test]
fn test_code_block_content_is_verbatim() {
    let doc = parse(
        "```\n# not a heading\n- not a list\n**not bold**\n```",
        Features::chat(),
    );

    assert_eq!(doc.blocks.len(), 1);
    if let Block::CodeBlock(c) = &doc.blocks[0] {
        assert!(c.lang.is_empty());
        assert_eq!(c.content.as_ref(), "# not a heading\n- not a list\n**not bold**");
    } else {
        panic!("Expected code block");
    }
}

#[test]
fn test_code_block_between_text() {
    let doc = parse("before\n```\nx\n```\nafter", Features::chat());

    assert_eq!(doc.blocks.len(), 3);
    assert!(matches!(&doc.blocks[0], Block::Paragraph(_)));
    assert!(matches!(&doc.blocks[1], Block::CodeBlock(_)));
    assert!(matches!(&doc.blocks[2], Block::Paragraph(_)));
}

#[test]
fn test_unterminated_fence_extends_to_end() {
    let out = Parser::new(Features::chat()).parse_with_diagnostics("```rust\nfn main() {}\nlet x = 1;");

    assert_eq!(out.document.blocks.len(), 1);
    if let Block::CodeBlock(c) = &out.document.blocks[0] {
        assert_eq!(c.lang.as_ref(), "rust");
        assert_eq!(c.content.as_ref(), "fn main() {}\nlet x = 1;");
    } else {
        panic!("Expected code block");
    }

    assert_eq!(out.diagnostics.len(), 1);
    let diag = out.diagnostics.iter().next().unwrap();
    assert_eq!(diag.kind, DiagnosticKind::UnterminatedFence);
}

#[test]
fn test_no_spacer_right_after_fence() {
    // The blank line opens a new segment, where no prior block exists yet.
    let doc = parse("```\nx\n```\n\nhello", Features::chat());

    assert_eq!(doc.blocks.len(), 2);
    assert!(matches!(&doc.blocks[0], Block::CodeBlock(_)));
    assert!(matches!(&doc.blocks[1], Block::Paragraph(_)));
}

#[test]
fn test_list_does_not_cross_fence_boundary() {
    let doc = parse("- a\n```\nx\n```\n- b", Features::chat());

    assert_eq!(doc.blocks.len(), 3);
    assert!(matches!(&doc.blocks[0], Block::List(l) if l.items.len() == 1));
    assert!(matches!(&doc.blocks[1], Block::CodeBlock(_)));
    assert!(matches!(&doc.blocks[2], Block::List(l) if l.items.len() == 1));
}

// ============================================================================
// Table Tests
// ============================================================================

#[test]
fn test_table_header_and_separator_only() {
    let doc = parse("a|b\n---|---", Features::chat());

    assert_eq!(doc.blocks.len(), 1);
    if let Block::Table(t) = &doc.blocks[0] {
        assert_eq!(t.header.len(), 2);
        assert_eq!(text_of(&t.header[0].content), "a");
        assert_eq!(text_of(&t.header[1].content), "b");
        assert!(t.rows.is_empty());
    } else {
        panic!("Expected table");
    }
}

#[test]
fn test_table_with_data_rows() {
    let doc = parse(
        "| Name | Age |\n|------|-----|\n| Alice | 30 |\n| Bob | 25 |",
        Features::chat(),
    );

    if let Block::Table(t) = &doc.blocks[0] {
        assert_eq!(t.header.len(), 2);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(text_of(&t.rows[0].cells[0].content), "Alice");
        assert_eq!(text_of(&t.rows[1].cells[1].content), "25");
    } else {
        panic!("Expected table");
    }
}

#[test]
fn test_table_rows_keep_their_own_cell_count() {
    let doc = parse("a|b\n---|---\n1|2|3\n|x|", Features::chat());

    if let Block::Table(t) = &doc.blocks[0] {
        assert_eq!(t.header.len(), 2);
        assert_eq!(t.rows[0].cells.len(), 3);
        assert_eq!(t.rows[1].cells.len(), 1);
    } else {
        panic!("Expected table");
    }
}

#[test]
fn test_loose_table_line_falls_back_to_paragraph() {
    // A single pipe line with no separator after it is not a table; the
    // line is kept as a paragraph rather than dropped.
    let out = Parser::new(Features::chat()).parse_with_diagnostics("a|b\nhello");

    assert_eq!(out.document.blocks.len(), 2);
    assert!(
        matches!(&out.document.blocks[0], Block::Paragraph(p) if text_of(&p.content) == "a|b")
    );
    assert!(
        matches!(&out.document.blocks[1], Block::Paragraph(p) if text_of(&p.content) == "hello")
    );

    assert_eq!(out.diagnostics.len(), 1);
    let diag = out.diagnostics.iter().next().unwrap();
    assert_eq!(diag.kind, DiagnosticKind::LooseTableLine);
}

#[test]
fn test_table_flushed_by_following_text() {
    let doc = parse("a|b\n---|---\n1|2\nplain", Features::chat());

    assert_eq!(doc.blocks.len(), 2);
    assert!(matches!(&doc.blocks[0], Block::Table(t) if t.rows.len() == 1));
    assert!(matches!(&doc.blocks[1], Block::Paragraph(_)));
}

#[test]
fn test_table_cells_are_tokenized() {
    let doc = parse("**h**|`c`\n---|---\n*i*|x", Features::chat());

    if let Block::Table(t) = &doc.blocks[0] {
        assert!(matches!(&t.header[0].content[0], Inline::Bold(_)));
        assert!(matches!(&t.header[1].content[0], Inline::Code(_)));
        assert!(matches!(&t.rows[0].cells[0].content[0], Inline::Italic(_)));
    } else {
        panic!("Expected table");
    }
}

#[test]
fn test_tables_disabled_in_analysis_preset() {
    let doc = parse("a|b\n---|---", Features::analysis());

    assert_eq!(doc.blocks.len(), 2);
    assert!(matches!(&doc.blocks[0], Block::Paragraph(p) if text_of(&p.content) == "a|b"));
    assert!(
        matches!(&doc.blocks[1], Block::Paragraph(p) if text_of(&p.content) == "---|---")
    );
}

// ============================================================================
// List Tests
// ============================================================================

#[test]
fn test_list_markers_merge_into_one_list() {
    let doc = parse("- a\n* b\n+ c", Features::chat());

    assert_eq!(doc.blocks.len(), 1);
    if let Block::List(l) = &doc.blocks[0] {
        assert!(!l.ordered);
        assert_eq!(l.items.len(), 3);
        assert_eq!(text_of(&l.items[0].content), "a");
        assert_eq!(text_of(&l.items[1].content), "b");
        assert_eq!(text_of(&l.items[2].content), "c");
    } else {
        panic!("Expected list");
    }
}

#[test]
fn test_list_type_switch_starts_new_list() {
    let doc = parse("- a\n1. b", Features::chat());

    assert_eq!(doc.blocks.len(), 2);
    assert!(matches!(&doc.blocks[0], Block::List(l) if !l.ordered && l.items.len() == 1));
    assert!(matches!(&doc.blocks[1], Block::List(l) if l.ordered && l.items.len() == 1));
}

#[test]
fn test_ordered_labels_kept_verbatim() {
    let doc = parse("7) seven\n12. twelve", Features::chat());

    assert_eq!(doc.blocks.len(), 1);
    if let Block::List(l) = &doc.blocks[0] {
        assert!(l.ordered);
        assert_eq!(l.items[0].label.as_deref(), Some("7"));
        assert_eq!(l.items[1].label.as_deref(), Some("12"));
    } else {
        panic!("Expected list");
    }
}

#[test]
fn test_unordered_items_have_no_label() {
    let doc = parse("- a", Features::chat());

    if let Block::List(l) = &doc.blocks[0] {
        assert_eq!(l.items[0].label, None);
    } else {
        panic!("Expected list");
    }
}

#[test]
fn test_list_flushed_by_blank_line() {
    let doc = parse("- a\n\n- b", Features::chat());

    assert_eq!(doc.blocks.len(), 3);
    assert!(matches!(&doc.blocks[0], Block::List(_)));
    assert!(matches!(&doc.blocks[1], Block::Spacer(_)));
    assert!(matches!(&doc.blocks[2], Block::List(_)));
}

#[test]
fn test_list_flushed_by_heading() {
    let doc = parse("- a\n# H", Features::chat());

    assert_eq!(doc.blocks.len(), 2);
    assert!(matches!(&doc.blocks[0], Block::List(_)));
    assert!(matches!(&doc.blocks[1], Block::Heading(_)));
}

#[test]
fn test_marker_without_space_is_paragraph() {
    let doc = parse("-notalist\n1.also not", Features::chat());

    assert_eq!(doc.blocks.len(), 2);
    assert!(matches!(&doc.blocks[0], Block::Paragraph(_)));
    assert!(matches!(&doc.blocks[1], Block::Paragraph(_)));
}

#[test]
fn test_list_item_content_is_tokenized() {
    let doc = parse("- plain **bold** `code`", Features::chat());

    if let Block::List(l) = &doc.blocks[0] {
        let content = &l.items[0].content;
        assert!(matches!(&content[1], Inline::Bold(_)));
        assert!(matches!(&content[3], Inline::Code(_)));
    } else {
        panic!("Expected list");
    }
}

// ============================================================================
// Blockquote and Rule Tests
// ============================================================================

#[test]
fn test_blockquote_single_line() {
    let doc = parse("> quoted **text**", Features::chat());

    assert_eq!(doc.blocks.len(), 1);
    if let Block::Blockquote(q) = &doc.blocks[0] {
        assert_eq!(text_of(&q.content), "quoted text");
        assert!(matches!(&q.content[1], Inline::Bold(_)));
    } else {
        panic!("Expected blockquote");
    }
}

#[test]
fn test_blockquote_lines_not_merged() {
    let doc = parse("> one\n> two", Features::chat());

    assert_eq!(doc.blocks.len(), 2);
    assert!(matches!(&doc.blocks[0], Block::Blockquote(_)));
    assert!(matches!(&doc.blocks[1], Block::Blockquote(_)));
}

#[test]
fn test_horizontal_rule_variants() {
    for input in ["---", "*****", "___", "-*_"] {
        let doc = parse(input, Features::chat());
        assert_eq!(doc.blocks.len(), 1, "input: {input:?}");
        assert!(matches!(&doc.blocks[0], Block::Rule(_)), "input: {input:?}");
    }
}

#[test]
fn test_rule_not_swallowed_by_table_rules() {
    // `---` matches the separator shape but must stay a rule when no table
    // header precedes it.
    let doc = parse("text\n---\nmore", Features::chat());

    assert_eq!(doc.blocks.len(), 3);
    assert!(matches!(&doc.blocks[1], Block::Rule(_)));
}

#[test]
fn test_two_dashes_is_paragraph() {
    let doc = parse("--", Features::chat());
    assert!(matches!(&doc.blocks[0], Block::Paragraph(_)));
}

// ============================================================================
// Inline Tests
// ============================================================================

#[test]
fn test_nested_emphasis() {
    let doc = parse("**bold *italic* end**", Features::chat());

    let Block::Paragraph(p) = &doc.blocks[0] else {
        panic!("Expected paragraph");
    };
    assert_eq!(p.content.len(), 1);
    let Inline::Bold(b) = &p.content[0] else {
        panic!("Expected bold, got {:?}", p.content[0]);
    };
    assert_eq!(b.children.len(), 3);
    assert!(matches!(&b.children[0], Inline::Text(t) if t.content == "bold "));
    assert!(matches!(&b.children[1], Inline::Italic(_)));
    assert!(matches!(&b.children[2], Inline::Text(t) if t.content == " end"));
}

#[test]
fn test_adjacent_italics_never_nest() {
    let doc = parse("*a**b*", Features::chat());

    let Block::Paragraph(p) = &doc.blocks[0] else {
        panic!("Expected paragraph");
    };
    assert_eq!(p.content.len(), 2);
    assert!(matches!(&p.content[0], Inline::Italic(i) if text_of(&i.children) == "a"));
    assert!(matches!(&p.content[1], Inline::Italic(i) if text_of(&i.children) == "b"));
}

#[test]
fn test_underscore_italic() {
    let doc = parse("_hi_ there", Features::chat());

    let Block::Paragraph(p) = &doc.blocks[0] else {
        panic!("Expected paragraph");
    };
    assert!(matches!(&p.content[0], Inline::Italic(_)));
    assert!(matches!(&p.content[1], Inline::Text(t) if t.content == " there"));
}

#[test]
fn test_code_span_wins_over_emphasis() {
    let doc = parse("`**x**`", Features::chat());

    let Block::Paragraph(p) = &doc.blocks[0] else {
        panic!("Expected paragraph");
    };
    assert_eq!(p.content.len(), 1);
    assert!(matches!(&p.content[0], Inline::Code(c) if c.content == "**x**"));
}

#[test]
fn test_dangling_delimiters_stay_literal() {
    let doc = parse("a ** b ` c", Features::chat());

    let Block::Paragraph(p) = &doc.blocks[0] else {
        panic!("Expected paragraph");
    };
    assert_eq!(p.content.len(), 1);
    assert!(matches!(&p.content[0], Inline::Text(t) if t.content == "a ** b ` c"));
}

#[test]
fn test_lone_asterisks_pair_leftmost() {
    // The second half of a failed `**` can still close as an italic: the
    // `*` at byte 3 pairs with the one at byte 11, and everything between
    // (backtick included, it has no closer) is italic content.
    let doc = parse("a ** b ` c * d _ e", Features::chat());

    let Block::Paragraph(p) = &doc.blocks[0] else {
        panic!("Expected paragraph");
    };
    assert_eq!(p.content.len(), 3);
    assert!(matches!(&p.content[0], Inline::Text(t) if t.content == "a *"));
    assert!(matches!(&p.content[1], Inline::Italic(i) if text_of(&i.children) == " b ` c "));
    assert!(matches!(&p.content[2], Inline::Text(t) if t.content == " d _ e"));
}

#[test]
fn test_link_chat_preset() {
    let doc = parse("see [docs](https://example.com) now", Features::chat());

    let Block::Paragraph(p) = &doc.blocks[0] else {
        panic!("Expected paragraph");
    };
    assert_eq!(p.content.len(), 3);
    let Inline::Link(l) = &p.content[1] else {
        panic!("Expected link, got {:?}", p.content[1]);
    };
    assert_eq!(l.url.as_ref(), "https://example.com");
    assert_eq!(text_of(&l.text), "docs");
}

#[test]
fn test_link_text_is_tokenized() {
    let doc = parse("[**b**](u)", Features::chat());

    let Block::Paragraph(p) = &doc.blocks[0] else {
        panic!("Expected paragraph");
    };
    let Inline::Link(l) = &p.content[0] else {
        panic!("Expected link");
    };
    assert!(matches!(&l.text[0], Inline::Bold(_)));
}

#[test]
fn test_links_disabled_in_analysis_preset() {
    let doc = parse("see [docs](https://example.com) now", Features::analysis());

    let Block::Paragraph(p) = &doc.blocks[0] else {
        panic!("Expected paragraph");
    };
    assert_eq!(p.content.len(), 1);
    assert!(
        matches!(&p.content[0], Inline::Text(t) if t.content == "see [docs](https://example.com) now")
    );
}

#[test]
fn test_code_content_never_retokenized() {
    let doc = parse("`[a](b) *c*`", Features::chat());

    let Block::Paragraph(p) = &doc.blocks[0] else {
        panic!("Expected paragraph");
    };
    assert!(matches!(&p.content[0], Inline::Code(c) if c.content == "[a](b) *c*"));
}

// ============================================================================
// Edge Cases
// ============================================================================

#[test]
fn test_empty_input() {
    let doc = parse("", Features::chat());
    assert_eq!(doc.blocks.len(), 0);
}

#[test]
fn test_whitespace_only_input() {
    let doc = parse("   \n\n   \n", Features::chat());
    assert_eq!(doc.blocks.len(), 0);
}

#[test]
fn test_crlf_input() {
    let doc = parse("# Hi\r\n\r\ntext\r\n", Features::chat());

    assert_eq!(doc.blocks.len(), 3);
    assert!(matches!(&doc.blocks[0], Block::Heading(h) if text_of(&h.content) == "Hi"));
    assert!(matches!(&doc.blocks[2], Block::Paragraph(p) if text_of(&p.content) == "text"));
}

#[test]
fn test_reparse_is_idempotent() {
    let input = "# T\n\na|b\n---|---\n1|2\n\n- x\n- y\n\n> q\n\n```rs\nlet a = 1;\n```\ntail";
    let parser = Parser::new(Features::chat());

    let first = parser.parse(input);
    let second = parser.parse(input);
    assert_eq!(first, second);
}

#[test]
fn test_document_span_covers_input() {
    let input = "# Hi\ntext";
    let doc = parse(input, Features::chat());

    assert_eq!(doc.span.start, 0);
    assert_eq!(doc.span.end, input.len() as u32);
}

#[test]
fn test_multibyte_text_survives() {
    let doc = parse("héllo **wörld** → ok", Features::chat());

    let Block::Paragraph(p) = &doc.blocks[0] else {
        panic!("Expected paragraph");
    };
    assert_eq!(text_of(&p.content), "héllo wörld → ok");
    assert!(matches!(&p.content[1], Inline::Bold(_)));
}
