//! Lightweight markup to HTML.
//!
//! Applied exactly once, on raw producer output. Block structure is found by a
//! line scanner; inline emphasis, code spans, links and images are rewritten
//! inside each block afterwards. Text is not HTML-escaped: producer output may
//! already carry inline HTML that must survive.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,3})\s+(.+?)(?:\s+#+)?\s*$").unwrap());
static RULE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(?:-{3,}|\*{3,}|_{3,})\s*$").unwrap());
static QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*>\s?(.*)$").unwrap());
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+(.*)$").unwrap());
static ORDERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+[.)]\s+(.*)$").unwrap());
static TABLE_ROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\|.*\|\s*$").unwrap());
static TABLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\|(?:\s*:?-+:?\s*\|)+\s*$").unwrap());

static CODE_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)\)").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").unwrap());
static STRONG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*\n]+?)\*\*").unwrap());
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*\s][^*\n]*?)\*").unwrap());

static SECTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\*\*H2:\*\*[ \t]*(.+)$").unwrap());
static PULL_QUOTE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\*\*PULL_QUOTE:\*\*[ \t]*(.+)$").unwrap());
static HIGHLIGHT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(?:BOLD|STAT):\*\*[ \t]*([^.!?\n*]+[.!?]?)").unwrap());

/// Rewrite long-form authoring markers into plain markup.
///
/// `**H2:** X` becomes a level-2 heading, `**PULL_QUOTE:** X` a blockquote and
/// `**BOLD:**`/`**STAT:**` wrap the following sentence in strong emphasis.
pub fn expand_markers(text: &str) -> String {
    let text = SECTION_MARKER.replace_all(text, "## $1");
    let text = PULL_QUOTE_MARKER.replace_all(&text, "> $1");
    HIGHLIGHT_MARKER
        .replace_all(&text, |caps: &Captures| {
            let raw = &caps[1];
            let body = raw.trim_end();
            format!("**{}**{}", body.trim_start(), &raw[body.len()..])
        })
        .into_owned()
}

#[derive(Debug, PartialEq)]
enum Block {
    Heading(usize, String),
    Rule,
    Quote(Vec<String>),
    List { ordered: bool, items: Vec<String> },
    Table(Vec<Vec<String>>),
    Paragraph(Vec<String>),
}

enum Line<'a> {
    Blank,
    Heading(usize, &'a str),
    Rule,
    Quote(&'a str),
    Item { ordered: bool, text: &'a str },
    TableRow(&'a str),
    TableSeparator,
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if line.trim().is_empty() {
        return Line::Blank;
    }
    if let Some(c) = HEADING.captures(line) {
        let level = c.get(1).map_or(1, |m| m.len());
        return Line::Heading(level, c.get(2).map_or("", |m| m.as_str()));
    }
    if RULE.is_match(line) {
        return Line::Rule;
    }
    if TABLE_SEPARATOR.is_match(line) {
        return Line::TableSeparator;
    }
    if TABLE_ROW.is_match(line) {
        return Line::TableRow(line.trim());
    }
    if let Some(c) = QUOTE.captures(line) {
        return Line::Quote(c.get(1).map_or("", |m| m.as_str()));
    }
    if let Some(c) = BULLET.captures(line) {
        return Line::Item { ordered: false, text: c.get(1).map_or("", |m| m.as_str()) };
    }
    if let Some(c) = ORDERED.captures(line) {
        return Line::Item { ordered: true, text: c.get(1).map_or("", |m| m.as_str()) };
    }
    Line::Text(line.trim())
}

fn table_cells(row: &str) -> Vec<String> {
    row.trim_matches('|').split('|').map(|c| c.trim().to_string()).collect()
}

fn parse_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut open: Option<Block> = None;

    for raw in text.lines() {
        let line = classify(raw);

        // Extend the open block when the line continues it.
        match (&mut open, &line) {
            (Some(Block::Paragraph(lines)), Line::Text(t)) => {
                lines.push(t.to_string());
                continue;
            }
            (Some(Block::Quote(lines)), Line::Quote(t)) => {
                lines.push(t.to_string());
                continue;
            }
            (Some(Block::List { ordered, items }), Line::Item { ordered: o, text }) if *ordered == *o => {
                items.push(text.to_string());
                continue;
            }
            (Some(Block::Table(rows)), Line::TableRow(r)) => {
                rows.push(table_cells(r));
                continue;
            }
            (Some(Block::Table(_)), Line::TableSeparator) => continue,
            _ => {}
        }

        blocks.extend(open.take());
        open = match line {
            Line::Blank => None,
            Line::Heading(level, t) => {
                blocks.push(Block::Heading(level, t.to_string()));
                None
            }
            Line::Rule => {
                blocks.push(Block::Rule);
                None
            }
            Line::Quote(t) => Some(Block::Quote(vec![t.to_string()])),
            Line::Item { ordered, text } => Some(Block::List { ordered, items: vec![text.to_string()] }),
            Line::TableRow(r) => Some(Block::Table(vec![table_cells(r)])),
            // A separator with no header row above it is noise.
            Line::TableSeparator => None,
            Line::Text(t) => Some(Block::Paragraph(vec![t.to_string()])),
        };
    }
    blocks.extend(open);
    blocks
}

fn inline(text: &str) -> String {
    let mut spans = Vec::new();
    let protected = CODE_SPAN.replace_all(text, |caps: &Captures| {
        spans.push(format!("<code>{}</code>", &caps[1]));
        format!("\u{1}{}\u{1}", spans.len() - 1)
    });

    let out = IMAGE.replace_all(&protected, r#"<img src="$2" alt="$1">"#);
    let out = LINK.replace_all(&out, r#"<a href="$2">$1</a>"#);
    let out = STRONG.replace_all(&out, "<strong>$1</strong>");
    let mut out = EMPHASIS.replace_all(&out, "<em>$1</em>").into_owned();

    for (i, span) in spans.iter().enumerate() {
        out = out.replace(&format!("\u{1}{i}\u{1}"), span);
    }
    out
}

fn render_block(block: &Block, out: &mut Vec<String>) {
    match block {
        Block::Heading(level, text) => out.push(format!("<h{level}>{}</h{level}>", inline(text))),
        Block::Rule => out.push("<hr>".to_string()),
        Block::Quote(lines) => out.push(format!("<blockquote>{}</blockquote>", inline(&lines.join(" ")))),
        Block::Paragraph(lines) => out.push(format!("<p>{}</p>", inline(&lines.join(" ")))),
        Block::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            out.push(format!("<{tag}>"));
            out.extend(items.iter().map(|item| format!("<li>{}</li>", inline(item))));
            out.push(format!("</{tag}>"));
        }
        Block::Table(rows) => {
            let Some((header, body)) = rows.split_first() else {
                return;
            };
            let row = |cells: &[String], tag: &str| {
                let cells: String = cells.iter().map(|c| format!("<{tag}>{}</{tag}>", inline(c))).collect();
                format!("<tr>{cells}</tr>")
            };
            out.push("<table>".to_string());
            out.push("<thead>".to_string());
            out.push(row(header, "th"));
            out.push("</thead>".to_string());
            if !body.is_empty() {
                out.push("<tbody>".to_string());
                out.extend(body.iter().map(|r| row(r, "td")));
                out.push("</tbody>".to_string());
            }
            out.push("</table>".to_string());
        }
    }
}

/// Convert markup to HTML block by block, one block per output line group.
pub fn render(markup: &str) -> String {
    let mut out = Vec::new();
    for block in parse_blocks(markup) {
        render_block(&block, &mut out);
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_then_single_list() {
        assert_eq!(
            render("## Title\n- a\n- b\n"),
            "<h2>Title</h2>\n<ul>\n<li>a</li>\n<li>b</li>\n</ul>"
        );
    }

    #[test]
    fn non_list_line_closes_list() {
        let html = render("- a\ntext\n- b");
        assert_eq!(html.matches("<ul>").count(), 2);
        assert!(html.contains("<p>text</p>"));
    }

    #[test]
    fn ordered_and_unordered_runs_are_separate_lists() {
        let html = render("1. one\n2. two\n- three");
        assert_eq!(html, "<ol>\n<li>one</li>\n<li>two</li>\n</ol>\n<ul>\n<li>three</li>\n</ul>");
    }

    #[test]
    fn paragraph_lines_are_joined_and_blank_lines_split() {
        let html = render("first line\nsecond line\n\n\nnext para");
        assert_eq!(html, "<p>first line second line</p>\n<p>next para</p>");
    }

    #[test]
    fn blank_input_renders_nothing() {
        assert_eq!(render("\n\n  \n"), "");
    }

    #[test]
    fn heading_levels() {
        assert_eq!(render("# A\n### C"), "<h1>A</h1>\n<h3>C</h3>");
        // Four hashes is not a recognised heading.
        assert_eq!(render("#### D"), "<p>#### D</p>");
    }

    #[test]
    fn heading_keeps_hash_inside_text() {
        assert_eq!(render("## Learning C#"), "<h2>Learning C#</h2>");
        assert_eq!(render("## Closed heading ##"), "<h2>Closed heading</h2>");
    }

    #[test]
    fn rules_and_quotes() {
        assert_eq!(render("> quoted\n> more\n---"), "<blockquote>quoted more</blockquote>\n<hr>");
        assert_eq!(render("***"), "<hr>");
    }

    #[test]
    fn table_with_header_and_body() {
        let html = render("| Name | Score |\n|------|:-----:|\n| a | 1 |\n| b | 2 |");
        assert_eq!(
            html,
            "<table>\n<thead>\n<tr><th>Name</th><th>Score</th></tr>\n</thead>\n<tbody>\n\
             <tr><td>a</td><td>1</td></tr>\n<tr><td>b</td><td>2</td></tr>\n</tbody>\n</table>"
        );
    }

    #[test]
    fn inline_emphasis_links_and_images() {
        assert_eq!(
            render("**bold** and *it* with [link](https://x.io) and ![alt](img.png)"),
            "<p><strong>bold</strong> and <em>it</em> with <a href=\"https://x.io\">link</a> \
             and <img src=\"img.png\" alt=\"alt\"></p>"
        );
    }

    #[test]
    fn code_spans_are_not_emphasised() {
        assert_eq!(render("use `a*b*c` here"), "<p>use <code>a*b*c</code> here</p>");
    }

    #[test]
    fn bold_paragraph_is_not_a_bullet() {
        assert_eq!(render("**Note** this"), "<p><strong>Note</strong> this</p>");
    }

    #[test]
    fn markers_expand_to_markup() {
        let raw = "**H2:** Why it matters\nBody. **BOLD:** Key point here. Rest\n**PULL_QUOTE:** Quote me";
        assert_eq!(
            expand_markers(raw),
            "## Why it matters\nBody. **Key point here.** Rest\n> Quote me"
        );
    }

    #[test]
    fn adjacent_highlights_keep_spacing() {
        assert_eq!(expand_markers("**BOLD:** a **STAT:** b"), "**a** **b**");
    }

    #[test]
    fn expanded_markers_render_once() {
        let html = render(&expand_markers("**H2:** Intro\nText with **STAT:** 40 percent growth."));
        assert_eq!(html, "<h2>Intro</h2>\n<p>Text with <strong>40 percent growth.</strong></p>");
    }
}
