//! Restricted markdown rendering.
//!
//! Entry bodies support a small, closed set of constructs:
//!
//! | Source                     | Output                         |
//! |----------------------------|--------------------------------|
//! | `## Heading`               | `<h2>`                         |
//! | `- item`, `* item`, `+ item` | `<ul><li>`                   |
//! | `1. item`                  | `<ol><li>`                     |
//! | `> quoted`                 | `<blockquote><p>`              |
//! | `---`, `***`, `___`        | `<hr>`                         |
//! | `**bold**`, `__bold__`     | `<strong>`                     |
//! | `*italic*`, `_italic_`     | `<em>`                         |
//!
//! Everything else is paragraph text. Consecutive text lines stay in one
//! paragraph separated by `<br>`, so line breaks written by the author survive.
//! A blank line ends the current block.
//!
//! Blocks are recognized line by line with a small state machine (paragraph,
//! list, blockquote). Inline spans are found by running `pulldown-cmark` over
//! a single line and keeping only emphasis and strong events. Any other
//! construct it reports (links, code, raw HTML, other heading levels) is
//! written out as its literal source text, escaped. Rendering never fails and
//! the same input always produces the same bytes.

use crate::types::BodyFormat;
use maud::{Markup, PreEscaped, Render, html};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use std::borrow::Cow;
use std::ops::Range;

/// Render a body to an HTML fragment according to its format.
pub fn render_body(text: &str, format: BodyFormat) -> String {
    match format {
        BodyFormat::Markdown => render_markdown(text),
        BodyFormat::PlainText => render_plain_text(text),
    }
}

/// Render restricted markdown to an HTML fragment.
pub fn render_markdown(text: &str) -> String {
    let blocks = parse_blocks(text);
    let mut out = String::new();
    for block in &blocks {
        block.render_to(&mut out);
        out.push('\n');
    }
    out
}

/// Render pre-formatted plain text: paragraphs split on blank lines, line
/// breaks kept, no markup recognized.
pub fn render_plain_text(text: &str) -> String {
    let mut out = String::new();
    for paragraph in plain_paragraphs(text) {
        let markup = html! {
            p {
                @for (i, line) in paragraph.iter().enumerate() {
                    @if i > 0 { br; }
                    (line)
                }
            }
        };
        out.push_str(&markup.into_string());
        out.push('\n');
    }
    out
}

/// Text content of a body with all markup removed, words separated by spaces.
///
/// Used to derive a summary when the metadata has none.
pub fn to_plain_text(text: &str, format: BodyFormat) -> String {
    let mut words = String::new();
    let mut push = |s: &str| {
        if !words.is_empty() {
            words.push(' ');
        }
        words.push_str(s);
    };

    match format {
        BodyFormat::PlainText => text.lines().map(str::trim).for_each(push),
        BodyFormat::Markdown => {
            for block in parse_blocks(text) {
                for line in block.text_lines() {
                    let plain: String = inline_pieces(line)
                        .into_iter()
                        .filter_map(|piece| match piece {
                            Piece::Text(t) => Some(t),
                            _ => None,
                        })
                        .collect();
                    push(&plain);
                }
            }
        }
    }

    words.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn plain_paragraphs(text: &str) -> Vec<Vec<&str>> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }
    paragraphs
}

// ============================================================================
// Block level
// ============================================================================

/// One rendered block. List items and quotes hold their source lines.
#[derive(Debug, PartialEq)]
enum Block<'a> {
    Heading(&'a str),
    Rule,
    Paragraph(Vec<&'a str>),
    Unordered(Vec<Vec<&'a str>>),
    Ordered { start: u32, items: Vec<Vec<&'a str>> },
    Quote(Vec<&'a str>),
}

/// How a single source line reads on its own.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Blank,
    Heading(&'a str),
    Rule,
    Bullet(&'a str),
    Numbered(u32, &'a str),
    Quote(&'a str),
    Text(&'a str),
}

fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if let Some(rest) = line.strip_prefix("## ") {
        let rest = rest.trim();
        if !rest.is_empty() {
            return Line::Heading(rest);
        }
    }
    if is_rule(line) {
        return Line::Rule;
    }
    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Line::Bullet(rest.trim_start());
        }
    }
    if let Some((number, rest)) = ordered_marker(line) {
        return Line::Numbered(number, rest);
    }
    if let Some(rest) = line.strip_prefix('>') {
        return Line::Quote(rest.trim());
    }
    Line::Text(line)
}

/// Three or more of the same `-`, `*` or `_`, optionally spaced.
fn is_rule(line: &str) -> bool {
    let mut marks = line.chars().filter(|c| !c.is_whitespace());
    let Some(first) = marks.next() else {
        return false;
    };
    matches!(first, '-' | '*' | '_')
        && line
            .chars()
            .filter(|c| !c.is_whitespace())
            .all(|c| c == first)
        && marks.count() >= 2
}

/// `12. rest` → `(12, "rest")`. At most nine digits, as CommonMark allows.
fn ordered_marker(line: &str) -> Option<(u32, &str)> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || digits > 9 {
        return None;
    }
    let rest = line[digits..].strip_prefix(". ")?;
    let number = line[..digits].parse().ok()?;
    Some((number, rest.trim_start()))
}

fn parse_blocks(text: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut open: Option<Block<'_>> = None;

    for raw in text.lines() {
        let line = classify(raw);
        open = match (open.take(), line) {
            (current, Line::Blank) => {
                blocks.extend(current);
                None
            }
            (current, Line::Heading(text)) => {
                blocks.extend(current);
                blocks.push(Block::Heading(text));
                None
            }
            (current, Line::Rule) => {
                blocks.extend(current);
                blocks.push(Block::Rule);
                None
            }
            (Some(Block::Unordered(mut items)), Line::Bullet(text)) => {
                items.push(vec![text]);
                Some(Block::Unordered(items))
            }
            (current, Line::Bullet(text)) => {
                blocks.extend(current);
                Some(Block::Unordered(vec![vec![text]]))
            }
            (Some(Block::Ordered { start, mut items }), Line::Numbered(_, text)) => {
                items.push(vec![text]);
                Some(Block::Ordered { start, items })
            }
            (current, Line::Numbered(start, text)) => {
                blocks.extend(current);
                Some(Block::Ordered {
                    start,
                    items: vec![vec![text]],
                })
            }
            (Some(Block::Quote(mut lines)), Line::Quote(text)) => {
                lines.push(text);
                Some(Block::Quote(lines))
            }
            (current, Line::Quote(text)) => {
                blocks.extend(current);
                Some(Block::Quote(vec![text]))
            }
            // Text directly under a list item or quote continues it
            (Some(Block::Unordered(mut items)), Line::Text(text)) => {
                push_continuation(&mut items, text);
                Some(Block::Unordered(items))
            }
            (Some(Block::Ordered { start, mut items }), Line::Text(text)) => {
                push_continuation(&mut items, text);
                Some(Block::Ordered { start, items })
            }
            (Some(Block::Quote(mut lines)), Line::Text(text)) => {
                lines.push(text);
                Some(Block::Quote(lines))
            }
            (Some(Block::Paragraph(mut lines)), Line::Text(text)) => {
                lines.push(text);
                Some(Block::Paragraph(lines))
            }
            (current, Line::Text(text)) => {
                blocks.extend(current);
                Some(Block::Paragraph(vec![text]))
            }
        };
    }
    blocks.extend(open);
    blocks
}

fn push_continuation<'a>(items: &mut [Vec<&'a str>], text: &'a str) {
    if let Some(last) = items.last_mut() {
        last.push(text);
    }
}

impl<'a> Block<'a> {
    /// Source lines carrying text, for plain-text extraction.
    fn text_lines(&self) -> Vec<&'a str> {
        match self {
            Block::Heading(text) => vec![*text],
            Block::Rule => Vec::new(),
            Block::Paragraph(lines) | Block::Quote(lines) => lines.clone(),
            Block::Unordered(items) | Block::Ordered { items, .. } => {
                items.iter().flatten().copied().collect()
            }
        }
    }
}

impl Render for Block<'_> {
    fn render(&self) -> Markup {
        match self {
            Block::Heading(text) => html! { h2 { (inline(text)) } },
            Block::Rule => html! { hr; },
            Block::Paragraph(lines) => html! { p { (broken_lines(lines)) } },
            Block::Unordered(items) => html! {
                ul {
                    @for item in items { li { (broken_lines(item)) } }
                }
            },
            Block::Ordered { start, items } => {
                let start = (*start != 1).then_some(*start);
                html! {
                    ol start=[start] {
                        @for item in items { li { (broken_lines(item)) } }
                    }
                }
            }
            Block::Quote(lines) => html! {
                blockquote {
                    @for paragraph in quote_paragraphs(lines) {
                        p { (broken_lines(&paragraph)) }
                    }
                }
            },
        }
    }
}

/// Inline-rendered lines joined with `<br>`.
fn broken_lines(lines: &[&str]) -> Markup {
    html! {
        @for (i, line) in lines.iter().enumerate() {
            @if i > 0 { br; }
            (inline(line))
        }
    }
}

/// Empty `>` lines separate paragraphs inside a quote.
fn quote_paragraphs<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    lines
        .split(|line| line.is_empty())
        .filter(|group| !group.is_empty())
        .map(<[&str]>::to_vec)
        .collect()
}

// ============================================================================
// Inline level
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Style {
    Strong,
    Emphasis,
}

#[derive(Debug, PartialEq)]
enum Piece<'a> {
    Open(Style),
    Close(Style),
    Text(Cow<'a, str>),
}

/// Leads every line handed to the parser. A no-break space is not block
/// indentation, so `2024. **Big** year` or `# tag` stay paragraph text, yet
/// it counts as whitespace for emphasis flanking like a line start does.
const INLINE_GUARD: &str = "\u{a0}";

/// Split one line into text runs and bold/italic boundaries.
///
/// Constructs outside the supported set come back as `Text` holding their
/// exact source, so nothing the author wrote is dropped.
fn inline_pieces(line: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut skip_depth = 0usize;
    let guarded = format!("{INLINE_GUARD}{line}");

    for (event, range) in Parser::new(&guarded).into_offset_iter() {
        if skip_depth > 0 {
            match event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                _ => {}
            }
            continue;
        }
        match event {
            Event::Start(Tag::Paragraph) | Event::End(TagEnd::Paragraph) => {}
            Event::Start(Tag::Strong) => pieces.push(Piece::Open(Style::Strong)),
            Event::End(TagEnd::Strong) => pieces.push(Piece::Close(Style::Strong)),
            Event::Start(Tag::Emphasis) => pieces.push(Piece::Open(Style::Emphasis)),
            Event::End(TagEnd::Emphasis) => pieces.push(Piece::Close(Style::Emphasis)),
            Event::Text(text) => {
                let text = if range.start == 0 {
                    text.strip_prefix(INLINE_GUARD).unwrap_or(&*text).to_string()
                } else {
                    text.into_string()
                };
                if !text.is_empty() {
                    pieces.push(Piece::Text(Cow::Owned(text)));
                }
            }
            Event::SoftBreak | Event::HardBreak => pieces.push(Piece::Text(Cow::Borrowed(" "))),
            Event::Start(_) => {
                pieces.push(Piece::Text(Cow::Borrowed(unguarded(line, range))));
                skip_depth = 1;
            }
            Event::End(_) => {}
            _ => pieces.push(Piece::Text(Cow::Borrowed(unguarded(line, range)))),
        }
    }
    // A line the parser swallows whole (a link reference definition) is kept
    if pieces.is_empty() && !line.is_empty() {
        pieces.push(Piece::Text(Cow::Borrowed(line)));
    }
    pieces
}

/// The slice of `line` behind a range of the guarded parser input.
fn unguarded(line: &str, range: Range<usize>) -> &str {
    let shift = INLINE_GUARD.len();
    &line[range.start.saturating_sub(shift)..range.end.saturating_sub(shift)]
}

/// Render one line of inline markdown. Text runs are escaped.
fn inline(line: &str) -> Markup {
    let mut out = String::with_capacity(line.len());
    for piece in inline_pieces(line) {
        match piece {
            Piece::Open(Style::Strong) => out.push_str("<strong>"),
            Piece::Close(Style::Strong) => out.push_str("</strong>"),
            Piece::Open(Style::Emphasis) => out.push_str("<em>"),
            Piece::Close(Style::Emphasis) => out.push_str("</em>"),
            Piece::Text(text) => {
                let text: &str = &text;
                text.render_to(&mut out);
            }
        }
    }
    PreEscaped(out)
}
