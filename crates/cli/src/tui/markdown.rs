//! Markdown-to-ratatui rendering for assistant messages.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Renders markdown source into styled terminal lines.
///
/// Supports the subset the assistant actually produces: headings, paragraphs,
/// emphasis, inline and fenced code, lists, and rules. Everything else falls
/// through as plain text.
pub fn render_markdown(text: &str) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut strong: usize = 0;
    let mut emphasis: usize = 0;
    let mut heading = false;
    let mut code_block = false;
    let mut list_depth: usize = 0;

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::Paragraph) => {
                if !lines.is_empty() {
                    lines.push(Line::from(""));
                }
            }
            Event::End(TagEnd::Paragraph) => flush(&mut spans, &mut lines),
            Event::Start(Tag::Heading { .. }) => {
                if !lines.is_empty() {
                    lines.push(Line::from(""));
                }
                heading = true;
            }
            Event::End(TagEnd::Heading(_)) => {
                flush(&mut spans, &mut lines);
                heading = false;
            }
            Event::Start(Tag::CodeBlock(_)) => {
                flush(&mut spans, &mut lines);
                code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                flush(&mut spans, &mut lines);
                code_block = false;
            }
            Event::Start(Tag::List(_)) => list_depth += 1,
            Event::End(TagEnd::List(_)) => list_depth = list_depth.saturating_sub(1),
            Event::Start(Tag::Item) => {
                flush(&mut spans, &mut lines);
                let indent = "  ".repeat(list_depth.saturating_sub(1));
                spans.push(Span::raw(format!("{indent}• ")));
            }
            Event::End(TagEnd::Item) => flush(&mut spans, &mut lines),
            Event::Start(Tag::Strong) => strong += 1,
            Event::End(TagEnd::Strong) => strong = strong.saturating_sub(1),
            Event::Start(Tag::Emphasis) => emphasis += 1,
            Event::End(TagEnd::Emphasis) => emphasis = emphasis.saturating_sub(1),
            Event::Text(text) => {
                let style = text_style(heading, code_block, strong > 0, emphasis > 0);
                // Fenced code text carries embedded newlines.
                let mut parts = text.split('\n').peekable();
                while let Some(part) = parts.next() {
                    if !part.is_empty() {
                        spans.push(Span::styled(part.to_string(), style));
                    }
                    if parts.peek().is_some() {
                        flush(&mut spans, &mut lines);
                    }
                }
            }
            Event::Code(code) => {
                spans.push(Span::styled(
                    code.to_string(),
                    Style::default().fg(Color::Yellow),
                ));
            }
            Event::SoftBreak | Event::HardBreak => flush(&mut spans, &mut lines),
            Event::Rule => {
                flush(&mut spans, &mut lines);
                lines.push(Line::from(Span::styled(
                    "─".repeat(24),
                    Style::default().add_modifier(Modifier::DIM),
                )));
            }
            _ => {}
        }
    }
    flush(&mut spans, &mut lines);
    lines
}

fn flush(spans: &mut Vec<Span<'static>>, lines: &mut Vec<Line<'static>>) {
    if !spans.is_empty() {
        lines.push(Line::from(std::mem::take(spans)));
    }
}

fn text_style(heading: bool, code_block: bool, strong: bool, emphasis: bool) -> Style {
    let mut style = Style::default();
    if heading {
        style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
    }
    if code_block {
        style = style.add_modifier(Modifier::DIM);
    }
    if strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    style
}
