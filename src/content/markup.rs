//! Prose-to-markup conversion, rendered for a terminal.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use thiserror::Error;

use crate::util::colors;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("markup conversion failed: {0}")]
pub struct MarkupError(pub String);

/// The conversion seam the document parser consumes. This converter
/// cannot fail, but the signature admits ones that can, and the parser
/// degrades to raw text when one does.
pub fn convert(prose: &str) -> Result<Text<'static>, MarkupError> {
    Ok(to_text(prose))
}

/// Renders Markdown prose as styled terminal text. Constructs we don't
/// style (tables, footnotes, raw html) fall through as their plain text.
pub fn to_text(prose: &str) -> Text<'static> {
    let parser = Parser::new_ext(prose, Options::empty());

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut styles: Vec<Style> = vec![Style::default()];
    let mut ordinals: Vec<Option<u64>> = Vec::new();

    for event in parser {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                blank(&mut lines);
                push_style(&mut styles, |s| {
                    s.fg(colors::PRIMARY).add_modifier(Modifier::BOLD)
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                flush(&mut current, &mut lines);
                blank(&mut lines);
                styles.pop();
            }
            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => {
                flush(&mut current, &mut lines);
                blank(&mut lines);
            }
            Event::Start(Tag::Emphasis) => {
                push_style(&mut styles, |s| s.add_modifier(Modifier::ITALIC));
            }
            Event::End(TagEnd::Emphasis) => {
                styles.pop();
            }
            Event::Start(Tag::Strong) => {
                push_style(&mut styles, |s| s.add_modifier(Modifier::BOLD));
            }
            Event::End(TagEnd::Strong) => {
                styles.pop();
            }
            Event::Start(Tag::Link { .. }) => {
                push_style(&mut styles, |s| {
                    s.fg(colors::ACCENT).add_modifier(Modifier::UNDERLINED)
                });
            }
            Event::End(TagEnd::Link) => {
                styles.pop();
            }
            Event::Start(Tag::BlockQuote(_)) => {
                push_style(&mut styles, |s| {
                    s.fg(colors::NEUTRAL).add_modifier(Modifier::ITALIC)
                });
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                flush(&mut current, &mut lines);
                blank(&mut lines);
                styles.pop();
            }
            Event::Start(Tag::CodeBlock(_)) => {
                push_style(&mut styles, |s| s.fg(colors::ACCENT));
            }
            Event::End(TagEnd::CodeBlock) => {
                flush(&mut current, &mut lines);
                blank(&mut lines);
                styles.pop();
            }
            Event::Start(Tag::List(start)) => {
                ordinals.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                ordinals.pop();
                if ordinals.is_empty() {
                    blank(&mut lines);
                }
            }
            Event::Start(Tag::Item) => {
                let indent = "  ".repeat(ordinals.len().saturating_sub(1));
                let marker = match ordinals.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                current.push(Span::styled(marker, Style::default().fg(colors::SECONDARY)));
            }
            Event::End(TagEnd::Item) => {
                flush(&mut current, &mut lines);
            }
            Event::Text(text) => {
                let style = *styles.last().expect("style stack is never empty");
                let mut pieces = text.split('\n');
                if let Some(first) = pieces.next() {
                    append(&mut current, first, style);
                }
                for piece in pieces {
                    flush(&mut current, &mut lines);
                    append(&mut current, piece, style);
                }
            }
            Event::Code(code) => {
                current.push(Span::styled(
                    code.into_string(),
                    styles.last().copied().unwrap_or_default().fg(colors::ACCENT),
                ));
            }
            Event::SoftBreak | Event::HardBreak => {
                flush(&mut current, &mut lines);
            }
            Event::Rule => {
                flush(&mut current, &mut lines);
                lines.push(Line::styled("───", Style::default().fg(colors::NEUTRAL)));
                blank(&mut lines);
            }
            _ => {}
        }
    }
    flush(&mut current, &mut lines);

    while lines.last().is_some_and(|line| line.spans.is_empty()) {
        lines.pop();
    }
    Text::from(lines)
}

fn append(current: &mut Vec<Span<'static>>, piece: &str, style: Style) {
    if !piece.is_empty() {
        current.push(Span::styled(piece.to_string(), style));
    }
}

fn flush(current: &mut Vec<Span<'static>>, lines: &mut Vec<Line<'static>>) {
    if !current.is_empty() {
        lines.push(Line::from(std::mem::take(current)));
    }
}

fn blank(lines: &mut Vec<Line<'static>>) {
    if lines.last().is_some_and(|line| !line.spans.is_empty()) {
        lines.push(Line::default());
    }
}

fn push_style(styles: &mut Vec<Style>, apply: impl FnOnce(Style) -> Style) {
    let top = *styles.last().expect("style stack is never empty");
    styles.push(apply(top));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn paragraphs_are_separated_by_blank_lines() {
        let text = to_text("first paragraph\n\nsecond paragraph");
        assert_eq!(
            plain(&text),
            vec!["first paragraph", "", "second paragraph"]
        );
    }

    #[test]
    fn headings_are_bold() {
        let text = to_text("# On Tour\n\nDates below.");
        assert_eq!(plain(&text), vec!["On Tour", "", "Dates below."]);
        let heading = &text.lines[0].spans[0];
        assert!(heading.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn lists_get_markers() {
        let text = to_text("- one\n- two");
        assert_eq!(plain(&text), vec!["• one", "• two"]);

        let text = to_text("1. one\n2. two");
        assert_eq!(plain(&text), vec!["1. one", "2. two"]);
    }

    #[test]
    fn empty_input_yields_empty_text() {
        assert!(to_text("").lines.is_empty());
    }

    #[test]
    fn production_converter_never_fails() {
        assert!(convert("### odd **markup* [dangling](").is_ok());
    }
}
