use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::util::colors;

pub struct NavEntry {
    pub label: &'static str,
    pub target: &'static str,
}

/// The navigation surface: each entry carries its anchor-style target and
/// activating it asks the router for that section.
pub const NAV_ENTRIES: [NavEntry; 4] = [
    NavEntry {
        label: "Home",
        target: "#home",
    },
    NavEntry {
        label: "Music",
        target: "#music",
    },
    NavEntry {
        label: "About",
        target: "#about",
    },
    NavEntry {
        label: "News",
        target: "#news",
    },
];

pub struct NavBar<'a> {
    active: &'a str,
}

impl<'a> NavBar<'a> {
    pub fn new(active: &'a str) -> Self {
        Self { active }
    }
}

impl Widget for NavBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(" ♫ ", Style::default().fg(colors::PRIMARY))];
        for (i, entry) in NAV_ENTRIES.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Style::default().fg(colors::NEUTRAL)));
            }
            let style = if entry.target.trim_start_matches('#') == self.active {
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors::NEUTRAL)
            };
            spans.push(Span::styled(format!("{} {}", i + 1, entry.label), style));
        }
        Line::from(spans).render(area, buf);
    }
}
