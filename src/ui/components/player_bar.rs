use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Widget},
};

use crate::player::{Player, PlayerState};
use crate::ui::util::playback_icon;
use crate::util::{colors, time::format_millis};

/// The playback widget's face: control glyph, loaded track, elapsed/total
/// clock and a progress gauge clamped to the declared duration.
pub struct PlayerBar<'a> {
    player: &'a Player,
}

impl<'a> PlayerBar<'a> {
    pub fn new(player: &'a Player) -> Self {
        Self { player }
    }
}

impl Widget for PlayerBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.player.state();
        let progress = self.player.progress();
        let (position, duration) = progress.get();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(colors::NEUTRAL));
        let inner = block.inner(area);
        block.render(area, buf);

        let [info_area, gauge_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);

        let info = match &state {
            PlayerState::Errored(err) => Line::from(Span::styled(
                format!("✖ {err}"),
                Style::default().fg(Color::Red),
            )),
            _ => {
                let title = self
                    .player
                    .current_title()
                    .unwrap_or_else(|| "nothing queued".to_string());
                let detail = match state {
                    PlayerState::Buffering => "  buffering…",
                    PlayerState::Ended => "  finished",
                    _ => "",
                };
                Line::from(vec![
                    Span::styled(
                        format!("{} ", playback_icon(&state)),
                        Style::default().fg(colors::PRIMARY),
                    ),
                    Span::raw(title),
                    Span::styled(detail, Style::default().fg(colors::NEUTRAL)),
                    Span::styled(
                        format!("   vol {}%", self.player.volume()),
                        Style::default().fg(colors::NEUTRAL),
                    ),
                ])
            }
        };
        info.render(info_area, buf);

        let clock = format!("{} / {}", format_millis(position), format_millis(duration));
        Gauge::default()
            .ratio(progress.percent() / 100.0)
            .label(Span::styled(clock, Style::default().fg(Color::White)))
            .gauge_style(Style::default().fg(colors::PRIMARY).bg(colors::BACKGROUND))
            .use_unicode(true)
            .render(gauge_area, buf);
    }
}
