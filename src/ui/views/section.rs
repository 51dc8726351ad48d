use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};
use tracing::warn;

use crate::ui::{
    context::AppContext,
    state::AppState,
    traits::{Action, View},
};
use crate::util::colors;

/// Renders one of the prose sections (home, about, news) from the store's
/// static cache. Home additionally carries the featured-album strip.
pub struct StaticSection {
    name: String,
    scroll: u16,
    warned_missing: bool,
}

impl StaticSection {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            scroll: 0,
            warned_missing: false,
        }
    }

    fn is_home(&self) -> bool {
        self.name == "home"
    }
}

#[async_trait]
impl View for StaticSection {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState, ctx: &AppContext) {
        let featured = if self.is_home() {
            ctx.store.featured_album()
        } else {
            None
        };

        let [prose_area, featured_area] = match featured {
            Some(_) => Layout::vertical([Constraint::Min(0), Constraint::Length(4)]).areas(area),
            None => [area, Rect::default()],
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1))
            .title(format!(" {} ", self.name));

        match ctx.store.static_doc(&self.name) {
            Some(doc) => {
                let paragraph = Paragraph::new(doc.content.clone())
                    .wrap(Wrap { trim: false })
                    .scroll((self.scroll, 0))
                    .block(block);
                f.render_widget(paragraph, prose_area);
            }
            None => {
                // The slot stays as it is; nothing gets cleared over it.
                if !self.warned_missing {
                    warn!("no static document cached for section '{}'", self.name);
                    self.warned_missing = true;
                }
                f.render_widget(block, prose_area);
            }
        }

        if let Some(album) = featured {
            let tracks = album.tracks().len();
            let strip = Paragraph::new(vec![
                Line::from(vec![
                    Span::styled("★ ", Style::default().fg(colors::PRIMARY)),
                    Span::styled(
                        album.metadata().title().to_string(),
                        Style::default()
                            .fg(colors::PRIMARY)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {} · {} tracks", album.metadata().release_date(), tracks),
                        Style::default().fg(colors::NEUTRAL),
                    ),
                ]),
                Line::styled("Enter: open album", Style::default().fg(colors::NEUTRAL)),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors::SECONDARY))
                    .title(" featured "),
            );
            f.render_widget(strip, featured_area);
        }
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            KeyCode::Enter if self.is_home() => ctx
                .store
                .featured_album()
                .map(|album| Action::OpenAlbum(album.id().to_string())),
            _ => None,
        }
    }
}
