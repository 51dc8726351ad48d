use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding},
};
use unicode_width::UnicodeWidthStr;

use crate::ui::{
    context::AppContext,
    state::AppState,
    traits::{Action, View},
};
use crate::util::colors;

const TITLE_WIDTH: usize = 42;

struct Card {
    id: String,
    title: String,
    release_date: String,
    track_count: usize,
    cover_path: String,
    featured: bool,
}

/// The album catalogue: one card per discovered album, in index order.
pub struct MusicView {
    cards: Vec<Card>,
    list_state: ListState,
    built: bool,
}

impl MusicView {
    pub fn new() -> Self {
        Self {
            cards: Vec::new(),
            list_state: ListState::default(),
            built: false,
        }
    }

    fn build_cards(&mut self, ctx: &AppContext) {
        self.cards = ctx
            .store
            .albums()
            .iter()
            .map(|album| Card {
                id: album.id().to_string(),
                title: truncate(album.metadata().title(), TITLE_WIDTH),
                release_date: album.metadata().release_date().to_string(),
                track_count: album.tracks().len(),
                cover_path: album.cover_path(),
                featured: album.metadata().featured(),
            })
            .collect();
        if !self.cards.is_empty() {
            self.list_state.select(Some(0));
        }
        self.built = true;
    }

    fn selected_id(&self) -> Option<&str> {
        self.list_state
            .selected()
            .and_then(|i| self.cards.get(i))
            .map(|card| card.id.as_str())
    }
}

impl Default for MusicView {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl View for MusicView {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState, ctx: &AppContext) {
        if !self.built {
            self.build_cards(ctx);
        }

        let playing_album = ctx.player.current_path();
        let items: Vec<ListItem> = self
            .cards
            .iter()
            .map(|card| {
                let now_playing = playing_album
                    .as_deref()
                    .is_some_and(|path| path.contains(&format!("/{}/", card.id)));

                let mut title_spans = vec![Span::styled(
                    card.title.clone(),
                    Style::default()
                        .fg(colors::PRIMARY)
                        .add_modifier(Modifier::BOLD),
                )];
                if card.featured {
                    title_spans.push(Span::styled(" ★", Style::default().fg(colors::PRIMARY)));
                }
                if now_playing {
                    title_spans.push(Span::styled(" ♫", Style::default().fg(colors::ACCENT)));
                }

                ListItem::new(vec![
                    Line::from(title_spans),
                    Line::styled(
                        format!(
                            "{} · {} tracks · {}",
                            card.release_date, card.track_count, card.cover_path
                        ),
                        Style::default().fg(colors::NEUTRAL),
                    ),
                    Line::default(),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .padding(Padding::horizontal(1))
                    .title(" music ")
                    .title_bottom(" Enter: album · p: play "),
            )
            .highlight_style(Style::default().bg(colors::BACKGROUND))
            .highlight_symbol("▌ ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        _ctx: &AppContext,
    ) -> Option<Action> {
        let len = self.cards.len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 {
                    let i = self
                        .list_state
                        .selected()
                        .map_or(0, |i| (i + 1).min(len - 1));
                    self.list_state.select(Some(i));
                }
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if len > 0 {
                    let i = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
                    self.list_state.select(Some(i));
                }
                None
            }
            KeyCode::Enter => self
                .selected_id()
                .map(|id| Action::OpenAlbum(id.to_string())),
            KeyCode::Char('p') => self.selected_id().map(|id| Action::PlayTrack {
                album_id: id.to_string(),
                track_index: 0,
            }),
            _ => None,
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        if out.width() + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}
