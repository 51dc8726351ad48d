use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::content::album::{AlbumRecord, Track};
use crate::ui::{
    context::AppContext,
    state::AppState,
    traits::{Action, View},
    util::centered_rect,
};
use crate::util::{colors, time::format_time};

/// Overlay with the full album: prose, cover path and the ordered track
/// list with play / download / lyrics affordances.
pub struct AlbumDetail {
    album_id: String,
    title: String,
    release_date: String,
    cover_path: String,
    content: Text<'static>,
    tracks: Vec<Track>,
    track_paths: Vec<String>,
    list_state: ListState,
    content_area: Rect,
}

impl AlbumDetail {
    pub fn new(album: &AlbumRecord) -> Self {
        let tracks = album.tracks();
        let track_paths = tracks.iter().map(|t| album.track_path(t)).collect();
        let mut list_state = ListState::default();
        if !tracks.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            album_id: album.id().to_string(),
            title: album.metadata().title().to_string(),
            release_date: album.metadata().release_date().to_string(),
            cover_path: album.cover_path(),
            content: album.content().clone(),
            tracks,
            track_paths,
            list_state,
            content_area: Rect::default(),
        }
    }

    fn selected(&self) -> Option<usize> {
        self.list_state.selected().filter(|i| *i < self.tracks.len())
    }
}

#[async_trait]
impl View for AlbumDetail {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState, ctx: &AppContext) {
        let overlay = centered_rect(area, 80, 80);
        self.content_area = overlay;
        f.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::SECONDARY))
            .padding(Padding::horizontal(1))
            .title(format!(" {} ", self.title))
            .title_bottom(" Enter: play · d: download · l: lyrics · Esc: close ");
        let inner = block.inner(overlay);
        f.render_widget(block, overlay);

        let [header_area, prose_area, tracks_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Percentage(35),
            Constraint::Min(4),
        ])
        .areas(inner);

        let header = Paragraph::new(Line::styled(
            format!(
                "{} · {} tracks · {}",
                self.release_date,
                self.tracks.len(),
                self.cover_path
            ),
            Style::default().fg(colors::NEUTRAL),
        ));
        f.render_widget(header, header_area);

        let prose = Paragraph::new(self.content.clone()).wrap(Wrap { trim: false });
        f.render_widget(prose, prose_area);

        let playing_path = ctx.player.current_path();
        let is_playing = ctx.player.is_playing();
        let items: Vec<ListItem> = self
            .tracks
            .iter()
            .enumerate()
            .map(|(i, track)| {
                let current = playing_path.as_deref() == Some(self.track_paths[i].as_str());
                let marker = if current {
                    if is_playing { " " } else { " " }
                } else {
                    "   "
                };

                let mut spans = vec![
                    Span::styled(marker, Style::default().fg(colors::ACCENT)),
                    Span::styled(
                        format!("{:02}  ", i + 1),
                        Style::default().fg(colors::NEUTRAL),
                    ),
                    Span::raw(track.title.clone()),
                    Span::styled(
                        format!("  {}", format_time(track.duration)),
                        Style::default().fg(colors::NEUTRAL),
                    ),
                ];
                if track.lyrics.is_some() {
                    spans.push(Span::styled(
                        "  [lyrics]",
                        Style::default().fg(colors::ACCENT),
                    ));
                }

                let mut item = ListItem::new(Line::from(spans));
                if current {
                    item = item.style(Style::default().add_modifier(Modifier::BOLD));
                }
                item
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::TOP))
            .highlight_style(
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        f.render_stateful_widget(list, tracks_area, &mut self.list_state);
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        _ctx: &AppContext,
    ) -> Option<Action> {
        let len = self.tracks.len();
        match key.code {
            KeyCode::Esc => Some(Action::CloseOverlay),
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
            KeyCode::Enter | KeyCode::Char('p') => {
                self.selected().map(|track_index| Action::PlayTrack {
                    album_id: self.album_id.clone(),
                    track_index,
                })
            }
            KeyCode::Char('d') => self.selected().map(|track_index| Action::Download {
                album_id: self.album_id.clone(),
                track_index,
            }),
            KeyCode::Char('l') => self
                .selected()
                .filter(|i| self.tracks[*i].lyrics.is_some())
                .map(|track_index| Action::OpenLyrics {
                    album_id: self.album_id.clone(),
                    track_index,
                }),
            _ => None,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, _ctx: &AppContext) -> Option<Action> {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            let click = Position::new(mouse.column, mouse.row);
            if !self.content_area.contains(click) {
                return Some(Action::CloseOverlay);
            }
        }
        None
    }
}
