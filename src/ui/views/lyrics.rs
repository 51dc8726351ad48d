use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};

use crate::content::document::ParsedDocument;
use crate::event::events::Event;
use crate::ui::{
    context::AppContext,
    state::AppState,
    traits::{Action, View},
    util::centered_rect,
};
use crate::util::colors;

/// Secondary overlay showing a track's lyrics document. The document is
/// fetched fresh each time the overlay opens; the result arrives on the
/// event bus.
pub struct LyricsOverlay {
    track_title: String,
    document: Option<ParsedDocument>,
    failed: bool,
    scroll: u16,
    content_area: Rect,
}

impl LyricsOverlay {
    pub fn new(track_title: &str) -> Self {
        Self {
            track_title: track_title.to_string(),
            document: None,
            failed: false,
            scroll: 0,
            content_area: Rect::default(),
        }
    }
}

#[async_trait]
impl View for LyricsOverlay {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState, _ctx: &AppContext) {
        let overlay = centered_rect(area, 60, 70);
        self.content_area = overlay;
        f.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::SECONDARY))
            .padding(Padding::horizontal(1))
            .title(format!(" {} — lyrics ", self.track_title))
            .title_bottom(" Esc: close ");

        let paragraph = match (&self.document, self.failed) {
            (Some(doc), _) => Paragraph::new(doc.content.clone())
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            (None, true) => {
                Paragraph::new("lyrics unavailable").style(Style::default().fg(colors::NEUTRAL))
            }
            (None, false) => {
                Paragraph::new("fetching…").style(Style::default().fg(colors::NEUTRAL))
            }
        };
        f.render_widget(paragraph.block(block), overlay);
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        _ctx: &AppContext,
    ) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(Action::CloseOverlay),
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
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

    async fn on_event(&mut self, event: &Event, _ctx: &AppContext) {
        if let Event::LyricsFetched {
            track_title,
            document,
        } = event
        {
            if *track_title == self.track_title {
                match document {
                    Some(doc) => self.document = Some(doc.clone()),
                    None => self.failed = true,
                }
            }
        }
    }
}
