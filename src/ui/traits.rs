use async_trait::async_trait;
use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Frame, layout::Rect};

use crate::event::events::Event;
use crate::ui::context::AppContext;
use crate::ui::state::AppState;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    /// A navigation target as written on the anchor, e.g. `#music`.
    Navigate(String),
    OpenAlbum(String),
    OpenLyrics {
        album_id: String,
        track_index: usize,
    },
    PlayTrack {
        album_id: String,
        track_index: usize,
    },
    TogglePlayback,
    VolumeUp,
    VolumeDown,
    Download {
        album_id: String,
        track_index: usize,
    },
    CloseOverlay,
}

#[async_trait]
pub trait View: Send {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext);

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action>;

    fn handle_mouse(&mut self, _mouse: MouseEvent, _ctx: &AppContext) -> Option<Action> {
        None
    }

    async fn on_event(&mut self, _event: &Event, _ctx: &AppContext) {}
}
