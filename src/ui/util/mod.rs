pub mod handler;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

use crate::player::PlayerState;

pub fn playback_icon(state: &PlayerState) -> &'static str {
    match state {
        PlayerState::Playing => "",
        PlayerState::Buffering => "",
        _ => "",
    }
}

/// Centers a percentage-sized box inside `area`, for overlays.
pub fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    area
}
