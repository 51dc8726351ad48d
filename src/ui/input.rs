use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::components::navbar::NAV_ENTRIES;
use crate::ui::traits::Action;

/// Keys that apply regardless of the active view. Views get first refusal;
/// anything they leave alone lands here.
pub struct InputHandler;

impl InputHandler {
    pub fn handle_key(key: KeyEvent, active_section: &str) -> Option<Action> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Action::Quit),
            (KeyCode::Char('q'), _) => Some(Action::Quit),
            (KeyCode::Char(' '), _) => Some(Action::TogglePlayback),
            (KeyCode::Char('+' | '='), _) => Some(Action::VolumeUp),
            (KeyCode::Char('-'), _) => Some(Action::VolumeDown),
            (KeyCode::Tab, _) => Some(Action::Navigate(cycled(active_section, 1))),
            (KeyCode::BackTab, _) => Some(Action::Navigate(cycled(active_section, -1))),
            (KeyCode::Char(c @ '1'..='4'), _) => {
                let index = c as usize - '1' as usize;
                NAV_ENTRIES
                    .get(index)
                    .map(|entry| Action::Navigate(entry.target.to_string()))
            }
            _ => None,
        }
    }
}

fn cycled(active_section: &str, step: isize) -> String {
    let current = NAV_ENTRIES
        .iter()
        .position(|entry| entry.target.trim_start_matches('#') == active_section)
        .unwrap_or(0);
    let next = (current as isize + step).rem_euclid(NAV_ENTRIES.len() as isize) as usize;
    NAV_ENTRIES[next].target.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn digits_map_to_nav_targets() {
        assert_eq!(
            InputHandler::handle_key(key(KeyCode::Char('2')), "home"),
            Some(Action::Navigate("#music".to_string()))
        );
    }

    #[test]
    fn tab_cycles_and_wraps() {
        assert_eq!(
            InputHandler::handle_key(key(KeyCode::Tab), "news"),
            Some(Action::Navigate("#home".to_string()))
        );
        assert_eq!(
            InputHandler::handle_key(key(KeyCode::BackTab), "home"),
            Some(Action::Navigate("#news".to_string()))
        );
    }

    #[test]
    fn space_toggles_playback() {
        assert_eq!(
            InputHandler::handle_key(key(KeyCode::Char(' ')), "home"),
            Some(Action::TogglePlayback)
        );
    }
}
