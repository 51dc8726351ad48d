use ratatui::Frame;
use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::Rect;
use tracing::warn;

use crate::event::events::Event;
use crate::ui::context::AppContext;
use crate::ui::state::AppState;
use crate::ui::traits::{Action, View};
use crate::ui::views::{MusicView, StaticSection};

/// Sections in navigation order.
pub const SECTIONS: [&str; 4] = ["home", "music", "about", "news"];

/// Holds the active section view plus a stack of overlays (album detail,
/// and lyrics above it). Input goes to the topmost layer; rendering paints
/// bottom-up so overlays sit over the section.
pub struct Router {
    section: String,
    view: Box<dyn View>,
    overlays: Vec<Box<dyn View>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            section: "home".to_string(),
            view: Box::new(StaticSection::new("home")),
            overlays: Vec::new(),
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// Navigates by anchor target (`#music`). An empty target is a no-op;
    /// a target with no matching section logs and changes nothing.
    pub fn navigate(&mut self, target: &str) {
        let section = target.trim_start_matches('#');
        if section.is_empty() {
            return;
        }
        match view_for(section) {
            Some(view) => {
                self.section = section.to_string();
                self.view = view;
                self.overlays.clear();
            }
            None => warn!("no renderer for section '{section}'"),
        }
    }

    pub fn push_overlay(&mut self, view: Box<dyn View>) {
        self.overlays.push(view);
    }

    pub fn pop_overlay(&mut self) {
        self.overlays.pop();
    }

    pub fn has_overlay(&self) -> bool {
        !self.overlays.is_empty()
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext) {
        self.view.render(f, area, state, ctx);
        for overlay in &mut self.overlays {
            overlay.render(f, area, state, ctx);
        }
    }

    pub async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        match self.overlays.last_mut() {
            Some(overlay) => overlay.handle_input(key, state, ctx).await,
            None => self.view.handle_input(key, state, ctx).await,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, ctx: &AppContext) -> Option<Action> {
        match self.overlays.last_mut() {
            Some(overlay) => overlay.handle_mouse(mouse, ctx),
            None => self.view.handle_mouse(mouse, ctx),
        }
    }

    pub async fn on_event(&mut self, event: &Event, ctx: &AppContext) {
        self.view.on_event(event, ctx).await;
        for overlay in &mut self.overlays {
            overlay.on_event(event, ctx).await;
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

fn view_for(section: &str) -> Option<Box<dyn View>> {
    match section {
        "home" | "about" | "news" => Some(Box::new(StaticSection::new(section))),
        "music" => Some(Box::new(MusicView::new())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_home() {
        assert_eq!(Router::new().section(), "home");
    }

    #[test]
    fn navigates_between_known_sections() {
        let mut router = Router::new();
        router.navigate("#music");
        assert_eq!(router.section(), "music");
        router.navigate("#news");
        assert_eq!(router.section(), "news");
    }

    #[test]
    fn empty_target_is_a_no_op() {
        let mut router = Router::new();
        router.navigate("#music");
        router.navigate("");
        assert_eq!(router.section(), "music");
        router.navigate("#");
        assert_eq!(router.section(), "music");
    }

    #[test]
    fn unknown_target_changes_nothing() {
        let mut router = Router::new();
        router.navigate("#discography");
        assert_eq!(router.section(), "home");
    }

    #[test]
    fn navigation_dismisses_overlays() {
        let mut router = Router::new();
        router.navigate("#music");
        router.push_overlay(Box::new(StaticSection::new("news")));
        assert!(router.has_overlay());
        router.navigate("#about");
        assert!(!router.has_overlay());
    }
}
