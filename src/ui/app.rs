use std::sync::Arc;

use flume::Receiver;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::Style,
    text::Line,
    widgets::Paragraph,
};
use tracing::info;

use crate::{
    content::store::ContentStore,
    event::events::Event,
    http::SiteClient,
    player::{Player, PlayerEngine},
    ui::{
        components::{navbar::NavBar, player_bar::PlayerBar},
        context::AppContext,
        router::Router,
        state::AppState,
        tui,
        util::handler::EventHandler,
    },
    util::{colors, task::TaskManager},
};

pub struct App {
    pub event_rx: Receiver<Event>,
    pub ctx: AppContext,
    pub state: AppState,
    pub router: Router,
    pub tasks: TaskManager,
    pub has_focus: bool,
    pub should_quit: bool,
    // Keeps the audio device open; dropping it silences the sink.
    _engine: PlayerEngine,
}

impl App {
    /// Brings the whole site up front: a failed album index is the one
    /// error that aborts startup.
    pub async fn new() -> color_eyre::Result<Self> {
        let (event_tx, event_rx) = flume::unbounded();

        let client = Arc::new(SiteClient::from_env());
        info!("loading site content from {}", client.url(""));
        let store = Arc::new(ContentStore::initialize(client.as_ref()).await?);

        let engine = PlayerEngine::new()?;
        let player = Arc::new(Player::new(
            engine.output(),
            client.clone(),
            event_tx.clone(),
        ));

        Ok(Self {
            event_rx,
            ctx: AppContext {
                store,
                player,
                client,
                event_tx,
            },
            state: AppState::default(),
            router: Router::new(),
            tasks: TaskManager::new(),
            has_focus: true,
            should_quit: false,
            _engine: engine,
        })
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = tui::Tui::new()?;
        tui.enter()?;

        while !self.should_quit {
            tui.draw(|f| {
                self.ui(f);
            })?;

            EventHandler::handle_events(self, &mut tui).await?;
        }

        self.tasks.abort_all();
        tui.exit()
    }

    fn ui(&mut self, frame: &mut Frame) {
        if !self.has_focus {
            return;
        }

        let [nav_area, content_area, player_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(NavBar::new(self.router.section()), nav_area);
        self.router
            .render(frame, content_area, &self.state, &self.ctx);
        frame.render_widget(PlayerBar::new(&self.ctx.player), player_area);

        if let Some(status) = &self.state.status {
            frame.render_widget(
                Paragraph::new(Line::styled(
                    format!(" {status}"),
                    Style::default().fg(colors::NEUTRAL),
                )),
                status_area,
            );
        }
    }
}
