use std::path::Path;

use directories::UserDirs;
use ratatui::crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};
use tracing::warn;

use crate::{
    content::{album::Track, document},
    event::events::Event,
    http::Fetch,
    ui::{
        app::App,
        input::InputHandler,
        traits::Action,
        tui::{TerminalEvent, Tui},
        views::{AlbumDetail, LyricsOverlay},
    },
};

pub struct EventHandler;

impl EventHandler {
    pub async fn handle_events(app: &mut App, tui: &mut Tui) -> color_eyre::Result<()> {
        if let Some(evt) = tui.next().await {
            Self::handle_terminal_event(app, evt, tui).await?;
        }

        while let Ok(evt) = app.event_rx.try_recv() {
            Self::handle_app_event(app, evt).await;
        }

        Ok(())
    }

    async fn handle_terminal_event(
        app: &mut App,
        evt: TerminalEvent,
        tui: &mut Tui,
    ) -> color_eyre::Result<()> {
        match evt {
            TerminalEvent::Tick | TerminalEvent::Resize(_, _) => {}
            TerminalEvent::FocusGained => {
                app.has_focus = true;
                tui.clear()?;
            }
            TerminalEvent::FocusLost => app.has_focus = false,
            TerminalEvent::Key(key) => Self::handle_key_event(app, key).await,
            TerminalEvent::Mouse(mouse) => Self::handle_mouse_event(app, mouse).await,
        }
        Ok(())
    }

    async fn handle_key_event(app: &mut App, key: KeyEvent) {
        // The focused layer gets first refusal; leftovers are global keys.
        if let Some(action) = app.router.handle_input(key, &app.state, &app.ctx).await {
            Self::dispatch_action(app, action).await;
            return;
        }
        if let Some(action) = InputHandler::handle_key(key, app.router.section()) {
            Self::dispatch_action(app, action).await;
        }
    }

    async fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
        if let Some(action) = app.router.handle_mouse(mouse, &app.ctx) {
            Self::dispatch_action(app, action).await;
            return;
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => app.ctx.player.volume_up(2),
            MouseEventKind::ScrollDown => app.ctx.player.volume_down(2),
            _ => {}
        }
    }

    async fn dispatch_action(app: &mut App, action: Action) {
        match action {
            Action::Quit => app.should_quit = true,
            Action::Navigate(target) => app.router.navigate(&target),
            Action::TogglePlayback => app.ctx.player.toggle(),
            Action::VolumeUp => app.ctx.player.volume_up(5),
            Action::VolumeDown => app.ctx.player.volume_down(5),
            Action::CloseOverlay => app.router.pop_overlay(),
            Action::OpenAlbum(album_id) => match app.ctx.store.album(&album_id) {
                Some(album) => app.router.push_overlay(Box::new(AlbumDetail::new(album))),
                None => warn!("album '{album_id}' is not in the store"),
            },
            Action::PlayTrack {
                album_id,
                track_index,
            } => {
                let Some((track, path)) = resolve_track(app, &album_id, track_index) else {
                    return;
                };
                if app.ctx.player.current_path().as_deref() == Some(path.as_str()) {
                    app.ctx.player.toggle();
                } else {
                    app.ctx
                        .player
                        .load_track(&track.title, &path, track.duration);
                    app.ctx.player.toggle();
                }
            }
            Action::OpenLyrics {
                album_id,
                track_index,
            } => {
                let Some(album) = app.ctx.store.album(&album_id) else {
                    warn!("album '{album_id}' is not in the store");
                    return;
                };
                let Some(track) = album.tracks().get(track_index).cloned() else {
                    return;
                };
                let Some(path) = album.lyrics_path(&track) else {
                    return;
                };

                app.router
                    .push_overlay(Box::new(LyricsOverlay::new(&track.title)));

                // Always a fresh fetch; lyrics are not part of the store.
                let client = app.ctx.client.clone();
                let event_tx = app.ctx.event_tx.clone();
                app.tasks.spawn("lyrics", async move {
                    let document = document::load_from(client.as_ref(), &path).await;
                    let _ = event_tx.send(Event::LyricsFetched {
                        track_title: track.title,
                        document,
                    });
                });
            }
            Action::Download {
                album_id,
                track_index,
            } => {
                let Some((track, path)) = resolve_track(app, &album_id, track_index) else {
                    return;
                };
                let client = app.ctx.client.clone();
                let event_tx = app.ctx.event_tx.clone();
                app.tasks.spawn(&format!("download:{path}"), async move {
                    let event = match client.fetch_bytes(&path).await {
                        Ok(bytes) => {
                            let dir = UserDirs::new()
                                .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
                                .unwrap_or_else(std::env::temp_dir);
                            let dest = dir.join(&track.file);
                            match tokio::fs::write(&dest, &bytes).await {
                                Ok(()) => Event::DownloadFinished(dest.display().to_string()),
                                Err(err) => Event::DownloadFailed(err.to_string()),
                            }
                        }
                        Err(err) => Event::DownloadFailed(err.to_string()),
                    };
                    let _ = event_tx.send(event);
                });
            }
        }
    }

    async fn handle_app_event(app: &mut App, event: Event) {
        app.router.on_event(&event, &app.ctx).await;

        match event {
            Event::TrackStarted { title } => {
                app.state.status = Some(format!("playing {title}"));
            }
            Event::PlaybackFailed(msg) => {
                app.state.status = Some(format!("playback failed: {msg}"));
            }
            Event::DownloadFinished(dest) => {
                app.state.status = Some(format!("saved {dest}"));
            }
            Event::DownloadFailed(msg) => {
                app.state.status = Some(format!("download failed: {msg}"));
            }
            Event::TrackEnded | Event::LyricsFetched { .. } => {}
        }
    }
}

fn resolve_track(app: &App, album_id: &str, track_index: usize) -> Option<(Track, String)> {
    let Some(album) = app.ctx.store.album(album_id) else {
        warn!("album '{album_id}' is not in the store");
        return None;
    };
    let tracks = album.tracks();
    let Some(track) = tracks.get(track_index) else {
        warn!("album '{album_id}' has no track {track_index}");
        return None;
    };
    Some((track.clone(), album.track_path(track)))
}
