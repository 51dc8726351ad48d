use std::io::Cursor;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use flume::Sender;
use rodio::Decoder;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::event::events::Event;
use crate::http::Fetch;
use crate::player::engine::AudioOutput;
use crate::player::error::PlaybackError;
use crate::player::progress::TrackProgress;

const MONITOR_INTERVAL: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerState {
    /// Paused, whether or not a source is loaded.
    Idle,
    /// A start request is fetching and decoding the source.
    Buffering,
    Playing,
    /// The source ran out; it stays loaded and can be restarted.
    Ended,
    Errored(PlaybackError),
}

#[derive(Debug, Clone)]
struct LoadedTrack {
    title: String,
    path: String,
    /// Fetched audio kept around so Ended can restart without refetching.
    bytes: Option<Arc<Vec<u8>>>,
}

/// The playback widget's state machine. Transitions happen on the caller's
/// thread where they are synchronous (pause, load) and on a spawned start
/// task where they are not (fetch + decode); a monitor task notices the
/// source running dry.
pub struct Player {
    output: Arc<dyn AudioOutput>,
    fetch: Arc<dyn Fetch>,
    state: Arc<RwLock<PlayerState>>,
    progress: Arc<TrackProgress>,
    current: Arc<RwLock<Option<LoadedTrack>>>,
    volume: Arc<AtomicU8>,
    event_tx: Sender<Event>,
    start_task: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    pub fn new(
        output: Arc<dyn AudioOutput>,
        fetch: Arc<dyn Fetch>,
        event_tx: Sender<Event>,
    ) -> Self {
        let player = Self {
            output,
            fetch,
            state: Arc::new(RwLock::new(PlayerState::Idle)),
            progress: Arc::new(TrackProgress::new()),
            current: Arc::new(RwLock::new(None)),
            volume: Arc::new(AtomicU8::new(100)),
            event_tx,
            start_task: Mutex::new(None),
        };
        player.spawn_monitor();
        player
    }

    /// Points the widget at a new source. Always lands in `Idle` with zero
    /// progress, no matter what the widget was doing before.
    pub fn load_track(&self, title: &str, path: &str, duration_secs: Option<f64>) {
        self.abort_start();
        self.output.stop();

        self.progress.reset();
        if let Some(secs) = duration_secs.filter(|s| s.is_finite() && *s >= 0.0) {
            self.progress.set_duration(Duration::from_secs_f64(secs));
        }

        *self.current.write().unwrap() = Some(LoadedTrack {
            title: title.to_string(),
            path: path.to_string(),
            bytes: None,
        });
        self.set_state(PlayerState::Idle);
        debug!("loaded track '{title}' from {path}");
    }

    /// Pause when playing, otherwise request a start. Pausing is
    /// synchronous; starting goes through `Buffering` on a background task
    /// and lands in `Playing` or `Errored`.
    pub fn toggle(&self) {
        match self.state() {
            PlayerState::Playing => {
                self.output.pause();
                self.set_state(PlayerState::Idle);
            }
            PlayerState::Buffering => {
                // A second press while buffering withdraws the request.
                self.abort_start();
                self.set_state(PlayerState::Idle);
                info!("playback start {}", PlaybackError::Aborted);
            }
            PlayerState::Idle | PlayerState::Ended | PlayerState::Errored(_) => {
                self.request_start();
            }
        }
    }

    fn request_start(&self) {
        let Some(track) = self.current.read().unwrap().clone() else {
            debug!("toggle with no track loaded");
            return;
        };

        // A paused source is still sitting in the sink; resume in place.
        if self.state() == PlayerState::Idle && !self.output.is_empty() {
            self.output.play();
            self.set_state(PlayerState::Playing);
            return;
        }

        self.set_state(PlayerState::Buffering);

        let output = self.output.clone();
        let fetch = self.fetch.clone();
        let state = self.state.clone();
        let progress = self.progress.clone();
        let current = self.current.clone();
        let volume = self.volume.clone();
        let event_tx = self.event_tx.clone();

        let handle = tokio::spawn(async move {
            match start_playback(track, &*fetch, &*output, &progress, &current, &volume).await
            {
                Ok(title) => {
                    *state.write().unwrap() = PlayerState::Playing;
                    let _ = event_tx.send(Event::TrackStarted { title });
                }
                Err(err) => {
                    warn!("playback failed ({}): {err}", err.kind());
                    let _ = event_tx.send(Event::PlaybackFailed(err.to_string()));
                    *state.write().unwrap() = PlayerState::Errored(err);
                }
            }
        });
        if let Some(previous) = self.start_task.lock().unwrap().replace(handle) {
            previous.abort();
        }
    }

    fn spawn_monitor(&self) {
        let output = self.output.clone();
        let state = self.state.clone();
        let progress = self.progress.clone();
        let event_tx = self.event_tx.clone();

        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(MONITOR_INTERVAL);
            loop {
                ticks.tick().await;
                if *state.read().unwrap() != PlayerState::Playing {
                    continue;
                }
                progress.set_position(output.position());
                if output.is_empty() {
                    // Visually back to the start, source stays loaded.
                    progress.reset_position();
                    *state.write().unwrap() = PlayerState::Ended;
                    let _ = event_tx.send(Event::TrackEnded);
                }
            }
        });
    }

    fn abort_start(&self) {
        if let Some(handle) = self.start_task.lock().unwrap().take() {
            handle.abort();
        }
    }

    fn set_state(&self, state: PlayerState) {
        *self.state.write().unwrap() = state;
    }

    pub fn state(&self) -> PlayerState {
        self.state.read().unwrap().clone()
    }

    pub fn is_playing(&self) -> bool {
        self.state() == PlayerState::Playing
    }

    pub fn current_title(&self) -> Option<String> {
        self.current.read().unwrap().as_ref().map(|t| t.title.clone())
    }

    pub fn current_path(&self) -> Option<String> {
        self.current.read().unwrap().as_ref().map(|t| t.path.clone())
    }

    pub fn progress(&self) -> Arc<TrackProgress> {
        self.progress.clone()
    }

    pub fn volume(&self) -> u8 {
        self.volume.load(Ordering::Relaxed)
    }

    pub fn set_volume(&self, volume: u8) {
        self.volume.store(volume.min(100), Ordering::Relaxed);
        self.apply_volume();
    }

    pub fn volume_up(&self, amount: u8) {
        self.set_volume(self.volume().saturating_add(amount));
    }

    pub fn volume_down(&self, amount: u8) {
        self.set_volume(self.volume().saturating_sub(amount));
    }

    fn apply_volume(&self) {
        self.output.set_volume(self.volume() as f32 / 100.0);
    }
}

async fn start_playback(
    track: LoadedTrack,
    fetch: &dyn Fetch,
    output: &dyn AudioOutput,
    progress: &TrackProgress,
    current: &RwLock<Option<LoadedTrack>>,
    volume: &AtomicU8,
) -> Result<String, PlaybackError> {
    let bytes = match track.bytes {
        Some(bytes) => bytes,
        None => {
            let fetched = Arc::new(fetch.fetch_bytes(&track.path).await?);
            let mut current = current.write().unwrap();
            match current.as_mut() {
                // Keep the source for an Ended restart, unless the widget
                // was pointed elsewhere while we fetched.
                Some(loaded) if loaded.path == track.path => {
                    loaded.bytes = Some(fetched.clone());
                }
                _ => return Err(PlaybackError::Aborted),
            }
            fetched
        }
    };

    let source = Decoder::new(Cursor::new(bytes.as_ref().clone()))?;
    if let Some(total) = rodio::Source::total_duration(&source) {
        progress.set_duration(total);
    }

    output.stop();
    output.append(source);
    output.set_volume(volume.load(Ordering::Relaxed) as f32 / 100.0);
    progress.reset_position();
    output.play();
    Ok(track.title)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;
    use crate::http::FetchError;

    /// Silent output: tracks the paused/empty flags the controller and
    /// monitor read, without touching an audio device.
    struct NullOutput {
        paused: AtomicBool,
        empty: AtomicBool,
    }

    impl NullOutput {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                paused: AtomicBool::new(true),
                empty: AtomicBool::new(true),
            })
        }

        fn drain(&self) {
            self.empty.store(true, Ordering::SeqCst);
        }
    }

    impl AudioOutput for NullOutput {
        fn append(&self, _source: crate::player::engine::TrackSource) {
            self.empty.store(false, Ordering::SeqCst);
        }

        fn play(&self) {
            self.paused.store(false, Ordering::SeqCst);
        }

        fn pause(&self) {
            self.paused.store(true, Ordering::SeqCst);
        }

        fn stop(&self) {
            self.empty.store(true, Ordering::SeqCst);
            self.paused.store(true, Ordering::SeqCst);
        }

        fn is_paused(&self) -> bool {
            self.paused.load(Ordering::SeqCst)
        }

        fn is_empty(&self) -> bool {
            self.empty.load(Ordering::SeqCst)
        }

        fn position(&self) -> Duration {
            Duration::from_secs(1)
        }

        fn set_volume(&self, _volume: f32) {}
    }

    struct StubFetch {
        bytes: Option<Vec<u8>>,
        fetches: AtomicUsize,
    }

    impl StubFetch {
        fn serving(bytes: Vec<u8>) -> Arc<Self> {
            Arc::new(Self {
                bytes: Some(bytes),
                fetches: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                bytes: None,
                fetches: AtomicUsize::new(0),
            })
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetch for StubFetch {
        async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
            self.fetch_bytes(path)
                .await
                .map(|b| String::from_utf8_lossy(&b).into_owned())
        }

        async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.bytes.clone().ok_or_else(|| FetchError::Status {
                path: path.to_string(),
                status: StatusCode::NOT_FOUND,
            })
        }
    }

    /// Minimal mono 16-bit PCM WAV the default decoder accepts.
    fn wav_bytes() -> Vec<u8> {
        let sample_rate: u32 = 8000;
        let samples: Vec<i16> = (0..800).map(|i| ((i % 64) * 512) as i16).collect();
        let data_len = (samples.len() * 2) as u32;

        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for sample in samples {
            out.extend_from_slice(&sample.to_le_bytes());
        }
        out
    }

    async fn wait_for(player: &Player, target: fn(&PlayerState) -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if target(&player.state()) {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("player never reached the expected state");
    }

    fn player_with(
        output: Arc<NullOutput>,
        fetch: Arc<StubFetch>,
    ) -> (Player, flume::Receiver<Event>) {
        let (tx, rx) = flume::unbounded();
        (Player::new(output, fetch, tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn load_track_resets_progress_and_state_from_playing() {
        let output = NullOutput::new();
        let (player, _rx) = player_with(output.clone(), StubFetch::serving(wav_bytes()));

        player.load_track("Dawn", "tracks/dawn.wav", Some(203.0));
        player.toggle();
        wait_for(&player, |s| *s == PlayerState::Playing).await;

        player.load_track("Dusk", "tracks/dusk.wav", Some(184.0));
        assert_eq!(player.state(), PlayerState::Idle);
        let (position, duration) = player.progress().get();
        assert_eq!(position, 0);
        assert_eq!(duration, 184_000);
        assert_eq!(player.progress().percent(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn load_track_resets_progress_and_state_from_errored() {
        let (player, _rx) = player_with(NullOutput::new(), StubFetch::failing());

        player.load_track("Dawn", "tracks/dawn.wav", None);
        player.toggle();
        wait_for(&player, |s| matches!(s, PlayerState::Errored(_))).await;

        player.load_track("Dusk", "tracks/dusk.wav", None);
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(player.progress().get(), (0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_pauses_synchronously_and_resumes_without_refetching() {
        let output = NullOutput::new();
        let fetch = StubFetch::serving(wav_bytes());
        let (player, _rx) = player_with(output.clone(), fetch.clone());

        player.load_track("Dawn", "tracks/dawn.wav", None);
        player.toggle();
        wait_for(&player, |s| *s == PlayerState::Playing).await;

        player.toggle();
        assert_eq!(player.state(), PlayerState::Idle);
        assert!(output.is_paused());

        player.toggle();
        assert_eq!(player.state(), PlayerState::Playing);
        assert_eq!(fetch.fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_lands_in_errored_network() {
        let (player, rx) = player_with(NullOutput::new(), StubFetch::failing());

        player.load_track("Dawn", "tracks/dawn.wav", None);
        player.toggle();
        wait_for(&player, |s| matches!(s, PlayerState::Errored(_))).await;

        let PlayerState::Errored(err) = player.state() else {
            unreachable!()
        };
        assert_eq!(err.kind(), "network");
        assert!(rx
            .try_iter()
            .any(|e| matches!(e, Event::PlaybackFailed(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn undecodable_bytes_land_in_errored_unsupported() {
        let (player, _rx) =
            player_with(NullOutput::new(), StubFetch::serving(b"not audio".to_vec()));

        player.load_track("Dawn", "tracks/dawn.wav", None);
        player.toggle();
        wait_for(&player, |s| matches!(s, PlayerState::Errored(_))).await;

        let PlayerState::Errored(err) = player.state() else {
            unreachable!()
        };
        assert!(matches!(err.kind(), "unsupported" | "decode"));
    }

    #[tokio::test(start_paused = true)]
    async fn drained_source_transitions_to_ended_and_restarts_from_cache() {
        let output = NullOutput::new();
        let fetch = StubFetch::serving(wav_bytes());
        let (player, rx) = player_with(output.clone(), fetch.clone());

        player.load_track("Dawn", "tracks/dawn.wav", Some(203.0));
        player.toggle();
        wait_for(&player, |s| *s == PlayerState::Playing).await;

        output.drain();
        wait_for(&player, |s| *s == PlayerState::Ended).await;
        let (position, _) = player.progress().get();
        assert_eq!(position, 0);
        assert!(rx.try_iter().any(|e| matches!(e, Event::TrackEnded)));

        // Toggle after Ended starts over without another fetch.
        player.toggle();
        wait_for(&player, |s| *s == PlayerState::Playing).await;
        assert_eq!(fetch.fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_with_nothing_loaded_is_a_no_op() {
        let (player, _rx) = player_with(NullOutput::new(), StubFetch::failing());
        player.toggle();
        assert_eq!(player.state(), PlayerState::Idle);
    }
}
