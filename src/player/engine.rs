use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

pub type TrackSource = Decoder<Cursor<Vec<u8>>>;

/// What the player needs from an audio backend. The controller's state
/// machine is written against this seam; tests drive it with a silent
/// implementation instead of a real output device.
pub trait AudioOutput: Send + Sync {
    fn append(&self, source: TrackSource);
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    fn is_paused(&self) -> bool;
    fn is_empty(&self) -> bool;
    fn position(&self) -> Duration;
    fn set_volume(&self, volume: f32);
}

/// Owns the output stream, which must outlive every sound and is not
/// sendable across tasks. Only the sink handle is shared with the
/// controller's background work.
pub struct PlayerEngine {
    _stream: OutputStream,
    sink: Arc<Sink>,
}

impl PlayerEngine {
    pub fn new() -> color_eyre::Result<Self> {
        let stream = OutputStreamBuilder::open_default_stream()?;
        let sink = Arc::new(Sink::connect_new(stream.mixer()));

        Ok(Self {
            _stream: stream,
            sink,
        })
    }

    pub fn output(&self) -> Arc<Sink> {
        self.sink.clone()
    }
}

impl AudioOutput for Sink {
    fn append(&self, source: TrackSource) {
        Sink::append(self, source);
    }

    fn play(&self) {
        Sink::play(self);
    }

    fn pause(&self) {
        Sink::pause(self);
    }

    fn stop(&self) {
        Sink::stop(self);
    }

    fn is_paused(&self) -> bool {
        Sink::is_paused(self)
    }

    fn is_empty(&self) -> bool {
        self.empty()
    }

    fn position(&self) -> Duration {
        self.get_pos()
    }

    fn set_volume(&self, volume: f32) {
        Sink::set_volume(self, volume);
    }
}
