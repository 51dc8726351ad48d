pub mod controller;
pub mod engine;
pub mod error;
pub mod progress;

pub use controller::{Player, PlayerState};
pub use engine::{AudioOutput, PlayerEngine};
pub use error::PlaybackError;
pub use progress::TrackProgress;
