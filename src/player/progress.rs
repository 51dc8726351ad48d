use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Display state shared between the playback tasks and the render loop.
/// Plain atomics; readers tolerate a frame of staleness.
#[derive(Debug, Default)]
pub struct TrackProgress {
    position_millis: AtomicU64,
    duration_millis: AtomicU64,
}

impl TrackProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_position(&self, position: Duration) {
        self.position_millis
            .store(position.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn set_duration(&self, duration: Duration) {
        self.duration_millis
            .store(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// (elapsed, total) in milliseconds.
    pub fn get(&self) -> (u64, u64) {
        (
            self.position_millis.load(Ordering::Relaxed),
            self.duration_millis.load(Ordering::Relaxed),
        )
    }

    /// Elapsed over total as 0–100, clamped. Unknown total reads as 0.
    pub fn percent(&self) -> f64 {
        let (position, duration) = self.get();
        if duration == 0 {
            return 0.0;
        }
        (position as f64 / duration as f64 * 100.0).clamp(0.0, 100.0)
    }

    pub fn reset_position(&self) {
        self.position_millis.store(0, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.position_millis.store(0, Ordering::Relaxed);
        self.duration_millis.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_clamped() {
        let progress = TrackProgress::new();
        assert_eq!(progress.percent(), 0.0);

        progress.set_duration(Duration::from_secs(100));
        progress.set_position(Duration::from_secs(50));
        assert_eq!(progress.percent(), 50.0);

        // Positions past the declared duration pin at 100.
        progress.set_position(Duration::from_secs(250));
        assert_eq!(progress.percent(), 100.0);
    }

    #[test]
    fn reset_position_keeps_duration() {
        let progress = TrackProgress::new();
        progress.set_duration(Duration::from_secs(90));
        progress.set_position(Duration::from_secs(30));
        progress.reset_position();
        assert_eq!(progress.get(), (0, 90_000));
    }
}
