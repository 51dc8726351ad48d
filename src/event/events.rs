use crate::content::document::ParsedDocument;

/// Application events delivered over the flume bus. Background tasks
/// (playback start, lyrics fetch, downloads) report back here; the UI
/// thread drains the channel between frames.
#[derive(Debug, Clone)]
pub enum Event {
    TrackStarted { title: String },
    TrackEnded,
    PlaybackFailed(String),
    LyricsFetched {
        track_title: String,
        document: Option<ParsedDocument>,
    },
    DownloadFinished(String),
    DownloadFailed(String),
}
