use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::content::document::{Metadata, ParsedDocument};

pub const ALBUMS_ROOT: &str = "content/albums";
pub const COVER_FILE: &str = "cover.jpg";
pub const INFO_FILE: &str = "info.md";

/// A parsed album document keyed by its directory identifier. The cover,
/// track and lyrics paths are derived from the identifier on demand, never
/// stored in metadata.
#[derive(Debug, Clone)]
pub struct AlbumRecord {
    id: String,
    document: ParsedDocument,
}

impl AlbumRecord {
    pub fn new(id: impl Into<String>, document: ParsedDocument) -> Self {
        Self {
            id: id.into(),
            document,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn metadata(&self) -> &Metadata {
        &self.document.metadata
    }

    pub fn content(&self) -> &ratatui::text::Text<'static> {
        &self.document.content
    }

    pub fn info_path(id: &str) -> String {
        format!("{ALBUMS_ROOT}/{id}/{INFO_FILE}")
    }

    pub fn cover_path(&self) -> String {
        format!("{ALBUMS_ROOT}/{}/{COVER_FILE}", self.id)
    }

    pub fn tracks_dir(&self) -> String {
        format!("{ALBUMS_ROOT}/{}/tracks", self.id)
    }

    pub fn lyrics_dir(&self) -> String {
        format!("{ALBUMS_ROOT}/{}/lyrics", self.id)
    }

    pub fn track_path(&self, track: &Track) -> String {
        format!("{}/{}", self.tracks_dir(), track.file)
    }

    pub fn lyrics_path(&self, track: &Track) -> Option<String> {
        track
            .lyrics
            .as_ref()
            .map(|file| format!("{}/{}", self.lyrics_dir(), file))
    }

    /// The `tracks` metadata value holds a JSON array of track objects.
    /// Absent or malformed lists degrade to an empty catalogue entry.
    pub fn tracks(&self) -> Vec<Track> {
        let Some(raw) = self.metadata().get("tracks") else {
            return Vec::new();
        };
        match serde_json::from_str(raw) {
            Ok(tracks) => tracks,
            Err(err) => {
                warn!(album = %self.id, "malformed tracks list: {err}");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    pub title: String,
    pub file: String,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub duration: Option<f64>,
    #[serde(default)]
    pub lyrics: Option<String>,
}

/// Authors write durations as numbers or numeric strings; anything else
/// displays as 0:00 rather than sinking the whole list.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        serde_json::Value::Number(n) => n.as_f64().filter(|s| *s >= 0.0),
        serde_json::Value::String(s) => crate::util::time::parse_duration(&s),
        _ => None,
    }))
}
