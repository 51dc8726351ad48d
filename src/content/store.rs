//! One-shot content discovery. Everything the page can show is fetched and
//! parsed up front; afterwards the store only hands out references.

use std::collections::HashMap;

use futures::future::join_all;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::content::album::AlbumRecord;
use crate::content::document::{self, ParsedDocument};
use crate::http::{Fetch, FetchError};

pub const INDEX_PATH: &str = "content/albums.json";
pub const STATIC_SECTIONS: [&str; 3] = ["home", "about", "news"];

/// Initialization is the only fallible phase, and only the index itself is
/// fatal; individual documents are skipped with a log line.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("album index unavailable: {0}")]
    Index(#[from] FetchError),
    #[error("album index malformed: {0}")]
    IndexFormat(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlbumIndex {
    album_directories: Vec<String>,
}

pub struct ContentStore {
    albums: Vec<AlbumRecord>,
    statics: HashMap<String, ParsedDocument>,
}

impl ContentStore {
    /// Fetches the album index, every album document and every static
    /// section document, then seals the result. There is no mutation API:
    /// a render can never observe a half-built store.
    pub async fn initialize(fetch: &dyn Fetch) -> Result<Self, StoreError> {
        let (albums, statics) =
            tokio::join!(discover_albums(fetch), load_static_content(fetch));
        Ok(Self {
            albums: albums?,
            statics,
        })
    }

    /// Albums in the index's order.
    pub fn albums(&self) -> &[AlbumRecord] {
        &self.albums
    }

    pub fn album(&self, id: &str) -> Option<&AlbumRecord> {
        self.albums.iter().find(|album| album.id() == id)
    }

    pub fn static_doc(&self, name: &str) -> Option<&ParsedDocument> {
        self.statics.get(name)
    }

    /// First album marked featured, if any.
    pub fn featured_album(&self) -> Option<&AlbumRecord> {
        self.albums.iter().find(|album| album.metadata().featured())
    }
}

async fn discover_albums(fetch: &dyn Fetch) -> Result<Vec<AlbumRecord>, StoreError> {
    let raw = fetch.fetch_text(INDEX_PATH).await?;
    let index: AlbumIndex = serde_json::from_str(&raw)?;

    // Documents fetch concurrently; join_all hands results back in index
    // order, so completion timing cannot reorder the catalogue.
    let documents = join_all(index.album_directories.iter().map(|id| async move {
        document::load_from(fetch, &AlbumRecord::info_path(id)).await
    }))
    .await;

    let mut albums = Vec::new();
    for (id, document) in index.album_directories.into_iter().zip(documents) {
        match document {
            Some(document) => albums.push(AlbumRecord::new(id, document)),
            None => warn!("skipping album {id}: info document unavailable"),
        }
    }
    info!("discovered {} albums", albums.len());
    Ok(albums)
}

async fn load_static_content(fetch: &dyn Fetch) -> HashMap<String, ParsedDocument> {
    let documents = join_all(STATIC_SECTIONS.iter().map(|name| async move {
        document::load_from(fetch, &format!("content/{name}.md")).await
    }))
    .await;

    STATIC_SECTIONS
        .iter()
        .zip(documents)
        .filter_map(|(name, document)| document.map(|d| (name.to_string(), d)))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;

    /// Serves canned documents, optionally after a per-path delay, so the
    /// tests can force fetches to resolve out of index order.
    #[derive(Default)]
    struct CannedSite {
        documents: HashMap<String, String>,
        delays: HashMap<String, Duration>,
    }

    impl CannedSite {
        fn with(mut self, path: &str, body: &str) -> Self {
            self.documents.insert(path.to_string(), body.to_string());
            self
        }

        fn delayed(mut self, path: &str, delay: Duration) -> Self {
            self.delays.insert(path.to_string(), delay);
            self
        }
    }

    #[async_trait]
    impl Fetch for CannedSite {
        async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
            if let Some(delay) = self.delays.get(path) {
                tokio::time::sleep(*delay).await;
            }
            self.documents
                .get(path)
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    path: path.to_string(),
                    status: StatusCode::NOT_FOUND,
                })
        }

        async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, FetchError> {
            self.fetch_text(path).await.map(String::into_bytes)
        }
    }

    fn site_with_three_albums() -> CannedSite {
        CannedSite::default()
            .with(
                INDEX_PATH,
                r#"{"albumDirectories": ["first-light", "low-tide", "night-drive"]}"#,
            )
            .with(
                "content/albums/first-light/info.md",
                "---\ntitle: First Light\n---\nDebut.",
            )
            .with(
                "content/albums/low-tide/info.md",
                "---\ntitle: Low Tide\nfeatured: true\n---\n",
            )
            .with(
                "content/albums/night-drive/info.md",
                "---\ntitle: Night Drive\n---\n",
            )
    }

    fn ids(store: &ContentStore) -> Vec<&str> {
        store.albums().iter().map(|a| a.id()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn album_order_matches_index_regardless_of_completion_order() {
        // The first album resolves last; order must still follow the index.
        let site = site_with_three_albums()
            .delayed(
                "content/albums/first-light/info.md",
                Duration::from_secs(5),
            )
            .delayed("content/albums/low-tide/info.md", Duration::from_secs(2));

        let store = ContentStore::initialize(&site).await.unwrap();
        assert_eq!(ids(&store), vec!["first-light", "low-tide", "night-drive"]);
    }

    #[tokio::test]
    async fn one_failed_album_does_not_sink_the_rest() {
        let site = CannedSite::default()
            .with(
                INDEX_PATH,
                r#"{"albumDirectories": ["first-light", "missing", "night-drive"]}"#,
            )
            .with(
                "content/albums/first-light/info.md",
                "---\ntitle: First Light\n---\n",
            )
            .with(
                "content/albums/night-drive/info.md",
                "---\ntitle: Night Drive\n---\n",
            );

        let store = ContentStore::initialize(&site).await.unwrap();
        assert_eq!(ids(&store), vec!["first-light", "night-drive"]);
        assert!(store.album("missing").is_none());
    }

    #[tokio::test]
    async fn index_failure_is_fatal() {
        let site = CannedSite::default();
        assert!(matches!(
            ContentStore::initialize(&site).await,
            Err(StoreError::Index(_))
        ));
    }

    #[tokio::test]
    async fn malformed_index_is_fatal() {
        let site = CannedSite::default().with(INDEX_PATH, "not json");
        assert!(matches!(
            ContentStore::initialize(&site).await,
            Err(StoreError::IndexFormat(_))
        ));
    }

    #[tokio::test]
    async fn static_sections_load_and_failures_leave_gaps() {
        let site = site_with_three_albums()
            .with("content/home.md", "---\ntitle: Home\n---\nWelcome.")
            .with("content/news.md", "News body.");

        let store = ContentStore::initialize(&site).await.unwrap();
        assert!(store.static_doc("home").is_some());
        assert!(store.static_doc("news").is_some());
        assert!(store.static_doc("about").is_none());
    }

    #[tokio::test]
    async fn featured_album_is_first_marked_record() {
        let store = ContentStore::initialize(&site_with_three_albums())
            .await
            .unwrap();
        assert_eq!(store.featured_album().unwrap().id(), "low-tide");

        let unmarked = CannedSite::default()
            .with(INDEX_PATH, r#"{"albumDirectories": []}"#);
        let store = ContentStore::initialize(&unmarked).await.unwrap();
        assert!(store.featured_album().is_none());
    }
}
