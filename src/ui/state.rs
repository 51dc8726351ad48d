#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// One-line notice shown under the player bar (downloads, failures).
    pub status: Option<String>,
}
