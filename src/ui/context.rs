use std::sync::Arc;

use flume::Sender;

use crate::{
    content::store::ContentStore, event::events::Event, http::SiteClient, player::Player,
};

/// Shared, read-only handles the views render from. The store is sealed
/// before the context exists, so no view can observe partial content.
pub struct AppContext {
    pub store: Arc<ContentStore>,
    pub player: Arc<Player>,
    pub client: Arc<SiteClient>,
    pub event_tx: Sender<Event>,
}
