use std::sync::Arc;
use std::time::Duration;

use crate::services::orchestrator::Orchestrator;
use crate::services::store::StoryStore;
use crate::services::{ImageBackend, StoryBackend};

/// Shared state handed to every handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StoryStore>,
    pub llm_client: Arc<dyn StoryBackend>,
    pub orchestrator: Orchestrator,
    pub story_timeout: Duration,
}

impl AppState {
    pub fn new(
        llm_client: Arc<dyn StoryBackend>,
        image_client: Arc<dyn ImageBackend>,
        story_timeout: Duration,
        image_timeout: Duration,
    ) -> Self {
        let store = Arc::new(StoryStore::new());
        let orchestrator = Orchestrator::new(store.clone(), image_client, image_timeout);
        Self {
            store,
            llm_client,
            orchestrator,
            story_timeout,
        }
    }
}
