use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Character, Panel, PanelKey, PanelUpdate, Story};

/// The current story together with the id of the generation that produced it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: Uuid,
    pub story: Story,
}

/// Holds the one live story. All panel mutations are keyed updates.
#[derive(Debug, Default)]
pub struct StoryStore {
    current: RwLock<Option<Session>>,
}

impl StoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `story` as the current session, retiring any previous one.
    pub async fn replace(&self, story: Story) -> Session {
        let session = Session {
            session_id: Uuid::new_v4(),
            story,
        };
        *self.current.write().await = Some(session.clone());
        session
    }

    pub async fn snapshot(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn session_id(&self) -> Option<Uuid> {
        self.current.read().await.as_ref().map(|s| s.session_id)
    }

    /// Clones the panel at `key` along with the cast, for building an image request.
    pub async fn panel_with_cast(
        &self,
        session_id: Uuid,
        key: &PanelKey,
    ) -> Result<(Panel, Vec<Character>), StoreError> {
        let guard = self.current.read().await;
        let session = checked(guard.as_ref(), Some(session_id))?;
        let panel = session.story.panel(key)?.clone();
        Ok((panel, session.story.characters.clone()))
    }

    /// Applies one update to one panel.
    ///
    /// With `Some(session_id)` the update is refused once that session has been
    /// replaced, so late completions never land on a newer story.
    pub async fn update_panel(
        &self,
        session_id: Option<Uuid>,
        key: &PanelKey,
        update: PanelUpdate,
    ) -> Result<Panel, StoreError> {
        let mut guard = self.current.write().await;
        checked(guard.as_ref(), session_id)?;
        let session = guard.as_mut().ok_or(StoreError::NoStory)?;
        session.story.apply(key, update).cloned()
    }
}

fn checked(session: Option<&Session>, expected: Option<Uuid>) -> Result<&Session, StoreError> {
    let session = session.ok_or(StoreError::NoStory)?;
    match expected {
        Some(id) if id != session.session_id => Err(StoreError::StaleSession),
        _ => Ok(session),
    }
}
