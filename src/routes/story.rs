use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::Deserialize;

use crate::error::{AppResult, StoreError};
use crate::models::{GenerationConfig, Panel, PanelKey, PanelUpdate};
use crate::services::store::Session;
use crate::services::story::generate_story;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DialogueUpdate {
    pub dialogue: String,
}

/// Generates a new story, replaces the current one and starts drawing panels.
///
/// On failure the previous story stays in place.
pub async fn create_story(
    State(state): State<AppState>,
    payload: Result<Json<GenerationConfig>, JsonRejection>,
) -> AppResult<Json<Session>> {
    let Json(config) = payload?;
    let story = generate_story(state.llm_client.as_ref(), &config, state.story_timeout).await?;

    let session = state.store.replace(story).await;
    tracing::info!(session = %session.session_id, "Story accepted, queueing panel artwork");
    state.orchestrator.spawn(session.session_id);

    Ok(Json(session))
}

pub async fn current_story(State(state): State<AppState>) -> AppResult<Json<Session>> {
    let session = state.store.snapshot().await.ok_or(StoreError::NoStory)?;
    Ok(Json(session))
}

/// Redraws one panel and returns it with status `ready` or `error`.
pub async fn regenerate_panel(
    State(state): State<AppState>,
    Path((page_id, panel_id)): Path<(String, String)>,
) -> AppResult<Json<Panel>> {
    let session_id = state.store.session_id().await.ok_or(StoreError::NoStory)?;
    let key = PanelKey::new(page_id, panel_id);

    let panel = state.orchestrator.generate_panel(session_id, &key).await?;
    Ok(Json(panel))
}

pub async fn update_dialogue(
    State(state): State<AppState>,
    Path((page_id, panel_id)): Path<(String, String)>,
    payload: Result<Json<DialogueUpdate>, JsonRejection>,
) -> AppResult<Json<Panel>> {
    let Json(body) = payload?;
    let key = PanelKey::new(page_id, panel_id);
    let panel = state
        .store
        .update_panel(None, &key, PanelUpdate::Dialogue(body.dialogue))
        .await?;

    tracing::debug!(panel = %key, "Dialogue updated");
    Ok(Json(panel))
}
