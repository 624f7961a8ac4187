use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::GenerationError;
use crate::models::{Character, GenerationConfig, Page, Panel, PanelStatus, Story};
use crate::services::StoryBackend;

pub fn build_story_prompt(config: &GenerationConfig) -> String {
    format!(
        r#"You are a creative manga / manhwa writer.

Create a full webtoon script based on this idea: "{premise}".

Details:
- Genre: {genre}
- Tone: {tone}
- Length: {pages} pages
- Panels per page: {panels}
- Twist intensity: {twist}

Instructions:
- Give every character a very detailed physical description (hair color, eye shape, outfit) so the artwork stays consistent.
- Build a distinct setup, build-up, a major twist ({twist}) and aftermath.
- Each panel's visualPrompt describes the scene, the characters' poses, the camera angle and the background, using the characters' names.

IMPORTANT:
- Respond with JSON ONLY (no markdown, no explanation).
- Do not include any text before or after the JSON.
- Follow this structure exactly.

{{
  "title": "string",
  "plot": "string",
  "characters": [
    {{ "name": "string", "appearance": "string", "personality": "string", "role": "string" }}
  ],
  "pages": [
    {{
      "pageNumber": 1,
      "panels": [
        {{ "visualPrompt": "string", "dialogue": "string", "sfx": "string", "narration": "string" }}
      ]
    }}
  ],
  "twistMoment": "string"
}}
"#,
        premise = config.prompt.trim(),
        genre = config.genre,
        tone = config.tone,
        pages = config.page_count,
        panels = config.panels_per_page,
        twist = config.twist_intensity,
    )
}

/// Returns the span from the first `{` to the last `}` inclusive.
pub fn extract_json_object(text: &str) -> Result<&str, GenerationError> {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&text[start..=end]),
        _ => Err(GenerationError::Parse("no JSON object found".to_string())),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPanel {
    #[serde(default)]
    visual_prompt: Option<String>,
    #[serde(default)]
    dialogue: Option<String>,
    #[serde(default)]
    sfx: Option<String>,
    #[serde(default)]
    narration: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPage {
    /// Models sometimes quote the number or leave it out.
    #[serde(default)]
    page_number: Option<Value>,
    #[serde(default)]
    panels: Option<Vec<RawPanel>>,
}

impl RawPage {
    fn number(&self) -> Option<u32> {
        match self.page_number.as_ref()? {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStory {
    title: String,
    #[serde(default)]
    plot: String,
    #[serde(default)]
    twist_moment: String,
    #[serde(default)]
    characters: Vec<Character>,
    pages: Vec<RawPage>,
}

/// Parses backend text into a story with fresh ids and every panel `pending`.
///
/// Ids, statuses and image references in the payload are ignored.
pub fn parse_story(text: &str) -> Result<Story, GenerationError> {
    let json = extract_json_object(text)?;
    let raw: RawStory =
        serde_json::from_str(json).map_err(|e| GenerationError::Parse(e.to_string()))?;

    if raw
        .pages
        .iter()
        .all(|page| page.panels.as_ref().is_none_or(Vec::is_empty))
    {
        return Err(GenerationError::Parse(
            "story contains no panels".to_string(),
        ));
    }

    let pages = raw
        .pages
        .into_iter()
        .enumerate()
        .map(|(page_index, page)| Page {
            id: Page::page_id(page_index),
            page_number: page.number().unwrap_or(page_index as u32 + 1),
            panels: page
                .panels
                .unwrap_or_default()
                .into_iter()
                .enumerate()
                .map(|(panel_index, panel)| Panel {
                    id: Panel::panel_id(page_index, panel_index),
                    visual_prompt: panel.visual_prompt.unwrap_or_default(),
                    dialogue: panel.dialogue.unwrap_or_default(),
                    sfx: panel.sfx.unwrap_or_default(),
                    narration: panel.narration.filter(|n| !n.trim().is_empty()),
                    image_url: None,
                    status: PanelStatus::Pending,
                })
                .collect(),
        })
        .collect();

    Ok(Story {
        title: raw.title,
        plot: raw.plot,
        twist_moment: raw.twist_moment,
        characters: raw.characters,
        pages,
    })
}

/// Validates `config`, asks the backend for a script and parses the reply.
pub async fn generate_story(
    backend: &dyn StoryBackend,
    config: &GenerationConfig,
    timeout: Duration,
) -> Result<Story, GenerationError> {
    config.validate()?;

    let prompt = build_story_prompt(config);
    debug!(backend = backend.name(), genre = %config.genre, tone = %config.tone, "Requesting story");

    let text = tokio::time::timeout(timeout, backend.complete(&prompt))
        .await
        .map_err(|_| GenerationError::Timeout(timeout))??;

    let story = parse_story(&text).inspect_err(|e| {
        warn!(error = %e, content_len = text.len(), "Could not parse story document");
    })?;

    info!(
        title = %story.title,
        pages = story.pages.len(),
        panels = story.panel_count(),
        "Story generated"
    );
    Ok(story)
}
