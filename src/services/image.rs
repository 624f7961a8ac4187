use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, instrument};

use crate::config::BackendConfig;
use crate::error::GenerationError;
use crate::models::{Character, Panel};
use crate::services::ImageBackend;

const STYLE_HEADER: &str = "Manhwa webtoon style, vibrant digital colors, clean ink lines.";
const STYLE_FOOTER: &str = "Perspective: Professional manga framing.\nNo text in the image.";

/// Builds the image prompt for one panel, grounded on every character's look.
pub fn compose_panel_prompt(panel: &Panel, characters: &[Character]) -> String {
    let character_context = characters
        .iter()
        .map(|c| format!("{} looks like: {}", c.name, c.appearance))
        .collect::<Vec<_>>()
        .join(". ");

    format!(
        "{STYLE_HEADER}\nCharacter Context: {character_context}.\nScene Description: {}.\n{STYLE_FOOTER}",
        panel.visual_prompt
    )
}

/// Requests artwork for a single panel and returns its image reference.
pub async fn request_panel_image(
    backend: &dyn ImageBackend,
    panel: &Panel,
    characters: &[Character],
) -> Result<String, GenerationError> {
    let prompt = compose_panel_prompt(panel, characters);
    backend.generate_image(&prompt).await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: Option<String>,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: serde_json::Value,
    generation_config: serde_json::Value,
}

/// Turns the first inline image of the first candidate into a data URL.
fn first_inline_image(response: GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    candidate
        .content
        .parts
        .into_iter()
        .find_map(|part| part.inline_data)
        .filter(|inline| !inline.data.is_empty())
        .map(|inline| {
            let mime_type = inline.mime_type.as_deref().unwrap_or("image/png");
            format!("data:{mime_type};base64,{}", inline.data)
        })
}

/// Client for the Gemini `generateContent` endpoint.
pub struct ImageClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl ImageClient {
    pub fn new(config: &BackendConfig) -> Self {
        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.api_url.trim_end_matches('/'),
            config.model
        );
        ImageClient {
            client: reqwest::Client::new(),
            endpoint,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl ImageBackend for ImageClient {
    fn name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: json!([{ "parts": [{ "text": prompt }] }]),
            generation_config: json!({ "responseModalities": ["TEXT", "IMAGE"] }),
        };

        let mut request_builder = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.api_key {
            request_builder = request_builder.header("x-goog-api-key", api_key);
        }

        debug!(prompt_len = prompt.len(), "Sending image request");
        let response = request_builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, error = %message, "Image provider error");
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(format!("unreadable image response: {e}")))?;

        first_inline_image(parsed).ok_or(GenerationError::MissingImage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;

    #[test]
    fn prompt_includes_every_character_and_the_scene() {
        let mut characters = fixtures::story(&[1]).characters;
        characters.push(Character {
            name: "Kitsune".to_string(),
            appearance: "nine white tails".to_string(),
            personality: "sly".to_string(),
            role: "patron".to_string(),
        });
        let mut panel = fixtures::panel(0, 0);
        panel.visual_prompt = "Ren kneels at a shrine, low angle".to_string();

        let prompt = compose_panel_prompt(&panel, &characters);

        assert!(prompt.starts_with(STYLE_HEADER));
        assert!(prompt.contains(
            "Character Context: Ren looks like: silver hair, red eyes, school blazer. Kitsune looks like: nine white tails."
        ));
        assert!(prompt.contains("Scene Description: Ren kneels at a shrine, low angle."));
        assert!(prompt.ends_with("No text in the image."));
    }

    #[test]
    fn dialogue_does_not_leak_into_prompt() {
        let panel = fixtures::panel(0, 0);
        let prompt = compose_panel_prompt(&panel, &[]);
        assert!(!prompt.contains(&panel.dialogue));
    }

    #[test]
    fn picks_first_inline_part() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "here you go" },
                    { "inlineData": { "mimeType": "image/jpeg", "data": "QUJD" } },
                    { "inlineData": { "mimeType": "image/png", "data": "REVG" } }
                ]}
            }]
        }))
        .unwrap();

        assert_eq!(
            first_inline_image(response).as_deref(),
            Some("data:image/jpeg;base64,QUJD")
        );
    }

    #[test]
    fn text_only_response_has_no_image() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "I cannot draw that" }] } }]
        }))
        .unwrap();
        assert!(first_inline_image(response).is_none());

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(first_inline_image(empty).is_none());
    }
}
