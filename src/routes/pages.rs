use axum::{Json, response::Html};
use serde::Serialize;

use crate::models::{
    GenerationConfig, Genre, PAGE_COUNT_RANGE, PANELS_PER_PAGE_RANGE, Tone, TwistIntensity,
};

pub async fn index() -> Html<&'static str> {
    Html(
        r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>KamiScroll Webtoon Service</title>
        <meta charset="utf-8">
        <style>
            body { font-family: Arial, sans-serif; margin: 40px; }
            .info-box { background-color: #f0f8ff; padding: 20px; border-radius: 8px; margin: 20px 0; }
            .endpoint { background-color: #f5f5f5; padding: 10px; margin: 10px 0; border-radius: 4px; font-family: monospace; }
        </style>
    </head>
    <body>
        <h1>KamiScroll Webtoon Service</h1>

        <div class="info-box">
            <h2>Service Information</h2>
            <p>Describe a story idea and receive a webtoon: title, cast, and pages of panels with dialogue, sound effects and narration.</p>
            <p>Panel artwork is drawn one panel at a time after the script is ready. Poll the story to watch each panel move from pending to ready.</p>
        </div>

        <h2>Available Endpoints:</h2>
        <div class="endpoint">GET / - This information page</div>
        <div class="endpoint">GET /health - Health check</div>
        <div class="endpoint">GET /api/options - Genres, tones, twists and count limits</div>
        <div class="endpoint">POST /api/story - Generate a new story</div>
        <div class="endpoint">GET /api/story - Current story and panel statuses</div>
        <div class="endpoint">POST /api/story/pages/{page_id}/panels/{panel_id}/regenerate - Redraw one panel</div>
        <div class="endpoint">PUT /api/story/pages/{page_id}/panels/{panel_id}/dialogue - Edit one panel's dialogue</div>

        <h2>How to Use:</h2>
        <p>POST a JSON body such as <code>{"prompt": "A broke high-schooler makes a pact with a fox demon in Tokyo", "genre": "dark fantasy", "tone": "edgy", "twistIntensity": "big betrayal", "pageCount": 3, "panelsPerPage": 3}</code> to /api/story.</p>
    </body>
    </html>
    "#,
    )
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
pub struct Bounds {
    min: u32,
    max: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsResponse {
    genres: Vec<Genre>,
    tones: Vec<Tone>,
    twist_intensities: Vec<TwistIntensity>,
    page_count: Bounds,
    panels_per_page: Bounds,
    defaults: GenerationConfig,
}

/// Choices and limits for the settings form.
pub async fn options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        genres: Genre::ALL.to_vec(),
        tones: Tone::ALL.to_vec(),
        twist_intensities: TwistIntensity::ALL.to_vec(),
        page_count: Bounds {
            min: *PAGE_COUNT_RANGE.start(),
            max: *PAGE_COUNT_RANGE.end(),
        },
        panels_per_page: Bounds {
            min: *PANELS_PER_PAGE_RANGE.start(),
            max: *PANELS_PER_PAGE_RANGE.end(),
        },
        defaults: GenerationConfig::default(),
    })
}
