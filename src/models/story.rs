use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    /// Physical description; repeated verbatim in every image prompt.
    #[serde(default)]
    pub appearance: String,
    #[serde(default)]
    pub personality: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PanelStatus {
    #[default]
    Pending,
    Generating,
    Ready,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub id: String,
    pub visual_prompt: String,
    pub dialogue: String,
    pub sfx: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: PanelStatus,
}

impl Panel {
    pub fn panel_id(page_index: usize, panel_index: usize) -> String {
        format!("panel-{page_index}-{panel_index}")
    }

    pub fn is_ready(&self) -> bool {
        self.status == PanelStatus::Ready
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub page_number: u32,
    pub panels: Vec<Panel>,
}

impl Page {
    pub fn page_id(page_index: usize) -> String {
        format!("page-{page_index}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub title: String,
    pub plot: String,
    pub twist_moment: String,
    pub characters: Vec<Character>,
    pub pages: Vec<Page>,
}

/// Addresses one panel independently of its position in the page vectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelKey {
    pub page_id: String,
    pub panel_id: String,
}

impl PanelKey {
    pub fn new(page_id: impl Into<String>, panel_id: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            panel_id: panel_id.into(),
        }
    }
}

impl std::fmt::Display for PanelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.page_id, self.panel_id)
    }
}

/// A targeted change to a single panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelUpdate {
    Generating,
    Ready { image_url: String },
    /// Leaves any earlier image in place.
    Failed,
    Dialogue(String),
}

impl Story {
    /// Keys of every panel, page-major then panel-minor.
    pub fn panel_keys(&self) -> Vec<PanelKey> {
        self.pages
            .iter()
            .flat_map(|page| {
                page.panels
                    .iter()
                    .map(move |panel| PanelKey::new(page.id.clone(), panel.id.clone()))
            })
            .collect()
    }

    pub fn panel_count(&self) -> usize {
        self.pages.iter().map(|page| page.panels.len()).sum()
    }

    pub fn panel(&self, key: &PanelKey) -> Result<&Panel, StoreError> {
        self.pages
            .iter()
            .find(|page| page.id == key.page_id)
            .and_then(|page| page.panels.iter().find(|panel| panel.id == key.panel_id))
            .ok_or_else(|| StoreError::PanelNotFound(key.clone()))
    }

    fn panel_mut(&mut self, key: &PanelKey) -> Result<&mut Panel, StoreError> {
        self.pages
            .iter_mut()
            .find(|page| page.id == key.page_id)
            .and_then(|page| {
                page.panels
                    .iter_mut()
                    .find(|panel| panel.id == key.panel_id)
            })
            .ok_or_else(|| StoreError::PanelNotFound(key.clone()))
    }

    /// Applies `update` to the panel at `key` and nothing else.
    pub fn apply(&mut self, key: &PanelKey, update: PanelUpdate) -> Result<&Panel, StoreError> {
        let panel = self.panel_mut(key)?;
        match update {
            PanelUpdate::Generating => panel.status = PanelStatus::Generating,
            PanelUpdate::Ready { image_url } => {
                panel.image_url = Some(image_url);
                panel.status = PanelStatus::Ready;
            }
            PanelUpdate::Failed => panel.status = PanelStatus::Error,
            PanelUpdate::Dialogue(text) => panel.dialogue = text,
        }
        Ok(panel)
    }
}
