use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const STYLE_STRENGTH: f64 = 0.8;

/// Body of `POST /api/v1/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub theme: String,
    pub styles: Vec<String>,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Always serialized; `null` when the user left it blank.
    pub extra_description: Option<String>,
    pub style_strength: f64,
}

/// Response of generate and refine. Refine responses also name their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub generation_id: String,
    pub optimized_prompt: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_generation_id: Option<String>,
}

/// Body of `POST /api/v1/refine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefineRequest {
    pub generation_id: String,
    pub refine_instruction: String,
}

/// A stored generation as returned by the lookup and history endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation_id: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub optimized_prompt: String,
    #[serde(default)]
    pub refine_instruction: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub seed: Option<i64>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl GenerationRecord {
    pub fn is_refinement(&self) -> bool {
        self.parent_id.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<GenerationRecord>,
}
