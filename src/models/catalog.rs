use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleOption {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords_cn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords_en: Option<String>,
}

impl StyleOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            name_en: None,
            features: Vec::new(),
            keywords_cn: None,
            keywords_en: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeOption {
    pub id: String,
    pub name: String,
    /// Pixel dimensions, e.g. `1024x1024`.
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<String>,
}

impl SizeOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size: size.into(),
            ratio: None,
        }
    }

    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurposeOption {
    pub id: String,
    pub name: String,
}

impl PurposeOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleListResponse {
    pub styles: Vec<StyleOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeListResponse {
    pub sizes: Vec<SizeOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurposeListResponse {
    pub purposes: Vec<PurposeOption>,
}
