//! Query result payload returned by plugins
//!
//! Field names serialize in PascalCase; the launcher UI reads them verbatim,
//! so renaming any of them is a breaking change.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One result a plugin returns for a query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WoxResult {
    /// Stable id chosen by the plugin; the core assigns one when empty
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub sub_title: String,
    #[serde(default)]
    pub icon: WoxImage,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub preview: WoxPreview,
    #[serde(default)]
    pub actions: Vec<WoxResultAction>,
}

impl WoxResult {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_sub_title(mut self, sub_title: impl Into<String>) -> Self {
        self.sub_title = sub_title.into();
        self
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.score = score;
        self
    }

    pub fn with_icon(mut self, icon: WoxImage) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_preview(mut self, preview: WoxPreview) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_action(mut self, action: WoxResultAction) -> Self {
        self.actions.push(action);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WoxImageType {
    #[default]
    Absolute,
    Relative,
    Base64,
    Svg,
    Url,
    Emoji,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WoxImage {
    pub image_type: WoxImageType,
    pub image_data: String,
}

impl WoxImage {
    pub fn emoji(emoji: impl Into<String>) -> Self {
        Self {
            image_type: WoxImageType::Emoji,
            image_data: emoji.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WoxPreviewType {
    #[default]
    Text,
    Markdown,
    Image,
    Url,
    File,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WoxPreview {
    pub preview_type: WoxPreviewType,
    pub preview_data: String,
    #[serde(default)]
    pub preview_properties: HashMap<String, String>,
}

impl WoxPreview {
    pub fn text(data: impl Into<String>) -> Self {
        Self {
            preview_type: WoxPreviewType::Text,
            preview_data: data.into(),
            preview_properties: HashMap::new(),
        }
    }
}

/// A user-invokable action attached to a result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WoxResultAction {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    /// Keep the launcher window open after the action runs
    #[serde(default)]
    pub prevent_hide_after_action: bool,
}

impl WoxResultAction {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_default: false,
            prevent_hide_after_action: false,
        }
    }

    pub fn default_action(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn keep_open(mut self) -> Self {
        self.prevent_hide_after_action = true;
        self
    }
}
