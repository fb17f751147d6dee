//! Query eligibility and the result envelope handed to the UI

use std::sync::Arc;

use serde::Serialize;
use wox_plugin_api::{Query, WoxImage, WoxPreview, WoxResult, WoxResultAction};

use super::instance::PluginInstance;

/// Whether `instance` should be asked to answer `query`.
///
/// - global: the *effective* trigger keywords contain `*` and the query has no keyword
/// - explicit: the query's keyword is one of the *declared* metadata keywords
///
/// The explicit check deliberately ignores the user's keyword override, so a
/// plugin stays reachable by its declared keywords whatever the user renamed
/// its working trigger to.
pub fn is_eligible(instance: &PluginInstance, query: &Query) -> bool {
    let valid_global = instance.has_global_trigger_keyword() && query.is_global();
    let valid_non_global = instance
        .metadata()
        .declares_trigger_keyword(query.trigger_keyword());
    valid_global || valid_non_global
}

/// One plugin result, with back-references to what produced it
#[derive(Debug, Clone)]
pub struct PluginQueryResult {
    pub result: WoxResult,
    pub associated_query: Arc<Query>,
    pub plugin: Arc<PluginInstance>,
}

impl PluginQueryResult {
    /// Wire form for the UI, placed at `index` in the displayed list
    pub fn to_response(&self, index: Option<usize>) -> QueryResultResponse {
        let id = if self.result.id.is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            self.result.id.clone()
        };

        QueryResultResponse {
            id,
            title: self.result.title.clone(),
            sub_title: self.result.sub_title.clone(),
            icon: self.result.icon.clone(),
            score: self.result.score,
            associated_query: self.associated_query.raw_query(),
            index,
            preview: self.result.preview.clone(),
            actions: self.result.actions.clone(),
        }
    }
}

/// A query result as the launcher UI receives it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryResultResponse {
    pub id: String,
    pub title: String,
    pub sub_title: String,
    pub icon: WoxImage,
    pub score: i64,
    pub associated_query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub preview: WoxPreview,
    pub actions: Vec<WoxResultAction>,
}
