use serde::{Deserialize, Serialize};

use super::repo_types::Entry;

#[derive(Debug, Default, Deserialize)]
pub struct CreateEntryRequest {
    pub code: Option<String>,
    pub nickname: Option<String>,
    pub status: Option<String>,
    pub instagram: Option<String>,
    pub discord: Option<String>,
    pub platform: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportRequest {
    pub multi_line_input: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkImportResponse {
    pub message: String,
    pub entries: Vec<Entry>,
}

/// Query string of `GET /data/search`. Blank values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub nickname: Option<String>,
    pub discord: Option<String>,
    pub instagram: Option<String>,
}
