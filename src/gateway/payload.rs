//! Wire payloads for the HTTP surface. All fields are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::search::RankedResult;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    /// Per-browser session token generated by the frontend.
    pub session_id: String,
    /// Authenticated user id; preferred over `session_id` as the search key
    /// so pagination follows the account across devices.
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<RankedResult>,
    pub has_more: bool,
    pub offset: usize,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCafeRequest {
    pub list_id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub img: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCafeRequest {
    pub list_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub my_comment: String,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCafeRequest {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
