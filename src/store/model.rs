use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A cafe directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CafeRecord {
    /// Stable record id; doubles as the vector index point id.
    pub id: String,
    /// External place id from the maps-API import surface.
    pub list_id: String,
    pub name: String,
    pub address: String,
    pub img: Option<String>,
    pub instagram: Option<String>,
    pub keywords: Vec<String>,
    /// Free text feeding the embedding input; not part of search results.
    pub description: String,
    /// Curator notes feeding the embedding input; not part of search results.
    pub my_comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CafeRecord {
    /// Creates a record with a fresh id and empty curator detail fields.
    pub fn new(
        list_id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        img: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            list_id: list_id.into(),
            name: name.into(),
            address: address.into(),
            img,
            instagram: None,
            keywords: Vec::new(),
            description: String::new(),
            my_comment: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds the text embedded for this record: curator comment, address,
    /// keywords, and description separated by blank lines.
    pub fn embedding_input(&self) -> String {
        format!(
            "{}\n\n{}\n\n{}\n\n{}",
            self.my_comment,
            self.address,
            self.keywords.join(", "),
            self.description
        )
    }
}

/// Curator-editable detail fields applied by an update.
#[derive(Debug, Clone, Default)]
pub struct CafeDetails {
    pub description: String,
    pub my_comment: String,
    pub instagram: Option<String>,
    pub keywords: Vec<String>,
}
