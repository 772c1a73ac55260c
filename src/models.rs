use serde::{Deserialize, Serialize};

/// A todo record as stored and as returned on the wire.
///
/// `updated_at` stays `None` until the first mutating update and is omitted
/// from the JSON envelope while absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Request body accepted by create and update. Extra fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct TodoPayload {
    #[serde(default)]
    pub title: Option<String>,
}
