use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::enums::change_value::ChangeValue;
use crate::enums::request_status::RequestStatus;
use crate::structs::change_set::ChangeSet;

/// A proposed modification of one perfume record, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRequest {
    #[serde(rename = "_id")]
    pub id: String,

    /// The current catalog record; `null` when the perfume was deleted.
    #[serde(rename = "perfumeId", default)]
    pub perfume: Option<ChangeSet>,

    #[serde(default)]
    pub changes: ChangeSet,

    pub status: RequestStatus,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl ChangeRequest {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// "Name (Brand)" of the original perfume.
    pub fn title(&self) -> String {
        let Some(perfume) = &self.perfume else {
            return "perfume information unavailable".to_string();
        };
        let name = perfume.get("name").map(ToString::to_string).unwrap_or_else(|| "untitled".to_string());
        let brand = match perfume.get("brand") {
            Some(ChangeValue::Nested(brand)) => brand.get("name").map(ToString::to_string),
            Some(other) => Some(other.to_string()),
            None => None,
        };
        match brand {
            Some(brand) => format!("{} ({})", name, brand),
            None => name,
        }
    }
}
