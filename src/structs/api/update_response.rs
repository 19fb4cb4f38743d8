use serde::{Deserialize, Serialize};
use crate::structs::change_set::ChangeSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatedRequest {
    #[serde(default)]
    pub changes: ChangeSet,
}

/// Body of `PUT /requests/{id}` responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub request: UpdatedRequest,
}
