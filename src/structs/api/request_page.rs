use serde::{Deserialize, Serialize};
use crate::structs::api::change_request::ChangeRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPage {
    #[serde(default)]
    pub requests: Vec<ChangeRequest>,

    #[serde(rename = "totalPages", default = "default_total_pages")]
    pub total_pages: u32,
}

fn default_total_pages() -> u32 {
    1
}

impl RequestPage {
    /// Drops requests whose perfume no longer exists and orders the rest
    /// newest first.
    pub fn into_reviewable(mut self) -> Self {
        self.requests.retain(|request| request.perfume.is_some());
        self.requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self
    }
}
