use serde::{Deserialize, Serialize};
use crate::enums::diff_annotation::DiffAnnotation;
use crate::enums::edit_field::EditField;
use crate::enums::request_status::RequestStatus;
use crate::enums::review_state::ReviewState;
use crate::enums::session_status::SessionStatus;

/// Snapshot of a review session handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub id: String,
    pub request_id: String,
    pub title: String,
    pub request_status: RequestStatus,
    pub state: ReviewState,
    pub session_status: SessionStatus,
    pub annotations: Vec<DiffAnnotation>,
    /// Present only while editing.
    pub edit_fields: Option<Vec<EditField>>,
    pub last_error: Option<String>,
}
