use serde::{Deserialize, Serialize};
use crate::enums::edit_field::EditField;
use crate::enums::request_status::RequestStatus;
use crate::enums::review_state::ReviewState;
use crate::enums::session_status::SessionStatus;
use crate::errors::{ReviewError, ReviewResult};
use crate::services::diff_engine::DiffEngine;
use crate::structs::api::change_request::ChangeRequest;
use crate::structs::change_set::ChangeSet;
use crate::structs::field_path::FieldPath;
use crate::structs::review::session_view::SessionView;

/// Review of a single change request.
///
/// `draft` holds the editable deep copy of the request's changes and is
/// `Some` exactly while the session is editing or saving it. An approval or
/// rejection in flight also holds the session in `Submitting`, with no draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSession {
    pub id: String,
    pub request: ChangeRequest,
    pub state: ReviewState,
    pub draft: Option<ChangeSet>,
    pub last_error: Option<String>,
    pub status: SessionStatus,
}

impl ReviewSession {
    pub fn new(id: String, request: ChangeRequest) -> Self {
        Self {
            id,
            request,
            state: ReviewState::Viewing,
            draft: None,
            last_error: None,
            status: SessionStatus::Active,
        }
    }

    pub fn start_edit(&mut self) -> ReviewResult<()> {
        self.expect_state(ReviewState::Viewing, "start editing")?;
        if !self.request.is_pending() {
            return Err(ReviewError::validation_error(
                "status",
                &self.request.status.to_string(),
                "only pending requests can be edited",
                None,
            ));
        }

        self.draft = Some(self.request.changes.clone());
        self.state = ReviewState::Editing;
        self.last_error = None;
        Ok(())
    }

    /// Applies reviewer input to the field at `path` of the draft.
    pub fn edit_field(&mut self, path: &FieldPath, input: &str) -> ReviewResult<()> {
        self.expect_state(ReviewState::Editing, "edit")?;
        let Some(draft) = self.draft.as_mut() else {
            return Err(ReviewError::invalid_transition(&self.id, "editing without a draft", "edit"));
        };

        let fields = DiffEngine::render_edit_fields(draft, &FieldPath::root());
        let field = EditField::find(&fields, path).ok_or_else(|| ReviewError::validation_error(
            "path",
            &path.to_string(),
            "must address an editable field of the proposed changes",
            None,
        ))?;

        field.apply(draft, input)
    }

    pub fn cancel_edit(&mut self) -> ReviewResult<()> {
        self.expect_state(ReviewState::Editing, "cancel editing")?;
        self.draft = None;
        self.state = ReviewState::Viewing;
        self.last_error = None;
        Ok(())
    }

    /// Moves to `Submitting` and returns the draft to send to the store.
    pub fn begin_submit(&mut self) -> ReviewResult<ChangeSet> {
        self.expect_state(ReviewState::Editing, "save")?;
        let draft = self.draft.clone().unwrap_or_default();
        self.state = ReviewState::Submitting;
        Ok(draft)
    }

    /// On success the persisted changes replace the request's changes; on
    /// failure the session returns to `Editing` with the error recorded.
    pub fn finish_submit(&mut self, outcome: ReviewResult<ChangeSet>) -> ReviewResult<ChangeSet> {
        self.expect_state(ReviewState::Submitting, "finish saving")?;
        match outcome {
            Ok(persisted) => {
                self.request.changes = persisted.clone();
                self.draft = None;
                self.state = ReviewState::Viewing;
                self.last_error = None;
                Ok(persisted)
            }
            Err(error) => {
                self.state = ReviewState::Editing;
                self.last_error = Some(error.user_message());
                Err(error)
            }
        }
    }

    /// Moves to `Submitting` for an approve or reject call and returns the
    /// request id. Only a pending request in `Viewing` can be decided.
    pub fn begin_decision(&mut self, action: &str) -> ReviewResult<String> {
        self.expect_state(ReviewState::Viewing, action)?;
        if !self.request.is_pending() {
            return Err(ReviewError::validation_error(
                "status",
                &self.request.status.to_string(),
                "request has already been processed",
                None,
            ));
        }
        self.state = ReviewState::Submitting;
        self.last_error = None;
        Ok(self.request.id.clone())
    }

    /// Returns to `Viewing`; the request takes `status` only on success.
    pub fn finish_decision(&mut self, outcome: ReviewResult<()>, status: RequestStatus) -> ReviewResult<()> {
        self.expect_state(ReviewState::Submitting, "finish decision")?;
        self.state = ReviewState::Viewing;
        match outcome {
            Ok(()) => {
                self.request.status = status;
                Ok(())
            }
            Err(error) => {
                self.last_error = Some(error.user_message());
                Err(error)
            }
        }
    }

    pub fn close(&mut self) {
        self.status = SessionStatus::Closed;
    }

    pub fn view(&self, engine: &DiffEngine) -> SessionView {
        SessionView {
            id: self.id.clone(),
            request_id: self.request.id.clone(),
            title: self.request.title(),
            request_status: self.request.status,
            state: self.state,
            session_status: self.status,
            annotations: engine.annotate(self.request.perfume.as_ref(), &self.request.changes),
            edit_fields: self.draft.as_ref()
                .map(|draft| DiffEngine::render_edit_fields(draft, &FieldPath::root())),
            last_error: self.last_error.clone(),
        }
    }

    fn expect_state(&self, expected: ReviewState, action: &str) -> ReviewResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ReviewError::invalid_transition(&self.id, &self.state.to_string(), action))
        }
    }
}
