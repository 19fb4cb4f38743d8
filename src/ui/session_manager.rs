use dashmap::DashMap;
use uuid::Uuid;
use crate::enums::request_status::RequestStatus;
use crate::errors::{ReviewError, ReviewResult};
use crate::services::diff_engine::DiffEngine;
use crate::structs::api::change_request::ChangeRequest;
use crate::structs::change_set::ChangeSet;
use crate::structs::field_path::FieldPath;
use crate::structs::review::review_session::ReviewSession;
use crate::structs::review::session_view::SessionView;
use crate::traits::record_store::RecordStore;

pub struct SessionManager {
    sessions: DashMap<String, ReviewSession>,
    engine: DiffEngine,
}

impl SessionManager {
    pub fn new(engine: DiffEngine) -> Self {
        Self {
            sessions: DashMap::new(),
            engine,
        }
    }

    pub fn create_session(&self, request: ChangeRequest) -> String {
        let session_id = Uuid::new_v4().to_string();
        log::debug!("Opening review session {} for request {}", session_id, request.id);
        self.sessions.insert(session_id.clone(), ReviewSession::new(session_id.clone(), request));
        session_id
    }

    pub fn get_session(&self, session_id: &str) -> Option<ReviewSession> {
        self.sessions.get(session_id).map(|entry| entry.clone())
    }

    pub fn view(&self, session_id: &str) -> ReviewResult<SessionView> {
        self.sessions.get(session_id)
            .map(|session| session.view(&self.engine))
            .ok_or_else(|| ReviewError::session_not_found(session_id))
    }

    pub fn start_edit(&self, session_id: &str) -> ReviewResult<()> {
        self.with_session(session_id, ReviewSession::start_edit)
    }

    pub fn edit_field(&self, session_id: &str, path: &FieldPath, input: &str) -> ReviewResult<()> {
        self.with_session(session_id, |session| session.edit_field(path, input))
    }

    pub fn cancel_edit(&self, session_id: &str) -> ReviewResult<()> {
        self.with_session(session_id, ReviewSession::cancel_edit)
    }

    /// Sends the draft to the store. The session map is not locked while
    /// the request is in flight.
    pub async fn save(&self, session_id: &str, store: &dyn RecordStore) -> ReviewResult<ChangeSet> {
        let (request_id, draft) = self.with_session(session_id, |session| {
            let draft = session.begin_submit()?;
            Ok((session.request.id.clone(), draft))
        })?;

        let outcome = store.update_changes(&request_id, &draft).await;
        if let Err(e) = &outcome {
            log::warn!("⚠️ Saving request {} failed: {}", request_id, e);
        }

        self.with_session(session_id, |session| session.finish_submit(outcome))
    }

    pub async fn approve(&self, session_id: &str, store: &dyn RecordStore) -> ReviewResult<()> {
        self.decide(session_id, store, RequestStatus::Approved).await
    }

    pub async fn reject(&self, session_id: &str, store: &dyn RecordStore) -> ReviewResult<()> {
        self.decide(session_id, store, RequestStatus::Rejected).await
    }

    /// The session stays in `Submitting` while the store call is in flight,
    /// so edits started meanwhile are refused.
    async fn decide(&self, session_id: &str, store: &dyn RecordStore, status: RequestStatus) -> ReviewResult<()> {
        let action = match status {
            RequestStatus::Rejected => "reject",
            _ => "approve",
        };
        let request_id = self.with_session(session_id, |session| session.begin_decision(action))?;

        let outcome = match status {
            RequestStatus::Rejected => store.reject(&request_id).await,
            _ => store.approve(&request_id).await,
        };
        if let Err(e) = &outcome {
            log::warn!("⚠️ Could not {} request {}: {}", action, request_id, e);
        }

        self.with_session(session_id, |session| session.finish_decision(outcome, status))
    }

    pub fn close_session(&self, session_id: &str) -> ReviewResult<()> {
        self.with_session(session_id, |session| {
            session.close();
            Ok(())
        })
    }

    pub fn remove_session(&self, session_id: &str) -> Option<ReviewSession> {
        self.sessions.remove(session_id).map(|(_, session)| session)
    }

    fn with_session<T, F>(&self, session_id: &str, action: F) -> ReviewResult<T>
    where
        F: FnOnce(&mut ReviewSession) -> ReviewResult<T>,
    {
        let mut session = self.sessions
            .get_mut(session_id)
            .ok_or_else(|| ReviewError::session_not_found(session_id))?;
        action(session.value_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use chrono::Utc;
    use serde_json::json;
    use crate::enums::review_state::ReviewState;
    use crate::traits::record_store::MockRecordStore;

    fn pending_request() -> ChangeRequest {
        ChangeRequest {
            id: "req-1".to_string(),
            perfume: Some(ChangeSet::from_json(&json!({"name": "Aqua", "notes": {"top_notes": ["citrus"]}}))),
            changes: ChangeSet::from_json(&json!({"name": "Aqua Marine", "notes": {"top_notes": ["citrus", "sea"]}})),
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn save_replaces_changes_with_persisted_value() {
        let manager = SessionManager::new(DiffEngine::default());
        let session_id = manager.create_session(pending_request());

        manager.start_edit(&session_id).unwrap();
        manager.edit_field(&session_id, &FieldPath::new(["notes", "top_notes"]), "citrus, sea, salt").unwrap();

        let mut store = MockRecordStore::new();
        store.expect_update_changes()
            .withf(|id, changes| {
                id == "req-1"
                    && changes.to_json() == json!({"name": "Aqua Marine", "notes": {"top_notes": ["citrus", "sea", "salt"]}})
            })
            .times(1)
            .returning(|_, changes| Ok(changes.clone()));

        let persisted = manager.save(&session_id, &store).await.unwrap();
        let session = manager.get_session(&session_id).unwrap();
        assert_eq!(session.state, ReviewState::Viewing);
        assert!(session.draft.is_none());
        assert_eq!(session.request.changes, persisted);
    }

    #[tokio::test]
    async fn failed_save_returns_to_editing_with_error() {
        let manager = SessionManager::new(DiffEngine::default());
        let session_id = manager.create_session(pending_request());
        manager.start_edit(&session_id).unwrap();

        let mut store = MockRecordStore::new();
        store.expect_update_changes()
            .returning(|_, _| Err(ReviewError::api_error("update request", 500, "boom")));

        assert!(manager.save(&session_id, &store).await.is_err());
        let session = manager.get_session(&session_id).unwrap();
        assert_eq!(session.state, ReviewState::Editing);
        assert!(session.draft.is_some());
        assert!(session.last_error.unwrap().contains("boom"));
        assert_eq!(session.request.changes, pending_request().changes);
    }

    #[tokio::test]
    async fn approve_is_refused_while_editing() {
        let manager = SessionManager::new(DiffEngine::default());
        let session_id = manager.create_session(pending_request());
        manager.start_edit(&session_id).unwrap();

        let mut store = MockRecordStore::new();
        store.expect_approve().times(0);

        let error = manager.approve(&session_id, &store).await.unwrap_err();
        assert!(matches!(error, ReviewError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn reject_updates_request_status() {
        let manager = SessionManager::new(DiffEngine::default());
        let session_id = manager.create_session(pending_request());

        let mut store = MockRecordStore::new();
        store.expect_reject()
            .withf(|id| id == "req-1")
            .times(1)
            .returning(|_| Ok(()));

        manager.reject(&session_id, &store).await.unwrap();
        let view = manager.view(&session_id).unwrap();
        assert_eq!(view.request_status, RequestStatus::Rejected);
    }

    #[tokio::test]
    async fn edit_is_refused_while_approval_is_in_flight() {
        let manager = Arc::new(SessionManager::new(DiffEngine::default()));
        let session_id = manager.create_session(pending_request());

        let mut store = MockRecordStore::new();
        let during = Arc::clone(&manager);
        let during_id = session_id.clone();
        store.expect_approve()
            .times(1)
            .returning(move |_| {
                assert!(matches!(during.start_edit(&during_id), Err(ReviewError::InvalidTransition { .. })));
                Ok(())
            });

        manager.approve(&session_id, &store).await.unwrap();
        let session = manager.get_session(&session_id).unwrap();
        assert_eq!(session.state, ReviewState::Viewing);
        assert!(session.draft.is_none());
        assert_eq!(session.request.status, RequestStatus::Approved);
    }

    #[tokio::test]
    async fn failed_approval_keeps_request_pending() {
        let manager = SessionManager::new(DiffEngine::default());
        let session_id = manager.create_session(pending_request());

        let mut store = MockRecordStore::new();
        store.expect_approve()
            .returning(|_| Err(ReviewError::api_error("approve request", 502, "Bad Gateway")));

        assert!(manager.approve(&session_id, &store).await.is_err());
        let view = manager.view(&session_id).unwrap();
        assert_eq!(view.state, ReviewState::Viewing);
        assert_eq!(view.request_status, RequestStatus::Pending);
        assert!(view.last_error.unwrap().contains("Bad Gateway"));
        manager.start_edit(&session_id).unwrap();
    }

    #[test]
    fn unknown_session_is_reported() {
        let manager = SessionManager::new(DiffEngine::default());
        assert!(matches!(manager.start_edit("missing"), Err(ReviewError::SessionNotFound { .. })));
    }
}
