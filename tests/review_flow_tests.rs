use std::sync::Arc;
use serde_json::{json, Value};
use warp::http::StatusCode;
use parfum_review::enums::request_status::RequestStatus;
use parfum_review::enums::review_state::ReviewState;
use parfum_review::enums::session_status::SessionStatus;
use parfum_review::errors::ReviewError;
use parfum_review::services::diff_engine::DiffEngine;
use parfum_review::structs::field_path::FieldPath;
use parfum_review::traits::record_store::RecordStore;
use parfum_review::ui::review_server::routes;
use parfum_review::ui::session_manager::SessionManager;
use crate::common::{request, InMemoryStore};

fn aqua() -> parfum_review::structs::api::change_request::ChangeRequest {
    request(
        "req-1",
        json!({"name": "Aqua", "notes": {"top_notes": ["citrus"]}}),
        json!({"name": "Aqua Marine", "notes": {"top_notes": ["citrus", "sea"]}}),
    )
}

#[tokio::test]
async fn edit_save_cycle_persists_draft_and_refreshes_diff() {
    let store = InMemoryStore::with(vec![aqua()]);
    let sessions = SessionManager::new(DiffEngine::default());
    let id = sessions.create_session(store.get_request("req-1").await.unwrap());

    sessions.start_edit(&id).unwrap();
    assert_eq!(sessions.view(&id).unwrap().state, ReviewState::Editing);
    sessions.edit_field(&id, &FieldPath::new(["name"]), "Aqua").unwrap();
    sessions.save(&id, &store).await.unwrap();

    let view = sessions.view(&id).unwrap();
    assert_eq!(view.state, ReviewState::Viewing);
    assert!(view.edit_fields.is_none());
    assert_eq!(view.annotations.len(), 1);
    assert_eq!(view.annotations[0].path(), &FieldPath::new(["notes"]));
    assert_eq!(
        store.get_request("req-1").await.unwrap().changes.to_json(),
        json!({"name": "Aqua", "notes": {"top_notes": ["citrus", "sea"]}})
    );
}

#[tokio::test]
async fn cancel_discards_draft() {
    let sessions = SessionManager::new(DiffEngine::default());
    let id = sessions.create_session(aqua());

    sessions.start_edit(&id).unwrap();
    sessions.edit_field(&id, &FieldPath::new(["name"]), "Something else").unwrap();
    sessions.cancel_edit(&id).unwrap();

    let session = sessions.get_session(&id).unwrap();
    assert_eq!(session.state, ReviewState::Viewing);
    assert!(session.draft.is_none());
    assert_eq!(session.request.changes, aqua().changes);
}

#[tokio::test]
async fn failing_store_keeps_session_editing() {
    let store = InMemoryStore {
        fail_updates: true,
        ..InMemoryStore::with(vec![aqua()])
    };
    let sessions = SessionManager::new(DiffEngine::default());
    let id = sessions.create_session(aqua());

    sessions.start_edit(&id).unwrap();
    assert!(sessions.save(&id, &store).await.is_err());

    let view = sessions.view(&id).unwrap();
    assert_eq!(view.state, ReviewState::Editing);
    assert!(view.edit_fields.is_some());
    assert!(view.last_error.unwrap().contains("catalog unavailable"));
}

#[test]
fn transitions_out_of_order_are_rejected() {
    let sessions = SessionManager::new(DiffEngine::default());
    let id = sessions.create_session(aqua());

    assert!(matches!(
        sessions.edit_field(&id, &FieldPath::new(["name"]), "x"),
        Err(ReviewError::InvalidTransition { .. })
    ));
    assert!(matches!(sessions.cancel_edit(&id), Err(ReviewError::InvalidTransition { .. })));
    sessions.start_edit(&id).unwrap();
    assert!(matches!(sessions.start_edit(&id), Err(ReviewError::InvalidTransition { .. })));
}

#[test]
fn processed_requests_cannot_be_edited() {
    let mut approved = aqua();
    approved.status = RequestStatus::Approved;
    let sessions = SessionManager::new(DiffEngine::default());
    let id = sessions.create_session(approved);
    assert!(matches!(sessions.start_edit(&id), Err(ReviewError::ValidationError { .. })));
}

#[test]
fn unknown_edit_path_is_rejected() {
    let sessions = SessionManager::new(DiffEngine::default());
    let id = sessions.create_session(aqua());
    sessions.start_edit(&id).unwrap();
    assert!(matches!(
        sessions.edit_field(&id, &FieldPath::new(["notes"]), "x"),
        Err(ReviewError::ValidationError { .. })
    ));
}

#[tokio::test]
async fn approve_then_second_decision_is_refused() {
    let store = InMemoryStore::with(vec![aqua()]);
    let sessions = SessionManager::new(DiffEngine::default());
    let id = sessions.create_session(aqua());

    sessions.approve(&id, &store).await.unwrap();
    assert_eq!(store.status_of("req-1"), Some(RequestStatus::Approved));
    assert!(sessions.reject(&id, &store).await.is_err());
    assert_eq!(store.status_of("req-1"), Some(RequestStatus::Approved));
}

#[tokio::test]
async fn listing_drops_orphans_and_sorts_newest_first() {
    let mut older = aqua();
    older.id = "older".to_string();
    older.created_at = older.created_at - chrono::Duration::days(3);
    let mut orphan = aqua();
    orphan.id = "orphan".to_string();
    orphan.perfume = None;

    let store = InMemoryStore::with(vec![older, orphan, aqua()]);
    let page = store.list_requests(&Default::default()).await.unwrap();
    let ids: Vec<&str> = page.requests.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["req-1", "older"]);
}

async fn post<F>(filter: &F, path: &str, body: Option<Value>) -> (StatusCode, Value)
where
    F: warp::Filter + 'static,
    F::Extract: warp::Reply + Send,
{
    let mut builder = warp::test::request().method("POST").path(path);
    if let Some(body) = body {
        builder = builder.json(&body);
    }
    let response = builder.reply(filter).await;
    (response.status(), serde_json::from_slice(response.body()).unwrap())
}

#[tokio::test]
async fn review_api_drives_a_session_to_close() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryStore::with(vec![aqua()]));
    let sessions = Arc::new(SessionManager::new(DiffEngine::default()));
    let id = sessions.create_session(aqua());
    let api = routes(Arc::clone(&sessions), Arc::clone(&store));

    let response = warp::test::request().method("GET").path(&format!("/api/session/{}", id)).reply(&api).await;
    assert_eq!(response.status(), StatusCode::OK);
    let view: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(view["state"], "viewing");
    assert_eq!(view["annotations"][0]["kind"], "scalar_change");

    let (status, view) = post(&api, &format!("/api/session/{}/edit", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["edit_fields"][1]["type"], "group");

    let (status, _) = post(&api, &format!("/api/session/{}/approve", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, view) = post(
        &api,
        &format!("/api/session/{}/field", id),
        Some(json!({"path": ["notes", "top_notes"], "value": "citrus, salt"})),
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["edit_fields"][1]["children"][0]["value"], "citrus, salt");

    let (status, view) = post(&api, &format!("/api/session/{}/save", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["state"], "viewing");

    let (status, view) = post(&api, &format!("/api/session/{}/reject", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["request_status"], "rejected");

    let (status, _) = post(&api, &format!("/api/session/{}/close", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sessions.get_session(&id).unwrap().status, SessionStatus::Closed);
}

#[tokio::test]
async fn review_api_reports_unknown_sessions() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryStore::default());
    let api = routes(Arc::new(SessionManager::new(DiffEngine::default())), store);

    let response = warp::test::request().method("GET").path("/api/session/nope").reply(&api).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn review_page_embeds_sanitized_session_id() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryStore::default());
    let api = routes(Arc::new(SessionManager::new(DiffEngine::default())), store);

    let response = warp::test::request().method("GET").path("/?session=abc%3Cscript%3E").reply(&api).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8_lossy(response.body());
    assert!(html.contains("const SESSION_ID = \"abcscript\";"));
}
