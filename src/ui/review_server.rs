use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::oneshot;
use tokio::time::timeout;
use warp::http::StatusCode;
use warp::Filter;
use crate::config::constants::{
    DEFAULT_SERVER_PORT_RANGE_START, DEFAULT_SERVER_PORT_RANGE_END,
    MAX_SESSION_ID_LENGTH, SERVER_SHUTDOWN_GRACE_PERIOD_MS,
    SESSION_POLL_INTERVAL_MS, timeout_duration, sleep_duration_millis
};
use crate::enums::session_status::SessionStatus;
use crate::errors::{ReviewError, ReviewResult};
use crate::structs::field_path::FieldPath;
use crate::structs::review::review_session::ReviewSession;
use crate::traits::record_store::RecordStore;
use crate::ui::session_manager::SessionManager;

#[derive(Debug, Deserialize)]
struct FieldEdit {
    path: Vec<String>,
    value: String,
}

#[derive(Clone)]
struct ServerState {
    sessions: Arc<SessionManager>,
    store: Arc<dyn RecordStore>,
}

/// Local web page for reviewing one change request in the browser.
pub struct ReviewServer {
    session_manager: Arc<SessionManager>,
    store: Arc<dyn RecordStore>,
    port: Option<u16>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ReviewServer {
    pub fn new(session_manager: Arc<SessionManager>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            session_manager,
            store,
            port: None,
            shutdown_tx: None,
        }
    }

    pub async fn start(&mut self) -> ReviewResult<u16> {
        let port = self.find_available_port().await?;
        self.port = Some(port);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);

        let routes = routes(Arc::clone(&self.session_manager), Arc::clone(&self.store));

        let addr: SocketAddr = ([127, 0, 0, 1], port).into();
        let (_, server) = warp::serve(routes)
            .bind_with_graceful_shutdown(addr, async {
                shutdown_rx.await.ok();
            });

        tokio::spawn(server);

        log::info!("🌐 Review server started on port {}", port);
        Ok(port)
    }

    pub fn session_url(&self, session_id: &str) -> Option<String> {
        self.port.map(|port| format!("http://127.0.0.1:{}/?session={}", port, session_id))
    }

    /// Resolves with the final session once the reviewer closes it, or
    /// `None` when the timeout elapses first.
    pub async fn wait_for_close(&self, session_id: &str, timeout_minutes: u64) -> ReviewResult<Option<ReviewSession>> {
        let result = timeout(timeout_duration(timeout_minutes), async {
            loop {
                match self.session_manager.get_session(session_id) {
                    Some(session) if session.status == SessionStatus::Closed => return Ok(session),
                    Some(_) => tokio::time::sleep(sleep_duration_millis(SESSION_POLL_INTERVAL_MS)).await,
                    None => return Err(ReviewError::session_not_found(session_id)),
                }
            }
        }).await;

        match result {
            Ok(session) => session.map(Some),
            Err(_) => {
                log::warn!("⏰ Review session timed out after {} minutes", timeout_minutes);
                Ok(None)
            }
        }
    }

    pub async fn shutdown(&mut self) -> ReviewResult<()> {
        log::info!("🛑 Shutting down review server...");

        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            shutdown_tx.send(()).map_err(|_|
                ReviewError::system_error("shutdown", "Failed to send shutdown signal")
            )?;
        }

        tokio::time::sleep(sleep_duration_millis(SERVER_SHUTDOWN_GRACE_PERIOD_MS)).await;
        log::info!("✅ Review server shutdown complete");

        Ok(())
    }

    async fn find_available_port(&self) -> ReviewResult<u16> {
        for port in DEFAULT_SERVER_PORT_RANGE_START..DEFAULT_SERVER_PORT_RANGE_END {
            if let Ok(listener) = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await {
                drop(listener);
                return Ok(port);
            }
        }
        Err(ReviewError::system_error(
            "start review server",
            &format!("no free port between {} and {}", DEFAULT_SERVER_PORT_RANGE_START, DEFAULT_SERVER_PORT_RANGE_END),
        ))
    }
}

/// Page and JSON API routes over a session manager.
pub fn routes(
    session_manager: Arc<SessionManager>,
    store: Arc<dyn RecordStore>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let state = ServerState { sessions: session_manager, store };
    let state_filter = warp::any().map(move || state.clone());

    let page = warp::path::end()
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and_then(serve_review_page);

    let get_session = warp::path!("api" / "session" / String)
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_session_handler);

    let edit_field = warp::path!("api" / "session" / String / "field")
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter.clone())
        .and_then(edit_field_handler);

    let action = warp::path!("api" / "session" / String / String)
        .and(warp::post())
        .and(state_filter)
        .and_then(action_handler);

    page
        .or(get_session)
        .or(edit_field)
        .or(action)
        .with(warp::cors()
            .allow_origin("http://127.0.0.1")
            .allow_origin("http://localhost")
            .allow_headers(vec!["content-type"])
            .allow_methods(vec!["GET", "POST"]))
}

async fn serve_review_page(params: HashMap<String, String>) -> Result<impl warp::Reply, Infallible> {
    let session_id = params.get("session")
        .map(|s| sanitize_session_id(s))
        .unwrap_or_default();

    let html = include_str!("static/index.html")
        .replace("{{SESSION_ID}}", &session_id);

    Ok(warp::reply::html(html))
}

pub fn sanitize_session_id(session_id: &str) -> String {
    session_id.chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(MAX_SESSION_ID_LENGTH)
        .collect()
}

fn error_reply(error: &ReviewError) -> warp::reply::WithStatus<warp::reply::Json> {
    let status = match error {
        ReviewError::SessionNotFound { .. } => StatusCode::NOT_FOUND,
        ReviewError::InvalidTransition { .. } => StatusCode::CONFLICT,
        ReviewError::ValidationError { .. } | ReviewError::UserInputError { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    };
    warp::reply::with_status(warp::reply::json(&json!({ "error": error.user_message() })), status)
}

fn invalid_id_reply() -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&json!({ "error": "Invalid session ID" })), StatusCode::BAD_REQUEST)
}

async fn get_session_handler(session_id: String, state: ServerState) -> Result<impl warp::Reply, Infallible> {
    let session_id = sanitize_session_id(&session_id);
    if session_id.is_empty() {
        return Ok(invalid_id_reply());
    }

    match state.sessions.view(&session_id) {
        Ok(view) => Ok(warp::reply::with_status(warp::reply::json(&view), StatusCode::OK)),
        Err(e) => Ok(error_reply(&e)),
    }
}

async fn edit_field_handler(session_id: String, edit: FieldEdit, state: ServerState) -> Result<impl warp::Reply, Infallible> {
    let session_id = sanitize_session_id(&session_id);
    if session_id.is_empty() {
        return Ok(invalid_id_reply());
    }

    let path = FieldPath::from(edit.path);
    let result = state.sessions
        .edit_field(&session_id, &path, &edit.value)
        .and_then(|_| state.sessions.view(&session_id));

    match result {
        Ok(view) => Ok(warp::reply::with_status(warp::reply::json(&view), StatusCode::OK)),
        Err(e) => Ok(error_reply(&e)),
    }
}

async fn action_handler(session_id: String, action: String, state: ServerState) -> Result<impl warp::Reply, Infallible> {
    let session_id = sanitize_session_id(&session_id);
    if session_id.is_empty() {
        return Ok(invalid_id_reply());
    }

    let sessions = &state.sessions;
    let result = match action.as_str() {
        "edit" => sessions.start_edit(&session_id),
        "cancel" => sessions.cancel_edit(&session_id),
        "save" => sessions.save(&session_id, state.store.as_ref()).await.map(|_| ()),
        "approve" => sessions.approve(&session_id, state.store.as_ref()).await,
        "reject" => sessions.reject(&session_id, state.store.as_ref()).await,
        "close" => sessions.close_session(&session_id),
        other => Err(ReviewError::user_input_error(
            other,
            "one of edit, cancel, save, approve, reject, close",
            "Check the review page version",
        )),
    };

    match result.and_then(|_| sessions.view(&session_id)) {
        Ok(view) => Ok(warp::reply::with_status(warp::reply::json(&view), StatusCode::OK)),
        Err(e) => Ok(error_reply(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_unsafe_characters() {
        assert_eq!(sanitize_session_id("abc-123_<script>"), "abc-123_script");
        assert_eq!(sanitize_session_id(&"a".repeat(100)).len(), MAX_SESSION_ID_LENGTH);
        assert!(sanitize_session_id("../..").is_empty());
    }
}
