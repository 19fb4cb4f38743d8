use std::sync::Mutex;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::Value;
use parfum_review::enums::request_status::RequestStatus;
use parfum_review::errors::{ReviewError, ReviewResult};
use parfum_review::structs::api::change_request::ChangeRequest;
use parfum_review::structs::api::request_page::RequestPage;
use parfum_review::structs::api::request_query::RequestQuery;
use parfum_review::structs::change_set::ChangeSet;
use parfum_review::traits::record_store::RecordStore;

pub fn set(value: Value) -> ChangeSet {
    ChangeSet::from_json(&value)
}

pub fn request(id: &str, perfume: Value, changes: Value) -> ChangeRequest {
    ChangeRequest {
        id: id.to_string(),
        perfume: Some(set(perfume)),
        changes: set(changes),
        status: RequestStatus::Pending,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

/// Record store kept in memory; `fail_updates` makes every save fail.
#[derive(Default)]
pub struct InMemoryStore {
    pub requests: Mutex<Vec<ChangeRequest>>,
    pub fail_updates: bool,
}

impl InMemoryStore {
    pub fn with(requests: Vec<ChangeRequest>) -> Self {
        Self {
            requests: Mutex::new(requests),
            fail_updates: false,
        }
    }

    pub fn status_of(&self, id: &str) -> Option<RequestStatus> {
        self.requests.lock().unwrap().iter().find(|r| r.id == id).map(|r| r.status)
    }

    fn set_status(&self, id: &str, status: RequestStatus) -> ReviewResult<()> {
        let mut requests = self.requests.lock().unwrap();
        let request = requests.iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ReviewError::api_error("update status", 404, "Request not found"))?;
        request.status = status;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn list_requests(&self, _query: &RequestQuery) -> ReviewResult<RequestPage> {
        Ok(RequestPage {
            requests: self.requests.lock().unwrap().clone(),
            total_pages: 1,
        }.into_reviewable())
    }

    async fn get_request(&self, id: &str) -> ReviewResult<ChangeRequest> {
        self.requests.lock().unwrap().iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| ReviewError::api_error("fetch request", 404, "Request not found"))
    }

    async fn update_changes(&self, id: &str, changes: &ChangeSet) -> ReviewResult<ChangeSet> {
        if self.fail_updates {
            return Err(ReviewError::api_error("update request", 503, "catalog unavailable"));
        }
        let mut requests = self.requests.lock().unwrap();
        let request = requests.iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ReviewError::api_error("update request", 404, "Request not found"))?;
        request.changes = changes.clone();
        Ok(changes.clone())
    }

    async fn approve(&self, id: &str) -> ReviewResult<()> {
        self.set_status(id, RequestStatus::Approved)
    }

    async fn reject(&self, id: &str) -> ReviewResult<()> {
        self.set_status(id, RequestStatus::Rejected)
    }

    async fn delete_all(&self) -> ReviewResult<()> {
        self.requests.lock().unwrap().clear();
        Ok(())
    }
}
