use async_trait::async_trait;
use crate::errors::ReviewResult;
use crate::structs::api::change_request::ChangeRequest;
use crate::structs::api::request_page::RequestPage;
use crate::structs::api::request_query::RequestQuery;
use crate::structs::change_set::ChangeSet;

/// Remote store of change requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {

    async fn list_requests(&self, query: &RequestQuery) -> ReviewResult<RequestPage>;

    async fn get_request(&self, id: &str) -> ReviewResult<ChangeRequest>;

    /// Returns the changes as persisted by the store.
    async fn update_changes(&self, id: &str, changes: &ChangeSet) -> ReviewResult<ChangeSet>;

    async fn approve(&self, id: &str) -> ReviewResult<()>;

    async fn reject(&self, id: &str) -> ReviewResult<()>;

    async fn delete_all(&self) -> ReviewResult<()>;
}
