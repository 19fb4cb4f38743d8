use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use crate::config::constants::sleep_duration_secs;
use crate::enums::store_error::StoreError;
use crate::errors::ReviewResult;
use crate::structs::api::auth::ApiMessage;
use crate::structs::api::change_request::ChangeRequest;
use crate::structs::api::request_page::RequestPage;
use crate::structs::api::request_query::RequestQuery;
use crate::structs::api::update_response::UpdateResponse;
use crate::structs::change_set::ChangeSet;
use crate::structs::config::api_config::ApiConfig;
use crate::traits::record_store::RecordStore;

/// HTTP implementation of [`RecordStore`] for the catalog's `/requests` API.
#[derive(Clone)]
pub struct RequestsClient {
    base_url: String,
    client: Client,
    token: Option<String>,
}

impl RequestsClient {
    pub fn new(api_config: &ApiConfig, token: Option<String>) -> ReviewResult<Self> {
        let client = Client::builder()
            .timeout(sleep_duration_secs(api_config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: api_config.base_url.trim_end_matches('/').to_string(),
            client,
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, operation: &str, builder: RequestBuilder) -> Result<Response, StoreError> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();

        if status.is_success() {
            log::debug!("{} → {}", operation, status);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiMessage>(&body)
            .ok()
            .and_then(|m| m.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

        log::warn!("⚠️ {} failed with status {}: {}", operation, status, message);

        if status == StatusCode::UNAUTHORIZED {
            return Err(StoreError::Unauthorized(message));
        }

        Err(StoreError::Api {
            operation: operation.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(operation: &str, response: Response) -> Result<T, StoreError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| StoreError::Decode {
            operation: operation.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl RecordStore for RequestsClient {

    async fn list_requests(&self, query: &RequestQuery) -> ReviewResult<RequestPage> {
        let operation = "list requests";
        let builder = self.client
            .get(self.url("requests"))
            .query(&query.to_query_pairs());

        let response = self.send(operation, builder).await?;
        let page: RequestPage = Self::decode(operation, response).await?;
        Ok(page.into_reviewable())
    }

    async fn get_request(&self, id: &str) -> ReviewResult<ChangeRequest> {
        let operation = "fetch request";
        let response = self.send(operation, self.client.get(self.url(&format!("requests/{}", id)))).await?;
        let mut body: Value = Self::decode(operation, response).await?;

        // Accept both a bare request and a `{ "request": ... }` envelope.
        if let Some(inner) = body.get_mut("request").map(Value::take) {
            body = inner;
        }

        let request = serde_json::from_value(body).map_err(|e| StoreError::Decode {
            operation: operation.to_string(),
            reason: e.to_string(),
        })?;
        Ok(request)
    }

    async fn update_changes(&self, id: &str, changes: &ChangeSet) -> ReviewResult<ChangeSet> {
        let operation = "update request";
        let builder = self.client
            .put(self.url(&format!("requests/{}", id)))
            .json(&json!({ "changes": changes }));

        let response = self.send(operation, builder).await?;
        let updated: UpdateResponse = Self::decode(operation, response).await?;
        log::info!("💾 Saved changes for request {}", id);
        Ok(updated.request.changes)
    }

    async fn approve(&self, id: &str) -> ReviewResult<()> {
        self.send("approve request", self.client.put(self.url(&format!("requests/approve/{}", id)))).await?;
        log::info!("✅ Request {} approved", id);
        Ok(())
    }

    async fn reject(&self, id: &str) -> ReviewResult<()> {
        self.send("reject request", self.client.put(self.url(&format!("requests/reject/{}", id)))).await?;
        log::info!("❌ Request {} rejected", id);
        Ok(())
    }

    async fn delete_all(&self) -> ReviewResult<()> {
        self.send("delete all requests", self.client.delete(self.url("requests"))).await?;
        log::info!("🗑️ All requests deleted");
        Ok(())
    }
}
