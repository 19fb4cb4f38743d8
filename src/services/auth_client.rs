use std::fs;
use std::path::{Path, PathBuf};
use reqwest::{Client, StatusCode};
use crate::config::constants::sleep_duration_secs;
use crate::errors::{ReviewError, ReviewResult};
use crate::structs::api::auth::{ApiMessage, SignInRequest, SignInResponse, User};
use crate::structs::config::api_config::ApiConfig;

/// Obtains the admin bearer token and keeps it on disk between runs.
/// Access control itself is enforced by the API.
pub struct AuthClient {
    base_url: String,
    client: Client,
    token_path: PathBuf,
    token_env: Option<String>,
}

impl AuthClient {
    pub fn new(api_config: &ApiConfig, token_path: PathBuf) -> ReviewResult<Self> {
        let client = Client::builder()
            .timeout(sleep_duration_secs(api_config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: format!("{}/auth", api_config.base_url.trim_end_matches('/')),
            client,
            token_path,
            token_env: api_config.token_env.clone(),
        })
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> ReviewResult<()> {
        let body = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self.client
            .post(format!("{}/admin", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let message = Self::server_message(response).await
                .unwrap_or_else(|| "invalid credentials".to_string());
            return Err(ReviewError::AuthenticationError { reason: message });
        }

        let SignInResponse { token } = response.json().await?;
        Self::write_token(&self.token_path, &token)?;
        log::info!("🔑 Signed in as {}", email);
        Ok(())
    }

    /// `None` when no token is available or the API no longer accepts it.
    pub async fn current_user(&self) -> ReviewResult<Option<User>> {
        let Some(token) = self.token()? else {
            return Ok(None);
        };

        let response = self.client
            .get(format!("{}/me", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(Some(response.json().await?)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status => {
                let message = Self::server_message(response).await
                    .unwrap_or_else(|| "failed to fetch user".to_string());
                Err(ReviewError::api_error("fetch current user", status.as_u16(), &message))
            }
        }
    }

    pub fn sign_out(&self) -> ReviewResult<()> {
        if self.token_path.exists() {
            fs::remove_file(&self.token_path)?;
        }
        log::info!("👋 Signed out");
        Ok(())
    }

    /// Token from the configured environment variable, else the token file.
    pub fn token(&self) -> ReviewResult<Option<String>> {
        if let Some(value) = self.token_env.as_deref().and_then(|name| std::env::var(name).ok()) {
            if !value.trim().is_empty() {
                return Ok(Some(value.trim().to_string()));
            }
        }
        Self::read_token(&self.token_path)
    }

    pub fn read_token(path: &Path) -> ReviewResult<Option<String>> {
        if !path.exists() {
            return Ok(None);
        }
        let token = fs::read_to_string(path)
            .map_err(|e| ReviewError::file_error(&path.display().to_string(), "read token", &e.to_string()))?;
        let token = token.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    pub fn write_token(path: &Path, token: &str) -> ReviewResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, token)
            .map_err(|e| ReviewError::file_error(&path.display().to_string(), "write token", &e.to_string()))
    }

    async fn server_message(response: reqwest::Response) -> Option<String> {
        response.json::<ApiMessage>().await.ok().and_then(|m| m.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("token");
        assert_eq!(AuthClient::read_token(&path).unwrap(), None);
        AuthClient::write_token(&path, "abc123\n").unwrap();
        assert_eq!(AuthClient::read_token(&path).unwrap(), Some("abc123".to_string()));
    }

    #[test]
    fn sign_out_removes_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        AuthClient::write_token(&path, "abc123").unwrap();
        let client = AuthClient::new(&ApiConfig::default(), path.clone()).unwrap();
        client.sign_out().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn no_token_means_no_current_user() {
        let dir = tempfile::tempdir().unwrap();
        let client = AuthClient::new(&ApiConfig::default(), dir.path().join("token")).unwrap();
        assert_eq!(tokio_test::block_on(client.current_user()).unwrap(), None);
    }

    #[test]
    fn token_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        AuthClient::write_token(&path, "from-file").unwrap();

        let config = ApiConfig {
            token_env: Some("PARFUM_REVIEW_TEST_TOKEN_OVERRIDE".to_string()),
            ..ApiConfig::default()
        };
        std::env::set_var("PARFUM_REVIEW_TEST_TOKEN_OVERRIDE", "from-env");
        let client = AuthClient::new(&config, path).unwrap();
        assert_eq!(client.token().unwrap().as_deref(), Some("from-env"));
        std::env::remove_var("PARFUM_REVIEW_TEST_TOKEN_OVERRIDE");
    }
}
