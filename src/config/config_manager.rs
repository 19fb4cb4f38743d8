use std::path::{Path, PathBuf};
use std::fs;
use crate::config::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, TOKEN_FILE_NAME};
use crate::errors::{ReviewError, ReviewResult};
use crate::structs::config::config::Config;

const SAMPLE_CONFIG: &str = r#"# parfum-review configuration

[api]
# Catalog API the change requests are read from and written to
base_url = "https://hltback.parfumetrika.ru"

# Request timeout in seconds
timeout_secs = 30

# Requests shown per page by `parfum-review list`
page_size = 10

# Optional environment variable holding a bearer token.
# When set it takes precedence over the token saved by `parfum-review login`.
# token_env = "PARFUM_REVIEW_TOKEN"

[review]
# Fields never shown in a change diff
excluded_keys = ["description_links", "reviews"]

# How long `parfum-review review` waits for the browser session (minutes)
session_timeout_minutes = 30

# Open the review page in the default browser
open_browser = true

[output]
# "text" or "json"
format = "text"

# Colored diff output
color = true
"#;

pub struct ConfigManager;

impl ConfigManager {

    pub fn config_dir() -> PathBuf {
        dirs::home_dir().map(|d| d.join(CONFIG_DIR_NAME)).unwrap_or_default()
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE_NAME)
    }

    pub fn token_path() -> PathBuf {
        Self::config_dir().join(TOKEN_FILE_NAME)
    }

    pub fn load() -> ReviewResult<Config> {
        Self::load_from(&Self::config_path())
    }

    /// Missing file yields the default configuration.
    pub fn load_from(path: &Path) -> ReviewResult<Config> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        log::info!("📋 Loading config from: {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| ReviewError::ConfigurationFileError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn create_sample_config() -> ReviewResult<PathBuf> {
        let path = Self::config_path();
        Self::create_sample_config_at(&path)?;
        Ok(path)
    }

    pub fn create_sample_config_at(path: &Path) -> ReviewResult<()> {
        if path.exists() {
            return Err(ReviewError::config_error(
                "configuration file already exists",
                None,
                Some(&format!("Edit {} or remove it first", path.display())),
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, SAMPLE_CONFIG)?;
        println!("✅ Created sample config at: {}", path.display());
        Ok(())
    }

    pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let base_url = config.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            errors.push(format!("api.base_url must start with http:// or https://: '{}'", config.api.base_url));
        }

        if config.api.page_size == 0 {
            errors.push("api.page_size must be at least 1".to_string());
        }

        if config.api.timeout_secs == 0 {
            errors.push("api.timeout_secs must be at least 1".to_string());
        }

        if config.review.session_timeout_minutes == 0 {
            errors.push("review.session_timeout_minutes must be at least 1".to_string());
        }

        if config.review.excluded_keys.iter().any(|key| key.trim().is_empty()) {
            errors.push("review.excluded_keys must not contain empty names".to_string());
        }

        if !matches!(config.output.format.as_str(), "text" | "json") {
            errors.push(format!("output.format must be 'text' or 'json': '{}'", config.output.format));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
