use serde::{Deserialize, Serialize};
use crate::helpers::config_helper::ConfigHelper;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "ConfigHelper::default_base_url")]
    pub base_url: String,

    #[serde(default = "ConfigHelper::default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "ConfigHelper::default_page_size")]
    pub page_size: u32,

    /// Environment variable whose value overrides the stored token.
    #[serde(default)]
    pub token_env: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: ConfigHelper::default_base_url(),
            timeout_secs: ConfigHelper::default_timeout_secs(),
            page_size: ConfigHelper::default_page_size(),
            token_env: None,
        }
    }
}
