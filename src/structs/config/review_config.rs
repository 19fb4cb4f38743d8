use serde::{Deserialize, Serialize};
use crate::helpers::config_helper::ConfigHelper;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReviewConfig {
    #[serde(default = "ConfigHelper::default_excluded_keys")]
    pub excluded_keys: Vec<String>,

    #[serde(default = "ConfigHelper::default_session_timeout_minutes")]
    pub session_timeout_minutes: u64,

    #[serde(default = "ConfigHelper::default_open_browser")]
    pub open_browser: bool,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            excluded_keys: ConfigHelper::default_excluded_keys(),
            session_timeout_minutes: ConfigHelper::default_session_timeout_minutes(),
            open_browser: ConfigHelper::default_open_browser(),
        }
    }
}
