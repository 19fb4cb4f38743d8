use crate::config::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_EXCLUDED_KEYS, DEFAULT_PAGE_SIZE,
    DEFAULT_TIMEOUT_MINUTES, DEFAULT_TIMEOUT_SECS,
};

pub struct ConfigHelper;

impl ConfigHelper {
    pub fn default_base_url() -> String {
        DEFAULT_API_BASE_URL.to_string()
    }

    pub fn default_timeout_secs() -> u64 {
        DEFAULT_TIMEOUT_SECS
    }

    pub fn default_page_size() -> u32 {
        DEFAULT_PAGE_SIZE
    }

    pub fn default_excluded_keys() -> Vec<String> {
        DEFAULT_EXCLUDED_KEYS.iter().map(|key| key.to_string()).collect()
    }

    pub fn default_session_timeout_minutes() -> u64 {
        DEFAULT_TIMEOUT_MINUTES
    }

    pub fn default_open_browser() -> bool {
        true
    }

    pub fn default_format() -> String {
        "text".to_string()
    }

    pub fn default_color() -> bool {
        true
    }
}
