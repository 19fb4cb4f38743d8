use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://hltback.parfumetrika.ru";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_TIMEOUT_MINUTES: u64 = 30;
pub const DEFAULT_SERVER_PORT_RANGE_START: u16 = 8080;
pub const DEFAULT_SERVER_PORT_RANGE_END: u16 = 8200;
pub const MAX_SESSION_ID_LENGTH: usize = 64;
pub const SERVER_SHUTDOWN_GRACE_PERIOD_MS: u64 = 100;
pub const SESSION_POLL_INTERVAL_MS: u64 = 500;

pub const CONFIG_DIR_NAME: &str = ".parfum-review";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const TOKEN_FILE_NAME: &str = "token";

/// Fields never shown in a change diff.
pub const DEFAULT_EXCLUDED_KEYS: &[&str] = &["description_links", "reviews"];

pub fn timeout_duration(minutes: u64) -> Duration {
    Duration::from_secs(minutes * 60)
}

pub fn sleep_duration_secs(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}

pub fn sleep_duration_millis(milliseconds: u64) -> Duration {
    Duration::from_millis(milliseconds)
}
