// src/config/consts.rs

// Net config
pub const BASE_URL_TEMPLATE: &str = "https://steamcommunity.com/id/{custom_url}/gcpd/570";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const REQUEST_PAUSE_MS: u64 = 2_000; // be polite
pub const PLACEHOLDER_URL: &str = "YOUR_CUSTOM_URL";
pub const SESSION_COOKIE: &str = "sessionid";

// Retry defaults (overridable in config.json)
pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_INITIAL_BACKOFF_SECS: u64 = 5;

// Local storage
pub const CONFIG_FILE: &str = "config.json";
pub const DATA_DIR: &str = "data";
pub const PROCESSED_SUBDIR: &str = "processed";
pub const LOG_FILE: &str = "debug.log";
pub const FINAL_PAGE_KEY: &str = "final_page";
pub const PAGE_EXT: &str = "json";
