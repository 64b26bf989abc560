/// Pipeline configuration constants

/// Search endpoint queried with `?q=<query>`
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";

/// Desktop browser user agent sent with every search request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Attempts per search query before the record is marked as failed
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Randomized pause between two lookups, in milliseconds
pub const DEFAULT_MIN_DELAY_MS: u64 = 5000;
pub const DEFAULT_MAX_DELAY_MS: u64 = 8000;
