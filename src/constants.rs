use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

/// Process start, reported by `/health`.
pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const RATE_LIMIT_LIMIT_HEADER: &str = "X-RateLimit-Limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "X-RateLimit-Remaining";
