use std::env;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct ImportConfig {
    /// Rows per remote batch write
    pub batch_size: usize,
    pub retry_max_attempts: u32,
    pub retry_base_delay_ms: u64,
}

impl ImportConfig {
    pub fn new() -> Self {
        let batch_size = env::var("JITEN_BATCH_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(250);

        let retry_max_attempts = env::var("JITEN_RETRY_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        let retry_base_delay_ms = env::var("JITEN_RETRY_BASE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(250); // 250ms default

        Self {
            batch_size,
            retry_max_attempts,
            retry_base_delay_ms,
        }
    }
}
