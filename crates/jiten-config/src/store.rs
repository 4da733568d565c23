use std::env;

use serde::{Deserialize, Serialize};

/// Remote store endpoint settings; an unset URL means only the embedded
/// backend is available.
#[derive(Default, Serialize, Deserialize)]
pub struct StoreConfig {
    pub remote_url: Option<String>,
    pub remote_token: Option<String>,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self {
            remote_url: env::var("JITEN_REMOTE_URL").ok(),
            remote_token: env::var("JITEN_REMOTE_TOKEN").ok(),
        }
    }
}
