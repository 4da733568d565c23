use serde::{Deserialize, Serialize};

use self::import::ImportConfig;
use self::store::StoreConfig;

pub mod import;
pub mod store;

#[derive(Serialize, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub import: ImportConfig,
}

impl Config {
    pub fn new() -> Self {
        Config {
            store: StoreConfig::new(),
            import: ImportConfig::new(),
        }
    }
}
