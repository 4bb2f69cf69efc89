//! Record store configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_db_path() -> String {
    ".aos/aos.db".to_string()
}

fn default_trail_dir() -> String {
    ".aos/trail".to_string()
}

const fn default_trail_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Path of the local libSQL database file. `:memory:` for an ephemeral store.
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Directory for per-session JSONL trail files.
    #[serde(default = "default_trail_dir")]
    pub trail_dir: String,

    #[serde(default = "default_trail_enabled")]
    pub trail_enabled: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            trail_dir: default_trail_dir(),
            trail_enabled: default_trail_enabled(),
        }
    }
}

impl StoreConfig {
    /// Trail directory, or `None` when the trail is disabled.
    #[must_use]
    pub fn trail_path(&self) -> Option<PathBuf> {
        (self.trail_enabled && !self.trail_dir.is_empty()).then(|| PathBuf::from(&self.trail_dir))
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.db_path == ":memory:"
    }
}
