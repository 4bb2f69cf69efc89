//! General application configuration.

use aos_core::ids::{DEFAULT_SUPERVISOR_ID, DEFAULT_SUPERVISOR_NAME};
use serde::{Deserialize, Serialize};

const fn default_limit() -> u32 {
    20
}

fn default_supervisor_id() -> String {
    DEFAULT_SUPERVISOR_ID.to_string()
}

fn default_supervisor_name() -> String {
    DEFAULT_SUPERVISOR_NAME.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Supervisor assigned to sessions scheduled without one.
    #[serde(default = "default_supervisor_id")]
    pub default_supervisor_id: String,

    #[serde(default = "default_supervisor_name")]
    pub default_supervisor_name: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            default_supervisor_id: default_supervisor_id(),
            default_supervisor_name: default_supervisor_name(),
        }
    }
}
