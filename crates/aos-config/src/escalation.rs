//! Critical-case escalation configuration.

use aos_core::escalation::TransitionPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ConfigError;

const fn default_cas_max_attempts() -> u32 {
    5
}

const fn default_cas_base_delay_ms() -> u64 {
    20
}

const fn default_cas_max_delay_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EscalationConfig {
    /// Reject actions that are not legal in the case's current status.
    #[serde(default)]
    pub strict_transitions: bool,

    /// Attempts at the compare-and-swap case update before giving up.
    #[serde(default = "default_cas_max_attempts")]
    pub cas_max_attempts: u32,

    #[serde(default = "default_cas_base_delay_ms")]
    pub cas_base_delay_ms: u64,

    #[serde(default = "default_cas_max_delay_ms")]
    pub cas_max_delay_ms: u64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            strict_transitions: false,
            cas_max_attempts: default_cas_max_attempts(),
            cas_base_delay_ms: default_cas_base_delay_ms(),
            cas_max_delay_ms: default_cas_max_delay_ms(),
        }
    }
}

impl EscalationConfig {
    #[must_use]
    pub const fn policy(&self) -> TransitionPolicy {
        TransitionPolicy::from_strict(self.strict_transitions)
    }

    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        Duration::from_millis(self.cas_base_delay_ms)
    }

    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        Duration::from_millis(self.cas_max_delay_ms)
    }

    /// Reject settings the retry loop cannot honor.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for zero attempts or a base delay
    /// above the max delay.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.cas_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "escalation.cas_max_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.cas_base_delay_ms > self.cas_max_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "escalation.cas_base_delay_ms".into(),
                reason: format!("exceeds cas_max_delay_ms ({})", self.cas_max_delay_ms),
            });
        }
        Ok(())
    }
}
