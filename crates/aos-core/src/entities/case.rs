use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::CriticalInsight;
use crate::enums::CaseStatus;
use crate::errors::CoreError;

/// Highest escalation level (HR).
pub const MAX_LEVEL: u8 = 5;

/// Actor and action recorded on the creation entry of every case.
pub const CREATION_ACTOR: &str = "system";
pub const CREATION_ACTION: &str = "Critical insight detected by AI";

/// A critical insight escalated through the approval hierarchy.
///
/// Status and level travel together in [`EscalationState`]; the timeline only
/// ever grows. `version` is bumped by every applied action and guards the
/// store's compare-and-swap update.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CriticalCase {
    pub id: String,
    pub session_id: String,
    pub insight: CriticalInsight,
    #[serde(flatten)]
    pub escalation: EscalationState,
    pub timeline: Vec<TimelineEntry>,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CriticalCase {
    /// A freshly opened case: `pending_supervisor`, level 1, one timeline entry.
    #[must_use]
    pub fn open(id: String, session_id: String, insight: CriticalInsight, now: DateTime<Utc>) -> Self {
        Self {
            id,
            session_id,
            insight,
            escalation: EscalationState::INITIAL,
            timeline: vec![TimelineEntry {
                timestamp: now,
                actor: CREATION_ACTOR.to_string(),
                action: CREATION_ACTION.to_string(),
                response: String::new(),
                private_notes: String::new(),
            }],
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub const fn status(&self) -> CaseStatus {
        self.escalation.status()
    }

    #[must_use]
    pub const fn level(&self) -> u8 {
        self.escalation.level()
    }
}

/// One attempted action on a case, recognized or not.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TimelineEntry {
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub action: String,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub private_notes: String,
}

/// Status plus the level it implies.
///
/// Fields are private: the only ways to obtain a state are the initial
/// constant, [`EscalationState::advance`], and [`EscalationState::restore`]
/// (which checks a stored pair). Deserialization goes through `restore` too.
/// The level never decreases.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(try_from = "StoredEscalationState")]
pub struct EscalationState {
    status: CaseStatus,
    #[schemars(range(min = 1, max = 5))]
    current_level: u8,
}

/// Unchecked wire form of [`EscalationState`].
#[derive(Deserialize, JsonSchema)]
struct StoredEscalationState {
    status: CaseStatus,
    #[schemars(range(min = 1, max = 5))]
    current_level: u8,
}

impl TryFrom<StoredEscalationState> for EscalationState {
    type Error = CoreError;

    fn try_from(stored: StoredEscalationState) -> Result<Self, Self::Error> {
        Self::restore(stored.status, stored.current_level)
    }
}

impl EscalationState {
    pub const INITIAL: Self = Self {
        status: CaseStatus::PendingSupervisor,
        current_level: 1,
    };

    #[must_use]
    pub const fn status(self) -> CaseStatus {
        self.status
    }

    #[must_use]
    pub const fn level(self) -> u8 {
        self.current_level
    }

    /// Move to `next`. Statuses with a table level raise the level to it;
    /// statuses without one keep the prior level.
    #[must_use]
    pub fn advance(self, next: CaseStatus) -> Self {
        let current_level = next
            .implied_level()
            .map_or(self.current_level, |implied| implied.max(self.current_level));
        Self {
            status: next,
            current_level,
        }
    }

    /// Rebuild a state from stored columns.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the level is outside 1..=5 or below
    /// the level its status implies.
    pub fn restore(status: CaseStatus, level: u8) -> Result<Self, CoreError> {
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(CoreError::Validation(format!(
                "case level {level} outside 1..={MAX_LEVEL}"
            )));
        }
        if let Some(implied) = status.implied_level()
            && level < implied
        {
            return Err(CoreError::Validation(format!(
                "case level {level} below the level {implied} implied by {status}"
            )));
        }
        Ok(Self {
            status,
            current_level: level,
        })
    }
}

impl Default for EscalationState {
    fn default() -> Self {
        Self::INITIAL
    }
}
