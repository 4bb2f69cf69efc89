//! Critical-case state machine.
//!
//! Pure planning only: [`plan`] turns the current [`EscalationState`] and an
//! attempted action into a [`CaseTransition`], and [`apply`] folds a transition
//! into an in-memory case. Persisting the transition atomically is the
//! store's job.
//!
//! Under [`TransitionPolicy::Permissive`] every attempt is accepted. Unknown
//! actions leave the status alone, but still produce a timeline entry, since
//! the timeline records everything that was attempted. Under
//! [`TransitionPolicy::Strict`] only the actions the current status permits
//! are accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{CriticalCase, EscalationState, TimelineEntry};
use crate::enums::CaseAction;
use crate::errors::CoreError;

/// How out-of-vocabulary or out-of-state actions are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Apply the action table regardless of the current status.
    #[default]
    Permissive,
    /// Reject actions not legal in the current status with `IllegalTransition`.
    Strict,
}

impl TransitionPolicy {
    #[must_use]
    pub const fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Permissive }
    }
}

/// The outcome of planning one action against a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseTransition {
    pub from: EscalationState,
    pub to: EscalationState,
    /// `None` when the action string was not recognized.
    pub action: Option<CaseAction>,
    /// The entry to append to the timeline.
    pub entry: TimelineEntry,
}

impl CaseTransition {
    #[must_use]
    pub fn status_changed(&self) -> bool {
        self.from.status() != self.to.status()
    }
}

/// Plan the effect of `action` on a case currently in `state`.
///
/// # Errors
///
/// Returns `CoreError::IllegalTransition` under the strict policy when the
/// action is unknown or not permitted in the current status. The permissive
/// policy never fails.
pub fn plan(
    state: EscalationState,
    action: &str,
    response: &str,
    private_notes: &str,
    now: DateTime<Utc>,
    policy: TransitionPolicy,
) -> Result<CaseTransition, CoreError> {
    let parsed = CaseAction::parse(action);

    if policy == TransitionPolicy::Strict && !parsed.is_some_and(|a| state.status().permits(a)) {
        return Err(CoreError::IllegalTransition {
            status: state.status().to_string(),
            action: action.to_string(),
        });
    }

    let to = parsed.map_or(state, |a| state.advance(a.target_status()));

    Ok(CaseTransition {
        from: state,
        to,
        action: parsed,
        entry: TimelineEntry {
            timestamp: now,
            actor: action.to_string(),
            action: action.to_string(),
            response: response.to_string(),
            private_notes: private_notes.to_string(),
        },
    })
}

/// Fold a planned transition into a copy of `case`.
#[must_use]
pub fn apply(case: &CriticalCase, transition: &CaseTransition) -> CriticalCase {
    let mut next = case.clone();
    next.escalation = transition.to;
    next.timeline.push(transition.entry.clone());
    next.version += 1;
    next.updated_at = transition.entry.timestamp;
    next
}
