//! # aos-orchestrator
//!
//! The two workflows that span the record store and the oracle:
//! - [`FeedbackOrchestrator`]: submit feedback, analyze it, fan the analysis
//!   out, and recover submissions interrupted mid-way.
//! - [`EscalationEngine`]: apply actor actions to critical cases under a
//!   transition policy, retrying lost compare-and-swap races.

mod error;
mod escalation;
mod feedback;

pub use error::OrchestratorError;
pub use escalation::EscalationEngine;
pub use feedback::FeedbackOrchestrator;
