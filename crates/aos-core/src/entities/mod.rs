//! Entity structs for all AccountabilityOS domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `aos-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON roundtrip and schema validation.

mod analysis;
mod audit;
mod case;
mod goal;
mod insight;
mod session;
mod user;

pub use analysis::{
    ActionItem, AnalysisResult, CoachingRecommendation, CriticalInsight, MissedSignal,
    RecommendedResource, StrengthObserved, SwotAnalysis,
};
pub use audit::AuditEntry;
pub use case::{
    CREATION_ACTION, CREATION_ACTOR, CriticalCase, EscalationState, MAX_LEVEL, TimelineEntry,
};
pub use goal::{CheckIn, CoachingGoal};
pub use insight::Insight;
pub use session::{FeedbackPayload, FeedbackSubmission, Session};
pub use user::{PerformanceScores, PerformanceTrends, User};
