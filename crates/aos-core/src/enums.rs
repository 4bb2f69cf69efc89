//! Status enums, roles, entity types, and actions for AccountabilityOS.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` to enforce
//! valid transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Organizational role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    TeamLead,
    Am,
    Manager,
    HrHead,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::TeamLead => "team_lead",
            Self::Am => "am",
            Self::Manager => "manager",
            Self::HrHead => "hr_head",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

/// Direction of a performance score over the last period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MeetingLocation
// ---------------------------------------------------------------------------

/// Where a one-on-one took place.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MeetingLocation {
    #[default]
    Office,
    Remote,
    Hybrid,
}

impl MeetingLocation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Office => "office",
            Self::Remote => "remote",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for MeetingLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GrowthTrajectory
// ---------------------------------------------------------------------------

/// Supervisor's read of the employee's growth direction.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum GrowthTrajectory {
    Declining,
    Stagnant,
    #[default]
    Growing,
    Excelling,
}

impl GrowthTrajectory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Declining => "declining",
            Self::Stagnant => "stagnant",
            Self::Growing => "growing",
            Self::Excelling => "excelling",
        }
    }
}

impl fmt::Display for GrowthTrajectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Status of a one-on-one session.
///
/// ```text
/// upcoming → analyzing → completed
///                      → error
/// completed | error → analyzing   (resubmission)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Upcoming,
    Analyzing,
    Completed,
    Error,
}

impl SessionStatus {
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Upcoming => &[Self::Analyzing],
            Self::Analyzing => &[Self::Completed, Self::Error],
            Self::Completed => &[Self::Analyzing],
            Self::Error => &[Self::Analyzing],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Analyzing => "analyzing",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GoalSource
// ---------------------------------------------------------------------------

/// Where a coaching goal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GoalSource {
    Ai,
    Custom,
    OrgHealth,
}

impl GoalSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Custom => "custom",
            Self::OrgHealth => "org_health",
        }
    }
}

impl fmt::Display for GoalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GoalStatus
// ---------------------------------------------------------------------------

/// Status of a coaching goal.
///
/// ```text
/// pending → active
///         → pending_am_review → active   (AM upholds the AI proposal)
/// active  → pending_am_review → declined (AM confirms the decline)
/// ```
///
/// A decline never removes the goal; it parks it for second-level review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Pending,
    Active,
    PendingAmReview,
    Declined,
}

impl GoalStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Active, Self::PendingAmReview],
            Self::Active => &[Self::PendingAmReview],
            Self::PendingAmReview => &[Self::Active, Self::Declined],
            Self::Declined => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether progress check-ins may be recorded in this status.
    #[must_use]
    pub const fn accepts_check_ins(self) -> bool {
        !matches!(self, Self::Declined)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::PendingAmReview => "pending_am_review",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AmReviewDecision
// ---------------------------------------------------------------------------

/// Second-level ruling on a declined goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AmReviewDecision {
    /// Reinstate the goal as active.
    UpholdAi,
    /// Accept the employee's decline.
    ConfirmDecline,
}

impl AmReviewDecision {
    #[must_use]
    pub const fn resulting_status(self) -> GoalStatus {
        match self {
            Self::UpholdAi => GoalStatus::Active,
            Self::ConfirmDecline => GoalStatus::Declined,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UpholdAi => "uphold_ai",
            Self::ConfirmDecline => "confirm_decline",
        }
    }
}

impl fmt::Display for AmReviewDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CaseStatus
// ---------------------------------------------------------------------------

/// Status of a critical case as it climbs the approval hierarchy.
///
/// ```text
/// pending_supervisor(1) → pending_employee(2) → resolved
///                                             → pending_am(3) → pending_supervisor_retry
///                                                             → pending_employee
///                                                             → pending_manager(4) → pending_hr(5) → resolved
///                                                                                                  → pending_employee
/// ```
///
/// `pending_supervisor_retry` and `resolved` carry no level of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    PendingSupervisor,
    PendingEmployee,
    PendingAm,
    PendingSupervisorRetry,
    PendingManager,
    PendingHr,
    Resolved,
}

impl CaseStatus {
    /// Escalation level implied by this status, if the status has one.
    #[must_use]
    pub const fn implied_level(self) -> Option<u8> {
        match self {
            Self::PendingSupervisor => Some(1),
            Self::PendingEmployee => Some(2),
            Self::PendingAm => Some(3),
            Self::PendingManager => Some(4),
            Self::PendingHr => Some(5),
            Self::PendingSupervisorRetry | Self::Resolved => None,
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved)
    }

    /// Actions the strict policy accepts in this status.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn legal_actions(self) -> &'static [CaseAction] {
        match self {
            Self::PendingSupervisor | Self::PendingSupervisorRetry => {
                &[CaseAction::SupervisorRespond]
            }
            Self::PendingEmployee => &[
                CaseAction::EmployeeSatisfied,
                CaseAction::EmployeeNotSatisfied,
            ],
            Self::PendingAm => &[
                CaseAction::AmCoachSupervisor,
                CaseAction::AmAddressDirectly,
                CaseAction::AmEscalate,
            ],
            Self::PendingManager => &[CaseAction::ManagerReview],
            Self::PendingHr => &[CaseAction::HrAddress, CaseAction::HrFinal],
            Self::Resolved => &[],
        }
    }

    #[must_use]
    pub fn permits(self, action: CaseAction) -> bool {
        self.legal_actions().contains(&action)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingSupervisor => "pending_supervisor",
            Self::PendingEmployee => "pending_employee",
            Self::PendingAm => "pending_am",
            Self::PendingSupervisorRetry => "pending_supervisor_retry",
            Self::PendingManager => "pending_manager",
            Self::PendingHr => "pending_hr",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CaseAction
// ---------------------------------------------------------------------------

/// Recognized actions on a critical case.
///
/// Actions arrive as free strings; anything outside this vocabulary is still
/// recorded on the timeline but never moves the case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CaseAction {
    SupervisorRespond,
    EmployeeSatisfied,
    EmployeeNotSatisfied,
    AmCoachSupervisor,
    AmAddressDirectly,
    AmEscalate,
    ManagerReview,
    HrAddress,
    HrFinal,
}

impl CaseAction {
    pub const ALL: &'static [Self] = &[
        Self::SupervisorRespond,
        Self::EmployeeSatisfied,
        Self::EmployeeNotSatisfied,
        Self::AmCoachSupervisor,
        Self::AmAddressDirectly,
        Self::AmEscalate,
        Self::ManagerReview,
        Self::HrAddress,
        Self::HrFinal,
    ];

    /// Parse an action name. Returns `None` for anything unrecognized.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.as_str() == raw)
    }

    /// Status a case moves to when this action is applied.
    #[must_use]
    pub const fn target_status(self) -> CaseStatus {
        match self {
            Self::SupervisorRespond | Self::AmAddressDirectly | Self::HrAddress => {
                CaseStatus::PendingEmployee
            }
            Self::EmployeeSatisfied | Self::HrFinal => CaseStatus::Resolved,
            Self::EmployeeNotSatisfied => CaseStatus::PendingAm,
            Self::AmCoachSupervisor => CaseStatus::PendingSupervisorRetry,
            Self::AmEscalate => CaseStatus::PendingManager,
            Self::ManagerReview => CaseStatus::PendingHr,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SupervisorRespond => "supervisor_respond",
            Self::EmployeeSatisfied => "employee_satisfied",
            Self::EmployeeNotSatisfied => "employee_not_satisfied",
            Self::AmCoachSupervisor => "am_coach_supervisor",
            Self::AmAddressDirectly => "am_address_directly",
            Self::AmEscalate => "am_escalate",
            Self::ManagerReview => "manager_review",
            Self::HrAddress => "hr_address",
            Self::HrFinal => "hr_final",
        }
    }
}

impl fmt::Display for CaseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Kind of mutation recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    StatusChanged,
    AnalysisAccepted,
    CaseAction,
    CheckIn,
    Seeded,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::StatusChanged => "status_changed",
            Self::AnalysisAccepted => "analysis_accepted",
            Self::CaseAction => "case_action",
            Self::CheckIn => "check_in",
            Self::Seeded => "seeded",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Persisted entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    User,
    Session,
    Insight,
    Goal,
    Case,
    Audit,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Session => "session",
            Self::Insight => "insight",
            Self::Goal => "goal",
            Self::Case => "case",
            Self::Audit => "audit",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TrailOp
// ---------------------------------------------------------------------------

/// Kind of operation recorded in the JSONL trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrailOp {
    Create,
    Update,
    Transition,
    Append,
}

impl TrailOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Transition => "transition",
            Self::Append => "append",
        }
    }
}

impl fmt::Display for TrailOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
