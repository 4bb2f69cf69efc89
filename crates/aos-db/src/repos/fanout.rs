//! Fan-out: turning an accepted analysis into insights, goals, and a case.
//!
//! [`AosService::apply_fan_out`] applies a [`FanOutPlan`] in one transaction
//! together with the session's move to `completed`. Rows are keyed by their
//! plan `origin_key`, so applying the same plan twice creates nothing new.

use chrono::{DateTime, Utc};

use aos_core::audit_detail::FanOutDetail;
use aos_core::entities::{CoachingGoal, CriticalCase, Insight, Session};
use aos_core::enums::{AuditAction, EntityType, GoalSource, GoalStatus, SessionStatus, TrailOp};
use aos_core::fanout::{FanOutPlan, PlannedCase, PlannedGoal, PlannedInsight};
use aos_core::ids::{PREFIX_CASE, PREFIX_GOAL, PREFIX_INSIGHT};
use aos_core::trail::TrailOperation;

use crate::error::DatabaseError;
use crate::helpers::{get_u32, to_optional_json};
use crate::repos::audit::Mutation;
use crate::repos::goal::{GOAL_COLUMNS, row_to_goal};
use crate::repos::insight::{INSIGHT_COLUMNS, row_to_insight};
use crate::service::AosService;

/// Records belonging to an applied plan, whether created now or by an
/// earlier attempt.
#[derive(Debug, Clone)]
pub struct FanOutOutcome {
    pub session: Session,
    pub insights: Vec<Insight>,
    pub goals: Vec<CoachingGoal>,
    pub case: Option<CriticalCase>,
    /// How many rows this call inserted (0 on a full replay).
    pub created: u32,
}

/// What [`AosService::write_fan_out`] wrote before commit.
struct AppliedFanOut {
    ops: Vec<TrailOperation>,
    insights_created: u32,
    goals_created: u32,
    case_created: bool,
    case: Option<CriticalCase>,
}

impl AosService {
    /// Apply `plan` and complete its session.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the session is not
    /// `analyzing` at `plan.analysis_version`. Any failure rolls the whole
    /// fan-out back; the session stays `analyzing` and can be replayed.
    pub async fn apply_fan_out(&self, plan: &FanOutPlan) -> Result<FanOutOutcome, DatabaseError> {
        let now = Utc::now();
        let tx = self.db().conn().transaction().await?;

        let applied = match self.write_fan_out(plan, now).await {
            Ok(applied) => applied,
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(session_id = %plan.session_id, error = %rollback, "fan-out rollback failed");
                }
                return Err(e);
            }
        };

        tx.commit().await?;
        self.write_trail(&applied.ops)?;

        let created = applied.insights_created + applied.goals_created + u32::from(applied.case_created);
        tracing::info!(
            session_id = %plan.session_id,
            version = plan.analysis_version,
            insights_created = applied.insights_created,
            goals_created = applied.goals_created,
            case_created = applied.case_created,
            "fan-out committed"
        );

        Ok(FanOutOutcome {
            session: self.get_session(&plan.session_id).await?,
            insights: self.insights_by_origin(plan).await?,
            goals: self.goals_by_origin(plan).await?,
            case: applied.case,
            created,
        })
    }

    /// Every statement of the fan-out, run inside the caller's transaction.
    async fn write_fan_out(
        &self,
        plan: &FanOutPlan,
        now: DateTime<Utc>,
    ) -> Result<AppliedFanOut, DatabaseError> {
        let mut ops = Vec::new();

        self.check_fan_out_target(plan).await?;

        let mut insights_created = 0u32;
        for planned in &plan.insights {
            if let Some(op) = self.insert_planned_insight(plan, planned, now).await? {
                insights_created += 1;
                ops.push(op);
            }
        }

        let mut goals_created = 0u32;
        for planned in &plan.goals {
            if let Some(op) = self.insert_planned_goal(plan, planned, now).await? {
                goals_created += 1;
                ops.push(op);
            }
        }

        let mut case_created = false;
        let case = match &plan.case {
            Some(planned) => {
                let (case, op) = self.insert_planned_case(plan, planned, now).await?;
                if let Some(op) = op {
                    case_created = true;
                    ops.push(op);
                }
                Some(case)
            }
            None => None,
        };

        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE sessions SET status = 'completed', updated_at = ?1
                 WHERE id = ?2 AND status = 'analyzing' AND analysis_version = ?3",
                libsql::params![
                    now.to_rfc3339(),
                    plan.session_id.as_str(),
                    i64::from(plan.analysis_version)
                ],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::Conflict(format!(
                "session {} left analyzing during fan-out",
                plan.session_id
            )));
        }

        let detail = FanOutDetail {
            analysis_version: plan.analysis_version,
            insights_created,
            goals_created,
            case_id: case.as_ref().map(|c| c.id.clone()),
        };
        ops.push(
            self.audit_mutation(
                &Mutation {
                    session_id: Some(&plan.session_id),
                    entity: EntityType::Session,
                    entity_id: &plan.session_id,
                    action: AuditAction::StatusChanged,
                    detail: Some(serde_json::to_value(&detail)?),
                    op: TrailOp::Transition,
                    data: serde_json::json!({
                        "from": SessionStatus::Analyzing,
                        "to": SessionStatus::Completed,
                        "analysis_version": plan.analysis_version,
                    }),
                },
                now,
            )
            .await?,
        );

        Ok(AppliedFanOut {
            ops,
            insights_created,
            goals_created,
            case_created,
            case,
        })
    }

    async fn check_fan_out_target(&self, plan: &FanOutPlan) -> Result<(), DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT status, analysis_version FROM sessions WHERE id = ?1",
                [plan.session_id.as_str()],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("session", &plan.session_id))?;
        let status = row.get::<String>(0)?;
        let version = get_u32(&row, 1)?;

        if status != SessionStatus::Analyzing.as_str() || version != plan.analysis_version {
            return Err(DatabaseError::InvalidState(format!(
                "session {} is {status} at version {version}, not analyzing version {}",
                plan.session_id, plan.analysis_version
            )));
        }
        Ok(())
    }

    async fn insert_planned_insight(
        &self,
        plan: &FanOutPlan,
        planned: &PlannedInsight,
        now: DateTime<Utc>,
    ) -> Result<Option<TrailOperation>, DatabaseError> {
        let id = self.db().generate_id(PREFIX_INSIGHT).await?;
        let inserted = self
            .db()
            .conn()
            .execute(
                "INSERT INTO insights (id, user_id, session_id, content, origin_key, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(origin_key) DO NOTHING",
                libsql::params![
                    id.as_str(),
                    planned.user_id.as_str(),
                    plan.session_id.as_str(),
                    planned.content.as_str(),
                    planned.origin_key.as_str(),
                    now.to_rfc3339()
                ],
            )
            .await?;
        if inserted == 0 {
            return Ok(None);
        }

        let insight = Insight {
            id: id.clone(),
            user_id: planned.user_id.clone(),
            session_id: Some(plan.session_id.clone()),
            content: planned.content.clone(),
            created_at: now,
        };
        let op = self
            .audit_mutation(
                &Mutation {
                    session_id: Some(&plan.session_id),
                    entity: EntityType::Insight,
                    entity_id: &id,
                    action: AuditAction::Created,
                    detail: None,
                    op: TrailOp::Create,
                    data: serde_json::to_value(&insight)?,
                },
                now,
            )
            .await?;
        Ok(Some(op))
    }

    async fn insert_planned_goal(
        &self,
        plan: &FanOutPlan,
        planned: &PlannedGoal,
        now: DateTime<Utc>,
    ) -> Result<Option<TrailOperation>, DatabaseError> {
        let id = self.db().generate_id(PREFIX_GOAL).await?;
        let inserted = self
            .db()
            .conn()
            .execute(
                "INSERT INTO coaching_goals (id, user_id, title, description, source, status, progress,
                                             resource, session_id, origin_key, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, 'ai', 'pending', 0, ?5, ?6, ?7, ?8, ?8)
                 ON CONFLICT(origin_key) DO NOTHING",
                libsql::params![
                    id.as_str(),
                    planned.user_id.as_str(),
                    planned.title.as_str(),
                    planned.description.as_str(),
                    to_optional_json(planned.resource.as_ref())?,
                    plan.session_id.as_str(),
                    planned.origin_key.as_str(),
                    now.to_rfc3339()
                ],
            )
            .await?;
        if inserted == 0 {
            return Ok(None);
        }

        let goal = CoachingGoal {
            id: id.clone(),
            user_id: planned.user_id.clone(),
            title: planned.title.clone(),
            description: planned.description.clone(),
            source: GoalSource::Ai,
            status: GoalStatus::Pending,
            progress: 0,
            start_date: None,
            target_end_date: None,
            check_ins: Vec::new(),
            resource: planned.resource.clone(),
            decline_reason: None,
            upheld_by_am: false,
            session_id: Some(plan.session_id.clone()),
            created_at: now,
            updated_at: now,
        };
        let op = self
            .audit_mutation(
                &Mutation {
                    session_id: Some(&plan.session_id),
                    entity: EntityType::Goal,
                    entity_id: &id,
                    action: AuditAction::Created,
                    detail: None,
                    op: TrailOp::Create,
                    data: serde_json::to_value(&goal)?,
                },
                now,
            )
            .await?;
        Ok(Some(op))
    }

    /// Insert the case for this analysis version. A replay of the same
    /// version finds the row an earlier attempt wrote and returns it.
    async fn insert_planned_case(
        &self,
        plan: &FanOutPlan,
        planned: &PlannedCase,
        now: DateTime<Utc>,
    ) -> Result<(CriticalCase, Option<TrailOperation>), DatabaseError> {
        let id = self.db().generate_id(PREFIX_CASE).await?;
        let case = CriticalCase::open(id, plan.session_id.clone(), planned.insight.clone(), now);

        let inserted = self
            .db()
            .conn()
            .execute(
                "INSERT INTO critical_cases (id, session_id, insight, status, current_level, timeline,
                                             version, origin_key, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8, ?8)
                 ON CONFLICT(origin_key) DO NOTHING",
                libsql::params![
                    case.id.as_str(),
                    case.session_id.as_str(),
                    serde_json::to_string(&case.insight)?,
                    case.status().as_str(),
                    i64::from(case.level()),
                    serde_json::to_string(&case.timeline)?,
                    planned.origin_key.as_str(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        if inserted == 0 {
            let existing = self
                .case_by_origin_key(&planned.origin_key)
                .await?
                .ok_or(DatabaseError::NoResult)?;
            return Ok((existing, None));
        }

        let op = self
            .audit_mutation(
                &Mutation {
                    session_id: Some(&plan.session_id),
                    entity: EntityType::Case,
                    entity_id: &case.id,
                    action: AuditAction::Created,
                    detail: None,
                    op: TrailOp::Create,
                    data: serde_json::to_value(&case)?,
                },
                now,
            )
            .await?;
        Ok((case, Some(op)))
    }

    async fn insights_by_origin(&self, plan: &FanOutPlan) -> Result<Vec<Insight>, DatabaseError> {
        let mut insights = Vec::with_capacity(plan.insights.len());
        for planned in &plan.insights {
            let mut rows = self
                .db()
                .conn()
                .query(
                    &format!("SELECT {INSIGHT_COLUMNS} FROM insights WHERE origin_key = ?1"),
                    [planned.origin_key.as_str()],
                )
                .await?;
            if let Some(row) = rows.next().await? {
                insights.push(row_to_insight(&row)?);
            }
        }
        Ok(insights)
    }

    async fn goals_by_origin(&self, plan: &FanOutPlan) -> Result<Vec<CoachingGoal>, DatabaseError> {
        let mut goals = Vec::with_capacity(plan.goals.len());
        for planned in &plan.goals {
            let mut rows = self
                .db()
                .conn()
                .query(
                    &format!("SELECT {GOAL_COLUMNS} FROM coaching_goals WHERE origin_key = ?1"),
                    [planned.origin_key.as_str()],
                )
                .await?;
            if let Some(row) = rows.next().await? {
                goals.push(row_to_goal(&row)?);
            }
        }
        Ok(goals)
    }
}
