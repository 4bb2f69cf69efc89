//! Coaching goal repository.
//!
//! Lifecycle (`GoalStatus::allowed_next_states`):
//! pending → active (accept) | pending_am_review (decline);
//! active → pending_am_review (decline);
//! pending_am_review → active (AM upholds) | declined (AM confirms).
//!
//! Status changes are conditional on the status that was read, and
//! check-ins are appended in SQL with `json_insert`, so concurrent updates
//! never overwrite each other.

use chrono::{NaiveDate, Utc};

use aos_core::audit_detail::{CheckInDetail, StatusChangedDetail};
use aos_core::entities::{CheckIn, CoachingGoal, RecommendedResource};
use aos_core::enums::{AmReviewDecision, AuditAction, EntityType, GoalSource, GoalStatus, TrailOp};
use aos_core::errors::CoreError;
use aos_core::ids::PREFIX_GOAL;

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, get_u8, parse_datetime, parse_enum, parse_json, parse_optional_date,
    parse_optional_json, to_optional_json,
};
use crate::repos::audit::Mutation;
use crate::service::AosService;

pub(crate) const GOAL_COLUMNS: &str = "id, user_id, title, description, source, status, progress, \
     start_date, target_end_date, check_ins, resource, decline_reason, upheld_by_am, session_id, \
     created_at, updated_at";

/// Description given to goals assigned from an org-health recommendation.
pub const ORG_HEALTH_DESCRIPTION: &str = "Assigned from Org Health analysis";

/// Input for [`AosService::create_goal`].
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub source: GoalSource,
    pub start_date: Option<NaiveDate>,
    pub target_end_date: Option<NaiveDate>,
    pub resource: Option<RecommendedResource>,
}

/// Filter criteria for [`AosService::list_goals`].
#[derive(Debug, Default)]
pub struct GoalFilter {
    pub user_id: Option<String>,
    pub status: Option<GoalStatus>,
    pub source: Option<GoalSource>,
    pub limit: Option<u32>,
}

pub(crate) fn row_to_goal(row: &libsql::Row) -> Result<CoachingGoal, DatabaseError> {
    Ok(CoachingGoal {
        id: row.get::<String>(0)?,
        user_id: row.get::<String>(1)?,
        title: row.get::<String>(2)?,
        description: row.get::<String>(3)?,
        source: parse_enum(&row.get::<String>(4)?)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        progress: get_u8(row, 6)?,
        start_date: parse_optional_date(get_opt_string(row, 7)?.as_deref())?,
        target_end_date: parse_optional_date(get_opt_string(row, 8)?.as_deref())?,
        check_ins: parse_json(&row.get::<String>(9)?)?,
        resource: parse_optional_json(get_opt_string(row, 10)?.as_deref())?,
        decline_reason: get_opt_string(row, 11)?,
        upheld_by_am: row.get::<i64>(12)? != 0,
        session_id: get_opt_string(row, 13)?,
        created_at: parse_datetime(&row.get::<String>(14)?)?,
        updated_at: parse_datetime(&row.get::<String>(15)?)?,
    })
}

fn date_text(d: Option<NaiveDate>) -> Option<String> {
    d.map(|d| d.format("%Y-%m-%d").to_string())
}

fn illegal(goal: &CoachingGoal, to: GoalStatus) -> DatabaseError {
    DatabaseError::InvalidState(format!(
        "goal {} cannot move from {} to {to}",
        goal.id, goal.status
    ))
}

impl AosService {
    /// Create an `active` goal at progress 0.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn create_goal(&self, new: &NewGoal) -> Result<CoachingGoal, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_GOAL).await?;

        self.db().conn().execute(
            "INSERT INTO coaching_goals (id, user_id, title, description, source, status, progress,
                                         start_date, target_end_date, resource, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 'active', 0, ?6, ?7, ?8, ?9, ?9)",
            libsql::params![
                id.as_str(),
                new.user_id.as_str(),
                new.title.as_str(),
                new.description.as_str(),
                new.source.as_str(),
                date_text(new.start_date),
                date_text(new.target_end_date),
                to_optional_json(new.resource.as_ref())?,
                now.to_rfc3339()
            ],
        ).await?;

        let goal = CoachingGoal {
            id: id.clone(),
            user_id: new.user_id.clone(),
            title: new.title.clone(),
            description: new.description.clone(),
            source: new.source,
            status: GoalStatus::Active,
            progress: 0,
            start_date: new.start_date,
            target_end_date: new.target_end_date,
            check_ins: Vec::new(),
            resource: new.resource.clone(),
            decline_reason: None,
            upheld_by_am: false,
            session_id: None,
            created_at: now,
            updated_at: now,
        };

        self.record(
            Mutation {
                session_id: None,
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

        tracing::info!(goal_id = %id, user_id = %new.user_id, source = %new.source, "goal created");
        Ok(goal)
    }

    /// Assign an org-health recommendation to `target_user` as an active goal
    /// starting today.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn assign_goal(
        &self,
        target_user: &str,
        recommendation: &str,
    ) -> Result<CoachingGoal, DatabaseError> {
        self.create_goal(&NewGoal {
            user_id: target_user.to_string(),
            title: recommendation.to_string(),
            description: ORG_HEALTH_DESCRIPTION.to_string(),
            source: GoalSource::OrgHealth,
            start_date: Some(Utc::now().date_naive()),
            target_end_date: None,
            resource: None,
        })
        .await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no goal has this ID.
    pub async fn get_goal(&self, id: &str) -> Result<CoachingGoal, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {GOAL_COLUMNS} FROM coaching_goals WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("goal", id))?;
        row_to_goal(&row)
    }

    /// List goals, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_goals(&self, filter: &GoalFilter) -> Result<Vec<CoachingGoal>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref user) = filter.user_id {
            params.push(user.as_str().into());
            conditions.push(format!("user_id = ?{}", params.len()));
        }
        if let Some(status) = filter.status {
            params.push(status.as_str().into());
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(source) = filter.source {
            params.push(source.as_str().into());
            conditions.push(format!("source = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {GOAL_COLUMNS} FROM coaching_goals {where_clause}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut goals = Vec::new();
        while let Some(row) = rows.next().await? {
            goals.push(row_to_goal(&row)?);
        }
        Ok(goals)
    }

    /// Titles of the `active` goals owned by `user_id`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn active_goal_titles(&self, user_id: &str) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT title FROM coaching_goals WHERE user_id = ?1 AND status = 'active'
                 ORDER BY created_at, rowid",
                [user_id],
            )
            .await?;
        let mut titles = Vec::new();
        while let Some(row) = rows.next().await? {
            titles.push(row.get::<String>(0)?);
        }
        Ok(titles)
    }

    /// Accept a pending goal, optionally setting its dates.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` unless the goal is `pending`.
    pub async fn accept_goal(
        &self,
        id: &str,
        start_date: Option<NaiveDate>,
        target_end_date: Option<NaiveDate>,
    ) -> Result<CoachingGoal, DatabaseError> {
        let goal = self.get_goal(id).await?;
        if goal.status != GoalStatus::Pending {
            return Err(illegal(&goal, GoalStatus::Active));
        }

        let now = Utc::now();
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE coaching_goals
                 SET status = 'active', start_date = COALESCE(?1, start_date),
                     target_end_date = COALESCE(?2, target_end_date), updated_at = ?3
                 WHERE id = ?4 AND status = 'pending'",
                libsql::params![date_text(start_date), date_text(target_end_date), now.to_rfc3339(), id],
            )
            .await?;
        self.finish_goal_transition(&goal, changed, GoalStatus::Active, None, now)
            .await
    }

    /// Decline a pending or active goal, parking it for AM review.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the goal cannot be declined
    /// from its current status.
    pub async fn decline_goal(&self, id: &str, reason: &str) -> Result<CoachingGoal, DatabaseError> {
        let goal = self.get_goal(id).await?;
        if !goal.status.can_transition_to(GoalStatus::PendingAmReview) {
            return Err(illegal(&goal, GoalStatus::PendingAmReview));
        }

        let now = Utc::now();
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE coaching_goals
                 SET status = 'pending_am_review', decline_reason = ?1, updated_at = ?2
                 WHERE id = ?3 AND status = ?4",
                libsql::params![reason, now.to_rfc3339(), id, goal.status.as_str()],
            )
            .await?;
        self.finish_goal_transition(&goal, changed, GoalStatus::PendingAmReview, Some(reason), now)
            .await
    }

    /// Rule on a declined goal awaiting AM review.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` unless the goal is `pending_am_review`.
    pub async fn review_decline(
        &self,
        id: &str,
        decision: AmReviewDecision,
    ) -> Result<CoachingGoal, DatabaseError> {
        let goal = self.get_goal(id).await?;
        let to = decision.resulting_status();
        if goal.status != GoalStatus::PendingAmReview {
            return Err(illegal(&goal, to));
        }

        let now = Utc::now();
        let upheld = decision == AmReviewDecision::UpholdAi;
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE coaching_goals SET status = ?1, upheld_by_am = ?2, updated_at = ?3
                 WHERE id = ?4 AND status = 'pending_am_review'",
                libsql::params![to.as_str(), i64::from(upheld), now.to_rfc3339(), id],
            )
            .await?;
        self.finish_goal_transition(&goal, changed, to, Some(decision.as_str()), now)
            .await
    }

    /// Record progress and append a check-in.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` with `CoreError::Validation` for progress
    /// above 100, or `DatabaseError::InvalidState` for a declined goal.
    pub async fn update_progress(
        &self,
        id: &str,
        progress: u8,
        notes: &str,
    ) -> Result<CoachingGoal, DatabaseError> {
        if progress > 100 {
            return Err(CoreError::Validation(format!(
                "progress must be between 0 and 100, got {progress}"
            ))
            .into());
        }
        let goal = self.get_goal(id).await?;
        if !goal.status.accepts_check_ins() {
            return Err(DatabaseError::InvalidState(format!(
                "goal {id} is {} and takes no check-ins",
                goal.status
            )));
        }

        let now = Utc::now();
        let check_in = CheckIn {
            timestamp: now,
            progress,
            notes: notes.to_string(),
        };
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE coaching_goals
                 SET progress = ?1, check_ins = json_insert(check_ins, '$[#]', json(?2)), updated_at = ?3
                 WHERE id = ?4 AND status != 'declined'",
                libsql::params![
                    i64::from(progress),
                    serde_json::to_string(&check_in)?,
                    now.to_rfc3339(),
                    id
                ],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::InvalidState(format!(
                "goal {id} was declined before the check-in landed"
            )));
        }

        self.record(
            Mutation {
                session_id: goal.session_id.as_deref(),
                entity: EntityType::Goal,
                entity_id: id,
                action: AuditAction::CheckIn,
                detail: Some(serde_json::to_value(CheckInDetail {
                    progress,
                    notes: notes.to_string(),
                })?),
                op: TrailOp::Append,
                data: serde_json::to_value(&check_in)?,
            },
            now,
        )
        .await?;

        self.get_goal(id).await
    }

    async fn finish_goal_transition(
        &self,
        goal: &CoachingGoal,
        changed: u64,
        to: GoalStatus,
        reason: Option<&str>,
        now: chrono::DateTime<Utc>,
    ) -> Result<CoachingGoal, DatabaseError> {
        if changed == 0 {
            return Err(DatabaseError::Conflict(format!(
                "goal {} changed status concurrently",
                goal.id
            )));
        }

        self.record(
            Mutation {
                session_id: goal.session_id.as_deref(),
                entity: EntityType::Goal,
                entity_id: &goal.id,
                action: AuditAction::StatusChanged,
                detail: Some(serde_json::to_value(StatusChangedDetail {
                    from: goal.status.to_string(),
                    to: to.to_string(),
                    reason: reason.map(String::from),
                })?),
                op: TrailOp::Transition,
                data: serde_json::json!({ "from": goal.status, "to": to, "reason": reason }),
            },
            now,
        )
        .await?;

        tracing::info!(goal_id = %goal.id, from = %goal.status, %to, "goal status changed");
        self.get_goal(&goal.id).await
    }
}
