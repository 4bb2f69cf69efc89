//! Session repository.
//!
//! Scheduling, the write-ahead `analyzing` transition, analysis acceptance,
//! error marking, and the stalled-session scan used by recovery.
//!
//! Every write that depends on the session being in `analyzing` at a given
//! `analysis_version` is a conditional UPDATE; a zero row count means some
//! other submission got there first.

use chrono::{DateTime, Utc};

use aos_core::audit_detail::StatusChangedDetail;
use aos_core::entities::{AnalysisResult, FeedbackPayload, Session};
use aos_core::enums::{AuditAction, EntityType, MeetingLocation, SessionStatus, TrailOp};
use aos_core::ids::{DEFAULT_SUPERVISOR_ID, DEFAULT_SUPERVISOR_NAME, PREFIX_SESSION};

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, get_opt_u32, get_u32, parse_datetime, parse_enum, parse_optional_datetime,
    parse_optional_json,
};
use crate::repos::audit::Mutation;
use crate::service::AosService;

const SESSION_COLUMNS: &str = "id, supervisor_id, supervisor_name, employee_id, employee_name, \
     scheduled_at, meeting_location, status, feedback, analysis, analysis_version, \
     accepted_version, error, submitted_at, created_at, updated_at";

/// Input for [`AosService::schedule_session`].
#[derive(Debug, Clone)]
pub struct NewSession {
    /// Caller-chosen ID; generated when `None`.
    pub id: Option<String>,
    pub employee_id: String,
    pub employee_name: String,
    pub supervisor_id: String,
    pub supervisor_name: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub meeting_location: MeetingLocation,
}

impl NewSession {
    /// An unscheduled office session with the default supervisor.
    #[must_use]
    pub fn for_employee(employee_id: &str, employee_name: &str) -> Self {
        Self {
            id: None,
            employee_id: employee_id.to_string(),
            employee_name: employee_name.to_string(),
            supervisor_id: DEFAULT_SUPERVISOR_ID.to_string(),
            supervisor_name: DEFAULT_SUPERVISOR_NAME.to_string(),
            scheduled_at: None,
            meeting_location: MeetingLocation::default(),
        }
    }
}

/// Filter criteria for [`AosService::list_sessions`].
#[derive(Debug, Default)]
pub struct SessionFilter {
    pub status: Option<SessionStatus>,
    pub employee_id: Option<String>,
    pub supervisor_id: Option<String>,
    pub limit: Option<u32>,
}

pub(crate) fn row_to_session(row: &libsql::Row) -> Result<Session, DatabaseError> {
    Ok(Session {
        id: row.get::<String>(0)?,
        supervisor_id: row.get::<String>(1)?,
        supervisor_name: row.get::<String>(2)?,
        employee_id: row.get::<String>(3)?,
        employee_name: row.get::<String>(4)?,
        scheduled_at: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
        meeting_location: parse_enum(&row.get::<String>(6)?)?,
        status: parse_enum(&row.get::<String>(7)?)?,
        feedback: parse_optional_json(get_opt_string(row, 8)?.as_deref())?,
        analysis: parse_optional_json(get_opt_string(row, 9)?.as_deref())?,
        analysis_version: get_u32(row, 10)?,
        accepted_version: get_opt_u32(row, 11)?,
        error: get_opt_string(row, 12)?,
        submitted_at: parse_optional_datetime(get_opt_string(row, 13)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(14)?)?,
        updated_at: parse_datetime(&row.get::<String>(15)?)?,
    })
}

fn transition_data(from: SessionStatus, to: SessionStatus, version: u32) -> serde_json::Value {
    serde_json::json!({ "from": from, "to": to, "analysis_version": version })
}

impl AosService {
    /// Create an `upcoming` session.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails (including a taken ID).
    pub async fn schedule_session(&self, new: &NewSession) -> Result<Session, DatabaseError> {
        let now = Utc::now();
        let id = match &new.id {
            Some(id) => id.clone(),
            None => self.db().generate_id(PREFIX_SESSION).await?,
        };

        self.db().conn().execute(
            "INSERT INTO sessions (id, supervisor_id, supervisor_name, employee_id, employee_name,
                                   scheduled_at, meeting_location, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'upcoming', ?8, ?8)",
            libsql::params![
                id.as_str(),
                new.supervisor_id.as_str(),
                new.supervisor_name.as_str(),
                new.employee_id.as_str(),
                new.employee_name.as_str(),
                new.scheduled_at.map(|t| t.to_rfc3339()),
                new.meeting_location.as_str(),
                now.to_rfc3339()
            ],
        ).await?;

        let session = Session {
            id: id.clone(),
            supervisor_id: new.supervisor_id.clone(),
            supervisor_name: new.supervisor_name.clone(),
            employee_id: new.employee_id.clone(),
            employee_name: new.employee_name.clone(),
            scheduled_at: new.scheduled_at,
            meeting_location: new.meeting_location,
            status: SessionStatus::Upcoming,
            feedback: None,
            analysis: None,
            analysis_version: 0,
            accepted_version: None,
            error: None,
            submitted_at: None,
            created_at: now,
            updated_at: now,
        };

        self.record(
            Mutation {
                session_id: Some(&id),
                entity: EntityType::Session,
                entity_id: &id,
                action: AuditAction::Created,
                detail: None,
                op: TrailOp::Create,
                data: serde_json::to_value(&session)?,
            },
            now,
        )
        .await?;

        tracing::debug!(session_id = %id, "session scheduled");
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no session has this ID.
    pub async fn get_session(&self, id: &str) -> Result<Session, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("session", id))?;
        row_to_session(&row)
    }

    /// List sessions, most recently scheduled first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<Session>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(status) = filter.status {
            params.push(status.as_str().into());
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(ref employee) = filter.employee_id {
            params.push(employee.as_str().into());
            conditions.push(format!("employee_id = ?{}", params.len()));
        }
        if let Some(ref supervisor) = filter.supervisor_id {
            params.push(supervisor.as_str().into());
            conditions.push(format!("supervisor_id = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM sessions {where_clause}
             ORDER BY COALESCE(scheduled_at, created_at) DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next().await? {
            sessions.push(row_to_session(&row)?);
        }
        Ok(sessions)
    }

    /// Write-ahead: store the feedback and move the session to `analyzing`.
    ///
    /// Bumps `analysis_version` and clears any earlier error. An earlier
    /// accepted analysis stays until this version's analysis replaces it;
    /// `accepted_version` tells the two apart. The employee fields are
    /// overwritten with the submitter's.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown session,
    /// `DatabaseError::InvalidState` if the session is already `analyzing`, or
    /// `DatabaseError::Conflict` if it changed between the read and the write.
    pub async fn begin_analysis(
        &self,
        session_id: &str,
        employee_id: &str,
        employee_name: &str,
        feedback: &FeedbackPayload,
    ) -> Result<Session, DatabaseError> {
        let current = self.get_session(session_id).await?;
        if !current.status.can_transition_to(SessionStatus::Analyzing) {
            return Err(DatabaseError::InvalidState(format!(
                "cannot move session {session_id} from {} to analyzing",
                current.status
            )));
        }

        let now = Utc::now();
        let changed = self.db().conn().execute(
            "UPDATE sessions
             SET status = 'analyzing', employee_id = ?1, employee_name = ?2, feedback = ?3,
                 meeting_location = ?4, error = NULL,
                 analysis_version = analysis_version + 1, submitted_at = ?5, updated_at = ?5
             WHERE id = ?6 AND status = ?7 AND analysis_version = ?8",
            libsql::params![
                employee_id,
                employee_name,
                serde_json::to_string(feedback)?,
                feedback.meeting_location.as_str(),
                now.to_rfc3339(),
                session_id,
                current.status.as_str(),
                i64::from(current.analysis_version)
            ],
        ).await?;
        if changed == 0 {
            return Err(DatabaseError::Conflict(format!(
                "session {session_id} changed while feedback was being submitted"
            )));
        }

        let session = self.get_session(session_id).await?;
        let from = current.status;
        self.record(
            Mutation {
                session_id: Some(session_id),
                entity: EntityType::Session,
                entity_id: session_id,
                action: AuditAction::StatusChanged,
                detail: Some(serde_json::to_value(StatusChangedDetail {
                    from: from.to_string(),
                    to: SessionStatus::Analyzing.to_string(),
                    reason: Some("feedback submitted".into()),
                })?),
                op: TrailOp::Transition,
                data: transition_data(from, SessionStatus::Analyzing, session.analysis_version),
            },
            now,
        )
        .await?;

        tracing::info!(session_id, version = session.analysis_version, "session analyzing");
        Ok(session)
    }

    /// Persist an accepted analysis on a session still `analyzing` at `version`.
    ///
    /// This is the recovery point: once it returns, fan-out can be replayed
    /// from the stored analysis.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Conflict` if the session left `analyzing` or
    /// moved to another version in the meantime.
    pub async fn store_accepted_analysis(
        &self,
        session_id: &str,
        version: u32,
        analysis: &AnalysisResult,
    ) -> Result<(), DatabaseError> {
        let now = Utc::now();
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE sessions SET analysis = ?1, accepted_version = ?4, updated_at = ?2
                 WHERE id = ?3 AND status = 'analyzing' AND analysis_version = ?4",
                libsql::params![
                    serde_json::to_string(analysis)?,
                    now.to_rfc3339(),
                    session_id,
                    i64::from(version)
                ],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::Conflict(format!(
                "session {session_id} is no longer analyzing version {version}"
            )));
        }

        self.record(
            Mutation {
                session_id: Some(session_id),
                entity: EntityType::Session,
                entity_id: session_id,
                action: AuditAction::AnalysisAccepted,
                detail: Some(serde_json::json!({ "analysis_version": version })),
                op: TrailOp::Update,
                data: serde_json::json!({ "analysis": analysis, "analysis_version": version }),
            },
            now,
        )
        .await
    }

    /// Move a session from `analyzing` at `version` to `error`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Conflict` if the session is not analyzing that
    /// version.
    pub async fn mark_session_error(
        &self,
        session_id: &str,
        version: u32,
        reason: &str,
    ) -> Result<Session, DatabaseError> {
        let now = Utc::now();
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE sessions SET status = 'error', error = ?1, updated_at = ?2
                 WHERE id = ?3 AND status = 'analyzing' AND analysis_version = ?4",
                libsql::params![reason, now.to_rfc3339(), session_id, i64::from(version)],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::Conflict(format!(
                "session {session_id} is no longer analyzing version {version}"
            )));
        }

        self.record(
            Mutation {
                session_id: Some(session_id),
                entity: EntityType::Session,
                entity_id: session_id,
                action: AuditAction::StatusChanged,
                detail: Some(serde_json::to_value(StatusChangedDetail {
                    from: SessionStatus::Analyzing.to_string(),
                    to: SessionStatus::Error.to_string(),
                    reason: Some(reason.to_string()),
                })?),
                op: TrailOp::Transition,
                data: transition_data(SessionStatus::Analyzing, SessionStatus::Error, version),
            },
            now,
        )
        .await?;

        self.get_session(session_id).await
    }

    /// Sessions stuck in `analyzing`, oldest submission first.
    ///
    /// With `submitted_before`, only sessions submitted before that instant
    /// are returned, so in-flight submissions are left alone.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn stalled_sessions(
        &self,
        submitted_before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Session>, DatabaseError> {
        let mut rows = match submitted_before {
            Some(cutoff) => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {SESSION_COLUMNS} FROM sessions
                             WHERE status = 'analyzing' AND submitted_at < ?1
                             ORDER BY submitted_at"
                        ),
                        [cutoff.to_rfc3339()],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {SESSION_COLUMNS} FROM sessions
                             WHERE status = 'analyzing' ORDER BY submitted_at"
                        ),
                        (),
                    )
                    .await?
            }
        };

        let mut sessions = Vec::new();
        while let Some(row) = rows.next().await? {
            sessions.push(row_to_session(&row)?);
        }
        Ok(sessions)
    }
}
