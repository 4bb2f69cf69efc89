//! Critical case repository.
//!
//! Cases are created only by fan-out. Afterwards the single way to change a
//! case is [`AosService::apply_case_transition`], a compare-and-swap on
//! `version` that appends to the timeline in SQL.

use chrono::Utc;

use aos_core::audit_detail::CaseActionDetail;
use aos_core::entities::{CriticalCase, EscalationState};
use aos_core::enums::{AuditAction, CaseStatus, EntityType, TrailOp};
use aos_core::escalation::{self, CaseTransition};

use crate::error::DatabaseError;
use crate::helpers::{get_u8, get_u32, parse_datetime, parse_enum, parse_json};
use crate::repos::audit::Mutation;
use crate::service::AosService;

pub(crate) const CASE_COLUMNS: &str =
    "id, session_id, insight, status, current_level, timeline, version, created_at, updated_at";

/// Filter criteria for [`AosService::list_cases`].
#[derive(Debug, Default)]
pub struct CaseFilter {
    pub status: Option<CaseStatus>,
    /// Only cases at or above this level.
    pub min_level: Option<u8>,
    /// Only cases at exactly this level.
    pub exact_level: Option<u8>,
    /// Exclude resolved cases.
    pub open_only: bool,
    pub session_id: Option<String>,
    pub limit: Option<u32>,
}

pub(crate) fn row_to_case(row: &libsql::Row) -> Result<CriticalCase, DatabaseError> {
    let status: CaseStatus = parse_enum(&row.get::<String>(3)?)?;
    Ok(CriticalCase {
        id: row.get::<String>(0)?,
        session_id: row.get::<String>(1)?,
        insight: parse_json(&row.get::<String>(2)?)?,
        escalation: EscalationState::restore(status, get_u8(row, 4)?)?,
        timeline: parse_json(&row.get::<String>(5)?)?,
        version: get_u32(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl AosService {
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no case has this ID.
    pub async fn get_case(&self, id: &str) -> Result<CriticalCase, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {CASE_COLUMNS} FROM critical_cases WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("case", id))?;
        row_to_case(&row)
    }

    /// The newest case opened by a session's analyses, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn case_for_session(
        &self,
        session_id: &str,
    ) -> Result<Option<CriticalCase>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {CASE_COLUMNS} FROM critical_cases WHERE session_id = ?1
                     ORDER BY created_at DESC, rowid DESC LIMIT 1"),
                [session_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_case(&row)?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn case_by_origin_key(
        &self,
        origin_key: &str,
    ) -> Result<Option<CriticalCase>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {CASE_COLUMNS} FROM critical_cases WHERE origin_key = ?1"),
                [origin_key],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_case(&row)?)),
            None => Ok(None),
        }
    }

    /// List cases, highest level first, then newest.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_cases(&self, filter: &CaseFilter) -> Result<Vec<CriticalCase>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(status) = filter.status {
            params.push(status.as_str().into());
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(level) = filter.min_level {
            params.push(i64::from(level).into());
            conditions.push(format!("current_level >= ?{}", params.len()));
        }
        if let Some(level) = filter.exact_level {
            params.push(i64::from(level).into());
            conditions.push(format!("current_level = ?{}", params.len()));
        }
        if filter.open_only {
            conditions.push("status != 'resolved'".to_string());
        }
        if let Some(ref session) = filter.session_id {
            params.push(session.as_str().into());
            conditions.push(format!("session_id = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {CASE_COLUMNS} FROM critical_cases {where_clause}
             ORDER BY current_level DESC, created_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut cases = Vec::new();
        while let Some(row) = rows.next().await? {
            cases.push(row_to_case(&row)?);
        }
        Ok(cases)
    }

    /// Persist `transition`, planned against `case` as read.
    ///
    /// Status, level, the timeline append, and the version bump happen in one
    /// UPDATE guarded by the version that was read. Returns `Ok(None)` when
    /// another writer got there first; the caller re-reads and re-plans.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the UPDATE or the audit write fails.
    pub async fn apply_case_transition(
        &self,
        case: &CriticalCase,
        transition: &CaseTransition,
    ) -> Result<Option<CriticalCase>, DatabaseError> {
        let now = transition.entry.timestamp;
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE critical_cases
                 SET status = ?1, current_level = ?2,
                     timeline = json_insert(timeline, '$[#]', json(?3)),
                     version = version + 1, updated_at = ?4
                 WHERE id = ?5 AND version = ?6",
                libsql::params![
                    transition.to.status().as_str(),
                    i64::from(transition.to.level()),
                    serde_json::to_string(&transition.entry)?,
                    now.to_rfc3339(),
                    case.id.as_str(),
                    i64::from(case.version)
                ],
            )
            .await?;
        if changed == 0 {
            return Ok(None);
        }

        let detail = CaseActionDetail {
            action: transition.entry.action.clone(),
            recognized: transition.action.is_some(),
            from_status: transition.from.status().to_string(),
            to_status: transition.to.status().to_string(),
            from_level: transition.from.level(),
            to_level: transition.to.level(),
        };
        self.record(
            Mutation {
                session_id: Some(&case.session_id),
                entity: EntityType::Case,
                entity_id: &case.id,
                action: AuditAction::CaseAction,
                detail: Some(serde_json::to_value(&detail)?),
                op: TrailOp::Append,
                data: serde_json::json!({
                    "entry": transition.entry,
                    "status": transition.to.status(),
                    "current_level": transition.to.level(),
                    "version": case.version + 1,
                }),
            },
            now,
        )
        .await?;

        tracing::info!(
            case_id = %case.id,
            action = %transition.entry.action,
            from = %transition.from.status(),
            to = %transition.to.status(),
            level = transition.to.level(),
            "case action applied"
        );
        Ok(Some(escalation::apply(case, transition)))
    }

    /// Number of cases not yet resolved.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_open_cases(&self) -> Result<u32, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM critical_cases WHERE status != 'resolved'", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        get_u32(&row, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aos_core::escalation::{TransitionPolicy, plan};
    use aos_core::fanout::FanOutPlan;
    use crate::test_support::helpers::{analysis, analyzing_session, test_service};
    use pretty_assertions::assert_eq;

    async fn opened_case(svc: &AosService) -> CriticalCase {
        let session = analyzing_session(svc).await;
        let plan = FanOutPlan::build(
            &session.id,
            session.analysis_version,
            &session.employee_id,
            &session.supervisor_id,
            &analysis(0, 0, true),
        );
        svc.apply_fan_out(&plan).await.unwrap().case.unwrap()
    }

    fn transition(case: &CriticalCase, action: &str) -> CaseTransition {
        plan(case.escalation, action, "Talked it through", "", Utc::now(), TransitionPolicy::Permissive)
            .unwrap()
    }

    #[tokio::test]
    async fn get_case_round_trips() {
        let svc = test_service().await;
        let case = opened_case(&svc).await;
        assert_eq!(svc.get_case(&case.id).await.unwrap(), case);
        assert_eq!(
            svc.case_for_session(&case.session_id).await.unwrap().as_ref(),
            Some(&case)
        );
        assert!(svc.get_case("cas-missing").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn transition_persists_status_level_and_timeline() {
        let svc = test_service().await;
        let case = opened_case(&svc).await;
        let t = transition(&case, "supervisor_respond");
        let next = svc.apply_case_transition(&case, &t).await.unwrap().unwrap();

        assert_eq!(next.status(), CaseStatus::PendingEmployee);
        assert_eq!(next.level(), 2);
        assert_eq!(next.version, 1);
        assert_eq!(next.timeline.len(), 2);

        let stored = svc.get_case(&case.id).await.unwrap();
        assert_eq!(stored.escalation, next.escalation);
        assert_eq!(stored.timeline.len(), 2);
        assert_eq!(stored.timeline[1].action, "supervisor_respond");
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn stale_version_is_rejected() {
        let svc = test_service().await;
        let case = opened_case(&svc).await;
        svc.apply_case_transition(&case, &transition(&case, "supervisor_respond"))
            .await
            .unwrap()
            .unwrap();

        // `case` is now stale.
        let lost = svc
            .apply_case_transition(&case, &transition(&case, "hr_final"))
            .await
            .unwrap();
        assert!(lost.is_none());
        assert_eq!(svc.get_case(&case.id).await.unwrap().timeline.len(), 2);
    }

    #[tokio::test]
    async fn transition_writes_case_action_audit() {
        let svc = test_service().await;
        let case = opened_case(&svc).await;
        svc.apply_case_transition(&case, &transition(&case, "not_a_real_action"))
            .await
            .unwrap()
            .unwrap();

        let entries = svc
            .query_audit(&crate::repos::audit::AuditFilter {
                entity_id: Some(case.id.clone()),
                action: Some(AuditAction::CaseAction),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        let detail: CaseActionDetail =
            serde_json::from_value(entries[0].detail.clone().unwrap()).unwrap();
        assert!(!detail.recognized);
        assert_eq!(detail.from_status, detail.to_status);
    }

    #[tokio::test]
    async fn list_filters_by_level_and_openness() {
        let svc = test_service().await;
        let low = opened_case(&svc).await;
        let high = opened_case(&svc).await;
        let mut current = high.clone();
        for action in ["supervisor_respond", "employee_not_satisfied", "am_escalate"] {
            current = svc
                .apply_case_transition(&current, &transition(&current, action))
                .await
                .unwrap()
                .unwrap();
        }
        assert_eq!(current.level(), 4);

        let at_least_three = svc
            .list_cases(&CaseFilter {
                min_level: Some(3),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(at_least_three.len(), 1);
        assert_eq!(at_least_three[0].id, high.id);

        let exact_one = svc
            .list_cases(&CaseFilter {
                exact_level: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(exact_one[0].id, low.id);

        svc.apply_case_transition(&current, &transition(&current, "hr_final"))
            .await
            .unwrap()
            .unwrap();
        let open = svc
            .list_cases(&CaseFilter {
                open_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(svc.count_open_cases().await.unwrap(), 1);
    }
}
