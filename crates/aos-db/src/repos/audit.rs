//! Audit trail repository.
//!
//! Append-only audit entries recording every mutation, plus the helper every
//! repo uses to write the audit row and the matching trail line together.

use chrono::{DateTime, Utc};

use aos_core::entities::AuditEntry;
use aos_core::enums::{AuditAction, EntityType, TrailOp};
use aos_core::ids::PREFIX_AUDIT;
use aos_core::trail::{TRAIL_VERSION, TrailOperation};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::service::AosService;

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub action: Option<AuditAction>,
    pub session_id: Option<String>,
    pub limit: Option<u32>,
}

/// One committed change: the audit row and the trail line describing it.
pub(crate) struct Mutation<'a> {
    pub session_id: Option<&'a str>,
    pub entity: EntityType,
    pub entity_id: &'a str,
    pub action: AuditAction,
    pub detail: Option<serde_json::Value>,
    pub op: TrailOp,
    pub data: serde_json::Value,
}

impl Mutation<'_> {
    /// Trail stream: the owning session, else the entity itself.
    fn stream(&self) -> String {
        self.session_id.unwrap_or(self.entity_id).to_string()
    }

    pub(crate) fn trail_operation(&self, now: DateTime<Utc>) -> TrailOperation {
        TrailOperation {
            v: TRAIL_VERSION,
            ts: now.to_rfc3339(),
            stream: self.stream(),
            op: self.op,
            entity: self.entity,
            id: self.entity_id.to_string(),
            data: self.data.clone(),
        }
    }
}

fn row_to_audit(row: &libsql::Row) -> Result<AuditEntry, DatabaseError> {
    Ok(AuditEntry {
        id: row.get::<String>(0)?,
        session_id: get_opt_string(row, 1)?,
        entity_type: parse_enum(&row.get::<String>(2)?)?,
        entity_id: row.get::<String>(3)?,
        action: parse_enum(&row.get::<String>(4)?)?,
        detail: parse_optional_json(get_opt_string(row, 5)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl AosService {
    /// Append an audit entry.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn append_audit(&self, entry: &AuditEntry) -> Result<(), DatabaseError> {
        self.db().conn().execute(
            "INSERT INTO audit_trail (id, session_id, entity_type, entity_id, action, detail, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            libsql::params![
                entry.id.as_str(),
                entry.session_id.as_deref(),
                entry.entity_type.as_str(),
                entry.entity_id.as_str(),
                entry.action.as_str(),
                entry.detail.as_ref().map(ToString::to_string),
                entry.created_at.to_rfc3339()
            ],
        ).await?;
        Ok(())
    }

    /// Write the audit row for `m` on the shared connection (so it joins any
    /// open transaction) and return the trail operation to append after commit.
    pub(crate) async fn audit_mutation(
        &self,
        m: &Mutation<'_>,
        now: DateTime<Utc>,
    ) -> Result<TrailOperation, DatabaseError> {
        let audit_id = self.db().generate_id(PREFIX_AUDIT).await?;
        self.append_audit(&AuditEntry {
            id: audit_id,
            session_id: m.session_id.map(String::from),
            entity_type: m.entity,
            entity_id: m.entity_id.to_string(),
            action: m.action,
            detail: m.detail.clone(),
            created_at: now,
        })
        .await?;
        Ok(m.trail_operation(now))
    }

    /// Append trail operations for already committed changes.
    pub(crate) fn write_trail(&self, ops: &[TrailOperation]) -> Result<(), DatabaseError> {
        for op in ops {
            self.trail().append_validated(op, self.schema())?;
        }
        Ok(())
    }

    /// Audit a single-statement mutation and write its trail line.
    pub(crate) async fn record(
        &self,
        m: Mutation<'_>,
        now: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let op = self.audit_mutation(&m, now).await?;
        self.write_trail(&[op])
    }

    /// Query audit entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(et) = filter.entity_type {
            params.push(et.as_str().into());
            conditions.push(format!("entity_type = ?{}", params.len()));
        }
        if let Some(ref eid) = filter.entity_id {
            params.push(eid.as_str().into());
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(action) = filter.action {
            params.push(action.as_str().into());
            conditions.push(format!("action = ?{}", params.len()));
        }
        if let Some(ref sid) = filter.session_id {
            params.push(sid.as_str().into());
            conditions.push(format!("session_id = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT id, session_id, entity_type, entity_id, action, detail, created_at
             FROM audit_trail {where_clause}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_audit(&row)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;
    use pretty_assertions::assert_eq;

    async fn seed_entries(svc: &AosService) {
        for (entity, id, action) in [
            (EntityType::Session, "ses-1", AuditAction::Created),
            (EntityType::Case, "cas-1", AuditAction::CaseAction),
            (EntityType::Case, "cas-1", AuditAction::CaseAction),
            (EntityType::Goal, "gol-1", AuditAction::CheckIn),
        ] {
            svc.record(
                Mutation {
                    session_id: Some("ses-1"),
                    entity,
                    entity_id: id,
                    action,
                    detail: Some(serde_json::json!({"n": 1})),
                    op: TrailOp::Update,
                    data: serde_json::json!({}),
                },
                Utc::now(),
            )
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn query_without_filter_returns_everything() {
        let svc = test_service().await;
        seed_entries(&svc).await;
        let all = svc.query_audit(&AuditFilter::default()).await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].entity_id, "gol-1");
    }

    #[tokio::test]
    async fn filters_combine() {
        let svc = test_service().await;
        seed_entries(&svc).await;
        let cases = svc
            .query_audit(&AuditFilter {
                entity_type: Some(EntityType::Case),
                action: Some(AuditAction::CaseAction),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].detail, Some(serde_json::json!({"n": 1})));

        let limited = svc
            .query_audit(&AuditFilter {
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn trail_stream_falls_back_to_entity() {
        let m = Mutation {
            session_id: None,
            entity: EntityType::Goal,
            entity_id: "gol-9",
            action: AuditAction::Created,
            detail: None,
            op: TrailOp::Create,
            data: serde_json::json!({}),
        };
        assert_eq!(m.trail_operation(Utc::now()).stream, "gol-9");
    }
}
