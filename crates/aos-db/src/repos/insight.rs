//! Insight repository.
//!
//! Insights are create-only. Analysis-derived insights are inserted by the
//! fan-out transaction (`repos::fanout`); this module covers the rest.

use chrono::Utc;

use aos_core::entities::Insight;
use aos_core::enums::{AuditAction, EntityType, TrailOp};
use aos_core::ids::PREFIX_INSIGHT;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::repos::audit::Mutation;
use crate::service::AosService;

pub(crate) const INSIGHT_COLUMNS: &str = "id, user_id, session_id, content, created_at";

pub(crate) fn row_to_insight(row: &libsql::Row) -> Result<Insight, DatabaseError> {
    Ok(Insight {
        id: row.get::<String>(0)?,
        user_id: row.get::<String>(1)?,
        session_id: get_opt_string(row, 2)?,
        content: row.get::<String>(3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl AosService {
    /// Create a standalone insight for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn create_insight(
        &self,
        user_id: &str,
        session_id: Option<&str>,
        content: &str,
    ) -> Result<Insight, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_INSIGHT).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO insights (id, user_id, session_id, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![id.as_str(), user_id, session_id, content, now.to_rfc3339()],
            )
            .await?;

        let insight = Insight {
            id: id.clone(),
            user_id: user_id.to_string(),
            session_id: session_id.map(String::from),
            content: content.to_string(),
            created_at: now,
        };

        self.record(
            Mutation {
                session_id,
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

        Ok(insight)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no insight has this ID.
    pub async fn get_insight(&self, id: &str) -> Result<Insight, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {INSIGHT_COLUMNS} FROM insights WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("insight", id))?;
        row_to_insight(&row)
    }

    /// Most recent insights first, optionally for one user.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_insights(
        &self,
        user_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Insight>, DatabaseError> {
        let mut rows = match user_id {
            Some(user) => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {INSIGHT_COLUMNS} FROM insights WHERE user_id = ?1
                             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
                        ),
                        [user],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {INSIGHT_COLUMNS} FROM insights
                             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
                        ),
                        (),
                    )
                    .await?
            }
        };

        let mut insights = Vec::new();
        while let Some(row) = rows.next().await? {
            insights.push(row_to_insight(&row)?);
        }
        Ok(insights)
    }

    /// Insights derived from one session, in creation order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn insights_for_session(&self, session_id: &str) -> Result<Vec<Insight>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {INSIGHT_COLUMNS} FROM insights WHERE session_id = ?1 ORDER BY rowid"),
                [session_id],
            )
            .await?;
        let mut insights = Vec::new();
        while let Some(row) = rows.next().await? {
            insights.push(row_to_insight(&row)?);
        }
        Ok(insights)
    }
}
