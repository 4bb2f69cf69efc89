//! User repository.
//!
//! Users are reference data: written by seeding, read everywhere else.

use aos_core::entities::User;
use aos_core::enums::{AuditAction, EntityType, Role, TrailOp};
use chrono::Utc;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_enum, parse_optional_json, to_optional_json};
use crate::repos::audit::Mutation;
use crate::service::AosService;

const USER_COLUMNS: &str = "id, name, role, team, scores, trends";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        role: parse_enum(&row.get::<String>(2)?)?,
        team: row.get::<String>(3)?,
        scores: parse_optional_json(get_opt_string(row, 4)?.as_deref())?,
        trends: parse_optional_json(get_opt_string(row, 5)?.as_deref())?,
    })
}

impl AosService {
    /// Insert a user with a caller-chosen ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the ID is taken or the INSERT fails.
    pub async fn create_user(&self, user: &User) -> Result<(), DatabaseError> {
        self.insert_user_row(user).await?;
        self.record(
            Mutation {
                session_id: None,
                entity: EntityType::User,
                entity_id: &user.id,
                action: AuditAction::Created,
                detail: None,
                op: TrailOp::Create,
                data: serde_json::to_value(user)?,
            },
            Utc::now(),
        )
        .await
    }

    pub(crate) async fn insert_user_row(&self, user: &User) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "INSERT INTO users (id, name, role, team, scores, trends) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    user.id.as_str(),
                    user.name.as_str(),
                    user.role.as_str(),
                    user.team.as_str(),
                    to_optional_json(user.scores.as_ref())?,
                    to_optional_json(user.trends.as_ref())?
                ],
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no user has this ID.
    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("user", id))?;
        row_to_user(&row)
    }

    /// List users, optionally restricted to one role, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_users(&self, role: Option<Role>, limit: u32) -> Result<Vec<User>, DatabaseError> {
        let mut rows = match role {
            Some(role) => {
                self.db()
                    .conn()
                    .query(
                        &format!("SELECT {USER_COLUMNS} FROM users WHERE role = ?1 ORDER BY id LIMIT {limit}"),
                        [role.as_str()],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT {limit}"), ())
                    .await?
            }
        };

        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_users(&self, role: Option<Role>) -> Result<u32, DatabaseError> {
        let mut rows = match role {
            Some(role) => {
                self.db()
                    .conn()
                    .query("SELECT COUNT(*) FROM users WHERE role = ?1", [role.as_str()])
                    .await?
            }
            None => self.db().conn().query("SELECT COUNT(*) FROM users", ()).await?,
        };
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        crate::helpers::get_u32(&row, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{employee, test_service};
    use aos_core::entities::{PerformanceScores, PerformanceTrends};
    use aos_core::enums::Trend;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_and_get_roundtrip() {
        let svc = test_service().await;
        let user = User {
            scores: Some(PerformanceScores {
                overall: 78,
                project_delivery: 82,
                goal_completion: 74,
                communication: 80,
            }),
            trends: Some(PerformanceTrends {
                overall: Trend::Up,
                project_delivery: Trend::Up,
                goal_completion: Trend::Stable,
                communication: Trend::Up,
            }),
            ..employee("emp-001")
        };
        svc.create_user(&user).await.unwrap();
        assert_eq!(svc.get_user("emp-001").await.unwrap(), user);
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let svc = test_service().await;
        let err = svc.get_user("emp-404").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn list_and_count_by_role() {
        let svc = test_service().await;
        svc.create_user(&employee("emp-001")).await.unwrap();
        svc.create_user(&employee("emp-002")).await.unwrap();
        svc.create_user(&User {
            role: Role::TeamLead,
            ..employee("tl-001")
        })
        .await
        .unwrap();

        let employees = svc.list_users(Some(Role::Employee), 20).await.unwrap();
        assert_eq!(employees.len(), 2);
        assert_eq!(svc.list_users(None, 20).await.unwrap().len(), 3);
        assert_eq!(svc.list_users(None, 1).await.unwrap().len(), 1);
        assert_eq!(svc.count_users(Some(Role::TeamLead)).await.unwrap(), 1);
        assert_eq!(svc.count_users(None).await.unwrap(), 3);
    }
}
