//! Demo data bootstrap.
//!
//! `aos seed` is the only caller. Seeding is a no-op once any user exists;
//! otherwise everything lands in one transaction and is audited as a single
//! `seeded` entry.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use aos_core::audit_detail::SeededDetail;
use aos_core::entities::{PerformanceScores, PerformanceTrends, RecommendedResource, User};
use aos_core::enums::{AuditAction, EntityType, GoalSource, MeetingLocation, Role, SessionStatus, TrailOp, Trend};
use aos_core::ids::{DEFAULT_SUPERVISOR_ID, DEFAULT_SUPERVISOR_NAME, PREFIX_GOAL, PREFIX_INSIGHT, PREFIX_SESSION};
use aos_core::responses::SeedReport;

use crate::error::DatabaseError;
use crate::helpers::to_optional_json;
use crate::repos::audit::Mutation;
use crate::service::AosService;

/// Audit entity ID for the seeding entry.
const SEED_ENTITY_ID: &str = "seed";

struct SeedSession {
    employee_id: &'static str,
    employee_name: &'static str,
    scheduled_at: (i32, u32, u32, u32),
    status: SessionStatus,
    location: MeetingLocation,
}

struct SeedGoal {
    user_id: &'static str,
    title: &'static str,
    description: &'static str,
    source: GoalSource,
    progress: u8,
    start: (i32, u32, u32),
    target: (i32, u32, u32),
    resource: Option<(&'static str, &'static str, &'static str)>,
}

const SESSIONS: [SeedSession; 3] = [
    SeedSession {
        employee_id: "emp-001",
        employee_name: "Alex Rivera",
        scheduled_at: (2026, 1, 10, 10),
        status: SessionStatus::Completed,
        location: MeetingLocation::Office,
    },
    SeedSession {
        employee_id: "emp-002",
        employee_name: "Jordan Kim",
        scheduled_at: (2026, 1, 15, 14),
        status: SessionStatus::Upcoming,
        location: MeetingLocation::Remote,
    },
    SeedSession {
        employee_id: "emp-003",
        employee_name: "Sam Patel",
        scheduled_at: (2026, 1, 18, 9),
        status: SessionStatus::Upcoming,
        location: MeetingLocation::Hybrid,
    },
];

const GOALS: [SeedGoal; 2] = [
    SeedGoal {
        user_id: DEFAULT_SUPERVISOR_ID,
        title: "Improve Active Listening",
        description: "Practice reflective listening in 1-on-1 meetings",
        source: GoalSource::Ai,
        progress: 35,
        start: (2026, 1, 1),
        target: (2026, 3, 1),
        resource: Some(("book", "Just Listen", "Mark Goulston")),
    },
    SeedGoal {
        user_id: "emp-001",
        title: "Public Speaking Confidence",
        description: "Present in at least 2 team meetings per month",
        source: GoalSource::Custom,
        progress: 50,
        start: (2025, 12, 15),
        target: (2026, 2, 28),
        resource: None,
    },
];

const INSIGHTS: [(&str, &str); 4] = [
    (
        "emp-001",
        "Your communication scores improved 12% this quarter - keep leveraging structured agendas.",
    ),
    (
        "emp-001",
        "Your supervisor noted strong problem-solving in the last sprint review.",
    ),
    (
        "emp-001",
        "Consider asking for more cross-functional project opportunities to boost visibility.",
    ),
    (
        "emp-002",
        "Consistent high performance in project delivery - you're in the top 15% of your team.",
    ),
];

const fn scores(overall: u8, project_delivery: u8, goal_completion: u8, communication: u8) -> PerformanceScores {
    PerformanceScores {
        overall,
        project_delivery,
        goal_completion,
        communication,
    }
}

const fn trends(overall: Trend, project_delivery: Trend, goal_completion: Trend, communication: Trend) -> PerformanceTrends {
    PerformanceTrends {
        overall,
        project_delivery,
        goal_completion,
        communication,
    }
}

fn user(
    id: &str,
    name: &str,
    role: Role,
    team: &str,
    scores: Option<PerformanceScores>,
    trends: Option<PerformanceTrends>,
) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        role,
        team: team.to_string(),
        scores,
        trends,
    }
}

/// The fixed demo organization.
#[must_use]
pub fn demo_users() -> Vec<User> {
    use Trend::{Down, Stable, Up};
    vec![
        user("emp-001", "Alex Rivera", Role::Employee, "Engineering",
             Some(scores(78, 82, 74, 80)), Some(trends(Up, Up, Stable, Up))),
        user("emp-002", "Jordan Kim", Role::Employee, "Engineering",
             Some(scores(85, 88, 82, 85)), Some(trends(Up, Up, Up, Stable))),
        user("emp-003", "Sam Patel", Role::Employee, "Design",
             Some(scores(72, 70, 68, 78)), Some(trends(Down, Stable, Down, Up))),
        user("emp-004", "Casey Morgan", Role::Employee, "Marketing",
             Some(scores(90, 92, 88, 90)), Some(trends(Up, Up, Up, Up))),
        user(DEFAULT_SUPERVISOR_ID, DEFAULT_SUPERVISOR_NAME, Role::TeamLead, "Engineering",
             Some(scores(83, 85, 80, 84)), None),
        user("am-001", "Morgan Blake", Role::Am, "Operations", None, None),
        user("mgr-001", "Dana Foster", Role::Manager, "All", None, None),
        user("hr-001", "Robin Hayes", Role::HrHead, "All", None, None),
    ]
}

fn seed_time((y, m, d, h): (i32, u32, u32, u32)) -> Result<DateTime<Utc>, DatabaseError> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
        .single()
        .ok_or_else(|| DatabaseError::Query(format!("invalid seed timestamp {y}-{m}-{d}")))
}

fn seed_date((y, m, d): (i32, u32, u32)) -> Result<String, DatabaseError> {
    NaiveDate::from_ymd_opt(y, m, d)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| DatabaseError::Query(format!("invalid seed date {y}-{m}-{d}")))
}

impl AosService {
    /// Load the demo organization into an empty store.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any insert fails; nothing is written then.
    pub async fn seed_demo_data(&self) -> Result<SeedReport, DatabaseError> {
        if self.count_users(None).await? > 0 {
            tracing::info!("store already has users; skipping seed");
            return Ok(SeedReport::default());
        }

        let now = Utc::now();
        let tx = self.db().conn().transaction().await?;

        let users = demo_users();
        for user in &users {
            self.insert_user_row(user).await?;
        }

        for session in &SESSIONS {
            let id = self.db().generate_id(PREFIX_SESSION).await?;
            self.db()
                .conn()
                .execute(
                    "INSERT INTO sessions (id, supervisor_id, supervisor_name, employee_id, employee_name,
                                           scheduled_at, meeting_location, status, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
                    libsql::params![
                        id.as_str(),
                        DEFAULT_SUPERVISOR_ID,
                        DEFAULT_SUPERVISOR_NAME,
                        session.employee_id,
                        session.employee_name,
                        seed_time(session.scheduled_at)?.to_rfc3339(),
                        session.location.as_str(),
                        session.status.as_str(),
                        now.to_rfc3339()
                    ],
                )
                .await?;
        }

        for goal in &GOALS {
            let id = self.db().generate_id(PREFIX_GOAL).await?;
            let resource = goal.resource.map(|(kind, title, author)| RecommendedResource {
                kind: kind.to_string(),
                title: title.to_string(),
                author: Some(author.to_string()),
            });
            self.db()
                .conn()
                .execute(
                    "INSERT INTO coaching_goals (id, user_id, title, description, source, status, progress,
                                                 start_date, target_end_date, resource, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, 'active', ?6, ?7, ?8, ?9, ?10, ?10)",
                    libsql::params![
                        id.as_str(),
                        goal.user_id,
                        goal.title,
                        goal.description,
                        goal.source.as_str(),
                        i64::from(goal.progress),
                        seed_date(goal.start)?,
                        seed_date(goal.target)?,
                        to_optional_json(resource.as_ref())?,
                        now.to_rfc3339()
                    ],
                )
                .await?;
        }

        for (user_id, content) in INSIGHTS {
            let id = self.db().generate_id(PREFIX_INSIGHT).await?;
            self.db()
                .conn()
                .execute(
                    "INSERT INTO insights (id, user_id, content, created_at) VALUES (?1, ?2, ?3, ?4)",
                    libsql::params![id.as_str(), user_id, content, now.to_rfc3339()],
                )
                .await?;
        }

        let report = SeedReport {
            seeded: true,
            users: u32::try_from(users.len()).unwrap_or(u32::MAX),
            sessions: u32::try_from(SESSIONS.len()).unwrap_or(u32::MAX),
            goals: u32::try_from(GOALS.len()).unwrap_or(u32::MAX),
            insights: u32::try_from(INSIGHTS.len()).unwrap_or(u32::MAX),
        };
        let detail = SeededDetail {
            users: report.users,
            sessions: report.sessions,
            goals: report.goals,
            insights: report.insights,
        };
        let op = self
            .audit_mutation(
                &Mutation {
                    session_id: None,
                    entity: EntityType::User,
                    entity_id: SEED_ENTITY_ID,
                    action: AuditAction::Seeded,
                    detail: Some(serde_json::to_value(&detail)?),
                    op: TrailOp::Append,
                    data: serde_json::to_value(&detail)?,
                },
                now,
            )
            .await?;

        tx.commit().await?;
        self.write_trail(&[op])?;

        tracing::info!(users = report.users, sessions = report.sessions, "demo data seeded");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::goal::GoalFilter;
    use crate::repos::session::SessionFilter;
    use crate::test_support::helpers::{employee, test_service};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn seeds_the_demo_organization() {
        let svc = test_service().await;
        let report = svc.seed_demo_data().await.unwrap();
        assert_eq!(
            report,
            SeedReport {
                seeded: true,
                users: 8,
                sessions: 3,
                goals: 2,
                insights: 4,
            }
        );

        assert_eq!(svc.count_users(Some(Role::Employee)).await.unwrap(), 4);
        let alex = svc.get_user("emp-001").await.unwrap();
        assert_eq!(alex.scores.unwrap().overall, 78);
        assert_eq!(alex.trends.unwrap().goal_completion, Trend::Stable);

        let completed = svc
            .list_sessions(&SessionFilter {
                status: Some(SessionStatus::Completed),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].employee_id, "emp-001");

        let listening = svc
            .list_goals(&GoalFilter {
                user_id: Some("tl-001".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(listening[0].progress, 35);
        assert_eq!(listening[0].resource.as_ref().unwrap().title, "Just Listen");

        assert_eq!(svc.list_insights(Some("emp-001"), 10).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn second_seed_is_a_no_op() {
        let svc = test_service().await;
        svc.seed_demo_data().await.unwrap();
        let report = svc.seed_demo_data().await.unwrap();
        assert!(!report.seeded);
        assert_eq!(svc.count_users(None).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn existing_users_block_seeding() {
        let svc = test_service().await;
        svc.create_user(&employee("emp-900")).await.unwrap();
        assert!(!svc.seed_demo_data().await.unwrap().seeded);
        assert_eq!(svc.count_users(None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn seeding_is_audited_once() {
        let svc = test_service().await;
        svc.seed_demo_data().await.unwrap();
        let entries = svc
            .query_audit(&crate::repos::audit::AuditFilter {
                action: Some(AuditAction::Seeded),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entity_id, SEED_ENTITY_ID);
    }
}
