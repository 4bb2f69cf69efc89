//! Role dashboards: read-only aggregates over the other repositories.

use aos_core::entities::{CriticalCase, Session};
use aos_core::enums::{GoalStatus, Role, SessionStatus};
use aos_core::responses::DashboardResponse;

use crate::error::DatabaseError;
use crate::repos::case::CaseFilter;
use crate::repos::goal::GoalFilter;
use crate::repos::session::SessionFilter;
use crate::service::AosService;

/// Cap on "everything" lists.
const ALL: u32 = 500;

impl AosService {
    /// Build the dashboard for `role`. Sections irrelevant to the role stay `None`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any underlying query fails.
    pub async fn dashboard(&self, role: Role) -> Result<DashboardResponse, DatabaseError> {
        let mut resp = DashboardResponse::empty(role);

        match role {
            Role::Employee => {
                resp.users = Some(self.list_users(Some(Role::Employee), ALL).await?);
                resp.upcoming_sessions = Some(self.sessions_with_status(SessionStatus::Upcoming, 5).await?);
                resp.insights = Some(self.list_insights(None, 10).await?);
            }
            Role::TeamLead => {
                resp.users = Some(self.list_users(Some(Role::Employee), ALL).await?);
                resp.upcoming_sessions =
                    Some(self.sessions_with_status(SessionStatus::Upcoming, ALL).await?);
                resp.recent_sessions =
                    Some(self.sessions_with_status(SessionStatus::Completed, 5).await?);
                resp.cases = Some(
                    self.list_cases(&CaseFilter {
                        open_only: true,
                        limit: Some(5),
                        ..Default::default()
                    })
                    .await?,
                );
            }
            Role::Am => {
                resp.users = Some(self.list_users(Some(Role::TeamLead), ALL).await?);
                resp.cases = Some(self.cases_at_level(3, false).await?);
                resp.pending_reviews = Some(
                    self.list_goals(&GoalFilter {
                        status: Some(GoalStatus::PendingAmReview),
                        limit: Some(ALL),
                        ..Default::default()
                    })
                    .await?,
                );
            }
            Role::Manager => {
                resp.users = Some(self.list_users(None, ALL).await?);
                resp.cases = Some(self.cases_at_level(4, false).await?);
            }
            Role::HrHead => {
                resp.users = Some(self.list_users(None, ALL).await?);
                resp.cases = Some(self.cases_at_level(5, true).await?);
                resp.employee_count = Some(self.count_users(Some(Role::Employee)).await?);
            }
        }

        Ok(resp)
    }

    async fn sessions_with_status(
        &self,
        status: SessionStatus,
        limit: u32,
    ) -> Result<Vec<Session>, DatabaseError> {
        self.list_sessions(&SessionFilter {
            status: Some(status),
            limit: Some(limit),
            ..Default::default()
        })
        .await
    }

    async fn cases_at_level(
        &self,
        level: u8,
        exact: bool,
    ) -> Result<Vec<CriticalCase>, DatabaseError> {
        let filter = if exact {
            CaseFilter {
                exact_level: Some(level),
                limit: Some(ALL),
                ..Default::default()
            }
        } else {
            CaseFilter {
                min_level: Some(level),
                limit: Some(ALL),
                ..Default::default()
            }
        };
        self.list_cases(&filter).await
    }
}
