use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    CaseCommands, FeedbackCommands, GoalCommands, InsightCommands, SessionCommands, UserCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Load the demo organization into an empty store.
    Seed,
    /// Users.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// One-on-one sessions.
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
    /// Submit feedback for analysis.
    Feedback {
        #[command(subcommand)]
        action: FeedbackCommands,
    },
    /// Critical cases.
    Case {
        #[command(subcommand)]
        action: CaseCommands,
    },
    /// Coaching goals.
    Goal {
        #[command(subcommand)]
        action: GoalCommands,
    },
    /// Employee insights.
    Insight {
        #[command(subcommand)]
        action: InsightCommands,
    },
    /// Role dashboard.
    Dashboard(DashboardArgs),
    /// Query the audit trail.
    Audit(AuditArgs),
}

/// Arguments for `aos dashboard`.
#[derive(Clone, Debug, Args)]
pub struct DashboardArgs {
    /// employee, team_lead, am, manager, hr_head
    pub role: String,
}

/// Arguments for `aos audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    /// Entity type filter (session, goal, case, ...)
    #[arg(long)]
    pub entity: Option<String>,
    #[arg(long)]
    pub entity_id: Option<String>,
    /// Audit action filter (created, status_changed, case_action, ...)
    #[arg(long)]
    pub action: Option<String>,
    #[arg(long)]
    pub session: Option<String>,
    #[arg(long)]
    pub limit: Option<u32>,
}
