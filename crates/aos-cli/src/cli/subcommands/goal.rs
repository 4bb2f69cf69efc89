use chrono::NaiveDate;
use clap::Subcommand;

/// Coaching goal commands.
#[derive(Clone, Debug, Subcommand)]
pub enum GoalCommands {
    /// Create an active goal.
    Create {
        #[arg(long)]
        user: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// ai, custom, org_health
        #[arg(long, default_value = "custom")]
        source: String,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        target: Option<NaiveDate>,
    },
    /// Assign an org-health recommendation as a goal.
    Assign {
        #[arg(long)]
        user: String,
        #[arg(long)]
        recommendation: String,
    },
    /// List goals, newest first.
    List {
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get a goal by ID.
    Get { id: String },
    /// Accept a pending goal.
    Accept {
        id: String,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        target: Option<NaiveDate>,
    },
    /// Decline a pending goal; it goes to AM review.
    Decline {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// Rule on a declined goal: uphold_ai or confirm_decline.
    Review {
        id: String,
        #[arg(long)]
        decision: String,
    },
    /// Record a progress check-in.
    Progress {
        id: String,
        #[arg(long)]
        progress: u8,
        #[arg(long, default_value = "")]
        notes: String,
    },
}
