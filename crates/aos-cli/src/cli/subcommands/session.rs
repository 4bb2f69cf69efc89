use chrono::{DateTime, Utc};
use clap::Subcommand;

/// Session commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SessionCommands {
    /// Schedule an upcoming session.
    Schedule {
        #[arg(long)]
        employee_id: String,
        #[arg(long)]
        employee_name: String,
        /// Defaults to general.default_supervisor_id.
        #[arg(long)]
        supervisor_id: Option<String>,
        #[arg(long)]
        supervisor_name: Option<String>,
        /// RFC 3339 timestamp.
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        /// office, remote, hybrid
        #[arg(long)]
        location: Option<String>,
        /// Explicit session ID.
        #[arg(long)]
        id: Option<String>,
    },
    /// List sessions.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        employee: Option<String>,
        #[arg(long)]
        supervisor: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get a session by ID.
    Get { id: String },
    /// Resume or fail sessions left in `analyzing`.
    Recover {
        /// Only sessions submitted before this RFC 3339 timestamp.
        #[arg(long)]
        before: Option<DateTime<Utc>>,
    },
}
