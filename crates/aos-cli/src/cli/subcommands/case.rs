use clap::Subcommand;

/// Critical case commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CaseCommands {
    /// List cases, highest level first.
    List {
        #[arg(long)]
        status: Option<String>,
        /// Only cases at or above this level.
        #[arg(long)]
        min_level: Option<u8>,
        /// Only cases at exactly this level.
        #[arg(long, conflicts_with = "min_level")]
        level: Option<u8>,
        /// Exclude resolved cases.
        #[arg(long)]
        open: bool,
        #[arg(long)]
        session: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get a case by ID.
    Get { id: String },
    /// Record an action on a case.
    Act {
        id: String,
        /// supervisor_respond, employee_satisfied, employee_not_satisfied,
        /// am_coach_supervisor, am_address_directly, am_escalate,
        /// manager_review, hr_address, hr_final
        #[arg(long)]
        action: String,
        #[arg(long, default_value = "")]
        response: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
}
