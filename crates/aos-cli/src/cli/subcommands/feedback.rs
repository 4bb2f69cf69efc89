use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Feedback commands.
#[derive(Clone, Debug, Subcommand)]
pub enum FeedbackCommands {
    /// Submit feedback and run analysis.
    Submit(SubmitArgs),
}

/// Inline fields or a JSON submission file, not both.
#[derive(Clone, Debug, Args)]
pub struct SubmitArgs {
    /// Read the whole submission from a JSON file (`-` for stdin).
    #[arg(long, conflicts_with_all = ["employee_id", "employee_name", "session_id"])]
    pub input: Option<PathBuf>,

    /// Upsert onto this session instead of creating one.
    #[arg(long)]
    pub session_id: Option<String>,
    #[arg(long, required_unless_present = "input")]
    pub employee_id: Option<String>,
    #[arg(long, required_unless_present = "input")]
    pub employee_name: Option<String>,

    /// office, remote, hybrid
    #[arg(long, default_value = "office")]
    pub location: String,
    /// Delivery tone, 1 (harsh) to 5 (constructive).
    #[arg(long, default_value_t = 3)]
    pub tone: u8,
    /// Reception quality, 1 to 5.
    #[arg(long, default_value_t = 3)]
    pub reception: u8,
    /// declining, stagnant, growing, excelling
    #[arg(long, default_value = "growing")]
    pub trajectory: String,
    #[arg(long = "stress-sign")]
    pub stress_signs: Vec<String>,
    #[arg(long, default_value = "")]
    pub aspirations: String,
    #[arg(long)]
    pub appreciation: bool,
    #[arg(long, default_value = "")]
    pub notes: String,
    #[arg(long, default_value = "")]
    pub transcript: String,
    #[arg(long, default_value = "")]
    pub recording_url: String,
}
