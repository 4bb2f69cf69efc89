use clap::Subcommand;

/// User commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// List users.
    List {
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get a user by ID.
    Get { id: String },
}
