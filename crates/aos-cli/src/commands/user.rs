use aos_core::enums::Role;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_opt;
use crate::context::AppContext;
use crate::output::output;

/// Handle `aos user`.
pub async fn handle(action: &UserCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        UserCommands::List { role, limit } => {
            let role = parse_opt::<Role>(role.as_deref(), "role")?;
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            let users = ctx.service.list_users(role, limit).await?;
            output(&users, flags.format)
        }
        UserCommands::Get { id } => output(&ctx.service.get_user(id).await?, flags.format),
    }
}
