use aos_core::enums::CaseStatus;
use aos_db::repos::case::CaseFilter;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CaseCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_opt;
use crate::context::AppContext;
use crate::output::output;

/// Handle `aos case`.
pub async fn handle(action: &CaseCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        CaseCommands::List {
            status,
            min_level,
            level,
            open,
            session,
            limit,
        } => {
            let filter = CaseFilter {
                status: parse_opt::<CaseStatus>(status.as_deref(), "status")?,
                min_level: *min_level,
                exact_level: *level,
                open_only: *open,
                session_id: session.clone(),
                limit: Some(effective_limit(
                    *limit,
                    flags.limit,
                    ctx.config.general.default_limit,
                )),
            };
            output(&ctx.service.list_cases(&filter).await?, flags.format)
        }
        CaseCommands::Get { id } => output(&ctx.service.get_case(id).await?, flags.format),
        CaseCommands::Act {
            id,
            action,
            response,
            notes,
        } => {
            let case = ctx
                .escalation
                .act(&ctx.service, id, action, response, notes)
                .await?;
            tracing::info!(
                case_id = %case.id,
                action = %action,
                status = %case.status(),
                level = case.level(),
                "case action recorded"
            );
            output(&case, flags.format)
        }
    }
}
