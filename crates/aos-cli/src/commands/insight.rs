use crate::cli::GlobalFlags;
use crate::cli::subcommands::InsightCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Recent insights shown when no limit is given.
const INSIGHT_LIMIT: u32 = 10;

/// Handle `aos insight`.
pub async fn handle(
    action: &InsightCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        InsightCommands::List { user, session, limit } => {
            let limit = effective_limit(*limit, flags.limit, INSIGHT_LIMIT);
            let insights = match session {
                Some(session_id) => {
                    let mut insights = ctx.service.insights_for_session(session_id).await?;
                    if let Some(user) = user {
                        insights.retain(|insight| &insight.user_id == user);
                    }
                    insights.truncate(usize::try_from(limit)?);
                    insights
                }
                None => ctx.service.list_insights(user.as_deref(), limit).await?,
            };
            output(&insights, flags.format)
        }
    }
}
