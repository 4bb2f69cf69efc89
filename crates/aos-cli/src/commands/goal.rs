use aos_core::enums::{AmReviewDecision, GoalSource, GoalStatus};
use aos_db::repos::goal::{GoalFilter, NewGoal};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::GoalCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_enum, parse_opt};
use crate::context::AppContext;
use crate::output::output;

/// Handle `aos goal`.
pub async fn handle(action: &GoalCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        GoalCommands::Create {
            user,
            title,
            description,
            source,
            start,
            target,
        } => {
            svc.get_user(user).await?;
            let new = NewGoal {
                user_id: user.clone(),
                title: title.clone(),
                description: description.clone(),
                source: parse_enum::<GoalSource>(source, "source")?,
                start_date: *start,
                target_end_date: *target,
                resource: None,
            };
            output(&svc.create_goal(&new).await?, flags.format)
        }
        GoalCommands::Assign {
            user,
            recommendation,
        } => {
            svc.get_user(user).await?;
            output(&svc.assign_goal(user, recommendation).await?, flags.format)
        }
        GoalCommands::List {
            user,
            status,
            source,
            limit,
        } => {
            let filter = GoalFilter {
                user_id: user.clone(),
                status: parse_opt::<GoalStatus>(status.as_deref(), "status")?,
                source: parse_opt::<GoalSource>(source.as_deref(), "source")?,
                limit: Some(effective_limit(
                    *limit,
                    flags.limit,
                    ctx.config.general.default_limit,
                )),
            };
            output(&svc.list_goals(&filter).await?, flags.format)
        }
        GoalCommands::Get { id } => output(&svc.get_goal(id).await?, flags.format),
        GoalCommands::Accept { id, start, target } => {
            output(&svc.accept_goal(id, *start, *target).await?, flags.format)
        }
        GoalCommands::Decline { id, reason } => {
            output(&svc.decline_goal(id, reason).await?, flags.format)
        }
        GoalCommands::Review { id, decision } => {
            let decision = parse_enum::<AmReviewDecision>(decision, "decision")?;
            output(&svc.review_decline(id, decision).await?, flags.format)
        }
        GoalCommands::Progress {
            id,
            progress,
            notes,
        } => output(&svc.update_progress(id, *progress, notes).await?, flags.format),
    }
}
