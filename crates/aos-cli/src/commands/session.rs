use aos_core::enums::{MeetingLocation, SessionStatus};
use aos_db::repos::session::{NewSession, SessionFilter};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SessionCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_opt;
use crate::context::AppContext;
use crate::output::output;

/// Handle `aos session`.
pub async fn handle(
    action: &SessionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SessionCommands::Schedule {
            employee_id,
            employee_name,
            supervisor_id,
            supervisor_name,
            at,
            location,
            id,
        } => {
            let general = &ctx.config.general;
            let new = NewSession {
                id: id.clone(),
                employee_id: employee_id.clone(),
                employee_name: employee_name.clone(),
                supervisor_id: supervisor_id
                    .clone()
                    .unwrap_or_else(|| general.default_supervisor_id.clone()),
                supervisor_name: supervisor_name
                    .clone()
                    .unwrap_or_else(|| general.default_supervisor_name.clone()),
                scheduled_at: *at,
                meeting_location: parse_opt::<MeetingLocation>(location.as_deref(), "location")?
                    .unwrap_or_default(),
            };
            // Unknown employees fail here rather than as a foreign-key error.
            ctx.service.get_user(&new.employee_id).await?;
            output(&ctx.service.schedule_session(&new).await?, flags.format)
        }
        SessionCommands::List {
            status,
            employee,
            supervisor,
            limit,
        } => {
            let filter = SessionFilter {
                status: parse_opt::<SessionStatus>(status.as_deref(), "status")?,
                employee_id: employee.clone(),
                supervisor_id: supervisor.clone(),
                limit: Some(effective_limit(
                    *limit,
                    flags.limit,
                    ctx.config.general.default_limit,
                )),
            };
            output(&ctx.service.list_sessions(&filter).await?, flags.format)
        }
        SessionCommands::Get { id } => output(&ctx.service.get_session(id).await?, flags.format),
        SessionCommands::Recover { before } => {
            let report = ctx.feedback.recover(&ctx.service, *before).await?;
            output(&report, flags.format)
        }
    }
}
