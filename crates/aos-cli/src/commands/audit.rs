use aos_core::enums::{AuditAction, EntityType};
use aos_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_opt;
use crate::context::AppContext;
use crate::output::output;

/// Handle `aos audit`.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = AuditFilter {
        entity_type: parse_opt::<EntityType>(args.entity.as_deref(), "entity")?,
        entity_id: args.entity_id.clone(),
        action: parse_opt::<AuditAction>(args.action.as_deref(), "action")?,
        session_id: args.session.clone(),
        limit: Some(effective_limit(
            args.limit,
            flags.limit,
            ctx.config.general.default_limit,
        )),
    };
    output(&ctx.service.query_audit(&filter).await?, flags.format)
}
