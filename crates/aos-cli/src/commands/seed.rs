use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `aos seed`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx.service.seed_demo_data().await?;
    if !report.seeded {
        tracing::info!("store already has users; seed skipped");
    }
    output(&report, flags.format)
}
