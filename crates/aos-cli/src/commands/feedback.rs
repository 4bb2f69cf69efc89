use std::io::Read;
use std::path::Path;

use anyhow::Context;
use aos_core::entities::{FeedbackPayload, FeedbackSubmission};
use aos_core::enums::{GrowthTrajectory, MeetingLocation};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{FeedbackCommands, SubmitArgs};
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `aos feedback`.
pub async fn handle(
    action: &FeedbackCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        FeedbackCommands::Submit(args) => {
            let submission = match &args.input {
                Some(path) => read_submission(path)?,
                None => submission_from_args(args)?,
            };
            let response = ctx.feedback.submit(&ctx.service, &submission).await?;
            if let Some(error) = &response.error {
                tracing::warn!(session_id = %response.session_id, %error, "analysis failed");
            }
            output(&response, flags.format)
        }
    }
}

fn read_submission(path: &Path) -> anyhow::Result<FeedbackSubmission> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read submission from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&raw).context("submission is not a valid feedback JSON object")
}

fn submission_from_args(args: &SubmitArgs) -> anyhow::Result<FeedbackSubmission> {
    let (Some(employee_id), Some(employee_name)) = (&args.employee_id, &args.employee_name) else {
        anyhow::bail!("--employee-id and --employee-name are required without --input");
    };
    Ok(FeedbackSubmission {
        session_id: args.session_id.clone(),
        employee_id: employee_id.clone(),
        employee_name: employee_name.clone(),
        feedback: FeedbackPayload {
            meeting_location: parse_enum::<MeetingLocation>(&args.location, "location")?,
            feedback_tone: args.tone,
            reception_quality: args.reception,
            growth_trajectory: parse_enum::<GrowthTrajectory>(&args.trajectory, "trajectory")?,
            stress_signs: args.stress_signs.clone(),
            expressed_aspirations: args.aspirations.clone(),
            appreciation_given: args.appreciation,
            detailed_notes: args.notes.clone(),
            transcript: args.transcript.clone(),
            daily_recording_url: args.recording_url.clone(),
        },
    })
}
