//! Prompt construction.
//!
//! The prompt lists the keys the reply must carry and then the meeting data.
//! Empty free-text fields are spelled out ("No notes") rather than left
//! blank so the model does not invent content for them.

use std::fmt::Write as _;

use crate::gateway::AnalysisContext;

/// System message sent with every analysis request.
pub const SYSTEM_PROMPT: &str = "You are an expert HR analyst AI. Analyze 1-on-1 meeting data \
     and provide comprehensive feedback. Always respond with valid JSON only.";

const REPLY_KEYS: &str = "\
- supervisor_summary (string, 2-3 sentences)
- employee_summary (string, 2-3 sentences)
- leadership_score (number 1-10)
- effectiveness_score (number 1-10)
- swot_analysis (object with keys: strengths, weaknesses, opportunities, threats - each array of strings)
- strengths_observed (array of objects with keys: action, example)
- coaching_recommendations (array of objects with keys: title, description, recommended_resource with type/title/author)
- action_items (array of objects with keys: task, owner (supervisor/employee), due_date, priority)
- missed_signals (array of objects with keys: signal, context, suggested_follow_up)
- critical_coaching_insight (null or object with keys: summary, reason_for_criticality, severity, suggested_immediate_action)
- employee_insights (array of 3-4 short insight strings for the employee)";

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() { placeholder } else { value }
}

/// Build the user message for one analysis.
#[must_use]
pub fn build_prompt(ctx: &AnalysisContext) -> String {
    let fb = &ctx.feedback;
    let scores = ctx
        .employee
        .scores
        .as_ref()
        .and_then(|s| serde_json::to_string(s).ok())
        .unwrap_or_else(|| "{}".to_string());
    let stress = serde_json::to_string(&fb.stress_signs).unwrap_or_else(|_| "[]".to_string());
    let goals = serde_json::to_string(&ctx.active_goal_titles).unwrap_or_else(|_| "[]".to_string());

    let mut prompt = String::with_capacity(2048);
    prompt.push_str("Analyze this 1-on-1 meeting and return a JSON object with these exact keys:\n");
    prompt.push_str(REPLY_KEYS);
    prompt.push_str("\n\nMeeting Data:\n");
    let _ = writeln!(prompt, "Employee: {} - {}", ctx.employee.name, ctx.employee.team);
    let _ = writeln!(prompt, "Scores: {scores}");
    let _ = writeln!(prompt, "Location: {}", fb.meeting_location);
    let _ = writeln!(prompt, "Feedback Tone: {}/5", fb.feedback_tone);
    let _ = writeln!(prompt, "Reception Quality: {}/5", fb.reception_quality);
    let _ = writeln!(prompt, "Growth Trajectory: {}", fb.growth_trajectory);
    let _ = writeln!(prompt, "Stress Signs: {stress}");
    let _ = writeln!(
        prompt,
        "Aspirations: {}",
        or_placeholder(&fb.expressed_aspirations, "None mentioned")
    );
    let _ = writeln!(prompt, "Appreciation Given: {}", fb.appreciation_given);
    let _ = writeln!(prompt, "Notes: {}", or_placeholder(&fb.detailed_notes, "No notes"));
    let _ = writeln!(
        prompt,
        "Transcript: {}",
        or_placeholder(&fb.transcript, "No transcript")
    );
    let _ = writeln!(prompt, "Active Goals: {goals}");
    prompt.push_str("\nReturn ONLY valid JSON.");
    prompt
}
