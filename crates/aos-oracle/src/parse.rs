//! Reply parsing.
//!
//! A reply is accepted only if it is JSON (optionally inside a Markdown code
//! fence), conforms to the `analysis_result` schema, and passes the semantic
//! bounds in [`AnalysisResult::validate`]. Anything else is
//! [`OracleError::Malformed`].

use aos_core::entities::AnalysisResult;
use aos_schema::SchemaRegistry;

use crate::error::OracleError;

const ANALYSIS_SCHEMA: &str = "analysis_result";

/// Remove a surrounding Markdown code fence, with or without a `json` tag.
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// Parse and validate an oracle reply.
///
/// # Errors
///
/// Returns `OracleError::Malformed` describing the first problem found.
pub fn parse_analysis(text: &str, schema: &SchemaRegistry) -> Result<AnalysisResult, OracleError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(OracleError::Malformed("empty reply".into()));
    }

    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| OracleError::Malformed(format!("reply is not JSON: {e}")))?;

    schema
        .validate(ANALYSIS_SCHEMA, &value)
        .map_err(|e| OracleError::Malformed(e.to_string()))?;

    let analysis: AnalysisResult = serde_json::from_value(value)
        .map_err(|e| OracleError::Malformed(e.to_string()))?;
    analysis
        .validate()
        .map_err(|e| OracleError::Malformed(e.to_string()))?;
    Ok(analysis)
}
