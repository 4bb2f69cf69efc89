//! Typed audit detail payloads.
//!
//! Each audit action can carry a structured `detail` JSON blob. These types
//! give the common shapes a schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Detail for `AuditAction::StatusChanged`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
    pub reason: Option<String>,
}

/// Detail for `AuditAction::CaseAction`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CaseActionDetail {
    pub action: String,
    /// Whether the action was part of the vocabulary.
    pub recognized: bool,
    pub from_status: String,
    pub to_status: String,
    pub from_level: u8,
    pub to_level: u8,
}

/// Detail for `AuditAction::CheckIn`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CheckInDetail {
    pub progress: u8,
    pub notes: String,
}

/// Detail for the `analyzing -> completed` status change written when fan-out commits.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FanOutDetail {
    pub analysis_version: u32,
    pub insights_created: u32,
    pub goals_created: u32,
    pub case_id: Option<String>,
}

/// Detail for `AuditAction::Seeded`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SeededDetail {
    pub users: u32,
    pub sessions: u32,
    pub goals: u32,
    pub insights: u32,
}
