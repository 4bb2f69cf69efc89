//! # aos-core
//!
//! Core types shared across all AccountabilityOS crates:
//! - Entity structs (sessions, analysis results, insights, coaching goals,
//!   critical cases, users, audit entries)
//! - Status enums with state machine transitions
//! - ID prefix constants
//! - Cross-cutting error types
//! - Trail operation envelope for JSONL persistence
//! - CLI response types and audit detail sub-types
//! - The pure escalation engine and fan-out planner. Neither touches storage;
//!   `aos-db` applies what they compute.

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod escalation;
pub mod fanout;
pub mod ids;
pub mod responses;
pub mod trail;
