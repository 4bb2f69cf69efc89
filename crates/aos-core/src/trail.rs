//! JSONL trail operation envelope.
//!
//! Every mutation is recorded as a `TrailOperation` in per-stream
//! `.aos/trail/{stream}.jsonl` files, where the stream is the session the
//! mutation belongs to (or the entity ID when there is none).
//!
//! The `v` field supports schema versioning: trail lines written without a
//! `v` field deserialize with `v == 1` via `#[serde(default)]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EntityType, TrailOp};

/// Current trail envelope version.
pub const TRAIL_VERSION: u32 = 1;

const fn default_trail_version() -> u32 {
    TRAIL_VERSION
}

/// A single operation recorded in the JSONL trail.
///
/// `data` holds the full entity for `Create`, changed fields for `Update`,
/// `{from, to}` for `Transition`, and the appended element for `Append`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TrailOperation {
    #[serde(default = "default_trail_version")]
    pub v: u32,

    /// RFC 3339 timestamp of the operation.
    pub ts: String,

    /// Stream the operation is filed under.
    pub stream: String,

    pub op: TrailOp,

    pub entity: EntityType,

    pub id: String,

    pub data: serde_json::Value,
}
