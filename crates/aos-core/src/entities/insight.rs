use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A short observation addressed to one employee.
///
/// Created only as a side effect of an accepted analysis (or by seeding);
/// never updated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Insight {
    pub id: String,
    pub user_id: String,
    pub session_id: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
