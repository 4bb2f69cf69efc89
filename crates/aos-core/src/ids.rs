//! ID prefixes for every persisted entity.
//!
//! IDs are generated in SQL as `{prefix}-{8 hex chars}` (see
//! `AosDb::generate_id`). Seeded demo users keep their fixed human-readable
//! IDs (`emp-001`, `tl-001`, ...).

pub const PREFIX_SESSION: &str = "ses";
pub const PREFIX_INSIGHT: &str = "ins";
pub const PREFIX_GOAL: &str = "gol";
pub const PREFIX_CASE: &str = "cas";
pub const PREFIX_AUDIT: &str = "aud";

/// All generated prefixes, for exhaustive tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_SESSION,
    PREFIX_INSIGHT,
    PREFIX_GOAL,
    PREFIX_CASE,
    PREFIX_AUDIT,
];

/// Default supervisor for sessions and AI goals when none is given.
pub const DEFAULT_SUPERVISOR_ID: &str = "tl-001";
pub const DEFAULT_SUPERVISOR_NAME: &str = "Taylor Chen";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn prefixes_are_unique_and_three_chars() {
        let unique: HashSet<_> = ALL_PREFIXES.iter().collect();
        assert_eq!(unique.len(), ALL_PREFIXES.len());
        assert!(ALL_PREFIXES.iter().all(|p| p.len() == 3));
    }
}
