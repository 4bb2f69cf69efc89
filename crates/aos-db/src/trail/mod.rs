//! JSONL trail of every committed mutation.
//!
//! One file per session in the configured trail directory, so the history of
//! a single one-on-one (its feedback, analysis, derived records, and case
//! actions) reads top to bottom.

pub mod writer;
