//! # aos-schema
//!
//! JSON Schema registry and validation for AccountabilityOS.
//!
//! Entity types are defined in `aos-core` with `#[derive(JsonSchema)]`. This
//! crate builds their schemas once and validates arbitrary JSON against them:
//! oracle replies before they are trusted, and trail operations before they
//! are written.

mod error;
mod registry;

pub use error::SchemaError;
pub use registry::{SchemaRegistry, entity_schema_name};
