//! Service layer: database, trail, and schema registry in one handle.
//!
//! All repository methods are `impl AosService` blocks under `repos/`.

use std::path::PathBuf;

use aos_schema::SchemaRegistry;

use crate::AosDb;
use crate::error::DatabaseError;
use crate::trail::writer::TrailWriter;

/// Record store for AccountabilityOS.
///
/// Every mutation method follows the same protocol:
/// 1. Execute SQL (inside a transaction when several rows change together)
/// 2. Append an audit entry on the same connection
/// 3. Append the JSONL trail operation once the SQL has committed
pub struct AosService {
    db: AosDb,
    trail: TrailWriter,
    schema: SchemaRegistry,
}

impl AosService {
    /// Open a service over a local database.
    ///
    /// `db_path` may be `":memory:"`. `trail_dir = None` disables the trail.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the trail
    /// directory cannot be created.
    pub async fn new_local(db_path: &str, trail_dir: Option<PathBuf>) -> Result<Self, DatabaseError> {
        let db = AosDb::open_local(db_path).await?;
        let trail = match trail_dir {
            Some(dir) => TrailWriter::new(dir)?,
            None => TrailWriter::disabled(),
        };
        Ok(Self::from_db(db, trail))
    }

    #[must_use]
    pub fn from_db(db: AosDb, trail: TrailWriter) -> Self {
        Self {
            db,
            trail,
            schema: SchemaRegistry::new(),
        }
    }

    #[must_use]
    pub const fn db(&self) -> &AosDb {
        &self.db
    }

    pub const fn trail_mut(&mut self) -> &mut TrailWriter {
        &mut self.trail
    }

    #[must_use]
    pub const fn trail(&self) -> &TrailWriter {
        &self.trail
    }

    #[must_use]
    pub const fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }
}
