//! JSONL trail writer.
//!
//! Appends `TrailOperation` records to `{trail_dir}/{stream}.jsonl` using
//! `serde_jsonlines::append_json_lines` (one line per call).

use std::path::{Path, PathBuf};

use aos_core::enums::TrailOp;
use aos_core::trail::TrailOperation;
use aos_schema::{SchemaRegistry, entity_schema_name};

use crate::error::DatabaseError;

pub struct TrailWriter {
    trail_dir: PathBuf,
    enabled: bool,
}

impl TrailWriter {
    /// Create a writer for `trail_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created.
    pub fn new(trail_dir: PathBuf) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(&trail_dir).map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(Self {
            trail_dir,
            enabled: true,
        })
    }

    /// A writer that drops everything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            trail_dir: PathBuf::new(),
            enabled: false,
        }
    }

    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append one operation to its stream file.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file write fails.
    pub fn append(&self, op: &TrailOperation) -> Result<(), DatabaseError> {
        if !self.enabled {
            return Ok(());
        }

        let path = self.stream_path(&op.stream);
        serde_jsonlines::append_json_lines(&path, [op])
            .map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(())
    }

    /// Append, validating `Create` payloads against the entity schema first.
    ///
    /// Other ops carry partial data and are not checked. A validation failure
    /// is logged and the line is still written.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file write fails.
    pub fn append_validated(
        &self,
        op: &TrailOperation,
        schema: &SchemaRegistry,
    ) -> Result<(), DatabaseError> {
        if !self.enabled {
            return Ok(());
        }

        if op.op == TrailOp::Create
            && let Err(error) = schema.validate(entity_schema_name(op.entity), &op.data)
        {
            tracing::warn!(entity = %op.entity, id = %op.id, %error, "trail payload failed validation");
        }

        self.append(op)
    }

    /// Read back every operation in a stream, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file exists but cannot be parsed.
    pub fn read_stream(&self, stream: &str) -> Result<Vec<TrailOperation>, DatabaseError> {
        let path = self.stream_path(stream);
        if !path.exists() {
            return Ok(Vec::new());
        }
        serde_jsonlines::json_lines(&path)
            .map_err(|e| DatabaseError::Other(e.into()))?
            .collect::<Result<Vec<TrailOperation>, _>>()
            .map_err(|e| DatabaseError::Other(e.into()))
    }

    #[must_use]
    pub fn trail_dir(&self) -> &Path {
        &self.trail_dir
    }

    fn stream_path(&self, stream: &str) -> PathBuf {
        self.trail_dir.join(format!("{stream}.jsonl"))
    }
}
