//! JSON persistence with round-trip validation.
//!
//! Records are written with stable field ordering and an atomic
//! write-then-rename, so an interrupted run never leaves a half-written
//! file that could be mistaken for a complete record.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use partatom_schema::FamilyRecord;

use crate::error::{ExtractError, Result};

/// Serialize a record to `path`.
pub fn save(record: &FamilyRecord, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(record).map_err(|e| ExtractError::Serialization {
        path: path.to_path_buf(),
        source: e,
    })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    atomic_write(path, json.as_bytes())?;
    debug!(file = %path.display(), "wrote family record");
    Ok(())
}

/// Load a record back from `path`.
pub fn load(path: &Path) -> Result<FamilyRecord> {
    let json = fs::read_to_string(path)?;
    let record: FamilyRecord = serde_json::from_str(&json)
        .map_err(|e| ExtractError::validation(path, e.to_string()))?;

    if !record.has_identity() {
        return Err(ExtractError::validation(path, "record has empty identity fields"));
    }
    Ok(record)
}

/// Well-formedness check: load and discard.
pub fn validate(path: &Path) -> bool {
    load(path).is_ok()
}

/// In-memory round-trip check, used by dry runs so they surface the same
/// serialization and validation errors a real run would.
pub fn check(record: &FamilyRecord, origin: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(record).map_err(|e| ExtractError::Serialization {
        path: origin.to_path_buf(),
        source: e,
    })?;
    let back: FamilyRecord = serde_json::from_str(&json)
        .map_err(|e| ExtractError::validation(origin, e.to_string()))?;

    if &back != record {
        return Err(ExtractError::validation(origin, "round-trip mismatch"));
    }
    if !record.has_identity() {
        return Err(ExtractError::validation(origin, "record has empty identity fields"));
    }
    Ok(())
}

/// Atomic write via temp file + rename. The temp file lives in the
/// destination directory so the rename stays on one filesystem; it is
/// removed automatically if anything fails before the rename.
fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".partatom-")
        .suffix(".tmp")
        .tempfile_in(parent)?;
    tmp.write_all(content)?;
    tmp.persist(path).map_err(|e| ExtractError::Io(e.error))?;
    Ok(())
}
