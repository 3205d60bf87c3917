//! Reader for the benchmark's per-project bug manifest.
//!
//! `active-bugs.csv` is benchmark-provided and read-only: one row per
//! defect with at least a `bug.id` column, plus the buggy/fixed revision
//! hashes. This is the authoritative ordered defect list the driver
//! iterates — distinct from the active-set resolver used for auditing.

use std::path::Path;

use mutbench_error::{MutbenchError, Result};
use mutbench_types::{DefectId, ManifestEntry};

const ID_COLUMN: &str = "bug.id";
const REVISION_BUGGY_COLUMN: &str = "revision.id.buggy";
const REVISION_FIXED_COLUMN: &str = "revision.id.fixed";

/// Parse the manifest at `path` into its ordered defect entries.
///
/// A missing file, a header without `bug.id`, or an unparsable id is fatal:
/// without a trustworthy manifest there is no defect list to drive.
pub fn read_active_bugs(path: &Path) -> Result<Vec<ManifestEntry>> {
    let contents = std::fs::read_to_string(path).map_err(|err| {
        MutbenchError::Manifest(format!("cannot read manifest {}: {err}", path.display()))
    })?;

    let mut lines = contents.lines().enumerate();
    let (_, header) = lines
        .next()
        .ok_or_else(|| MutbenchError::Manifest(format!("manifest {} is empty", path.display())))?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let id_idx = columns
        .iter()
        .position(|column| *column == ID_COLUMN)
        .ok_or_else(|| {
            MutbenchError::Manifest(format!("manifest header lacks a '{ID_COLUMN}' column"))
        })?;
    let buggy_idx = columns.iter().position(|c| *c == REVISION_BUGGY_COLUMN);
    let fixed_idx = columns.iter().position(|c| *c == REVISION_FIXED_COLUMN);

    let mut entries = Vec::new();
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let raw_id = fields.get(id_idx).copied().unwrap_or_default();
        let defect_id: DefectId = raw_id.parse().map_err(|_| {
            MutbenchError::Manifest(format!(
                "manifest line {}: bad defect id '{raw_id}'",
                idx + 1
            ))
        })?;
        entries.push(ManifestEntry {
            defect_id,
            revision_buggy: field_or_empty(&fields, buggy_idx),
            revision_fixed: field_or_empty(&fields, fixed_idx),
        });
    }
    Ok(entries)
}

fn field_or_empty(fields: &[&str], index: Option<usize>) -> String {
    index
        .and_then(|idx| fields.get(idx))
        .map_or_else(String::new, |value| (*value).to_string())
}
