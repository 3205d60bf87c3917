//! Append-only CSV ledger of completed analysis units.
//!
//! One row per `(defect_id, variant)` pair, written at the moment a unit of
//! work completes. Rows are never mutated or deleted; the driver's skip
//! check preserves the at-most-one-row invariant across restarts. The
//! read-then-append sequence is not atomic, so two concurrent drivers on
//! the same ledger can both append the same pair — accepted for
//! single-operator sequential use.

use std::collections::BTreeSet;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use mutbench_error::{MutbenchError, Result};
use mutbench_types::{DefectId, LedgerRow, Variant};
use tracing::info;

/// Fixed column header, written once at file creation.
pub const LEDGER_HEADER: &str = "Bug ID,Mutation Score,Condition Coverage,Bug Present";

/// Create a new ledger with the fixed header if none exists at `path`.
/// Idempotent: an existing file is left untouched.
pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, format!("{LEDGER_HEADER}\n"))?;
    info!(path = %path.display(), "created new ledger");
    Ok(())
}

/// Read back every persisted row in file order.
///
/// A missing file yields an empty sequence, never an error. A data row
/// with missing fields, a non-integer id, non-float metrics, or a boolean
/// literal other than exactly `True`/`False` is fatal.
pub fn read_all(path: &Path) -> Result<Vec<LedgerRow>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut rows = Vec::new();
    let mut saw_header = false;
    for (idx, line) in contents.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        if !saw_header {
            if line.trim() != LEDGER_HEADER {
                return Err(MutbenchError::MalformedLedger {
                    line: line_no,
                    reason: format!("expected header '{LEDGER_HEADER}', got '{line}'"),
                });
            }
            saw_header = true;
            continue;
        }
        rows.push(parse_row(line, line_no)?);
    }
    Ok(rows)
}

/// Append exactly one row to the end of the ledger. Existing content is
/// never rewritten or reordered.
pub fn append(path: &Path, row: &LedgerRow) -> Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    writeln!(file, "{}", format_row(row))?;
    Ok(())
}

/// Resumption lookup: the set of `(defect_id, variant)` pairs already
/// recorded.
#[must_use]
pub fn completed_pairs(rows: &[LedgerRow]) -> BTreeSet<(DefectId, Variant)> {
    rows.iter()
        .map(|row| (row.defect_id, row.variant))
        .collect()
}

fn format_row(row: &LedgerRow) -> String {
    format!(
        "{},{},{},{}",
        row.defect_id,
        row.mutation_score,
        row.condition_coverage,
        row.variant.ledger_literal()
    )
}

fn parse_row(line: &str, line_no: usize) -> Result<LedgerRow> {
    let malformed = |reason: String| MutbenchError::MalformedLedger {
        line: line_no,
        reason,
    };

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 4 {
        return Err(malformed(format!(
            "expected 4 fields, got {}",
            fields.len()
        )));
    }

    let defect_id: DefectId = fields[0]
        .parse()
        .map_err(|_| malformed(format!("bad defect id '{}'", fields[0])))?;
    let mutation_score: f64 = fields[1]
        .parse()
        .map_err(|_| malformed(format!("bad mutation score '{}'", fields[1])))?;
    let condition_coverage: f64 = fields[2]
        .parse()
        .map_err(|_| malformed(format!("bad condition coverage '{}'", fields[2])))?;
    let variant = Variant::from_ledger_literal(fields[3])
        .ok_or_else(|| malformed(format!("bad boolean literal '{}'", fields[3])))?;

    Ok(LedgerRow {
        defect_id,
        mutation_score,
        condition_coverage,
        variant,
    })
}
