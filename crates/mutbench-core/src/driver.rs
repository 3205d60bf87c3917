//! Resumable main loop over a project's defect range.
//!
//! Each completed unit of work is appended to the ledger before the next
//! unit starts, so partial progress survives interruption. Unit failures
//! are logged and skipped; only ledger corruption or an append failure
//! aborts the run.

use std::path::Path;

use mutbench_error::Result;
use mutbench_types::{IdRange, ManifestEntry, Variant};
use tracing::{error, info};

use crate::analyzer::Analyze;
use crate::ledger;

/// Counts for the closing summary line. `failed` units left no row and are
/// retried by simply re-running the driver over the same range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub analyzed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Run the pipeline for every manifest defect inside `range`.
///
/// Per defect, variants are processed `Buggy` then `Fixed`, in that fixed
/// order. Already-recorded pairs are skipped without invoking the
/// analyzer, which is what makes a re-run idempotent.
pub fn run_pipeline(
    analyzer: &mut dyn Analyze,
    ledger_path: &Path,
    project: &str,
    manifest: &[ManifestEntry],
    range: IdRange,
) -> Result<PipelineSummary> {
    ledger::ensure_exists(ledger_path)?;
    let completed = ledger::completed_pairs(&ledger::read_all(ledger_path)?);

    let mut summary = PipelineSummary::default();
    for entry in manifest {
        let defect_id = entry.defect_id;
        if !range.contains(defect_id) {
            continue;
        }
        info!(project, defect_id, "analyzing defect");

        for variant in Variant::ALL {
            if completed.contains(&(defect_id, variant)) {
                info!(defect_id, %variant, "already recorded, skipping");
                summary.skipped += 1;
                continue;
            }
            match analyzer.analyze(project, defect_id, variant) {
                Ok(row) => {
                    ledger::append(ledger_path, &row)?;
                    summary.analyzed += 1;
                }
                Err(err) => {
                    // Best-effort batch: the gap stays in the ledger for a
                    // later re-run to retry.
                    error!(defect_id, %variant, %err, "unit of work failed");
                    summary.failed += 1;
                }
            }
        }
    }

    info!(
        project,
        analyzed = summary.analyzed,
        skipped = summary.skipped,
        failed = summary.failed,
        "pipeline run finished"
    );
    Ok(summary)
}
