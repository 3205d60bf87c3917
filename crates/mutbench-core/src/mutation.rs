//! Mutation-score extraction from the mutation tool's summary file.
//!
//! The summary is a single-data-row CSV with integer `MutantsKilled` and
//! `MutantsRetained` columns. The score is `killed / retained * 100`, with
//! the deliberate policy that `retained == 0` yields exactly `0.0`: "no
//! mutants survived analysis" is a degenerate-but-valid outcome, distinct
//! from a tooling failure.

use std::path::Path;

use mutbench_error::{MutbenchError, Result};
use tracing::debug;

const KILLED_COLUMN: &str = "MutantsKilled";
const RETAINED_COLUMN: &str = "MutantsRetained";

/// Mutation score in `[0, 100]` from the summary at `summary_path`.
pub fn mutation_score(summary_path: &Path) -> Result<f64> {
    let contents = std::fs::read_to_string(summary_path).map_err(|err| {
        MutbenchError::MutationExtraction(format!(
            "cannot read mutation summary {}: {err}",
            summary_path.display()
        ))
    })?;

    let mut lines = contents.lines().filter(|line| !line.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| MutbenchError::MutationExtraction("empty mutation summary".to_string()))?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let killed_idx = column_index(&columns, KILLED_COLUMN)?;
    let retained_idx = column_index(&columns, RETAINED_COLUMN)?;

    let data = lines.next().ok_or_else(|| {
        MutbenchError::MutationExtraction("mutation summary has no data row".to_string())
    })?;
    let fields: Vec<&str> = data.split(',').map(str::trim).collect();

    let killed = integer_field(&fields, killed_idx, KILLED_COLUMN)?;
    let retained = integer_field(&fields, retained_idx, RETAINED_COLUMN)?;

    let score = if retained == 0 {
        0.0
    } else {
        killed as f64 / retained as f64 * 100.0
    };
    debug!(
        summary = %summary_path.display(),
        killed,
        retained,
        score,
        "extracted mutation score"
    );
    Ok(score)
}

fn column_index(columns: &[&str], name: &str) -> Result<usize> {
    columns.iter().position(|column| *column == name).ok_or_else(|| {
        MutbenchError::MutationExtraction(format!("summary header lacks a '{name}' column"))
    })
}

fn integer_field(fields: &[&str], index: usize, name: &str) -> Result<u64> {
    let raw = fields.get(index).ok_or_else(|| {
        MutbenchError::MutationExtraction(format!("summary data row lacks the '{name}' field"))
    })?;
    raw.parse::<u64>().map_err(|_| {
        MutbenchError::MutationExtraction(format!("'{name}' value '{raw}' is not an integer"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_summary(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "{body}").expect("write summary");
        file
    }

    #[test]
    fn score_is_killed_over_retained() {
        let summary = write_summary(
            "MutantsGenerated,MutantsCovered,MutantsKilled,MutantsLive,MutantsRetained\n\
             200,150,30,90,120\n",
        );
        let score = mutation_score(summary.path()).expect("extract");
        assert_eq!(score, 25.0);
    }

    #[test]
    fn zero_retained_is_exactly_zero() {
        let summary = write_summary("MutantsKilled,MutantsRetained\n0,0\n");
        let score = mutation_score(summary.path()).expect("extract");
        assert_eq!(score, 0.0);
        assert!(!score.is_nan());
    }

    #[test]
    fn missing_column_is_an_error() {
        let summary = write_summary("MutantsKilled,MutantsLive\n3,4\n");
        let err = mutation_score(summary.path()).expect_err("missing retained column");
        assert!(matches!(err, MutbenchError::MutationExtraction(_)));
    }

    #[test]
    fn non_integer_count_is_an_error() {
        let summary = write_summary("MutantsKilled,MutantsRetained\nthree,4\n");
        let err = mutation_score(summary.path()).expect_err("non-integer count");
        assert!(matches!(err, MutbenchError::MutationExtraction(_)));
    }

    #[test]
    fn missing_data_row_is_an_error() {
        let summary = write_summary("MutantsKilled,MutantsRetained\n");
        let err = mutation_score(summary.path()).expect_err("header only");
        assert!(matches!(err, MutbenchError::MutationExtraction(_)));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = mutation_score(Path::new("/nonexistent/summary.csv")).expect_err("missing file");
        assert!(matches!(err, MutbenchError::MutationExtraction(_)));
    }
}
