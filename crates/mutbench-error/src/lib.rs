//! Unified error taxonomy for the mutbench workspace.
//!
//! Every fallible operation across the pipeline and the audit path returns
//! [`Result`]. The taxonomy distinguishes unit-of-work failures (checkout,
//! coverage, mutation), which the driver logs and survives, from input and
//! ledger corruption, which abort the run.

use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = std::result::Result<T, MutbenchError>;

#[derive(Debug, Error)]
pub enum MutbenchError {
    /// The checkout collaborator reported a non-zero outcome. The stderr
    /// text is carried verbatim; retrying is the caller's decision.
    #[error("checkout of {project} {defect_id}{version_suffix} failed: {stderr}")]
    Checkout {
        project: String,
        defect_id: u32,
        version_suffix: char,
        stderr: String,
    },

    /// Coverage report absent, malformed, or containing zero condition
    /// entries. A mean over an empty set is an error, never 0 or NaN.
    #[error("condition coverage extraction failed: {0}")]
    CoverageExtraction(String),

    /// Mutation summary absent, malformed, or carrying non-integer counts.
    #[error("mutation score extraction failed: {0}")]
    MutationExtraction(String),

    /// A ledger data row could not be read back. Fatal to both the driver
    /// and the reporter: resumption correctness depends on a trustworthy
    /// ledger.
    #[error("malformed ledger at line {line}: {reason}")]
    MalformedLedger { line: usize, reason: String },

    /// Defect-id range failed validation at the CLI boundary.
    #[error("invalid id range: {0}")]
    InvalidRange(String),

    /// The benchmark's per-project bug manifest is missing or unreadable.
    #[error("bug manifest error: {0}")]
    Manifest(String),

    /// Live active-bug query unreachable or rejected. The resolver degrades
    /// this to an empty set with a warning instead of propagating it.
    #[error("active-bug resolution failed: {0}")]
    Resolution(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_message_carries_stderr_verbatim() {
        let err = MutbenchError::Checkout {
            project: "Math".to_string(),
            defect_id: 12,
            version_suffix: 'b',
            stderr: "Cannot checkout revision deadbeef".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("Math 12b"));
        assert!(rendered.contains("Cannot checkout revision deadbeef"));
    }

    #[test]
    fn io_errors_convert() {
        fn read_missing() -> Result<String> {
            Ok(std::fs::read_to_string("/nonexistent/mutbench")?)
        }
        assert!(matches!(read_missing(), Err(MutbenchError::Io(_))));
    }
}
