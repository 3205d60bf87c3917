//! Domain vocabulary shared across the mutbench workspace.

use std::fmt;
use std::str::FromStr;

use mutbench_error::{MutbenchError, Result};
use serde::{Deserialize, Serialize};

/// Benchmark-assigned defect identifier, positive and unique per project.
pub type DefectId = u32;

/// Which of a defect's two source snapshots a unit of work targets.
///
/// `Buggy` is the pre-fix snapshot (the benchmark's `b` version suffix,
/// ledger literal `True`); `Fixed` is post-fix (`f`, `False`). A
/// `(DefectId, Variant)` pair identifies exactly one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Buggy,
    Fixed,
}

impl Variant {
    /// Both variants in the fixed processing order the driver uses.
    pub const ALL: [Self; 2] = [Self::Buggy, Self::Fixed];

    /// Version suffix the benchmark tool expects (`12b` / `12f`).
    #[must_use]
    pub fn version_suffix(self) -> char {
        match self {
            Self::Buggy => 'b',
            Self::Fixed => 'f',
        }
    }

    #[must_use]
    pub fn is_buggy(self) -> bool {
        matches!(self, Self::Buggy)
    }

    /// Literal boolean form used in the `Bug Present` ledger column.
    #[must_use]
    pub fn ledger_literal(self) -> &'static str {
        match self {
            Self::Buggy => "True",
            Self::Fixed => "False",
        }
    }

    /// Inverse of [`ledger_literal`](Self::ledger_literal), compared
    /// case-sensitively. Anything other than `True`/`False` is rejected.
    #[must_use]
    pub fn from_ledger_literal(text: &str) -> Option<Self> {
        match text {
            "True" => Some(Self::Buggy),
            "False" => Some(Self::Fixed),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buggy => f.write_str("buggy"),
            Self::Fixed => f.write_str("fixed"),
        }
    }
}

/// The persisted outcome of one completed unit of work.
///
/// Both metrics are percentages in `[0, 100]`. A mutation score of `0.0`
/// is the defined outcome when the mutation tool retains zero mutants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub defect_id: DefectId,
    pub mutation_score: f64,
    pub condition_coverage: f64,
    pub variant: Variant,
}

/// Closed defect-id interval, inclusive on both bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRange {
    pub min: DefectId,
    pub max: DefectId,
}

impl IdRange {
    /// Validates `min > 0` and `min <= max`.
    pub fn new(min: DefectId, max: DefectId) -> Result<Self> {
        if min == 0 {
            return Err(MutbenchError::InvalidRange(
                "minimum defect id must be positive".to_string(),
            ));
        }
        if min > max {
            return Err(MutbenchError::InvalidRange(format!(
                "minimum {min} exceeds maximum {max}"
            )));
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn contains(self, id: DefectId) -> bool {
        self.min <= id && id <= self.max
    }

    /// Materialize the interval as an iterator of ids.
    pub fn ids(self) -> impl Iterator<Item = DefectId> {
        self.min..=self.max
    }
}

impl FromStr for IdRange {
    type Err = MutbenchError;

    /// Parses the CLI form `"min-max"`. Rejected before any work starts:
    /// non-numeric bounds, a zero minimum, or an inverted interval.
    fn from_str(value: &str) -> Result<Self> {
        let invalid = || {
            MutbenchError::InvalidRange(format!(
                "range must be 'min-max' with min <= max and min > 0, got '{value}'"
            ))
        };
        let (min_text, max_text) = value.split_once('-').ok_or_else(invalid)?;
        let min: DefectId = min_text.trim().parse().map_err(|_| invalid())?;
        let max: DefectId = max_text.trim().parse().map_err(|_| invalid())?;
        Self::new(min, max).map_err(|_| invalid())
    }
}

impl fmt::Display for IdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// One row of the benchmark's per-project `active-bugs.csv` manifest.
///
/// Revision hashes are carried opaquely; the pipeline only keys work off
/// the defect id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub defect_id: DefectId,
    pub revision_buggy: String,
    pub revision_fixed: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_suffix_and_literal() {
        assert_eq!(Variant::Buggy.version_suffix(), 'b');
        assert_eq!(Variant::Fixed.version_suffix(), 'f');
        assert_eq!(Variant::Buggy.ledger_literal(), "True");
        assert_eq!(Variant::Fixed.ledger_literal(), "False");
        assert!(Variant::Buggy.is_buggy());
        assert!(!Variant::Fixed.is_buggy());
    }

    #[test]
    fn ledger_literal_round_trip_is_case_sensitive() {
        assert_eq!(Variant::from_ledger_literal("True"), Some(Variant::Buggy));
        assert_eq!(Variant::from_ledger_literal("False"), Some(Variant::Fixed));
        assert_eq!(Variant::from_ledger_literal("true"), None);
        assert_eq!(Variant::from_ledger_literal("FALSE"), None);
        assert_eq!(Variant::from_ledger_literal(""), None);
    }

    #[test]
    fn range_parse_accepts_valid() {
        let range: IdRange = "5-10".parse().expect("valid range");
        assert_eq!(range, IdRange { min: 5, max: 10 });
        assert!(range.contains(5));
        assert!(range.contains(10));
        assert!(!range.contains(4));
        assert!(!range.contains(11));
    }

    #[test]
    fn range_parse_rejects_invalid() {
        for input in ["5-3", "0-10", "abc", "1", "1-", "-5", "3-abc", ""] {
            assert!(
                input.parse::<IdRange>().is_err(),
                "'{input}' should be rejected"
            );
        }
    }

    #[test]
    fn single_id_range_is_valid() {
        let range: IdRange = "7-7".parse().expect("degenerate range");
        assert_eq!(range.ids().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn range_display_round_trips() {
        let range = IdRange::new(1, 106).expect("valid");
        assert_eq!(range.to_string().parse::<IdRange>().expect("parse"), range);
    }
}
