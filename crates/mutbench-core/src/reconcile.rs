//! Completeness reconciliation between the ledger and the active-bug set.
//!
//! Pure set algebra: the four buckets `complete` / `only_buggy` /
//! `only_fixed` / `skipped` partition the active set exactly;
//! `extraneous` collects ledger ids that lie outside it. No feedback into
//! the driver — the report is diagnostic only.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use mutbench_types::{DefectId, LedgerRow};
use serde::Serialize;

/// Ledger ids split by which variant rows exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerPartition {
    pub has_buggy: BTreeSet<DefectId>,
    pub has_fixed: BTreeSet<DefectId>,
}

impl LedgerPartition {
    #[must_use]
    pub fn from_rows(rows: &[LedgerRow]) -> Self {
        let mut partition = Self::default();
        for row in rows {
            if row.variant.is_buggy() {
                partition.has_buggy.insert(row.defect_id);
            } else {
                partition.has_fixed.insert(row.defect_id);
            }
        }
        partition
    }

    /// Every defect id observed in the ledger, either variant.
    #[must_use]
    pub fn all_analyzed(&self) -> BTreeSet<DefectId> {
        self.has_buggy.union(&self.has_fixed).copied().collect()
    }

    /// Ids with both variants recorded.
    #[must_use]
    pub fn both_variants(&self) -> BTreeSet<DefectId> {
        self.has_buggy.intersection(&self.has_fixed).copied().collect()
    }
}

/// Classification of every defect relative to a ledger and an active set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    /// Both variants recorded.
    pub complete: BTreeSet<DefectId>,
    /// Fixed row missing.
    pub only_buggy: BTreeSet<DefectId>,
    /// Buggy row missing.
    pub only_fixed: BTreeSet<DefectId>,
    /// Neither variant recorded.
    pub skipped: BTreeSet<DefectId>,
    /// In the ledger but outside the active set; not part of the partition.
    pub extraneous: BTreeSet<DefectId>,
}

/// Classify every defect id. The first four report fields partition
/// `active_set` by construction.
#[must_use]
pub fn reconcile(rows: &[LedgerRow], active_set: &BTreeSet<DefectId>) -> ReconciliationReport {
    let partition = LedgerPartition::from_rows(rows);
    let analyzed = partition.all_analyzed();
    let both = partition.both_variants();

    let complete = active_set.intersection(&both).copied().collect();
    let only_buggy = active_set
        .iter()
        .filter(|id| partition.has_buggy.contains(id) && !partition.has_fixed.contains(id))
        .copied()
        .collect();
    let only_fixed = active_set
        .iter()
        .filter(|id| partition.has_fixed.contains(id) && !partition.has_buggy.contains(id))
        .copied()
        .collect();
    let skipped = active_set.difference(&analyzed).copied().collect();
    let extraneous = analyzed.difference(active_set).copied().collect();

    ReconciliationReport {
        complete,
        only_buggy,
        only_fixed,
        skipped,
        extraneous,
    }
}

impl ReconciliationReport {
    /// Size of the reconstructed active set (union of the four buckets).
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.complete.len() + self.only_buggy.len() + self.only_fixed.len() + self.skipped.len()
    }

    /// Human-readable report: bucket sizes, plus sorted memberships for the
    /// diagnostic buckets.
    #[must_use]
    pub fn render(&self, project: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Results for project: {project}");
        let _ = writeln!(out, "  Active bugs: {}", self.active_count());
        if let (Some(min), Some(max)) = (self.active_min(), self.active_max()) {
            let _ = writeln!(out, "  Active bug ID range: {min}-{max}");
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Analysis breakdown:");
        let _ = writeln!(
            out,
            "  Completely analyzed bugs (both versions): {}",
            self.complete.len()
        );
        let _ = writeln!(
            out,
            "  Partially analyzed bugs (one version): {}",
            self.only_buggy.len() + self.only_fixed.len()
        );
        if !self.only_fixed.is_empty() {
            let _ = writeln!(
                out,
                "    - Bugs missing buggy version: {:?}",
                members(&self.only_fixed)
            );
        }
        if !self.only_buggy.is_empty() {
            let _ = writeln!(
                out,
                "    - Bugs missing fixed version: {:?}",
                members(&self.only_buggy)
            );
        }
        let _ = writeln!(out, "  Completely skipped bugs: {}", self.skipped.len());
        if !self.skipped.is_empty() {
            let _ = writeln!(out, "    - Skipped bug IDs: {:?}", members(&self.skipped));
        }
        if !self.extraneous.is_empty() {
            let _ = writeln!(
                out,
                "\nNote: {} ledger bug IDs are not in the active set",
                self.extraneous.len()
            );
            let _ = writeln!(out, "  Extra bug IDs: {:?}", members(&self.extraneous));
        }
        out
    }

    fn active_min(&self) -> Option<DefectId> {
        [&self.complete, &self.only_buggy, &self.only_fixed, &self.skipped]
            .into_iter()
            .filter_map(|set| set.first())
            .min()
            .copied()
    }

    fn active_max(&self) -> Option<DefectId> {
        [&self.complete, &self.only_buggy, &self.only_fixed, &self.skipped]
            .into_iter()
            .filter_map(|set| set.last())
            .max()
            .copied()
    }
}

fn members(set: &BTreeSet<DefectId>) -> Vec<DefectId> {
    set.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use mutbench_types::Variant;
    use proptest::prelude::*;

    fn row(defect_id: DefectId, variant: Variant) -> LedgerRow {
        LedgerRow {
            defect_id,
            mutation_score: 10.0,
            condition_coverage: 20.0,
            variant,
        }
    }

    #[test]
    fn end_to_end_bucket_scenario() {
        // Active {1,2,3}; defect 1 complete, 2 buggy-only, 3 untouched,
        // 99 fixed-only outside the active set.
        let rows = vec![
            row(1, Variant::Buggy),
            row(1, Variant::Fixed),
            row(2, Variant::Buggy),
            row(99, Variant::Fixed),
        ];
        let active: BTreeSet<DefectId> = [1, 2, 3].into_iter().collect();

        let report = reconcile(&rows, &active);
        assert_eq!(report.complete, [1].into_iter().collect());
        assert_eq!(report.only_buggy, [2].into_iter().collect());
        assert!(report.only_fixed.is_empty());
        assert_eq!(report.skipped, [3].into_iter().collect());
        assert_eq!(report.extraneous, [99].into_iter().collect());
        assert_eq!(report.active_count(), 3);
    }

    #[test]
    fn empty_ledger_marks_everything_skipped() {
        let active: BTreeSet<DefectId> = [1, 2].into_iter().collect();
        let report = reconcile(&[], &active);
        assert_eq!(report.skipped, active);
        assert!(report.complete.is_empty());
        assert!(report.extraneous.is_empty());
    }

    #[test]
    fn duplicate_rows_do_not_double_count() {
        let rows = vec![
            row(4, Variant::Buggy),
            row(4, Variant::Buggy),
            row(4, Variant::Fixed),
        ];
        let active: BTreeSet<DefectId> = [4].into_iter().collect();
        let report = reconcile(&rows, &active);
        assert_eq!(report.complete, [4].into_iter().collect());
        assert_eq!(report.active_count(), 1);
    }

    #[test]
    fn render_lists_diagnostic_buckets() {
        let rows = vec![row(2, Variant::Buggy), row(9, Variant::Fixed)];
        let active: BTreeSet<DefectId> = [1, 2].into_iter().collect();
        let rendered = reconcile(&rows, &active).render("Math");
        assert!(rendered.contains("Results for project: Math"));
        assert!(rendered.contains("Active bug ID range: 1-2"));
        assert!(rendered.contains("Skipped bug IDs: [1]"));
        assert!(rendered.contains("Bugs missing fixed version: [2]"));
        assert!(rendered.contains("Extra bug IDs: [9]"));
    }

    proptest! {
        /// The four buckets partition the active set exactly, pairwise
        /// disjoint, and extraneous lies entirely outside it.
        #[test]
        fn buckets_partition_active_set(
            ledger in proptest::collection::vec((1u32..60, any::<bool>()), 0..80),
            active in proptest::collection::btree_set(1u32..60, 0..40),
        ) {
            let rows: Vec<LedgerRow> = ledger
                .into_iter()
                .map(|(id, buggy)| {
                    row(id, if buggy { Variant::Buggy } else { Variant::Fixed })
                })
                .collect();
            let report = reconcile(&rows, &active);

            let mut union = BTreeSet::new();
            for bucket in [
                &report.complete,
                &report.only_buggy,
                &report.only_fixed,
                &report.skipped,
            ] {
                for id in bucket {
                    prop_assert!(union.insert(*id), "bucket overlap at id {id}");
                }
            }
            prop_assert_eq!(union, active.clone());
            prop_assert!(report.extraneous.is_disjoint(&active));
        }
    }
}
