//! One unit of work: snapshot checkout, external analyses, metric
//! extraction.

use std::path::Path;

use mutbench_error::Result;
use mutbench_types::{DefectId, LedgerRow, Variant};
use tracing::info;

use crate::tool::BenchmarkTool;
use crate::{coverage, mutation};

/// The driver's view of a unit of work, the seam test doubles substitute.
pub trait Analyze {
    fn analyze(
        &mut self,
        project: &str,
        defect_id: DefectId,
        variant: Variant,
    ) -> Result<LedgerRow>;
}

/// Real analyzer: checkout, coverage run, mutation run, extraction.
///
/// Assembles the ledger row but never persists it — durability is the
/// driver's responsibility. Any step's failure propagates unchanged; the
/// caller decides whether the unit is retried on a later run.
pub struct VariantAnalyzer<'a> {
    tool: &'a dyn BenchmarkTool,
}

impl<'a> VariantAnalyzer<'a> {
    #[must_use]
    pub fn new(tool: &'a dyn BenchmarkTool) -> Self {
        Self { tool }
    }

    fn run(&self, project: &str, defect_id: DefectId, variant: Variant) -> Result<LedgerRow> {
        let workdir = self.tool.checkout(project, defect_id, variant)?;
        let condition_coverage = self.extract_coverage(&workdir)?;
        let mutation_score = self.extract_mutation(&workdir)?;
        info!(
            project,
            defect_id,
            %variant,
            mutation_score,
            condition_coverage,
            "unit of work complete"
        );
        Ok(LedgerRow {
            defect_id,
            mutation_score,
            condition_coverage,
            variant,
        })
    }

    fn extract_coverage(&self, workdir: &Path) -> Result<f64> {
        let report = self.tool.run_coverage(workdir)?;
        coverage::condition_coverage(&report)
    }

    fn extract_mutation(&self, workdir: &Path) -> Result<f64> {
        let summary = self.tool.run_mutation(workdir)?;
        mutation::mutation_score(&summary)
    }
}

impl Analyze for VariantAnalyzer<'_> {
    fn analyze(
        &mut self,
        project: &str,
        defect_id: DefectId,
        variant: Variant,
    ) -> Result<LedgerRow> {
        self.run(project, defect_id, variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use mutbench_error::MutbenchError;
    use crate::tool::{COVERAGE_REPORT_FILE, MUTATION_SUMMARY_FILE};

    /// Fake tool that materializes canned report files in a tempdir.
    struct CannedTool {
        workdir: PathBuf,
        coverage_xml: &'static str,
        mutation_csv: &'static str,
        fail_checkout: bool,
    }

    impl BenchmarkTool for CannedTool {
        fn checkout(
            &self,
            project: &str,
            defect_id: DefectId,
            variant: Variant,
        ) -> Result<PathBuf> {
            if self.fail_checkout {
                return Err(MutbenchError::Checkout {
                    project: project.to_string(),
                    defect_id,
                    version_suffix: variant.version_suffix(),
                    stderr: "revision unavailable".to_string(),
                });
            }
            Ok(self.workdir.clone())
        }

        fn run_coverage(&self, workdir: &Path) -> Result<PathBuf> {
            let path = workdir.join(COVERAGE_REPORT_FILE);
            std::fs::write(&path, self.coverage_xml)?;
            Ok(path)
        }

        fn run_mutation(&self, workdir: &Path) -> Result<PathBuf> {
            let path = workdir.join(MUTATION_SUMMARY_FILE);
            std::fs::write(&path, self.mutation_csv)?;
            Ok(path)
        }

        fn list_bug_ids(&self, _project: &str) -> Result<Vec<DefectId>> {
            unreachable!("analyzer never lists bug ids")
        }
    }

    #[test]
    fn assembles_row_from_extracted_metrics() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tool = CannedTool {
            workdir: dir.path().to_path_buf(),
            coverage_xml:
                r#"<coverage><condition coverage="40%"/><condition coverage="80%"/></coverage>"#,
            mutation_csv: "MutantsKilled,MutantsRetained\n60,80\n",
            fail_checkout: false,
        };
        let mut analyzer = VariantAnalyzer::new(&tool);
        let row = analyzer.analyze("Math", 7, Variant::Fixed).expect("analyze");
        assert_eq!(row.defect_id, 7);
        assert_eq!(row.variant, Variant::Fixed);
        assert_eq!(row.condition_coverage, 60.0);
        assert_eq!(row.mutation_score, 75.0);
    }

    #[test]
    fn checkout_failure_propagates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tool = CannedTool {
            workdir: dir.path().to_path_buf(),
            coverage_xml: "",
            mutation_csv: "",
            fail_checkout: true,
        };
        let mut analyzer = VariantAnalyzer::new(&tool);
        let err = analyzer
            .analyze("Math", 7, Variant::Buggy)
            .expect_err("checkout fails");
        assert!(matches!(err, MutbenchError::Checkout { .. }));
    }

    #[test]
    fn empty_coverage_report_fails_the_unit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tool = CannedTool {
            workdir: dir.path().to_path_buf(),
            coverage_xml: "<coverage/>",
            mutation_csv: "MutantsKilled,MutantsRetained\n1,1\n",
            fail_checkout: false,
        };
        let mut analyzer = VariantAnalyzer::new(&tool);
        let err = analyzer
            .analyze("Math", 9, Variant::Buggy)
            .expect_err("zero conditions");
        assert!(matches!(err, MutbenchError::CoverageExtraction(_)));
    }
}
