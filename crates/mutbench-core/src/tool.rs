//! External benchmark-tool collaborators.
//!
//! [`BenchmarkTool`] is the seam between the pipeline and the outside
//! world: checkouts, coverage runs, mutation runs, and the live
//! active-bug-id query all go through it, so tests can substitute a fake.
//! [`Defects4jCli`] is the real implementation, invoking the `defects4j`
//! executable as a subprocess.
//!
//! Every invocation targets an explicit working directory threaded through
//! `Command::current_dir`; nothing mutates the process-wide cwd.

use std::path::{Path, PathBuf};
use std::process::Command;

use mutbench_error::{MutbenchError, Result};
use mutbench_types::{DefectId, Variant};
use tracing::info;

/// Filename the coverage run leaves in the working tree.
pub const COVERAGE_REPORT_FILE: &str = "coverage.xml";
/// Filename the mutation run leaves in the working tree.
pub const MUTATION_SUMMARY_FILE: &str = "summary.csv";

/// The external checkout/coverage/mutation/bug-listing contract.
///
/// Success and failure are opaque beyond exit status plus stderr text;
/// none of these calls are retried at this layer.
pub trait BenchmarkTool {
    /// Materialize a working source tree for `(project, defect_id, variant)`
    /// and return its path.
    fn checkout(&self, project: &str, defect_id: DefectId, variant: Variant) -> Result<PathBuf>;

    /// Run the coverage-report generator inside `workdir`; returns the
    /// report path.
    fn run_coverage(&self, workdir: &Path) -> Result<PathBuf>;

    /// Run the mutation-report generator inside `workdir`; returns the
    /// summary path.
    fn run_mutation(&self, workdir: &Path) -> Result<PathBuf>;

    /// Query the authoritative active-bug-id list for `project`.
    fn list_bug_ids(&self, project: &str) -> Result<Vec<DefectId>>;
}

/// Subprocess-backed implementation driving the `defects4j` CLI.
#[derive(Debug, Clone)]
pub struct Defects4jCli {
    executable: PathBuf,
    scratch_root: PathBuf,
}

impl Defects4jCli {
    /// `scratch_root` is where checkouts are materialized, one directory
    /// per project (successive checkouts of the same project reuse it).
    #[must_use]
    pub fn new(scratch_root: PathBuf) -> Self {
        Self {
            executable: PathBuf::from("defects4j"),
            scratch_root,
        }
    }

    /// Override the executable path (tests point this at a stub script).
    #[must_use]
    pub fn with_executable(mut self, executable: PathBuf) -> Self {
        self.executable = executable;
        self
    }

    fn command(&self) -> Command {
        Command::new(&self.executable)
    }
}

impl BenchmarkTool for Defects4jCli {
    fn checkout(&self, project: &str, defect_id: DefectId, variant: Variant) -> Result<PathBuf> {
        let workdir = self.scratch_root.join(project);
        std::fs::create_dir_all(&workdir)?;
        let version = format!("{defect_id}{}", variant.version_suffix());
        info!(project, %version, workdir = %workdir.display(), "running checkout");

        let output = self
            .command()
            .args(["checkout", "-p", project, "-v", version.as_str(), "-w"])
            .arg(&workdir)
            .output()?;
        if !output.status.success() {
            return Err(MutbenchError::Checkout {
                project: project.to_string(),
                defect_id,
                version_suffix: variant.version_suffix(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(workdir)
    }

    fn run_coverage(&self, workdir: &Path) -> Result<PathBuf> {
        info!(workdir = %workdir.display(), "running coverage");
        let output = self.command().arg("coverage").current_dir(workdir).output()?;
        if !output.status.success() {
            return Err(MutbenchError::CoverageExtraction(format!(
                "coverage run failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(workdir.join(COVERAGE_REPORT_FILE))
    }

    fn run_mutation(&self, workdir: &Path) -> Result<PathBuf> {
        info!(workdir = %workdir.display(), "running mutation analysis");
        let output = self.command().arg("mutation").current_dir(workdir).output()?;
        if !output.status.success() {
            return Err(MutbenchError::MutationExtraction(format!(
                "mutation run failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(workdir.join(MUTATION_SUMMARY_FILE))
    }

    fn list_bug_ids(&self, project: &str) -> Result<Vec<DefectId>> {
        info!(project, "querying active bug ids");
        let output = self.command().args(["bids", "-p", project]).output()?;
        if !output.status.success() {
            return Err(MutbenchError::Resolution(format!(
                "bids query for {project} failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(parse_id_lines(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// One integer per line; non-blank lines that do not parse are silently
/// skipped.
#[must_use]
pub fn parse_id_lines(text: &str) -> Vec<DefectId> {
    text.lines()
        .filter_map(|line| line.trim().parse::<DefectId>().ok())
        .collect()
}
