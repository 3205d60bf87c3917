//! Pipeline driver CLI: analyze a project's defect range against the
//! benchmark and append results to the per-project ledger.
//!
//! Exit behavior: malformed arguments are rejected before any side effect
//! with a non-zero exit; once the run starts, individual unit-of-work
//! failures are logged and the process still exits zero.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use mutbench_core::analyzer::VariantAnalyzer;
use mutbench_core::driver::run_pipeline;
use mutbench_core::manifest::read_active_bugs;
use mutbench_core::tool::Defects4jCli;
use mutbench_types::IdRange;
use tracing_subscriber::EnvFilter;

fn print_help() {
    let help = "\
mutbench-analyze — resumable coverage/mutation analysis over a defect benchmark

USAGE:
    mutbench-analyze <benchmark_path> <project_name> <id_range>

ARGS:
    <benchmark_path>    Path to the benchmark repository checkout
    <project_name>      Project to analyze (e.g. Math)
    <id_range>          Closed defect-id range, 'min-max' with min > 0

Results append to ./output/<project>_analysis.csv; re-running resumes from
the ledger and skips completed (defect, variant) pairs.
";
    println!("{help}");
}

struct CliConfig {
    benchmark_path: PathBuf,
    project: String,
    range: IdRange,
}

fn parse_args(args: &[String]) -> Result<CliConfig, String> {
    if args.len() != 3 {
        return Err(format!("expected 3 arguments, got {}", args.len()));
    }
    let range: IdRange = args[2]
        .parse()
        .map_err(|err| format!("{err}"))?;
    Ok(CliConfig {
        benchmark_path: PathBuf::from(&args[0]),
        project: args[1].clone(),
        range,
    })
}

fn run(config: &CliConfig) -> Result<(), String> {
    let manifest_path = config
        .benchmark_path
        .join("framework/projects")
        .join(&config.project)
        .join("active-bugs.csv");
    let manifest = read_active_bugs(&manifest_path).map_err(|err| err.to_string())?;

    let ledger_path = Path::new("output").join(format!("{}_analysis.csv", config.project));
    let tool = Defects4jCli::new(env::temp_dir().join("mutbench_experiment"));
    let mut analyzer = VariantAnalyzer::new(&tool);

    println!("Analyzing {} defects {}", config.project, config.range);
    let summary = run_pipeline(
        &mut analyzer,
        &ledger_path,
        &config.project,
        &manifest,
        config.range,
    )
    .map_err(|err| err.to_string())?;

    println!(
        "Done: {} analyzed, {} skipped, {} failed (ledger: {})",
        summary.analyzed,
        summary.skipped,
        summary.failed,
        ledger_path.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return ExitCode::SUCCESS;
    }

    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("ERROR: {error}");
            eprintln!("Run with --help for usage.");
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("ERROR: {error}");
            ExitCode::FAILURE
        }
    }
}
