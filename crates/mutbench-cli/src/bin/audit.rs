//! Completeness audit CLI: reconcile a results ledger against the
//! authoritative active-bug set and report which defects are complete,
//! partial, skipped, or extraneous.

use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use mutbench_core::activeset::{DEFAULT_CACHE_DIR, ResolutionMode, resolve};
use mutbench_core::ledger;
use mutbench_core::reconcile::{LedgerPartition, reconcile};
use mutbench_core::tool::Defects4jCli;
use mutbench_types::{DefectId, IdRange};
use tracing_subscriber::EnvFilter;

fn print_help() {
    let help = "\
mutbench-audit — reconcile an analysis ledger against the active-bug set

USAGE:
    mutbench-audit --input <LEDGER> [OPTIONS]

OPTIONS:
    --input, -i <PATH>             Ledger CSV with analyzed defects (required)
    --project, -p <NAME>           Project to check (default Math)
    --range, -r <MIN-MAX>          Manual active-bug range (e.g. 1-106)
    --active-bugs-file, -a <PATH>  File with one active bug id per line
    --use-defects4j, -d            Always query the benchmark tool, ignoring cache
    --cache-dir <DIR>              Active-bug cache directory (default .bug_cache)
    --output <PATH>                Also write the report as pretty JSON
    -h, --help                     Show this help

The resolution modes are mutually exclusive; with none given, a cached
active-bug list is used when present, otherwise a live query runs and its
result is cached.
";
    println!("{help}");
}

struct CliConfig {
    input: PathBuf,
    project: String,
    mode: ResolutionMode,
    cache_dir: PathBuf,
    output: Option<PathBuf>,
}

fn required_value(args: &[String], index: usize, flag: &str) -> Result<String, String> {
    args.get(index + 1)
        .cloned()
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_args(args: &[String]) -> Result<CliConfig, String> {
    let mut input: Option<PathBuf> = None;
    let mut project = "Math".to_string();
    let mut range: Option<IdRange> = None;
    let mut bugs_file: Option<PathBuf> = None;
    let mut forced_live = false;
    let mut cache_dir = PathBuf::from(DEFAULT_CACHE_DIR);
    let mut output: Option<PathBuf> = None;

    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--input" | "-i" => {
                input = Some(PathBuf::from(required_value(args, index, "--input")?));
                index += 2;
            }
            "--project" | "-p" => {
                project = required_value(args, index, "--project")?;
                index += 2;
            }
            "--range" | "-r" => {
                let value = required_value(args, index, "--range")?;
                range = Some(value.parse().map_err(|err| format!("{err}"))?);
                index += 2;
            }
            "--active-bugs-file" | "-a" => {
                bugs_file = Some(PathBuf::from(required_value(
                    args,
                    index,
                    "--active-bugs-file",
                )?));
                index += 2;
            }
            "--use-defects4j" | "-d" => {
                forced_live = true;
                index += 1;
            }
            "--cache-dir" => {
                cache_dir = PathBuf::from(required_value(args, index, "--cache-dir")?);
                index += 2;
            }
            "--output" => {
                output = Some(PathBuf::from(required_value(args, index, "--output")?));
                index += 2;
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
    }

    let input = input.ok_or_else(|| "--input is required".to_string())?;

    let mode_count =
        usize::from(range.is_some()) + usize::from(bugs_file.is_some()) + usize::from(forced_live);
    if mode_count > 1 {
        return Err(
            "--range, --active-bugs-file, and --use-defects4j are mutually exclusive".to_string(),
        );
    }

    // Precedence: range > file > forced-live > cached-or-live.
    let mode = if let Some(range) = range {
        ResolutionMode::Range(range)
    } else if let Some(path) = bugs_file {
        ResolutionMode::File(path)
    } else if forced_live {
        ResolutionMode::ForcedLive
    } else {
        ResolutionMode::CachedOrLive
    };

    Ok(CliConfig {
        input,
        project,
        mode,
        cache_dir,
        output,
    })
}

fn print_ledger_breakdown(partition: &LedgerPartition) {
    let all = partition.all_analyzed();
    let both = partition.both_variants();
    let only_buggy: BTreeSet<DefectId> =
        partition.has_buggy.difference(&partition.has_fixed).copied().collect();
    let only_fixed: BTreeSet<DefectId> =
        partition.has_fixed.difference(&partition.has_buggy).copied().collect();

    println!("Found {} unique bugs in the ledger:", all.len());
    println!(
        "  - {} bugs with both buggy and fixed versions analyzed",
        both.len()
    );
    println!(
        "  - {} bugs with only the buggy version analyzed",
        only_buggy.len()
    );
    println!(
        "  - {} bugs with only the fixed version analyzed",
        only_fixed.len()
    );
}

fn run(config: &CliConfig) -> Result<(), String> {
    let rows = ledger::read_all(&config.input).map_err(|err| err.to_string())?;
    print_ledger_breakdown(&LedgerPartition::from_rows(&rows));

    let tool = Defects4jCli::new(env::temp_dir().join("mutbench_experiment"));
    let active_set = resolve(&tool, &config.project, &config.mode, &config.cache_dir);

    if active_set.is_empty() {
        // Unknown, not "zero defects": reporting completeness against an
        // empty set would claim nothing was skipped.
        eprintln!(
            "Warning: no active bugs resolved for project {}; skipping reconciliation",
            config.project
        );
        return Ok(());
    }

    let report = reconcile(&rows, &active_set);
    println!();
    print!("{}", report.render(&config.project));

    if let Some(path) = &config.output {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|err| format!("failed to serialize report: {err}"))?;
        std::fs::write(path, json).map_err(|err| format!("failed to write report: {err}"))?;
        println!("\nReport JSON written to {}", path.display());
    }
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
