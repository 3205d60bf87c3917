//! Authoritative active-bug-set resolution for the audit path.
//!
//! Exactly one [`ResolutionMode`] is chosen at the CLI boundary, in the
//! precedence order range > file > forced-live > cached-or-live. Each
//! strategy's contract stands alone; the enum dispatch replaces the
//! conditional chain the same selection is usually written as.
//!
//! Resolution never raises: an unreachable or empty live source degrades
//! to an empty set with a warning. Callers must treat an empty set as
//! "unknown", not "project has zero defects".

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use mutbench_types::{DefectId, IdRange};
use tracing::{info, warn};

use crate::tool::{BenchmarkTool, parse_id_lines};

/// Default cache directory for live-query results.
pub const DEFAULT_CACHE_DIR: &str = ".bug_cache";

/// Closed enumeration of active-set sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Materialized closed interval; no external call, no caching.
    Range(IdRange),
    /// One integer per non-blank line; unparsable lines silently skipped.
    File(PathBuf),
    /// Always query the live tool, overwriting the cache on success.
    ForcedLive,
    /// Use a non-empty cache when present, otherwise query and cache.
    CachedOrLive,
}

/// Resolve the active-bug set for `project`.
pub fn resolve(
    tool: &dyn BenchmarkTool,
    project: &str,
    mode: &ResolutionMode,
    cache_dir: &Path,
) -> BTreeSet<DefectId> {
    match mode {
        ResolutionMode::Range(range) => {
            info!(project, %range, "active set from manual range");
            range.ids().collect()
        }
        ResolutionMode::File(path) => read_id_file(project, path),
        ResolutionMode::ForcedLive => live_query(tool, project, cache_dir),
        ResolutionMode::CachedOrLive => match read_cache(project, cache_dir) {
            Some(cached) => cached,
            None => live_query(tool, project, cache_dir),
        },
    }
}

/// Cache file path: lower-cased project name, one id per line.
#[must_use]
pub fn cache_path(project: &str, cache_dir: &Path) -> PathBuf {
    cache_dir.join(format!("{}_bugs.txt", project.to_lowercase()))
}

fn read_id_file(project: &str, path: &Path) -> BTreeSet<DefectId> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let ids: BTreeSet<DefectId> = parse_id_lines(&contents).into_iter().collect();
            info!(
                project,
                count = ids.len(),
                path = %path.display(),
                "active set from file"
            );
            ids
        }
        Err(err) => {
            warn!(project, path = %path.display(), %err, "cannot read active-bugs file");
            BTreeSet::new()
        }
    }
}

fn read_cache(project: &str, cache_dir: &Path) -> Option<BTreeSet<DefectId>> {
    let path = cache_path(project, cache_dir);
    let contents = std::fs::read_to_string(&path).ok()?;
    if contents.trim().is_empty() {
        return None;
    }
    let ids: BTreeSet<DefectId> = parse_id_lines(&contents).into_iter().collect();
    info!(project, count = ids.len(), "using cached active bugs");
    Some(ids)
}

fn live_query(tool: &dyn BenchmarkTool, project: &str, cache_dir: &Path) -> BTreeSet<DefectId> {
    info!(project, "fetching active bugs from the benchmark tool");
    match tool.list_bug_ids(project) {
        Ok(ids) if ids.is_empty() => {
            // Distinct from a query error: the tool answered with nothing.
            warn!(project, "live query returned zero active bugs");
            BTreeSet::new()
        }
        Ok(ids) => {
            let ids: BTreeSet<DefectId> = ids.into_iter().collect();
            write_cache(project, cache_dir, &ids);
            ids
        }
        Err(err) => {
            warn!(project, %err, "live active-bug query failed");
            BTreeSet::new()
        }
    }
}

fn write_cache(project: &str, cache_dir: &Path, ids: &BTreeSet<DefectId>) {
    let path = cache_path(project, cache_dir);
    let mut body = String::new();
    for id in ids {
        body.push_str(&id.to_string());
        body.push('\n');
    }
    let outcome = std::fs::create_dir_all(cache_dir).and_then(|()| std::fs::write(&path, body));
    if let Err(err) = outcome {
        // Cache misses are only a performance problem; the resolved set is
        // still returned.
        warn!(project, path = %path.display(), %err, "failed to write bug cache");
    }
}
