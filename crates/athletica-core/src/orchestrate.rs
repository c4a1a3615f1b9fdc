//! # Orchestrator
//!
//! Runs a pre-declared list of per-table generation jobs, sequentially or on
//! a bounded worker pool. The declared order encodes foreign-key dependency
//! order; parallel runs give up that ordering for throughput and are only
//! safe when every job's candidate sets were fixed up front.
//!
//! Concurrency and failure handling are independent knobs: `ExecutionMode`
//! picks the scheduler, `FailurePolicy` picks what a job failure does to the
//! rest of the run.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::error::{Result, SeedError};
use crate::generate::engine::{self, GenerationParams};
use crate::output::{fk, sql};
use crate::table::TableDef;

/// One unit of work: generate a table and export its files.
///
/// The per-job `prefix` leads the dump file name, so numbering jobs in
/// dependency order makes the loader's lexicographic file order the correct
/// insertion order.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub name: String,
    pub prefix: String,
    pub table: TableDef,
}

impl GenerationJob {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>, table: TableDef) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            table,
        }
    }
}

/// How jobs are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Strictly in declared (dependency) order.
    Sequential,
    /// Bounded worker pool of `min(jobs, available_parallelism)`.
    Parallel,
}

/// What one job's failure does to its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run at the first failure.
    FailFast,
    /// Log the failure and keep running the remaining jobs.
    BestEffort,
}

/// Outcome of an orchestrator run. Files written by completed jobs are kept
/// on disk even when sibling jobs failed.
#[derive(Debug, Default)]
pub struct RunReport {
    pub completed: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl RunReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run the job list. Fatal setup errors (unwritable output directory) are
/// returned as `Err`; per-job outcomes are collected in the report.
pub async fn run_jobs(
    jobs: Vec<GenerationJob>,
    params: GenerationParams,
    out_dir: &Path,
    mode: ExecutionMode,
    policy: FailurePolicy,
    progress_callback: Option<&(dyn Fn(&str, usize, usize) + Send + Sync)>,
) -> Result<RunReport> {
    std::fs::create_dir_all(out_dir).map_err(|e| SeedError::Output {
        message: format!("creating output directory {}", out_dir.display()),
        source: e,
    })?;

    match mode {
        ExecutionMode::Sequential => {
            run_sequential(jobs, params, out_dir, policy, progress_callback)
        }
        ExecutionMode::Parallel => {
            run_parallel(jobs, params, out_dir, policy, progress_callback).await
        }
    }
}

/// Execute one job: generate records, export the dump and the FK side file.
/// Each call owns its rng (re-seeded inside `generate`), so jobs never share
/// mutable state.
fn run_job(job: &GenerationJob, params: &GenerationParams, out_dir: &Path) -> Result<()> {
    let records = engine::generate(&job.table, params)?;
    sql::export_file(&job.table, &records, &job.prefix, out_dir)?;
    fk::export_foreign_keys_file(&job.table, &records, &job.prefix, out_dir)?;
    Ok(())
}

fn run_sequential(
    jobs: Vec<GenerationJob>,
    params: GenerationParams,
    out_dir: &Path,
    policy: FailurePolicy,
    progress_callback: Option<&(dyn Fn(&str, usize, usize) + Send + Sync)>,
) -> Result<RunReport> {
    let total = jobs.len();
    let mut report = RunReport::default();

    for (idx, job) in jobs.into_iter().enumerate() {
        match run_job(&job, &params, out_dir) {
            Ok(()) => {
                info!("job {} completed", job.name);
                report.completed.push(job.name.clone());
            }
            Err(e) => {
                warn!("job {} failed: {}", job.name, e);
                report.failed.push((job.name.clone(), e.to_string()));
                if policy == FailurePolicy::FailFast {
                    return Err(e);
                }
            }
        }
        if let Some(cb) = progress_callback {
            cb(&job.name, idx + 1, total);
        }
    }

    Ok(report)
}

async fn run_parallel(
    jobs: Vec<GenerationJob>,
    params: GenerationParams,
    out_dir: &Path,
    policy: FailurePolicy,
    progress_callback: Option<&(dyn Fn(&str, usize, usize) + Send + Sync)>,
) -> Result<RunReport> {
    let total = jobs.len();
    let parallelism = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let pool_size = total.min(parallelism).max(1);
    info!("running {} jobs on a pool of {}", total, pool_size);

    let semaphore = Arc::new(Semaphore::new(pool_size));
    let abort = Arc::new(AtomicBool::new(false));
    let out_dir: PathBuf = out_dir.to_path_buf();

    let mut set: JoinSet<(String, Result<()>)> = JoinSet::new();
    let mut report = RunReport::default();
    let mut done = 0usize;

    for job in jobs {
        // FailFast stops admitting jobs once anything has failed; jobs that
        // are already running are joined normally.
        if policy == FailurePolicy::FailFast && abort.load(Ordering::SeqCst) {
            report
                .failed
                .push((job.name.clone(), "skipped: an earlier job failed".to_string()));
            continue;
        }

        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("job semaphore closed");
        let job_params = params;
        let job_dir = out_dir.clone();
        set.spawn_blocking(move || {
            let result = run_job(&job, &job_params, &job_dir);
            drop(permit);
            (job.name, result)
        });

        // Drain any finished jobs without blocking admission.
        while let Some(joined) = set.try_join_next() {
            done += 1;
            record_outcome(joined, &mut report, &abort, progress_callback, done, total);
        }
    }

    while let Some(joined) = set.join_next().await {
        done += 1;
        record_outcome(joined, &mut report, &abort, progress_callback, done, total);
    }

    Ok(report)
}

fn record_outcome(
    joined: std::result::Result<(String, Result<()>), tokio::task::JoinError>,
    report: &mut RunReport,
    abort: &AtomicBool,
    progress_callback: Option<&(dyn Fn(&str, usize, usize) + Send + Sync)>,
    done: usize,
    total: usize,
) {
    let (name, outcome) = match joined {
        Ok(pair) => pair,
        Err(join_err) => {
            warn!("generation job panicked: {}", join_err);
            abort.store(true, Ordering::SeqCst);
            report
                .failed
                .push(("<unknown>".to_string(), join_err.to_string()));
            return;
        }
    };
    match outcome {
        Ok(()) => {
            info!("job {} completed", name);
            if let Some(cb) = progress_callback {
                cb(&name, done, total);
            }
            report.completed.push(name);
        }
        Err(e) => {
            warn!("job {} failed: {}", name, e);
            abort.store(true, Ordering::SeqCst);
            if let Some(cb) = progress_callback {
                cb(&name, done, total);
            }
            report.failed.push((name, e.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::value::Value;
    use crate::table::ProviderSpec;
    use indexmap::IndexMap;

    fn table(name: &str) -> TableDef {
        TableDef::new(
            "olympus",
            name,
            vec!["name".to_string()],
            vec![ProviderSpec::named("word")],
            IndexMap::new(),
        )
        .unwrap()
    }

    fn broken_table(name: &str) -> TableDef {
        // Declared FK column with an empty candidate list fails at
        // generation time, after construction.
        let mut fks = IndexMap::new();
        fks.insert("parent_id".to_string(), Vec::<Value>::new());
        TableDef::new(
            "olympus",
            name,
            vec!["parent_id".to_string()],
            vec![ProviderSpec::named("parent_id")],
            fks,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn sequential_fail_fast_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = vec![
            GenerationJob::new("clubs", "01", table("clubs")),
            GenerationJob::new("broken", "02", broken_table("broken")),
            GenerationJob::new("events", "03", table("events")),
        ];
        let err = run_jobs(
            jobs,
            GenerationParams::new(3),
            dir.path(),
            ExecutionMode::Sequential,
            FailurePolicy::FailFast,
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SeedError::Config { .. }));

        // The first job's file survives; the third was never started.
        assert!(dir.path().join("01-OLYMPUS-CLUBS.sql").exists());
        assert!(!dir.path().join("03-OLYMPUS-EVENTS.sql").exists());
    }

    #[tokio::test]
    async fn sequential_best_effort_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = vec![
            GenerationJob::new("broken", "01", broken_table("broken")),
            GenerationJob::new("events", "02", table("events")),
        ];
        let report = run_jobs(
            jobs,
            GenerationParams::new(3),
            dir.path(),
            ExecutionMode::Sequential,
            FailurePolicy::BestEffort,
            None,
        )
        .await
        .unwrap();
        assert!(!report.all_succeeded());
        assert_eq!(report.completed, vec!["events"]);
        assert_eq!(report.failed.len(), 1);
        assert!(dir.path().join("02-OLYMPUS-EVENTS.sql").exists());
    }

    #[tokio::test]
    async fn parallel_best_effort_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = vec![
            GenerationJob::new("clubs", "01", table("clubs")),
            GenerationJob::new("broken", "02", broken_table("broken")),
            GenerationJob::new("events", "03", table("events")),
        ];
        let report = run_jobs(
            jobs,
            GenerationParams::new(5),
            dir.path(),
            ExecutionMode::Parallel,
            FailurePolicy::BestEffort,
            None,
        )
        .await
        .unwrap();
        assert!(!report.all_succeeded());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.completed.len(), 2);
        assert!(dir.path().join("01-OLYMPUS-CLUBS.sql").exists());
        assert!(dir.path().join("03-OLYMPUS-EVENTS.sql").exists());
    }

    #[tokio::test]
    async fn parallel_jobs_match_sequential_output() {
        let seq_dir = tempfile::tempdir().unwrap();
        let par_dir = tempfile::tempdir().unwrap();
        let jobs = || {
            vec![
                GenerationJob::new("clubs", "01", table("clubs")),
                GenerationJob::new("events", "02", table("events")),
            ]
        };
        let params = GenerationParams::new(20).with_seed(9);

        run_jobs(
            jobs(),
            params,
            seq_dir.path(),
            ExecutionMode::Sequential,
            FailurePolicy::FailFast,
            None,
        )
        .await
        .unwrap();
        run_jobs(
            jobs(),
            params,
            par_dir.path(),
            ExecutionMode::Parallel,
            FailurePolicy::BestEffort,
            None,
        )
        .await
        .unwrap();

        for file in ["01-OLYMPUS-CLUBS.sql", "02-OLYMPUS-EVENTS.sql"] {
            let a = std::fs::read_to_string(seq_dir.path().join(file)).unwrap();
            let b = std::fs::read_to_string(par_dir.path().join(file)).unwrap();
            assert_eq!(a, b, "{} differs between modes", file);
        }
    }
}
