//! Driver: validates a problem, sizes a team, launches it and collects the
//! per-worker outcomes.
//!
//! An invocation moves through `Created → Sized → Launched → Joined →
//! Reported`. A failing worker does not stop its peers: every callback runs
//! to completion and failures are only looked at after the join.

use std::fmt;

use log::{debug, error, warn};

use crate::config::TeamOptions;
use crate::context::{ExecContext, Problem};
use crate::error::PlaError;

use super::{WorkerView, partition};

/// Conversion of a worker callback's return value into a success flag.
pub trait WorkerOutcome {
    fn into_success(self, rank: usize) -> bool;
}

impl WorkerOutcome for bool {
    fn into_success(self, rank: usize) -> bool {
        if !self {
            warn!("worker {rank} reported failure");
        }
        self
    }
}

impl<E: fmt::Display> WorkerOutcome for Result<(), E> {
    fn into_success(self, rank: usize) -> bool {
        match self {
            Ok(()) => true,
            Err(e) => {
                error!("worker {rank} failed: {e}");
                false
            }
        }
    }
}

/// Outcome of a successful invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamReport {
    /// Length of the partitioned index space
    pub size: usize,
    /// Number of workers that ran
    pub workers: usize,
}

/// A fixed-size SPMD team, sized afresh for every invocation.
#[derive(Debug, Clone, Default)]
pub struct Team {
    options: TeamOptions,
}

impl Team {
    pub fn new(options: TeamOptions) -> Self {
        Self { options }
    }

    /// Team with default options and `workers` requested workers (0 = auto).
    pub fn with_workers(workers: usize) -> Self {
        Self::new(TeamOptions::default().with_workers(workers))
    }

    pub fn options(&self) -> &TeamOptions {
        &self.options
    }

    /// Run `callback` once on every worker of a team sized for `problem`.
    ///
    /// The callback must make the same sequence of barrier and collective
    /// calls on every worker, including on failure paths.
    ///
    /// # Errors
    /// * Whatever `problem.problem_size()` reports, before any thread starts
    /// * [`PlaError::WorkerFailure`] if at least one callback failed
    /// * [`PlaError::ThreadPool`] if the team threads could not be created
    pub fn run<P, F, R>(&self, problem: &P, callback: F) -> Result<TeamReport, PlaError>
    where
        P: Problem + ?Sized,
        F: Fn(&mut WorkerView<'_, P::Scalar>, &P) -> R + Sync,
        R: WorkerOutcome,
    {
        let size = problem.problem_size().inspect_err(|e| {
            warn!("rejecting team invocation: {e}");
        })?;
        let workers =
            partition::team_size(size, self.options.workers, self.options.min_partition_size);

        let mut ctx = ExecContext::<P::Scalar>::new(size, workers, &self.options);
        debug!("launching {workers} workers over {size} entries");
        {
            let shared = &ctx;
            let body = |rank: usize| {
                let mut view = WorkerView::new(shared, rank);
                let succeeded = callback(&mut view, problem).into_success(rank);
                view.record(succeeded);
            };
            launch(workers, &body)?;
        }

        let failed = ctx.failed_workers();
        if failed.is_empty() {
            debug!("team of {workers} workers joined");
            Ok(TeamReport { size, workers })
        } else {
            warn!("{} of {workers} workers failed", failed.len());
            Err(PlaError::WorkerFailure { failed })
        }
    }
}

/// Run `callback` on a team of `workers` workers (0 = one per core) and
/// report whether every worker succeeded.
///
/// Mismatched problem dimensions return `false` without starting a thread.
pub fn run_parallel<P, F, R>(problem: &P, workers: usize, callback: F) -> bool
where
    P: Problem + ?Sized,
    F: Fn(&mut WorkerView<'_, P::Scalar>, &P) -> R + Sync,
    R: WorkerOutcome,
{
    Team::with_workers(workers).run(problem, callback).is_ok()
}

#[cfg(feature = "rayon")]
fn launch(workers: usize, body: &(dyn Fn(usize) + Sync)) -> Result<(), PlaError> {
    // A dedicated pool: every thread must run exactly one worker body, and
    // the bodies block on each other at barriers.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("parla-worker-{i}"))
        .build()
        .map_err(PlaError::ThreadPool)?;
    pool.broadcast(|ctx| body(ctx.index()));
    Ok(())
}

#[cfg(not(feature = "rayon"))]
fn launch(workers: usize, body: &(dyn Fn(usize) + Sync)) -> Result<(), PlaError> {
    std::thread::scope(|s| {
        for rank in 0..workers {
            s.spawn(move || body(rank));
        }
    });
    Ok(())
}
