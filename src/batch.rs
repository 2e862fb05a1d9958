//! # Batch driver
//!
//! Rows are independent systems: each one owns its state and its integrator, so rows
//! run in parallel on the rayon thread pool while every row stays strictly sequential.
//! A failing row is recorded and never aborts its siblings.

use rayon::prelude::*;

use crate::{
    integrator::Integrator,
    pipeline::{PipelineConfig, TrioOutcome, TrioPipeline},
    reduction::TrioSelection,
    stability_errors::StabilityError,
    system::SystemState,
};

/// Outcome of one row, in input order.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome<T> {
    Completed { row: usize, value: T },
    Failed { row: usize, error: StabilityError },
}

impl<T> RowOutcome<T> {
    pub fn row(&self) -> usize {
        match self {
            RowOutcome::Completed { row, .. } | RowOutcome::Failed { row, .. } => *row,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            RowOutcome::Completed { value, .. } => Some(value),
            RowOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&StabilityError> {
        match self {
            RowOutcome::Completed { .. } => None,
            RowOutcome::Failed { error, .. } => Some(error),
        }
    }
}

/// Success and failure counts of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_outcomes<T>(outcomes: &[RowOutcome<T>]) -> Self {
        outcomes
            .iter()
            .fold(Self::default(), |mut summary, outcome| {
                match outcome {
                    RowOutcome::Completed { .. } => summary.completed += 1,
                    RowOutcome::Failed { .. } => summary.failed += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.completed + self.failed
    }
}

/// Apply `f` to every row in parallel.
///
/// Return
/// ------
/// * One [`RowOutcome`] per row, in input order.
pub fn run_batch<I, T, F>(rows: Vec<I>, f: F) -> Vec<RowOutcome<T>>
where
    I: Send,
    T: Send,
    F: Fn(I) -> Result<T, StabilityError> + Sync,
{
    let outcomes: Vec<RowOutcome<T>> = rows
        .into_par_iter()
        .enumerate()
        .map(|(row, input)| match f(input) {
            Ok(value) => RowOutcome::Completed { row, value },
            Err(error) => {
                log::warn!("row {row} failed: {error}");
                RowOutcome::Failed { row, error }
            }
        })
        .collect();

    let summary = BatchSummary::from_outcomes(&outcomes);
    log::info!(
        "batch finished: {} completed, {} failed",
        summary.completed,
        summary.failed
    );
    outcomes
}

/// Run a [`TrioPipeline`] on every `(state, selection)` row.
///
/// `make_integrator` is called once per row, so that no integrator is shared between
/// threads.
pub fn run_trio_batch<N, M>(
    config: PipelineConfig,
    rows: Vec<(SystemState, TrioSelection)>,
    t_end: f64,
    make_integrator: M,
) -> Vec<RowOutcome<TrioOutcome>>
where
    N: Integrator,
    M: Fn() -> N + Sync,
{
    run_batch(rows, |(state, selection)| {
        let mut integrator = make_integrator();
        let pipeline = TrioPipeline::new(config, &integrator)?;
        pipeline.run(state, &selection, t_end, &mut integrator)
    })
}
