//! Line-partitioned, resumable execution of the change-detection model.
//!
//! One [`LineRunner`] is one worker process: it walks the rows a
//! [`JobPlan`] assigns to it, reads each row's pixel records through the
//! [`RowSource`] seam, segments every pixel, and commits one atomic
//! [`RowResult`](crate::core::RowResult) per row. Workers share nothing; the
//! partition invariant keeps their write targets disjoint.

pub mod plan;
pub mod store;

pub use plan::{plan_rows, JobPlan};
pub use store::ResultStore;

use crate::config::ModelConfig;
use crate::core::{PixelResult, RowResult, TimeseriesRecord};
use crate::error::Result;
use crate::pixel::PixelProcessor;

/// Row-addressable source of pixel timeseries, the raster I/O seam.
///
/// The core does not care about the on-disk raster format, only that reads
/// are row-addressable and that [`RowSource::check`] is a cheap readability
/// probe of the backing stack.
pub trait RowSource {
    /// Total number of rows in the stack.
    fn total_rows(&self) -> usize;

    /// Read every pixel record of one row, in column order.
    fn read_row(&self, row: usize) -> Result<Vec<TimeseriesRecord>>;

    /// Verify the backing images exist and are readable.
    fn check(&self) -> Result<()> {
        Ok(())
    }
}

/// Independent boolean switches of a worker invocation.
///
/// Verbosity is deliberately absent: it belongs to the logger the invoking
/// binary installs and never alters control flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Probe the source and output directory before any row is processed.
    pub check: bool,
    /// Skip rows whose well-formed result already exists.
    pub resume: bool,
}

/// Per-run accounting, one entry per assigned row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows processed and committed by this run.
    pub completed: Vec<usize>,
    /// Rows skipped because a valid result already existed.
    pub skipped: Vec<usize>,
    /// Rows whose source data was unreadable.
    pub failed: Vec<usize>,
}

/// Executes one job's row assignment against a [`RowSource`].
pub struct LineRunner<S: RowSource> {
    source: S,
    store: ResultStore,
    config: ModelConfig,
    options: RunnerOptions,
}

impl<S: RowSource> LineRunner<S> {
    /// Build a runner. The configuration is validated here, before any row
    /// is touched.
    pub fn new(
        source: S,
        store: ResultStore,
        config: ModelConfig,
        options: RunnerOptions,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            store,
            config,
            options,
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Process every assigned row in plan order.
    ///
    /// Row read failures are logged and skipped; pixel fit failures are
    /// contained as errored pixel entries. Only setup and commit failures
    /// abort the worker.
    pub fn run(&self, plan: &JobPlan) -> Result<RunSummary> {
        if self.options.check {
            self.source.check()?;
            self.store.prepare()?;
            log::info!(
                "check passed: {} rows in stack, output dir {:?}",
                self.source.total_rows(),
                self.store.dir()
            );
        }

        let processor = PixelProcessor::new(&self.config)?;
        let mut summary = RunSummary::default();

        log::info!(
            "job {}/{}: {} assigned rows",
            plan.job_number,
            plan.total_jobs,
            plan.assigned_rows.len()
        );

        for &row in &plan.assigned_rows {
            if self.options.resume && self.store.is_complete(row) {
                log::debug!("row {row}: result exists, skipping");
                summary.skipped.push(row);
                continue;
            }

            let records = match self.source.read_row(row) {
                Ok(records) => records,
                Err(err) => {
                    log::error!("row {row}: {err}");
                    summary.failed.push(row);
                    continue;
                }
            };

            let pixels = records
                .iter()
                .map(|record| match processor.process(record) {
                    Ok(segments) => PixelResult::ok(record.col(), segments),
                    Err(err) => {
                        log::warn!("row {row} col {}: {err}", record.col());
                        PixelResult::errored(record.col(), err.to_string())
                    }
                })
                .collect();

            self.store.commit(&RowResult { row, pixels })?;
            log::debug!("row {row}: committed");
            summary.completed.push(row);
        }

        log::info!(
            "job {}/{} done: {} completed, {} skipped, {} failed",
            plan.job_number,
            plan.total_jobs,
            summary.completed.len(),
            summary.skipped.len(),
            summary.failed.len()
        );

        Ok(summary)
    }
}
