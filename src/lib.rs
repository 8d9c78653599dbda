//! # terrabreak
//!
//! Segmented structural-break detection for satellite image timeseries.
//!
//! A stack of co-registered images yields one multi-band reflectance
//! timeseries per pixel. `terrabreak` fits seasonal/trend regressions to
//! contiguous spans of each timeseries and watches a CUSUM/MOSUM statistic on
//! the regression residuals; when the statistic leaves its confidence
//! envelope a structural break (land-cover disturbance) is confirmed and a
//! new segment begins.
//!
//! Work scales across a raster by partitioning rows: job `i` of `n` owns
//! every row `r` with `r % n == i - 1`, so independent worker processes never
//! contend and a killed worker resumes idempotently from its committed
//! per-row results.
//!
//! ```
//! use terrabreak::prelude::*;
//!
//! let plan = plan_rows(5, 50, 1000).unwrap();
//! assert_eq!(plan.assigned_rows.first(), Some(&4));
//! ```

pub mod config;
pub mod core;
pub mod detect;
pub mod error;
pub mod pixel;
pub mod regression;
pub mod runner;

pub use error::{BreakError, Result};

pub mod prelude {
    pub use crate::config::ModelConfig;
    pub use crate::core::{Observation, PixelResult, RowResult, Segment, TimeseriesRecord};
    pub use crate::detect::{BreakDetector, BreakTest, Signal};
    pub use crate::error::{BreakError, Result};
    pub use crate::pixel::{PixelProcessor, SegmentModel};
    pub use crate::regression::{DesignSpec, RegressionKind};
    pub use crate::runner::{plan_rows, JobPlan, LineRunner, ResultStore, RowSource, RunnerOptions};
}
