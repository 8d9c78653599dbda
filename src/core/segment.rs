//! Segment and row result records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fitted model attributes attached to a closed or monitored segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentFit {
    /// Ordinal day number of the first fitted observation; regression `x`
    /// values are days relative to this.
    pub reference_ordinal: f64,
    /// Coefficient vector per band, in design-term order.
    pub coefficients: Vec<Vec<f64>>,
    /// Residual RMSE per band.
    pub rmse: Vec<f64>,
}

/// One maximal contiguous span of a pixel's timeseries under a stable fit.
///
/// Indices address the full [`TimeseriesRecord`](crate::core::TimeseriesRecord),
/// masked observations included; `end_index` is inclusive. A segment carries no
/// `fit` when the usable observations inside it never reached `min_obs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start_index: usize,
    pub end_index: usize,
    /// True when the segment was closed by a confirmed structural break.
    /// Only the last segment of a pixel may be open.
    pub break_confirmed: bool,
    /// Date of the observation that triggered the break, when confirmed.
    pub break_date: Option<NaiveDate>,
    pub fit: Option<SegmentFit>,
}

impl Segment {
    /// Number of record indices spanned, masked observations included.
    pub fn span(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    /// An open segment is still being monitored: no disturbance detected yet.
    pub fn is_open(&self) -> bool {
        !self.break_confirmed
    }
}

/// Segmentation outcome for one pixel of a row.
///
/// A pixel whose fit failed carries the error message and an empty segment
/// list instead of aborting the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelResult {
    pub col: usize,
    pub segments: Vec<Segment>,
    pub error: Option<String>,
}

impl PixelResult {
    pub fn ok(col: usize, segments: Vec<Segment>) -> Self {
        Self {
            col,
            segments,
            error: None,
        }
    }

    pub fn errored(col: usize, message: String) -> Self {
        Self {
            col,
            segments: Vec::new(),
            error: Some(message),
        }
    }
}

/// Completion record for one raster row.
///
/// Created only when every pixel of the row has been processed; persisted
/// atomically and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowResult {
    pub row: usize,
    pub pixels: Vec<PixelResult>,
}

impl RowResult {
    /// Structural validity check used by resume mode: the stored document must
    /// name the row it claims to complete and keep pixels in column order.
    pub fn is_well_formed(&self, row: usize) -> bool {
        self.row == row && self.pixels.windows(2).all(|p| p[0].col < p[1].col)
    }
}
