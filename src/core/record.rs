//! Per-pixel observation timeseries extracted from an image stack.

use crate::error::{BreakError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One dated multi-band measurement for a single pixel.
///
/// `usable` folds together the upstream cloud/shadow mask and the valid
/// reflectance range check. Unusable observations are excluded from fitting
/// but kept in the record so segment indices address the full timeseries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Acquisition date.
    pub date: NaiveDate,
    /// Reflectance values, one per band, in stack band order.
    pub bands: Vec<f64>,
    /// Whether this observation may participate in fitting and monitoring.
    pub usable: bool,
}

impl Observation {
    /// Proleptic-Gregorian ordinal day number, the `x` of the regression.
    pub fn ordinal(&self) -> f64 {
        self.date.num_days_from_ce() as f64
    }
}

/// Ordered observation sequence for one pixel location `(row, col)`.
///
/// Immutable once constructed. The constructor enforces strictly increasing
/// dates and a uniform band count; [`TimeseriesRecord::from_samples`] sorts
/// and deduplicates raw stack reads before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeseriesRecord {
    row: usize,
    col: usize,
    observations: Vec<Observation>,
}

impl TimeseriesRecord {
    /// Build a record from pre-ordered observations.
    ///
    /// Rejects non-increasing dates and ragged band counts before any
    /// processing can happen.
    pub fn new(row: usize, col: usize, observations: Vec<Observation>) -> Result<Self> {
        for pair in observations.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(BreakError::Timestamp(format!(
                    "dates must be strictly increasing at pixel ({}, {}): {} after {}",
                    row, col, pair[1].date, pair[0].date
                )));
            }
        }

        if let Some(first) = observations.first() {
            let n_bands = first.bands.len();
            for obs in &observations {
                if obs.bands.len() != n_bands {
                    return Err(BreakError::DimensionMismatch {
                        expected: n_bands,
                        got: obs.bands.len(),
                    });
                }
            }
        }

        Ok(Self {
            row,
            col,
            observations,
        })
    }

    /// Build a record from raw stack reads.
    ///
    /// Observations are sorted by date and deduplicated (first acquisition
    /// wins). An observation is usable when the upstream mask admits it and
    /// every band is finite and inside `valid_range`.
    pub fn from_samples(
        row: usize,
        col: usize,
        dates: &[NaiveDate],
        samples: &[Vec<f64>],
        mask: Option<&[bool]>,
        valid_range: (f64, f64),
    ) -> Result<Self> {
        if dates.len() != samples.len() {
            return Err(BreakError::DimensionMismatch {
                expected: dates.len(),
                got: samples.len(),
            });
        }
        if let Some(mask) = mask {
            if mask.len() != dates.len() {
                return Err(BreakError::DimensionMismatch {
                    expected: dates.len(),
                    got: mask.len(),
                });
            }
        }

        let (lo, hi) = valid_range;
        let mut observations: Vec<Observation> = dates
            .iter()
            .zip(samples.iter())
            .enumerate()
            .map(|(i, (&date, bands))| {
                let masked_ok = mask.map(|m| m[i]).unwrap_or(true);
                let in_range = bands.iter().all(|v| v.is_finite() && *v >= lo && *v <= hi);
                Observation {
                    date,
                    bands: bands.clone(),
                    usable: masked_ok && in_range,
                }
            })
            .collect();

        observations.sort_by_key(|obs| obs.date);
        observations.dedup_by_key(|obs| obs.date);

        Self::new(row, col, observations)
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Number of observations, usable or not.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Band count, 0 for an empty record.
    pub fn n_bands(&self) -> usize {
        self.observations.first().map(|o| o.bands.len()).unwrap_or(0)
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn observation(&self, index: usize) -> Option<&Observation> {
        self.observations.get(index)
    }

    /// Record indices of usable observations, in time order.
    pub fn usable_indices(&self) -> Vec<usize> {
        self.observations
            .iter()
            .enumerate()
            .filter(|(_, obs)| obs.usable)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn n_usable(&self) -> usize {
        self.observations.iter().filter(|obs| obs.usable).count()
    }
}
