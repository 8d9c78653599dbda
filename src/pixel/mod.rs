//! Per-pixel segmented change detection.
//!
//! [`PixelProcessor`] drives the training/monitoring state machine across one
//! pixel's timeseries: fit a [`SegmentModel`] on `min_obs` usable
//! observations, monitor subsequent observations through the
//! [`BreakDetector`](crate::detect::BreakDetector), close the segment on a
//! confirmed break, and start the next candidate segment at the breaking
//! observation.

use crate::config::ModelConfig;
use crate::core::{Observation, Segment, SegmentFit, TimeseriesRecord};
use crate::detect::{BreakDetector, Signal};
use crate::error::{BreakError, Result};
use crate::regression::{lstsq, DesignSpec};

/// Coefficients and residual scale for one band of a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct BandFit {
    pub coefficients: Vec<f64>,
    pub rmse: f64,
}

/// Seasonal/trend regression fitted to one segment's usable observations.
///
/// Regression `x` values are days since the first fitted observation, which
/// keeps the normal equations well conditioned for ordinal dates.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentModel {
    reference_ordinal: f64,
    design: DesignSpec,
    bands: Vec<BandFit>,
}

impl SegmentModel {
    /// Fit every band of the record over the given usable record indices.
    pub fn fit(record: &TimeseriesRecord, indices: &[usize], config: &ModelConfig) -> Result<Self> {
        let first = indices
            .first()
            .and_then(|&i| record.observation(i))
            .ok_or(BreakError::InsufficientObservations {
                needed: config.min_obs,
                got: 0,
            })?;
        let reference_ordinal = first.ordinal();

        let x_rows: Vec<Vec<f64>> = indices
            .iter()
            .filter_map(|&i| record.observation(i))
            .map(|obs| config.design.row(obs.ordinal() - reference_ordinal))
            .collect();
        if x_rows.len() != indices.len() {
            return Err(BreakError::DimensionMismatch {
                expected: indices.len(),
                got: x_rows.len(),
            });
        }

        let n = x_rows.len();
        let p = config.design.n_terms();
        let mut bands = Vec::with_capacity(record.n_bands());
        for band in 0..record.n_bands() {
            let y: Vec<f64> = indices
                .iter()
                .map(|&i| record.observations()[i].bands[band])
                .collect();
            let coefficients = lstsq::fit(&config.regression, &x_rows, &y)?;

            let sse: f64 = x_rows
                .iter()
                .zip(y.iter())
                .map(|(row, &y_obs)| {
                    let r = y_obs - lstsq::predict(&coefficients, row);
                    r * r
                })
                .sum();
            let df = n.saturating_sub(p).max(1);
            let rmse = (sse / df as f64).sqrt();

            bands.push(BandFit { coefficients, rmse });
        }

        Ok(Self {
            reference_ordinal,
            design: config.design.clone(),
            bands,
        })
    }

    pub fn n_bands(&self) -> usize {
        self.bands.len()
    }

    pub fn band(&self, band: usize) -> Option<&BandFit> {
        self.bands.get(band)
    }

    /// Predicted reflectance for one band at an ordinal day number.
    pub fn predict(&self, band: usize, ordinal: f64) -> f64 {
        let row = self.design.row(ordinal - self.reference_ordinal);
        lstsq::predict(&self.bands[band].coefficients, &row)
    }

    /// Signed monitoring score for one observation: residuals standardized by
    /// each test band's RMSE (floored by `min_rmse`), averaged across bands.
    pub fn score(&self, obs: &Observation, test_bands: &[usize], min_rmse: f64) -> f64 {
        let ordinal = obs.ordinal();
        let sum: f64 = test_bands
            .iter()
            .map(|&band| {
                let residual = obs.bands[band] - self.predict(band, ordinal);
                residual / self.bands[band].rmse.max(min_rmse)
            })
            .sum();
        sum / test_bands.len() as f64
    }

    /// Serializable per-segment attributes.
    pub fn to_fit(&self) -> SegmentFit {
        SegmentFit {
            reference_ordinal: self.reference_ordinal,
            coefficients: self.bands.iter().map(|b| b.coefficients.clone()).collect(),
            rmse: self.bands.iter().map(|b| b.rmse).collect(),
        }
    }
}

/// Drives the segmentation state machine for one pixel at a time.
pub struct PixelProcessor<'a> {
    config: &'a ModelConfig,
}

impl<'a> PixelProcessor<'a> {
    /// Validates the configuration once; reuse the processor across pixels.
    pub fn new(config: &'a ModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Segment one pixel's timeseries.
    ///
    /// Returns zero segments when the record never reaches `min_obs` usable
    /// observations. Fit failures propagate; the runner contains them at
    /// pixel granularity.
    pub fn process(&self, record: &TimeseriesRecord) -> Result<Vec<Segment>> {
        let test_bands = self.resolve_test_bands(record)?;
        let usable = record.usable_indices();

        // INIT: the record must support at least one stable fit.
        if usable.len() < self.config.min_obs {
            return Ok(Vec::new());
        }

        let mut segments = Vec::new();
        let mut detector = BreakDetector::new(self.config.test, self.config.confidence)?;
        let mut seg_start = usable[0];
        let mut pos = 0;

        loop {
            // TRAINING: not enough usable observations left for a refit means
            // the trailing span stays an open, unfitted segment.
            if usable.len() - pos < self.config.min_obs {
                segments.push(Segment {
                    start_index: seg_start,
                    end_index: record.len() - 1,
                    break_confirmed: false,
                    break_date: None,
                    fit: None,
                });
                return Ok(segments);
            }

            let mut window: Vec<usize> = usable[pos..pos + self.config.min_obs].to_vec();
            pos += self.config.min_obs;
            let mut model = SegmentModel::fit(record, &window, self.config)?;
            detector.reset();
            let mut pending = 0;

            // MONITORING
            let mut break_index = None;
            while pos < usable.len() {
                let idx = usable[pos];
                let obs = &record.observations()[idx];
                let score = model.score(obs, &test_bands, self.config.min_rmse);

                match detector.update(score) {
                    Signal::Break => {
                        break_index = Some(idx);
                        break;
                    }
                    Signal::Continue => {
                        window.push(idx);
                        pos += 1;
                        pending += 1;
                        if pending >= self.config.refit_interval {
                            model = SegmentModel::fit(record, &window, self.config)?;
                            pending = 0;
                        }
                    }
                }
            }

            match break_index {
                Some(idx) => {
                    segments.push(Segment {
                        start_index: seg_start,
                        end_index: idx - 1,
                        break_confirmed: true,
                        break_date: Some(record.observations()[idx].date),
                        fit: Some(model.to_fit()),
                    });
                    // The breaking observation opens the next candidate segment.
                    seg_start = idx;
                }
                None => {
                    segments.push(Segment {
                        start_index: seg_start,
                        end_index: record.len() - 1,
                        break_confirmed: false,
                        break_date: None,
                        fit: Some(model.to_fit()),
                    });
                    return Ok(segments);
                }
            }
        }
    }

    fn resolve_test_bands(&self, record: &TimeseriesRecord) -> Result<Vec<usize>> {
        let n_bands = record.n_bands();
        if self.config.test_bands.is_empty() {
            return Ok((0..n_bands).collect());
        }
        for &band in &self.config.test_bands {
            if band >= n_bands {
                return Err(BreakError::DimensionMismatch {
                    expected: n_bands,
                    got: band,
                });
            }
        }
        Ok(self.config.test_bands.clone())
    }
}
