//! Validated model configuration.
//!
//! The config-file format belongs to a collaborator; this is the opaque,
//! already-typed parameter bundle the core consumes. A malformed bundle fails
//! [`ModelConfig::validate`] before any row is processed.

use crate::detect::BreakTest;
use crate::error::{BreakError, Result};
use crate::regression::{DesignSpec, RegressionKind};

/// Parameters of the per-pixel segmentation model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Minimum usable observations required to fit a segment model.
    pub min_obs: usize,
    /// Lower bound applied to segment RMSE when standardizing residuals, so
    /// ultra-stable pixels do not inflate the monitoring statistic.
    pub min_rmse: f64,
    /// Two-sided confidence level of the break test, in `(0, 1)`.
    pub confidence: f64,
    /// Monitoring statistic variant.
    pub test: BreakTest,
    /// Seasonal/trend regression design.
    pub design: DesignSpec,
    /// Regression family fitted per segment.
    pub regression: RegressionKind,
    /// Bands monitored for change; empty means all bands.
    pub test_bands: Vec<usize>,
    /// Refit the segment model after absorbing this many observations.
    pub refit_interval: usize,
    /// Inclusive reflectance range outside which observations are masked.
    pub valid_range: (f64, f64),
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            min_obs: 12,
            min_rmse: 0.0,
            confidence: 0.99,
            test: BreakTest::Mosum { window: 5 },
            design: DesignSpec::default(),
            regression: RegressionKind::Ols,
            test_bands: Vec::new(),
            refit_interval: 8,
            valid_range: (0.0, 10000.0),
        }
    }
}

impl ModelConfig {
    pub fn min_obs(mut self, min_obs: usize) -> Self {
        self.min_obs = min_obs;
        self
    }

    pub fn min_rmse(mut self, min_rmse: f64) -> Self {
        self.min_rmse = min_rmse;
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn test(mut self, test: BreakTest) -> Self {
        self.test = test;
        self
    }

    pub fn design(mut self, design: DesignSpec) -> Self {
        self.design = design;
        self
    }

    pub fn regression(mut self, regression: RegressionKind) -> Self {
        self.regression = regression;
        self
    }

    pub fn test_bands(mut self, test_bands: Vec<usize>) -> Self {
        self.test_bands = test_bands;
        self
    }

    pub fn refit_interval(mut self, refit_interval: usize) -> Self {
        self.refit_interval = refit_interval;
        self
    }

    pub fn valid_range(mut self, lo: f64, hi: f64) -> Self {
        self.valid_range = (lo, hi);
        self
    }

    /// Check internal consistency. Band indices are validated later against
    /// each record, since the band count is a property of the stack.
    pub fn validate(&self) -> Result<()> {
        let n_terms = self.design.n_terms();
        if self.min_obs <= n_terms {
            return Err(BreakError::InvalidConfig(format!(
                "min_obs ({}) must exceed the {} design terms",
                self.min_obs, n_terms
            )));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(BreakError::InvalidConfig(format!(
                "confidence must be in (0, 1), got {}",
                self.confidence
            )));
        }
        if let BreakTest::Mosum { window } = self.test {
            if window == 0 {
                return Err(BreakError::InvalidConfig(
                    "mosum window must be at least 1".to_string(),
                ));
            }
        }
        if let RegressionKind::Ridge { lambda } = self.regression {
            if !(lambda.is_finite() && lambda >= 0.0) {
                return Err(BreakError::InvalidConfig(format!(
                    "ridge lambda must be finite and non-negative, got {lambda}"
                )));
            }
        }
        if !(self.min_rmse.is_finite() && self.min_rmse >= 0.0) {
            return Err(BreakError::InvalidConfig(format!(
                "min_rmse must be finite and non-negative, got {}",
                self.min_rmse
            )));
        }
        if self.refit_interval == 0 {
            return Err(BreakError::InvalidConfig(
                "refit_interval must be at least 1".to_string(),
            ));
        }
        let (lo, hi) = self.valid_range;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(BreakError::InvalidConfig(format!(
                "valid_range must be a finite interval, got ({lo}, {hi})"
            )));
        }
        Ok(())
    }
}
