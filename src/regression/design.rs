//! Seasonal/trend design matrix for per-segment regressions.

use std::f64::consts::PI;

/// Length of the seasonal cycle in days.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Specification of the regression design: intercept, optional linear trend,
/// and paired cosine/sine terms for each annual harmonic frequency.
///
/// A frequency of 1 is one full cycle per year, 2 is semi-annual, and so on.
///
/// # Example
///
/// ```
/// use terrabreak::regression::DesignSpec;
///
/// let design = DesignSpec::default();
/// // intercept + trend + cos/sin of the annual harmonic
/// assert_eq!(design.n_terms(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DesignSpec {
    trend: bool,
    harmonics: Vec<u32>,
}

impl Default for DesignSpec {
    fn default() -> Self {
        Self {
            trend: true,
            harmonics: vec![1],
        }
    }
}

impl DesignSpec {
    /// Intercept-only design.
    pub fn intercept_only() -> Self {
        Self {
            trend: false,
            harmonics: Vec::new(),
        }
    }

    /// Enable or disable the linear trend term.
    pub fn with_trend(mut self, trend: bool) -> Self {
        self.trend = trend;
        self
    }

    /// Set the annual harmonic frequencies.
    pub fn with_harmonics(mut self, harmonics: Vec<u32>) -> Self {
        self.harmonics = harmonics;
        self
    }

    pub fn has_trend(&self) -> bool {
        self.trend
    }

    pub fn harmonics(&self) -> &[u32] {
        &self.harmonics
    }

    /// Number of design-matrix columns.
    pub fn n_terms(&self) -> usize {
        1 + usize::from(self.trend) + 2 * self.harmonics.len()
    }

    /// One design-matrix row for day offset `t` (days since the segment's
    /// reference date).
    pub fn row(&self, t: f64) -> Vec<f64> {
        let mut terms = Vec::with_capacity(self.n_terms());
        terms.push(1.0);
        if self.trend {
            terms.push(t);
        }
        for &freq in &self.harmonics {
            let omega = 2.0 * PI * f64::from(freq) * t / DAYS_PER_YEAR;
            terms.push(omega.cos());
            terms.push(omega.sin());
        }
        terms
    }
}
