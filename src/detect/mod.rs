//! Structural-break detection on standardized regression residuals.
//!
//! The detector consumes one standardized residual per monitored observation
//! and signals a break when a moving-sum (MOSUM) or cumulative-sum (CUSUM)
//! statistic leaves the confidence envelope. The test kind is a configuration
//! choice; the external contract does not change between kinds.

use std::collections::VecDeque;

use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{BreakError, Result};

/// Monitoring statistic variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakTest {
    /// Cumulative sum of residuals since the last reset.
    Cusum,
    /// Moving sum over a fixed-size trailing window of residuals.
    Mosum { window: usize },
}

/// Outcome of one monitoring step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Statistic inside the envelope; absorb the observation and keep going.
    Continue,
    /// Statistic crossed the critical value; a structural break is confirmed.
    Break,
}

/// Running CUSUM/MOSUM monitor over standardized residuals.
///
/// The statistic is the absolute running sum scaled by the square root of the
/// effective sample (observations in the window for MOSUM, observations since
/// reset for CUSUM), so under a stable model it behaves like a standard normal
/// variate and one two-sided normal quantile serves both test kinds.
///
/// # Example
///
/// ```
/// use terrabreak::detect::{BreakDetector, BreakTest, Signal};
///
/// let mut detector = BreakDetector::new(BreakTest::Mosum { window: 1 }, 0.95).unwrap();
/// assert_eq!(detector.update(0.3), Signal::Continue);
/// assert_eq!(detector.update(5.0), Signal::Break);
/// ```
#[derive(Debug, Clone)]
pub struct BreakDetector {
    test: BreakTest,
    critical_value: f64,
    window: VecDeque<f64>,
    sum: f64,
    count: usize,
}

impl BreakDetector {
    /// Build a detector for the given test at a two-sided confidence level in
    /// `(0, 1)`.
    pub fn new(test: BreakTest, confidence: f64) -> Result<Self> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(BreakError::InvalidConfig(format!(
                "confidence must be in (0, 1), got {confidence}"
            )));
        }
        if let BreakTest::Mosum { window } = test {
            if window == 0 {
                return Err(BreakError::InvalidConfig(
                    "mosum window must be at least 1".to_string(),
                ));
            }
        }

        let standard_normal = Normal::new(0.0, 1.0)
            .map_err(|e| BreakError::InvalidConfig(format!("normal distribution: {e}")))?;
        let critical_value = standard_normal.inverse_cdf(0.5 + confidence / 2.0);

        Ok(Self {
            test,
            critical_value,
            window: VecDeque::new(),
            sum: 0.0,
            count: 0,
        })
    }

    /// Critical value derived from the configured confidence level.
    pub fn critical_value(&self) -> f64 {
        self.critical_value
    }

    /// Current magnitude of the scaled monitoring statistic.
    pub fn statistic(&self) -> f64 {
        match self.test {
            BreakTest::Cusum => {
                if self.count == 0 {
                    0.0
                } else {
                    self.sum.abs() / (self.count as f64).sqrt()
                }
            }
            BreakTest::Mosum { .. } => {
                if self.window.is_empty() {
                    0.0
                } else {
                    self.sum.abs() / (self.window.len() as f64).sqrt()
                }
            }
        }
    }

    /// Feed one standardized residual and report whether the envelope held.
    pub fn update(&mut self, residual: f64) -> Signal {
        match self.test {
            BreakTest::Cusum => {
                self.sum += residual;
                self.count += 1;
            }
            BreakTest::Mosum { window } => {
                self.window.push_back(residual);
                self.sum += residual;
                if self.window.len() > window {
                    if let Some(evicted) = self.window.pop_front() {
                        self.sum -= evicted;
                    }
                }
            }
        }

        if self.statistic() > self.critical_value {
            Signal::Break
        } else {
            Signal::Continue
        }
    }

    /// Clear the accumulator; called on every transition back to training.
    pub fn reset(&mut self) {
        self.window.clear();
        self.sum = 0.0;
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn critical_value_matches_normal_quantile() {
        let detector = BreakDetector::new(BreakTest::Cusum, 0.95).unwrap();
        assert_relative_eq!(detector.critical_value(), 1.96, epsilon = 0.01);

        let detector = BreakDetector::new(BreakTest::Cusum, 0.99).unwrap();
        assert_relative_eq!(detector.critical_value(), 2.576, epsilon = 0.01);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(BreakDetector::new(BreakTest::Cusum, 0.0).is_err());
        assert!(BreakDetector::new(BreakTest::Cusum, 1.0).is_err());
        assert!(BreakDetector::new(BreakTest::Mosum { window: 0 }, 0.95).is_err());
    }

    #[test]
    fn cusum_ignores_centered_noise() {
        let mut detector = BreakDetector::new(BreakTest::Cusum, 0.99).unwrap();
        for i in 0..100 {
            let residual = if i % 2 == 0 { 0.5 } else { -0.5 };
            assert_eq!(detector.update(residual), Signal::Continue);
        }
    }

    #[test]
    fn cusum_accumulates_sustained_shift() {
        let mut detector = BreakDetector::new(BreakTest::Cusum, 0.99).unwrap();
        let mut broke = false;
        for _ in 0..20 {
            if detector.update(1.5) == Signal::Break {
                broke = true;
                break;
            }
        }
        assert!(broke);
    }

    #[test]
    fn mosum_window_one_is_pointwise_threshold() {
        let mut detector = BreakDetector::new(BreakTest::Mosum { window: 1 }, 0.95).unwrap();
        assert_eq!(detector.update(1.5), Signal::Continue);
        assert_eq!(detector.update(-1.2), Signal::Continue);
        assert_eq!(detector.update(5.0), Signal::Break);
    }

    #[test]
    fn mosum_evicts_old_residuals() {
        let mut detector = BreakDetector::new(BreakTest::Mosum { window: 3 }, 0.99).unwrap();
        detector.update(2.0);
        detector.update(2.0);
        detector.update(2.0);
        // The fourth residual evicts the first; only the trailing three count.
        detector.update(0.1);
        detector.update(0.1);
        detector.update(0.1);
        assert!(detector.statistic() < 0.5);
    }

    #[test]
    fn reset_clears_state() {
        let mut detector = BreakDetector::new(BreakTest::Cusum, 0.95).unwrap();
        detector.update(1.0);
        detector.update(1.0);
        assert!(detector.statistic() > 0.0);

        detector.reset();
        assert_relative_eq!(detector.statistic(), 0.0);
    }
}
