//! Regression capability: design matrices and pluggable fit/predict.
//!
//! The regression family is a configuration choice. Every variant exposes the
//! same `fit(X, y) -> coefficients` contract consumed by the segment model.

pub mod design;
pub mod lstsq;

pub use design::{DesignSpec, DAYS_PER_YEAR};
pub use lstsq::{fit, predict};

/// Regression family fitted to each segment, selected by configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RegressionKind {
    /// Ordinary least squares.
    #[default]
    Ols,
    /// Ridge-regularized least squares; `lambda` penalizes non-intercept terms.
    Ridge { lambda: f64 },
}
