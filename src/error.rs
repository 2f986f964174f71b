//! Error types for axonsim

use thiserror::Error;

/// Axonsim error type
#[derive(Debug, Error)]
pub enum AxonsimError {
    /// A biophysical parameter that must be strictly positive is not
    #[error("parameter {name} must be strictly positive, got {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },

    /// Stimulus sample array is empty
    #[error("stimulus must contain at least one sample")]
    EmptyStimulus,

    /// Stimulus step size is zero or negative
    #[error("step size must be strictly positive, got {0}")]
    NonPositiveStep(f64),

    /// The ODE solver failed to advance the state
    #[error("solver failure at t={t}: {reason}")]
    SolverFailure { t: f64, reason: String },
}

pub type Result<T> = std::result::Result<T, AxonsimError>;
