//! Stimulus - Discretely Sampled Applied Current
//!
//! The driving signal for a simulation run: an ordered array of applied
//! current samples at a fixed interval. The solver evaluates the membrane
//! derivative at arbitrary real times between grid points, so sampling is a
//! zero-order hold: `sample(t)` returns the sample whose interval contains
//! `t`, clamped to the first/last sample outside the covered range.

use serde::{Deserialize, Serialize};

use crate::error::{AxonsimError, Result};

/// Applied-current waveform sampled on a fixed time grid
///
/// Read-only during integration; a run borrows it for every derivative
/// evaluation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Stimulus {
    samples: Vec<f64>,
    dt: f64,
}

impl Stimulus {
    /// Create a stimulus from current samples (µA/cm²) and a sample
    /// interval (ms)
    ///
    /// Rejects an empty sample array and a non-positive interval up front;
    /// either would otherwise surface as an opaque numerical failure deep
    /// inside the solver.
    pub fn new(samples: Vec<f64>, dt: f64) -> Result<Self> {
        if samples.is_empty() {
            return Err(AxonsimError::EmptyStimulus);
        }
        if !(dt > 0.0) {
            return Err(AxonsimError::NonPositiveStep(dt));
        }
        Ok(Self { samples, dt })
    }

    /// Constant-zero stimulus of the given length
    pub fn silent(len: usize, dt: f64) -> Result<Self> {
        Self::new(vec![0.0; len.max(1)], dt)
    }

    /// Zero stimulus with one rectangular pulse over `onset..offset`
    /// (sample indices, half-open)
    pub fn pulse(len: usize, dt: f64, onset: usize, offset: usize, amplitude: f64) -> Result<Self> {
        let mut samples = vec![0.0; len.max(1)];
        for s in samples
            .iter_mut()
            .take(offset.min(len))
            .skip(onset.min(len))
        {
            *s = amplitude;
        }
        Self::new(samples, dt)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; construction rejects empty sample arrays
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample interval (ms)
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Applied current at continuous time `t` (zero-order hold)
    ///
    /// `samples[clamp(floor(t/dt), 0, len-1)]`: times before zero clamp to
    /// the first sample, times at/after the last interval hold the final
    /// sample. The clamp is what keeps the final output grid point (one dt
    /// past the last sample) in bounds.
    pub fn sample(&self, t: f64) -> f64 {
        let idx = (t / self.dt).floor();
        let last = self.samples.len() - 1;
        if idx <= 0.0 {
            self.samples[0]
        } else if idx >= last as f64 {
            self.samples[last]
        } else {
            self.samples[idx as usize]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            Stimulus::new(vec![], 0.1),
            Err(AxonsimError::EmptyStimulus)
        ));
    }

    #[test]
    fn test_rejects_bad_step() {
        assert!(matches!(
            Stimulus::new(vec![1.0], 0.0),
            Err(AxonsimError::NonPositiveStep(_))
        ));
        assert!(Stimulus::new(vec![1.0], -0.5).is_err());
        assert!(Stimulus::new(vec![1.0], f64::NAN).is_err());
    }

    #[test]
    fn test_zero_order_hold() {
        let stim = Stimulus::new(vec![1.0, 2.0, 3.0], 0.5).unwrap();
        assert_eq!(stim.sample(0.0), 1.0);
        assert_eq!(stim.sample(0.49), 1.0);
        assert_eq!(stim.sample(0.5), 2.0);
        assert_eq!(stim.sample(0.75), 2.0);
        assert_eq!(stim.sample(1.0), 3.0);
    }

    #[test]
    fn test_clamped_tail_and_head() {
        let stim = Stimulus::new(vec![1.0, 2.0, 3.0], 0.5).unwrap();
        // t >= (N-1)*dt always yields the last sample
        assert_eq!(stim.sample(1.0), 3.0);
        assert_eq!(stim.sample(1.5), 3.0);
        assert_eq!(stim.sample(1e6), 3.0);
        // negative times clamp to the first
        assert_eq!(stim.sample(-0.1), 1.0);
    }

    #[test]
    fn test_index_monotone_in_time() {
        let stim = Stimulus::new((0..10).map(f64::from).collect(), 0.25).unwrap();
        let mut prev = f64::NEG_INFINITY;
        for i in 0..100 {
            let s = stim.sample(i as f64 * 0.033);
            assert!(s >= prev);
            prev = s;
        }
    }

    #[test]
    fn test_pulse_builder() {
        let stim = Stimulus::pulse(10, 0.1, 3, 6, 5.0).unwrap();
        assert_eq!(stim.sample(0.25), 0.0);
        assert_eq!(stim.sample(0.35), 5.0);
        assert_eq!(stim.sample(0.55), 5.0);
        assert_eq!(stim.sample(0.65), 0.0);
    }
}
