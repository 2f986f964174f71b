//! Adaptive ODE Solver - Embedded Dormand-Prince 5(4)
//!
//! General-purpose explicit Runge-Kutta integrator with an embedded 4th
//! order error estimate and step-size control. The caller supplies the
//! derivative as a closure `f(t, y) -> dy`, an initial state, and the grid
//! of times at which output is wanted; internally the solver takes as many
//! smaller accepted/rejected steps as the error tolerance demands, clamping
//! each step so it lands exactly on the next requested output time.
//!
//! The state is a fixed-size `[f64; N]`; the membrane system uses N=4 but
//! nothing here is specific to it.
//!
//! Failure is fatal and surfaces to the caller: a non-finite state, a step
//! size underflow, or exhausting the per-interval step budget all abort the
//! run with [`AxonsimError::SolverFailure`]. There are no retries - the
//! system is deterministic, so retrying identical inputs cannot help.

use crate::error::{AxonsimError, Result};

// Dormand-Prince 5(4) tableau
const C: [f64; 7] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

const A: [[f64; 6]; 6] = [
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
        0.0,
    ],
    [
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
    ],
];

/// 5th-order solution weights
const B: [f64; 7] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
    0.0,
];

/// Error weights (5th minus embedded 4th order)
const E: [f64; 7] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

/// Step-size growth/shrink clamps and safety factor
const FAC_MIN: f64 = 0.2;
const FAC_MAX: f64 = 5.0;
const SAFETY: f64 = 0.9;

/// Tolerances and limits for one integration call
#[derive(Clone, Copy, Debug)]
pub struct SolverOpts {
    /// Relative error tolerance per step
    pub rtol: f64,
    /// Absolute error tolerance per step
    pub atol: f64,
    /// Internal step budget between two consecutive output times
    pub max_steps_per_interval: usize,
}

impl Default for SolverOpts {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-8,
            max_steps_per_interval: 100_000,
        }
    }
}

/// Integrate `dy/dt = f(t, y)` from `y0` across the output grid `times`
///
/// Returns one state per entry of `times`, the first being `y0` itself.
/// `times` must be strictly increasing.
pub fn integrate<const N: usize, F>(
    mut f: F,
    y0: [f64; N],
    times: &[f64],
    opts: &SolverOpts,
) -> Result<Vec<[f64; N]>>
where
    F: FnMut(f64, &[f64; N]) -> [f64; N],
{
    debug_assert!(times.windows(2).all(|w| w[1] > w[0]));

    let mut out = Vec::with_capacity(times.len());
    let Some((&t_first, rest)) = times.split_first() else {
        return Ok(out);
    };
    out.push(y0);

    let mut t = t_first;
    let mut y = y0;
    // First trial step; controller adapts from here
    let mut h = rest
        .first()
        .map(|&t1| (t1 - t_first) / 10.0)
        .unwrap_or(0.0);

    for &t_out in rest {
        let mut steps = 0usize;
        while t < t_out {
            if steps >= opts.max_steps_per_interval {
                return Err(AxonsimError::SolverFailure {
                    t,
                    reason: format!(
                        "step budget of {} exhausted before t={}",
                        opts.max_steps_per_interval, t_out
                    ),
                });
            }
            steps += 1;

            let h_trial = h.min(t_out - t);
            if h_trial < f64::EPSILON * t.abs().max(1.0) {
                log::warn!("step size underflow at t={}", t);
                return Err(AxonsimError::SolverFailure {
                    t,
                    reason: "step size underflow".to_string(),
                });
            }

            let (y_new, err) = rk_step(&mut f, t, &y, h_trial);

            if y_new.iter().chain(err.iter()).any(|c| !c.is_finite()) {
                log::warn!("non-finite state at t={}", t + h_trial);
                return Err(AxonsimError::SolverFailure {
                    t,
                    reason: "state became non-finite".to_string(),
                });
            }

            let err_norm = error_norm(&y, &y_new, &err, opts);
            if err_norm <= 1.0 {
                t += h_trial;
                y = y_new;
            }
            // Both accepted and rejected steps re-scale the next trial
            let fac = (SAFETY * err_norm.powf(-0.2)).clamp(FAC_MIN, FAC_MAX);
            h = h_trial * fac;
        }
        out.push(y);
    }

    Ok(out)
}

/// One trial Dormand-Prince step from (t, y) of size h
///
/// Returns the 5th-order solution and the embedded error estimate.
fn rk_step<const N: usize, F>(f: &mut F, t: f64, y: &[f64; N], h: f64) -> ([f64; N], [f64; N])
where
    F: FnMut(f64, &[f64; N]) -> [f64; N],
{
    let mut k = [[0.0; N]; 7];
    k[0] = f(t, y);
    for s in 1..7 {
        let mut y_stage = *y;
        for (j, kj) in k.iter().enumerate().take(s) {
            let a = A[s - 1][j];
            if a != 0.0 {
                for i in 0..N {
                    y_stage[i] += h * a * kj[i];
                }
            }
        }
        k[s] = f(t + C[s] * h, &y_stage);
    }

    let mut y_new = *y;
    let mut err = [0.0; N];
    for (s, ks) in k.iter().enumerate() {
        for i in 0..N {
            y_new[i] += h * B[s] * ks[i];
            err[i] += h * E[s] * ks[i];
        }
    }
    (y_new, err)
}

/// Scaled RMS norm of the error estimate, <= 1 means the step is accepted
fn error_norm<const N: usize>(
    y: &[f64; N],
    y_new: &[f64; N],
    err: &[f64; N],
    opts: &SolverOpts,
) -> f64 {
    let mut acc = 0.0;
    for i in 0..N {
        let scale = opts.atol + opts.rtol * y[i].abs().max(y_new[i].abs());
        let r = err[i] / scale;
        acc += r * r;
    }
    (acc / N as f64).sqrt().max(1e-10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_decay() {
        let times: Vec<f64> = (0..=10).map(|i| i as f64 * 0.5).collect();
        let soln = integrate(
            |_t, y: &[f64; 1]| [-y[0]],
            [1.0],
            &times,
            &SolverOpts::default(),
        )
        .unwrap();

        assert_eq!(soln.len(), times.len());
        for (t, y) in times.iter().zip(&soln) {
            let exact = (-t).exp();
            assert!((y[0] - exact).abs() < 1e-6, "t={}: {} vs {}", t, y[0], exact);
        }
    }

    #[test]
    fn test_harmonic_oscillator_period() {
        let period = 2.0 * std::f64::consts::PI;
        let times: Vec<f64> = (0..=100).map(|i| i as f64 * period / 100.0).collect();
        let soln = integrate(
            |_t, y: &[f64; 2]| [y[1], -y[0]],
            [1.0, 0.0],
            &times,
            &SolverOpts::default(),
        )
        .unwrap();

        let last = soln.last().unwrap();
        assert!((last[0] - 1.0).abs() < 1e-4);
        assert!(last[1].abs() < 1e-4);
    }

    #[test]
    fn test_single_time_returns_initial() {
        let soln = integrate(
            |_t, y: &[f64; 1]| [-y[0]],
            [3.0],
            &[0.0],
            &SolverOpts::default(),
        )
        .unwrap();
        assert_eq!(soln, vec![[3.0]]);
    }

    #[test]
    fn test_step_budget_exhaustion() {
        let opts = SolverOpts {
            max_steps_per_interval: 3,
            ..Default::default()
        };
        let result = integrate(|_t, y: &[f64; 2]| [y[1], -100.0 * y[0]], [1.0, 0.0], &[0.0, 50.0], &opts);
        assert!(matches!(result, Err(AxonsimError::SolverFailure { .. })));
    }

    #[test]
    fn test_non_finite_rhs_is_fatal() {
        let result = integrate(
            |_t, _y: &[f64; 1]| [f64::NAN],
            [1.0],
            &[0.0, 1.0],
            &SolverOpts::default(),
        );
        assert!(matches!(result, Err(AxonsimError::SolverFailure { .. })));
    }
}
