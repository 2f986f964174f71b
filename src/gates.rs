//! Gate Kinetics - Voltage-Dependent Channel Gates
//!
//! The three Hodgkin-Huxley gating variables as one capability (alpha, beta)
//! with three concrete variants selected at construction:
//!
//! - **m**: sodium activation
//! - **h**: sodium inactivation
//! - **n**: potassium activation
//!
//! Voltages follow the classic squid-axon convention with the resting
//! potential at 0 mV.
//!
//! ## Derived quantities
//!
//! Steady state, time constant, and the gating ODE right-hand side are all
//! computed on demand from alpha/beta, never stored:
//!
//! ```text
//! inf(v) = α/(α+β)
//! tau(v) = 1/(α+β)
//! d·/dt  = α·(1-state) - β·state
//! ```
//!
//! ## Removable singularities
//!
//! The m and n alpha formulas are 0/0 at v=25 and v=10 respectively. The
//! limit value is substituted on *exact* floating-point equality only. A
//! voltage infinitesimally close to (but not at) the singular point falls
//! through to the closed form, which can cancel catastrophically and yield
//! NaN/Inf. That result is not guarded; it propagates into the state vector.

use serde::{Deserialize, Serialize};

/// Voltage where the m-gate alpha formula is 0/0 (mV)
const M_SINGULAR_V: f64 = 25.0;
/// L'Hopital limit of the m-gate alpha at the singular voltage
const M_SINGULAR_ALPHA: f64 = 1.0;
/// Voltage where the n-gate alpha formula is 0/0 (mV)
const N_SINGULAR_V: f64 = 10.0;
/// L'Hopital limit of the n-gate alpha at the singular voltage
const N_SINGULAR_ALPHA: f64 = 0.1;

/// Which channel gate a kinetics instance models
///
/// All rate arithmetic dispatches on this enum; there is no per-variant
/// struct hierarchy behind it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// Sodium activation gate (m)
    M,
    /// Sodium inactivation gate (h)
    H,
    /// Potassium activation gate (n)
    N,
}

impl GateKind {
    /// Forward transition rate α(v) (1/ms)
    ///
    /// Pure function of voltage. The equality checks against the singular
    /// voltages are deliberately exact, not tolerance-based; widening them
    /// would change simulation output near threshold.
    pub fn alpha(&self, v: f64) -> f64 {
        match self {
            Self::M => {
                if v == M_SINGULAR_V {
                    M_SINGULAR_ALPHA
                } else {
                    0.1 * (25.0 - v) / (((25.0 - v) / 10.0).exp() - 1.0)
                }
            }
            Self::H => 0.07 * (-v / 20.0).exp(),
            Self::N => {
                if v == N_SINGULAR_V {
                    N_SINGULAR_ALPHA
                } else {
                    0.01 * (10.0 - v) / (((10.0 - v) / 10.0).exp() - 1.0)
                }
            }
        }
    }

    /// Backward transition rate β(v) (1/ms)
    pub fn beta(&self, v: f64) -> f64 {
        match self {
            Self::M => 4.0 * (-v / 18.0).exp(),
            Self::H => 1.0 / (((30.0 - v) / 10.0).exp() + 1.0),
            Self::N => 0.125 * (-v / 80.0).exp(),
        }
    }

    /// Steady-state gate probability at a held voltage
    pub fn inf(&self, v: f64) -> f64 {
        let a = self.alpha(v);
        let b = self.beta(v);
        a / (a + b)
    }

    /// Relaxation time constant toward the steady state (ms)
    pub fn tau(&self, v: f64) -> f64 {
        1.0 / (self.alpha(v) + self.beta(v))
    }

    /// Rate of change of the gate probability at the given state and voltage
    ///
    /// This is the gating ODE right-hand side; the integrator evaluates it
    /// at arbitrary sub-step (state, v) pairs.
    pub fn dif_eq(&self, state: f64, v: f64) -> f64 {
        self.alpha(v) * (1.0 - state) - self.beta(v) * state
    }

    /// Sweep inf and tau over a voltage range for external inspection
    ///
    /// Produces the data behind steady-state / time-constant plots without
    /// any rendering dependency. `points` must be at least 2.
    pub fn sweep(&self, v_lo: f64, v_hi: f64, points: usize) -> GateCurve {
        let n = points.max(2);
        let step = (v_hi - v_lo) / (n - 1) as f64;
        let mut curve = GateCurve {
            gate: *self,
            v: Vec::with_capacity(n),
            inf: Vec::with_capacity(n),
            tau: Vec::with_capacity(n),
        };
        for i in 0..n {
            let v = v_lo + step * i as f64;
            curve.v.push(v);
            curve.inf.push(self.inf(v));
            curve.tau.push(self.tau(v));
        }
        curve
    }
}

/// Sampled inf/tau curves for one gate over a voltage range
///
/// Plain data for diagnostic/plotting tools; all vectors share one length.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GateCurve {
    /// Which gate was swept
    pub gate: GateKind,
    /// Voltage grid (mV)
    pub v: Vec<f64>,
    /// Steady-state values at each voltage
    pub inf: Vec<f64>,
    /// Time constants at each voltage (ms)
    pub tau: Vec<f64>,
}
