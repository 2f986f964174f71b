//! Membrane Model - Conductances, Currents, and the ODE Right-Hand Side
//!
//! Holds the fixed biophysical constants of one membrane patch and owns the
//! three channel gates. The model is immutable for the duration of a run;
//! the derivative is a pure function of (state, applied current), callable
//! at any intermediate sub-step state the solver asks about.
//!
//! Voltages use the resting-potential-zero convention of the classic squid
//! axon parameterization, so the leak reversal sits near (not at) zero.

use serde::{Deserialize, Serialize};

use crate::error::{AxonsimError, Result};
use crate::gates::GateKind;

/// Fixed biophysical parameters of a membrane patch
///
/// Conductances in mS/cm², potentials in mV, capacitance in µF/cm².
/// Supplied as data by an external configuration layer; the crate only
/// validates and consumes them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MembraneParams {
    /// Maximal sodium conductance
    pub g_na: f64,
    /// Maximal potassium conductance
    pub g_k: f64,
    /// Leak conductance
    pub g_leak: f64,
    /// Sodium Nernst potential
    pub e_na: f64,
    /// Potassium Nernst potential
    pub e_k: f64,
    /// Leak reversal potential
    pub e_leak: f64,
    /// Membrane capacitance
    pub c_m: f64,
}

impl MembraneParams {
    /// Classic squid-axon constants (Hodgkin & Huxley 1952, rest at 0 mV)
    pub fn standard() -> Self {
        Self {
            g_na: 120.0,
            g_k: 36.0,
            g_leak: 0.3,
            e_na: 115.0,
            e_k: -12.0,
            e_leak: 10.6,
            c_m: 1.0,
        }
    }

    /// Check that every conductance and the capacitance is strictly
    /// positive
    ///
    /// Reversal potentials may be any real value. Rejecting bad constants
    /// here keeps them from surfacing later as an opaque solver failure.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("g_na", self.g_na),
            ("g_k", self.g_k),
            ("g_leak", self.g_leak),
            ("c_m", self.c_m),
        ] {
            if !(value > 0.0) {
                return Err(AxonsimError::NonPositiveParameter { name, value });
            }
        }
        Ok(())
    }
}

impl Default for MembraneParams {
    fn default() -> Self {
        Self::standard()
    }
}

/// The coupled state vector (v, m, h, n) at one instant
///
/// `v` is the membrane potential; `m`, `h`, `n` are gate probabilities.
/// Gate values stay in [0, 1] under correct dynamics but are not clamped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MembraneState {
    /// Membrane potential (mV)
    pub v: f64,
    /// Sodium activation
    pub m: f64,
    /// Sodium inactivation
    pub h: f64,
    /// Potassium activation
    pub n: f64,
}

impl MembraneState {
    pub(crate) fn to_array(self) -> [f64; 4] {
        [self.v, self.m, self.h, self.n]
    }

    pub(crate) fn from_array(y: [f64; 4]) -> Self {
        Self {
            v: y[0],
            m: y[1],
            h: y[2],
            n: y[3],
        }
    }
}

/// Ionic current model for one membrane patch
#[derive(Clone, Copy, Debug)]
pub struct MembraneModel {
    params: MembraneParams,
    m_gate: GateKind,
    h_gate: GateKind,
    n_gate: GateKind,
}

impl MembraneModel {
    /// Build a model from validated parameters
    pub fn new(params: MembraneParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            m_gate: GateKind::M,
            h_gate: GateKind::H,
            n_gate: GateKind::N,
        })
    }

    /// The parameters this model was built with
    pub fn params(&self) -> &MembraneParams {
        &self.params
    }

    /// Resting state: v = 0 with every gate at its steady state there
    pub fn initial_state(&self) -> MembraneState {
        MembraneState {
            v: 0.0,
            m: self.m_gate.inf(0.0),
            h: self.h_gate.inf(0.0),
            n: self.n_gate.inf(0.0),
        }
    }

    /// ODE right-hand side: d(v, m, h, n)/dt under an applied current
    ///
    /// Currents are signed so that each term pushes v toward its reversal
    /// potential; the applied current adds directly.
    pub fn derivative(&self, state: &MembraneState, i_app: f64) -> MembraneState {
        let p = &self.params;
        let MembraneState { v, m, h, n } = *state;

        let i_k = -p.g_k * n.powi(4) * (v - p.e_k);
        let i_na = -p.g_na * m.powi(3) * h * (v - p.e_na);
        let i_leak = -p.g_leak * (v - p.e_leak);

        MembraneState {
            v: (i_k + i_na + i_leak + i_app) / p.c_m,
            m: self.m_gate.dif_eq(m, v),
            h: self.h_gate.dif_eq(h, v),
            n: self.n_gate.dif_eq(n, v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_params_valid() {
        assert!(MembraneParams::standard().validate().is_ok());
    }

    #[test]
    fn test_rejects_nonpositive_capacitance() {
        let params = MembraneParams {
            c_m: 0.0,
            ..MembraneParams::standard()
        };
        let err = MembraneModel::new(params).unwrap_err();
        assert!(matches!(
            err,
            AxonsimError::NonPositiveParameter { name: "c_m", .. }
        ));
    }

    #[test]
    fn test_rejects_negative_conductance() {
        let params = MembraneParams {
            g_k: -36.0,
            ..MembraneParams::standard()
        };
        assert!(MembraneModel::new(params).is_err());
    }

    #[test]
    fn test_initial_state_is_gate_steady_state() {
        let model = MembraneModel::new(MembraneParams::standard()).unwrap();
        let state = model.initial_state();
        assert_eq!(state.v, 0.0);
        assert_eq!(state.m, GateKind::M.inf(0.0));
        assert_eq!(state.h, GateKind::H.inf(0.0));
        assert_eq!(state.n, GateKind::N.inf(0.0));
    }

    #[test]
    fn test_rest_derivative_is_small() {
        // The standard leak reversal is tuned so the resting state is very
        // nearly a fixed point of the full system under zero input.
        let model = MembraneModel::new(MembraneParams::standard()).unwrap();
        let d = model.derivative(&model.initial_state(), 0.0);
        assert!(d.v.abs() < 0.5, "dv/dt at rest: {}", d.v);
        assert!(d.m.abs() < 1e-12);
        assert!(d.h.abs() < 1e-12);
        assert!(d.n.abs() < 1e-12);
    }

    #[test]
    fn test_applied_current_depolarizes() {
        let model = MembraneModel::new(MembraneParams::standard()).unwrap();
        let rest = model.initial_state();
        let d0 = model.derivative(&rest, 0.0);
        let d1 = model.derivative(&rest, 10.0);
        assert!((d1.v - d0.v - 10.0).abs() < 1e-12, "c_m = 1 scales i_app directly");
    }

    #[test]
    fn test_derivative_pure_at_substep_states() {
        let model = MembraneModel::new(MembraneParams::standard()).unwrap();
        let odd = MembraneState {
            v: 37.5,
            m: 0.4,
            h: 0.3,
            n: 0.6,
        };
        let a = model.derivative(&odd, 2.5);
        let b = model.derivative(&odd, 2.5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_params_serialization_roundtrip() {
        let params = MembraneParams::standard();
        let json = serde_json::to_string(&params).unwrap();
        let restored: MembraneParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, restored);
    }
}
