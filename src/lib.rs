//! # Axonsim - Hodgkin-Huxley Membrane Excitability
//!
//! Conductance-based simulation of a neuronal membrane patch: four coupled
//! ODEs (membrane voltage plus the m, h, n gating variables) integrated
//! under an externally supplied stimulus current.
//!
//! ## Core Components
//!
//! - **GateKind**: per-gate α/β rate kinetics with derived steady state,
//!   time constant, and gating ODE
//! - **MembraneModel**: fixed biophysical constants + ionic currents; the
//!   pure ODE right-hand side
//! - **Stimulus**: discretely sampled applied current, zero-order held at
//!   arbitrary solver query times
//! - **Simulation**: output time grid + adaptive integration producing a
//!   [`Trajectory`]
//!
//! ## Design Principles
//!
//! - **Pure derivative**: the right-hand side captures no mutable state;
//!   stimulus and parameters are passed explicitly per run, so parallel
//!   runs with different stimuli are safe
//! - **Config as data**: parameters are a serializable struct validated at
//!   construction, never hidden fields mutated mid-run
//! - **Rendering stays outside**: the crate emits trajectories and gate
//!   curves; plotting lives behind the [`TrajectorySink`] seam
//!
//! ## Example
//!
//! ```
//! use axonsim::{MembraneParams, Simulation, Stimulus};
//!
//! // 10 ms run with a 3 ms suprathreshold current pulse
//! let stimulus = Stimulus::pulse(1000, 0.01, 100, 400, 30.0)?;
//! let simulation = Simulation::new(MembraneParams::standard())?;
//! let trajectory = simulation.run(&stimulus)?;
//!
//! let peak = trajectory.v.iter().cloned().fold(f64::MIN, f64::max);
//! assert!(peak > 80.0, "action potential expected");
//! # Ok::<(), axonsim::AxonsimError>(())
//! ```

// Error types
mod error;
pub use error::{AxonsimError, Result};

// Channel gate kinetics
pub mod gates;
pub use gates::{GateCurve, GateKind};

// Membrane parameters, state, and currents
pub mod membrane;
pub use membrane::{MembraneModel, MembraneParams, MembraneState};

// Applied-current sampling
pub mod stimulus;
pub use stimulus::Stimulus;

// Adaptive ODE integration
pub mod solver;
pub use solver::{integrate, SolverOpts};

// Simulation driver and output trajectory
pub mod simulation;
pub use simulation::{NullSink, Simulation, Trajectory, TrajectorySink};
