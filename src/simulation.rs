//! Simulation - Time Grid, Integration Run, and Trajectory
//!
//! One blocking call: build the output grid from the stimulus, integrate
//! the four coupled equations across it, hand back the trajectory. The
//! stimulus and solver state live entirely within the call, so concurrent
//! runs of the same `Simulation` with different stimuli are safe.
//!
//! Rendering is not this crate's concern; the [`TrajectorySink`] trait is
//! the seam where an external visualization layer plugs in.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::membrane::{MembraneModel, MembraneParams, MembraneState};
use crate::solver::{integrate, SolverOpts};
use crate::stimulus::Stimulus;

/// The (v, m, h, n) trajectories aligned to the output time grid
///
/// All five vectors share one length: stimulus sample count + 1. Owned by
/// the caller once produced; serializable so external tools can persist or
/// render it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Output grid times (ms)
    pub t: Vec<f64>,
    /// Membrane potential at each grid time (mV)
    pub v: Vec<f64>,
    /// Sodium activation gate
    pub m: Vec<f64>,
    /// Sodium inactivation gate
    pub h: Vec<f64>,
    /// Potassium activation gate
    pub n: Vec<f64>,
}

impl Trajectory {
    /// Number of grid points
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Full state vector at grid index `i`
    pub fn state_at(&self, i: usize) -> MembraneState {
        MembraneState {
            v: self.v[i],
            m: self.m[i],
            h: self.h[i],
            n: self.n[i],
        }
    }
}

/// Consumer of a finished trajectory (plotting, persistence, telemetry)
///
/// The simulation core never depends on any concrete sink being present.
pub trait TrajectorySink {
    fn consume(&mut self, trajectory: &Trajectory);
}

/// Sink that discards the trajectory; stand-in for test harnesses
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl TrajectorySink for NullSink {
    fn consume(&mut self, _trajectory: &Trajectory) {}
}

/// A configured membrane simulation
///
/// Construct once from parameters, run any number of times with different
/// stimuli. Runs are deterministic: identical stimulus and parameters give
/// identical trajectories.
#[derive(Clone, Copy, Debug)]
pub struct Simulation {
    model: MembraneModel,
    opts: SolverOpts,
}

impl Simulation {
    /// Build a simulation from membrane parameters
    pub fn new(params: MembraneParams) -> Result<Self> {
        Ok(Self {
            model: MembraneModel::new(params)?,
            opts: SolverOpts::default(),
        })
    }

    /// Override the solver tolerances
    pub fn with_opts(mut self, opts: SolverOpts) -> Self {
        self.opts = opts;
        self
    }

    /// The membrane model this simulation drives
    pub fn model(&self) -> &MembraneModel {
        &self.model
    }

    /// Integrate the membrane equations across the stimulus
    ///
    /// The output grid runs from 0 in steps of the stimulus interval,
    /// one point per sample plus one trailing point past the last sample
    /// (the sampler's tail clamp keeps that point in bounds). The solver
    /// takes as many internal sub-steps between grid points as its error
    /// control demands.
    pub fn run(&self, stimulus: &Stimulus) -> Result<Trajectory> {
        let dt = stimulus.dt();
        let times: Vec<f64> = (0..=stimulus.len()).map(|i| i as f64 * dt).collect();
        log::debug!(
            "integrating {} grid points at dt={} ms",
            times.len(),
            dt
        );

        let model = self.model;
        let y0 = model.initial_state().to_array();
        let states = integrate(
            |t, y: &[f64; 4]| {
                model
                    .derivative(&MembraneState::from_array(*y), stimulus.sample(t))
                    .to_array()
            },
            y0,
            &times,
            &self.opts,
        )?;

        let mut trajectory = Trajectory {
            t: times,
            v: Vec::with_capacity(states.len()),
            m: Vec::with_capacity(states.len()),
            h: Vec::with_capacity(states.len()),
            n: Vec::with_capacity(states.len()),
        };
        for y in states {
            trajectory.v.push(y[0]);
            trajectory.m.push(y[1]);
            trajectory.h.push(y[2]);
            trajectory.n.push(y[3]);
        }
        Ok(trajectory)
    }

    /// Run and hand the finished trajectory to a sink
    pub fn run_into<S: TrajectorySink>(
        &self,
        stimulus: &Stimulus,
        sink: &mut S,
    ) -> Result<Trajectory> {
        let trajectory = self.run(stimulus)?;
        sink.consume(&trajectory);
        Ok(trajectory)
    }
}
