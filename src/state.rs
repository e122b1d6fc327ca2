//! Staged realization of simulation state.
//!
//! Cached quantities are only valid once the state has been realized to the
//! stage that produces them. The [`State`] keeps a single "highest stage
//! realized" marker: reads of stage-N data fail while the marker is below N,
//! and writing a stage-N input lowers the marker so everything at or above N
//! must be recomputed.

use crate::error::{ContactError, Result};

/// Ordered realization stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Nothing has been realized.
    Empty,
    /// Structure is fixed; state variables may be allocated.
    Topology,
    /// Modeling choices are fixed; state variables exist.
    Model,
    /// Instance parameters are fixed.
    Instance,
    /// Time is known.
    Time,
    /// Positions (and therefore overlaps) are known.
    Position,
    /// Velocities are known; contact forces can be evaluated.
    Velocity,
    /// Forces are known.
    Dynamics,
    /// Accelerations and state derivatives are known.
    Acceleration,
    /// Reporting quantities are known.
    Report,
}

impl Stage {
    /// All stages in realization order.
    pub const ALL: [Stage; 10] = [
        Stage::Empty,
        Stage::Topology,
        Stage::Model,
        Stage::Instance,
        Stage::Time,
        Stage::Position,
        Stage::Velocity,
        Stage::Dynamics,
        Stage::Acceleration,
        Stage::Report,
    ];

    /// The stage immediately below this one (`Empty` stays `Empty`).
    pub fn prev(self) -> Stage {
        let i = self as usize;
        Self::ALL[i.saturating_sub(1)]
    }

    /// The stage immediately above this one (`Report` stays `Report`).
    pub fn next(self) -> Stage {
        let i = self as usize;
        Self::ALL[(i + 1).min(Self::ALL.len() - 1)]
    }
}

/// Index of a continuous auxiliary state variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZIndex(usize);

impl ZIndex {
    /// Raw slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Simulation state with a staged-validity marker.
#[derive(Debug, Clone)]
pub struct State {
    stage: Stage,
    /// Bumped whenever velocity-stage results are invalidated.
    generation: u64,
    time: f64,
    z: Vec<f64>,
    z_dot: Vec<f64>,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    /// Create a state realized through [`Stage::Topology`] with no variables.
    pub fn new() -> Self {
        Self {
            stage: Stage::Topology,
            generation: 0,
            time: 0.0,
            z: Vec::new(),
            z_dot: Vec::new(),
        }
    }

    /// Highest stage currently realized.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Mark the state realized through `stage`. Never lowers the marker.
    pub fn realize(&mut self, stage: Stage) {
        if stage > self.stage {
            self.stage = stage;
        }
    }

    /// Invalidate `stage` and everything above it.
    pub fn invalidate(&mut self, stage: Stage) {
        if self.stage >= stage {
            if self.stage >= Stage::Velocity && stage <= Stage::Velocity {
                self.generation += 1;
            }
            self.stage = stage.prev();
        }
    }

    /// Counter that changes every time realized velocities are thrown away.
    ///
    /// Results computed from this state at [`Stage::Velocity`] stay valid
    /// for as long as the generation is unchanged.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fail with [`ContactError::InvalidState`] unless realized through `stage`.
    pub fn require(&self, stage: Stage, what: &'static str) -> Result<()> {
        if self.stage < stage {
            return Err(ContactError::InvalidState {
                required: stage,
                actual: self.stage,
                what,
            });
        }
        Ok(())
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Set the time; invalidates [`Stage::Time`] and above.
    pub fn set_time(&mut self, time: f64) {
        self.time = time;
        self.invalidate(Stage::Time);
    }

    /// Number of continuous auxiliary variables.
    pub fn num_z(&self) -> usize {
        self.z.len()
    }

    /// Allocate a continuous auxiliary variable.
    ///
    /// Only permitted while the model is being built, i.e. before
    /// [`Stage::Model`] has been realized.
    pub fn allocate_z(&mut self, initial: f64) -> Result<ZIndex> {
        if self.stage >= Stage::Model {
            return Err(ContactError::InvalidState {
                required: Stage::Topology,
                actual: self.stage,
                what: "state variable allocation",
            });
        }
        self.z.push(initial);
        self.z_dot.push(0.0);
        Ok(ZIndex(self.z.len() - 1))
    }

    /// Read a continuous variable. Requires [`Stage::Model`].
    pub fn z(&self, index: ZIndex) -> Result<f64> {
        self.require(Stage::Model, "continuous state variable")?;
        self.z.get(index.0).copied().ok_or_else(|| {
            ContactError::invalid_argument(format!("z index {} out of range", index.0))
        })
    }

    /// Overwrite a continuous variable. Requires [`Stage::Model`] and
    /// invalidates [`Stage::Dynamics`] and above.
    pub fn set_z(&mut self, index: ZIndex, value: f64) -> Result<()> {
        self.require(Stage::Model, "continuous state variable")?;
        let slot = self.z.get_mut(index.0).ok_or_else(|| {
            ContactError::invalid_argument(format!("z index {} out of range", index.0))
        })?;
        *slot = value;
        self.invalidate(Stage::Dynamics);
        Ok(())
    }

    /// Read the time derivative most recently written for a variable.
    pub fn z_dot(&self, index: ZIndex) -> Result<f64> {
        self.z_dot.get(index.0).copied().ok_or_else(|| {
            ContactError::invalid_argument(format!("z index {} out of range", index.0))
        })
    }

    /// Write the time derivative of a variable (an acceleration-stage output).
    pub fn set_z_dot(&mut self, index: ZIndex, value: f64) -> Result<()> {
        let slot = self.z_dot.get_mut(index.0).ok_or_else(|| {
            ContactError::invalid_argument(format!("z index {} out of range", index.0))
        })?;
        *slot = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(Stage::Model < Stage::Velocity);
        assert_eq!(Stage::Velocity.prev(), Stage::Position);
        assert_eq!(Stage::Empty.prev(), Stage::Empty);
        assert_eq!(Stage::Report.next(), Stage::Report);
        assert_eq!(Stage::Position.next(), Stage::Velocity);
    }

    #[test]
    fn test_realize_and_invalidate() {
        let mut state = State::new();
        assert_eq!(state.stage(), Stage::Topology);

        state.realize(Stage::Velocity);
        assert_eq!(state.stage(), Stage::Velocity);
        assert!(state.require(Stage::Position, "positions").is_ok());

        state.set_time(1.0);
        assert_eq!(state.stage(), Stage::Instance);
        let err = state.require(Stage::Velocity, "velocities").unwrap_err();
        assert_eq!(
            err,
            ContactError::InvalidState {
                required: Stage::Velocity,
                actual: Stage::Instance,
                what: "velocities",
            }
        );

        // Invalidating above the marker leaves it alone.
        state.invalidate(Stage::Report);
        assert_eq!(state.stage(), Stage::Instance);
    }

    #[test]
    fn test_generation_tracks_velocity_invalidation() {
        let mut state = State::new();
        let idx = state.allocate_z(0.0).unwrap();
        let start = state.generation();

        // Nothing at Velocity was realized yet.
        state.set_time(0.5);
        assert_eq!(state.generation(), start);

        state.realize(Stage::Acceleration);
        state.set_z(idx, 1.0).unwrap();
        assert_eq!(state.stage(), Stage::Velocity);
        assert_eq!(state.generation(), start);

        state.set_time(1.0);
        assert_eq!(state.generation(), start + 1);
    }

    #[test]
    fn test_z_allocation_window() {
        let mut state = State::new();
        let idx = state.allocate_z(2.5).unwrap();
        assert_eq!(idx.index(), 0);

        // Not readable until the model stage exists.
        assert!(state.z(idx).is_err());

        state.realize(Stage::Model);
        assert_eq!(state.z(idx).unwrap(), 2.5);
        assert!(state.allocate_z(0.0).is_err());
    }

    #[test]
    fn test_set_z_invalidates_dynamics() {
        let mut state = State::new();
        let idx = state.allocate_z(0.0).unwrap();
        state.realize(Stage::Acceleration);

        state.set_z(idx, 3.0).unwrap();
        assert_eq!(state.stage(), Stage::Velocity);
        assert_eq!(state.z(idx).unwrap(), 3.0);

        state.set_z_dot(idx, -1.0).unwrap();
        assert_eq!(state.z_dot(idx).unwrap(), -1.0);
        assert_eq!(state.stage(), Stage::Velocity);
    }
}
