//! The compliant contact subsystem: dispatch, cached results and the
//! dissipated-energy state variable.

use glam::DVec3;
use tracing::{debug, trace};

use crate::error::{ContactError, Result};
use crate::spatial::SpatialVec;
use crate::state::{Stage, State, ZIndex};

use super::force::{ContactForce, ContactPatch};
use super::generator::{DoNothing, ElasticFoundation, GeneratorContext, HertzCircular, HertzElliptical};
use super::registry::GeneratorRegistry;
use super::tracker::ContactTracker;
use super::types::BodyIndex;

/// Configuration for compliant contact.
#[derive(Debug, Clone)]
pub struct ContactConfig {
    /// Slip speed below which friction is regularized, in m/s. Default: 0.01.
    pub transition_velocity: f64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            transition_velocity: 0.01,
        }
    }
}

impl ContactConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.transition_velocity.is_finite() && self.transition_velocity > 0.0) {
            return Err(ContactError::invalid_argument(format!(
                "transition velocity must be positive, got {}",
                self.transition_velocity
            )));
        }
        Ok(())
    }
}

/// Results of the most recent evaluation.
#[derive(Debug, Default)]
struct EvaluatedForces {
    /// [`State::generation`] of the state the forces were computed from.
    generation: u64,
    time: f64,
    forces: Vec<ContactForce>,
    /// Bodies carrying surface 1 and surface 2 of each force.
    bodies: Vec<(BodyIndex, BodyIndex)>,
}

#[derive(Debug)]
struct SubsystemImpl<T> {
    tracker: T,
    registry: GeneratorRegistry,
    config: ContactConfig,
    energy_index: Option<ZIndex>,
    evaluated: Option<EvaluatedForces>,
}

/// Turns the overlaps reported by a [`ContactTracker`] into contact forces.
///
/// # Lifecycle
///
/// 1. Construct with a tracker; register extra generators if needed.
/// 2. [`realize_model`](Self::realize_model) allocates the dissipated energy
///    variable in the [`State`].
/// 3. Each step, once the state is at [`Stage::Velocity`], call
///    [`evaluate`](Self::evaluate) and read forces, then
///    [`realize_acceleration`](Self::realize_acceleration) to hand the
///    dissipation rate to the integrator.
#[derive(Debug)]
pub struct CompliantContactSubsystem<T: ContactTracker> {
    inner: SubsystemImpl<T>,
}

impl<T: ContactTracker> CompliantContactSubsystem<T> {
    /// Subsystem with the built-in generators and [`DoNothing`] as default.
    pub fn new(tracker: T) -> Self {
        let mut subsystem = Self::empty(tracker);
        let registry = &mut subsystem.inner.registry;
        registry.register(HertzCircular);
        registry.register(HertzElliptical);
        registry.register(ElasticFoundation);
        registry.register_default(DoNothing::default());
        subsystem
    }

    /// Subsystem with no generators registered at all.
    pub fn empty(tracker: T) -> Self {
        Self {
            inner: SubsystemImpl {
                tracker,
                registry: GeneratorRegistry::new(),
                config: ContactConfig::default(),
                energy_index: None,
                evaluated: None,
            },
        }
    }

    pub fn tracker(&self) -> &T {
        &self.inner.tracker
    }

    /// Mutable tracker access. Discards the cached forces.
    pub fn tracker_mut(&mut self) -> &mut T {
        self.inner.evaluated = None;
        &mut self.inner.tracker
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.inner.registry
    }

    /// Mutable registry access for setup. Discards the cached forces.
    pub fn registry_mut(&mut self) -> &mut GeneratorRegistry {
        self.inner.evaluated = None;
        &mut self.inner.registry
    }

    pub fn config(&self) -> &ContactConfig {
        &self.inner.config
    }

    pub fn transition_velocity(&self) -> f64 {
        self.inner.config.transition_velocity
    }

    /// Set the friction transition velocity. Discards the cached forces.
    pub fn set_transition_velocity(&mut self, transition_velocity: f64) -> Result<()> {
        let config = ContactConfig {
            transition_velocity,
        };
        config.validate()?;
        self.inner.config = config;
        self.inner.evaluated = None;
        Ok(())
    }

    /// Allocate the dissipated-energy variable, starting at zero.
    ///
    /// Must run once, while `state` is below [`Stage::Model`].
    pub fn realize_model(&mut self, state: &mut State) -> Result<()> {
        if let Some(index) = self.inner.energy_index {
            return Err(ContactError::invalid_argument(format!(
                "dissipated energy already allocated at z index {}",
                index.index()
            )));
        }
        let index = state.allocate_z(0.0)?;
        debug!(z_index = index.index(), "allocated dissipated energy state variable");
        self.inner.energy_index = Some(index);
        Ok(())
    }

    /// Compute the resultant force of every active overlap.
    ///
    /// Results are stored in tracker order and returned count. Requires
    /// [`Stage::Velocity`]; any failure leaves no cached results behind.
    pub fn evaluate(&mut self, state: &State) -> Result<usize> {
        self.inner.evaluated = None;
        state.require(Stage::Velocity, "contact force evaluation")?;

        let inner = &self.inner;
        let ctx = GeneratorContext::new(&inner.tracker, inner.config.transition_velocity);
        let contacts = inner.tracker.active_contacts(state)?;

        let mut evaluated = EvaluatedForces {
            generation: state.generation(),
            time: state.time(),
            forces: Vec::with_capacity(contacts.len()),
            bodies: Vec::with_capacity(contacts.len()),
        };
        for contact in contacts {
            let (s1, s2) = contact.surfaces();
            let v1 = inner.tracker.surface_velocity(state, s1)?;
            let v2 = inner.tracker.surface_velocity(state, s2)?;
            let generator = inner.registry.lookup(contact.contact_type_id())?;
            trace!(
                contact = %contact.contact_id(),
                contact_type = %contact.contact_type_id(),
                generator = generator.name(),
                "dispatching contact"
            );
            let force = generator.calc_contact_force(&ctx, &**contact, &v1, &v2)?;
            evaluated.forces.push(force);
            evaluated
                .bodies
                .push((inner.tracker.surface(s1)?.body, inner.tracker.surface(s2)?.body));
        }

        let count = evaluated.forces.len();
        debug!(
            contacts = count,
            power = evaluated.forces.iter().map(|f| f.power).sum::<f64>(),
            "evaluated contact forces"
        );
        self.inner.evaluated = Some(evaluated);
        Ok(count)
    }

    fn evaluated(&self, what: &'static str) -> Result<&EvaluatedForces> {
        self.inner
            .evaluated
            .as_ref()
            .ok_or(ContactError::NotEvaluated { what })
    }

    /// Number of forces from the most recent evaluation.
    pub fn num_contact_forces(&self) -> Result<usize> {
        Ok(self.evaluated("number of contact forces")?.forces.len())
    }

    /// Force `n` from the most recent evaluation.
    pub fn contact_force(&self, n: usize) -> Result<&ContactForce> {
        let forces = &self.evaluated("contact force")?.forces;
        forces.get(n).ok_or_else(|| {
            ContactError::invalid_argument(format!(
                "contact force index {n} out of range [0, {})",
                forces.len()
            ))
        })
    }

    pub fn contact_forces(&self) -> Result<&[ContactForce]> {
        Ok(&self.evaluated("contact forces")?.forces)
    }

    /// Total dissipation rate of the most recent evaluation.
    pub fn dissipation_rate(&self) -> Result<f64> {
        Ok(self
            .evaluated("dissipation rate")?
            .forces
            .iter()
            .map(|f| f.power)
            .sum())
    }

    /// Detailed patch of every active overlap, in tracker order.
    ///
    /// Not part of the per-step path. Requires [`Stage::Velocity`].
    pub fn calc_contact_patch_details(&self, state: &State) -> Result<Vec<ContactPatch>> {
        state.require(Stage::Velocity, "contact patch details")?;
        let inner = &self.inner;
        let ctx = GeneratorContext::new(&inner.tracker, inner.config.transition_velocity);
        inner
            .tracker
            .active_contacts(state)?
            .iter()
            .map(|contact| {
                let (s1, s2) = contact.surfaces();
                let v1 = inner.tracker.surface_velocity(state, s1)?;
                let v2 = inner.tracker.surface_velocity(state, s2)?;
                inner
                    .registry
                    .lookup(contact.contact_type_id())?
                    .calc_contact_patch(&ctx, &**contact, &v1, &v2)
            })
            .collect()
    }

    /// Elastic energy stored in all active overlaps. Requires
    /// [`Stage::Position`]; velocities are not used.
    pub fn potential_energy(&self, state: &State) -> Result<f64> {
        state.require(Stage::Position, "contact potential energy")?;
        let inner = &self.inner;
        let ctx = GeneratorContext::new(&inner.tracker, inner.config.transition_velocity);
        let mut energy = 0.0;
        for contact in inner.tracker.active_contacts(state)? {
            let force = inner
                .registry
                .lookup(contact.contact_type_id())?
                .calc_contact_force(&ctx, &**contact, &SpatialVec::ZERO, &SpatialVec::ZERO)?;
            energy += force.potential_energy;
        }
        Ok(energy)
    }

    /// Write the dissipation rate as the derivative of the dissipated
    /// energy variable, then mark `state` realized through
    /// [`Stage::Acceleration`].
    ///
    /// `state` must still be at [`Stage::Velocity`] or above, and the cached
    /// forces must have been evaluated from it since its velocities were
    /// last invalidated.
    pub fn realize_acceleration(&self, state: &mut State) -> Result<()> {
        let index = self.energy_index(state)?;
        state.require(Stage::Velocity, "dissipation rate")?;
        let evaluated = self.evaluated("dissipation rate")?;
        if evaluated.generation != state.generation() || evaluated.time != state.time() {
            return Err(ContactError::InvalidState {
                required: Stage::Dynamics,
                actual: state.stage(),
                what: "dissipation rate of forces evaluated for an earlier state",
            });
        }
        let rate = evaluated.forces.iter().map(|f| f.power).sum();
        state.set_z_dot(index, rate)?;
        state.realize(Stage::Acceleration);
        Ok(())
    }

    fn energy_index(&self, state: &State) -> Result<ZIndex> {
        self.inner.energy_index.ok_or(ContactError::InvalidState {
            required: Stage::Model,
            actual: state.stage(),
            what: "dissipated energy",
        })
    }

    /// Energy dissipated so far. Requires [`Stage::Model`].
    pub fn dissipated_energy(&self, state: &State) -> Result<f64> {
        let index = self.energy_index(state)?;
        state.z(index)
    }

    /// Overwrite the dissipated energy, e.g. to reset it or restore a
    /// checkpoint. Fails for negative values.
    pub fn set_dissipated_energy(&self, state: &mut State, energy: f64) -> Result<()> {
        if !(energy.is_finite() && energy >= 0.0) {
            return Err(ContactError::invalid_argument(format!(
                "dissipated energy must be nonnegative, got {energy}"
            )));
        }
        let index = self.energy_index(state)?;
        state.set_z(index, energy)
    }

    /// Accumulate the most recent forces onto their bodies.
    ///
    /// Each entry of `body_forces` is a spatial force about the ground origin.
    /// Surface 2's body receives the stored force, surface 1's body its
    /// negation.
    pub fn add_body_forces(&self, body_forces: &mut [SpatialVec]) -> Result<()> {
        let evaluated = self.evaluated("body forces")?;
        for (force, &(body1, body2)) in evaluated.forces.iter().zip(&evaluated.bodies) {
            if body1.0 >= body_forces.len() || body2.0 >= body_forces.len() {
                return Err(ContactError::invalid_argument(format!(
                    "body index out of range for {} bodies",
                    body_forces.len()
                )));
            }
            let about_origin = force.force_about(DVec3::ZERO);
            body_forces[body2.0] += about_origin;
            body_forces[body1.0] += -about_origin;
        }
        Ok(())
    }
}
