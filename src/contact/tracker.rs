//! The seam to the overlap-detection subsystem.

use crate::error::{ContactError, Result};
use crate::spatial::SpatialVec;
use crate::state::{Stage, State};

use super::material::ContactSurface;
use super::overlap::Contact;
use super::types::ContactSurfaceIndex;

/// Source of active overlaps, surface descriptions and surface velocities.
///
/// Implemented by whatever performs collision detection; the force engine
/// only consumes it.
pub trait ContactTracker {
    /// Overlaps active in `state`, in a stable order. Valid at
    /// [`Stage::Position`] or later.
    fn active_contacts(&self, state: &State) -> Result<&[Box<dyn Contact>]>;

    fn surface(&self, index: ContactSurfaceIndex) -> Result<&ContactSurface>;

    /// Spatial velocity of the body carrying a surface, linear part at the
    /// ground origin. Valid at [`Stage::Velocity`] or later.
    fn surface_velocity(&self, state: &State, index: ContactSurfaceIndex) -> Result<SpatialVec>;
}

/// In-memory tracker holding a fixed snapshot of surfaces and overlaps.
///
/// Useful for replaying recorded overlaps and for driving the force engine
/// without a collision pipeline.
#[derive(Debug, Default)]
pub struct ContactSnapshot {
    surfaces: Vec<ContactSurface>,
    velocities: Vec<SpatialVec>,
    contacts: Vec<Box<dyn Contact>>,
}

impl ContactSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a surface at rest and return its index.
    pub fn add_surface(&mut self, surface: ContactSurface) -> ContactSurfaceIndex {
        self.surfaces.push(surface);
        self.velocities.push(SpatialVec::ZERO);
        ContactSurfaceIndex(self.surfaces.len() - 1)
    }

    pub fn num_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    pub fn set_surface_velocity(
        &mut self,
        index: ContactSurfaceIndex,
        velocity: SpatialVec,
    ) -> Result<()> {
        let slot = self
            .velocities
            .get_mut(index.0)
            .ok_or_else(|| unknown_surface(index))?;
        *slot = velocity;
        Ok(())
    }

    /// Replace the active overlap list.
    pub fn set_active_contacts(&mut self, contacts: Vec<Box<dyn Contact>>) {
        self.contacts = contacts;
    }

    pub fn push_contact(&mut self, contact: impl Contact) {
        self.contacts.push(Box::new(contact));
    }

    pub fn clear_contacts(&mut self) {
        self.contacts.clear();
    }
}

impl ContactTracker for ContactSnapshot {
    fn active_contacts(&self, state: &State) -> Result<&[Box<dyn Contact>]> {
        state.require(Stage::Position, "active contacts")?;
        Ok(&self.contacts)
    }

    fn surface(&self, index: ContactSurfaceIndex) -> Result<&ContactSurface> {
        self.surfaces
            .get(index.0)
            .ok_or_else(|| unknown_surface(index))
    }

    fn surface_velocity(&self, state: &State, index: ContactSurfaceIndex) -> Result<SpatialVec> {
        state.require(Stage::Velocity, "surface velocity")?;
        self.velocities
            .get(index.0)
            .copied()
            .ok_or_else(|| unknown_surface(index))
    }
}

fn unknown_surface(index: ContactSurfaceIndex) -> ContactError {
    ContactError::invalid_argument(format!("unknown contact surface {}", index.0))
}
