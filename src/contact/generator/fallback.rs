//! Fallback generators for contact types without a real force law.

use crate::contact::force::{ContactForce, ContactPatch};
use crate::contact::overlap::Contact;
use crate::contact::types::ContactTypeId;
use crate::error::{ContactError, Result};
use crate::spatial::SpatialVec;

use super::{ForceGenerator, GeneratorContext};

/// Silently produces no force.
///
/// Registered as the default generator, it lets contacts of unknown type pass
/// through a simulation without effect. Registered for a specific type, it
/// only accepts overlaps of that type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoNothing {
    contact_type: ContactTypeId,
}

impl DoNothing {
    pub fn new(contact_type: ContactTypeId) -> Self {
        Self { contact_type }
    }

    fn check(&self, contact: &dyn Contact) -> Result<()> {
        if !self.contact_type.is_default() && contact.contact_type_id() != self.contact_type {
            return Err(ContactError::invalid_argument(format!(
                "contact {} has type {} but DoNothing is registered for type {}",
                contact.contact_id(),
                contact.contact_type_id(),
                self.contact_type
            )));
        }
        Ok(())
    }
}

impl ForceGenerator for DoNothing {
    fn contact_type_id(&self) -> ContactTypeId {
        self.contact_type
    }

    fn name(&self) -> &'static str {
        "DoNothing"
    }

    fn calc_contact_force(
        &self,
        _ctx: &GeneratorContext<'_>,
        contact: &dyn Contact,
        _v1: &SpatialVec,
        _v2: &SpatialVec,
    ) -> Result<ContactForce> {
        self.check(contact)?;
        Ok(ContactForce::zero(contact.contact_id()))
    }

    fn calc_contact_patch(
        &self,
        _ctx: &GeneratorContext<'_>,
        contact: &dyn Contact,
        _v1: &SpatialVec,
        _v2: &SpatialVec,
    ) -> Result<ContactPatch> {
        self.check(contact)?;
        Ok(ContactPatch {
            resultant: ContactForce::zero(contact.contact_id()),
            elements: Vec::new(),
        })
    }
}

/// Fails every request with [`ContactError::UnimplementedAlgorithm`].
///
/// Use as the default generator to make an unhandled contact type stop the
/// simulation instead of being ignored, or as a placeholder for a force law
/// that has not been written yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThrowError {
    contact_type: ContactTypeId,
}

impl ThrowError {
    pub fn new(contact_type: ContactTypeId) -> Self {
        Self { contact_type }
    }
}

impl ForceGenerator for ThrowError {
    fn contact_type_id(&self) -> ContactTypeId {
        self.contact_type
    }

    fn name(&self) -> &'static str {
        "ThrowError"
    }

    fn calc_contact_force(
        &self,
        _ctx: &GeneratorContext<'_>,
        _contact: &dyn Contact,
        _v1: &SpatialVec,
        _v2: &SpatialVec,
    ) -> Result<ContactForce> {
        Err(ContactError::UnimplementedAlgorithm {
            generator: self.name(),
            operation: "calc_contact_force",
        })
    }

    fn calc_contact_patch(
        &self,
        _ctx: &GeneratorContext<'_>,
        _contact: &dyn Contact,
        _v1: &SpatialVec,
        _v2: &SpatialVec,
    ) -> Result<ContactPatch> {
        Err(ContactError::UnimplementedAlgorithm {
            generator: self.name(),
            operation: "calc_contact_patch",
        })
    }
}
