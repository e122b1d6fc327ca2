//! Force generators: the algorithms that turn one overlap into a force.
//!
//! Each generator answers for exactly one [`ContactTypeId`]. The
//! [`GeneratorRegistry`](crate::contact::registry::GeneratorRegistry) picks
//! one per overlap and calls it with the two surface velocities.
//!
//! Built-in generators:
//!
//! - [`HertzCircular`]: smooth surfaces meeting at a point, circular patch
//! - [`HertzElliptical`]: smooth surfaces with unequal principal curvatures
//! - [`ElasticFoundation`]: triangle mesh against another surface, one
//!   element per penetrating face
//! - [`DoNothing`] and [`ThrowError`]: fallbacks

pub mod elastic_foundation;
pub mod fallback;
pub mod hertz;

use std::fmt;

use glam::{DAffine3, DMat3, DVec3};

use crate::error::Result;
use crate::spatial::SpatialVec;

use super::force::{ContactForce, ContactPatch};
use super::material::ContactSurface;
use super::overlap::Contact;
use super::tracker::ContactTracker;
use super::types::ContactTypeId;

pub use elastic_foundation::ElasticFoundation;
pub use fallback::{DoNothing, ThrowError};
pub use hertz::{HertzCircular, HertzElliptical};

/// Read-only inputs shared by every generator call during one evaluation.
///
/// Carries surface descriptions and configuration only. Velocities are
/// always passed explicitly so the same call serves velocity-free queries.
#[derive(Clone, Copy)]
pub struct GeneratorContext<'a> {
    pub tracker: &'a dyn ContactTracker,
    /// Friction transition velocity `vt` (m/s).
    pub transition_velocity: f64,
}

impl<'a> GeneratorContext<'a> {
    pub fn new(tracker: &'a dyn ContactTracker, transition_velocity: f64) -> Self {
        Self {
            tracker,
            transition_velocity,
        }
    }

    /// Both surfaces of a contact, in contact order.
    pub fn surfaces(&self, contact: &dyn Contact) -> Result<(&'a ContactSurface, &'a ContactSurface)> {
        let (s1, s2) = contact.surfaces();
        Ok((self.tracker.surface(s1)?, self.tracker.surface(s2)?))
    }
}

impl fmt::Debug for GeneratorContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorContext")
            .field("transition_velocity", &self.transition_velocity)
            .finish_non_exhaustive()
    }
}

/// An algorithm producing contact forces for one kind of overlap.
///
/// Implementations hold no state written during a call, so independent
/// overlaps may be evaluated in any order or in parallel.
pub trait ForceGenerator: fmt::Debug + Send + Sync {
    /// Overlap type this generator handles.
    fn contact_type_id(&self) -> ContactTypeId;

    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Resultant force, energy and power for one overlap.
    ///
    /// `v1` and `v2` are the spatial velocities of the bodies carrying
    /// surface 1 and surface 2. Called every step for every active overlap.
    fn calc_contact_force(
        &self,
        ctx: &GeneratorContext<'_>,
        contact: &dyn Contact,
        v1: &SpatialVec,
        v2: &SpatialVec,
    ) -> Result<ContactForce>;

    /// Full patch description for one overlap. Only computed on request.
    fn calc_contact_patch(
        &self,
        ctx: &GeneratorContext<'_>,
        contact: &dyn Contact,
        v1: &SpatialVec,
        v2: &SpatialVec,
    ) -> Result<ContactPatch>;
}

/// Right-handed frame at `origin` whose z axis is `normal`.
pub(crate) fn frame_from_normal(origin: DVec3, normal: DVec3) -> DAffine3 {
    let x = normal.any_orthonormal_vector();
    let y = normal.cross(x);
    DAffine3::from_mat3_translation(DMat3::from_cols(x, y, normal), origin)
}

/// Express a ground-frame vector in `frame`'s axes.
pub(crate) fn to_frame(frame: &DAffine3, v: DVec3) -> DVec3 {
    frame.matrix3.transpose() * v
}
