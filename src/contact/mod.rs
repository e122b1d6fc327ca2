//! Compliant contact: forces from overlaps of deformable surfaces.
//!
//! # Architecture
//!
//! Each step runs the same pipeline:
//!
//! 1. The [`ContactTracker`] reports the active overlaps (positions known)
//! 2. Each overlap's type tag selects a [`ForceGenerator`] from the
//!    [`GeneratorRegistry`], falling back to the default generator
//! 3. The generator turns the overlap and both surface velocities into a
//!    [`ContactForce`] at the center of pressure
//! 4. The summed power is handed to the integrator as the rate of the
//!    dissipated energy state variable
//!
//! [`ContactPatch`] details are computed only on request.

pub mod force;
pub mod friction;
pub mod generator;
pub mod material;
pub mod overlap;
pub mod registry;
pub mod subsystem;
pub mod tracker;
pub mod types;

pub use force::{center_of_pressure, ContactDetail, ContactForce, ContactPatch, NormalContribution};
pub use friction::StribeckFriction;
pub use generator::{
    DoNothing, ElasticFoundation, ForceGenerator, GeneratorContext, HertzCircular,
    HertzElliptical, ThrowError,
};
pub use material::{
    ContactMaterial, ContactSurface, FrictionCoefficients, HertzMaterialPair, LayerMaterialPair,
};
pub use overlap::{
    downcast_contact, CircularPointContact, Contact, EllipticalPointContact, MeshFaceOverlap,
    TriangleMeshContact,
};
pub use registry::GeneratorRegistry;
pub use subsystem::{CompliantContactSubsystem, ContactConfig};
pub use tracker::{ContactSnapshot, ContactTracker};
pub use types::{BodyIndex, ContactId, ContactSurfaceIndex, ContactTypeId};
