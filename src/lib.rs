//! Rein Compliant Contact
//!
//! Force generation for contact between deformable surfaces mounted on
//! rigid bodies, for use by a multibody integrator.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **error** - Error taxonomy shared by every fallible operation
//! 2. **spatial** - Six-component velocities and forces
//! 3. **state** - Staged realization and the continuous state variables
//! 4. **contact** - Overlaps, materials, force generators, registry and the
//!    [`CompliantContactSubsystem`] facade

pub mod contact;
pub mod error;
pub mod spatial;
pub mod state;

// Re-export commonly used types
pub use contact::{
    CircularPointContact, CompliantContactSubsystem, Contact, ContactConfig, ContactDetail,
    ContactForce, ContactId, ContactMaterial, ContactPatch, ContactSnapshot, ContactSurface,
    ContactSurfaceIndex, ContactTracker, ContactTypeId, EllipticalPointContact, ForceGenerator,
    GeneratorContext, GeneratorRegistry, TriangleMeshContact,
};
pub use error::{ContactError, Result};
pub use spatial::SpatialVec;
pub use state::{Stage, State, ZIndex};

// Re-export glam for convenience
pub use glam;
