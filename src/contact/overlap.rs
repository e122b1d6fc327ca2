//! Overlap records produced by the contact tracker.
//!
//! An overlap describes interpenetration of the *undeformed* surfaces and
//! carries no force information. The force engine only looks at the type tag
//! to pick a generator; the generator then downcasts to the concrete record it
//! understands with [`downcast_contact`].

use std::any::Any;
use std::fmt;

use glam::{DAffine3, DMat3, DVec3};

use crate::error::{ContactError, Result};

use super::types::{ContactId, ContactSurfaceIndex, ContactTypeId};

/// A tracked overlap between two contact surfaces.
pub trait Contact: Any + fmt::Debug + Send + Sync {
    fn contact_id(&self) -> ContactId;

    /// Structural kind of this overlap, used for generator dispatch.
    fn contact_type_id(&self) -> ContactTypeId;

    /// The two surfaces involved; forces are reported on the second one.
    fn surfaces(&self) -> (ContactSurfaceIndex, ContactSurfaceIndex);

    fn as_any(&self) -> &dyn Any;
}

/// Downcast an overlap to the concrete record a generator expects.
///
/// Fails with [`ContactError::InvalidArgument`] if the type tag is not
/// `expected` or the record is not a `T`.
pub fn downcast_contact<T: Contact>(contact: &dyn Contact, expected: ContactTypeId) -> Result<&T> {
    if contact.contact_type_id() != expected {
        return Err(ContactError::invalid_argument(format!(
            "contact {} has type {} but generator handles type {}",
            contact.contact_id(),
            contact.contact_type_id(),
            expected
        )));
    }
    contact.as_any().downcast_ref::<T>().ok_or_else(|| {
        ContactError::invalid_argument(format!(
            "contact {} is tagged type {} but is not a {}",
            contact.contact_id(),
            expected,
            std::any::type_name::<T>()
        ))
    })
}

fn check_normal(id: ContactId, normal: DVec3) -> Result<()> {
    if !normal.is_normalized() {
        return Err(ContactError::invalid_argument(format!(
            "contact {id} normal {normal} is not a unit vector"
        )));
    }
    Ok(())
}

fn check_radius(id: ContactId, radius: f64) -> Result<()> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(ContactError::invalid_argument(format!(
            "contact {id} radius must be positive, got {radius}"
        )));
    }
    Ok(())
}

fn check_depth(id: ContactId, depth: f64) -> Result<()> {
    if !depth.is_finite() {
        return Err(ContactError::invalid_argument(format!(
            "contact {id} depth must be finite, got {depth}"
        )));
    }
    Ok(())
}

/// Two smooth surfaces meeting at a single point with a circular patch.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularPointContact {
    pub id: ContactId,
    pub surface1: ContactSurfaceIndex,
    pub surface2: ContactSurfaceIndex,
    /// Point midway between the deepest points of the two surfaces (ground).
    pub origin: DVec3,
    /// Unit normal pointing from surface 1 toward surface 2 (ground).
    pub normal: DVec3,
    /// Effective radius of curvature `r1·r2 / (r1 + r2)`.
    pub radius: f64,
    /// Overlap of the undeformed surfaces along the normal.
    pub depth: f64,
}

impl CircularPointContact {
    pub const TYPE_ID: ContactTypeId = ContactTypeId::new(1);

    pub fn new(
        id: ContactId,
        surfaces: (ContactSurfaceIndex, ContactSurfaceIndex),
        origin: DVec3,
        normal: DVec3,
        radius: f64,
        depth: f64,
    ) -> Self {
        Self {
            id,
            surface1: surfaces.0,
            surface2: surfaces.1,
            origin,
            normal: normal.normalize_or_zero(),
            radius,
            depth,
        }
    }

    /// Reject a non-positive radius, a non-finite depth or a normal that is
    /// not a unit vector (e.g. built from a zero vector).
    pub fn validate(&self) -> Result<()> {
        check_normal(self.id, self.normal)?;
        check_radius(self.id, self.radius)?;
        check_depth(self.id, self.depth)
    }

    /// Effective radius for two spheres of radii `r1` and `r2`.
    pub fn effective_radius(r1: f64, r2: f64) -> f64 {
        r1 * r2 / (r1 + r2)
    }
}

impl Contact for CircularPointContact {
    fn contact_id(&self) -> ContactId {
        self.id
    }

    fn contact_type_id(&self) -> ContactTypeId {
        Self::TYPE_ID
    }

    fn surfaces(&self) -> (ContactSurfaceIndex, ContactSurfaceIndex) {
        (self.surface1, self.surface2)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Two smooth surfaces meeting at a point with unequal principal curvatures.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipticalPointContact {
    pub id: ContactId,
    pub surface1: ContactSurfaceIndex,
    pub surface2: ContactSurfaceIndex,
    /// Frame at the midpoint of the overlap: z is the normal from surface 1
    /// toward surface 2, x the direction of the larger effective radius.
    pub frame: DAffine3,
    /// Larger effective radius (along frame x).
    pub radius_max: f64,
    /// Smaller effective radius (along frame y).
    pub radius_min: f64,
    pub depth: f64,
}

impl EllipticalPointContact {
    pub const TYPE_ID: ContactTypeId = ContactTypeId::new(2);

    /// Build the contact from an origin, normal and major-axis direction.
    ///
    /// The radii are swapped (and the axes rotated) if given in the wrong order.
    pub fn new(
        id: ContactId,
        surfaces: (ContactSurfaceIndex, ContactSurfaceIndex),
        origin: DVec3,
        normal: DVec3,
        major_axis: DVec3,
        radii: (f64, f64),
        depth: f64,
    ) -> Self {
        let z = normal.normalize_or_zero();
        let mut x = (major_axis - z * major_axis.dot(z)).normalize_or_zero();
        if x == DVec3::ZERO {
            x = z.any_orthonormal_vector();
        }
        let mut y = z.cross(x);
        let (mut radius_max, mut radius_min) = radii;
        if radius_min > radius_max {
            std::mem::swap(&mut radius_max, &mut radius_min);
            (x, y) = (y, -x);
        }
        Self {
            id,
            surface1: surfaces.0,
            surface2: surfaces.1,
            frame: DAffine3::from_mat3_translation(DMat3::from_cols(x, y, z), origin),
            radius_max,
            radius_min,
            depth,
        }
    }

    pub fn origin(&self) -> DVec3 {
        self.frame.translation
    }

    pub fn normal(&self) -> DVec3 {
        self.frame.matrix3.z_axis
    }

    pub fn validate(&self) -> Result<()> {
        check_normal(self.id, self.normal())?;
        check_radius(self.id, self.radius_min)?;
        check_depth(self.id, self.depth)
    }
}

impl Contact for EllipticalPointContact {
    fn contact_id(&self) -> ContactId {
        self.id
    }

    fn contact_type_id(&self) -> ContactTypeId {
        Self::TYPE_ID
    }

    fn surfaces(&self) -> (ContactSurfaceIndex, ContactSurfaceIndex) {
        (self.surface1, self.surface2)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One mesh face of surface 1 that penetrates surface 2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshFaceOverlap {
    pub face: u32,
    /// Face centroid (ground).
    pub centroid: DVec3,
    /// Unit normal pointing from surface 1 toward surface 2 (ground).
    pub normal: DVec3,
    pub area: f64,
    pub depth: f64,
}

impl MeshFaceOverlap {
    /// Face overlap with the normal scaled to unit length.
    pub fn new(face: u32, centroid: DVec3, normal: DVec3, area: f64, depth: f64) -> Self {
        Self {
            face,
            centroid,
            normal: normal.normalize_or_zero(),
            area,
            depth,
        }
    }

    fn validate(&self, id: ContactId) -> Result<()> {
        check_normal(id, self.normal)?;
        check_depth(id, self.depth)?;
        if !(self.area.is_finite() && self.area >= 0.0) {
            return Err(ContactError::invalid_argument(format!(
                "contact {id} face {} area must be nonnegative, got {}",
                self.face, self.area
            )));
        }
        Ok(())
    }
}

/// A triangle mesh (surface 1) overlapping another surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMeshContact {
    pub id: ContactId,
    pub surface1: ContactSurfaceIndex,
    pub surface2: ContactSurfaceIndex,
    pub faces: Vec<MeshFaceOverlap>,
}

impl TriangleMeshContact {
    pub const TYPE_ID: ContactTypeId = ContactTypeId::new(3);

    pub fn new(
        id: ContactId,
        surfaces: (ContactSurfaceIndex, ContactSurfaceIndex),
        mut faces: Vec<MeshFaceOverlap>,
    ) -> Self {
        for face in &mut faces {
            face.normal = face.normal.normalize_or_zero();
        }
        Self {
            id,
            surface1: surfaces.0,
            surface2: surfaces.1,
            faces,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.faces.iter().try_for_each(|face| face.validate(self.id))
    }
}

impl Contact for TriangleMeshContact {
    fn contact_id(&self) -> ContactId {
        self.id
    }

    fn contact_type_id(&self) -> ContactTypeId {
        Self::TYPE_ID
    }

    fn surfaces(&self) -> (ContactSurfaceIndex, ContactSurfaceIndex) {
        (self.surface1, self.surface2)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
