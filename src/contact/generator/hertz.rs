//! Hertz point-contact generators with Hunt–Crossley dissipation.
//!
//! For an overlap of depth `d` between surfaces with combined stiffness `k`
//! and effective radius `R`:
//!
//! ```text
//! fH = 4/3 · k · √R · d^(3/2)            elastic force
//! fN = max(0, fH · (1 + 3/2 · c · ḋ))    with dissipation c and closing rate ḋ
//! PE = 2/5 · d · fH                      integral of fH over d
//! ```
//!
//! Friction follows [`StribeckFriction`] on the tangential slip at the
//! contact point. The force acts at `origin + (½ − s1)·d·n`, the point where
//! the two deformed surfaces meet.

use glam::{DAffine3, DVec2, DVec3};
use tracing::warn;

use crate::contact::force::{ContactDetail, ContactForce, ContactPatch};
use crate::contact::friction::StribeckFriction;
use crate::contact::material::HertzMaterialPair;
use crate::contact::overlap::{downcast_contact, CircularPointContact, Contact, EllipticalPointContact};
use crate::contact::types::{ContactId, ContactTypeId};
use crate::error::Result;
use crate::spatial::SpatialVec;

use super::{frame_from_normal, to_frame, ForceGenerator, GeneratorContext};

/// Geometry of a point overlap, common to circular and elliptical contacts.
#[derive(Debug, Clone, Copy)]
struct PointOverlap {
    id: ContactId,
    origin: DVec3,
    normal: DVec3,
    radius: f64,
    depth: f64,
}

/// Evaluated point law.
#[derive(Debug, Clone, Copy)]
struct PointLoad {
    point: DVec3,
    /// Force on surface 2 (ground).
    force: DVec3,
    depth: f64,
    /// Closing rate ḋ, > 0 while compressing.
    depth_rate: f64,
    potential_energy: f64,
    power: f64,
}

impl PointLoad {
    fn resultant(&self, id: ContactId) -> ContactForce {
        ContactForce {
            contact_id: Some(id),
            center_of_pressure: self.point,
            force_on_surface2: SpatialVec::new(DVec3::ZERO, self.force),
            potential_energy: self.potential_energy,
            power: self.power,
        }
    }

    /// The single patch element, given the element frame at the contact point.
    fn detail(&self, pair: &HertzMaterialPair, frame: DAffine3, half_dimensions: DVec2) -> ContactDetail {
        ContactDetail {
            element_id: 0,
            patch_frame: frame,
            patch_half_dimensions: half_dimensions,
            deformations: DVec2::new(pair.s1, pair.s2) * self.depth,
            deformation_rates: DVec2::new(pair.s1, pair.s2) * self.depth_rate,
            force_on_surface2: SpatialVec::new(DVec3::ZERO, to_frame(&frame, self.force)),
            potential_energy: self.potential_energy,
            power: self.power,
        }
    }
}

fn point_load(
    pair: &HertzMaterialPair,
    overlap: &PointOverlap,
    friction: &StribeckFriction,
    v1: &SpatialVec,
    v2: &SpatialVec,
) -> PointLoad {
    let d = overlap.depth.max(0.0);
    let n = overlap.normal;
    let point = overlap.origin + n * ((0.5 - pair.s1) * d);

    let v_rel = v2.station_velocity(point) - v1.station_velocity(point);
    let v_normal = v_rel.dot(n);
    let depth_rate = -v_normal;
    let slip = v_rel - n * v_normal;

    let elastic = 4.0 / 3.0 * pair.stiffness * overlap.radius.sqrt() * d.powf(1.5);
    let hunt_crossley = elastic * (1.0 + 1.5 * pair.dissipation * depth_rate);
    if hunt_crossley < 0.0 {
        warn!(
            contact = %overlap.id,
            normal_force = hunt_crossley,
            "surfaces separating faster than they can relax; clamping normal force to zero"
        );
    }
    let normal_force = hunt_crossley.max(0.0);
    let force = n * normal_force + friction.force(slip, normal_force);

    PointLoad {
        point,
        force,
        depth: d,
        depth_rate,
        potential_energy: 0.4 * d * elastic,
        // Energy leaving the bodies that is not stored elastically.
        power: -force.dot(v_rel) - elastic * depth_rate,
    }
}

fn hertz_pair(ctx: &GeneratorContext<'_>, contact: &dyn Contact) -> Result<(HertzMaterialPair, StribeckFriction)> {
    let (surf1, surf2) = ctx.surfaces(contact)?;
    let pair = HertzMaterialPair::new(&surf1.material, &surf2.material);
    let friction = StribeckFriction::new(pair.friction, ctx.transition_velocity);
    Ok((pair, friction))
}

/// Hertz law for [`CircularPointContact`] overlaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct HertzCircular;

impl HertzCircular {
    fn overlap(contact: &CircularPointContact) -> PointOverlap {
        PointOverlap {
            id: contact.id,
            origin: contact.origin,
            normal: contact.normal,
            radius: contact.radius,
            depth: contact.depth,
        }
    }
}

impl ForceGenerator for HertzCircular {
    fn contact_type_id(&self) -> ContactTypeId {
        CircularPointContact::TYPE_ID
    }

    fn name(&self) -> &'static str {
        "HertzCircular"
    }

    fn calc_contact_force(
        &self,
        ctx: &GeneratorContext<'_>,
        contact: &dyn Contact,
        v1: &SpatialVec,
        v2: &SpatialVec,
    ) -> Result<ContactForce> {
        let circular = downcast_contact::<CircularPointContact>(contact, self.contact_type_id())?;
        circular.validate()?;
        let (pair, friction) = hertz_pair(ctx, contact)?;
        let load = point_load(&pair, &Self::overlap(circular), &friction, v1, v2);
        Ok(load.resultant(circular.id))
    }

    fn calc_contact_patch(
        &self,
        ctx: &GeneratorContext<'_>,
        contact: &dyn Contact,
        v1: &SpatialVec,
        v2: &SpatialVec,
    ) -> Result<ContactPatch> {
        let circular = downcast_contact::<CircularPointContact>(contact, self.contact_type_id())?;
        circular.validate()?;
        let (pair, friction) = hertz_pair(ctx, contact)?;
        let load = point_load(&pair, &Self::overlap(circular), &friction, v1, v2);

        let a = (circular.radius * load.depth).sqrt();
        let frame = frame_from_normal(load.point, circular.normal);
        Ok(ContactPatch {
            resultant: load.resultant(circular.id),
            elements: vec![load.detail(&pair, frame, DVec2::splat(a))],
        })
    }
}

/// Hertz law for [`EllipticalPointContact`] overlaps.
///
/// Uses the equivalent radius `√(r_max·r_min)` for the force and reports an
/// elliptical patch with semi-axes `√(r_max·d)` and `√(r_min·d)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HertzElliptical;

impl HertzElliptical {
    fn overlap(contact: &EllipticalPointContact) -> PointOverlap {
        PointOverlap {
            id: contact.id,
            origin: contact.origin(),
            normal: contact.normal(),
            radius: (contact.radius_max * contact.radius_min).sqrt(),
            depth: contact.depth,
        }
    }
}

impl ForceGenerator for HertzElliptical {
    fn contact_type_id(&self) -> ContactTypeId {
        EllipticalPointContact::TYPE_ID
    }

    fn name(&self) -> &'static str {
        "HertzElliptical"
    }

    fn calc_contact_force(
        &self,
        ctx: &GeneratorContext<'_>,
        contact: &dyn Contact,
        v1: &SpatialVec,
        v2: &SpatialVec,
    ) -> Result<ContactForce> {
        let elliptical = downcast_contact::<EllipticalPointContact>(contact, self.contact_type_id())?;
        elliptical.validate()?;
        let (pair, friction) = hertz_pair(ctx, contact)?;
        let load = point_load(&pair, &Self::overlap(elliptical), &friction, v1, v2);
        Ok(load.resultant(elliptical.id))
    }

    fn calc_contact_patch(
        &self,
        ctx: &GeneratorContext<'_>,
        contact: &dyn Contact,
        v1: &SpatialVec,
        v2: &SpatialVec,
    ) -> Result<ContactPatch> {
        let elliptical = downcast_contact::<EllipticalPointContact>(contact, self.contact_type_id())?;
        elliptical.validate()?;
        let (pair, friction) = hertz_pair(ctx, contact)?;
        let load = point_load(&pair, &Self::overlap(elliptical), &friction, v1, v2);

        let frame = DAffine3::from_mat3_translation(elliptical.frame.matrix3, load.point);
        let half_dimensions = DVec2::new(
            (elliptical.radius_max * load.depth).sqrt(),
            (elliptical.radius_min * load.depth).sqrt(),
        );
        Ok(ContactPatch {
            resultant: load.resultant(elliptical.id),
            elements: vec![load.detail(&pair, frame, half_dimensions)],
        })
    }
}
