//! Elastic foundation model for mesh contacts.
//!
//! Each penetrating face of the mesh is an independent spring of area `A`
//! pressing on a thin elastic layer. With the layer stiffness `kA` from
//! [`LayerMaterialPair`]:
//!
//! ```text
//! fe = kA · A · d
//! fN = max(0, fe · (1 + c · ḋ))
//! PE = ½ · kA · A · d²
//! ```
//!
//! The face forces are summed into one resultant at the center of pressure.

use glam::{DVec2, DVec3};
use tracing::warn;

use crate::contact::force::{center_of_pressure, ContactDetail, ContactForce, ContactPatch, NormalContribution};
use crate::contact::friction::StribeckFriction;
use crate::contact::material::LayerMaterialPair;
use crate::contact::overlap::{downcast_contact, Contact, MeshFaceOverlap, TriangleMeshContact};
use crate::contact::types::{ContactId, ContactTypeId};
use crate::error::Result;
use crate::spatial::SpatialVec;

use super::{frame_from_normal, to_frame, ForceGenerator, GeneratorContext};

/// Force on one mesh face.
#[derive(Debug, Clone, Copy)]
struct FaceLoad {
    face: MeshFaceOverlap,
    point: DVec3,
    normal_force: f64,
    /// Total force on surface 2 (ground).
    force: DVec3,
    depth_rate: f64,
    potential_energy: f64,
    power: f64,
}

fn face_load(
    id: ContactId,
    pair: &LayerMaterialPair,
    friction: &StribeckFriction,
    face: &MeshFaceOverlap,
    v1: &SpatialVec,
    v2: &SpatialVec,
) -> FaceLoad {
    let n = face.normal;
    let d = face.depth;
    // The centroid lies on the undeformed mesh; the mesh gives way by s1·d.
    let point = face.centroid - n * (pair.s1 * d);

    let v_rel = v2.station_velocity(point) - v1.station_velocity(point);
    let v_normal = v_rel.dot(n);
    let depth_rate = -v_normal;
    let slip = v_rel - n * v_normal;

    let elastic = pair.stiffness * face.area * d;
    let damped = elastic * (1.0 + pair.dissipation * depth_rate);
    if damped < 0.0 {
        warn!(contact = %id, face = face.face, normal_force = damped, "clamping negative face force to zero");
    }
    let normal_force = damped.max(0.0);
    let force = n * normal_force + friction.force(slip, normal_force);

    FaceLoad {
        face: *face,
        point,
        normal_force,
        force,
        depth_rate,
        potential_energy: 0.5 * elastic * d,
        power: -force.dot(v_rel) - elastic * depth_rate,
    }
}

/// All face loads of one mesh contact and their resultant.
#[derive(Debug, Clone)]
struct MeshLoad {
    pair: LayerMaterialPair,
    faces: Vec<FaceLoad>,
    resultant: ContactForce,
}

/// Elastic foundation law for [`TriangleMeshContact`] overlaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElasticFoundation;

impl ElasticFoundation {
    fn mesh_load(
        &self,
        ctx: &GeneratorContext<'_>,
        contact: &dyn Contact,
        v1: &SpatialVec,
        v2: &SpatialVec,
    ) -> Result<MeshLoad> {
        let mesh = downcast_contact::<TriangleMeshContact>(contact, self.contact_type_id())?;
        mesh.validate()?;
        let (surf1, surf2) = ctx.surfaces(contact)?;
        let pair = LayerMaterialPair::new(surf1, surf2);
        let friction = StribeckFriction::new(pair.friction, ctx.transition_velocity);

        let loads: Vec<FaceLoad> = mesh
            .faces
            .iter()
            .filter(|face| face.depth > 0.0 && face.area > 0.0)
            .map(|face| face_load(mesh.id, &pair, &friction, face, v1, v2))
            .collect();

        let contributions: Vec<NormalContribution> = loads
            .iter()
            .map(|load| NormalContribution {
                point: load.point,
                normal_force: load.face.normal * load.normal_force,
            })
            .collect();
        let Some(center) = center_of_pressure(&contributions) else {
            return Ok(MeshLoad {
                pair,
                faces: loads,
                resultant: ContactForce::zero(mesh.id),
            });
        };

        let mut resultant = ContactForce {
            center_of_pressure: center,
            ..ContactForce::zero(mesh.id)
        };
        for load in &loads {
            resultant.force_on_surface2 +=
                SpatialVec::new(DVec3::ZERO, load.force).shift_force(load.point, center);
            resultant.potential_energy += load.potential_energy;
            resultant.power += load.power;
        }
        Ok(MeshLoad {
            pair,
            faces: loads,
            resultant,
        })
    }
}

impl ForceGenerator for ElasticFoundation {
    fn contact_type_id(&self) -> ContactTypeId {
        TriangleMeshContact::TYPE_ID
    }

    fn name(&self) -> &'static str {
        "ElasticFoundation"
    }

    fn calc_contact_force(
        &self,
        ctx: &GeneratorContext<'_>,
        contact: &dyn Contact,
        v1: &SpatialVec,
        v2: &SpatialVec,
    ) -> Result<ContactForce> {
        Ok(self.mesh_load(ctx, contact, v1, v2)?.resultant)
    }

    fn calc_contact_patch(
        &self,
        ctx: &GeneratorContext<'_>,
        contact: &dyn Contact,
        v1: &SpatialVec,
        v2: &SpatialVec,
    ) -> Result<ContactPatch> {
        let MeshLoad {
            pair,
            faces,
            resultant,
        } = self.mesh_load(ctx, contact, v1, v2)?;
        let elements = faces
            .iter()
            .map(|load| {
                let frame = frame_from_normal(load.point, load.face.normal);
                let radius = (load.face.area / std::f64::consts::PI).sqrt();
                ContactDetail {
                    element_id: load.face.face,
                    patch_frame: frame,
                    patch_half_dimensions: DVec2::splat(radius),
                    deformations: DVec2::new(pair.s1, pair.s2) * load.face.depth,
                    deformation_rates: DVec2::new(pair.s1, pair.s2) * load.depth_rate,
                    force_on_surface2: SpatialVec::new(DVec3::ZERO, to_frame(&frame, load.force)),
                    potential_energy: load.potential_energy,
                    power: load.power,
                }
            })
            .collect();
        Ok(ContactPatch { resultant, elements })
    }
}
