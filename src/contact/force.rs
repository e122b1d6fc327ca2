//! Contact force results: the per-contact resultant and the detailed patch.

use std::fmt;

use glam::{DAffine3, DVec2, DVec3};

use crate::spatial::SpatialVec;

use super::types::ContactId;

/// Resultant of one contact interaction between surfaces S1 and S2.
///
/// Equal and opposite forces are applied at the center of pressure: the
/// stored force and moment act on surface 2; negate them for surface 1.
/// Every contact, however complex, reduces to one of these, which is all a
/// simulation needs to advance.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContactForce {
    /// Contact that produced this force; `None` marks an invalid record.
    pub contact_id: Option<ContactId>,
    /// Center of pressure in ground.
    pub center_of_pressure: DVec3,
    /// Moment and force on surface 2, applied at the center of pressure.
    pub force_on_surface2: SpatialVec,
    /// Elastic energy stored in the deformation (>= 0).
    pub potential_energy: f64,
    /// Rate of energy dissipation; > 0 means energy is leaving the system.
    pub power: f64,
}

impl ContactForce {
    /// A valid record for `contact_id` with no force, energy or power.
    pub fn zero(contact_id: ContactId) -> Self {
        Self {
            contact_id: Some(contact_id),
            ..Self::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.contact_id.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Moment and force on surface 2 taken about `point` instead of the
    /// center of pressure.
    pub fn force_about(&self, point: DVec3) -> SpatialVec {
        self.force_on_surface2
            .shift_force(self.center_of_pressure, point)
    }
}

impl fmt::Display for ContactForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.contact_id {
            Some(id) => writeln!(f, "ContactForce for ContactId {id} (ground frame):")?,
            None => writeln!(f, "ContactForce (invalid) (ground frame):")?,
        }
        writeln!(f, "  ctr of pressure={}", self.center_of_pressure)?;
        writeln!(
            f,
            "  force on surf2 =[{}, {}]",
            self.force_on_surface2.angular, self.force_on_surface2.linear
        )?;
        writeln!(
            f,
            "  pot. energy={}  power={}",
            self.potential_energy, self.power
        )
    }
}

/// Geometry and force of one element of a contact patch.
///
/// The element frame P has its origin at the point of application, z along
/// the local normal pointing from surface 1 toward surface 2, and x/y along
/// the long/short directions of the element where that is meaningful.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactDetail {
    pub element_id: u32,
    /// Element frame in ground (X_GP).
    pub patch_frame: DAffine3,
    /// Half dimensions along P's x and y, x >= y >= 0.
    pub patch_half_dimensions: DVec2,
    /// Deformation of surface 1 and surface 2 along -z and +z (>= 0).
    pub deformations: DVec2,
    /// Rates of the deformations; > 0 means compressing.
    pub deformation_rates: DVec2,
    /// Moment and force on surface 2 at P's origin, expressed in P.
    pub force_on_surface2: SpatialVec,
    pub potential_energy: f64,
    pub power: f64,
}

impl ContactDetail {
    /// Point of application in ground.
    pub fn origin(&self) -> DVec3 {
        self.patch_frame.translation
    }

    /// Moment and force on surface 2 at the element origin, in ground.
    pub fn force_in_ground(&self) -> SpatialVec {
        let r = self.patch_frame.matrix3;
        SpatialVec::new(
            r * self.force_on_surface2.angular,
            r * self.force_on_surface2.linear,
        )
    }
}

/// Detailed description of one compliant contact.
///
/// A Hertz contact has one element; an elastic foundation contact has one per
/// participating mesh face.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContactPatch {
    pub resultant: ContactForce,
    pub elements: Vec<ContactDetail>,
}

impl ContactPatch {
    /// Resultant moment and force on surface 2 about `point`.
    pub fn resultant_about(&self, point: DVec3) -> SpatialVec {
        self.resultant.force_about(point)
    }

    /// Sum of all element forces and moments about `point`.
    ///
    /// Agrees with [`ContactPatch::resultant_about`] for any correct patch.
    pub fn elements_about(&self, point: DVec3) -> SpatialVec {
        self.elements.iter().fold(SpatialVec::ZERO, |acc, e| {
            acc + e.force_in_ground().shift_force(e.origin(), point)
        })
    }
}

/// Normal-force contribution at one point, used to locate the center of
/// pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalContribution {
    pub point: DVec3,
    pub normal_force: DVec3,
}

/// Locate the center of pressure of a set of normal-force contributions.
///
/// ```text
///         sum_i r_i |r_i x Fn_i|
///   r_c = ----------------------
///           sum_i |r_i x Fn_i|
/// ```
///
/// Only normal ("pressure") forces take part; friction and pure moments do
/// not. When every weight vanishes (all lines of action pass through the
/// origin) the points are weighted by `|Fn_i|` instead, and when those vanish
/// too the plain centroid is returned. `None` only for an empty input.
pub fn center_of_pressure(contributions: &[NormalContribution]) -> Option<DVec3> {
    if contributions.is_empty() {
        return None;
    }
    weighted_mean(contributions, |c| c.point.cross(c.normal_force).length())
        .or_else(|| weighted_mean(contributions, |c| c.normal_force.length()))
        .or_else(|| weighted_mean(contributions, |_| 1.0))
}

fn weighted_mean(
    contributions: &[NormalContribution],
    weight: impl Fn(&NormalContribution) -> f64,
) -> Option<DVec3> {
    let mut sum = DVec3::ZERO;
    let mut total = 0.0;
    for c in contributions {
        let w = weight(c);
        sum += c.point * w;
        total += w;
    }
    (total > 0.0 && total.is_finite()).then(|| sum / total)
}
