//! Surface materials and the rules for combining two of them.
//!
//! A [`ContactMaterial`] describes one deformable surface. Force laws never
//! use a single material directly; they combine the two surfaces of a
//! contact with [`HertzMaterialPair`] (point contacts) or
//! [`LayerMaterialPair`] (elastic foundation).

use crate::error::{ContactError, Result};

use super::types::BodyIndex;

/// Elastic, dissipative and frictional properties of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactMaterial {
    /// Plane-strain stiffness `E / (1 - ν²)` in pascals.
    pub stiffness: f64,
    /// Hunt–Crossley dissipation coefficient in s/m.
    pub dissipation: f64,
    /// Static friction coefficient (dimensionless).
    pub static_friction: f64,
    /// Dynamic friction coefficient (dimensionless), never above static.
    pub dynamic_friction: f64,
    /// Viscous friction coefficient in s/m.
    pub viscous_friction: f64,
}

impl Default for ContactMaterial {
    fn default() -> Self {
        Self {
            stiffness: 1.0e6,
            dissipation: 0.0,
            static_friction: 0.0,
            dynamic_friction: 0.0,
            viscous_friction: 0.0,
        }
    }
}

impl ContactMaterial {
    /// Create a validated material.
    pub fn new(
        stiffness: f64,
        dissipation: f64,
        static_friction: f64,
        dynamic_friction: f64,
        viscous_friction: f64,
    ) -> Result<Self> {
        let material = Self {
            stiffness,
            dissipation,
            static_friction,
            dynamic_friction,
            viscous_friction,
        };
        material.validate()?;
        Ok(material)
    }

    /// Create a material from Young's modulus and Poisson's ratio.
    pub fn from_youngs_modulus(
        youngs_modulus: f64,
        poissons_ratio: f64,
        dissipation: f64,
        static_friction: f64,
        dynamic_friction: f64,
        viscous_friction: f64,
    ) -> Result<Self> {
        if !(0.0..0.5).contains(&poissons_ratio) {
            return Err(ContactError::invalid_argument(format!(
                "poisson's ratio {poissons_ratio} outside [0, 0.5)"
            )));
        }
        Self::new(
            plane_strain_stiffness(youngs_modulus, poissons_ratio),
            dissipation,
            static_friction,
            dynamic_friction,
            viscous_friction,
        )
    }

    /// Check the physical constraints on the coefficients.
    pub fn validate(&self) -> Result<()> {
        if !(self.stiffness.is_finite() && self.stiffness > 0.0) {
            return Err(ContactError::invalid_argument(format!(
                "stiffness must be positive, got {}",
                self.stiffness
            )));
        }
        for (name, value) in [
            ("dissipation", self.dissipation),
            ("static friction", self.static_friction),
            ("dynamic friction", self.dynamic_friction),
            ("viscous friction", self.viscous_friction),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ContactError::invalid_argument(format!(
                    "{name} must be nonnegative, got {value}"
                )));
            }
        }
        if self.dynamic_friction > self.static_friction {
            return Err(ContactError::invalid_argument(format!(
                "dynamic friction {} exceeds static friction {}",
                self.dynamic_friction, self.static_friction
            )));
        }
        Ok(())
    }

    /// Stiff steel-like surface with light damping.
    pub fn steel() -> Self {
        Self {
            stiffness: plane_strain_stiffness(200.0e9, 0.3),
            dissipation: 0.01,
            static_friction: 0.8,
            dynamic_friction: 0.6,
            viscous_friction: 0.0,
        }
    }

    /// Soft rubber-like surface with heavy damping.
    pub fn rubber() -> Self {
        Self {
            stiffness: plane_strain_stiffness(0.01e9, 0.49),
            dissipation: 0.5,
            static_friction: 1.0,
            dynamic_friction: 0.8,
            viscous_friction: 0.0,
        }
    }
}

/// `E / (1 - ν²)`.
pub fn plane_strain_stiffness(youngs_modulus: f64, poissons_ratio: f64) -> f64 {
    youngs_modulus / (1.0 - poissons_ratio * poissons_ratio)
}

/// A deformable surface mounted on a rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSurface {
    /// Body carrying the surface.
    pub body: BodyIndex,
    pub material: ContactMaterial,
    /// Depth of the elastic layer, used by the elastic foundation law (m).
    pub thickness: f64,
}

impl ContactSurface {
    pub fn new(body: BodyIndex, material: ContactMaterial) -> Self {
        Self {
            body,
            material,
            thickness: 1.0,
        }
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }
}

/// Friction coefficients of a surface pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrictionCoefficients {
    pub static_friction: f64,
    pub dynamic_friction: f64,
    pub viscous_friction: f64,
}

impl FrictionCoefficients {
    /// Combine two materials' coefficients pairwise as `2ab / (a + b)`.
    pub fn combine(m1: &ContactMaterial, m2: &ContactMaterial) -> Self {
        Self {
            static_friction: combine_coefficient(m1.static_friction, m2.static_friction),
            dynamic_friction: combine_coefficient(m1.dynamic_friction, m2.dynamic_friction),
            viscous_friction: combine_coefficient(m1.viscous_friction, m2.viscous_friction),
        }
    }
}

fn combine_coefficient(a: f64, b: f64) -> f64 {
    let sum = a + b;
    if sum == 0.0 {
        0.0
    } else {
        2.0 * a * b / sum
    }
}

/// Two materials combined for a Hertz point contact.
///
/// The overlap `d` is split between the surfaces so that each carries the
/// same force: surface 1 deforms by `s1·d` and surface 2 by `s2·d`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HertzMaterialPair {
    /// Fraction of the overlap taken up by surface 1.
    pub s1: f64,
    /// Fraction of the overlap taken up by surface 2.
    pub s2: f64,
    /// Effective stiffness `k1·s1^(3/2)` (equal to `k2·s2^(3/2)`).
    pub stiffness: f64,
    /// Effective dissipation `c1·s1 + c2·s2`.
    pub dissipation: f64,
    pub friction: FrictionCoefficients,
}

impl HertzMaterialPair {
    pub fn new(m1: &ContactMaterial, m2: &ContactMaterial) -> Self {
        let k1 = m1.stiffness.powf(2.0 / 3.0);
        let k2 = m2.stiffness.powf(2.0 / 3.0);
        let s1 = k2 / (k1 + k2);
        let s2 = 1.0 - s1;
        Self {
            s1,
            s2,
            stiffness: m1.stiffness * s1.powf(1.5),
            dissipation: m1.dissipation * s1 + m2.dissipation * s2,
            friction: FrictionCoefficients::combine(m1, m2),
        }
    }
}

/// Two elastic layers acting as springs in series, per unit area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerMaterialPair {
    /// Fraction of the overlap taken up by surface 1.
    pub s1: f64,
    /// Fraction of the overlap taken up by surface 2.
    pub s2: f64,
    /// Pressure per unit overlap, `1 / (h1/k1 + h2/k2)` (Pa/m).
    pub stiffness: f64,
    /// Effective dissipation `c1·s1 + c2·s2`.
    pub dissipation: f64,
    pub friction: FrictionCoefficients,
}

impl LayerMaterialPair {
    pub fn new(surf1: &ContactSurface, surf2: &ContactSurface) -> Self {
        let compliance1 = surf1.thickness / surf1.material.stiffness;
        let compliance2 = surf2.thickness / surf2.material.stiffness;
        let total = compliance1 + compliance2;
        let s1 = compliance1 / total;
        let s2 = 1.0 - s1;
        Self {
            s1,
            s2,
            stiffness: 1.0 / total,
            dissipation: surf1.material.dissipation * s1 + surf2.material.dissipation * s2,
            friction: FrictionCoefficients::combine(&surf1.material, &surf2.material),
        }
    }
}
