//! Identifiers shared by overlaps, generators and results.

use std::fmt;

/// Structural kind of an overlap (point-vs-point, mesh-vs-anything, ...).
///
/// `ContactTypeId(0)` is reserved for fallback generators that answer for
/// unrecognized types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContactTypeId(u32);

impl ContactTypeId {
    /// The reserved "no specific generator" type.
    pub const DEFAULT: Self = Self(0);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_default(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ContactTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one tracked overlap, stable for as long as the overlap persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContactId(pub u64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a contact surface known to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContactSurfaceIndex(pub usize);

/// Index of the rigid body a surface is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyIndex(pub usize);
