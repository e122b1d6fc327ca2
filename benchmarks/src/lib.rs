//! Scene builders shared by the contact benchmarks.

use rein_contact::contact::{BodyIndex, MeshFaceOverlap};
use rein_contact::glam::DVec3;
use rein_contact::{
    CircularPointContact, CompliantContactSubsystem, ContactId, ContactMaterial, ContactSnapshot,
    ContactSurface, ContactSurfaceIndex, EllipticalPointContact, SpatialVec, Stage, State,
    TriangleMeshContact,
};

/// Ground surface index in every scene.
pub const GROUND: ContactSurfaceIndex = ContactSurfaceIndex(0);

/// Deterministic pseudo-random value in `[0, 1)` for index `i`.
pub fn hash01(i: usize) -> f64 {
    let mut x = (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    x ^= x >> 29;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 32;
    (x >> 11) as f64 / (1u64 << 53) as f64
}

/// `n` balls resting on the ground, each sliding and spinning a little.
pub fn setup_ball_pile(n: usize) -> anyhow::Result<ContactSnapshot> {
    let mut tracker = ContactSnapshot::new();
    tracker.add_surface(ContactSurface::new(BodyIndex(0), ContactMaterial::steel()));
    for i in 0..n {
        let ball = tracker.add_surface(ContactSurface::new(BodyIndex(i + 1), ContactMaterial::rubber()));
        let x = (i % 32) as f64 * 0.25;
        let z = (i / 32) as f64 * 0.25;
        let depth = 1e-4 + 1e-3 * hash01(i);
        let contact_id = ContactId(i as u64);
        if i % 2 == 0 {
            tracker.push_contact(CircularPointContact::new(
                contact_id,
                (GROUND, ball),
                DVec3::new(x, -depth / 2.0, z),
                DVec3::Y,
                0.1,
                depth,
            ));
        } else {
            tracker.push_contact(EllipticalPointContact::new(
                contact_id,
                (GROUND, ball),
                DVec3::new(x, -depth / 2.0, z),
                DVec3::Y,
                DVec3::X,
                (0.2, 0.05),
                depth,
            ));
        }
        let velocity = SpatialVec::new(
            DVec3::new(0.0, hash01(i + n) - 0.5, 0.0),
            DVec3::new(0.1 * hash01(i + 2 * n), -0.05, 0.0),
        );
        tracker.set_surface_velocity(ball, velocity)?;
    }
    Ok(tracker)
}

/// One mesh with `faces` penetrating faces pressed onto the ground.
pub fn setup_mesh_contact(faces: usize) -> anyhow::Result<ContactSnapshot> {
    let mut tracker = ContactSnapshot::new();
    tracker.add_surface(ContactSurface::new(BodyIndex(0), ContactMaterial::steel()).with_thickness(0.01));
    let mesh = tracker.add_surface(ContactSurface::new(BodyIndex(1), ContactMaterial::rubber()).with_thickness(0.01));
    let side = (faces as f64).sqrt().ceil() as usize;
    let overlaps = (0..faces)
        .map(|i| MeshFaceOverlap {
            face: i as u32,
            centroid: DVec3::new((i % side) as f64 * 0.01, 0.0, (i / side) as f64 * 0.01),
            normal: DVec3::NEG_Y,
            area: 5e-5,
            depth: 1e-4 * (1.0 + hash01(i)),
        })
        .collect();
    tracker.push_contact(TriangleMeshContact::new(ContactId(0), (mesh, GROUND), overlaps));
    tracker.set_surface_velocity(mesh, SpatialVec::new(DVec3::Y * 0.3, DVec3::new(0.02, -0.01, 0.0)))?;
    Ok(tracker)
}

/// A state realized through [`Stage::Velocity`] with the subsystem's
/// variables allocated.
pub fn velocity_state(subsystem: &mut CompliantContactSubsystem<ContactSnapshot>) -> anyhow::Result<State> {
    let mut state = State::new();
    subsystem.realize_model(&mut state)?;
    state.realize(Stage::Velocity);
    Ok(state)
}
