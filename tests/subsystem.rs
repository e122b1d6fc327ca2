//! End-to-end scenarios for the compliant contact subsystem.

use approx::assert_relative_eq;
use rein_contact::contact::{BodyIndex, DoNothing, HertzCircular, MeshFaceOverlap, ThrowError};
use rein_contact::glam::DVec3;
use rein_contact::{
    CircularPointContact, CompliantContactSubsystem, ContactError, ContactForce, ContactId,
    ContactMaterial, ContactPatch, ContactSnapshot, ContactSurface, ContactSurfaceIndex,
    ContactTypeId, EllipticalPointContact, ForceGenerator, GeneratorContext, SpatialVec, Stage,
    State, TriangleMeshContact,
};

const GROUND: ContactSurfaceIndex = ContactSurfaceIndex(0);
const BALL: ContactSurfaceIndex = ContactSurfaceIndex(1);

fn ball_tracker() -> ContactSnapshot {
    let mut tracker = ContactSnapshot::new();
    let material = ContactMaterial::new(1e7, 0.5, 0.8, 0.5, 0.0).unwrap();
    tracker.add_surface(ContactSurface::new(BodyIndex(0), material));
    tracker.add_surface(ContactSurface::new(BodyIndex(1), material));
    tracker
}

fn ball_contact(height: f64, radius: f64) -> CircularPointContact {
    CircularPointContact::new(
        ContactId(1),
        (GROUND, BALL),
        DVec3::new(0.0, height / 2.0 - radius / 2.0, 0.0),
        DVec3::Y,
        radius,
        radius - height,
    )
}

/// Ball dropped on the ground, integrated with explicit Euler. The
/// dissipated energy never decreases and the ball loses energy on impact.
#[test]
fn test_bouncing_ball_energy_monotonic() -> anyhow::Result<()> {
    let mass = 1.0;
    let radius = 0.1;
    let gravity = -9.81;
    let dt = 1e-5;

    let mut subsystem = CompliantContactSubsystem::new(ball_tracker());
    let mut state = State::new();
    subsystem.realize_model(&mut state)?;
    state.realize(Stage::Model);
    assert_eq!(state.num_z(), 1);

    let mut height = 0.15;
    let mut velocity = 0.0;
    let mut previous = subsystem.dissipated_energy(&state)?;
    let mut touched = false;

    for step in 0..30_000 {
        state.set_time(step as f64 * dt);
        subsystem.tracker_mut().clear_contacts();
        if height < radius {
            touched = true;
            subsystem.tracker_mut().push_contact(ball_contact(height, radius));
        }
        state.realize(Stage::Position);
        subsystem
            .tracker_mut()
            .set_surface_velocity(BALL, SpatialVec::new(DVec3::ZERO, DVec3::Y * velocity))?;
        state.realize(Stage::Velocity);

        subsystem.evaluate(&state)?;
        let mut body_forces = vec![SpatialVec::ZERO; 2];
        subsystem.add_body_forces(&mut body_forces)?;
        subsystem.realize_acceleration(&mut state)?;

        let rate = subsystem.dissipation_rate()?;
        assert!(rate >= -1e-9, "negative dissipation {rate} at step {step}");
        let energy = previous + rate.max(0.0) * dt;
        subsystem.set_dissipated_energy(&mut state, energy)?;
        let current = subsystem.dissipated_energy(&state)?;
        assert!(current >= previous);
        previous = current;

        let force = body_forces[1].linear.y;
        velocity += (force / mass + gravity) * dt;
        height += velocity * dt;
    }

    assert!(touched);
    assert!(previous > 0.0, "impact dissipated no energy");

    // Mechanical energy went down by about what was booked as dissipated.
    let initial = mass * -gravity * 0.15;
    let final_mechanical = mass * -gravity * height + 0.5 * mass * velocity * velocity;
    assert!(final_mechanical < initial);
    Ok(())
}

#[test]
fn test_reset_dissipated_energy() -> anyhow::Result<()> {
    let mut subsystem = CompliantContactSubsystem::new(ball_tracker());
    let mut state = State::new();
    subsystem.realize_model(&mut state)?;
    state.realize(Stage::Model);

    subsystem.set_dissipated_energy(&mut state, 12.0)?;
    subsystem.set_dissipated_energy(&mut state, 0.0)?;
    assert_eq!(subsystem.dissipated_energy(&state)?, 0.0);
    assert!(matches!(
        subsystem.set_dissipated_energy(&mut state, -0.5),
        Err(ContactError::InvalidArgument(_))
    ));
    Ok(())
}

/// Reports a distinguishable power value.
#[derive(Debug)]
struct FixedPower(f64);

impl ForceGenerator for FixedPower {
    fn contact_type_id(&self) -> ContactTypeId {
        CircularPointContact::TYPE_ID
    }

    fn name(&self) -> &'static str {
        "FixedPower"
    }

    fn calc_contact_force(
        &self,
        _ctx: &GeneratorContext<'_>,
        contact: &dyn rein_contact::Contact,
        _v1: &SpatialVec,
        _v2: &SpatialVec,
    ) -> rein_contact::Result<ContactForce> {
        Ok(ContactForce {
            power: self.0,
            ..ContactForce::zero(contact.contact_id())
        })
    }

    fn calc_contact_patch(
        &self,
        ctx: &GeneratorContext<'_>,
        contact: &dyn rein_contact::Contact,
        v1: &SpatialVec,
        v2: &SpatialVec,
    ) -> rein_contact::Result<ContactPatch> {
        Ok(ContactPatch {
            resultant: self.calc_contact_force(ctx, contact, v1, v2)?,
            elements: Vec::new(),
        })
    }
}

fn velocity_state() -> State {
    let mut state = State::new();
    state.realize(Stage::Velocity);
    state
}

#[test]
fn test_replacing_builtin_generator() -> anyhow::Result<()> {
    let mut tracker = ball_tracker();
    tracker.push_contact(ball_contact(0.09, 0.1));
    let mut subsystem = CompliantContactSubsystem::new(tracker);
    let state = velocity_state();

    subsystem.evaluate(&state)?;
    assert!(subsystem.contact_force(0)?.potential_energy > 0.0);

    subsystem.registry_mut().register(FixedPower(3.0));
    subsystem.registry_mut().register(FixedPower(5.0));
    subsystem.evaluate(&state)?;
    let force = subsystem.contact_force(0)?;
    assert_eq!(force.power, 5.0);
    assert_eq!(force.potential_energy, 0.0);

    subsystem.registry_mut().register(HertzCircular);
    subsystem.evaluate(&state)?;
    assert!(subsystem.contact_force(0)?.potential_energy > 0.0);
    Ok(())
}

#[test]
fn test_unknown_type_uses_default() -> anyhow::Result<()> {
    let mut tracker = ball_tracker();
    tracker.push_contact(ball_contact(0.09, 0.1));
    let mut subsystem = CompliantContactSubsystem::empty(tracker);
    subsystem.registry_mut().register_default(DoNothing::default());
    let state = velocity_state();

    assert_eq!(subsystem.evaluate(&state)?, 1);
    assert_eq!(*subsystem.contact_force(0)?, ContactForce::zero(ContactId(1)));

    subsystem.registry_mut().register_default(ThrowError::default());
    assert!(matches!(
        subsystem.evaluate(&state),
        Err(ContactError::UnimplementedAlgorithm { .. })
    ));
    assert!(matches!(
        subsystem.calc_contact_patch_details(&state),
        Err(ContactError::UnimplementedAlgorithm { .. })
    ));
    Ok(())
}

#[test]
fn test_stage_errors() {
    let mut tracker = ball_tracker();
    tracker.push_contact(ball_contact(0.09, 0.1));
    let mut subsystem = CompliantContactSubsystem::new(tracker);

    let mut state = State::new();
    state.realize(Stage::Position);
    assert!(matches!(
        subsystem.evaluate(&state),
        Err(ContactError::InvalidState { required: Stage::Velocity, .. })
    ));
    assert_eq!(
        subsystem.calc_contact_patch_details(&state).unwrap_err(),
        ContactError::InvalidState {
            required: Stage::Velocity,
            actual: Stage::Position,
            what: "contact patch details",
        }
    );
    assert_eq!(
        subsystem.num_contact_forces().unwrap_err(),
        ContactError::NotEvaluated {
            what: "number of contact forces"
        }
    );
    assert_eq!(
        subsystem.dissipated_energy(&state).unwrap_err(),
        ContactError::InvalidState {
            required: Stage::Model,
            actual: Stage::Position,
            what: "dissipated energy",
        }
    );
}

#[test]
fn test_new_time_step_needs_new_evaluation() -> anyhow::Result<()> {
    let mut tracker = ball_tracker();
    tracker.push_contact(ball_contact(0.09, 0.1));
    tracker.set_surface_velocity(BALL, SpatialVec::new(DVec3::ZERO, DVec3::NEG_Y * 0.5))?;
    let mut subsystem = CompliantContactSubsystem::new(tracker);
    let mut state = State::new();
    subsystem.realize_model(&mut state)?;
    state.realize(Stage::Velocity);
    subsystem.evaluate(&state)?;
    assert!(subsystem.dissipation_rate()? > 0.0);

    state.set_time(1.0);
    assert!(matches!(
        subsystem.realize_acceleration(&mut state),
        Err(ContactError::InvalidState { required: Stage::Velocity, actual: Stage::Instance, .. })
    ));
    assert_eq!(state.stage(), Stage::Instance);

    // Neither a re-realized state nor a copy at another time matches the cache.
    let mut other = state.clone();
    state.realize(Stage::Velocity);
    other.set_time(2.0);
    other.realize(Stage::Velocity);
    assert!(subsystem.realize_acceleration(&mut state).is_err());
    assert!(subsystem.realize_acceleration(&mut other).is_err());

    subsystem.evaluate(&state)?;
    subsystem.realize_acceleration(&mut state)?;
    assert_eq!(state.stage(), Stage::Acceleration);
    Ok(())
}

#[test]
fn test_results_follow_tracker_order() -> anyhow::Result<()> {
    let mut tracker = ball_tracker();
    tracker.push_contact(TriangleMeshContact::new(
        ContactId(30),
        (BALL, GROUND),
        vec![MeshFaceOverlap {
            face: 0,
            centroid: DVec3::new(0.0, 0.0, 0.0),
            normal: DVec3::NEG_Y,
            area: 1e-4,
            depth: 1e-4,
        }],
    ));
    tracker.push_contact(ball_contact(0.095, 0.1));
    tracker.push_contact(EllipticalPointContact::new(
        ContactId(20),
        (GROUND, BALL),
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::Y,
        DVec3::X,
        (0.3, 0.1),
        0.002,
    ));

    let mut subsystem = CompliantContactSubsystem::new(tracker);
    let state = velocity_state();
    assert_eq!(subsystem.evaluate(&state)?, 3);
    let ids: Vec<_> = subsystem
        .contact_forces()?
        .iter()
        .filter_map(|f| f.contact_id)
        .collect();
    assert_eq!(ids, vec![ContactId(30), ContactId(1), ContactId(20)]);

    let patches = subsystem.calc_contact_patch_details(&state)?;
    assert_eq!(patches.len(), 3);
    for (patch, force) in patches.iter().zip(subsystem.contact_forces()?) {
        assert_eq!(patch.resultant.contact_id, force.contact_id);
        let about = DVec3::new(0.3, 0.2, -0.1);
        assert!(patch
            .elements_about(about)
            .abs_diff_eq(&patch.resultant_about(about), 1e-6));
    }
    Ok(())
}

#[test]
fn test_friction_regularized_near_zero_slip() -> anyhow::Result<()> {
    let mut tracker = ball_tracker();
    tracker.push_contact(ball_contact(0.099, 0.1));
    let mut subsystem = CompliantContactSubsystem::new(tracker);
    let state = velocity_state();

    let mut last_x: Option<f64> = None;
    let mut normal = 0.0;
    for i in (0..=40).rev() {
        let slip = 0.02 * i as f64 / 40.0;
        subsystem
            .tracker_mut()
            .set_surface_velocity(BALL, SpatialVec::new(DVec3::ZERO, DVec3::X * slip))?;
        subsystem.evaluate(&state)?;
        let f = subsystem.contact_force(0)?.force_on_surface2.linear;
        normal = f.y;
        // Never exceeds static friction, never flips sign.
        assert!(f.x.abs() <= 0.8 * f.y + 1e-9);
        assert!(f.x <= 0.0);
        if let Some(prev) = last_x {
            assert!((f.x - prev).abs() <= 0.8 * f.y * 0.1, "jump at slip {slip}");
        }
        last_x = Some(f.x);
    }
    assert_eq!(last_x, Some(0.0));
    assert!(normal > 0.0);

    // Larger transition velocity softens the ramp.
    subsystem
        .tracker_mut()
        .set_surface_velocity(BALL, SpatialVec::new(DVec3::ZERO, DVec3::X * 0.005))?;
    subsystem.evaluate(&state)?;
    let sharp = subsystem.contact_force(0)?.force_on_surface2.linear.x;
    subsystem.set_transition_velocity(0.1)?;
    subsystem.evaluate(&state)?;
    let soft = subsystem.contact_force(0)?.force_on_surface2.linear.x;
    assert!(soft.abs() < sharp.abs());
    let mu = |x: f64| x * (0.5 + 0.6 / (1.0 + x * x));
    assert_relative_eq!(soft / sharp, mu(0.05) / mu(0.5), max_relative = 1e-9);
    Ok(())
}
