use crate::bodies::Body;
use crate::dynamics;
use crate::dynamics::state::State;
use crate::physics::ForceModel;

// ---------------------------------------------------------------------------
// Classical 4th-order Runge-Kutta, one body at a time
// ---------------------------------------------------------------------------

/// Single RK4 step: the state body `target` would have after `dt`.
///
/// Every other body stays frozen at its stored state for the whole step.
/// The body set is not modified; the caller commits the returned state.
/// Calls the force model exactly four times.
pub fn advance<F: ForceModel + ?Sized>(
    force: &F,
    bodies: &[Body],
    target: usize,
    t: f64,
    dt: f64,
) -> State {
    let state = bodies[target].state();
    let half = dt * 0.5;

    let k1 = dynamics::derivatives(force, bodies, target, state, t);
    let k2 = dynamics::derivatives(force, bodies, target, &state.apply(&k1, half), t + half);
    let k3 = dynamics::derivatives(force, bodies, target, &state.apply(&k2, half), t + half);
    let k4 = dynamics::derivatives(force, bodies, target, &state.apply(&k3, dt), t + dt);

    State {
        pos: state.pos + (k1.dpos + 2.0 * k2.dpos + 2.0 * k3.dpos + k4.dpos) * (dt / 6.0),
        vel: state.vel + (k1.dvel + 2.0 * k2.dvel + 2.0 * k3.dvel + k4.dvel) * (dt / 6.0),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::{presets, BodyBuilder};
    use crate::physics::{approximate_g, ForceLaw, Gravity};
    use approx::assert_relative_eq;
    use nalgebra::Vector2;
    use crate::sim::test_utils::CountingForce;
    use std::f64::consts::PI;

    const STAR_MASS: f64 = 1000.0;
    const ORBIT_RADIUS: f64 = 100.0;

    /// Star fixed at the origin, planet on a circular orbit (G = 1).
    fn circular_system() -> Vec<Body> {
        let v = (STAR_MASS / ORBIT_RADIUS).sqrt();
        vec![
            BodyBuilder::new("Star").mass(STAR_MASS).fixed(true).build().unwrap(),
            BodyBuilder::new("Planet")
                .mass(1.0)
                .position(ORBIT_RADIUS, 0.0)
                .velocity(0.0, v)
                .build()
                .unwrap(),
        ]
    }

    /// Integrate the planet for `steps` steps, returning every committed state.
    fn propagate(bodies: &mut [Body], grav: &Gravity, dt: f64, steps: usize) -> Vec<State> {
        let mut out = Vec::with_capacity(steps);
        let mut t = 0.0;
        for _ in 0..steps {
            let next = advance(grav, bodies, 1, t, dt);
            bodies[1].state = next;
            t += dt;
            out.push(next);
        }
        out
    }

    /// Position error against the analytic circular orbit after `duration`.
    fn circular_error(dt: f64, duration: f64) -> f64 {
        let mut bodies = circular_system();
        let steps = (duration / dt).round() as usize;
        let last = *propagate(&mut bodies, &Gravity::new(1.0), dt, steps).last().unwrap();

        let omega = (STAR_MASS / ORBIT_RADIUS.powi(3)).sqrt();
        let angle = omega * steps as f64 * dt;
        let exact = Vector2::new(ORBIT_RADIUS * angle.cos(), ORBIT_RADIUS * angle.sin());
        (last.pos - exact).norm()
    }

    #[test]
    fn four_force_evaluations_per_step() {
        let bodies = circular_system();
        let force = CountingForce::new(Gravity::new(1.0));
        advance(&force, &bodies, 1, 0.0, 0.5);
        assert_eq!(force.calls(), 4);
    }

    #[test]
    fn zero_timestep_leaves_state_unchanged() {
        let bodies = circular_system();
        let before = *bodies[1].state();
        let after = advance(&Gravity::new(1.0), &bodies, 1, 0.0, 0.0);
        assert_eq!(after, before);
    }

    #[test]
    fn advance_does_not_mutate_bodies() {
        let bodies = circular_system();
        let before = *bodies[1].state();
        let next = advance(&Gravity::new(1.0), &bodies, 1, 0.0, 1.0);
        assert_ne!(next, before);
        assert_eq!(*bodies[1].state(), before);
    }

    #[test]
    fn free_body_moves_in_a_straight_line() {
        let bodies = vec![BodyBuilder::new("Drifter")
            .mass(1.0)
            .position(1.0, 2.0)
            .velocity(3.0, -4.0)
            .build()
            .unwrap()];
        let next = advance(&Gravity::new(1.0), &bodies, 0, 0.0, 2.0);
        assert_relative_eq!(next.pos, Vector2::new(7.0, -6.0), epsilon = 1e-12);
        assert_eq!(next.vel, Vector2::new(3.0, -4.0));
    }

    #[test]
    fn negative_timestep_retraces_the_orbit() {
        let mut bodies = circular_system();
        let start = *bodies[1].state();
        let grav = Gravity::new(1.0);
        propagate(&mut bodies, &grav, 0.5, 40);
        propagate(&mut bodies, &grav, -0.5, 40);
        assert_relative_eq!(bodies[1].pos(), start.pos, epsilon = 1e-3);
        assert_relative_eq!(bodies[1].vel(), start.vel, epsilon = 1e-4);
    }

    #[test]
    fn circular_orbit_radius_stays_within_one_percent() {
        let mut bodies = circular_system();
        let v = (STAR_MASS / ORBIT_RADIUS).sqrt();
        let period = 2.0 * PI * ORBIT_RADIUS / v;
        let dt = 0.1;
        let steps = (period / dt).ceil() as usize;

        for s in propagate(&mut bodies, &Gravity::new(1.0), dt, steps) {
            let drift = (s.pos.norm() - ORBIT_RADIUS).abs() / ORBIT_RADIUS;
            assert!(drift < 0.01, "radius drifted {:.3}%", drift * 100.0);
        }

        // Back near the start after one revolution
        let closure = (bodies[1].pos() - Vector2::new(ORBIT_RADIUS, 0.0)).norm();
        assert!(closure < v * dt * 1.5, "orbit did not close: {closure:.4} px");
    }

    #[test]
    fn error_shrinks_at_fourth_order() {
        let coarse = circular_error(2.0, 100.0);
        let fine = circular_error(1.0, 100.0);
        assert!(coarse > fine, "doubling dt must increase the error");
        let ratio = coarse / fine;
        assert!(
            ratio > 10.0,
            "halving dt should cut the error ~16x, got {ratio:.2} ({coarse:.3e} -> {fine:.3e})"
        );
    }

    /// Reference setup: Mercury 400 px east of the Sun, 10 px/s prograde.
    fn reference_setup(law: ForceLaw) -> (Vec<Body>, Gravity) {
        let scale = 1e-5;
        let sun = presets::find("Sun").unwrap();
        let mercury = presets::find("Mercury").unwrap();
        let bodies = vec![
            Body::new(sun.name, sun.mass * scale, sun.state()).unwrap().anchored(),
            Body::new(mercury.name, mercury.mass * scale, mercury.state()).unwrap(),
        ];
        (bodies, Gravity::new(approximate_g(1200.0)).with_law(law))
    }

    #[test]
    fn reference_single_step_is_bounded() {
        for law in [ForceLaw::Newtonian, ForceLaw::Unnormalized] {
            let (bodies, grav) = reference_setup(law);
            let next = advance(&grav, &bodies, 1, 0.0, 1.0);
            // Ballistic estimate: start + v * dt
            assert!((next.pos.x - 1000.0).abs() < 1.0, "{law}: x = {}", next.pos.x);
            assert!((next.pos.y - 360.0).abs() < 1.0, "{law}: y = {}", next.pos.y);
            assert!(next.vel.x.is_finite() && next.vel.y.is_finite());
        }
    }

    #[test]
    fn unnormalized_reference_pulls_visibly_toward_the_sun() {
        let (bodies, grav) = reference_setup(ForceLaw::Unnormalized);
        let next = advance(&grav, &bodies, 1, 0.0, 1.0);
        // ~0.5 px/s^2 toward the Sun
        assert!(next.vel.x < -0.4 && next.vel.x > -0.6, "vx = {}", next.vel.x);
    }
}
