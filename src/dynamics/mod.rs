pub mod state;

use crate::bodies::Body;
use crate::physics::ForceModel;
use state::{Deriv, State};

// ---------------------------------------------------------------------------
// Equations of motion (planar point masses)
// ---------------------------------------------------------------------------

/// Compute state derivatives for body `target` at a probe `state`.
///
/// Position rate is the probe velocity; velocity rate is the force model's
/// acceleration at the probe position against the stored states of all
/// other bodies.
pub fn derivatives<F: ForceModel + ?Sized>(
    force: &F,
    bodies: &[Body],
    target: usize,
    state: &State,
    t: f64,
) -> Deriv {
    Deriv {
        dpos: state.vel,
        dvel: force.acceleration(target, &state.pos, bodies, t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::BodyBuilder;
    use crate::physics::Gravity;

    #[test]
    fn position_rate_is_probe_velocity() {
        let bodies = vec![
            BodyBuilder::new("Star").mass(100.0).build().unwrap(),
            BodyBuilder::new("Planet").mass(1.0).position(10.0, 0.0).velocity(0.0, 3.0).build().unwrap(),
        ];
        let probe = State::new(10.0, 0.0, -2.0, 5.0);
        let d = derivatives(&Gravity::new(1.0), &bodies, 1, &probe, 0.0);
        assert_eq!(d.dpos, probe.vel);
        assert!(d.dvel.x < 0.0, "planet pulled toward star");
    }
}
