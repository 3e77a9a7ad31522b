use std::fmt;
use std::str::FromStr;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::bodies::Body;

// ---------------------------------------------------------------------------
// Constants and pixel-scaled G
// ---------------------------------------------------------------------------

pub const G_KM: f64 = 6.673_84e-20;              // km^3 kg^-1 s^-2
pub const NEPTUNE_DISTANCE_KM: f64 = 4.5e9;      // Sun-Neptune, spans the window width
pub const MIN_DISTANCE_SQ: f64 = 1e-5;           // px^2, singularity guard

/// Gravitational constant in px^3 kg^-1 s^-2 for a window `width` pixels wide,
/// scaled so that Neptune's orbit spans the window.
pub fn approximate_g(width: f64) -> f64 {
    let km_per_pixel = NEPTUNE_DISTANCE_KM / width;
    G_KM / km_per_pixel.powi(3)
}

// ---------------------------------------------------------------------------
// Force model seam
// ---------------------------------------------------------------------------

/// Net acceleration on one body due to every other body in a set.
///
/// `pos` is a candidate position for `target` (an RK4 probe); every other
/// body is read at its stored state. `t` is the nominal time of the probe.
pub trait ForceModel {
    fn acceleration(
        &self,
        target: usize,
        pos: &Vector2<f64>,
        bodies: &[Body],
        t: f64,
    ) -> Vector2<f64>;
}

/// How the pairwise attraction is turned into an acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceLaw {
    /// a = G * m_other / r^2
    #[default]
    Newtonian,
    /// a = G * m_target * m_other / r^2, i.e. the force left undivided by the
    /// target mass. Only useful to reproduce the original visual setup.
    Unnormalized,
}

impl fmt::Display for ForceLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForceLaw::Newtonian => write!(f, "newtonian"),
            ForceLaw::Unnormalized => write!(f, "unnormalized"),
        }
    }
}

impl FromStr for ForceLaw {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newtonian" => Ok(ForceLaw::Newtonian),
            "unnormalized" => Ok(ForceLaw::Unnormalized),
            other => Err(format!(
                "unknown force law '{other}' (expected 'newtonian' or 'unnormalized')"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Pairwise inverse-square gravity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    pub g: f64,
    pub law: ForceLaw,
    pub min_distance_sq: f64,
}

impl Gravity {
    pub fn new(g: f64) -> Self {
        Self { g, law: ForceLaw::Newtonian, min_distance_sq: MIN_DISTANCE_SQ }
    }

    pub fn with_law(mut self, law: ForceLaw) -> Self {
        self.law = law;
        self
    }

    /// Gravity scaled for a window `width` pixels wide.
    pub fn for_width(width: f64) -> Self {
        Self::new(approximate_g(width))
    }

    /// Acceleration at `pos` due to a single `other` body.
    /// Zero when the pair is closer than the singularity guard.
    pub fn pull(&self, target_mass: f64, pos: &Vector2<f64>, other: &Body) -> Vector2<f64> {
        let r = other.pos() - pos;
        let dist_sq = r.norm_squared();
        if dist_sq <= self.min_distance_sq {
            trace!(other = other.name(), dist_sq, "pair inside singularity guard");
            return Vector2::zeros();
        }
        let dist = dist_sq.sqrt();

        let magnitude = match self.law {
            ForceLaw::Newtonian => self.g * other.mass() / dist_sq,
            ForceLaw::Unnormalized => self.g * target_mass * other.mass() / dist_sq,
        };
        r * (magnitude / dist)
    }
}

impl ForceModel for Gravity {
    fn acceleration(
        &self,
        target: usize,
        pos: &Vector2<f64>,
        bodies: &[Body],
        _t: f64,
    ) -> Vector2<f64> {
        let target_mass = bodies[target].mass();
        bodies
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != target)
            .fold(Vector2::zeros(), |acc, (_, other)| {
                acc + self.pull(target_mass, pos, other)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::BodyBuilder;
    use approx::assert_relative_eq;

    fn pair(mass_a: f64, mass_b: f64, separation: f64) -> Vec<Body> {
        vec![
            BodyBuilder::new("A").mass(mass_a).position(0.0, 0.0).build().unwrap(),
            BodyBuilder::new("B").mass(mass_b).position(separation, 0.0).build().unwrap(),
        ]
    }

    #[test]
    fn inverse_square_magnitude() {
        let bodies = pair(5.0, 1000.0, 10.0);
        let grav = Gravity::new(2.0);
        let a = grav.acceleration(0, &bodies[0].pos(), &bodies, 0.0);
        // G * m_B / r^2 = 2 * 1000 / 100
        assert_relative_eq!(a.x, 20.0, max_relative = 1e-12);
        assert_eq!(a.y, 0.0);
    }

    #[test]
    fn unnormalized_law_keeps_target_mass() {
        let bodies = pair(5.0, 1000.0, 10.0);
        let grav = Gravity::new(2.0).with_law(ForceLaw::Unnormalized);
        let a = grav.acceleration(0, &bodies[0].pos(), &bodies, 0.0);
        assert_relative_eq!(a.x, 100.0, max_relative = 1e-12);
    }

    #[test]
    fn points_toward_other_body() {
        let bodies = pair(1.0, 1.0, -3.0);
        let a = Gravity::new(1.0).acceleration(0, &bodies[0].pos(), &bodies, 0.0);
        assert!(a.x < 0.0);
    }

    #[test]
    fn no_self_interaction() {
        let lonely = vec![BodyBuilder::new("Solo").mass(1e30).build().unwrap()];
        let a = Gravity::new(1.0).acceleration(0, &Vector2::new(3.0, 4.0), &lonely, 0.0);
        assert_eq!(a, Vector2::zeros());
    }

    #[test]
    fn equal_masses_pull_equally_and_oppositely() {
        let bodies = vec![
            BodyBuilder::new("L").mass(7.0).position(-25.0, 4.0).build().unwrap(),
            BodyBuilder::new("R").mass(7.0).position(25.0, -4.0).build().unwrap(),
        ];
        let grav = Gravity::new(3.0);
        let a0 = grav.acceleration(0, &bodies[0].pos(), &bodies, 0.0);
        let a1 = grav.acceleration(1, &bodies[1].pos(), &bodies, 0.0);
        assert_relative_eq!(a0, -a1, max_relative = 1e-12);
        assert!(a0.norm() > 0.0);
    }

    #[test]
    fn coincident_bodies_contribute_nothing() {
        let bodies = pair(1e25, 1e25, 0.0);
        let a = Gravity::new(1.0).acceleration(0, &bodies[0].pos(), &bodies, 0.0);
        assert_eq!(a, Vector2::zeros());

        // Just inside the guard (r^2 = 9e-6 < 1e-5)
        let bodies = pair(1e25, 1e25, 3e-3);
        let a = Gravity::new(1.0).acceleration(0, &bodies[0].pos(), &bodies, 0.0);
        assert!(a.x.is_finite() && a.y.is_finite());
        assert_eq!(a, Vector2::zeros());
    }

    #[test]
    fn guard_only_silences_the_close_pair() {
        let bodies = vec![
            BodyBuilder::new("A").mass(1.0).position(0.0, 0.0).build().unwrap(),
            BodyBuilder::new("Twin").mass(1.0).position(0.0, 0.0).build().unwrap(),
            BodyBuilder::new("Far").mass(100.0).position(0.0, 10.0).build().unwrap(),
        ];
        let a = Gravity::new(1.0).acceleration(0, &bodies[0].pos(), &bodies, 0.0);
        assert_relative_eq!(a.y, 1.0, max_relative = 1e-12);
        assert_eq!(a.x, 0.0);
    }

    #[test]
    fn probe_position_overrides_stored_one() {
        let bodies = pair(1.0, 400.0, 10.0);
        let grav = Gravity::new(1.0);
        // Probe the target at x = -10, twice as far from B
        let a = grav.acceleration(0, &Vector2::new(-10.0, 0.0), &bodies, 0.0);
        assert_relative_eq!(a.x, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn g_scales_with_window_width() {
        let g = approximate_g(1200.0);
        // 6.67384e-20 / (3.75e6)^3
        assert_relative_eq!(g, 1.265_557e-39, max_relative = 1e-5);
        // Doubling the width halves km/px, so G grows 8x
        assert_relative_eq!(approximate_g(2400.0) / g, 8.0, max_relative = 1e-12);
    }

    #[test]
    fn force_law_parses() {
        assert_eq!("Newtonian".parse::<ForceLaw>(), Ok(ForceLaw::Newtonian));
        assert_eq!("unnormalized".parse::<ForceLaw>(), Ok(ForceLaw::Unnormalized));
        assert!("mond".parse::<ForceLaw>().is_err());
        assert_eq!(ForceLaw::Unnormalized.to_string(), "unnormalized");
    }
}
