use crate::bodies::Body;
use crate::physics::ForceModel;

/// Accelerations below this (px/s^2) leave a body visually ballistic.
pub const NEGLIGIBLE_ACCELERATION: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Conserved quantities (Newtonian law)
// ---------------------------------------------------------------------------

pub fn kinetic_energy(bodies: &[Body]) -> f64 {
    bodies.iter().map(|b| 0.5 * b.mass() * b.vel().norm_squared()).sum()
}

/// Pairwise potential energy. Pairs inside `min_distance_sq` are skipped,
/// matching the force model's singularity guard.
pub fn potential_energy(bodies: &[Body], g: f64, min_distance_sq: f64) -> f64 {
    let mut total = 0.0;
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            let dist_sq = (b.pos() - a.pos()).norm_squared();
            if dist_sq > min_distance_sq {
                total -= g * a.mass() * b.mass() / dist_sq.sqrt();
            }
        }
    }
    total
}

pub fn total_energy(bodies: &[Body], g: f64, min_distance_sq: f64) -> f64 {
    kinetic_energy(bodies) + potential_energy(bodies, g, min_distance_sq)
}

/// z component of total angular momentum about the origin.
pub fn angular_momentum(bodies: &[Body]) -> f64 {
    bodies
        .iter()
        .map(|b| b.mass() * b.pos().perp(&b.vel()))
        .sum()
}

/// Largest acceleration magnitude on any moving body at its stored state.
pub fn peak_acceleration<F: ForceModel + ?Sized>(force: &F, bodies: &[Body], t: f64) -> f64 {
    bodies
        .iter()
        .enumerate()
        .filter(|(_, b)| !b.is_fixed())
        .map(|(i, b)| force.acceleration(i, &b.pos(), bodies, t).norm())
        .fold(0.0, f64::max)
}

/// Distance between two bodies.
pub fn separation(a: &Body, b: &Body) -> f64 {
    (a.pos() - b.pos()).norm()
}

// ---------------------------------------------------------------------------
// Orbit tracking around a reference body
// ---------------------------------------------------------------------------

/// Orbital radius statistics for one body.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitSummary {
    pub body: String,
    pub initial_radius: f64,
    pub min_radius: f64,
    pub max_radius: f64,
}

impl OrbitSummary {
    /// Largest relative departure from the initial radius.
    pub fn drift(&self) -> f64 {
        if self.initial_radius <= 0.0 {
            return 0.0;
        }
        let low = (self.initial_radius - self.min_radius).abs();
        let high = (self.max_radius - self.initial_radius).abs();
        low.max(high) / self.initial_radius
    }
}

/// Accumulates min/max radius of every body around `center`.
#[derive(Debug, Clone)]
pub struct OrbitTracker {
    center: usize,
    orbits: Vec<OrbitSummary>,
}

impl OrbitTracker {
    pub fn new(bodies: &[Body], center: usize) -> Self {
        let orbits = bodies
            .iter()
            .map(|b| {
                let r = separation(b, &bodies[center]);
                OrbitSummary {
                    body: b.name().to_string(),
                    initial_radius: r,
                    min_radius: r,
                    max_radius: r,
                }
            })
            .collect();
        Self { center, orbits }
    }

    pub fn center(&self) -> usize {
        self.center
    }

    pub fn observe(&mut self, bodies: &[Body]) {
        let center = &bodies[self.center];
        for (orbit, b) in self.orbits.iter_mut().zip(bodies) {
            let r = separation(b, center);
            orbit.min_radius = orbit.min_radius.min(r);
            orbit.max_radius = orbit.max_radius.max(r);
        }
    }

    /// Summaries for every body except the center.
    pub fn summaries(&self) -> impl Iterator<Item = &OrbitSummary> {
        let center = self.center;
        self.orbits
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != center)
            .map(|(_, o)| o)
    }
}
