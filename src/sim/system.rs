use crate::bodies::Body;
use crate::dynamics::state::State;
use crate::physics::ForceModel;
use super::integrator::advance;

// ---------------------------------------------------------------------------
// Body set and per-frame update
// ---------------------------------------------------------------------------

/// The complete set of bodies plus simulated time.
///
/// Bodies are only added during setup; `step` never resizes the set.
#[derive(Debug, Clone, Default)]
pub struct System {
    bodies: Vec<Body>,
    time: f64,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body, returning its index.
    pub fn add_body(&mut self, body: Body) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, idx: usize) -> Option<&Body> {
        self.bodies.get(idx)
    }

    /// Index of the first body with this name.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name() == name)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advance every non-fixed body by one RK4 step.
    ///
    /// All bodies see the same start-of-frame snapshot; new states are
    /// committed only after every body has been computed, so body order
    /// does not matter.
    pub fn step<F: ForceModel + ?Sized>(&mut self, force: &F, dt: f64) {
        let t = self.time;
        let next: Vec<Option<State>> = self
            .bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (!b.is_fixed()).then(|| advance(force, &self.bodies, i, t, dt)))
            .collect();

        for (body, state) in self.bodies.iter_mut().zip(next) {
            if let Some(state) = state {
                body.state = state;
            }
        }
        self.time += dt;
    }
}
