use nalgebra::Vector2;

use crate::dynamics::state::State;
use crate::error::SimError;

// ---------------------------------------------------------------------------
// Body: identity, mass and mutable kinematic state
// ---------------------------------------------------------------------------

/// A massive body taking part in the simulation.
///
/// Name and mass are fixed at construction. The state is replaced wholesale
/// once per frame by [`crate::sim::System::step`].
#[derive(Debug, Clone)]
pub struct Body {
    name: String,
    mass: f64,                  // kg (scaled)
    pub(crate) state: State,
    fixed: bool,                // held immobile, still attracts others
}

impl Body {
    /// Create a body, rejecting non-positive mass and non-finite state.
    pub fn new(name: impl Into<String>, mass: f64, state: State) -> Result<Self, SimError> {
        let name = name.into();
        if !mass.is_finite() || mass <= 0.0 {
            return Err(SimError::InvalidMass { name, mass });
        }
        if !state.is_finite() {
            return Err(SimError::NonFiniteState { name });
        }
        Ok(Self { name, mass, state, fixed: false })
    }

    /// Mark this body as immobile.
    pub fn anchored(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn pos(&self) -> Vector2<f64> {
        self.state.pos
    }

    pub fn vel(&self) -> Vector2<f64> {
        self.state.vel
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }
}

// ---------------------------------------------------------------------------
// Body builder
// ---------------------------------------------------------------------------

pub struct BodyBuilder {
    name: String,
    mass: f64,
    pos: Vector2<f64>,
    vel: Vector2<f64>,
    fixed: bool,
}

impl BodyBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mass: 1.0,
            pos: Vector2::zeros(),
            vel: Vector2::zeros(),
            fixed: false,
        }
    }

    pub fn mass(mut self, v: f64) -> Self { self.mass = v; self }
    pub fn position(mut self, x: f64, y: f64) -> Self { self.pos = Vector2::new(x, y); self }
    pub fn velocity(mut self, vx: f64, vy: f64) -> Self { self.vel = Vector2::new(vx, vy); self }
    pub fn fixed(mut self, v: bool) -> Self { self.fixed = v; self }

    pub fn build(self) -> Result<Body, SimError> {
        let state = State { pos: self.pos, vel: self.vel };
        let body = Body::new(self.name, self.mass, state)?;
        Ok(if self.fixed { body.anchored() } else { body })
    }
}
