use nalgebra::Vector2;

// ---------------------------------------------------------------------------
// Body state: planar position and velocity
// ---------------------------------------------------------------------------

/// Instantaneous kinematic state of one body.
/// Units: position in pixels, velocity in pixels/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
}

impl State {
    pub fn new(x: f64, y: f64, vx: f64, vy: f64) -> Self {
        Self {
            pos: Vector2::new(x, y),
            vel: Vector2::new(vx, vy),
        }
    }

    /// Advance state by a derivative scaled by dt (RK4 probe state).
    pub fn apply(&self, d: &Deriv, dt: f64) -> State {
        State {
            pos: self.pos + d.dpos * dt,
            vel: self.vel + d.dvel * dt,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.pos.iter().chain(self.vel.iter()).all(|c| c.is_finite())
    }
}

// ---------------------------------------------------------------------------
// State derivative (one RK4 stage)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deriv {
    pub dpos: Vector2<f64>,   // velocity
    pub dvel: Vector2<f64>,   // acceleration
}
