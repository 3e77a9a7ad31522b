//! Shared doubles for simulation tests

use std::cell::Cell;

use nalgebra::Vector2;

use crate::bodies::Body;
use crate::physics::{ForceModel, Gravity};

/// Counts force evaluations, delegating to real gravity.
pub struct CountingForce {
    inner: Gravity,
    calls: Cell<usize>,
}

impl CountingForce {
    pub fn new(inner: Gravity) -> Self {
        Self { inner, calls: Cell::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ForceModel for CountingForce {
    fn acceleration(&self, target: usize, pos: &Vector2<f64>, bodies: &[Body], t: f64) -> Vector2<f64> {
        self.calls.set(self.calls.get() + 1);
        self.inner.acceleration(target, pos, bodies, t)
    }
}
