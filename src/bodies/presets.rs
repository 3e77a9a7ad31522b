use crate::dynamics::state::State;
use crate::render::{Appearance, Color};

// ---------------------------------------------------------------------------
// Named body presets (mass, initial state, appearance)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPreset {
    pub name: &'static str,
    pub mass: f64,              // kg, unscaled
    pub position: [f64; 2],     // px
    pub velocity: [f64; 2],     // px/s
    pub radius: f64,            // px, drawing only
    pub color: Color,
}

impl BodyPreset {
    pub fn state(&self) -> State {
        State::new(self.position[0], self.position[1], self.velocity[0], self.velocity[1])
    }

    pub fn appearance(&self) -> Appearance {
        Appearance { radius: self.radius, color: self.color }
    }
}

// Everything past Mercury shares the same placeholder start; combine them
// with explicit positions from configuration.
pub const PRESETS: &[BodyPreset] = &[
    BodyPreset {
        name: "Sun",
        mass: 1.989e30,
        position: [600.0, 350.0],
        velocity: [0.0, 0.0],
        radius: 40.0,
        color: [255, 128, 0],
    },
    BodyPreset {
        name: "Mercury",
        mass: 3.285e23,
        position: [1000.0, 350.0],
        velocity: [0.0, 10.0],
        radius: 3.0,
        color: [255, 255, 255],
    },
    BodyPreset {
        name: "Venus",
        mass: 4.867e24,
        position: [350.0, 500.0],
        velocity: [0.0, 2.0],
        radius: 5.0,
        color: [153, 204, 255],
    },
    BodyPreset {
        name: "Earth",
        mass: 5.972e24,
        position: [350.0, 500.0],
        velocity: [0.0, 2.0],
        radius: 5.0,
        color: [0, 128, 255],
    },
    BodyPreset {
        name: "Mars",
        mass: 6.39e23,
        position: [350.0, 500.0],
        velocity: [0.0, 2.0],
        radius: 4.0,
        color: [204, 0, 0],
    },
    BodyPreset {
        name: "Jupiter",
        mass: 1.898e27,
        position: [350.0, 500.0],
        velocity: [0.0, 2.0],
        radius: 15.0,
        color: [96, 96, 96],
    },
    BodyPreset {
        name: "Saturnus",
        mass: 5.683e26,
        position: [350.0, 500.0],
        velocity: [0.0, 2.0],
        radius: 14.0,
        color: [153, 153, 0],
    },
    BodyPreset {
        name: "Uranus",
        mass: 8.681e25,
        position: [350.0, 500.0],
        velocity: [0.0, 2.0],
        radius: 10.0,
        color: [204, 255, 255],
    },
    BodyPreset {
        name: "Neptunus",
        mass: 1.024e26,
        position: [350.0, 500.0],
        velocity: [0.0, 2.0],
        radius: 10.0,
        color: [0, 0, 204],
    },
];

/// Look up a preset by name, ignoring case.
pub fn find(name: &str) -> Option<&'static BodyPreset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Names of all presets, in table order.
pub fn names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|p| p.name)
}
