//! Scenario configuration loaded from TOML.
//!
//! ```toml
//! [window]
//! width = 1200            # px, also sets the scale of G
//! height = 700
//!
//! [physics]
//! dt = 1.0                # s per frame
//! force_law = "newtonian" # or "unnormalized"
//! mass_scale = 1e-5       # applied to preset masses
//!
//! [[bodies]]
//! preset = "Sun"
//! fixed = true
//!
//! [[bodies]]
//! name = "Comet"
//! mass = 1e10
//! position = [100.0, 100.0]
//! velocity = [2.0, 0.0]
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bodies::{presets, Body, BodyBuilder};
use crate::error::SimError;
use crate::physics::gravity::{approximate_g, ForceLaw, Gravity, MIN_DISTANCE_SQ};
use crate::render::{Appearance, Color, TrailConfig};
use crate::sim::Simulation;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    pub trail: TrailConfig,
    pub bodies: Vec<BodyConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            physics: PhysicsConfig::default(),
            trail: TrailConfig::default(),
            bodies: vec![BodyConfig::preset("Sun").fixed(), BodyConfig::preset("Mercury")],
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background: Color,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Project Daedalus - Solar System Simulation".into(),
            width: 1200,
            height: 700,
            background: [25, 0, 0],
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub dt: f64,                        // s per frame
    pub steps_per_frame: u32,           // RK4 substeps per frame
    pub force_law: ForceLaw,
    pub mass_scale: f64,                // multiplies preset masses
    pub min_distance_sq: f64,           // px^2, singularity guard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravitational_constant: Option<f64>,  // overrides the width-derived G
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            dt: 1.0,
            steps_per_frame: 1,
            force_law: ForceLaw::Newtonian,
            mass_scale: 1e-5,
            min_distance_sq: MIN_DISTANCE_SQ,
            gravitational_constant: None,
        }
    }
}

/// One body: a preset, optionally overridden field by field, or a fully
/// explicit body.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,              // kg, used as given (not scaled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    pub fixed: bool,
}

impl BodyConfig {
    pub fn preset(name: &str) -> Self {
        Self { preset: Some(name.to_string()), ..Self::default() }
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// Turn this entry into a body and its appearance.
    pub fn resolve(&self, index: usize, mass_scale: f64) -> Result<(Body, Appearance), SimError> {
        let preset = match &self.preset {
            Some(name) => Some(
                presets::find(name).ok_or_else(|| SimError::UnknownPreset(name.clone()))?,
            ),
            None => None,
        };
        let missing = |field| SimError::IncompleteBody { index, field };

        let name = self
            .name
            .clone()
            .or_else(|| preset.map(|p| p.name.to_string()))
            .ok_or_else(|| missing("name"))?;
        let mass = self
            .mass
            .or_else(|| preset.map(|p| p.mass * mass_scale))
            .ok_or_else(|| missing("mass"))?;
        let [x, y] = self
            .position
            .or_else(|| preset.map(|p| p.position))
            .ok_or_else(|| missing("position"))?;
        let [vx, vy] = self
            .velocity
            .or_else(|| preset.map(|p| p.velocity))
            .ok_or_else(|| missing("velocity"))?;

        let fallback = preset.map(|p| p.appearance()).unwrap_or_default();
        let appearance = Appearance {
            radius: self.radius.unwrap_or(fallback.radius),
            color: self.color.unwrap_or(fallback.color),
        };

        let body = BodyBuilder::new(name)
            .mass(mass)
            .position(x, y)
            .velocity(vx, vy)
            .fixed(self.fixed)
            .build()?;
        Ok((body, appearance))
    }
}

impl SimConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, SimError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        debug!(path, bodies = config.bodies.len(), "configuration loaded");
        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults if it is
    /// missing or invalid.
    pub fn load_or_default(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Failed to parse config file {}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("Config file {} not found. Using defaults.", path);
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, SimError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, SimError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &str) -> Result<(), SimError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// G in px^3 kg^-1 s^-2: the explicit override, else derived from the
    /// window width.
    pub fn gravitational_constant(&self) -> f64 {
        self.physics
            .gravitational_constant
            .unwrap_or_else(|| approximate_g(f64::from(self.window.width)))
    }

    pub fn gravity(&self) -> Gravity {
        Gravity {
            g: self.gravitational_constant(),
            law: self.physics.force_law,
            min_distance_sq: self.physics.min_distance_sq,
        }
    }

    fn validate(&self) -> Result<(), SimError> {
        if self.bodies.is_empty() {
            return Err(SimError::Config("scenario has no bodies".into()));
        }
        let g = self.gravitational_constant();
        if !g.is_finite() || g < 0.0 {
            return Err(SimError::Config(format!("gravitational constant {g} must be finite and >= 0")));
        }
        let scale = self.physics.mass_scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(SimError::Config(format!("mass_scale {scale} must be finite and > 0")));
        }
        if self.physics.min_distance_sq.is_nan() || self.physics.min_distance_sq < 0.0 {
            return Err(SimError::Config("min_distance_sq must be >= 0".into()));
        }
        Ok(())
    }

    /// Validate and assemble the simulation described by this configuration.
    pub fn build(&self) -> Result<Simulation, SimError> {
        self.validate()?;
        let gravity = self.gravity();

        let mut sim = Simulation::new(gravity, self.physics.dt)?.with_trails(self.trail);
        sim.steps_per_frame = self.physics.steps_per_frame.max(1);

        for (i, entry) in self.bodies.iter().enumerate() {
            let (body, appearance) = entry.resolve(i, self.physics.mass_scale)?;
            debug!(
                body = body.name(),
                mass = body.mass(),
                x = body.pos().x,
                y = body.pos().y,
                fixed = body.is_fixed(),
                "body added"
            );
            sim.add_body(body, appearance);
        }

        info!(
            bodies = sim.bodies().len(),
            g = gravity.g,
            law = %gravity.law,
            dt = self.physics.dt,
            "scenario built"
        );
        Ok(sim)
    }
}
