use tracing::{debug, warn};

use crate::bodies::Body;
use crate::error::SimError;
use crate::physics::Gravity;
use crate::render::{Appearance, RenderSink, Sprite, Trail, TrailConfig};
use super::system::System;

// ---------------------------------------------------------------------------
// Frame driver boundary
// ---------------------------------------------------------------------------

/// What a frontend needs from a simulation: step it, then draw it.
pub trait FrameDriver {
    /// Advance simulated time by `dt`.
    fn advance_frame(&mut self, dt: f64);

    /// Hand the current frame to a sink.
    fn render(&self, sink: &mut dyn RenderSink);

    /// Timestep the driver would like to be advanced by each frame.
    fn frame_dt(&self) -> f64;
}

// ---------------------------------------------------------------------------
// Simulation: bodies + gravity + what the sink needs to draw them
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Simulation {
    pub system: System,
    pub gravity: Gravity,
    appearances: Vec<Appearance>,
    trails: Vec<Trail>,
    trail_config: TrailConfig,
    pub dt: f64,
    pub steps_per_frame: u32,
    frame: u64,
}

impl Simulation {
    pub fn new(gravity: Gravity, dt: f64) -> Result<Self, SimError> {
        if !dt.is_finite() {
            return Err(SimError::InvalidTimestep(dt));
        }
        Ok(Self {
            system: System::new(),
            gravity,
            appearances: Vec::new(),
            trails: Vec::new(),
            trail_config: TrailConfig::default(),
            dt,
            steps_per_frame: 1,
            frame: 0,
        })
    }

    /// Replace the trail settings. Existing trails restart from each
    /// body's current position.
    pub fn with_trails(mut self, config: TrailConfig) -> Self {
        self.trail_config = config;
        self.trails = self
            .system
            .bodies()
            .iter()
            .map(|body| Self::start_trail(&config, body))
            .collect();
        self
    }

    /// Add a body along with how it should be drawn. Setup only.
    pub fn add_body(&mut self, body: Body, appearance: Appearance) -> usize {
        self.appearances.push(appearance);
        self.trails.push(Self::start_trail(&self.trail_config, &body));
        self.system.add_body(body)
    }

    fn start_trail(config: &TrailConfig, body: &Body) -> Trail {
        let mut trail = Trail::new(config);
        if config.enabled && !body.is_fixed() {
            trail.record(body.pos());
        }
        trail
    }

    pub fn bodies(&self) -> &[Body] {
        self.system.bodies()
    }

    pub fn appearance(&self, idx: usize) -> Option<&Appearance> {
        self.appearances.get(idx)
    }

    pub fn trail(&self, idx: usize) -> Option<&Trail> {
        self.trails.get(idx)
    }

    pub fn time(&self) -> f64 {
        self.system.time()
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Index of the first fixed body, the natural orbit center.
    pub fn anchor(&self) -> Option<usize> {
        self.bodies().iter().position(|b| b.is_fixed())
    }

    fn record_trails(&mut self) {
        if !self.trail_config.enabled {
            return;
        }
        for (trail, body) in self.trails.iter_mut().zip(self.system.bodies()) {
            if !body.is_fixed() {
                trail.record(body.pos());
            }
        }
    }
}

impl FrameDriver for Simulation {
    fn advance_frame(&mut self, dt: f64) {
        let sub_dt = dt / f64::from(self.steps_per_frame.max(1));
        for _ in 0..self.steps_per_frame.max(1) {
            self.system.step(&self.gravity, sub_dt);
        }
        self.record_trails();
        self.frame += 1;

        if self.frame % 1000 == 0 {
            debug!(frame = self.frame, time = self.time(), "frame advanced");
        }
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        sink.begin_frame();
        if self.trail_config.enabled {
            for (trail, look) in self.trails.iter().zip(&self.appearances) {
                if trail.len() > 1 {
                    sink.draw_trail(&trail.points(), look.color);
                }
            }
        }
        for (body, look) in self.system.bodies().iter().zip(&self.appearances) {
            if !body.state().is_finite() {
                warn!(body = body.name(), frame = self.frame, "non-finite state, not drawn");
                continue;
            }
            sink.draw_body(&Sprite::new(body, look));
        }
        sink.end_frame();
    }

    fn frame_dt(&self) -> f64 {
        self.dt
    }
}

// ---------------------------------------------------------------------------
// Frame loop
// ---------------------------------------------------------------------------

/// Advance, render, then poll `quit`, until `quit` says so or `frames`
/// frames have run (`None` runs until quit). Returns frames completed.
pub fn run<D: FrameDriver + ?Sized>(
    driver: &mut D,
    sink: &mut dyn RenderSink,
    frames: Option<u64>,
    mut quit: impl FnMut(&D) -> bool,
) -> u64 {
    let dt = driver.frame_dt();
    let mut done = 0;
    while frames.map_or(true, |n| done < n) {
        driver.advance_frame(dt);
        driver.render(sink);
        done += 1;
        if quit(driver) {
            debug!(frames = done, "quit requested");
            break;
        }
    }
    done
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
