pub mod error;
pub mod dynamics;
pub mod physics;
pub mod bodies;
pub mod sim;
pub mod render;
pub mod io;
pub mod config;

pub use bodies::{Body, BodyBuilder};
pub use config::SimConfig;
pub use dynamics::state::{Deriv, State};
pub use error::SimError;
pub use physics::{ForceLaw, ForceModel, Gravity};
pub use render::{Appearance, RenderSink, Sprite};
pub use sim::{advance, run, FrameDriver, Simulation, System};
