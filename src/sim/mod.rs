pub mod integrator;
pub mod system;
pub mod runner;
pub mod diagnostics;

#[cfg(test)]
pub(crate) mod test_utils;

pub use integrator::advance;
pub use system::System;
pub use runner::{run, FrameDriver, Simulation};
pub use diagnostics::{OrbitSummary, OrbitTracker};
