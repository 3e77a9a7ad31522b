pub mod gravity;

pub use gravity::{approximate_g, ForceLaw, ForceModel, Gravity};
