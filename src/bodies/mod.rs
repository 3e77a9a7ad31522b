pub mod body;
pub mod presets;

pub use body::{Body, BodyBuilder};
pub use presets::{BodyPreset, PRESETS};
