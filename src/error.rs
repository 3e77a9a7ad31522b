use std::fmt;
use std::io;

/// Errors raised while assembling a simulation, before the frame loop starts.
///
/// Stepping itself never fails: numerical trouble is either absorbed by the
/// singularity guard or propagates as non-finite state.
#[derive(Debug)]
pub enum SimError {
    /// Body mass is zero, negative or not finite.
    InvalidMass { name: String, mass: f64 },
    /// Initial position or velocity contains NaN or infinity.
    NonFiniteState { name: String },
    /// Configured timestep is NaN or infinite.
    InvalidTimestep(f64),
    /// No preset with this name exists in the body table.
    UnknownPreset(String),
    /// A configured body without a preset is missing a required field.
    IncompleteBody { index: usize, field: &'static str },
    /// Configuration file could not be parsed.
    Config(String),
    Io(io::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidMass { name, mass } => {
                write!(f, "body '{name}' has invalid mass {mass} (must be finite and > 0)")
            }
            SimError::NonFiniteState { name } => {
                write!(f, "body '{name}' has a non-finite initial position or velocity")
            }
            SimError::InvalidTimestep(dt) => write!(f, "timestep {dt} is not finite"),
            SimError::UnknownPreset(name) => write!(f, "no body preset named '{name}'"),
            SimError::IncompleteBody { index, field } => {
                write!(f, "body #{index} has no preset and no '{field}'")
            }
            SimError::Config(msg) => write!(f, "invalid configuration: {msg}"),
            SimError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SimError {
    fn from(e: io::Error) -> Self {
        SimError::Io(e)
    }
}

impl From<toml::de::Error> for SimError {
    fn from(e: toml::de::Error) -> Self {
        SimError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for SimError {
    fn from(e: toml::ser::Error) -> Self {
        SimError::Config(e.to_string())
    }
}
