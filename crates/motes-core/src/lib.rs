//! Motes core: platform-agnostic particle field, drift simulation, and the
//! console command set that tunes them at runtime.

pub mod color;
pub mod command;
pub mod config;
pub mod error;
pub mod field;
pub mod params;
pub mod session;
pub mod simulation;

pub use color::Color;
pub use command::Command;
pub use config::MotesConfig;
pub use error::{CommandError, ConfigError};
pub use field::ParticleField;
pub use params::{ParameterStore, Parameters, MAX_PARTICLES};
pub use session::Session;
