//! Configuration for the SkyLUT baker.
//!
//! Holds the immutable [`AtmosphereParameters`] record shared by both LUT
//! passes, reads and writes it as JSON (or RON), validates it before any
//! integration work starts, and parses the command line via clap.

mod cli;
mod error;
mod params;

pub use cli::CliArgs;
pub use error::ConfigError;
pub use params::{AtmosphereParameters, ParamsFormat};
