//! Command-line argument parsing for the LUT baker.

use std::path::PathBuf;

use clap::Parser;

/// SkyLUT command-line arguments.
///
/// `skylut <OUTPUT_DIR> <PARAMS>` bakes both lookup tables into `OUTPUT_DIR`.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "skylut",
    about = "Bake atmosphere transmittance and multi-scattering lookup tables"
)]
pub struct CliArgs {
    /// Directory receiving the generated PNG files.
    #[arg(required_unless_present = "write_default_params")]
    pub output_dir: Option<PathBuf>,

    /// Atmosphere parameter file (JSON, or RON with a `.ron` extension).
    #[arg(required_unless_present = "write_default_params")]
    pub params: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Also write structured JSON logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Worker thread count (defaults to one per CPU).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Reuse an existing transmittance LUT image instead of recomputing it.
    #[arg(long)]
    pub transmittance_lut: Option<PathBuf>,

    /// Also write an exposure-scaled copy of the scattering LUT for inspection.
    #[arg(long)]
    pub preview_exposure: Option<f64>,

    /// Write Earth-like default parameters to this path and exit.
    #[arg(long)]
    pub write_default_params: Option<PathBuf>,
}

impl CliArgs {
    /// Log filter string, falling back to `info`.
    pub fn log_filter(&self) -> &str {
        match self.log_level.as_deref() {
            Some(level) if !level.is_empty() => level,
            _ => "info",
        }
    }
}
