//! Precomputed atmosphere lookup tables.
//!
//! Bakes the transmittance LUT (256x64) and the multi-scattering LUT (32x32)
//! from an [`AtmosphereParameters`](skylut_config::AtmosphereParameters)
//! record. Every texel is a pure function of the parameters (and, for the
//! second pass, the finished transmittance LUT), so both passes run as a
//! parallel map without locks.

pub mod bake;
pub mod geometry;
pub mod lut;
pub mod medium;
pub mod multiscattering;
pub mod transmittance;

pub use bake::{
    BakeError, BakedLuts, Baker, MULTISCATTERING_LUT_FILE, MULTISCATTERING_PREVIEW_FILE,
    TRANSMITTANCE_LUT_FILE, bake,
};
pub use geometry::{intersect_sphere, params_to_transmittance_uv, transmittance_uv_to_params};
pub use lut::{Lut, LutError, transmittance_to_top};
pub use multiscattering::{
    MULTISCATTERING_LUT_HEIGHT, MULTISCATTERING_LUT_WIDTH, compute_multiscattering_lut,
    integrate_multiscattering,
};
pub use transmittance::{
    TRANSMITTANCE_LUT_HEIGHT, TRANSMITTANCE_LUT_WIDTH, compute_transmittance_lut, transmittance,
};
