//! Transmittance LUT: optical depth integrated from a point to the top of the
//! atmosphere, for every (view zenith angle, altitude) pair.

use glam::{DVec2, DVec3};
use rayon::prelude::*;
use skylut_config::AtmosphereParameters;

use crate::geometry::{intersect_sphere, transmittance_uv_to_params};
use crate::lut::{Lut, LutError, quantize};
use crate::medium;

pub const TRANSMITTANCE_LUT_WIDTH: u32 = 256;
pub const TRANSMITTANCE_LUT_HEIGHT: u32 = 64;

/// Midpoint-rule steps per segment.
pub const TRANSMITTANCE_STEPS: u32 = 32;

/// Transmittance along the straight segment from `p1` to `p2`.
pub fn transmittance(params: &AtmosphereParameters, p1: DVec3, p2: DVec3) -> DVec3 {
    let dir = (p2 - p1).normalize_or_zero();
    let ds = p1.distance(p2) / TRANSMITTANCE_STEPS as f64;

    let mut optical_depth = DVec3::ZERO;
    let mut p = p1 + dir * ds * 0.5;
    for _ in 0..TRANSMITTANCE_STEPS {
        let h = medium::altitude(params, p);
        optical_depth += medium::extinction(params, h) * ds;
        p += dir * ds;
    }

    medium::attenuation(optical_depth)
}

/// Transmittance to the top of the atmosphere for one LUT coordinate.
pub fn transmittance_texel(params: &AtmosphereParameters, uv: DVec2) -> DVec3 {
    let (cos_theta, r) =
        transmittance_uv_to_params(params.bottom_radius(), params.top_radius(), uv);

    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let view_dir = DVec3::new(sin_theta, cos_theta, 0.0);
    let eye = DVec3::new(0.0, r, 0.0);

    // The eye never leaves the shell, so the top sphere is always hit.
    let distance = intersect_sphere(DVec3::ZERO, params.top_radius(), eye, view_dir)
        .unwrap_or(0.0)
        .max(0.0);

    transmittance(params, eye, eye + view_dir * distance)
}

/// Bake the transmittance LUT at the given resolution.
///
/// Texel `(i, j)` holds the value for `uv = (i / width, j / height)`.
pub fn compute_transmittance_lut(
    params: &AtmosphereParameters,
    width: u32,
    height: u32,
) -> Result<Lut, LutError> {
    let texels = (0..width * height)
        .into_par_iter()
        .map(|index| {
            let uv = DVec2::new(
                (index % width) as f64 / width as f64,
                (index / width) as f64 / height as f64,
            );
            quantize(transmittance_texel(params, uv))
        })
        .collect();

    Lut::from_texels(width, height, texels)
}
