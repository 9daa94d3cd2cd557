//! Multi-scattering LUT.
//!
//! For each (sun zenith cosine, altitude) pair, second-order scattered light
//! is gathered over a fixed set of directions on the sphere, then extended to
//! all higher orders with the geometric series `G2 / (1 - f_ms)`. Values are
//! unitless: the renderer multiplies in sun color and intensity.

use std::f64::consts::PI;

use glam::{DVec2, DVec3};
use rayon::prelude::*;
use skylut_config::AtmosphereParameters;

use crate::geometry::intersect_sphere;
use crate::lut::{Lut, LutError, quantize, transmittance_to_top};
use crate::medium;

pub const MULTISCATTERING_LUT_WIDTH: u32 = 32;
pub const MULTISCATTERING_LUT_HEIGHT: u32 = 32;

/// Ray-march steps per sample direction.
pub const MULTISCATTERING_STEPS: u32 = 32;

/// Quasi-uniform unit directions covering the sphere. Fixed so that bakes
/// are reproducible.
pub const SPHERE_SAMPLES: [[f64; 3]; 64] = [
    [-0.7838, -0.620933, 0.00996137],
    [0.106751, 0.965982, 0.235549],
    [-0.215177, -0.687115, -0.693954],
    [0.318002, 0.0640084, -0.945927],
    [0.357396, 0.555673, 0.750664],
    [0.866397, -0.19756, 0.458613],
    [0.130216, 0.232736, -0.963783],
    [-0.00174431, 0.376657, 0.926351],
    [0.663478, 0.704806, -0.251089],
    [0.0327851, 0.110534, -0.993331],
    [0.0561973, 0.0234288, 0.998145],
    [0.0905264, -0.169771, 0.981317],
    [0.26694, 0.95222, -0.148393],
    [-0.812874, -0.559051, -0.163393],
    [-0.323378, -0.25855, -0.910263],
    [-0.1333, 0.591356, -0.795317],
    [0.480876, 0.408711, 0.775702],
    [-0.332263, -0.533895, -0.777533],
    [-0.0392473, -0.704457, -0.708661],
    [0.427015, 0.239811, 0.871865],
    [-0.416624, -0.563856, 0.713085],
    [0.12793, 0.334479, -0.933679],
    [-0.0343373, -0.160593, -0.986423],
    [0.580614, 0.0692947, 0.811225],
    [-0.459187, 0.43944, 0.772036],
    [0.215474, -0.539436, -0.81399],
    [-0.378969, -0.31988, -0.868366],
    [-0.279978, -0.0109692, 0.959944],
    [0.692547, 0.690058, 0.210234],
    [0.53227, -0.123044, -0.837585],
    [-0.772313, -0.283334, -0.568555],
    [-0.0311218, 0.995988, -0.0838977],
    [-0.366931, -0.276531, -0.888196],
    [0.488778, 0.367878, -0.791051],
    [-0.885561, -0.453445, 0.100842],
    [0.71656, 0.443635, 0.538265],
    [0.645383, -0.152576, -0.748466],
    [-0.171259, 0.91907, 0.354939],
    [-0.0031122, 0.9457, 0.325026],
    [0.731503, 0.623089, -0.276881],
    [-0.91466, 0.186904, 0.358419],
    [0.15595, 0.828193, -0.538309],
    [0.175396, 0.584732, 0.792038],
    [-0.0838381, -0.943461, 0.320707],
    [0.305876, 0.727604, 0.614029],
    [0.754642, -0.197903, -0.62558],
    [0.217255, -0.0177771, -0.975953],
    [0.140412, -0.844826, 0.516287],
    [-0.549042, 0.574859, -0.606705],
    [0.570057, 0.17459, 0.802841],
    [-0.0330304, 0.775077, 0.631003],
    [-0.938091, 0.138937, 0.317304],
    [0.483197, -0.726405, -0.48873],
    [0.485263, 0.52926, 0.695991],
    [0.224189, 0.742282, -0.631472],
    [-0.322429, 0.662214, -0.676396],
    [0.625577, -0.12711, 0.769738],
    [-0.714032, -0.584461, -0.385439],
    [-0.0652053, -0.892579, -0.446151],
    [0.408421, -0.912487, 0.0236566],
    [0.0900381, 0.319983, 0.943135],
    [-0.708553, 0.483646, 0.513847],
    [0.803855, -0.0902273, 0.587942],
    [-0.0555802, -0.374602, -0.925519],
];

const UNIFORM_PHASE: f64 = 1.0 / (4.0 * PI);

/// Solid angle carried by each entry of [`SPHERE_SAMPLES`].
pub const SAMPLE_SOLID_ANGLE: f64 = 4.0 * PI / SPHERE_SAMPLES.len() as f64;

/// Second-order radiance and scattering fraction gathered around one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatteringMoments {
    /// Second-order in-scattered radiance, `G2`.
    pub second_order: DVec3,
    /// Fraction of light re-scattered toward the point, `f_ms`.
    pub transfer: DVec3,
}

impl ScatteringMoments {
    /// Sum of all orders `>= 2`: `G2 / (1 - f_ms)`, with NaN channels zeroed.
    pub fn multiple_scattering(&self) -> DVec3 {
        let total = self.second_order / (DVec3::ONE - self.transfer);
        DVec3::new(
            finite_or_zero(total.x),
            finite_or_zero(total.y),
            finite_or_zero(total.z),
        )
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v }
}

/// Gather second-order moments at `sample_point` lit from `light_dir`.
pub fn scattering_moments(
    params: &AtmosphereParameters,
    sample_point: DVec3,
    light_dir: DVec3,
    transmittance_lut: &Lut,
) -> ScatteringMoments {
    let mut second_order = DVec3::ZERO;
    let mut transfer = DVec3::ZERO;

    for sample in SPHERE_SAMPLES {
        let view_dir = DVec3::from_array(sample).normalize();

        // Sample points lie inside the shell, so the top sphere is always hit.
        let Some(mut distance) =
            intersect_sphere(DVec3::ZERO, params.top_radius(), sample_point, view_dir)
        else {
            continue;
        };
        if let Some(ground) =
            intersect_sphere(DVec3::ZERO, params.bottom_radius(), sample_point, view_dir)
            && ground > 0.0
        {
            distance = distance.min(ground);
        }

        let ds = distance / MULTISCATTERING_STEPS as f64;
        let mut p = sample_point + view_dir * ds * 0.5;
        let mut optical_depth = DVec3::ZERO;

        for _ in 0..MULTISCATTERING_STEPS {
            let h = medium::altitude(params, p);
            // Once under the ground the ray never comes back up.
            if h < 0.0 {
                break;
            }

            let sigma_s = medium::scattering(params, h);
            let sigma_t = sigma_s + medium::absorption(params, h);
            optical_depth += sigma_t * ds;

            let sun = transmittance_to_top(params, p, light_dir, transmittance_lut);
            let source = medium::in_scattering(params, p, light_dir, view_dir);
            let to_origin = medium::attenuation(optical_depth);

            second_order += sun * source * to_origin * UNIFORM_PHASE * ds;
            transfer += to_origin * sigma_s * UNIFORM_PHASE * ds;
            p += view_dir * ds;
        }
    }

    ScatteringMoments {
        second_order: second_order * SAMPLE_SOLID_ANGLE,
        transfer: transfer * SAMPLE_SOLID_ANGLE,
    }
}

/// Multiple-scattering contribution at `sample_point` lit from `light_dir`.
pub fn integrate_multiscattering(
    params: &AtmosphereParameters,
    sample_point: DVec3,
    light_dir: DVec3,
    transmittance_lut: &Lut,
) -> DVec3 {
    scattering_moments(params, sample_point, light_dir, transmittance_lut).multiple_scattering()
}

/// Multiple-scattering value for one LUT coordinate.
///
/// `u` maps linearly to the sun zenith cosine in `[-1, 1]`, `v` linearly to
/// altitude across the atmosphere shell.
pub fn multiscattering_texel(
    params: &AtmosphereParameters,
    uv: DVec2,
    transmittance_lut: &Lut,
) -> DVec3 {
    let mu_s = 2.0 * uv.x - 1.0;
    let r = uv.y * params.atmosphere_height + params.planet_radius;

    let sin_theta = (1.0 - mu_s * mu_s).max(0.0).sqrt();
    let light_dir = DVec3::new(sin_theta, mu_s, 0.0);
    let p = DVec3::new(0.0, r, 0.0);

    integrate_multiscattering(params, p, light_dir, transmittance_lut)
}

/// Bake the multi-scattering LUT, reading sunlight from a finished
/// transmittance LUT.
pub fn compute_multiscattering_lut(
    params: &AtmosphereParameters,
    transmittance_lut: &Lut,
    width: u32,
    height: u32,
) -> Result<Lut, LutError> {
    compute_multiscattering_lut_exposed(params, transmittance_lut, width, height, 1.0)
}

/// Same as [`compute_multiscattering_lut`] with every value multiplied by
/// `exposure` before quantization. Used for preview images; the LUT consumed
/// by the renderer always uses an exposure of one.
pub fn compute_multiscattering_lut_exposed(
    params: &AtmosphereParameters,
    transmittance_lut: &Lut,
    width: u32,
    height: u32,
    exposure: f64,
) -> Result<Lut, LutError> {
    let texels = (0..width * height)
        .into_par_iter()
        .map(|index| {
            let uv = DVec2::new(
                (index % width) as f64 / width as f64,
                (index / width) as f64 / height as f64,
            );
            quantize(multiscattering_texel(params, uv, transmittance_lut) * exposure)
        })
        .collect();

    Lut::from_texels(width, height, texels)
}
