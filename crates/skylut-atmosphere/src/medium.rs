//! Participating medium: per-species scattering and absorption as functions
//! of altitude, plus the Rayleigh and Mie phase functions.
//!
//! Coefficients are in 1/m for three RGB proxy wavelengths.

use std::f64::consts::PI;

use glam::DVec3;
use skylut_config::AtmosphereParameters;

/// Rayleigh scattering at sea level.
pub const RAYLEIGH_SCATTERING_BASE: DVec3 = DVec3::new(5.802e-6, 13.558e-6, 33.1e-6);
/// Mie scattering at sea level (gray).
pub const MIE_SCATTERING_BASE: f64 = 3.996e-6;
/// Mie absorption at sea level (gray).
pub const MIE_ABSORPTION_BASE: f64 = 4.4e-6;
/// Ozone absorption at the layer peak.
pub const OZONE_ABSORPTION_BASE: DVec3 = DVec3::new(0.650e-6, 1.881e-6, 0.085e-6);

/// Altitude of `p` above the planet surface. Slightly negative or overshooting
/// values near the shell boundaries are expected from rounding.
pub fn altitude(params: &AtmosphereParameters, p: DVec3) -> f64 {
    p.length() - params.planet_radius
}

/// Rayleigh scattering, falling off exponentially with altitude.
pub fn rayleigh_scattering(params: &AtmosphereParameters, h: f64) -> DVec3 {
    let density = (-h / params.rayleigh_scattering_scalar_height).exp();
    RAYLEIGH_SCATTERING_BASE * density * params.rayleigh_scattering_scale
}

/// Rayleigh phase function, normalized over the sphere.
pub fn rayleigh_phase(cos_theta: f64) -> f64 {
    3.0 / (16.0 * PI) * (1.0 + cos_theta * cos_theta)
}

fn mie_density(params: &AtmosphereParameters, h: f64) -> f64 {
    (-h / params.mie_scattering_scalar_height).exp() * params.mie_scattering_scale
}

/// Mie scattering, sharing its density profile with Mie absorption.
pub fn mie_scattering(params: &AtmosphereParameters, h: f64) -> DVec3 {
    DVec3::splat(MIE_SCATTERING_BASE * mie_density(params, h))
}

/// Mie absorption. Scaled by the Mie scattering scale as well.
pub fn mie_absorption(params: &AtmosphereParameters, h: f64) -> DVec3 {
    DVec3::splat(MIE_ABSORPTION_BASE * mie_density(params, h))
}

/// Cornette-Shanks flavoured Henyey-Greenstein phase with asymmetry `g`.
pub fn mie_phase(cos_theta: f64, g: f64) -> f64 {
    let g2 = g * g;
    let num = 3.0 * (1.0 - g2) * (1.0 + cos_theta * cos_theta);
    let denom = 8.0 * PI * (2.0 + g2) * (1.0 + g2 - 2.0 * g * cos_theta).powf(1.5);
    num / denom
}

/// Triangular ozone profile peaking at the layer center.
pub fn ozone_absorption(params: &AtmosphereParameters, h: f64) -> DVec3 {
    let density = (1.0 - (h - params.ozone_level_center_height).abs() / params.ozone_level_width)
        .max(0.0);
    OZONE_ABSORPTION_BASE * density * params.ozone_absorption_scale
}

/// Total scattering coefficient (Rayleigh + Mie).
pub fn scattering(params: &AtmosphereParameters, h: f64) -> DVec3 {
    rayleigh_scattering(params, h) + mie_scattering(params, h)
}

/// Total absorption coefficient (ozone + Mie).
pub fn absorption(params: &AtmosphereParameters, h: f64) -> DVec3 {
    ozone_absorption(params, h) + mie_absorption(params, h)
}

/// Extinction: scattering plus absorption.
pub fn extinction(params: &AtmosphereParameters, h: f64) -> DVec3 {
    scattering(params, h) + absorption(params, h)
}

/// Phase-weighted single-scattering source at `p` for light arriving along
/// `light_dir` and leaving along `view_dir`.
pub fn in_scattering(
    params: &AtmosphereParameters,
    p: DVec3,
    light_dir: DVec3,
    view_dir: DVec3,
) -> DVec3 {
    let cos_theta = light_dir.dot(view_dir);
    let h = altitude(params, p);
    let rayleigh = rayleigh_scattering(params, h) * rayleigh_phase(cos_theta);
    let mie = mie_scattering(params, h) * mie_phase(cos_theta, params.mie_anisotropy);
    rayleigh + mie
}

/// Component-wise `exp(-v)`.
pub fn attenuation(optical_depth: DVec3) -> DVec3 {
    DVec3::new(
        (-optical_depth.x).exp(),
        (-optical_depth.y).exp(),
        (-optical_depth.z).exp(),
    )
}
