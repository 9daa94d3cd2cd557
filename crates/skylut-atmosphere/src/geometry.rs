//! Sphere intersection and the transmittance LUT parameterization.
//!
//! The UV mapping is shared with the renderer that samples the baked table,
//! so both directions must stay in lockstep with its shader code.

use glam::{DVec2, DVec3};

/// Distance along a unit-length ray to a sphere.
///
/// Returns `None` when the ray line passes farther than `radius` from
/// `center`. Otherwise returns the near intersection, or the far one when the
/// near one lies behind `origin` (origin inside the sphere). A sphere lying
/// entirely behind the origin yields a negative distance, so callers that need
/// a hit in front of the ray check for `> 0`.
pub fn intersect_sphere(center: DVec3, radius: f64, origin: DVec3, dir: DVec3) -> Option<f64> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let near = -b - sqrt_disc;
    let far = -b + sqrt_disc;
    Some(if near < 0.0 { far } else { near })
}

fn shell_extent(bottom_radius: f64, top_radius: f64) -> f64 {
    (top_radius * top_radius - bottom_radius * bottom_radius)
        .max(0.0)
        .sqrt()
}

/// Map a view zenith cosine and radius to transmittance LUT coordinates.
///
/// `u` interpolates the distance to the atmosphere edge between its minimum
/// (straight up) and maximum (grazing the ground); `v` is the horizon distance
/// normalized by its value at the top of the atmosphere.
pub fn params_to_transmittance_uv(
    bottom_radius: f64,
    top_radius: f64,
    cos_theta: f64,
    r: f64,
) -> DVec2 {
    let h = shell_extent(bottom_radius, top_radius);
    let rho = (r * r - bottom_radius * bottom_radius).max(0.0).sqrt();

    let discriminant = r * r * (cos_theta * cos_theta - 1.0) + top_radius * top_radius;
    let d = (-r * cos_theta + discriminant.max(0.0).sqrt()).max(0.0);

    let d_min = top_radius - r;
    let d_max = rho + h;
    DVec2::new((d - d_min) / (d_max - d_min), rho / h)
}

/// Inverse of [`params_to_transmittance_uv`]: returns `(cos_theta, r)`.
pub fn transmittance_uv_to_params(bottom_radius: f64, top_radius: f64, uv: DVec2) -> (f64, f64) {
    let h = shell_extent(bottom_radius, top_radius);
    let rho = h * uv.y;
    let r = (rho * rho + bottom_radius * bottom_radius).max(0.0).sqrt();

    let d_min = top_radius - r;
    let d_max = rho + h;
    let d = d_min + uv.x * (d_max - d_min);
    let cos_theta = if d == 0.0 {
        1.0
    } else {
        (h * h - rho * rho - d * d) / (2.0 * r * d)
    };
    (cos_theta.clamp(-1.0, 1.0), r)
}
