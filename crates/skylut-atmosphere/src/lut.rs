//! 8-bit RGB lookup tables: storage, bilinear sampling, and PNG persistence.
//!
//! Texels are stored in UV orientation (row `j` holds `v = j / height`).
//! Images are written vertically flipped, so pixel `(i, height - 1 - j)` of
//! the PNG holds texel `(i, j)`. The renderer relies on that convention.
//!
//! [`Lut::sample`] reads the table the way the renderer reads the PNG: image
//! row `y = v * (height - 1)` counted from the top of the image.

use std::path::Path;

use glam::{DVec2, DVec3};
use image::{Rgb, RgbImage};
use skylut_config::AtmosphereParameters;

use crate::geometry::params_to_transmittance_uv;

/// Errors that can occur while building, reading, or writing a LUT.
#[derive(Debug, thiserror::Error)]
pub enum LutError {
    /// Width or height is zero.
    #[error("LUT dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// Texel count doesn't match the given dimensions.
    #[error("LUT data holds {actual} texels, expected {expected} for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    /// A LUT loaded from disk has the wrong resolution.
    #[error("expected a {expected_width}x{expected_height} LUT, got {width}x{height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    /// Failed to create the output directory.
    #[error("failed to create {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// PNG encoding or decoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// A finished, read-only RGB8 lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut {
    width: u32,
    height: u32,
    texels: Vec<[u8; 3]>,
}

impl Lut {
    /// Wrap texels laid out row-major in UV orientation.
    pub fn from_texels(width: u32, height: u32, texels: Vec<[u8; 3]>) -> Result<Self, LutError> {
        if width == 0 || height == 0 {
            return Err(LutError::ZeroDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        if texels.len() != expected {
            return Err(LutError::DataSizeMismatch {
                actual: texels.len(),
                expected,
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Texel at column `i`, UV row `j`.
    pub fn texel(&self, i: u32, j: u32) -> [u8; 3] {
        self.texels[(j * self.width + i) as usize]
    }

    pub fn texels(&self) -> &[[u8; 3]] {
        &self.texels
    }

    /// Pixel `(x, y)` of the written image, normalized to `[0, 1]`.
    fn pixel_rgb(&self, x: u32, y: u32) -> DVec3 {
        let [r, g, b] = self.texel(x, self.height - 1 - y);
        DVec3::new(r as f64, g as f64, b as f64) / 255.0
    }

    /// Bilinear lookup over the image layout with edge-clamped pixel indices.
    ///
    /// `uv` addresses the PNG as written, `v = 0` being its top row.
    /// `uv` must already lie in `[0, 1]`; the caller clamps.
    pub fn sample(&self, uv: DVec2) -> DVec3 {
        let x = uv.x * (self.width - 1) as f64;
        let y = uv.y * (self.height - 1) as f64;

        let x0 = (x.floor() as u32).min(self.width - 1);
        let y0 = (y.floor() as u32).min(self.height - 1);
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = x - x0 as f64;
        let fy = y - y0 as f64;

        let c00 = self.pixel_rgb(x0, y0);
        let c10 = self.pixel_rgb(x1, y0);
        let c01 = self.pixel_rgb(x0, y1);
        let c11 = self.pixel_rgb(x1, y1);

        c00.lerp(c10, fx).lerp(c01.lerp(c11, fx), fy)
    }

    /// Export as an image with rows flipped to image orientation.
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            Rgb(self.texel(x, self.height - 1 - y))
        })
    }

    /// Import an image written by [`Lut::to_image`].
    pub fn from_image(image: &RgbImage) -> Result<Self, LutError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(LutError::ZeroDimensions { width, height });
        }
        let mut texels = Vec::with_capacity(width as usize * height as usize);
        for j in 0..height {
            for i in 0..width {
                texels.push(image.get_pixel(i, height - 1 - j).0);
            }
        }
        Self::from_texels(width, height, texels)
    }

    /// Write the LUT as an RGB8 PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), LutError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| LutError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Read a LUT previously written with [`Lut::save_png`].
    pub fn load_png(path: &Path) -> Result<Self, LutError> {
        let image = image::open(path)?.to_rgb8();
        Self::from_image(&image)
    }

    /// Fail unless the LUT has exactly the given resolution.
    pub fn expect_dimensions(&self, width: u32, height: u32) -> Result<(), LutError> {
        if self.dimensions() != (width, height) {
            return Err(LutError::DimensionMismatch {
                expected_width: width,
                expected_height: height,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Transmittance from `p` along `dir` to the top of the atmosphere, read from
/// a baked transmittance LUT.
///
/// The lookup goes through [`Lut::sample`], so it sees the table exactly as
/// the renderer sees the written PNG.
pub fn transmittance_to_top(
    params: &AtmosphereParameters,
    p: DVec3,
    dir: DVec3,
    transmittance_lut: &Lut,
) -> DVec3 {
    let r = p.length();
    let cos_theta = (p / r).dot(dir);
    let uv = params_to_transmittance_uv(params.bottom_radius(), params.top_radius(), cos_theta, r);
    transmittance_lut.sample(uv.clamp(DVec2::ZERO, DVec2::ONE))
}

/// Quantize a `[0, 1]` value to 8 bits: scale, clamp, truncate.
pub fn quantize(value: DVec3) -> [u8; 3] {
    let channel = |v: f64| (v * 255.0).clamp(0.0, 255.0) as u8;
    [channel(value.x), channel(value.y), channel(value.z)]
}
