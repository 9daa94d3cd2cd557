//! Two-pass bake: transmittance first, then multi-scattering reading the
//! finished transmittance table.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::{ThreadPool, ThreadPoolBuilder};
use skylut_config::{AtmosphereParameters, ConfigError};

use crate::lut::{Lut, LutError};
use crate::multiscattering::{
    MULTISCATTERING_LUT_HEIGHT, MULTISCATTERING_LUT_WIDTH, compute_multiscattering_lut,
    compute_multiscattering_lut_exposed,
};
use crate::transmittance::{
    TRANSMITTANCE_LUT_HEIGHT, TRANSMITTANCE_LUT_WIDTH, compute_transmittance_lut,
};

/// File name of the transmittance LUT inside the output directory.
pub const TRANSMITTANCE_LUT_FILE: &str = "transmittance_lut.png";
/// File name of the multi-scattering LUT inside the output directory.
pub const MULTISCATTERING_LUT_FILE: &str = "scattering_lut.png";
/// File name of the optional exposure-scaled multi-scattering preview.
pub const MULTISCATTERING_PREVIEW_FILE: &str = "scattering_lut_preview.png";

/// Errors that abort a bake.
#[derive(Debug, thiserror::Error)]
pub enum BakeError {
    /// Parameters failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A LUT could not be built, read, or written.
    #[error(transparent)]
    Lut(#[from] LutError),

    /// The worker pool could not be started.
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Both finished lookup tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BakedLuts {
    pub transmittance: Lut,
    pub multiscattering: Lut,
}

impl BakedLuts {
    /// Write both tables into `dir` under their fixed names.
    pub fn save(&self, dir: &Path) -> Result<(PathBuf, PathBuf), LutError> {
        let transmittance_path = dir.join(TRANSMITTANCE_LUT_FILE);
        let multiscattering_path = dir.join(MULTISCATTERING_LUT_FILE);
        self.transmittance.save_png(&transmittance_path)?;
        self.multiscattering.save_png(&multiscattering_path)?;
        tracing::info!(
            "Wrote {} and {}",
            transmittance_path.display(),
            multiscattering_path.display()
        );
        Ok((transmittance_path, multiscattering_path))
    }
}

/// Runs the bake passes on a dedicated worker pool.
///
/// The pool is owned by the baker. Rayon's global pool is never used.
pub struct Baker {
    pool: ThreadPool,
}

impl Baker {
    /// Create a baker with `threads` workers, or one per logical CPU
    /// (`num_cpus::get`) when `None`.
    pub fn new(threads: Option<usize>) -> Result<Self, BakeError> {
        let threads = threads.unwrap_or_else(num_cpus::get).max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("lut-bake-{i}"))
            .build()?;
        tracing::debug!("Bake pool started with {threads} threads");
        Ok(Self { pool })
    }

    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Bake both LUTs.
    ///
    /// When `transmittance` is given it is used as-is instead of being
    /// recomputed; it must have the standard 256x64 resolution.
    pub fn bake(
        &self,
        params: &AtmosphereParameters,
        transmittance: Option<Lut>,
    ) -> Result<BakedLuts, BakeError> {
        params.validate()?;

        let transmittance = match transmittance {
            Some(lut) => {
                lut.expect_dimensions(TRANSMITTANCE_LUT_WIDTH, TRANSMITTANCE_LUT_HEIGHT)?;
                tracing::info!("Reusing supplied transmittance LUT");
                lut
            }
            None => self.transmittance_pass(params)?,
        };

        // The whole transmittance table is final before any scattering texel runs.
        let multiscattering = self.multiscattering_pass(params, &transmittance)?;

        Ok(BakedLuts {
            transmittance,
            multiscattering,
        })
    }

    fn transmittance_pass(&self, params: &AtmosphereParameters) -> Result<Lut, BakeError> {
        let start = Instant::now();
        let lut = self.pool.install(|| {
            compute_transmittance_lut(params, TRANSMITTANCE_LUT_WIDTH, TRANSMITTANCE_LUT_HEIGHT)
        })?;
        tracing::info!(
            "Transmittance LUT {}x{} baked in {:.1} ms",
            lut.width(),
            lut.height(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(lut)
    }

    fn multiscattering_pass(
        &self,
        params: &AtmosphereParameters,
        transmittance: &Lut,
    ) -> Result<Lut, BakeError> {
        let start = Instant::now();
        let lut = self.pool.install(|| {
            compute_multiscattering_lut(
                params,
                transmittance,
                MULTISCATTERING_LUT_WIDTH,
                MULTISCATTERING_LUT_HEIGHT,
            )
        })?;
        tracing::info!(
            "Multi-scattering LUT {}x{} baked in {:.1} ms",
            lut.width(),
            lut.height(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(lut)
    }

    /// Exposure-scaled multi-scattering table for visual inspection.
    pub fn preview(
        &self,
        params: &AtmosphereParameters,
        transmittance: &Lut,
        exposure: f64,
    ) -> Result<Lut, BakeError> {
        let lut = self.pool.install(|| {
            compute_multiscattering_lut_exposed(
                params,
                transmittance,
                MULTISCATTERING_LUT_WIDTH,
                MULTISCATTERING_LUT_HEIGHT,
                exposure,
            )
        })?;
        Ok(lut)
    }
}

/// Bake both LUTs with one worker per CPU.
pub fn bake(params: &AtmosphereParameters) -> Result<BakedLuts, BakeError> {
    Baker::new(None)?.bake(params, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_count_respected() {
        let baker = Baker::new(Some(2)).unwrap();
        assert_eq!(baker.thread_count(), 2);
        assert!(Baker::new(Some(0)).unwrap().thread_count() >= 1);
    }

    #[test]
    fn test_default_pool_has_one_thread_per_cpu() {
        let baker = Baker::new(None).unwrap();
        assert_eq!(baker.thread_count(), num_cpus::get());
    }

    #[test]
    fn test_invalid_params_rejected_before_work() {
        let params = AtmosphereParameters {
            mie_anisotropy: -3.0,
            ..Default::default()
        };
        let result = Baker::new(Some(1)).unwrap().bake(&params, None);
        assert!(matches!(result, Err(BakeError::Config(_))));
    }

    #[test]
    fn test_wrong_size_transmittance_rejected() {
        let params = AtmosphereParameters::default();
        let small = Lut::from_texels(2, 2, vec![[255; 3]; 4]).unwrap();
        let result = Baker::new(Some(1)).unwrap().bake(&params, Some(small));
        assert!(matches!(
            result,
            Err(BakeError::Lut(LutError::DimensionMismatch { .. }))
        ));
    }
}
