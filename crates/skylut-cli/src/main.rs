//! The binary entry point for the SkyLUT baker.
//!
//! `skylut <OUTPUT_DIR> <PARAMS>` loads the atmosphere parameters, bakes the
//! transmittance and multi-scattering tables, and writes them as PNG files.

use std::path::PathBuf;

use clap::Parser;
use skylut_atmosphere::{BakeError, Baker, Lut, MULTISCATTERING_PREVIEW_FILE};
use skylut_config::{AtmosphereParameters, CliArgs, ConfigError};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bake(#[from] BakeError),

    #[error("failed to load transmittance LUT {path}: {source}")]
    TransmittanceInput {
        path: PathBuf,
        #[source]
        source: skylut_atmosphere::LutError,
    },
}

fn main() {
    let args = CliArgs::parse();
    skylut_log::init_logging(Some(args.log_filter()), args.log_file.as_deref());

    if let Err(e) = run(&args) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), AppError> {
    if let Some(path) = &args.write_default_params {
        AtmosphereParameters::default().save(path)?;
        tracing::info!("Wrote default parameters to {}", path.display());
        return Ok(());
    }

    // clap enforces both positionals whenever --write-default-params is absent.
    let (Some(output_dir), Some(params_path)) = (&args.output_dir, &args.params) else {
        return Ok(());
    };

    let params = AtmosphereParameters::load(params_path)?;

    let existing = match &args.transmittance_lut {
        Some(path) => Some(Lut::load_png(path).map_err(|source| AppError::TransmittanceInput {
            path: path.clone(),
            source,
        })?),
        None => None,
    };

    let baker = Baker::new(args.threads)?;
    tracing::info!(
        "Baking atmosphere LUTs on {} threads into {}",
        baker.thread_count(),
        output_dir.display()
    );

    let luts = baker.bake(&params, existing)?;
    luts.save(output_dir).map_err(BakeError::from)?;

    if let Some(exposure) = args.preview_exposure {
        let preview = baker.preview(&params, &luts.transmittance, exposure)?;
        let path = output_dir.join(MULTISCATTERING_PREVIEW_FILE);
        preview.save_png(&path).map_err(BakeError::from)?;
        tracing::info!("Wrote preview with exposure {exposure} to {}", path.display());
    }

    Ok(())
}
