//! Atmosphere parameter record with Earth-like defaults and file persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Physical description of a planet's atmosphere, loaded once per bake.
///
/// Keys are PascalCase on disk so the same settings file feeds both the
/// baker and the renderer. Every field is required: there is no
/// `#[serde(default)]` here, a missing key is a hard parse error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct AtmosphereParameters {
    /// Sea level offset in meters. Consumed by the renderer.
    pub sea_level: f64,
    /// Radius of the planet surface in meters.
    pub planet_radius: f64,
    /// Thickness of the atmosphere shell in meters.
    pub atmosphere_height: f64,
    /// Sun illuminance multiplier. Consumed by the renderer.
    pub sun_light_intensity: f64,
    /// Linear RGB sun color. Consumed by the renderer.
    pub sun_light_color: [f64; 3],
    /// Apparent sun disk angle in degrees. Consumed by the renderer.
    pub sun_disk_angle: f64,
    /// Multiplier on the Rayleigh scattering coefficient.
    pub rayleigh_scattering_scale: f64,
    /// Rayleigh scale height in meters.
    pub rayleigh_scattering_scalar_height: f64,
    /// Multiplier on the Mie scattering and absorption coefficients.
    pub mie_scattering_scale: f64,
    /// Mie phase asymmetry `g` in `[-1, 1]`.
    pub mie_anisotropy: f64,
    /// Mie scale height in meters.
    pub mie_scattering_scalar_height: f64,
    /// Multiplier on the ozone absorption coefficient.
    pub ozone_absorption_scale: f64,
    /// Altitude of the ozone layer peak in meters.
    pub ozone_level_center_height: f64,
    /// Half-width of the triangular ozone profile in meters.
    pub ozone_level_width: f64,
    /// Aerial perspective volume depth in meters. Consumed by the renderer.
    pub aerial_perspective_distance: f64,
}

impl Default for AtmosphereParameters {
    fn default() -> Self {
        Self {
            sea_level: 0.0,
            planet_radius: 6_360_000.0,
            atmosphere_height: 60_000.0,
            sun_light_intensity: 31.4,
            sun_light_color: [1.0, 1.0, 1.0],
            sun_disk_angle: 9.0,
            rayleigh_scattering_scale: 1.0,
            rayleigh_scattering_scalar_height: 8000.0,
            mie_scattering_scale: 1.0,
            mie_anisotropy: 0.8,
            mie_scattering_scalar_height: 1200.0,
            ozone_absorption_scale: 1.0,
            ozone_level_center_height: 25_000.0,
            ozone_level_width: 15_000.0,
            aerial_perspective_distance: 32_000.0,
        }
    }
}

/// On-disk encoding of a parameter file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsFormat {
    Json,
    Ron,
}

impl ParamsFormat {
    /// Pick the encoding from the file extension. Anything but `.ron` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Self::Ron,
            _ => Self::Json,
        }
    }
}

impl AtmosphereParameters {
    /// Radius of the ground sphere.
    pub fn bottom_radius(&self) -> f64 {
        self.planet_radius
    }

    /// Radius of the atmosphere-top sphere.
    pub fn top_radius(&self) -> f64 {
        self.planet_radius + self.atmosphere_height
    }

    /// Parse and validate a JSON parameter record.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let params: Self = serde_json::from_str(contents).map_err(ConfigError::ParseError)?;
        params.validate()?;
        Ok(params)
    }

    /// Parse and validate a RON parameter record.
    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        let params: Self = ron::from_str(contents).map_err(ConfigError::RonParseError)?;
        params.validate()?;
        Ok(params)
    }

    /// Load and validate parameters from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let params = match ParamsFormat::from_path(path) {
            ParamsFormat::Json => Self::from_json_str(&contents)?,
            ParamsFormat::Ron => Self::from_ron_str(&contents)?,
        };
        log::info!("Loaded atmosphere parameters from {}", path.display());
        Ok(params)
    }

    /// Write parameters to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(ConfigError::WriteError)?;
        }

        let serialized = match ParamsFormat::from_path(path) {
            ParamsFormat::Json => {
                serde_json::to_string_pretty(self).map_err(ConfigError::SerializeError)?
            }
            ParamsFormat::Ron => {
                let pretty = ron::ser::PrettyConfig::new().separate_tuple_members(true);
                ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::RonSerializeError)?
            }
        };

        std::fs::write(path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Check that every field lies inside its physical domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("SeaLevel", self.sea_level),
            ("PlanetRadius", self.planet_radius),
            ("AtmosphereHeight", self.atmosphere_height),
            ("SunLightIntensity", self.sun_light_intensity),
            ("SunDiskAngle", self.sun_disk_angle),
            ("RayleighScatteringScale", self.rayleigh_scattering_scale),
            ("RayleighScatteringScalarHeight", self.rayleigh_scattering_scalar_height),
            ("MieScatteringScale", self.mie_scattering_scale),
            ("MieAnisotropy", self.mie_anisotropy),
            ("MieScatteringScalarHeight", self.mie_scattering_scalar_height),
            ("OzoneAbsorptionScale", self.ozone_absorption_scale),
            ("OzoneLevelCenterHeight", self.ozone_level_center_height),
            ("OzoneLevelWidth", self.ozone_level_width),
            ("AerialPerspectiveDistance", self.aerial_perspective_distance),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(invalid(field, format!("must be finite, got {value}")));
            }
        }
        if self.sun_light_color.iter().any(|c| !c.is_finite()) {
            return Err(invalid("SunLightColor", "components must be finite".to_string()));
        }

        let positive = [
            ("PlanetRadius", self.planet_radius),
            ("AtmosphereHeight", self.atmosphere_height),
            ("RayleighScatteringScalarHeight", self.rayleigh_scattering_scalar_height),
            ("MieScatteringScalarHeight", self.mie_scattering_scalar_height),
            ("OzoneLevelWidth", self.ozone_level_width),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("RayleighScatteringScale", self.rayleigh_scattering_scale),
            ("MieScatteringScale", self.mie_scattering_scale),
            ("OzoneAbsorptionScale", self.ozone_absorption_scale),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(invalid(field, format!("must not be negative, got {value}")));
            }
        }

        if !(-1.0..=1.0).contains(&self.mie_anisotropy) {
            return Err(invalid(
                "MieAnisotropy",
                format!("must lie in [-1, 1], got {}", self.mie_anisotropy),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EARTH_JSON: &str = r#"{
        "SeaLevel": 0.0,
        "PlanetRadius": 6360000.0,
        "AtmosphereHeight": 60000.0,
        "SunLightIntensity": 31.4,
        "SunLightColor": [1.0, 1.0, 1.0],
        "SunDiskAngle": 9.0,
        "RayleighScatteringScale": 1.0,
        "RayleighScatteringScalarHeight": 8000.0,
        "MieScatteringScale": 1.0,
        "MieAnisotropy": 0.8,
        "MieScatteringScalarHeight": 1200.0,
        "OzoneAbsorptionScale": 1.0,
        "OzoneLevelCenterHeight": 25000.0,
        "OzoneLevelWidth": 15000.0,
        "AerialPerspectiveDistance": 32000.0
    }"#;

    #[test]
    fn test_parse_renderer_settings_file() {
        let params = AtmosphereParameters::from_json_str(EARTH_JSON).unwrap();
        assert_eq!(params, AtmosphereParameters::default());
        assert_eq!(params.top_radius(), 6_420_000.0);
    }

    #[test]
    fn test_missing_field_is_error() {
        let truncated = EARTH_JSON.replace("\"OzoneLevelWidth\": 15000.0,", "");
        let result = AtmosphereParameters::from_json_str(&truncated);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_malformed_color_is_error() {
        let bad = EARTH_JSON.replace("[1.0, 1.0, 1.0]", "[1.0, 1.0]");
        assert!(AtmosphereParameters::from_json_str(&bad).is_err());
    }

    #[test]
    fn test_extra_field_ignored() {
        let extended = EARTH_JSON.replace("{", "{ \"FutureSetting\": true,");
        assert!(AtmosphereParameters::from_json_str(&extended).is_ok());
    }

    #[test]
    fn test_anisotropy_out_of_range_rejected() {
        let params = AtmosphereParameters {
            mie_anisotropy: 1.5,
            ..Default::default()
        };
        match params.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "MieAnisotropy"),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_atmosphere_height_rejected() {
        let params = AtmosphereParameters {
            atmosphere_height: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_nan_rejected() {
        let params = AtmosphereParameters {
            sun_disk_angle: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_zero_scales_allowed() {
        let params = AtmosphereParameters {
            rayleigh_scattering_scale: 0.0,
            mie_scattering_scale: 0.0,
            ozone_absorption_scale: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atmosphere.json");
        let params = AtmosphereParameters {
            planet_radius: 3_390_000.0,
            mie_anisotropy: 0.65,
            ..Default::default()
        };
        params.save(&path).unwrap();
        let loaded = AtmosphereParameters::load(&path).unwrap();
        assert_eq!(params, loaded);
    }

    #[test]
    fn test_save_and_load_ron() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("atmosphere.ron");
        let params = AtmosphereParameters::default();
        params.save(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("PlanetRadius"));
        assert_eq!(AtmosphereParameters::load(&path).unwrap(), params);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ParamsFormat::from_path(Path::new("a.ron")), ParamsFormat::Ron);
        assert_eq!(ParamsFormat::from_path(Path::new("a.RON")), ParamsFormat::Ron);
        assert_eq!(ParamsFormat::from_path(Path::new("a.json")), ParamsFormat::Json);
        assert_eq!(ParamsFormat::from_path(Path::new("settings")), ParamsFormat::Json);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AtmosphereParameters::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }
}
