use glam::{DVec2, DVec3};
use skylut_atmosphere::multiscattering::{multiscattering_texel, scattering_moments};
use skylut_atmosphere::{
    Baker, Lut, MULTISCATTERING_LUT_FILE, TRANSMITTANCE_LUT_FILE, TRANSMITTANCE_LUT_HEIGHT,
    TRANSMITTANCE_LUT_WIDTH, bake, compute_multiscattering_lut, compute_transmittance_lut,
    transmittance_to_top,
};
use skylut_config::AtmosphereParameters;

fn near_vacuum() -> AtmosphereParameters {
    AtmosphereParameters {
        atmosphere_height: 1.0,
        rayleigh_scattering_scale: 0.0,
        mie_scattering_scale: 0.0,
        ozone_absorption_scale: 0.0,
        ..Default::default()
    }
}

#[test]
fn near_vacuum_transmittance_is_white() {
    let lut = compute_transmittance_lut(
        &near_vacuum(),
        TRANSMITTANCE_LUT_WIDTH,
        TRANSMITTANCE_LUT_HEIGHT,
    )
    .unwrap();
    assert!(lut.texels().iter().all(|t| *t == [255, 255, 255]));
}

#[test]
fn zenith_brighter_than_horizon_at_sea_level() {
    let params = AtmosphereParameters::default();
    let lut = compute_transmittance_lut(&params, TRANSMITTANCE_LUT_WIDTH, TRANSMITTANCE_LUT_HEIGHT)
        .unwrap();

    let zenith = lut.texel(0, 0);
    let grazing = lut.texel(TRANSMITTANCE_LUT_WIDTH - 1, 0);
    for c in 0..3 {
        assert!(
            zenith[c] > grazing[c],
            "channel {c}: zenith {zenith:?} vs grazing {grazing:?}"
        );
    }

    // In the written image the sea-level row is the bottom one.
    let image = lut.to_image();
    assert_eq!(image.get_pixel(0, TRANSMITTANCE_LUT_HEIGHT - 1).0, zenith);
}

#[test]
fn transmittance_decreases_toward_horizon() {
    let params = AtmosphereParameters::default();
    let lut = compute_transmittance_lut(&params, TRANSMITTANCE_LUT_WIDTH, TRANSMITTANCE_LUT_HEIGHT)
        .unwrap();
    for j in [0, 16, 32] {
        for i in 1..TRANSMITTANCE_LUT_WIDTH {
            let prev = lut.texel(i - 1, j);
            let cur = lut.texel(i, j);
            assert!(
                (0..3).all(|c| cur[c] <= prev[c]),
                "row {j}: texel {i} {cur:?} brighter than {prev:?}"
            );
        }
    }
}

#[test]
fn full_bake_writes_both_images() {
    let params = AtmosphereParameters::default();
    let baker = Baker::new(Some(2)).unwrap();
    let luts = baker.bake(&params, None).unwrap();

    assert_eq!(luts.transmittance.dimensions(), (256, 64));
    assert_eq!(luts.multiscattering.dimensions(), (32, 32));
    // Daylight somewhere in the table, darkness on the night side.
    assert!(luts.multiscattering.texels().iter().any(|t| t[2] > 0));
    assert_eq!(luts.multiscattering.texel(0, 16)[2], 0);

    let dir = tempfile::tempdir().unwrap();
    let (transmittance_path, scattering_path) = luts.save(dir.path()).unwrap();
    assert_eq!(transmittance_path, dir.path().join(TRANSMITTANCE_LUT_FILE));
    assert_eq!(scattering_path, dir.path().join(MULTISCATTERING_LUT_FILE));

    let reloaded = Lut::load_png(&transmittance_path).unwrap();
    assert_eq!(reloaded, luts.transmittance);

    // Reusing the stored transmittance table reproduces the second pass.
    let again = baker.bake(&params, Some(reloaded)).unwrap();
    assert_eq!(again, luts);
}

#[test]
fn default_bake_of_near_vacuum() {
    let luts = bake(&near_vacuum()).unwrap();
    assert_eq!(luts.transmittance.dimensions(), (256, 64));
    assert!(luts.transmittance.texels().iter().all(|t| *t == [255, 255, 255]));
    // Nothing to scatter off.
    assert!(luts.multiscattering.texels().iter().all(|t| *t == [0, 0, 0]));
}

#[test]
fn scattering_pass_reads_transmittance_as_written_image() {
    let params = AtmosphereParameters::default();
    let lut = compute_transmittance_lut(&params, TRANSMITTANCE_LUT_WIDTH, TRANSMITTANCE_LUT_HEIGHT)
        .unwrap();
    let image = lut.to_image();

    // Grid points of the sampler land exactly on image pixels.
    for (x, y) in [(0, 0), (17, 5), (255, 63), (128, 40)] {
        let uv = DVec2::new(
            x as f64 / (TRANSMITTANCE_LUT_WIDTH - 1) as f64,
            y as f64 / (TRANSMITTANCE_LUT_HEIGHT - 1) as f64,
        );
        let [r, g, b] = image.get_pixel(x, y).0;
        let expected = DVec3::new(r as f64, g as f64, b as f64) / 255.0;
        assert_eq!(lut.sample(uv), expected, "pixel ({x}, {y})");
    }

    // Straight up from the ground reads the top-left pixel.
    let ground = DVec3::new(0.0, params.planet_radius, 0.0);
    let t = transmittance_to_top(&params, ground, DVec3::Y, &lut);
    let [r, g, b] = image.get_pixel(0, 0).0;
    assert_eq!(t, DVec3::new(r as f64, g as f64, b as f64) / 255.0);

    // Reading the UV rows directly would give a different scattering table.
    let uv_rows: Vec<[u8; 3]> = image.pixels().map(|p| p.0).collect();
    let as_uv = Lut::from_texels(TRANSMITTANCE_LUT_WIDTH, TRANSMITTANCE_LUT_HEIGHT, uv_rows)
        .unwrap();
    let scattering = compute_multiscattering_lut(&params, &lut, 32, 32).unwrap();
    let scattering_uv = compute_multiscattering_lut(&params, &as_uv, 32, 32).unwrap();
    assert_ne!(scattering, scattering_uv);
}

#[test]
fn thick_scattering_atmosphere_keeps_transfer_below_one() {
    // Pure scattering, no absorption, many times Earth's density: the
    // re-scattered fraction approaches one but a finite march never reaches it.
    let params = AtmosphereParameters {
        rayleigh_scattering_scale: 50.0,
        mie_scattering_scale: 0.0,
        ozone_absorption_scale: 0.0,
        ..Default::default()
    };
    let lut = compute_transmittance_lut(&params, 64, 16).unwrap();

    for j in 0..4 {
        for i in 0..4 {
            let uv = DVec2::new(i as f64 / 4.0 + 0.125, j as f64 / 4.0);
            let mu_s = 2.0 * uv.x - 1.0;
            let light = DVec3::new((1.0 - mu_s * mu_s).sqrt(), mu_s, 0.0);
            let p = DVec3::new(0.0, params.planet_radius + uv.y * params.atmosphere_height, 0.0);
            let moments = scattering_moments(&params, p, light, &lut);
            assert!(
                moments.transfer.max_element() < 1.0,
                "uv={uv:?}: {moments:?}"
            );

            let value = multiscattering_texel(&params, uv, &lut);
            assert!(value.is_finite() && value.min_element() >= 0.0, "uv={uv:?}: {value:?}");
        }
    }
}
