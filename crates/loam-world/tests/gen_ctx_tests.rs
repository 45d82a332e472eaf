use std::io::Write;

use loam_world::{GenCtx, WorldGenParams, load_params_from_path};

#[test]
fn column_height_is_deterministic_across_contexts() {
    let params = WorldGenParams::default();
    let a = GenCtx::new(&params);
    let b = GenCtx::new(&params);
    for i in 0..64 {
        let (x, z) = (i as f32 * 3.0 - 90.0, i as f32 * -5.0 + 17.0);
        assert_eq!(a.column_height(x, z).to_bits(), b.column_height(x, z).to_bits());
        for y in [0.0f32, 10.0, 33.0, 63.0] {
            assert_eq!(a.is_solid_at(x, y, z), b.is_solid_at(x, y, z));
        }
    }
}

#[test]
fn seed_changes_terrain() {
    let a = GenCtx::new(&WorldGenParams::default());
    let b = GenCtx::new(&WorldGenParams {
        seed: 4242,
        ..WorldGenParams::default()
    });
    let differs = (0..64).any(|i| {
        let x = i as f32 * 11.0;
        a.column_height(x, 0.0) != b.column_height(x, 0.0)
    });
    assert!(differs);
}

#[test]
fn structure_never_fires_with_zero_rate() {
    let ctx = GenCtx::new(&WorldGenParams {
        structure_rate: 0.0,
        ..WorldGenParams::default()
    });
    for i in 0..100 {
        let f = i as f32;
        assert!(!ctx.structure_at(f * 2.0, f % 64.0, -f));
    }
}

#[test]
fn snow_line_stays_within_jitter() {
    let params = WorldGenParams::default();
    let ctx = GenCtx::new(&params);
    for i in 0..100 {
        let line = ctx.snow_line(i as f32 * 97.0, i as f32 * -31.0);
        assert!((line - params.snow_height).abs() <= params.snow_jitter * 1.01);
    }
}

#[test]
fn loads_params_from_toml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "seed = 99\n[chunk]\nsize = 8\n[structure]\nunstructure_rate = 0.1"
    )
    .unwrap();
    let p = load_params_from_path(file.path()).unwrap();
    assert_eq!(p.seed, 99);
    assert_eq!(p.chunk_size, 8);
    assert_eq!(p.chunk_height, 64);
    assert_eq!(p.unstructure_rate, 0.1);
}

#[test]
fn malformed_toml_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "seed = \"not a number\"").unwrap();
    assert!(load_params_from_path(file.path()).is_err());
}
