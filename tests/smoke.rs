use cavegen::{export, grid_regions, run, GeneratorConfig, MAX_GRID_RADIUS};
use std::path::Path;

#[test]
fn shipped_config_matches_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/cavegen.toml");
    assert_eq!(
        GeneratorConfig::load_from_path(&path),
        GeneratorConfig::default()
    );
}

#[test]
fn small_grid_generates_and_exports() {
    let config = GeneratorConfig {
        region_size: [16, 48, 16],
        base_y: 32,
        grid_radius: 1,
        ..Default::default()
    };
    assert_eq!(grid_regions(&config).len(), 9);

    let summaries = run(&config).expect("generation succeeds");
    assert_eq!(summaries.len(), 9);
    for summary in &summaries {
        assert!(summary.cave_voxels <= 16 * 48 * 16);
        assert!(summary.object_anchors <= 2 * summary.bounded_caves);
    }

    let path = std::env::temp_dir().join("cavegen-smoke-summary.json");
    export(&path, &summaries).expect("export succeeds");
    let contents = std::fs::read_to_string(&path).expect("file readable");
    assert!(contents.contains("cave_voxels"));
    std::fs::remove_file(&path).ok();
}

#[test]
fn invalid_cave_config_is_rejected() {
    let mut config = GeneratorConfig::default();
    config.caves.tunnel_radius = 9.0;
    config.caves.cave_radius = 2.0;
    assert!(run(&config).is_err());
}

#[test]
fn oversized_grid_radius_is_clamped() {
    let config = GeneratorConfig {
        grid_radius: i32::MAX,
        ..Default::default()
    };
    let side = (2 * MAX_GRID_RADIUS + 1) as usize;
    let regions = grid_regions(&config);
    assert_eq!(regions.len(), side * side);

    let negative = GeneratorConfig {
        grid_radius: -5,
        ..Default::default()
    };
    assert_eq!(grid_regions(&negative).len(), 1);
}
