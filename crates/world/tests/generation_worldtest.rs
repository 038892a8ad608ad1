//! Region generation worldtest with metrics export
//!
//! Generates a grid of regions through the full provider chain, validates that independently
//! generated neighbours agree on their shared halo voxels, and exports throughput metrics.

use cavegen_core::{Border, FieldKind, IVec3, Region, RegionData};
use cavegen_testkit::{
    GenerationMetrics, MetricsReportBuilder, MetricsSink, SeamValidation, TestExecutionMetrics,
    TestResult,
};
use cavegen_world::{CaveConfig, CaveFieldProvider, CaveGenerator, TerrainProvider, TerrainShape};
use std::time::Instant;

const WORLD_SEED: u64 = 12345;
const GRID_RADIUS: i32 = 2;
const REGION_SIZE: IVec3 = IVec3::new(16, 32, 16);
const REGION_Y: i32 = 32;

fn region(rx: i32, rz: i32) -> Region {
    Region::from_min_size(
        IVec3::new(rx * REGION_SIZE.x, REGION_Y, rz * REGION_SIZE.z),
        REGION_SIZE,
    )
}

/// Terrain and raw cave field only, with a halo around the target.
fn raw_caves(target: Region, config: &CaveConfig, border: Border) -> RegionData {
    let mut data = RegionData::new(target);
    data.request_border(FieldKind::Caves, border);
    CaveGenerator::from_providers(vec![
        Box::new(TerrainProvider::new(WORLD_SEED, TerrainShape::default())),
        Box::new(CaveFieldProvider::new(WORLD_SEED, config.clone())),
    ])
    .generate(&mut data)
    .unwrap();
    data
}

#[test]
fn generation_metrics_worldtest() {
    let test_start = Instant::now();
    let config = CaveConfig {
        frequency: 0.5,
        ..Default::default()
    };
    let generator =
        CaveGenerator::with_terrain(WORLD_SEED, &config, TerrainShape::default()).unwrap();

    let mut times = Vec::new();
    let mut voxels_generated = 0;
    let mut cave_voxels = 0;
    let mut object_anchors = 0;
    let mut assertions = 0;

    for rz in -GRID_RADIUS..=GRID_RADIUS {
        for rx in -GRID_RADIUS..=GRID_RADIUS {
            let target = region(rx, rz);
            let mut data = RegionData::new(target);
            let start = Instant::now();
            generator.generate(&mut data).unwrap();
            times.push(start.elapsed().as_micros());

            let caves = data.boolean(FieldKind::Caves, Border::NONE).unwrap();
            voxels_generated += target.volume();
            cave_voxels += target.positions().filter(|&p| caves.get(p).unwrap()).count();

            let anchors = data.sparse(FieldKind::CaveObjects, Border::NONE).unwrap();
            for anchor in anchors.iter() {
                assert!(target.contains(anchor));
                assert!(caves.get(anchor).unwrap(), "anchor {anchor} outside any cave");
                assertions += 1;
            }
            object_anchors += anchors.len();

            let locations = data.locations(FieldKind::CaveLocations, Border::NONE).unwrap();
            let floors = data.height(FieldKind::CaveFloor, Border::NONE).unwrap();
            for ((x, z), runs) in locations.iter() {
                for run in runs {
                    if let Some((ceiling, floor)) = run.bounds() {
                        assert!(ceiling > floor);
                    }
                    assertions += 1;
                }
                let floor = *floors.get(x, z).unwrap();
                if !floor.is_nan() {
                    assert!(!caves.get(IVec3::new(x, floor as i32, z)).unwrap());
                    assertions += 1;
                }
            }
        }
    }

    // Seams: neighbours generated independently agree on every shared cave voxel.
    let border = Border::uniform(4);
    let mut seams = SeamValidation::default();
    for rz in -GRID_RADIUS..GRID_RADIUS {
        for rx in -GRID_RADIUS..GRID_RADIUS {
            let here = raw_caves(region(rx, rz), &config, border);
            for (dx, dz) in [(1, 0), (0, 1)] {
                let there = raw_caves(region(rx + dx, rz + dz), &config, border);
                let a = here.boolean(FieldKind::Caves, border).unwrap();
                let b = there.boolean(FieldKind::Caves, border).unwrap();
                let mut agree = true;
                for pos in a.region().positions().filter(|p| b.contains(*p)) {
                    agree &= a.get(pos).unwrap() == b.get(pos).unwrap();
                    seams.voxels_compared += 1;
                }
                seams.total_seams += 1;
                if agree {
                    seams.seams_valid += 1;
                } else {
                    seams.seams_failed += 1;
                }
            }
        }
    }
    assert_eq!(seams.seams_failed, 0, "cave fields disagree across region seams");
    assert!(seams.voxels_compared > 0);

    let regions_generated = times.len();
    let total: u128 = times.iter().sum();
    let metrics = GenerationMetrics {
        regions_generated,
        voxels_generated,
        cave_voxels,
        cave_fraction: cave_voxels as f64 / voxels_generated as f64,
        object_anchors,
        avg_gen_time_us: total as f64 / regions_generated as f64,
        min_gen_time_us: *times.iter().min().unwrap(),
        max_gen_time_us: *times.iter().max().unwrap(),
        total_gen_time_ms: total as f64 / 1000.0,
    };

    let report = MetricsReportBuilder::new("generation_metrics_worldtest")
        .result(TestResult::Pass)
        .generation(metrics)
        .seams(seams)
        .execution(TestExecutionMetrics {
            duration_seconds: test_start.elapsed().as_secs_f64(),
            assertions_checked: Some(assertions),
        })
        .build();
    MetricsSink::for_test("generation_metrics_worldtest")
        .unwrap()
        .write(&report)
        .unwrap();
}

#[test]
fn generation_is_deterministic() {
    let config = CaveConfig::default();
    let a = CaveGenerator::with_terrain(7, &config, TerrainShape::default()).unwrap();
    let b = CaveGenerator::with_terrain(7, &config, TerrainShape::default()).unwrap();
    let mut first = RegionData::new(region(1, -1));
    let mut second = RegionData::new(region(1, -1));
    a.generate(&mut first).unwrap();
    b.generate(&mut second).unwrap();

    assert_eq!(
        first.boolean(FieldKind::Caves, Border::NONE).unwrap(),
        second.boolean(FieldKind::Caves, Border::NONE).unwrap()
    );
    assert_eq!(
        first.boolean(FieldKind::Surfaces, Border::NONE).unwrap(),
        second.boolean(FieldKind::Surfaces, Border::NONE).unwrap()
    );
    assert_eq!(
        first.locations(FieldKind::CaveLocations, Border::NONE).unwrap(),
        second.locations(FieldKind::CaveLocations, Border::NONE).unwrap()
    );
}
