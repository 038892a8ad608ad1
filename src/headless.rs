//! Headless generation over a grid of regions.

use crate::config::{GeneratorConfig, MAX_GRID_RADIUS};
use anyhow::{Context, Result};
use cavegen_core::{Border, FieldKind, IVec3, Region, RegionData};
use cavegen_world::CaveGenerator;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Per-region summary of one generation pass.
#[derive(Debug, Clone, Serialize)]
pub struct RegionSummary {
    /// Region minimum corner [x, y, z].
    pub min: [i32; 3],
    /// Region maximum corner [x, y, z].
    pub max: [i32; 3],
    /// Cave voxels inside the region.
    pub cave_voxels: usize,
    /// Cave runs with both ceiling and floor known.
    pub bounded_caves: usize,
    /// Columns with a legacy single floor.
    pub floor_columns: usize,
    /// Cave object anchors.
    pub object_anchors: usize,
    /// Generation time in microseconds.
    pub micros: u128,
}

/// Target regions of the configured grid, row by row.
///
/// The radius is clamped to `0..=MAX_GRID_RADIUS`.
pub fn grid_regions(config: &GeneratorConfig) -> Vec<Region> {
    let [sx, sy, sz] = config.region_size;
    let size = IVec3::new(sx.max(1), sy.max(1), sz.max(1));
    let radius = config.grid_radius.clamp(0, MAX_GRID_RADIUS);
    let mut regions = Vec::new();
    for rz in -radius..=radius {
        for rx in -radius..=radius {
            let min = IVec3::new(rx * size.x, config.base_y, rz * size.z);
            regions.push(Region::from_min_size(min, size));
        }
    }
    regions
}

fn summarize(data: &RegionData, micros: u128) -> Result<RegionSummary> {
    let region = data.region();
    let caves = data.boolean(FieldKind::Caves, Border::NONE)?;
    let locations = data.locations(FieldKind::CaveLocations, Border::NONE)?;
    let floors = data.height(FieldKind::CaveFloor, Border::NONE)?;
    let anchors = data.sparse(FieldKind::CaveObjects, Border::NONE)?;

    let mut cave_voxels = 0;
    for pos in region.positions() {
        if caves.get(pos)? {
            cave_voxels += 1;
        }
    }
    Ok(RegionSummary {
        min: region.min().to_array(),
        max: region.max().to_array(),
        cave_voxels,
        bounded_caves: locations
            .iter()
            .flat_map(|(_, runs)| runs)
            .filter(|run| run.bounds().is_some())
            .count(),
        floor_columns: floors.iter().filter(|(_, floor)| !floor.is_nan()).count(),
        object_anchors: anchors.len(),
        micros,
    })
}

/// Generate every region of the grid.
///
/// A region whose pass fails is logged and skipped; the rest still run.
pub fn run(config: &GeneratorConfig) -> Result<Vec<RegionSummary>> {
    let generator = CaveGenerator::with_terrain(config.seed, &config.caves, config.terrain)
        .context("invalid cave configuration")?;
    info!(
        seed = config.seed,
        providers = ?generator.provider_names(),
        "starting headless generation"
    );

    let mut summaries = Vec::new();
    for region in grid_regions(config) {
        let mut data = RegionData::new(region);
        let start = Instant::now();
        if let Err(err) = generator.generate(&mut data) {
            warn!(%region, %err, "region generation failed");
            continue;
        }
        let summary = summarize(&data, start.elapsed().as_micros())?;
        info!(
            %region,
            caves = summary.cave_voxels,
            anchors = summary.object_anchors,
            micros = summary.micros as u64,
            "generated region"
        );
        summaries.push(summary);
    }
    Ok(summaries)
}

/// Write summaries as pretty JSON, creating parent dirs if needed.
pub fn export(path: &Path, summaries: &[RegionSummary]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(summaries)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
