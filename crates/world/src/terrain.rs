//! Built-in heightmap terrain producing the inputs the cave steps read.
//!
//! Hosts with their own terrain publish density, surface markers, surface heights and sea
//! level themselves; this producer exists so the generator can run standalone.

use crate::error::CaveError;
use crate::noise::LayeredNoise;
use crate::pipeline::FieldProvider;
use cavegen_core::{
    BooleanField3D, FieldKind, FieldRequirement, HeightField, RegionData, ScalarField3D,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Minimum height for terrain generation.
pub const MIN_HEIGHT: i32 = 0;

/// Maximum height for terrain generation.
pub const MAX_HEIGHT: i32 = 255;

/// Heightmap parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TerrainShape {
    /// Ground level the noise varies around.
    pub base_height: i32,
    /// Maximum height variation above and below the base.
    pub height_variation: i32,
    /// Water level; open space at or below it is sea.
    pub sea_level: i32,
}

impl Default for TerrainShape {
    fn default() -> Self {
        Self {
            base_height: 64,
            height_variation: 64,
            sea_level: 64,
        }
    }
}

/// Publishes [`FieldKind::Density`], [`FieldKind::Surfaces`] and [`FieldKind::SurfaceHeight`].
pub struct TerrainProvider {
    noise: LayeredNoise,
    shape: TerrainShape,
}

impl TerrainProvider {
    /// Terrain for a world seed.
    pub fn new(world_seed: u64, shape: TerrainShape) -> Self {
        Self {
            noise: LayeredNoise::new(world_seed),
            shape,
        }
    }

    /// Topmost solid y of a column.
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let noise_value = self.noise.sample_height(x as f64, z as f64);
        let height =
            self.shape.base_height + (noise_value * self.shape.height_variation as f64) as i32;
        height.clamp(MIN_HEIGHT, MAX_HEIGHT)
    }
}

impl FieldProvider for TerrainProvider {
    fn name(&self) -> &'static str {
        "terrain"
    }

    fn requires(&self) -> Vec<FieldRequirement> {
        Vec::new()
    }

    fn produces(&self) -> Vec<FieldKind> {
        vec![
            FieldKind::Density,
            FieldKind::Surfaces,
            FieldKind::SurfaceHeight,
        ]
    }

    #[instrument(skip_all, fields(region = %data.region()))]
    fn process(&self, data: &mut RegionData) -> Result<(), CaveError> {
        let column_region = data.region_for(FieldKind::SurfaceHeight);
        let heights = HeightField::from_fn(column_region, |x, z| self.height_at(x, z) as f32);

        // Density is one at the top solid voxel and drops by one per voxel upwards.
        let density = ScalarField3D::from_fn(data.region_for(FieldKind::Density), |p| {
            (self.height_at(p.x, p.z) - p.y) as f32 + 1.0
        });
        let surfaces = BooleanField3D::from_fn(data.region_for(FieldKind::Surfaces), |p| {
            p.y == self.height_at(p.x, p.z)
        });

        debug!(
            surface_voxels = surfaces.count_set(),
            sea_level = self.shape.sea_level,
            "generated terrain"
        );
        data.set_sea_level(self.shape.sea_level);
        data.insert(FieldKind::SurfaceHeight, heights);
        data.insert(FieldKind::Density, density);
        data.insert(FieldKind::Surfaces, surfaces);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cavegen_core::{Border, IVec3, Region};

    fn generate(seed: u64, region: Region, border: Border) -> RegionData {
        let mut data = RegionData::new(region);
        for kind in [
            FieldKind::Density,
            FieldKind::Surfaces,
            FieldKind::SurfaceHeight,
        ] {
            data.request_border(kind, border);
        }
        TerrainProvider::new(seed, TerrainShape::default())
            .process(&mut data)
            .unwrap();
        data
    }

    #[test]
    fn test_terrain_fields_agree() {
        let region = Region::from_min_size(IVec3::new(0, 0, 0), IVec3::new(8, 200, 8));
        let data = generate(42, region, Border::NONE);
        let heights = data.height(FieldKind::SurfaceHeight, Border::NONE).unwrap();
        let density = data.scalar(FieldKind::Density, Border::NONE).unwrap();
        let surfaces = data.boolean(FieldKind::Surfaces, Border::NONE).unwrap();

        for ((x, z), &height) in heights.iter() {
            let top = height as i32;
            assert!(density.get(IVec3::new(x, top, z)).unwrap() > 0.0);
            assert!(density.get(IVec3::new(x, top + 1, z)).unwrap() <= 0.0);
            assert!(surfaces.get(IVec3::new(x, top, z)).unwrap());
        }
        assert_eq!(data.sea_level(), Ok(64));
    }

    #[test]
    fn test_terrain_covers_requested_border() {
        let region = Region::from_min_size(IVec3::new(16, 40, 16), IVec3::new(4, 4, 4));
        let border = Border::new(20, 3, 3);
        let data = generate(7, region, border);
        assert!(data.scalar(FieldKind::Density, border).is_ok());
        assert!(data.boolean(FieldKind::Surfaces, border).is_ok());
        assert!(data.height(FieldKind::SurfaceHeight, border).is_ok());
    }

    #[test]
    fn test_heights_are_deterministic_and_clamped() {
        let a = TerrainProvider::new(99, TerrainShape::default());
        let b = TerrainProvider::new(99, TerrainShape::default());
        for x in -50..50 {
            let h = a.height_at(x, x * 3);
            assert_eq!(h, b.height_at(x, x * 3));
            assert!((MIN_HEIGHT..=MAX_HEIGHT).contains(&h));
        }
    }
}
