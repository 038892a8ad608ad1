//! Cave occupancy synthesis from two independent noise channels.
//!
//! A voxel is cave when the point `(n0, n1 + bias)` lies within `threshold` of the origin in
//! noise space. The zero sets of two independent 3-D fields intersect along curves, so the
//! result is a network of worm-like tunnels rather than blobs. The bias pushes that
//! intersection away near the surface (caves get rarer), and the threshold widens with depth
//! (deep tunnels get fatter).

use crate::config::CaveConfig;
use crate::error::CaveError;
use crate::noise::{NoiseConfig, NoiseFieldSampler};
use crate::pipeline::FieldProvider;
use cavegen_core::{
    BooleanField3D, FieldKind, FieldRequirement, HeightField, IVec3, Region, RegionData,
    ScalarField3D,
};
use tracing::debug;

/// Noise-space units per configured radius unit.
const RADIUS_TO_NOISE: f32 = 0.02;
/// Bias applied when `frequency` is zero.
const OCCURRENCE_BIAS: f32 = 0.2;
/// Extra bias at and above the surface.
const SURFACE_BIAS: f32 = 0.6;
/// Seed offsets of the two noise channels.
const CHANNEL_OFFSETS: [u32; 2] = [0, 1];

/// Builds the boolean cave field for a region.
pub struct CaveFieldBuilder {
    channels: [NoiseFieldSampler; 2],
    config: CaveConfig,
}

impl CaveFieldBuilder {
    /// Create a builder for a world seed.
    pub fn new(seed: u64, config: CaveConfig) -> Self {
        let channel = |offset| {
            NoiseFieldSampler::new(
                NoiseConfig::cave_channel(
                    seed,
                    offset,
                    config.noise_frequency,
                    config.octaves,
                    config.persistence,
                ),
                config.sample_spacing,
            )
        };
        Self {
            channels: [channel(CHANNEL_OFFSETS[0]), channel(CHANNEL_OFFSETS[1])],
            config,
        }
    }

    /// Settings in use.
    pub fn config(&self) -> &CaveConfig {
        &self.config
    }

    /// Frequency-reduction bias for a voxel `depth` below the surface.
    ///
    /// Non-increasing in depth and clamped to `[0, bias_cap]`.
    pub fn bias(&self, depth: f32) -> f32 {
        let base = (1.0 - self.config.frequency) * OCCURRENCE_BIAS;
        let near_surface = (1.0 - depth / self.config.surface_falloff).clamp(0.0, 1.0);
        (base + near_surface * SURFACE_BIAS).clamp(0.0, self.config.bias_cap)
    }

    /// Noise-space radius for a voxel `depth` below the surface. Non-decreasing in depth.
    pub fn threshold(&self, depth: f32) -> f32 {
        let t = (depth / self.config.full_width_depth).clamp(0.0, 1.0);
        let radius =
            self.config.tunnel_radius + (self.config.cave_radius - self.config.tunnel_radius) * t;
        radius * RADIUS_TO_NOISE
    }

    /// Occupancy test for one voxel given its two channel samples.
    pub fn is_cave(&self, n0: f32, n1: f32, depth: f32) -> bool {
        let shifted = n1 + self.bias(depth);
        let threshold = self.threshold(depth);
        n0 * n0 + shifted * shifted < threshold * threshold
    }

    /// Sample both noise channels over `region`.
    pub fn sample_channels(&self, region: Region) -> [ScalarField3D; 2] {
        [
            self.channels[0].sample_region(region),
            self.channels[1].sample_region(region),
        ]
    }

    /// Cave field for `region`.
    ///
    /// Depth is measured from `surface` where it has a value for the column, otherwise from
    /// `sea_level`.
    pub fn build(
        &self,
        region: Region,
        surface: Option<&HeightField>,
        sea_level: i32,
    ) -> Result<BooleanField3D, CaveError> {
        let [n0, n1] = self.sample_channels(region);
        self.build_from_noise(region, &n0, &n1, surface, sea_level)
    }

    /// Cave field for `region` from pre-sampled channels.
    pub fn build_from_noise(
        &self,
        region: Region,
        n0: &ScalarField3D,
        n1: &ScalarField3D,
        surface: Option<&HeightField>,
        sea_level: i32,
    ) -> Result<BooleanField3D, CaveError> {
        let mut caves = BooleanField3D::filled(region, false);
        let clearance = self.config.seafloor_clearance as f32;

        for (x, z) in region.columns() {
            let surface_height = match surface {
                Some(heights) => Some(*heights.get(x, z)?).filter(|h| !h.is_nan()),
                None => None,
            };
            let reference = surface_height.unwrap_or(sea_level as f32);
            let submerged = surface_height.is_some_and(|h| h <= sea_level as f32);

            for y in region.min().y..=region.max().y {
                let pos = IVec3::new(x, y, z);
                let depth = reference - y as f32;
                if submerged && clearance > 0.0 && depth < clearance {
                    continue;
                }
                if self.is_cave(n0.get(pos)?, n1.get(pos)?, depth) {
                    caves.set(pos, true)?;
                }
            }
        }
        Ok(caves)
    }
}

/// Publishes [`FieldKind::Caves`] over the halo its consumers requested.
pub struct CaveFieldProvider {
    builder: CaveFieldBuilder,
}

impl CaveFieldProvider {
    /// Create the provider for a world seed.
    pub fn new(seed: u64, config: CaveConfig) -> Self {
        Self {
            builder: CaveFieldBuilder::new(seed, config),
        }
    }
}

impl FieldProvider for CaveFieldProvider {
    fn name(&self) -> &'static str {
        "caves"
    }

    fn requires(&self) -> Vec<FieldRequirement> {
        vec![FieldRequirement::exact(FieldKind::SurfaceHeight)]
    }

    fn produces(&self) -> Vec<FieldKind> {
        vec![FieldKind::Caves]
    }

    fn process(&self, data: &mut RegionData) -> Result<(), CaveError> {
        let border = data.border_for(FieldKind::Caves);
        let region = data.region().expand(border);
        let sea_level = data.sea_level()?;
        let heights = data.height(FieldKind::SurfaceHeight, border)?;
        let caves = self.builder.build(region, Some(heights), sea_level)?;
        debug!(
            region = %region,
            cave_voxels = caves.count_set(),
            "built cave field"
        );
        data.insert(FieldKind::Caves, caves);
        Ok(())
    }
}
