//! Noise generation utilities for cave and terrain synthesis.
//!
//! Provides deterministic multi-octave Perlin noise and a region sampler that evaluates it on
//! a coarse lattice and tri-linearly upsamples to voxel resolution.

use cavegen_core::{Region, ScalarField3D};
use noise::{NoiseFn, Perlin};

/// Configuration for multi-octave noise generation.
#[derive(Debug, Clone)]
pub struct NoiseConfig {
    /// Number of octaves (layers of detail)
    pub octaves: u32,
    /// Frequency multiplier between octaves
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves (persistence)
    pub persistence: f64,
    /// Base frequency (scale)
    pub frequency: f64,
    /// Seed for deterministic generation
    pub seed: u32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            frequency: 1.0,
            seed: 0,
        }
    }
}

/// Fold a 64-bit world seed into a noise seed, offset per channel.
///
/// Channels of the same world use small distinct offsets so they stay uncorrelated.
pub fn channel_seed(world_seed: u64, offset: u32) -> u32 {
    ((world_seed ^ (world_seed >> 32)) as u32).wrapping_add(offset)
}

/// Channel offset of the terrain height layers, clear of the cave channels.
pub const TERRAIN_CHANNEL: u32 = 10_000;

impl NoiseConfig {
    /// Create config for a cave noise channel.
    pub fn cave_channel(
        world_seed: u64,
        channel: u32,
        frequency: f64,
        octaves: u32,
        persistence: f64,
    ) -> Self {
        Self {
            octaves,
            lacunarity: 2.0,
            persistence,
            frequency,
            seed: channel_seed(world_seed, channel),
        }
    }

    /// Create config for continental-scale noise (large features).
    pub fn continental(seed: u32) -> Self {
        Self {
            octaves: 3,
            lacunarity: 2.2,
            persistence: 0.6,
            frequency: 0.005, // Very large scale
            seed,
        }
    }

    /// Create config for erosion noise (medium features).
    pub fn erosion(seed: u32) -> Self {
        Self {
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            frequency: 0.01,
            seed: seed.wrapping_add(1000),
        }
    }

    /// Create config for peaks/valleys noise (fine detail).
    pub fn peaks_valleys(seed: u32) -> Self {
        Self {
            octaves: 5,
            lacunarity: 2.3,
            persistence: 0.4,
            frequency: 0.02,
            seed: seed.wrapping_add(2000),
        }
    }
}

/// Noise generator using Perlin noise.
pub struct NoiseGenerator {
    perlin: Perlin,
    config: NoiseConfig,
}

impl NoiseGenerator {
    /// Create a new noise generator with the given configuration.
    pub fn new(config: NoiseConfig) -> Self {
        Self {
            perlin: Perlin::new(config.seed),
            config,
        }
    }

    /// Configuration this generator was built from.
    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// Generate noise value at 2D coordinates with multi-octave sampling.
    ///
    /// Returns value in range [-1.0, 1.0].
    pub fn sample_2d(&self, x: f64, y: f64) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.config.frequency;
        let mut max_value = 0.0;

        for _ in 0..self.config.octaves {
            value += self.perlin.get([x * frequency, y * frequency]) * amplitude;
            max_value += amplitude;

            amplitude *= self.config.persistence;
            frequency *= self.config.lacunarity;
        }

        // Normalize to [-1.0, 1.0]
        value / max_value
    }

    /// Generate noise value at 3D coordinates with multi-octave sampling.
    ///
    /// Returns value in range [-1.0, 1.0].
    pub fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.config.frequency;
        let mut max_value = 0.0;

        for _ in 0..self.config.octaves {
            value += self
                .perlin
                .get([x * frequency, y * frequency, z * frequency])
                * amplitude;
            max_value += amplitude;

            amplitude *= self.config.persistence;
            frequency *= self.config.lacunarity;
        }

        value / max_value
    }
}

/// Samples a noise generator over a whole region.
///
/// Noise is evaluated only at lattice points spaced `spacing` voxels apart (aligned to world
/// coordinates, so neighbouring regions share lattice values) and tri-linearly interpolated in
/// between. Evaluating every voxel is an order of magnitude slower.
pub struct NoiseFieldSampler {
    generator: NoiseGenerator,
    spacing: i32,
}

impl NoiseFieldSampler {
    /// Wrap a generator with the given lattice spacing.
    ///
    /// # Panics
    /// Panics if `spacing` is zero.
    pub fn new(config: NoiseConfig, spacing: u32) -> Self {
        assert!(spacing > 0, "lattice spacing must be positive");
        Self {
            generator: NoiseGenerator::new(config),
            spacing: spacing as i32,
        }
    }

    /// Lattice spacing in voxels.
    pub fn spacing(&self) -> u32 {
        self.spacing as u32
    }

    /// Evaluate the underlying noise directly at a lattice-aligned voxel.
    pub fn sample_point(&self, x: i32, y: i32, z: i32) -> f32 {
        self.generator.sample_3d(x as f64, y as f64, z as f64) as f32
    }

    /// Produce the upsampled field for `region`.
    pub fn sample_region(&self, region: Region) -> ScalarField3D {
        let step = self.spacing;
        let min = region.min();
        let max = region.max();

        // Lattice cells enclosing the region; one extra point so every voxel has 8 corners.
        let lo = [
            min.x.div_euclid(step),
            min.y.div_euclid(step),
            min.z.div_euclid(step),
        ];
        let hi = [
            max.x.div_euclid(step) + 1,
            max.y.div_euclid(step) + 1,
            max.z.div_euclid(step) + 1,
        ];
        let dims = [
            (hi[0] - lo[0] + 1) as usize,
            (hi[1] - lo[1] + 1) as usize,
            (hi[2] - lo[2] + 1) as usize,
        ];

        let mut lattice = Vec::with_capacity(dims[0] * dims[1] * dims[2]);
        for ly in lo[1]..=hi[1] {
            for lz in lo[2]..=hi[2] {
                for lx in lo[0]..=hi[0] {
                    lattice.push(self.sample_point(lx * step, ly * step, lz * step));
                }
            }
        }
        let corner = |cx: i32, cy: i32, cz: i32| -> f32 {
            let ix = (cx - lo[0]) as usize;
            let iy = (cy - lo[1]) as usize;
            let iz = (cz - lo[2]) as usize;
            lattice[(iy * dims[2] + iz) * dims[0] + ix]
        };

        let inv = 1.0 / step as f32;
        ScalarField3D::from_fn(region, |pos| {
            let (cx, cy, cz) = (
                pos.x.div_euclid(step),
                pos.y.div_euclid(step),
                pos.z.div_euclid(step),
            );
            let t = [
                pos.x.rem_euclid(step) as f32 * inv,
                pos.y.rem_euclid(step) as f32 * inv,
                pos.z.rem_euclid(step) as f32 * inv,
            ];
            trilerp(
                [
                    corner(cx, cy, cz),
                    corner(cx + 1, cy, cz),
                    corner(cx, cy + 1, cz),
                    corner(cx + 1, cy + 1, cz),
                    corner(cx, cy, cz + 1),
                    corner(cx + 1, cy, cz + 1),
                    corner(cx, cy + 1, cz + 1),
                    corner(cx + 1, cy + 1, cz + 1),
                ],
                t,
            )
        })
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate inside a lattice cell.
///
/// Corners are ordered `[v000, v100, v010, v110, v001, v101, v011, v111]` (x fastest).
fn trilerp(c: [f32; 8], t: [f32; 3]) -> f32 {
    let bottom = lerp(lerp(c[0], c[1], t[0]), lerp(c[2], c[3], t[0]), t[1]);
    let top = lerp(lerp(c[4], c[5], t[0]), lerp(c[6], c[7], t[0]), t[1]);
    lerp(bottom, top, t[2])
}

/// Combines multiple noise layers for terrain height generation.
pub struct LayeredNoise {
    continental: NoiseGenerator,
    erosion: NoiseGenerator,
    peaks_valleys: NoiseGenerator,
}

impl LayeredNoise {
    /// Create a new layered noise generator from a world seed.
    pub fn new(world_seed: u64) -> Self {
        let seed = channel_seed(world_seed, TERRAIN_CHANNEL);

        Self {
            continental: NoiseGenerator::new(NoiseConfig::continental(seed)),
            erosion: NoiseGenerator::new(NoiseConfig::erosion(seed)),
            peaks_valleys: NoiseGenerator::new(NoiseConfig::peaks_valleys(seed)),
        }
    }

    /// Combine noise layers into a single height value in [-1.0, 1.0].
    pub fn sample_height(&self, x: f64, z: f64) -> f64 {
        let continental = self.continental.sample_2d(x, z);
        let erosion = self.erosion.sample_2d(x, z);
        let peaks_valleys = self.peaks_valleys.sample_2d(x, z);

        // Weight layers:
        // - Continental: 0.5 (dominant large-scale features)
        // - Erosion: 0.3 (medium-scale smoothing)
        // - Peaks/Valleys: 0.2 (fine detail)
        continental * 0.5 + erosion * 0.3 + peaks_valleys * 0.2
    }
}
