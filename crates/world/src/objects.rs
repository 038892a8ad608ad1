//! Anchor positions for decorative cave objects.
//!
//! Only the positions are produced here; turning them into blocks is up to the host.

use crate::config::CaveConfig;
use crate::error::CaveError;
use crate::pipeline::FieldProvider;
use cavegen_core::{
    FieldError, FieldKind, FieldRequirement, HeightField, IVec3, LocationField, Region,
    RegionData, SparseField,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Per-column white noise in `[-1, 1)`.
#[derive(Debug, Clone, Copy)]
pub struct WhiteNoise {
    seed: u64,
}

impl WhiteNoise {
    /// Noise for a seed.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Sample for a column. The same column always yields the same value.
    pub fn sample(&self, x: i32, z: i32) -> f32 {
        let column_seed = self
            .seed
            .wrapping_add((x as i64 as u64).wrapping_mul(374761393))
            .wrapping_add((z as i64 as u64).wrapping_mul(668265263));
        let mut rng = StdRng::seed_from_u64(column_seed);
        rng.gen_range(-1.0..1.0)
    }
}

/// Selects anchor voxels just above cave floors and just below cave ceilings.
pub struct CaveObjectPlacer {
    noise: WhiteNoise,
    density: f32,
    min_depth: f32,
}

impl CaveObjectPlacer {
    /// Placer for a world seed.
    pub fn new(seed: u64, config: &CaveConfig) -> Self {
        Self {
            noise: WhiteNoise::new(seed.wrapping_add(1)),
            density: config.object_density,
            min_depth: config.object_min_depth,
        }
    }

    /// Anchors for every column of `region`.
    ///
    /// A cave qualifies when both its ceiling and floor are known and inside `region`, and its
    /// floor lies more than the minimum depth below the column's surface.
    pub fn place(
        &self,
        region: Region,
        locations: &LocationField,
        surface: &HeightField,
    ) -> Result<SparseField, FieldError> {
        let mut anchors = SparseField::new(region);
        let (min_y, max_y) = (region.min().y, region.max().y);

        for (x, z) in region.columns() {
            let surface_height = surface.get(x, z)?.floor();
            let selected = self.noise.sample(x, z).abs() < self.density;
            for location in locations.get(x, z)? {
                let Some((ceiling, floor)) = location.bounds() else {
                    continue;
                };
                if !(min_y..=max_y).contains(&ceiling) || !(min_y..=max_y).contains(&floor) {
                    continue;
                }
                let deep_enough = (floor as f32) < surface_height - self.min_depth;
                if deep_enough && selected {
                    anchors.insert(IVec3::new(x, floor + 1, z))?;
                    anchors.insert(IVec3::new(x, ceiling - 1, z))?;
                }
            }
        }
        Ok(anchors)
    }
}

/// Publishes [`FieldKind::CaveObjects`].
pub struct CaveObjectProvider {
    placer: CaveObjectPlacer,
}

impl CaveObjectProvider {
    /// Provider for a world seed.
    pub fn new(seed: u64, config: &CaveConfig) -> Self {
        Self {
            placer: CaveObjectPlacer::new(seed, config),
        }
    }
}

impl FieldProvider for CaveObjectProvider {
    fn name(&self) -> &'static str {
        "cave_objects"
    }

    fn requires(&self) -> Vec<FieldRequirement> {
        vec![
            FieldRequirement::exact(FieldKind::CaveLocations),
            FieldRequirement::exact(FieldKind::SurfaceHeight),
        ]
    }

    fn produces(&self) -> Vec<FieldKind> {
        vec![FieldKind::CaveObjects]
    }

    fn process(&self, data: &mut RegionData) -> Result<(), CaveError> {
        let border = data.border_for(FieldKind::CaveObjects);
        let region = data.region_for(FieldKind::CaveObjects);
        let locations = data.locations(FieldKind::CaveLocations, border)?;
        let surface = data.height(FieldKind::SurfaceHeight, border)?;
        let anchors = self.placer.place(region, locations, surface)?;
        debug!(region = %region, anchors = anchors.len(), "placed cave object anchors");
        data.insert(FieldKind::CaveObjects, anchors);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cavegen_core::CaveLocation;

    fn region() -> Region {
        Region::new(IVec3::new(0, 0, 0), IVec3::new(3, 40, 3))
    }

    fn placer(density: f32) -> CaveObjectPlacer {
        CaveObjectPlacer::new(
            9,
            &CaveConfig {
                object_density: density,
                object_min_depth: 5.0,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_white_noise_is_deterministic_and_bounded() {
        let noise = WhiteNoise::new(3);
        for x in -20..20 {
            let value = noise.sample(x, -x);
            assert_eq!(value, WhiteNoise::new(3).sample(x, -x));
            assert!((-1.0..1.0).contains(&value));
        }
        let differs = (0..20).any(|x| noise.sample(x, 0) != WhiteNoise::new(4).sample(x, 0));
        assert!(differs);
    }

    #[test]
    fn test_anchors_above_floor_and_below_ceiling() {
        let locations = LocationField::filled(region(), vec![CaveLocation::new(20, 10)]);
        let surface = HeightField::filled(region(), 35.0);
        let anchors = placer(1.0).place(region(), &locations, &surface).unwrap();
        assert_eq!(anchors.len(), 2 * region().column_count());
        assert!(anchors.contains(IVec3::new(1, 11, 2)));
        assert!(anchors.contains(IVec3::new(1, 19, 2)));
    }

    #[test]
    fn test_shallow_and_unbounded_caves_are_skipped() {
        let locations = LocationField::filled(
            region(),
            vec![
                CaveLocation::new(34, 31),
                CaveLocation {
                    ceiling: None,
                    floor: Some(12),
                },
                CaveLocation::new(60, 20),
            ],
        );
        let surface = HeightField::filled(region(), 35.0);
        let anchors = placer(1.0).place(region(), &locations, &surface).unwrap();
        assert!(anchors.is_empty());
    }

    #[test]
    fn test_zero_density_places_nothing() {
        let locations = LocationField::filled(region(), vec![CaveLocation::new(20, 10)]);
        let surface = HeightField::filled(region(), 35.0);
        let anchors = placer(0.0).place(region(), &locations, &surface).unwrap();
        assert!(anchors.is_empty());
    }
}
