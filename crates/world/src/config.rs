//! Tunable cave generation settings.

use crate::error::CaveError;
use serde::{Deserialize, Serialize};

/// Settings for cave field synthesis, reconciliation and object anchors.
///
/// Loaded once at startup and checked with [`CaveConfig::validate`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CaveConfig {
    /// Cave occurrence rate (0.0 to 1.0). Higher values lower the base bias.
    pub frequency: f32,
    /// Noise-space radius reached at full depth (0 to 25).
    pub cave_radius: f32,
    /// Noise-space radius near the surface (0 to 10). Must not exceed `cave_radius`.
    pub tunnel_radius: f32,
    /// Octaves of coherent noise per channel (1 to 8).
    pub octaves: u32,
    /// Amplitude falloff between octaves (0.0 exclusive to 1.0).
    pub persistence: f64,
    /// Base frequency of the noise channels in cycles per voxel.
    pub noise_frequency: f64,
    /// Spacing of the coarse sampling lattice in voxels (2 to 16).
    pub sample_spacing: u32,
    /// Depth below the surface at which tunnels stop widening.
    pub full_width_depth: f32,
    /// Depth over which the near-surface rarity bias fades out.
    pub surface_falloff: f32,
    /// Upper clamp for the rarity bias.
    pub bias_cap: f32,
    /// Voxels below submerged terrain kept free of caves (0 disables).
    pub seafloor_clearance: u32,
    /// Lateral steps surface markers may spread into exposed caves (0 to 16).
    pub spread_radius: u32,
    /// Overall amount of cave object anchors (0.0 to 1.0).
    pub object_density: f32,
    /// Minimum depth below the surface before object anchors appear (0 to 250).
    pub object_min_depth: f32,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            frequency: 0.1,
            cave_radius: 8.0,
            tunnel_radius: 4.0,
            octaves: 3,
            persistence: 0.5,
            noise_frequency: 0.03,
            sample_spacing: 4,
            full_width_depth: 48.0,
            surface_falloff: 12.0,
            bias_cap: 1.0,
            seafloor_clearance: 0,
            spread_radius: 3,
            object_density: 0.06,
            object_min_depth: 5.0,
        }
    }
}

fn check_range<T>(field: &'static str, value: T, min: T, max: T) -> Result<(), CaveError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(CaveError::InvalidConfig {
            field,
            reason: format!("{value} is outside [{min}, {max}]"),
        })
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), CaveError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(CaveError::InvalidConfig {
            field,
            reason: format!("{value} must be a positive number"),
        })
    }
}

impl CaveConfig {
    /// Reject out-of-range settings.
    pub fn validate(&self) -> Result<(), CaveError> {
        check_range("frequency", self.frequency, 0.0, 1.0)?;
        check_range("cave_radius", self.cave_radius, 0.0, 25.0)?;
        check_range("tunnel_radius", self.tunnel_radius, 0.0, 10.0)?;
        if self.tunnel_radius > self.cave_radius {
            return Err(CaveError::InvalidConfig {
                field: "tunnel_radius",
                reason: format!(
                    "{} exceeds cave_radius {}",
                    self.tunnel_radius, self.cave_radius
                ),
            });
        }
        check_range("octaves", self.octaves, 1, 8)?;
        check_positive("persistence", self.persistence)?;
        check_range("persistence", self.persistence, 0.0, 1.0)?;
        check_positive("noise_frequency", self.noise_frequency)?;
        check_range("noise_frequency", self.noise_frequency, 0.0, 1.0)?;
        check_range("sample_spacing", self.sample_spacing, 2, 16)?;
        check_positive("full_width_depth", self.full_width_depth as f64)?;
        check_positive("surface_falloff", self.surface_falloff as f64)?;
        check_range("bias_cap", self.bias_cap, 0.0, f32::MAX)?;
        check_range("seafloor_clearance", self.seafloor_clearance, 0, 32)?;
        check_range("spread_radius", self.spread_radius, 0, 16)?;
        check_range("object_density", self.object_density, 0.0, 1.0)?;
        check_range("object_min_depth", self.object_min_depth, 0.0, 250.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        CaveConfig::default().validate().unwrap();
    }

    #[test]
    fn test_out_of_range_frequency_rejected() {
        let config = CaveConfig {
            frequency: 1.5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            CaveError::InvalidConfig {
                field: "frequency",
                ..
            }
        ));
    }

    #[test]
    fn test_tunnel_wider_than_cave_rejected() {
        let config = CaveConfig {
            tunnel_radius: 9.0,
            cave_radius: 6.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_per_voxel_sampling_rejected() {
        let config = CaveConfig {
            sample_spacing: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_rejected() {
        let config = CaveConfig {
            surface_falloff: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_settings_keep_defaults() {
        let config: CaveConfig =
            serde_json::from_str(r#"{ "frequency": 0.4, "spread_radius": 0 }"#).unwrap();
        assert_eq!(config.frequency, 0.4);
        assert_eq!(config.spread_radius, 0);
        assert_eq!(config.cave_radius, CaveConfig::default().cave_radius);
        config.validate().unwrap();
    }
}
