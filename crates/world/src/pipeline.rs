//! Typed data-dependency contract between generation steps.
//!
//! Each step declares the field kinds it reads (with the halo it needs around its own output)
//! and the kinds it produces or updates. [`CaveGenerator`] turns those declarations into the
//! halo every producer must cover, checks each step's inputs before running it, and runs the
//! steps for one region.

use crate::caves::CaveFieldProvider;
use crate::config::CaveConfig;
use crate::error::CaveError;
use crate::locations::{CaveFloorProvider, CaveLocationProvider};
use crate::objects::CaveObjectProvider;
use crate::surface::CaveToSurfaceProvider;
use crate::terrain::{TerrainProvider, TerrainShape};
use cavegen_core::{Border, FieldKind, FieldRequirement, RegionData};
use tracing::debug;

/// One generation step operating on a region's field store.
pub trait FieldProvider {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Inputs, with the halo needed around this step's own output region.
    fn requires(&self) -> Vec<FieldRequirement>;

    /// Kinds this step publishes (newly produced or updated in place).
    fn produces(&self) -> Vec<FieldKind>;

    /// Run the step for `data.region()`.
    fn process(&self, data: &mut RegionData) -> Result<(), CaveError>;
}

fn output_border(provider: &dyn FieldProvider, data: &RegionData) -> Border {
    provider
        .produces()
        .into_iter()
        .map(|kind| data.border_for(kind))
        .fold(Border::NONE, Border::max)
}

/// Runs an ordered list of providers over one region at a time.
pub struct CaveGenerator {
    providers: Vec<Box<dyn FieldProvider>>,
}

impl CaveGenerator {
    /// Cave steps only; density, surfaces, surface heights and sea level come from the host.
    pub fn new(seed: u64, config: &CaveConfig) -> Result<Self, CaveError> {
        config.validate()?;
        Ok(Self {
            providers: vec![
                Box::new(CaveFieldProvider::new(seed, config.clone())),
                Box::new(CaveToSurfaceProvider::new(config.spread_radius)),
                Box::new(CaveLocationProvider),
                Box::new(CaveFloorProvider),
                Box::new(CaveObjectProvider::new(seed, config)),
            ],
        })
    }

    /// Cave steps preceded by the built-in terrain producer.
    pub fn with_terrain(
        seed: u64,
        config: &CaveConfig,
        terrain: TerrainShape,
    ) -> Result<Self, CaveError> {
        let mut generator = Self::new(seed, config)?;
        generator
            .providers
            .insert(0, Box::new(TerrainProvider::new(seed, terrain)));
        Ok(generator)
    }

    /// Build from an explicit, already ordered list of steps.
    pub fn from_providers(providers: Vec<Box<dyn FieldProvider>>) -> Self {
        Self { providers }
    }

    /// Names of the steps in execution order.
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Record on `data` the halo every field must be produced with, and return each step's
    /// inputs with their effective halo (in execution order).
    ///
    /// Walks the steps backwards: a step asked to cover border `b` reads each input over its
    /// declared border plus `b`.
    pub fn plan(&self, data: &mut RegionData) -> Vec<Vec<FieldRequirement>> {
        let mut planned = Vec::with_capacity(self.providers.len());
        for provider in self.providers.iter().rev() {
            let out = output_border(provider.as_ref(), data);
            let requirements: Vec<_> = provider
                .requires()
                .into_iter()
                .map(|r| FieldRequirement::new(r.kind, r.border + out))
                .collect();
            for requirement in &requirements {
                data.request_border(requirement.kind, requirement.border);
            }
            planned.push(requirements);
        }
        planned.reverse();
        planned
    }

    /// Plan halos and run every step for `data.region()`.
    ///
    /// Stops at the first contract violation; fields published so far stay in `data` but the
    /// region should be treated as failed.
    pub fn generate(&self, data: &mut RegionData) -> Result<(), CaveError> {
        let planned = self.plan(data);
        for (provider, requirements) in self.providers.iter().zip(planned) {
            for requirement in requirements {
                data.check(requirement)?;
            }
            debug!(provider = provider.name(), region = %data.region(), "running provider");
            provider.process(data)?;
        }
        Ok(())
    }
}
