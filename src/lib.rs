//! cavegen - headless cave generation host
//!
//! Loads a [`GeneratorConfig`], runs the cave providers over a grid of regions and summarizes
//! what each region produced.

pub mod config;
pub mod headless;

pub use config::{GeneratorConfig, MAX_GRID_RADIUS};
pub use headless::{export, grid_regions, run, RegionSummary};
