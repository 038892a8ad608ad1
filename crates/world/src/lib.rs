//! Cave field synthesis, per-column cave extraction and surface reconciliation.
//!
//! Each step is a [`FieldProvider`] reading and publishing fields on a
//! [`cavegen_core::RegionData`]; [`CaveGenerator`] runs them in order for one region.

mod caves;
mod config;
mod error;
mod locations;
mod noise;
mod objects;
mod pipeline;
mod surface;
mod terrain;

pub use caves::*;
pub use config::*;
pub use error::*;
pub use locations::*;
pub use self::noise::*;
pub use objects::*;
pub use pipeline::*;
pub use surface::*;
pub use terrain::*;
