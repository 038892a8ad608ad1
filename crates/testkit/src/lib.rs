#![warn(missing_docs)]
//! Testing surfaces for cave generation: synthetic region fixtures and JSON metrics export.

mod fixtures;
mod metrics;

pub use fixtures::*;
pub use metrics::*;
