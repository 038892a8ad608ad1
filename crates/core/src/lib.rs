#![warn(missing_docs)]
//! Region and field primitives shared across the cave generation workspace.
//!
//! Every field is a dense array addressed by world voxel coordinates and bound to the
//! region (target region plus halo) it was produced for. Accessors are bounds-checked and
//! report [`FieldError::OutOfBounds`] instead of clamping.

mod error;
mod field;
mod location;
mod region;
mod store;

pub use error::FieldError;
pub use field::{BooleanField3D, Field2D, Field3D, HeightField, ScalarField3D, SparseField};
pub use location::{CaveLocation, LocationField};
pub use region::{Border, Region};
pub use store::{FieldData, FieldKind, FieldRequirement, RegionData};

pub use glam::IVec3;
