//! Per-region field store: the in-process contract between producers and consumers.
//!
//! A producer publishes a field with [`RegionData::insert`]; a consumer fetches it with one
//! of the typed getters, naming the halo it needs. A field that was never produced, or was
//! produced for too small a region, is a contract violation reported as an error.

use crate::error::FieldError;
use crate::field::{BooleanField3D, HeightField, ScalarField3D, SparseField};
use crate::location::LocationField;
use crate::region::{Border, Region};
use std::collections::HashMap;

/// Kinds of fields exchanged between generation steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Terrain density: `> 0` is solid ground, `<= 0` is air or open water.
    Density,
    /// Per-voxel terrain-top markers.
    Surfaces,
    /// Per-column terrain surface height.
    SurfaceHeight,
    /// Per-voxel cave occupancy.
    Caves,
    /// Per-column cave floor/ceiling runs.
    CaveLocations,
    /// Per-column first cave floor (`NaN` when none).
    CaveFloor,
    /// Sparse cave object anchors.
    CaveObjects,
}

/// A field kind together with the halo a step needs (or guarantees) around the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRequirement {
    /// Field kind.
    pub kind: FieldKind,
    /// Halo width around the target region.
    pub border: Border,
}

impl FieldRequirement {
    /// Requirement with an explicit halo.
    pub const fn new(kind: FieldKind, border: Border) -> Self {
        Self { kind, border }
    }

    /// Requirement covering exactly the target region.
    pub const fn exact(kind: FieldKind) -> Self {
        Self::new(kind, Border::NONE)
    }
}

/// Any field that can be stored for a region.
#[derive(Debug, Clone)]
pub enum FieldData {
    /// Per-voxel floats.
    Scalar(ScalarField3D),
    /// Per-voxel flags.
    Boolean(BooleanField3D),
    /// Per-column heights.
    Height(HeightField),
    /// Per-column cave runs.
    Locations(LocationField),
    /// Sparse marked voxels.
    Sparse(SparseField),
}

impl FieldData {
    /// Region the field covers.
    pub fn region(&self) -> Region {
        match self {
            FieldData::Scalar(field) => field.region(),
            FieldData::Boolean(field) => field.region(),
            FieldData::Height(field) => field.region(),
            FieldData::Locations(field) => field.region(),
            FieldData::Sparse(field) => field.region(),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            FieldData::Scalar(_) => "scalar",
            FieldData::Boolean(_) => "boolean",
            FieldData::Height(_) => "height",
            FieldData::Locations(_) => "locations",
            FieldData::Sparse(_) => "sparse",
        }
    }

    /// Column fields only need to cover the lateral extent.
    fn covers(&self, required: &Region) -> bool {
        match self {
            FieldData::Height(_) | FieldData::Locations(_) => {
                self.region().encompasses_columns(required)
            }
            _ => self.region().encompasses(required),
        }
    }
}

impl From<ScalarField3D> for FieldData {
    fn from(field: ScalarField3D) -> Self {
        FieldData::Scalar(field)
    }
}

impl From<BooleanField3D> for FieldData {
    fn from(field: BooleanField3D) -> Self {
        FieldData::Boolean(field)
    }
}

impl From<HeightField> for FieldData {
    fn from(field: HeightField) -> Self {
        FieldData::Height(field)
    }
}

impl From<LocationField> for FieldData {
    fn from(field: LocationField) -> Self {
        FieldData::Locations(field)
    }
}

impl From<SparseField> for FieldData {
    fn from(field: SparseField) -> Self {
        FieldData::Sparse(field)
    }
}

/// All fields produced so far for one region-processing pass.
#[derive(Debug, Clone)]
pub struct RegionData {
    region: Region,
    sea_level: Option<i32>,
    borders: HashMap<FieldKind, Border>,
    fields: HashMap<FieldKind, FieldData>,
}

macro_rules! typed_getter {
    ($name:ident, $variant:ident, $ty:ty, $label:literal) => {
        #[doc = concat!("Fetch a ", $label, " field covering the region plus `border`.")]
        pub fn $name(&self, kind: FieldKind, border: Border) -> Result<&$ty, FieldError> {
            match self.lookup(kind, border)? {
                FieldData::$variant(field) => Ok(field),
                other => Err(FieldError::WrongFieldType {
                    kind,
                    expected: $label,
                    found: other.type_name(),
                }),
            }
        }
    };
}

impl RegionData {
    /// Empty store for a target region.
    pub fn new(region: Region) -> Self {
        Self {
            region,
            sea_level: None,
            borders: HashMap::new(),
            fields: HashMap::new(),
        }
    }

    /// Target region being processed.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Provide the sea level constant.
    pub fn set_sea_level(&mut self, sea_level: i32) {
        self.sea_level = Some(sea_level);
    }

    /// Sea level, required by reconciliation.
    pub fn sea_level(&self) -> Result<i32, FieldError> {
        self.sea_level.ok_or(FieldError::MissingSeaLevel(self.region))
    }

    /// Record that some consumer needs `kind` over at least `border`.
    pub fn request_border(&mut self, kind: FieldKind, border: Border) {
        let entry = self.borders.entry(kind).or_default();
        *entry = entry.max(border);
    }

    /// Halo a producer of `kind` must cover (the widest requested so far).
    pub fn border_for(&self, kind: FieldKind) -> Border {
        self.borders.get(&kind).copied().unwrap_or_default()
    }

    /// Region a producer of `kind` must cover.
    pub fn region_for(&self, kind: FieldKind) -> Region {
        self.region.expand(self.border_for(kind))
    }

    /// Publish (or replace) a field.
    pub fn insert(&mut self, kind: FieldKind, field: impl Into<FieldData>) {
        self.fields.insert(kind, field.into());
    }

    /// Whether a field of this kind has been published.
    pub fn contains(&self, kind: FieldKind) -> bool {
        self.fields.contains_key(&kind)
    }

    /// Check that a field exists and covers the region plus `border`.
    pub fn check(&self, requirement: FieldRequirement) -> Result<(), FieldError> {
        self.lookup(requirement.kind, requirement.border).map(|_| ())
    }

    fn lookup(&self, kind: FieldKind, border: Border) -> Result<&FieldData, FieldError> {
        let field = self.fields.get(&kind).ok_or(FieldError::MissingField {
            kind,
            region: self.region,
        })?;
        let required = self.region.expand(border);
        if !field.covers(&required) {
            return Err(FieldError::InsufficientBorder {
                kind,
                available: field.region(),
                required,
            });
        }
        Ok(field)
    }

    typed_getter!(scalar, Scalar, ScalarField3D, "scalar");
    typed_getter!(boolean, Boolean, BooleanField3D, "boolean");
    typed_getter!(height, Height, HeightField, "height");
    typed_getter!(locations, Locations, LocationField, "locations");
    typed_getter!(sparse, Sparse, SparseField, "sparse");

    /// Remove a boolean field for in-place mutation; publish it again with [`Self::insert`].
    pub fn take_boolean(
        &mut self,
        kind: FieldKind,
        border: Border,
    ) -> Result<BooleanField3D, FieldError> {
        self.boolean(kind, border)?;
        match self.fields.remove(&kind) {
            Some(FieldData::Boolean(field)) => Ok(field),
            _ => Err(FieldError::MissingField {
                kind,
                region: self.region,
            }),
        }
    }

    /// Remove a height field for in-place mutation.
    pub fn take_height(
        &mut self,
        kind: FieldKind,
        border: Border,
    ) -> Result<HeightField, FieldError> {
        self.height(kind, border)?;
        match self.fields.remove(&kind) {
            Some(FieldData::Height(field)) => Ok(field),
            _ => Err(FieldError::MissingField {
                kind,
                region: self.region,
            }),
        }
    }
}
