//! Dense 3-D and 2-D fields addressed by world voxel coordinates.

use crate::error::FieldError;
use crate::region::Region;
use glam::IVec3;
use std::collections::HashSet;

/// Dense per-voxel field over a region (target region plus halo).
///
/// Storage order is y outermost, then z, then x, matching [`Region::positions`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field3D<T> {
    region: Region,
    data: Vec<T>,
}

/// Per-voxel floating point field (noise channels, density).
pub type ScalarField3D = Field3D<f32>;

/// Per-voxel flag field (cave occupancy, surface markers).
pub type BooleanField3D = Field3D<bool>;

impl<T: Copy> Field3D<T> {
    /// Field with every voxel set to `value`.
    pub fn filled(region: Region, value: T) -> Self {
        Self {
            region,
            data: vec![value; region.volume()],
        }
    }

    /// Field computed voxel by voxel.
    pub fn from_fn(region: Region, mut f: impl FnMut(IVec3) -> T) -> Self {
        let data = region.positions().map(&mut f).collect();
        Self { region, data }
    }

    /// Wrap pre-computed values laid out in storage order.
    pub fn from_vec(region: Region, data: Vec<T>) -> Result<Self, FieldError> {
        if data.len() != region.volume() {
            return Err(FieldError::SizeMismatch {
                region,
                expected: region.volume(),
                actual: data.len(),
            });
        }
        Ok(Self { region, data })
    }

    /// Region this field covers.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Whether `pos` can be read or written.
    pub fn contains(&self, pos: IVec3) -> bool {
        self.region.contains(pos)
    }

    fn index(&self, pos: IVec3) -> Result<usize, FieldError> {
        if !self.region.contains(pos) {
            return Err(FieldError::OutOfBounds {
                pos,
                region: self.region,
            });
        }
        let size = self.region.size();
        let rel = pos - self.region.min();
        Ok(((rel.y * size.z + rel.z) * size.x + rel.x) as usize)
    }

    /// Read the value at a world position.
    pub fn get(&self, pos: IVec3) -> Result<T, FieldError> {
        let index = self.index(pos)?;
        Ok(self.data[index])
    }

    /// Write the value at a world position.
    pub fn set(&mut self, pos: IVec3, value: T) -> Result<(), FieldError> {
        let index = self.index(pos)?;
        self.data[index] = value;
        Ok(())
    }

    /// Raw values in storage order.
    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// Every (position, value) pair in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (IVec3, T)> + '_ {
        self.region.positions().zip(self.data.iter().copied())
    }
}

impl Field3D<bool> {
    /// Number of voxels set to `true`.
    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|v| **v).count()
    }
}

/// Dense per-column field over the lateral extent of a region.
#[derive(Debug, Clone, PartialEq)]
pub struct Field2D<T> {
    region: Region,
    data: Vec<T>,
}

/// Per-column height values; `NaN` marks a column without a value.
pub type HeightField = Field2D<f32>;

impl<T: Clone> Field2D<T> {
    /// Field with every column set to `value`. Only the lateral extent of `region` is used.
    pub fn filled(region: Region, value: T) -> Self {
        Self {
            region,
            data: vec![value; region.column_count()],
        }
    }

    /// Field computed column by column.
    pub fn from_fn(region: Region, mut f: impl FnMut(i32, i32) -> T) -> Self {
        let data = region.columns().map(|(x, z)| f(x, z)).collect();
        Self { region, data }
    }

    /// Region this field was built for (only x and z are meaningful).
    pub fn region(&self) -> Region {
        self.region
    }

    /// Whether the column can be read or written.
    pub fn contains(&self, x: i32, z: i32) -> bool {
        self.region.contains_column(x, z)
    }

    fn index(&self, x: i32, z: i32) -> Result<usize, FieldError> {
        if !self.region.contains_column(x, z) {
            return Err(FieldError::OutOfBounds {
                pos: IVec3::new(x, self.region.min().y, z),
                region: self.region,
            });
        }
        let size = self.region.size();
        let min = self.region.min();
        Ok(((z - min.z) * size.x + (x - min.x)) as usize)
    }

    /// Borrow the value of a column.
    pub fn get(&self, x: i32, z: i32) -> Result<&T, FieldError> {
        let index = self.index(x, z)?;
        Ok(&self.data[index])
    }

    /// Replace the value of a column.
    pub fn set(&mut self, x: i32, z: i32, value: T) -> Result<(), FieldError> {
        let index = self.index(x, z)?;
        self.data[index] = value;
        Ok(())
    }

    /// Every ((x, z), value) pair, z outermost.
    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32), &T)> + '_ {
        self.region.columns().zip(self.data.iter())
    }
}

/// Sparse set of marked voxels inside a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseField {
    region: Region,
    positions: HashSet<IVec3>,
}

impl SparseField {
    /// Empty field over `region`.
    pub fn new(region: Region) -> Self {
        Self {
            region,
            positions: HashSet::new(),
        }
    }

    /// Region this field covers.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Mark a position. Returns whether it was newly inserted.
    pub fn insert(&mut self, pos: IVec3) -> Result<bool, FieldError> {
        if !self.region.contains(pos) {
            return Err(FieldError::OutOfBounds {
                pos,
                region: self.region,
            });
        }
        Ok(self.positions.insert(pos))
    }

    /// Whether a position is marked.
    pub fn contains(&self, pos: IVec3) -> bool {
        self.positions.contains(&pos)
    }

    /// Number of marked positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether nothing is marked.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Marked positions in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.positions.iter().copied()
    }
}
