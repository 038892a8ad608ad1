//! Axis-aligned voxel regions and the halos requested around them.

use glam::IVec3;
use std::fmt;
use std::ops::Add;

/// Extra voxels requested around a region.
///
/// Mirrors how a consumer declares the context it needs: a separate width for the top,
/// the bottom and all four lateral sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Border {
    /// Voxels above the region.
    pub top: u32,
    /// Voxels below the region.
    pub bottom: u32,
    /// Voxels on each of the four lateral sides.
    pub sides: u32,
}

impl Border {
    /// No halo at all.
    pub const NONE: Self = Self {
        top: 0,
        bottom: 0,
        sides: 0,
    };

    /// Create a border with explicit widths.
    pub const fn new(top: u32, bottom: u32, sides: u32) -> Self {
        Self { top, bottom, sides }
    }

    /// Same width on every side.
    pub const fn uniform(width: u32) -> Self {
        Self::new(width, width, width)
    }

    /// Component-wise maximum, used when several consumers request the same field.
    pub fn max(self, other: Self) -> Self {
        Self {
            top: self.top.max(other.top),
            bottom: self.bottom.max(other.bottom),
            sides: self.sides.max(other.sides),
        }
    }
}

/// Stacking two borders: a producer asked for `a` that itself needs `b` around its output
/// must read its inputs over `a + b`.
impl Add for Border {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            top: self.top + rhs.top,
            bottom: self.bottom + rhs.bottom,
            sides: self.sides + rhs.sides,
        }
    }
}

/// Inclusive integer box `[min, max]` in world voxel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    min: IVec3,
    max: IVec3,
}

impl Region {
    /// Create a region from two opposite corners (in any order).
    pub fn new(a: IVec3, b: IVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Region starting at `min` with the given extent in voxels per axis.
    ///
    /// # Panics
    /// Panics if any extent component is not positive.
    pub fn from_min_size(min: IVec3, size: IVec3) -> Self {
        assert!(
            size.x > 0 && size.y > 0 && size.z > 0,
            "region size must be positive"
        );
        Self {
            min,
            max: min + size - IVec3::ONE,
        }
    }

    /// Lowest corner (inclusive).
    pub fn min(&self) -> IVec3 {
        self.min
    }

    /// Highest corner (inclusive).
    pub fn max(&self) -> IVec3 {
        self.max
    }

    /// Extent in voxels per axis.
    pub fn size(&self) -> IVec3 {
        self.max - self.min + IVec3::ONE
    }

    /// Number of voxels in the region.
    pub fn volume(&self) -> usize {
        let size = self.size();
        size.x as usize * size.y as usize * size.z as usize
    }

    /// Number of (x, z) columns in the region.
    pub fn column_count(&self) -> usize {
        let size = self.size();
        size.x as usize * size.z as usize
    }

    /// Whether `pos` lies inside the region.
    pub fn contains(&self, pos: IVec3) -> bool {
        pos.cmpge(self.min).all() && pos.cmple(self.max).all()
    }

    /// Whether the column (x, z) lies inside the region's lateral extent.
    pub fn contains_column(&self, x: i32, z: i32) -> bool {
        x >= self.min.x && x <= self.max.x && z >= self.min.z && z <= self.max.z
    }

    /// Whether `other` lies entirely inside this region.
    pub fn encompasses(&self, other: &Region) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    /// Whether the lateral extent of `other` lies inside this region's lateral extent.
    pub fn encompasses_columns(&self, other: &Region) -> bool {
        self.contains_column(other.min.x, other.min.z)
            && self.contains_column(other.max.x, other.max.z)
    }

    /// Grow the region by a halo.
    pub fn expand(&self, border: Border) -> Region {
        let sides = border.sides as i32;
        Region {
            min: self.min - IVec3::new(sides, border.bottom as i32, sides),
            max: self.max + IVec3::new(sides, border.top as i32, sides),
        }
    }

    /// Every voxel position, y outermost and x innermost (the storage order of fields).
    pub fn positions(&self) -> impl Iterator<Item = IVec3> + '_ {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| {
            (min.z..=max.z).flat_map(move |z| (min.x..=max.x).map(move |x| IVec3::new(x, y, z)))
        })
    }

    /// Every (x, z) column, z outermost.
    pub fn columns(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (min, max) = (self.min, self.max);
        (min.z..=max.z).flat_map(move |z| (min.x..=max.x).map(move |x| (x, z)))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[({}, {}, {})..=({}, {}, {})]",
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )
    }
}
