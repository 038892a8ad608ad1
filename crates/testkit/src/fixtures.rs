//! Synthetic region inputs for scenario tests.
//!
//! Builds the fields a host would normally provide (density, surface markers, surface heights,
//! sea level) plus hand-placed cave voxels, all covering the target region and a halo.

use cavegen_core::{
    Border, BooleanField3D, FieldKind, HeightField, IVec3, Region, RegionData, ScalarField3D,
};

/// Builder for a [`RegionData`] with flat or hand-shaped terrain.
#[derive(Debug, Clone)]
pub struct RegionFixture {
    target: Region,
    extent: Region,
    top: Vec<i32>,
    sea_level: i32,
    caves: Vec<IVec3>,
}

impl RegionFixture {
    /// Fixture for `target`, with every field covering `target` expanded by `border`.
    ///
    /// Terrain starts flat with its top solid voxel at `target.min().y`.
    pub fn new(target: Region, border: Border) -> Self {
        let extent = target.expand(border);
        Self {
            target,
            extent,
            top: vec![target.min().y; extent.column_count()],
            sea_level: extent.min().y - 1,
            caves: Vec::new(),
        }
    }

    /// Region all fields cover.
    pub fn extent(&self) -> Region {
        self.extent
    }

    fn column_index(&self, x: i32, z: i32) -> usize {
        let min = self.extent.min();
        let size = self.extent.size();
        ((z - min.z) * size.x + (x - min.x)) as usize
    }

    /// Set every column's top solid voxel to `y`.
    pub fn flat(mut self, y: i32) -> Self {
        self.top.iter_mut().for_each(|top| *top = y);
        self
    }

    /// Set one column's top solid voxel.
    pub fn column_top(mut self, x: i32, z: i32, y: i32) -> Self {
        let index = self.column_index(x, z);
        self.top[index] = y;
        self
    }

    /// Water level.
    pub fn sea_level(mut self, sea_level: i32) -> Self {
        self.sea_level = sea_level;
        self
    }

    /// Mark one voxel as cave.
    pub fn cave(mut self, pos: IVec3) -> Self {
        self.caves.push(pos);
        self
    }

    /// Mark every voxel of `region` as cave.
    pub fn cave_box(mut self, region: Region) -> Self {
        self.caves.extend(region.positions());
        self
    }

    /// Mark a vertical run `bottom..=top` in one column as cave.
    pub fn cave_column(self, x: i32, z: i32, bottom: i32, top: i32) -> Self {
        self.cave_box(Region::new(IVec3::new(x, bottom, z), IVec3::new(x, top, z)))
    }

    fn top_at(&self, x: i32, z: i32) -> i32 {
        self.top[self.column_index(x, z)]
    }

    /// Density field: one at each column's top voxel, dropping by one per voxel upwards.
    pub fn density(&self) -> ScalarField3D {
        ScalarField3D::from_fn(self.extent, |p| (self.top_at(p.x, p.z) - p.y) as f32 + 1.0)
    }

    /// Surface markers at each column's top voxel.
    pub fn surfaces(&self) -> BooleanField3D {
        BooleanField3D::from_fn(self.extent, |p| p.y == self.top_at(p.x, p.z))
    }

    /// Recorded surface height per column.
    pub fn heights(&self) -> HeightField {
        HeightField::from_fn(self.extent, |x, z| self.top_at(x, z) as f32)
    }

    /// Cave occupancy; voxels outside the extent are ignored.
    pub fn caves(&self) -> BooleanField3D {
        let mut field = BooleanField3D::filled(self.extent, false);
        for &pos in &self.caves {
            if field.contains(pos) {
                let _ = field.set(pos, true);
            }
        }
        field
    }

    /// Host inputs only: density, surfaces, surface heights and sea level.
    pub fn host_inputs(&self) -> RegionData {
        let mut data = RegionData::new(self.target);
        data.set_sea_level(self.sea_level);
        data.insert(FieldKind::Density, self.density());
        data.insert(FieldKind::Surfaces, self.surfaces());
        data.insert(FieldKind::SurfaceHeight, self.heights());
        data
    }

    /// Host inputs plus the hand-placed cave field.
    pub fn build(&self) -> RegionData {
        let mut data = self.host_inputs();
        data.insert(FieldKind::Caves, self.caves());
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_fields_cover_border() {
        let target = Region::from_min_size(IVec3::ZERO, IVec3::new(4, 8, 4));
        let border = Border::new(20, 3, 3);
        let data = RegionFixture::new(target, border)
            .flat(5)
            .sea_level(2)
            .cave_column(1, 1, 3, 5)
            .build();

        let caves = data.boolean(FieldKind::Caves, border).unwrap();
        assert_eq!(caves.count_set(), 3);
        assert!(data.scalar(FieldKind::Density, border).is_ok());
        assert!(data.height(FieldKind::SurfaceHeight, border).is_ok());
        assert_eq!(data.sea_level(), Ok(2));
    }

    #[test]
    fn fixture_column_top_shapes_terrain() {
        let target = Region::from_min_size(IVec3::ZERO, IVec3::new(2, 10, 2));
        let fixture = RegionFixture::new(target, Border::NONE)
            .flat(4)
            .column_top(1, 0, 7);
        let surfaces = fixture.surfaces();
        assert!(surfaces.get(IVec3::new(1, 7, 0)).unwrap());
        assert!(surfaces.get(IVec3::new(0, 4, 0)).unwrap());
        assert!(fixture.density().get(IVec3::new(1, 7, 0)).unwrap() > 0.0);
        assert!(fixture.density().get(IVec3::new(0, 5, 0)).unwrap() <= 0.0);
    }
}
