//! Per-column cave floor/ceiling extraction.

use crate::error::CaveError;
use crate::pipeline::FieldProvider;
use cavegen_core::{
    BooleanField3D, CaveLocation, FieldError, FieldKind, FieldRequirement, HeightField, IVec3,
    LocationField, Region, RegionData,
};
use tracing::debug;

/// Height value meaning "no cave floor in this column".
///
/// Either no cave crosses the column, or it continues below the region and the region below
/// reports the floor.
pub const NO_CAVE: f32 = f32::NAN;

/// Single downward pass over each column of a cave field.
pub struct ColumnScanner;

impl ColumnScanner {
    /// Scan one column given its cells from `top_y` downwards.
    ///
    /// Entering a run marks a ceiling at `y + 1` (unknown when the run starts at `top_y`);
    /// leaving it marks the floor at `y`. A run still open at the bottom cell is dropped: the
    /// region below discovers its own floor.
    ///
    /// If the region's top voxel is really a floor whose cave lies in the region above, the
    /// run is misread as a cave starting at the top. This limitation is kept as is.
    pub fn scan_column<I>(top_y: i32, cells: I) -> Vec<CaveLocation>
    where
        I: IntoIterator<Item = bool>,
    {
        let mut locations = Vec::new();
        let mut current: Option<CaveLocation> = None;

        for (offset, cave) in cells.into_iter().enumerate() {
            let y = top_y - offset as i32;
            match (current.take(), cave) {
                (None, true) => {
                    current = Some(CaveLocation {
                        ceiling: (y < top_y).then_some(y + 1),
                        floor: None,
                    });
                }
                (Some(mut location), false) => {
                    location.floor = Some(y);
                    locations.push(location);
                }
                (open, _) => current = open,
            }
        }
        locations
    }

    /// Cave runs for every column of `columns`, scanning the full vertical extent of `caves`.
    pub fn scan(caves: &BooleanField3D, columns: Region) -> Result<LocationField, FieldError> {
        let extent = caves.region();
        let mut field = LocationField::filled(columns, Vec::new());
        for (x, z) in columns.columns() {
            let cells = (extent.min().y..=extent.max().y)
                .rev()
                .map(|y| caves.get(IVec3::new(x, y, z)))
                .collect::<Result<Vec<_>, _>>()?;
            field.set(x, z, Self::scan_column(extent.max().y, cells))?;
        }
        Ok(field)
    }

    /// First floor per column, [`NO_CAVE`] when none is found.
    ///
    /// Older consumers read a single floor height: the first non-cave voxel below the first
    /// cave voxel, scanning down from the top of `caves`.
    pub fn first_floors(
        caves: &BooleanField3D,
        columns: Region,
    ) -> Result<HeightField, FieldError> {
        let extent = caves.region();
        let mut field = HeightField::filled(columns, NO_CAVE);
        for (x, z) in columns.columns() {
            let mut found_cave = false;
            for y in (extent.min().y..=extent.max().y).rev() {
                let cave = caves.get(IVec3::new(x, y, z))?;
                if !found_cave && cave {
                    found_cave = true;
                } else if found_cave && !cave {
                    field.set(x, z, y as f32)?;
                    break;
                }
            }
        }
        Ok(field)
    }
}

/// Publishes [`FieldKind::CaveLocations`].
pub struct CaveLocationProvider;

impl FieldProvider for CaveLocationProvider {
    fn name(&self) -> &'static str {
        "cave_locations"
    }

    fn requires(&self) -> Vec<FieldRequirement> {
        vec![FieldRequirement::exact(FieldKind::Caves)]
    }

    fn produces(&self) -> Vec<FieldKind> {
        vec![FieldKind::CaveLocations]
    }

    fn process(&self, data: &mut RegionData) -> Result<(), CaveError> {
        let columns = data.region_for(FieldKind::CaveLocations);
        let caves = data.boolean(FieldKind::Caves, data.border_for(FieldKind::CaveLocations))?;
        let locations = ColumnScanner::scan(caves, columns)?;
        let runs: usize = locations.iter().map(|(_, runs)| runs.len()).sum();
        debug!(region = %columns, runs, "scanned cave locations");
        data.insert(FieldKind::CaveLocations, locations);
        Ok(())
    }
}

/// Publishes [`FieldKind::CaveFloor`].
pub struct CaveFloorProvider;

impl FieldProvider for CaveFloorProvider {
    fn name(&self) -> &'static str {
        "cave_floor"
    }

    fn requires(&self) -> Vec<FieldRequirement> {
        vec![FieldRequirement::exact(FieldKind::Caves)]
    }

    fn produces(&self) -> Vec<FieldKind> {
        vec![FieldKind::CaveFloor]
    }

    fn process(&self, data: &mut RegionData) -> Result<(), CaveError> {
        let columns = data.region_for(FieldKind::CaveFloor);
        let caves = data.boolean(FieldKind::Caves, data.border_for(FieldKind::CaveFloor))?;
        let floors = ColumnScanner::first_floors(caves, columns)?;
        data.insert(FieldKind::CaveFloor, floors);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(top_y: i32, pattern: &[bool]) -> BooleanField3D {
        let region = Region::new(
            IVec3::new(0, top_y - pattern.len() as i32 + 1, 0),
            IVec3::new(0, top_y, 0),
        );
        let mut field = BooleanField3D::filled(region, false);
        for (offset, cave) in pattern.iter().enumerate() {
            field
                .set(IVec3::new(0, top_y - offset as i32, 0), *cave)
                .unwrap();
        }
        field
    }

    #[test]
    fn test_run_starting_at_top_has_unknown_ceiling() {
        // y = 4..0: T T F T F
        let locations = ColumnScanner::scan_column(4, [true, true, false, true, false]);
        assert_eq!(
            locations,
            vec![
                CaveLocation {
                    ceiling: None,
                    floor: Some(2),
                },
                CaveLocation::new(2, 0),
            ]
        );
    }

    #[test]
    fn test_run_open_at_bottom_is_dropped() {
        let locations = ColumnScanner::scan_column(10, [false, true, true, false, true, true]);
        assert_eq!(locations, vec![CaveLocation::new(10, 7)]);
    }

    #[test]
    fn test_empty_and_solid_columns() {
        assert!(ColumnScanner::scan_column(3, [false; 4]).is_empty());
        assert!(ColumnScanner::scan_column(3, [true; 4]).is_empty());
        assert!(ColumnScanner::scan_column(3, []).is_empty());
    }

    #[test]
    fn test_known_ceiling_is_above_floor() {
        let pattern = [false, true, false, false, true, true, true, false, true, false];
        for location in ColumnScanner::scan_column(20, pattern) {
            let (ceiling, floor) = location.bounds().unwrap();
            assert!(ceiling > floor);
        }
    }

    #[test]
    fn test_scan_field_matches_column_scan() {
        let field = column(4, &[true, true, false, true, false]);
        let columns = Region::new(IVec3::new(0, 0, 0), IVec3::new(0, 4, 0));
        let locations = ColumnScanner::scan(&field, columns).unwrap();
        assert_eq!(
            locations.get(0, 0).unwrap(),
            &ColumnScanner::scan_column(4, [true, true, false, true, false])
        );
    }

    #[test]
    fn test_scan_outside_cave_field_fails() {
        let field = column(4, &[true, false]);
        let columns = Region::new(IVec3::new(0, 0, 0), IVec3::new(1, 4, 0));
        assert!(ColumnScanner::scan(&field, columns).is_err());
    }

    #[test]
    fn test_first_floor_scan() {
        let field = column(6, &[false, true, true, false, true, false, false]);
        let columns = Region::new(IVec3::new(0, 0, 0), IVec3::new(0, 6, 0));
        let floors = ColumnScanner::first_floors(&field, columns).unwrap();
        assert_eq!(*floors.get(0, 0).unwrap(), 3.0);

        let open = column(3, &[false, true, true, true]);
        let floors = ColumnScanner::first_floors(&open, columns).unwrap();
        assert!(floors.get(0, 0).unwrap().is_nan());
    }

    #[test]
    fn test_first_floor_counts_cave_at_top() {
        // Unlike location scanning, a run touching the top still yields a floor.
        let field = column(3, &[true, false, false, false]);
        let columns = Region::new(IVec3::new(0, 0, 0), IVec3::new(0, 3, 0));
        let floors = ColumnScanner::first_floors(&field, columns).unwrap();
        assert_eq!(*floors.get(0, 0).unwrap(), 2.0);
    }
}
