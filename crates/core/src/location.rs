use crate::field::Field2D;

/// One contiguous cave run inside a column.
///
/// `None` stands for an unknown bound: the run continues past the region's vertical edge
/// and the neighbouring region's own scan resolves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaveLocation {
    /// First solid voxel above the run.
    pub ceiling: Option<i32>,
    /// First solid voxel below the run.
    pub floor: Option<i32>,
}

impl CaveLocation {
    /// Location with both bounds known.
    pub fn new(ceiling: i32, floor: i32) -> Self {
        Self {
            ceiling: Some(ceiling),
            floor: Some(floor),
        }
    }

    /// `(ceiling, floor)` when both bounds are known.
    pub fn bounds(&self) -> Option<(i32, i32)> {
        Some((self.ceiling?, self.floor?))
    }

    /// Number of cave voxels between the bounds, when both are known.
    pub fn height(&self) -> Option<i32> {
        self.bounds().map(|(ceiling, floor)| ceiling - floor - 1)
    }
}

/// Per-column cave runs, ordered top to bottom.
pub type LocationField = Field2D<Vec<CaveLocation>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_require_both_sides() {
        assert_eq!(CaveLocation::new(9, 4).bounds(), Some((9, 4)));
        assert_eq!(CaveLocation::new(9, 4).height(), Some(4));
        let open = CaveLocation {
            ceiling: None,
            floor: Some(3),
        };
        assert_eq!(open.bounds(), None);
        assert_eq!(open.height(), None);
        assert_eq!(CaveLocation::default().floor, None);
    }
}
