//! Reconciles cave occupancy with the recorded terrain surface.
//!
//! Caves that coincide with open space or sit right under sea-level water are removed, then
//! surface markers that a cave punched through are moved down onto the cave floor and spread
//! a bounded number of columns sideways into neighbouring caves under solid cover.

use crate::error::CaveError;
use crate::pipeline::FieldProvider;
use cavegen_core::{
    Border, BooleanField3D, FieldError, FieldKind, FieldRequirement, HeightField, IVec3,
    RegionData, ScalarField3D,
};
use std::collections::HashSet;
use tracing::{debug, info};

/// Default number of lateral propagation rounds.
pub const SURFACE_SPREAD: u32 = 3;

/// Voxels above the region the reconciler reads to find breaches from above.
pub const TOP_BORDER: u32 = 20;

const LATERAL: [IVec3; 4] = [
    IVec3::new(-1, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(0, 0, -1),
    IVec3::new(0, 0, 1),
];

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Cave voxels inside the density and surface fields before suppression.
    pub cave_voxels: usize,
    /// Cave voxels cleared because they coincide with open space.
    pub open_space_cleared: usize,
    /// Cave voxels sealed under near-sea-level open space.
    pub sealed: usize,
    /// Surface markers placed on the floor beneath a breach.
    pub seeds: Vec<IVec3>,
    /// Surface markers placed by lateral propagation.
    pub propagated: Vec<IVec3>,
}

/// Bounded surface relocation into exposed caves.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceReconciler {
    spread_radius: u32,
}

impl Default for SurfaceReconciler {
    fn default() -> Self {
        Self::new(SURFACE_SPREAD)
    }
}

impl SurfaceReconciler {
    /// Reconciler spreading at most `spread_radius` columns from a breach.
    pub fn new(spread_radius: u32) -> Self {
        Self { spread_radius }
    }

    /// Propagation rounds.
    pub fn spread_radius(&self) -> u32 {
        self.spread_radius
    }

    /// Halo needed on the cave, surface and density fields.
    pub fn border(&self) -> Border {
        Border::new(TOP_BORDER, self.spread_radius, self.spread_radius)
    }

    /// Run all steps, mutating `caves` and `surfaces` in place.
    pub fn reconcile(
        &self,
        caves: &mut BooleanField3D,
        density: &ScalarField3D,
        surfaces: &mut BooleanField3D,
        sea_level: i32,
    ) -> Result<ReconcileReport, FieldError> {
        let mut report = ReconcileReport::default();

        let mut cave_positions: HashSet<IVec3> = caves
            .iter()
            .filter(|&(pos, cave)| cave && density.contains(pos) && surfaces.contains(pos))
            .map(|(pos, _)| pos)
            .collect();
        report.cave_voxels = cave_positions.len();

        // Keep the ocean from draining straight into a cave.
        for (pos, value) in density.iter() {
            if value > 0.0 {
                continue;
            }
            if cave_positions.remove(&pos) {
                caves.set(pos, false)?;
                report.open_space_cleared += 1;
            }
            if pos.y <= sea_level + 1 {
                for dx in -1..=1 {
                    for dz in -1..=1 {
                        let below = pos + IVec3::new(dx, -1, dz);
                        if cave_positions.remove(&below) {
                            caves.set(below, false)?;
                            report.sealed += 1;
                        }
                    }
                }
            }
        }

        // Cave floors exposed to the sky become surface.
        let mut frontier: HashSet<IVec3> = HashSet::new();
        for &pos in &cave_positions {
            if !surfaces.get(pos)? {
                continue;
            }
            surfaces.set(pos, false)?;
            let mut floor = pos;
            while cave_positions.contains(&floor) {
                floor.y -= 1;
            }
            if surfaces.contains(floor) && is_solid(density, floor)? {
                surfaces.set(floor, true)?;
                frontier.insert(floor);
            }
        }
        report.seeds = sorted(&frontier);

        // Cave floors next to exposed ones become surface too, a bounded number of steps out.
        for _ in 0..self.spread_radius {
            let mut next = HashSet::with_capacity(frontier.len());
            for surface in &frontier {
                for offset in LATERAL {
                    let mut adjacent = *surface + offset;
                    while !cave_positions.contains(&adjacent) && is_solid(density, adjacent)? {
                        adjacent.y += 1;
                    }
                    // Stop unless the climb ended inside a cave, not in open air or off the field.
                    if !cave_positions.contains(&adjacent) {
                        continue;
                    }
                    while cave_positions.contains(&adjacent) {
                        adjacent.y -= 1;
                    }
                    if surfaces.contains(adjacent)
                        && is_solid(density, adjacent)?
                        && !surfaces.get(adjacent)?
                    {
                        surfaces.set(adjacent, true)?;
                        next.insert(adjacent);
                    }
                }
            }
            report.propagated.extend(sorted(&next));
            frontier = next;
        }

        debug!(
            cave_voxels = report.cave_voxels,
            cleared = report.open_space_cleared,
            sealed = report.sealed,
            seeds = report.seeds.len(),
            propagated = report.propagated.len(),
            "reconciled caves with surface"
        );
        Ok(report)
    }
}

/// Solid ground inside the density field; positions outside it count as not solid.
fn is_solid(density: &ScalarField3D, pos: IVec3) -> Result<bool, FieldError> {
    if !density.contains(pos) {
        return Ok(false);
    }
    Ok(density.get(pos)? > 0.0)
}

fn sorted(positions: &HashSet<IVec3>) -> Vec<IVec3> {
    let mut out: Vec<_> = positions.iter().copied().collect();
    out.sort_by_key(|p| (p.y, p.z, p.x));
    out
}

/// Rewrite column heights from reconciled surface markers.
///
/// A column takes the y of its highest marker when that differs from the recorded integer
/// height. Columns with no marker inside `surfaces` keep their height, as do columns whose
/// recorded top lies outside the vertical extent of `surfaces`: markers below an unseen top
/// are buried floors, not the terrain top. Returns the number of columns changed.
pub fn repair_heights(
    surfaces: &BooleanField3D,
    heights: &mut HeightField,
) -> Result<usize, FieldError> {
    let extent = surfaces.region();
    let columns = heights.region();
    let mut changed = 0;
    for (x, z) in columns.columns() {
        if !extent.contains_column(x, z) {
            continue;
        }
        let recorded = *heights.get(x, z)?;
        let in_extent = (extent.min().y..=extent.max().y).contains(&(recorded.floor() as i32));
        if !recorded.is_nan() && !in_extent {
            continue;
        }
        let top = (extent.min().y..=extent.max().y)
            .rev()
            .map(|y| IVec3::new(x, y, z))
            .find_map(|pos| match surfaces.get(pos) {
                Ok(true) => Some(Ok(pos.y)),
                Ok(false) => None,
                Err(err) => Some(Err(err)),
            })
            .transpose()?;
        let Some(top) = top else {
            continue;
        };
        if recorded.is_nan() || recorded.floor() as i32 != top {
            heights.set(x, z, top as f32)?;
            changed += 1;
        }
    }
    Ok(changed)
}

/// Updates [`FieldKind::Caves`], [`FieldKind::Surfaces`] and [`FieldKind::SurfaceHeight`].
pub struct CaveToSurfaceProvider {
    reconciler: SurfaceReconciler,
}

impl CaveToSurfaceProvider {
    /// Provider spreading at most `spread_radius` columns.
    pub fn new(spread_radius: u32) -> Self {
        Self {
            reconciler: SurfaceReconciler::new(spread_radius),
        }
    }
}

impl FieldProvider for CaveToSurfaceProvider {
    fn name(&self) -> &'static str {
        "cave_to_surface"
    }

    fn requires(&self) -> Vec<FieldRequirement> {
        let border = self.reconciler.border();
        vec![
            FieldRequirement::new(FieldKind::Density, border),
            FieldRequirement::new(FieldKind::Caves, border),
            FieldRequirement::new(FieldKind::Surfaces, border),
            FieldRequirement::new(FieldKind::SurfaceHeight, border),
        ]
    }

    fn produces(&self) -> Vec<FieldKind> {
        vec![FieldKind::Caves, FieldKind::Surfaces, FieldKind::SurfaceHeight]
    }

    fn process(&self, data: &mut RegionData) -> Result<(), CaveError> {
        let border = self.reconciler.border();
        let sea_level = data.sea_level()?;
        // Validate every input before taking any, so a failure leaves the store intact.
        data.scalar(FieldKind::Density, border)?;
        data.boolean(FieldKind::Caves, border)?;
        data.boolean(FieldKind::Surfaces, border)?;
        data.height(FieldKind::SurfaceHeight, border)?;
        let mut caves = data.take_boolean(FieldKind::Caves, border)?;
        let mut surfaces = data.take_boolean(FieldKind::Surfaces, border)?;
        let mut heights = data.take_height(FieldKind::SurfaceHeight, border)?;

        let density = data.scalar(FieldKind::Density, border)?;
        let report = self
            .reconciler
            .reconcile(&mut caves, density, &mut surfaces, sea_level)?;
        let repaired = repair_heights(&surfaces, &mut heights)?;

        info!(
            region = %data.region(),
            sealed = report.sealed + report.open_space_cleared,
            seeds = report.seeds.len(),
            propagated = report.propagated.len(),
            repaired,
            "cave surfaces reconciled"
        );
        data.insert(FieldKind::Caves, caves);
        data.insert(FieldKind::Surfaces, surfaces);
        data.insert(FieldKind::SurfaceHeight, heights);
        Ok(())
    }
}
