//! Spatial partitioning for particle neighbor queries.
//!
//! Provides O(1) cell lookup and O(k) neighbor queries where k is the number
//! of particles in nearby cells, rather than O(n) for brute force.
//!
//! A query never visits more cells than the grid has occupied: when the
//! block of cells covering the query radius is larger than that, the
//! occupied cells are scanned directly instead.

use crate::components::{Particle, Position};
use crate::particles::ParticleSystem;
use bevy_ecs::prelude::*;
use std::collections::HashMap;

/// Grid-based spatial partitioning structure.
///
/// Divides the world into square cells and tracks which particles are in
/// each cell. Entries are keyed by particle slot index so that results can
/// be ordered independently of hash iteration order.
///
/// The grid is rebuilt from scratch every step, so entries are only ever
/// appended.
#[derive(Resource, Debug)]
pub struct SpatialGrid {
    /// Cell size in world units.
    pub cell_size: f32,
    cells: HashMap<(i32, i32), Vec<SpatialEntry>>,
    len: usize,
}

/// Entry in a spatial cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialEntry {
    pub index: usize,
    pub x: f32,
    pub y: f32,
}

/// Cells visited by one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellScan {
    /// Inclusive block of cell coordinates.
    Block { min: (i32, i32), max: (i32, i32) },
    /// Every occupied cell.
    Occupied,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(4.0)
    }
}

impl SpatialGrid {
    /// Create a new spatial grid with the given cell size.
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            len: 0,
        }
    }

    /// Convert world coordinates to cell coordinates. Coordinates beyond the
    /// `i32` range land in the outermost cell.
    #[inline]
    pub fn world_to_cell(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    /// Clear all entries.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.len = 0;
    }

    /// Add a slot at a position.
    pub fn insert(&mut self, index: usize, x: f32, y: f32) {
        let cell = self.world_to_cell(x, y);
        self.cells.entry(cell).or_default().push(SpatialEntry { index, x, y });
        self.len += 1;
    }

    fn scan(&self, x: f32, y: f32, radius: f32) -> CellScan {
        let reach = (radius / self.cell_size).ceil().max(0.0);
        let side = 2.0 * f64::from(reach) + 1.0;
        // Also catches an infinite or NaN reach.
        if !(side * side <= self.cells.len() as f64) {
            return CellScan::Occupied;
        }

        let span = reach as i32;
        let (cx, cy) = self.world_to_cell(x, y);
        CellScan::Block {
            min: (cx.saturating_sub(span), cy.saturating_sub(span)),
            max: (cx.saturating_add(span), cy.saturating_add(span)),
        }
    }

    /// Number of cells a `query_radius` call with these arguments visits.
    pub fn scan_cost(&self, x: f32, y: f32, radius: f32) -> usize {
        match self.scan(x, y, radius) {
            CellScan::Block { min, max } => {
                let w = i64::from(max.0) - i64::from(min.0) + 1;
                let h = i64::from(max.1) - i64::from(min.1) + 1;
                (w * h) as usize
            }
            CellScan::Occupied => self.cells.len(),
        }
    }

    /// Query all entries within a radius of a point.
    /// Returns entries sorted by distance, ties broken by slot index.
    pub fn query_radius(&self, x: f32, y: f32, radius: f32) -> Vec<SpatialEntry> {
        let radius_sq = radius * radius;
        let mut results = Vec::new();
        let mut gather = |entries: &[SpatialEntry]| {
            for entry in entries {
                let dist_sq = (entry.x - x).powi(2) + (entry.y - y).powi(2);
                if dist_sq <= radius_sq {
                    results.push(*entry);
                }
            }
        };

        match self.scan(x, y, radius) {
            CellScan::Block { min, max } => {
                for cx in min.0..=max.0 {
                    for cy in min.1..=max.1 {
                        if let Some(entries) = self.cells.get(&(cx, cy)) {
                            gather(entries.as_slice());
                        }
                    }
                }
            }
            CellScan::Occupied => {
                for entries in self.cells.values() {
                    gather(entries.as_slice());
                }
            }
        }

        results.sort_by(|a, b| {
            let dist_a = (a.x - x).powi(2) + (a.y - y).powi(2);
            let dist_b = (b.x - x).powi(2) + (b.y - y).powi(2);
            dist_a
                .partial_cmp(&dist_b)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });

        results
    }

    /// Slot indices greater than `index` within `radius` of its position,
    /// in ascending order. Each unordered pair is reported once.
    pub fn query_higher_neighbors(&self, index: usize, x: f32, y: f32, radius: f32) -> Vec<usize> {
        let mut neighbors: Vec<usize> = self
            .query_radius(x, y, radius)
            .into_iter()
            .filter(|e| e.index > index)
            .map(|e| e.index)
            .collect();
        neighbors.sort_unstable();
        neighbors
    }

    pub fn cell_count(&self, cell: (i32, i32)) -> usize {
        self.cells.get(&cell).map(|v| v.len()).unwrap_or(0)
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn total_count(&self) -> usize {
        self.len
    }
}

/// System that rebuilds the grid from the particle system every step.
///
/// Slot order matches the order in which the particle solver gathers
/// particles, so grid indices line up with the solver's arrays.
pub fn spatial_grid_update_system(
    mut grid: ResMut<SpatialGrid>,
    system: Res<ParticleSystem>,
    query: Query<&Position, With<Particle>>,
) {
    grid.clear();

    let positions = system.slots().iter().filter_map(|&e| query.get(e).ok());
    for (index, pos) in positions.enumerate() {
        grid.insert(index, pos.x, pos.y);
    }
}
