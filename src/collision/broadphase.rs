use std::collections::{HashMap, HashSet};

use glam::Vec3;

use crate::config::BroadPhaseKind;

/// Bounding sphere of one shaped actor, indexed by its position in the proxy slice.
#[derive(Debug, Clone, Copy)]
pub struct BroadPhaseProxy {
    pub position: Vec3,
    pub radius: f32,
}

impl BroadPhaseProxy {
    fn overlaps(&self, other: &BroadPhaseProxy) -> bool {
        let reach = self.radius + other.radius;
        self.position.distance_squared(other.position) <= reach * reach
    }
}

/// Uniform grid spatial partitioning used by the broad-phase.
pub struct SpatialGrid {
    cell_size: f32,
    grid: HashMap<(i32, i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            grid: HashMap::new(),
        }
    }

    fn world_to_grid(&self, pos: Vec3) -> (i32, i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
            (pos.z / self.cell_size).floor() as i32,
        )
    }

    pub fn insert(&mut self, proxy_index: usize, position: Vec3, radius: f32) {
        let min_cell = self.world_to_grid(position - Vec3::splat(radius));
        let max_cell = self.world_to_grid(position + Vec3::splat(radius));

        for x in min_cell.0..=max_cell.0 {
            for y in min_cell.1..=max_cell.1 {
                for z in min_cell.2..=max_cell.2 {
                    self.grid.entry((x, y, z)).or_default().push(proxy_index);
                }
            }
        }
    }

    pub fn query(&self, position: Vec3, radius: f32) -> Vec<usize> {
        let mut results = Vec::new();
        let min_cell = self.world_to_grid(position - Vec3::splat(radius));
        let max_cell = self.world_to_grid(position + Vec3::splat(radius));

        for x in min_cell.0..=max_cell.0 {
            for y in min_cell.1..=max_cell.1 {
                for z in min_cell.2..=max_cell.2 {
                    if let Some(entries) = self.grid.get(&(x, y, z)) {
                        results.extend(entries);
                    }
                }
            }
        }

        results.sort_unstable();
        results.dedup();
        results
    }

    pub fn rebuild(&mut self, proxies: &[BroadPhaseProxy]) {
        self.grid.clear();
        for (index, proxy) in proxies.iter().enumerate() {
            self.insert(index, proxy.position, proxy.radius);
        }
    }
}

/// Broad phase driver returning candidate proxy pairs `(i, j)` with `i < j`.
pub struct BroadPhase {
    kind: BroadPhaseKind,
    grid: SpatialGrid,
}

impl BroadPhase {
    pub fn new(kind: BroadPhaseKind, cell_size: f32) -> Self {
        Self {
            kind,
            grid: SpatialGrid::new(cell_size),
        }
    }

    pub fn get_potential_pairs(&mut self, proxies: &[BroadPhaseProxy]) -> Vec<(usize, usize)> {
        if proxies.len() < 2 {
            return Vec::new();
        }
        match self.kind {
            BroadPhaseKind::UniformGrid => self.grid_pairs(proxies),
            BroadPhaseKind::AllPairs => Self::all_pairs(proxies),
        }
    }

    fn grid_pairs(&mut self, proxies: &[BroadPhaseProxy]) -> Vec<(usize, usize)> {
        self.grid.rebuild(proxies);

        let mut pairs = Vec::new();
        let mut checked = HashSet::new();
        for (index, proxy) in proxies.iter().enumerate() {
            for other in self.grid.query(proxy.position, proxy.radius) {
                if other <= index {
                    continue;
                }
                if checked.insert((index, other)) && proxy.overlaps(&proxies[other]) {
                    pairs.push((index, other));
                }
            }
        }
        pairs
    }

    fn all_pairs(proxies: &[BroadPhaseProxy]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in proxies.iter().enumerate() {
            for (j, b) in proxies.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}
