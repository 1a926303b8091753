//! Flood-fill area solver and weighted item distribution
//!
//! Boards are 2D occupancy grids of one floor. A fill first computes the
//! reachable region from a start cell, then [`FillSolver`] spreads the
//! selected items over the region:
//!
//! - normal items are drawn by cumulative weight until nothing fits,
//! - overlay items each sweep the full region independently,
//! - an optional gap weight removes candidates up front.

use crate::grid::{Edge, EdgeType, IVec2, IVec3};
use crate::item::{Item, ItemId};
use crate::placement::TilePlacement;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Weight given to an item that no longer fits anywhere
const EXHAUSTED_WEIGHT: f32 = 0.000_001;
/// Below this total raw weight no item can be placed anymore
const MIN_TOTAL_WEIGHT: f32 = 0.001;

/// Occupancy of the cells `[0, size.x) x [0, size.y)` on one floor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: IVec2,
    occupied: Vec<bool>,
}

impl Board {
    pub fn new(size: IVec2) -> Self {
        let len = (size.x.max(0) as usize) * (size.y.max(0) as usize);
        Self {
            size,
            occupied: vec![false; len],
        }
    }

    /// Board with every tile footprint marked, clipped to the board
    pub fn from_tiles<'a>(size: IVec2, tiles: impl IntoIterator<Item = &'a TilePlacement>) -> Self {
        let mut board = Self::new(size);
        for tile in tiles {
            board.occupy_footprint(tile.grid_position.truncate(), tile.extent.truncate());
        }
        board
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.size.x && cell.y < self.size.y
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| (cell.x as usize) * (self.size.y as usize) + cell.y as usize)
    }

    /// Out-of-bounds cells count as occupied
    pub fn is_occupied(&self, cell: IVec2) -> bool {
        self.index(cell).map_or(true, |i| self.occupied[i])
    }

    pub fn occupy(&mut self, cell: IVec2) {
        if let Some(i) = self.index(cell) {
            self.occupied[i] = true;
        }
    }

    pub fn occupy_footprint(&mut self, origin: IVec2, extent: IVec2) {
        for x in origin.x..origin.x + extent.x {
            for y in origin.y..origin.y + extent.y {
                self.occupy(IVec2::new(x, y));
            }
        }
    }

    /// Mark every cell with no tile underneath as occupied
    pub fn require_ground<'a>(&mut self, below: impl IntoIterator<Item = &'a TilePlacement>) {
        let ground = Board::from_tiles(self.size, below);
        for (slot, has_ground) in self.occupied.iter_mut().zip(ground.occupied) {
            if !has_ground {
                *slot = true;
            }
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|o| **o).count()
    }
}

/// Cells reached by a flood fill
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloodFill {
    pub cells: Vec<IVec2>,
    /// The fill stopped at the region cap before exhausting the region
    pub truncated: bool,
}

impl FloodFill {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Region cells lifted onto floor `z`
    pub fn on_floor(&self, z: i32) -> HashSet<IVec3> {
        self.cells.iter().map(|c| c.extend(z)).collect()
    }
}

fn neighbours(cell: IVec2) -> [IVec2; 4] {
    [
        IVec2::new(cell.x + 1, cell.y),
        IVec2::new(cell.x - 1, cell.y),
        IVec2::new(cell.x, cell.y + 1),
        IVec2::new(cell.x, cell.y - 1),
    ]
}

/// 4-connected fill of the empty cells reachable from `start`
pub fn flood_fill(board: &Board, start: IVec2, max_cells: usize) -> FloodFill {
    let mut result = FloodFill::default();
    let mut stack = vec![start];
    let mut visited = HashSet::new();

    while let Some(cell) = stack.pop() {
        if !visited.insert(cell) || board.is_occupied(cell) {
            continue;
        }
        if result.cells.len() >= max_cells {
            result.truncated = true;
            break;
        }
        result.cells.push(cell);
        // reversed so +X is expanded first
        for next in neighbours(cell).into_iter().rev() {
            if !visited.contains(&next) {
                stack.push(next);
            }
        }
    }
    result
}

/// Fill bounded by edges instead of occupied cells. Edge floors are ignored.
pub fn flood_fill_by_edges(
    blocking: impl IntoIterator<Item = Edge>,
    size: IVec2,
    start: IVec2,
    max_cells: usize,
) -> FloodFill {
    let blocked: HashSet<(i32, i32, EdgeType)> = blocking
        .into_iter()
        .map(|e| (e.x, e.y, e.edge_type))
        .collect();
    let open = |x: i32, y: i32, t: EdgeType| !blocked.contains(&(x, y, t));
    let board = Board::new(size);

    let mut result = FloodFill::default();
    let mut stack = vec![start];
    let mut visited = HashSet::new();

    while let Some(cell) = stack.pop() {
        if !visited.insert(cell) || board.is_occupied(cell) {
            continue;
        }
        if result.cells.len() >= max_cells {
            result.truncated = true;
            break;
        }
        result.cells.push(cell);
        let (x, y) = (cell.x, cell.y);
        if open(x, y + 1, EdgeType::Horizontal) {
            stack.push(IVec2::new(x, y + 1));
        }
        if open(x, y, EdgeType::Horizontal) {
            stack.push(IVec2::new(x, y - 1));
        }
        if open(x, y, EdgeType::Vertical) {
            stack.push(IVec2::new(x - 1, y));
        }
        if open(x + 1, y, EdgeType::Vertical) {
            stack.push(IVec2::new(x + 1, y));
        }
    }
    result
}

/// Connected occupied cells containing `start`
pub fn consecutive_tiles(board: &Board, start: IVec2) -> Vec<IVec2> {
    let mut cells = Vec::new();
    let mut stack = vec![start];
    let mut visited = HashSet::new();

    while let Some(cell) = stack.pop() {
        if !board.in_bounds(cell) || !visited.insert(cell) || !board.is_occupied(cell) {
            continue;
        }
        cells.push(cell);
        stack.extend(neighbours(cell).into_iter().rev());
    }
    cells
}

/// Boundary (`outer`) or shared (`!outer`) edges of a region, sorted and unique
pub fn area_edges(region: &HashSet<IVec3>, outer: bool) -> Vec<Edge> {
    let mut edges = HashSet::new();
    for c in region {
        let sides = [
            (IVec3::new(c.x + 1, c.y, c.z), Edge::vertical(c.x + 1, c.y, c.z)),
            (IVec3::new(c.x - 1, c.y, c.z), Edge::vertical(c.x, c.y, c.z)),
            (IVec3::new(c.x, c.y + 1, c.z), Edge::horizontal(c.x, c.y + 1, c.z)),
            (IVec3::new(c.x, c.y - 1, c.z), Edge::horizontal(c.x, c.y, c.z)),
        ];
        for (neighbour, edge) in sides {
            if region.contains(&neighbour) != outer {
                edges.insert(edge);
            }
        }
    }
    let mut edges: Vec<Edge> = edges.into_iter().collect();
    edges.sort();
    edges
}

/// Corners of a region. Inner corners are surrounded by region cells on all four sides.
pub fn area_points(region: &HashSet<IVec3>, outer: bool) -> Vec<IVec3> {
    let mut all = HashSet::new();
    let mut inner = HashSet::new();
    for c in region {
        // corner offset paired with the three other cells sharing that corner
        let corners = [
            ((0, 0), [(-1, 0), (-1, -1), (0, -1)]),
            ((1, 0), [(0, -1), (1, -1), (1, 0)]),
            ((0, 1), [(-1, 0), (-1, 1), (0, 1)]),
            ((1, 1), [(0, 1), (1, 1), (1, 0)]),
        ];
        for ((cx, cy), others) in corners {
            let corner = IVec3::new(c.x + cx, c.y + cy, c.z);
            all.insert(corner);
            if others
                .iter()
                .all(|(dx, dy)| region.contains(&IVec3::new(c.x + dx, c.y + dy, c.z)))
            {
                inner.insert(corner);
            }
        }
    }
    let mut points: Vec<IVec3> = if outer {
        all.difference(&inner).copied().collect()
    } else {
        inner.into_iter().collect()
    };
    points.sort_by_key(|p| p.to_array());
    points
}

/// Cumulative normalized distribution of `raw` weights
pub fn weighted_coefficients(raw: &[f32]) -> Vec<f32> {
    let sum: f32 = raw.iter().sum();
    if sum <= 0.0 {
        return vec![0.0; raw.len()];
    }
    let mut acc = 0.0;
    raw.iter()
        .map(|v| {
            acc += v;
            acc / sum
        })
        .collect()
}

/// Drop each candidate with probability `ratio`
pub fn create_empty_gaps<T>(candidates: &mut Vec<T>, ratio: f32, rng: &mut fastrand::Rng) {
    candidates.retain(|_| rng.f32() >= ratio);
}

/// Ordered candidate set consumed by a fill run
///
/// Candidates keep their region order. Availability only shrinks, so an anchor
/// rejected for a footprint stays rejected and each footprint resumes its scan
/// where the last one ended.
#[derive(Debug, Clone)]
pub struct CandidatePool<C> {
    order: Vec<C>,
    available: HashSet<C>,
    head: usize,
    cursors: HashMap<IVec2, usize>,
}

impl<C: Copy + Eq + Hash> CandidatePool<C> {
    pub fn new(order: Vec<C>) -> Self {
        let available = order.iter().copied().collect();
        Self {
            order,
            available,
            head: 0,
            cursors: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    /// Remaining candidates in region order
    pub fn remaining(&self) -> impl Iterator<Item = C> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|c| self.available.contains(c))
    }

    /// Remove and return the first remaining candidate
    pub fn pop_front(&mut self) -> Option<C> {
        while let Some(&candidate) = self.order.get(self.head) {
            self.head += 1;
            if self.available.remove(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    fn take(&mut self, used: &[C]) {
        for candidate in used {
            self.available.remove(candidate);
        }
    }

    /// First remaining anchor accepted by `fits`, resuming the scan of `footprint`
    fn first_fit<U>(
        &mut self,
        footprint: IVec2,
        mut fits: impl FnMut(C, &HashSet<C>) -> Option<U>,
    ) -> Option<(C, U)> {
        let start = self
            .cursors
            .get(&footprint)
            .copied()
            .unwrap_or(0)
            .max(self.head);
        for index in start..self.order.len() {
            let anchor = self.order[index];
            if !self.available.contains(&anchor) {
                continue;
            }
            if let Some(used) = fits(anchor, &self.available) {
                self.cursors.insert(footprint, index);
                return Some((anchor, used));
            }
        }
        self.cursors.insert(footprint, self.order.len());
        None
    }
}

fn footprint_fits(
    anchor: IVec2,
    extent: IVec2,
    available: &HashSet<IVec2>,
) -> Option<Vec<IVec2>> {
    let mut cells = Vec::with_capacity((extent.x * extent.y).max(0) as usize);
    for x in 0..extent.x {
        for y in 0..extent.y {
            let cell = IVec2::new(anchor.x + x, anchor.y + y);
            if !available.contains(&cell) {
                return None;
            }
            cells.push(cell);
        }
    }
    Some(cells)
}

fn fit_footprint(
    pool: &mut CandidatePool<IVec2>,
    extent: IVec2,
) -> Option<(IVec2, Vec<IVec2>)> {
    pool.first_fit(extent, |anchor, available| footprint_fits(anchor, extent, available))
}

/// First candidate anchor where the item's footprint fits entirely in `pool`
///
/// Odd rotations swap the footprint. When nothing fits and the item allows
/// random rotation, the next rotation is tried once and `rotation` updated.
/// The cells used by the returned anchor are removed from `pool`.
pub fn feasible_fill_tile(
    item: &Item,
    rotation: &mut u8,
    pool: &mut CandidatePool<IVec2>,
) -> Option<IVec2> {
    if pool.is_empty() {
        return None;
    }
    let footprint = |r: u8| item.rotated_extent(r % 2 == 1).truncate();
    let mut found = fit_footprint(pool, footprint(*rotation));
    if found.is_none() && item.allow_random_rotation {
        *rotation = (*rotation + 1) % 4;
        found = fit_footprint(pool, footprint(*rotation));
    }
    let (anchor, used) = found?;
    pool.take(&used);
    Some(anchor)
}

/// First run of `extent.x` consecutive collinear edges in `pool`
pub fn feasible_fill_edge(item: &Item, pool: &mut CandidatePool<Edge>) -> Option<Edge> {
    let len = item.extent.x.max(1);
    if len == 1 {
        return pool.pop_front();
    }
    let (start, used) = pool.first_fit(IVec2::new(len, 1), |start, available| {
        let run: Vec<Edge> = (0..len).map(|step| start.advanced(step)).collect();
        run.iter().all(|e| available.contains(e)).then_some(run)
    })?;
    pool.take(&used);
    Some(start)
}

/// Gap insertion for a fill run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillSettings {
    pub enable_gap: bool,
    pub gap_coefficient: f32,
}

impl Default for FillSettings {
    fn default() -> Self {
        Self {
            enable_gap: false,
            gap_coefficient: 1.0,
        }
    }
}

/// Normalized selection weights of the normal fill items and the gap
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveWeights {
    pub items: Vec<(ItemId, f32)>,
    pub gap: f32,
}

impl EffectiveWeights {
    pub fn total(&self) -> f32 {
        self.items.iter().map(|(_, w)| w).sum::<f32>() + self.gap
    }
}

/// A tile chosen by the solver, anchored on the fill floor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilledTile {
    pub item_id: ItemId,
    pub position: IVec2,
    /// Clockwise quarter turns
    pub rotation: u8,
}

/// An edge run chosen by the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilledEdge {
    pub item_id: ItemId,
    pub edge: Edge,
    /// Turned around its run by half a turn
    pub flipped: bool,
}

/// Result of a distribution pass
#[derive(Debug, Clone, PartialEq)]
pub struct FillPlan<P> {
    pub placements: Vec<P>,
    /// Candidates left after gap insertion
    pub candidates: usize,
}

/// Weighted random distribution of items over a candidate set
#[derive(Debug, Clone)]
pub struct FillSolver {
    rng: fastrand::Rng,
}

impl Default for FillSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FillSolver {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Reproducible solver
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn rng_mut(&mut self) -> &mut fastrand::Rng {
        &mut self.rng
    }

    /// Normal item weights and gap share, summing to 1 when any weight is positive
    pub fn effective_weights(items: &[&Item], settings: FillSettings) -> EffectiveWeights {
        let normal: Vec<&Item> = items.iter().copied().filter(|i| !i.allow_overlay).collect();
        let total: f32 = normal.iter().map(|i| i.fill_coefficient.max(0.0)).sum();
        let gap = if settings.enable_gap {
            settings.gap_coefficient.max(0.0)
        } else {
            0.0
        };
        let denom = total + gap;
        if denom <= 0.0 {
            return EffectiveWeights {
                items: normal.iter().map(|i| (i.id, 0.0)).collect(),
                gap: 0.0,
            };
        }
        EffectiveWeights {
            items: normal
                .iter()
                .map(|i| (i.id, i.fill_coefficient.max(0.0) / denom))
                .collect(),
            gap: gap / denom,
        }
    }

    /// Spread tile items over `candidates`
    pub fn distribute_tiles(
        &mut self,
        items: &[&Item],
        candidates: Vec<IVec2>,
        settings: FillSettings,
    ) -> FillPlan<FilledTile> {
        self.distribute(items, candidates, settings, |item, pool, rng| {
            let mut rotation = if item.allow_random_rotation {
                rng.u8(0..4)
            } else {
                0
            };
            feasible_fill_tile(item, &mut rotation, pool).map(|position| FilledTile {
                item_id: item.id,
                position,
                rotation,
            })
        })
    }

    /// Spread edge items over `candidates`
    pub fn distribute_edges(
        &mut self,
        items: &[&Item],
        candidates: Vec<Edge>,
        settings: FillSettings,
    ) -> FillPlan<FilledEdge> {
        self.distribute(items, candidates, settings, |item, pool, rng| {
            let flipped = item.allow_random_rotation && rng.bool();
            feasible_fill_edge(item, pool).map(|edge| FilledEdge {
                item_id: item.id,
                edge,
                flipped,
            })
        })
    }

    fn distribute<C: Copy + Eq + Hash, P>(
        &mut self,
        items: &[&Item],
        mut candidates: Vec<C>,
        settings: FillSettings,
        mut place: impl FnMut(&Item, &mut CandidatePool<C>, &mut fastrand::Rng) -> Option<P>,
    ) -> FillPlan<P> {
        let rng = &mut self.rng;
        let normal: Vec<&Item> = items.iter().copied().filter(|i| !i.allow_overlay).collect();
        let overlay: Vec<&Item> = items.iter().copied().filter(|i| i.allow_overlay).collect();

        let mut raw: Vec<f32> = normal.iter().map(|i| i.fill_coefficient.max(0.0)).collect();
        let total: f32 = raw.iter().sum();

        if settings.enable_gap {
            let gap = settings.gap_coefficient.max(0.0);
            if total + gap > 0.0 {
                create_empty_gaps(&mut candidates, gap / (total + gap), rng);
            }
        }

        let mut placements = Vec::new();
        let mut pool = CandidatePool::new(candidates.clone());
        let mut cumulative = weighted_coefficients(&raw);
        let mut exhausted = vec![false; normal.len()];
        let mut exhausted_count = 0;
        let mut can_place = !normal.is_empty() && total > 0.0;

        while !pool.is_empty() && can_place {
            let draw = rng.f32();
            let i = cumulative
                .iter()
                .position(|c| *c >= draw)
                .unwrap_or(normal.len() - 1);
            match place(normal[i], &mut pool, rng) {
                Some(p) => placements.push(p),
                None => {
                    // an item that failed once never fits the shrinking pool again
                    if !exhausted[i] {
                        exhausted[i] = true;
                        exhausted_count += 1;
                    }
                    raw[i] = EXHAUSTED_WEIGHT;
                    cumulative = weighted_coefficients(&raw);
                    can_place = exhausted_count < normal.len()
                        && raw.iter().sum::<f32>() >= MIN_TOTAL_WEIGHT;
                }
            }
        }

        for item in overlay {
            let mut pool = CandidatePool::new(candidates.clone());
            while !pool.is_empty() {
                if item.fill_coefficient < rng.f32() {
                    pool.pop_front();
                    continue;
                }
                match place(item, &mut pool, rng) {
                    Some(p) => placements.push(p),
                    None => {
                        pool.pop_front();
                    }
                }
            }
        }

        FillPlan {
            placements,
            candidates: candidates.len(),
        }
    }
}
