//! Fill tool
//!
//! The fill shape follows the first selected item; other selected items of
//! that shape join the distribution. Tile fills flood the empty cells under
//! the cursor, bounded by tiles (optionally requiring ground below) or by
//! edge placements. Edge fills line the outer boundary of the connected
//! tiles under the cursor.

use super::EditSession;
use std::collections::HashSet;
use tiled_level_core::fill::{
    area_edges, consecutive_tiles, flood_fill, flood_fill_by_edges, Board,
};
use tiled_level_core::pivot::{edge_transform, tile_transform};
use tiled_level_core::{
    ChangeSet, Edge, EdgePlacement, FillSolver, FloodFill, IVec2, IVec3, Item, MirrorState,
    PlacedShape, Placement, TilePlacement,
};
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub enum FillOutcome {
    Filled {
        changes: ChangeSet,
        /// Candidate cells or edges left after gap insertion
        candidates: usize,
        placed: usize,
        /// The region hit the size cap
        truncated: bool,
    },
    NoSelectedItems,
    NoCandidates,
    InvalidCursor,
    UnsupportedShape,
}

impl EditSession {
    /// Selected catalog items sharing the first selected item's shape
    fn fill_items(&self) -> Vec<Item> {
        let items = self.items();
        let mut selected = self.selected_items.iter().filter_map(|id| items.get(*id));
        let Some(first) = selected.next() else {
            return Vec::new();
        };
        let shape = first.shape();
        std::iter::once(first)
            .chain(selected.filter(|i| i.shape() == shape))
            .cloned()
            .collect()
    }

    fn cursor_xy(&self) -> IVec2 {
        self.paint_brush.cell().truncate()
    }

    /// Region the fill would cover at the cursor, for the current selection
    pub(super) fn fill_region(&self) -> Option<FloodFill> {
        match self.fill_items().first()?.shape() {
            PlacedShape::Tile => self.tile_region(),
            PlacedShape::Edge => {
                let cells = self.tile_island()?;
                Some(FloodFill {
                    cells,
                    truncated: false,
                })
            }
            PlacedShape::Point => None,
        }
    }

    /// Empty cells reachable from the cursor on the active floor
    fn tile_region(&self) -> Option<FloodFill> {
        let level = self.level();
        let z = level.active_floor()?.position;
        let size = level.grid_size;
        let start = self.cursor_xy();
        let cap = self.config.max_fill_region;

        if self.config.fill.tiles_as_boundary {
            // Tall tiles from lower floors block as well
            let reaching = level
                .all_tiles()
                .filter(|t| t.grid_position.z <= z && z < t.grid_position.z + t.extent.z);
            let mut board = Board::from_tiles(size, reaching);
            if self.config.fill.need_ground {
                if let Some(below) = level.below_active_floor() {
                    board.require_ground(below.all_tiles());
                }
            }
            Some(flood_fill(&board, start, cap))
        } else {
            let blocking: Vec<Edge> = level
                .all_edges()
                .flat_map(|e| e.occupied_edges())
                .filter(|e| e.z == z)
                .collect();
            Some(flood_fill_by_edges(blocking, size, start, cap))
        }
    }

    /// Connected tiles under the cursor on the active floor
    fn tile_island(&self) -> Option<Vec<IVec2>> {
        let level = self.level();
        let floor = level.active_floor()?;
        let board = Board::from_tiles(level.grid_size, floor.all_tiles());
        let cells = consecutive_tiles(&board, self.cursor_xy());
        (!cells.is_empty()).then_some(cells)
    }

    pub(super) fn fill_at_cursor(&mut self) -> FillOutcome {
        if !self.paint_brush.is_valid() {
            return FillOutcome::InvalidCursor;
        }
        let fill_items = self.fill_items();
        let Some(first) = fill_items.first() else {
            return FillOutcome::NoSelectedItems;
        };
        self.begin_edit();
        let outcome = match first.shape() {
            PlacedShape::Tile => self.fill_tiles(&fill_items),
            PlacedShape::Edge => self.fill_edges(&fill_items),
            PlacedShape::Point => FillOutcome::UnsupportedShape,
        };
        self.update_brush_state();
        outcome
    }

    fn fill_tiles(&mut self, fill_items: &[Item]) -> FillOutcome {
        let Some(region) = self.tile_region() else {
            return FillOutcome::InvalidCursor;
        };
        if region.is_empty() {
            return FillOutcome::NoCandidates;
        }
        let z = self.level().active_floor_position();
        let reach = fill_items.iter().map(|i| i.extent.z).max().unwrap_or(1).max(1);
        let ts = self.level().tile_size;

        let mut changes = ChangeSet::default();
        if !self.config.fill.tiles_as_boundary {
            // Edge-bounded regions may still hold tiles on the fill floor
            let cells = region.on_floor(z);
            let doomed: Vec<Placement> = self
                .level()
                .floor(z)
                .into_iter()
                .flat_map(|f| f.all_tiles())
                .filter(|t| t.occupied_cells().iter().any(|c| cells.contains(c)))
                .cloned()
                .map(Placement::Tile)
                .collect();
            changes.merge(self.project.level_mut().remove_placements(&doomed));
        }
        let above: Vec<IVec3> = (z + 1..z + reach)
            .flat_map(|fz| region.cells.iter().map(move |c| c.extend(fz)))
            .collect();
        changes.merge(self.project.level_mut().empty_region(&above));

        let refs: Vec<&Item> = fill_items.iter().collect();
        let mut solver = FillSolver::with_seed(self.rng.u64(..));
        let plan = solver.distribute_tiles(&refs, region.cells.clone(), self.config.fill.settings());

        let placements: Vec<Placement> = plan
            .placements
            .iter()
            .filter_map(|filled| {
                let item = fill_items.iter().find(|i| i.id == filled.item_id)?;
                let cell = filled.position.extend(z);
                let extent = item.rotated_extent(filled.rotation % 2 == 1);
                let mut p = TilePlacement::new(item.id, cell, extent);
                p.transform = tile_transform(item, cell, filled.rotation, MirrorState::default(), ts);
                Some(Placement::Tile(p))
            })
            .collect();
        let placed = placements.len();
        let (items, level) = self.project.split_mut();
        changes.merge(level.add_placements(items, placements));

        info!(
            "Filled {} tiles over {} candidate cells on floor {}",
            placed, plan.candidates, z
        );
        self.after_edit(&changes);
        FillOutcome::Filled {
            changes,
            candidates: plan.candidates,
            placed,
            truncated: region.truncated,
        }
    }

    fn fill_edges(&mut self, fill_items: &[Item]) -> FillOutcome {
        let Some(cells) = self.tile_island() else {
            return FillOutcome::NoCandidates;
        };
        let z = self.level().active_floor_position();
        let reach = fill_items.iter().map(|i| i.extent.z).max().unwrap_or(1).max(1);
        let ts = self.level().tile_size;

        let region: HashSet<IVec3> = cells.iter().map(|c| c.extend(z)).collect();
        let boundary = area_edges(&region, true);
        let cleared: Vec<Edge> = (z..z + reach)
            .flat_map(|fz| boundary.iter().map(move |e| e.with_z(fz)))
            .collect();
        let mut changes = self.project.level_mut().empty_edge_region(&cleared);

        let refs: Vec<&Item> = fill_items.iter().collect();
        let mut solver = FillSolver::with_seed(self.rng.u64(..));
        let plan = solver.distribute_edges(&refs, boundary, self.config.fill.settings());

        let placements: Vec<Placement> = plan
            .placements
            .iter()
            .filter_map(|filled| {
                let item = fill_items.iter().find(|i| i.id == filled.item_id)?;
                let mut p = EdgePlacement::new(item.id, filled.edge, item.extent);
                p.transform = edge_transform(item, filled.edge, MirrorState::default(), ts);
                if filled.flipped {
                    p.transform.yaw = (p.transform.yaw + 180.0) % 360.0;
                }
                Some(Placement::Edge(p))
            })
            .collect();
        let placed = placements.len();
        let (items, level) = self.project.split_mut();
        changes.merge(level.add_placements(items, placements));

        info!(
            "Filled {} edges over {} boundary edges on floor {}",
            placed, plan.candidates, z
        );
        self.after_edit(&changes);
        FillOutcome::Filled {
            changes,
            candidates: plan.candidates,
            placed,
            truncated: false,
        }
    }
}
