//! Paint tool: candidate placements, overlap policy, quick erase and the eyedropper

use super::{BrushAction, EditSession, EditTool, EraseOutcome, StrokeModifiers, StrokeStep};
use thiserror::Error;
use tiled_level_core::overlap::{occupied_positions_for_edge, placements_overlap, tile_overlaps};
use tiled_level_core::pivot::{edge_transform, point_transform, tile_transform};
use tiled_level_core::{
    ChangeSet, EdgePlacement, IVec3, Item, ItemId, ItemSet, LevelAsset, PlacedShape, Placement,
    PointPlacement, StoreError, TilePlacement,
};
use tracing::debug;

/// Yaw difference below which two placements face the same way
const YAW_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub enum PaintOutcome {
    Placed(ChangeSet),
    Rejected(PaintRejection),
}

/// Why a paint step wrote nothing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaintRejection {
    #[error("no active item")]
    NoActiveItem,
    #[error("brush is outside the grid or on a hidden floor")]
    InvalidBrush,
    #[error("the same item already sits here")]
    AlreadyPlaced,
    #[error("overlaps a placement of the running stroke")]
    OverlapsStroke,
    #[error(transparent)]
    Store(StoreError),
}

fn same_yaw(a: f32, b: f32) -> bool {
    let diff = (a - b).rem_euclid(360.0);
    diff < YAW_EPSILON || 360.0 - diff < YAW_EPSILON
}

/// Same item, same footprint, same facing
fn same_spot(existing: &Placement, candidate: &Placement) -> bool {
    existing == candidate && same_yaw(existing.transform().yaw, candidate.transform().yaw)
}

/// Decide whether `candidate` of `item` may be painted and what it replaces
///
/// Outside multi mode, same-type placements overlapping the candidate on any
/// floor are collected. A structure replaces overlapping structures; a prop
/// replaces overlapping copies of itself. Placements of unknown items count
/// as structures. Multi mode only refuses an exact duplicate on the
/// candidate's floor and never removes anything.
pub fn prepare_paint(
    level: &LevelAsset,
    items: &ItemSet,
    item: &Item,
    candidate: &Placement,
    multi_mode: bool,
    stroke: &[Placement],
) -> Result<Vec<Placement>, PaintRejection> {
    if multi_mode {
        let duplicate = level
            .floor(candidate.floor_position())
            .is_some_and(|floor| {
                floor
                    .placements_of(item.placed_type)
                    .iter()
                    .any(|p| same_spot(p, candidate))
            });
        return if duplicate {
            Err(PaintRejection::AlreadyPlaced)
        } else {
            Ok(Vec::new())
        };
    }

    if stroke.iter().any(|p| placements_overlap(p, candidate)) {
        return Err(PaintRejection::OverlapsStroke);
    }

    let overlapping: Vec<Placement> = level
        .placements_of_type(item.placed_type)
        .into_iter()
        .filter(|p| placements_overlap(p, candidate))
        .collect();
    if overlapping.iter().any(|p| same_spot(p, candidate)) {
        return Err(PaintRejection::AlreadyPlaced);
    }

    let replaced = overlapping
        .into_iter()
        .filter(|p| {
            if item.is_structure() {
                items.get(p.item_id()).map_or(true, Item::is_structure)
            } else {
                p.item_id() == item.id
            }
        })
        .collect();
    Ok(replaced)
}

impl EditSession {
    /// The placement the paint brush would commit for `item`
    pub(super) fn paint_candidate(&self, item: &Item) -> Placement {
        let brush = &self.paint_brush;
        let ts = self.level().tile_size;
        let mirror = brush.mirror();
        match item.shape() {
            PlacedShape::Tile => {
                let cell = brush.cell();
                let mut p = TilePlacement::new(item.id, cell, item.rotated_extent(brush.is_rotated()));
                p.transform = tile_transform(item, cell, brush.rotation(), mirror, ts);
                p.is_mirrored = mirror.any();
                Placement::Tile(p)
            }
            PlacedShape::Edge => {
                let edge = brush.edge();
                let mut p = EdgePlacement::new(item.id, edge, item.extent);
                p.transform = edge_transform(item, edge, mirror, ts);
                // Half turns face the other side of the same run
                if brush.rotation() >= 2 {
                    p.transform.yaw = (p.transform.yaw + 180.0) % 360.0;
                }
                p.is_mirrored = mirror.any();
                Placement::Edge(p)
            }
            PlacedShape::Point => {
                let cell = brush.cell();
                let mut p = PointPlacement::new(item.id, cell, item.extent.z);
                p.transform = point_transform(item, cell, mirror, ts);
                p.is_mirrored = mirror.any();
                Placement::Point(p)
            }
        }
    }

    /// Commit the active item at the brush
    pub(super) fn paint_at_cursor(&mut self) -> PaintOutcome {
        let Some(item) = self.active_item_data().cloned() else {
            return PaintOutcome::Rejected(PaintRejection::NoActiveItem);
        };
        if !self.paint_brush.is_valid() {
            return PaintOutcome::Rejected(PaintRejection::InvalidBrush);
        }
        let candidate = self.paint_candidate(&item);
        let replaced = match prepare_paint(
            self.level(),
            self.items(),
            &item,
            &candidate,
            self.config.multi_mode,
            &self.stroke,
        ) {
            Ok(replaced) => replaced,
            Err(rejection) => {
                debug!("Paint rejected at {:?}: {}", candidate.anchor(), rejection);
                return PaintOutcome::Rejected(rejection);
            }
        };

        let (items, level) = self.project.split_mut();
        match level.replace_placements(items, &replaced, candidate.clone()) {
            Ok(changes) => {
                self.stroke.push(candidate);
                self.after_edit(&changes);
                PaintOutcome::Placed(changes)
            }
            Err(e) => {
                debug!("Paint failed at {:?}: {}", candidate.anchor(), e);
                PaintOutcome::Rejected(PaintRejection::Store(e))
            }
        }
    }

    /// Remove copies of the active item overlapping the brush footprint
    pub(super) fn quick_erase(&mut self) -> EraseOutcome {
        let Some(item) = self.active_item_data().cloned() else {
            return EraseOutcome::Nothing;
        };
        if !self.paint_brush.is_valid() {
            return EraseOutcome::InvalidBrush;
        }
        let candidate = self.paint_candidate(&item);
        let doomed: Vec<Placement> = self
            .level()
            .placements_of_type(item.placed_type)
            .into_iter()
            .filter(|p| p.item_id() == item.id && placements_overlap(p, &candidate))
            .collect();
        if doomed.is_empty() {
            return EraseOutcome::Nothing;
        }
        let changes = self.project.level_mut().remove_placements(&doomed);
        self.after_edit(&changes);
        EraseOutcome::Erased(changes)
    }

    pub(super) fn paint_start(&mut self, modifiers: StrokeModifiers) -> Option<StrokeStep> {
        // Paint without an item is an idle state
        self.active_item_data()?;
        self.begin_edit();
        self.stroke.clear();
        if modifiers.straight {
            self.paint_brush.begin_straight();
        }
        if modifiers.quick_erase {
            self.action = BrushAction::QuickErase;
            Some(StrokeStep::Erased(self.quick_erase()))
        } else {
            self.action = BrushAction::FreePaint;
            Some(StrokeStep::Painted(self.paint_at_cursor()))
        }
    }

    pub(super) fn paint_end(&mut self) {
        self.stroke.clear();
        self.paint_brush.end_straight();
        self.action = BrushAction::None;
    }

    /// Eyedropper: make the item under the cursor active and switch to Paint
    pub(super) fn pick_at_cursor(&mut self) -> Option<ItemId> {
        let cell = self.paint_brush.cell();
        if !self.floor_reachable(cell.z) {
            return None;
        }
        let floor = self.level().floor(cell.z)?;
        let picked = floor
            .placements()
            .into_iter()
            .find(|p| covers_cell(p, cell))
            .map(|p| p.item_id())?;
        if !self.set_active_item(Some(picked)) {
            debug!("Picked item {} is not in the catalog", picked);
            return None;
        }
        self.switch_tool(EditTool::Paint);
        Some(picked)
    }
}

/// Whether `placement` is under the tile cursor at `cell`
fn covers_cell(placement: &Placement, cell: IVec3) -> bool {
    match placement {
        Placement::Tile(p) => tile_overlaps(cell, IVec3::ONE, p.grid_position, p.extent),
        Placement::Edge(p) => occupied_positions_for_edge(p.edge, p.extent).contains(&cell),
        Placement::Point(p) => {
            p.grid_position.x == cell.x
                && p.grid_position.y == cell.y
                && (p.grid_position.z..p.grid_position.z + p.z_extent).contains(&cell.z)
        }
    }
}
