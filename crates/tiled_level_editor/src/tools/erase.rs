//! Eraser tool

use super::{BrushAction, EditSession};
use tiled_level_core::overlap::{erased_by, EraserCursor};
use tiled_level_core::{ChangeSet, PlacedShape, Placement, Vec3Swizzles};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum EraseOutcome {
    Erased(ChangeSet),
    Nothing,
    InvalidBrush,
}

impl EditSession {
    /// Eraser footprint at the brush; box extents turn with the brush
    pub fn eraser_cursor(&self) -> EraserCursor {
        let brush = &self.eraser_brush;
        let target = self.config.eraser_target;
        let mut extent = self.config.eraser_extent;
        if target.cursor_shape() == PlacedShape::Tile && brush.is_rotated() {
            extent = extent.yxz();
        }
        EraserCursor {
            target,
            cell: brush.cell(),
            edge: brush.edge(),
            extent,
        }
    }

    pub(super) fn erase_at_cursor(&mut self) -> EraseOutcome {
        if !self.eraser_brush.is_valid() {
            return EraseOutcome::InvalidBrush;
        }
        let cursor = self.eraser_cursor();
        let items = self.items();
        let doomed: Vec<Placement> = self
            .level()
            .floors()
            .iter()
            .filter(|floor| self.floor_reachable(floor.position))
            .flat_map(|floor| floor.placements())
            .filter(|p| {
                items
                    .get(p.item_id())
                    .is_some_and(|item| erased_by(&cursor, item, p))
            })
            .collect();
        if doomed.is_empty() {
            return EraseOutcome::Nothing;
        }
        let changes = self.project.level_mut().remove_placements(&doomed);
        debug!("Erased {} placements", changes.removed.len());
        self.after_edit(&changes);
        EraseOutcome::Erased(changes)
    }

    pub(super) fn eraser_start(&mut self, straight: bool) -> EraseOutcome {
        self.begin_edit();
        if straight {
            self.eraser_brush.begin_straight();
        }
        self.action = BrushAction::Erase;
        self.erase_at_cursor()
    }

    pub(super) fn eraser_end(&mut self) {
        self.eraser_brush.end_straight();
        self.action = BrushAction::None;
    }
}
