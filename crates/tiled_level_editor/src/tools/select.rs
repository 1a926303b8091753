//! Box selection, selection rotation and paste

use super::{prepare_paint, BrushAction, EditSession};
use tiled_level_core::overlap::{
    edge_inside_area, edge_inside_tile, point_inside_area, point_inside_tile, tile_inside_area,
    tile_overlaps,
};
use tiled_level_core::{
    ChangeSet, Edge, EdgeType, IVec2, IVec3, LevelAsset, Placement, Vec3, Vec3Swizzles,
};
use tracing::debug;

/// Placements copied by a box selection, relative to the box's min corner
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxSelection {
    pub placements: Vec<Placement>,
    /// Box size in cells and floors
    pub extent: IVec3,
}

impl BoxSelection {
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Turn the selection a quarter inside its box; the box turns with it
    pub fn rotate(&mut self, clockwise: bool, tile_size: Vec3) {
        let turns = if clockwise { 1 } else { 3 };
        for _ in 0..turns {
            self.rotate_once(tile_size);
        }
    }

    /// One clockwise quarter turn: `(x, y)` goes to `(h - y, x)`
    fn rotate_once(&mut self, tile_size: Vec3) {
        let h = self.extent.y;
        for placement in &mut self.placements {
            match placement {
                Placement::Tile(p) => {
                    let pos = p.grid_position;
                    p.grid_position = IVec3::new(h - pos.y - p.extent.y, pos.x, pos.z);
                    p.extent = p.extent.yxz();
                }
                Placement::Edge(p) => {
                    let e = p.edge;
                    p.edge = match e.edge_type {
                        EdgeType::Horizontal => Edge::vertical(h - e.y, e.x, e.z),
                        EdgeType::Vertical => Edge::horizontal(h - e.y - p.extent.x, e.x, e.z),
                    };
                }
                Placement::Point(p) => {
                    let pos = p.grid_position;
                    p.grid_position = IVec3::new(h - pos.y, pos.x, pos.z);
                }
            }
            let transform = match placement {
                Placement::Tile(p) => &mut p.transform,
                Placement::Edge(p) => &mut p.transform,
                Placement::Point(p) => &mut p.transform,
            };
            let t = transform.translation;
            transform.translation = Vec3::new(
                (h as f32 - t.y / tile_size.y) * tile_size.x,
                t.x / tile_size.x * tile_size.y,
                t.z,
            );
            transform.yaw = (transform.yaw + 90.0) % 360.0;
        }
        self.extent = IVec3::new(self.extent.y, self.extent.x, self.extent.z);
    }
}

/// Box selection bookkeeping of a session
#[derive(Debug, Clone, Default)]
pub(super) struct SelectState {
    /// Corner where the running box selection started
    anchor: Option<IVec3>,
    /// Floor visibility before the box selection started
    visibility: Vec<(i32, bool)>,
    copied: Option<BoxSelection>,
}

/// Whether `placement` lies in the box `[min, min + extent)`; box border lines count
fn inside_box(placement: &Placement, min: IVec3, extent: IVec3) -> bool {
    match placement {
        Placement::Tile(p) => tile_overlaps(min, extent, p.grid_position, p.extent),
        Placement::Edge(p) => edge_inside_tile(p.edge, p.extent, min, extent),
        Placement::Point(p) => point_inside_tile(p.grid_position, p.z_extent, min, extent),
    }
}

/// Whether `placement` is picked by a box over `min..min + size` on its floor
///
/// Tiles must intersect the box. Edges must lie on a grid line of the box,
/// borders included, with their run crossing it. Points must sit on a
/// corner of the box.
fn picked_by_box(placement: &Placement, min: IVec2, size: IVec2) -> bool {
    let max = min + size;
    let run = |start: i32, len: i32, lo: i32, hi: i32| start < hi && lo < start + len;
    match placement {
        Placement::Tile(p) => tile_overlaps(
            min.extend(p.grid_position.z),
            size.extend(1),
            p.grid_position,
            p.extent,
        ),
        Placement::Edge(p) => {
            let e = p.edge;
            match e.edge_type {
                EdgeType::Horizontal => {
                    (min.y..=max.y).contains(&e.y) && run(e.x, p.extent.x, min.x, max.x)
                }
                EdgeType::Vertical => {
                    (min.x..=max.x).contains(&e.x) && run(e.y, p.extent.x, min.y, max.y)
                }
            }
        }
        Placement::Point(p) => {
            (min.x..=max.x).contains(&p.grid_position.x)
                && (min.y..=max.y).contains(&p.grid_position.y)
        }
    }
}

/// Inside the grid and on an existing floor
fn fits_level(placement: &Placement, level: &LevelAsset) -> bool {
    let grid = level.grid_size;
    let inside = match placement {
        Placement::Tile(p) => tile_inside_area(p.grid_position, p.extent, grid),
        Placement::Edge(p) => edge_inside_area(p.edge, p.extent.x, grid),
        Placement::Point(p) => point_inside_area(p.grid_position, grid),
    };
    inside && level.floor_exists(placement.floor_position())
}

impl EditSession {
    /// The selection the brush is holding, if any
    pub fn copied_selection(&self) -> Option<&BoxSelection> {
        self.select.copied.as_ref()
    }

    /// Floors a box selection started on the active floor covers
    fn selection_floors(&self) -> Vec<i32> {
        let level = self.level();
        if self.config.select_all_floors {
            let mut floors: Vec<i32> = level.floors().iter().map(|f| f.position).collect();
            floors.sort_unstable();
            return floors;
        }
        let active = level.active_floor_position();
        (active..active + self.config.floor_select_count)
            .take_while(|p| level.floor_exists(*p))
            .collect()
    }

    pub(super) fn selection_start(&mut self) -> bool {
        if !self.paint_brush.is_valid() {
            return false;
        }
        self.select.anchor = Some(self.paint_brush.cell());
        self.select.copied = None;

        let shown = self.selection_floors();
        let level = self.project.level_mut();
        self.select.visibility = level.floors().iter().map(|f| (f.position, f.visible)).collect();
        for (position, _) in &self.select.visibility {
            if level.set_floor_visible(*position, shown.contains(position)).is_err() {
                debug!("Floor {} vanished during box selection", position);
            }
        }
        self.action = BrushAction::BoxSelect;
        true
    }

    fn restore_visibility(&mut self) {
        let cached = std::mem::take(&mut self.select.visibility);
        let level = self.project.level_mut();
        for (position, visible) in cached {
            if level.set_floor_visible(position, visible).is_err() {
                debug!("Floor {} vanished during box selection", position);
            }
        }
    }

    /// Copy everything in the box between the anchor and the cursor
    pub(super) fn selection_end(&mut self) -> usize {
        let Some(anchor) = self.select.anchor.take() else {
            self.action = BrushAction::None;
            return 0;
        };
        let cursor = self.paint_brush.cell();
        let min = IVec2::new(anchor.x.min(cursor.x), anchor.y.min(cursor.y));
        let size = IVec2::new(
            (anchor.x - cursor.x).abs() + 1,
            (anchor.y - cursor.y).abs() + 1,
        );

        let floors = self.selection_floors();
        let base = floors.first().copied().unwrap_or(0);
        let level = self.level();
        let ts = level.tile_size;
        let mut placements = Vec::new();
        for position in &floors {
            let Some(floor) = level.floor(*position) else {
                break;
            };
            placements.extend(
                floor
                    .placements()
                    .into_iter()
                    .filter(|p| picked_by_box(p, min, size)),
            );
        }
        let origin = min.extend(base);
        for placement in &mut placements {
            placement.offset(-origin, ts);
        }
        let selection = BoxSelection {
            placements,
            extent: size.extend(floors.len().max(1) as i32),
        };

        self.restore_visibility();
        let count = selection.len();
        debug!("Box selected {} placements", count);
        if selection.is_empty() {
            self.select.copied = None;
            self.action = BrushAction::None;
        } else {
            self.select.copied = Some(selection);
            self.action = BrushAction::PaintSelected;
        }
        count
    }

    pub(super) fn selection_cancel(&mut self) {
        self.select.anchor = None;
        self.restore_visibility();
        self.action = BrushAction::None;
    }

    pub(super) fn clear_copied(&mut self) {
        self.select.copied = None;
    }

    pub(super) fn rotate_selection(&mut self, clockwise: bool) {
        let ts = self.level().tile_size;
        if let Some(copied) = &mut self.select.copied {
            copied.rotate(clockwise, ts);
        }
    }

    /// Paste the held selection with its min corner at the cursor
    ///
    /// The destination box is cleared first. Copies falling outside the
    /// grid or the floor stack are dropped. Each remaining copy then goes
    /// through the paint overlap rules on its floor: it replaces what a
    /// painted copy would replace, and is dropped where painting is refused.
    pub(super) fn paint_selected(&mut self) -> ChangeSet {
        let Some(copied) = self.select.copied.clone() else {
            return ChangeSet::default();
        };
        if !self.paint_brush.is_valid() {
            return ChangeSet::default();
        }
        self.begin_edit();
        let dest = self.paint_brush.cell();
        let multi_mode = self.config.multi_mode;
        let level = self.level();
        let ts = level.tile_size;

        let doomed: Vec<Placement> = level
            .floors()
            .iter()
            .flat_map(|f| f.placements())
            .filter(|p| inside_box(p, dest, copied.extent))
            .collect();
        let pasted: Vec<Placement> = copied
            .placements
            .into_iter()
            .map(|mut p| {
                p.offset(dest, ts);
                p
            })
            .filter(|p| fits_level(p, level))
            .collect();

        let (items, level) = self.project.split_mut();
        let mut changes = level.remove_placements(&doomed);
        for placement in pasted {
            let Some(item) = items.get(placement.item_id()) else {
                debug!("Dropped pasted placement of unknown item {}", placement.item_id());
                continue;
            };
            let replaced = match prepare_paint(level, items, item, &placement, multi_mode, &[]) {
                Ok(replaced) => replaced,
                Err(rejection) => {
                    debug!("Dropped pasted placement at {:?}: {}", placement.anchor(), rejection);
                    continue;
                }
            };
            match level.replace_placements(items, &replaced, placement) {
                Ok(placed) => changes.merge(placed),
                Err(e) => debug!("Skipped pasted placement: {}", e),
            }
        }
        self.after_edit(&changes);
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::tests::{assert_structures_exclusive, paint_at, session};
    use crate::tools::{EditTool, StrokeModifiers, StrokeStep};
    use tiled_level_core::{
        EdgePlacement, Item, ItemId, PlacedType, PointPlacement, TilePlacement,
    };

    const TS: Vec3 = Vec3::splat(100.0);

    fn drag(session: &mut EditSession, from: (i32, i32), to: (i32, i32)) -> usize {
        session.move_cursor_to(IVec2::new(from.0, from.1));
        assert_eq!(
            session.begin_stroke(StrokeModifiers::default()),
            Some(StrokeStep::SelectionStarted)
        );
        session.move_cursor_to(IVec2::new(to.0, to.1));
        session.end_stroke();
        session.copied_selection().map_or(0, BoxSelection::len)
    }

    fn layout(session: &mut EditSession, block: ItemId, wall: ItemId) {
        session.switch_tool(EditTool::Paint);
        session.set_active_item(Some(block));
        paint_at(session, 1, 1);
        paint_at(session, 2, 1);
        session.set_active_item(Some(wall));
        paint_at(session, 1, 1);
        paint_at(session, 4, 4);
        session.switch_tool(EditTool::Select);
    }

    #[test]
    fn test_paste_reproduces_layout_at_offset() {
        let (mut session, block, wall, _) = session();
        layout(&mut session, block, wall);
        let before: Vec<Placement> = session.level().all_placements();

        assert_eq!(drag(&mut session, (1, 1), (2, 2)), 3);
        assert_eq!(session.action(), BrushAction::PaintSelected);

        session.move_cursor_to(IVec2::new(5, 5));
        let Some(StrokeStep::Pasted(changes)) = session.begin_stroke(StrokeModifiers::default())
        else {
            panic!("expected a paste");
        };
        assert_eq!(changes.added.len(), 3);
        assert!(changes.removed.is_empty());
        assert_eq!(session.level().placement_count(), 7);
        assert_structures_exclusive(&session);

        let delta = IVec3::new(4, 4, 0);
        for original in before.iter().filter(|p| p.anchor().x <= 2) {
            let mut expected = original.clone();
            expected.offset(delta, TS);
            let copy = changes
                .added
                .iter()
                .find(|p| **p == expected)
                .expect("copy at offset");
            assert!(copy
                .transform()
                .translation
                .abs_diff_eq(expected.transform().translation, 1e-3));
        }
    }

    #[test]
    fn test_paste_clears_destination_and_clips() {
        let (mut session, block, wall, _) = session();
        layout(&mut session, block, wall);
        drag(&mut session, (1, 1), (2, 1));

        // The wall at (4, 4) sits on the destination box border
        session.move_cursor_to(IVec2::new(4, 4));
        let Some(StrokeStep::Pasted(changes)) = session.begin_stroke(StrokeModifiers::default())
        else {
            panic!("expected a paste");
        };
        assert_eq!(changes.removed.len(), 1);
        assert_eq!(changes.added.len(), 3);

        session.move_cursor_to(IVec2::new(9, 9));
        let Some(StrokeStep::Pasted(changes)) = session.begin_stroke(StrokeModifiers::default())
        else {
            panic!("expected a paste");
        };
        let anchors: Vec<IVec3> = changes.added.iter().map(Placement::anchor).collect();
        assert_eq!(anchors.len(), 2);
        assert!(!anchors.contains(&IVec3::new(10, 9, 0)));
        assert_structures_exclusive(&session);
    }

    #[test]
    fn test_paste_replaces_structures_outside_the_box() {
        let (mut session, block, ..) = session();
        let slab = session
            .project_mut()
            .items_mut()
            .add_item(Item::new("Slab", PlacedType::Block).with_extent(IVec3::new(2, 1, 1)));
        session.switch_tool(EditTool::Paint);
        session.set_active_item(Some(slab));
        paint_at(&mut session, 2, 1);
        session.set_active_item(Some(block));
        paint_at(&mut session, 6, 5);
        session.switch_tool(EditTool::Select);

        // The slab sticks out of the one-cell-wide part of the box it was picked by
        assert_eq!(drag(&mut session, (1, 1), (2, 1)), 1);
        session.move_cursor_to(IVec2::new(4, 5));
        let Some(StrokeStep::Pasted(changes)) = session.begin_stroke(StrokeModifiers::default())
        else {
            panic!("expected a paste");
        };
        assert_eq!(changes.added.len(), 1);
        assert_eq!(changes.removed.len(), 1);
        assert_eq!(changes.removed[0].item_id(), block);
        assert_eq!(changes.added[0].anchor(), IVec3::new(5, 5, 0));
        assert_eq!(session.level().placement_count(), 2);
        assert_structures_exclusive(&session);
    }

    #[test]
    fn test_paste_keeps_props_under_structures() {
        let (mut session, ..) = session();
        let slab = session
            .project_mut()
            .items_mut()
            .add_item(Item::new("Slab", PlacedType::Block).with_extent(IVec3::new(2, 1, 1)));
        let lamp = session.project_mut().items_mut().add_item(
            Item::new("Lamp", PlacedType::Block)
                .with_structure_type(tiled_level_core::StructureType::Prop),
        );
        session.switch_tool(EditTool::Paint);
        session.set_active_item(Some(slab));
        paint_at(&mut session, 2, 1);
        session.set_active_item(Some(lamp));
        paint_at(&mut session, 6, 5);
        session.switch_tool(EditTool::Select);

        drag(&mut session, (1, 1), (2, 1));
        session.move_cursor_to(IVec2::new(4, 5));
        let Some(StrokeStep::Pasted(changes)) = session.begin_stroke(StrokeModifiers::default())
        else {
            panic!("expected a paste");
        };
        assert!(changes.removed.is_empty());
        assert_eq!(changes.added.len(), 1);
        let ids: Vec<ItemId> = session.level().all_tiles().map(|t| t.item_id).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&lamp));
        assert_structures_exclusive(&session);
    }

    #[test]
    fn test_box_select_floor_range_and_visibility() {
        let (mut session, block, ..) = session();
        {
            let level = session.project_mut().level_mut();
            level.insert_floor(1);
            level.insert_floor(2);
            level.set_floor_visible(1, false).unwrap();
        }
        {
            let (items, level) = session.project_mut().split_mut();
            for z in 0..3 {
                level
                    .add_tile(items, TilePlacement::new(block, IVec3::new(3, 3, z), IVec3::ONE))
                    .unwrap();
            }
        }
        let mut config = session.config().clone();
        config.floor_select_count = 2;
        session.set_config(config);

        session.move_cursor_to(IVec2::new(3, 3));
        session.begin_stroke(StrokeModifiers::default());
        let visible: Vec<bool> = (0..3)
            .map(|z| session.level().floor(z).unwrap().visible)
            .collect();
        assert_eq!(visible, vec![true, true, false]);

        session.end_stroke();
        let copied = session.copied_selection().unwrap();
        assert_eq!(copied.len(), 2);
        assert_eq!(copied.extent, IVec3::new(1, 1, 2));
        let visible: Vec<bool> = (0..3)
            .map(|z| session.level().floor(z).unwrap().visible)
            .collect();
        assert_eq!(visible, vec![true, false, true]);
    }

    #[test]
    fn test_cancel_restores_visibility() {
        let (mut session, ..) = session();
        session.project_mut().level_mut().insert_floor(1);
        session.move_cursor_to(IVec2::new(0, 0));
        session.begin_stroke(StrokeModifiers::default());
        assert!(!session.level().floor(1).unwrap().visible);

        session.cancel_action();
        assert_eq!(session.action(), BrushAction::None);
        assert!(session.level().floor(1).unwrap().visible);
        assert!(session.copied_selection().is_none());
    }

    #[test]
    fn test_empty_box_holds_nothing() {
        let (mut session, ..) = session();
        assert_eq!(drag(&mut session, (0, 0), (3, 3)), 0);
        assert_eq!(session.action(), BrushAction::None);
    }

    #[test]
    fn test_rotate_selection_quarter_turns() {
        let (_, block, wall, _) = session();
        let mut items = tiled_level_core::ItemSet::new("Rotate");
        let pillar = items.add_item(Item::new("Pillar", PlacedType::Pillar));

        let mut tile = TilePlacement::new(block, IVec3::new(0, 0, 0), IVec3::new(2, 1, 1));
        tile.transform.translation = Vec3::new(100.0, 50.0, 0.0);
        let mut edge = EdgePlacement::new(wall, Edge::horizontal(0, 0, 0), IVec3::new(2, 1, 1));
        edge.transform.translation = Vec3::new(100.0, 0.0, 50.0);
        let point = PointPlacement::new(pillar, IVec3::new(2, 1, 0), 1);
        let original = BoxSelection {
            placements: vec![tile.into(), edge.into(), point.into()],
            extent: IVec3::new(2, 1, 1),
        };

        let mut rotated = original.clone();
        rotated.rotate(true, TS);
        assert_eq!(rotated.extent, IVec3::new(1, 2, 1));
        let Placement::Tile(t) = &rotated.placements[0] else {
            panic!("tile expected");
        };
        assert_eq!(t.grid_position, IVec3::ZERO);
        assert_eq!(t.extent, IVec3::new(1, 2, 1));
        assert!(t.transform.translation.abs_diff_eq(Vec3::new(50.0, 100.0, 0.0), 1e-3));
        let Placement::Edge(e) = &rotated.placements[1] else {
            panic!("edge expected");
        };
        assert_eq!(e.edge, Edge::vertical(1, 0, 0));
        assert!(e.transform.translation.abs_diff_eq(Vec3::new(100.0, 100.0, 50.0), 1e-3));
        assert_eq!(rotated.placements[2].anchor(), IVec3::new(0, 2, 0));

        rotated.rotate(false, TS);
        assert_eq!(rotated.extent, original.extent);
        for (a, b) in rotated.placements.iter().zip(&original.placements) {
            assert_eq!(a, b);
            assert!(a
                .transform()
                .translation
                .abs_diff_eq(b.transform().translation, 1e-3));
        }
    }

    #[test]
    fn test_session_rotates_held_selection() {
        let (mut session, block, wall, _) = session();
        layout(&mut session, block, wall);
        drag(&mut session, (1, 1), (2, 1));
        assert!(session.rotate(true));
        assert_eq!(
            session.copied_selection().map(|s| s.extent),
            Some(IVec3::new(1, 2, 1))
        );
    }
}
