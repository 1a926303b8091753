//! Editor tools - paint, erase, eyedropper, fill and box selection
//!
//! [`EditSession`] owns the edited project and runs the tool state machine:
//! one active [`EditTool`], an orthogonal [`BrushAction`] for the stroke in
//! progress, and a brush per tool family. Every cursor update re-validates
//! the brush and reports it through [`BrushHints`].

mod brush;
mod erase;
mod fill;
mod paint;
mod select;

pub use brush::{quantize, snap_cell, snap_value, Brush};
pub use erase::EraseOutcome;
pub use fill::FillOutcome;
pub use paint::{prepare_paint, PaintOutcome, PaintRejection};
pub use select::BoxSelection;

use crate::hints::{BrushHints, NoopHints};
use crate::preferences::EditSessionConfig;
use crate::project::EditorProject;
use crate::stats::InstanceStats;
use select::SelectState;
use serde::{Deserialize, Serialize};
use std::fmt;
use tiled_level_core::{
    ChangeSet, EraserTarget, FloodFill, IVec2, IVec3, Item, ItemId, ItemSet, LevelAsset,
    MirrorAxis, PlacedShape, Placement, PlacementTransform, Vec3,
};
use tracing::debug;

/// Current editing tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EditTool {
    #[default]
    Select,
    Paint,
    Eraser,
    Eyedropper,
    Fill,
}

impl EditTool {
    pub fn display_name(&self) -> &'static str {
        match self {
            EditTool::Select => "Select",
            EditTool::Paint => "Paint",
            EditTool::Eraser => "Eraser",
            EditTool::Eyedropper => "Eyedropper",
            EditTool::Fill => "Fill",
        }
    }

    pub fn all() -> &'static [EditTool] {
        &[
            EditTool::Select,
            EditTool::Paint,
            EditTool::Eraser,
            EditTool::Eyedropper,
            EditTool::Fill,
        ]
    }
}

/// Stroke in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrushAction {
    #[default]
    None,
    FreePaint,
    QuickErase,
    Erase,
    BoxSelect,
    /// A box selection is held by the brush and pasted on click
    PaintSelected,
}

/// Modifier keys held when a stroke starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrokeModifiers {
    /// Lock the stroke to one axis
    pub straight: bool,
    /// Paint tool only: remove the active item instead of painting it
    pub quick_erase: bool,
}

/// What a stroke start or stroke move did
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeStep {
    Painted(PaintOutcome),
    Erased(EraseOutcome),
    Picked(Option<ItemId>),
    Filled(FillOutcome),
    SelectionStarted,
    Pasted(ChangeSet),
}

/// The tool state machine over one edited project
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct EditSession {
    project: EditorProject,
    config: EditSessionConfig,
    tool: EditTool,
    action: BrushAction,
    paint_brush: Brush,
    eraser_brush: Brush,
    active_item: Option<ItemId>,
    selected_items: Vec<ItemId>,
    /// Placements added by the running paint stroke
    stroke: Vec<Placement>,
    select: SelectState,
    fill_preview: Option<FloodFill>,
    stats: InstanceStats,
    hints: Box<dyn BrushHints>,
    rng: fastrand::Rng,
}

impl fmt::Debug for EditSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditSession")
            .field("project", &self.project.name())
            .field("tool", &self.tool)
            .field("action", &self.action)
            .field("active_item", &self.active_item)
            .field("selected_items", &self.selected_items)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EditorProject::default(), EditSessionConfig::default())
    }
}

impl EditSession {
    pub fn new(project: EditorProject, config: EditSessionConfig) -> Self {
        let stats = InstanceStats::collect(project.level());
        let mut session = Self {
            project,
            config: config.sanitized(),
            tool: EditTool::default(),
            action: BrushAction::None,
            paint_brush: Brush::default(),
            eraser_brush: Brush::default(),
            active_item: None,
            selected_items: Vec::new(),
            stroke: Vec::new(),
            select: SelectState::default(),
            fill_preview: None,
            stats,
            hints: Box::new(NoopHints),
            rng: fastrand::Rng::new(),
        };
        session.setup_brush();
        session
    }

    /// Reproducible fills
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    pub fn with_hints(mut self, hints: impl BrushHints + 'static) -> Self {
        self.hints = Box::new(hints);
        self.update_brush_state();
        self
    }

    // ---- accessors ----------------------------------------------------

    pub fn project(&self) -> &EditorProject {
        &self.project
    }

    /// Direct access for host-driven edits; call [`Self::update_statistics`] afterwards
    pub fn project_mut(&mut self) -> &mut EditorProject {
        &mut self.project
    }

    pub fn level(&self) -> &LevelAsset {
        self.project.level()
    }

    pub fn items(&self) -> &ItemSet {
        self.project.items()
    }

    pub fn config(&self) -> &EditSessionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditSessionConfig) {
        self.config = config.sanitized();
        self.setup_brush();
    }

    pub fn tool(&self) -> EditTool {
        self.tool
    }

    pub fn action(&self) -> BrushAction {
        self.action
    }

    /// Brush of the current tool
    pub fn brush(&self) -> &Brush {
        match self.tool {
            EditTool::Eraser => &self.eraser_brush,
            _ => &self.paint_brush,
        }
    }

    fn brush_mut(&mut self) -> &mut Brush {
        match self.tool {
            EditTool::Eraser => &mut self.eraser_brush,
            _ => &mut self.paint_brush,
        }
    }

    pub fn active_item(&self) -> Option<ItemId> {
        self.active_item
    }

    pub fn active_item_data(&self) -> Option<&Item> {
        self.active_item.and_then(|id| self.items().get(id))
    }

    pub fn selected_items(&self) -> &[ItemId] {
        &self.selected_items
    }

    pub fn stats(&self) -> &InstanceStats {
        &self.stats
    }

    /// Region the fill tool would cover at the cursor
    pub fn fill_preview(&self) -> Option<&FloodFill> {
        self.fill_preview.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.project.dirty
    }

    // ---- tools and items ----------------------------------------------

    /// Returns false when `tool` is already active
    pub fn switch_tool(&mut self, tool: EditTool) -> bool {
        if tool == self.tool {
            return false;
        }
        self.cancel_action();
        self.tool = tool;
        self.fill_preview = None;

        // The palette selection is per tool; the active item survives
        self.selected_items.clear();
        if tool == EditTool::Paint {
            self.selected_items.extend(self.active_item);
        }
        self.notify_selection();
        self.setup_brush();
        debug!("Switched to {} tool", tool.display_name());
        true
    }

    /// Add `item` to the palette selection; in Paint it becomes the active item
    pub fn select_item(&mut self, item: ItemId) -> bool {
        if !self.items().contains(item) {
            return false;
        }
        if self.tool == EditTool::Paint {
            return self.set_active_item(Some(item));
        }
        if !self.selected_items.contains(&item) {
            self.selected_items.push(item);
        }
        self.notify_selection();
        self.update_brush_state();
        true
    }

    pub fn deselect_item(&mut self, item: ItemId) {
        self.selected_items.retain(|i| *i != item);
        self.notify_selection();
        self.update_brush_state();
    }

    pub fn clear_selection(&mut self) {
        self.selected_items.clear();
        self.notify_selection();
        self.update_brush_state();
    }

    /// Unknown items are refused
    pub fn set_active_item(&mut self, item: Option<ItemId>) -> bool {
        if item.is_some_and(|id| !self.items().contains(id)) {
            return false;
        }
        self.active_item = item;
        if self.tool == EditTool::Paint {
            self.selected_items = item.into_iter().collect();
            self.setup_brush();
        }
        self.notify_selection();
        true
    }

    /// Remove `item` from the catalog together with all its instances
    pub fn remove_catalog_item(&mut self, item: ItemId) -> Option<Item> {
        let changes = self.project.level_mut().clear_item(item);
        let removed = self.project.items_mut().remove_item(item)?;
        self.selected_items.retain(|i| *i != item);
        if self.active_item == Some(item) {
            self.active_item = None;
        }
        self.after_edit(&changes);
        self.project.dirty = true;
        self.notify_selection();
        self.setup_brush();
        Some(removed)
    }

    pub fn set_eraser_target(&mut self, target: EraserTarget) {
        self.config.eraser_target = target;
        if self.tool == EditTool::Eraser {
            self.setup_brush();
        }
    }

    /// Extents outside `1..=16` fall back to one cell
    pub fn set_eraser_extent(&mut self, extent: IVec3) {
        self.config.eraser_extent = extent;
        self.config.sanitize();
        self.update_brush_state();
    }

    fn notify_selection(&mut self) {
        self.hints
            .selection_changed(&self.selected_items, self.active_item);
    }

    // ---- cursor -------------------------------------------------------

    /// Move the cursor to the grid position under `world`
    pub fn move_cursor(&mut self, world: Vec3) -> Option<StrokeStep> {
        let brush = self.brush();
        let cell = quantize(world, brush.shape(), brush.edge_type(), self.level().tile_size);
        self.move_cursor_to(cell)
    }

    /// Move the cursor to `cell` on the active floor and continue the running stroke
    pub fn move_cursor_to(&mut self, cell: IVec2) -> Option<StrokeStep> {
        let cell = if self.config.snap_enabled {
            snap_cell(cell, self.config.step_size, self.config.start_point)
        } else {
            cell
        };
        let z = self.level().active_floor_position();
        let previous = self.brush().cell();
        self.brush_mut().move_to(cell.extend(z));
        self.update_brush_state();

        if self.brush().cell() == previous {
            return None;
        }
        match self.action {
            BrushAction::FreePaint => Some(StrokeStep::Painted(self.paint_at_cursor())),
            BrushAction::QuickErase => Some(StrokeStep::Erased(self.quick_erase())),
            BrushAction::Erase => Some(StrokeStep::Erased(self.erase_at_cursor())),
            _ => None,
        }
    }

    /// Configure the brush for the current tool and re-enter the cursor
    fn setup_brush(&mut self) {
        match self.tool {
            EditTool::Paint => {
                let shape = self
                    .active_item_data()
                    .map(Item::shape)
                    .unwrap_or(PlacedShape::Tile);
                self.paint_brush.setup(shape);
            }
            EditTool::Eraser => {
                let shape = self.config.eraser_target.cursor_shape();
                self.eraser_brush.setup(shape);
            }
            _ => self.paint_brush.setup(PlacedShape::Tile),
        }
        self.refresh_cursor();
    }

    /// Re-enter the cursor at its cell on the active floor
    fn refresh_cursor(&mut self) {
        let z = self.level().active_floor_position();
        let cell = self.brush().cell();
        self.brush_mut().move_to(IVec3::new(cell.x, cell.y, z));
        self.update_brush_state();
    }

    fn evaluate_brush(&self) -> bool {
        let level = self.level();
        let Some(floor) = level.active_floor() else {
            return false;
        };
        if !floor.visible {
            return false;
        }
        let grid = level.grid_size;
        match self.tool {
            EditTool::Paint => self.active_item_data().is_some_and(|item| {
                self.paint_brush
                    .fits(item.rotated_extent(self.paint_brush.is_rotated()), grid)
            }),
            EditTool::Eraser => self.eraser_brush.fits(IVec3::ONE, grid),
            _ => self.paint_brush.fits(IVec3::ONE, grid),
        }
    }

    fn update_brush_state(&mut self) {
        let valid = self.evaluate_brush();
        self.brush_mut().set_valid(valid);

        let preview: Option<PlacementTransform> = match (self.tool, valid) {
            (EditTool::Paint, true) => self
                .active_item_data()
                .map(|item| *self.paint_candidate(item).transform()),
            _ => None,
        };
        self.hints.set_brush_valid(valid);
        self.hints.set_preview_transform(preview.as_ref());

        self.fill_preview = match (self.tool, valid) {
            (EditTool::Fill, true) => self.fill_region(),
            _ => None,
        };
    }

    // ---- strokes ------------------------------------------------------

    /// Primary button pressed: dispatch to the current tool
    pub fn begin_stroke(&mut self, modifiers: StrokeModifiers) -> Option<StrokeStep> {
        match self.tool {
            EditTool::Paint => self.paint_start(modifiers),
            EditTool::Eraser => Some(StrokeStep::Erased(self.eraser_start(modifiers.straight))),
            EditTool::Eyedropper => Some(StrokeStep::Picked(self.pick_at_cursor())),
            EditTool::Fill => Some(StrokeStep::Filled(self.fill_at_cursor())),
            EditTool::Select if self.action == BrushAction::PaintSelected => {
                Some(StrokeStep::Pasted(self.paint_selected()))
            }
            EditTool::Select => self
                .selection_start()
                .then_some(StrokeStep::SelectionStarted),
        }
    }

    /// Primary button released
    pub fn end_stroke(&mut self) {
        match self.action {
            BrushAction::FreePaint | BrushAction::QuickErase => self.paint_end(),
            BrushAction::Erase => self.eraser_end(),
            BrushAction::BoxSelect => {
                self.selection_end();
            }
            BrushAction::None | BrushAction::PaintSelected => {}
        }
    }

    /// Abort whatever the brush is doing; a box selection restores floor visibility
    pub fn cancel_action(&mut self) {
        match self.action {
            BrushAction::FreePaint | BrushAction::QuickErase => self.paint_end(),
            BrushAction::Erase => self.eraser_end(),
            BrushAction::BoxSelect => self.selection_cancel(),
            BrushAction::PaintSelected => self.clear_copied(),
            BrushAction::None => {}
        }
        self.action = BrushAction::None;
    }

    // ---- brush modifiers ----------------------------------------------

    pub fn can_rotate(&self) -> bool {
        match self.tool {
            EditTool::Paint => self.active_item_data().is_some(),
            EditTool::Eraser => {
                let extent = self.config.eraser_extent;
                self.config.eraser_target.cursor_shape() == PlacedShape::Edge
                    || extent.x != extent.y
            }
            EditTool::Select => true,
            _ => false,
        }
    }

    /// Rotate the selection in Select, the eraser in Eraser, the paint brush otherwise
    pub fn rotate(&mut self, clockwise: bool) -> bool {
        if !self.can_rotate() {
            return false;
        }
        match self.tool {
            EditTool::Select => self.rotate_selection(clockwise),
            EditTool::Eraser => self.eraser_brush.rotate(clockwise),
            _ => self.paint_brush.rotate(clockwise),
        }
        self.refresh_cursor();
        true
    }

    pub fn can_mirror(&self) -> bool {
        self.tool == EditTool::Paint && self.active_item_data().is_some()
    }

    pub fn mirror(&mut self, axis: MirrorAxis) -> bool {
        if !self.can_mirror() {
            return false;
        }
        self.paint_brush.toggle_mirror(axis);
        self.update_brush_state();
        true
    }

    pub fn toggle_multi_mode(&mut self) -> bool {
        self.config.multi_mode = !self.config.multi_mode;
        self.config.multi_mode
    }

    pub fn toggle_snap(&mut self) -> bool {
        self.config.snap_enabled = !self.config.snap_enabled;
        self.config.snap_enabled
    }

    pub fn toggle_helper(&mut self) -> bool {
        self.config.show_helper = !self.config.show_helper;
        self.config.show_helper
    }

    /// Make the floor above or below active; false when there is none
    pub fn edit_another_floor(&mut self, up: bool) -> bool {
        let target = self.level().active_floor_position() + if up { 1 } else { -1 };
        if self.project.level_mut().set_active_floor(target).is_err() {
            return false;
        }
        let hidden = self.level().floor(target).is_some_and(|f| !f.visible);
        if hidden {
            self.brush_mut().reset();
            self.refresh_cursor();
        } else {
            self.setup_brush();
        }
        debug!("Editing floor {}", target);
        true
    }

    // ---- catalog clearing ---------------------------------------------

    pub fn clear_item_instances(&mut self, item: ItemId) -> ChangeSet {
        let changes = self.project.level_mut().clear_item(item);
        self.after_edit(&changes);
        changes
    }

    pub fn clear_selected_item_instances(&mut self) -> ChangeSet {
        let mut changes = ChangeSet::default();
        for item in self.selected_items.clone() {
            changes.merge(self.project.level_mut().clear_item(item));
        }
        self.after_edit(&changes);
        changes
    }

    pub fn can_clear_selected_item_instances_in_active_floor(&self) -> bool {
        self.level()
            .active_floor()
            .is_some_and(|floor| self.selected_items.iter().any(|i| floor.uses_item(*i)))
    }

    pub fn clear_selected_item_instances_in_active_floor(&mut self) -> ChangeSet {
        let mut changes = ChangeSet::default();
        for item in self.selected_items.clone() {
            match self.project.level_mut().clear_item_in_active_floor(item) {
                Ok(removed) => changes.merge(removed),
                Err(e) => debug!("Nothing cleared for {}: {}", item, e),
            }
        }
        self.after_edit(&changes);
        changes
    }

    // ---- bookkeeping --------------------------------------------------

    pub fn update_statistics(&mut self) {
        self.stats = InstanceStats::collect(self.project.level());
    }

    fn after_edit(&mut self, changes: &ChangeSet) {
        if changes.is_empty() {
            return;
        }
        self.project.dirty = true;
        self.update_statistics();
    }

    fn begin_edit(&mut self) {
        self.project.level_mut().bump_version();
    }

    /// Floors the eraser and eyedropper may touch
    fn floor_reachable(&self, position: i32) -> bool {
        self.config.edit_hidden_floors
            || self.level().floor(position).is_some_and(|f| f.visible)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tiled_level_core::overlap::tile_overlaps;
    use tiled_level_core::{Edge, PlacedType, TilePlacement};

    /// Session over a 10x10 level with a block, a wall and a floor tile item
    pub(crate) fn session() -> (EditSession, ItemId, ItemId, ItemId) {
        let mut items = ItemSet::new("Test Items");
        let block = items.add_item(Item::new("Block", PlacedType::Block));
        let wall = items.add_item(Item::new("Wall", PlacedType::Wall));
        let floor = items.add_item(Item::new("Planks", PlacedType::Floor));
        let project = EditorProject::new(items, LevelAsset::default());
        let session = EditSession::new(project, EditSessionConfig::default()).with_seed(7);
        (session, block, wall, floor)
    }

    /// Panics when two structure tiles of one family share a cell on a floor
    pub(crate) fn assert_structures_exclusive(session: &EditSession) {
        let items = session.items();
        for floor in session.level().floors() {
            for placed_type in [PlacedType::Block, PlacedType::Floor] {
                let tiles: Vec<&TilePlacement> = floor
                    .tiles(placed_type)
                    .into_iter()
                    .flatten()
                    .filter(|t| items.get(t.item_id).map_or(true, Item::is_structure))
                    .collect();
                for (i, a) in tiles.iter().enumerate() {
                    for b in &tiles[i + 1..] {
                        assert!(
                            !tile_overlaps(a.grid_position, a.extent, b.grid_position, b.extent),
                            "structures at {} and {} share a cell on floor {}",
                            a.grid_position,
                            b.grid_position,
                            floor.position
                        );
                    }
                }
            }
        }
    }

    /// One-click stroke at `(x, y)` on the active floor
    pub(crate) fn paint_at(session: &mut EditSession, x: i32, y: i32) -> Option<StrokeStep> {
        session.move_cursor_to(IVec2::new(x, y));
        let step = session.begin_stroke(StrokeModifiers::default());
        session.end_stroke();
        step
    }

    #[derive(Default, Clone)]
    struct Recorder(Arc<Mutex<Vec<bool>>>);

    impl BrushHints for Recorder {
        fn set_brush_valid(&mut self, valid: bool) {
            if let Ok(mut log) = self.0.lock() {
                log.push(valid);
            }
        }

        fn set_preview_transform(&mut self, _transform: Option<&PlacementTransform>) {}
    }

    #[test]
    fn test_switch_tool_keeps_active_item() {
        let (mut session, block, wall, _) = session();
        assert!(session.switch_tool(EditTool::Fill));
        assert!(!session.switch_tool(EditTool::Fill));
        session.select_item(block);
        session.select_item(wall);
        assert_eq!(session.selected_items(), &[block, wall]);

        session.set_active_item(Some(block));
        session.switch_tool(EditTool::Paint);
        assert_eq!(session.selected_items(), &[block]);
        assert_eq!(session.active_item(), Some(block));
        assert_eq!(session.action(), BrushAction::None);

        session.switch_tool(EditTool::Select);
        assert!(session.selected_items().is_empty());
        assert_eq!(session.active_item(), Some(block));
    }

    #[test]
    fn test_unknown_item_refused() {
        let (mut session, ..) = session();
        assert!(!session.set_active_item(Some(ItemId::new())));
        assert!(!session.select_item(ItemId::new()));
        assert!(session.set_active_item(None));
    }

    #[test]
    fn test_paint_brush_takes_item_shape() {
        let (mut session, _, wall, _) = session();
        session.switch_tool(EditTool::Paint);
        session.select_item(wall);
        assert_eq!(session.brush().shape(), PlacedShape::Edge);
        session.move_cursor_to(IVec2::new(2, 3));
        assert_eq!(session.brush().edge(), Edge::horizontal(2, 3, 0));
    }

    #[test]
    fn test_brush_validity_reported() {
        let (session, block, ..) = session();
        let recorder = Recorder::default();
        let mut session = session.with_hints(recorder.clone());
        session.switch_tool(EditTool::Paint);
        session.set_active_item(Some(block));
        session.move_cursor_to(IVec2::new(3, 3));
        assert!(session.brush().is_valid());
        session.move_cursor_to(IVec2::new(10, 3));
        assert!(!session.brush().is_valid());
        let log = recorder.0.lock().unwrap();
        assert_eq!(log.last(), Some(&false));
        assert!(log.contains(&true));
    }

    #[test]
    fn test_cursor_snaps_to_lattice() {
        let (mut session, ..) = session();
        let mut config = session.config().clone();
        config.step_size = IVec2::new(2, 2);
        config.start_point = IVec2::new(1, 1);
        session.set_config(config);

        session.move_cursor_to(IVec2::new(4, 6));
        assert_eq!(session.brush().cell(), IVec3::new(5, 7, 0));
        session.move_cursor(Vec3::new(250.0, 120.0, 0.0));
        assert_eq!(session.brush().cell(), IVec3::new(3, 1, 0));

        assert!(!session.toggle_snap());
        session.move_cursor_to(IVec2::new(4, 6));
        assert_eq!(session.brush().cell(), IVec3::new(4, 6, 0));
    }

    #[test]
    fn test_rotation_needs_item_in_paint() {
        let (mut session, block, ..) = session();
        session.switch_tool(EditTool::Paint);
        assert!(!session.rotate(true));
        session.set_active_item(Some(block));
        for _ in 0..4 {
            assert!(session.rotate(true));
        }
        assert_eq!(session.brush().rotation(), 0);
        assert!(!session.brush().is_rotated());
    }

    #[test]
    fn test_eraser_rotation_rules() {
        let (mut session, ..) = session();
        session.switch_tool(EditTool::Eraser);
        assert!(!session.can_rotate());
        session.set_eraser_extent(IVec3::new(3, 1, 1));
        assert!(session.can_rotate());
        session.set_eraser_extent(IVec3::ONE);
        session.set_eraser_target(EraserTarget::Only(PlacedType::Wall));
        assert!(session.can_rotate());
        assert_eq!(session.brush().shape(), PlacedShape::Edge);
    }

    #[test]
    fn test_edit_another_floor() {
        let (mut session, block, ..) = session();
        session.project_mut().level_mut().insert_floor(1);
        session.switch_tool(EditTool::Paint);
        session.set_active_item(Some(block));
        session.move_cursor_to(IVec2::new(2, 2));

        assert!(session.edit_another_floor(true));
        assert_eq!(session.level().active_floor_position(), 1);
        assert_eq!(session.brush().cell(), IVec3::new(2, 2, 1));
        assert!(session.brush().is_valid());
        assert!(!session.edit_another_floor(true));

        session.project_mut().level_mut().set_floor_visible(0, false).unwrap();
        assert!(session.edit_another_floor(false));
        assert!(!session.brush().is_valid());
    }

    #[test]
    fn test_clear_selected_in_active_floor() {
        let (mut session, block, ..) = session();
        session.switch_tool(EditTool::Paint);
        session.set_active_item(Some(block));
        paint_at(&mut session, 1, 1);
        assert!(session.can_clear_selected_item_instances_in_active_floor());

        let changes = session.clear_selected_item_instances_in_active_floor();
        assert_eq!(changes.removed.len(), 1);
        assert_eq!(session.stats().total, 0);
        assert!(!session.can_clear_selected_item_instances_in_active_floor());
    }

    #[test]
    fn test_remove_catalog_item() {
        let (mut session, block, ..) = session();
        session.switch_tool(EditTool::Paint);
        session.set_active_item(Some(block));
        paint_at(&mut session, 1, 1);

        assert!(session.remove_catalog_item(block).is_some());
        assert_eq!(session.active_item(), None);
        assert_eq!(session.level().placement_count(), 0);
        assert!(session.is_dirty());
    }
}
