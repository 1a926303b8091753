//! Game-time building and removal
//!
//! [`GametimeSystem`] holds the flattened placements of one or more levels and
//! answers the player's build and remove requests against them: where the
//! cursor sits on the grid, whether the active item fits there, and whether a
//! placed item may be taken away.

use crate::error::GametimeError;
use crate::game_data::GameData;
use crate::restriction::RestrictionZones;
use std::fmt;
use tiled_level_core::overlap::{self, EraserCursor};
use tiled_level_core::pivot::{edge_transform, point_transform, tile_transform};
use tiled_level_core::{
    Edge, EdgePlacement, EdgeType, EraserTarget, IVec3, Item, ItemId, ItemSet, LevelAsset,
    MirrorState, PlacedShape, Placement, PointPlacement, TilePlacement, Vec3, Vec3Swizzles,
};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GametimeMode {
    /// Nothing loaded, or the loaded levels were rejected
    #[default]
    Uninitialized,
    /// Cursor positions must fall inside one of the loaded levels
    BoundToExistingLevels,
    /// Cursor positions are accepted anywhere
    Infinite,
}

/// Why the active item cannot be built at the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildRejection {
    NotActive,
    OutOfBounds,
    Restricted,
    Occupied,
    Vetoed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    Built(Placement),
    Rejected(BuildRejection),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    Removed(Placement),
    NotFound,
    Restricted,
    Vetoed,
}

/// Game hook deciding whether an item may be built or removed
pub type ItemFilter = Box<dyn Fn(&Item) -> bool + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Cell(IVec3),
    Edge(Edge),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Eraser {
    target: EraserTarget,
    extent: IVec3,
}

#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct GametimeSystem {
    mode: GametimeMode,
    tile_size: Vec3,
    item_set: ItemSet,
    data: GameData,
    zones: RestrictionZones,
    /// Building is only allowed inside allow-build zones
    pub lock_build: bool,
    /// Removing is only allowed inside allow-remove zones
    pub lock_remove: bool,
    active_item: Option<ItemId>,
    rotated: bool,
    rotation: u8,
    cursor: Option<Cursor>,
    eraser: Option<Eraser>,
    build_filter: Option<ItemFilter>,
    remove_filter: Option<ItemFilter>,
}

impl fmt::Debug for GametimeSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GametimeSystem")
            .field("mode", &self.mode)
            .field("tile_size", &self.tile_size)
            .field("placements", &self.data.placement_count())
            .field("zones", &self.zones.len())
            .field("lock_build", &self.lock_build)
            .field("lock_remove", &self.lock_remove)
            .field("active_item", &self.active_item)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl Default for GametimeSystem {
    fn default() -> Self {
        Self::new(Vec3::splat(100.0))
    }
}

impl GametimeSystem {
    pub fn new(tile_size: Vec3) -> Self {
        Self {
            mode: GametimeMode::Uninitialized,
            tile_size,
            item_set: ItemSet::default(),
            data: GameData::default(),
            zones: RestrictionZones::default(),
            lock_build: false,
            lock_remove: false,
            active_item: None,
            rotated: false,
            rotation: 0,
            cursor: None,
            eraser: None,
            build_filter: None,
            remove_filter: None,
        }
    }

    /// Load `levels`, each shifted by its cell offset
    ///
    /// Levels with a foreign tile size are skipped. Overlapping levels leave
    /// the system uninitialized. With no levels, or with `unbound`, the
    /// player may build anywhere.
    pub fn initialize(
        &mut self,
        item_set: ItemSet,
        levels: &[(LevelAsset, IVec3)],
        unbound: bool,
    ) -> Result<GametimeMode, GametimeError> {
        self.check_tile_size(&item_set)?;

        let mut data = GameData::default();
        for (index, (level, offset)) in levels.iter().enumerate() {
            if !level.tile_size.abs_diff_eq(self.tile_size, 1e-3) {
                warn!(
                    "Skipping level {} with tile size {:?}, expected {:?}",
                    index, level.tile_size, self.tile_size
                );
                continue;
            }
            data += GameData::from_level(level, *offset);
        }

        for (i, a) in data.boundaries.iter().enumerate() {
            for (j, b) in data.boundaries.iter().enumerate().skip(i + 1) {
                if a.intersects(b) {
                    self.mode = GametimeMode::Uninitialized;
                    warn!("Levels {} and {} overlap, game time disabled", i, j);
                    return Err(GametimeError::OverlappingLevels(i, j));
                }
            }
        }

        let mode = if data.boundaries.is_empty() || unbound {
            GametimeMode::Infinite
        } else {
            GametimeMode::BoundToExistingLevels
        };
        self.install(item_set, data, mode);
        Ok(mode)
    }

    /// Load a previously saved snapshot
    pub fn initialize_from_data(
        &mut self,
        item_set: ItemSet,
        data: GameData,
        unbound: bool,
    ) -> Result<GametimeMode, GametimeError> {
        self.check_tile_size(&item_set)?;
        let mode = if data.boundaries.is_empty() || unbound {
            GametimeMode::Infinite
        } else {
            GametimeMode::BoundToExistingLevels
        };
        self.install(item_set, data, mode);
        Ok(mode)
    }

    /// Swap the catalog; zones are recomputed against the new rules
    pub fn change_item_set(&mut self, item_set: ItemSet) -> Result<(), GametimeError> {
        self.check_tile_size(&item_set)?;
        self.item_set = item_set;
        self.item_set.rebuild_index();
        if self
            .active_item
            .is_some_and(|id| !self.item_set.contains(id))
        {
            self.deactivate_item();
        }
        self.rebuild_zones();
        Ok(())
    }

    fn check_tile_size(&mut self, item_set: &ItemSet) -> Result<(), GametimeError> {
        if item_set.tile_size.abs_diff_eq(self.tile_size, 1e-3) {
            return Ok(());
        }
        self.mode = GametimeMode::Uninitialized;
        Err(GametimeError::TileSizeMismatch {
            expected: self.tile_size,
            found: item_set.tile_size,
        })
    }

    fn install(&mut self, mut item_set: ItemSet, data: GameData, mode: GametimeMode) {
        item_set.rebuild_index();
        self.item_set = item_set;
        self.data = data;
        self.mode = mode;
        self.active_item = None;
        self.cursor = None;
        self.eraser = None;
        self.rebuild_zones();
        info!(
            "Game time ready ({:?}): {} placements, {} restriction zones",
            mode,
            self.data.placement_count(),
            self.zones.len()
        );
    }

    fn rebuild_zones(&mut self) {
        self.zones = RestrictionZones::from_game_data(&self.data, &self.item_set);
    }

    pub fn mode(&self) -> GametimeMode {
        self.mode
    }

    pub fn tile_size(&self) -> Vec3 {
        self.tile_size
    }

    pub fn item_set(&self) -> &ItemSet {
        &self.item_set
    }

    pub fn data(&self) -> &GameData {
        &self.data
    }

    pub fn zones(&self) -> &RestrictionZones {
        &self.zones
    }

    pub fn set_build_filter(&mut self, filter: impl Fn(&Item) -> bool + Send + Sync + 'static) {
        self.build_filter = Some(Box::new(filter));
    }

    pub fn set_remove_filter(&mut self, filter: impl Fn(&Item) -> bool + Send + Sync + 'static) {
        self.remove_filter = Some(Box::new(filter));
    }

    // Grid positions

    fn located(&self, world: Vec3, lo: Vec3, hi: Vec3) -> bool {
        match self.mode {
            GametimeMode::Uninitialized => false,
            GametimeMode::Infinite => true,
            GametimeMode::BoundToExistingLevels => self
                .data
                .boundaries
                .iter()
                .any(|b| b.expanded(lo, hi).contains(world)),
        }
    }

    fn cell_of(&self, world: Vec3) -> IVec3 {
        IVec3::new(
            (world.x / self.tile_size.x).floor() as i32,
            (world.y / self.tile_size.y).floor() as i32,
            (world.z / self.tile_size.z).floor() as i32,
        )
    }

    /// Cell containing `world`
    pub fn tile_position(&self, world: Vec3) -> Option<IVec3> {
        self.located(world, Vec3::ZERO, Vec3::ZERO)
            .then(|| self.cell_of(world))
    }

    /// Grid line of `edge_type` nearest to `world`
    pub fn edge_at(&self, world: Vec3, edge_type: EdgeType) -> Option<Edge> {
        let half = self.tile_size * 0.5;
        let (hi, shift) = match edge_type {
            EdgeType::Horizontal => (
                Vec3::new(0.0, half.y, half.z),
                Vec3::new(0.0, half.y, 0.0),
            ),
            EdgeType::Vertical => (
                Vec3::new(half.x, 0.0, half.z),
                Vec3::new(half.x, 0.0, 0.0),
            ),
        };
        if !self.located(world, half, hi) {
            return None;
        }
        let cell = self.cell_of(world + shift);
        Some(Edge::new(cell.x, cell.y, cell.z, edge_type))
    }

    /// Cell corner nearest to `world`
    pub fn point_position(&self, world: Vec3) -> Option<IVec3> {
        let half = self.tile_size * 0.5;
        if !self.located(world, half, half) {
            return None;
        }
        Some(self.cell_of(world + Vec3::new(half.x, half.y, 0.0)))
    }

    fn cursor_at(&self, world: Vec3, shape: PlacedShape) -> Option<Cursor> {
        match shape {
            PlacedShape::Tile => self.tile_position(world).map(Cursor::Cell),
            PlacedShape::Edge => {
                let edge_type = if self.rotated {
                    EdgeType::Vertical
                } else {
                    EdgeType::Horizontal
                };
                self.edge_at(world, edge_type).map(Cursor::Edge)
            }
            PlacedShape::Point => self.point_position(world).map(Cursor::Cell),
        }
    }

    // Build preview

    pub fn active_item(&self) -> Option<&Item> {
        self.active_item.and_then(|id| self.item_set.get(id))
    }

    /// Start previewing `item`; the current rotation carries over
    pub fn activate_item(&mut self, item: ItemId) -> bool {
        if self.mode == GametimeMode::Uninitialized || !self.item_set.contains(item) {
            return false;
        }
        self.eraser = None;
        self.active_item = Some(item);
        self.cursor = None;
        true
    }

    pub fn deactivate_item(&mut self) {
        self.active_item = None;
        self.cursor = None;
    }

    /// Move the preview to the grid position under `world`
    pub fn move_preview_to(&mut self, world: Vec3) -> bool {
        let Some(shape) = self.active_item().map(Item::shape) else {
            return false;
        };
        self.cursor = self.cursor_at(world, shape);
        self.cursor.is_some()
    }

    /// Quarter turn of the preview; edges swap orientation
    pub fn rotate_preview(&mut self, clockwise: bool) {
        if self.active_item.is_none() {
            return;
        }
        self.rotate(clockwise);
    }

    fn rotate(&mut self, clockwise: bool) {
        self.rotated = !self.rotated;
        self.rotation = (self.rotation + if clockwise { 1 } else { 3 }) % 4;
        if let Some(Cursor::Edge(edge)) = &mut self.cursor {
            edge.toggle_type();
        }
    }

    pub fn is_rotated(&self) -> bool {
        self.rotated
    }

    fn cells_for(&self, item: &Item, cursor: Cursor) -> Vec<IVec3> {
        match cursor {
            Cursor::Cell(cell) => overlap::occupied_positions_for_item(item, cell, self.rotated),
            Cursor::Edge(edge) => overlap::occupied_positions_for_edge(edge, item.extent),
        }
    }

    /// Whether the footprint collides with placed items of the same type
    ///
    /// Restriction tiles never block. Structures reject any overlap, props
    /// only reject overlapping another copy of themselves.
    fn blocked(&self, item: &Item, cursor: Cursor) -> bool {
        let ty = item.placed_type;
        let hits: Vec<ItemId> = match (item.shape(), cursor) {
            (PlacedShape::Tile, Cursor::Cell(cell)) => {
                let extent = item.rotated_extent(self.rotated);
                self.data
                    .tiles_of(ty)
                    .iter()
                    .filter(|p| !self.is_restriction(p.item_id))
                    .filter(|p| overlap::tile_overlaps(cell, extent, p.grid_position, p.extent))
                    .map(|p| p.item_id)
                    .collect()
            }
            (PlacedShape::Edge, Cursor::Edge(edge)) => self
                .data
                .edges_of(ty)
                .iter()
                .filter(|p| overlap::edge_overlaps(edge, item.extent, p.edge, p.extent))
                .map(|p| p.item_id)
                .collect(),
            (PlacedShape::Point, Cursor::Cell(cell)) => self
                .data
                .points_of(ty)
                .iter()
                .filter(|p| {
                    overlap::point_overlaps(cell, item.extent.z, p.grid_position, p.z_extent)
                })
                .map(|p| p.item_id)
                .collect(),
            _ => return true,
        };
        if hits.is_empty() {
            false
        } else if item.is_structure() {
            true
        } else {
            hits.contains(&item.id)
        }
    }

    fn is_restriction(&self, id: ItemId) -> bool {
        self.item_set.get(id).is_some_and(Item::is_restriction)
    }

    /// Validate building the active item at the preview cursor
    pub fn can_build(&self) -> Result<(), BuildRejection> {
        let item = self.active_item().ok_or(BuildRejection::NotActive)?;
        let cursor = self.cursor.ok_or(BuildRejection::OutOfBounds)?;
        if self.build_filter.as_ref().is_some_and(|f| !f(item)) {
            return Err(BuildRejection::Vetoed);
        }
        let cells = self.cells_for(item, cursor);
        if !self.zones.build_allowed(item.id, &cells, self.lock_build) {
            return Err(BuildRejection::Restricted);
        }
        if self.blocked(item, cursor) {
            return Err(BuildRejection::Occupied);
        }
        Ok(())
    }

    /// Build the active item at the preview cursor
    pub fn build(&mut self) -> BuildOutcome {
        if let Err(rejection) = self.can_build() {
            debug!("Build rejected: {:?}", rejection);
            return BuildOutcome::Rejected(rejection);
        }
        let (Some(item), Some(cursor)) = (self.active_item().cloned(), self.cursor) else {
            return BuildOutcome::Rejected(BuildRejection::NotActive);
        };
        let ts = self.tile_size;
        let mirror = MirrorState::default();
        let placement = match cursor {
            Cursor::Cell(cell) if item.shape() == PlacedShape::Point => {
                let mut p = PointPlacement::new(item.id, cell, item.extent.z);
                p.transform = point_transform(&item, cell, mirror, ts);
                Placement::Point(p)
            }
            Cursor::Cell(cell) => {
                let mut p = TilePlacement::new(item.id, cell, item.rotated_extent(self.rotated));
                p.transform = tile_transform(&item, cell, self.rotation, mirror, ts);
                Placement::Tile(p)
            }
            Cursor::Edge(edge) => {
                let mut p = EdgePlacement::new(item.id, edge, item.extent);
                p.transform = edge_transform(&item, edge, mirror, ts);
                Placement::Edge(p)
            }
        };
        self.data.push(item.placed_type, placement.clone());
        if item.is_restriction() {
            self.rebuild_zones();
        }
        debug!("Built {} at {:?}", item.name, placement.anchor());
        BuildOutcome::Built(placement)
    }

    // Removal

    /// Whether `item` may be removed where the player hit it
    pub fn can_remove(&self, item: ItemId, hit: Vec3) -> bool {
        self.removal_check(item, hit).is_ok()
    }

    fn removal_check(&self, id: ItemId, hit: Vec3) -> Result<(), RemoveOutcome> {
        let item = self.item_set.get(id).ok_or(RemoveOutcome::NotFound)?;
        if self.remove_filter.as_ref().is_some_and(|f| !f(item)) {
            return Err(RemoveOutcome::Vetoed);
        }
        let cell = [self.cell_of(hit)];
        if self.zones.remove_restricted(id, &cell, self.lock_remove) {
            return Err(RemoveOutcome::Restricted);
        }
        Ok(())
    }

    /// Remove `placement`, hit by the player at world position `hit`
    pub fn remove(&mut self, placement: &Placement, hit: Vec3) -> RemoveOutcome {
        let id = placement.item_id();
        if let Err(outcome) = self.removal_check(id, hit) {
            debug!("Remove rejected: {:?}", outcome);
            return outcome;
        }
        if !self.data.remove_placement(placement) {
            return RemoveOutcome::NotFound;
        }
        if self.is_restriction(id) {
            self.rebuild_zones();
        }
        RemoveOutcome::Removed(placement.clone())
    }

    // Eraser

    pub fn activate_eraser(&mut self, target: EraserTarget, extent: IVec3) -> bool {
        if self.mode == GametimeMode::Uninitialized {
            return false;
        }
        self.active_item = None;
        self.cursor = None;
        self.eraser = Some(Eraser { target, extent });
        true
    }

    pub fn deactivate_eraser(&mut self) {
        self.eraser = None;
        self.cursor = None;
    }

    pub fn is_eraser_active(&self) -> bool {
        self.eraser.is_some()
    }

    pub fn move_eraser_to(&mut self, world: Vec3) -> bool {
        let Some(eraser) = self.eraser else {
            return false;
        };
        self.cursor = self.cursor_at(world, eraser.target.cursor_shape());
        self.cursor.is_some()
    }

    /// Quarter turn of the eraser box
    pub fn rotate_eraser(&mut self, clockwise: bool) {
        let Some(eraser) = &mut self.eraser else {
            return;
        };
        eraser.extent = eraser.extent.yxz();
        self.rotate(clockwise);
    }

    /// Remove everything under the eraser
    pub fn erase(&mut self) -> Vec<Placement> {
        let (Some(eraser), Some(cursor)) = (self.eraser, self.cursor) else {
            return Vec::new();
        };
        let (cell, edge) = match cursor {
            Cursor::Cell(cell) => (cell, Edge::horizontal(cell.x, cell.y, cell.z)),
            Cursor::Edge(edge) => (edge.position(), edge),
        };
        let cursor = EraserCursor {
            target: eraser.target,
            cell,
            edge,
            extent: eraser.extent,
        };
        let doomed: Vec<Placement> = self
            .data
            .placements()
            .into_iter()
            .filter(|p| {
                self.item_set
                    .get(p.item_id())
                    .is_some_and(|item| overlap::erased_by(&cursor, item, p))
            })
            .collect();
        let touched_zone = doomed.iter().any(|p| self.is_restriction(p.item_id()));
        self.data.remove_placements(&doomed);
        if touched_zone {
            self.rebuild_zones();
        }
        debug!("Erased {} placements", doomed.len());
        doomed
    }

    // Floor focus

    /// Hide every occupied floor above `floor`
    pub fn focus_floor(&mut self, floor: i32) {
        self.data.set_focus_floor(floor);
    }

    pub fn unfocus_floor(&mut self) {
        self.data.clear_focus();
    }

    pub fn has_focused_floor(&self) -> bool {
        !self.data.hidden_floors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiled_level_core::{PlacedType, RestrictionRule, RestrictionType, StructureType};

    struct Fixture {
        system: GametimeSystem,
        wall: ItemId,
        lamp: ItemId,
        zone: ItemId,
    }

    fn fixture(rule: RestrictionRule, targeted: bool) -> Fixture {
        let mut items = ItemSet::new("Game");
        let wall = items.add_item(Item::new("Wall Block", PlacedType::Block));
        let lamp = items.add_item(
            Item::new("Lamp", PlacedType::Block).with_structure_type(StructureType::Prop),
        );
        let rule = if targeted { rule.targeting([wall]) } else { rule };
        let zone = items.add_item(Item::restriction("Zone", rule));

        let mut level = LevelAsset::default();
        level
            .add_tile(&items, TilePlacement::new(zone, IVec3::new(5, 5, 0), IVec3::ONE))
            .unwrap();
        let mut system = GametimeSystem::new(Vec3::splat(100.0));
        system
            .initialize(items, &[(level, IVec3::ZERO)], false)
            .unwrap();
        Fixture {
            system,
            wall,
            lamp,
            zone,
        }
    }

    fn at_cell(x: i32, y: i32) -> Vec3 {
        Vec3::new(x as f32 * 100.0 + 50.0, y as f32 * 100.0 + 50.0, 10.0)
    }

    #[test]
    fn test_initialize_modes() {
        let f = fixture(RestrictionRule::new(RestrictionType::DisallowBuilding), false);
        assert_eq!(f.system.mode(), GametimeMode::BoundToExistingLevels);
        assert_eq!(f.system.zones().len(), 1);

        let mut system = GametimeSystem::default();
        let mode = system.initialize(ItemSet::new("Empty"), &[], false).unwrap();
        assert_eq!(mode, GametimeMode::Infinite);
    }

    #[test]
    fn test_tile_size_mismatch() {
        let mut items = ItemSet::new("Small");
        items.tile_size = Vec3::splat(50.0);
        let mut system = GametimeSystem::default();
        assert!(matches!(
            system.initialize(items, &[], false),
            Err(GametimeError::TileSizeMismatch { .. })
        ));
        assert_eq!(system.mode(), GametimeMode::Uninitialized);
    }

    #[test]
    fn test_overlapping_levels_rejected() {
        let mut system = GametimeSystem::default();
        let levels = [
            (LevelAsset::default(), IVec3::ZERO),
            (LevelAsset::default(), IVec3::new(5, 0, 0)),
        ];
        assert_eq!(
            system.initialize(ItemSet::new("Items"), &levels, false),
            Err(GametimeError::OverlappingLevels(0, 1))
        );
        assert_eq!(system.mode(), GametimeMode::Uninitialized);

        let levels = [
            (LevelAsset::default(), IVec3::ZERO),
            (LevelAsset::default(), IVec3::new(10, 0, 0)),
        ];
        assert!(system.initialize(ItemSet::new("Items"), &levels, false).is_ok());
    }

    #[test]
    fn test_positions_floor_negative_coordinates() {
        let mut system = GametimeSystem::default();
        system.initialize(ItemSet::new("Items"), &[], true).unwrap();
        assert_eq!(
            system.tile_position(Vec3::new(-10.0, 150.0, 0.0)),
            Some(IVec3::new(-1, 1, 0))
        );
        assert_eq!(
            system.edge_at(Vec3::new(120.0, 160.0, 0.0), EdgeType::Horizontal),
            Some(Edge::horizontal(1, 2, 0))
        );
        assert_eq!(
            system.edge_at(Vec3::new(160.0, 120.0, 0.0), EdgeType::Vertical),
            Some(Edge::vertical(2, 1, 0))
        );
        assert_eq!(
            system.point_position(Vec3::new(-40.0, 40.0, 0.0)),
            Some(IVec3::new(0, 0, 0))
        );
    }

    #[test]
    fn test_bound_mode_rejects_outside() {
        let mut f = fixture(RestrictionRule::new(RestrictionType::DisallowBuilding), false);
        assert!(f.system.activate_item(f.wall));
        assert!(!f.system.move_preview_to(Vec3::new(-50.0, 50.0, 10.0)));
        assert_eq!(f.system.can_build(), Err(BuildRejection::OutOfBounds));
        assert!(f.system.move_preview_to(at_cell(1, 1)));
        assert_eq!(f.system.can_build(), Ok(()));
    }

    #[test]
    fn test_disallow_zone_targets() {
        let mut f = fixture(RestrictionRule::new(RestrictionType::DisallowBuilding), true);
        f.system.activate_item(f.wall);
        f.system.move_preview_to(at_cell(5, 5));
        assert_eq!(f.system.can_build(), Err(BuildRejection::Restricted));

        f.system.activate_item(f.lamp);
        f.system.move_preview_to(at_cell(5, 5));
        assert!(matches!(f.system.build(), BuildOutcome::Built(_)));
    }

    #[test]
    fn test_lock_build_requires_allow_zone() {
        let mut f = fixture(RestrictionRule::new(RestrictionType::AllowBuilding), false);
        f.system.lock_build = true;
        f.system.activate_item(f.wall);
        f.system.move_preview_to(at_cell(1, 1));
        assert_eq!(f.system.can_build(), Err(BuildRejection::Restricted));
        f.system.move_preview_to(at_cell(5, 5));
        assert_eq!(f.system.can_build(), Ok(()));
    }

    #[test]
    fn test_overlap_rules() {
        let mut f = fixture(RestrictionRule::new(RestrictionType::DisallowRemoving), false);
        f.system.activate_item(f.wall);
        f.system.move_preview_to(at_cell(2, 2));
        let BuildOutcome::Built(placed) = f.system.build() else {
            panic!("wall should build");
        };
        assert_eq!(placed.anchor(), IVec3::new(2, 2, 0));
        assert_eq!(f.system.build(), BuildOutcome::Rejected(BuildRejection::Occupied));

        // a prop may sit on a structure but not on another copy of itself
        f.system.activate_item(f.lamp);
        f.system.move_preview_to(at_cell(2, 2));
        assert!(matches!(f.system.build(), BuildOutcome::Built(_)));
        assert_eq!(f.system.build(), BuildOutcome::Rejected(BuildRejection::Occupied));
    }

    #[test]
    fn test_remove_restricted_and_vetoed() {
        let mut f = fixture(RestrictionRule::new(RestrictionType::DisallowRemoving), false);
        f.system.activate_item(f.wall);
        f.system.move_preview_to(at_cell(5, 5));
        let BuildOutcome::Built(inside) = f.system.build() else {
            panic!("wall should build inside a remove-only zone");
        };
        assert_eq!(
            f.system.remove(&inside, at_cell(5, 5)),
            RemoveOutcome::Restricted
        );

        f.system.move_preview_to(at_cell(1, 1));
        let BuildOutcome::Built(outside) = f.system.build() else {
            panic!("wall should build");
        };
        let wall = f.wall;
        f.system.set_remove_filter(move |item| item.id != wall);
        assert_eq!(f.system.remove(&outside, at_cell(1, 1)), RemoveOutcome::Vetoed);
        f.system.set_remove_filter(|_| true);
        assert_eq!(
            f.system.remove(&outside, at_cell(1, 1)),
            RemoveOutcome::Removed(outside.clone())
        );
        assert_eq!(f.system.remove(&outside, at_cell(1, 1)), RemoveOutcome::NotFound);
    }

    #[test]
    fn test_eraser_removes_zone_and_rebuilds() {
        let mut f = fixture(RestrictionRule::new(RestrictionType::DisallowBuilding), false);
        assert!(f.system.activate_eraser(EraserTarget::Any, IVec3::ONE));
        assert!(f.system.move_eraser_to(at_cell(5, 5)));
        let erased = f.system.erase();
        assert_eq!(erased.len(), 1);
        assert_eq!(erased[0].item_id(), f.zone);
        assert!(f.system.zones().is_empty());

        f.system.activate_item(f.wall);
        f.system.move_preview_to(at_cell(5, 5));
        assert_eq!(f.system.can_build(), Ok(()));
    }

    #[test]
    fn test_rotate_preview_turns_edges() {
        let mut items = ItemSet::new("Edges");
        let fence = items.add_item(Item::new("Fence", PlacedType::Wall));
        let mut system = GametimeSystem::default();
        system.initialize(items, &[], true).unwrap();
        system.activate_item(fence);
        assert!(system.move_preview_to(Vec3::new(120.0, 160.0, 0.0)));
        system.rotate_preview(true);
        assert!(system.is_rotated());
        let BuildOutcome::Built(Placement::Edge(edge)) = system.build() else {
            panic!("fence should build");
        };
        assert_eq!(edge.edge.edge_type, EdgeType::Vertical);
    }

    #[test]
    fn test_focus_floor() {
        let mut f = fixture(RestrictionRule::new(RestrictionType::DisallowBuilding), false);
        assert!(!f.system.has_focused_floor());
        f.system.activate_item(f.wall);
        f.system.move_preview_to(Vec3::new(150.0, 150.0, 10.0));
        f.system.build();
        f.system.focus_floor(-1);
        assert!(f.system.has_focused_floor());
        f.system.unfocus_floor();
        assert!(!f.system.has_focused_floor());
    }
}
