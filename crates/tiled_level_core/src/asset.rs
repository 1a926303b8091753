//! Level asset: the placement store
//!
//! Owns the floor stack and every placement on it. Mutating commands return
//! the [`ChangeSet`] they applied, bump [`LevelAsset::version`] and notify
//! subscribers with a [`StoreEvent`].

use crate::change::{ChangeSet, StoreEvent, StoreListener, StoreListeners};
use crate::error::StoreError;
use crate::fill::{area_edges, area_points};
use crate::floor::{by_descending_floor_position, Floor};
use crate::grid::{Edge, IVec2, IVec3, Vec3};
use crate::item::{ItemId, PlacedType};
use crate::item_set::ItemSet;
use crate::placement::{EdgePlacement, Placement, PointPlacement, TilePlacement};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};
use uuid::Uuid;

fn default_tile_size() -> Vec3 {
    Vec3::splat(100.0)
}

fn default_grid_size() -> IVec2 {
    IVec2::new(10, 10)
}

/// Multi-floor placement store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelAsset {
    #[serde(default = "default_tile_size")]
    pub tile_size: Vec3,
    /// Cell counts `(x_num, y_num)`
    #[serde(default = "default_grid_size")]
    pub grid_size: IVec2,
    /// Item set the placements refer to
    #[serde(default)]
    pub item_set_id: Uuid,
    floors: Vec<Floor>,
    #[serde(default)]
    active_floor_position: i32,
    #[serde(default)]
    version: u64,
    #[serde(skip)]
    listeners: StoreListeners,
}

impl Default for LevelAsset {
    fn default() -> Self {
        Self::new(default_tile_size(), default_grid_size())
    }
}

impl PartialEq for LevelAsset {
    fn eq(&self, other: &Self) -> bool {
        self.tile_size == other.tile_size
            && self.grid_size == other.grid_size
            && self.item_set_id == other.item_set_id
            && self.floors == other.floors
            && self.active_floor_position == other.active_floor_position
    }
}

impl LevelAsset {
    /// New level with a single empty floor at position 0
    pub fn new(tile_size: Vec3, grid_size: IVec2) -> Self {
        Self {
            tile_size,
            grid_size,
            item_set_id: Uuid::nil(),
            floors: vec![Floor::new(0)],
            active_floor_position: 0,
            version: 0,
            listeners: StoreListeners::default(),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Mark dependents stale without changing placements
    pub fn bump_version(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    /// Register a listener called after every mutating command
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + Send + Sync + 'static) {
        let boxed: StoreListener = Box::new(listener);
        self.listeners.push(boxed);
    }

    fn commit(&mut self, changes: ChangeSet) -> ChangeSet {
        if changes.is_empty() {
            return changes;
        }
        self.version += 1;
        let event = if changes.touches_floors() {
            StoreEvent::FloorsChanged {
                version: self.version,
                changes: changes.clone(),
            }
        } else {
            StoreEvent::PlacementsChanged {
                version: self.version,
                changes: changes.clone(),
            }
        };
        self.listeners.emit(&event);
        changes
    }

    // ---- floors -------------------------------------------------------

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn floors_by_descending_position(&self) -> Vec<&Floor> {
        let mut floors: Vec<&Floor> = self.floors.iter().collect();
        floors.sort_by(|a, b| by_descending_floor_position(a, b));
        floors
    }

    pub fn floor_exists(&self, position: i32) -> bool {
        self.floors.iter().any(|f| f.position == position)
    }

    pub fn floor(&self, position: i32) -> Option<&Floor> {
        self.floors.iter().find(|f| f.position == position)
    }

    pub fn floor_mut(&mut self, position: i32) -> Option<&mut Floor> {
        self.floors.iter_mut().find(|f| f.position == position)
    }

    pub fn top_floor(&self) -> Option<&Floor> {
        self.floors.iter().max_by_key(|f| f.position)
    }

    pub fn bottom_floor(&self) -> Option<&Floor> {
        self.floors.iter().min_by_key(|f| f.position)
    }

    pub fn active_floor_position(&self) -> i32 {
        self.active_floor_position
    }

    pub fn active_floor(&self) -> Option<&Floor> {
        self.floor(self.active_floor_position)
    }

    pub fn active_floor_mut(&mut self) -> Option<&mut Floor> {
        let position = self.active_floor_position;
        self.floor_mut(position)
    }

    pub fn below_active_floor(&self) -> Option<&Floor> {
        self.floor(self.active_floor_position - 1)
    }

    pub fn set_active_floor(&mut self, position: i32) -> Result<(), StoreError> {
        if !self.floor_exists(position) {
            return Err(StoreError::FloorNotFound(position));
        }
        self.active_floor_position = position;
        Ok(())
    }

    pub fn set_floor_visible(&mut self, position: i32, visible: bool) -> Result<(), StoreError> {
        let floor = self
            .floor_mut(position)
            .ok_or(StoreError::FloorNotFound(position))?;
        floor.visible = visible;
        Ok(())
    }

    fn position_range(&self) -> Option<(i32, i32)> {
        let min = self.bottom_floor()?.position;
        let max = self.top_floor()?.position;
        Some((min, max))
    }

    /// Keep the active floor pointing at an existing floor, nearest first
    fn ensure_active_floor(&mut self) {
        if self.floor_exists(self.active_floor_position) {
            return;
        }
        let active = self.active_floor_position;
        if let Some(nearest) = self
            .floors
            .iter()
            .map(|f| f.position)
            .min_by_key(|p| ((p - active).abs(), *p))
        {
            self.active_floor_position = nearest;
        }
    }

    /// Reposition floors through `new_position`; the active floor follows its floor
    fn shift_floors(
        &mut self,
        changes: &mut ChangeSet,
        mut new_position: impl FnMut(i32) -> Option<i32>,
    ) {
        let tile_size = self.tile_size;
        let active = self.active_floor_position;
        let mut active_target = None;
        for floor in &mut self.floors {
            if let Some(to) = new_position(floor.position) {
                if to != floor.position {
                    if floor.position == active {
                        active_target = Some(to);
                    }
                    changes.floor_moves.push((floor.position, to));
                    floor.update_position(to, tile_size);
                }
            }
        }
        if let Some(to) = active_target {
            self.active_floor_position = to;
        }
    }

    fn insert_floor_uncommitted(&mut self, position: i32, changes: &mut ChangeSet) -> i32 {
        let actual = match self.position_range() {
            Some((_, max)) if position > max => max + 1,
            Some((min, _)) if position < min => min - 1,
            _ => position,
        };
        if actual >= 0 {
            self.shift_floors(changes, |p| (p >= actual).then_some(p + 1));
        } else {
            self.shift_floors(changes, |p| (p <= actual).then_some(p - 1));
        }
        self.floors.push(Floor::new(actual));
        changes.floors_inserted.push(actual);
        actual
    }

    /// Insert an empty floor and return the position it landed on
    ///
    /// Positions beyond the stack clamp to one past the top or bottom. Inserting
    /// at or above 0 pushes floors at or above the position up; below 0 pushes
    /// floors at or below it down.
    pub fn insert_floor(&mut self, position: i32) -> (i32, ChangeSet) {
        let mut changes = ChangeSet::default();
        let actual = self.insert_floor_uncommitted(position, &mut changes);
        debug!("Inserted floor at {}", actual);
        (actual, self.commit(changes))
    }

    /// Insert a copy of `source` directly above it
    pub fn duplicate_floor(&mut self, source: i32) -> Result<(i32, ChangeSet), StoreError> {
        let mut copy = self
            .floor(source)
            .cloned()
            .ok_or(StoreError::FloorNotFound(source))?;
        // Below ground the source itself moves down to make room.
        let target = if source + 1 >= 0 { source + 1 } else { source };
        let mut changes = ChangeSet::default();
        let position = self.insert_floor_uncommitted(target, &mut changes);
        copy.update_position(position, self.tile_size);
        changes.added = copy.placements();
        if let Some(slot) = self.floor_mut(position) {
            *slot = copy;
        }
        debug!("Duplicated floor {} to {}", source, position);
        Ok((position, self.commit(changes)))
    }

    /// Move floor `from` to `to`, clamped to the stack, shifting the floors in between
    pub fn move_floor(&mut self, from: i32, to: i32) -> Result<ChangeSet, StoreError> {
        let (min, max) = self.position_range().ok_or(StoreError::FloorNotFound(from))?;
        if !self.floor_exists(from) {
            return Err(StoreError::FloorNotFound(from));
        }
        let to = to.clamp(min, max);
        let mut changes = ChangeSet::default();
        if to == from {
            return Ok(changes);
        }
        self.shift_floors(&mut changes, |p| {
            if p == from {
                Some(to)
            } else if to > from && p > from && p <= to {
                Some(p - 1)
            } else if to < from && p >= to && p < from {
                Some(p + 1)
            } else {
                None
            }
        });
        Ok(self.commit(changes))
    }

    /// Shift the whole stack one floor up or down
    pub fn move_all_floors(&mut self, up: bool) -> ChangeSet {
        let delta = if up { 1 } else { -1 };
        let mut changes = ChangeSet::default();
        self.shift_floors(&mut changes, |p| Some(p + delta));
        self.commit(changes)
    }

    /// Number of placements `delete_floor(position)` would destroy
    pub fn placements_destroyed_by_floor_delete(&self, position: i32) -> usize {
        self.floor(position).map_or(0, Floor::placement_count)
    }

    /// Delete a floor and close the gap it leaves
    pub fn delete_floor(&mut self, position: i32) -> Result<ChangeSet, StoreError> {
        let index = self
            .floors
            .iter()
            .position(|f| f.position == position)
            .ok_or(StoreError::FloorNotFound(position))?;
        if self.floors.len() == 1 {
            return Err(StoreError::LastFloor);
        }
        let mut removed_floor = self.floors.remove(index);
        let mut changes = ChangeSet::removed(removed_floor.clear());
        changes.floors_removed.push(position);
        if position >= 0 {
            self.shift_floors(&mut changes, |p| (p > position).then_some(p - 1));
        } else {
            self.shift_floors(&mut changes, |p| (p < position).then_some(p + 1));
        }
        self.ensure_active_floor();
        info!(
            "Deleted floor {} ({} placements removed)",
            position,
            changes.removed.len()
        );
        Ok(self.commit(changes))
    }

    /// Remove every placement on one floor
    pub fn empty_floor(&mut self, position: i32) -> Result<ChangeSet, StoreError> {
        let floor = self
            .floor_mut(position)
            .ok_or(StoreError::FloorNotFound(position))?;
        let changes = ChangeSet::removed(floor.clear());
        Ok(self.commit(changes))
    }

    pub fn empty_all_floors(&mut self) -> ChangeSet {
        let mut removed = Vec::new();
        for floor in &mut self.floors {
            removed.extend(floor.clear());
        }
        self.commit(ChangeSet::removed(removed))
    }

    // ---- placements ---------------------------------------------------

    fn placed_type_for(
        &self,
        items: &ItemSet,
        placement: &Placement,
    ) -> Result<PlacedType, StoreError> {
        let item = items
            .get(placement.item_id())
            .ok_or(StoreError::UnknownItem(placement.item_id()))?;
        if item.shape() != placement.shape() {
            return Err(StoreError::ShapeMismatch);
        }
        Ok(item.placed_type)
    }

    fn insert(&mut self, items: &ItemSet, placement: Placement) -> Result<Placement, StoreError> {
        let placed_type = self.placed_type_for(items, &placement)?;
        let position = placement.floor_position();
        let floor = self
            .floor_mut(position)
            .ok_or(StoreError::FloorNotFound(position))?;
        floor.push(placed_type, placement.clone());
        Ok(placement)
    }

    /// Add one placement to the floor it sits on, routed by its item's placed type
    pub fn add_placement(
        &mut self,
        items: &ItemSet,
        placement: Placement,
    ) -> Result<ChangeSet, StoreError> {
        let added = self.insert(items, placement)?;
        Ok(self.commit(ChangeSet::added([added])))
    }

    /// Swap `replaced` for `placement` as one command
    ///
    /// The placement is routed before anything is removed, so a failed
    /// replacement leaves the store untouched.
    pub fn replace_placements(
        &mut self,
        items: &ItemSet,
        replaced: &[Placement],
        placement: Placement,
    ) -> Result<ChangeSet, StoreError> {
        let placed_type = self.placed_type_for(items, &placement)?;
        let position = placement.floor_position();
        if self.floor(position).is_none() {
            return Err(StoreError::FloorNotFound(position));
        }
        let mut removed = Vec::new();
        for old in replaced {
            if self
                .floor_mut(old.floor_position())
                .is_some_and(|floor| floor.remove(old))
            {
                removed.push(old.clone());
            }
        }
        let floor = self
            .floor_mut(position)
            .ok_or(StoreError::FloorNotFound(position))?;
        floor.push(placed_type, placement.clone());
        let mut changes = ChangeSet::removed(removed);
        changes.merge(ChangeSet::added([placement]));
        Ok(self.commit(changes))
    }

    pub fn add_tile(&mut self, items: &ItemSet, tile: TilePlacement) -> Result<ChangeSet, StoreError> {
        self.add_placement(items, tile.into())
    }

    pub fn add_edge(&mut self, items: &ItemSet, edge: EdgePlacement) -> Result<ChangeSet, StoreError> {
        self.add_placement(items, edge.into())
    }

    pub fn add_point(
        &mut self,
        items: &ItemSet,
        point: PointPlacement,
    ) -> Result<ChangeSet, StoreError> {
        self.add_placement(items, point.into())
    }

    /// Add a batch as one command. Placements that cannot be routed are skipped.
    pub fn add_placements(
        &mut self,
        items: &ItemSet,
        placements: impl IntoIterator<Item = Placement>,
    ) -> ChangeSet {
        let mut added = Vec::new();
        for placement in placements {
            match self.insert(items, placement) {
                Ok(p) => added.push(p),
                Err(e) => debug!("Skipped placement: {}", e),
            }
        }
        self.commit(ChangeSet::added(added))
    }

    /// Remove the listed placements wherever they are stored
    pub fn remove_placements(&mut self, placements: &[Placement]) -> ChangeSet {
        let mut removed = Vec::new();
        for placement in placements {
            let position = placement.floor_position();
            let hit = match self.floor_mut(position) {
                Some(floor) => floor.remove(placement),
                None => false,
            };
            if hit {
                removed.push(placement.clone());
            }
        }
        self.commit(ChangeSet::removed(removed))
    }

    /// Remove every placement of `item` on all floors
    pub fn clear_item(&mut self, item: ItemId) -> ChangeSet {
        let mut removed = Vec::new();
        for floor in &mut self.floors {
            removed.extend(floor.remove_item(item));
        }
        self.commit(ChangeSet::removed(removed))
    }

    pub fn clear_item_in_active_floor(&mut self, item: ItemId) -> Result<ChangeSet, StoreError> {
        let floor = self.active_floor_mut().ok_or(StoreError::NoActiveFloor)?;
        let removed = floor.remove_item(item);
        Ok(self.commit(ChangeSet::removed(removed)))
    }

    /// Drop placements whose item is not in `items`
    pub fn clear_invalid_placements(&mut self, items: &ItemSet) -> ChangeSet {
        let mut removed = Vec::new();
        for floor in &mut self.floors {
            removed.extend(floor.retain(|p| items.contains(p.item_id())));
        }
        if !removed.is_empty() {
            info!("Removed {} placements with unknown items", removed.len());
        }
        self.commit(ChangeSet::removed(removed))
    }

    /// Clear `cells`: tiles touching any cell, edges on shared region edges,
    /// points on inner region corners
    pub fn empty_region(&mut self, cells: &[IVec3]) -> ChangeSet {
        if cells.is_empty() {
            return ChangeSet::default();
        }
        let region: HashSet<IVec3> = cells.iter().copied().collect();
        let inner_edges: HashSet<Edge> = area_edges(&region, false).into_iter().collect();
        let inner_points: HashSet<IVec3> = area_points(&region, false).into_iter().collect();

        let mut doomed = Vec::new();
        for floor in &self.floors {
            for tile in floor.all_tiles() {
                if tile.occupied_cells().iter().any(|c| region.contains(c)) {
                    doomed.push(Placement::Tile(tile.clone()));
                }
            }
            for edge in floor.all_edges() {
                if edge.occupied_edges().iter().any(|e| inner_edges.contains(e)) {
                    doomed.push(Placement::Edge(edge.clone()));
                }
            }
            for point in floor.all_points() {
                if inner_points.contains(&point.grid_position) {
                    doomed.push(Placement::Point(point.clone()));
                }
            }
        }
        self.remove_placements(&doomed)
    }

    /// Remove edge placements covering any of `edges`
    pub fn empty_edge_region(&mut self, edges: &[Edge]) -> ChangeSet {
        if edges.is_empty() {
            return ChangeSet::default();
        }
        let region: HashSet<Edge> = edges.iter().copied().collect();
        let doomed: Vec<Placement> = self
            .floors
            .iter()
            .flat_map(|f| f.all_edges())
            .filter(|p| p.occupied_edges().iter().any(|e| region.contains(e)))
            .cloned()
            .map(Placement::Edge)
            .collect();
        self.remove_placements(&doomed)
    }

    // ---- queries ------------------------------------------------------

    pub fn all_tiles(&self) -> impl Iterator<Item = &TilePlacement> {
        self.floors.iter().flat_map(|f| f.all_tiles())
    }

    pub fn all_edges(&self) -> impl Iterator<Item = &EdgePlacement> {
        self.floors.iter().flat_map(|f| f.all_edges())
    }

    pub fn all_points(&self) -> impl Iterator<Item = &PointPlacement> {
        self.floors.iter().flat_map(|f| f.all_points())
    }

    /// Every placement of one placed type across floors
    pub fn placements_of_type(&self, placed_type: PlacedType) -> Vec<Placement> {
        self.floors
            .iter()
            .flat_map(|f| f.placements_of(placed_type))
            .collect()
    }

    pub fn all_placements(&self) -> Vec<Placement> {
        self.floors.iter().flat_map(|f| f.placements()).collect()
    }

    pub fn placement_count(&self) -> usize {
        self.floors.iter().map(Floor::placement_count).sum()
    }

    pub fn used_items(&self) -> BTreeSet<ItemId> {
        self.all_tiles()
            .map(|p| p.item_id)
            .chain(self.all_edges().map(|p| p.item_id))
            .chain(self.all_points().map(|p| p.item_id))
            .collect()
    }

    // ---- tile size ----------------------------------------------------

    /// Tile size can change freely only while the level is empty
    pub fn can_edit_tile_size(&self) -> bool {
        self.placement_count() == 0
    }

    pub fn placements_destroyed_by_tile_size_change(&self) -> usize {
        self.placement_count()
    }

    /// Change the tile size, clearing every placement
    pub fn set_tile_size(&mut self, tile_size: Vec3) -> ChangeSet {
        let mut removed = Vec::new();
        for floor in &mut self.floors {
            removed.extend(floor.clear());
        }
        if !removed.is_empty() {
            info!(
                "Tile size reset to {:?}, {} placements removed",
                tile_size,
                removed.len()
            );
        }
        self.tile_size = tile_size;
        let changes = self.commit(ChangeSet::removed(removed));
        if changes.is_empty() {
            self.version += 1;
        }
        changes
    }
}
