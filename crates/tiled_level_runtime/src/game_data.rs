//! Flattened placement snapshot used at runtime
//!
//! Runtime code has no use for floors: every placement lives in one of six
//! flat lists, and the boxes of the source levels bound where the player may
//! build.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::AddAssign;
use tiled_level_core::{
    Aabb, EdgePlacement, IVec3, ItemId, LevelAsset, PlacedType, Placement, PointPlacement,
    TilePlacement, Vec3,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    /// Floors currently hidden by [`GameData::set_focus_floor`]
    #[serde(default)]
    pub hidden_floors: BTreeSet<i32>,
    #[serde(default)]
    pub blocks: Vec<TilePlacement>,
    #[serde(default)]
    pub floor_tiles: Vec<TilePlacement>,
    #[serde(default)]
    pub walls: Vec<EdgePlacement>,
    #[serde(default)]
    pub edges: Vec<EdgePlacement>,
    #[serde(default)]
    pub pillars: Vec<PointPlacement>,
    #[serde(default)]
    pub points: Vec<PointPlacement>,
    /// World-space boxes of the levels this data came from
    #[serde(default)]
    pub boundaries: Vec<Aabb>,
}

impl GameData {
    /// Flatten `level`, shifting every placement by `offset` cells
    pub fn from_level(level: &LevelAsset, offset: IVec3) -> Self {
        let tile_size = level.tile_size;
        let mut data = GameData::default();
        for floor in level.floors() {
            for &placed_type in PlacedType::all() {
                for mut placement in floor.placements_of(placed_type) {
                    placement.offset(offset, tile_size);
                    data.push(placed_type, placement);
                }
            }
        }
        if let Some(boundary) = level_boundary(level, offset) {
            data.boundaries.push(boundary);
        }
        data
    }

    /// Serialize a snapshot, e.g. for a save game
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &TilePlacement> {
        self.blocks.iter().chain(self.floor_tiles.iter())
    }

    pub fn edge_placements(&self) -> impl Iterator<Item = &EdgePlacement> {
        self.walls.iter().chain(self.edges.iter())
    }

    pub fn point_placements(&self) -> impl Iterator<Item = &PointPlacement> {
        self.pillars.iter().chain(self.points.iter())
    }

    pub fn tiles_of(&self, placed_type: PlacedType) -> &[TilePlacement] {
        match placed_type {
            PlacedType::Floor => &self.floor_tiles,
            _ => &self.blocks,
        }
    }

    pub fn edges_of(&self, placed_type: PlacedType) -> &[EdgePlacement] {
        match placed_type {
            PlacedType::Edge => &self.edges,
            _ => &self.walls,
        }
    }

    pub fn points_of(&self, placed_type: PlacedType) -> &[PointPlacement] {
        match placed_type {
            PlacedType::Point => &self.points,
            _ => &self.pillars,
        }
    }

    /// Every placement, cloned into the tagged form
    pub fn placements(&self) -> Vec<Placement> {
        let mut out = Vec::with_capacity(self.placement_count());
        out.extend(self.tiles().cloned().map(Placement::Tile));
        out.extend(self.edge_placements().cloned().map(Placement::Edge));
        out.extend(self.point_placements().cloned().map(Placement::Point));
        out
    }

    pub fn placement_count(&self) -> usize {
        self.blocks.len()
            + self.floor_tiles.len()
            + self.walls.len()
            + self.edges.len()
            + self.pillars.len()
            + self.points.len()
    }

    /// Append to the list for `placed_type`; false when the shape does not match
    pub fn push(&mut self, placed_type: PlacedType, placement: Placement) -> bool {
        match (placed_type, placement) {
            (PlacedType::Block, Placement::Tile(p)) => self.blocks.push(p),
            (PlacedType::Floor, Placement::Tile(p)) => self.floor_tiles.push(p),
            (PlacedType::Wall, Placement::Edge(p)) => self.walls.push(p),
            (PlacedType::Edge, Placement::Edge(p)) => self.edges.push(p),
            (PlacedType::Pillar, Placement::Point(p)) => self.pillars.push(p),
            (PlacedType::Point, Placement::Point(p)) => self.points.push(p),
            _ => return false,
        }
        true
    }

    /// Drop every placement but keep boundaries and focus
    pub fn empty(&mut self) {
        self.blocks.clear();
        self.floor_tiles.clear();
        self.walls.clear();
        self.edges.clear();
        self.pillars.clear();
        self.points.clear();
    }

    /// Remove the first placement equal to `placement`
    pub fn remove_placement(&mut self, placement: &Placement) -> bool {
        fn take<T: PartialEq>(list: &mut Vec<T>, target: &T) -> bool {
            match list.iter().position(|p| p == target) {
                Some(i) => {
                    list.remove(i);
                    true
                }
                None => false,
            }
        }
        match placement {
            Placement::Tile(t) => take(&mut self.blocks, t) || take(&mut self.floor_tiles, t),
            Placement::Edge(e) => take(&mut self.walls, e) || take(&mut self.edges, e),
            Placement::Point(p) => take(&mut self.pillars, p) || take(&mut self.points, p),
        }
    }

    /// Remove the placement of `item` whose transform sits at `translation`
    pub fn remove_by_transform(&mut self, item: ItemId, translation: Vec3) -> Option<Placement> {
        let found = self.placements().into_iter().find(|p| {
            p.item_id() == item && p.transform().translation.abs_diff_eq(translation, 1e-3)
        })?;
        self.remove_placement(&found).then_some(found)
    }

    pub fn remove_placements(&mut self, placements: &[Placement]) -> usize {
        placements
            .iter()
            .filter(|p| self.remove_placement(p))
            .count()
    }

    /// Append another snapshot, boundaries included
    pub fn merge(&mut self, other: GameData) {
        self.blocks.extend(other.blocks);
        self.floor_tiles.extend(other.floor_tiles);
        self.walls.extend(other.walls);
        self.edges.extend(other.edges);
        self.pillars.extend(other.pillars);
        self.points.extend(other.points);
        self.boundaries.extend(other.boundaries);
    }

    /// Floors holding at least one placement
    pub fn occupied_floors(&self) -> BTreeSet<i32> {
        self.placements().iter().map(Placement::floor_position).collect()
    }

    /// Hide every occupied floor above `floor`
    pub fn set_focus_floor(&mut self, floor: i32) {
        self.hidden_floors = self
            .occupied_floors()
            .into_iter()
            .filter(|&f| f > floor)
            .collect();
    }

    pub fn clear_focus(&mut self) {
        self.hidden_floors.clear();
    }

    pub fn is_floor_hidden(&self, floor: i32) -> bool {
        self.hidden_floors.contains(&floor)
    }
}

impl AddAssign for GameData {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(rhs);
    }
}

/// World box covering the grid of `level` over all its floors
fn level_boundary(level: &LevelAsset, offset: IVec3) -> Option<Aabb> {
    let bottom = level.bottom_floor()?.position;
    let floors = level.floors().len() as f32;
    let ts = level.tile_size;
    let min = (offset + IVec3::new(0, 0, bottom)).as_vec3() * ts;
    let size = Vec3::new(level.grid_size.x as f32, level.grid_size.y as f32, floors) * ts;
    Some(Aabb::new(min, min + size))
}
