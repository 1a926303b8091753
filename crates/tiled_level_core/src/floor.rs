//! A single floor of the level with its six placement lists

use crate::grid::{IVec3, Vec3};
use crate::item::{ItemId, PlacedType};
use crate::placement::{EdgePlacement, Placement, PointPlacement, TilePlacement};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Horizontal layer of the grid stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub position: i32,
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
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
}

fn default_visible() -> bool {
    true
}

/// `B1`, `B2`... below ground, `1F`, `2F`... from position 0 upward
pub fn floor_display_name(position: i32) -> String {
    if position < 0 {
        format!("B{}", position.unsigned_abs())
    } else {
        format!("{}F", position + 1)
    }
}

/// Topmost floor first
pub fn by_descending_floor_position(a: &Floor, b: &Floor) -> Ordering {
    b.position.cmp(&a.position)
}

impl Floor {
    pub fn new(position: i32) -> Self {
        Self {
            position,
            name: floor_display_name(position),
            visible: true,
            blocks: Vec::new(),
            floor_tiles: Vec::new(),
            walls: Vec::new(),
            edges: Vec::new(),
            pillars: Vec::new(),
            points: Vec::new(),
        }
    }

    /// Move the floor to `new_position`, shifting every placement by the same delta
    pub fn update_position(&mut self, new_position: i32, tile_size: Vec3) {
        let delta = IVec3::new(0, 0, new_position - self.position);
        if delta.z != 0 {
            for p in self.blocks.iter_mut().chain(self.floor_tiles.iter_mut()) {
                p.offset(delta, tile_size);
            }
            for p in self.walls.iter_mut().chain(self.edges.iter_mut()) {
                p.offset(delta, tile_size);
            }
            for p in self.pillars.iter_mut().chain(self.points.iter_mut()) {
                p.offset(delta, tile_size);
            }
        }
        self.position = new_position;
        self.name = floor_display_name(new_position);
    }

    pub fn tiles(&self, placed_type: PlacedType) -> Option<&Vec<TilePlacement>> {
        match placed_type {
            PlacedType::Block => Some(&self.blocks),
            PlacedType::Floor => Some(&self.floor_tiles),
            _ => None,
        }
    }

    pub fn edge_list(&self, placed_type: PlacedType) -> Option<&Vec<EdgePlacement>> {
        match placed_type {
            PlacedType::Wall => Some(&self.walls),
            PlacedType::Edge => Some(&self.edges),
            _ => None,
        }
    }

    pub fn point_list(&self, placed_type: PlacedType) -> Option<&Vec<PointPlacement>> {
        match placed_type {
            PlacedType::Pillar => Some(&self.pillars),
            PlacedType::Point => Some(&self.points),
            _ => None,
        }
    }

    pub fn all_tiles(&self) -> impl Iterator<Item = &TilePlacement> {
        self.blocks.iter().chain(self.floor_tiles.iter())
    }

    pub fn all_edges(&self) -> impl Iterator<Item = &EdgePlacement> {
        self.walls.iter().chain(self.edges.iter())
    }

    pub fn all_points(&self) -> impl Iterator<Item = &PointPlacement> {
        self.pillars.iter().chain(self.points.iter())
    }

    /// Every placement on this floor, cloned into the tagged form
    pub fn placements(&self) -> Vec<Placement> {
        let mut out: Vec<Placement> = Vec::with_capacity(self.placement_count());
        out.extend(self.all_tiles().cloned().map(Placement::Tile));
        out.extend(self.all_edges().cloned().map(Placement::Edge));
        out.extend(self.all_points().cloned().map(Placement::Point));
        out
    }

    /// The list of `placed_type`, cloned into the tagged form
    pub fn placements_of(&self, placed_type: PlacedType) -> Vec<Placement> {
        let tiles = self.tiles(placed_type).into_iter().flatten();
        let edges = self.edge_list(placed_type).into_iter().flatten();
        let points = self.point_list(placed_type).into_iter().flatten();
        tiles
            .cloned()
            .map(Placement::Tile)
            .chain(edges.cloned().map(Placement::Edge))
            .chain(points.cloned().map(Placement::Point))
            .collect()
    }

    /// Append to the list of `placed_type`. Returns false when the shape does not match.
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

    /// Remove the first placement equal to `placement` from whichever list holds it
    pub fn remove(&mut self, placement: &Placement) -> bool {
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

    /// Keep only placements for which `keep` returns true; returns the removed ones
    pub fn retain(&mut self, mut keep: impl FnMut(&Placement) -> bool) -> Vec<Placement> {
        let mut removed = Vec::new();
        let current = self.placements();
        for p in current {
            if !keep(&p) && self.remove(&p) {
                removed.push(p);
            }
        }
        removed
    }

    /// Drop every placement of `item`
    pub fn remove_item(&mut self, item: ItemId) -> Vec<Placement> {
        self.retain(|p| p.item_id() != item)
    }

    pub fn contains(&self, placement: &Placement) -> bool {
        match placement {
            Placement::Tile(t) => self.all_tiles().any(|p| p == t),
            Placement::Edge(e) => self.all_edges().any(|p| p == e),
            Placement::Point(pt) => self.all_points().any(|p| p == pt),
        }
    }

    pub fn placement_count(&self) -> usize {
        self.blocks.len()
            + self.floor_tiles.len()
            + self.walls.len()
            + self.edges.len()
            + self.pillars.len()
            + self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placement_count() == 0
    }

    /// Remove everything, returning what was removed
    pub fn clear(&mut self) -> Vec<Placement> {
        let removed = self.placements();
        self.blocks.clear();
        self.floor_tiles.clear();
        self.walls.clear();
        self.edges.clear();
        self.pillars.clear();
        self.points.clear();
        removed
    }

    pub fn uses_item(&self, item: ItemId) -> bool {
        self.all_tiles().any(|p| p.item_id == item)
            || self.all_edges().any(|p| p.item_id == item)
            || self.all_points().any(|p| p.item_id == item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Edge;

    #[test]
    fn test_display_names() {
        assert_eq!(floor_display_name(0), "1F");
        assert_eq!(floor_display_name(2), "3F");
        assert_eq!(floor_display_name(-1), "B1");
        assert_eq!(floor_display_name(-3), "B3");
    }

    #[test]
    fn test_descending_order() {
        let mut floors = vec![Floor::new(0), Floor::new(2), Floor::new(-1)];
        floors.sort_by(by_descending_floor_position);
        let positions: Vec<_> = floors.iter().map(|f| f.position).collect();
        assert_eq!(positions, vec![2, 0, -1]);
    }

    #[test]
    fn test_update_position_shifts_placements() {
        let mut floor = Floor::new(1);
        let item = ItemId::new();
        let mut tile = TilePlacement::new(item, IVec3::new(2, 2, 1), IVec3::ONE);
        tile.transform.translation = Vec3::new(250.0, 250.0, 100.0);
        floor.push(PlacedType::Block, tile.into());
        floor.push(
            PlacedType::Wall,
            EdgePlacement::new(item, Edge::horizontal(0, 0, 1), IVec3::ONE).into(),
        );

        floor.update_position(3, Vec3::splat(100.0));
        assert_eq!(floor.name, "4F");
        assert_eq!(floor.blocks[0].grid_position.z, 3);
        assert_eq!(floor.blocks[0].transform.translation.z, 300.0);
        assert_eq!(floor.walls[0].edge.z, 3);

        floor.update_position(1, Vec3::splat(100.0));
        assert_eq!(floor.blocks[0].grid_position, IVec3::new(2, 2, 1));
        assert_eq!(floor.blocks[0].transform.translation.z, 100.0);
    }

    #[test]
    fn test_push_rejects_shape_mismatch() {
        let mut floor = Floor::new(0);
        let tile = TilePlacement::new(ItemId::new(), IVec3::ZERO, IVec3::ONE);
        assert!(!floor.push(PlacedType::Wall, tile.clone().into()));
        assert!(floor.push(PlacedType::Floor, tile.into()));
        assert_eq!(floor.floor_tiles.len(), 1);
    }

    #[test]
    fn test_remove_item_and_clear() {
        let mut floor = Floor::new(0);
        let a = ItemId::new();
        let b = ItemId::new();
        floor.push(PlacedType::Block, TilePlacement::new(a, IVec3::ZERO, IVec3::ONE).into());
        floor.push(PlacedType::Point, PointPlacement::new(a, IVec3::ZERO, 1).into());
        floor.push(PlacedType::Block, TilePlacement::new(b, IVec3::ONE, IVec3::ONE).into());
        assert_eq!(floor.remove_item(a).len(), 2);
        assert!(!floor.uses_item(a));
        assert!(floor.uses_item(b));
        assert_eq!(floor.clear().len(), 1);
        assert!(floor.is_empty());
    }
}
