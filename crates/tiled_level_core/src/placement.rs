//! Placement records: tile (3D), edge (2D) and point (1D) instances of catalog items

use crate::grid::{Edge, IVec3, PlacementTransform, Vec3};
use crate::item::{ItemId, PlacedShape};
use serde::{Deserialize, Serialize};

/// A box-shaped placement occupying `[grid_position, grid_position + extent)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilePlacement {
    pub item_id: ItemId,
    pub grid_position: IVec3,
    pub extent: IVec3,
    #[serde(default)]
    pub transform: PlacementTransform,
    #[serde(default)]
    pub is_mirrored: bool,
}

impl TilePlacement {
    pub fn new(item_id: ItemId, grid_position: IVec3, extent: IVec3) -> Self {
        Self {
            item_id,
            grid_position,
            extent,
            transform: PlacementTransform::default(),
            is_mirrored: false,
        }
    }

    /// Every cell covered by this tile
    pub fn occupied_cells(&self) -> Vec<IVec3> {
        let mut cells = Vec::new();
        for x in 0..self.extent.x {
            for y in 0..self.extent.y {
                for z in 0..self.extent.z {
                    cells.push(self.grid_position + IVec3::new(x, y, z));
                }
            }
        }
        cells
    }

    /// Move by `delta` cells, keeping the transform in sync
    pub fn offset(&mut self, delta: IVec3, tile_size: Vec3) {
        self.grid_position += delta;
        self.transform.translate(delta.as_vec3() * tile_size);
    }
}

impl PartialEq for TilePlacement {
    fn eq(&self, other: &Self) -> bool {
        self.grid_position == other.grid_position
            && self.extent == other.extent
            && self.item_id == other.item_id
    }
}

impl Eq for TilePlacement {}

/// An edge-run placement; `extent.x` is the run length, `extent.z` the height in floors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgePlacement {
    pub item_id: ItemId,
    pub edge: Edge,
    pub extent: IVec3,
    #[serde(default)]
    pub transform: PlacementTransform,
    #[serde(default)]
    pub is_mirrored: bool,
}

impl EdgePlacement {
    pub fn new(item_id: ItemId, edge: Edge, extent: IVec3) -> Self {
        Self {
            item_id,
            edge,
            extent,
            transform: PlacementTransform::default(),
            is_mirrored: false,
        }
    }

    /// Unit edges covered by this run, one per length step and floor
    pub fn occupied_edges(&self) -> Vec<Edge> {
        occupied_edges(self.edge, self.extent)
    }

    pub fn offset(&mut self, delta: IVec3, tile_size: Vec3) {
        self.edge = self.edge.offset(delta);
        self.transform.translate(delta.as_vec3() * tile_size);
    }

    /// Flip between horizontal and vertical, keeping the anchor position
    pub fn toggle_edge_type(&mut self) {
        self.edge.toggle_type();
    }
}

/// Decompose an edge run into unit edges
pub fn occupied_edges(edge: Edge, extent: IVec3) -> Vec<Edge> {
    let mut edges = Vec::new();
    for step in 0..extent.x {
        for z in 0..extent.z {
            let e = edge.advanced(step);
            edges.push(e.with_z(edge.z + z));
        }
    }
    edges
}

impl PartialEq for EdgePlacement {
    fn eq(&self, other: &Self) -> bool {
        self.edge == other.edge && self.item_id == other.item_id
    }
}

impl Eq for EdgePlacement {}

/// A placement on a cell corner spanning `z_extent` floors upward
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointPlacement {
    pub item_id: ItemId,
    pub grid_position: IVec3,
    #[serde(default = "default_z_extent")]
    pub z_extent: i32,
    #[serde(default)]
    pub transform: PlacementTransform,
    #[serde(default)]
    pub is_mirrored: bool,
}

fn default_z_extent() -> i32 {
    1
}

impl PointPlacement {
    pub fn new(item_id: ItemId, grid_position: IVec3, z_extent: i32) -> Self {
        Self {
            item_id,
            grid_position,
            z_extent,
            transform: PlacementTransform::default(),
            is_mirrored: false,
        }
    }

    pub fn offset(&mut self, delta: IVec3, tile_size: Vec3) {
        self.grid_position += delta;
        self.transform.translate(delta.as_vec3() * tile_size);
    }
}

impl PartialEq for PointPlacement {
    fn eq(&self, other: &Self) -> bool {
        self.grid_position == other.grid_position && self.item_id == other.item_id
    }
}

impl Eq for PointPlacement {}

/// Any placement, tagged by shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Tile(TilePlacement),
    Edge(EdgePlacement),
    Point(PointPlacement),
}

impl Placement {
    pub fn item_id(&self) -> ItemId {
        match self {
            Placement::Tile(p) => p.item_id,
            Placement::Edge(p) => p.item_id,
            Placement::Point(p) => p.item_id,
        }
    }

    pub fn shape(&self) -> PlacedShape {
        match self {
            Placement::Tile(_) => PlacedShape::Tile,
            Placement::Edge(_) => PlacedShape::Edge,
            Placement::Point(_) => PlacedShape::Point,
        }
    }

    /// Floor position the placement is stored on
    pub fn floor_position(&self) -> i32 {
        match self {
            Placement::Tile(p) => p.grid_position.z,
            Placement::Edge(p) => p.edge.z,
            Placement::Point(p) => p.grid_position.z,
        }
    }

    /// Anchor cell or corner of the placement
    pub fn anchor(&self) -> IVec3 {
        match self {
            Placement::Tile(p) => p.grid_position,
            Placement::Edge(p) => p.edge.position(),
            Placement::Point(p) => p.grid_position,
        }
    }

    pub fn transform(&self) -> &PlacementTransform {
        match self {
            Placement::Tile(p) => &p.transform,
            Placement::Edge(p) => &p.transform,
            Placement::Point(p) => &p.transform,
        }
    }

    pub fn is_mirrored(&self) -> bool {
        match self {
            Placement::Tile(p) => p.is_mirrored,
            Placement::Edge(p) => p.is_mirrored,
            Placement::Point(p) => p.is_mirrored,
        }
    }

    pub fn offset(&mut self, delta: IVec3, tile_size: Vec3) {
        match self {
            Placement::Tile(p) => p.offset(delta, tile_size),
            Placement::Edge(p) => p.offset(delta, tile_size),
            Placement::Point(p) => p.offset(delta, tile_size),
        }
    }
}

impl From<TilePlacement> for Placement {
    fn from(p: TilePlacement) -> Self {
        Placement::Tile(p)
    }
}

impl From<EdgePlacement> for Placement {
    fn from(p: EdgePlacement) -> Self {
        Placement::Edge(p)
    }
}

impl From<PointPlacement> for Placement {
    fn from(p: PointPlacement) -> Self {
        Placement::Point(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_occupied_cells() {
        let tile = TilePlacement::new(ItemId::new(), IVec3::new(3, 3, 0), IVec3::new(2, 2, 1));
        let cells = tile.occupied_cells();
        assert_eq!(cells.len(), 4);
        assert!(cells.contains(&IVec3::new(4, 4, 0)));
        assert!(!cells.contains(&IVec3::new(5, 3, 0)));
    }

    #[test]
    fn test_tile_equality_ignores_transform() {
        let id = ItemId::new();
        let a = TilePlacement::new(id, IVec3::new(1, 2, 0), IVec3::ONE);
        let mut b = a.clone();
        b.transform.translation = Vec3::splat(42.0);
        assert_eq!(a, b);
        b.extent = IVec3::new(2, 1, 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_edge_occupied_edges() {
        let wall = EdgePlacement::new(ItemId::new(), Edge::vertical(2, 1, 0), IVec3::new(3, 1, 2));
        let edges = wall.occupied_edges();
        assert_eq!(edges.len(), 6);
        assert!(edges.contains(&Edge::vertical(2, 3, 1)));
        assert!(!edges.contains(&Edge::vertical(3, 1, 0)));
    }

    #[test]
    fn test_offset_moves_transform() {
        let mut p = Placement::Point(PointPlacement::new(ItemId::new(), IVec3::ZERO, 1));
        p.offset(IVec3::new(1, 2, 1), Vec3::splat(100.0));
        assert_eq!(p.anchor(), IVec3::new(1, 2, 1));
        assert_eq!(p.transform().translation, Vec3::new(100.0, 200.0, 100.0));
    }
}
