//! Overlap predicates between placements
//!
//! All predicates are pure. Zero or negative extents never overlap anything.

use crate::grid::{Edge, EdgeType, IVec2, IVec3};
use crate::item::{EraserTarget, Item, PlacedShape};
use crate::placement::{occupied_edges, EdgePlacement, Placement, PointPlacement, TilePlacement};

fn ranges_intersect(a_start: i32, a_len: i32, b_start: i32, b_len: i32) -> bool {
    a_start < b_start + b_len && b_start < a_start + a_len
}

/// Integer boxes `[pos, pos + extent)` intersect on all three axes
pub fn tile_overlaps(a_pos: IVec3, a_extent: IVec3, b_pos: IVec3, b_extent: IVec3) -> bool {
    if a_extent.min_element() <= 0 || b_extent.min_element() <= 0 {
        return false;
    }
    ranges_intersect(a_pos.x, a_extent.x, b_pos.x, b_extent.x)
        && ranges_intersect(a_pos.y, a_extent.y, b_pos.y, b_extent.y)
        && ranges_intersect(a_pos.z, a_extent.z, b_pos.z, b_extent.z)
}

pub fn tiles_overlap(a: &TilePlacement, b: &TilePlacement) -> bool {
    tile_overlaps(a.grid_position, a.extent, b.grid_position, b.extent)
}

/// Edge runs overlap when they share cells of the same grid line, or when
/// perpendicular runs cross strictly inside both spans.
pub fn edge_overlaps(a: Edge, a_extent: IVec3, b: Edge, b_extent: IVec3) -> bool {
    let (a_len, a_height) = (a_extent.x, a_extent.z);
    let (b_len, b_height) = (b_extent.x, b_extent.z);
    if a_len <= 0 || a_height <= 0 || b_len <= 0 || b_height <= 0 {
        return false;
    }
    if !ranges_intersect(a.z, a_height, b.z, b_height) {
        return false;
    }
    match (a.edge_type, b.edge_type) {
        (EdgeType::Horizontal, EdgeType::Horizontal) => {
            a.y == b.y && ranges_intersect(a.x, a_len, b.x, b_len)
        }
        (EdgeType::Vertical, EdgeType::Vertical) => {
            a.x == b.x && ranges_intersect(a.y, a_len, b.y, b_len)
        }
        (EdgeType::Horizontal, EdgeType::Vertical) => crosses(a, a_len, b, b_len),
        (EdgeType::Vertical, EdgeType::Horizontal) => crosses(b, b_len, a, a_len),
    }
}

fn crosses(horizontal: Edge, h_len: i32, vertical: Edge, v_len: i32) -> bool {
    horizontal.x < vertical.x
        && vertical.x < horizontal.x + h_len
        && vertical.y < horizontal.y
        && horizontal.y < vertical.y + v_len
}

pub fn edges_overlap(a: &EdgePlacement, b: &EdgePlacement) -> bool {
    edge_overlaps(a.edge, a.extent, b.edge, b.extent)
}

/// Every unit edge of the run lies on the grid lines of the tile box, within its floors
pub fn edge_inside_tile(edge: Edge, edge_extent: IVec3, tile_pos: IVec3, tile_extent: IVec3) -> bool {
    if edge_extent.x <= 0 || edge_extent.z <= 0 || tile_extent.min_element() <= 0 {
        return false;
    }
    let inside_z = |z: i32| z >= tile_pos.z && z < tile_pos.z + tile_extent.z;
    occupied_edges(edge, edge_extent).into_iter().all(|e| {
        inside_z(e.z)
            && match e.edge_type {
                EdgeType::Horizontal => {
                    e.x >= tile_pos.x
                        && e.x < tile_pos.x + tile_extent.x
                        && e.y >= tile_pos.y
                        && e.y <= tile_pos.y + tile_extent.y
                }
                EdgeType::Vertical => {
                    e.y >= tile_pos.y
                        && e.y < tile_pos.y + tile_extent.y
                        && e.x >= tile_pos.x
                        && e.x <= tile_pos.x + tile_extent.x
                }
            }
    })
}

/// Same corner and intersecting `[z, z + z_extent)` ranges
pub fn point_overlaps(a: IVec3, a_z_extent: i32, b: IVec3, b_z_extent: i32) -> bool {
    if a_z_extent <= 0 || b_z_extent <= 0 {
        return false;
    }
    a.x == b.x && a.y == b.y && ranges_intersect(a.z, a_z_extent, b.z, b_z_extent)
}

pub fn points_overlap(a: &PointPlacement, b: &PointPlacement) -> bool {
    point_overlaps(a.grid_position, a.z_extent, b.grid_position, b.z_extent)
}

/// The corner column lies on the tile box's corners, within its floors
pub fn point_inside_tile(point: IVec3, z_extent: i32, tile_pos: IVec3, tile_extent: IVec3) -> bool {
    if z_extent <= 0 || tile_extent.min_element() <= 0 {
        return false;
    }
    point.x >= tile_pos.x
        && point.x <= tile_pos.x + tile_extent.x
        && point.y >= tile_pos.y
        && point.y <= tile_pos.y + tile_extent.y
        && point.z >= tile_pos.z
        && point.z + z_extent <= tile_pos.z + tile_extent.z
}

/// Same-shape overlap; placements of different shapes never overlap
pub fn placements_overlap(a: &Placement, b: &Placement) -> bool {
    match (a, b) {
        (Placement::Tile(a), Placement::Tile(b)) => tiles_overlap(a, b),
        (Placement::Edge(a), Placement::Edge(b)) => edges_overlap(a, b),
        (Placement::Point(a), Placement::Point(b)) => points_overlap(a, b),
        _ => false,
    }
}

/// Tile box fits in `[0, x_num) x [0, y_num)`
pub fn tile_inside_area(pos: IVec3, extent: IVec3, area: IVec2) -> bool {
    pos.x >= 0 && pos.y >= 0 && pos.x + extent.x <= area.x && pos.y + extent.y <= area.y
}

/// Edge run of `length` lies on the grid lines of the area
pub fn edge_inside_area(edge: Edge, length: i32, area: IVec2) -> bool {
    if edge.x < 0 || edge.y < 0 {
        return false;
    }
    match edge.edge_type {
        EdgeType::Horizontal => edge.x + length <= area.x && edge.y <= area.y,
        EdgeType::Vertical => edge.x <= area.x && edge.y + length <= area.y,
    }
}

/// Corners range over `[0, x_num] x [0, y_num]`
pub fn point_inside_area(point: IVec3, area: IVec2) -> bool {
    point.x >= 0 && point.y >= 0 && point.x <= area.x && point.y <= area.y
}

/// Cells claimed by `item` anchored at `start`
///
/// Tiles cover their (optionally rotated) box. Points claim the four cells
/// around their corner on every floor they span. Edge items are resolved with
/// [`occupied_positions_for_edge`].
pub fn occupied_positions_for_item(item: &Item, start: IVec3, rotated: bool) -> Vec<IVec3> {
    let extent = item.rotated_extent(rotated);
    let mut cells = Vec::new();
    match item.shape() {
        PlacedShape::Tile => {
            for x in 0..extent.x {
                for y in 0..extent.y {
                    for z in 0..extent.z {
                        cells.push(start + IVec3::new(x, y, z));
                    }
                }
            }
        }
        PlacedShape::Point => {
            for z in 0..extent.z {
                for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                    cells.push(start + IVec3::new(dx, dy, z));
                }
            }
        }
        PlacedShape::Edge => {}
    }
    cells
}

/// Cells on both sides of every unit edge of the run
pub fn occupied_positions_for_edge(edge: Edge, extent: IVec3) -> Vec<IVec3> {
    let mut cells = Vec::new();
    for step in 0..extent.x {
        for h in 0..extent.z {
            match edge.edge_type {
                EdgeType::Horizontal => {
                    cells.push(IVec3::new(edge.x + step, edge.y, edge.z + h));
                    cells.push(IVec3::new(edge.x + step, edge.y - 1, edge.z + h));
                }
                EdgeType::Vertical => {
                    cells.push(IVec3::new(edge.x, edge.y + step, edge.z + h));
                    cells.push(IVec3::new(edge.x - 1, edge.y + step, edge.z + h));
                }
            }
        }
    }
    cells
}

/// Eraser cursor: a cell for tile and `Any` targets, an edge for edge targets,
/// a corner for point targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraserCursor {
    pub target: EraserTarget,
    pub cell: IVec3,
    pub edge: Edge,
    pub extent: IVec3,
}

/// Whether the eraser removes `placement` of `item`
///
/// `Any` removes tiles overlapping the eraser box and edges or points lying
/// inside it. A single target compares same-shape footprints; point erasers
/// use the `z` component of the extent as their height.
pub fn erased_by(eraser: &EraserCursor, item: &Item, placement: &Placement) -> bool {
    if !item.is_eraser_allowed || !eraser.target.matches(item.placed_type) {
        return false;
    }
    let any = eraser.target == EraserTarget::Any;
    match placement {
        Placement::Tile(p) => tile_overlaps(eraser.cell, eraser.extent, p.grid_position, p.extent),
        Placement::Edge(p) if any => edge_inside_tile(p.edge, p.extent, eraser.cell, eraser.extent),
        Placement::Edge(p) => edge_overlaps(eraser.edge, eraser.extent, p.edge, p.extent),
        Placement::Point(p) if any => {
            point_inside_tile(p.grid_position, p.z_extent, eraser.cell, eraser.extent)
        }
        Placement::Point(p) => {
            point_overlaps(eraser.cell, eraser.extent.z, p.grid_position, p.z_extent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemId, PlacedType};

    fn tile(x: i32, y: i32, z: i32, ex: i32, ey: i32, ez: i32) -> TilePlacement {
        TilePlacement::new(ItemId::nil(), IVec3::new(x, y, z), IVec3::new(ex, ey, ez))
    }

    #[test]
    fn test_tile_overlap_basic() {
        assert!(tiles_overlap(&tile(3, 3, 0, 2, 2, 1), &tile(4, 4, 0, 1, 1, 1)));
        assert!(!tiles_overlap(&tile(0, 0, 0, 2, 2, 1), &tile(2, 0, 0, 1, 1, 1)));
        assert!(!tiles_overlap(&tile(0, 0, 0, 1, 1, 1), &tile(0, 0, 1, 1, 1, 1)));
        assert!(tiles_overlap(&tile(0, 0, 0, 1, 1, 2), &tile(0, 0, 1, 1, 1, 1)));
    }

    #[test]
    fn test_zero_extent_never_overlaps() {
        assert!(!tiles_overlap(&tile(0, 0, 0, 0, 1, 1), &tile(0, 0, 0, 1, 1, 1)));
        assert!(!tiles_overlap(&tile(0, 0, 0, 0, 0, 0), &tile(0, 0, 0, 0, 0, 0)));
        let e = Edge::horizontal(0, 0, 0);
        assert!(!edge_overlaps(e, IVec3::new(0, 1, 1), e, IVec3::ONE));
        assert!(!point_overlaps(IVec3::ZERO, 0, IVec3::ZERO, 1));
        assert!(!edge_inside_tile(e, IVec3::ZERO, IVec3::ZERO, IVec3::ONE));
        assert!(!point_inside_tile(IVec3::ZERO, 1, IVec3::ZERO, IVec3::ZERO));
    }

    #[test]
    fn test_tile_overlap_symmetry() {
        let tiles = [
            tile(0, 0, 0, 2, 2, 1),
            tile(1, 1, 0, 1, 1, 1),
            tile(2, 0, 0, 1, 3, 2),
            tile(-1, -1, 0, 1, 1, 1),
            tile(0, 0, 1, 3, 3, 1),
        ];
        for a in &tiles {
            for b in &tiles {
                assert_eq!(tiles_overlap(a, b), tiles_overlap(b, a));
            }
        }
    }

    #[test]
    fn test_parallel_edges() {
        let one = IVec3::ONE;
        let three = IVec3::new(3, 1, 1);
        assert!(edge_overlaps(Edge::horizontal(0, 2, 0), three, Edge::horizontal(2, 2, 0), one));
        assert!(!edge_overlaps(Edge::horizontal(0, 2, 0), three, Edge::horizontal(3, 2, 0), one));
        assert!(!edge_overlaps(Edge::horizontal(0, 2, 0), three, Edge::horizontal(0, 3, 0), one));
        assert!(edge_overlaps(Edge::vertical(1, 0, 0), three, Edge::vertical(1, 2, 0), three));
        assert!(!edge_overlaps(Edge::vertical(1, 0, 0), one, Edge::vertical(1, 0, 1), one));
    }

    #[test]
    fn test_perpendicular_edges_only_overlap_when_crossing() {
        let three = IVec3::new(3, 1, 1);
        // corner
        assert!(!edge_overlaps(Edge::horizontal(0, 0, 0), three, Edge::vertical(0, 0, 0), three));
        // T-junction
        assert!(!edge_overlaps(Edge::horizontal(0, 1, 0), three, Edge::vertical(1, 1, 0), three));
        // cross
        assert!(edge_overlaps(Edge::horizontal(0, 1, 0), three, Edge::vertical(1, 0, 0), three));
        assert!(edge_overlaps(Edge::vertical(1, 0, 0), three, Edge::horizontal(0, 1, 0), three));
    }

    #[test]
    fn test_edge_overlap_symmetry() {
        let cases = [
            (Edge::horizontal(0, 1, 0), IVec3::new(3, 1, 1)),
            (Edge::vertical(1, 0, 0), IVec3::new(3, 1, 2)),
            (Edge::horizontal(2, 1, 1), IVec3::ONE),
            (Edge::vertical(0, 0, 0), IVec3::new(2, 1, 1)),
        ];
        for (a, ae) in cases {
            for (b, be) in cases {
                assert_eq!(edge_overlaps(a, ae, b, be), edge_overlaps(b, be, a, ae));
            }
        }
    }

    #[test]
    fn test_edge_inside_tile() {
        let tile_pos = IVec3::new(0, 0, 0);
        let tile_ext = IVec3::new(2, 2, 1);
        assert!(edge_inside_tile(Edge::horizontal(0, 2, 0), IVec3::new(2, 1, 1), tile_pos, tile_ext));
        assert!(edge_inside_tile(Edge::vertical(1, 0, 0), IVec3::ONE, tile_pos, tile_ext));
        assert!(!edge_inside_tile(Edge::horizontal(1, 0, 0), IVec3::new(2, 1, 1), tile_pos, tile_ext));
        assert!(!edge_inside_tile(Edge::vertical(0, 0, 0), IVec3::new(1, 1, 2), tile_pos, tile_ext));
    }

    #[test]
    fn test_point_overlap_and_inside() {
        assert!(point_overlaps(IVec3::new(1, 1, 0), 2, IVec3::new(1, 1, 1), 1));
        assert!(!point_overlaps(IVec3::new(1, 1, 0), 1, IVec3::new(1, 1, 1), 1));
        assert!(!point_overlaps(IVec3::new(1, 1, 0), 1, IVec3::new(1, 2, 0), 1));
        assert!(point_inside_tile(IVec3::new(2, 2, 0), 1, IVec3::ZERO, IVec3::new(2, 2, 1)));
        assert!(!point_inside_tile(IVec3::new(3, 2, 0), 1, IVec3::ZERO, IVec3::new(2, 2, 1)));
        assert!(!point_inside_tile(IVec3::new(1, 1, 0), 2, IVec3::ZERO, IVec3::new(2, 2, 1)));
    }

    #[test]
    fn test_area_checks() {
        let area = IVec2::new(10, 10);
        assert!(tile_inside_area(IVec3::new(8, 8, 0), IVec3::new(2, 2, 1), area));
        assert!(!tile_inside_area(IVec3::new(9, 8, 0), IVec3::new(2, 2, 1), area));
        assert!(edge_inside_area(Edge::horizontal(7, 10, 0), 3, area));
        assert!(!edge_inside_area(Edge::horizontal(8, 10, 0), 3, area));
        assert!(edge_inside_area(Edge::vertical(10, 0, 0), 10, area));
        assert!(!edge_inside_area(Edge::vertical(-1, 0, 0), 1, area));
        assert!(point_inside_area(IVec3::new(10, 10, 0), area));
        assert!(!point_inside_area(IVec3::new(11, 0, 0), area));
    }

    #[test]
    fn test_occupied_positions() {
        let block = Item::new("Block", PlacedType::Block).with_extent(IVec3::new(2, 1, 1));
        let cells = occupied_positions_for_item(&block, IVec3::new(1, 1, 0), true);
        assert_eq!(cells, vec![IVec3::new(1, 1, 0), IVec3::new(1, 2, 0)]);

        let pillar = Item::new("Pillar", PlacedType::Pillar);
        assert_eq!(occupied_positions_for_item(&pillar, IVec3::ZERO, false).len(), 4);

        let cells = occupied_positions_for_edge(Edge::vertical(2, 0, 0), IVec3::new(2, 1, 1));
        assert_eq!(cells.len(), 4);
        assert!(cells.contains(&IVec3::new(1, 1, 0)));
        assert!(cells.contains(&IVec3::new(2, 1, 0)));
    }

    #[test]
    fn test_eraser_targets() {
        let block = Item::new("Block", PlacedType::Block);
        let wall = Item::new("Wall", PlacedType::Wall);
        let tile_p: Placement = TilePlacement::new(block.id, IVec3::new(1, 1, 0), IVec3::ONE).into();
        let wall_p: Placement =
            EdgePlacement::new(wall.id, Edge::horizontal(1, 2, 0), IVec3::ONE).into();

        let mut eraser = EraserCursor {
            target: EraserTarget::Any,
            cell: IVec3::new(1, 1, 0),
            edge: Edge::horizontal(0, 0, 0),
            extent: IVec3::ONE,
        };
        assert!(erased_by(&eraser, &block, &tile_p));
        assert!(erased_by(&eraser, &wall, &wall_p));

        eraser.target = EraserTarget::Only(PlacedType::Wall);
        assert!(!erased_by(&eraser, &block, &tile_p));
        assert!(!erased_by(&eraser, &wall, &wall_p));
        eraser.edge = Edge::horizontal(1, 2, 0);
        assert!(erased_by(&eraser, &wall, &wall_p));

        let mut locked = wall.clone();
        locked.is_eraser_allowed = false;
        assert!(!erased_by(&eraser, &locked, &wall_p));
    }
}
