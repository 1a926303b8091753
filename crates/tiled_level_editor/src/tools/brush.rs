//! Brush cursor: quantization, straight-line lock, rotation and mirroring

use tiled_level_core::overlap::{edge_inside_area, point_inside_area, tile_inside_area};
use tiled_level_core::{Edge, EdgeType, IVec2, IVec3, MirrorAxis, MirrorState, PlacedShape, Vec3};

/// Snap `value` to the lattice `start + k * step`, rounding to the nearest node
pub fn snap_value(value: i32, step: i32, start: i32) -> i32 {
    if step <= 1 {
        return value;
    }
    let d = value - start;
    let node = d.div_euclid(step);
    let rest = d.rem_euclid(step);
    let round_up = i32::from(2 * rest >= step);
    (node + round_up) * step + start
}

pub fn snap_cell(cell: IVec2, step: IVec2, start: IVec2) -> IVec2 {
    IVec2::new(
        snap_value(cell.x, step.x, start.x),
        snap_value(cell.y, step.y, start.y),
    )
}

/// Grid coordinate under a world position for a cursor of `shape`
///
/// Tiles take the cell containing the position, points the nearest corner.
/// Edges take the nearest grid line across the run and the containing cell
/// along it.
pub fn quantize(world: Vec3, shape: PlacedShape, edge_type: EdgeType, tile_size: Vec3) -> IVec2 {
    let cell = |v: f32, size: f32| (v / size).floor() as i32;
    let line = |v: f32, size: f32| (v / size).round() as i32;
    let (tx, ty) = (tile_size.x, tile_size.y);
    match (shape, edge_type) {
        (PlacedShape::Tile, _) => IVec2::new(cell(world.x, tx), cell(world.y, ty)),
        (PlacedShape::Point, _) => IVec2::new(line(world.x, tx), line(world.y, ty)),
        (PlacedShape::Edge, EdgeType::Horizontal) => {
            IVec2::new(cell(world.x, tx), line(world.y, ty))
        }
        (PlacedShape::Edge, EdgeType::Vertical) => IVec2::new(line(world.x, tx), cell(world.y, ty)),
    }
}

/// Cursor state of the paint or eraser brush
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Brush {
    shape: Option<PlacedShape>,
    cell: IVec3,
    /// Quarter turns; odd values swap the XY extent and make edges vertical
    rotation: u8,
    mirror: MirrorState,
    straight_from: Option<IVec3>,
    valid: bool,
}

impl Brush {
    pub fn shape(&self) -> PlacedShape {
        self.shape.unwrap_or(PlacedShape::Tile)
    }

    /// Anchor cell, edge anchor or corner, on the active floor
    pub fn cell(&self) -> IVec3 {
        self.cell
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn is_rotated(&self) -> bool {
        self.rotation % 2 == 1
    }

    pub fn edge_type(&self) -> EdgeType {
        if self.is_rotated() {
            EdgeType::Vertical
        } else {
            EdgeType::Horizontal
        }
    }

    pub fn edge(&self) -> Edge {
        Edge::new(self.cell.x, self.cell.y, self.cell.z, self.edge_type())
    }

    pub fn mirror(&self) -> MirrorState {
        self.mirror
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_straight(&self) -> bool {
        self.straight_from.is_some()
    }

    /// Prepare for a new tool or item: clears mirroring and the straight lock
    pub fn setup(&mut self, shape: PlacedShape) {
        self.shape = Some(shape);
        self.mirror = MirrorState::default();
        self.straight_from = None;
    }

    /// Mark the brush unusable until the next setup
    pub fn reset(&mut self) {
        self.setup(self.shape());
        self.valid = false;
    }

    pub fn rotate(&mut self, clockwise: bool) {
        self.rotation = if clockwise {
            (self.rotation + 1) % 4
        } else {
            (self.rotation + 3) % 4
        };
    }

    pub fn toggle_mirror(&mut self, axis: MirrorAxis) -> bool {
        self.mirror.toggle(axis)
    }

    /// Lock movement to one axis from the current cursor
    pub fn begin_straight(&mut self) {
        self.straight_from = Some(self.cell);
    }

    pub fn end_straight(&mut self) {
        self.straight_from = None;
    }

    /// Move to `cell`, honouring the straight lock
    pub fn move_to(&mut self, cell: IVec3) {
        let Some(fixed) = self.straight_from else {
            self.cell = cell;
            return;
        };
        self.cell = match self.shape() {
            PlacedShape::Edge => match self.edge_type() {
                EdgeType::Horizontal => IVec3::new(cell.x, fixed.y, cell.z),
                EdgeType::Vertical => IVec3::new(fixed.x, cell.y, cell.z),
            },
            _ => {
                let (dx, dy) = ((cell.x - fixed.x).abs(), (cell.y - fixed.y).abs());
                if dx >= dy {
                    IVec3::new(cell.x, fixed.y, cell.z)
                } else {
                    IVec3::new(fixed.x, cell.y, cell.z)
                }
            }
        };
    }

    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    /// Footprint of `extent` anchored at the cursor lies inside a `grid` sized area
    ///
    /// `extent` is taken as already rotated for tiles; edges use its `x` as
    /// run length.
    pub fn fits(&self, extent: IVec3, grid: IVec2) -> bool {
        match self.shape() {
            PlacedShape::Tile => tile_inside_area(self.cell, extent, grid),
            PlacedShape::Edge => edge_inside_area(self.edge(), extent.x, grid),
            PlacedShape::Point => point_inside_area(self.cell, grid),
        }
    }
}
