//! World transforms of placements derived from item pivots
//!
//! A placement's translation is the centre of its footprint moved to the
//! item's pivot. Mirroring flips the scale along one axis and shifts the
//! pivot so the mirrored visual keeps covering the same cells.

use crate::grid::{Edge, EdgeType, IVec3, PlacementTransform, Vec3};
use glam::Quat;
use crate::item::{Item, PivotPosition, PlacedType};
use serde::{Deserialize, Serialize};

/// Floor tiles are a quarter of a cell tall
const FLOOR_HEIGHT_RATIO: f32 = 0.25;
/// Thin shapes (edges, points) as a fraction of the cell size
const THIN_RATIO: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MirrorAxis {
    X,
    Y,
    Z,
}

/// Per-axis mirror toggles of the brush
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MirrorState {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl MirrorState {
    /// Flip one axis and return its new state
    pub fn toggle(&mut self, axis: MirrorAxis) -> bool {
        let flag = match axis {
            MirrorAxis::X => &mut self.x,
            MirrorAxis::Y => &mut self.y,
            MirrorAxis::Z => &mut self.z,
        };
        *flag = !*flag;
        *flag
    }

    pub fn any(&self) -> bool {
        self.x || self.y || self.z
    }

    /// Scale multiplier applying the mirrored axes
    pub fn scale(&self) -> Vec3 {
        let sign = |m: bool| if m { -1.0 } else { 1.0 };
        Vec3::new(sign(self.x), sign(self.y), sign(self.z))
    }
}

fn height_ratio(placed_type: PlacedType) -> f32 {
    match placed_type {
        PlacedType::Floor => FLOOR_HEIGHT_RATIO,
        _ => 1.0,
    }
}

/// Offset from the footprint centre to the pivot, in the item's local frame
pub fn pivot_offset(item: &Item, tile_size: Vec3) -> Vec3 {
    let size = item.extent.as_vec3() * tile_size;
    let h = height_ratio(item.placed_type);
    match item.pivot_position {
        PivotPosition::Bottom => Vec3::new(0.0, 0.0, -size.z * 0.5 * h),
        PivotPosition::Corner => Vec3::new(-size.x * 0.5, -size.y * 0.5, -size.z * 0.5 * h),
        PivotPosition::Side => {
            let side = if item.placed_type == PlacedType::Wall {
                Vec3::new(1.0, 0.0, 1.0)
            } else {
                Vec3::new(1.0, 0.0, 0.0)
            };
            size * side * -0.5
        }
        PivotPosition::Center | PivotPosition::Fit => Vec3::ZERO,
    }
}

/// Pivot shift applied when `axis` is toggled to `mirrored`
pub fn mirror_offset(item: &Item, axis: MirrorAxis, mirrored: bool, tile_size: Vec3) -> Vec3 {
    let size = item.extent.as_vec3() * tile_size;
    let sign = if mirrored { 1.0 } else { -1.0 };
    let bottom_z = Vec3::new(0.0, 0.0, size.z * height_ratio(item.placed_type) * sign);
    match (item.pivot_position, axis) {
        (PivotPosition::Bottom, MirrorAxis::Z) => bottom_z,
        (PivotPosition::Corner, MirrorAxis::X) => Vec3::new(size.x * sign, 0.0, 0.0),
        (PivotPosition::Corner, MirrorAxis::Y) => Vec3::new(0.0, size.y * sign, 0.0),
        (PivotPosition::Corner, MirrorAxis::Z) => bottom_z,
        (PivotPosition::Side, MirrorAxis::X) => Vec3::new(size.x * sign, 0.0, 0.0),
        (PivotPosition::Fit, MirrorAxis::Z) => Vec3::new(0.0, 0.0, size.z * sign),
        _ => Vec3::ZERO,
    }
}

/// Accumulated pivot shift for every mirrored axis
pub fn mirrored_offset(item: &Item, mirror: MirrorState, tile_size: Vec3) -> Vec3 {
    let mut offset = Vec3::ZERO;
    for (axis, on) in [
        (MirrorAxis::X, mirror.x),
        (MirrorAxis::Y, mirror.y),
        (MirrorAxis::Z, mirror.z),
    ] {
        if on {
            offset += mirror_offset(item, axis, true, tile_size);
        }
    }
    offset
}

fn finish(
    item: &Item,
    center: Vec3,
    yaw: f32,
    mirror: MirrorState,
    tile_size: Vec3,
) -> PlacementTransform {
    let local = pivot_offset(item, tile_size) + mirrored_offset(item, mirror, tile_size);
    PlacementTransform {
        translation: center + Quat::from_rotation_z(yaw.to_radians()) * local,
        yaw,
        scale: mirror.scale(),
    }
}

/// Transform of a tile placement; `rotation` counts clockwise quarter turns
pub fn tile_transform(
    item: &Item,
    grid_position: IVec3,
    rotation: u8,
    mirror: MirrorState,
    tile_size: Vec3,
) -> PlacementTransform {
    let extent = item.rotated_extent(rotation % 2 == 1).as_vec3();
    let h = height_ratio(item.placed_type);
    let center = grid_position.as_vec3() * tile_size
        + Vec3::new(extent.x * 0.5, extent.y * 0.5, extent.z * 0.5 * h) * tile_size;
    finish(item, center, f32::from(rotation % 4) * 90.0, mirror, tile_size)
}

/// Transform of an edge placement; vertical edges are yawed a quarter turn
pub fn edge_transform(
    item: &Item,
    edge: Edge,
    mirror: MirrorState,
    tile_size: Vec3,
) -> PlacementTransform {
    let len = item.extent.x as f32;
    let height = match item.placed_type {
        PlacedType::Wall => item.extent.z as f32,
        _ => THIN_RATIO,
    };
    let base = edge.position().as_vec3() * tile_size;
    let (run, yaw) = match edge.edge_type {
        EdgeType::Horizontal => (Vec3::new(len * 0.5, 0.0, 0.0), 0.0),
        EdgeType::Vertical => (Vec3::new(0.0, len * 0.5, 0.0), 90.0),
    };
    let center = base + (run + Vec3::new(0.0, 0.0, height * 0.5)) * tile_size;
    finish(item, center, yaw, mirror, tile_size)
}

/// Transform of a point placement on the cell corner
pub fn point_transform(
    item: &Item,
    grid_position: IVec3,
    mirror: MirrorState,
    tile_size: Vec3,
) -> PlacementTransform {
    let height = match item.placed_type {
        PlacedType::Pillar => item.extent.z as f32,
        _ => THIN_RATIO,
    };
    let center = grid_position.as_vec3() * tile_size
        + Vec3::new(0.0, 0.0, height * 0.5 * tile_size.z);
    finish(item, center, 0.0, mirror, tile_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: Vec3 = Vec3::splat(100.0);

    #[test]
    fn test_bottom_pivot_sits_on_floor() {
        let item = Item::new("Block", PlacedType::Block).with_extent(IVec3::new(2, 2, 1));
        let t = tile_transform(&item, IVec3::new(3, 3, 0), 0, MirrorState::default(), TS);
        assert!(t.translation.abs_diff_eq(Vec3::new(400.0, 400.0, 0.0), 1e-3));
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn test_rotated_tile_uses_swapped_footprint() {
        let mut item = Item::new("Bench", PlacedType::Block).with_extent(IVec3::new(2, 1, 1));
        item.pivot_position = PivotPosition::Center;
        let t = tile_transform(&item, IVec3::ZERO, 1, MirrorState::default(), TS);
        assert!(t.translation.abs_diff_eq(Vec3::new(50.0, 100.0, 50.0), 1e-3));
        assert_eq!(t.yaw, 90.0);
    }

    #[test]
    fn test_vertical_edge_is_yawed() {
        let item = Item::new("Wall", PlacedType::Wall);
        let t = edge_transform(&item, Edge::vertical(1, 0, 0), MirrorState::default(), TS);
        assert_eq!(t.yaw, 90.0);
        // bottom pivot drops to the floor plane
        assert!(t.translation.abs_diff_eq(Vec3::new(100.0, 50.0, 0.0), 1e-3));
    }

    #[test]
    fn test_mirror_offset_flips_sign() {
        let item = Item::new("Block", PlacedType::Block);
        let on = mirror_offset(&item, MirrorAxis::Z, true, TS);
        let off = mirror_offset(&item, MirrorAxis::Z, false, TS);
        assert_eq!(on, Vec3::new(0.0, 0.0, 100.0));
        assert_eq!(off, Vec3::new(0.0, 0.0, -100.0));
        assert_eq!(mirror_offset(&item, MirrorAxis::X, true, TS), Vec3::ZERO);

        let floor = Item::new("Floor", PlacedType::Floor);
        assert_eq!(
            mirror_offset(&floor, MirrorAxis::Z, true, TS),
            Vec3::new(0.0, 0.0, 25.0)
        );
    }

    #[test]
    fn test_mirror_state_toggle() {
        let mut m = MirrorState::default();
        assert!(m.toggle(MirrorAxis::Y));
        assert!(m.any());
        assert_eq!(m.scale(), Vec3::new(1.0, -1.0, 1.0));
        assert!(!m.toggle(MirrorAxis::Y));
        assert!(!m.any());
    }
}
