//! Integer grid primitives, edges and placement transforms

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

pub use glam::{IVec2, IVec3, Vec3, Vec3Swizzles};

/// Axis-aligned world-space box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Strict containment, matching a point lying on the box surface as outside
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpgt(self.min).all() && p.cmplt(self.max).all()
    }

    /// Boxes share interior volume
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmplt(other.max).all() && other.min.cmplt(self.max).all()
    }

    /// Grow the box by `lo` on the min side and `hi` on the max side
    pub fn expanded(&self, lo: Vec3, hi: Vec3) -> Aabb {
        Aabb::new(self.min - lo, self.max + hi)
    }
}

/// Orientation of an edge between cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EdgeType {
    /// Runs along +X, lies on the line `y = Y`
    #[default]
    Horizontal,
    /// Runs along +Y, lies on the line `x = X`
    Vertical,
}

impl EdgeType {
    pub fn toggled(self) -> Self {
        match self {
            EdgeType::Horizontal => EdgeType::Vertical,
            EdgeType::Vertical => EdgeType::Horizontal,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            EdgeType::Horizontal => "H",
            EdgeType::Vertical => "V",
        }
    }
}

/// A unit edge on the grid lines of floor `z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Edge {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub edge_type: EdgeType,
}

impl Edge {
    pub const fn new(x: i32, y: i32, z: i32, edge_type: EdgeType) -> Self {
        Self { x, y, z, edge_type }
    }

    pub const fn horizontal(x: i32, y: i32, z: i32) -> Self {
        Self::new(x, y, z, EdgeType::Horizontal)
    }

    pub const fn vertical(x: i32, y: i32, z: i32) -> Self {
        Self::new(x, y, z, EdgeType::Vertical)
    }

    pub const fn position(&self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    pub fn set_position(&mut self, position: IVec3) {
        self.x = position.x;
        self.y = position.y;
        self.z = position.z;
    }

    pub fn toggle_type(&mut self) {
        self.edge_type = self.edge_type.toggled();
    }

    /// The edge `step` units further along its run direction
    pub fn advanced(&self, step: i32) -> Edge {
        match self.edge_type {
            EdgeType::Horizontal => Edge::new(self.x + step, self.y, self.z, self.edge_type),
            EdgeType::Vertical => Edge::new(self.x, self.y + step, self.z, self.edge_type),
        }
    }

    pub fn offset(&self, delta: IVec3) -> Edge {
        Edge::new(
            self.x + delta.x,
            self.y + delta.y,
            self.z + delta.z,
            self.edge_type,
        )
    }

    /// Same edge on floor `z`
    pub fn with_z(&self, z: i32) -> Edge {
        Edge::new(self.x, self.y, z, self.edge_type)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}-{}",
            self.x,
            self.y,
            self.z,
            self.edge_type.suffix()
        )
    }
}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Vertical edges first, then by floor; horizontal edges sort row by row,
/// vertical edges column by column.
impl Ord for Edge {
    fn cmp(&self, other: &Self) -> Ordering {
        let rank = |t: EdgeType| match t {
            EdgeType::Vertical => 0,
            EdgeType::Horizontal => 1,
        };
        rank(self.edge_type)
            .cmp(&rank(other.edge_type))
            .then(self.z.cmp(&other.z))
            .then_with(|| match self.edge_type {
                EdgeType::Horizontal => (self.y, self.x).cmp(&(other.y, other.x)),
                EdgeType::Vertical => (self.x, self.y).cmp(&(other.x, other.y)),
            })
    }
}

/// Render transform of a placement, relative to the level origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementTransform {
    pub translation: Vec3,
    /// Rotation around Z in degrees
    #[serde(default)]
    pub yaw: f32,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

impl Default for PlacementTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            yaw: 0.0,
            scale: Vec3::ONE,
        }
    }
}

impl PlacementTransform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.translation += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_display() {
        assert_eq!(Edge::horizontal(1, 2, 3).to_string(), "1,2,3-H");
        assert_eq!(Edge::vertical(-1, 0, 0).to_string(), "-1,0,0-V");
    }

    #[test]
    fn test_edge_ordering() {
        let mut edges = vec![
            Edge::horizontal(1, 0, 0),
            Edge::horizontal(0, 1, 0),
            Edge::vertical(1, 0, 0),
            Edge::vertical(0, 1, 0),
            Edge::horizontal(0, 0, 0),
        ];
        edges.sort();
        assert_eq!(
            edges,
            vec![
                Edge::vertical(0, 1, 0),
                Edge::vertical(1, 0, 0),
                Edge::horizontal(0, 0, 0),
                Edge::horizontal(1, 0, 0),
                Edge::horizontal(0, 1, 0),
            ]
        );
    }

    #[test]
    fn test_edge_advance_follows_run_direction() {
        assert_eq!(Edge::horizontal(1, 1, 0).advanced(2), Edge::horizontal(3, 1, 0));
        assert_eq!(Edge::vertical(1, 1, 0).advanced(2), Edge::vertical(1, 3, 0));
    }

    #[test]
    fn test_aabb_intersects_needs_shared_volume() {
        let a = Aabb::new(Vec3::ZERO, Vec3::splat(100.0));
        let touching = Aabb::new(Vec3::new(100.0, 0.0, 0.0), Vec3::new(200.0, 100.0, 100.0));
        let inside = Aabb::new(Vec3::splat(10.0), Vec3::splat(20.0));
        assert!(!a.intersects(&touching));
        assert!(a.intersects(&inside));
        assert!(a.expanded(Vec3::ZERO, Vec3::X).intersects(&touching));
    }

    #[test]
    fn test_aabb_contains_is_strict() {
        let b = Aabb::new(Vec3::ZERO, Vec3::splat(100.0));
        assert!(b.contains(Vec3::splat(50.0)));
        assert!(!b.contains(Vec3::new(0.0, 50.0, 50.0)));
    }
}
