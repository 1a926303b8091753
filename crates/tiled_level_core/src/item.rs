//! Catalog item descriptors

use crate::grid::{IVec3, Vec3Swizzles};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Stable handle of a catalog item
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for ItemId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Shape family an item is placed as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlacedType {
    #[default]
    Block,
    Floor,
    Wall,
    Edge,
    Pillar,
    Point,
}

impl PlacedType {
    pub fn shape(self) -> PlacedShape {
        match self {
            PlacedType::Block | PlacedType::Floor => PlacedShape::Tile,
            PlacedType::Wall | PlacedType::Edge => PlacedShape::Edge,
            PlacedType::Pillar | PlacedType::Point => PlacedShape::Point,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlacedType::Block => "Block",
            PlacedType::Floor => "Floor",
            PlacedType::Wall => "Wall",
            PlacedType::Edge => "Edge",
            PlacedType::Pillar => "Pillar",
            PlacedType::Point => "Point",
        }
    }

    pub fn all() -> &'static [PlacedType] {
        &[
            PlacedType::Block,
            PlacedType::Floor,
            PlacedType::Wall,
            PlacedType::Edge,
            PlacedType::Pillar,
            PlacedType::Point,
        ]
    }
}

/// What an eraser removes: one placed type, or anything under it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EraserTarget {
    #[default]
    Any,
    Only(PlacedType),
}

impl EraserTarget {
    pub fn matches(self, placed_type: PlacedType) -> bool {
        match self {
            EraserTarget::Any => true,
            EraserTarget::Only(t) => t == placed_type,
        }
    }

    /// Cursor shape the eraser snaps to; `Any` moves over cells
    pub fn cursor_shape(self) -> PlacedShape {
        match self {
            EraserTarget::Any => PlacedShape::Tile,
            EraserTarget::Only(t) => t.shape(),
        }
    }
}

/// Geometric shape of a placement: 3D box, 2D edge run, or 1D corner column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacedShape {
    Tile,
    Edge,
    Point,
}

/// Whether an item claims its cells exclusively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StructureType {
    /// At most one per cell within its family
    #[default]
    Structure,
    /// May coexist with structures and other props
    Prop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SourceType {
    Actor,
    #[default]
    Mesh,
}

/// Anchor used to align the visual of an item to its occupied cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PivotPosition {
    #[default]
    Bottom,
    Center,
    Corner,
    Side,
    Fit,
}

impl PivotPosition {
    pub fn display_name(&self) -> &'static str {
        match self {
            PivotPosition::Bottom => "Bottom",
            PivotPosition::Center => "Center",
            PivotPosition::Corner => "Corner",
            PivotPosition::Side => "Side",
            PivotPosition::Fit => "Fit",
        }
    }
}

/// Build/remove rule carried by a restriction item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RestrictionType {
    AllowBuilding,
    #[default]
    DisallowBuilding,
    AllowRemoving,
    DisallowRemoving,
    AllowBuildingAndRemoving,
    DisallowBuildingAndRemoving,
}

impl RestrictionType {
    pub fn allows_building(self) -> bool {
        matches!(
            self,
            RestrictionType::AllowBuilding | RestrictionType::AllowBuildingAndRemoving
        )
    }

    pub fn disallows_building(self) -> bool {
        matches!(
            self,
            RestrictionType::DisallowBuilding | RestrictionType::DisallowBuildingAndRemoving
        )
    }

    pub fn allows_removing(self) -> bool {
        matches!(
            self,
            RestrictionType::AllowRemoving | RestrictionType::AllowBuildingAndRemoving
        )
    }

    pub fn disallows_removing(self) -> bool {
        matches!(
            self,
            RestrictionType::DisallowRemoving | RestrictionType::DisallowBuildingAndRemoving
        )
    }
}

/// Restriction rule attached to a restriction item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestrictionRule {
    #[serde(default)]
    pub kind: RestrictionType,
    #[serde(default = "default_true")]
    pub target_all_items: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_items: Vec<ItemId>,
}

impl Default for RestrictionRule {
    fn default() -> Self {
        Self {
            kind: RestrictionType::DisallowBuilding,
            target_all_items: true,
            target_items: Vec::new(),
        }
    }
}

impl RestrictionRule {
    pub fn new(kind: RestrictionType) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Limit the rule to the given items
    pub fn targeting(mut self, items: impl IntoIterator<Item = ItemId>) -> Self {
        self.target_all_items = false;
        self.target_items = items.into_iter().collect();
        self
    }

    pub fn targets(&self, item: ItemId) -> bool {
        self.target_all_items || self.target_items.contains(&item)
    }
}

fn default_true() -> bool {
    true
}

fn default_extent() -> IVec3 {
    IVec3::ONE
}

fn default_fill_coefficient() -> f32 {
    1.0
}

/// A placeable catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub placed_type: PlacedType,
    #[serde(default)]
    pub structure_type: StructureType,
    /// Footprint in cells. Edges use `x` as run length and `z` as height,
    /// points only use `z`.
    #[serde(default = "default_extent")]
    pub extent: IVec3,
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(default)]
    pub pivot_position: PivotPosition,
    #[serde(default)]
    pub auto_placement: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_override: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness_override: Option<f32>,
    #[serde(default)]
    pub snap_to_floor: bool,
    #[serde(default)]
    pub snap_to_wall: bool,
    #[serde(default = "default_true")]
    pub is_eraser_allowed: bool,
    /// Relative weight when picked by the fill tool
    #[serde(default = "default_fill_coefficient")]
    pub fill_coefficient: f32,
    #[serde(default)]
    pub allow_random_rotation: bool,
    /// Filled independently on top of other fill items
    #[serde(default)]
    pub allow_overlay: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restriction: Option<RestrictionRule>,
}

impl Item {
    /// Create a new item with default settings for its family
    pub fn new(name: impl Into<String>, placed_type: PlacedType) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            placed_type,
            structure_type: StructureType::Structure,
            extent: IVec3::ONE,
            source_type: SourceType::Mesh,
            pivot_position: DefaultPivots::default().pivot_for(placed_type),
            auto_placement: false,
            height_override: None,
            thickness_override: None,
            snap_to_floor: false,
            snap_to_wall: false,
            is_eraser_allowed: true,
            fill_coefficient: 1.0,
            allow_random_rotation: false,
            allow_overlay: false,
            restriction: None,
        }
    }

    /// A restriction zone brush: a one-cell prop block centred on its cell
    pub fn restriction(name: impl Into<String>, rule: RestrictionRule) -> Self {
        Self {
            structure_type: StructureType::Prop,
            pivot_position: PivotPosition::Center,
            restriction: Some(rule),
            ..Self::new(name, PlacedType::Block)
        }
    }

    pub fn with_extent(mut self, extent: IVec3) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_structure_type(mut self, structure_type: StructureType) -> Self {
        self.structure_type = structure_type;
        self
    }

    pub fn with_fill(mut self, coefficient: f32, random_rotation: bool, overlay: bool) -> Self {
        self.fill_coefficient = coefficient;
        self.allow_random_rotation = random_rotation;
        self.allow_overlay = overlay;
        self
    }

    pub fn shape(&self) -> PlacedShape {
        self.placed_type.shape()
    }

    pub fn is_structure(&self) -> bool {
        self.structure_type == StructureType::Structure
    }

    pub fn is_restriction(&self) -> bool {
        self.restriction.is_some()
    }

    /// Footprint after an optional quarter turn
    pub fn rotated_extent(&self, rotated: bool) -> IVec3 {
        if rotated {
            self.extent.yxz()
        } else {
            self.extent
        }
    }
}

/// Pivot assigned to newly created items, per family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultPivots(pub HashMap<PlacedType, PivotPosition>);

impl Default for DefaultPivots {
    fn default() -> Self {
        let mut map = HashMap::new();
        for placed_type in PlacedType::all() {
            let pivot = match placed_type {
                PlacedType::Point | PlacedType::Edge => PivotPosition::Center,
                _ => PivotPosition::Bottom,
            };
            map.insert(*placed_type, pivot);
        }
        Self(map)
    }
}

impl DefaultPivots {
    pub fn pivot_for(&self, placed_type: PlacedType) -> PivotPosition {
        self.0.get(&placed_type).copied().unwrap_or_default()
    }

    pub fn set(&mut self, placed_type: PlacedType, pivot: PivotPosition) {
        self.0.insert(placed_type, pivot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mapping() {
        assert_eq!(PlacedType::Block.shape(), PlacedShape::Tile);
        assert_eq!(PlacedType::Floor.shape(), PlacedShape::Tile);
        assert_eq!(PlacedType::Wall.shape(), PlacedShape::Edge);
        assert_eq!(PlacedType::Edge.shape(), PlacedShape::Edge);
        assert_eq!(PlacedType::Pillar.shape(), PlacedShape::Point);
        assert_eq!(PlacedType::Point.shape(), PlacedShape::Point);
    }

    #[test]
    fn test_item_defaults() {
        let item = Item::new("Crate", PlacedType::Block);
        assert_eq!(item.extent, IVec3::ONE);
        assert_eq!(item.pivot_position, PivotPosition::Bottom);
        assert!(item.is_eraser_allowed);
        assert_eq!(item.fill_coefficient, 1.0);
        assert!(!item.allow_overlay);

        let point = Item::new("Lamp", PlacedType::Point);
        assert_eq!(point.pivot_position, PivotPosition::Center);
    }

    #[test]
    fn test_restriction_item() {
        let target = ItemId::new();
        let rule = RestrictionRule::new(RestrictionType::DisallowBuilding).targeting([target]);
        let item = Item::restriction("No build", rule);
        assert_eq!(item.structure_type, StructureType::Prop);
        assert_eq!(item.pivot_position, PivotPosition::Center);
        let rule = item.restriction.as_ref().unwrap();
        assert!(rule.targets(target));
        assert!(!rule.targets(ItemId::new()));
        assert!(rule.kind.disallows_building());
        assert!(!rule.kind.disallows_removing());
    }

    #[test]
    fn test_item_deserialize_fills_defaults() {
        let id = ItemId::new();
        let json = format!(r#"{{"id":"{}","name":"Wall","placed_type":"Wall"}}"#, id);
        let item: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(item.id, id);
        assert_eq!(item.extent, IVec3::ONE);
        assert!(item.is_eraser_allowed);
        assert_eq!(item.fill_coefficient, 1.0);
    }
}
