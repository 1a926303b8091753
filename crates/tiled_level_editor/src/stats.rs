//! Instance counts per floor and per item

use std::collections::BTreeMap;
use tiled_level_core::{ItemId, LevelAsset};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceStats {
    pub per_floor: BTreeMap<i32, usize>,
    pub per_item: BTreeMap<ItemId, usize>,
    pub total: usize,
}

impl InstanceStats {
    pub fn collect(level: &LevelAsset) -> Self {
        let mut stats = Self::default();
        for floor in level.floors() {
            let placements = floor.placements();
            stats.per_floor.insert(floor.position, placements.len());
            for placement in &placements {
                *stats.per_item.entry(placement.item_id()).or_default() += 1;
            }
            stats.total += placements.len();
        }
        stats
    }

    pub fn item_count(&self, item: ItemId) -> usize {
        self.per_item.get(&item).copied().unwrap_or(0)
    }

    pub fn floor_count(&self, position: i32) -> usize {
        self.per_floor.get(&position).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiled_level_core::{Edge, EdgePlacement, IVec3, Item, ItemSet, PlacedType, TilePlacement};

    #[test]
    fn test_counts() {
        let mut items = ItemSet::new("Stats");
        let block = items.add_item(Item::new("Block", PlacedType::Block));
        let wall = items.add_item(Item::new("Wall", PlacedType::Wall));
        let mut level = LevelAsset::default();
        level.insert_floor(1);
        for x in 0..3 {
            level
                .add_tile(&items, TilePlacement::new(block, IVec3::new(x, 0, 0), IVec3::ONE))
                .unwrap();
        }
        level
            .add_edge(&items, EdgePlacement::new(wall, Edge::vertical(0, 0, 1), IVec3::ONE))
            .unwrap();

        let stats = InstanceStats::collect(&level);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.floor_count(0), 3);
        assert_eq!(stats.floor_count(1), 1);
        assert_eq!(stats.floor_count(7), 0);
        assert_eq!(stats.item_count(block), 3);
        assert_eq!(stats.item_count(wall), 1);
    }
}
