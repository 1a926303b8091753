//! Item catalog with O(1) lookup by item ID

use crate::grid::Vec3;
use crate::item::{DefaultPivots, Item, ItemId, PlacedType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Ordered catalog of placeable items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSet {
    pub id: Uuid,
    pub name: String,
    #[serde(default = "default_tile_size")]
    pub tile_size: Vec3,
    items: Vec<Item>,
    #[serde(default)]
    pub version: u64,
    /// Item ID -> position in `items`
    #[serde(skip)]
    index: HashMap<ItemId, usize>,
}

fn default_tile_size() -> Vec3 {
    Vec3::splat(100.0)
}

impl Default for ItemSet {
    fn default() -> Self {
        Self::new("Item Set")
    }
}

impl PartialEq for ItemSet {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.tile_size == other.tile_size
            && self.items == other.items
    }
}

impl ItemSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tile_size: default_tile_size(),
            items: Vec::new(),
            version: 0,
            index: HashMap::new(),
        }
    }

    /// Rebuild the lookup index after deserialization
    pub fn rebuild_index(&mut self) {
        self.index = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id, i))
            .collect();
    }

    /// Add an item, replacing any existing item with the same ID
    pub fn add_item(&mut self, item: Item) -> ItemId {
        let id = item.id;
        if let Some(&i) = self.index.get(&id) {
            self.items[i] = item;
        } else {
            self.index.insert(id, self.items.len());
            self.items.push(item);
        }
        self.version += 1;
        id
    }

    /// Create and add a new item using the configured default pivot for its family
    pub fn create_item(
        &mut self,
        name: impl Into<String>,
        placed_type: PlacedType,
        pivots: &DefaultPivots,
    ) -> ItemId {
        self.add_item_with_defaults(Item::new(name, placed_type), pivots)
    }

    /// Add an item after applying the configured default pivot for its family
    pub fn add_item_with_defaults(&mut self, mut item: Item, pivots: &DefaultPivots) -> ItemId {
        item.pivot_position = pivots.pivot_for(item.placed_type);
        self.add_item(item)
    }

    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        let i = self.index.remove(&id)?;
        let item = self.items.remove(i);
        self.rebuild_index();
        self.version += 1;
        Some(item)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.index.get(&id).and_then(|&i| self.items.get(i))
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        match self.index.get(&id) {
            Some(&i) => self.items.get_mut(i),
            None => None,
        }
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.index.contains_key(&id)
    }

    /// Items in insertion order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn items_of_type(&self, placed_type: PlacedType) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .filter(move |item| item.placed_type == placed_type)
    }

    pub fn restriction_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.is_restriction())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::PivotPosition;

    #[test]
    fn test_add_and_lookup() {
        let mut set = ItemSet::new("Dungeon");
        let a = set.add_item(Item::new("A", PlacedType::Block));
        let b = set.add_item(Item::new("B", PlacedType::Wall));
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(a).unwrap().name, "A");
        assert_eq!(set.get(b).unwrap().name, "B");
        assert!(set.get(ItemId::new()).is_none());
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let mut set = ItemSet::new("Order");
        for name in ["z", "a", "m"] {
            set.add_item(Item::new(name, PlacedType::Block));
        }
        let names: Vec<_> = set.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut set = ItemSet::new("Remove");
        let a = set.add_item(Item::new("A", PlacedType::Block));
        let b = set.add_item(Item::new("B", PlacedType::Block));
        let c = set.add_item(Item::new("C", PlacedType::Block));
        assert!(set.remove_item(b).is_some());
        assert!(!set.contains(b));
        assert_eq!(set.get(a).unwrap().name, "A");
        assert_eq!(set.get(c).unwrap().name, "C");
        assert!(set.remove_item(b).is_none());
    }

    #[test]
    fn test_create_item_uses_default_pivots() {
        let mut pivots = DefaultPivots::default();
        pivots.set(PlacedType::Wall, PivotPosition::Side);
        let mut set = ItemSet::new("Pivots");
        let wall = set.create_item("Wall", PlacedType::Wall, &pivots);
        assert_eq!(set.get(wall).unwrap().pivot_position, PivotPosition::Side);
    }

    #[test]
    fn test_index_rebuilt_after_deserialize() {
        let mut set = ItemSet::new("Serde");
        let a = set.add_item(Item::new("A", PlacedType::Pillar));
        let json = serde_json::to_string(&set).unwrap();
        let mut loaded: ItemSet = serde_json::from_str(&json).unwrap();
        loaded.rebuild_index();
        assert_eq!(loaded.get(a).unwrap().name, "A");
    }
}
