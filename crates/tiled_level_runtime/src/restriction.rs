//! Restriction zones: cell sets covered by restriction items
//!
//! Every restriction item placed in a level contributes its cells to one zone
//! per item. Build and remove checks ask whether any cell of a candidate falls
//! in a zone whose rule applies to the item being built or removed.

use crate::game_data::GameData;
use std::collections::{BTreeMap, HashSet};
use tiled_level_core::{IVec3, ItemId, ItemSet, RestrictionRule};

#[derive(Debug, Clone, PartialEq)]
pub struct RestrictionZone {
    pub item_id: ItemId,
    pub rule: RestrictionRule,
    pub cells: HashSet<IVec3>,
}

impl RestrictionZone {
    pub fn contains_any(&self, cells: &[IVec3]) -> bool {
        cells.iter().any(|c| self.cells.contains(c))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestrictionZones {
    zones: BTreeMap<ItemId, RestrictionZone>,
}

impl RestrictionZones {
    /// Collect the zones of every restriction item placed in `data`
    pub fn from_game_data(data: &GameData, items: &ItemSet) -> Self {
        let mut zones: BTreeMap<ItemId, RestrictionZone> = BTreeMap::new();
        for tile in data.tiles() {
            let Some(rule) = items.get(tile.item_id).and_then(|i| i.restriction.as_ref()) else {
                continue;
            };
            zones
                .entry(tile.item_id)
                .or_insert_with(|| RestrictionZone {
                    item_id: tile.item_id,
                    rule: rule.clone(),
                    cells: HashSet::new(),
                })
                .cells
                .extend(tile.occupied_cells());
        }
        Self { zones }
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RestrictionZone> {
        self.zones.values()
    }

    fn any_zone(
        &self,
        item: ItemId,
        cells: &[IVec3],
        applies: impl Fn(&RestrictionRule) -> bool,
    ) -> bool {
        self.zones
            .values()
            .any(|z| applies(&z.rule) && z.rule.targets(item) && z.contains_any(cells))
    }

    /// Building `item` over `cells` passes the zone rules
    ///
    /// With `lock_build` the cells must touch a zone allowing the build;
    /// otherwise they must not touch a zone forbidding it.
    pub fn build_allowed(&self, item: ItemId, cells: &[IVec3], lock_build: bool) -> bool {
        if lock_build {
            self.any_zone(item, cells, |r| r.kind.allows_building())
        } else {
            !self.any_zone(item, cells, |r| r.kind.disallows_building())
        }
    }

    /// Removing `item` at `cells` is blocked by the zone rules
    pub fn remove_restricted(&self, item: ItemId, cells: &[IVec3], lock_remove: bool) -> bool {
        if lock_remove {
            !self.any_zone(item, cells, |r| r.kind.allows_removing())
        } else {
            self.any_zone(item, cells, |r| r.kind.disallows_removing())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiled_level_core::{Item, PlacedType, RestrictionType, TilePlacement};

    fn zones_with(rule: RestrictionRule) -> (RestrictionZones, ItemSet) {
        let mut items = ItemSet::new("Zones");
        let zone = items.add_item(Item::restriction("No Build", rule));
        let mut data = GameData::default();
        data.push(
            PlacedType::Block,
            TilePlacement::new(zone, IVec3::new(2, 2, 0), IVec3::new(2, 1, 1)).into(),
        );
        (RestrictionZones::from_game_data(&data, &items), items)
    }

    #[test]
    fn test_zone_cells() {
        let (zones, _) = zones_with(RestrictionRule::new(RestrictionType::DisallowBuilding));
        assert_eq!(zones.len(), 1);
        let zone = zones.iter().next().unwrap();
        assert!(zone.cells.contains(&IVec3::new(3, 2, 0)));
        assert!(!zone.cells.contains(&IVec3::new(4, 2, 0)));
    }

    #[test]
    fn test_disallow_targets_only_listed_items() {
        let mut items = ItemSet::new("Targets");
        let wall = items.add_item(Item::new("Wall", PlacedType::Block));
        let lamp = items.add_item(Item::new("Lamp", PlacedType::Block));
        let rule = RestrictionRule::new(RestrictionType::DisallowBuilding).targeting([wall]);
        let (zones, _) = zones_with(rule);

        let inside = [IVec3::new(2, 2, 0)];
        let outside = [IVec3::new(0, 0, 0)];
        assert!(!zones.build_allowed(wall, &inside, false));
        assert!(zones.build_allowed(lamp, &inside, false));
        assert!(zones.build_allowed(wall, &outside, false));
    }

    #[test]
    fn test_lock_build_requires_allow_zone() {
        let (zones, _) = zones_with(RestrictionRule::new(RestrictionType::AllowBuilding));
        let item = ItemId::new();
        assert!(zones.build_allowed(item, &[IVec3::new(2, 2, 0)], true));
        assert!(!zones.build_allowed(item, &[IVec3::new(5, 5, 0)], true));
        assert!(RestrictionZones::default().build_allowed(item, &[IVec3::ZERO], false));
        assert!(!RestrictionZones::default().build_allowed(item, &[IVec3::ZERO], true));
    }

    #[test]
    fn test_remove_rules() {
        let item = ItemId::new();
        let cell = [IVec3::new(3, 2, 0)];
        let (deny, _) = zones_with(RestrictionRule::new(RestrictionType::DisallowRemoving));
        assert!(deny.remove_restricted(item, &cell, false));
        assert!(!deny.remove_restricted(item, &[IVec3::ZERO], false));

        let (allow, _) =
            zones_with(RestrictionRule::new(RestrictionType::AllowBuildingAndRemoving));
        assert!(!allow.remove_restricted(item, &cell, true));
        assert!(allow.remove_restricted(item, &[IVec3::ZERO], true));
    }
}
