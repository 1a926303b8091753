//! Level project - bundles a level with the item set its placements refer to
//!
//! This is the unit that is saved to and loaded from `.level.json` files.
//! Loading always rebuilds the item index and drops placements whose item is
//! missing from the set, so a project is usable as soon as it is parsed.

use crate::asset::LevelAsset;
use crate::error::ProjectError;
use crate::item_set::ItemSet;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Current on-disk format version
pub const PROJECT_FORMAT_VERSION: u32 = 1;

/// A level together with its item set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(bevy::asset::Asset, bevy::reflect::TypePath))]
pub struct LevelProject {
    /// Format version for future compatibility
    #[serde(default = "default_version")]
    pub version: u32,
    pub item_set: ItemSet,
    pub level: LevelAsset,
}

fn default_version() -> u32 {
    PROJECT_FORMAT_VERSION
}

impl LevelProject {
    pub fn new(item_set: ItemSet, mut level: LevelAsset) -> Self {
        level.item_set_id = item_set.id;
        Self {
            version: PROJECT_FORMAT_VERSION,
            item_set,
            level,
        }
    }

    /// Parse a project and run the post-load cleanup
    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        let mut project: LevelProject = serde_json::from_str(json).map_err(ProjectError::Parse)?;
        project.prepare();
        Ok(project)
    }

    pub fn to_json(&self) -> Result<String, ProjectError> {
        serde_json::to_string_pretty(self).map_err(ProjectError::Serialize)
    }

    /// Rebuild lookup indices and drop placements of unknown items.
    /// Returns the number of placements removed.
    pub fn prepare(&mut self) -> usize {
        self.item_set.rebuild_index();
        let removed = self.level.clear_invalid_placements(&self.item_set).removed.len();
        if removed > 0 {
            info!(
                "Dropped {} placements referencing items missing from '{}'",
                removed, self.item_set.name
            );
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::IVec3;
    use crate::item::{Item, ItemId, PlacedType};
    use crate::placement::{Placement, TilePlacement};

    #[test]
    fn test_json_round_trip() {
        let mut items = ItemSet::new("Dungeon");
        let block = items.add_item(Item::new("Stone", PlacedType::Block));
        let mut level = LevelAsset::default();
        level
            .add_tile(&items, TilePlacement::new(block, IVec3::new(1, 2, 0), IVec3::ONE))
            .unwrap();
        let project = LevelProject::new(items, level);

        let json = project.to_json().unwrap();
        let loaded = LevelProject::from_json(&json).unwrap();
        assert_eq!(loaded, project);
        assert!(loaded.item_set.contains(block));
        assert_eq!(loaded.level.item_set_id, loaded.item_set.id);
    }

    #[test]
    fn test_load_drops_unknown_items() {
        let mut items = ItemSet::new("Dungeon");
        let block = items.add_item(Item::new("Stone", PlacedType::Block));
        let ghost = ItemId::new();
        let mut level = LevelAsset::default();
        level
            .add_tile(&items, TilePlacement::new(block, IVec3::ZERO, IVec3::ONE))
            .unwrap();
        // Write a placement for an item the set never had, bypassing validation.
        let mut value = serde_json::to_value(LevelProject::new(items, level)).unwrap();
        let stray = serde_json::to_value(TilePlacement::new(ghost, IVec3::ONE, IVec3::ONE)).unwrap();
        value["level"]["floors"][0]["blocks"]
            .as_array_mut()
            .unwrap()
            .push(stray);

        let loaded = LevelProject::from_json(&value.to_string()).unwrap();
        let remaining = loaded.level.all_placements();
        assert_eq!(remaining.len(), 1);
        assert!(matches!(&remaining[0], Placement::Tile(t) if t.item_id == block));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            LevelProject::from_json("{ not json"),
            Err(ProjectError::Parse(_))
        ));
    }
}
