//! Project file save/load operations

use super::EditorProject;
use std::path::Path;
use tiled_level_core::{LevelProject, ProjectError};
use tracing::info;

impl EditorProject {
    /// Load project from file
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let content = std::fs::read_to_string(path)?;
        let mut project: LevelProject =
            serde_json::from_str(&content).map_err(ProjectError::Parse)?;

        // Rebuild the item index and drop placements of unknown items
        let removed = project.prepare();

        info!(
            "Loaded {:?} ({} floors, {} placements)",
            path,
            project.level.floors().len(),
            project.level.placement_count()
        );

        Ok(Self {
            project,
            path: Some(path.to_path_buf()),
            // Only dirty when the cleanup changed something
            dirty: removed > 0,
        })
    }

    /// Save project to file
    pub fn save(&mut self, path: &Path) -> Result<(), ProjectError> {
        let content = self.project.to_json()?;
        std::fs::write(path, content)?;

        self.path = Some(path.to_path_buf());
        self.dirty = false;

        info!("Saved project to {:?}", path);
        Ok(())
    }

    /// Save to current path if set
    pub fn save_current(&mut self) -> Result<(), ProjectError> {
        if let Some(path) = self.path.clone() {
            self.save(&path)
        } else {
            Err(ProjectError::NoPath)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiled_level_core::{IVec3, Item, ItemId, ItemSet, LevelAsset, PlacedType, TilePlacement};

    fn sample() -> (EditorProject, ItemId) {
        let mut items = ItemSet::new("Village");
        let hut = items.add_item(Item::new("Hut", PlacedType::Block));
        let mut level = LevelAsset::default();
        level
            .add_tile(&items, TilePlacement::new(hut, IVec3::new(1, 1, 0), IVec3::ONE))
            .unwrap();
        (EditorProject::new(items, level), hut)
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("village.level.json");
        let (mut project, hut) = sample();
        project.dirty = true;

        project.save(&path).unwrap();
        assert!(!project.dirty);
        assert_eq!(project.name(), "village.level");

        let loaded = EditorProject::load(&path).unwrap();
        assert!(!loaded.dirty);
        assert_eq!(loaded.path.as_deref(), Some(path.as_path()));
        assert_eq!(loaded.level().placement_count(), 1);
        assert!(loaded.items().get(hut).is_some());
    }

    #[test]
    fn test_unknown_items_dropped_and_marked_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.level.json");
        let (mut project, hut) = sample();
        project.items_mut().remove_item(hut);
        std::fs::write(&path, project.project.to_json().unwrap()).unwrap();

        let loaded = EditorProject::load(&path).unwrap();
        assert!(loaded.dirty);
        assert_eq!(loaded.level().placement_count(), 0);
    }

    #[test]
    fn test_save_current_needs_path() {
        let (mut project, _) = sample();
        assert!(matches!(project.save_current(), Err(ProjectError::NoPath)));
        assert_eq!(project.name(), "Untitled");
    }
}
