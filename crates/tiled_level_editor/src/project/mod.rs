//! Project management for the level editor
//!
//! This module handles project file save/load and tracks where the edited
//! project lives on disk and whether it has unsaved changes.

mod file;

pub use file::*;

use std::path::PathBuf;
use tiled_level_core::{ItemSet, LevelAsset, LevelProject};

/// The project being edited
#[derive(Debug, Clone, Default)]
pub struct EditorProject {
    pub project: LevelProject,
    pub path: Option<PathBuf>,
    pub dirty: bool,
}

impl EditorProject {
    pub fn new(item_set: ItemSet, level: LevelAsset) -> Self {
        Self {
            project: LevelProject::new(item_set, level),
            path: None,
            dirty: false,
        }
    }

    pub fn level(&self) -> &LevelAsset {
        &self.project.level
    }

    pub fn level_mut(&mut self) -> &mut LevelAsset {
        &mut self.project.level
    }

    pub fn items(&self) -> &ItemSet {
        &self.project.item_set
    }

    pub fn items_mut(&mut self) -> &mut ItemSet {
        &mut self.project.item_set
    }

    /// Catalog and level borrowed together for store commands
    pub fn split_mut(&mut self) -> (&ItemSet, &mut LevelAsset) {
        (&self.project.item_set, &mut self.project.level)
    }

    /// File stem of the project path, or "Untitled"
    pub fn name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string())
    }
}
