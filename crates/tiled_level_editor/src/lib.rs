//! tiled_level_editor - Editing session for multi-floor tiled levels
//!
//! This crate provides the editor core behind a level editing UI:
//! - Project management (save/load)
//! - Brushes with grid snapping, rotation and mirroring
//! - Paint, eraser, eyedropper, flood fill and box selection tools
//! - Per-floor and per-item instance statistics
//! - Persisted editor preferences
//!
//! Widgets are left to the host. They drive an [`EditSession`] through cursor
//! updates, strokes and [`EditorCommand`]s, and observe it through
//! [`BrushHints`] and the level's store events.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use tiled_level_editor::TiledLevelEditorPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(TiledLevelEditorPlugin::new().with_project_path("levels/house.level.json"))
//!         .run();
//! }
//! ```

pub mod commands;
pub mod hints;
pub mod preferences;
pub mod project;
pub mod stats;
pub mod tools;

pub use tiled_level_core;

pub use commands::EditorCommand;
pub use hints::{BrushHints, NoopHints};
pub use preferences::{EditSessionConfig, FillConfig, PreferencesError};
pub use project::EditorProject;
pub use stats::InstanceStats;
pub use tools::{
    BoxSelection, Brush, BrushAction, EditSession, EditTool, EraseOutcome, FillOutcome,
    PaintOutcome, PaintRejection, StrokeModifiers, StrokeStep,
};

#[cfg(feature = "bevy")]
pub use plugin::TiledLevelEditorPlugin;

#[cfg(feature = "bevy")]
mod plugin {
    use crate::commands::handle_keyboard_shortcuts;
    use crate::preferences::EditSessionConfig;
    use crate::project::EditorProject;
    use crate::tools::EditSession;
    use bevy::prelude::*;
    use std::path::PathBuf;
    use tracing::warn;

    /// Plugin hosting an [`EditSession`] in a Bevy app
    ///
    /// This plugin provides:
    /// - The [`EditSession`] resource, configured from the saved preferences
    /// - Keyboard shortcuts mapped to editor commands
    #[derive(Default)]
    pub struct TiledLevelEditorPlugin {
        /// Project to edit; an empty project when unset
        pub project: Option<EditorProject>,
        /// Project file loaded at startup, ignored when `project` is set
        pub project_path: Option<PathBuf>,
    }

    impl TiledLevelEditorPlugin {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_project(mut self, project: EditorProject) -> Self {
            self.project = Some(project);
            self
        }

        pub fn with_project_path(mut self, path: impl Into<PathBuf>) -> Self {
            self.project_path = Some(path.into());
            self
        }

        fn initial_project(&self) -> EditorProject {
            if let Some(project) = &self.project {
                return project.clone();
            }
            let Some(path) = &self.project_path else {
                return EditorProject::default();
            };
            match EditorProject::load(path) {
                Ok(project) => project,
                Err(e) => {
                    warn!("Failed to load project {:?}: {}. Starting empty.", path, e);
                    EditorProject::default()
                }
            }
        }
    }

    impl Plugin for TiledLevelEditorPlugin {
        fn build(&self, app: &mut App) {
            let session = EditSession::new(self.initial_project(), EditSessionConfig::load());
            app.insert_resource(session)
                .add_systems(Update, handle_keyboard_shortcuts);
        }
    }
}
