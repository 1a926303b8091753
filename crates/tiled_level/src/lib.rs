//! # tiled_level
//!
//! Multi-floor tiled level editing and game-time building.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use tiled_level::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(TiledLevelPlugin::default())
//!         .run();
//! }
//! ```
//!
//! ## Features
//!
//! - `runtime` (default) - Game-time build/remove validation
//! - `editor` (default) - Editing session, tools and preferences
//! - `bevy` - Asset loading, resources and plugins for Bevy apps
//!
//! ## Crate Structure
//!
//! This umbrella crate re-exports all tiled_level_* sub-crates:
//!
//! - [`core`] - Items, placements, floors, overlap rules and fill
//! - [`runtime`] - Game-time building (requires `runtime` feature)
//! - [`editor`] - Editor session (requires `editor` feature)

// =============================================================================
// Core module - fundamental data structures
// =============================================================================

/// Core data types for multi-floor levels.
///
/// This module provides the fundamental types:
/// - [`Item`] / [`ItemSet`] - The item catalog
/// - [`LevelAsset`] - The multi-floor placement store
/// - [`Placement`] - Tile, edge and point placements
/// - [`LevelProject`] - Saved bundle of a level and its items
pub mod core {
    pub use tiled_level_core::*;
}

pub use tiled_level_core::{
    ChangeSet, Edge, EdgePlacement, EdgeType, EraserTarget, Floor, Item, ItemId, ItemSet,
    LevelAsset, LevelProject, PlacedShape, PlacedType, Placement, PointPlacement, StoreError,
    StoreEvent, StructureType, TilePlacement,
};

// =============================================================================
// Runtime module - game-time building (optional)
// =============================================================================

/// Game-time building with restriction zones.
///
/// Requires the `runtime` feature (enabled by default).
#[cfg(feature = "runtime")]
pub mod runtime {
    pub use tiled_level_runtime::*;
}

#[cfg(feature = "runtime")]
pub use tiled_level_runtime::{
    BuildOutcome, BuildRejection, GameData, GametimeError, GametimeMode, GametimeSystem,
    RemoveOutcome,
};

// =============================================================================
// Editor module - editing session (optional)
// =============================================================================

/// Editor session, tools, commands and preferences.
///
/// Requires the `editor` feature (enabled by default).
#[cfg(feature = "editor")]
pub mod editor {
    pub use tiled_level_editor::*;
}

#[cfg(feature = "editor")]
pub use tiled_level_editor::{
    EditSession, EditSessionConfig, EditTool, EditorCommand, EditorProject, StrokeModifiers,
    StrokeStep,
};

#[cfg(feature = "bevy")]
pub use plugin::TiledLevelPlugin;

#[cfg(feature = "bevy")]
mod plugin {
    use bevy::app::{App, Plugin};

    /// Adds the runtime and editor plugins of the enabled features
    #[derive(Default)]
    pub struct TiledLevelPlugin {
        #[cfg(feature = "editor")]
        pub editor: tiled_level_editor::TiledLevelEditorPlugin,
    }

    impl Plugin for TiledLevelPlugin {
        #[allow(unused_variables)]
        fn build(&self, app: &mut App) {
            #[cfg(feature = "runtime")]
            app.add_plugins(tiled_level_runtime::TiledLevelRuntimePlugin);

            #[cfg(feature = "editor")]
            self.editor.build(app);
        }
    }
}

// =============================================================================
// Prelude - import everything commonly needed
// =============================================================================

/// Commonly used types.
///
/// Import with:
/// ```rust,ignore
/// use tiled_level::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Edge, EdgePlacement, Item, ItemId, ItemSet, LevelAsset, LevelProject, PlacedType,
        Placement, PointPlacement, TilePlacement,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{GameData, GametimeMode, GametimeSystem};

    #[cfg(feature = "editor")]
    pub use crate::{EditSession, EditSessionConfig, EditTool, EditorCommand, EditorProject};

    #[cfg(feature = "bevy")]
    pub use crate::TiledLevelPlugin;

    #[cfg(all(feature = "bevy", feature = "runtime"))]
    pub use tiled_level_runtime::{BuildItemRequest, ItemBuilt, ItemRemoved, RemoveItemRequest};
}
