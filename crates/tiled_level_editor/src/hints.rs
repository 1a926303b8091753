//! Callbacks from the editing session to whatever draws the brush

use tiled_level_core::{ItemId, PlacementTransform};

/// Receives visual state changes; the session never draws anything itself
pub trait BrushHints: Send + Sync {
    /// Called on every cursor update
    fn set_brush_valid(&mut self, valid: bool);

    /// Where the preview of the active item sits, if anything is previewed
    fn set_preview_transform(&mut self, transform: Option<&PlacementTransform>);

    fn selection_changed(&mut self, _selected: &[ItemId], _active: Option<ItemId>) {}
}

/// Hints sink for headless sessions
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHints;

impl BrushHints for NoopHints {
    fn set_brush_valid(&mut self, _valid: bool) {}

    fn set_preview_transform(&mut self, _transform: Option<&PlacementTransform>) {}
}
