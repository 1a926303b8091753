//! Editing session configuration
//!
//! Everything the tools read while editing lives in [`EditSessionConfig`]:
//! the snapping lattice, default pivots for new items, eraser setup and fill
//! options. It is persisted as JSON in the platform config directory.

mod file;

pub use file::*;

use serde::{Deserialize, Serialize};
use tiled_level_core::{DefaultPivots, EraserTarget, FillSettings, IVec2, IVec3};

/// Largest eraser extent accepted along any axis
pub const MAX_ERASER_EXTENT: i32 = 16;

/// Default cap on flood-filled cells
pub const DEFAULT_MAX_FILL_REGION: usize = 65_536;

/// Options of the fill tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    /// Only fill cells that have a tile on the floor below
    pub need_ground: bool,
    /// Bound the fill by tiles; when false, wall and edge placements bound it
    pub tiles_as_boundary: bool,
    pub enable_gap: bool,
    pub gap_coefficient: f32,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            need_ground: false,
            tiles_as_boundary: true,
            enable_gap: false,
            gap_coefficient: 1.0,
        }
    }
}

impl FillConfig {
    pub fn settings(&self) -> FillSettings {
        FillSettings {
            enable_gap: self.enable_gap,
            gap_coefficient: self.gap_coefficient,
        }
    }
}

/// Configuration passed to an [`EditSession`](crate::EditSession)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditSessionConfig {
    /// Cursor lattice spacing in cells
    pub step_size: IVec2,
    /// Lattice origin in cells
    pub start_point: IVec2,
    pub default_pivots: DefaultPivots,
    /// Quantize the cursor to the lattice
    pub snap_enabled: bool,
    /// Show the grid helper under the brush
    pub show_helper: bool,
    pub eraser_target: EraserTarget,
    pub eraser_extent: IVec3,
    /// Flood fill stops after this many cells
    pub max_fill_region: usize,
    /// Let the eraser and eyedropper reach floors that are hidden
    pub edit_hidden_floors: bool,
    /// Floors covered by a box selection, counted up from the active floor
    pub floor_select_count: i32,
    /// Box selection covers every floor
    pub select_all_floors: bool,
    /// Paint without replacing overlapping placements
    pub multi_mode: bool,
    pub fill: FillConfig,
}

impl Default for EditSessionConfig {
    fn default() -> Self {
        Self {
            step_size: IVec2::new(1, 1),
            start_point: IVec2::new(0, 0),
            default_pivots: DefaultPivots::default(),
            snap_enabled: true,
            show_helper: true,
            eraser_target: EraserTarget::Any,
            eraser_extent: IVec3::ONE,
            max_fill_region: DEFAULT_MAX_FILL_REGION,
            edit_hidden_floors: false,
            floor_select_count: 1,
            select_all_floors: false,
            multi_mode: false,
            fill: FillConfig::default(),
        }
    }
}

impl EditSessionConfig {
    /// Reset values a hand-edited file may have broken
    pub fn sanitize(&mut self) {
        let e = self.eraser_extent;
        let in_range = |v: i32| (1..=MAX_ERASER_EXTENT).contains(&v);
        if !(in_range(e.x) && in_range(e.y) && in_range(e.z)) {
            self.eraser_extent = IVec3::ONE;
        }
        if self.step_size.x < 1 || self.step_size.y < 1 {
            self.step_size = IVec2::new(self.step_size.x.max(1), self.step_size.y.max(1));
        }
        if self.floor_select_count < 1 {
            self.floor_select_count = 1;
        }
    }

    pub fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }
}
