//! Core data structures for multi-floor tiled levels
//!
//! This crate provides the model shared by the editor and the runtime:
//! - `Item` / `ItemSet` - the catalog of placeable items
//! - `TilePlacement`, `EdgePlacement`, `PointPlacement` - placed instances
//! - `Floor` / `LevelAsset` - the multi-floor placement store
//! - `overlap` - collision rules between placements
//! - `fill` - flood fill and weighted area distribution
//! - `LevelProject` - the saved bundle of a level and its item set

mod asset;
mod change;
mod error;
pub mod fill;
mod floor;
mod grid;
mod item;
mod item_set;
pub mod overlap;
pub mod pivot;
mod placement;
mod project;

pub use asset::LevelAsset;
pub use change::{ChangeSet, StoreEvent, StoreListener, StoreListeners};
pub use error::{ProjectError, StoreError};
pub use fill::{
    CandidatePool, FillPlan, FillSettings, FillSolver, FilledEdge, FilledTile, FloodFill,
};
pub use floor::{by_descending_floor_position, floor_display_name, Floor};
pub use grid::{Aabb, Edge, EdgeType, IVec2, IVec3, PlacementTransform, Vec3, Vec3Swizzles};
pub use item::{
    DefaultPivots, EraserTarget, Item, ItemId, PivotPosition, PlacedShape, PlacedType,
    RestrictionRule, RestrictionType, SourceType, StructureType,
};
pub use item_set::ItemSet;
pub use pivot::{MirrorAxis, MirrorState};
pub use placement::{occupied_edges, EdgePlacement, Placement, PointPlacement, TilePlacement};
pub use project::{LevelProject, PROJECT_FORMAT_VERSION};
