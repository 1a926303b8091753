//! Runtime error types

use thiserror::Error;
use tiled_level_core::{ProjectError, Vec3};

#[derive(Debug, Error, PartialEq)]
pub enum GametimeError {
    #[error("item set tile size {found:?} does not match the system tile size {expected:?}")]
    TileSizeMismatch { expected: Vec3, found: Vec3 },
    #[error("levels {0} and {1} overlap")]
    OverlappingLevels(usize, usize),
}

/// Failure while loading a level project as an asset
#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Project(#[from] ProjectError),
}
