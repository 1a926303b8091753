//! Error types for store commands and project persistence

use crate::item::ItemId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no floor at position {0}")]
    FloorNotFound(i32),
    #[error("a floor already exists at position {0}")]
    FloorExists(i32),
    #[error("item {0} is not in the item set")]
    UnknownItem(ItemId),
    #[error("no active floor")]
    NoActiveFloor,
    #[error("the last floor cannot be deleted")]
    LastFloor,
    #[error("placement shape does not match the item's placed type")]
    ShapeMismatch,
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("failed to access project file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse project: {0}")]
    Parse(serde_json::Error),
    #[error("failed to serialize project: {0}")]
    Serialize(serde_json::Error),
    #[error("project has no file path")]
    NoPath,
}
